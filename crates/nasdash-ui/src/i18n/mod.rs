//! Translation catalogs for the dashboard chrome.
//!
//! Catalogs are nested JSON objects compiled into the binary and parsed once
//! per locale. Lookups use dotted paths (`alarm.tabs.records`) and fall back
//! to English, then to the literal the caller passes.

use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

/// Languages the dashboard ships catalogs for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocaleCode {
    /// Simplified Chinese, the operator default.
    #[default]
    Zh,
    /// English.
    En,
}

impl LocaleCode {
    /// Switcher order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Zh, Self::En]
    }

    /// Stored preference value.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    /// Name shown in the switcher, written in the language itself.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Zh => "中文",
            Self::En => "English",
        }
    }

    /// Accepts bare codes and region tags in either separator style
    /// (`zh`, `zh-CN`, `en_US`).
    #[must_use]
    pub fn from_lang_tag(tag: &str) -> Option<Self> {
        let primary = tag.trim().split(['-', '_']).next()?;
        if primary.eq_ignore_ascii_case("zh") {
            Some(Self::Zh)
        } else if primary.eq_ignore_ascii_case("en") {
            Some(Self::En)
        } else {
            None
        }
    }

    fn catalog(self) -> &'static Value {
        match self {
            Self::Zh => &ZH,
            Self::En => &EN,
        }
    }
}

/// Locale used until a stored preference is read.
pub const DEFAULT_LOCALE: LocaleCode = LocaleCode::Zh;

static ZH: LazyLock<Value> = LazyLock::new(|| parse(include_str!("../../i18n/zh.json")));
static EN: LazyLock<Value> = LazyLock::new(|| parse(include_str!("../../i18n/en.json")));

fn parse(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or(Value::Null)
}

/// Catalog handle provided to pages through context.
#[derive(Clone, Debug)]
pub struct TranslationBundle {
    /// Active locale.
    pub locale: LocaleCode,
    catalog: &'static Value,
}

impl PartialEq for TranslationBundle {
    fn eq(&self, other: &Self) -> bool {
        self.locale == other.locale
    }
}

impl TranslationBundle {
    /// Bundle for `locale`.
    #[must_use]
    pub fn new(locale: LocaleCode) -> Self {
        Self {
            locale,
            catalog: locale.catalog(),
        }
    }

    /// Text at `path`, else the English text, else `default`.
    #[must_use]
    pub fn text(&self, path: &str, default: &str) -> String {
        let pointer = format!("/{}", path.replace('.', "/"));
        [self.catalog, LocaleCode::En.catalog()]
            .into_iter()
            .find_map(|catalog| catalog.pointer(&pointer).and_then(Value::as_str))
            .unwrap_or(default)
            .to_string()
    }
}
