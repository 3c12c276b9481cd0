//! Persistence and environment helpers for the app shell.

use crate::core::auth::Credential;
use crate::core::config::DashboardConfig;
use crate::i18n::{DEFAULT_LOCALE, LocaleCode};
use gloo::console;
use gloo::storage::{LocalStorage, Storage};
use gloo::utils::document;

pub(crate) const TOKEN_KEY: &str = "token";
pub(crate) const USERNAME_KEY: &str = "username";
pub(crate) const LOCALE_KEY: &str = "nasdash.locale";
const API_BASE_META: &str = "meta[name=\"nasdash-api-base\"]";

pub(crate) fn load_credential() -> Option<Credential> {
    let token = LocalStorage::get::<String>(TOKEN_KEY).ok()?;
    let username = LocalStorage::get::<String>(USERNAME_KEY).unwrap_or_default();
    Credential::new(token, username)
}

pub(crate) fn persist_credential(credential: &Credential) {
    if LocalStorage::set(TOKEN_KEY, &credential.token).is_err()
        || LocalStorage::set(USERNAME_KEY, &credential.username).is_err()
    {
        console::error!("failed to persist credential");
    }
}

pub(crate) fn forget_credential() {
    LocalStorage::delete(TOKEN_KEY);
    LocalStorage::delete(USERNAME_KEY);
}

pub(crate) fn load_locale() -> LocaleCode {
    LocalStorage::get::<String>(LOCALE_KEY)
        .ok()
        .and_then(|value| LocaleCode::from_lang_tag(&value))
        .unwrap_or(DEFAULT_LOCALE)
}

pub(crate) fn persist_locale(locale: LocaleCode) {
    if LocalStorage::set(LOCALE_KEY, locale.code()).is_err() {
        console::error!("failed to persist locale");
    }
}

/// Defaults with the API base taken from `<meta name="nasdash-api-base">` when present.
pub(crate) fn dashboard_config() -> DashboardConfig {
    let meta = document()
        .query_selector(API_BASE_META)
        .ok()
        .flatten()
        .and_then(|element| element.get_attribute("content"));
    DashboardConfig::default().with_api_base(meta.as_deref())
}
