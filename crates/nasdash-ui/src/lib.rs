#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::multiple_crate_versions)]
//! NAS dashboard web UI.
//!
//! The polling, diffing, and view-state machinery lives in [`core`] and is
//! target independent; [`features`] binds it to the backend endpoints of
//! each page. Yew components, browser timers, and the HTTP client only build
//! for wasm32.

pub mod core;
pub mod features;
pub mod i18n;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;
#[cfg(target_arch = "wasm32")]
mod services;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;

#[cfg(test)]
mod tests {
    use crate::core::poll::{Cadence, OverlapPolicy};
    use crate::i18n::{LocaleCode, TranslationBundle};

    #[test]
    fn translation_fallbacks_work() {
        let bundle = TranslationBundle::new(LocaleCode::En);
        assert_eq!(bundle.text("nav.dashboard", "Dash"), "Dashboard");
        assert_eq!(bundle.text("nav.missing_key", "Default"), "Default");
    }

    #[test]
    fn polling_defaults_match_the_dashboard_cadence() {
        assert_eq!(Cadence::default(), Cadence::every_ms(5_000));
        assert_eq!(OverlapPolicy::default(), OverlapPolicy::Skip);
    }
}
