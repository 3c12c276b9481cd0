//! Sign-in page.

use crate::app::api::use_api;
use crate::app::auth;
use crate::app::Route;
use crate::core::auth::SignOutReason;
use crate::core::store::AppStore;
use crate::features::login::state::{FAILURE_MESSAGE, LoginFormState, error_message, sign_in};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use tracing::warn;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::use_navigator;
use yewdux::prelude::use_selector;

#[function_component(LoginPage)]
pub(crate) fn login_page() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str, default: &str| bundle.text(key, default);
    let api = use_api();
    let navigator = use_navigator();
    let notice = use_selector(|store: &AppStore| store.auth.notice);
    let form = use_state(LoginFormState::default);
    let busy = use_state(|| false);
    let error = use_state(|| None as Option<String>);

    let on_username = {
        let form = form.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            form.set(LoginFormState {
                username: input.value(),
                ..(*form).clone()
            });
        })
    };
    let on_password = {
        let form = form.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            form.set(LoginFormState {
                password: input.value(),
                ..(*form).clone()
            });
        })
    };
    let on_submit = {
        let form = form.clone();
        let busy = busy.clone();
        let error = error.clone();
        let api = api.clone();
        let fallback = t("login.error", FAILURE_MESSAGE);
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if *busy || !form.is_complete() {
                return;
            }
            busy.set(true);
            error.set(None);
            let pending = sign_in(&api.backend(), &form.to_form());
            let busy = busy.clone();
            let error = error.clone();
            let api = api.clone();
            let navigator = navigator.clone();
            let fallback = fallback.clone();
            yew::platform::spawn_local(async move {
                match pending.await {
                    Ok(credential) => {
                        auth::sign_in(&api, credential);
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Dashboard);
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "sign-in failed");
                        let message = error_message(&err);
                        error.set(Some(if message == FAILURE_MESSAGE { fallback } else { message }));
                    }
                }
                busy.set(false);
            });
        })
    };

    html! {
        <div class="login-page">
            <form class="login-card" onsubmit={on_submit}>
                <h1>{t("login.title", "NAS 监控系统")}</h1>
                if *notice == Some(SignOutReason::Expired) {
                    <div class="notice">{t("login.expired", "登录已过期，请重新登录")}</div>
                }
                <label>
                    {t("login.username", "用户名")}
                    <input type="text" autocomplete="username" value={form.username.clone()} oninput={on_username} />
                </label>
                <label>
                    {t("login.password", "密码")}
                    <input type="password" autocomplete="current-password" value={form.password.clone()} oninput={on_password} />
                </label>
                {(*error).clone().map_or_else(Html::default, |message| html! {
                    <div class="form-error" role="alert">{message}</div>
                })}
                <button type="submit" class="btn btn-primary" disabled={*busy || !form.is_complete()}>
                    {if *busy { t("login.submitting", "登录中...") } else { t("login.submit", "登录") }}
                </button>
            </form>
        </div>
    }
}
