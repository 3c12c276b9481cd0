//! Application root: contexts, routing, and the authentication guard.

use crate::app::api::ApiCtx;
use crate::components::shell::{AppShell, NavLabels};
use crate::core::auth::{AuthStatus, SignOutReason};
use crate::core::store::{AppStore, current_username};
use crate::features::alarm::view::AlarmPage;
use crate::features::dashboard::view::DashboardPage;
use crate::features::docker::view::DockerPage;
use crate::features::io::view::IoPage;
use crate::features::login::view::LoginPage;
use crate::features::network::view::NetworkPage;
use crate::features::system::view::SystemPage;
use crate::features::users::view::UsersPage;
use crate::i18n::{LocaleCode, TranslationBundle};
use nasdash_telemetry::{LoggingConfig, init_logging};
use preferences::{dashboard_config, load_credential, load_locale, persist_locale};
pub(crate) use routes::Route;
use wasm_bindgen::JsCast;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::use_selector;

pub(crate) mod api;
pub(crate) mod auth;
pub(crate) mod poll;
mod preferences;
mod routes;

#[function_component(NasdashApp)]
pub(crate) fn nasdash_app() -> Html {
    let config = use_memo(|_| dashboard_config(), ());
    let api_ctx = {
        let config = config.clone();
        use_memo(
            move |_| {
                let ctx = ApiCtx::new(&config);
                auth::restore(&ctx, load_credential());
                let on_expired = ctx.clone();
                ctx.client
                    .on_unauthorized(move || auth::sign_out(&on_expired, SignOutReason::Expired));
                ctx
            },
            (),
        )
    };
    let locale = use_state(load_locale);
    let bundle = {
        let locale = *locale;
        use_memo(move |_| TranslationBundle::new(locale), locale)
    };
    let status = use_selector(|store: &AppStore| store.auth.status);
    let username = use_selector(|store: &AppStore| {
        current_username(&store.auth).unwrap_or_default().to_string()
    });

    let nav = NavLabels {
        dashboard: bundle.text("nav.dashboard", "仪表盘"),
        system: bundle.text("nav.system", "系统"),
        network: bundle.text("nav.network", "网络"),
        io: bundle.text("nav.io", "IO"),
        docker: bundle.text("nav.docker", "Docker"),
        alarm: bundle.text("nav.alarm", "告警"),
        users: bundle.text("nav.users", "用户"),
        logout: bundle.text("nav.logout", "退出登录"),
    };

    let on_logout = {
        let api_ctx = (*api_ctx).clone();
        Callback::from(move |()| auth::sign_out(&api_ctx, SignOutReason::Logout))
    };

    let locale_selector = {
        let locale = locale.clone();
        html! {
            <select onchange={{
                let locale = locale.clone();
                Callback::from(move |e: Event| {
                    let Some(target) = e
                        .target()
                        .and_then(|target| target.dyn_into::<web_sys::HtmlSelectElement>().ok())
                    else {
                        return;
                    };
                    if let Some(next) = LocaleCode::from_lang_tag(&target.value()) {
                        persist_locale(next);
                        locale.set(next);
                    }
                })
            }}>
                {for LocaleCode::all().iter().map(|lc| html! {
                    <option value={lc.code()} selected={*lc == *locale}>{lc.label()}</option>
                })}
            </select>
        }
    };

    let status_value = *status;
    let shell_username = (*username).clone();
    html! {
        <ContextProvider<ApiCtx> context={(*api_ctx).clone()}>
            <ContextProvider<TranslationBundle> context={(*bundle).clone()}>
                <BrowserRouter>
                    <Switch<Route> render={move |route: Route| {
                        guard(status_value, &route).unwrap_or_else(|| {
                            let page = page_for(&route);
                            if route.is_public() {
                                page
                            } else {
                                html! {
                                    <AppShell
                                        active={route}
                                        nav={nav.clone()}
                                        username={shell_username.clone()}
                                        locale_selector={locale_selector.clone()}
                                        on_logout={on_logout.clone()}
                                    >
                                        {page}
                                    </AppShell>
                                }
                            }
                        })
                    }} />
                </BrowserRouter>
            </ContextProvider<TranslationBundle>>
        </ContextProvider<ApiCtx>>
    }
}

/// Redirect decided before any page mounts, so no resource is polled while
/// signed out.
fn guard(status: AuthStatus, route: &Route) -> Option<Html> {
    match (status, route.is_public()) {
        (AuthStatus::Unknown, _) => Some(html! {}),
        (AuthStatus::SignedOut, false) => Some(html! { <Redirect<Route> to={Route::Login} /> }),
        (AuthStatus::Authenticated, true) => {
            Some(html! { <Redirect<Route> to={Route::Dashboard} /> })
        }
        _ => None,
    }
}

fn page_for(route: &Route) -> Html {
    match route {
        Route::Dashboard => html! { <DashboardPage /> },
        Route::System => html! { <SystemPage /> },
        Route::Network => html! { <NetworkPage /> },
        Route::Io => html! { <IoPage /> },
        Route::Docker => html! { <DockerPage /> },
        Route::Alarm => html! { <AlarmPage /> },
        Route::Users => html! { <UsersPage /> },
        Route::Login => html! { <LoginPage /> },
        Route::NotFound => html! { <Redirect<Route> to={Route::Dashboard} /> },
    }
}

/// Entrypoint invoked by `main.rs` for wasm targets.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Err(err) = init_logging(&LoggingConfig::default()) {
        gloo::console::warn!(format!("logging disabled: {err}"));
    }
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<NasdashApp>::with_root(root).render();
    } else {
        yew::Renderer::<NasdashApp>::new().render();
    }
}
