use crate::app::Route;
use yew::prelude::*;
use yew_router::prelude::Link;

#[derive(Clone, PartialEq)]
pub(crate) struct NavLabels {
    pub dashboard: String,
    pub system: String,
    pub network: String,
    pub io: String,
    pub docker: String,
    pub alarm: String,
    pub users: String,
    pub logout: String,
}

#[derive(Properties, PartialEq)]
pub(crate) struct ShellProps {
    pub children: Children,
    pub active: Route,
    pub nav: NavLabels,
    pub username: String,
    pub locale_selector: Html,
    pub on_logout: Callback<()>,
}

#[function_component(AppShell)]
pub(crate) fn app_shell(props: &ShellProps) -> Html {
    let nav_open = use_state(|| false);
    let toggle_nav = {
        let nav_open = nav_open.clone();
        Callback::from(move |_| nav_open.set(!*nav_open))
    };
    let logout = {
        let cb = props.on_logout.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let links = [
        (Route::Dashboard, "fa-gauge", props.nav.dashboard.clone()),
        (Route::System, "fa-microchip", props.nav.system.clone()),
        (Route::Network, "fa-network-wired", props.nav.network.clone()),
        (Route::Io, "fa-hard-drive", props.nav.io.clone()),
        (Route::Docker, "fa-box", props.nav.docker.clone()),
        (Route::Alarm, "fa-bell", props.nav.alarm.clone()),
        (Route::Users, "fa-users", props.nav.users.clone()),
    ];

    html! {
        <div class="app-shell">
            <aside class={classes!("sidebar", if *nav_open { "open" } else { "closed" })}>
                <div class="brand">
                    <strong>{"NAS Dashboard"}</strong>
                    <button class="ghost nav-toggle" onclick={toggle_nav}>{"☰"}</button>
                </div>
                <nav>
                    {for links.into_iter().map(|(route, icon, label)| {
                        let active = route == props.active;
                        html! {
                            <Link<Route> to={route} classes={classes!("nav-item", active.then_some("active"))}>
                                <i class={classes!("fas", icon)}></i>
                                <span>{label}</span>
                            </Link<Route>>
                        }
                    })}
                </nav>
            </aside>
            <div class="main">
                <header class="topbar">
                    <div class="locale">{props.locale_selector.clone()}</div>
                    <div class="account">
                        <span class="username">{props.username.clone()}</span>
                        <button class="ghost" onclick={logout}>{props.nav.logout.clone()}</button>
                    </div>
                </header>
                <main class="content">
                    {for props.children.iter()}
                </main>
            </div>
        </div>
    }
}
