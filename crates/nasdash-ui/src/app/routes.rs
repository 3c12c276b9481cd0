//! Routing definitions for the dashboard.
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Dashboard,
    #[at("/system")]
    System,
    #[at("/network")]
    Network,
    #[at("/io")]
    Io,
    #[at("/docker")]
    Docker,
    #[at("/alarm")]
    Alarm,
    #[at("/users")]
    Users,
    #[at("/login")]
    Login,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Pages reachable without a credential.
    pub(crate) const fn is_public(&self) -> bool {
        matches!(self, Self::Login)
    }
}
