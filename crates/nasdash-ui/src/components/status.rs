use crate::core::poll::{ViewError, ViewState};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct ErrorBannerProps {
    pub error: Option<ViewError>,
}

/// Tick failure shown above whatever data is still on screen.
#[function_component(ErrorBanner)]
pub(crate) fn error_banner(props: &ErrorBannerProps) -> Html {
    let Some(error) = props.error.as_ref() else {
        return html! {};
    };
    html! {
        <div class="error-message" role="alert">
            <i class="fas fa-exclamation-triangle"></i>
            <span>{error.message.clone()}</span>
            {if let Some(detail) = error.detail.as_ref() {
                html! { <small class="error-detail">{detail.clone()}</small> }
            } else {
                html! {}
            }}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct PageStatusProps {
    pub state: ViewState,
    pub loading_label: String,
    #[prop_or_default]
    pub children: Children,
}

/// Loading placeholder until the first tick settles, then the error banner
/// plus page content.
#[function_component(PageStatus)]
pub(crate) fn page_status(props: &PageStatusProps) -> Html {
    if props.state.loading() {
        return html! { <div class="loading-overlay">{props.loading_label.clone()}</div> };
    }
    html! {
        <>
            <ErrorBanner error={props.state.error().cloned()} />
            {for props.children.iter()}
        </>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct EmptyStateProps {
    pub icon: &'static str,
    pub message: String,
}

#[function_component(EmptyState)]
pub(crate) fn empty_state(props: &EmptyStateProps) -> Html {
    html! {
        <div class="empty-state">
            <i class={classes!("fas", props.icon)}></i>
            <p>{props.message.clone()}</p>
        </div>
    }
}
