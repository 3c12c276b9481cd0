use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct CardProps {
    pub title: String,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(Card)]
pub(crate) fn card(props: &CardProps) -> Html {
    html! {
        <section class="card">
            <h2>{props.title.clone()}</h2>
            {for props.children.iter()}
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct StatProps {
    pub label: String,
    pub value: String,
}

/// Label/value pair inside a card.
#[function_component(Stat)]
pub(crate) fn stat(props: &StatProps) -> Html {
    html! {
        <div class="stat">
            <span class="stat-label">{props.label.clone()}</span>
            <span class="stat-value">{props.value.clone()}</span>
        </div>
    }
}
