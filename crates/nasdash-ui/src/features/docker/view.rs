//! Docker page.

use crate::app::api::use_api;
use crate::app::poll::use_poll;
use crate::components::card::{Card, Stat};
use crate::components::chart::BarChart;
use crate::components::status::{EmptyState, PageStatus};
use crate::core::action::ActionState;
use crate::core::format::{format_engine_time, format_mb, short_id};
use crate::features::docker::state::{
    DockerResources, FAILURE_MESSAGE, IMAGES, PULL_FAILURE_MESSAGE, cpu_series, memory_series,
    pull_image, running_summary, validate_image_name,
};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(DockerPage)]
pub(crate) fn docker_page() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str, default: &str| bundle.text(key, default);
    let api = use_api();
    let resources = use_memo(|_| DockerResources::new(&api.backend()), ());
    let poll = {
        let resources = resources.clone();
        let message = t("docker.error", FAILURE_MESSAGE);
        use_poll(bundle.locale, move |_| resources.group(&message))
    };

    let image_input = use_state(String::new);
    let pull = use_state(ActionState::default);

    let on_input = {
        let image_input = image_input.clone();
        Callback::from(move |event: InputEvent| {
            let input: HtmlInputElement = event.target_unchecked_into();
            image_input.set(input.value());
        })
    };
    let on_pull = {
        let image_input = image_input.clone();
        let pull = pull.clone();
        let poll = poll.clone();
        let backend = api.backend();
        let required = t("docker.image_required", "请输入镜像名称");
        let fallback = t("docker.pull_error", PULL_FAILURE_MESSAGE);
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Ok(name) = validate_image_name(&image_input) else {
                pull.set(ActionState::Failed(required.clone()));
                return;
            };
            let mut next = (*pull).clone();
            if !next.begin() {
                return;
            }
            pull.set(next.clone());
            let request = pull_image(&backend, name);
            let image_input = image_input.clone();
            let pull = pull.clone();
            let poll = poll.clone();
            let fallback = fallback.clone();
            yew::platform::spawn_local(async move {
                let result = request.await;
                next.finish(&result, &fallback);
                if result.is_ok() {
                    image_input.set(String::new());
                    poll.refetch_only(&[IMAGES]);
                }
                pull.set(next);
            });
        })
    };

    let containers_card = resources.containers.current().map_or_else(Html::default, |containers| {
        let (running, total) = running_summary(&containers);
        html! {
            <Card title={t("docker.containers", "容器列表")}>
                <Stat label={t("docker.running", "运行中")} value={format!("{running} / {total}")} />
                if containers.is_empty() {
                    <EmptyState icon="fa-box-open" message={t("docker.no_containers", "暂无容器")} />
                } else {
                    <table class="docker-table">
                        <thead>
                            <tr>
                                <th>{"ID"}</th>
                                <th>{t("docker.name", "名称")}</th>
                                <th>{t("docker.image", "镜像")}</th>
                                <th>{t("docker.status", "状态")}</th>
                                <th>{t("docker.created", "创建时间")}</th>
                            </tr>
                        </thead>
                        <tbody>
                            {for containers.iter().map(|container| html! {
                                <tr key={container.id.clone()}>
                                    <td><code>{short_id(&container.id).to_string()}</code></td>
                                    <td>{container.name.clone()}</td>
                                    <td>{container.image.clone()}</td>
                                    <td>
                                        <span class={classes!("status-badge", if container.is_running() { "running" } else { "stopped" })}>
                                            {container.status.clone()}
                                        </span>
                                    </td>
                                    <td>{format_engine_time(&container.created)}</td>
                                </tr>
                            })}
                        </tbody>
                    </table>
                }
            </Card>
        }
    });

    let stats_card = resources.stats.current().map_or_else(Html::default, |stats| html! {
        <Card title={t("docker.stats", "容器资源使用")}>
            if stats.is_empty() {
                <EmptyState icon="fa-chart-bar" message={t("docker.no_stats", "暂无运行中的容器")} />
            } else {
                <h3>{t("docker.cpu", "CPU 使用率")}</h3>
                <BarChart points={cpu_series(&stats)} unit="%" />
                <h3>{t("docker.memory", "内存使用率")}</h3>
                <BarChart points={memory_series(&stats)} unit="%" max={Some(100.0)} />
            }
        </Card>
    });

    let images_card = resources.images.current().map_or_else(Html::default, |images| html! {
        <Card title={t("docker.images", "镜像列表")}>
            if images.is_empty() {
                <EmptyState icon="fa-layer-group" message={t("docker.no_images", "暂无镜像")} />
            } else {
                <table class="docker-table">
                    <thead>
                        <tr>
                            <th>{"ID"}</th>
                            <th>{t("docker.tags", "标签")}</th>
                            <th>{t("docker.size", "大小")}</th>
                            <th>{t("docker.created", "创建时间")}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {for images.iter().map(|image| html! {
                            <tr key={image.id.clone()}>
                                <td><code>{short_id(&image.id).to_string()}</code></td>
                                <td>{if image.tags.is_empty() { "<none>".to_string() } else { image.tags.join(", ") }}</td>
                                <td>{format_mb(image.size)}</td>
                                <td>{format_engine_time(&image.created)}</td>
                            </tr>
                        })}
                    </tbody>
                </table>
            }
        </Card>
    });

    html! {
        <div class="container">
            <h1 class="page-title">{t("docker.title", "Docker 管理")}</h1>
            <form class="pull-form" onsubmit={on_pull}>
                <input
                    type="text"
                    placeholder={t("docker.image_placeholder", "例如 nginx:latest")}
                    value={(*image_input).clone()}
                    oninput={on_input}
                    disabled={pull.is_busy()}
                />
                <button type="submit" class="btn btn-primary" disabled={pull.is_busy()}>
                    <i class="fas fa-download"></i>
                    {if pull.is_busy() { t("docker.pulling", "拉取中...") } else { t("docker.pull", "拉取镜像") }}
                </button>
                {pull.error().map_or_else(Html::default, |message| html! {
                    <span class="form-error">{message.to_string()}</span>
                })}
            </form>
            <PageStatus state={poll.state()} loading_label={t("common.loading", "加载中...")}>
                {containers_card}
                {stats_card}
                {images_card}
            </PageStatus>
        </div>
    }
}
