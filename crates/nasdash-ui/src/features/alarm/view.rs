//! Alarm page with records, rules, and access-IP tabs.

use crate::app::api::use_api;
use crate::app::poll::{PollHandle, use_poll};
use crate::components::card::{Card, Stat};
use crate::components::status::{EmptyState, PageStatus};
use crate::core::action::ActionState;
use crate::core::format::format_timestamp;
use crate::core::poll::FetchFuture;
use crate::core::store::{AppStore, current_username};
use crate::features::alarm::state::{
    AlarmResources, AlarmTab, FAILURE_MESSAGE, affected_by, set_blacklisted, set_config_enabled,
    severity_tone, sorted_records, unprocessed_count, update_record_status,
};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use nasdash_api_models::AlarmStatus;
use yew::prelude::*;
use yewdux::prelude::use_selector;

const ACTION_FAILURE_MESSAGE: &str = "操作失败";

/// Run one mutation and refresh the active tab's resources when it succeeds.
fn run_action<T: 'static>(
    action: &UseStateHandle<ActionState>,
    poll: &PollHandle,
    tab: AlarmTab,
    fallback: String,
    request: impl FnOnce() -> FetchFuture<T>,
) {
    let mut next = (**action).clone();
    if !next.begin() {
        return;
    }
    action.set(next.clone());
    let future = request();
    let action = action.clone();
    let poll = poll.clone();
    yew::platform::spawn_local(async move {
        let result = future.await;
        next.finish(&result, &fallback);
        if result.is_ok() {
            poll.refetch_only(affected_by(tab));
        }
        action.set(next);
    });
}

#[function_component(AlarmPage)]
pub(crate) fn alarm_page() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str, default: &str| bundle.text(key, default);
    let api = use_api();
    let username = use_selector(|store: &AppStore| {
        current_username(&store.auth).map(ToString::to_string)
    });
    let tab = use_state(AlarmTab::default);
    let action = use_state(ActionState::default);
    let resources = use_memo(|_| AlarmResources::new(&api.backend()), ());
    let poll = {
        let resources = resources.clone();
        let message = t("alarm.error", FAILURE_MESSAGE);
        use_poll((*tab, bundle.locale), move |(tab, _)| {
            resources.group(*tab, &message)
        })
    };
    let active = *tab;
    let fallback = t("alarm.action_error", ACTION_FAILURE_MESSAGE);
    let backend = api.backend();

    let tabs = html! {
        <div class="tabs">
            {for AlarmTab::all().into_iter().map(|candidate| {
                let onclick = {
                    let tab = tab.clone();
                    let action = action.clone();
                    Callback::from(move |_: MouseEvent| {
                        action.set(ActionState::default());
                        tab.set(candidate);
                    })
                };
                html! {
                    <button
                        class={classes!("tab", (candidate == active).then_some("active"))}
                        {onclick}
                    >
                        {t(candidate.label_key(), candidate.default_label())}
                    </button>
                }
            })}
        </div>
    };

    let summary = resources.statistics.current().map_or_else(Html::default, |stats| {
        let unprocessed = resources
            .records
            .current()
            .map_or_else(|| "-".to_string(), |records| unprocessed_count(&records).to_string());
        html! {
            <div class="dashboard-grid">
                <Card title={t("alarm.statistics", "告警统计")}>
                    <Stat label={t("alarm.total", "告警总数")} value={stats.total.to_string()} />
                    <Stat label={t("alarm.recent", "最近24小时")} value={stats.recent.to_string()} />
                    <Stat label={t("alarm.unprocessed", "未处理")} value={unprocessed} />
                    {for stats.by_severity.iter().map(|(severity, count)| html! {
                        <Stat label={severity.clone()} value={count.to_string()} />
                    })}
                </Card>
            </div>
        }
    });

    let body = match active {
        AlarmTab::Records => resources.records.current().map_or_else(Html::default, |records| {
            if records.is_empty() {
                return html! { <EmptyState icon="fa-bell-slash" message={t("alarm.no_records", "暂无告警记录")} /> };
            }
            html! {
                <table class="alarm-table">
                    <thead>
                        <tr>
                            <th>{t("alarm.time", "时间")}</th>
                            <th>{t("alarm.type", "类型")}</th>
                            <th>{t("alarm.severity", "级别")}</th>
                            <th>{t("alarm.message", "消息")}</th>
                            <th>{t("alarm.status", "状态")}</th>
                            <th>{t("alarm.actions", "操作")}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {for sorted_records(&records).into_iter().map(|record| {
                            let actions = if record.status() == Some(AlarmStatus::Unprocessed) {
                                let mark = |status: AlarmStatus| {
                                    let action = action.clone();
                                    let poll = poll.clone();
                                    let backend = backend.clone();
                                    let fallback = fallback.clone();
                                    let username = (*username).clone();
                                    let id = record.id.clone();
                                    Callback::from(move |_: MouseEvent| {
                                        run_action(&action, &poll, AlarmTab::Records, fallback.clone(), || {
                                            update_record_status(&backend, &id, status, username.clone())
                                        });
                                    })
                                };
                                html! {
                                    <>
                                        <button class="btn btn-small" disabled={action.is_busy()} onclick={mark(AlarmStatus::Processed)}>
                                            {t("alarm.mark_processed", "标记已处理")}
                                        </button>
                                        <button class="btn btn-small btn-secondary" disabled={action.is_busy()} onclick={mark(AlarmStatus::Ignored)}>
                                            {t("alarm.mark_ignored", "忽略")}
                                        </button>
                                    </>
                                }
                            } else {
                                html! {
                                    <small>{record.processed_by.clone().unwrap_or_default()}</small>
                                }
                            };
                            html! {
                                <tr key={record.id.clone()}>
                                    <td>{format_timestamp(&record.timestamp)}</td>
                                    <td>{format!("{} / {}", record.alarm_type, record.sub_type)}</td>
                                    <td>
                                        <span class={classes!("badge", severity_tone(&record.severity).class())}>
                                            {record.severity.clone()}
                                        </span>
                                    </td>
                                    <td>{record.message.clone()}</td>
                                    <td>{t(&format!("alarm.states.{}", record.status.to_ascii_lowercase()), &record.status)}</td>
                                    <td>{actions}</td>
                                </tr>
                            }
                        })}
                    </tbody>
                </table>
            }
        }),
        AlarmTab::Configs => resources.configs.current().map_or_else(Html::default, |configs| {
            if configs.is_empty() {
                return html! { <EmptyState icon="fa-sliders-h" message={t("alarm.no_configs", "暂无告警配置")} /> };
            }
            html! {
                <table class="alarm-table">
                    <thead>
                        <tr>
                            <th>{t("alarm.type", "类型")}</th>
                            <th>{t("alarm.threshold", "阈值")}</th>
                            <th>{t("alarm.duration", "持续时间")}</th>
                            <th>{t("alarm.severity", "级别")}</th>
                            <th>{t("alarm.push_methods", "推送方式")}</th>
                            <th>{t("alarm.enabled", "启用")}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {for configs.iter().map(|config| {
                            let ontoggle = {
                                let action = action.clone();
                                let poll = poll.clone();
                                let backend = backend.clone();
                                let fallback = fallback.clone();
                                let id = config.id.clone();
                                let enabled = !config.enabled;
                                Callback::from(move |_: MouseEvent| {
                                    run_action(&action, &poll, AlarmTab::Configs, fallback.clone(), || {
                                        set_config_enabled(&backend, &id, enabled)
                                    });
                                })
                            };
                            html! {
                                <tr key={config.id.clone()}>
                                    <td>{format!("{} / {}", config.alarm_type, config.sub_type)}</td>
                                    <td>{config.threshold.to_string()}</td>
                                    <td>{format!("{}s", config.duration)}</td>
                                    <td>
                                        <span class={classes!("badge", severity_tone(&config.severity).class())}>
                                            {config.severity.clone()}
                                        </span>
                                    </td>
                                    <td>{config.push_methods.join(", ")}</td>
                                    <td>
                                        <button
                                            class={classes!("status-badge", if config.enabled { "enabled" } else { "disabled" })}
                                            disabled={action.is_busy()}
                                            onclick={ontoggle}
                                        >
                                            {if config.enabled { t("alarm.on", "已启用") } else { t("alarm.off", "已禁用") }}
                                        </button>
                                    </td>
                                </tr>
                            }
                        })}
                    </tbody>
                </table>
            }
        }),
        AlarmTab::AccessIps => resources.access_ips.current().map_or_else(Html::default, |ips| {
            if ips.is_empty() {
                return html! { <EmptyState icon="fa-network-wired" message={t("alarm.no_access_ips", "暂无访问记录")} /> };
            }
            html! {
                <table class="alarm-table">
                    <thead>
                        <tr>
                            <th>{t("alarm.ip", "IP 地址")}</th>
                            <th>{t("alarm.location", "位置")}</th>
                            <th>{t("alarm.requests", "请求次数")}</th>
                            <th>{t("alarm.first_seen", "首次访问")}</th>
                            <th>{t("alarm.last_seen", "最近访问")}</th>
                            <th>{t("alarm.blacklist", "黑名单")}</th>
                        </tr>
                    </thead>
                    <tbody>
                        {for ips.iter().map(|ip| {
                            let ontoggle = {
                                let action = action.clone();
                                let poll = poll.clone();
                                let backend = backend.clone();
                                let fallback = fallback.clone();
                                let address = ip.ip_address.clone();
                                let blacklisted = !ip.is_blacklisted;
                                Callback::from(move |_: MouseEvent| {
                                    run_action(&action, &poll, AlarmTab::AccessIps, fallback.clone(), || {
                                        set_blacklisted(&backend, &address, blacklisted)
                                    });
                                })
                            };
                            let location = [ip.country.as_str(), ip.region.as_str(), ip.city.as_str()]
                                .into_iter()
                                .filter(|part| !part.is_empty())
                                .collect::<Vec<_>>()
                                .join(" ");
                            html! {
                                <tr key={ip.id.clone()}>
                                    <td><code>{ip.ip_address.clone()}</code></td>
                                    <td>{location}</td>
                                    <td>{ip.total_requests.to_string()}</td>
                                    <td>{format_timestamp(&ip.first_seen)}</td>
                                    <td>{format_timestamp(&ip.last_seen)}</td>
                                    <td>
                                        <button
                                            class={classes!("btn", "btn-small", if ip.is_blacklisted { "btn-secondary" } else { "btn-danger" })}
                                            disabled={action.is_busy()}
                                            onclick={ontoggle}
                                        >
                                            {if ip.is_blacklisted { t("alarm.unblock", "解除拉黑") } else { t("alarm.block", "加入黑名单") }}
                                        </button>
                                    </td>
                                </tr>
                            }
                        })}
                    </tbody>
                </table>
            }
        }),
    };

    html! {
        <div class="container">
            <h1 class="page-title">{t("alarm.title", "告警管理")}</h1>
            {tabs}
            {action.error().map_or_else(Html::default, |message| html! {
                <div class="form-error" role="alert">{message.to_string()}</div>
            })}
            <PageStatus state={poll.state()} loading_label={t("common.loading", "加载中...")}>
                {summary}
                <Card title={t(active.label_key(), active.default_label())}>
                    {body}
                </Card>
            </PageStatus>
        </div>
    }
}
