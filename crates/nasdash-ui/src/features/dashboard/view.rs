//! Dashboard page.

use crate::app::api::use_api;
use crate::app::poll::use_poll;
use crate::components::card::{Card, Stat};
use crate::components::chart::BarChart;
use crate::components::status::PageStatus;
use crate::core::format::{format_gb, format_mb, format_percent};
use crate::features::dashboard::state::{
    DashboardResources, FAILURE_MESSAGE, core_series, memory_series, traffic_series,
};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use yew::prelude::*;

#[function_component(DashboardPage)]
pub(crate) fn dashboard_page() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str, default: &str| bundle.text(key, default);
    let api = use_api();
    let resources = use_memo(|_| DashboardResources::new(&api.backend()), ());
    let poll = {
        let resources = resources.clone();
        let message = t("dashboard.error", FAILURE_MESSAGE);
        use_poll(bundle.locale, move |_| resources.group(&message))
    };

    let dash = "-".to_string();
    let status = resources.status.current();
    let cpu = resources.cpu.current();
    let memory = resources.memory.current();
    let traffic = resources.traffic.current();

    html! {
        <div class="container">
            <h1 class="page-title">{t("dashboard.title", "系统概览")}</h1>
            <PageStatus state={poll.state()} loading_label={t("common.loading", "加载中...")}>
                <div class="dashboard-grid">
                    <Card title={t("dashboard.status", "系统状态")}>
                        <Stat label={t("dashboard.hostname", "主机名")} value={status.as_ref().map_or_else(|| dash.clone(), |s| s.hostname.clone())} />
                        <Stat label={t("dashboard.os", "操作系统")} value={status.as_ref().map_or_else(|| dash.clone(), |s| format!("{} {}", s.os, s.os_version))} />
                        <Stat label={t("dashboard.architecture", "架构")} value={status.as_ref().map_or_else(|| dash.clone(), |s| s.architecture.clone())} />
                        <Stat label={t("dashboard.boot_time", "启动时间")} value={status.as_ref().map_or_else(|| dash.clone(), |s| s.boot_time.clone())} />
                        <Stat label={t("dashboard.uptime", "运行时间")} value={status.as_ref().map_or_else(|| dash.clone(), |s| s.uptime.clone())} />
                    </Card>
                    <Card title={t("dashboard.cpu", "CPU 使用情况")}>
                        <Stat label={t("dashboard.total_usage", "总使用率")} value={cpu.as_ref().map_or_else(|| dash.clone(), |c| format_percent(c.total_usage))} />
                        <Stat label={t("dashboard.physical_cores", "物理核心")} value={cpu.as_ref().and_then(|c| c.cpu_count.physical).map_or_else(|| dash.clone(), |n| n.to_string())} />
                        <Stat label={t("dashboard.logical_cores", "逻辑核心")} value={cpu.as_ref().and_then(|c| c.cpu_count.logical).map_or_else(|| dash.clone(), |n| n.to_string())} />
                        {cpu.as_ref().map_or_else(Html::default, |c| html! {
                            <BarChart points={core_series(c, &t("dashboard.core", "核心"))} unit="%" max={Some(100.0)} />
                        })}
                    </Card>
                    <Card title={t("dashboard.memory", "内存使用情况")}>
                        <Stat label={t("dashboard.memory_percent", "内存使用率")} value={memory.as_ref().map_or_else(|| dash.clone(), |m| format_percent(m.memory.percent))} />
                        <Stat label={t("dashboard.memory_used", "已用内存")} value={memory.as_ref().map_or_else(|| dash.clone(), |m| format_gb(m.memory.used))} />
                        <Stat label={t("dashboard.memory_available", "可用内存")} value={memory.as_ref().map_or_else(|| dash.clone(), |m| format_gb(m.memory.available))} />
                        <Stat label={t("dashboard.memory_total", "内存总量")} value={memory.as_ref().map_or_else(|| dash.clone(), |m| format_gb(m.memory.total))} />
                        <Stat label={t("dashboard.swap_percent", "Swap 使用率")} value={memory.as_ref().map_or_else(|| dash.clone(), |m| format_percent(m.swap.percent))} />
                        {memory.as_ref().map_or_else(Html::default, |m| html! {
                            <BarChart points={memory_series(m, &t("dashboard.memory_used", "已用内存"), &t("dashboard.memory_available", "可用内存"))} unit=" MB" />
                        })}
                    </Card>
                    <Card title={t("dashboard.traffic", "网络流量")}>
                        <Stat label={t("dashboard.bytes_sent", "发送字节数")} value={traffic.as_ref().map_or_else(|| dash.clone(), |n| format_mb(n.bytes_sent))} />
                        <Stat label={t("dashboard.bytes_recv", "接收字节数")} value={traffic.as_ref().map_or_else(|| dash.clone(), |n| format_mb(n.bytes_recv))} />
                        <Stat label={t("dashboard.packets_sent", "发送数据包")} value={traffic.as_ref().map_or_else(|| dash.clone(), |n| n.packets_sent.to_string())} />
                        <Stat label={t("dashboard.packets_recv", "接收数据包")} value={traffic.as_ref().map_or_else(|| dash.clone(), |n| n.packets_recv.to_string())} />
                        {traffic.as_ref().and_then(|n| n.wifi_name.clone()).map_or_else(Html::default, |ssid| html! {
                            <Stat label={t("dashboard.wifi", "WiFi")} value={ssid} />
                        })}
                        {traffic.as_ref().map_or_else(Html::default, |n| html! {
                            <BarChart points={traffic_series(n, &t("dashboard.sent", "发送"), &t("dashboard.received", "接收"))} unit=" MB" />
                        })}
                    </Card>
                </div>
            </PageStatus>
        </div>
    }
}
