//! System page.

use crate::app::api::use_api;
use crate::app::poll::use_poll;
use crate::components::card::{Card, Stat};
use crate::components::chart::BarChart;
use crate::components::status::PageStatus;
use crate::core::format::{format_gb, format_percent};
use crate::features::system::state::{FAILURE_MESSAGE, SystemResources, core_counts, disk_series};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use yew::prelude::*;

#[function_component(SystemPage)]
pub(crate) fn system_page() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str, default: &str| bundle.text(key, default);
    let api = use_api();
    let resources = use_memo(|_| SystemResources::new(&api.backend()), ());
    let poll = {
        let resources = resources.clone();
        let message = t("system.error", FAILURE_MESSAGE);
        use_poll(bundle.locale, move |_| resources.group(&message))
    };

    let cpu = resources.cpu.current();
    let memory = resources.memory.current();
    let disks = resources.disks.current();

    let cpu_card = cpu.as_ref().map_or_else(Html::default, |cpu| {
        let (physical, logical) = core_counts(cpu);
        html! {
            <Card title={t("system.cpu", "CPU 详细信息")}>
                <Stat label={t("dashboard.total_usage", "总使用率")} value={format_percent(cpu.total_usage)} />
                <Stat label={t("dashboard.physical_cores", "物理核心")} value={physical} />
                <Stat label={t("dashboard.logical_cores", "逻辑核心")} value={logical} />
            </Card>
        }
    });
    let memory_card = memory.as_ref().map_or_else(Html::default, |memory| html! {
        <Card title={t("system.memory", "内存详细信息")}>
            <Stat label={t("dashboard.memory_total", "内存总量")} value={format_gb(memory.memory.total)} />
            <Stat label={t("dashboard.memory_used", "已用内存")} value={format_gb(memory.memory.used)} />
            <Stat label={t("dashboard.memory_available", "可用内存")} value={format_gb(memory.memory.available)} />
            <Stat label={t("dashboard.memory_percent", "内存使用率")} value={format_percent(memory.memory.percent)} />
            <Stat label={t("system.swap_total", "Swap 总量")} value={format_gb(memory.swap.total)} />
            <Stat label={t("dashboard.swap_percent", "Swap 使用率")} value={format_percent(memory.swap.percent)} />
        </Card>
    });
    let disk_card = disks.as_ref().map_or_else(Html::default, |disks| html! {
        <Card title={t("system.disks", "磁盘使用情况")}>
            <BarChart points={disk_series(disks)} unit="%" max={Some(100.0)} />
            <div class="disk-list">
                {for disks.iter().map(|disk| html! {
                    <div class="disk-item">
                        <div class="metric-label">{disk.mountpoint.clone()}</div>
                        <div class="metric-value">
                            {format!("{} / {}", format_gb(disk.used), format_gb(disk.total))}
                        </div>
                        <small>{format!("{} · {}", disk.device, disk.fstype)}</small>
                    </div>
                })}
            </div>
        </Card>
    });

    html! {
        <div class="container">
            <h1 class="page-title">{t("system.title", "系统信息")}</h1>
            <PageStatus state={poll.state()} loading_label={t("common.loading", "加载中...")}>
                <div class="dashboard-grid">
                    {cpu_card}
                    {memory_card}
                </div>
                {disk_card}
            </PageStatus>
        </div>
    }
}
