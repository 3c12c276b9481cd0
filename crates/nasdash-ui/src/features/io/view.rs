//! I/O page.

use crate::app::api::use_api;
use crate::app::poll::use_poll;
use crate::components::card::{Card, Stat};
use crate::components::chart::BarChart;
use crate::components::status::PageStatus;
use crate::core::format::format_mb;
use crate::features::io::state::{
    FAILURE_MESSAGE, IoResources, average_latency_ms, throughput_series,
};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use yew::prelude::*;

#[function_component(IoPage)]
pub(crate) fn io_page() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str, default: &str| bundle.text(key, default);
    let api = use_api();
    let resources = use_memo(|_| IoResources::new(&api.backend()), ());
    let poll = {
        let resources = resources.clone();
        let message = t("io.error", FAILURE_MESSAGE);
        use_poll(bundle.locale, move |_| resources.group(&message))
    };

    let system_card = resources.system.current().map_or_else(Html::default, |io| html! {
        <Card title={t("io.system", "系统 IO 统计")}>
            <Stat label={t("io.total_read_bytes", "总读取字节")} value={format_mb(io.total_read_bytes)} />
            <Stat label={t("io.total_write_bytes", "总写入字节")} value={format_mb(io.total_write_bytes)} />
            <Stat label={t("io.total_read_count", "总读取次数")} value={io.total_read_count.to_string()} />
            <Stat label={t("io.total_write_count", "总写入次数")} value={io.total_write_count.to_string()} />
            <Stat label={t("io.total_read_time", "总读取时间")} value={format!("{} ms", io.total_read_time)} />
            <Stat label={t("io.total_write_time", "总写入时间")} value={format!("{} ms", io.total_write_time)} />
        </Card>
    });

    let disks_card = resources.disks.current().map_or_else(Html::default, |disks| {
        let (read, write) = throughput_series(&disks);
        html! {
            <>
                <Card title={t("io.overview", "磁盘 IO 概览")}>
                    <h3>{t("io.read_bytes", "读取字节")}</h3>
                    <BarChart points={read} unit=" MB" />
                    <h3>{t("io.write_bytes", "写入字节")}</h3>
                    <BarChart points={write} unit=" MB" />
                </Card>
                <Card title={t("io.details", "磁盘 IO 详细信息")}>
                    {for disks.iter().map(|disk| html! {
                        <div class="disk-io-item" key={disk.disk_name.clone()}>
                            <Stat label={t("io.disk_name", "磁盘名称")} value={disk.disk_name.clone()} />
                            <Stat label={t("io.read_bytes", "读取字节")} value={format_mb(disk.read_bytes)} />
                            <Stat label={t("io.write_bytes", "写入字节")} value={format_mb(disk.write_bytes)} />
                            <Stat label={t("io.read_count", "读取次数")} value={disk.read_count.to_string()} />
                            <Stat label={t("io.write_count", "写入次数")} value={disk.write_count.to_string()} />
                            <Stat label={t("io.read_latency", "平均读取延迟")} value={format!("{} ms", average_latency_ms(disk.read_time, disk.read_count))} />
                            <Stat label={t("io.write_latency", "平均写入延迟")} value={format!("{} ms", average_latency_ms(disk.write_time, disk.write_count))} />
                        </div>
                    })}
                </Card>
            </>
        }
    });

    html! {
        <div class="container">
            <h1 class="page-title">{t("io.title", "IO 监控")}</h1>
            <PageStatus state={poll.state()} loading_label={t("common.loading", "加载中...")}>
                {system_card}
                {disks_card}
            </PageStatus>
        </div>
    }
}
