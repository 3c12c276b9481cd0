//! Network page.

use crate::app::api::use_api;
use crate::app::poll::use_poll;
use crate::components::card::{Card, Stat};
use crate::components::chart::BarChart;
use crate::components::status::PageStatus;
use crate::core::format::format_mb;
use crate::features::network::state::{
    FAILURE_MESSAGE, NetworkResources, link_speed, packet_series, primary_address,
    sorted_interfaces,
};
use crate::i18n::{DEFAULT_LOCALE, TranslationBundle};
use yew::prelude::*;

#[function_component(NetworkPage)]
pub(crate) fn network_page() -> Html {
    let bundle = use_context::<TranslationBundle>()
        .unwrap_or_else(|| TranslationBundle::new(DEFAULT_LOCALE));
    let t = |key: &str, default: &str| bundle.text(key, default);
    let api = use_api();
    let resources = use_memo(|_| NetworkResources::new(&api.backend()), ());
    let poll = {
        let resources = resources.clone();
        let message = t("network.error", FAILURE_MESSAGE);
        use_poll(bundle.locale, move |_| resources.group(&message))
    };

    let traffic_card = resources.traffic.current().map_or_else(Html::default, |traffic| {
        let labels = [
            t("dashboard.packets_sent", "发送数据包"),
            t("dashboard.packets_recv", "接收数据包"),
            t("network.errin", "错误输入"),
            t("network.errout", "错误输出"),
            t("network.dropin", "丢弃输入"),
            t("network.dropout", "丢弃输出"),
        ];
        let label_refs = [
            labels[0].as_str(),
            labels[1].as_str(),
            labels[2].as_str(),
            labels[3].as_str(),
            labels[4].as_str(),
            labels[5].as_str(),
        ];
        html! {
            <Card title={t("network.traffic", "网络流量统计")}>
                <Stat label={t("dashboard.bytes_sent", "发送字节数")} value={format_mb(traffic.bytes_sent)} />
                <Stat label={t("dashboard.bytes_recv", "接收字节数")} value={format_mb(traffic.bytes_recv)} />
                <BarChart points={packet_series(&traffic, label_refs)} />
            </Card>
        }
    });

    let up = t("network.up", "启用");
    let down = t("network.down", "禁用");
    let interfaces_card = resources.interfaces.current().map_or_else(Html::default, |interfaces| html! {
        <Card title={t("network.interfaces", "网络接口信息")}>
            <table class="interface-table">
                <thead>
                    <tr>
                        <th>{t("network.name", "接口名称")}</th>
                        <th>{t("network.mac", "MAC 地址")}</th>
                        <th>{t("network.state", "状态")}</th>
                        <th>{t("network.speed", "速度")}</th>
                        <th>{"MTU"}</th>
                        <th>{t("network.addresses", "IP 地址")}</th>
                    </tr>
                </thead>
                <tbody>
                    {for sorted_interfaces(&interfaces).into_iter().map(|iface| html! {
                        <tr key={iface.name.clone()}>
                            <td>{iface.name.clone()}</td>
                            <td>{iface.mac_address.clone().unwrap_or_else(|| "-".to_string())}</td>
                            <td>
                                <span class={classes!("status-badge", if iface.is_up { "enabled" } else { "disabled" })}>
                                    {if iface.is_up { up.clone() } else { down.clone() }}
                                </span>
                            </td>
                            <td>{link_speed(&iface)}</td>
                            <td>{iface.mtu.to_string()}</td>
                            <td title={iface.ip_addresses.iter().map(|addr| addr.ip.clone()).collect::<Vec<_>>().join(", ")}>
                                {primary_address(&iface).unwrap_or("-").to_string()}
                            </td>
                        </tr>
                    })}
                </tbody>
            </table>
        </Card>
    });

    html! {
        <div class="container">
            <h1 class="page-title">{t("network.title", "网络监控")}</h1>
            <PageStatus state={poll.state()} loading_label={t("common.loading", "加载中...")}>
                {traffic_card}
                {interfaces_card}
            </PageStatus>
        </div>
    }
}
