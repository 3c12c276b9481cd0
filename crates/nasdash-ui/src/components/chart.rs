//! Proportional bar chart fed by [`ChartPoint`] series.

use crate::core::format::ChartPoint;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct BarChartProps {
    pub points: Vec<ChartPoint>,
    /// Suffix appended to each value.
    #[prop_or_default]
    pub unit: String,
    /// Full-scale value; defaults to the largest point.
    #[prop_or_default]
    pub max: Option<f64>,
}

#[function_component(BarChart)]
pub(crate) fn bar_chart(props: &BarChartProps) -> Html {
    let max = props
        .max
        .unwrap_or_else(|| props.points.iter().map(|point| point.value).fold(0.0, f64::max));
    html! {
        <div class="bar-chart">
            {for props.points.iter().map(|point| {
                let width = if max > 0.0 { (point.value / max * 100.0).clamp(0.0, 100.0) } else { 0.0 };
                html! {
                    <div class="bar-row">
                        <span class="bar-label">{point.label.clone()}</span>
                        <div class="bar-track">
                            <div class="bar-fill" style={format!("width: {width:.1}%")}></div>
                        </div>
                        <span class="bar-value">{format!("{}{}", point.value, props.unit)}</span>
                    </div>
                }
            })}
        </div>
    }
}
