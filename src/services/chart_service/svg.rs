use crate::models::{BracketStat, ChartKind};
use crate::utils::escape_xml;

pub const CHART_WIDTH: f64 = 1000.0;
pub const CHART_HEIGHT: f64 = 600.0;
pub const NO_DATA_LABEL: &str = "No data available for selected filter";

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 80.0;
const MARGIN_BOTTOM: f64 = 140.0;
const BAR_FILL: f64 = 0.8;
const FONT_FAMILY: &str = "DejaVu Sans, Segoe UI, Arial, sans-serif";

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Text drawn above the bar; empty for brackets without data.
    pub annotation: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub kind: ChartKind,
    pub bars: Vec<Bar>,
}

impl BarChart {
    pub fn from_stats(kind: ChartKind, stats: &[BracketStat]) -> Self {
        let bars = stats
            .iter()
            .map(|stat| match kind {
                ChartKind::PagesVisited => Bar {
                    label: stat.label.clone(),
                    value: stat.pages_visited as f64,
                    annotation: stat.pages_visited.to_string(),
                },
                ChartKind::ConversionRate => Bar {
                    label: stat.label.clone(),
                    value: stat.conversion_rate.unwrap_or(0.0),
                    annotation: stat
                        .conversion_rate
                        .map(|rate| format!("{:.1}%", rate))
                        .unwrap_or_default(),
                },
            })
            .collect();
        Self { kind, bars }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Transparent background, bottom axis only, x labels rotated 45 degrees.
    pub fn to_svg(&self) -> String {
        let plot_width = CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let baseline = MARGIN_TOP + plot_height;

        let mut body = String::new();
        body.push_str(&format!(
            "  <text x='{:.1}' y='40' text-anchor='middle' font-size='22' fill='#222'>{}</text>\n",
            CHART_WIDTH / 2.0,
            escape_xml(self.kind.title())
        ));
        body.push_str(&format!(
            "  <text x='{:.1}' y='{:.1}' text-anchor='middle' font-size='16' fill='#333'>Age Group (5-year ranges)</text>\n",
            MARGIN_LEFT + plot_width / 2.0,
            CHART_HEIGHT - 12.0
        ));
        body.push_str(&format!(
            "  <text x='24' y='{y:.1}' text-anchor='middle' font-size='16' fill='#333' transform='rotate(-90 24 {y:.1})'>{}</text>\n",
            escape_xml(self.kind.y_label()),
            y = MARGIN_TOP + plot_height / 2.0
        ));
        body.push_str(&format!(
            "  <line class='x-axis' x1='{:.1}' y1='{b:.1}' x2='{:.1}' y2='{b:.1}' stroke='#333' stroke-width='1.5'/>\n",
            MARGIN_LEFT,
            MARGIN_LEFT + plot_width,
            b = baseline
        ));

        if self.bars.is_empty() {
            body.push_str(&format!(
                "  <text class='no-data' x='{:.1}' y='{:.1}' text-anchor='middle' font-size='20' fill='#666'>{}</text>\n",
                MARGIN_LEFT + plot_width / 2.0,
                MARGIN_TOP + plot_height / 2.0,
                NO_DATA_LABEL
            ));
            return wrap_svg(&body);
        }

        let max_value = self.bars.iter().map(|bar| bar.value).fold(0.0, f64::max);
        let axis_max = nice_ceiling(max_value);

        for step in 0..=4 {
            let value = axis_max * step as f64 / 4.0;
            let y = baseline - plot_height * step as f64 / 4.0;
            body.push_str(&format!(
                "  <text x='{:.1}' y='{:.1}' text-anchor='end' font-size='13' fill='#666'>{}</text>\n",
                MARGIN_LEFT - 8.0,
                y + 4.0,
                format_tick(value)
            ));
        }

        let slot = plot_width / self.bars.len() as f64;
        let bar_width = slot * BAR_FILL;
        for (i, bar) in self.bars.iter().enumerate() {
            let center = MARGIN_LEFT + slot * (i as f64 + 0.5);
            let height = if axis_max > 0.0 {
                plot_height * bar.value / axis_max
            } else {
                0.0
            };
            body.push_str(&format!(
                "  <rect class='bar' x='{:.1}' y='{:.1}' width='{:.1}' height='{:.1}' fill='{}' stroke='black' stroke-width='1'/>\n",
                center - bar_width / 2.0,
                baseline - height,
                bar_width,
                height,
                self.kind.color()
            ));
            if !bar.annotation.is_empty() {
                body.push_str(&format!(
                    "  <text x='{:.1}' y='{:.1}' text-anchor='middle' font-size='13' fill='#222'>{}</text>\n",
                    center,
                    baseline - height - 6.0,
                    escape_xml(&bar.annotation)
                ));
            }
            let label_y = baseline + 18.0;
            body.push_str(&format!(
                "  <text x='{c:.1}' y='{y:.1}' text-anchor='end' font-size='13' fill='#444' transform='rotate(-45 {c:.1} {y:.1})'>{}</text>\n",
                escape_xml(&bar.label),
                c = center,
                y = label_y
            ));
        }

        wrap_svg(&body)
    }
}

fn wrap_svg(body: &str) -> String {
    format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}' viewBox='0 0 {w} {h}' font-family='{}'>\n{}</svg>\n",
        FONT_FAMILY,
        body,
        w = CHART_WIDTH,
        h = CHART_HEIGHT
    )
}

/// Smallest 1, 2, 2.5 or 5 x 10^n at or above `value`.
fn nice_ceiling(value: f64) -> f64 {
    if value <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(value.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|factor| factor * magnitude)
        .find(|candidate| *candidate >= value)
        .unwrap_or(10.0 * magnitude)
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeBracket, Record};
    use crate::services::analytics_service::bracket_stats;
    use crate::services::analytics_service::fixtures::sample_records;

    fn sample_chart(kind: ChartKind) -> BarChart {
        let records = sample_records();
        let refs: Vec<&Record> = records.iter().collect();
        BarChart::from_stats(kind, &bracket_stats(&refs))
    }

    #[test]
    fn one_bar_per_bracket() {
        let chart = sample_chart(ChartKind::PagesVisited);
        assert_eq!(chart.bars.len(), 8);
        assert_eq!(chart.bars[0].annotation, "7");

        let svg = chart.to_svg();
        assert_eq!(svg.matches("class='bar'").count(), 8);
        assert!(svg.contains("Total pages visited vs Age group"));
        assert!(svg.contains("rotate(-45"));
        assert!(svg.contains(">20-24</text>"));
        assert!(!svg.contains(NO_DATA_LABEL));
    }

    #[test]
    fn conversion_bars_are_percentages() {
        let chart = sample_chart(ChartKind::ConversionRate);
        assert_eq!(chart.bars[0].value, 50.0);
        assert_eq!(chart.bars[0].annotation, "50.0%");
        assert!(chart.to_svg().contains("Conversion Rate (%)"));
    }

    #[test]
    fn empty_bracket_has_no_annotation() {
        let stats = vec![BracketStat {
            bracket: AgeBracket::starting_at(35),
            label: "35-39".to_string(),
            records: 0,
            pages_visited: 0,
            conversion_rate: None,
        }];
        let chart = BarChart::from_stats(ChartKind::ConversionRate, &stats);
        assert_eq!(chart.bars[0].value, 0.0);
        assert!(chart.bars[0].annotation.is_empty());
    }

    #[test]
    fn no_data_placeholder_instead_of_bars() {
        let chart = BarChart::from_stats(ChartKind::PagesVisited, &[]);
        assert!(chart.is_empty());
        let svg = chart.to_svg();
        assert!(svg.contains(NO_DATA_LABEL));
        assert!(!svg.contains("class='bar'"));
    }

    #[test]
    fn nice_axis_ceiling() {
        assert_eq!(nice_ceiling(9.0), 10.0);
        assert_eq!(nice_ceiling(100.0), 100.0);
        assert_eq!(nice_ceiling(130.0), 200.0);
        assert_eq!(nice_ceiling(0.0), 1.0);
    }
}
