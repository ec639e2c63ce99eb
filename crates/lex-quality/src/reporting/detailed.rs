//! Detailed report section: the full score table plus per-column charts.

use super::{QualityLevel, escape_html};
use crate::config::ReportConfig;
use crate::metrics::Metric;
use crate::scoring::{MetricScores, QualityScores, ScoreMatrix};

const CHART_WIDTH: f64 = 540.0;
const CHART_HEIGHT: f64 = 260.0;
const CHART_PLOT_HEIGHT: f64 = 200.0;
const BAR_WIDTH: f64 = 60.0;
const BAR_GAP: f64 = 30.0;
const BAR_COLOR: &str = "#3498db";

const HEATMAP_CELL_WIDTH: f64 = 80.0;
const HEATMAP_CELL_HEIGHT: f64 = 60.0;
const HEATMAP_HEIGHT: f64 = 100.0;

// coolwarm anchors at 0, 50 and 100
const COOL: [f64; 3] = [59.0, 76.0, 192.0];
const NEUTRAL: [f64; 3] = [221.0, 221.0, 221.0];
const WARM: [f64; 3] = [180.0, 4.0, 38.0];

/// Render the detailed report HTML fragment.
///
/// The fragment holds the overall score, the column × metric table, a
/// quality note, the per-metric averages and a column selector that
/// reveals a bar chart and a heatmap for each column.
pub fn render_detailed_report(scores: &QualityScores, config: &ReportConfig) -> String {
    let mut html = String::new();
    html.push_str("<div class='container'>\n");
    html.push_str(&format!(
        "<div class='overall-score'>Overall Data Quality Score: {:.2}%</div>\n",
        scores.overall_score
    ));

    html.push_str(&score_table(&scores.matrix));

    let level = QualityLevel::from_score(scores.overall_score, config.good_quality_mark);
    let color = match level {
        QualityLevel::Good => "green",
        QualityLevel::NeedsImprovement => "red",
    };
    html.push_str(&format!(
        "<div class='note' style='color: {};'>{}</div>\n",
        color,
        escape_html(&level.note(config.good_quality_mark))
    ));

    html.push_str(&averages_table(&scores.matrix));
    html.push_str(&chart_selector(&scores.matrix));
    html.push_str(SHOW_CHART_SCRIPT);
    html.push_str("</div>\n");
    html
}

fn score_table(matrix: &ScoreMatrix) -> String {
    let mut html = String::from("<table>\n<tr><th>Column</th>");
    for metric in Metric::ALL {
        html.push_str(&format!("<th>{}</th>", metric));
    }
    html.push_str("</tr>\n");

    for row in matrix.rows() {
        html.push_str(&format!("<tr><td>{}</td>", escape_html(&row.column)));
        for value in row.scores.values() {
            html.push_str(&format!("<td>{:.2}%</td>", value));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>\n");
    html
}

fn averages_table(matrix: &ScoreMatrix) -> String {
    let mut html = String::from(
        "<h4>Average Quality Scores</h4>\n<table>\n<tr><th>Metric</th><th>Average Score (%)</th></tr>\n",
    );
    for metric in Metric::ALL {
        let average = matrix.metric_average(metric).unwrap_or(0.0);
        html.push_str(&format!(
            "<tr><td>{}</td><td>{:.2}%</td></tr>\n",
            metric, average
        ));
    }
    html.push_str("</table>\n");
    html
}

fn chart_selector(matrix: &ScoreMatrix) -> String {
    let mut html = String::from(
        "<h4>Select a Column to View Visualizations</h4>\n\
         <select id='column-select' onchange='showChart(this.value)'>\n\
         <option value=''>Select a Column</option>\n",
    );
    for (index, row) in matrix.rows().iter().enumerate() {
        html.push_str(&format!(
            "<option value='{}'>{}</option>\n",
            index,
            escape_html(&row.column)
        ));
    }
    html.push_str("</select>\n");

    html.push_str("<div class='chart-container' id='chart-container' style='display:none;'>\n");
    for (index, row) in matrix.rows().iter().enumerate() {
        html.push_str(&format!(
            "<div id='column-{}-charts' class='chart' style='display:none;'>\n<h3>{}</h3>\n",
            index,
            escape_html(&row.column)
        ));
        html.push_str("<div class='charts-side-by-side' style='display:flex; gap:20px;'>\n");
        html.push_str(&format!(
            "<div><h4>Bar Chart</h4>\n{}</div>\n",
            bar_chart(&row.column, &row.scores)
        ));
        html.push_str(&format!(
            "<div><h4>Heatmap</h4>\n{}</div>\n",
            heatmap(&row.column, &row.scores)
        ));
        html.push_str("</div>\n</div>\n");
    }
    html.push_str("</div>\n");
    html
}

/// Inline SVG bar chart of one column's six scores.
fn bar_chart(column: &str, scores: &MetricScores) -> String {
    let mut svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}' viewBox='0 0 {w} {h}' role='img' aria-label='{label} Bar Chart'>\n",
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        label = escape_html(column)
    );
    svg.push_str(&format!(
        "<line x1='0' y1='{y}' x2='{w}' y2='{y}' stroke='#999'/>\n",
        y = CHART_PLOT_HEIGHT,
        w = CHART_WIDTH
    ));

    for (slot, metric) in Metric::ALL.iter().enumerate() {
        let value = scores.get(*metric).clamp(0.0, 100.0);
        let height = CHART_PLOT_HEIGHT * value / 100.0;
        let x = BAR_GAP / 2.0 + slot as f64 * (BAR_WIDTH + BAR_GAP);
        let y = CHART_PLOT_HEIGHT - height;
        let center = x + BAR_WIDTH / 2.0;

        svg.push_str(&format!(
            "<rect x='{:.1}' y='{:.1}' width='{:.1}' height='{:.1}' fill='{}'><title>{}: {:.2}%</title></rect>\n",
            x, y, BAR_WIDTH, height, BAR_COLOR, metric, value
        ));
        svg.push_str(&format!(
            "<text x='{:.1}' y='{:.1}' font-size='11' text-anchor='middle'>{:.1}</text>\n",
            center,
            (y - 4.0).max(10.0),
            value
        ));
        svg.push_str(&format!(
            "<text x='{:.1}' y='{:.1}' font-size='11' text-anchor='middle'>{}</text>\n",
            center,
            CHART_PLOT_HEIGHT + 18.0,
            metric
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Inline SVG one-row heatmap of one column's six scores.
///
/// Each cell is coloured on a coolwarm scale and annotated with its score.
fn heatmap(column: &str, scores: &MetricScores) -> String {
    let width = HEATMAP_CELL_WIDTH * Metric::ALL.len() as f64;
    let mut svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}' viewBox='0 0 {w} {h}' role='img' aria-label='{label} Heatmap'>\n",
        w = width,
        h = HEATMAP_HEIGHT,
        label = escape_html(column)
    );

    for (slot, metric) in Metric::ALL.iter().enumerate() {
        let value = scores.get(*metric);
        let x = slot as f64 * HEATMAP_CELL_WIDTH;
        let center = x + HEATMAP_CELL_WIDTH / 2.0;

        svg.push_str(&format!(
            "<rect x='{:.1}' y='0' width='{:.1}' height='{:.1}' fill='{}' stroke='#fff'><title>{}: {:.2}%</title></rect>\n",
            x,
            HEATMAP_CELL_WIDTH,
            HEATMAP_CELL_HEIGHT,
            coolwarm(value),
            metric,
            value
        ));
        svg.push_str(&format!(
            "<text x='{:.1}' y='{:.1}' font-size='12' text-anchor='middle'>{:.2}</text>\n",
            center,
            HEATMAP_CELL_HEIGHT / 2.0 + 4.0,
            value
        ));
        svg.push_str(&format!(
            "<text x='{:.1}' y='{:.1}' font-size='11' text-anchor='middle'>{}</text>\n",
            center,
            HEATMAP_CELL_HEIGHT + 18.0,
            metric
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Hex colour of a score on a blue-grey-red scale over `[0, 100]`.
fn coolwarm(value: f64) -> String {
    let t = value.clamp(0.0, 100.0) / 100.0;
    let (from, to, f) = if t <= 0.5 {
        (COOL, NEUTRAL, t * 2.0)
    } else {
        (NEUTRAL, WARM, (t - 0.5) * 2.0)
    };
    let channel = |i: usize| (from[i] + (to[i] - from[i]) * f).round() as u8;
    format!("#{:02x}{:02x}{:02x}", channel(0), channel(1), channel(2))
}

const SHOW_CHART_SCRIPT: &str = r#"<script>
function showChart(index) {
    document.querySelectorAll("[id$='-charts']").forEach(chart => chart.style.display = 'none');
    const container = document.getElementById('chart-container');
    if (index === '') {
        container.style.display = 'none';
        return;
    }
    container.style.display = 'block';
    document.getElementById(`column-${index}-charts`).style.display = 'block';
}
</script>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::ColumnScores;
    use chrono::NaiveDate;

    fn scores(overall: f64) -> QualityScores {
        let full = MetricScores {
            completeness: 100.0,
            timeliness: 100.0,
            validity: 100.0,
            accuracy: 100.0,
            uniqueness: 100.0,
            consistency: 100.0,
        };
        let partial = MetricScores {
            completeness: 50.0,
            ..full
        };
        QualityScores {
            matrix: ScoreMatrix::new(vec![
                ColumnScores {
                    column: "id".to_string(),
                    scores: full,
                },
                ColumnScores {
                    column: "<email>".to_string(),
                    scores: partial,
                },
            ]),
            overall_score: overall,
            reference_time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn test_overall_score_two_decimals() {
        let html = render_detailed_report(&scores(95.833333), &ReportConfig::default());
        assert!(html.contains("Overall Data Quality Score: 95.83%"));
        assert!(html.contains("NOTE: The overall data quality is considered good"));
    }

    #[test]
    fn test_low_score_note() {
        let html = render_detailed_report(&scores(42.0), &ReportConfig::default());
        assert!(html.contains("below 80%"));
        assert!(html.contains("color: red;"));
    }

    #[test]
    fn test_table_and_averages() {
        let html = render_detailed_report(&scores(95.0), &ReportConfig::default());
        assert!(html.contains("<th>Completeness</th><th>Timeliness</th>"));
        assert!(html.contains("<td>50.00%</td>"));
        // completeness average of 100 and 50
        assert!(html.contains("<tr><td>Completeness</td><td>75.00%</td></tr>"));
    }

    #[test]
    fn test_column_names_are_escaped() {
        let html = render_detailed_report(&scores(95.0), &ReportConfig::default());
        assert!(html.contains("&lt;email&gt;"));
        assert!(!html.contains("<email>"));
    }

    #[test]
    fn test_bar_chart_and_heatmap_per_column() {
        let html = render_detailed_report(&scores(95.0), &ReportConfig::default());
        assert_eq!(html.matches("<svg").count(), 4);
        assert_eq!(html.matches("class='charts-side-by-side'").count(), 2);
        assert!(html.contains("aria-label='&lt;email&gt; Heatmap'"));
        assert!(html.contains("id='column-1-charts'"));
        assert!(html.contains("function showChart"));
    }

    #[test]
    fn test_heatmap_cells() {
        let scores = MetricScores {
            completeness: 50.0,
            timeliness: 100.0,
            validity: 0.0,
            accuracy: 87.5,
            uniqueness: 100.0,
            consistency: 100.0,
        };
        let svg = heatmap("amount", &scores);

        assert_eq!(svg.matches("<rect").count(), 6);
        assert!(svg.contains(">50.00</text>"));
        assert!(svg.contains(">87.50</text>"));
        assert!(svg.contains(">0.00</text>"));
        assert!(svg.contains("fill='#dddddd'"));
        assert!(svg.contains("fill='#3b4cc0'"));
        assert!(svg.contains("fill='#b40426'"));
    }

    #[test]
    fn test_coolwarm_scale() {
        assert_eq!(coolwarm(0.0), "#3b4cc0");
        assert_eq!(coolwarm(50.0), "#dddddd");
        assert_eq!(coolwarm(100.0), "#b40426");
        // out of range values are clamped
        assert_eq!(coolwarm(150.0), "#b40426");
    }
}
