use crate::aggregate::{
    self, country_type_matrix, director_counts, genre_counts, movie_durations, rating_counts,
    titles_per_month, titles_per_year, top_n, type_counts, TOP_N,
};
use crate::charts::{
    chart_config, grouped_chart_config, histogram, ChartData, ChartKind, ChartSeries,
    GroupedChartData, HISTOGRAM_BINS,
};
use crate::models::TitleRecord;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

pub const REPORT_FILE: &str = "catalog_report.html";

/// One rendered panel of the batch report.
pub struct ReportChart {
    pub id: &'static str,
    pub config: Value,
}

/// The fixed nine-chart sequence of the batch report, in render order.
pub fn build_report_charts(records: &[TitleRecord]) -> Vec<ReportChart> {
    let country_counts = aggregate::country_counts(records);
    let matrix = country_type_matrix(records);

    let charts = [
        (
            "per-year",
            chart_config(
                ChartKind::Line,
                &ChartData::from_series("Titles Added per Year", &titles_per_year(records)),
            ),
        ),
        (
            "type-distribution",
            chart_config(
                ChartKind::Bar,
                &ChartData::from_counts("Movies vs TV Shows", &type_counts(records)),
            ),
        ),
        (
            "top-countries",
            chart_config(
                ChartKind::Bar,
                &ChartData::from_counts(
                    "Top 10 Countries by Titles",
                    &top_n(country_counts, TOP_N),
                ),
            ),
        ),
        (
            "top-genres",
            chart_config(
                ChartKind::Bar,
                &ChartData::from_counts(
                    "Top 10 Most Common Genres",
                    &top_n(genre_counts(records), TOP_N),
                ),
            ),
        ),
        (
            "top-ratings",
            chart_config(
                ChartKind::Bar,
                &ChartData::from_counts(
                    "Top 10 Content Ratings",
                    &top_n(rating_counts(records), TOP_N),
                ),
            ),
        ),
        (
            "movie-durations",
            chart_config(
                ChartKind::Histogram,
                &histogram(
                    "Movie Duration Distribution (minutes)",
                    &movie_durations(records),
                    HISTOGRAM_BINS,
                ),
            ),
        ),
        (
            "top-directors",
            chart_config(
                ChartKind::HorizontalBar,
                &ChartData::from_counts(
                    "Top 10 Directors",
                    &top_n(director_counts(records), TOP_N),
                ),
            ),
        ),
        (
            "per-month",
            chart_config(
                ChartKind::Line,
                &ChartData::from_series("Titles Added by Month", &titles_per_month(records)),
            ),
        ),
        (
            "country-by-type",
            grouped_chart_config(&GroupedChartData {
                title: "Movie vs TV Show by Country (Top 10)".to_string(),
                labels: matrix.countries,
                series: vec![
                    ChartSeries {
                        name: "Movie".to_string(),
                        values: matrix.movies,
                    },
                    ChartSeries {
                        name: "TV Show".to_string(),
                        values: matrix.tv_shows,
                    },
                ],
            }),
        ),
    ];

    charts
        .into_iter()
        .map(|(id, config)| ReportChart { id, config })
        .collect()
}

/// Render the full report as a self-contained HTML page (Chart.js via CDN).
pub fn render_report(records: &[TitleRecord]) -> String {
    let charts = build_report_charts(records);

    let mut panels = String::new();
    let mut scripts = String::new();
    for chart in &charts {
        panels.push_str(&format!(
            "        <div class=\"chart-card\"><canvas id=\"{}\"></canvas></div>\n",
            chart.id
        ));
        scripts.push_str(&format!(
            "new Chart(document.getElementById('{}'), {});\n",
            chart.id, chart.config
        ));
    }

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Streaming Catalog Report</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            padding: 20px;
            background: #f5f5f5;
            color: #333;
        }}
        h1 {{ text-align: center; }}
        .charts-grid {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(480px, 1fr));
            gap: 20px;
            max-width: 1400px;
            margin: 0 auto;
        }}
        .chart-card {{
            background: #fff;
            border-radius: 8px;
            padding: 16px;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
        }}
    </style>
</head>
<body>
    <h1>Streaming Catalog Report</h1>
    <div class="charts-grid">
{panels}    </div>
    <script>
{scripts}    </script>
</body>
</html>
"##
    )
}

/// Write the report next to the working directory. Any failure is fatal to
/// the batch run.
pub fn write_report(records: &[TitleRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let html = render_report(records);
    fs::write(path, html)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}
