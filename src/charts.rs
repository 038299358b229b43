use serde::Serialize;
use serde_json::{json, Value};

/// Bin count for the movie-duration histogram.
pub const HISTOGRAM_BINS: usize = 30;

const ACCENT: &str = "#7d3cff";
const ACCENT_ALT: &str = "#f2d53c";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    HorizontalBar,
    Histogram,
    Doughnut,
}

/// Labels and values for a single-series chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl ChartData {
    pub fn from_counts(title: impl Into<String>, counts: &[(String, u64)]) -> Self {
        Self {
            title: title.into(),
            labels: counts.iter().map(|(label, _)| label.clone()).collect(),
            values: counts.iter().map(|(_, count)| *count).collect(),
        }
    }

    /// Build from a numeric-keyed series such as per-year or per-month counts.
    pub fn from_series<K: ToString>(title: impl Into<String>, series: &[(K, u64)]) -> Self {
        Self {
            title: title.into(),
            labels: series.iter().map(|(key, _)| key.to_string()).collect(),
            values: series.iter().map(|(_, count)| *count).collect(),
        }
    }
}

/// Labels plus two named series, for the country x type grouped bar chart.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedChartData {
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<u64>,
}

/// Equal-width integer binning of `values` into `bins` buckets, labelled
/// "lo-hi". Empty input yields an empty chart.
pub fn histogram(title: impl Into<String>, values: &[u32], bins: usize) -> ChartData {
    let title = title.into();
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return ChartData {
            title,
            labels: Vec::new(),
            values: Vec::new(),
        };
    };

    let span = (max - min + 1) as usize;
    let width = span.div_ceil(bins.max(1)).max(1);
    let bin_count = span.div_ceil(width);

    let mut counts = vec![0u64; bin_count];
    for &value in values {
        counts[(value - min) as usize / width] += 1;
    }

    let labels = (0..bin_count)
        .map(|i| {
            let lo = min as usize + i * width;
            let hi = lo + width - 1;
            format!("{}-{}", lo, hi)
        })
        .collect();

    ChartData {
        title,
        labels,
        values: counts,
    }
}

/// Chart.js config for a single-series chart. Consumed verbatim by the
/// report template and the dashboard page.
pub fn chart_config(kind: ChartKind, data: &ChartData) -> Value {
    let chart_type = match kind {
        ChartKind::Line => "line",
        ChartKind::Doughnut => "doughnut",
        _ => "bar",
    };

    let mut dataset = json!({
        "label": data.title,
        "data": data.values,
        "backgroundColor": ACCENT,
    });
    match kind {
        ChartKind::Line => {
            dataset["borderColor"] = json!(ACCENT);
            dataset["fill"] = json!(false);
            dataset["tension"] = json!(0.1);
        }
        ChartKind::Histogram => {
            dataset["categoryPercentage"] = json!(1.0);
            dataset["barPercentage"] = json!(1.0);
        }
        ChartKind::Doughnut => {
            dataset["backgroundColor"] = json!([ACCENT, ACCENT_ALT]);
        }
        _ => {}
    }

    let show_legend = kind == ChartKind::Doughnut;
    let mut options = json!({
        "plugins": {
            "title": { "display": true, "text": data.title },
            "legend": { "display": show_legend },
        },
    });
    if kind == ChartKind::HorizontalBar {
        options["indexAxis"] = json!("y");
    }

    json!({
        "type": chart_type,
        "data": {
            "labels": data.labels,
            "datasets": [dataset],
        },
        "options": options,
    })
}

/// Chart.js config for a grouped bar chart (one dataset per series).
pub fn grouped_chart_config(data: &GroupedChartData) -> Value {
    let palette = [ACCENT, ACCENT_ALT];
    let datasets: Vec<Value> = data
        .series
        .iter()
        .enumerate()
        .map(|(i, series)| {
            json!({
                "label": series.name,
                "data": series.values,
                "backgroundColor": palette[i % palette.len()],
            })
        })
        .collect();

    json!({
        "type": "bar",
        "data": {
            "labels": data.labels,
            "datasets": datasets,
        },
        "options": {
            "plugins": {
                "title": { "display": true, "text": data.title },
                "legend": { "display": true },
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_bins_cover_all_values() {
        let values: Vec<u32> = (60..=180).collect();
        let chart = histogram("Durations", &values, HISTOGRAM_BINS);
        assert_eq!(chart.values.iter().sum::<u64>(), values.len() as u64);
        assert_eq!(chart.labels.len(), chart.values.len());
        assert!(chart.labels.len() <= HISTOGRAM_BINS + 1);
    }

    #[test]
    fn histogram_of_nothing_is_empty() {
        let chart = histogram("Durations", &[], HISTOGRAM_BINS);
        assert!(chart.labels.is_empty());
        assert!(chart.values.is_empty());
    }

    #[test]
    fn histogram_single_value_gets_one_bin() {
        let chart = histogram("Durations", &[90, 90, 90], HISTOGRAM_BINS);
        assert_eq!(chart.labels, vec!["90-90".to_string()]);
        assert_eq!(chart.values, vec![3]);
    }

    #[test]
    fn horizontal_bar_flips_the_index_axis() {
        let data = ChartData::from_counts(
            "Top Directors",
            &[("Someone".to_string(), 5), ("Else".to_string(), 3)],
        );
        let config = chart_config(ChartKind::HorizontalBar, &data);
        assert_eq!(config["type"], "bar");
        assert_eq!(config["options"]["indexAxis"], "y");
    }

    #[test]
    fn line_config_carries_labels_and_values() {
        let data = ChartData::from_series("Per Year", &[(2019, 5u64), (2020, 7u64)]);
        let config = chart_config(ChartKind::Line, &data);
        assert_eq!(config["type"], "line");
        assert_eq!(config["data"]["labels"][0], "2019");
        assert_eq!(config["data"]["datasets"][0]["data"][1], 7);
    }
}
