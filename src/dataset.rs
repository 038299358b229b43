use crate::models::{RawTitle, TitleRecord, TitleType};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use std::path::Path;
use tracing::{info, warn};

/// Sentinel substituted for missing director/country values.
pub const UNKNOWN: &str = "Unknown";

const DATE_ADDED_FORMAT: &str = "%B %d, %Y";

/// Read the raw catalog CSV. A missing or unreadable file is fatal; rows the
/// reader cannot decode are skipped with a warning.
pub fn read_raw(path: impl AsRef<Path>) -> Result<Vec<RawTitle>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open catalog file {}", path.display()))?;

    let mut rows = Vec::new();
    for (index, row) in reader.deserialize::<RawTitle>().enumerate() {
        match row {
            Ok(raw) => rows.push(raw),
            Err(e) => warn!("Skipping undecodable row {}: {}", index + 1, e),
        }
    }
    Ok(rows)
}

/// Load and clean the catalog: parse dates, fill missing director/country
/// with the sentinel, drop rows without a duration or rating, and derive the
/// secondary fields.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<TitleRecord>> {
    let path = path.as_ref();
    let rows = read_raw(path)?;
    let total = rows.len();

    let records: Vec<TitleRecord> = rows.into_iter().filter_map(clean_row).collect();
    info!(
        "Loaded {} titles from {} ({} rows dropped during cleaning)",
        records.len(),
        path.display(),
        total - records.len()
    );
    Ok(records)
}

/// Clean one raw row. Returns `None` when the row is unusable: no
/// recognizable type, no title, or a missing duration/rating.
pub fn clean_row(raw: RawTitle) -> Option<TitleRecord> {
    let title_type = TitleType::parse(raw.title_type.as_deref()?)?;
    let title = non_blank(raw.title)?;
    let rating = non_blank(raw.rating)?;
    let duration = non_blank(raw.duration)?;

    let date_added = raw.date_added.as_deref().and_then(parse_date_added);
    let director = non_blank(raw.director).unwrap_or_else(|| UNKNOWN.to_string());
    let country = non_blank(raw.country).unwrap_or_else(|| UNKNOWN.to_string());

    let duration_minutes = match title_type {
        TitleType::Movie if duration.contains("min") => leading_integer(&duration),
        _ => None,
    };
    let duration_seasons = match title_type {
        TitleType::TvShow if duration.contains("Season") => leading_integer(&duration),
        _ => None,
    };

    Some(TitleRecord {
        title_type,
        title,
        director,
        country,
        added_year: date_added.map(|d| d.year()),
        added_month: date_added.map(|d| d.month()),
        date_added,
        release_year: raw.release_year,
        rating,
        duration,
        duration_minutes,
        duration_seasons,
        genres: split_genres(raw.listed_in.as_deref()),
    })
}

/// Parse a `date_added` value like "September 9, 2019". Unparseable input
/// degrades to `None` rather than failing the load.
pub fn parse_date_added(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_ADDED_FORMAT).ok()
}

/// Split a `listed_in` value on commas into trimmed genre names.
pub fn split_genres(listed_in: Option<&str>) -> Vec<String> {
    listed_in
        .map(|raw| {
            raw.split(',')
                .map(|genre| genre.trim().to_string())
                .filter(|genre| !genre.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Per-column missing-value counts over the raw rows, in schema order.
pub fn missing_value_report(rows: &[RawTitle]) -> Vec<(&'static str, usize)> {
    fn gaps(rows: &[RawTitle], pick: impl Fn(&RawTitle) -> bool) -> usize {
        rows.iter().filter(|r| pick(r)).count()
    }

    vec![
        ("type", gaps(rows, |r| r.title_type.is_none())),
        ("title", gaps(rows, |r| r.title.is_none())),
        ("director", gaps(rows, |r| r.director.is_none())),
        ("cast", gaps(rows, |r| r.cast.is_none())),
        ("country", gaps(rows, |r| r.country.is_none())),
        ("date_added", gaps(rows, |r| r.date_added.is_none())),
        ("release_year", gaps(rows, |r| r.release_year.is_none())),
        ("rating", gaps(rows, |r| r.rating.is_none())),
        ("duration", gaps(rows, |r| r.duration.is_none())),
        ("listed_in", gaps(rows, |r| r.listed_in.is_none())),
    ]
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn leading_integer(duration: &str) -> Option<u32> {
    duration.split_whitespace().next()?.parse().ok()
}
