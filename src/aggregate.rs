use crate::dataset::UNKNOWN;
use crate::models::{TitleRecord, TitleType};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Ranking depth used by every top-N view.
pub const TOP_N: usize = 10;

/// Frequency table sorted by descending count. The sort is stable over
/// first-seen insertion order, so equal counts keep the order in which their
/// values first appeared; callers must not depend on tie order beyond that.
pub fn value_counts<I>(values: I) -> Vec<(String, u64)>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut counts: Vec<(String, u64)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for value in values {
        let value = value.as_ref();
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.to_string(), counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn top_n(mut counts: Vec<(String, u64)>, n: usize) -> Vec<(String, u64)> {
    counts.truncate(n);
    counts
}

pub fn type_counts<'a>(records: impl IntoIterator<Item = &'a TitleRecord>) -> Vec<(String, u64)> {
    value_counts(records.into_iter().map(|r| r.title_type.label()))
}

pub fn rating_counts<'a>(records: impl IntoIterator<Item = &'a TitleRecord>) -> Vec<(String, u64)> {
    value_counts(records.into_iter().map(|r| r.rating.as_str()))
}

pub fn country_counts<'a>(records: impl IntoIterator<Item = &'a TitleRecord>) -> Vec<(String, u64)> {
    value_counts(records.into_iter().map(|r| r.country.as_str()))
}

/// Director frequencies with the "Unknown" sentinel excluded from the ranking.
pub fn director_counts<'a>(
    records: impl IntoIterator<Item = &'a TitleRecord>,
) -> Vec<(String, u64)> {
    value_counts(
        records
            .into_iter()
            .map(|r| r.director.as_str())
            .filter(|d| *d != UNKNOWN),
    )
}

/// Flattened genre frequencies: each record contributes one count per genre
/// it lists.
pub fn genre_counts<'a>(records: impl IntoIterator<Item = &'a TitleRecord>) -> Vec<(String, u64)> {
    value_counts(records.into_iter().flat_map(|r| r.genres.iter()))
}

/// Titles added per year, ascending by year. Records without a parsed
/// `date_added` are excluded.
pub fn titles_per_year(records: &[TitleRecord]) -> Vec<(i32, u64)> {
    let mut by_year: BTreeMap<i32, u64> = BTreeMap::new();
    for year in records.iter().filter_map(|r| r.added_year) {
        *by_year.entry(year).or_default() += 1;
    }
    by_year.into_iter().collect()
}

/// Titles added per calendar month (1-12), ascending by month.
pub fn titles_per_month(records: &[TitleRecord]) -> Vec<(u32, u64)> {
    let mut by_month: BTreeMap<u32, u64> = BTreeMap::new();
    for month in records.iter().filter_map(|r| r.added_month) {
        *by_month.entry(month).or_default() += 1;
    }
    by_month.into_iter().collect()
}

/// Country x type cross-tabulation restricted to the ten most frequent
/// countries. Each cell is the exact count of records matching both filters.
#[derive(Debug, Clone)]
pub struct CountryTypeMatrix {
    pub countries: Vec<String>,
    pub movies: Vec<u64>,
    pub tv_shows: Vec<u64>,
}

pub fn country_type_matrix(records: &[TitleRecord]) -> CountryTypeMatrix {
    let top_countries = top_n(country_counts(records), TOP_N);

    let mut movies = Vec::with_capacity(top_countries.len());
    let mut tv_shows = Vec::with_capacity(top_countries.len());
    for (country, _) in &top_countries {
        let cell = |title_type: TitleType| {
            records
                .iter()
                .filter(|r| r.country == *country && r.title_type == title_type)
                .count() as u64
        };
        movies.push(cell(TitleType::Movie));
        tv_shows.push(cell(TitleType::TvShow));
    }

    CountryTypeMatrix {
        countries: top_countries.into_iter().map(|(c, _)| c).collect(),
        movies,
        tv_shows,
    }
}

/// Derived minute counts of Movie records, in record order.
pub fn movie_durations(records: &[TitleRecord]) -> Vec<u32> {
    records
        .iter()
        .filter(|r| r.title_type == TitleType::Movie)
        .filter_map(|r| r.duration_minutes)
        .collect()
}

pub fn by_type(records: &[TitleRecord], title_type: TitleType) -> Vec<&TitleRecord> {
    records
        .iter()
        .filter(|r| r.title_type == title_type)
        .collect()
}

pub fn by_type_and_year(
    records: &[TitleRecord],
    title_type: TitleType,
    year: i32,
) -> Vec<&TitleRecord> {
    records
        .iter()
        .filter(|r| r.title_type == title_type && r.added_year == Some(year))
        .collect()
}

/// Latest `added_year` present in the data; drives the dashboard's initial
/// year selection.
pub fn max_added_year(records: &[TitleRecord]) -> Option<i32> {
    records.iter().filter_map(|r| r.added_year).max()
}

pub fn added_years(records: &[TitleRecord]) -> Vec<i32> {
    let mut years: Vec<i32> = records.iter().filter_map(|r| r.added_year).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Headline numbers for the dashboard summary cards.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub movies: u64,
    pub tv_shows: u64,
    pub top_genre: Option<String>,
    pub avg_movie_minutes: Option<u64>,
}

pub fn summarize(records: &[TitleRecord]) -> CatalogSummary {
    let movies = records
        .iter()
        .filter(|r| r.title_type == TitleType::Movie)
        .count() as u64;
    let tv_shows = records.len() as u64 - movies;

    let top_genre = genre_counts(records).into_iter().next().map(|(g, _)| g);

    let durations = movie_durations(records);
    let avg_movie_minutes = if durations.is_empty() {
        None
    } else {
        Some(durations.iter().map(|&m| m as u64).sum::<u64>() / durations.len() as u64)
    };

    CatalogSummary {
        movies,
        tv_shows,
        top_genre,
        avg_movie_minutes,
    }
}
