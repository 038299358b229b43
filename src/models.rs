use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TitleType {
    #[serde(rename = "Movie")]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl TitleType {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "Movie" => Some(Self::Movie),
            "TV Show" => Some(Self::TvShow),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::TvShow => "TV Show",
        }
    }
}

/// One row of the catalog CSV, before cleaning. The `csv` reader maps blank
/// fields to `None`; extra columns in the file are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTitle {
    #[serde(default)]
    pub show_id: Option<String>,
    #[serde(rename = "type")]
    pub title_type: Option<String>,
    pub title: Option<String>,
    pub director: Option<String>,
    #[serde(default)]
    pub cast: Option<String>,
    pub country: Option<String>,
    pub date_added: Option<String>,
    pub release_year: Option<i32>,
    pub rating: Option<String>,
    pub duration: Option<String>,
    pub listed_in: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A cleaned catalog entry. `rating` and `duration` are always present;
/// `director` and `country` fall back to the "Unknown" sentinel. At most one
/// of `duration_minutes` / `duration_seasons` is set, matching the title type.
#[derive(Debug, Clone)]
pub struct TitleRecord {
    pub title_type: TitleType,
    pub title: String,
    pub director: String,
    pub country: String,
    pub date_added: Option<NaiveDate>,
    pub added_year: Option<i32>,
    pub added_month: Option<u32>,
    pub release_year: Option<i32>,
    pub rating: String,
    pub duration: String,
    pub duration_minutes: Option<u32>,
    pub duration_seasons: Option<u32>,
    pub genres: Vec<String>,
}
