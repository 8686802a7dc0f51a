use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A movie as the provider returns it in list and detail responses.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre_ids: Option<Vec<i32>>,
}

impl Movie {
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?.trim();
        if date.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|d| d.year())
            .ok()
            .or_else(|| date.split('-').next().and_then(|y| y.parse().ok()))
    }

    pub fn overview_text(&self) -> &str {
        self.overview.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
pub(crate) fn movie(id: i32, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        poster_path: None,
        backdrop_path: None,
        overview: None,
        vote_average: 0.0,
        vote_count: None,
        release_date: None,
        genre_ids: None,
    }
}
