use async_trait::async_trait;
use futures_util::future::join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::Movie;

/// The provider lists a page can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Popular,
    Trending,
    TopRated,
    Upcoming,
    Regional,
}

impl Category {
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Popular => "popular",
            Category::Trending => "trending",
            Category::TopRated => "top-rated",
            Category::Upcoming => "upcoming",
            Category::Regional => "korean",
        }
    }

    /// Categories reachable through `/movies/{slug}`. The regional list has its own page.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "popular" => Some(Category::Popular),
            "trending" => Some(Category::Trending),
            "top-rated" => Some(Category::TopRated),
            "upcoming" => Some(Category::Upcoming),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Category::Popular => "Popular Movies",
            Category::Trending => "Trending Now",
            Category::TopRated => "Top Rated",
            Category::Upcoming => "Coming Soon",
            Category::Regional => "Regional Movies",
        }
    }

    pub fn link(&self) -> String {
        match self {
            Category::Regional => "/korean".to_string(),
            other => format!("/movies/{}", other.slug()),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Network,
    BadResponse,
}

impl FetchError {
    pub fn class(&self) -> FailureClass {
        match self {
            FetchError::Transport { .. } => FailureClass::Network,
            FetchError::Status { .. } | FetchError::Decode { .. } => FailureClass::BadResponse,
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            FetchError::Transport { endpoint, .. }
            | FetchError::Status { endpoint, .. }
            | FetchError::Decode { endpoint, .. } => endpoint,
        }
    }

    /// The provider has no such resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. })
    }
}

/// A single movie with the extra fields only the detail endpoint returns.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    pub movie: Movie,
    pub tagline: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub genres: Vec<String>,
    /// YouTube video key of the official trailer, when the provider lists one.
    pub trailer_key: Option<String>,
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_category(&self, category: Category) -> Result<Vec<Movie>, FetchError>;
    async fn fetch_movie(&self, id: i32) -> Result<MovieDetail, FetchError>;
}

/// Everything a page load fetched. Lives as long as the page view that requested it.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    lists: HashMap<Category, Vec<Movie>>,
    detail: Option<MovieDetail>,
}

impl CatalogSnapshot {
    pub fn from_lists<I>(lists: I) -> Self
    where
        I: IntoIterator<Item = (Category, Vec<Movie>)>,
    {
        Self {
            lists: lists.into_iter().collect(),
            detail: None,
        }
    }

    pub fn from_detail(detail: MovieDetail) -> Self {
        Self {
            lists: HashMap::new(),
            detail: Some(detail),
        }
    }

    pub fn list(&self, category: Category) -> &[Movie] {
        self.lists.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn detail(&self) -> Option<&MovieDetail> {
        self.detail.as_ref()
    }
}

/// Fetches every category concurrently and waits for all of them to settle.
///
/// Each failure is logged; the first one in `categories` order becomes the result.
pub async fn fetch_catalog(
    api: &dyn CatalogApi,
    categories: &[Category],
) -> Result<CatalogSnapshot, FetchError> {
    let outcomes = join_all(
        categories
            .iter()
            .map(|&category| async move { (category, api.fetch_category(category).await) }),
    )
    .await;

    let mut lists = HashMap::new();
    let mut first_error = None;
    for (category, outcome) in outcomes {
        match outcome {
            Ok(movies) => {
                debug!(category = category.slug(), count = movies.len(), "Fetched list");
                lists.insert(category, movies);
            }
            Err(e) => {
                warn!("Failed to fetch {} movies: {}", category.slug(), e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(CatalogSnapshot {
            lists,
            detail: None,
        }),
    }
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
    regional_language: String,
    regional_region: Option<String>,
}

impl TmdbClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        use anyhow::Context;

        let user_agent = format!("movieboxx/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            api_key: config.api_key.clone(),
            regional_language: config.regional_language.clone(),
            regional_region: config.regional_region.clone(),
        })
    }

    /// Path and query for a category, without the API key.
    pub fn endpoint(&self, category: Category) -> String {
        match category {
            Category::Popular => "/movie/popular".to_string(),
            Category::Trending => "/trending/movie/week".to_string(),
            Category::TopRated => "/movie/top_rated".to_string(),
            Category::Upcoming => "/movie/upcoming".to_string(),
            Category::Regional => {
                let mut path = format!(
                    "/discover/movie?with_original_language={}&sort_by=popularity.desc",
                    urlencoding::encode(&self.regional_language)
                );
                if let Some(region) = &self.regional_region {
                    path.push_str(&format!("&region={}", urlencoding::encode(region)));
                }
                path
            }
        }
    }

    fn url_for(&self, endpoint: &str) -> String {
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}api_key={}",
            self.base_url,
            endpoint,
            sep,
            urlencoding::encode(&self.api_key)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            endpoint: endpoint.to_string(),
            source: e.without_url(),
        };
        let res = self
            .client
            .get(self.url_for(endpoint))
            .send()
            .await
            .map_err(transport)?;
        let status = res.status();
        let text = res.text().await.map_err(transport)?;
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        serde_json::from_str(&text).map_err(|e| FetchError::Decode {
            endpoint: endpoint.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn fetch_category(&self, category: Category) -> Result<Vec<Movie>, FetchError> {
        let data: ListResponse = self.get_json(&self.endpoint(category)).await?;
        Ok(data.into_movies())
    }

    async fn fetch_movie(&self, id: i32) -> Result<MovieDetail, FetchError> {
        let endpoint = format!("/movie/{id}?append_to_response=videos");
        let data: DetailResponse = self.get_json(&endpoint).await?;
        Ok(data.into_detail())
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Option<Vec<Movie>>,
}

impl ListResponse {
    fn into_movies(self) -> Vec<Movie> {
        self.results.unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Videos {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    site: String,
    #[serde(rename = "type")]
    video_type: String,
    key: String,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(flatten)]
    movie: Movie,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    genres: Option<Vec<Genre>>,
    #[serde(default)]
    videos: Option<Videos>,
}

impl DetailResponse {
    fn into_detail(self) -> MovieDetail {
        let trailer_key = self.videos.as_ref().and_then(select_trailer);
        MovieDetail {
            movie: self.movie,
            tagline: self.tagline.filter(|t| !t.trim().is_empty()),
            runtime_minutes: self.runtime.filter(|r| *r > 0),
            genres: self
                .genres
                .map(|g| g.into_iter().map(|x| x.name).collect())
                .unwrap_or_default(),
            trailer_key,
        }
    }
}

fn select_trailer(videos: &Videos) -> Option<String> {
    videos
        .results
        .iter()
        .find(|v| v.site.eq_ignore_ascii_case("YouTube") && v.video_type == "Trailer")
        .or_else(|| {
            videos
                .results
                .iter()
                .find(|v| v.site.eq_ignore_ascii_case("YouTube") && v.video_type == "Teaser")
        })
        .map(|v| v.key.clone())
}

/// Display name for an ISO 639-1 code, used to title the regional page.
pub fn language_name(code: &str) -> String {
    let name = match code {
        "en" => "English",
        "fr" => "French",
        "es" => "Spanish",
        "de" => "German",
        "it" => "Italian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        "hi" => "Hindi",
        "ta" => "Tamil",
        "te" => "Telugu",
        "th" => "Thai",
        "tr" => "Turkish",
        "pt" => "Portuguese",
        "sv" => "Swedish",
        "da" => "Danish",
        _ => return code.to_uppercase(),
    };
    name.to_string()
}
