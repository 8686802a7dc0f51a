use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use movieboxx::app::{build_router, AppState};
use movieboxx::config::Config;
use movieboxx::models::Movie;
use movieboxx::tmdb::{CatalogApi, Category, FetchError, MovieDetail};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

struct FakeCatalog {
    lists: HashMap<Category, Vec<Movie>>,
    failing: Vec<Category>,
    movie_status: Option<u16>,
    calls: Mutex<Vec<Category>>,
}

#[async_trait::async_trait]
impl CatalogApi for FakeCatalog {
    async fn fetch_category(&self, category: Category) -> Result<Vec<Movie>, FetchError> {
        self.calls.lock().unwrap().push(category);
        if self.failing.contains(&category) {
            return Err(FetchError::Status {
                endpoint: format!("/{}", category.slug()),
                status: 503,
            });
        }
        Ok(self.lists.get(&category).cloned().unwrap_or_default())
    }

    async fn fetch_movie(&self, id: i32) -> Result<MovieDetail, FetchError> {
        if let Some(status) = self.movie_status {
            return Err(FetchError::Status {
                endpoint: format!("/movie/{id}"),
                status,
            });
        }
        let movie = self
            .lists
            .values()
            .flatten()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(FetchError::Status {
                endpoint: format!("/movie/{id}"),
                status: 404,
            })?;
        Ok(MovieDetail {
            movie,
            tagline: Some("Fear is the mind-killer.".to_string()),
            runtime_minutes: Some(155),
            genres: vec!["Science Fiction".to_string()],
            trailer_key: Some("n9xhJrPXop4".to_string()),
        })
    }
}

fn movie(id: i32, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/poster-{id}.jpg")),
        backdrop_path: Some(format!("/backdrop-{id}.jpg")),
        overview: Some(format!("Overview of {title}")),
        vote_average: 7.6,
        vote_count: Some(1200),
        release_date: Some("2021-09-15".to_string()),
        genre_ids: Some(vec![878]),
    }
}

fn numbered(start: i32, count: i32, prefix: &str) -> Vec<Movie> {
    (start..start + count)
        .map(|i| movie(i, &format!("{prefix} {i}")))
        .collect()
}

fn popular() -> Vec<Movie> {
    let mut list = vec![movie(1, "Dune"), movie(2, "Dune Part Two"), movie(3, "Avatar")];
    list.extend(numbered(10, 5, "Popular"));
    list
}

fn full_catalog() -> FakeCatalog {
    FakeCatalog {
        lists: HashMap::from([
            (Category::Popular, popular()),
            (Category::Trending, numbered(100, 8, "Trending")),
            (Category::TopRated, numbered(200, 8, "Top")),
            (Category::Upcoming, numbered(300, 2, "Soon")),
            (Category::Regional, numbered(400, 3, "Korean")),
        ]),
        failing: Vec::new(),
        movie_status: None,
        calls: Mutex::new(Vec::new()),
    }
}

fn config() -> Config {
    Config::from_lookup(|key| match key {
        "TMDB_API_URL" => Some("https://api.example/3".to_string()),
        "TMDB_API_KEY" => Some("test-key".to_string()),
        "TMDB_IMAGE_BASE_URL" => Some("https://img.example/t/p".to_string()),
        _ => None,
    })
    .expect("test config")
}

fn app_with(catalog: FakeCatalog) -> (Router, Arc<FakeCatalog>) {
    let catalog = Arc::new(catalog);
    let state = AppState::new(catalog.clone(), &config());
    (build_router(state), catalog)
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let res = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn home_renders_featured_and_four_shelves() {
    let (app, catalog) = app_with(full_catalog());
    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::OK);

    let calls = catalog.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 4);
    assert!(!calls.contains(&Category::Regional));

    assert!(body.contains("<h1>Dune</h1>"));
    assert!(body.contains("https://img.example/t/p/original/backdrop-1.jpg"));
    assert!(body.contains("7.6/10"));
    assert!(body.contains("★★★☆☆"));
    for title in ["Popular Movies", "Trending Now", "Top Rated", "Coming Soon"] {
        assert!(body.contains(title), "missing shelf {title}");
    }
    // The featured movie is skipped on the Popular shelf only.
    assert!(!body.contains(r#"<a class="card" href="/movies/1">"#));
    assert!(body.contains(r#"<a class="card" href="/movies/2">"#));
    assert!(body.contains(r#"<a class="card" href="/movies/105">"#));
    assert!(!body.contains(r#"<a class="card" href="/movies/106">"#));
    assert!(!body.contains(r#"class="modal""#));
}

#[tokio::test]
async fn search_query_filters_movies_in_scope() {
    let (app, _) = app_with(full_catalog());
    let (status, body) = get(app, "/?q=DUNE").await;
    assert_eq!(status, StatusCode::OK);
    let first = body.find(r#"href="/search/select?id=1""#).expect("Dune suggested");
    let second = body
        .find(r#"href="/search/select?id=2""#)
        .expect("Dune Part Two suggested");
    assert!(first < second);
    assert!(!body.contains(r#"href="/search/select?id=3""#));
}

#[tokio::test]
async fn empty_query_shows_no_suggestions() {
    let (app, _) = app_with(full_catalog());
    let (_, body) = get(app, "/?q=").await;
    assert!(!body.contains(r#"class="suggestions""#));
}

#[tokio::test]
async fn selecting_a_suggestion_redirects_to_detail() {
    let (app, catalog) = app_with(full_catalog());
    let res = app
        .oneshot(
            Request::get("/search/select?id=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        res.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        "/movies/2"
    );
    assert!(catalog.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn trailer_modal_opens_for_featured_movie() {
    let (app, _) = app_with(full_catalog());
    let (_, body) = get(app, "/?trailer=open").await;
    assert!(body.contains(r#"class="modal""#));
    assert!(body.contains("list=Dune%20official%20trailer"));
}

#[tokio::test]
async fn trailer_cannot_open_without_featured_movie() {
    let mut catalog = full_catalog();
    catalog.lists.insert(Category::Popular, Vec::new());
    let (app, _) = app_with(catalog);
    let (status, body) = get(app, "/?trailer=open").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains(r#"class="modal""#));
    assert!(!body.contains("Watch Trailer"));
}

#[tokio::test]
async fn failed_fetch_renders_retry_instead_of_empty_page() {
    let mut catalog = full_catalog();
    catalog.failing.push(Category::TopRated);
    let (app, catalog) = app_with(catalog);
    let (status, body) = get(app, "/").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains("Something went wrong"));
    assert!(body.contains(r#"<a href="/">Try again</a>"#));
    assert!(!body.contains("Popular Movies"));
    // Every request still ran to completion.
    assert_eq!(catalog.calls.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn regional_page_lists_every_result() {
    let (app, catalog) = app_with(full_catalog());
    let (status, body) = get(app, "/korean").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(*catalog.calls.lock().unwrap(), vec![Category::Regional]);
    assert!(body.contains("<h1>Popular Korean Movies</h1>"));
    for id in 400..403 {
        assert!(body.contains(&format!(r#"href="/movies/{id}""#)));
    }
    assert!(body.contains("<p>2021</p>"));
}

#[tokio::test]
async fn category_listing_and_unknown_slug() {
    let (app, _) = app_with(full_catalog());
    let (status, body) = get(app.clone(), "/movies/top-rated").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"href="/movies/207""#));

    let (status, _) = get(app, "/movies/not-a-category").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn detail_page_shows_facts_and_known_trailer() {
    let (app, _) = app_with(full_catalog());
    let (status, body) = get(app.clone(), "/movies/1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>Dune | MovieBoxx</title>"));
    assert!(body.contains("2h 35m"));
    assert!(body.contains("Science Fiction"));
    assert!(!body.contains("More Info"));

    let (_, body) = get(app, "/movies/1?trailer=open").await;
    assert!(body.contains("https://www.youtube.com/embed/n9xhJrPXop4?autoplay=1"));
}

#[tokio::test]
async fn unknown_movie_id_is_not_found() {
    let (app, _) = app_with(full_catalog());
    let (status, body) = get(app, "/movies/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page not found"));
    assert!(!body.contains("Try again"));
}

#[tokio::test]
async fn detail_provider_error_is_a_visible_failure() {
    let mut catalog = full_catalog();
    catalog.movie_status = Some(500);
    let (app, _) = app_with(catalog);
    let (status, body) = get(app, "/movies/1").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body.contains(r#"<a href="/movies/1">Try again</a>"#));
}

#[tokio::test]
async fn mobile_panels_render_one_at_a_time() {
    let (app, _) = app_with(full_catalog());
    let (_, body) = get(app.clone(), "/?panel=menu").await;
    assert_eq!(body.matches(r#"class="mobile-panel""#).count(), 1);
    assert!(body.contains(r#"aria-label="Menu">Close</a>"#));
    assert!(body.contains(r#"href="/?panel=search" aria-label="Search""#));

    let (_, body) = get(app, "/?panel=search&q=avatar").await;
    assert_eq!(body.matches(r#"href="/search/select?id=3""#).count(), 2);
}

#[tokio::test]
async fn serves_placeholder_and_health() {
    let (app, _) = app_with(full_catalog());
    let res = app
        .clone()
        .oneshot(
            Request::get("/static/placeholder-movie.svg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap(),
        "image/svg+xml"
    );

    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}
