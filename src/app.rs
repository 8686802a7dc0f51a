use crate::config::Config;
use crate::header::{HeaderController, MobilePanel, Navigator};
use crate::page::{spawn_load, PageController, PageKind, PageView};
use crate::tmdb::{language_name, CatalogApi, Category, FetchError, TmdbClient};
use crate::views::{render_not_found, render_page, RenderContext};
use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const PLACEHOLDER_SVG: &str = include_str!("../static/placeholder-movie.svg");

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogApi>,
    pub image_base_url: String,
    pub regional_title: String,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogApi>, config: &Config) -> Self {
        Self {
            catalog,
            image_base_url: config.image_base_url.clone(),
            regional_title: format!("Popular {} Movies", language_name(&config.regional_language)),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PageQuery {
    q: Option<String>,
    panel: Option<String>,
    trailer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SelectQuery {
    id: i32,
}

/// Turns a header navigation request into an HTTP redirect.
#[derive(Debug, Default)]
struct RedirectNavigator {
    target: Option<String>,
}

impl Navigator for RedirectNavigator {
    fn navigate(&mut self, route: &str) {
        self.target = Some(route.to_string());
    }
}

impl IntoResponse for RedirectNavigator {
    fn into_response(self) -> Response {
        Redirect::to(self.target.as_deref().unwrap_or("/")).into_response()
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let catalog: Arc<dyn CatalogApi> = Arc::new(TmdbClient::new(&config)?);
    let state = AppState::new(catalog, &config);
    info!("Regional page: {}", state.regional_title);

    let app = build_router(state);

    info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/korean", get(regional))
        .route("/movies", get(movies_index))
        .route("/movies/:key", get(movie_page))
        .route("/search/select", get(select_suggestion))
        .route("/static/placeholder-movie.svg", get(placeholder))
        .route("/health", get(health))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn placeholder() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "public, max-age=86400"),
        ],
        PLACEHOLDER_SVG,
    )
}

async fn home(State(state): State<AppState>, Query(params): Query<PageQuery>) -> Response {
    render_view(&state, "/", PageKind::Home, params).await
}

async fn regional(State(state): State<AppState>, Query(params): Query<PageQuery>) -> Response {
    let kind = PageKind::Regional {
        title: state.regional_title.clone(),
    };
    render_view(&state, "/korean", kind, params).await
}

async fn movies_index(State(state): State<AppState>, Query(params): Query<PageQuery>) -> Response {
    render_view(&state, "/movies", PageKind::Listing(Category::Popular), params).await
}

async fn movie_page(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<PageQuery>,
) -> Response {
    let path = format!("/movies/{key}");
    if let Some(id) = parse_movie_id(&key) {
        return render_view(&state, &path, PageKind::Detail(id), params).await;
    }
    if let Some(category) = Category::from_slug(&key) {
        return render_view(&state, &path, PageKind::Listing(category), params).await;
    }
    debug!("No page for /movies/{}", key);
    let ctx = RenderContext {
        image_base: &state.image_base_url,
        path: &path,
    };
    let html = render_not_found(&ctx, &HeaderController::default());
    (StatusCode::NOT_FOUND, Html(html)).into_response()
}

async fn select_suggestion(Query(params): Query<SelectQuery>) -> RedirectNavigator {
    let mut header = HeaderController::default();
    let mut navigator = RedirectNavigator::default();
    header.select_suggestion(params.id, &mut navigator);
    navigator
}

/// Mounts a page, waits for its data, and renders whichever state it settled in.
///
/// The load runs through `spawn_load`, so when the client goes away and this future is
/// dropped, the page is dropped with it and the late result is discarded.
async fn render_view(state: &AppState, path: &str, kind: PageKind, params: PageQuery) -> Response {
    let page = Arc::new(Mutex::new(PageController::mount(kind)));
    if let Err(e) = spawn_load(Arc::downgrade(&page), state.catalog.clone()).await {
        warn!("Load task for {} ended abnormally: {}", path, e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let mut page = page.lock().await;

    let ctx = RenderContext {
        image_base: &state.image_base_url,
        path,
    };
    let missing_movie = matches!(page.kind(), PageKind::Detail(_))
        && page.error().is_some_and(FetchError::is_not_found);
    if missing_movie {
        debug!("Provider has no movie for {}", path);
        let html = render_not_found(&ctx, &HeaderController::default());
        return (StatusCode::NOT_FOUND, Html(html)).into_response();
    }

    if params.trailer.as_deref() == Some("open") && !page.open_trailer() {
        debug!("Trailer requested on {} without a featured movie", path);
    }

    let mut header =
        HeaderController::new(page.view().map(PageView::movies_in_scope).unwrap_or_default());
    match MobilePanel::from_param(params.panel.as_deref()) {
        MobilePanel::Search => header.toggle_search_panel(),
        MobilePanel::Menu => header.toggle_menu_panel(),
        MobilePanel::None => {}
    }
    if let Some(q) = params.q.as_deref() {
        header.set_query(q);
    }

    let html = render_page(&ctx, &page, &header);
    let status = if page.error().is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    (status, Html(html)).into_response()
}

pub fn parse_movie_id(input: &str) -> Option<i32> {
    if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
        return input.parse().ok();
    }
    None
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
