use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::Movie;
use crate::tmdb::{fetch_catalog, CatalogApi, CatalogSnapshot, Category, FetchError, MovieDetail};

const SHELF_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub enum PageKind {
    Home,
    Regional { title: String },
    Listing(Category),
    Detail(i32),
}

struct ShelfSpec {
    title: String,
    category: Category,
    offset: usize,
    len: Option<usize>,
}

impl PageKind {
    pub fn categories(&self) -> Vec<Category> {
        match self {
            PageKind::Home => vec![
                Category::Popular,
                Category::Trending,
                Category::TopRated,
                Category::Upcoming,
            ],
            PageKind::Regional { .. } => vec![Category::Regional],
            PageKind::Listing(category) => vec![*category],
            PageKind::Detail(_) => Vec::new(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            PageKind::Home => "MovieBoxx".to_string(),
            PageKind::Regional { title } => title.clone(),
            PageKind::Listing(category) => category.title().to_string(),
            PageKind::Detail(id) => format!("Movie {id}"),
        }
    }

    /// Only the home page skips the featured movie, and only on the Popular shelf.
    fn shelf_specs(&self) -> Vec<ShelfSpec> {
        let bounded = |category: Category, offset: usize| ShelfSpec {
            title: category.title().to_string(),
            category,
            offset,
            len: Some(SHELF_LEN),
        };
        match self {
            PageKind::Home => vec![
                bounded(Category::Popular, 1),
                bounded(Category::Trending, 0),
                bounded(Category::TopRated, 0),
                bounded(Category::Upcoming, 0),
            ],
            PageKind::Regional { title } => vec![ShelfSpec {
                title: title.clone(),
                category: Category::Regional,
                offset: 0,
                len: None,
            }],
            PageKind::Listing(category) => vec![ShelfSpec {
                title: category.title().to_string(),
                category: *category,
                offset: 0,
                len: None,
            }],
            PageKind::Detail(_) => Vec::new(),
        }
    }

    pub async fn fetch(&self, api: &dyn CatalogApi) -> Result<CatalogSnapshot, FetchError> {
        match self {
            PageKind::Detail(id) => api.fetch_movie(*id).await.map(CatalogSnapshot::from_detail),
            other => fetch_catalog(api, &other.categories()).await,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shelf {
    pub title: String,
    pub movies: Vec<Movie>,
    pub link: String,
}

/// What a page shows once its data arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub featured: Option<Movie>,
    pub detail: Option<MovieDetail>,
    pub shelves: Vec<Shelf>,
}

impl PageView {
    pub fn derive(kind: &PageKind, snapshot: &CatalogSnapshot) -> Self {
        let featured = match kind {
            PageKind::Home => snapshot.list(Category::Popular).first().cloned(),
            PageKind::Detail(_) => snapshot.detail().map(|d| d.movie.clone()),
            PageKind::Regional { .. } | PageKind::Listing(_) => None,
        };
        let shelves = kind
            .shelf_specs()
            .into_iter()
            .map(|spec| Shelf {
                movies: slice(snapshot.list(spec.category), spec.offset, spec.len),
                link: spec.category.link(),
                title: spec.title,
            })
            .collect::<Vec<_>>();
        debug!(
            featured = ?featured.as_ref().map(|m| m.id),
            shelves = shelves.len(),
            "Derived page view"
        );
        Self {
            featured,
            detail: snapshot.detail().cloned(),
            shelves,
        }
    }

    /// Featured movie plus every shelf movie, first occurrence wins.
    pub fn movies_in_scope(&self) -> Vec<Movie> {
        let mut seen = HashSet::new();
        self.featured
            .iter()
            .chain(self.shelves.iter().flat_map(|s| s.movies.iter()))
            .filter(|m| seen.insert(m.id))
            .cloned()
            .collect()
    }
}

fn slice(list: &[Movie], offset: usize, len: Option<usize>) -> Vec<Movie> {
    let start = offset.min(list.len());
    let end = match len {
        Some(n) => start.saturating_add(n).min(list.len()),
        None => list.len(),
    };
    list[start..end].to_vec()
}

#[derive(Debug)]
pub enum ViewState {
    Loading,
    Ready(PageView),
    Failed(FetchError),
}

/// Page state for a single view: `Loading` settles once into `Ready` or `Failed`.
#[derive(Debug)]
pub struct PageController {
    kind: PageKind,
    state: ViewState,
    trailer_open: bool,
    mounted: bool,
}

impl PageController {
    pub fn mount(kind: PageKind) -> Self {
        Self {
            kind,
            state: ViewState::Loading,
            trailer_open: false,
            mounted: true,
        }
    }

    pub fn kind(&self) -> &PageKind {
        &self.kind
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    pub fn view(&self) -> Option<&PageView> {
        match &self.state {
            ViewState::Ready(view) => Some(view),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match &self.state {
            ViewState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Applies a finished fetch. Returns false when the page already settled or is gone.
    pub fn settle(&mut self, outcome: Result<CatalogSnapshot, FetchError>) -> bool {
        if !self.mounted {
            debug!("Ignoring fetch result for unmounted page");
            return false;
        }
        if !self.is_loading() {
            return false;
        }
        self.state = match outcome {
            Ok(snapshot) => ViewState::Ready(PageView::derive(&self.kind, &snapshot)),
            Err(e) => {
                debug!(page = %self.kind.title(), class = ?e.class(), "Page failed to load");
                ViewState::Failed(e)
            }
        };
        true
    }

    pub fn retry(&mut self) -> bool {
        if !matches!(self.state, ViewState::Failed(_)) {
            return false;
        }
        self.state = ViewState::Loading;
        self.trailer_open = false;
        true
    }

    pub async fn load(&mut self, api: &dyn CatalogApi) -> bool {
        if matches!(self.state, ViewState::Failed(_)) {
            self.retry();
        }
        if !self.is_loading() {
            return false;
        }
        let outcome = self.kind.fetch(api).await;
        self.settle(outcome)
    }

    pub fn open_trailer(&mut self) -> bool {
        let has_featured = self.view().is_some_and(|v| v.featured.is_some());
        if has_featured {
            self.trailer_open = true;
        }
        has_featured
    }

    pub fn close_trailer(&mut self) {
        self.trailer_open = false;
    }

    /// The movie whose trailer should play, if the modal is open.
    pub fn trailer(&self) -> Option<&Movie> {
        if !self.trailer_open {
            return None;
        }
        self.view().and_then(|v| v.featured.as_ref())
    }
}

/// Loads in the background. The result is dropped if the page went away meanwhile.
pub fn spawn_load(
    page: Weak<Mutex<PageController>>,
    api: Arc<dyn CatalogApi>,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let kind = {
            let Some(live) = page.upgrade() else {
                return false;
            };
            let guard = live.lock().await;
            guard.kind.clone()
        };
        let outcome = kind.fetch(api.as_ref()).await;
        let Some(live) = page.upgrade() else {
            debug!("Page dropped before its load finished");
            return false;
        };
        let mut guard = live.lock().await;
        guard.settle(outcome)
    })
}
