use tracing::debug;

use crate::models::Movie;

/// Receives route changes requested by the header.
pub trait Navigator {
    fn navigate(&mut self, route: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MobilePanel {
    #[default]
    None,
    Search,
    Menu,
}

impl MobilePanel {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("search") => MobilePanel::Search,
            Some("menu") => MobilePanel::Menu,
            _ => MobilePanel::None,
        }
    }

    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            MobilePanel::None => None,
            MobilePanel::Search => Some("search"),
            MobilePanel::Menu => Some("menu"),
        }
    }
}

pub fn movie_route(id: i32) -> String {
    format!("/movies/{id}")
}

/// Movies whose title contains `query`, ignoring case, in their original order.
pub fn filter_suggestions(movies: &[Movie], query: &str) -> Vec<Movie> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    movies
        .iter()
        .filter(|m| m.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct HeaderController {
    movies: Vec<Movie>,
    query: String,
    suggestions: Vec<Movie>,
    panel: MobilePanel,
}

impl HeaderController {
    pub fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies,
            ..Self::default()
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.suggestions = filter_suggestions(&self.movies, &self.query);
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Movie] {
        &self.suggestions
    }

    pub fn select_suggestion<N: Navigator + ?Sized>(&mut self, id: i32, navigator: &mut N) {
        self.query.clear();
        self.suggestions.clear();
        let route = movie_route(id);
        debug!(route = %route, "Suggestion selected");
        navigator.navigate(&route);
    }

    pub fn panel(&self) -> MobilePanel {
        self.panel
    }

    pub fn toggle_search_panel(&mut self) {
        self.panel = match self.panel {
            MobilePanel::Search => MobilePanel::None,
            _ => MobilePanel::Search,
        };
    }

    pub fn toggle_menu_panel(&mut self) {
        self.panel = match self.panel {
            MobilePanel::Menu => MobilePanel::None,
            _ => MobilePanel::Menu,
        };
    }

    /// Panel state after toggling `target`, used to build the toggle links.
    pub fn panel_after_toggle(&self, target: MobilePanel) -> MobilePanel {
        let mut next = self.clone();
        match target {
            MobilePanel::Search => next.toggle_search_panel(),
            MobilePanel::Menu => next.toggle_menu_panel(),
            MobilePanel::None => next.panel = MobilePanel::None,
        }
        next.panel
    }
}
