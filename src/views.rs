//! HTML for every page. All dynamic text goes through `html_escape`.

use std::fmt::Write as _;

use crate::header::{movie_route, HeaderController, MobilePanel};
use crate::images::{image_url, ImageSize};
use crate::models::Movie;
use crate::page::{PageController, PageKind, PageView, Shelf, ViewState};
use crate::rating::{star_rating, Star};
use crate::tmdb::{FailureClass, FetchError, MovieDetail};

const STYLE: &str = r#"
body { margin: 0; background: #111827; color: #fff; font-family: system-ui, sans-serif; }
a { color: inherit; text-decoration: none; }
.site-header { position: sticky; top: 0; z-index: 50; background: rgba(0,0,0,.75); padding: 0 1.5rem; }
.site-header nav { display: flex; align-items: center; justify-content: space-between; gap: 2rem; padding: 1rem 0; }
.logo { font-size: 1.5rem; font-weight: 700; letter-spacing: .05em; }
.search { position: relative; flex: 1; max-width: 36rem; }
.search input { width: 100%; border-radius: 9999px; border: 1px solid rgba(255,255,255,.5); background: transparent; color: inherit; padding: .5rem 1rem; }
.suggestions { position: absolute; left: 0; right: 0; margin: .25rem 0 0; padding: 0; list-style: none; background: #fff; color: #000; border-radius: .5rem; overflow: hidden; }
.suggestions a { display: block; padding: .75rem 1rem; border-bottom: 1px solid #f3f4f6; }
.nav-links { display: flex; gap: 1.5rem; align-items: center; }
.mobile-controls, .mobile-panel { display: none; }
@media (max-width: 768px) {
  .desktop { display: none; }
  .mobile-controls { display: flex; gap: 1rem; }
  .mobile-panel { display: block; padding-bottom: 1rem; position: relative; }
}
.spinner { display: flex; justify-content: center; align-items: center; height: 100vh; }
.spinner span { width: 3rem; height: 3rem; border-radius: 50%; border-top: 2px solid #fff; border-bottom: 2px solid #fff; animation: spin 1s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
.hero { position: relative; min-height: 80vh; display: flex; align-items: center; padding: 0 6rem; background-size: cover; background-position: center; }
.hero::before { content: ""; position: absolute; inset: 0; background: rgba(0,0,0,.6); }
.hero > div { position: relative; max-width: 42rem; }
.hero h1 { font-size: 4rem; margin: 0 0 1rem; }
.button { display: inline-flex; padding: .75rem 1.5rem; border-radius: .375rem; margin-right: 1rem; }
.button.primary { background: #dc2626; }
.button.secondary { background: rgba(255,255,255,.3); }
.stars { color: #facc15; }
.shelf, .movie-list { padding: 3rem 6rem; }
.shelf-head { display: flex; justify-content: space-between; align-items: center; }
.shelf-head a { color: #f87171; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(10rem, 1fr)); gap: 1.5rem; }
.card img { width: 100%; aspect-ratio: 2 / 3; object-fit: cover; border-radius: .5rem; }
.card h3 { font-size: 1rem; margin: .5rem 0 .25rem; }
.card p { font-size: .75rem; color: #9ca3af; margin: 0; }
.empty, .failed { text-align: center; padding: 3rem; color: #9ca3af; }
.failed a { color: #f87171; }
.modal { position: fixed; inset: 0; z-index: 60; background: rgba(0,0,0,.9); display: flex; justify-content: center; align-items: center; }
.modal > div { width: 100%; max-width: 56rem; aspect-ratio: 16 / 9; position: relative; }
.modal .close { position: absolute; top: -2.5rem; right: 0; }
.modal iframe { width: 100%; height: 100%; border: 0; }
.detail-facts { padding: 0 6rem 3rem; color: #d1d5db; }
"#;

/// Per-request rendering inputs.
pub struct RenderContext<'a> {
    pub image_base: &'a str,
    /// Path of the page being rendered, used for self links.
    pub path: &'a str,
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn href(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{path}?{query}")
}

pub fn render_page(ctx: &RenderContext, page: &PageController, header: &HeaderController) -> String {
    let mut body = String::new();
    match page.state() {
        ViewState::Loading => body.push_str(&render_loading()),
        ViewState::Failed(e) => body.push_str(&render_failed(ctx, e)),
        ViewState::Ready(view) => {
            body.push_str(&render_ready(ctx, page.kind(), view));
            if let Some(movie) = page.trailer() {
                let key = view.detail.as_ref().and_then(|d| d.trailer_key.as_deref());
                body.push_str(&render_trailer_modal(ctx, movie, key));
            }
        }
    }

    let title = match page.view().and_then(|v| v.detail.as_ref()) {
        Some(detail) => format!("{} | MovieBoxx", detail.movie.title),
        None if matches!(page.kind(), PageKind::Home) => "MovieBoxx".to_string(),
        None => format!("{} | MovieBoxx", page.kind().title()),
    };
    layout(&title, &render_header(ctx, header), &body)
}

pub fn render_not_found(ctx: &RenderContext, header: &HeaderController) -> String {
    let body = r#"<section class="empty"><h1>Page not found</h1><p><a href="/">Back to home</a></p></section>"#;
    layout("Not found | MovieBoxx", &render_header(ctx, header), body)
}

fn layout(title: &str, header: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
<style>{}</style>
</head>
<body>
{}
<main>
{}
</main>
</body>
</html>"#,
        html_escape(title),
        STYLE,
        header,
        body
    )
}

pub fn render_header(ctx: &RenderContext, header: &HeaderController) -> String {
    let query = header.query();
    let toggle = |target: MobilePanel| {
        let mut params = Vec::new();
        if !query.is_empty() {
            params.push(("q", query));
        }
        if let Some(panel) = header.panel_after_toggle(target).as_param() {
            params.push(("panel", panel));
        }
        html_escape(&href(ctx.path, &params))
    };
    let menu_label = if header.panel() == MobilePanel::Menu {
        "Close"
    } else {
        "Menu"
    };

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<header class="site-header">
<nav>
<a href="/" class="logo">MovieBoxx</a>
<div class="search desktop">
{}
{}
</div>
<div class="nav-links desktop">{}</div>
<div class="mobile-controls">
<a href="{}" aria-label="Search">Search</a>
<a href="{}" aria-label="Menu">{}</a>
</div>
</nav>"#,
        search_form(ctx, query, header.panel(), "What do you want to watch?"),
        render_suggestions(header.suggestions()),
        nav_links(),
        toggle(MobilePanel::Search),
        toggle(MobilePanel::Menu),
        menu_label
    );

    match header.panel() {
        MobilePanel::Search => {
            let _ = write!(
                out,
                r#"<div class="mobile-panel">{}{}</div>"#,
                search_form(ctx, query, header.panel(), "Search movies..."),
                render_suggestions(header.suggestions())
            );
        }
        MobilePanel::Menu => {
            let _ = write!(out, r#"<div class="mobile-panel">{}</div>"#, nav_links());
        }
        MobilePanel::None => {}
    }
    out.push_str("</header>");
    out
}

fn search_form(ctx: &RenderContext, query: &str, panel: MobilePanel, placeholder: &str) -> String {
    let panel_input = panel
        .as_param()
        .map(|p| format!(r#"<input type="hidden" name="panel" value="{p}">"#))
        .unwrap_or_default();
    format!(
        r#"<form action="{}" method="get"><input type="text" name="q" value="{}" placeholder="{}" autocomplete="off">{}</form>"#,
        html_escape(ctx.path),
        html_escape(query),
        placeholder,
        panel_input
    )
}

fn nav_links() -> &'static str {
    r#"<a href="/movies">Movies</a><a href="/tv-shows">TV Shows</a><a href="/about">About</a><button type="button" class="sign-in">Sign In</button>"#
}

fn render_suggestions(suggestions: &[Movie]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let items: String = suggestions
        .iter()
        .map(|m| {
            format!(
                r#"<li><a href="/search/select?id={}">{}</a></li>"#,
                m.id,
                html_escape(&m.title)
            )
        })
        .collect();
    format!(r#"<ul class="suggestions">{items}</ul>"#)
}

pub fn render_loading() -> String {
    r#"<div class="spinner" role="status" aria-label="Loading"><span></span></div>"#.to_string()
}

pub fn render_failed(ctx: &RenderContext, error: &FetchError) -> String {
    let message = match error.class() {
        FailureClass::Network => "We couldn't reach the movie service.",
        FailureClass::BadResponse => "The movie service sent a response we couldn't use.",
    };
    format!(
        r#"<section class="failed" role="alert"><h1>Something went wrong</h1><p>{}</p><p><a href="{}">Try again</a></p></section>"#,
        message,
        html_escape(ctx.path)
    )
}

fn render_ready(ctx: &RenderContext, kind: &PageKind, view: &PageView) -> String {
    let mut out = String::new();
    if let Some(featured) = &view.featured {
        out.push_str(&render_hero(ctx, featured, !matches!(kind, PageKind::Detail(_))));
    }
    if let Some(detail) = &view.detail {
        out.push_str(&render_detail_facts(detail));
    }
    match kind {
        PageKind::Home => {
            for shelf in &view.shelves {
                out.push_str(&render_shelf(ctx, shelf));
            }
        }
        PageKind::Regional { .. } | PageKind::Listing(_) => {
            for shelf in &view.shelves {
                out.push_str(&render_movie_list(ctx, &shelf.title, &shelf.movies));
            }
        }
        PageKind::Detail(_) => {}
    }
    out
}

pub fn render_stars(value: f64) -> String {
    let stars: String = star_rating(value)
        .iter()
        .map(|s| match s {
            Star::Filled => '★',
            Star::Empty => '☆',
        })
        .collect();
    format!(r#"<span class="stars" aria-hidden="true">{stars}</span>"#)
}

fn render_hero(ctx: &RenderContext, movie: &Movie, more_info: bool) -> String {
    let backdrop = image_url(ctx.image_base, ImageSize::Original, movie.backdrop_path.as_deref());
    let year = movie
        .release_year()
        .map(|y| format!("<span>{y}</span>"))
        .unwrap_or_default();
    let info_link = if more_info {
        format!(
            r#"<a class="button secondary" href="{}">More Info</a>"#,
            movie_route(movie.id)
        )
    } else {
        String::new()
    };
    format!(
        r#"<section class="hero" style="background-image: url('{}')">
<div>
<h1>{}</h1>
<p>{} <span>{:.1}/10</span> {}</p>
<p>{}</p>
<p><a class="button primary" href="{}">Watch Trailer</a>{}</p>
</div>
</section>"#,
        html_escape(&backdrop),
        html_escape(&movie.title),
        render_stars(movie.vote_average),
        movie.vote_average,
        year,
        html_escape(movie.overview_text()),
        html_escape(&href(ctx.path, &[("trailer", "open")])),
        info_link
    )
}

fn render_detail_facts(detail: &MovieDetail) -> String {
    let mut facts = Vec::new();
    if let Some(tagline) = &detail.tagline {
        facts.push(format!("<em>{}</em>", html_escape(tagline)));
    }
    if let Some(runtime) = detail.runtime_minutes {
        facts.push(format!("{}h {:02}m", runtime / 60, runtime % 60));
    }
    if !detail.genres.is_empty() {
        facts.push(html_escape(&detail.genres.join(", ")));
    }
    if let Some(votes) = detail.movie.vote_count {
        facts.push(format!("{votes} votes"));
    }
    if facts.is_empty() {
        return String::new();
    }
    format!(
        r#"<section class="detail-facts"><p>{}</p></section>"#,
        facts.join(" · ")
    )
}

fn render_card(ctx: &RenderContext, movie: &Movie, caption: &str) -> String {
    let poster = image_url(ctx.image_base, ImageSize::W500, movie.poster_path.as_deref());
    format!(
        r#"<a class="card" href="{}"><img src="{}" alt="{}" loading="lazy"><h3>{}</h3><div>{} <span>{:.1}</span></div><p>{}</p></a>"#,
        movie_route(movie.id),
        html_escape(&poster),
        html_escape(&movie.title),
        html_escape(&movie.title),
        render_stars(movie.vote_average),
        movie.vote_average,
        html_escape(caption)
    )
}

fn render_shelf(ctx: &RenderContext, shelf: &Shelf) -> String {
    let cards: String = shelf
        .movies
        .iter()
        .map(|m| render_card(ctx, m, m.overview_text()))
        .collect();
    format!(
        r#"<section class="shelf"><div class="shelf-head"><h2>{}</h2><a href="{}">View All</a></div><div class="grid">{}</div></section>"#,
        html_escape(&shelf.title),
        html_escape(&shelf.link),
        cards
    )
}

fn render_movie_list(ctx: &RenderContext, title: &str, movies: &[Movie]) -> String {
    if movies.is_empty() {
        return format!(
            r#"<section class="movie-list"><h1>{}</h1><div class="empty"><p>No movies found</p></div></section>"#,
            html_escape(title)
        );
    }
    let cards: String = movies
        .iter()
        .map(|m| {
            let year = m.release_year().map(|y| y.to_string()).unwrap_or_default();
            render_card(ctx, m, &year)
        })
        .collect();
    format!(
        r#"<section class="movie-list"><h1>{}</h1><div class="grid">{}</div></section>"#,
        html_escape(title),
        cards
    )
}

pub fn trailer_embed_url(movie: &Movie, trailer_key: Option<&str>) -> String {
    match trailer_key {
        Some(key) => format!(
            "https://www.youtube.com/embed/{}?autoplay=1",
            urlencoding::encode(key)
        ),
        None => format!(
            "https://www.youtube.com/embed/?autoplay=1&listType=search&list={}",
            urlencoding::encode(&format!("{} official trailer", movie.title))
        ),
    }
}

fn render_trailer_modal(ctx: &RenderContext, movie: &Movie, trailer_key: Option<&str>) -> String {
    format!(
        r#"<div class="modal" role="dialog"><div><a class="close" href="{}">Close</a><iframe src="{}" title="{} Trailer" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" allowfullscreen></iframe></div></div>"#,
        html_escape(ctx.path),
        html_escape(&trailer_embed_url(movie, trailer_key)),
        html_escape(&movie.title)
    )
}
