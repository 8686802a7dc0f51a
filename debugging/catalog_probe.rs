//! Fetch a provider list or a single movie and print what the pages would derive from it.
//! Usage:
//!   cargo run --bin catalog_probe -- home
//!   cargo run --bin catalog_probe -- list <popular|trending|top-rated|upcoming|korean>
//!   cargo run --bin catalog_probe -- movie <tmdb_id>
//! Requires TMDB_API_URL and TMDB_API_KEY in the environment (.env supported).

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use movieboxx::config::Config;
use movieboxx::page::{PageKind, PageView};
use movieboxx::rating::{star_rating, Star};
use movieboxx::tmdb::{CatalogApi, Category, TmdbClient};
use serde_json::{json, Value};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ProbeKind {
    Home,
    List,
    Movie,
}

impl FromStr for ProbeKind {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "home" => Ok(ProbeKind::Home),
            "list" => Ok(ProbeKind::List),
            "movie" => Ok(ProbeKind::Movie),
            _ => Err(anyhow!("probe kind must be 'home', 'list' or 'movie'")),
        }
    }
}

fn stars(value: f64) -> String {
    star_rating(value)
        .iter()
        .map(|s| if *s == Star::Filled { '★' } else { '☆' })
        .collect()
}

fn summarize(view: &PageView) -> Value {
    let featured = view.featured.as_ref().map(|m| {
        json!({
            "id": m.id,
            "title": m.title,
            "rating": format!("{} {:.1}/10", stars(m.vote_average), m.vote_average),
            "year": m.release_year(),
        })
    });
    let shelves: Vec<Value> = view
        .shelves
        .iter()
        .map(|s| {
            json!({
                "title": s.title,
                "link": s.link,
                "movies": s.movies.iter().map(|m| format!("{} ({})", m.title, m.id)).collect::<Vec<_>>(),
            })
        })
        .collect();
    json!({ "featured": featured, "shelves": shelves })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present for local runs.
    dotenv().ok();

    let mut args = env::args().skip(1);
    let kind: ProbeKind = args
        .next()
        .context("Missing probe kind (home, list or movie)")?
        .parse()?;

    let config = Config::from_env().context("Invalid configuration")?;
    let client = TmdbClient::new(&config)?;

    let page = match kind {
        ProbeKind::Home => PageKind::Home,
        ProbeKind::List => {
            let slug = args.next().context("Missing category slug")?;
            if slug == Category::Regional.slug() {
                PageKind::Regional {
                    title: format!("Regional ({})", config.regional_language),
                }
            } else {
                let category = Category::from_slug(&slug)
                    .ok_or_else(|| anyhow!("Unknown category '{}'", slug))?;
                println!("Endpoint: {}", client.endpoint(category));
                PageKind::Listing(category)
            }
        }
        ProbeKind::Movie => {
            let id: i32 = args
                .next()
                .context("Missing TMDB id")?
                .parse()
                .context("TMDB id must be a number")?;
            let detail = client.fetch_movie(id).await?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "movie": detail.movie,
                    "tagline": detail.tagline,
                    "runtime_minutes": detail.runtime_minutes,
                    "genres": detail.genres,
                    "trailer_key": detail.trailer_key,
                }))?
            );
            return Ok(());
        }
    };

    let snapshot = page.fetch(&client).await?;
    let view = PageView::derive(&page, &snapshot);
    println!("{}", serde_json::to_string_pretty(&summarize(&view))?);
    Ok(())
}
