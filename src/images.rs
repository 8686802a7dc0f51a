pub const PLACEHOLDER_POSTER: &str = "/static/placeholder-movie.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Original,
    W500,
}

impl ImageSize {
    pub fn token(&self) -> &'static str {
        match self {
            ImageSize::Original => "original",
            ImageSize::W500 => "w500",
        }
    }
}

/// Absolute CDN URL for a provider image path, or the local placeholder when there is none.
pub fn image_url(base: &str, size: ImageSize, path: Option<&str>) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) if p.starts_with('/') => format!("{}/{}{}", base, size.token(), p),
        Some(p) => format!("{}/{}/{}", base, size.token(), p),
        None => PLACEHOLDER_POSTER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://image.tmdb.org/t/p";

    #[test]
    fn joins_base_size_and_path() {
        assert_eq!(
            image_url(BASE, ImageSize::W500, Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            image_url(BASE, ImageSize::Original, Some("abc.jpg")),
            "https://image.tmdb.org/t/p/original/abc.jpg"
        );
    }

    #[test]
    fn missing_path_falls_back_to_placeholder() {
        assert_eq!(image_url(BASE, ImageSize::W500, None), PLACEHOLDER_POSTER);
        assert_eq!(image_url(BASE, ImageSize::W500, Some("  ")), PLACEHOLDER_POSTER);
    }
}
