//! Resolution of scraped hrefs against the site's base URL.

/// True when `href` starts with `scheme://`
fn has_scheme(href: &str) -> bool {
    let Some((scheme, _)) = href.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Make `href` absolute by prefixing `base_url` unless it already carries a
/// scheme. Protocol-relative hrefs (`//host/...`) take only the base's scheme.
/// Otherwise exactly one `/` joins the two parts; the result is not validated.
pub fn normalize(href: &str, base_url: &str) -> String {
    let href = href.trim();
    if has_scheme(href) {
        return href.to_string();
    }

    if href.starts_with("//") {
        let scheme = base_url
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .unwrap_or("https");
        return format!("{}:{}", scheme, href);
    }

    let base = base_url.trim_end_matches('/');
    let path = href.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Map an episode page URL to the site's video-source JSON endpoint:
/// the first `/animes/` segment becomes `/video/` and the subtitle flag is
/// appended.
pub fn video_endpoint(episode_url: &str) -> String {
    let swapped = episode_url.replacen("/animes/", "/video/", 1);
    let separator = if swapped.contains('?') { '&' } else { '?' };
    format!("{}{}tempsubs=0", swapped, separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_href_is_prefixed() {
        assert_eq!(normalize("/x/y", "https://base"), "https://base/x/y");
    }

    #[test]
    fn test_absolute_href_is_unchanged() {
        assert_eq!(normalize("https://other/z", "https://base"), "https://other/z");
        assert_eq!(normalize("http://other/z", "https://base"), "http://other/z");
    }

    #[test]
    fn test_single_slash_at_seam() {
        assert_eq!(normalize("x/y", "https://base"), "https://base/x/y");
        assert_eq!(normalize("/x/y", "https://base/"), "https://base/x/y");
    }

    #[test]
    fn test_protocol_relative_href_keeps_host() {
        assert_eq!(
            normalize("//cdn.x/a.jpg", "https://animefire.plus"),
            "https://cdn.x/a.jpg"
        );
        assert_eq!(
            normalize("//mirror.test/animes/x", "http://localhost:8080"),
            "http://mirror.test/animes/x"
        );
    }

    #[test]
    fn test_scheme_like_paths_are_relative() {
        assert_eq!(
            normalize("/search?q=http://x", "https://base"),
            "https://base/search?q=http://x"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("/animes/frieren", "https://base");
        assert_eq!(normalize(&once, "https://base"), once);
    }

    #[test]
    fn test_video_endpoint() {
        assert_eq!(
            video_endpoint("https://site/animes/frieren/3"),
            "https://site/video/frieren/3?tempsubs=0"
        );
        assert_eq!(
            video_endpoint("https://site/animes/frieren/3?x=1"),
            "https://site/video/frieren/3?x=1&tempsubs=0"
        );
    }
}
