// URL construction for the WordPress REST API.
//
// Pure string helpers: no parsing, no I/O. `RestClient` parses the result
// right before sending.

use serde::{Deserialize, Serialize};

/// REST base used when a site doesn't specify one.
pub const DEFAULT_REST_BASE: &str = "/wp-json/wp/v2/";

/// Where a site's REST API lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConnection {
    /// Site root as entered by the user (e.g. `https://example.com/`).
    pub base_url: String,
    /// Path prefix of the REST API; `None` or blank means the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_base: Option<String>,
}

impl SiteConnection {
    pub fn new(base_url: impl Into<String>, rest_base: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            rest_base,
        }
    }

    /// Canonical API root: normalized base URL followed by normalized REST base.
    pub fn api_root(&self) -> String {
        format!(
            "{}{}",
            normalize_base_url(&self.base_url),
            normalize_rest_base(self.rest_base.as_deref())
        )
    }
}

/// Strip a single trailing slash.
pub fn normalize_base_url(url: &str) -> String {
    url.strip_suffix('/').unwrap_or(url).to_owned()
}

/// Canonicalize a REST base to `/segment/.../`.
///
/// Blank input yields [`DEFAULT_REST_BASE`]. Otherwise leading slashes are
/// collapsed to one and a trailing slash is ensured. A bare `/` stays `/`.
pub fn normalize_rest_base(rest_base: Option<&str>) -> String {
    let Some(raw) = rest_base.filter(|r| !r.trim().is_empty()) else {
        return DEFAULT_REST_BASE.to_owned();
    };

    let trimmed = raw.trim_start_matches('/');
    if trimmed.is_empty() || trimmed.ends_with('/') {
        format!("/{trimmed}")
    } else {
        format!("/{trimmed}/")
    }
}

/// Join a route (e.g. `"users/me"`) onto a site's API root.
pub fn build_api_url(connection: &SiteConnection, route: &str) -> String {
    format!("{}{}", connection.api_root(), route.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_loses_single_trailing_slash() {
        assert_eq!(normalize_base_url("https://x.com/"), "https://x.com");
        assert_eq!(normalize_base_url("https://x.com"), "https://x.com");
        assert_eq!(normalize_base_url("https://x.com//"), "https://x.com/");
    }

    #[test]
    fn blank_rest_base_uses_default() {
        assert_eq!(normalize_rest_base(None), DEFAULT_REST_BASE);
        assert_eq!(normalize_rest_base(Some("")), DEFAULT_REST_BASE);
        assert_eq!(normalize_rest_base(Some("   ")), DEFAULT_REST_BASE);
    }

    #[test]
    fn rest_base_gets_single_leading_and_trailing_slash() {
        assert_eq!(normalize_rest_base(Some("wp-json/wp/v2")), "/wp-json/wp/v2/");
        assert_eq!(normalize_rest_base(Some("///wp-json/wp/v2/")), "/wp-json/wp/v2/");
        assert_eq!(normalize_rest_base(Some("/api/")), "/api/");
        assert_eq!(normalize_rest_base(Some("//")), "/");
        assert_eq!(normalize_rest_base(Some("index.php?rest_route=")), "/index.php?rest_route=/");
    }

    #[test]
    fn normalized_rest_base_shape_holds_for_many_inputs() {
        for input in ["a", "/a", "//a", "a/", "a//", "/a/b/c", "wp-json", "/", "//"] {
            let out = normalize_rest_base(Some(input));
            assert!(out.starts_with('/'), "{input:?} -> {out:?}");
            assert!(out.ends_with('/'), "{input:?} -> {out:?}");
            assert!(!out.starts_with("//"), "{input:?} -> {out:?}");
        }
    }

    #[test]
    fn api_url_concatenates_normalized_parts() {
        let conn = SiteConnection::new("https://x.com/", Some("/wp-json/wp/v2/".into()));
        assert_eq!(
            build_api_url(&conn, "/posts"),
            "https://x.com/wp-json/wp/v2/posts"
        );
    }

    #[test]
    fn api_url_strips_all_leading_route_slashes() {
        let conn = SiteConnection::new("https://x.com", None);
        assert_eq!(
            build_api_url(&conn, "///users/me"),
            "https://x.com/wp-json/wp/v2/users/me"
        );
    }

    #[test]
    fn connection_serializes_camel_case() {
        let conn = SiteConnection::new("https://x.com", None);
        let json = serde_json::to_string(&conn).unwrap_or_default();
        assert_eq!(json, r#"{"baseUrl":"https://x.com"}"#);
    }
}
