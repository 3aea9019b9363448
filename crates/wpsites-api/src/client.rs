// Async HTTP client for the WordPress REST API.
//
// Base path: {site}{rest_base}, default /wp-json/wp/v2/
// Auth: HTTP Basic with an application password

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::{SiteCredentials, build_auth_header};
use crate::error::Error;
use crate::models::{NewPost, SiteCapabilities, SiteValidation, WpPost, WpTerm, WpUser};
use crate::routes::{SiteConnection, build_api_url};
use crate::transport::TransportConfig;

// ── Error response shape from the REST API ───────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for WordPress sites.
///
/// Stateless with respect to sites: every call takes the target URL (or
/// connection) and the credentials, so one client serves every stored
/// profile. The HTTP transport is injected, which lets tests point it at a
/// mock server.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
}

impl RestClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client with the default transport for `config`.
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    /// Authenticated GET, parsing the JSON body as `T`.
    ///
    /// The body shape is trusted; there is no schema validation beyond
    /// what deserializing into `T` implies.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        credentials: &SiteCredentials,
    ) -> Result<T, Error> {
        let url = Url::parse(url)?;
        debug!("GET {url}");

        let resp = self
            .http
            .get(url)
            .headers(auth_headers(credentials)?)
            .send()
            .await?;
        handle_response(resp).await
    }

    /// Authenticated POST with a JSON body, parsing the JSON response as `T`.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        url: &str,
        credentials: &SiteCredentials,
        body: &B,
    ) -> Result<T, Error> {
        let url = Url::parse(url)?;
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .headers(auth_headers(credentials)?)
            .json(body)
            .send()
            .await?;
        handle_response(resp).await
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Confirm the site is reachable and accepts the credentials.
    ///
    /// Fetches `users/me`. Capabilities are reported as
    /// [`SiteCapabilities::assumed`]: the categories, tags and media
    /// endpoints are not probed individually.
    pub async fn validate_site_connection(
        &self,
        connection: &SiteConnection,
        credentials: &SiteCredentials,
    ) -> Result<SiteValidation, Error> {
        let url = build_api_url(connection, "users/me");
        let user: WpUser = self.fetch_json(&url, credentials).await?;
        debug!(user = %user.slug, "site connection validated");

        Ok(SiteValidation {
            user,
            capabilities: SiteCapabilities::assumed(),
        })
    }

    // ── Content ──────────────────────────────────────────────────────

    /// Create a post. `post.status` decides whether it goes live.
    pub async fn create_post(
        &self,
        connection: &SiteConnection,
        credentials: &SiteCredentials,
        post: &NewPost,
    ) -> Result<WpPost, Error> {
        let url = build_api_url(connection, "posts");
        self.post_json(&url, credentials, post).await
    }

    /// First page (up to 100) of categories.
    pub async fn list_categories(
        &self,
        connection: &SiteConnection,
        credentials: &SiteCredentials,
    ) -> Result<Vec<WpTerm>, Error> {
        let url = first_page_url(connection, "categories")?;
        self.fetch_json(url.as_str(), credentials).await
    }

    /// First page (up to 100) of tags.
    pub async fn list_tags(
        &self,
        connection: &SiteConnection,
        credentials: &SiteCredentials,
    ) -> Result<Vec<WpTerm>, Error> {
        let url = first_page_url(connection, "tags")?;
        self.fetch_json(url.as_str(), credentials).await
    }
}

// ── Request/response helpers ─────────────────────────────────────────

/// Collection route with `per_page=100`. Appended as a query pair so a
/// REST base that already carries a query (`?rest_route=`) stays intact.
fn first_page_url(connection: &SiteConnection, route: &str) -> Result<Url, Error> {
    let mut url = Url::parse(&build_api_url(connection, route))?;
    url.query_pairs_mut().append_pair("per_page", "100");
    Ok(url)
}

fn auth_headers(credentials: &SiteCredentials) -> Result<HeaderMap, Error> {
    let mut auth = HeaderValue::from_str(&build_auth_header(credentials))
        .map_err(|e| Error::InvalidHeader(e.to_string()))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorResponse>(&raw)
        .ok()
        .and_then(|err| err.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.to_string());

    debug!(status = status.as_u16(), %message, "request failed");
    Error::Api {
        status: status.as_u16(),
        message,
    }
}
