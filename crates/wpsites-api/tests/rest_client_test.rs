#![allow(clippy::unwrap_used)]
// Integration tests for `RestClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wpsites_api::{
    Error, NewPost, PostStatus, RestClient, SiteCapabilities, SiteConnection, SiteCredentials,
    WpUser,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RestClient) {
    let server = MockServer::start().await;
    let client = RestClient::with_client(reqwest::Client::new());
    (server, client)
}

fn connection(server: &MockServer) -> SiteConnection {
    // Trailing slash on purpose: normalization must strip it.
    SiteConnection::new(format!("{}/", server.uri()), None)
}

fn creds() -> SiteCredentials {
    SiteCredentials::application_password("admin", "secret".to_owned())
}

/// URL of a local port with nothing listening on it.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

const ADMIN_SECRET_BASIC: &str = "Basic YWRtaW46c2VjcmV0";

fn me_body() -> serde_json::Value {
    json!({ "id": 1, "name": "Site Admin", "slug": "admin", "roles": ["administrator"] })
}

// ── fetch_json ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_json_sends_basic_auth_and_accept() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/users/me"))
        .and(header("authorization", ADMIN_SECRET_BASIC))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/wp-json/wp/v2/users/me", server.uri());
    let user: WpUser = client.fetch_json(&url, &creds()).await.unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.name, "Site Admin");
}

#[tokio::test]
async fn test_fetch_json_error_uses_body_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "incorrect_password",
            "message": "The provided password is an invalid application password.",
            "data": { "status": 401 }
        })))
        .mount(&server)
        .await;

    let url = format!("{}/wp-json/wp/v2/users/me", server.uri());
    let err = client.fetch_json::<WpUser>(&url, &creds()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "The provided password is an invalid application password."
    );
    assert!(err.is_auth_failure());
}

#[tokio::test]
async fn test_fetch_json_error_falls_back_to_status_line() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>fatal error</html>"))
        .mount(&server)
        .await;

    let url = format!("{}/wp-json/wp/v2/users/me", server.uri());
    let err = client.fetch_json::<WpUser>(&url, &creds()).await.unwrap_err();

    assert!(
        matches!(&err, Error::Api { status: 500, message } if message == "500 Internal Server Error"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_fetch_json_error_without_message_field_falls_back() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "code": "rest_no_route" })))
        .mount(&server)
        .await;

    let url = format!("{}/wp-json/wp/v2/users/me", server.uri());
    let err = client.fetch_json::<WpUser>(&url, &creds()).await.unwrap_err();

    assert_eq!(err.to_string(), "404 Not Found");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_fetch_json_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let url = format!("{}/wp-json/wp/v2/users/me", server.uri());
    let result = client.fetch_json::<WpUser>(&url, &creds()).await;

    assert!(
        matches!(result, Err(Error::Deserialization { ref body, .. }) if body == "not json"),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_json_invalid_url() {
    let client = RestClient::with_client(reqwest::Client::new());
    let result = client.fetch_json::<WpUser>("not a url", &creds()).await;
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}

#[tokio::test]
async fn test_fetch_json_connection_refused() {
    let url = format!("{}/wp-json/wp/v2/users/me", closed_port_url());

    let client = RestClient::with_client(reqwest::Client::new());
    let err = client.fetch_json::<WpUser>(&url, &creds()).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got: {err:?}");
    assert!(err.is_connection());
}

// ── validate_site_connection ────────────────────────────────────────

#[tokio::test]
async fn test_validate_reports_user_and_assumed_capabilities() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .expect(1)
        .mount(&server)
        .await;

    let validation = client
        .validate_site_connection(&connection(&server), &creds())
        .await
        .unwrap();

    assert_eq!(validation.user.slug, "admin");
    // Capabilities are assumed, not probed: only users/me was requested.
    assert_eq!(validation.capabilities, SiteCapabilities::assumed());
}

#[tokio::test]
async fn test_validate_honors_custom_rest_base() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/blog/wp-json/wp/v2/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(me_body()))
        .mount(&server)
        .await;

    let conn = SiteConnection::new(server.uri(), Some("blog/wp-json/wp/v2".into()));
    let validation = client.validate_site_connection(&conn, &creds()).await.unwrap();
    assert_eq!(validation.user.id, 1);
}

#[tokio::test]
async fn test_validate_propagates_http_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "message": "Sorry, you are not allowed." })),
        )
        .mount(&server)
        .await;

    let err = client
        .validate_site_connection(&connection(&server), &creds())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Sorry, you are not allowed.");
    assert_eq!(err.status(), Some(403));
}

// ── Content ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_post() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(header("authorization", ADMIN_SECRET_BASIC))
        .and(body_json(json!({
            "title": "Launch day",
            "content": "<p>We shipped.</p>",
            "status": "publish",
            "categories": [3]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 42,
            "status": "publish",
            "slug": "launch-day",
            "link": "https://example.com/launch-day/",
            "title": { "rendered": "Launch day" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let post = NewPost {
        title: "Launch day".into(),
        content: "<p>We shipped.</p>".into(),
        status: PostStatus::Publish,
        categories: vec![3],
        ..NewPost::default()
    };
    let created = client
        .create_post(&connection(&server), &creds(), &post)
        .await
        .unwrap();

    assert_eq!(created.id, 42);
    assert_eq!(created.link, "https://example.com/launch-day/");
    assert_eq!(created.title.rendered, "Launch day");
}

#[tokio::test]
async fn test_list_categories_and_tags() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/categories"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Uncategorized", "slug": "uncategorized", "count": 4 }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/tags"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 7, "name": "Rust", "slug": "rust" },
            { "id": 8, "name": "Release", "slug": "release", "count": 2 }
        ])))
        .mount(&server)
        .await;

    let conn = connection(&server);
    let categories = client.list_categories(&conn, &creds()).await.unwrap();
    let tags = client.list_tags(&conn, &creds()).await.unwrap();

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].count, 4);
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].count, 0);
    assert_eq!(tags[1].slug, "release");
}

#[tokio::test]
async fn test_list_categories_with_plain_permalink_rest_base() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("rest_route", "/wp/v2/categories"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Uncategorized", "slug": "uncategorized", "count": 4 }
        ])))
        .mount(&server)
        .await;

    let conn = SiteConnection::new(server.uri(), Some("/index.php?rest_route=/wp/v2/".into()));
    let categories = client.list_categories(&conn, &creds()).await.unwrap();

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].slug, "uncategorized");
}
