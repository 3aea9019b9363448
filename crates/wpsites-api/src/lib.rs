// wpsites-api: Async Rust client for the WordPress REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod routes;
pub mod transport;

pub use auth::{AuthStrategy, SiteCredentials, build_auth_header};
pub use client::RestClient;
pub use error::Error;
pub use models::{
    NewPost, PostStatus, Rendered, SiteCapabilities, SiteValidation, WpPost, WpTerm, WpUser,
};
pub use routes::{
    DEFAULT_REST_BASE, SiteConnection, build_api_url, normalize_base_url, normalize_rest_base,
};
pub use transport::{TlsMode, TransportConfig};
