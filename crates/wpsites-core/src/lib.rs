// wpsites-core: site profile storage and validation for wpsites
//
// Re-exports the API types callers need so binaries depend on this crate
// alone for the data model.

pub mod error;
pub mod kv;
pub mod model;
pub mod store;

pub use error::CoreError;
pub use kv::{FileStore, KeyValueStore, KeyringStore, MemoryStore, StorageError};
pub use model::{SiteInput, SiteMetadata, SiteProfile};
pub use store::{SECRET_KEY_PREFIX, SITES_INDEX_KEY, SiteStore, secret_key};

pub use wpsites_api::Error as ApiError;
pub use wpsites_api::{
    AuthStrategy, NewPost, PostStatus, RestClient, SiteCapabilities, SiteConnection,
    SiteCredentials, TlsMode, TransportConfig, WpPost, WpTerm, WpUser,
};
