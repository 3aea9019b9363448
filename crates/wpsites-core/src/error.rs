use thiserror::Error;

use crate::kv::StorageError;

/// Errors surfaced by the site store.
///
/// REST failures pass through untouched so their message text reaches the
/// user exactly as the site reported it.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Validation call or content request failed.
    #[error(transparent)]
    Api(#[from] wpsites_api::Error),

    /// A storage backend failed to read, write, or delete.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("site '{id}' not found")]
    NotFound { id: String },

    /// Caller-supplied input rejected before any network call.
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
