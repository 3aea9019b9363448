// ── Key-value storage regions ──
//
// The site store keeps metadata and credentials in two independent regions.
// Both speak this trait; which backend sits behind each is the caller's
// choice (the CLI pairs a `FileStore` with a `KeyringStore`).

mod file;
mod memory;
mod os_keyring;

use std::future::Future;

use thiserror::Error;

pub use self::file::FileStore;
pub use self::memory::MemoryStore;
pub use self::os_keyring::KeyringStore;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Key contains characters the backend cannot address.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// A blocking backend call panicked or was cancelled.
    #[error("storage task failed: {0}")]
    Task(String),
}

/// String-valued async key-value store.
///
/// Values are opaque to the backend (the site store writes JSON).
/// Deleting a missing key succeeds.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Keys are restricted to `[A-Za-z0-9_-]` so every backend can address
/// them without escaping (file names, keyring accounts).
pub(crate) fn check_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_site_keys() {
        assert!(check_key("sites").is_ok());
        assert!(check_key("site-secret-550e8400-e29b-41d4-a716-446655440000").is_ok());
    }

    #[test]
    fn rejects_path_like_keys() {
        for key in ["", "../etc/passwd", "a/b", "a.b", "sp ace"] {
            assert!(
                matches!(check_key(key), Err(StorageError::InvalidKey(_))),
                "{key:?} should be rejected"
            );
        }
    }
}
