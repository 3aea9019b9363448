// OS credential store (Keychain, Credential Manager, Secret Service).

use tokio::task;

use super::{KeyValueStore, StorageError, check_key};

/// Default keyring service name.
pub const DEFAULT_SERVICE: &str = "wpsites";

/// Stores each key as one keyring entry: service = `service`, account = key.
///
/// The `keyring` API is blocking, so every call runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE)
    }
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    async fn with_entry<T, F>(&self, key: &str, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&keyring::Entry) -> Result<T, keyring::Error> + Send + 'static,
    {
        check_key(key)?;
        let service = self.service.clone();
        let account = key.to_owned();

        task::spawn_blocking(move || {
            let entry = keyring::Entry::new(&service, &account)?;
            op(&entry)
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
        .map_err(StorageError::from)
    }
}

impl KeyValueStore for KeyringStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.with_entry(key, |entry| match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        })
        .await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.with_entry(key, move |entry| entry.set_password(&value))
            .await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.with_entry(key, |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_key_fails_before_touching_keyring() {
        let store = KeyringStore::default();
        assert_eq!(store.service(), "wpsites");
        let result = store.get("no/slashes").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
