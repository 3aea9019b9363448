// One JSON file per key under a directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{KeyValueStore, StorageError, check_key};

/// Directory-backed store: `{dir}/{key}.json`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// single key is never observed half-written. The directory is created on
/// first write. On Unix, files are created owner-only (0600).
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        check_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!("{key}.json.tmp"));

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&tmp, value).await?;
        restrict_permissions(&tmp).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(path = %path.display(), "wrote storage file");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("nested"));

        assert_eq!(store.get("sites").await.unwrap(), None);

        store.set("sites", "[1,2]".into()).await.unwrap();
        assert_eq!(store.get("sites").await.unwrap().as_deref(), Some("[1,2]"));
        assert!(tmp.path().join("nested/sites.json").exists());
        assert!(!tmp.path().join("nested/sites.json.tmp").exists());

        store.set("sites", "[]".into()).await.unwrap();
        assert_eq!(store.get("sites").await.unwrap().as_deref(), Some("[]"));

        store.delete("sites").await.unwrap();
        assert_eq!(store.get("sites").await.unwrap(), None);
        store.delete("sites").await.unwrap();
    }

    #[tokio::test]
    async fn rejects_keys_with_path_separators() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        let result = store.set("../escape", "x".into()).await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
        assert!(!tmp.path().parent().unwrap().join("escape.json").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        store.set("site-secret-abc", "{}".into()).await.unwrap();

        let mode = std::fs::metadata(tmp.path().join("site-secret-abc.json"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
