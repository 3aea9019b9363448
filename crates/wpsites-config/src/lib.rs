//! Shared configuration for wpsites.
//!
//! TOML file + `WPSITES_` environment overrides, platform paths, and the
//! translation into a transport config and storage regions for
//! `wpsites_core::SiteStore`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wpsites_core::{
    FileStore, KeyValueStore, KeyringStore, StorageError, TlsMode, TransportConfig,
};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Request and output defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Where site metadata and credentials live.
    #[serde(default)]
    pub storage: Storage,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// PEM file with an extra root certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            ca_cert: None,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// Backend for the credential region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretBackend {
    /// OS keyring (Keychain, Credential Manager, Secret Service).
    #[default]
    Keyring,
    /// Owner-only JSON files under `{data_dir}/secrets`.
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Storage {
    /// Override for the data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub secret_backend: SecretBackend,

    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            data_dir: None,
            secret_backend: SecretBackend::default(),
            keyring_service: default_keyring_service(),
        }
    }
}

fn default_keyring_service() -> String {
    "wpsites".into()
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "wpsites", "wpsites")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default data directory (site index, file-backed secrets).
pub fn default_data_dir() -> PathBuf {
    project_dirs().map_or_else(|| dirs_fallback().join("data"), |dirs| {
        dirs.data_dir().to_path_buf()
    })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("wpsites");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from a specific file + environment.
///
/// Env vars use `__` between section and key: `WPSITES_STORAGE__DATA_DIR`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("WPSITES_").split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.defaults.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "defaults.timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        if self.storage.keyring_service.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "storage.keyring_service".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Transport settings. `insecure` wins over `ca_cert`.
    pub fn transport_config(&self) -> TransportConfig {
        let tls = if self.defaults.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.defaults.ca_cert {
            TlsMode::CustomCa(ca_path.clone())
        } else {
            TlsMode::System
        };

        TransportConfig {
            tls,
            timeout: Duration::from_secs(self.defaults.timeout),
        }
    }

    /// Metadata region: `{data_dir}`.
    pub fn metadata_store(&self) -> FileStore {
        FileStore::new(self.data_dir())
    }

    /// File-backed secret region: `{data_dir}/secrets`.
    pub fn file_secret_store(&self) -> FileStore {
        FileStore::new(self.data_dir().join("secrets"))
    }

    pub fn keyring_store(&self) -> KeyringStore {
        KeyringStore::new(self.storage.keyring_service.clone())
    }

    /// Secret region for the configured backend.
    pub fn secret_store(&self) -> SecretRegion {
        match self.storage.secret_backend {
            SecretBackend::Keyring => SecretRegion::Keyring(self.keyring_store()),
            SecretBackend::File => SecretRegion::File(self.file_secret_store()),
        }
    }
}

// ── Secret region ───────────────────────────────────────────────────

/// Credential region chosen at runtime from [`SecretBackend`].
#[derive(Debug, Clone)]
pub enum SecretRegion {
    Keyring(KeyringStore),
    File(FileStore),
}

impl SecretRegion {
    /// Human-readable location, for `config show`.
    pub fn describe(&self) -> String {
        match self {
            Self::Keyring(store) => format!("keyring (service '{}')", store.service()),
            Self::File(store) => format!("files in {}", store.dir().display()),
        }
    }
}

impl KeyValueStore for SecretRegion {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            Self::Keyring(store) => store.get(key).await,
            Self::File(store) => store.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        match self {
            Self::Keyring(store) => store.set(key, value).await,
            Self::File(store) => store.set(key, value).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self {
            Self::Keyring(store) => store.delete(key).await,
            Self::File(store) => store.delete(key).await,
        }
    }
}
