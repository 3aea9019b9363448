// ── Site profile model ──
//
// Metadata and credentials are persisted in different regions but only
// ever handed to callers together, as a `SiteProfile`.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use wpsites_api::{DEFAULT_REST_BASE, SiteCapabilities, SiteConnection, SiteCredentials};

use crate::error::CoreError;
use crate::kv::check_key;
use crate::store::secret_key;

/// Non-secret half of a site profile, stored in the metadata index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    /// Stable identifier, assigned once at creation.
    pub id: String,
    pub name: String,
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Normalized REST base (leading and trailing `/`).
    #[serde(default = "default_rest_base")]
    pub rest_base: String,
    /// Collections confirmed at last validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<SiteCapabilities>,
    /// Time of last successful validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,
}

fn default_rest_base() -> String {
    DEFAULT_REST_BASE.to_owned()
}

impl SiteMetadata {
    pub fn connection(&self) -> SiteConnection {
        SiteConnection::new(self.base_url.clone(), Some(self.rest_base.clone()))
    }
}

/// Metadata plus credentials: the unit callers read and write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteProfile {
    pub metadata: SiteMetadata,
    pub credentials: SiteCredentials,
}

impl SiteProfile {
    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn connection(&self) -> SiteConnection {
        self.metadata.connection()
    }
}

/// Create/update request. `id: None` creates a new site.
#[derive(Debug, Clone)]
pub struct SiteInput {
    pub id: Option<String>,
    pub name: String,
    pub base_url: String,
    pub rest_base: Option<String>,
    pub username: String,
    pub application_password: SecretString,
}

impl SiteInput {
    /// Reject blank required fields and ids the secret region cannot key.
    pub(crate) fn check(&self) -> Result<(), CoreError> {
        let blank = |field: &str| CoreError::Validation {
            field: field.into(),
            reason: "must not be empty".into(),
        };

        if let Some(id) = self.id.as_deref() {
            if id.trim().is_empty() {
                return Err(blank("id"));
            }
            if check_key(&secret_key(id)).is_err() {
                return Err(CoreError::Validation {
                    field: "id".into(),
                    reason: "may only contain ASCII letters, digits, '-' and '_'".into(),
                });
            }
        }
        if self.name.trim().is_empty() {
            return Err(blank("name"));
        }
        if self.base_url.trim().is_empty() {
            return Err(blank("base_url"));
        }
        if self.username.trim().is_empty() {
            return Err(blank("username"));
        }
        if self.application_password.expose_secret().trim().is_empty() {
            return Err(blank("application_password"));
        }
        Ok(())
    }
}

impl From<&SiteProfile> for SiteInput {
    /// Start an update from an existing profile.
    fn from(profile: &SiteProfile) -> Self {
        Self {
            id: Some(profile.metadata.id.clone()),
            name: profile.metadata.name.clone(),
            base_url: profile.metadata.base_url.clone(),
            rest_base: Some(profile.metadata.rest_base.clone()),
            username: profile.credentials.username.clone(),
            application_password: profile.credentials.application_password.clone(),
        }
    }
}
