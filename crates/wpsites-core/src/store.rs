// ── Site store ──
//
// Pairs the metadata index with per-site credential records and gates every
// write behind a live validation call.
//
// Layout:
//   metadata region: "sites"              -> JSON array of SiteMetadata
//   secret region:   "site-secret-{id}"   -> JSON SiteCredentials
//
// The two regions are written one after the other with no rollback; a
// failure between the writes leaves them out of step. Readers drop any
// entry whose other half is missing or unreadable.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use wpsites_api::{
    RestClient, SiteConnection, SiteCredentials, normalize_base_url, normalize_rest_base,
};

use crate::error::CoreError;
use crate::kv::KeyValueStore;
use crate::model::{SiteInput, SiteMetadata, SiteProfile};

/// Metadata-region key holding the ordered site index.
pub const SITES_INDEX_KEY: &str = "sites";

/// Secret-region key prefix; the site id follows.
pub const SECRET_KEY_PREFIX: &str = "site-secret-";

/// Secret-region key for a site's credentials.
pub fn secret_key(id: &str) -> String {
    format!("{SECRET_KEY_PREFIX}{id}")
}

/// CRUD over site profiles.
///
/// `M` holds non-secret metadata, `S` holds credentials. Credentials are
/// never written to `M`.
pub struct SiteStore<M, S> {
    client: RestClient,
    metadata: M,
    secrets: S,
}

impl<M: KeyValueStore, S: KeyValueStore> SiteStore<M, S> {
    pub fn new(client: RestClient, metadata: M, secrets: S) -> Self {
        Self {
            client,
            metadata,
            secrets,
        }
    }

    /// The REST client used for validation.
    pub fn client(&self) -> &RestClient {
        &self.client
    }

    pub fn metadata_region(&self) -> &M {
        &self.metadata
    }

    pub fn secret_region(&self) -> &S {
        &self.secrets
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Every site whose metadata and credentials are both present, in
    /// index order.
    pub async fn list_sites(&self) -> Result<Vec<SiteProfile>, CoreError> {
        let index = self.load_index().await?;
        let mut profiles = Vec::with_capacity(index.len());

        for metadata in index {
            match self.load_credentials(&metadata.id).await? {
                Some(credentials) => profiles.push(SiteProfile {
                    metadata,
                    credentials,
                }),
                None => warn!(site_id = %metadata.id, "skipping site without credentials"),
            }
        }

        Ok(profiles)
    }

    pub async fn get_site(&self, id: &str) -> Result<Option<SiteProfile>, CoreError> {
        let index = self.load_index().await?;
        let Some(metadata) = index.into_iter().find(|m| m.id == id) else {
            return Ok(None);
        };

        Ok(self
            .load_credentials(id)
            .await?
            .map(|credentials| SiteProfile {
                metadata,
                credentials,
            }))
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Validate `input` against the live site, then persist it.
    ///
    /// Creates a site when `input.id` is `None`, otherwise overwrites the
    /// site with that id. Nothing is written unless validation succeeds.
    pub async fn upsert_site(&self, input: SiteInput) -> Result<SiteProfile, CoreError> {
        input.check()?;

        let id = input.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let base_url = normalize_base_url(input.base_url.trim());
        let rest_base = normalize_rest_base(input.rest_base.as_deref());
        let credentials =
            SiteCredentials::application_password(input.username, input.application_password);

        let connection = SiteConnection::new(base_url.clone(), Some(rest_base.clone()));
        let validation = self
            .client
            .validate_site_connection(&connection, &credentials)
            .await?;

        let metadata = SiteMetadata {
            id,
            name: input.name,
            base_url,
            rest_base,
            capabilities: Some(validation.capabilities),
            validated_at: Some(Utc::now()),
        };

        self.put_metadata(&metadata).await?;
        self.save_credentials(&metadata.id, &credentials).await?;

        info!(
            site_id = %metadata.id,
            user = %validation.user.slug,
            "site saved"
        );

        Ok(SiteProfile {
            metadata,
            credentials,
        })
    }

    /// Remove a site's metadata and credentials.
    ///
    /// Both removals are attempted even if the first fails; the first error
    /// is returned. Removing an unknown id is a no-op.
    pub async fn remove_site(&self, id: &str) -> Result<(), CoreError> {
        let index_result = self.remove_metadata(id).await;
        let secret_result = self
            .secrets
            .delete(&secret_key(id))
            .await
            .map_err(CoreError::from);

        if index_result.is_ok() && secret_result.is_ok() {
            info!(site_id = %id, "site removed");
        }
        index_result.and(secret_result)
    }

    /// Re-run validation with the stored credentials and restamp
    /// `validated_at` / `capabilities`.
    ///
    /// Only the metadata is rewritten. On failure storage is untouched.
    pub async fn revalidate_site(&self, id: &str) -> Result<SiteProfile, CoreError> {
        let mut profile = self
            .get_site(id)
            .await?
            .ok_or_else(|| CoreError::NotFound { id: id.to_owned() })?;

        let validation = self
            .client
            .validate_site_connection(&profile.connection(), &profile.credentials)
            .await?;

        profile.metadata.capabilities = Some(validation.capabilities);
        profile.metadata.validated_at = Some(Utc::now());
        self.put_metadata(&profile.metadata).await?;

        info!(site_id = %id, user = %validation.user.slug, "site revalidated");
        Ok(profile)
    }

    // ── Metadata region ──────────────────────────────────────────────

    /// Load the index. Missing or corrupt index reads as empty.
    async fn load_index(&self) -> Result<Vec<SiteMetadata>, CoreError> {
        let Some(raw) = self.metadata.get(SITES_INDEX_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(index) => Ok(index),
            Err(e) => {
                warn!(error = %e, "site index is corrupt; treating as empty");
                Ok(Vec::new())
            }
        }
    }

    async fn save_index(&self, index: &[SiteMetadata]) -> Result<(), CoreError> {
        let raw = serde_json::to_string(index)?;
        self.metadata.set(SITES_INDEX_KEY, raw).await?;
        Ok(())
    }

    /// Insert or replace by id. New sites go to the end.
    async fn put_metadata(&self, metadata: &SiteMetadata) -> Result<(), CoreError> {
        let mut index = self.load_index().await?;
        match index.iter_mut().find(|m| m.id == metadata.id) {
            Some(existing) => existing.clone_from(metadata),
            None => index.push(metadata.clone()),
        }
        self.save_index(&index).await
    }

    async fn remove_metadata(&self, id: &str) -> Result<(), CoreError> {
        let mut index = self.load_index().await?;
        let before = index.len();
        index.retain(|m| m.id != id);
        if index.len() == before {
            return Ok(());
        }
        self.save_index(&index).await
    }

    // ── Secret region ────────────────────────────────────────────────

    /// Missing or corrupt credentials read as `None`.
    async fn load_credentials(&self, id: &str) -> Result<Option<SiteCredentials>, CoreError> {
        let Some(raw) = self.secrets.get(&secret_key(id)).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(credentials) => Ok(Some(credentials)),
            Err(e) => {
                // Position only: the message can quote secret material.
                warn!(
                    site_id = %id,
                    line = e.line(),
                    column = e.column(),
                    "credential record is corrupt; ignoring"
                );
                Ok(None)
            }
        }
    }

    async fn save_credentials(
        &self,
        id: &str,
        credentials: &SiteCredentials,
    ) -> Result<(), CoreError> {
        let raw = serde_json::to_string(credentials)?;
        self.secrets.set(&secret_key(id), raw).await?;
        Ok(())
    }
}
