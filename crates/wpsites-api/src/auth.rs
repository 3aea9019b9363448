use std::fmt;

use base64::{Engine as _, engine::general_purpose};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which authentication scheme a credential record uses.
///
/// Serialized as a kebab-case tag (`"application-password"`). Only one
/// scheme exists today; new variants slot in here without changing the
/// shape of [`SiteCredentials`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum AuthStrategy {
    /// WordPress application password sent as HTTP Basic auth.
    ApplicationPassword,
}

impl fmt::Display for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplicationPassword => f.write_str("application-password"),
        }
    }
}

/// Credentials for one WordPress site.
///
/// The application password never appears in `Debug` output. It is only
/// exposed when building the `Authorization` header or when the record is
/// serialized into the secret region.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteCredentials {
    pub username: String,
    #[serde(
        serialize_with = "serialize_secret",
        deserialize_with = "deserialize_secret"
    )]
    pub application_password: SecretString,
    pub auth_strategy: AuthStrategy,
}

impl SiteCredentials {
    /// Build an application-password credential.
    pub fn application_password(
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            username: username.into(),
            application_password: password.into(),
            auth_strategy: AuthStrategy::ApplicationPassword,
        }
    }
}

impl PartialEq for SiteCredentials {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
            && self.auth_strategy == other.auth_strategy
            && self.application_password.expose_secret()
                == other.application_password.expose_secret()
    }
}

impl Eq for SiteCredentials {}

fn serialize_secret<S: Serializer>(secret: &SecretString, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(secret.expose_secret())
}

fn deserialize_secret<'de, D: Deserializer<'de>>(d: D) -> Result<SecretString, D::Error> {
    String::deserialize(d).map(SecretString::from)
}

/// Build the `Authorization` header value for a credential record.
///
/// `"Basic " + base64("username:password")`, standard alphabet with padding.
pub fn build_auth_header(credentials: &SiteCredentials) -> String {
    match credentials.auth_strategy {
        AuthStrategy::ApplicationPassword => {
            let raw = format!(
                "{}:{}",
                credentials.username,
                credentials.application_password.expose_secret()
            );
            format!("Basic {}", general_purpose::STANDARD.encode(raw))
        }
    }
}
