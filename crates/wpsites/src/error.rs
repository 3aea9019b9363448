//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use wpsites_config::ConfigError;
use wpsites_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const CONFIG: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the site: {message}")]
    #[diagnostic(
        code(wpsites::connection_failed),
        help(
            "Check the site URL and that the REST API is reachable.\n\
             For self-signed staging certificates, retry with --insecure (-k)."
        )
    )]
    ConnectionFailed { message: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("The site rejected the credentials: {message}")]
    #[diagnostic(
        code(wpsites::auth_failed),
        help(
            "Create an application password under Users > Profile in wp-admin,\n\
             then run: wpsites sites update <ID> --prompt-password"
        )
    )]
    AuthFailed { message: String },

    // ── Site API ─────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(wpsites::api_error))]
    ApiError { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Site '{id}' not found")]
    #[diagnostic(
        code(wpsites::not_found),
        help("Run: wpsites sites list to see registered sites")
    )]
    NotFound { id: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wpsites::validation))]
    Validation { field: String, reason: String },

    // ── Storage / Configuration ──────────────────────────────────────

    #[error("Storage failed: {message}")]
    #[diagnostic(
        code(wpsites::storage),
        help(
            "If the OS keyring is unavailable, switch to file-backed secrets:\n\
             set storage.secret_backend = \"file\" in the config file."
        )
    )]
    Storage { message: String },

    #[error(transparent)]
    #[diagnostic(
        code(wpsites::config),
        help("Inspect the config with: wpsites config show")
    )]
    Config(#[from] ConfigError),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(api) => {
                let message = api.to_string();
                if api.is_auth_failure() {
                    CliError::AuthFailed { message }
                } else if api.is_connection() {
                    CliError::ConnectionFailed { message }
                } else {
                    CliError::ApiError { message }
                }
            }

            CoreError::NotFound { id } => CliError::NotFound { id },

            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::Storage(e) => CliError::Storage {
                message: e.to_string(),
            },

            CoreError::Serialization(e) => CliError::Storage {
                message: e.to_string(),
            },
        }
    }
}
