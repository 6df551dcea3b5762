//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use imou_config::ConfigError;
use imou_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const DEVICE: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Imou cloud")]
    #[diagnostic(
        code(imou::connection_failed),
        help(
            "Check network access and the data center setting.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(imou::timeout),
        help("Increase the timeout with --timeout or check connectivity.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed ({code}): {message}")]
    #[diagnostic(
        code(imou::auth_failed),
        help(
            "Verify the app id, app secret, and data center of the profile.\n\
             Run: imou config set-secret"
        )
    )]
    AuthFailed { code: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(imou::no_credentials),
        help(
            "Set them with: imou config set app_id <ID> and imou config set-secret\n\
             Or set IMOU_APP_ID and IMOU_APP_SECRET."
        )
    )]
    NoCredentials { profile: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("SD card is not usable: {status}")]
    #[diagnostic(
        code(imou::sd_card),
        help("The card must report 'normal' before its capacity can be read.")
    )]
    SdCard { status: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error ({code}): {message}")]
    #[diagnostic(code(imou::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(imou::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(imou::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: imou config set app_id <ID>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No configuration found")]
    #[diagnostic(
        code(imou::no_config),
        help(
            "Pass --app-id and --app-secret, or create a profile.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(imou::config))]
    Config(ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(imou::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::SdCard { .. } => exit_code::DEVICE,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotConfigured => CliError::NoCredentials {
                profile: "current".into(),
            },
            CoreError::AuthenticationFailed { code, message } => {
                CliError::AuthFailed { code, message }
            }
            CoreError::ConnectionFailed { reason } => CliError::ConnectionFailed { reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::StorageUnavailable { status } => CliError::SdCard { status },
            CoreError::Api {
                message,
                code,
                status,
            } => CliError::ApiError {
                code: code
                    .or_else(|| status.map(|s| format!("HTTP {s}")))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

impl From<imou_api::Error> for CliError {
    fn from(err: imou_api::Error) -> Self {
        CoreError::from(err).into()
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { profile } => CliError::ProfileNotFound {
                name: profile,
                available: "run `imou config show` to list them".into(),
            },
            other => CliError::Config(other),
        }
    }
}
