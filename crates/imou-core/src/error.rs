// ── Core error types ──
//
// User-facing errors from imou-core. Consumers never match on HTTP status
// codes or envelope parse failures directly; the `From<imou_api::Error>`
// impl folds transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Account errors ───────────────────────────────────────────────
    #[error("Account is not configured: app id and app secret are required")]
    NotConfigured,

    #[error("Authentication failed (code {code}): {message}")]
    AuthenticationFailed { code: String, message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the Imou cloud: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Request to the Imou cloud timed out")]
    Timeout,

    // ── Device errors ────────────────────────────────────────────────
    #[error("SD card is not usable: {status}")]
    StorageUnavailable { status: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Vendor result code, e.g. `"DV1003"`.
        code: Option<String>,
        /// HTTP status code (if the failure was at the HTTP layer).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Vendor result code, when the cloud supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::AuthenticationFailed { code, .. } => Some(code),
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<imou_api::Error> for CoreError {
    fn from(err: imou_api::Error) -> Self {
        match err {
            imou_api::Error::NotReady => CoreError::NotConfigured,
            imou_api::Error::Authentication { code, message } => {
                CoreError::AuthenticationFailed { code, message }
            }
            imou_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            imou_api::Error::Http { status, body } => CoreError::Api {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    format!("HTTP {status}: {body}")
                },
                code: None,
                status: Some(status),
            },
            imou_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            imou_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                reason: format!("TLS error: {msg}"),
            },
            imou_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            imou_api::Error::Api { code, message } => CoreError::Api {
                message,
                code: Some(code),
                status: None,
            },
            imou_api::Error::SdCard { status } => CoreError::StorageUnavailable { status },
        }
    }
}
