use thiserror::Error;

/// Top-level error type for the `imou-api` crate.
///
/// Covers every failure mode of a cloud call: missing account
/// configuration, login, transport, envelope decoding, and vendor-reported
/// failures. `imou-core` maps these into domain diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// Account credentials are absent or incomplete. Raised before any
    /// network I/O is attempted.
    #[error("Imou API not ready: account credentials are not configured")]
    NotReady,

    // ── Authentication ──────────────────────────────────────────────
    /// The `accessToken` exchange returned a non-zero vendor code.
    #[error("Authentication failed ({code}): {message}")]
    Authentication { code: String, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a status other than 200.
    #[error("Request failed (HTTP {status}): {body}")]
    Http { status: u16, body: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Data ────────────────────────────────────────────────────────
    /// The response envelope was missing or not valid JSON, with the raw
    /// body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Vendor ──────────────────────────────────────────────────────
    /// Envelope decoded but `result.code != "0"`.
    #[error("Imou API error ({code}): {message}")]
    Api { code: String, message: String },

    /// The SD card reported a status other than `normal`. The status
    /// vocabulary is open-ended, so the literal value is surfaced as-is.
    #[error("{status}")]
    SdCard { status: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying
    /// at a higher level.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Extract the vendor result code, if available.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } | Self::Authentication { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sd_card_error_displays_literal_status() {
        let err = Error::SdCard {
            status: "abnormal".into(),
        };
        assert_eq!(err.to_string(), "abnormal");
    }

    #[test]
    fn api_error_code_exposed_for_vendor_failures() {
        let err = Error::Api {
            code: "TK1002".into(),
            message: "token invalid".into(),
        };
        assert_eq!(err.api_error_code(), Some("TK1002"));
        assert!(!err.is_transient());

        let http = Error::Http {
            status: 503,
            body: String::new(),
        };
        assert_eq!(http.api_error_code(), None);
        assert!(http.is_transient());
    }
}
