// Imou cloud HTTP client
//
// Wraps `reqwest::Client` with request signing, the `{ result: {...} }`
// envelope, and token injection. Endpoint groups (devices, alarms, media,
// storage, settings) are inherent methods in sibling modules so this file
// stays focused on transport mechanics.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, trace};
use url::Url;

use crate::auth::Credentials;
use crate::envelope;
use crate::error::Error;
use crate::sign::{Params, SignedEnvelope, params};
use crate::token::{TokenManager, TokenState};
use crate::transport::TransportConfig;

/// Fixed channel used by every per-device operation.
pub(crate) const DEFAULT_CHANNEL: &str = "0";

// ── AccountStatus ────────────────────────────────────────────────────

/// Account health as observed by the client, published over a `watch`
/// channel so the host can mirror it onto its own entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccountStatus {
    #[default]
    Unknown,
    Online,
    Error {
        code: Option<String>,
        message: String,
    },
}

impl AccountStatus {
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

// ── ImouClient ───────────────────────────────────────────────────────

/// Signed-request client for one Imou developer account.
///
/// Owns its access token; nothing is shared between client instances.
/// Every call signs a fresh envelope, POSTs it to
/// `<data-center-url><operation>`, and unwraps the result envelope.
pub struct ImouClient {
    http: reqwest::Client,
    credentials: Arc<Credentials>,
    base_url: Url,
    tokens: TokenManager,
    status: watch::Sender<AccountStatus>,
}

impl ImouClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(credentials: Arc<Credentials>, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, credentials))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, credentials: Arc<Credentials>) -> Self {
        let base_url = credentials.data_center.base_url();
        let (status, _) = watch::channel(AccountStatus::Unknown);
        Self {
            http,
            credentials,
            base_url,
            tokens: TokenManager::new(),
            status,
        }
    }

    /// The account credentials this client signs with.
    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The data-center base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Subscribe to account status transitions.
    pub fn status(&self) -> watch::Receiver<AccountStatus> {
        self.status.subscribe()
    }

    /// Current account status.
    pub fn current_status(&self) -> AccountStatus {
        self.status.borrow().clone()
    }

    pub(crate) fn set_status(&self, status: AccountStatus) {
        self.status.send_replace(status);
    }

    pub(crate) fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn token_state(&self) -> TokenState {
        self.tokens.state()
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn ensure_ready(&self) -> Result<(), Error> {
        if self.credentials.is_complete() {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    /// Sign `params`, POST them to `operation`, and return the raw body.
    ///
    /// Anything other than HTTP 200 is an [`Error::Http`] carrying the body
    /// verbatim. No retries.
    pub(crate) async fn post_signed(&self, operation: &str, params: Params) -> Result<String, Error> {
        self.ensure_ready()?;
        let url = self.base_url.join(operation)?;
        let envelope = SignedEnvelope::new(params, &self.credentials);

        debug!(operation, request_id = %envelope.id, "POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(&envelope)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status != reqwest::StatusCode::OK {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        trace!(operation, bytes = body.len(), "response received");
        Ok(body)
    }

    /// Signed call without a token (only `accessToken` uses this).
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        params: Params,
    ) -> Result<T, Error> {
        let body = self.post_signed(operation, params).await?;
        envelope::decode(&body)
    }

    /// Signed call with the account token merged into `params`.
    pub(crate) async fn call_authed<T: DeserializeOwned>(
        &self,
        operation: &str,
        mut params: Params,
    ) -> Result<T, Error> {
        self.ensure_ready()?;
        let token = self.access_token().await?;
        params.insert("token".into(), Value::String(token.as_str().to_owned()));
        self.call(operation, params).await
    }

    /// Authenticated call scoped to a single device.
    pub(crate) async fn device_call<T: DeserializeOwned>(
        &self,
        operation: &str,
        device_id: &str,
    ) -> Result<T, Error> {
        self.call_authed(operation, params([("deviceId", Value::from(device_id))]))
            .await
    }

    /// Authenticated call scoped to a device's default channel.
    pub(crate) async fn channel_call<T: DeserializeOwned>(
        &self,
        operation: &str,
        device_id: &str,
    ) -> Result<T, Error> {
        self.call_authed(
            operation,
            params([
                ("deviceId", Value::from(device_id)),
                ("channelId", Value::from(DEFAULT_CHANNEL)),
            ]),
        )
        .await
    }
}
