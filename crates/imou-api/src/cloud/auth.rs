// Cloud authentication
//
// The `accessToken` exchange: a signed call with no parameters whose
// payload carries the account token. The token manager guarantees only
// one exchange is in flight; this module decides what success and failure
// mean for the account status.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cloud::client::{AccountStatus, ImouClient};
use crate::envelope;
use crate::error::Error;
use crate::models::TokenInfo;
use crate::sign::Params;

const ACCESS_TOKEN: &str = "accessToken";

impl ImouClient {
    /// The account access token, logging in first if none is cached.
    pub async fn access_token(&self) -> Result<Arc<String>, Error> {
        self.tokens().get_or_login(|| self.login_exchange()).await
    }

    /// Ensure the account is logged in.
    pub async fn login(&self) -> Result<(), Error> {
        self.access_token().await.map(|_| ())
    }

    /// Whether a token is currently cached.
    pub fn is_connected(&self) -> bool {
        self.tokens().current().is_some()
    }

    /// Forget the cached token so the next call logs in again.
    ///
    /// The client never does this on its own; callers decide when a vendor
    /// error means the token went stale.
    pub fn reset_token(&self) {
        self.tokens().reset();
    }

    async fn login_exchange(&self) -> Result<String, Error> {
        let body = self.post_signed(ACCESS_TOKEN, Params::new()).await?;

        match envelope::decode::<TokenInfo>(&body) {
            Ok(info) if !info.access_token.is_empty() => {
                info!(app_id = %self.credentials().app_id, "imou login successful");
                self.set_status(AccountStatus::Online);
                Ok(info.access_token)
            }
            Ok(_) => Err(Error::Deserialization {
                message: "accessToken missing from login response".into(),
                body,
            }),
            Err(Error::Api { code, message }) => {
                warn!(%code, %message, "imou login rejected");
                self.set_status(AccountStatus::Error {
                    code: Some(code.clone()),
                    message: format!("Code: {code}. Msg: {message}"),
                });
                Err(Error::Authentication { code, message })
            }
            Err(e) => Err(e),
        }
    }
}
