// Access token cache
//
// Double-checked lazy token: the warm path is a lock-free atomic load,
// the cold path serializes behind a single async mutex and re-checks the
// cache before logging in. At most one login exchange runs per cold period.

use std::future::Future;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::error::Error;

/// Observable lifecycle of the cached token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    NoToken,
    Authenticating,
    Authenticated,
}

/// Sole owner of an account's access token.
#[derive(Debug, Default)]
pub struct TokenManager {
    token: ArcSwapOption<String>,
    login_lock: Mutex<()>,
}

impl TokenManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached token, if any. Never blocks.
    pub fn current(&self) -> Option<Arc<String>> {
        self.token.load_full()
    }

    pub fn state(&self) -> TokenState {
        if self.token.load().is_some() {
            TokenState::Authenticated
        } else if self.login_lock.try_lock().is_err() {
            TokenState::Authenticating
        } else {
            TokenState::NoToken
        }
    }

    /// Return the cached token, running `login` only if none is cached.
    ///
    /// Concurrent callers on a cold cache queue on the login lock; the first
    /// one in performs the exchange and the rest pick up its result on the
    /// re-check. A failed login leaves the cache empty, so the next caller
    /// tries again.
    pub async fn get_or_login<F, Fut>(&self, login: F) -> Result<Arc<String>, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, Error>>,
    {
        if let Some(token) = self.token.load_full() {
            trace!("using cached access token");
            return Ok(token);
        }

        let _guard = self.login_lock.lock().await;

        if let Some(token) = self.token.load_full() {
            trace!("access token obtained by a concurrent caller");
            return Ok(token);
        }

        debug!("no cached access token, logging in");
        let token = Arc::new(login().await?);
        self.token.store(Some(Arc::clone(&token)));
        Ok(token)
    }

    /// Drop the cached token. The next call logs in again.
    pub fn reset(&self) {
        debug!("clearing cached access token");
        self.token.store(None);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_cold_callers_share_one_login() {
        let manager = Arc::new(TokenManager::new());
        let logins = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..50 {
            let manager = Arc::clone(&manager);
            let logins = Arc::clone(&logins);
            handles.push(tokio::spawn(async move {
                manager
                    .get_or_login(|| async {
                        let n = logins.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok(format!("token-{n}"))
                    })
                    .await
            }));
        }

        let mut tokens = Vec::new();
        for handle in handles {
            let token = handle.await.expect("task panicked").expect("login ok");
            tokens.push(token);
        }

        assert_eq!(logins.load(Ordering::SeqCst), 1);
        assert!(tokens.iter().all(|t| t.as_str() == "token-0"));
        assert_eq!(manager.state(), TokenState::Authenticated);
    }

    #[tokio::test]
    async fn warm_path_skips_login() {
        let manager = TokenManager::new();
        manager
            .get_or_login(|| async { Ok("first".to_owned()) })
            .await
            .expect("login ok");

        let token = manager
            .get_or_login(|| async { Err(Error::NotReady) })
            .await
            .expect("warm cache must not log in again");
        assert_eq!(token.as_str(), "first");
    }

    #[tokio::test]
    async fn failed_login_leaves_cache_empty() {
        let manager = TokenManager::new();
        let result = manager
            .get_or_login(|| async {
                Err(Error::Authentication {
                    code: "OP1008".into(),
                    message: "invalid appId".into(),
                })
            })
            .await;

        assert!(matches!(result, Err(Error::Authentication { .. })));
        assert_eq!(manager.state(), TokenState::NoToken);
        assert!(manager.current().is_none());

        let token = manager
            .get_or_login(|| async { Ok("retry".to_owned()) })
            .await
            .expect("second attempt logs in");
        assert_eq!(token.as_str(), "retry");
    }

    #[tokio::test]
    async fn reset_forces_new_login() {
        let manager = TokenManager::new();
        manager
            .get_or_login(|| async { Ok("old".to_owned()) })
            .await
            .expect("login ok");

        manager.reset();
        assert_eq!(manager.state(), TokenState::NoToken);

        let token = manager
            .get_or_login(|| async { Ok("new".to_owned()) })
            .await
            .expect("login ok");
        assert_eq!(token.as_str(), "new");
    }
}
