use tokio::sync::{Mutex, RwLock};

use crate::errors::ResultExt;
use crate::salesforce_client::{AccessCredentials, SalesforceClient};

/// Owns the Salesforce access token shared by all requests.
///
/// The cache starts empty and is filled by [`refresh`](Self::refresh). Refreshes
/// are serialized so a burst of requests arriving without a token triggers one
/// token call, not one per request.
pub struct CredentialProvider {
    client: SalesforceClient,
    current: RwLock<Option<AccessCredentials>>,
    refresh_lock: Mutex<()>,
}

impl CredentialProvider {
    pub fn new(client: SalesforceClient) -> Self {
        Self {
            client,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Cached credentials, if any.
    pub async fn token(&self) -> Option<AccessCredentials> {
        self.current.read().await.clone()
    }

    pub async fn has_token(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Fetches a new access token and caches it.
    ///
    /// Failures are logged and leave the cache untouched; callers find out
    /// through a missing token on their next [`ensure_token`](Self::ensure_token).
    pub async fn refresh(&self) {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await;
    }

    /// Returns the cached credentials, refreshing first when there are none.
    pub async fn ensure_token(&self) -> Option<AccessCredentials> {
        if let Some(credentials) = self.token().await {
            return Some(credentials);
        }

        let _guard = self.refresh_lock.lock().await;
        // Another request may have refreshed while we waited for the lock.
        if let Some(credentials) = self.token().await {
            return Some(credentials);
        }

        self.refresh_locked().await;
        self.token().await
    }

    /// Drops the cached token if it is still `stale_token`.
    pub async fn invalidate(&self, stale_token: &str) {
        let mut current = self.current.write().await;
        if current
            .as_ref()
            .is_some_and(|c| c.access_token == stale_token)
        {
            tracing::warn!("⚠️  Discarding rejected Salesforce access token");
            *current = None;
        }
    }

    async fn refresh_locked(&self) {
        match self
            .client
            .refresh_access_token()
            .await
            .context("Salesforce token refresh")
        {
            Ok(credentials) => {
                tracing::info!(
                    "✓ Salesforce access token refreshed (instance: {})",
                    credentials.instance_url
                );
                *self.current.write().await = Some(credentials);
            }
            Err(e) => {
                tracing::error!("❌ {}", e);
            }
        }
    }
}
