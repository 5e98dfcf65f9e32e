//! Connector-wide configuration persisted in the host's key-value store.
//!
//! Writes are rare and operator-driven; last-writer-wins with no locking.

use std::sync::Arc;

use secrecy::SecretString;

use crate::error::{Result, SyncError};
use crate::store::SettingsStore;

pub const TOKEN_KEY: &str = "personal_token";
pub const PROJECT_ID_KEY: &str = "project_id";
pub const DOMAIN_KEY: &str = "domain";
pub const WEBHOOK_ID_KEY: &str = "webhook_id";
pub const WEBHOOK_URL_KEY: &str = "webhook_url";

/// Placeholder rendered instead of the stored token on configuration
/// surfaces. Submitting the placeholder back keeps the stored token.
pub const TOKEN_MASK: &str = "**********";

/// Typed accessors over the persisted connector settings.
#[derive(Clone)]
pub struct ConnectorSettings {
    store: Arc<dyn SettingsStore>,
}

impl ConnectorSettings {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// The personal access token. Never logged; only the request signer
    /// exposes it.
    pub async fn personal_token(&self) -> Result<SecretString> {
        let token = self
            .store
            .get(TOKEN_KEY)
            .await?
            .filter(|t| !t.is_empty())
            .ok_or(SyncError::MissingSetting(TOKEN_KEY))?;
        Ok(SecretString::from(token))
    }

    /// Stores a token coming back from a configuration surface. The mask
    /// placeholder keeps whatever token is already stored.
    pub async fn store_token(&self, submitted: &str) -> Result<()> {
        if submitted == TOKEN_MASK {
            return Ok(());
        }
        let value = if submitted.is_empty() {
            None
        } else {
            Some(submitted)
        };
        self.store.set(TOKEN_KEY, value).await?;
        Ok(())
    }

    /// `Some(mask)` when a token is stored, for rendering on configuration
    /// surfaces without exposing the value.
    pub async fn masked_token(&self) -> Result<Option<&'static str>> {
        let stored = self.store.get(TOKEN_KEY).await?;
        Ok(stored.filter(|t| !t.is_empty()).map(|_| TOKEN_MASK))
    }

    pub async fn project_id(&self) -> Result<u64> {
        let raw = self
            .store
            .get(PROJECT_ID_KEY)
            .await?
            .filter(|v| !v.is_empty())
            .ok_or(SyncError::MissingSetting(PROJECT_ID_KEY))?;
        raw.parse().map_err(|_| SyncError::InvalidSetting {
            key: PROJECT_ID_KEY,
            reason: format!("'{raw}' is not a numeric project id"),
        })
    }

    /// Optional enterprise tenant subdomain.
    pub async fn domain(&self) -> Result<Option<String>> {
        Ok(self.store.get(DOMAIN_KEY).await?.filter(|d| !d.is_empty()))
    }

    /// Handle of the registered webhook, if any.
    pub async fn webhook_id(&self) -> Result<Option<u64>> {
        let raw = self.store.get(WEBHOOK_ID_KEY).await?;
        match raw.filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| SyncError::InvalidSetting {
                    key: WEBHOOK_ID_KEY,
                    reason: format!("'{raw}' is not a numeric webhook id"),
                }),
            None => Ok(None),
        }
    }

    pub async fn set_webhook_id(&self, id: u64) -> Result<()> {
        self.store
            .set(WEBHOOK_ID_KEY, Some(&id.to_string()))
            .await?;
        Ok(())
    }

    /// Absolute URL of this system's inbound webhook endpoint.
    pub async fn webhook_url(&self) -> Result<String> {
        self.store
            .get(WEBHOOK_URL_KEY)
            .await?
            .filter(|u| !u.is_empty())
            .ok_or(SyncError::MissingSetting(WEBHOOK_URL_KEY))
    }
}
