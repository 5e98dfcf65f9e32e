//! Synchronization engine tying stores, codec and remote API together.
//!
//! One [`SyncEngine`] per connector. Submission, abort, polling and webhook
//! handling are each implemented in their own submodule as `impl` blocks on
//! the engine.

mod abort;
mod completion;
mod events;
mod import;
mod poll;
mod submit;

pub use completion::translation_ready;
pub use events::{FileEvent, WebhookEvent, WebhookReply};
pub use poll::PollOutcome;
pub use submit::SubmitOutcome;

use std::collections::HashMap;
use std::sync::Arc;

use log::warn;

use crate::error::Result;
use crate::remote::VendorApi;
use crate::settings::ConnectorSettings;
use crate::store::{JobStore, MappingStore};

/// Vendor synchronization engine.
pub struct SyncEngine {
    api: Arc<dyn VendorApi>,
    jobs: Arc<dyn JobStore>,
    mappings: Arc<dyn MappingStore>,
    settings: ConnectorSettings,
}

impl SyncEngine {
    pub fn new(
        api: Arc<dyn VendorApi>,
        jobs: Arc<dyn JobStore>,
        mappings: Arc<dyn MappingStore>,
        settings: ConnectorSettings,
    ) -> Self {
        Self {
            api,
            jobs,
            mappings,
            settings,
        }
    }

    pub(crate) async fn project_id(&self) -> Result<u64> {
        self.settings.project_id().await
    }

    /// Proves the stored token and project id work: the token must resolve to
    /// a user and the project must be readable.
    pub async fn verify_credentials(&self) -> Result<()> {
        let project_id = self.project_id().await?;
        self.api.get_user().await?;
        self.api.get_project(project_id).await?;
        Ok(())
    }

    /// Language codes the vendor supports, keyed by id. Listing failures are
    /// reported as an empty map so configuration surfaces stay usable.
    pub async fn supported_remote_languages(&self) -> HashMap<String, String> {
        match self.api.list_languages().await {
            Ok(languages) => languages
                .into_iter()
                .map(|language| (language.id, language.name))
                .collect(),
            Err(e) => {
                warn!("failed to list remote languages: {e}");
                HashMap::new()
            }
        }
    }
}
