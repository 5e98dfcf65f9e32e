//! One-time webhook registration.

use log::info;
use uuid::Uuid;

use crate::error::Result;
use crate::remote::{CreateWebhookRequest, VendorApi};
use crate::settings::ConnectorSettings;

pub const FILE_TRANSLATED_EVENT: &str = "file.translated";
pub const FILE_APPROVED_EVENT: &str = "file.approved";

/// Registers the file-event webhook the first time a job is submitted and
/// remembers its id so later submissions skip the call.
pub struct WebhookRegistrar<'a> {
    api: &'a dyn VendorApi,
    settings: &'a ConnectorSettings,
    project_id: u64,
}

impl<'a> WebhookRegistrar<'a> {
    pub fn new(api: &'a dyn VendorApi, settings: &'a ConnectorSettings, project_id: u64) -> Self {
        Self {
            api,
            settings,
            project_id,
        }
    }

    /// Idempotent: returns the already-registered webhook id when one is
    /// persisted in the connector settings.
    pub async fn ensure_webhook(&self) -> Result<u64> {
        if let Some(id) = self.settings.webhook_id().await? {
            return Ok(id);
        }

        let request = CreateWebhookRequest {
            name: format!("Lingosync file events ({})", Uuid::new_v4()),
            url: self.settings.webhook_url().await?,
            events: vec![
                FILE_TRANSLATED_EVENT.to_string(),
                FILE_APPROVED_EVENT.to_string(),
            ],
            request_type: "POST".to_string(),
        };
        let webhook = self.api.create_webhook(self.project_id, &request).await?;
        self.settings.set_webhook_id(webhook.id).await?;
        info!("registered file-event webhook {}", webhook.id);
        Ok(webhook.id)
    }
}
