//! Inbound file-event handling.
//!
//! The vendor posts an event per file whenever its translation or approval
//! state changes. Events for files this connector does not own are
//! acknowledged and ignored; events for aborted or missing entities answer
//! 404 so the vendor stops retrying; only store failures answer 500.

use log::{debug, error, warn};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::codec::RemoteFileName;
use crate::error::Result;
use crate::model::MessageSeverity;

use super::SyncEngine;

/// Kind of file event delivered by the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum FileEvent {
    #[serde(rename = "file.translated")]
    Translated,
    #[serde(rename = "file.approved")]
    Approved,
}

/// Numeric ids arrive as either JSON numbers or strings.
fn flexible_id<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(id) => Ok(id),
        Raw::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}

/// One delivered webhook event. The body is flat: the file's remote path,
/// its numeric id, the target language code and the event name.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "event")]
    pub kind: FileEvent,
    /// Remote path of the file, e.g.
    /// `/Lingosync Connector/Job 42 (42)/Job_42_JobItem_7_en_de.xml`.
    pub file: String,
    #[serde(deserialize_with = "flexible_id")]
    pub file_id: u64,
    pub language: String,
}

/// Response the webhook endpoint should send back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookReply {
    /// Event accepted; `translations_updated` says whether an import ran.
    Acknowledged { translations_updated: bool },
    /// The event references an aborted or unknown entity.
    NotFound,
    /// A store failure; the sender should retry.
    ServerError,
}

impl WebhookReply {
    pub fn status_code(&self) -> u16 {
        match self {
            WebhookReply::Acknowledged { .. } => 200,
            WebhookReply::NotFound => 404,
            WebhookReply::ServerError => 500,
        }
    }

    pub fn body(&self) -> serde_json::Value {
        match self {
            WebhookReply::Acknowledged {
                translations_updated,
            } => json!({ "success": true, "translations_updated": translations_updated }),
            WebhookReply::NotFound | WebhookReply::ServerError => {
                json!({ "success": false, "translations_updated": false })
            }
        }
    }

    fn acknowledged(translations_updated: bool) -> Self {
        WebhookReply::Acknowledged {
            translations_updated,
        }
    }
}

impl SyncEngine {
    /// Handles one delivered event. Never fails: domain problems are recorded
    /// as messages and acknowledged, store problems collapse to
    /// [`WebhookReply::ServerError`].
    #[tracing::instrument(skip(self, event), fields(file_id = event.file_id))]
    pub async fn handle_event(&self, event: &WebhookEvent) -> WebhookReply {
        match self.process_event(event).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("file event for file {} failed: {e}", event.file_id);
                WebhookReply::ServerError
            }
        }
    }

    async fn process_event(&self, event: &WebhookEvent) -> Result<WebhookReply> {
        // Files not named by this connector are someone else's concern.
        let name = match RemoteFileName::parse(&event.file) {
            Ok(name) => name,
            Err(_) => {
                debug!("ignoring event for foreign file '{}'", event.file);
                return Ok(WebhookReply::acknowledged(false));
            }
        };

        let Some(job) = self.jobs.job(name.job_id).await? else {
            warn!("event for unknown job {}", name.job_id);
            return Ok(WebhookReply::NotFound);
        };

        let item = self.jobs.job_item(name.job_item_id).await?;
        let item = match item {
            Some(item)
                if item.job_id == job.id && !job.is_aborted() && !item.is_aborted() =>
            {
                item
            }
            _ => {
                self.jobs
                    .add_job_message(
                        job.id,
                        MessageSeverity::Warning,
                        &format!(
                            "Received a translation event for the aborted or missing job item {}.",
                            name.job_item_id
                        ),
                    )
                    .await?;
                return Ok(WebhookReply::NotFound);
            }
        };

        let project_id = self.project_id().await?;
        let project = self.api.get_project(project_id).await?;
        // Under the approval policy only approval events can complete a file.
        if project.export_approved_only && event.kind == FileEvent::Translated {
            return Ok(WebhookReply::acknowledged(false));
        }

        match self
            .update_translation(&project, &item, event.file_id, &event.language)
            .await
        {
            Ok(updated) => Ok(WebhookReply::acknowledged(updated)),
            Err(e) if e.is_domain() => {
                self.jobs
                    .add_item_message(
                        item.id,
                        MessageSeverity::Error,
                        &format!("Failed to import the received translation: {e}"),
                    )
                    .await?;
                Ok(WebhookReply::acknowledged(false))
            }
            Err(e) => Err(e),
        }
    }
}
