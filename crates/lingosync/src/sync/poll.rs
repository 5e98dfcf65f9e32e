//! Pull-based translation fetching, the fallback when webhook delivery is
//! unavailable.

use crate::error::{Result, SyncError};
use crate::model::{JobItemState, MessageSeverity};

use super::SyncEngine;

/// Result of one polling pass over a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No file satisfied the completion policy.
    NothingTranslated,
    /// At least one translation was imported; `pending` files are not
    /// finished yet.
    Fetched { translated: usize, pending: usize },
}

impl SyncEngine {
    /// Checks every mapped file of the job and imports the ones whose
    /// translation is complete. Items already translated are left alone.
    #[tracing::instrument(skip(self))]
    pub async fn poll_job(&self, job_id: u64) -> Result<PollOutcome> {
        let job = self
            .jobs
            .job(job_id)
            .await?
            .ok_or(SyncError::JobNotFound(job_id))?;
        let project_id = self.project_id().await?;
        let project = self.api.get_project(project_id).await?;
        let mappings = self.mappings.mappings_for_job(job_id).await?;

        let mut translated = 0;
        let mut pending = 0;
        for mapping in &mappings {
            let item = self
                .jobs
                .job_item(mapping.job_item_id)
                .await?
                .ok_or(SyncError::JobItemNotFound(mapping.job_item_id))?;
            if item.state == JobItemState::Translated {
                continue;
            }
            if self
                .update_translation(&project, &item, mapping.remote_file_id, &job.target_language)
                .await?
            {
                translated += 1;
            } else {
                pending += 1;
            }
        }

        if translated == 0 {
            return Ok(PollOutcome::NothingTranslated);
        }
        let summary = if pending == 0 {
            format!("Fetched translations for {translated} job items.")
        } else {
            format!(
                "Fetched translations for {translated} job items, {pending} are not finished yet."
            )
        };
        self.jobs
            .add_job_message(job_id, MessageSeverity::Status, &summary)
            .await?;
        Ok(PollOutcome::Fetched {
            translated,
            pending,
        })
    }
}
