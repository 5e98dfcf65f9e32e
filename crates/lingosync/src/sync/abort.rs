//! Aborting submitted jobs.

use log::warn;

use crate::error::{Result, SyncError};
use crate::model::{JobItemState, JobState, MessageSeverity};
use crate::provision::Provisioner;

use super::SyncEngine;

impl SyncEngine {
    /// Aborts every item of a job and removes its remote folder. Returns
    /// whether the job itself transitioned; a job past its abortable states
    /// reports `false` instead of raising.
    ///
    /// Item transitions that fail are recorded as error messages on the item
    /// and do not stop the rest: the remote folder is still deleted exactly
    /// once and the job itself still transitions when it is abortable.
    #[tracing::instrument(skip(self))]
    pub async fn abort_job(&self, job_id: u64) -> Result<bool> {
        let job = self
            .jobs
            .job(job_id)
            .await?
            .ok_or(SyncError::JobNotFound(job_id))?;
        let project_id = self.project_id().await?;
        let mappings = self.mappings.mappings_for_job(job_id).await?;

        for mapping in &mappings {
            match self
                .jobs
                .set_item_state(mapping.job_item_id, JobItemState::Aborted)
                .await
            {
                Ok(()) => {
                    self.jobs
                        .add_item_message(
                            mapping.job_item_id,
                            MessageSeverity::Status,
                            "The translation of the job item has been aborted.",
                        )
                        .await?;
                }
                Err(e) => {
                    warn!("failed to abort job item {}: {e}", mapping.job_item_id);
                    self.jobs
                        .add_item_message(
                            mapping.job_item_id,
                            MessageSeverity::Error,
                            &format!("Failed to abort the job item: {e}"),
                        )
                        .await?;
                }
            }
        }

        if let Some(directory_id) = mappings.first().map(|m| m.remote_directory_id) {
            Provisioner::new(self.api.as_ref(), project_id)
                .delete_directory(directory_id)
                .await?;
        }

        if !job.is_abortable() {
            warn!("job {job_id} is not abortable in state {:?}", job.state);
            return Ok(false);
        }
        self.jobs.set_job_state(job_id, JobState::Aborted).await?;
        self.jobs
            .add_job_message(
                job_id,
                MessageSeverity::Status,
                "The translation of the job has been aborted.",
            )
            .await?;
        Ok(true)
    }
}
