//! Job submission.

use log::warn;

use crate::codec::{RemoteFileName, WebXmlCodec};
use crate::error::{Result, SyncError};
use crate::model::{JobItemState, JobState, MessageSeverity, RemoteMapping};
use crate::provision::{Provisioner, WebhookRegistrar};

use super::SyncEngine;

/// Result of a submission attempt. Domain failures reject the job instead of
/// propagating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Rejected(String),
}

impl SyncEngine {
    /// Submits a job: provisions its remote folder, uploads one file per
    /// item and registers the file-event webhook.
    ///
    /// On a domain failure the job is marked rejected with the error recorded
    /// as a message; store failures propagate. Submission is not
    /// transactional: items uploaded before the failure stay remote and keep
    /// their mappings.
    #[tracing::instrument(skip(self))]
    pub async fn submit_job(&self, job_id: u64) -> Result<SubmitOutcome> {
        match self.request_items_translation(job_id).await {
            Ok(()) => {
                self.jobs
                    .add_job_message(
                        job_id,
                        MessageSeverity::Status,
                        "Job has been successfully submitted for translation.",
                    )
                    .await?;
                self.jobs.set_job_state(job_id, JobState::Active).await?;
                Ok(SubmitOutcome::Submitted)
            }
            Err(e) if e.is_domain() => {
                let text = format!("Job has been rejected with following error: {e}");
                warn!("submission of job {job_id} rejected: {e}");
                self.jobs
                    .add_job_message(job_id, MessageSeverity::Error, &text)
                    .await?;
                self.jobs.set_job_state(job_id, JobState::Rejected).await?;
                Ok(SubmitOutcome::Rejected(text))
            }
            Err(e) => Err(e),
        }
    }

    async fn request_items_translation(&self, job_id: u64) -> Result<()> {
        let job = self
            .jobs
            .job(job_id)
            .await?
            .ok_or(SyncError::JobNotFound(job_id))?;
        let items = self.jobs.items_of_job(job_id).await?;

        let project_id = self.project_id().await?;
        let project = self.api.get_project(project_id).await?;
        if !project
            .target_language_ids
            .iter()
            .any(|l| l == &job.target_language)
        {
            return Err(SyncError::UnknownLanguage {
                language: job.target_language.clone(),
            });
        }
        // Each file serves exactly one target; hide it from the others.
        let excluded: Vec<String> = project
            .target_language_ids
            .iter()
            .filter(|l| *l != &job.target_language)
            .cloned()
            .collect();

        let provisioner = Provisioner::new(self.api.as_ref(), project_id);
        let root = provisioner.ensure_root_directory().await?;
        let directory = provisioner.ensure_job_directory(&job, &root).await?;

        let codec = WebXmlCodec::for_job(&job);
        for item in &items {
            let bytes = codec.encode(&job, std::slice::from_ref(item))?;
            let file_name = RemoteFileName::new(
                job.id,
                item.id,
                &job.source_language,
                &job.target_language,
            )
            .to_string();
            let file_id = provisioner
                .upload_file(
                    &file_name,
                    item.title(),
                    directory.id,
                    excluded.clone(),
                    bytes,
                )
                .await?;
            self.jobs
                .set_item_state(item.id, JobItemState::Active)
                .await?;
            self.mappings
                .add_mapping(RemoteMapping {
                    job_item_id: item.id,
                    remote_file_id: file_id,
                    remote_directory_id: directory.id,
                })
                .await?;
        }

        WebhookRegistrar::new(self.api.as_ref(), &self.settings, project_id)
            .ensure_webhook()
            .await?;
        Ok(())
    }
}
