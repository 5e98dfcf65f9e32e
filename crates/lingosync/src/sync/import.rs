//! Importing translated renditions back into the local job system.

use log::info;

use crate::codec::{validate_import, WebXmlDocument};
use crate::error::{Result, SyncError};
use crate::model::{JobItem, JobItemState, MessageSeverity};
use crate::remote::Project;

use super::{completion, SyncEngine};

impl SyncEngine {
    /// Imports a file's translation when it satisfies the completion policy.
    /// Returns whether translations were applied.
    pub(crate) async fn update_translation(
        &self,
        project: &Project,
        item: &JobItem,
        file_id: u64,
        target_language: &str,
    ) -> Result<bool> {
        let progress = self.api.file_progress(project.id, file_id).await?;
        if !completion::translation_ready(project, &progress, target_language)? {
            return Ok(false);
        }
        self.import_translation(project.id, item, file_id, target_language)
            .await?;
        Ok(true)
    }

    /// Downloads, validates and applies the translated rendition of one
    /// remote file. The document must identify the item's own job with the
    /// job's exact language pair; anything else is rejected before a single
    /// unit is applied.
    pub(crate) async fn import_translation(
        &self,
        project_id: u64,
        item: &JobItem,
        file_id: u64,
        target_language: &str,
    ) -> Result<()> {
        let link = self
            .api
            .build_translation(project_id, file_id, target_language)
            .await?;
        let bytes = self.api.download(&link.url).await?;

        let document = WebXmlDocument::parse(&bytes)?;
        let job = validate_import(&document, self.jobs.as_ref()).await?;
        if job.id != item.job_id {
            return Err(SyncError::IdentityMismatch {
                file_id,
                expected_job: item.job_id,
                found_job: job.id,
            });
        }

        self.jobs
            .apply_translation(job.id, document.into_units())
            .await?;
        self.jobs
            .set_item_state(item.id, JobItemState::Translated)
            .await?;
        self.jobs
            .add_item_message(
                item.id,
                MessageSeverity::Status,
                "The translation has been received.",
            )
            .await?;
        info!("imported translation of file {file_id} into job item {}", item.id);
        Ok(())
    }
}
