//! Remote project folder and file provisioning.
//!
//! Folder layout per project: one connector root, one folder per job under
//! it, one file per job item inside the job folder. Provisioning is
//! idempotent; existing folders are reused and creation races resolve by
//! looking the folder up again after a name conflict.

pub mod webhook;

pub use webhook::WebhookRegistrar;

use log::{debug, info};

use crate::error::{Result, SyncError};
use crate::model::Job;
use crate::remote::{CreateDirectoryRequest, CreateFileRequest, Directory, VendorApi};

/// Name of the per-project root folder owned by this connector.
pub const ROOT_DIRECTORY_NAME: &str = "Lingosync Connector";

/// Remote type of uploaded interchange files.
pub const FILE_TYPE: &str = "webxml";

/// Folder and file provisioning against one remote project.
pub struct Provisioner<'a> {
    api: &'a dyn VendorApi,
    project_id: u64,
}

impl<'a> Provisioner<'a> {
    pub fn new(api: &'a dyn VendorApi, project_id: u64) -> Self {
        Self { api, project_id }
    }

    /// Returns the connector root folder, creating it on first use.
    pub async fn ensure_root_directory(&self) -> Result<Directory> {
        if let Some(directory) = self.find_directory(ROOT_DIRECTORY_NAME).await? {
            debug!("root directory already provisioned (id {})", directory.id);
            return Ok(directory);
        }

        let request = CreateDirectoryRequest {
            name: ROOT_DIRECTORY_NAME.to_string(),
            directory_id: None,
        };
        match self.api.create_directory(self.project_id, &request).await {
            Ok(directory) => {
                info!("created root directory (id {})", directory.id);
                Ok(directory)
            }
            // Concurrent submission created it between lookup and create.
            Err(e) if e.is_conflict() => self
                .find_directory(ROOT_DIRECTORY_NAME)
                .await?
                .ok_or(SyncError::Remote(e)),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns the job's folder under `root`, creating it when absent.
    pub async fn ensure_job_directory(&self, job: &Job, root: &Directory) -> Result<Directory> {
        let name = job.display_name();
        let request = CreateDirectoryRequest {
            name: name.clone(),
            directory_id: Some(root.id),
        };
        match self.api.create_directory(self.project_id, &request).await {
            Ok(directory) => Ok(directory),
            Err(e) if e.is_conflict() => {
                self.find_directory(&name).await?.ok_or(SyncError::Remote(e))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_directory(&self, name: &str) -> Result<Option<Directory>> {
        let directories = self
            .api
            .list_directories(self.project_id, Some(name))
            .await?;
        // The filter matches substrings; require an exact name.
        Ok(directories.into_iter().find(|d| d.name == name))
    }

    /// Two-phase upload: raw bytes into temporary storage, then a file
    /// created from that storage. Returns the remote file id.
    pub async fn upload_file(
        &self,
        file_name: &str,
        title: &str,
        directory_id: u64,
        excluded_target_languages: Vec<String>,
        bytes: Vec<u8>,
    ) -> Result<u64> {
        let storage = self.api.add_storage(file_name, bytes).await?;
        let request = CreateFileRequest {
            storage_id: storage.id,
            name: file_name.to_string(),
            title: title.to_string(),
            directory_id,
            file_type: FILE_TYPE.to_string(),
            excluded_target_languages,
        };
        let file = self.api.create_file(self.project_id, &request).await?;
        info!("uploaded {file_name} as remote file {}", file.id);
        Ok(file.id)
    }

    /// Removes a job folder and everything inside it.
    pub async fn delete_directory(&self, directory_id: u64) -> Result<()> {
        self.api
            .delete_directory(self.project_id, directory_id)
            .await?;
        Ok(())
    }
}
