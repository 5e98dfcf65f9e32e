//! Persistence seams owned by the host system.
//!
//! The engine never talks to a database directly; every component receives
//! these repositories explicitly, with lifecycle owned by whoever composes
//! the engine.

pub mod memory;

pub use memory::MemoryStore;

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Job, JobItem, JobItemState, JobState, MessageSeverity, RemoteMapping};

/// Errors surfaced by a store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Job {0} does not exist")]
    UnknownJob(u64),

    #[error("Job item {0} does not exist")]
    UnknownJobItem(u64),

    #[error("Job item {0} already has a live remote mapping")]
    MappingExists(u64),

    #[error("State transition rejected for job item {item_id}: {reason}")]
    TransitionRejected { item_id: u64, reason: String },

    #[error("Store backend failure: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Read/transition access to jobs and job items.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn job(&self, id: u64) -> Result<Option<Job>>;

    async fn job_item(&self, id: u64) -> Result<Option<JobItem>>;

    async fn items_of_job(&self, job_id: u64) -> Result<Vec<JobItem>>;

    async fn set_job_state(&self, job_id: u64, state: JobState) -> Result<()>;

    async fn set_item_state(&self, item_id: u64, state: JobItemState) -> Result<()>;

    async fn add_job_message(
        &self,
        job_id: u64,
        severity: MessageSeverity,
        text: &str,
    ) -> Result<()>;

    async fn add_item_message(
        &self,
        item_id: u64,
        severity: MessageSeverity,
        text: &str,
    ) -> Result<()>;

    /// Applies translated unit texts (composite unit id -> text) to the job.
    /// Re-applying the same map is a safe overwrite.
    async fn apply_translation(&self, job_id: u64, units: BTreeMap<String, String>) -> Result<()>;
}

/// Persistence of item-to-remote-file links.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Records the link. At most one live mapping may exist per job item;
    /// a second insert for the same item fails with
    /// [`StoreError::MappingExists`].
    async fn add_mapping(&self, mapping: RemoteMapping) -> Result<()>;

    async fn mappings_for_job(&self, job_id: u64) -> Result<Vec<RemoteMapping>>;
}

/// Connector-wide key-value configuration.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// `None` clears the key. Writes are last-writer-wins.
    async fn set(&self, key: &str, value: Option<&str>) -> Result<()>;
}
