//! In-memory store backend.
//!
//! Complete implementation of every store trait, suitable as an embedded
//! backend for hosts without their own persistence and as the double behind
//! the engine's integration tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{Job, JobItem, JobItemState, JobState, MessageSeverity, RemoteMapping};

use super::{JobStore, MappingStore, Result, SettingsStore, StoreError};

/// A message recorded on a job or job item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMessage {
    pub severity: MessageSeverity,
    pub text: String,
}

#[derive(Default)]
struct Inner {
    jobs: BTreeMap<u64, Job>,
    items: BTreeMap<u64, JobItem>,
    mappings: Vec<RemoteMapping>,
    job_messages: HashMap<u64, Vec<RecordedMessage>>,
    item_messages: HashMap<u64, Vec<RecordedMessage>>,
    translations: HashMap<u64, BTreeMap<String, String>>,
    settings: BTreeMap<String, String>,
    /// Item ids whose state transitions fail, for exercising partial-failure
    /// paths.
    failing_transitions: HashSet<u64>,
}

/// Thread-safe in-memory store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_job(&self, job: Job) {
        self.inner.write().await.jobs.insert(job.id, job);
    }

    pub async fn insert_item(&self, item: JobItem) {
        self.inner.write().await.items.insert(item.id, item);
    }

    /// Makes every future state transition of `item_id` fail.
    pub async fn fail_item_transitions(&self, item_id: u64) {
        self.inner.write().await.failing_transitions.insert(item_id);
    }

    pub async fn job_messages(&self, job_id: u64) -> Vec<RecordedMessage> {
        self.inner
            .read()
            .await
            .job_messages
            .get(&job_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn item_messages(&self, item_id: u64) -> Vec<RecordedMessage> {
        self.inner
            .read()
            .await
            .item_messages
            .get(&item_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Translated unit texts applied to a job so far.
    pub async fn translations(&self, job_id: u64) -> BTreeMap<String, String> {
        self.inner
            .read()
            .await
            .translations
            .get(&job_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn job(&self, id: u64) -> Result<Option<Job>> {
        Ok(self.inner.read().await.jobs.get(&id).cloned())
    }

    async fn job_item(&self, id: u64) -> Result<Option<JobItem>> {
        Ok(self.inner.read().await.items.get(&id).cloned())
    }

    async fn items_of_job(&self, job_id: u64) -> Result<Vec<JobItem>> {
        Ok(self
            .inner
            .read()
            .await
            .items
            .values()
            .filter(|item| item.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn set_job_state(&self, job_id: u64, state: JobState) -> Result<()> {
        let mut inner = self.inner.write().await;
        let job = inner
            .jobs
            .get_mut(&job_id)
            .ok_or(StoreError::UnknownJob(job_id))?;
        job.state = state;
        Ok(())
    }

    async fn set_item_state(&self, item_id: u64, state: JobItemState) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.failing_transitions.contains(&item_id) {
            return Err(StoreError::TransitionRejected {
                item_id,
                reason: "transition failure injected".to_string(),
            });
        }
        let item = inner
            .items
            .get_mut(&item_id)
            .ok_or(StoreError::UnknownJobItem(item_id))?;
        item.state = state;
        Ok(())
    }

    async fn add_job_message(
        &self,
        job_id: u64,
        severity: MessageSeverity,
        text: &str,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.jobs.contains_key(&job_id) {
            return Err(StoreError::UnknownJob(job_id));
        }
        inner
            .job_messages
            .entry(job_id)
            .or_default()
            .push(RecordedMessage {
                severity,
                text: text.to_string(),
            });
        Ok(())
    }

    async fn add_item_message(
        &self,
        item_id: u64,
        severity: MessageSeverity,
        text: &str,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.items.contains_key(&item_id) {
            return Err(StoreError::UnknownJobItem(item_id));
        }
        inner
            .item_messages
            .entry(item_id)
            .or_default()
            .push(RecordedMessage {
                severity,
                text: text.to_string(),
            });
        Ok(())
    }

    async fn apply_translation(&self, job_id: u64, units: BTreeMap<String, String>) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.jobs.contains_key(&job_id) {
            return Err(StoreError::UnknownJob(job_id));
        }
        inner.translations.entry(job_id).or_default().extend(units);
        Ok(())
    }
}

#[async_trait]
impl MappingStore for MemoryStore {
    async fn add_mapping(&self, mapping: RemoteMapping) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner
            .mappings
            .iter()
            .any(|m| m.job_item_id == mapping.job_item_id)
        {
            return Err(StoreError::MappingExists(mapping.job_item_id));
        }
        inner.mappings.push(mapping);
        Ok(())
    }

    async fn mappings_for_job(&self, job_id: u64) -> Result<Vec<RemoteMapping>> {
        let inner = self.inner.read().await;
        let item_ids: HashSet<u64> = inner
            .items
            .values()
            .filter(|item| item.job_id == job_id)
            .map(|item| item.id)
            .collect();
        Ok(inner
            .mappings
            .iter()
            .filter(|m| item_ids.contains(&m.job_item_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.read().await.settings.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Option<&str>) -> Result<()> {
        let mut inner = self.inner.write().await;
        match value {
            Some(value) => {
                inner.settings.insert(key.to_string(), value.to_string());
            }
            None => {
                inner.settings.remove(key);
            }
        }
        Ok(())
    }
}
