//! Local domain entities owned by the host job system.
//!
//! The engine reads and transitions these values; persisting them is the
//! host's responsibility (see [`crate::store`]).

use serde::{Deserialize, Serialize};

/// Lifecycle state of a translation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Draft,
    Active,
    Rejected,
    Aborted,
    Finished,
}

/// Lifecycle state of a single job item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobItemState {
    Inactive,
    Active,
    Aborted,
    Translated,
}

/// Severity of a message recorded on a job or job item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSeverity {
    Status,
    Warning,
    Error,
}

/// A unit of translation work with one source and one target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: u64,
    pub label: Option<String>,
    /// Remote language code of the source content.
    pub source_language: String,
    /// Remote language code the job translates into.
    pub target_language: String,
    pub state: JobState,
    /// Write unit bodies verbatim in CDATA sections (trimmed) instead of
    /// escaped text.
    pub wrap_cdata: bool,
}

impl Job {
    /// Human-readable name used for the job's remote folder.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.label.as_deref().unwrap_or("Job"), self.id)
    }

    pub fn is_aborted(&self) -> bool {
        self.state == JobState::Aborted
    }

    /// A job can be aborted while it has not reached a terminal state.
    pub fn is_abortable(&self) -> bool {
        matches!(self.state, JobState::Draft | JobState::Active)
    }
}

/// One translatable text fragment within a job item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatableUnit {
    /// Stable key identifying the unit within its item.
    pub key: String,
    /// Optional human-readable label path, e.g. `["Body", "Summary"]`.
    pub label_path: Vec<String>,
    pub text: String,
}

impl TranslatableUnit {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label_path: Vec::new(),
            text: text.into(),
        }
    }

    pub fn with_labels(
        key: impl Into<String>,
        label_path: Vec<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            label_path,
            text: text.into(),
        }
    }
}

/// An individually translatable fragment belonging to a job. One item maps to
/// exactly one remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobItem {
    pub id: u64,
    pub job_id: u64,
    pub label: Option<String>,
    pub state: JobItemState,
    pub units: Vec<TranslatableUnit>,
}

impl JobItem {
    pub fn is_aborted(&self) -> bool {
        self.state == JobItemState::Aborted
    }

    /// Display title used for the remote file.
    pub fn title(&self) -> &str {
        self.label.as_deref().unwrap_or("Untitled")
    }
}

/// Persisted link between a job item and its remote file/folder identifiers.
/// Created exactly once per item at submission time and never updated in
/// place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMapping {
    pub job_item_id: u64,
    pub remote_file_id: u64,
    pub remote_directory_id: u64,
}
