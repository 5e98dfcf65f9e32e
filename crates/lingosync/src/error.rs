use thiserror::Error;

use crate::codec::CodecError;
use crate::remote::RemoteError;
use crate::store::StoreError;

/// Engine-level error taxonomy.
///
/// "Not ready" is not an error; completion checks return `false` instead.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Interchange document error: {0}")]
    Codec(#[from] CodecError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Connector setting '{0}' is not configured")]
    MissingSetting(&'static str),

    #[error("Connector setting '{key}' is invalid: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    #[error("Job {0} not found")]
    JobNotFound(u64),

    #[error("Job item {0} not found")]
    JobItemNotFound(u64),

    #[error("Target language '{language}' is not reported by the remote project")]
    UnknownLanguage { language: String },

    #[error(
        "The remote translation (file {file_id}, job {found_job}) does not match job {expected_job}"
    )]
    IdentityMismatch {
        file_id: u64,
        expected_job: u64,
        found_job: u64,
    },
}

impl SyncError {
    /// Domain errors are recorded as messages on the affected job or item and
    /// acknowledged to the sender; anything else propagates so the caller can
    /// signal a retryable server failure.
    pub fn is_domain(&self) -> bool {
        !matches!(self, SyncError::Store(_))
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
