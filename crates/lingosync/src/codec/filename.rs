//! Deterministic remote filename template.
//!
//! The filename is the sole binding between a remote file and local
//! entities; only the two integer identifiers must be recoverable from it.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::{CodecError, Result};

/// Identity encoded into a remote filename:
/// `Job_<jobId>_JobItem_<jobItemId>_<sourceLang>_<targetLang>.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileName {
    pub job_id: u64,
    pub job_item_id: u64,
    pub source_language: String,
    pub target_language: String,
}

fn template() -> &'static Regex {
    static TEMPLATE: OnceLock<Regex> = OnceLock::new();
    TEMPLATE.get_or_init(|| {
        Regex::new(r"^Job_(\d+)_JobItem_(\d+)_(.+)_(.+)\.xml$").expect("filename template regex")
    })
}

impl RemoteFileName {
    pub fn new(
        job_id: u64,
        job_item_id: u64,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            job_id,
            job_item_id,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Parses a remote path's basename back into the encoded identity.
    /// Everything up to the last `/` is ignored.
    pub fn parse(path: &str) -> Result<Self> {
        let basename = path.rsplit('/').next().unwrap_or(path);
        let captures = template()
            .captures(basename)
            .ok_or_else(|| CodecError::FilenameMismatch(basename.to_string()))?;

        let job_id = captures[1]
            .parse()
            .map_err(|_| CodecError::FilenameMismatch(basename.to_string()))?;
        let job_item_id = captures[2]
            .parse()
            .map_err(|_| CodecError::FilenameMismatch(basename.to_string()))?;

        Ok(Self {
            job_id,
            job_item_id,
            source_language: captures[3].to_string(),
            target_language: captures[4].to_string(),
        })
    }
}

impl fmt::Display for RemoteFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Job_{}_JobItem_{}_{}_{}.xml",
            self.job_id, self.job_item_id, self.source_language, self.target_language
        )
    }
}
