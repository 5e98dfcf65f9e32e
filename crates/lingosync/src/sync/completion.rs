//! Completion policy for one remote file and target language.

use crate::error::{Result, SyncError};
use crate::remote::{LanguageProgress, Project};

const COMPLETE: u8 = 100;

/// Whether a file's translation for `target_language` may be imported.
///
/// Projects that export only approved strings require full approval;
/// everything else requires full translation. A target language missing from
/// the progress report is a hard error, never "not ready".
pub fn translation_ready(
    project: &Project,
    progress: &[LanguageProgress],
    target_language: &str,
) -> Result<bool> {
    let entry = progress
        .iter()
        .find(|p| p.language_id == target_language)
        .ok_or_else(|| SyncError::UnknownLanguage {
            language: target_language.to_string(),
        })?;

    if project.export_approved_only {
        Ok(entry.approval_progress == COMPLETE)
    } else {
        Ok(entry.translation_progress == COMPLETE)
    }
}
