//! Structured-text codec for the WebXML interchange format.

pub mod filename;
pub mod webxml;

pub use filename::RemoteFileName;
pub use webxml::{validate_import, WebXmlCodec, WebXmlDocument};

use thiserror::Error;

/// Delimiter joining a job item id and a unit key into a composite unit id.
pub const UNIT_KEY_DELIMITER: &str = "][";

/// Errors raised while reading or writing interchange documents.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Document is not valid XML: {0}")]
    InvalidXml(String),

    #[error("Document root is missing the '{0}' attribute")]
    MissingAttribute(&'static str),

    #[error("Document {attribute} '{found}' does not match the job's '{expected}'")]
    LanguageMismatch {
        attribute: &'static str,
        found: String,
        expected: String,
    },

    #[error("Document references job {0}, which does not exist")]
    UnknownJob(u64),

    #[error("Document contains no translatable units")]
    EmptyDocument,

    #[error("Failed to write document: {0}")]
    Write(String),

    #[error("Filename '{0}' does not match the remote file template")]
    FilenameMismatch(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
