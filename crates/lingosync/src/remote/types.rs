//! Wire representations of the vendor API.
//!
//! Every response body nests its payload under a `data` key; lists nest each
//! element the same way.

use serde::{Deserialize, Serialize};

/// Single-object response envelope.
#[derive(Debug, Deserialize)]
pub struct Data<T> {
    pub data: T,
}

/// List response envelope.
#[derive(Debug, Deserialize)]
pub struct DataList<T> {
    pub data: Vec<Data<T>>,
}

impl<T> DataList<T> {
    pub fn into_items(self) -> Vec<T> {
        self.data.into_iter().map(|entry| entry.data).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub target_language_ids: Vec<String>,
    /// Only approved strings are exported when set. Absent on plans without
    /// an approval workflow.
    #[serde(default)]
    pub export_approved_only: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Directory {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageHandle {
    pub id: u64,
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub directory_id: Option<u64>,
}

/// Per-language completion of one remote file, in whole percent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageProgress {
    pub language_id: String,
    pub translation_progress: u8,
    pub approval_progress: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Webhook {
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadLink {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDirectoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    pub storage_id: u64,
    pub name: String,
    pub title: String,
    pub directory_id: u64,
    #[serde(rename = "type")]
    pub file_type: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_target_languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookRequest {
    pub name: String,
    pub url: String,
    pub events: Vec<String>,
    pub request_type: String,
}
