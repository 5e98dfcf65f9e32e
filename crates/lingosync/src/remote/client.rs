//! Thin `reqwest` wrapper around the vendor REST API.
//!
//! [`VendorApi`] is the seam the engine works against; [`RestClient`] is the
//! production implementation. The personal token only leaves its
//! [`SecretString`] here, when the bearer header is signed.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Response;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{RemoteError, Result};
use super::types::{
    CreateDirectoryRequest, CreateFileRequest, CreateWebhookRequest, Data, DataList, Directory,
    DownloadLink, Language, LanguageProgress, Project, RemoteFile, StorageHandle, User, Webhook,
};

/// Header carrying the target filename of a storage upload.
pub const STORAGE_FILENAME_HEADER: &str = "Crowdin-API-FileName";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Uploads and translation downloads get a longer budget.
const TRANSFER_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum page size accepted by list endpoints; the connector never owns
/// more than this many directories or languages per request scope.
const PAGE_LIMIT: u32 = 500;

/// Remote operations the engine needs from the vendor.
#[async_trait]
pub trait VendorApi: Send + Sync {
    async fn get_project(&self, project_id: u64) -> Result<Project>;

    async fn get_user(&self) -> Result<User>;

    async fn list_languages(&self) -> Result<Vec<Language>>;

    async fn list_directories(
        &self,
        project_id: u64,
        filter: Option<&str>,
    ) -> Result<Vec<Directory>>;

    async fn create_directory(
        &self,
        project_id: u64,
        request: &CreateDirectoryRequest,
    ) -> Result<Directory>;

    async fn delete_directory(&self, project_id: u64, directory_id: u64) -> Result<()>;

    /// Uploads raw bytes into temporary storage, the first half of creating a
    /// remote file.
    async fn add_storage(&self, file_name: &str, bytes: Vec<u8>) -> Result<StorageHandle>;

    async fn create_file(&self, project_id: u64, request: &CreateFileRequest)
        -> Result<RemoteFile>;

    async fn file_progress(&self, project_id: u64, file_id: u64) -> Result<Vec<LanguageProgress>>;

    /// Builds the translated rendition of one file and returns its download
    /// link.
    async fn build_translation(
        &self,
        project_id: u64,
        file_id: u64,
        target_language_id: &str,
    ) -> Result<DownloadLink>;

    /// Fetches a previously built translation from its signed link.
    async fn download(&self, url: &str) -> Result<Vec<u8>>;

    async fn create_webhook(
        &self,
        project_id: u64,
        request: &CreateWebhookRequest,
    ) -> Result<Webhook>;
}

/// Production API client.
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    token: SecretString,
}

impl RestClient {
    /// `domain` selects an enterprise tenant; without one the shared API host
    /// is used.
    pub fn new(token: SecretString, domain: Option<&str>) -> Result<Self> {
        let base_url = match domain {
            Some(domain) => format!("https://{domain}.api.crowdin.com/api/v2"),
            None => "https://api.crowdin.com/api/v2".to_string(),
        };
        Self::with_base_url(token, base_url)
    }

    pub fn with_base_url(token: SecretString, base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(RemoteError::transport)?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        debug!("GET {path}");
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(RemoteError::transport)?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        debug!("POST {path}");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(self.token.expose_secret())
            .json(body)
            .send()
            .await
            .map_err(RemoteError::transport)?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        if response.status().is_success() {
            response.json().await.map_err(RemoteError::decode)
        } else {
            Err(Self::fail(response).await)
        }
    }

    async fn fail(response: Response) -> RemoteError {
        let status = response.status();
        let reason = match response.text().await {
            Ok(body) if !body.is_empty() => body,
            _ => status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
        };
        RemoteError::http(status.as_u16(), reason)
    }
}

#[async_trait]
impl VendorApi for RestClient {
    async fn get_project(&self, project_id: u64) -> Result<Project> {
        let envelope: Data<Project> = self
            .get_json(&format!("projects/{project_id}"), &[])
            .await?;
        Ok(envelope.data)
    }

    async fn get_user(&self) -> Result<User> {
        let envelope: Data<User> = self.get_json("user", &[]).await?;
        Ok(envelope.data)
    }

    async fn list_languages(&self) -> Result<Vec<Language>> {
        let limit = PAGE_LIMIT.to_string();
        let envelope: DataList<Language> =
            self.get_json("languages", &[("limit", limit.as_str())]).await?;
        Ok(envelope.into_items())
    }

    async fn list_directories(
        &self,
        project_id: u64,
        filter: Option<&str>,
    ) -> Result<Vec<Directory>> {
        let limit = PAGE_LIMIT.to_string();
        let mut query = vec![("limit", limit.as_str())];
        if let Some(filter) = filter {
            query.push(("filter", filter));
        }
        let envelope: DataList<Directory> = self
            .get_json(&format!("projects/{project_id}/directories"), &query)
            .await?;
        Ok(envelope.into_items())
    }

    async fn create_directory(
        &self,
        project_id: u64,
        request: &CreateDirectoryRequest,
    ) -> Result<Directory> {
        let envelope: Data<Directory> = self
            .post_json(&format!("projects/{project_id}/directories"), request)
            .await?;
        Ok(envelope.data)
    }

    async fn delete_directory(&self, project_id: u64, directory_id: u64) -> Result<()> {
        debug!("DELETE projects/{project_id}/directories/{directory_id}");
        let response = self
            .http
            .delete(self.url(&format!(
                "projects/{project_id}/directories/{directory_id}"
            )))
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(RemoteError::transport)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::fail(response).await)
        }
    }

    async fn add_storage(&self, file_name: &str, bytes: Vec<u8>) -> Result<StorageHandle> {
        debug!("POST storages ({file_name}, {} bytes)", bytes.len());
        let response = self
            .http
            .post(self.url("storages"))
            .timeout(TRANSFER_TIMEOUT)
            .bearer_auth(self.token.expose_secret())
            .header(STORAGE_FILENAME_HEADER, file_name)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(RemoteError::transport)?;
        let envelope: Data<StorageHandle> = Self::decode(response).await?;
        Ok(envelope.data)
    }

    async fn create_file(
        &self,
        project_id: u64,
        request: &CreateFileRequest,
    ) -> Result<RemoteFile> {
        let envelope: Data<RemoteFile> = self
            .post_json(&format!("projects/{project_id}/files"), request)
            .await?;
        Ok(envelope.data)
    }

    async fn file_progress(&self, project_id: u64, file_id: u64) -> Result<Vec<LanguageProgress>> {
        let limit = PAGE_LIMIT.to_string();
        let envelope: DataList<LanguageProgress> = self
            .get_json(
                &format!("projects/{project_id}/files/{file_id}/languages/progress"),
                &[("limit", limit.as_str())],
            )
            .await?;
        Ok(envelope.into_items())
    }

    async fn build_translation(
        &self,
        project_id: u64,
        file_id: u64,
        target_language_id: &str,
    ) -> Result<DownloadLink> {
        let body = serde_json::json!({ "targetLanguageId": target_language_id });
        let envelope: Data<DownloadLink> = self
            .post_json(
                &format!("projects/{project_id}/translations/builds/files/{file_id}"),
                &body,
            )
            .await?;
        Ok(envelope.data)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        // The link is pre-signed; no bearer header.
        debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .timeout(TRANSFER_TIMEOUT)
            .send()
            .await
            .map_err(RemoteError::transport)?;
        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        let bytes = response.bytes().await.map_err(RemoteError::transport)?;
        Ok(bytes.to_vec())
    }

    async fn create_webhook(
        &self,
        project_id: u64,
        request: &CreateWebhookRequest,
    ) -> Result<Webhook> {
        let envelope: Data<Webhook> = self
            .post_json(&format!("projects/{project_id}/webhooks"), request)
            .await?;
        Ok(envelope.data)
    }
}
