//! REST client for the translation vendor's HTTP API.

pub mod client;
pub mod error;
pub mod types;

pub use client::{RestClient, VendorApi, STORAGE_FILENAME_HEADER};
pub use error::{RemoteError, RemoteErrorKind};
pub use types::{
    CreateDirectoryRequest, CreateFileRequest, CreateWebhookRequest, Directory, DownloadLink,
    Language, LanguageProgress, Project, RemoteFile, StorageHandle, User, Webhook,
};
