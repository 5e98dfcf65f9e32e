//! In-memory stand-in for the vendor REST API.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lingosync::remote::{
    CreateDirectoryRequest, CreateFileRequest, CreateWebhookRequest, Directory, DownloadLink,
    Language, LanguageProgress, Project, RemoteError, RemoteFile, StorageHandle, User, VendorApi,
    Webhook,
};

type Result<T> = std::result::Result<T, RemoteError>;

pub const PROJECT_ID: u64 = 123;

/// Call counts for asserting how often provisioning endpoints were hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    pub create_directory: usize,
    pub delete_directory: usize,
    pub create_webhook: usize,
}

struct State {
    project: Project,
    /// Directory plus its parent directory id.
    directories: Vec<(Directory, Option<u64>)>,
    storages: HashMap<u64, (String, Vec<u8>)>,
    files: Vec<RemoteFile>,
    /// Bytes originally uploaded per file id.
    uploads: HashMap<u64, Vec<u8>>,
    progress: HashMap<u64, Vec<LanguageProgress>>,
    downloads: HashMap<String, Vec<u8>>,
    next_id: u64,
    counters: Counters,
    fail_storage_for: Option<String>,
}

/// Simulated vendor project. Name conflicts on directory creation answer
/// HTTP 400, matching the live service.
pub struct FakeVendorApi {
    state: Mutex<State>,
}

impl FakeVendorApi {
    pub fn new(project: Project) -> Self {
        Self {
            state: Mutex::new(State {
                project,
                directories: Vec::new(),
                storages: HashMap::new(),
                files: Vec::new(),
                uploads: HashMap::new(),
                progress: HashMap::new(),
                downloads: HashMap::new(),
                next_id: 0,
                counters: Counters::default(),
                fail_storage_for: None,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn download_url(file_id: u64, language: &str) -> String {
        format!("https://files.example/{file_id}/{language}")
    }

    pub fn counters(&self) -> Counters {
        self.lock().counters
    }

    pub fn set_project(&self, project: Project) {
        self.lock().project = project;
    }

    /// Sets the per-language completion of one remote file.
    pub fn set_progress(&self, file_id: u64, language: &str, translation: u8, approval: u8) {
        let mut state = self.lock();
        let entries = state.progress.entry(file_id).or_default();
        entries.retain(|p| p.language_id != language);
        entries.push(LanguageProgress {
            language_id: language.to_string(),
            translation_progress: translation,
            approval_progress: approval,
        });
    }

    /// Sets the translated rendition served for one file and language.
    pub fn set_download(&self, file_id: u64, language: &str, bytes: Vec<u8>) {
        self.lock()
            .downloads
            .insert(Self::download_url(file_id, language), bytes);
    }

    /// Makes the next storage upload of `file_name` fail.
    pub fn fail_storage_for(&self, file_name: &str) {
        self.lock().fail_storage_for = Some(file_name.to_string());
    }

    pub fn directories(&self) -> Vec<Directory> {
        self.lock().directories.iter().map(|(d, _)| d.clone()).collect()
    }

    pub fn files(&self) -> Vec<RemoteFile> {
        self.lock().files.clone()
    }

    /// Bytes uploaded for a remote file, as stored at submission time.
    pub fn uploaded_bytes(&self, file_id: u64) -> Option<Vec<u8>> {
        self.lock().uploads.get(&file_id).cloned()
    }
}

#[async_trait]
impl VendorApi for FakeVendorApi {
    async fn get_project(&self, _project_id: u64) -> Result<Project> {
        Ok(self.lock().project.clone())
    }

    async fn get_user(&self) -> Result<User> {
        Ok(User {
            id: 1,
            username: "connector".to_string(),
        })
    }

    async fn list_languages(&self) -> Result<Vec<Language>> {
        let state = self.lock();
        Ok(state
            .project
            .target_language_ids
            .iter()
            .map(|id| Language {
                id: id.clone(),
                name: id.to_uppercase(),
            })
            .collect())
    }

    async fn list_directories(
        &self,
        _project_id: u64,
        filter: Option<&str>,
    ) -> Result<Vec<Directory>> {
        let state = self.lock();
        Ok(state
            .directories
            .iter()
            .map(|(d, _)| d.clone())
            .filter(|d| filter.map_or(true, |f| d.name.contains(f)))
            .collect())
    }

    async fn create_directory(
        &self,
        _project_id: u64,
        request: &CreateDirectoryRequest,
    ) -> Result<Directory> {
        let mut state = self.lock();
        state.counters.create_directory += 1;
        let exists = state
            .directories
            .iter()
            .any(|(d, parent)| d.name == request.name && *parent == request.directory_id);
        if exists {
            return Err(RemoteError::http(400, "Name must be unique"));
        }
        state.next_id += 1;
        let directory = Directory {
            id: state.next_id,
            name: request.name.clone(),
        };
        state
            .directories
            .push((directory.clone(), request.directory_id));
        Ok(directory)
    }

    async fn delete_directory(&self, _project_id: u64, directory_id: u64) -> Result<()> {
        let mut state = self.lock();
        state.counters.delete_directory += 1;
        let before = state.directories.len();
        state.directories.retain(|(d, _)| d.id != directory_id);
        if state.directories.len() == before {
            return Err(RemoteError::http(404, "Directory Not Found"));
        }
        Ok(())
    }

    async fn add_storage(&self, file_name: &str, bytes: Vec<u8>) -> Result<StorageHandle> {
        let mut state = self.lock();
        if state.fail_storage_for.as_deref() == Some(file_name) {
            return Err(RemoteError::http(500, "Internal Server Error"));
        }
        state.next_id += 1;
        let id = state.next_id;
        state.storages.insert(id, (file_name.to_string(), bytes));
        Ok(StorageHandle {
            id,
            file_name: file_name.to_string(),
        })
    }

    async fn create_file(
        &self,
        _project_id: u64,
        request: &CreateFileRequest,
    ) -> Result<RemoteFile> {
        let mut state = self.lock();
        let bytes = match state.storages.remove(&request.storage_id) {
            Some((_, bytes)) => bytes,
            None => return Err(RemoteError::http(404, "Storage Not Found")),
        };
        state.next_id += 1;
        let file = RemoteFile {
            id: state.next_id,
            name: request.name.clone(),
            directory_id: Some(request.directory_id),
        };
        state.uploads.insert(file.id, bytes);
        state.files.push(file.clone());
        Ok(file)
    }

    async fn file_progress(
        &self,
        _project_id: u64,
        file_id: u64,
    ) -> Result<Vec<LanguageProgress>> {
        Ok(self.lock().progress.get(&file_id).cloned().unwrap_or_default())
    }

    async fn build_translation(
        &self,
        _project_id: u64,
        file_id: u64,
        target_language_id: &str,
    ) -> Result<DownloadLink> {
        Ok(DownloadLink {
            url: Self::download_url(file_id, target_language_id),
        })
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.lock()
            .downloads
            .get(url)
            .cloned()
            .ok_or_else(|| RemoteError::http(404, "Not Found"))
    }

    async fn create_webhook(
        &self,
        _project_id: u64,
        _request: &CreateWebhookRequest,
    ) -> Result<Webhook> {
        let mut state = self.lock();
        state.counters.create_webhook += 1;
        state.next_id += 1;
        Ok(Webhook { id: state.next_id })
    }
}
