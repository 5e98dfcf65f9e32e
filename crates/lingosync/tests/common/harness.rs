//! Engine wiring and entity builders shared by the integration tests.

use std::sync::{Arc, Once};

use lingosync::codec::WebXmlCodec;
use lingosync::model::{Job, JobItem, JobItemState, JobState, TranslatableUnit};
use lingosync::remote::Project;
use lingosync::settings::{ConnectorSettings, PROJECT_ID_KEY, WEBHOOK_URL_KEY};
use lingosync::store::{MemoryStore, SettingsStore};
use lingosync::SyncEngine;

use super::fake_api::{FakeVendorApi, PROJECT_ID};

pub struct TestHarness {
    pub api: Arc<FakeVendorApi>,
    pub store: MemoryStore,
    pub engine: SyncEngine,
}

pub fn default_project() -> Project {
    Project {
        id: PROJECT_ID,
        name: "Site".to_string(),
        target_language_ids: vec!["de".to_string(), "fr".to_string()],
        export_approved_only: false,
    }
}

/// Routes `log` records through tracing and prints them per test when
/// `RUST_LOG` asks for them.
fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_log::LogTracer::init();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Engine over a fresh fake project and memory store, with project id and
/// webhook URL configured.
pub async fn harness() -> TestHarness {
    init_logging();
    let store = MemoryStore::new();
    SettingsStore::set(&store, PROJECT_ID_KEY, Some(&PROJECT_ID.to_string()))
        .await
        .unwrap();
    SettingsStore::set(
        &store,
        WEBHOOK_URL_KEY,
        Some("https://connector.example/webhook"),
    )
    .await
    .unwrap();

    let api = Arc::new(FakeVendorApi::new(default_project()));
    let settings = ConnectorSettings::new(Arc::new(store.clone()));
    let engine = SyncEngine::new(
        api.clone(),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        settings,
    );
    TestHarness { api, store, engine }
}

pub fn job(id: u64, source: &str, target: &str) -> Job {
    Job {
        id,
        label: Some(format!("Job {id}")),
        source_language: source.to_string(),
        target_language: target.to_string(),
        state: JobState::Draft,
        wrap_cdata: true,
    }
}

pub fn item(id: u64, job_id: u64) -> JobItem {
    JobItem {
        id,
        job_id,
        label: Some(format!("Item {id}")),
        state: JobItemState::Inactive,
        units: vec![
            TranslatableUnit::new("title", "Hello"),
            TranslatableUnit::new("body][0][value", "Hello world"),
        ],
    }
}

/// A translated rendition of `item`'s file: the same document shape with
/// every unit's text replaced.
pub fn translated_document(job: &Job, item: &JobItem, texts: &[(&str, &str)]) -> Vec<u8> {
    let mut translated = item.clone();
    for unit in &mut translated.units {
        if let Some((_, text)) = texts.iter().find(|(key, _)| *key == unit.key) {
            unit.text = (*text).to_string();
        }
    }
    WebXmlCodec::for_job(job)
        .encode(job, std::slice::from_ref(&translated))
        .unwrap()
}
