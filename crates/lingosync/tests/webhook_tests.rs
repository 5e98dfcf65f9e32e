//! File-event handling: completion policies, acknowledgements and the 404/500
//! taxonomy.

mod common;

use common::{default_project, harness, item, job, translated_document, TestHarness};
use lingosync::model::{JobItemState, JobState, MessageSeverity};
use lingosync::store::JobStore;
use lingosync::{WebhookEvent, WebhookReply};
use serde_json::json;

fn event(kind: &str, file_id: u64, file: &str, language: &str) -> WebhookEvent {
    serde_json::from_value(json!({
        "file": file,
        "file_id": file_id,
        "language": language,
        "event": kind
    }))
    .unwrap()
}

/// Harness with job 42 / item 7 (en -> de) already submitted; returns the
/// remote file id of the item's file.
async fn submitted(export_approved_only: bool) -> (TestHarness, u64) {
    let h = harness().await;
    let mut project = default_project();
    project.export_approved_only = export_approved_only;
    h.api.set_project(project);

    h.store.insert_job(job(42, "en", "de")).await;
    h.store.insert_item(item(7, 42)).await;
    h.engine.submit_job(42).await.unwrap();

    let file_id = h.api.files()[0].id;
    (h, file_id)
}

fn serve_translation(h: &TestHarness, file_id: u64) {
    let job = job(42, "en", "de");
    let bytes = translated_document(
        &job,
        &item(7, 42),
        &[("title", "Hallo"), ("body][0][value", "Hallo Welt")],
    );
    h.api.set_download(file_id, "de", bytes);
}

#[tokio::test]
async fn test_fully_approved_file_is_imported() {
    let (h, file_id) = submitted(true).await;
    h.api.set_progress(file_id, "de", 100, 100);
    serve_translation(&h, file_id);

    let reply = h
        .engine
        .handle_event(&event("file.approved", file_id, "Job_42_JobItem_7_en_de.xml", "de"))
        .await;
    assert_eq!(
        reply,
        WebhookReply::Acknowledged {
            translations_updated: true
        }
    );
    assert_eq!(reply.status_code(), 200);
    assert_eq!(
        reply.body(),
        json!({"success": true, "translations_updated": true})
    );

    let translations = h.store.translations(42).await;
    assert_eq!(translations.get("7][title").map(String::as_str), Some("Hallo"));
    assert_eq!(
        translations.get("7][body][0][value").map(String::as_str),
        Some("Hallo Welt")
    );
    assert_eq!(
        h.store.job_item(7).await.unwrap().unwrap().state,
        JobItemState::Translated
    );
    let messages = h.store.item_messages(7).await;
    assert!(messages
        .iter()
        .any(|m| m.severity == MessageSeverity::Status
            && m.text == "The translation has been received."));
}

#[tokio::test]
async fn test_event_delivered_with_full_remote_path() {
    let (h, file_id) = submitted(true).await;
    h.api.set_progress(file_id, "de", 100, 100);
    serve_translation(&h, file_id);

    // The vendor reports the file by its full remote path.
    let event = event(
        "file.approved",
        file_id,
        "/Lingosync Connector/Job 42 (42)/Job_42_JobItem_7_en_de.xml",
        "de",
    );
    let reply = h.engine.handle_event(&event).await;
    assert_eq!(
        reply,
        WebhookReply::Acknowledged {
            translations_updated: true
        }
    );
}

#[tokio::test]
async fn test_partially_approved_file_is_acknowledged_without_import() {
    let (h, file_id) = submitted(true).await;
    h.api.set_progress(file_id, "de", 100, 80);
    serve_translation(&h, file_id);

    let reply = h
        .engine
        .handle_event(&event("file.approved", file_id, "Job_42_JobItem_7_en_de.xml", "de"))
        .await;
    assert_eq!(
        reply,
        WebhookReply::Acknowledged {
            translations_updated: false
        }
    );

    assert!(h.store.translations(42).await.is_empty());
    assert_eq!(
        h.store.job_item(7).await.unwrap().unwrap().state,
        JobItemState::Active
    );
    assert!(h.store.item_messages(7).await.is_empty());
}

#[tokio::test]
async fn test_translated_event_skipped_under_approval_policy() {
    let (h, file_id) = submitted(true).await;
    h.api.set_progress(file_id, "de", 100, 100);
    serve_translation(&h, file_id);

    let reply = h
        .engine
        .handle_event(&event("file.translated", file_id, "Job_42_JobItem_7_en_de.xml", "de"))
        .await;
    assert_eq!(
        reply,
        WebhookReply::Acknowledged {
            translations_updated: false
        }
    );
    assert!(h.store.translations(42).await.is_empty());
}

#[tokio::test]
async fn test_foreign_file_is_acknowledged() {
    let (h, file_id) = submitted(false).await;

    let reply = h
        .engine
        .handle_event(&event("file.translated", file_id, "styles.css", "de"))
        .await;
    assert_eq!(
        reply,
        WebhookReply::Acknowledged {
            translations_updated: false
        }
    );
}

#[tokio::test]
async fn test_event_for_aborted_job_answers_not_found() {
    let h = harness().await;
    let mut aborted = job(42, "en", "de");
    aborted.state = JobState::Aborted;
    h.store.insert_job(aborted).await;
    h.store.insert_item(item(7, 42)).await;

    let reply = h
        .engine
        .handle_event(&event("file.translated", 99, "Job_42_JobItem_7_en_de.xml", "de"))
        .await;
    assert_eq!(reply, WebhookReply::NotFound);
    assert_eq!(reply.status_code(), 404);

    let messages = h.store.job_messages(42).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].severity, MessageSeverity::Warning);
}

#[tokio::test]
async fn test_event_for_unknown_job_answers_not_found() {
    let h = harness().await;

    let reply = h
        .engine
        .handle_event(&event("file.translated", 99, "Job_42_JobItem_7_en_de.xml", "de"))
        .await;
    assert_eq!(reply, WebhookReply::NotFound);
}

#[tokio::test]
async fn test_missing_language_progress_is_recorded_on_the_item() {
    let (h, file_id) = submitted(false).await;
    // No progress entry for "de" at all.
    serve_translation(&h, file_id);

    let reply = h
        .engine
        .handle_event(&event("file.translated", file_id, "Job_42_JobItem_7_en_de.xml", "de"))
        .await;
    assert_eq!(
        reply,
        WebhookReply::Acknowledged {
            translations_updated: false
        }
    );
    let messages = h.store.item_messages(7).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].severity, MessageSeverity::Error);
    assert!(messages[0].text.contains("Failed to import"));
}

#[tokio::test]
async fn test_document_for_another_job_is_rejected_before_applying() {
    let (h, file_id) = submitted(false).await;
    h.api.set_progress(file_id, "de", 100, 0);

    // Served document identifies a different (existing) job.
    let other = job(43, "en", "de");
    h.store.insert_job(other.clone()).await;
    let bytes = translated_document(&other, &item(7, 43), &[("title", "Hallo")]);
    h.api.set_download(file_id, "de", bytes);

    let reply = h
        .engine
        .handle_event(&event("file.translated", file_id, "Job_42_JobItem_7_en_de.xml", "de"))
        .await;
    assert_eq!(
        reply,
        WebhookReply::Acknowledged {
            translations_updated: false
        }
    );
    assert!(h.store.translations(42).await.is_empty());
    assert!(h.store.translations(43).await.is_empty());
    let messages = h.store.item_messages(7).await;
    assert!(messages[0].text.contains("does not match"));
}
