//! Shared test doubles for the engine integration tests.
//!
//! `FakeVendorApi` simulates the remote project (folders, storages, files,
//! progress, downloads) behind the [`lingosync::VendorApi`] seam;
//! `TestHarness` wires an engine on top of it and a [`MemoryStore`].
#![allow(dead_code)]

pub mod fake_api;
pub mod harness;

pub use fake_api::{FakeVendorApi, PROJECT_ID};
pub use harness::{default_project, harness, item, job, translated_document, TestHarness};
