//! Translation-vendor synchronization engine.
//!
//! Jobs and job items live in a host job system; this crate serializes items
//! into WebXML interchange files, provisions them into the vendor project,
//! and imports finished translations back, driven by webhook events or
//! polling. The host supplies persistence through the [`store`] traits and
//! composes a [`sync::SyncEngine`] on top.

pub mod codec;
pub mod error;
pub mod model;
pub mod provision;
pub mod remote;
pub mod settings;
pub mod store;
pub mod sync;

pub use codec::{RemoteFileName, WebXmlCodec, WebXmlDocument};
pub use error::{Result, SyncError};
pub use model::{Job, JobItem, JobItemState, JobState, MessageSeverity, RemoteMapping};
pub use remote::{RestClient, VendorApi};
pub use settings::ConnectorSettings;
pub use store::{JobStore, MappingStore, MemoryStore, SettingsStore};
pub use sync::{PollOutcome, SubmitOutcome, SyncEngine, WebhookEvent, WebhookReply};
