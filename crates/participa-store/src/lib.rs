//! Storage layer: a local key-value store standing in for browser storage,
//! the protocol registry, and wizard draft persistence.

mod error;
pub use error::StoreError;

pub mod drafts;
pub mod file;
pub mod kv;
pub mod protocols;

pub use drafts::{DraftStore, StoredContent, StoredDraft};
pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use protocols::ProtocolRegistry;

/// Key holding the in-progress wizard draft.
pub const DRAFT_KEY: &str = "participa-df-draft";

/// Key holding the protocol record list.
pub const PROTOCOLS_KEY: &str = "participa-df-protocols";
