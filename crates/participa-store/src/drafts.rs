//! Persistence of the in-progress wizard draft.
//!
//! Only text and metadata are stored. Attachments have no serialised form, so
//! a restored draft always comes back without media.

use std::sync::Arc;

use participa_core::{Channel, Manifestation, ManifestationContent, SubjectSelection, UserIdentification};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::DRAFT_KEY;
use crate::kv::KeyValueStore;

/// Stored content: the channel and its text, nothing binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredContent {
    pub channel: Channel,
    pub text: String,
}

/// Serialised shape of a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredDraft {
    pub identification: UserIdentification,
    pub subject: SubjectSelection,
    pub content: StoredContent,
    pub current_step: u8,
}

impl StoredDraft {
    pub fn capture(manifestation: &Manifestation, current_step: u8) -> Self {
        Self {
            identification: manifestation.identification.clone(),
            subject: manifestation.subject.clone(),
            content: StoredContent {
                channel: manifestation.content.channel(),
                text: manifestation.content.text().to_string(),
            },
            current_step,
        }
    }

    /// Rebuild a manifestation. Consent is not part of the draft and starts unset.
    pub fn restore(&self) -> Manifestation {
        Manifestation {
            identification: self.identification.clone(),
            subject: self.subject.clone(),
            content: ManifestationContent::with_text(self.content.channel, self.content.text.clone()),
            consent: false,
        }
    }
}

#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn KeyValueStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The stored draft, or `None` when absent, unreadable or corrupt.
    pub fn load(&self) -> Option<StoredDraft> {
        let raw = match self.store.get(DRAFT_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "could not read draft");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!(error = %e, "stored draft is corrupt, ignoring");
                None
            }
        }
    }

    pub fn save(&self, draft: &StoredDraft) {
        let json = match serde_json::to_string(draft) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "could not serialise draft");
                return;
            }
        };
        match self.store.set(DRAFT_KEY, &json) {
            Ok(()) => debug!(step = draft.current_step, "draft saved"),
            Err(e) => warn!(error = %e, "could not write draft"),
        }
    }

    pub fn clear(&self) {
        match self.store.remove(DRAFT_KEY) {
            Ok(()) => debug!("draft cleared"),
            Err(e) => warn!(error = %e, "could not clear draft"),
        }
    }
}
