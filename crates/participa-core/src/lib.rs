pub mod config;
mod error;
pub mod manifestation;
pub mod normalize;
pub mod protocol;
pub mod subjects;

pub use config::{Config, SubmitMode};
pub use error::CoreError;
pub use manifestation::{
    Attachment, Channel, Manifestation, ManifestationContent, PayloadContent,
    PayloadIdentification, PayloadMetadata, SubjectSelection, SubmissionPayload,
    SubmissionResponse, UserIdentification,
};
pub use normalize::{fold_diacritics, normalize_text};
pub use protocol::{ProtocolRecord, ProtocolStatus, generate_protocol, is_valid_protocol};
pub use subjects::{SUBJECT_CATEGORIES, Subject, search_subjects, subject_by_id};
