use async_trait::async_trait;
use participa_core::{SubmissionPayload, SubmissionResponse};

use crate::SyncError;

/// Destination for manifestation payloads.
///
/// A reply that parses is returned as-is, whatever its `success` flag;
/// transport failures, non-2xx statuses and malformed bodies are errors.
#[async_trait]
pub trait SubmissionEndpoint: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionResponse, SyncError>;
}
