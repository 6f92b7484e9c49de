//! Submission adapter.
//!
//! Sends the payload to the configured endpoint and records the issued
//! protocol. What happens when the endpoint fails depends on [`SubmitMode`]:
//! `Demo` mints a local protocol and reports success, `Strict` returns the
//! error.

use std::sync::Arc;

use participa_core::{
    Channel, Config, Manifestation, ProtocolRecord, SubjectSelection, SubmissionResponse, SubmitMode,
    generate_protocol,
};
use participa_store::ProtocolRegistry;
use tracing::{info, warn};

use crate::SyncError;
use crate::endpoint::SubmissionEndpoint;
use crate::payload::prepare_payload;

/// Message reported for locally minted protocols.
pub const LOCAL_SUCCESS_MESSAGE: &str = "Manifestação registrada com sucesso";

pub struct SubmissionAdapter {
    endpoint: Option<Arc<dyn SubmissionEndpoint>>,
    registry: ProtocolRegistry,
    config: Config,
}

impl SubmissionAdapter {
    pub fn new(
        endpoint: Option<Arc<dyn SubmissionEndpoint>>,
        registry: ProtocolRegistry,
        config: Config,
    ) -> Self {
        Self {
            endpoint,
            registry,
            config,
        }
    }

    /// Adapter posting to the configured endpoint URL, if any.
    #[cfg(feature = "http")]
    pub fn from_config(config: Config, registry: ProtocolRegistry) -> Self {
        let endpoint = config
            .endpoint()
            .map(|url| Arc::new(crate::http::HttpEndpoint::new(url)) as Arc<dyn SubmissionEndpoint>);
        Self::new(endpoint, registry, config)
    }

    pub fn registry(&self) -> &ProtocolRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn submit(&self, manifestation: &Manifestation) -> Result<SubmissionResponse, SyncError> {
        let payload = prepare_payload(manifestation, &self.config);
        let channel = payload.content.channel;

        let outcome = match &self.endpoint {
            Some(endpoint) => endpoint.submit(&payload).await,
            None => Err(SyncError::NoEndpoint),
        };

        match outcome {
            Ok(reply) if reply.success => {
                self.record(&reply.protocol, &manifestation.subject, channel);
                info!(protocol = %reply.protocol, "manifestation submitted");
                Ok(reply)
            }
            Ok(reply) => {
                warn!(message = %reply.message, "endpoint rejected manifestation");
                Ok(reply)
            }
            Err(e) => match self.config.submit_mode() {
                SubmitMode::Demo => {
                    warn!(error = %e, "submission failed, issuing local protocol");
                    Ok(self.record_local(&manifestation.subject, channel))
                }
                SubmitMode::Strict => {
                    warn!(error = %e, "submission failed");
                    Err(e)
                }
            },
        }
    }

    /// Mint and record a local protocol without contacting the endpoint.
    pub fn record_local(&self, subject: &SubjectSelection, channel: Channel) -> SubmissionResponse {
        let protocol = generate_protocol();
        self.record(&protocol, subject, channel);
        info!(%protocol, "local protocol issued");
        SubmissionResponse {
            success: true,
            protocol,
            message: LOCAL_SUCCESS_MESSAGE.to_string(),
        }
    }

    fn record(&self, protocol: &str, subject: &SubjectSelection, channel: Channel) {
        self.registry.save(ProtocolRecord::new(
            protocol,
            subject.subject_label.as_str(),
            subject.suggested_agency.as_str(),
            channel,
        ));
    }
}
