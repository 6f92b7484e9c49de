//! HTTP submission endpoint.

use async_trait::async_trait;
use participa_core::{SubmissionPayload, SubmissionResponse};
use tracing::info;

use crate::SyncError;
use crate::endpoint::SubmissionEndpoint;

/// POSTs JSON payloads to a fixed URL.
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    /// `url` is the full submission URL, e.g. `http://localhost:3000/api/submit`.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), url)
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SubmissionEndpoint for HttpEndpoint {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionResponse, SyncError> {
        info!(url = %self.url, channel = %payload.content.channel, "posting manifestation");
        let resp = self
            .client
            .post(&self.url)
            .header(reqwest::header::USER_AGENT, payload.metadata.user_agent.as_str())
            .json(payload)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let reply: SubmissionResponse = serde_json::from_str(&body)?;
        info!(success = reply.success, protocol = %reply.protocol, "endpoint replied");
        Ok(reply)
    }
}
