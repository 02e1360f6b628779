use std::time::Duration;

use async_trait::async_trait;
use proposey_core::config::ProposalsConfig;
use proposey_core::domain::proposal::{ProposalPayload, ProposalResponse};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum ProposalApiError {
    #[error("Proposales API error ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("Error creating proposal: {0}")]
    Transport(String),
    #[error("Error creating proposal: unexpected response body: {0}")]
    Decode(String),
    #[error("proposals api_url and api_key must be configured")]
    MissingCredentials,
}

/// External proposal-creation service.
#[async_trait]
pub trait ProposalApi: Send + Sync {
    async fn create_proposal(
        &self,
        payload: &ProposalPayload,
    ) -> Result<ProposalResponse, ProposalApiError>;
}

#[derive(Clone, Debug)]
pub struct HttpProposalApi {
    client: reqwest::Client,
    endpoint: String,
    api_key: SecretString,
}

#[derive(Deserialize)]
struct CreateProposalResponse {
    proposal: ProposalResponse,
}

impl HttpProposalApi {
    pub fn new(
        api_url: &str,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ProposalApiError> {
        let api_url = api_url.trim().trim_end_matches('/');
        let api_key = api_key
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or(ProposalApiError::MissingCredentials)?;
        if api_url.is_empty() {
            return Err(ProposalApiError::MissingCredentials);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ProposalApiError::Transport(err.to_string()))?;

        Ok(Self { client, endpoint: format!("{api_url}/v3/proposals"), api_key })
    }

    pub fn from_config(config: &ProposalsConfig) -> Result<Self, ProposalApiError> {
        Self::new(&config.api_url, config.api_key.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ProposalApi for HttpProposalApi {
    async fn create_proposal(
        &self,
        payload: &ProposalPayload,
    ) -> Result<ProposalResponse, ProposalApiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(|err| ProposalApiError::Transport(err.to_string()))?;

        let status = response.status();
        let text =
            response.text().await.map_err(|err| ProposalApiError::Transport(err.to_string()))?;

        if !status.is_success() {
            let message = extract_error_message(&text);
            warn!(
                event_name = "proposal.submit.rejected",
                status = status.as_u16(),
                message = %message,
                "proposal api rejected the payload"
            );
            return Err(ProposalApiError::Status { status: status.as_u16(), message });
        }

        let body: CreateProposalResponse =
            serde_json::from_str(&text).map_err(|err| ProposalApiError::Decode(err.to_string()))?;
        info!(
            event_name = "proposal.submit.accepted",
            proposal_uuid = %body.proposal.uuid,
            "proposal created"
        );
        Ok(body.proposal)
    }
}

/// The body's `error`, then `message`, then the raw text, then a fixed fallback.
fn extract_error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["error", "message"].into_iter().find_map(|key| match value.get(key) {
            Some(Value::String(text)) if !text.is_empty() => Some(text.clone()),
            Some(Value::Null) | Some(Value::Bool(false)) | None => None,
            Some(Value::String(_)) => None,
            Some(other) => Some(other.to_string()),
        })
    });

    from_json
        .or_else(|| (!body.is_empty()).then(|| body.to_string()))
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}
