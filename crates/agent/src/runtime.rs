use std::sync::Arc;

use proposey_core::audit::{ProposalLogEntry, ProposalLogSink};
use proposey_core::config::AuditFailurePolicy;
use proposey_core::domain::customer::ProposalRequest;
use proposey_core::domain::draft::SanitizedDraft;
use proposey_core::domain::product::AvailableProducts;
use proposey_core::domain::proposal::{ProposalEnv, ProposalPayload};
use proposey_core::errors::{ApplicationError, DomainError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::generator::DraftGenerator;
use crate::guardrails::DraftValidationError;
use crate::llm::LlmError;
use crate::tools::{ProposalApi, ProposalApiError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid proposal request: {0}")]
    Request(#[from] DomainError),
    #[error(transparent)]
    Generation(#[from] LlmError),
    #[error(transparent)]
    DraftValidation(#[from] DraftValidationError),
    #[error(transparent)]
    Submission(#[from] ProposalApiError),
    #[error("failed to log proposal: {0}")]
    AuditLog(String),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Request(_) => "request_validation",
            Self::Generation(_) => "generation",
            Self::DraftValidation(_) => "draft_validation",
            Self::Submission(_) => "submission",
            Self::AuditLog(_) => "audit_log",
        }
    }
}

impl From<PipelineError> for ApplicationError {
    fn from(value: PipelineError) -> Self {
        match value {
            PipelineError::Request(error) => Self::Domain(error),
            PipelineError::Generation(LlmError::Configuration(message)) => {
                Self::Configuration(message)
            }
            PipelineError::Generation(error) => Self::Generation(error.to_string()),
            PipelineError::DraftValidation(error) => Self::DraftRejected(error.to_string()),
            PipelineError::Submission(ProposalApiError::MissingCredentials) => {
                Self::Configuration(ProposalApiError::MissingCredentials.to_string())
            }
            PipelineError::Submission(error) => Self::Submission(error.to_string()),
            PipelineError::AuditLog(message) => Self::Persistence(message),
        }
    }
}

/// Result of a submitted proposal. `log_id` is `None` when history logging failed under best effort.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalOutcome {
    pub uuid: String,
    pub url: String,
    pub log_id: Option<i64>,
}

/// Runs one proposal request through generation, sanitizing, submission, and history logging.
#[derive(Clone)]
pub struct ProposalRuntime {
    generator: DraftGenerator,
    proposal_api: Arc<dyn ProposalApi>,
    log_sink: Arc<dyn ProposalLogSink>,
    catalog: AvailableProducts,
    env: ProposalEnv,
    audit_policy: AuditFailurePolicy,
}

impl ProposalRuntime {
    pub fn new(
        generator: DraftGenerator,
        proposal_api: Arc<dyn ProposalApi>,
        log_sink: Arc<dyn ProposalLogSink>,
        catalog: AvailableProducts,
        env: ProposalEnv,
        audit_policy: AuditFailurePolicy,
    ) -> Self {
        Self { generator, proposal_api, log_sink, catalog, env, audit_policy }
    }

    pub fn catalog(&self) -> &AvailableProducts {
        &self.catalog
    }

    /// Builds the payload that would be submitted, without calling the proposal API.
    pub async fn draft_payload(
        &self,
        request: &ProposalRequest,
    ) -> Result<(SanitizedDraft, ProposalPayload), PipelineError> {
        self.generator.draft_payload(request, &self.catalog, &self.env).await
    }

    pub async fn create_proposal(
        &self,
        request: &ProposalRequest,
        correlation_id: &str,
    ) -> Result<ProposalOutcome, PipelineError> {
        let (draft, payload) = self.draft_payload(request).await?;

        let created = self.proposal_api.create_proposal(&payload).await.map_err(|error| {
            warn!(
                event_name = "proposal.pipeline.failed",
                correlation_id,
                stage = "submission",
                error = %error,
                "proposal submission failed"
            );
            PipelineError::Submission(error)
        })?;

        let entry = ProposalLogEntry {
            customer_email: request.customer.customer_email.clone(),
            proposal_uuid: created.uuid.clone(),
            summary: draft.title_md.clone(),
            company_name: Some(request.customer.company_name.clone()),
            event_type: Some(request.event.event_type.clone()),
        };

        let log_id = match self.log_sink.log_generated_proposal(entry).await {
            Ok(id) => Some(id),
            Err(error) => match self.audit_policy {
                AuditFailurePolicy::BestEffort => {
                    warn!(
                        event_name = "proposal.audit.failed",
                        correlation_id,
                        proposal_uuid = %created.uuid,
                        error = %error,
                        "proposal history could not be written; continuing"
                    );
                    None
                }
                AuditFailurePolicy::Strict => {
                    return Err(PipelineError::AuditLog(error.to_string()));
                }
            },
        };

        info!(
            event_name = "proposal.pipeline.completed",
            correlation_id,
            proposal_uuid = %created.uuid,
            log_id = ?log_id,
            blocks = draft.blocks.len(),
            "proposal created"
        );

        Ok(ProposalOutcome { uuid: created.uuid, url: created.url, log_id })
    }
}
