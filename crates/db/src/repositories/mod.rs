use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use proposey_core::audit::{ProposalLogEntry, ProposalLogRecord, ProposalLogSink};
use proposey_core::errors::ApplicationError;

pub mod memory;
pub mod proposal_log;

pub use memory::InMemoryProposalLogRepository;
pub use proposal_log::SqlProposalLogRepository;

/// Page size for history listings when the caller does not pick one.
pub const DEFAULT_RECENT_LIMIT: u32 = 10;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ProposalLogRepository: Send + Sync {
    async fn log_generated_proposal(
        &self,
        entry: ProposalLogEntry,
    ) -> Result<ProposalLogRecord, RepositoryError>;

    /// Newest first.
    async fn recent_proposals(&self, limit: u32)
        -> Result<Vec<ProposalLogRecord>, RepositoryError>;

    /// Newest first.
    async fn find_by_email(&self, email: &str)
        -> Result<Vec<ProposalLogRecord>, RepositoryError>;
}

/// Adapts a [`ProposalLogRepository`] to the pipeline's history sink.
#[derive(Clone)]
pub struct ProposalLogRecorder {
    repository: Arc<dyn ProposalLogRepository>,
}

impl ProposalLogRecorder {
    pub fn new(repository: Arc<dyn ProposalLogRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ProposalLogSink for ProposalLogRecorder {
    async fn log_generated_proposal(
        &self,
        entry: ProposalLogEntry,
    ) -> Result<i64, ApplicationError> {
        self.repository
            .log_generated_proposal(entry)
            .await
            .map(|record| record.id)
            .map_err(|error| ApplicationError::Persistence(error.to_string()))
    }
}
