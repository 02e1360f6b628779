use chrono::Utc;
use tokio::sync::RwLock;

use proposey_core::audit::{ProposalLogEntry, ProposalLogRecord};

use super::{ProposalLogRepository, RepositoryError};

#[derive(Default)]
pub struct InMemoryProposalLogRepository {
    records: RwLock<Vec<ProposalLogRecord>>,
}

#[async_trait::async_trait]
impl ProposalLogRepository for InMemoryProposalLogRepository {
    async fn log_generated_proposal(
        &self,
        entry: ProposalLogEntry,
    ) -> Result<ProposalLogRecord, RepositoryError> {
        let mut records = self.records.write().await;
        let record = ProposalLogRecord::from_entry(records.len() as i64 + 1, Utc::now(), entry);
        records.push(record.clone());
        Ok(record)
    }

    async fn recent_proposals(
        &self,
        limit: u32,
    ) -> Result<Vec<ProposalLogRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.iter().rev().take(limit as usize).cloned().collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<ProposalLogRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.iter().rev().filter(|record| record.customer_email == email).cloned().collect())
    }
}
