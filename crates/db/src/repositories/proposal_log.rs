use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;

use proposey_core::audit::{ProposalLogEntry, ProposalLogRecord};

use super::{ProposalLogRepository, RepositoryError};
use crate::DbPool;

const SELECT_COLUMNS: &str =
    "SELECT id, created_at, customer_email, proposal_uuid, summary, company_name, event_type
     FROM proposal_log";

pub struct SqlProposalLogRepository {
    pool: DbPool,
}

impl SqlProposalLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<ProposalLogRecord, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let created_at_str: String =
        row.try_get("created_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let customer_email: String =
        row.try_get("customer_email").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let proposal_uuid: String =
        row.try_get("proposal_uuid").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let summary: String =
        row.try_get("summary").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let company_name: Option<String> =
        row.try_get("company_name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let event_type: Option<String> =
        row.try_get("event_type").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Decode(format!("created_at `{created_at_str}`: {e}")))?;

    Ok(ProposalLogRecord {
        id,
        created_at,
        customer_email,
        proposal_uuid,
        summary,
        company_name,
        event_type,
    })
}

#[async_trait::async_trait]
impl ProposalLogRepository for SqlProposalLogRepository {
    async fn log_generated_proposal(
        &self,
        entry: ProposalLogEntry,
    ) -> Result<ProposalLogRecord, RepositoryError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO proposal_log (created_at, customer_email, proposal_uuid, summary,
                                       company_name, event_type)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        // Fixed-width timestamps keep lexical ordering chronological.
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .bind(&entry.customer_email)
        .bind(&entry.proposal_uuid)
        .bind(&entry.summary)
        .bind(&entry.company_name)
        .bind(&entry.event_type)
        .execute(&self.pool)
        .await?;

        Ok(ProposalLogRecord::from_entry(result.last_insert_rowid(), created_at, entry))
    }

    async fn recent_proposals(
        &self,
        limit: u32,
    ) -> Result<Vec<ProposalLogRecord>, RepositoryError> {
        let rows =
            sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC LIMIT ?"))
                .bind(i64::from(limit))
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(row_to_record).collect()
    }

    async fn find_by_email(&self, email: &str) -> Result<Vec<ProposalLogRecord>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE customer_email = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect()
    }
}
