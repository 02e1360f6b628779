use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ApplicationError;

/// Summary of a submitted proposal, recorded for history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalLogEntry {
    pub customer_email: String,
    pub proposal_uuid: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalLogRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub customer_email: String,
    pub proposal_uuid: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
}

impl ProposalLogRecord {
    pub fn from_entry(id: i64, created_at: DateTime<Utc>, entry: ProposalLogEntry) -> Self {
        Self {
            id,
            created_at,
            customer_email: entry.customer_email,
            proposal_uuid: entry.proposal_uuid,
            summary: entry.summary,
            company_name: entry.company_name,
            event_type: entry.event_type,
        }
    }
}

/// Destination for proposal history; returns the stored row id.
#[async_trait]
pub trait ProposalLogSink: Send + Sync {
    async fn log_generated_proposal(&self, entry: ProposalLogEntry)
        -> Result<i64, ApplicationError>;
}
