//! Draft guardrails: the model may only reference catalog content it was shown.
//!
//! Shape violations reject the whole draft. Unknown `content_id`s are a
//! business-rule violation and are dropped silently so an otherwise good draft
//! still goes out.

use std::collections::BTreeSet;

use proposey_core::domain::draft::{DraftCandidate, SanitizedDraft};
use proposey_core::domain::product::ContentId;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DraftValidationError {
    #[error("draft is not valid json: {0}")]
    Parse(String),
    #[error("draft does not match the expected shape: {0}")]
    Schema(String),
}

pub fn sanitize(
    raw_json: &str,
    available_content_ids: &BTreeSet<ContentId>,
) -> Result<SanitizedDraft, DraftValidationError> {
    let parsed: Value = serde_json::from_str(raw_json)
        .map_err(|err| DraftValidationError::Parse(err.to_string()))?;
    let candidate: DraftCandidate = serde_json::from_value(parsed)
        .map_err(|err| DraftValidationError::Schema(err.to_string()))?;

    Ok(sanitize_candidate(candidate, available_content_ids))
}

/// Whitelists block references on an already-typed candidate. Attachments pass through untouched.
pub fn sanitize_candidate(
    candidate: DraftCandidate,
    available_content_ids: &BTreeSet<ContentId>,
) -> SanitizedDraft {
    let DraftCandidate { title_md, description_md, data, blocks, attachments } = candidate;

    let (blocks, dropped): (Vec<_>, Vec<_>) = blocks
        .into_iter()
        .partition(|block| available_content_ids.contains(&block.content_id));

    if !dropped.is_empty() {
        debug!(
            event_name = "draft.blocks.dropped",
            dropped = ?dropped.iter().map(|block| block.content_id.0).collect::<Vec<_>>(),
            kept = blocks.len(),
            "removed block references outside the catalog"
        );
    }

    SanitizedDraft { title_md, description_md, data, blocks, attachments }
}
