use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::product::ContentId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub content_id: ContentId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAttachment {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Model output as it arrives, before catalog whitelisting.
///
/// Deserializing into this type is the shape check: `title_md` and
/// `description_md` are required, `data` and `blocks` default to empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DraftCandidate {
    pub title_md: String,
    pub description_md: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub blocks: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<DraftAttachment>>,
}

/// A draft whose block references all resolve against the catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SanitizedDraft {
    pub title_md: String,
    pub description_md: String,
    pub data: Map<String, Value>,
    pub blocks: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<DraftAttachment>>,
}

impl SanitizedDraft {
    pub fn has_attachments(&self) -> bool {
        self.attachments.as_ref().is_some_and(|attachments| !attachments.is_empty())
    }
}
