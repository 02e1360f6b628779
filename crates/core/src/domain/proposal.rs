use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::draft::ContentBlock;

pub const DEFAULT_ATTACHMENT_MIME_TYPE: &str = "application/octet-stream";
pub const DEFAULT_ATTACHMENT_NAME: &str = "attachment";

/// Destination settings that come from configuration rather than the request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalEnv {
    pub company_id: i64,
    pub language: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecipient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingRecipient {
    pub id: i64,
}

/// Either a recipient record to create or a reference to one that exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipient {
    Existing(ExistingRecipient),
    New(NewRecipient),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalAttachment {
    pub url: String,
    pub mime_type: String,
    pub name: String,
}

/// Request body of the proposal-creation API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProposalPayload {
    pub company_id: i64,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_md: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_md: Option<String>,
    pub recipient: Recipient,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<ContentBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<ProposalAttachment>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalResponse {
    pub uuid: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ExistingRecipient, NewRecipient, Recipient};

    #[test]
    fn recipient_variant_is_selected_by_populated_fields() {
        let existing: Recipient = serde_json::from_value(json!({ "id": 42 })).expect("existing");
        assert_eq!(existing, Recipient::Existing(ExistingRecipient { id: 42 }));

        let new: Recipient =
            serde_json::from_value(json!({ "first_name": "John", "email": "john@example.com" }))
                .expect("new");
        assert_eq!(
            new,
            Recipient::New(NewRecipient {
                first_name: Some("John".to_string()),
                email: Some("john@example.com".to_string()),
                ..NewRecipient::default()
            })
        );
    }

    #[test]
    fn new_recipient_serializes_without_unset_fields() {
        let recipient = Recipient::New(NewRecipient {
            first_name: Some("Madonna".to_string()),
            last_name: Some(String::new()),
            ..NewRecipient::default()
        });

        let value = serde_json::to_value(&recipient).expect("serialize");

        assert_eq!(value, json!({ "first_name": "Madonna", "last_name": "" }));
    }
}
