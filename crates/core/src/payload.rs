use crate::domain::customer::{CustomerEvent, CustomerInput};
use crate::domain::draft::{DraftAttachment, SanitizedDraft};
use crate::domain::proposal::{
    NewRecipient, ProposalAttachment, ProposalEnv, ProposalPayload, Recipient,
    DEFAULT_ATTACHMENT_MIME_TYPE, DEFAULT_ATTACHMENT_NAME,
};

/// Splits a full name into `(first, last)`; the last name keeps every token after the first.
pub fn split_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

pub fn recipient_for(customer: &CustomerInput) -> Recipient {
    let (first_name, last_name) = split_name(&customer.customer_name);
    Recipient::New(NewRecipient {
        first_name: Some(first_name),
        last_name: Some(last_name),
        email: Some(customer.customer_email.clone()),
        company_name: Some(customer.company_name.clone()),
    })
}

pub fn build_payload(
    input: CustomerEvent<'_>,
    draft: &SanitizedDraft,
    env: &ProposalEnv,
) -> ProposalPayload {
    let attachments = draft
        .attachments
        .as_deref()
        .filter(|attachments| !attachments.is_empty())
        .map(|attachments| attachments.iter().map(default_attachment).collect());

    ProposalPayload {
        company_id: env.company_id,
        language: env.language.clone(),
        title_md: Some(draft.title_md.clone()),
        description_md: Some(draft.description_md.clone()),
        recipient: recipient_for(input.customer),
        data: Some(draft.data.clone()),
        blocks: Some(draft.blocks.clone()),
        attachments,
    }
}

fn default_attachment(attachment: &DraftAttachment) -> ProposalAttachment {
    ProposalAttachment {
        url: attachment.url.clone(),
        mime_type: non_empty_or(attachment.mime_type.as_deref(), DEFAULT_ATTACHMENT_MIME_TYPE),
        name: non_empty_or(attachment.name.as_deref(), DEFAULT_ATTACHMENT_NAME),
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    value.filter(|value| !value.is_empty()).unwrap_or(fallback).to_string()
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::{build_payload, split_name};
    use crate::domain::customer::{CustomerEvent, CustomerInput, EventDetails};
    use crate::domain::draft::{ContentBlock, DraftAttachment, SanitizedDraft};
    use crate::domain::product::ContentId;
    use crate::domain::proposal::{NewRecipient, ProposalAttachment, ProposalEnv, Recipient};

    fn customer(name: &str) -> CustomerInput {
        CustomerInput {
            customer_name: name.to_string(),
            customer_email: "john@example.com".to_string(),
            company_name: "ABC Corp".to_string(),
        }
    }

    fn event() -> EventDetails {
        EventDetails {
            event_type: "Corporate Meeting".to_string(),
            start_date: "2024-06-01".to_string(),
            end_date: "2024-06-03".to_string(),
            guest_count: 50,
            rooms_needed: 25,
        }
    }

    fn env() -> ProposalEnv {
        ProposalEnv { company_id: 123, language: "en".to_string() }
    }

    fn draft(attachments: Option<Vec<DraftAttachment>>) -> SanitizedDraft {
        let mut data = Map::new();
        data.insert("event_date".to_string(), json!("2024-06-01"));
        data.insert("guests".to_string(), json!(50));
        SanitizedDraft {
            title_md: "# Corporate Event Proposal".to_string(),
            description_md: "Detailed proposal".to_string(),
            data,
            blocks: vec![
                ContentBlock { content_id: ContentId(101) },
                ContentBlock { content_id: ContentId(103) },
            ],
            attachments,
        }
    }

    #[test]
    fn names_split_on_first_whitespace_run() {
        assert_eq!(split_name("John Smith"), ("John".to_string(), "Smith".to_string()));
        assert_eq!(
            split_name("Mary Jane Watson-Parker"),
            ("Mary".to_string(), "Jane Watson-Parker".to_string())
        );
        assert_eq!(split_name("Madonna"), ("Madonna".to_string(), String::new()));
        assert_eq!(
            split_name("  Jean   Luc \t Picard "),
            ("Jean".to_string(), "Luc Picard".to_string())
        );
    }

    #[test]
    fn payload_copies_draft_and_derives_recipient() {
        let customer = customer("John Smith");
        let event = event();
        let draft = draft(None);

        let payload =
            build_payload(CustomerEvent { customer: &customer, event: &event }, &draft, &env());

        assert_eq!(payload.company_id, 123);
        assert_eq!(payload.language, "en");
        assert_eq!(payload.title_md.as_deref(), Some("# Corporate Event Proposal"));
        assert_eq!(payload.description_md.as_deref(), Some("Detailed proposal"));
        assert_eq!(payload.data.as_ref(), Some(&draft.data));
        assert_eq!(payload.blocks.as_ref(), Some(&draft.blocks));
        assert_eq!(
            payload.recipient,
            Recipient::New(NewRecipient {
                first_name: Some("John".to_string()),
                last_name: Some("Smith".to_string()),
                email: Some("john@example.com".to_string()),
                company_name: Some("ABC Corp".to_string()),
            })
        );
    }

    #[test]
    fn missing_attachment_fields_get_defaults() {
        let customer = customer("John Smith");
        let event = event();
        let draft = draft(Some(vec![
            DraftAttachment { url: "https://x/file.pdf".to_string(), mime_type: None, name: None },
            DraftAttachment {
                url: "https://x/menu.pdf".to_string(),
                mime_type: Some("application/pdf".to_string()),
                name: Some("Menu".to_string()),
            },
        ]));

        let payload =
            build_payload(CustomerEvent { customer: &customer, event: &event }, &draft, &env());

        assert_eq!(
            payload.attachments,
            Some(vec![
                ProposalAttachment {
                    url: "https://x/file.pdf".to_string(),
                    mime_type: "application/octet-stream".to_string(),
                    name: "attachment".to_string(),
                },
                ProposalAttachment {
                    url: "https://x/menu.pdf".to_string(),
                    mime_type: "application/pdf".to_string(),
                    name: "Menu".to_string(),
                },
            ])
        );
    }

    #[test]
    fn zero_attachments_omit_the_field_entirely() {
        let customer = customer("Madonna");
        let event = event();

        for attachments in [None, Some(Vec::new())] {
            let payload = build_payload(
                CustomerEvent { customer: &customer, event: &event },
                &draft(attachments),
                &env(),
            );
            let value = serde_json::to_value(&payload).expect("payload should serialize");

            assert!(payload.attachments.is_none());
            assert!(value.get("attachments").is_none());
            assert_eq!(value["recipient"]["last_name"], "");
        }
    }

    #[test]
    fn identical_inputs_serialize_byte_identically() {
        let customer = customer("Mary Jane Watson-Parker");
        let event = event();
        let draft = draft(None);

        let render = || {
            serde_json::to_string(&build_payload(
                CustomerEvent { customer: &customer, event: &event },
                &draft,
                &env(),
            ))
            .expect("payload should serialize")
        };

        assert_eq!(render(), render());
    }
}
