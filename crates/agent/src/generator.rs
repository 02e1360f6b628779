use std::sync::Arc;

use proposey_core::domain::customer::ProposalRequest;
use proposey_core::domain::draft::{DraftCandidate, SanitizedDraft};
use proposey_core::domain::product::AvailableProducts;
use proposey_core::domain::proposal::{ProposalEnv, ProposalPayload};
use proposey_core::payload::build_payload;
use proposey_core::prompt::{build_prompt, PromptInput};
use serde_json::json;
use tracing::{info, warn};

use crate::guardrails::sanitize;
use crate::llm::{LlmClient, LlmError, OutputSchema};
use crate::runtime::PipelineError;

pub const DRAFT_SCHEMA_NAME: &str = "proposal_draft";

/// Shape every generated draft must have.
pub fn draft_output_schema() -> OutputSchema {
    OutputSchema {
        name: DRAFT_SCHEMA_NAME.to_string(),
        schema: json!({
            "type": "object",
            "properties": {
                "title_md": { "type": "string" },
                "description_md": { "type": "string" },
                "data": { "type": "object", "additionalProperties": true, "default": {} },
                "blocks": {
                    "type": "array",
                    "default": [],
                    "items": {
                        "type": "object",
                        "properties": { "content_id": { "type": "integer" } },
                        "required": ["content_id"],
                    },
                },
                "attachments": {
                    "type": "array",
                    "default": [],
                    "items": {
                        "type": "object",
                        "properties": {
                            "url": { "type": "string" },
                            "mime_type": { "type": "string" },
                            "name": { "type": "string" },
                        },
                        "required": ["url"],
                    },
                },
            },
            "required": ["title_md", "description_md"],
        }),
    }
}

#[derive(Clone)]
pub struct DraftGenerator {
    llm: Arc<dyn LlmClient>,
}

impl DraftGenerator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn generate_draft(
        &self,
        prompt: &str,
        output_schema: &OutputSchema,
    ) -> Result<DraftCandidate, LlmError> {
        let value = self.llm.generate_object(prompt, output_schema).await?;
        serde_json::from_value(value).map_err(|err| LlmError::Schema(err.to_string()))
    }

    /// Prompt, generate, and whitelist blocks against `catalog` in one call.
    ///
    /// The raw model value goes back through [`sanitize`] so shape problems surface
    /// as a draft validation failure rather than a provider failure.
    pub async fn generate_proposal_draft(
        &self,
        request: &ProposalRequest,
        catalog: &AvailableProducts,
    ) -> Result<SanitizedDraft, PipelineError> {
        let prompt = build_prompt(PromptInput::for_request(request, catalog));

        let value = self
            .llm
            .generate_object(&prompt, &draft_output_schema())
            .await
            .map_err(|error| {
                warn!(
                    event_name = "proposal.draft.generation_failed",
                    error = %error,
                    "draft generation failed"
                );
                PipelineError::Generation(error)
            })?;

        let proposed_blocks = value["blocks"].as_array().map_or(0, Vec::len);
        let draft = sanitize(&value.to_string(), &catalog.content_ids()).map_err(|error| {
            warn!(
                event_name = "proposal.draft.rejected",
                error = %error,
                "generated draft failed validation"
            );
            PipelineError::DraftValidation(error)
        })?;
        info!(
            event_name = "proposal.draft.generated",
            proposed_blocks,
            kept_blocks = draft.blocks.len(),
            has_attachments = draft.has_attachments(),
            "proposal draft generated"
        );

        Ok(draft)
    }

    /// Validates the request, drafts it, and builds the payload that would be submitted.
    pub async fn draft_payload(
        &self,
        request: &ProposalRequest,
        catalog: &AvailableProducts,
        env: &ProposalEnv,
    ) -> Result<(SanitizedDraft, ProposalPayload), PipelineError> {
        request.validate()?;
        let draft = self.generate_proposal_draft(request, catalog).await?;
        let payload = build_payload(request.customer_event(), &draft, env);
        Ok((draft, payload))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use proposey_core::catalog::default_catalog;
    use proposey_core::domain::customer::{
        CustomerInput, EventDetails, Preferences, ProposalRequest,
    };
    use proposey_core::domain::draft::ContentBlock;
    use proposey_core::domain::product::ContentId;
    use proposey_core::domain::proposal::ProposalEnv;
    use serde_json::{json, Value};

    use super::{draft_output_schema, DraftGenerator};
    use crate::guardrails::DraftValidationError;
    use crate::llm::{LlmClient, LlmError, LlmErrorKind, OutputSchema};
    use crate::runtime::PipelineError;

    struct ScriptedLlm {
        response: Result<Value, u16>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedLlm {
        fn answering(value: Value) -> Arc<Self> {
            Arc::new(Self { response: Ok(value), prompts: Mutex::new(Vec::new()) })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self { response: Err(status), prompts: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn generate_object(
            &self,
            prompt: &str,
            schema: &OutputSchema,
        ) -> Result<Value, LlmError> {
            assert_eq!(schema.name, "proposal_draft");
            self.prompts.lock().expect("prompt log").push(prompt.to_string());
            match &self.response {
                Ok(value) => Ok(value.clone()),
                Err(status) => Err(LlmError::from_status(*status, "provider down")),
            }
        }
    }

    fn request() -> ProposalRequest {
        ProposalRequest {
            customer: CustomerInput {
                customer_name: "John Smith".to_string(),
                customer_email: "john@example.com".to_string(),
                company_name: "ABC Corp".to_string(),
            },
            event: EventDetails {
                event_type: "Corporate Meeting".to_string(),
                start_date: "2024-06-01".to_string(),
                end_date: "2024-06-03".to_string(),
                guest_count: 50,
                rooms_needed: 25,
            },
            preferences: Preferences {
                tone: "professional".to_string(),
                additional_brief: String::new(),
            },
            requested_services: vec!["meeting".to_string()],
        }
    }

    #[test]
    fn schema_requires_title_and_description() {
        let schema = draft_output_schema();
        assert_eq!(schema.schema["required"], json!(["title_md", "description_md"]));
        assert_eq!(schema.schema["properties"]["blocks"]["default"], json!([]));
    }

    #[tokio::test]
    async fn generated_draft_is_whitelisted_against_catalog() {
        let llm = ScriptedLlm::answering(json!({
            "title_md": "# ABC Corp Corporate Meeting",
            "description_md": "A professional offer",
            "data": { "nights": 2 },
            "blocks": [{ "content_id": 101 }, { "content_id": 999 }, { "content_id": 108 }],
        }));
        let generator = DraftGenerator::new(llm.clone());

        let draft = generator
            .generate_proposal_draft(&request(), &default_catalog())
            .await
            .expect("draft should generate");

        assert_eq!(
            draft.blocks,
            vec![
                ContentBlock { content_id: ContentId(101) },
                ContentBlock { content_id: ContentId(108) }
            ]
        );
        let prompts = llm.prompts.lock().expect("prompt log");
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- Requested Services: meeting"));
        assert!(prompts[0].contains("content_id: 110"));
    }

    #[tokio::test]
    async fn draft_payload_transforms_the_sanitized_draft() {
        let generator = DraftGenerator::new(ScriptedLlm::answering(json!({
            "title_md": "# ABC Corp Corporate Meeting",
            "description_md": "A professional offer",
            "blocks": [{ "content_id": 101.0 }, { "content_id": 999 }],
        })));
        let env = ProposalEnv { company_id: 9, language: "sv".to_string() };

        let (draft, payload) = generator
            .draft_payload(&request(), &default_catalog(), &env)
            .await
            .expect("payload should build");

        assert_eq!(payload.company_id, 9);
        assert_eq!(payload.language, "sv");
        assert_eq!(payload.title_md.as_deref(), Some(draft.title_md.as_str()));
        assert_eq!(payload.blocks, Some(vec![ContentBlock { content_id: ContentId(101) }]));
        assert!(payload.attachments.is_none());
    }

    #[tokio::test]
    async fn draft_payload_rejects_blank_names_before_calling_the_model() {
        let llm = ScriptedLlm::answering(json!({ "title_md": "T", "description_md": "D" }));
        let generator = DraftGenerator::new(llm.clone());
        let mut blank = request();
        blank.customer.customer_name = "  ".to_string();
        let env = ProposalEnv { company_id: 9, language: "en".to_string() };

        let error = generator
            .draft_payload(&blank, &default_catalog(), &env)
            .await
            .expect_err("blank name should fail");

        assert!(matches!(error, PipelineError::Request(_)));
        assert!(llm.prompts.lock().expect("prompt log").is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_reported_as_generation_stage() {
        let generator = DraftGenerator::new(ScriptedLlm::failing(503));

        let error = generator
            .generate_proposal_draft(&request(), &default_catalog())
            .await
            .expect_err("provider failure should propagate");

        assert_eq!(error.stage(), "generation");
        assert!(matches!(
            error,
            PipelineError::Generation(LlmError::Status { kind: LlmErrorKind::ServerError, .. })
        ));
    }

    #[tokio::test]
    async fn off_schema_output_fails_draft_validation_stage() {
        let generator = DraftGenerator::new(ScriptedLlm::answering(json!({
            "title_md": "# ABC Corp",
            "blocks": [{ "content_id": 101 }],
        })));

        let error = generator
            .generate_proposal_draft(&request(), &default_catalog())
            .await
            .expect_err("missing description should fail");

        assert_eq!(error.stage(), "draft_validation");
        assert!(matches!(error, PipelineError::DraftValidation(DraftValidationError::Schema(_))));
    }

    #[tokio::test]
    async fn off_schema_output_is_an_llm_error() {
        let generator =
            DraftGenerator::new(ScriptedLlm::answering(json!({ "title_md": "# only a title" })));

        let error = generator
            .generate_draft("prompt", &draft_output_schema())
            .await
            .expect_err("missing description should fail");

        assert!(matches!(error, LlmError::Schema(ref message) if message.contains("description_md")));
    }
}
