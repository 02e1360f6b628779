//! Proposal agent - the LLM-backed half of the proposal pipeline
//!
//! This crate turns a structured [`ProposalRequest`](proposey_core::ProposalRequest)
//! into a submitted proposal:
//! 1. **Draft generation** (`generator`) - prompt the model for a schema-constrained draft
//! 2. **Guardrails** (`guardrails`) - reject malformed drafts, drop unknown catalog references
//! 3. **Submission** (`tools`) - POST the transformed payload to the proposal service
//! 4. **Orchestration** (`runtime`) - run the stages once per request and log history
//!
//! # Safety Principle
//!
//! The model only writes copy. Which catalog items may appear, who the
//! recipient is, and what gets sent are decided deterministically.

pub mod generator;
pub mod guardrails;
pub mod llm;
pub mod runtime;
pub mod tools;

pub use generator::{draft_output_schema, DraftGenerator};
pub use guardrails::{sanitize, sanitize_candidate, DraftValidationError};
pub use llm::{LlmClient, LlmError, OpenAiCompatibleClient, OutputSchema};
pub use runtime::{PipelineError, ProposalOutcome, ProposalRuntime};
pub use tools::{HttpProposalApi, ProposalApi, ProposalApiError};
