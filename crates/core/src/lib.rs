pub mod audit;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod payload;
pub mod prompt;

pub use audit::{ProposalLogEntry, ProposalLogRecord, ProposalLogSink};
pub use catalog::default_catalog;
pub use domain::customer::{
    CustomerEvent, CustomerInput, EventDetails, Preferences, ProposalRequest,
};
pub use domain::draft::{ContentBlock, DraftAttachment, DraftCandidate, SanitizedDraft};
pub use domain::product::{AvailableProducts, ContentId, ContentItem};
pub use domain::proposal::{
    ExistingRecipient, NewRecipient, ProposalAttachment, ProposalEnv, ProposalPayload,
    ProposalResponse, Recipient,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use payload::{build_payload, split_name};
pub use prompt::{build_prompt, PromptInput};
