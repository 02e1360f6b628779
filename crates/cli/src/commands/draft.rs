use std::path::Path;
use std::sync::Arc;

use proposey_agent::generator::DraftGenerator;
use proposey_agent::llm::OpenAiCompatibleClient;
use proposey_core::catalog::default_catalog;
use serde_json::json;

use crate::commands::{
    current_thread_runtime, load_config, read_request, CommandResult, EXIT_CONFIG, EXIT_PIPELINE,
};

/// Generates and sanitizes a draft, then prints the payload without submitting it.
pub fn run(request_path: &Path) -> CommandResult {
    let request = match read_request("draft", request_path) {
        Ok(request) => request,
        Err(result) => return result,
    };
    let config = match load_config("draft") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let llm = match OpenAiCompatibleClient::from_config(&config.llm) {
        Ok(llm) => llm,
        Err(error) => {
            return CommandResult::failure(
                "draft",
                "config_validation",
                format!("llm client setup failed: {error}"),
                EXIT_CONFIG,
            );
        }
    };
    let runtime = match current_thread_runtime("draft") {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let generator = DraftGenerator::new(Arc::new(llm));
    let catalog = default_catalog();
    let env = config.proposals.proposal_env();

    let result = runtime.block_on(generator.draft_payload(&request, &catalog, &env));

    match result {
        Ok((draft, payload)) => CommandResult::success_with_data(
            "draft",
            format!("draft kept {} catalog blocks", draft.blocks.len()),
            Some(json!({ "draft": draft, "payload": payload })),
        ),
        Err(error) => {
            CommandResult::failure("draft", error.stage(), error.to_string(), EXIT_PIPELINE)
        }
    }
}
