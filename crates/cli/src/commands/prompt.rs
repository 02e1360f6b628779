use std::path::Path;

use proposey_core::catalog::default_catalog;
use proposey_core::prompt::{build_prompt, PromptInput};
use serde_json::json;

use crate::commands::{read_request, CommandResult};

/// Renders the drafting prompt for a request file; no model is called.
pub fn run(request_path: &Path) -> CommandResult {
    let request = match read_request("prompt", request_path) {
        Ok(request) => request,
        Err(result) => return result,
    };

    let catalog = default_catalog();
    let prompt = build_prompt(PromptInput::for_request(&request, &catalog));

    CommandResult::success_with_data(
        "prompt",
        format!("rendered prompt against {} catalog items", catalog.content_items.len()),
        Some(json!({ "prompt": prompt })),
    )
}
