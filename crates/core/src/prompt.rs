//! Deterministic prompt rendering for proposal drafting.
//!
//! The prompt enumerates the whole content catalog so the model sees every
//! legal `content_id`; the draft guardrails later drop anything outside it.

use crate::domain::customer::{CustomerInput, EventDetails, Preferences, ProposalRequest};
use crate::domain::product::AvailableProducts;

const DEFAULT_SERVICES: &str = "basic accommodation";

const OUTPUT_FORMAT: &str = r#"Please generate a proposal in JSON format with the following structure:
{
  "title_md": "Markdown-formatted title for the proposal",
  "description_md": "Detailed markdown-formatted description of the proposal",
  "data": {
    "event_date": "YYYY-MM-DD format",
    "guests": number,
    "nights": number,
    // Include any other relevant metadata
  },
  "blocks": [
    { "content_id": number },
    // Include relevant content_ids from the available items above
  ]
}"#;

/// Borrowed inputs for [`build_prompt`].
#[derive(Clone, Copy, Debug)]
pub struct PromptInput<'a> {
    pub customer: &'a CustomerInput,
    pub event: &'a EventDetails,
    pub preferences: &'a Preferences,
    pub requested_services: &'a [String],
    pub products: &'a AvailableProducts,
}

impl<'a> PromptInput<'a> {
    pub fn for_request(request: &'a ProposalRequest, products: &'a AvailableProducts) -> Self {
        Self {
            customer: &request.customer,
            event: &request.event,
            preferences: &request.preferences,
            requested_services: &request.requested_services,
            products,
        }
    }
}

pub fn build_prompt(input: PromptInput<'_>) -> String {
    let PromptInput { customer, event, preferences, requested_services, products } = input;

    let mut lines = vec![
        "Generate a hotel proposal for the following event:".to_string(),
        String::new(),
        "CUSTOMER INFORMATION:".to_string(),
        format!("- Name: {}", customer.customer_name),
        format!("- Email: {}", customer.customer_email),
        format!("- Company: {}", customer.company_name),
        String::new(),
        "EVENT DETAILS:".to_string(),
        format!("- Event Type: {}", event.event_type),
        format!("- Dates: {} to {}", event.start_date, event.end_date),
        format!("- Guest Count: {} guests", event.guest_count),
        format!("- Rooms Needed: {} rooms", event.rooms_needed),
        String::new(),
        "PREFERENCES:".to_string(),
        format!("- Tone: {}", preferences.tone),
        format!("- Requested Services: {}", render_services(requested_services)),
    ];

    if let Some(brief) = preferences.additional_requirements() {
        lines.push(format!("- Additional Requirements: {brief}"));
    }

    lines.push(String::new());
    lines.push("AVAILABLE CONTENT ITEMS (use these content_ids in your blocks):".to_string());
    if products.content_items.is_empty() {
        lines.push("- none available; return an empty blocks list".to_string());
    }
    lines.extend(products.content_items.iter().map(|item| {
        format!("- content_id: {} ({}, category: {})", item.id, item.name, item.category)
    }));

    lines.push(String::new());
    lines.push(OUTPUT_FORMAT.to_string());
    lines.push(String::new());
    lines.push("Requirements:".to_string());
    lines.push("- The title should be compelling and include the company name".to_string());
    lines.push(format!(
        "- The description should be detailed and match the requested tone ({})",
        preferences.tone
    ));
    lines.push(
        "- Only use content_ids from the available content items list provided above".to_string(),
    );
    lines.push("- Select content items that match the requested services and event type".to_string());
    lines.push("- Calculate nights based on the start and end dates".to_string());

    lines.join("\n")
}

fn render_services(requested_services: &[String]) -> String {
    let services = requested_services
        .iter()
        .map(|service| service.trim())
        .filter(|service| !service.is_empty())
        .collect::<Vec<_>>();

    if services.is_empty() {
        DEFAULT_SERVICES.to_string()
    } else {
        services.join(", ")
    }
}
