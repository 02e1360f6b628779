use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub customer_name: String,
    pub customer_email: String,
    pub company_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub event_type: String,
    pub start_date: String,
    pub end_date: String,
    pub guest_count: u32,
    pub rooms_needed: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub tone: String,
    #[serde(default)]
    pub additional_brief: String,
}

impl Preferences {
    /// The free-form brief, or `None` when it is blank.
    pub fn additional_requirements(&self) -> Option<&str> {
        let brief = self.additional_brief.trim();
        (!brief.is_empty()).then_some(brief)
    }
}

/// Everything a caller supplies to get one proposal generated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    pub customer: CustomerInput,
    pub event: EventDetails,
    pub preferences: Preferences,
    #[serde(default)]
    pub requested_services: Vec<String>,
}

impl ProposalRequest {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.customer.customer_name.trim().is_empty() {
            return Err(DomainError::InvariantViolation(
                "customer.customerName must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    pub fn customer_event(&self) -> CustomerEvent<'_> {
        CustomerEvent { customer: &self.customer, event: &self.event }
    }
}

/// Borrowed customer and event facts handed to the payload transformer.
#[derive(Clone, Copy, Debug)]
pub struct CustomerEvent<'a> {
    pub customer: &'a CustomerInput,
    pub event: &'a EventDetails,
}

#[cfg(test)]
mod tests {
    use super::{CustomerInput, EventDetails, Preferences, ProposalRequest};
    use crate::errors::DomainError;

    fn request(name: &str) -> ProposalRequest {
        ProposalRequest {
            customer: CustomerInput {
                customer_name: name.to_string(),
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
            requested_services: Vec::new(),
        }
    }

    #[test]
    fn request_deserializes_from_camel_case_and_defaults_optional_fields() {
        let raw = r#"{
            "customer": {"customerName": "John Smith", "customerEmail": "john@example.com", "companyName": "ABC Corp"},
            "event": {"eventType": "Corporate Meeting", "startDate": "2024-06-01", "endDate": "2024-06-03", "guestCount": 50, "roomsNeeded": 25},
            "preferences": {"tone": "professional"}
        }"#;

        let parsed: ProposalRequest = serde_json::from_str(raw).expect("request should parse");

        assert_eq!(parsed, request("John Smith"));
    }

    #[test]
    fn blank_customer_name_is_rejected() {
        let error = request("   ").validate().expect_err("blank name must fail");
        assert!(matches!(
            error,
            DomainError::InvariantViolation(ref message) if message.contains("customerName")
        ));
    }

    #[test]
    fn whitespace_brief_counts_as_absent() {
        let preferences =
            Preferences { tone: "casual".to_string(), additional_brief: " \n ".to_string() };
        assert_eq!(preferences.additional_requirements(), None);
    }
}
