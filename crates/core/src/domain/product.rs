use std::collections::BTreeSet;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Catalog item id. Deserializes from any integral JSON number, so `101.0` reads as `101`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentId(pub i64);

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ContentIdVisitor)
    }
}

struct ContentIdVisitor;

impl<'de> Visitor<'de> for ContentIdVisitor {
    type Value = ContentId;

    fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("an integral content id")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<ContentId, E> {
        Ok(ContentId(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<ContentId, E> {
        i64::try_from(value)
            .map(ContentId)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<ContentId, E> {
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive.
        let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
        if value.is_finite() && value.fract() == 0.0 && in_range {
            Ok(ContentId(value as i64))
        } else {
            Err(E::invalid_value(de::Unexpected::Float(value), &self))
        }
    }
}

impl std::fmt::Display for ContentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub name: String,
    pub category: String,
}

/// The sellable catalog, in the order it is presented to the model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableProducts {
    pub content_items: Vec<ContentItem>,
}

impl AvailableProducts {
    pub fn new(content_items: Vec<ContentItem>) -> Self {
        Self { content_items }
    }

    pub fn content_ids(&self) -> BTreeSet<ContentId> {
        self.content_items.iter().map(|item| item.id).collect()
    }

    pub fn find(&self, id: ContentId) -> Option<&ContentItem> {
        self.content_items.iter().find(|item| item.id == id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ContentId;

    #[test]
    fn content_id_accepts_integral_numbers_only() {
        let parse = |value: serde_json::Value| serde_json::from_value::<ContentId>(value);

        assert_eq!(parse(json!(101)).expect("integer"), ContentId(101));
        assert_eq!(parse(json!(101.0)).expect("integral float"), ContentId(101));
        assert_eq!(parse(json!(-3)).expect("negative"), ContentId(-3));
        assert!(parse(json!(101.5)).is_err());
        assert!(parse(json!(u64::MAX)).is_err());
        assert!(parse(json!("101")).is_err());
    }
}
