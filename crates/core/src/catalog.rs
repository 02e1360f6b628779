use crate::domain::product::{AvailableProducts, ContentId, ContentItem};

const DEFAULT_ITEMS: &[(i64, &str, &str)] = &[
    (101, "Standard Meeting Room Package", "meeting"),
    (102, "Executive Boardroom", "meeting"),
    (103, "Guest Room Block - Standard", "accommodation"),
    (104, "Guest Room Block - Suite", "accommodation"),
    (105, "Continental Breakfast Service", "catering"),
    (106, "Lunch & Dinner Catering", "catering"),
    (107, "Coffee Break Service", "catering"),
    (108, "AV Equipment Package", "technology"),
    (109, "Wireless Presentation Setup", "technology"),
    (110, "Event Coordination Service", "service"),
];

/// Venue content library offered to every proposal.
pub fn default_catalog() -> AvailableProducts {
    AvailableProducts::new(
        DEFAULT_ITEMS
            .iter()
            .map(|(id, name, category)| ContentItem {
                id: ContentId(*id),
                name: (*name).to_string(),
                category: (*category).to_string(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::default_catalog;
    use crate::domain::product::ContentId;

    #[test]
    fn default_catalog_ids_are_unique_and_ordered() {
        let catalog = default_catalog();
        let ids = catalog.content_items.iter().map(|item| item.id.0).collect::<Vec<_>>();

        assert_eq!(ids, (101..=110).collect::<Vec<_>>());
        assert_eq!(catalog.content_ids().len(), catalog.content_items.len());
    }

    #[test]
    fn find_resolves_catalog_entries() {
        let catalog = default_catalog();

        let item = catalog.find(ContentId(108)).expect("AV package should exist");
        assert_eq!(item.category, "technology");
        assert!(catalog.find(ContentId(999)).is_none());
    }
}
