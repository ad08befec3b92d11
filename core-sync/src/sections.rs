//! # Section Lookup
//!
//! Lists the catalog sections of a type that take part in the sync.
//!
//! `None` means the catalog could not be asked (no connection, or the backend
//! reported an error); `Some(vec![])` means it answered and nothing matched.
//! Sections rejected by the name filter and sections whose key is not an
//! integer are skipped, the latter with a warning.

use crate::filters::SectionNameFilter;
use bridge_traits::catalog::{CatalogBackend, SectionType};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Numeric key of a catalog section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionKey(pub i64);

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keys of every valid section of `section_type`, in catalog order
pub async fn lookup_sections(
    catalog: Option<&dyn CatalogBackend>,
    filter: &dyn SectionNameFilter,
    section_type: SectionType,
) -> Option<Vec<SectionKey>> {
    let Some(catalog) = catalog else {
        debug!(section_type = %section_type, "No catalog connection available");
        return None;
    };

    let sections = match catalog.list_sections(section_type).await {
        Ok(sections) => sections,
        Err(err) => {
            warn!(section_type = %section_type, error = %err, "Unable to list sections");
            return None;
        }
    };

    let mut result = Vec::with_capacity(sections.len());

    for section in sections {
        if !filter.is_valid_section_name(&section.title) {
            continue;
        }

        match section.key.parse::<i64>() {
            Ok(key) => result.push(SectionKey(key)),
            Err(err) => {
                warn!(
                    key = %section.key,
                    error = %err,
                    "Unable to cast section key to integer"
                );
            }
        }
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::SectionFilter;
    use async_trait::async_trait;
    use bridge_traits::catalog::LibrarySection;
    use bridge_traits::error::{BridgeError, Result as BridgeResult};

    struct FakeCatalog {
        sections: Option<Vec<LibrarySection>>,
    }

    #[async_trait]
    impl CatalogBackend for FakeCatalog {
        async fn list_sections(&self, section_type: SectionType) -> BridgeResult<Vec<LibrarySection>> {
            match &self.sections {
                Some(sections) => Ok(sections
                    .iter()
                    .filter(|s| s.section_type == section_type)
                    .cloned()
                    .collect()),
                None => Err(BridgeError::NotAvailable("catalog offline".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_unavailable_catalog_returns_none() {
        let catalog = FakeCatalog { sections: None };
        let filter = SectionFilter::allow_all();

        let result = lookup_sections(Some(&catalog), &filter, SectionType::Movie).await;
        assert_eq!(result, None);

        let result = lookup_sections(None, &filter, SectionType::Movie).await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_skips_filtered_and_malformed_sections() {
        let catalog = FakeCatalog {
            sections: Some(vec![
                LibrarySection::new("1", "Movies", SectionType::Movie),
                LibrarySection::new("2", "Home Videos", SectionType::Movie),
                LibrarySection::new("abc", "Documentaries", SectionType::Movie),
            ]),
        };
        let filter = SectionFilter::parse("-Home Videos");

        let result = lookup_sections(Some(&catalog), &filter, SectionType::Movie).await;
        assert_eq!(result, Some(vec![SectionKey(1)]));
    }

    #[tokio::test]
    async fn test_preserves_catalog_order_and_type() {
        let catalog = FakeCatalog {
            sections: Some(vec![
                LibrarySection::new("7", "Anime", SectionType::Show),
                LibrarySection::new("3", "Movies", SectionType::Movie),
                LibrarySection::new("5", "TV Shows", SectionType::Show),
            ]),
        };
        let filter = SectionFilter::allow_all();

        let result = lookup_sections(Some(&catalog), &filter, SectionType::Show).await;
        assert_eq!(result, Some(vec![SectionKey(7), SectionKey(5)]));
    }

    #[tokio::test]
    async fn test_empty_listing_is_not_unavailable() {
        let catalog = FakeCatalog {
            sections: Some(Vec::new()),
        };
        let filter = SectionFilter::allow_all();

        let result = lookup_sections(Some(&catalog), &filter, SectionType::Movie).await;
        assert_eq!(result, Some(Vec::new()));
    }
}
