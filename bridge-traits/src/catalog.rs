//! Media Catalog Abstractions
//!
//! Describes the library backend that owns the user's media sections
//! (movie libraries, show libraries, ...). The sync core only ever asks it
//! for sections of a given type; item enumeration is left to the handlers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Kind of library section exposed by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Movie,
    Show,
    Artist,
    Photo,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Movie => "movie",
            SectionType::Show => "show",
            SectionType::Artist => "artist",
            SectionType::Photo => "photo",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A library section as reported by the catalog backend
///
/// `key` is whatever the backend returned; it is usually numeric but
/// nothing guarantees that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
    pub section_type: SectionType,
}

impl LibrarySection {
    pub fn new(key: impl Into<String>, title: impl Into<String>, section_type: SectionType) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            section_type,
        }
    }
}

/// Catalog backend trait
///
/// # Errors
///
/// Implementations return [`BridgeError::NotAvailable`](crate::BridgeError::NotAvailable)
/// (or any other error) when the backend cannot be reached. Callers treat
/// an error as "cannot determine", which is distinct from an empty listing.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::catalog::{CatalogBackend, SectionType};
///
/// async fn count_movie_sections(catalog: &dyn CatalogBackend) -> usize {
///     catalog
///         .list_sections(SectionType::Movie)
///         .await
///         .map(|sections| sections.len())
///         .unwrap_or(0)
/// }
/// ```
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// List every section of `section_type`, in backend order
    async fn list_sections(&self, section_type: SectionType) -> Result<Vec<LibrarySection>>;
}
