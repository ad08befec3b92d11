//! # Sync Configuration
//!
//! User preferences for a sync run: one optional [`SyncMode`] per
//! configuration key (`sync.ratings.mode`, ...). A key that is absent and a
//! key explicitly set to `null` mean the same thing: the facet is disabled.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{SyncConfiguration, SyncMode};
//!
//! let config = SyncConfiguration::builder()
//!     .mode("sync.ratings.mode", SyncMode::Full)
//!     .disable("sync.watched.mode")
//!     .build();
//!
//! let parsed = SyncConfiguration::from_json(r#"{"sync.ratings.mode": "full"}"#)?;
//! assert_eq!(config.get("sync.ratings.mode"), parsed.get("sync.ratings.mode"));
//! ```

use crate::{media::SyncMode, Result, SyncError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only key → mode preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncConfiguration {
    values: HashMap<String, Option<SyncMode>>,
}

impl SyncConfiguration {
    /// Create a builder
    pub fn builder() -> SyncConfigurationBuilder {
        SyncConfigurationBuilder::default()
    }

    /// Configuration with every key unset
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `key: mode | null` pairs
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] when the document is not an object
    /// or a mode string is not recognised.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SyncError::Configuration(format!("invalid sync configuration: {}", e)))
    }

    /// Configured mode for `key`, `None` when unset
    pub fn get(&self, key: &str) -> Option<SyncMode> {
        self.values.get(key).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builder for [`SyncConfiguration`]
#[derive(Debug, Default)]
pub struct SyncConfigurationBuilder {
    values: HashMap<String, Option<SyncMode>>,
}

impl SyncConfigurationBuilder {
    /// Allow `mode` for the facet controlled by `key`
    pub fn mode(mut self, key: impl Into<String>, mode: SyncMode) -> Self {
        self.values.insert(key.into(), Some(mode));
        self
    }

    /// Explicitly disable the facet controlled by `key`
    pub fn disable(mut self, key: impl Into<String>) -> Self {
        self.values.insert(key.into(), None);
        self
    }

    pub fn build(self) -> SyncConfiguration {
        SyncConfiguration {
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = SyncConfiguration::builder()
            .mode("sync.ratings.mode", SyncMode::Full)
            .mode("sync.watched.mode", SyncMode::Pull)
            .disable("sync.collection.mode")
            .build();

        assert_eq!(config.get("sync.ratings.mode"), Some(SyncMode::Full));
        assert_eq!(config.get("sync.watched.mode"), Some(SyncMode::Pull));
        assert_eq!(config.get("sync.collection.mode"), None);
        assert_eq!(config.get("sync.playback.mode"), None);
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn test_from_json() {
        let config = SyncConfiguration::from_json(
            r#"{
                "sync.ratings.mode": "full",
                "sync.playback.mode": "fast_pull",
                "sync.watched.mode": null
            }"#,
        )
        .unwrap();

        assert_eq!(config.get("sync.ratings.mode"), Some(SyncMode::Full));
        assert_eq!(config.get("sync.playback.mode"), Some(SyncMode::FastPull));
        assert_eq!(config.get("sync.watched.mode"), None);
    }

    #[test]
    fn test_from_json_rejects_unknown_mode() {
        let result = SyncConfiguration::from_json(r#"{"sync.ratings.mode": "both"}"#);
        assert!(matches!(result, Err(SyncError::Configuration(_))));

        let result = SyncConfiguration::from_json("[1, 2]");
        assert!(matches!(result, Err(SyncError::Configuration(_))));
    }

    #[test]
    fn test_empty() {
        let config = SyncConfiguration::empty();
        assert!(config.is_empty());
        assert_eq!(config.get("sync.ratings.mode"), None);
    }
}
