//! Logging of catalog items whose GUID agent the tracking service can't match.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

/// Parsed catalog GUID, e.g. `com.plexapp.agents.imdb://tt0111161`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGuid {
    pub agent: String,
    pub id: String,
}

impl ItemGuid {
    pub fn new(agent: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            agent: agent.into(),
            id: id.into(),
        }
    }
}

/// Display fields of a catalog item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSummary {
    pub title: Option<String>,
    pub year: Option<i32>,
}

/// Log that `rating_key`'s GUID agent is unsupported
///
/// With `seen`, each rating key is logged at most once: keys already in the
/// set are skipped, new ones are added. Returns whether a line was logged.
pub fn log_unsupported_guid(
    rating_key: i64,
    guid: Option<&ItemGuid>,
    item: &ItemSummary,
    seen: Option<&mut HashSet<i64>>,
) -> bool {
    if let Some(seen) = seen {
        if !seen.insert(rating_key) {
            return false;
        }
    }

    let agent = match guid {
        Some(guid) => format!("'{}'", guid.agent),
        None => "None".to_string(),
    };

    match (item.title.as_deref(), item.year) {
        (Some(title), Some(year)) if !title.is_empty() => info!(
            rating_key,
            "[{}] GUID agent {} is not supported on: '{}' ({})",
            rating_key,
            agent,
            title,
            year
        ),
        _ => info!(
            rating_key,
            "[{}] GUID agent {} is not supported", rating_key, agent
        ),
    }

    true
}
