//! # Sync Vocabulary
//!
//! Media categories, data facets and sync directions, plus the two static
//! tables that relate them:
//!
//! - [`DataMap`]: which data facets apply to which media category
//! - [`PreferenceMap`]: which configuration key controls each data facet
//!
//! ```text
//! Movies   → Collection, Playback, Ratings, Watched
//! Shows    → Ratings
//! Seasons  → Ratings
//! Episodes → Collection, Playback, Ratings, Watched
//! ```

use crate::SyncError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

// ============================================================================
// Enums
// ============================================================================

/// A class of library item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMedia {
    Movies,
    Shows,
    Seasons,
    Episodes,
}

impl SyncMedia {
    pub const ALL: [SyncMedia; 4] = [
        SyncMedia::Movies,
        SyncMedia::Shows,
        SyncMedia::Seasons,
        SyncMedia::Episodes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMedia::Movies => "movies",
            SyncMedia::Shows => "shows",
            SyncMedia::Seasons => "seasons",
            SyncMedia::Episodes => "episodes",
        }
    }
}

impl FromStr for SyncMedia {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movies" => Ok(SyncMedia::Movies),
            "shows" => Ok(SyncMedia::Shows),
            "seasons" => Ok(SyncMedia::Seasons),
            "episodes" => Ok(SyncMedia::Episodes),
            _ => Err(SyncError::Configuration(format!("unknown media: {}", s))),
        }
    }
}

impl fmt::Display for SyncMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A facet of state being synchronized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncData {
    Collection,
    Playback,
    Ratings,
    Watched,
    Watchlist,
}

impl SyncData {
    pub const ALL: [SyncData; 5] = [
        SyncData::Collection,
        SyncData::Playback,
        SyncData::Ratings,
        SyncData::Watched,
        SyncData::Watchlist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncData::Collection => "collection",
            SyncData::Playback => "playback",
            SyncData::Ratings => "ratings",
            SyncData::Watched => "watched",
            SyncData::Watchlist => "watchlist",
        }
    }
}

impl FromStr for SyncData {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "collection" => Ok(SyncData::Collection),
            "playback" => Ok(SyncData::Playback),
            "ratings" => Ok(SyncData::Ratings),
            "watched" => Ok(SyncData::Watched),
            "watchlist" => Ok(SyncData::Watchlist),
            _ => Err(SyncError::Configuration(format!("unknown data: {}", s))),
        }
    }
}

impl fmt::Display for SyncData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a sync operation
///
/// `Full` is only ever a preference value. It expands to every concrete
/// direction and is never itself a dispatch direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    FastPull,
    Pull,
    Push,
    Full,
}

impl SyncMode {
    /// Directions a handler can actually be run with
    pub const CONCRETE: [SyncMode; 3] = [SyncMode::FastPull, SyncMode::Pull, SyncMode::Push];

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::FastPull => "fast_pull",
            SyncMode::Pull => "pull",
            SyncMode::Push => "push",
            SyncMode::Full => "full",
        }
    }

    pub fn is_concrete(&self) -> bool {
        !matches!(self, SyncMode::Full)
    }

    /// Runtime directions allowed by this preference value
    pub fn expand(&self) -> &'static [SyncMode] {
        match self {
            SyncMode::FastPull => &[SyncMode::FastPull],
            SyncMode::Pull => &[SyncMode::Pull],
            SyncMode::Push => &[SyncMode::Push],
            SyncMode::Full => &Self::CONCRETE,
        }
    }
}

impl FromStr for SyncMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fast_pull" | "fastpull" => Ok(SyncMode::FastPull),
            "pull" => Ok(SyncMode::Pull),
            "push" => Ok(SyncMode::Push),
            "full" => Ok(SyncMode::Full),
            _ => Err(SyncError::Configuration(format!("unknown sync mode: {}", s))),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tables
// ============================================================================

static STANDARD_DATA_MAP: LazyLock<DataMap> = LazyLock::new(|| {
    let items = vec![
        SyncData::Collection,
        SyncData::Playback,
        SyncData::Ratings,
        SyncData::Watched,
    ];

    DataMap::new()
        .with(SyncMedia::Movies, items.clone())
        .with(SyncMedia::Shows, vec![SyncData::Ratings])
        .with(SyncMedia::Seasons, vec![SyncData::Ratings])
        .with(SyncMedia::Episodes, items)
});

static STANDARD_PREFERENCE_MAP: LazyLock<PreferenceMap> = LazyLock::new(|| {
    PreferenceMap::new()
        .with(SyncData::Collection, PreferenceKey::Key("sync.collection.mode"))
        .with(SyncData::Playback, PreferenceKey::Key("sync.playback.mode"))
        .with(SyncData::Ratings, PreferenceKey::Key("sync.ratings.mode"))
        .with(SyncData::Watched, PreferenceKey::Key("sync.watched.mode"))
        .with(SyncData::Watchlist, PreferenceKey::Unsupported)
});

/// Ordered data facets per media category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataMap {
    entries: HashMap<SyncMedia, Vec<SyncData>>,
}

impl DataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// The table used by every sync run unless a custom one is supplied
    pub fn standard() -> &'static DataMap {
        &STANDARD_DATA_MAP
    }

    pub fn with(mut self, media: SyncMedia, data: Vec<SyncData>) -> Self {
        self.entries.insert(media, data);
        self
    }

    /// Data facets for `media` in declaration order (empty when undeclared)
    pub fn get(&self, media: SyncMedia) -> &[SyncData] {
        self.entries.get(&media).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// How a data facet is controlled by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceKey {
    /// Configuration key holding the allowed mode
    Key(&'static str),
    /// Facet exists but is never synchronized
    Unsupported,
}

/// Configuration key per data facet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceMap {
    entries: HashMap<SyncData, PreferenceKey>,
}

impl PreferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> &'static PreferenceMap {
        &STANDARD_PREFERENCE_MAP
    }

    pub fn with(mut self, data: SyncData, key: PreferenceKey) -> Self {
        self.entries.insert(data, key);
        self
    }

    pub fn get(&self, data: SyncData) -> Option<PreferenceKey> {
        self.entries.get(&data).copied()
    }
}
