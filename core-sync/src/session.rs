//! # Sync Session
//!
//! The session is the single source of truth shared by every node of a mode
//! tree. It owns the handler registry and the cancellation token, and holds
//! the *current* unit of work, which carries the configuration and the
//! backend connections of the run in progress.
//!
//! ```text
//! SyncSession
//!   ├── handlers: HandlerRegistry
//!   ├── data / preference tables
//!   ├── cancellation: CancellationToken
//!   └── current: Option<SyncWork>
//!         ├── configuration
//!         ├── section filter
//!         ├── checkpoints: Option<CheckpointStore>
//!         └── state: Option<SyncState>
//!               ├── catalog: Option<CatalogBackend>
//!               └── tracking: Option<TrackingClient>
//! ```
//!
//! Nodes never cache anything from the session; swapping the current work
//! before a run is visible to every node immediately.

use crate::{
    configuration::SyncConfiguration,
    dispatch::HandlerRegistry,
    filters::{SectionFilter, SectionNameFilter},
    media::{DataMap, PreferenceMap},
    preferences::PreferenceResolver,
    Result, SyncError,
};
use bridge_traits::{CatalogBackend, CheckpointStore, TrackingClient};
use std::fmt;
use std::sync::{Arc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Backend connections of a run; either may be missing
#[derive(Clone, Default)]
pub struct SyncState {
    pub catalog: Option<Arc<dyn CatalogBackend>>,
    pub tracking: Option<Arc<dyn TrackingClient>>,
}

impl SyncState {
    pub fn new(
        catalog: Option<Arc<dyn CatalogBackend>>,
        tracking: Option<Arc<dyn TrackingClient>>,
    ) -> Self {
        Self { catalog, tracking }
    }
}

impl fmt::Debug for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncState")
            .field("catalog", &self.catalog.as_ref().map(|_| "CatalogBackend { ... }"))
            .field(
                "tracking",
                &self.tracking.as_ref().map(|_| "TrackingClient { ... }"),
            )
            .finish()
    }
}

/// The run in progress
pub struct SyncWork {
    id: Uuid,
    configuration: Arc<SyncConfiguration>,
    section_filter: Arc<dyn SectionNameFilter>,
    state: Option<SyncState>,
    checkpoints: Option<Arc<dyn CheckpointStore>>,
}

impl SyncWork {
    pub fn new(configuration: SyncConfiguration) -> Self {
        Self {
            id: Uuid::new_v4(),
            configuration: Arc::new(configuration),
            section_filter: Arc::new(SectionFilter::allow_all()),
            state: None,
            checkpoints: None,
        }
    }

    pub fn with_state(mut self, state: SyncState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_section_filter(mut self, filter: Arc<dyn SectionNameFilter>) -> Self {
        self.section_filter = filter;
        self
    }

    pub fn with_checkpoints(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.checkpoints = Some(store);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn configuration(&self) -> &Arc<SyncConfiguration> {
        &self.configuration
    }

    pub fn section_filter(&self) -> &Arc<dyn SectionNameFilter> {
        &self.section_filter
    }

    pub fn state(&self) -> Option<&SyncState> {
        self.state.as_ref()
    }

    /// Record a checkpoint, a no-op without a checkpoint store
    pub async fn checkpoint(&self) -> Result<()> {
        let Some(store) = self.checkpoints.as_ref() else {
            return Ok(());
        };

        debug!(work_id = %self.id, "Writing checkpoint");
        store
            .checkpoint()
            .await
            .map_err(|e| SyncError::Checkpoint(e.to_string()))
    }
}

impl fmt::Debug for SyncWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncWork")
            .field("id", &self.id)
            .field("configuration", &self.configuration)
            .field("state", &self.state)
            .field("checkpoints", &self.checkpoints.is_some())
            .finish()
    }
}

/// Session shared by a mode tree
#[derive(Debug)]
pub struct SyncSession {
    handlers: HandlerRegistry,
    data_map: DataMap,
    preference_map: PreferenceMap,
    cancellation: CancellationToken,
    current: RwLock<Option<Arc<SyncWork>>>,
}

impl SyncSession {
    pub fn new(handlers: HandlerRegistry) -> Self {
        Self {
            handlers,
            data_map: DataMap::standard().clone(),
            preference_map: PreferenceMap::standard().clone(),
            cancellation: CancellationToken::new(),
            current: RwLock::new(None),
        }
    }

    /// Replace the standard data and preference tables
    pub fn with_tables(mut self, data_map: DataMap, preference_map: PreferenceMap) -> Self {
        self.data_map = data_map;
        self.preference_map = preference_map;
        self
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Resolver over this session's tables
    pub fn resolver(&self) -> PreferenceResolver<'_> {
        PreferenceResolver::new(&self.data_map, &self.preference_map)
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Request cancellation of whatever is running
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Install `work` as the current run, replacing any previous one
    pub fn begin(&self, work: SyncWork) -> Arc<SyncWork> {
        let work = Arc::new(work);
        debug!(work_id = %work.id(), "Sync work started");
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(&work));
        work
    }

    /// Clear the current run
    pub fn finish(&self) -> Option<Arc<SyncWork>> {
        self.current
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    pub fn current(&self) -> Option<Arc<SyncWork>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
