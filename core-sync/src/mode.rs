//! # Mode Nodes
//!
//! A mode node is a composable unit of sync work for one direction. Nodes
//! form a tree that is assembled once per session and walked depth-first.
//!
//! ## Overview
//!
//! Each node owns:
//! - a direction ([`SyncMode`])
//! - a [`ModeContext`] pointing at the shared [`SyncSession`]
//! - its children, built from an ordered list of [`ModeFactory`] entries at
//!   construction time, in order, and never re-parented
//! - a [`ModeBehavior`] that defines what running the node means
//!
//! ## State Machine
//!
//! ```text
//! Constructed → Running → Completed
//!                  ↓
//!                Failed
//! ```
//!
//! A node runs at most once. Any further `run()` is rejected with
//! [`SyncError::InvalidStateTransition`].
//!
//! ## Failure Propagation
//!
//! Handler failures are contained per `(media, data)` pair by the dispatcher.
//! Errors that stop a node from proceeding at all (catalog unavailable,
//! cancellation, checkpoint failure) propagate out of `run()` and through the
//! parent's [`ModeNode::execute_children`]; siblings after a failing child are
//! not run.

use crate::{
    configuration::SyncConfiguration,
    dispatch::{dispatch, DispatchReport, HandlerArgs, HandlerRegistry},
    filters::SectionNameFilter,
    media::{SyncData, SyncMedia, SyncMode},
    sections::{lookup_sections, SectionKey},
    session::{SyncSession, SyncWork},
    Result, SyncError,
};
use async_trait::async_trait;
use bridge_traits::{CatalogBackend, SectionType, TrackingClient};
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Lifecycle of a mode node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeState {
    /// Built, not yet run
    Constructed,
    /// `run()` in progress
    Running,
    /// `run()` returned successfully
    Completed,
    /// `run()` returned an error
    Failed,
}

impl ModeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeState::Constructed => "constructed",
            ModeState::Running => "running",
            ModeState::Completed => "completed",
            ModeState::Failed => "failed",
        }
    }
}

impl fmt::Display for ModeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What running a particular kind of node means
#[async_trait]
pub trait ModeBehavior: Send + Sync {
    async fn run(&self, node: &ModeNode) -> Result<()>;
}

/// Handle every node holds on the session it belongs to
#[derive(Debug, Clone)]
pub struct ModeContext {
    session: Arc<SyncSession>,
}

impl ModeContext {
    pub fn new(session: Arc<SyncSession>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Arc<SyncSession> {
        &self.session
    }
}

/// Constructor for a node, registered once and invoked once per session
pub type ModeFactory = Arc<dyn Fn(ModeContext) -> ModeNode + Send + Sync>;

/// Wrap a closure as a [`ModeFactory`]
pub fn factory<F>(f: F) -> ModeFactory
where
    F: Fn(ModeContext) -> ModeNode + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A unit of sync work with zero or more child units
pub struct ModeNode {
    name: String,
    mode: SyncMode,
    context: ModeContext,
    children: Vec<ModeNode>,
    behavior: Box<dyn ModeBehavior>,
    state: Mutex<ModeState>,
    report: Mutex<DispatchReport>,
}

impl ModeNode {
    /// Build a node and instantiate its children from `children`, in order
    pub fn new(
        name: impl Into<String>,
        mode: SyncMode,
        behavior: impl ModeBehavior + 'static,
        context: ModeContext,
        children: &[ModeFactory],
    ) -> Self {
        let children = children
            .iter()
            .map(|child| child(context.clone()))
            .collect();

        Self {
            name: name.into(),
            mode,
            context,
            children,
            behavior: Box::new(behavior),
            state: Mutex::new(ModeState::Constructed),
            report: Mutex::new(DispatchReport::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn context(&self) -> &ModeContext {
        &self.context
    }

    pub fn children(&self) -> &[ModeNode] {
        &self.children
    }

    pub fn state(&self) -> ModeState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Outcomes of every pair dispatched by this node so far
    pub fn report(&self) -> DispatchReport {
        self.report
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// This node's report followed by its descendants', depth-first
    pub fn tree_report(&self) -> DispatchReport {
        let mut report = self.report();
        for child in &self.children {
            report.merge(child.tree_report());
        }
        report
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Run this node once
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidStateTransition`] if the node has already
    /// been started, otherwise whatever the node's behavior returns.
    #[instrument(skip(self), fields(node = %self.name, mode = %self.mode))]
    pub async fn run(&self) -> Result<()> {
        self.start()?;
        debug!("Mode started");

        let result = self.behavior.run(self).await;

        let next = if result.is_ok() {
            ModeState::Completed
        } else {
            ModeState::Failed
        };
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;

        match &result {
            Ok(()) => {
                let report = self.report();
                info!(
                    completed = report.completed(),
                    failed = report.failed(),
                    "Mode completed"
                );
            }
            Err(err) => warn!(error = %err, "Mode failed"),
        }

        result
    }

    fn start(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if *state != ModeState::Constructed {
            return Err(SyncError::InvalidStateTransition {
                mode: self.name.clone(),
                from: state.as_str().to_string(),
                to: ModeState::Running.as_str().to_string(),
                reason: "A mode node can only be run once".to_string(),
            });
        }

        *state = ModeState::Running;
        Ok(())
    }

    /// Run every child in construction order
    ///
    /// Stops at the first child error and returns it. Cancellation is checked
    /// before each child.
    pub async fn execute_children(&self) -> Result<()> {
        for child in &self.children {
            if self.context.session.is_cancelled() {
                return Err(SyncError::Cancelled);
            }

            child.run().await?;
        }

        Ok(())
    }

    /// Record a checkpoint on the current work, if there is any
    pub async fn checkpoint(&self) -> Result<()> {
        match self.current() {
            Some(work) => work.checkpoint().await,
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Session accessors (resolved on every call)
    // ------------------------------------------------------------------------

    pub fn session(&self) -> &Arc<SyncSession> {
        &self.context.session
    }

    pub fn current(&self) -> Option<Arc<SyncWork>> {
        self.context.session.current()
    }

    /// Configuration of the current work (empty when no work is active)
    pub fn configuration(&self) -> Arc<SyncConfiguration> {
        self.current()
            .map(|work| Arc::clone(work.configuration()))
            .unwrap_or_default()
    }

    pub fn handlers(&self) -> &HandlerRegistry {
        self.context.session.handlers()
    }

    pub fn catalog(&self) -> Option<Arc<dyn CatalogBackend>> {
        self.current()?.state()?.catalog.clone()
    }

    pub fn tracking(&self) -> Option<Arc<dyn TrackingClient>> {
        self.current()?.state()?.tracking.clone()
    }

    pub fn section_filter(&self) -> Option<Arc<dyn SectionNameFilter>> {
        self.current().map(|work| Arc::clone(work.section_filter()))
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Whether `data` is enabled for this node's direction
    pub fn is_data_enabled(&self, data: SyncData) -> bool {
        self.context
            .session
            .resolver()
            .is_enabled(data, self.mode, &self.configuration())
    }

    /// Enabled data facets of `media` for this node's direction, in table order
    pub fn data(&self, media: SyncMedia) -> Vec<SyncData> {
        let configuration = self.configuration();
        self.context
            .session
            .resolver()
            .enabled_data(media, self.mode, &configuration)
            .collect()
    }

    /// Dispatch every `(media, data)` pair with this node's direction
    ///
    /// The outcomes are also appended to this node's [`report`](Self::report).
    pub async fn execute_handlers(
        &self,
        media: impl IntoIterator<Item = SyncMedia>,
        data: impl IntoIterator<Item = SyncData>,
        args: &HandlerArgs,
    ) -> Result<DispatchReport> {
        let session = &self.context.session;
        let report = dispatch(
            media,
            data,
            self.mode,
            session.handlers(),
            args,
            Some(session.cancellation()),
        )
        .await?;

        self.report
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .merge(report.clone());

        Ok(report)
    }

    /// Valid section keys of `section_type`, `None` if the catalog can't be asked
    pub async fn sections(&self, section_type: SectionType) -> Option<Vec<SectionKey>> {
        let work = self.current()?;
        let catalog = work.state().and_then(|state| state.catalog.clone());

        lookup_sections(
            catalog.as_deref(),
            work.section_filter().as_ref(),
            section_type,
        )
        .await
    }
}

impl fmt::Debug for ModeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeNode")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("state", &self.state())
            .field("children", &self.children)
            .finish()
    }
}
