//! # Sync Engine
//!
//! Top-level orchestrator. Owns the session and one mode tree per registered
//! direction, all instantiated up front from a [`ModeRegistry`].
//!
//! ## Standard Trees
//!
//! ```text
//! fast_pull / pull / push
//!   ├── <mode>.movies   SectionSync(movie sections → Movies)
//!   └── <mode>.shows    SectionSync(show sections → Shows, Seasons, Episodes)
//!
//! full
//!   ├── pull  (as above)
//!   └── push  (as above)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{HandlerRegistry, ModeRegistry, SyncEngine, SyncMode, SyncSession, SyncWork};
//! use std::sync::Arc;
//!
//! let session = Arc::new(SyncSession::new(handlers));
//! let engine = SyncEngine::new(session, &ModeRegistry::standard());
//!
//! let report = engine.run(SyncMode::Pull, SyncWork::new(configuration)).await?;
//! println!("{} pairs failed", report.failed());
//! ```

use crate::{
    dispatch::DispatchReport,
    media::{SyncMedia, SyncMode},
    mode::{factory, ModeContext, ModeFactory, ModeNode},
    modes::{RunChildren, SectionSync},
    session::{SyncSession, SyncWork},
    SyncError,
};
use bridge_traits::SectionType;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Ordered root factories, one per direction
#[derive(Clone, Default)]
pub struct ModeRegistry {
    entries: Vec<(SyncMode, ModeFactory)>,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` as the root for `mode`, replacing any earlier entry
    pub fn with(mut self, mode: SyncMode, factory: ModeFactory) -> Self {
        self.entries.retain(|(m, _)| *m != mode);
        self.entries.push((mode, factory));
        self
    }

    /// Library-section trees for every direction
    pub fn standard() -> Self {
        Self::new()
            .with(SyncMode::FastPull, library_mode(SyncMode::FastPull))
            .with(SyncMode::Pull, library_mode(SyncMode::Pull))
            .with(SyncMode::Push, library_mode(SyncMode::Push))
            .with(SyncMode::Full, full_mode())
    }

    pub fn get(&self, mode: SyncMode) -> Option<&ModeFactory> {
        self.entries
            .iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, f)| f)
    }

    pub fn modes(&self) -> impl Iterator<Item = SyncMode> + '_ {
        self.entries.iter().map(|(m, _)| *m)
    }
}

impl fmt::Debug for ModeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeRegistry")
            .field("modes", &self.modes().collect::<Vec<_>>())
            .finish()
    }
}

/// Root for one concrete direction: movie sections, then show sections
pub fn library_mode(mode: SyncMode) -> ModeFactory {
    let children = vec![
        section_mode(
            format!("{}.movies", mode),
            mode,
            SectionType::Movie,
            vec![SyncMedia::Movies],
        ),
        section_mode(
            format!("{}.shows", mode),
            mode,
            SectionType::Show,
            vec![SyncMedia::Shows, SyncMedia::Seasons, SyncMedia::Episodes],
        ),
    ];

    factory(move |context| ModeNode::new(mode.as_str(), mode, RunChildren, context, &children))
}

/// Full sync: pull everything, then push everything
pub fn full_mode() -> ModeFactory {
    let children = vec![library_mode(SyncMode::Pull), library_mode(SyncMode::Push)];

    factory(move |context| {
        ModeNode::new(
            SyncMode::Full.as_str(),
            SyncMode::Full,
            RunChildren,
            context,
            &children,
        )
    })
}

/// Leaf node synchronizing the sections of `section_type`
pub fn section_mode(
    name: String,
    mode: SyncMode,
    section_type: SectionType,
    media: Vec<SyncMedia>,
) -> ModeFactory {
    factory(move |context| {
        ModeNode::new(
            name.clone(),
            mode,
            SectionSync::new(section_type, media.clone()),
            context,
            &[],
        )
    })
}

/// Owns the session and its mode trees
pub struct SyncEngine {
    session: Arc<SyncSession>,
    roots: Vec<(SyncMode, ModeNode)>,
}

impl SyncEngine {
    /// Instantiate one tree per registered mode for `session`
    pub fn new(session: Arc<SyncSession>, registry: &ModeRegistry) -> Self {
        let context = ModeContext::new(Arc::clone(&session));
        let roots = registry
            .entries
            .iter()
            .map(|(mode, make)| (*mode, make(context.clone())))
            .collect();

        Self { session, roots }
    }

    pub fn session(&self) -> &Arc<SyncSession> {
        &self.session
    }

    /// Root node registered for `mode`
    pub fn mode(&self, mode: SyncMode) -> Option<&ModeNode> {
        self.roots
            .iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, node)| node)
    }

    /// Run the tree for `mode` against `work`
    ///
    /// `work` is installed as the session's current work for the duration of
    /// the run and cleared afterwards, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns a [`RunFailure`] carrying the outcomes recorded before the run
    /// stopped and one of:
    /// - [`SyncError::ModeNotRegistered`] if no tree exists for `mode`
    /// - [`SyncError::InvalidStateTransition`] if that tree already ran
    /// - any structural error raised by the tree
    pub async fn run(
        &self,
        mode: SyncMode,
        work: SyncWork,
    ) -> std::result::Result<DispatchReport, RunFailure> {
        let Some(root) = self.mode(mode) else {
            return Err(RunFailure::new(
                SyncError::ModeNotRegistered(mode),
                DispatchReport::new(),
            ));
        };

        let work = self.session.begin(work);
        let account = work
            .state()
            .and_then(|state| state.tracking.as_ref())
            .and_then(|tracking| tracking.account());
        info!(
            mode = %mode,
            work_id = %work.id(),
            account = account.as_deref().unwrap_or("<none>"),
            "Sync started"
        );

        let result = root.run().await;
        self.session.finish();

        let report = root.tree_report();
        match result {
            Ok(()) => {
                info!(
                    mode = %mode,
                    completed = report.completed(),
                    failed = report.failed(),
                    unregistered = report.unregistered(),
                    "Sync finished"
                );
                Ok(report)
            }
            Err(error) => {
                warn!(
                    mode = %mode,
                    error = %error,
                    completed = report.completed(),
                    failed = report.failed(),
                    "Sync aborted"
                );
                Err(RunFailure::new(error, report))
            }
        }
    }
}

/// A run that stopped early, with the outcomes recorded before it stopped
#[derive(Debug, Error)]
#[error("Sync run aborted: {error}")]
pub struct RunFailure {
    #[source]
    pub error: SyncError,
    pub report: DispatchReport,
}

impl RunFailure {
    pub fn new(error: SyncError, report: DispatchReport) -> Self {
        Self { error, report }
    }
}

impl From<RunFailure> for SyncError {
    fn from(failure: RunFailure) -> Self {
        failure.error
    }
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("session", &self.session)
            .field("roots", &self.roots)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::HandlerRegistry;

    #[test]
    fn test_standard_registry_shape() {
        let registry = ModeRegistry::standard();
        let modes: Vec<_> = registry.modes().collect();
        assert_eq!(
            modes,
            vec![SyncMode::FastPull, SyncMode::Pull, SyncMode::Push, SyncMode::Full]
        );

        let session = Arc::new(SyncSession::new(HandlerRegistry::new()));
        let engine = SyncEngine::new(session, &registry);

        let full = engine.mode(SyncMode::Full).unwrap();
        let children: Vec<_> = full.children().iter().map(|c| c.mode()).collect();
        assert_eq!(children, vec![SyncMode::Pull, SyncMode::Push]);

        let pull = &full.children()[0];
        let names: Vec<_> = pull.children().iter().map(ModeNode::name).collect();
        assert_eq!(names, vec!["pull.movies", "pull.shows"]);
    }

    #[test]
    fn test_registry_replaces_duplicate_mode() {
        let registry = ModeRegistry::new()
            .with(SyncMode::Pull, library_mode(SyncMode::Pull))
            .with(SyncMode::Pull, full_mode());

        assert_eq!(registry.modes().count(), 1);
        assert!(registry.get(SyncMode::Pull).is_some());
        assert!(registry.get(SyncMode::Push).is_none());
    }

    #[test]
    fn test_engines_do_not_share_nodes() {
        let registry = ModeRegistry::standard();
        let session = Arc::new(SyncSession::new(HandlerRegistry::new()));

        let first = SyncEngine::new(Arc::clone(&session), &registry);
        let second = SyncEngine::new(session, &registry);

        let a = first.mode(SyncMode::Pull).unwrap() as *const ModeNode;
        let b = second.mode(SyncMode::Pull).unwrap() as *const ModeNode;
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_unregistered_mode() {
        let session = Arc::new(SyncSession::new(HandlerRegistry::new()));
        let engine = SyncEngine::new(session, &ModeRegistry::new());

        let failure = engine
            .run(SyncMode::Push, SyncWork::new(Default::default()))
            .await
            .unwrap_err();
        assert!(matches!(failure.error, SyncError::ModeNotRegistered(SyncMode::Push)));
        assert!(failure.report.is_empty());
    }
}
