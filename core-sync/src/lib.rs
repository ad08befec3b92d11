//! # Sync Orchestration Core
//!
//! Decides which synchronization operations may run for a media library,
//! composes them into a tree of mode nodes, and runs each unit so that a
//! failure in one facet never aborts the others.
//!
//! ## Overview
//!
//! A run starts at the root node of one direction (fast pull, pull, push or
//! full). Each node resolves which data facets the user enabled for its
//! direction, dispatches the per-facet handlers, optionally walks the
//! catalog's library sections, and then runs its children in order.
//!
//! ## Components
//!
//! - **Vocabulary** (`media`): media categories, data facets, directions and the static tables
//! - **Configuration** (`configuration`): per-facet mode preferences
//! - **Preference Resolver** (`preferences`): preference → enabled facets
//! - **Operation Dispatcher** (`dispatch`): per-pair isolated handler runs with a structured report
//! - **Section Lookup** (`sections`, `filters`): valid, numeric-keyed catalog sections
//! - **Session** (`session`): handlers, cancellation, current work and backend handles
//! - **Mode Nodes** (`mode`, `modes`): run-once composable units and built-in behaviors
//! - **Engine** (`engine`): registry of mode trees and the top-level run
//! - **GUID logging** (`guid`): reporting of unsupported catalog agents

pub mod configuration;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod filters;
pub mod guid;
pub mod media;
pub mod mode;
pub mod modes;
pub mod preferences;
pub mod sections;
pub mod session;

pub use error::{Result, SyncError};
pub use configuration::{SyncConfiguration, SyncConfigurationBuilder};
pub use dispatch::{
    dispatch, DataHandler, DispatchReport, HandlerArgs, HandlerRegistry, PairOutcome, PairStatus,
};
pub use engine::{full_mode, library_mode, section_mode, ModeRegistry, RunFailure, SyncEngine};
pub use filters::{SectionFilter, SectionNameFilter};
pub use guid::{log_unsupported_guid, ItemGuid, ItemSummary};
pub use media::{DataMap, PreferenceKey, PreferenceMap, SyncData, SyncMedia, SyncMode};
pub use mode::{factory, ModeBehavior, ModeContext, ModeFactory, ModeNode, ModeState};
pub use modes::{DispatchAll, RunChildren, SectionSync};
pub use preferences::{EnabledData, PreferenceResolver};
pub use sections::{lookup_sections, SectionKey};
pub use session::{SyncSession, SyncState, SyncWork};
