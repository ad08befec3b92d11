//! # Host Bridge Traits
//!
//! Contracts for the collaborators the sync core depends on but does not own.
//!
//! ## Overview
//!
//! The sync core decides *which* synchronization operations may run and in
//! what order. Everything that touches the outside world is reached through
//! the traits in this crate, so hosts (and tests) can plug in their own
//! implementations.
//!
//! ## Traits
//!
//! - [`CatalogBackend`](catalog::CatalogBackend) - Lists library sections by type
//! - [`TrackingClient`](tracking::TrackingClient) - Connection to the remote tracking service
//! - [`CheckpointStore`](storage::CheckpointStore) - Persists resumable progress markers
//! - [`LoggerSink`](logging::LoggerSink) - Forwards structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should convert their native errors into it and keep the
//! message actionable.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single implementation can be
//! shared by every node of a sync run.

pub mod catalog;
pub mod error;
pub mod logging;
pub mod storage;
pub mod tracking;

pub use error::BridgeError;

// Re-export commonly used types
pub use catalog::{CatalogBackend, LibrarySection, SectionType};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use storage::CheckpointStore;
pub use tracking::TrackingClient;
