//! Tracking Service Abstractions
//!
//! The remote tracking service stores watch, collection and rating state.
//! The sync core never talks to it directly: it only hands the connection
//! to the per-facet handlers, so the contract here is small.

/// Connection handle for the remote tracking service
pub trait TrackingClient: Send + Sync {
    /// Account the connection is authenticated as, if any
    fn account(&self) -> Option<String>;
}
