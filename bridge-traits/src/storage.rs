//! Progress Persistence Abstractions
//!
//! Provides the trait used by a sync run to record durability markers so a
//! partially completed run can be resumed by the host.

use async_trait::async_trait;

use crate::error::Result;

/// Checkpoint persistence trait
///
/// A checkpoint is written whenever a unit of sync work (usually a library
/// section) has been fully processed. What exactly gets persisted is up to
/// the host; the core only decides *when*.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::CheckpointStore;
///
/// async fn after_section(store: &dyn CheckpointStore) -> Result<()> {
///     store.checkpoint().await
/// }
/// ```
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Persist the current progress of the run
    async fn checkpoint(&self) -> Result<()>;
}
