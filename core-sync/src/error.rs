use crate::media::SyncMode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid state transition for mode {mode} from {from} to {to}: {reason}")]
    InvalidStateTransition {
        mode: String,
        from: String,
        to: String,
        reason: String,
    },

    #[error("Sync cancelled")]
    Cancelled,

    #[error("Catalog backend unavailable while listing {0} sections")]
    CatalogUnavailable(String),

    #[error("Mode {0} cannot be used as a dispatch direction")]
    InvalidDirection(SyncMode),

    #[error("No mode registered for {0}")]
    ModeNotRegistered(SyncMode),

    #[error("Checkpoint failed: {0}")]
    Checkpoint(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
