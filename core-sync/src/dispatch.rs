//! # Operation Dispatcher
//!
//! Runs the per-facet handlers for every `(media, data)` pair of a request.
//!
//! ## Overview
//!
//! Pairs are visited in Cartesian-product order (media outer, data inner).
//! Each pair is its own failure boundary:
//!
//! - data without a registered handler is skipped (debug log)
//! - a handler error or panic is logged with its pair and recorded in the
//!   [`DispatchReport`]; the remaining pairs still run
//! - once the cancellation token fires, remaining pairs are recorded as
//!   cancelled and not invoked
//!
//! Handlers are awaited one at a time, so the order of handler side effects
//! and log lines matches the product order.

use crate::{
    media::{SyncData, SyncMedia, SyncMode},
    sections::SectionKey,
    Result, SyncError,
};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Extra arguments handed to a handler alongside media and mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandlerArgs {
    /// Library section being processed
    pub section: Option<SectionKey>,
    /// Catalog rating key of a single item
    pub rating_key: Option<i64>,
    /// Handler-specific payload
    pub payload: serde_json::Value,
}

impl HandlerArgs {
    pub fn for_section(section: SectionKey) -> Self {
        Self {
            section: Some(section),
            ..Self::default()
        }
    }

    pub fn with_rating_key(mut self, rating_key: i64) -> Self {
        self.rating_key = Some(rating_key);
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Per-facet operation (collection, playback, ratings, watched, ...)
///
/// Implementations perform the actual transfer. Errors are opaque to the
/// dispatcher: they are reported, never propagated.
#[async_trait]
pub trait DataHandler: Send + Sync {
    async fn run(&self, media: SyncMedia, mode: SyncMode, args: HandlerArgs) -> anyhow::Result<()>;
}

/// Handlers keyed by the data facet they synchronize
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<SyncData, Arc<dyn DataHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, data: SyncData, handler: Arc<dyn DataHandler>) -> Self {
        self.handlers.insert(data, handler);
        self
    }

    pub fn get(&self, data: SyncData) -> Option<&Arc<dyn DataHandler>> {
        self.handlers.get(&data)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut data: Vec<_> = self.handlers.keys().map(SyncData::as_str).collect();
        data.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &data)
            .finish()
    }
}

// ============================================================================
// Report
// ============================================================================

/// What happened to a single `(media, data)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairStatus {
    /// Handler ran to completion
    Completed,
    /// No handler registered for the data facet
    Unregistered,
    /// Handler returned an error (rendered with its cause chain)
    Failed(String),
    /// Run was cancelled before the pair was reached
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    pub media: SyncMedia,
    pub data: SyncData,
    pub mode: SyncMode,
    pub status: PairStatus,
}

/// Ordered outcomes of one or more dispatches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub outcomes: Vec<PairOutcome>,
}

impl DispatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append another report's outcomes after this one's
    pub fn merge(&mut self, other: DispatchReport) {
        self.outcomes.extend(other.outcomes);
    }

    /// Pairs whose handler was actually invoked
    pub fn invoked(&self) -> impl Iterator<Item = &PairOutcome> {
        self.outcomes.iter().filter(|o| {
            matches!(o.status, PairStatus::Completed | PairStatus::Failed(_))
        })
    }

    pub fn completed(&self) -> usize {
        self.count(|s| matches!(s, PairStatus::Completed))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, PairStatus::Failed(_)))
    }

    pub fn unregistered(&self) -> usize {
        self.count(|s| matches!(s, PairStatus::Unregistered))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|s| matches!(s, PairStatus::Cancelled))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    fn count(&self, predicate: impl Fn(&PairStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(&o.status)).count()
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Run every `(media, data)` pair through its handler
///
/// `media` and `data` accept a single value (`[SyncMedia::Movies]`,
/// `Some(SyncData::Ratings)`) or any sequence.
///
/// # Errors
///
/// Returns [`SyncError::InvalidDirection`] when `mode` is `Full`; nothing is
/// dispatched in that case. Handler failures are never returned as errors.
pub async fn dispatch(
    media: impl IntoIterator<Item = SyncMedia>,
    data: impl IntoIterator<Item = SyncData>,
    mode: SyncMode,
    handlers: &HandlerRegistry,
    args: &HandlerArgs,
    cancellation: Option<&CancellationToken>,
) -> Result<DispatchReport> {
    if !mode.is_concrete() {
        return Err(SyncError::InvalidDirection(mode));
    }

    let data: Vec<SyncData> = data.into_iter().collect();
    let mut report = DispatchReport::new();

    for m in media {
        for &d in &data {
            let status = if cancellation.is_some_and(CancellationToken::is_cancelled) {
                PairStatus::Cancelled
            } else {
                run_pair(m, d, mode, handlers, args).await
            };

            report.outcomes.push(PairOutcome {
                media: m,
                data: d,
                mode,
                status,
            });
        }
    }

    Ok(report)
}

async fn run_pair(
    media: SyncMedia,
    data: SyncData,
    mode: SyncMode,
    handlers: &HandlerRegistry,
    args: &HandlerArgs,
) -> PairStatus {
    let Some(handler) = handlers.get(data) else {
        debug!(data = %data, "Unknown sync data");
        return PairStatus::Unregistered;
    };

    let result = AssertUnwindSafe(handler.run(media, mode, args.clone()))
        .catch_unwind()
        .await;

    let detail = match result {
        Ok(Ok(())) => return PairStatus::Completed,
        Ok(Err(err)) => format!("{:#}", err),
        Err(panic) => format!("handler panicked: {}", panic_message(panic.as_ref())),
    };

    warn!(
        data = %data,
        media = %media,
        mode = %mode,
        error = %detail,
        "Handler run failed"
    );
    PairStatus::Failed(detail)
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}
