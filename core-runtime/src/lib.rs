//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the media sync core:
//! - Logging and tracing bootstrap
//! - Forwarding of structured events to a host `LoggerSink`
//!
//! ## Overview
//!
//! The sync engine itself only emits `tracing` events. This crate decides
//! where they go: a formatted stdout layer plus an optional host sink.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
