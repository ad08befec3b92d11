//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (`core-sync`, `core-runtime`, `bridge-traits`). Host
//! applications can depend on `mediasync-workspace` and enable the documented
//! features without needing to wire each crate individually.

pub use bridge_traits;
pub use core_sync;

#[cfg(feature = "logging")]
pub use core_runtime;
