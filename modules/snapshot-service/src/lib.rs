//! Snapshot reconciliation core.
//!
//! Bookmarks are created elsewhere with a provider snapshot handle
//! attached. This crate owns the other half of that contract: poll the
//! provider for each outstanding handle, extract normalized content once
//! results exist, and apply content + handle-clear to the row in a single
//! guarded update so a handle is never left dangling on a terminal
//! outcome.

pub mod config;
pub mod health;
pub mod reconciler;
pub mod scheduler;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

pub use config::{Config, ConfigError};
pub use reconciler::{CycleStats, Reconciler};
pub use scheduler::{RunMode, Scheduler};
pub use traits::{BookmarkStore, SnapshotFetcher};
