//! Keeping the board fed with fresh data.

mod runtime;
mod snapshot;

pub use runtime::{BoardRuntime, RuntimeConfig};
pub use snapshot::{Refresher, Snapshot, SnapshotStore};
