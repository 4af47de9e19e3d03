//! Preference history
//!
//! Ordered, append-only record of the judgments one decision maker gave,
//! with subset replacement for pruning inconsistent judgments and
//! digest-checked snapshots.

#[allow(clippy::module_inception)]
mod history;
mod persistence;
mod report;

pub use history::History;
pub use persistence::{HistorySnapshot, SnapshotFormat, SNAPSHOT_VERSION};
pub use report::SubsetUpdateReport;

pub mod prelude {
    pub use super::{History, HistorySnapshot, SnapshotFormat, SubsetUpdateReport};
}
