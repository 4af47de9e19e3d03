//! Report of a subset replacement

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::statement::wrapper::PreferenceInformationWrapper;

/// Outcome of [`History::update_history_with_a_subset`](super::History::update_history_with_a_subset)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubsetUpdateReport {
    /// Entries before the replacement
    pub count_before: usize,
    /// Entries after the replacement
    pub count_after: usize,
    /// Entries not kept, in their original relative order
    pub removed: Vec<PreferenceInformationWrapper>,
    /// Iteration at which the replacement happened
    pub iteration: usize,
    /// Time at which the replacement happened
    pub timestamp: Option<DateTime<Utc>>,
}

impl SubsetUpdateReport {
    /// Number of removed entries
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    /// Whether nothing was removed
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty()
    }
}
