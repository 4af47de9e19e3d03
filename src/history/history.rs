//! Append-only store of elicited preference statements
//!
//! A [`History`] belongs to exactly one decision-making system. It grows by
//! validated batch appends and shrinks only through explicit removal or
//! subset replacement. Every operation either completes or leaves the
//! history untouched.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::report::SubsetUpdateReport;
use crate::error::{Component, ElicitError, ElicitResult, ErrorKind};
use crate::statement::statement::PreferenceStatement;
use crate::statement::wrapper::PreferenceInformationWrapper;

/// Ordered preference information of one decision maker
#[derive(Clone, Debug, Default)]
pub struct History {
    name: String,
    entries: Vec<PreferenceInformationWrapper>,
    next_id: u64,
}

impl History {
    /// Create an empty history
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn from_parts(
        name: String,
        entries: Vec<PreferenceInformationWrapper>,
        next_id: u64,
    ) -> Self {
        Self {
            name,
            entries,
            next_id,
        }
    }

    /// Name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded entries in order
    pub fn wrappers(&self) -> &[PreferenceInformationWrapper] {
        &self.entries
    }

    /// Iterate over the recorded entries
    pub fn iter(&self) -> impl Iterator<Item = &PreferenceInformationWrapper> {
        self.entries.iter()
    }

    /// Whether a structurally equal entry is recorded
    pub fn contains(&self, wrapper: &PreferenceInformationWrapper) -> bool {
        self.entries.contains(wrapper)
    }

    /// Id the generator will hand out next
    pub fn peek_next_id(&self) -> u64 {
        self.next_id
    }

    /// Take a fresh id. Ids are never handed out twice; fails once the id
    /// space is exhausted.
    pub fn next_id(&mut self) -> ElicitResult<u64> {
        let id = self.next_id;
        self.next_id = self.successor(id)?;
        Ok(id)
    }

    /// Wrap a statement with a fresh id
    pub fn wrap(
        &mut self,
        statement: PreferenceStatement,
        iteration: usize,
        timestamp: Option<DateTime<Utc>>,
    ) -> ElicitResult<PreferenceInformationWrapper> {
        let id = self.next_id()?;
        Ok(PreferenceInformationWrapper::new(statement, id, iteration, timestamp))
    }

    /// Renumber `batch` so its ids continue this history's sequence. The
    /// generator itself only advances when the batch is registered.
    pub fn assign_ids(
        &self,
        batch: Vec<PreferenceInformationWrapper>,
    ) -> ElicitResult<Vec<PreferenceInformationWrapper>> {
        let mut next = self.next_id;
        let mut renumbered = Vec::with_capacity(batch.len());
        for wrapper in batch {
            let id = next;
            next = self.successor(id)?;
            renumbered.push(wrapper.with_id(id));
        }
        Ok(renumbered)
    }

    fn successor(&self, id: u64) -> ElicitResult<u64> {
        id.checked_add(1).ok_or_else(|| {
            self.error(ErrorKind::Configuration(format!(
                "id {} leaves no room for another id",
                id
            )))
        })
    }

    /// Copy of the recorded statements in order
    pub fn preference_information_copy(&self) -> Vec<PreferenceStatement> {
        self.entries.iter().map(|w| w.statement().clone()).collect()
    }

    /// Entries elicited during `iteration`
    pub fn entries_for_iteration(&self, iteration: usize) -> Vec<&PreferenceInformationWrapper> {
        self.entries
            .iter()
            .filter(|w| w.iteration() == iteration)
            .collect()
    }

    /// Iteration of the most recent entry
    pub fn last_iteration(&self) -> Option<usize> {
        self.entries.last().map(PreferenceInformationWrapper::iteration)
    }

    fn error(&self, kind: ErrorKind) -> ElicitError {
        ElicitError::new(Component::History, kind).with_handler(self.name.clone())
    }

    /// Check a batch against the ordering and uniqueness rules without
    /// registering it.
    pub fn validate_batch(&self, batch: &[PreferenceInformationWrapper]) -> ElicitResult<()> {
        for (i, pair) in batch.windows(2).enumerate() {
            if !pair[0].may_precede(&pair[1]) {
                return Err(self
                    .error(ErrorKind::Ordering(format!(
                        "entry {} ({}) may not precede entry {} ({})",
                        i,
                        pair[0],
                        i + 1,
                        pair[1]
                    )))
                    .with_iteration(pair[1].iteration())
                    .with_subject(pair[1].to_string()));
            }
        }

        if let Some(max_id) = batch.iter().map(PreferenceInformationWrapper::id).max() {
            self.successor(max_id)?;
        }

        let mut keys: HashSet<_> = self.entries.iter().map(|w| w.key()).collect();
        let mut ids: HashSet<u64> = self.entries.iter().map(|w| w.id()).collect();
        for wrapper in batch {
            if !keys.insert(wrapper.key()) {
                return Err(self
                    .error(ErrorKind::Duplicate(wrapper.to_string()))
                    .with_iteration(wrapper.iteration())
                    .with_subject(wrapper.statement().to_string()));
            }
            if !ids.insert(wrapper.id()) {
                return Err(self
                    .error(ErrorKind::Duplicate(format!(
                        "id {} is already in use ({})",
                        wrapper.id(),
                        wrapper
                    )))
                    .with_iteration(wrapper.iteration())
                    .with_subject(wrapper.statement().to_string()));
            }
        }
        Ok(())
    }

    /// Append a validated batch, keeping its order. Returns the number of
    /// appended entries. A rejected batch leaves the history unchanged.
    pub fn register_preference_information(
        &mut self,
        batch: Vec<PreferenceInformationWrapper>,
    ) -> ElicitResult<usize> {
        if let Err(err) = self.validate_batch(&batch) {
            warn!(history = %self.name, error = %err, "rejected preference batch");
            return Err(err);
        }

        if let Some(next) = batch
            .iter()
            .map(PreferenceInformationWrapper::id)
            .max()
            .and_then(|max_id| max_id.checked_add(1))
        {
            self.next_id = self.next_id.max(next);
        }
        let count = batch.len();
        self.entries.extend(batch);
        info!(history = %self.name, appended = count, total = self.entries.len(), "registered preference information");
        Ok(count)
    }

    /// Remove the first structurally equal entry. Returns whether one was removed.
    pub fn remove(&mut self, wrapper: &PreferenceInformationWrapper) -> bool {
        match self.entries.iter().position(|w| w == wrapper) {
            Some(index) => {
                self.entries.remove(index);
                debug!(history = %self.name, entry = %wrapper, "removed entry");
                true
            }
            None => false,
        }
    }

    /// Replace the recorded entries with `subset`, which must consist of
    /// recorded entries only, each at most once. The subset's order is kept.
    pub fn update_history_with_a_subset(
        &mut self,
        subset: Vec<PreferenceInformationWrapper>,
        iteration: usize,
        timestamp: Option<DateTime<Utc>>,
    ) -> ElicitResult<SubsetUpdateReport> {
        for (i, wrapper) in subset.iter().enumerate() {
            if !self.entries.contains(wrapper) {
                return Err(self
                    .error(ErrorKind::Membership(format!(
                        "{} is not part of the history",
                        wrapper
                    )))
                    .with_iteration(iteration)
                    .with_subject(wrapper.to_string()));
            }
            if subset[..i].contains(wrapper) {
                return Err(self
                    .error(ErrorKind::Duplicate(format!(
                        "{} appears more than once in the subset",
                        wrapper
                    )))
                    .with_iteration(iteration)
                    .with_subject(wrapper.to_string()));
            }
        }

        let count_before = self.entries.len();
        let removed: Vec<_> = self
            .entries
            .iter()
            .filter(|w| !subset.contains(w))
            .cloned()
            .collect();
        self.entries = subset;

        if !removed.is_empty() {
            warn!(
                history = %self.name,
                iteration,
                removed = removed.len(),
                "pruned preference information"
            );
        }

        Ok(SubsetUpdateReport {
            count_before,
            count_after: self.entries.len(),
            removed,
            iteration,
            timestamp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alternative::alternative::Alternative;
    use chrono::Duration;

    fn alt(name: &str) -> Alternative {
        Alternative::new(name, vec![0.0, 1.0])
    }

    fn pc(a: &str, b: &str) -> PreferenceStatement {
        PreferenceStatement::preference(alt(a), alt(b))
    }

    fn entry(a: &str, b: &str, id: u64, iteration: usize) -> PreferenceInformationWrapper {
        PreferenceInformationWrapper::untimed(pc(a, b), id, iteration)
    }

    #[test]
    fn test_register_appends_in_order() {
        let mut history = History::new("dm");
        let count = history
            .register_preference_information(vec![entry("A1", "A2", 0, 0), entry("A3", "A4", 1, 1)])
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(history.len(), 2);
        assert_eq!(history.wrappers()[0].id(), 0);
        assert_eq!(history.wrappers()[1].id(), 1);
        assert_eq!(history.last_iteration(), Some(1));
    }

    #[test]
    fn test_register_rejects_decreasing_iterations() {
        let mut history = History::new("dm");
        history
            .register_preference_information(vec![entry("A0", "A9", 9, 0)])
            .unwrap();

        let err = history
            .register_preference_information(vec![entry("A1", "A2", 0, 2), entry("A3", "A4", 1, 1)])
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::Ordering(_)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_register_rejects_decreasing_timestamps_within_iteration() {
        let mut history = History::new("dm");
        let now = Utc::now();
        let batch = vec![
            PreferenceInformationWrapper::new(pc("A1", "A2"), 0, 1, Some(now)),
            PreferenceInformationWrapper::new(pc("A3", "A4"), 1, 1, Some(now - Duration::seconds(5))),
        ];
        let err = history.register_preference_information(batch).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Ordering(_)));
        assert!(history.is_empty());
    }

    #[test]
    fn test_missing_timestamps_do_not_violate_order() {
        let mut history = History::new("dm");
        let now = Utc::now();
        let batch = vec![
            PreferenceInformationWrapper::new(pc("A1", "A2"), 0, 1, Some(now)),
            PreferenceInformationWrapper::new(pc("A3", "A4"), 1, 1, None),
            PreferenceInformationWrapper::new(pc("A5", "A6"), 2, 1, Some(now - Duration::seconds(5))),
        ];
        assert!(history.register_preference_information(batch).is_ok());
    }

    #[test]
    fn test_register_rejects_duplicate_in_batch() {
        let mut history = History::new("dm");
        let err = history
            .register_preference_information(vec![entry("A1", "A2", 0, 0), entry("A1", "A2", 0, 0)])
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::Duplicate(_)));
        assert_eq!(err.context.subject.as_deref(), Some("PC(A1 > A2)"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_register_rejects_duplicate_of_existing() {
        let mut history = History::new("dm");
        history
            .register_preference_information(vec![entry("A1", "A2", 0, 0)])
            .unwrap();
        let err = history
            .register_preference_information(vec![entry("A1", "A2", 0, 0)])
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Duplicate(_)));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_same_judgment_with_new_id_is_accepted() {
        let mut history = History::new("dm");
        history
            .register_preference_information(vec![entry("A1", "A2", 0, 0)])
            .unwrap();
        assert!(history
            .register_preference_information(vec![entry("A1", "A2", 1, 0)])
            .is_ok());
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_register_rejects_reused_id() {
        let mut history = History::new("dm");
        history
            .register_preference_information(vec![entry("A1", "A2", 0, 0)])
            .unwrap();
        let err = history
            .register_preference_information(vec![entry("A3", "A4", 0, 1)])
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Duplicate(_)));
    }

    #[test]
    fn test_id_generator_skips_registered_ids() {
        let mut history = History::new("dm");
        assert_eq!(history.next_id().unwrap(), 0);
        history
            .register_preference_information(vec![entry("A1", "A2", 5, 0)])
            .unwrap();
        assert_eq!(history.peek_next_id(), 6);
        let w = history.wrap(pc("A3", "A4"), 1, None).unwrap();
        assert_eq!(w.id(), 6);
    }

    #[test]
    fn test_register_rejects_last_id() {
        let mut history = History::new("dm");
        let err = history
            .register_preference_information(vec![entry("A1", "A2", u64::MAX, 0)])
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Configuration(_)));
        assert!(history.is_empty());
        assert_eq!(history.peek_next_id(), 0);
    }

    #[test]
    fn test_exhausted_generator_fails() {
        let mut history = History::new("dm");
        history
            .register_preference_information(vec![entry("A1", "A2", u64::MAX - 1, 0)])
            .unwrap();
        assert_eq!(history.peek_next_id(), u64::MAX);
        assert!(history.next_id().is_err());
        assert!(history.wrap(pc("A3", "A4"), 1, None).is_err());
        assert_eq!(history.peek_next_id(), u64::MAX);
    }

    #[test]
    fn test_assign_ids_continues_sequence() {
        let mut history = History::new("dm");
        history
            .register_preference_information(vec![entry("A1", "A2", 3, 0)])
            .unwrap();

        let batch = history
            .assign_ids(vec![entry("A3", "A4", 0, 1), entry("A5", "A6", 1, 1)])
            .unwrap();
        assert_eq!(batch.iter().map(|w| w.id()).collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(history.peek_next_id(), 4);

        history.register_preference_information(batch).unwrap();
        assert_eq!(history.peek_next_id(), 6);
    }

    #[test]
    fn test_remove() {
        let mut history = History::new("dm");
        let e = entry("A1", "A2", 0, 0);
        history.register_preference_information(vec![e.clone()]).unwrap();

        assert!(history.remove(&e));
        assert!(!history.remove(&e));
        assert!(!history.remove(&entry("A5", "A6", 42, 0)));
        assert!(history.is_empty());
    }

    #[test]
    fn test_subset_replacement_report() {
        let mut history = History::new("dm");
        let entries = vec![
            entry("A1", "A2", 0, 0),
            entry("A3", "A4", 1, 1),
            entry("A5", "A6", 2, 1),
            entry("A7", "A8", 3, 2),
        ];
        history.register_preference_information(entries.clone()).unwrap();

        let report = history
            .update_history_with_a_subset(vec![entries[2].clone(), entries[0].clone()], 3, None)
            .unwrap();

        assert_eq!(report.count_before, 4);
        assert_eq!(report.count_after, 2);
        assert_eq!(report.removed, vec![entries[1].clone(), entries[3].clone()]);
        assert_eq!(report.iteration, 3);
        assert_eq!(history.wrappers(), &[entries[2].clone(), entries[0].clone()]);
    }

    #[test]
    fn test_subset_with_unknown_entry_fails() {
        let mut history = History::new("dm");
        history
            .register_preference_information(vec![entry("A1", "A2", 0, 0)])
            .unwrap();

        let stranger = entry("B1", "B2", 9, 0);
        let err = history
            .update_history_with_a_subset(vec![stranger.clone()], 1, None)
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::Membership(_)));
        assert_eq!(err.context.subject, Some(stranger.to_string()));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_subset_with_repeated_entry_fails() {
        let mut history = History::new("dm");
        let e = entry("A1", "A2", 0, 0);
        history.register_preference_information(vec![e.clone()]).unwrap();
        assert!(history
            .update_history_with_a_subset(vec![e.clone(), e.clone()], 1, None)
            .is_err());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_preference_information_copy_is_detached() {
        let mut history = History::new("dm");
        history
            .register_preference_information(vec![entry("A1", "A2", 0, 0)])
            .unwrap();
        let mut copy = history.preference_information_copy();
        copy.clear();
        assert_eq!(history.len(), 1);
    }
}
