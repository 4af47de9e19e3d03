//! Reference sets shown to decision makers

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::alternative::alternative::Alternative;
use crate::context::DecisionMakerId;

/// Ordered group of alternatives presented together
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSet {
    alternatives: Vec<Alternative>,
}

impl ReferenceSet {
    /// Create a reference set
    pub fn new(alternatives: Vec<Alternative>) -> Self {
        Self { alternatives }
    }

    /// Number of alternatives
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Alternatives in presentation order
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Iterate over the alternatives
    pub fn iter(&self) -> impl Iterator<Item = &Alternative> {
        self.alternatives.iter()
    }
}

/// Reference sets grouped by size
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferenceSets {
    sets: BTreeMap<usize, Vec<ReferenceSet>>,
}

impl ReferenceSets {
    /// Empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a set under its size
    pub fn push(&mut self, set: ReferenceSet) {
        self.sets.entry(set.len()).or_default().push(set);
    }

    /// Builder-style [`push`](Self::push)
    pub fn with_set(mut self, set: ReferenceSet) -> Self {
        self.push(set);
        self
    }

    /// Sets of the given size, in insertion order
    pub fn of_size(&self, size: usize) -> &[ReferenceSet] {
        self.sets.get(&size).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sizes present, ascending
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.sets.keys().copied()
    }

    /// Iterate `(size, sets)` in ascending size order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[ReferenceSet])> {
        self.sets.iter().map(|(size, sets)| (*size, sets.as_slice()))
    }

    /// Total number of sets across all sizes
    pub fn total_sets(&self) -> usize {
        self.sets.values().map(Vec::len).sum()
    }

    /// Whether there are no sets
    pub fn is_empty(&self) -> bool {
        self.total_sets() == 0
    }

    /// Concatenate size by size; `self`'s sets come first
    pub fn join(&self, other: &ReferenceSets) -> ReferenceSets {
        let mut joined = self.clone();
        for (size, sets) in &other.sets {
            joined
                .sets
                .entry(*size)
                .or_default()
                .extend(sets.iter().cloned());
        }
        joined
    }
}

impl FromIterator<ReferenceSet> for ReferenceSets {
    fn from_iter<I: IntoIterator<Item = ReferenceSet>>(iter: I) -> Self {
        let mut sets = Self::new();
        for set in iter {
            sets.push(set);
        }
        sets
    }
}

/// Common reference sets plus optional per-decision-maker layers
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReferenceSetsResult {
    /// Sets shown to every decision maker
    pub common: ReferenceSets,
    /// Sets shown only to a specific decision maker
    pub per_dm: HashMap<DecisionMakerId, ReferenceSets>,
}

impl ReferenceSetsResult {
    /// Result with only a common layer
    pub fn common(common: ReferenceSets) -> Self {
        Self {
            common,
            per_dm: HashMap::new(),
        }
    }

    /// Add a private layer for `dm`
    pub fn with_private(mut self, dm: impl Into<DecisionMakerId>, sets: ReferenceSets) -> Self {
        self.per_dm.insert(dm.into(), sets);
        self
    }

    /// Common layer joined with the private layer of `dm`, if any
    pub fn for_decision_maker(&self, dm: &DecisionMakerId) -> ReferenceSets {
        match self.per_dm.get(dm) {
            Some(private) => self.common.join(private),
            None => self.common.clone(),
        }
    }
}
