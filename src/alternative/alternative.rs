//! Alternative and alternative set types
//!
//! An [`Alternative`] is a named point in criteria space. The performance
//! vector is fixed at construction; only the auxiliary score written by the
//! optimizer may change afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Component, ElicitError, ElicitResult};

/// A candidate solution described by its performance on each criterion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Alternative {
    name: String,
    performance: Vec<f64>,
    /// Auxiliary score slot used by the optimizer (e.g. the preference model score)
    #[serde(default)]
    pub aux_score: f64,
}

impl Alternative {
    /// Create a new alternative
    pub fn new(name: impl Into<String>, performance: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            performance,
            aux_score: 0.0,
        }
    }

    /// Name of this alternative
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Performance vector
    pub fn performance(&self) -> &[f64] {
        &self.performance
    }

    /// Performance on a single criterion
    pub fn performance_at(&self, criterion: usize) -> Option<f64> {
        self.performance.get(criterion).copied()
    }

    /// Number of criteria this alternative is evaluated on
    pub fn criteria_count(&self) -> usize {
        self.performance.len()
    }

    /// Whether both alternatives have element-wise equal performance vectors
    pub fn same_performance(&self, other: &Self) -> bool {
        self.performance.len() == other.performance.len()
            && self
                .performance
                .iter()
                .zip(other.performance.iter())
                .all(|(a, b)| a == b)
    }
}

/// Alternatives are equal when names and performance vectors match.
/// The auxiliary score is ignored.
impl PartialEq for Alternative {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.same_performance(other)
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An ordered collection of alternatives sharing the same criteria count
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AlternativeSetData")]
pub struct AlternativeSet {
    alternatives: Vec<Alternative>,
}

#[derive(Deserialize)]
struct AlternativeSetData {
    alternatives: Vec<Alternative>,
}

impl TryFrom<AlternativeSetData> for AlternativeSet {
    type Error = ElicitError;

    fn try_from(data: AlternativeSetData) -> ElicitResult<Self> {
        Self::from_alternatives(data.alternatives)
    }
}

impl AlternativeSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set from alternatives, checking they agree on the criteria count
    pub fn from_alternatives(alternatives: Vec<Alternative>) -> ElicitResult<Self> {
        if let Some(first) = alternatives.first() {
            let expected = first.criteria_count();
            if let Some(bad) = alternatives
                .iter()
                .find(|a| a.criteria_count() != expected)
            {
                return Err(ElicitError::dimension_mismatch(
                    Component::Alternative,
                    expected,
                    bad.criteria_count(),
                )
                .with_subject(bad.name()));
            }
        }
        Ok(Self { alternatives })
    }

    /// Number of alternatives
    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Criteria count of the members (None when empty)
    pub fn criteria_count(&self) -> Option<usize> {
        self.alternatives.first().map(Alternative::criteria_count)
    }

    /// Get an alternative by index
    pub fn get(&self, index: usize) -> Option<&Alternative> {
        self.alternatives.get(index)
    }

    /// Iterate over the alternatives
    pub fn iter(&self) -> impl Iterator<Item = &Alternative> {
        self.alternatives.iter()
    }

    /// Iterate mutably over the alternatives
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Alternative> {
        self.alternatives.iter_mut()
    }

    /// Slice view over the alternatives
    pub fn as_slice(&self) -> &[Alternative] {
        &self.alternatives
    }

    /// Mutable slice view over the alternatives
    pub fn as_mut_slice(&mut self) -> &mut [Alternative] {
        &mut self.alternatives
    }

    /// Names of all alternatives in order
    pub fn names(&self) -> Vec<&str> {
        self.alternatives.iter().map(Alternative::name).collect()
    }

    /// Find an alternative by name
    pub fn find(&self, name: &str) -> Option<&Alternative> {
        self.alternatives.iter().find(|a| a.name() == name)
    }

    /// Keep only the alternatives matching the predicate, in order
    pub fn retain<P: FnMut(&Alternative) -> bool>(&mut self, predicate: P) {
        self.alternatives.retain(predicate);
    }

    /// Consume the set, returning its alternatives
    pub fn into_inner(self) -> Vec<Alternative> {
        self.alternatives
    }
}

impl<'a> IntoIterator for &'a AlternativeSet {
    type Item = &'a Alternative;
    type IntoIter = std::slice::Iter<'a, Alternative>;

    fn into_iter(self) -> Self::IntoIter {
        self.alternatives.iter()
    }
}
