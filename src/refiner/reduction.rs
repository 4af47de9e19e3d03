//! Reduction filters
//!
//! Reduction filters shrink the alternative superset before reference sets
//! are built. They run in sequence; each receives the previous output.

use tracing::debug;

use crate::alternative::alternative::{Alternative, AlternativeSet};
use crate::context::DMContext;
use crate::error::{Component, ElicitResult};

/// Filter that removes alternatives from a superset
pub trait ReductionFilter: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Reduce `alternatives`, returning the kept ones in their original order
    fn reduce(&self, context: &DMContext, alternatives: AlternativeSet) -> ElicitResult<AlternativeSet>;

    /// Check the filter's own configuration
    fn validate(&self) -> ElicitResult<()> {
        Ok(())
    }
}

/// Keep one alternative per distinct performance vector (the first seen)
#[derive(Clone, Debug, Default)]
pub struct RemoveDuplicates;

impl ReductionFilter for RemoveDuplicates {
    fn name(&self) -> &str {
        "remove duplicates"
    }

    fn reduce(&self, context: &DMContext, alternatives: AlternativeSet) -> ElicitResult<AlternativeSet> {
        let before = alternatives.len();
        let mut kept: Vec<Alternative> = Vec::with_capacity(before);
        for alternative in alternatives.into_inner() {
            if !kept.iter().any(|k| k.same_performance(&alternative)) {
                kept.push(alternative);
            }
        }
        debug!(
            iteration = context.iteration,
            removed = before - kept.len(),
            "removed duplicate alternatives"
        );
        AlternativeSet::from_alternatives(kept)
    }
}

/// Keep only alternatives no other member Pareto-dominates
#[derive(Clone, Debug, Default)]
pub struct RemoveDominated;

impl ReductionFilter for RemoveDominated {
    fn name(&self) -> &str {
        "remove dominated"
    }

    fn reduce(&self, context: &DMContext, alternatives: AlternativeSet) -> ElicitResult<AlternativeSet> {
        let criteria = context
            .require_criteria(Component::Refiner)
            .map_err(|e| e.with_handler(self.name()))?;

        let before = alternatives.len();
        let dominated: Vec<bool> = alternatives
            .iter()
            .map(|b| alternatives.iter().any(|a| criteria.dominates(a, b)))
            .collect();
        let kept: Vec<Alternative> = alternatives
            .into_inner()
            .into_iter()
            .zip(dominated)
            .filter_map(|(alt, is_dominated)| (!is_dominated).then_some(alt))
            .collect();

        debug!(
            iteration = context.iteration,
            removed = before - kept.len(),
            "removed dominated alternatives"
        );
        AlternativeSet::from_alternatives(kept)
    }
}
