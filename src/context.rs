//! Per-cycle decision-making context
//!
//! A [`DMContext`] is built once per elicitation cycle and passed by
//! reference to every component. Components never mutate it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alternative::alternative::AlternativeSet;
use crate::alternative::criteria::Criteria;
use crate::error::{Component, ElicitError, ElicitResult};

/// Identity of a decision maker
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DecisionMakerId(String);

impl DecisionMakerId {
    /// Create a new id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DecisionMakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DecisionMakerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DecisionMakerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Snapshot of the optimizer state at the time of an elicitation cycle
#[derive(Clone, Debug, Default)]
pub struct DMContext {
    /// Optimizer iteration
    pub iteration: usize,
    /// Wall-clock time of the cycle
    pub timestamp: Option<DateTime<Utc>>,
    /// Criteria definitions
    pub criteria: Option<Criteria>,
    /// Current alternative superset
    pub current_alternatives: Option<AlternativeSet>,
    /// Decision makers taking part
    pub decision_makers: Vec<DecisionMakerId>,
    /// Completed elicitations so far
    pub interactions: usize,
    /// Iteration of the previous elicitation
    pub last_interaction_iteration: Option<usize>,
}

impl DMContext {
    /// Start building a context for `iteration`
    pub fn builder(iteration: usize) -> DMContextBuilder {
        DMContextBuilder::new(iteration)
    }

    /// Criteria, or a precondition error naming `component`
    pub fn require_criteria(&self, component: Component) -> ElicitResult<&Criteria> {
        self.criteria.as_ref().ok_or_else(|| {
            ElicitError::precondition(component, "criteria are not provided")
                .with_iteration(self.iteration)
        })
    }

    /// Alternative superset, or a precondition error naming `component`
    pub fn require_alternatives(&self, component: Component) -> ElicitResult<&AlternativeSet> {
        self.current_alternatives.as_ref().ok_or_else(|| {
            ElicitError::precondition(component, "current alternatives are not provided")
                .with_iteration(self.iteration)
        })
    }

    /// Iterations elapsed since the previous elicitation
    pub fn iterations_since_last_interaction(&self) -> Option<usize> {
        self.last_interaction_iteration
            .map(|last| self.iteration.saturating_sub(last))
    }
}

/// Builder for [`DMContext`]
#[derive(Clone, Debug, Default)]
pub struct DMContextBuilder {
    context: DMContext,
}

impl DMContextBuilder {
    /// Create a new builder
    pub fn new(iteration: usize) -> Self {
        Self {
            context: DMContext {
                iteration,
                ..DMContext::default()
            },
        }
    }

    /// Set the timestamp
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.context.timestamp = Some(timestamp);
        self
    }

    /// Stamp with the current time
    pub fn now(self) -> Self {
        self.timestamp(Utc::now())
    }

    /// Set the criteria
    pub fn criteria(mut self, criteria: Criteria) -> Self {
        self.context.criteria = Some(criteria);
        self
    }

    /// Set the alternative superset
    pub fn alternatives(mut self, alternatives: AlternativeSet) -> Self {
        self.context.current_alternatives = Some(alternatives);
        self
    }

    /// Add a decision maker
    pub fn decision_maker(mut self, id: impl Into<DecisionMakerId>) -> Self {
        self.context.decision_makers.push(id.into());
        self
    }

    /// Set the decision makers
    pub fn decision_makers<I, D>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DecisionMakerId>,
    {
        self.context.decision_makers = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Set the completed interaction count
    pub fn interactions(mut self, count: usize) -> Self {
        self.context.interactions = count;
        self
    }

    /// Set the iteration of the previous elicitation
    pub fn last_interaction_iteration(mut self, iteration: usize) -> Self {
        self.context.last_interaction_iteration = Some(iteration);
        self
    }

    /// Build the context
    pub fn build(self) -> DMContext {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_builder() {
        let ctx = DMContext::builder(4)
            .criteria(Criteria::all_cost(2))
            .decision_makers(["dm1", "dm2"])
            .interactions(3)
            .last_interaction_iteration(1)
            .build();

        assert_eq!(ctx.iteration, 4);
        assert_eq!(ctx.decision_makers, vec![DecisionMakerId::from("dm1"), "dm2".into()]);
        assert_eq!(ctx.iterations_since_last_interaction(), Some(3));
        assert!(ctx.require_criteria(Component::Refiner).is_ok());
    }

    #[test]
    fn test_missing_alternatives_is_precondition_error() {
        let ctx = DMContext::builder(0).build();
        let err = ctx.require_alternatives(Component::Refiner).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Precondition(_)));
        assert_eq!(err.component, Component::Refiner);
    }
}
