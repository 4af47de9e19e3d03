//! Termination filters
//!
//! A termination filter inspects the context and votes on whether the
//! decision maker should be asked again. The refiner consults every filter.

use crate::context::DMContext;
use crate::error::{Component, ElicitError, ElicitResult};

/// Vote of a single termination filter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminationOutcome {
    /// Whether the filter requests termination
    pub should_terminate: bool,
    /// Reason, when termination is requested
    pub message: Option<String>,
}

impl TerminationOutcome {
    /// Keep going
    pub fn proceed() -> Self {
        Self {
            should_terminate: false,
            message: None,
        }
    }

    /// Stop with a reason
    pub fn terminate(message: impl Into<String>) -> Self {
        Self {
            should_terminate: true,
            message: Some(message.into()),
        }
    }
}

/// Filter deciding whether an elicitation should take place
pub trait TerminationFilter: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Vote on the given context
    fn should_terminate(&self, context: &DMContext) -> ElicitResult<TerminationOutcome>;

    /// Check the filter's own configuration
    fn validate(&self) -> ElicitResult<()> {
        Ok(())
    }
}

/// Stop once `n` elicitations have been completed
#[derive(Clone, Debug)]
pub struct MaxInteractions(pub usize);

impl MaxInteractions {
    /// Create a new max interactions filter
    pub fn new(max: usize) -> Self {
        Self(max)
    }
}

impl TerminationFilter for MaxInteractions {
    fn name(&self) -> &str {
        "max interactions"
    }

    fn should_terminate(&self, context: &DMContext) -> ElicitResult<TerminationOutcome> {
        Ok(if context.interactions >= self.0 {
            TerminationOutcome::terminate(format!(
                "maximum number of interactions reached ({} >= {})",
                context.interactions, self.0
            ))
        } else {
            TerminationOutcome::proceed()
        })
    }
}

/// Stop when fewer than `n` iterations passed since the previous elicitation
#[derive(Clone, Debug)]
pub struct RequiredIterationGap(pub usize);

impl RequiredIterationGap {
    /// Create a new iteration gap filter
    pub fn new(gap: usize) -> Self {
        Self(gap)
    }
}

impl TerminationFilter for RequiredIterationGap {
    fn name(&self) -> &str {
        "required iteration gap"
    }

    fn should_terminate(&self, context: &DMContext) -> ElicitResult<TerminationOutcome> {
        Ok(match context.iterations_since_last_interaction() {
            Some(gap) if gap < self.0 => TerminationOutcome::terminate(format!(
                "only {} iterations since the previous interaction (required {})",
                gap, self.0
            )),
            _ => TerminationOutcome::proceed(),
        })
    }

    fn validate(&self) -> ElicitResult<()> {
        if self.0 == 0 {
            return Err(ElicitError::configuration(
                Component::Refiner,
                "the required iteration gap must be positive",
            )
            .with_handler(self.name()));
        }
        Ok(())
    }
}

/// Stop when the superset has fewer than `n` alternatives
#[derive(Clone, Debug)]
pub struct MinAlternatives(pub usize);

impl MinAlternatives {
    /// Create a new minimum alternatives filter
    pub fn new(min: usize) -> Self {
        Self(min)
    }
}

impl TerminationFilter for MinAlternatives {
    fn name(&self) -> &str {
        "min alternatives"
    }

    fn should_terminate(&self, context: &DMContext) -> ElicitResult<TerminationOutcome> {
        let count = context
            .require_alternatives(Component::Refiner)
            .map_err(|e| e.with_handler(self.name()))?
            .len();
        Ok(if count < self.0 {
            TerminationOutcome::terminate(format!(
                "too few alternatives to compare ({} < {})",
                count, self.0
            ))
        } else {
            TerminationOutcome::proceed()
        })
    }
}
