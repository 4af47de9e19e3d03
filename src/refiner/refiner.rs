//! Refiner
//!
//! Decides whether the decision maker should be consulted in this cycle and,
//! if so, reduces the alternative superset through a chain of filters.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::reduction::{ReductionFilter, RemoveDominated, RemoveDuplicates};
use super::termination::{
    MaxInteractions, MinAlternatives, RequiredIterationGap, TerminationFilter,
};
use crate::alternative::alternative::AlternativeSet;
use crate::config::RefinerConfig;
use crate::context::DMContext;
use crate::error::{Component, ElicitError, ElicitResult};

/// Whether the refiner stopped the cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefinerStatus {
    /// A termination filter fired; no elicitation takes place
    Terminated,
    /// The superset was reduced
    Processed,
}

/// Alternatives removed by a single reduction filter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReductionStep {
    /// Filter name
    pub filter: String,
    /// Count before the filter ran
    pub before: usize,
    /// Count after the filter ran
    pub after: usize,
}

impl ReductionStep {
    /// Number of removed alternatives
    pub fn removed(&self) -> usize {
        self.before.saturating_sub(self.after)
    }
}

/// Outcome of [`Refiner::refine`]
#[derive(Clone, Debug)]
pub struct RefinerResult {
    /// Terminated or processed
    pub status: RefinerStatus,
    /// Message of the last termination filter that fired
    pub termination_message: Option<String>,
    /// Reduced superset; None when terminated
    pub refined_alternatives: Option<AlternativeSet>,
    /// Superset size before reduction
    pub initial_count: usize,
    /// Superset size after reduction (equal to the initial count when terminated)
    pub final_count: usize,
    /// Per-filter reduction counts in execution order
    pub reductions: Vec<ReductionStep>,
    /// Time spent in termination filters
    pub termination_time: Duration,
    /// Time spent in reduction filters
    pub reduction_time: Duration,
    /// Total processing time
    pub total_time: Duration,
}

impl RefinerResult {
    /// Whether the cycle was stopped
    pub fn is_terminated(&self) -> bool {
        self.status == RefinerStatus::Terminated
    }
}

/// Termination check followed by superset reduction
pub struct Refiner {
    termination_filters: Vec<Box<dyn TerminationFilter>>,
    reduction_filters: Vec<Box<dyn ReductionFilter>>,
}

impl Refiner {
    /// Create a refiner from explicit filter lists
    pub fn new(
        termination_filters: Vec<Box<dyn TerminationFilter>>,
        reduction_filters: Vec<Box<dyn ReductionFilter>>,
    ) -> Self {
        Self {
            termination_filters,
            reduction_filters,
        }
    }

    /// Build a refiner from configuration
    pub fn from_config(config: &RefinerConfig) -> ElicitResult<Self> {
        let mut termination: Vec<Box<dyn TerminationFilter>> = Vec::new();
        if let Some(max) = config.max_interactions {
            termination.push(Box::new(MaxInteractions::new(max)));
        }
        if let Some(gap) = config.required_iteration_gap {
            termination.push(Box::new(RequiredIterationGap::new(gap)));
        }
        if let Some(min) = config.min_alternatives {
            termination.push(Box::new(MinAlternatives::new(min)));
        }

        let mut reduction: Vec<Box<dyn ReductionFilter>> = Vec::new();
        if config.remove_duplicates {
            reduction.push(Box::new(RemoveDuplicates));
        }
        if config.remove_dominated {
            reduction.push(Box::new(RemoveDominated));
        }

        let refiner = Self::new(termination, reduction);
        refiner.validate()?;
        Ok(refiner)
    }

    /// Append a termination filter
    pub fn with_termination_filter(mut self, filter: impl TerminationFilter + 'static) -> Self {
        self.termination_filters.push(Box::new(filter));
        self
    }

    /// Append a reduction filter
    pub fn with_reduction_filter(mut self, filter: impl ReductionFilter + 'static) -> Self {
        self.reduction_filters.push(Box::new(filter));
        self
    }

    /// Names of the termination filters in order
    pub fn termination_filter_names(&self) -> Vec<&str> {
        self.termination_filters.iter().map(|f| f.name()).collect()
    }

    /// Names of the reduction filters in order
    pub fn reduction_filter_names(&self) -> Vec<&str> {
        self.reduction_filters.iter().map(|f| f.name()).collect()
    }

    /// Check the refiner and every filter
    pub fn validate(&self) -> ElicitResult<()> {
        if self.reduction_filters.is_empty() {
            return Err(ElicitError::configuration(
                Component::Refiner,
                "at least one reduction filter is required",
            ));
        }
        for filter in &self.termination_filters {
            filter.validate()?;
        }
        for filter in &self.reduction_filters {
            filter.validate()?;
        }
        Ok(())
    }

    /// Run all termination filters, then (if none fired) all reduction filters
    pub fn refine(&self, context: &DMContext) -> ElicitResult<RefinerResult> {
        let start = Instant::now();
        self.validate()?;
        context.require_criteria(Component::Refiner)?;
        let superset = context.require_alternatives(Component::Refiner)?;
        let initial_count = superset.len();

        let termination_start = Instant::now();
        let mut terminate = false;
        let mut termination_message = None;
        for filter in &self.termination_filters {
            let outcome = filter.should_terminate(context).map_err(|e| {
                ElicitError::wrap(Component::Refiner, e)
                    .with_handler(filter.name())
                    .with_iteration(context.iteration)
            })?;
            debug!(filter = filter.name(), terminate = outcome.should_terminate, "termination filter");
            if outcome.should_terminate {
                terminate = true;
                termination_message = outcome.message;
            }
        }
        let termination_time = termination_start.elapsed();

        if terminate {
            info!(
                iteration = context.iteration,
                reason = termination_message.as_deref().unwrap_or(""),
                "elicitation terminated"
            );
            return Ok(RefinerResult {
                status: RefinerStatus::Terminated,
                termination_message,
                refined_alternatives: None,
                initial_count,
                final_count: initial_count,
                reductions: Vec::new(),
                termination_time,
                reduction_time: Duration::ZERO,
                total_time: start.elapsed(),
            });
        }

        let reduction_start = Instant::now();
        let mut current = superset.clone();
        let mut reductions = Vec::with_capacity(self.reduction_filters.len());
        for filter in &self.reduction_filters {
            let before = current.len();
            current = filter.reduce(context, current).map_err(|e| {
                ElicitError::wrap(Component::Refiner, e)
                    .with_handler(filter.name())
                    .with_iteration(context.iteration)
            })?;
            reductions.push(ReductionStep {
                filter: filter.name().to_string(),
                before,
                after: current.len(),
            });
        }
        let reduction_time = reduction_start.elapsed();

        let final_count = current.len();
        info!(
            iteration = context.iteration,
            initial = initial_count,
            kept = final_count,
            "reduced alternative superset"
        );

        Ok(RefinerResult {
            status: RefinerStatus::Processed,
            termination_message: None,
            refined_alternatives: Some(current),
            initial_count,
            final_count,
            reductions,
            termination_time,
            reduction_time,
            total_time: start.elapsed(),
        })
    }
}

impl Default for Refiner {
    /// No termination filters; duplicates then dominated alternatives are removed
    fn default() -> Self {
        Self::new(
            Vec::new(),
            vec![Box::new(RemoveDuplicates), Box::new(RemoveDominated)],
        )
    }
}

impl std::fmt::Debug for Refiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refiner")
            .field("termination_filters", &self.termination_filter_names())
            .field("reduction_filters", &self.reduction_filter_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alternative::alternative::Alternative;
    use crate::alternative::criteria::Criteria;
    use crate::error::ErrorKind;
    use crate::refiner::termination::TerminationOutcome;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        fire: bool,
        calls: Arc<AtomicUsize>,
    }

    impl TerminationFilter for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn should_terminate(&self, _context: &DMContext) -> ElicitResult<TerminationOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(if self.fire {
                TerminationOutcome::terminate(self.name)
            } else {
                TerminationOutcome::proceed()
            })
        }
    }

    fn context() -> DMContext {
        let set = AlternativeSet::from_alternatives(vec![
            Alternative::new("A1", vec![1.0, 3.0]),
            Alternative::new("A2", vec![1.0, 3.0]),
            Alternative::new("A3", vec![2.0, 4.0]),
            Alternative::new("A4", vec![3.0, 1.0]),
        ])
        .unwrap();
        DMContext::builder(1)
            .criteria(Criteria::all_cost(2))
            .alternatives(set)
            .build()
    }

    #[test]
    fn test_all_termination_filters_run_and_last_message_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let filter = |name, fire| Fixed {
            name,
            fire,
            calls: Arc::clone(&calls),
        };
        let refiner = Refiner::default()
            .with_termination_filter(filter("m1", true))
            .with_termination_filter(filter("m2", true))
            .with_termination_filter(filter("m3", false));

        let result = refiner.refine(&context()).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.status, RefinerStatus::Terminated);
        assert_eq!(result.termination_message.as_deref(), Some("m2"));
        assert!(result.refined_alternatives.is_none());
    }

    #[test]
    fn test_default_chain_reduces() {
        let result = Refiner::default().refine(&context()).unwrap();

        assert_eq!(result.status, RefinerStatus::Processed);
        assert_eq!(result.initial_count, 4);
        assert_eq!(result.final_count, 2);
        assert_eq!(
            result.refined_alternatives.unwrap().names(),
            vec!["A1", "A4"]
        );
        assert_eq!(result.reductions[0].removed(), 1);
        assert_eq!(result.reductions[1].removed(), 1);
        assert!(result.total_time >= result.reduction_time);
    }

    #[test]
    fn test_context_superset_is_untouched() {
        let ctx = context();
        Refiner::default().refine(&ctx).unwrap();
        assert_eq!(ctx.current_alternatives.as_ref().unwrap().len(), 4);
    }

    #[test]
    fn test_missing_inputs_are_precondition_errors() {
        let no_criteria = DMContext::builder(0)
            .alternatives(AlternativeSet::new())
            .build();
        let err = Refiner::default().refine(&no_criteria).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Precondition(_)));

        let no_alternatives = DMContext::builder(0).criteria(Criteria::all_cost(2)).build();
        let err = Refiner::default().refine(&no_alternatives).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Precondition(_)));
    }

    #[test]
    fn test_validate_requires_reduction_filter() {
        let refiner = Refiner::new(Vec::new(), Vec::new());
        let err = refiner.validate().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Configuration(_)));
        assert!(refiner.refine(&context()).is_err());
    }

    #[test]
    fn test_from_config() {
        let config = RefinerConfig {
            remove_duplicates: true,
            remove_dominated: false,
            max_interactions: Some(5),
            required_iteration_gap: None,
            min_alternatives: Some(2),
        };
        let refiner = Refiner::from_config(&config).unwrap();
        assert_eq!(refiner.termination_filter_names(), vec!["max interactions", "min alternatives"]);
        assert_eq!(refiner.reduction_filter_names(), vec!["remove duplicates"]);

        let empty = RefinerConfig {
            remove_duplicates: false,
            remove_dominated: false,
            ..RefinerConfig::default()
        };
        assert!(Refiner::from_config(&empty).is_err());
    }
}
