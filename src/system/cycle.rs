//! Elicitation cycle
//!
//! One cycle runs refine → construct reference sets → collect feedback →
//! record statements, synchronously and to completion. Histories are only
//! touched once every decision maker's batch has been validated, so a
//! failed cycle leaves all of them as they were.

use std::collections::BTreeMap;

use tracing::{info, warn};

use super::dms::DecisionMakingSystem;
use crate::alternative::alternative::AlternativeSet;
use crate::context::{DMContext, DMContextBuilder, DecisionMakerId};
use crate::error::{Component, ElicitError, ElicitResult};
use crate::feedback::provider::{FeedbackProvider, FeedbackResult};
use crate::feedback::reference_sets::ReferenceSetsResult;
use crate::refiner::refiner::{Refiner, RefinerResult};

/// Builds reference sets from a refined superset
///
/// Which alternatives make up a reference set is a strategy decision made
/// outside this crate; the cycle only reads the result.
pub trait ReferenceSetsConstructor {
    /// Reference sets for the given refined alternatives
    fn construct(
        &self,
        context: &DMContext,
        alternatives: &AlternativeSet,
    ) -> ElicitResult<ReferenceSetsResult>;
}

impl<F> ReferenceSetsConstructor for F
where
    F: Fn(&DMContext, &AlternativeSet) -> ElicitResult<ReferenceSetsResult>,
{
    fn construct(
        &self,
        context: &DMContext,
        alternatives: &AlternativeSet,
    ) -> ElicitResult<ReferenceSetsResult> {
        self(context, alternatives)
    }
}

/// Outcome of one [`ElicitationCycle::run`]
#[derive(Clone, Debug)]
pub struct CycleReport {
    /// Refiner outcome
    pub refiner: RefinerResult,
    /// Collected feedback; None when the refiner terminated the cycle
    pub feedback: Option<FeedbackResult>,
    /// Statements appended to each decision maker's history
    pub registered: BTreeMap<DecisionMakerId, usize>,
}

impl CycleReport {
    /// Whether the refiner stopped the cycle
    pub fn is_terminated(&self) -> bool {
        self.refiner.is_terminated()
    }

    /// Statements appended across all histories
    pub fn total_registered(&self) -> usize {
        self.registered.values().sum()
    }
}

/// Refiner, feedback provider and the decision-making systems they serve
#[derive(Debug)]
pub struct ElicitationCycle {
    refiner: Refiner,
    provider: FeedbackProvider,
    systems: BTreeMap<DecisionMakerId, DecisionMakingSystem>,
    interactions: usize,
    last_interaction_iteration: Option<usize>,
}

impl ElicitationCycle {
    /// Create a cycle; fails if any component is misconfigured
    pub fn new(
        refiner: Refiner,
        provider: FeedbackProvider,
        systems: Vec<DecisionMakingSystem>,
    ) -> ElicitResult<Self> {
        let mut map = BTreeMap::new();
        for system in systems {
            let id = system.id().clone();
            if map.insert(id.clone(), system).is_some() {
                return Err(ElicitError::configuration(
                    Component::System,
                    "two systems for one decision maker",
                )
                .with_subject(id.to_string()));
            }
        }
        let cycle = Self {
            refiner,
            provider,
            systems: map,
            interactions: 0,
            last_interaction_iteration: None,
        };
        cycle.validate()?;
        Ok(cycle)
    }

    /// Check every component and that the provider's roster has systems
    pub fn validate(&self) -> ElicitResult<()> {
        if self.systems.is_empty() {
            return Err(ElicitError::configuration(
                Component::System,
                "at least one decision-making system is required",
            ));
        }
        self.refiner.validate()?;
        self.provider.validate()?;
        if let Some(dm) = self
            .provider
            .roster()
            .iter()
            .find(|dm| !self.systems.contains_key(*dm))
        {
            return Err(ElicitError::configuration(
                Component::System,
                "feedback source registered for a decision maker without a system",
            )
            .with_subject(dm.to_string()));
        }
        Ok(())
    }

    /// Decision makers with a system, in id order
    pub fn decision_makers(&self) -> Vec<DecisionMakerId> {
        self.systems.keys().cloned().collect()
    }

    /// System of one decision maker
    pub fn system(&self, dm: &DecisionMakerId) -> Option<&DecisionMakingSystem> {
        self.systems.get(dm)
    }

    /// Mutable system of one decision maker
    pub fn system_mut(&mut self, dm: &DecisionMakerId) -> Option<&mut DecisionMakingSystem> {
        self.systems.get_mut(dm)
    }

    /// Completed elicitations
    pub fn interactions(&self) -> usize {
        self.interactions
    }

    /// Context builder for `iteration` pre-filled with the decision makers
    /// and the interaction counters this cycle keeps
    pub fn context_builder(&self, iteration: usize) -> DMContextBuilder {
        let builder = DMContext::builder(iteration)
            .decision_makers(self.systems.keys().cloned())
            .interactions(self.interactions);
        match self.last_interaction_iteration {
            Some(last) => builder.last_interaction_iteration(last),
            None => builder,
        }
    }

    /// Run one elicitation cycle
    pub fn run(
        &mut self,
        context: &DMContext,
        constructor: &dyn ReferenceSetsConstructor,
    ) -> ElicitResult<CycleReport> {
        let refiner = self.refiner.refine(context)?;
        if refiner.is_terminated() {
            return Ok(CycleReport {
                refiner,
                feedback: None,
                registered: BTreeMap::new(),
            });
        }
        let refined = refiner.refined_alternatives.as_ref().ok_or_else(|| {
            ElicitError::precondition(Component::System, "refiner produced no alternatives")
                .with_iteration(context.iteration)
        })?;

        let decision_makers = &context.decision_makers;
        if let Some(dm) = decision_makers
            .iter()
            .find(|dm| !self.systems.contains_key(*dm))
        {
            return Err(ElicitError::precondition(
                Component::System,
                "decision maker has no decision-making system",
            )
            .with_iteration(context.iteration)
            .with_subject(dm.to_string()));
        }

        let sets = constructor.construct(context, refined).map_err(|e| {
            ElicitError::wrap(Component::System, e)
                .with_handler("reference sets constructor")
                .with_iteration(context.iteration)
        })?;

        let mut feedback = self
            .provider
            .generate_feedback(context, decision_makers, Some(&sets))?;

        // ids continue each history's own sequence, whatever the source counted
        for (dm, produced) in feedback.feedback.iter_mut() {
            if let Some(system) = self.systems.get(dm) {
                let history = system.history();
                let statements = std::mem::take(&mut produced.statements);
                produced.statements = history
                    .assign_ids(statements)
                    .and_then(|batch| history.validate_batch(&batch).map(|_| batch))
                    .map_err(|e| {
                        warn!(decision_maker = %dm, error = %e, "feedback rejected by history");
                        ElicitError::wrap(Component::System, e)
                            .with_handler(dm.to_string())
                            .with_iteration(context.iteration)
                    })?;
            }
        }

        let mut registered = BTreeMap::new();
        for (dm, produced) in &feedback.feedback {
            if let Some(system) = self.systems.get_mut(dm) {
                let count = system
                    .history_mut()
                    .register_preference_information(produced.statements.clone())?;
                registered.insert(dm.clone(), count);
            }
        }

        self.interactions += 1;
        self.last_interaction_iteration = Some(context.iteration);
        info!(
            iteration = context.iteration,
            interactions = self.interactions,
            registered = registered.values().sum::<usize>(),
            "elicitation cycle completed"
        );

        Ok(CycleReport {
            refiner,
            feedback: Some(feedback),
            registered,
        })
    }
}
