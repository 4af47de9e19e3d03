//! Artificial decision maker
//!
//! Answers questions from a hidden preference model. Used to simulate a
//! human in experiments and tests.

use std::time::Instant;

use tracing::debug;

use super::forms::{FormConstructor, PairwiseComparisons};
use super::reference_sets::ReferenceSets;
use super::source::{BoundContext, FeedbackSource, SourceFeedback, StatementIds};
use crate::context::{DMContext, DecisionMakerId};
use crate::error::{Component, ElicitError, ElicitResult};
use crate::model::traits::PreferenceModel;

/// Feedback source driven by a hidden preference model
pub struct ArtificialValueDM<M: PreferenceModel> {
    model: M,
    forms: Vec<Box<dyn FormConstructor>>,
    ids: StatementIds,
    bound: Option<BoundContext>,
}

impl<M: PreferenceModel> ArtificialValueDM<M> {
    /// Create with the default pairwise comparison form
    pub fn new(model: M) -> Self {
        Self::with_forms(model, vec![Box::new(PairwiseComparisons::default())])
    }

    /// Create with explicit form constructors
    pub fn with_forms(model: M, forms: Vec<Box<dyn FormConstructor>>) -> Self {
        Self {
            model,
            forms,
            ids: StatementIds::default(),
            bound: None,
        }
    }

    /// Start statement ids at `first`
    pub fn with_first_id(mut self, first: u64) -> Self {
        self.ids = StatementIds::starting_at(first);
        self
    }

    /// The hidden model
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the hidden model
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Active binding, if any
    pub fn binding(&self) -> Option<&BoundContext> {
        self.bound.as_ref()
    }
}

impl<M: PreferenceModel> FeedbackSource for ArtificialValueDM<M> {
    fn name(&self) -> &str {
        "artificial value dm"
    }

    fn bind(&mut self, context: &DMContext, decision_maker: &DecisionMakerId) -> ElicitResult<()> {
        self.bound = Some(BoundContext::new(context, decision_maker));
        Ok(())
    }

    fn unbind(&mut self) {
        self.bound = None;
    }

    fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    fn generate(&mut self, reference_sets: &ReferenceSets) -> ElicitResult<SourceFeedback> {
        let start = Instant::now();
        let bound = self
            .bound
            .clone()
            .ok_or_else(|| BoundContext::missing(self.name()))?;

        let mut produced = Vec::new();
        for form in &self.forms {
            let statements = form.construct(&self.model, reference_sets).map_err(|e| {
                ElicitError::wrap(Component::FeedbackSource, e)
                    .with_handler(bound.decision_maker.to_string())
                    .with_iteration(bound.iteration)
            })?;
            produced.extend(statements);
        }

        let statements = self.ids.wrap_all(produced, &bound)?;

        debug!(
            decision_maker = %bound.decision_maker,
            model = self.model.name(),
            statements = statements.len(),
            "artificial feedback generated"
        );
        Ok(SourceFeedback {
            statements,
            elapsed: start.elapsed(),
        })
    }

    fn validate(&self) -> ElicitResult<()> {
        if self.forms.is_empty() {
            return Err(ElicitError::configuration(
                Component::FeedbackSource,
                "at least one form constructor is required",
            )
            .with_handler(self.name()));
        }
        for form in &self.forms {
            form.validate()?;
        }
        Ok(())
    }
}
