//! Interactive decision maker
//!
//! Delegates every reference set to a [`Responder`], usually a UI callback
//! that asks a person. Answers are checked against the presented set and
//! wrapped like any other feedback.

use std::time::Instant;

use tracing::debug;

use super::reference_sets::{ReferenceSet, ReferenceSets};
use super::source::{BoundContext, FeedbackSource, SourceFeedback, StatementIds};
use crate::context::{DMContext, DecisionMakerId};
use crate::error::{Component, ElicitError, ElicitResult, ErrorKind};
use crate::statement::statement::PreferenceStatement;

/// Answers one reference set on behalf of a decision maker
pub trait Responder: Send {
    /// Statements about the alternatives of `set`
    fn respond(
        &mut self,
        decision_maker: &DecisionMakerId,
        set: &ReferenceSet,
    ) -> ElicitResult<Vec<PreferenceStatement>>;
}

impl<F> Responder for F
where
    F: FnMut(&DecisionMakerId, &ReferenceSet) -> ElicitResult<Vec<PreferenceStatement>> + Send,
{
    fn respond(
        &mut self,
        decision_maker: &DecisionMakerId,
        set: &ReferenceSet,
    ) -> ElicitResult<Vec<PreferenceStatement>> {
        self(decision_maker, set)
    }
}

/// Feedback source backed by a person
pub struct InteractiveDM<R: Responder> {
    responder: R,
    ids: StatementIds,
    bound: Option<BoundContext>,
}

impl<R: Responder> InteractiveDM<R> {
    /// Create from a responder
    pub fn new(responder: R) -> Self {
        Self {
            responder,
            ids: StatementIds::default(),
            bound: None,
        }
    }

    /// Start statement ids at `first`
    pub fn with_first_id(mut self, first: u64) -> Self {
        self.ids = StatementIds::starting_at(first);
        self
    }
}

fn check_answer(
    set: &ReferenceSet,
    statement: &PreferenceStatement,
    bound: &BoundContext,
) -> ElicitResult<()> {
    let known = |name: &str| set.iter().any(|a| a.name() == name);
    if known(statement.first().name()) && known(statement.second().name()) {
        return Ok(());
    }
    Err(ElicitError::new(
        Component::FeedbackSource,
        ErrorKind::Membership(format!(
            "{} refers to alternatives outside the presented set",
            statement
        )),
    )
    .with_handler(bound.decision_maker.to_string())
    .with_iteration(bound.iteration)
    .with_subject(statement.to_string()))
}

impl<R: Responder> FeedbackSource for InteractiveDM<R> {
    fn name(&self) -> &str {
        "interactive dm"
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

        let mut answers = Vec::new();
        for (_, sets) in reference_sets.iter() {
            for set in sets {
                let statements = self.responder.respond(&bound.decision_maker, set)?;
                for statement in &statements {
                    check_answer(set, statement, &bound)?;
                }
                answers.extend(statements);
            }
        }

        let statements = self.ids.wrap_all(answers, &bound)?;

        debug!(
            decision_maker = %bound.decision_maker,
            statements = statements.len(),
            "interactive feedback collected"
        );
        Ok(SourceFeedback {
            statements,
            elapsed: start.elapsed(),
        })
    }
}
