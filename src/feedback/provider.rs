//! Feedback provider
//!
//! Routes reference sets to feedback sources and collects their statements
//! per decision maker. A provider either shares one source among all
//! decision makers or holds a dedicated source for each one; the mode is
//! fixed at construction.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::reference_sets::{ReferenceSets, ReferenceSetsResult};
use super::source::{ContextBinding, FeedbackSource, SourceFeedback};
use crate::context::{DMContext, DecisionMakerId};
use crate::error::{Component, ElicitError, ElicitResult};

/// Statements collected in one call to [`FeedbackProvider::generate_feedback`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedbackResult {
    /// Feedback per decision maker
    pub feedback: BTreeMap<DecisionMakerId, SourceFeedback>,
    /// Total processing time
    pub processing_time: Duration,
}

impl FeedbackResult {
    /// Feedback for one decision maker
    pub fn for_decision_maker(&self, dm: &DecisionMakerId) -> Option<&SourceFeedback> {
        self.feedback.get(dm)
    }

    /// Number of statements across all decision makers
    pub fn total_statements(&self) -> usize {
        self.feedback.values().map(SourceFeedback::len).sum()
    }
}

enum Mode {
    Common(Box<dyn FeedbackSource>),
    PerDecisionMaker {
        roster: Vec<DecisionMakerId>,
        sources: BTreeMap<DecisionMakerId, Box<dyn FeedbackSource>>,
    },
}

/// Dispatches reference sets to feedback sources
pub struct FeedbackProvider {
    mode: Mode,
}

fn config_error(message: impl Into<String>) -> ElicitError {
    ElicitError::configuration(Component::FeedbackProvider, message)
}

fn check_roster(
    roster: &[DecisionMakerId],
    sources: &BTreeMap<DecisionMakerId, Box<dyn FeedbackSource>>,
) -> ElicitResult<()> {
    if roster.is_empty() {
        return Err(config_error("the decision maker roster is empty"));
    }
    let mut seen = BTreeSet::new();
    for dm in roster {
        if !seen.insert(dm) {
            return Err(config_error("decision maker listed twice").with_subject(dm.to_string()));
        }
        if !sources.contains_key(dm) {
            return Err(config_error("no feedback source for decision maker")
                .with_subject(dm.to_string()));
        }
    }
    if let Some(stray) = sources.keys().find(|dm| !seen.contains(dm)) {
        return Err(config_error("feedback source for a decision maker outside the roster")
            .with_subject(stray.to_string()));
    }
    for (dm, source) in sources {
        source.validate().map_err(|e| {
            ElicitError::wrap(Component::FeedbackProvider, e).with_handler(dm.to_string())
        })?;
    }
    Ok(())
}

impl FeedbackProvider {
    /// One source answers for every decision maker
    pub fn common(source: impl FeedbackSource + 'static) -> ElicitResult<Self> {
        let provider = Self {
            mode: Mode::Common(Box::new(source)),
        };
        provider.validate()?;
        Ok(provider)
    }

    /// A dedicated source per decision maker. The roster and the mapping
    /// must name exactly the same decision makers.
    pub fn per_decision_maker<I>(roster: Vec<DecisionMakerId>, sources: I) -> ElicitResult<Self>
    where
        I: IntoIterator<Item = (DecisionMakerId, Box<dyn FeedbackSource>)>,
    {
        let mut map = BTreeMap::new();
        for (dm, source) in sources {
            if map.contains_key(&dm) {
                return Err(config_error("two feedback sources for one decision maker")
                    .with_subject(dm.to_string()));
            }
            map.insert(dm, source);
        }
        let provider = Self {
            mode: Mode::PerDecisionMaker {
                roster,
                sources: map,
            },
        };
        provider.validate()?;
        Ok(provider)
    }

    /// Whether one source is shared by all decision makers
    pub fn is_common(&self) -> bool {
        matches!(self.mode, Mode::Common(_))
    }

    /// Registered decision makers (empty in common mode)
    pub fn roster(&self) -> &[DecisionMakerId] {
        match &self.mode {
            Mode::Common(_) => &[],
            Mode::PerDecisionMaker { roster, .. } => roster.as_slice(),
        }
    }

    /// Check the configuration and every source
    pub fn validate(&self) -> ElicitResult<()> {
        match &self.mode {
            Mode::Common(source) => source
                .validate()
                .map_err(|e| ElicitError::wrap(Component::FeedbackProvider, e)),
            Mode::PerDecisionMaker { roster, sources } => check_roster(roster, sources),
        }
    }

    /// Collect feedback from every decision maker in `decision_makers`
    pub fn generate_feedback(
        &mut self,
        context: &DMContext,
        decision_makers: &[DecisionMakerId],
        reference_sets: Option<&ReferenceSetsResult>,
    ) -> ElicitResult<FeedbackResult> {
        let start = Instant::now();
        let reference_sets = reference_sets.ok_or_else(|| {
            ElicitError::precondition(Component::FeedbackProvider, "reference sets are not provided")
                .with_iteration(context.iteration)
        })?;
        if decision_makers.is_empty() {
            return Err(ElicitError::precondition(
                Component::FeedbackProvider,
                "no decision makers to collect feedback from",
            )
            .with_iteration(context.iteration));
        }
        let mut seen = BTreeSet::new();
        if let Some(dm) = decision_makers.iter().find(|dm| !seen.insert(*dm)) {
            return Err(ElicitError::precondition(
                Component::FeedbackProvider,
                "decision maker requested twice",
            )
            .with_iteration(context.iteration)
            .with_subject(dm.to_string()));
        }

        let mut feedback = BTreeMap::new();
        match &mut self.mode {
            Mode::Common(source) => {
                let produced = generate_from(
                    &mut **source,
                    context,
                    &decision_makers[0],
                    &reference_sets.common,
                )?;
                for dm in decision_makers {
                    feedback.insert(dm.clone(), produced.clone());
                }
            }
            Mode::PerDecisionMaker { sources, .. } => {
                if let Some(unknown) = decision_makers.iter().find(|dm| !sources.contains_key(*dm)) {
                    return Err(ElicitError::precondition(
                        Component::FeedbackProvider,
                        "decision maker is not registered",
                    )
                    .with_iteration(context.iteration)
                    .with_subject(unknown.to_string()));
                }
                for dm in decision_makers {
                    if let Some(source) = sources.get_mut(dm) {
                        let sets = reference_sets.for_decision_maker(dm);
                        let produced = generate_from(&mut **source, context, dm, &sets)?;
                        feedback.insert(dm.clone(), produced);
                    }
                }
            }
        }

        let result = FeedbackResult {
            feedback,
            processing_time: start.elapsed(),
        };
        info!(
            iteration = context.iteration,
            decision_makers = decision_makers.len(),
            statements = result.total_statements(),
            "feedback collected"
        );
        Ok(result)
    }
}

/// Bind, generate, unbind; errors carry the decision maker
fn generate_from(
    source: &mut dyn FeedbackSource,
    context: &DMContext,
    dm: &DecisionMakerId,
    sets: &ReferenceSets,
) -> ElicitResult<SourceFeedback> {
    let wrap = |e: ElicitError| {
        ElicitError::wrap(Component::FeedbackProvider, e)
            .with_handler(dm.to_string())
            .with_iteration(context.iteration)
    };
    let mut bound = ContextBinding::bind(source, context, dm).map_err(wrap)?;
    debug!(decision_maker = %dm, source = bound.name(), sets = sets.total_sets(), "generating feedback");
    bound.generate(sets).map_err(wrap)
}

impl std::fmt::Debug for FeedbackProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.mode {
            Mode::Common(source) => f
                .debug_struct("FeedbackProvider")
                .field("common", &source.name())
                .finish(),
            Mode::PerDecisionMaker { roster, .. } => f
                .debug_struct("FeedbackProvider")
                .field("roster", roster)
                .finish(),
        }
    }
}
