//! Form constructors
//!
//! A form constructor decides which questions an artificial decision maker
//! answers and how a hidden model's scores become statements.

use tracing::debug;

use super::reference_sets::ReferenceSets;
use crate::alternative::alternative::Alternative;
use crate::config::PairwiseConfig;
use crate::error::{Component, ElicitError, ElicitResult};
use crate::model::traits::PreferenceModel;
use crate::statement::statement::PreferenceStatement;

/// Turns reference sets into statements using a preference model
pub trait FormConstructor: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Answer the questions posed by `reference_sets` using `model`
    fn construct(
        &self,
        model: &dyn PreferenceModel,
        reference_sets: &ReferenceSets,
    ) -> ElicitResult<Vec<PreferenceStatement>>;

    /// Check the constructor's own configuration
    fn validate(&self) -> ElicitResult<()> {
        Ok(())
    }
}

/// Pairwise comparison of every unordered pair in sets of one size
#[derive(Clone, Debug)]
pub struct PairwiseComparisons {
    set_size: usize,
    indifference_threshold: f64,
}

impl Default for PairwiseComparisons {
    fn default() -> Self {
        Self {
            set_size: 2,
            indifference_threshold: f64::NEG_INFINITY,
        }
    }
}

impl PairwiseComparisons {
    /// Create a constructor for sets of `set_size`
    pub fn new(set_size: usize, indifference_threshold: f64) -> ElicitResult<Self> {
        let form = Self {
            set_size,
            indifference_threshold,
        };
        form.validate()?;
        Ok(form)
    }

    /// Build from configuration
    pub fn from_config(config: &PairwiseConfig) -> ElicitResult<Self> {
        Self::new(
            config.set_size,
            config.indifference_threshold.unwrap_or(f64::NEG_INFINITY),
        )
    }

    /// Size of the reference sets this constructor answers
    pub fn set_size(&self) -> usize {
        self.set_size
    }

    /// Score difference below which a pair is indifferent
    pub fn indifference_threshold(&self) -> f64 {
        self.indifference_threshold
    }

    fn score(&self, model: &dyn PreferenceModel, alternative: &Alternative) -> ElicitResult<f64> {
        model.evaluate(alternative).map_err(|e| {
            ElicitError::wrap(Component::FormConstructor, e)
                .with_handler(self.name())
                .with_subject(alternative.name())
        })
    }

    /// Statement for a single pair
    fn compare(
        &self,
        model: &dyn PreferenceModel,
        a: &Alternative,
        b: &Alternative,
    ) -> ElicitResult<PreferenceStatement> {
        let sa = self.score(model, a)?;
        let sb = self.score(model, b)?;

        Ok(if (sa - sb).abs() < self.indifference_threshold {
            PreferenceStatement::indifference(a.clone(), b.clone())
        } else if model.is_better_score(sb, sa) {
            PreferenceStatement::preference(b.clone(), a.clone())
        } else {
            PreferenceStatement::preference(a.clone(), b.clone())
        })
    }
}

impl FormConstructor for PairwiseComparisons {
    fn name(&self) -> &str {
        "pairwise comparisons"
    }

    fn construct(
        &self,
        model: &dyn PreferenceModel,
        reference_sets: &ReferenceSets,
    ) -> ElicitResult<Vec<PreferenceStatement>> {
        let mut statements = Vec::new();
        for set in reference_sets.of_size(self.set_size) {
            let alternatives = set.alternatives();
            for i in 0..alternatives.len() {
                for j in (i + 1)..alternatives.len() {
                    statements.push(self.compare(model, &alternatives[i], &alternatives[j])?);
                }
            }
        }
        debug!(
            sets = reference_sets.of_size(self.set_size).len(),
            statements = statements.len(),
            "constructed pairwise comparisons"
        );
        Ok(statements)
    }

    fn validate(&self) -> ElicitResult<()> {
        if self.set_size < 2 {
            return Err(ElicitError::configuration(
                Component::FormConstructor,
                format!("set size must be at least 2, got {}", self.set_size),
            )
            .with_handler(self.name()));
        }
        if self.indifference_threshold.is_nan() {
            return Err(ElicitError::configuration(
                Component::FormConstructor,
                "indifference threshold must not be NaN",
            )
            .with_handler(self.name()));
        }
        Ok(())
    }
}
