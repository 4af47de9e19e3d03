//! Preference cone compatibility scoring
//!
//! The candidate alternative is read as a Chebyshev weight vector (through
//! the inverse of its performances). Its score is the number of recorded
//! judgments that weight vector contradicts, so a lower score means a more
//! compatible weight vector. This is the primitive used to detect
//! inconsistent judgments.

use rand::Rng;
use rand_distr::Exp1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::lnorm::{aggregate, uniform_weights};
use super::normalization::{normalize_vector, Normalization};
use super::traits::{ModelParams, PreferenceModel};
use crate::alternative::alternative::Alternative;
use crate::error::{Component, ElicitError, ElicitResult};
use crate::history::History;
use crate::statement::statement::PreferenceStatement;

/// Counts recorded statements violated by a candidate weight vector
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferenceCone {
    statements: Vec<PreferenceStatement>,
    /// Incumbent weight vector; `evaluate` does not read it
    weights: Option<Vec<f64>>,
    normalizations: Option<Vec<Normalization>>,
}

impl PreferenceCone {
    /// Create a cone over the given statements
    pub fn new(statements: Vec<PreferenceStatement>) -> Self {
        Self {
            statements,
            weights: None,
            normalizations: None,
        }
    }

    /// Create a cone over the current contents of a history
    pub fn from_history(history: &History) -> Self {
        Self::new(history.preference_information_copy())
    }

    /// Normalize performance vectors before deriving weights and scoring
    pub fn with_normalizations(mut self, normalizations: Vec<Normalization>) -> Self {
        self.normalizations = Some(normalizations);
        self
    }

    /// Recorded statements
    pub fn statements(&self) -> &[PreferenceStatement] {
        &self.statements
    }

    /// Replace the recorded statements
    pub fn set_statements(&mut self, statements: Vec<PreferenceStatement>) {
        self.statements = statements;
    }

    /// Derive a weight vector from a performance vector.
    ///
    /// All-zero vectors give uniform weights. If any coordinate is zero its
    /// inverse is treated as +inf, so the mass is spread uniformly over the
    /// zero coordinates. Otherwise weights are `1/e_i` renormalized to sum 1.
    /// Negative or non-finite coordinates have no weight reading and fail.
    pub fn derive_weights(performance: &[f64]) -> ElicitResult<Vec<f64>> {
        if let Some((criterion, e)) = performance
            .iter()
            .enumerate()
            .find(|(_, e)| !e.is_finite() || **e < 0.0)
        {
            return Err(ElicitError::evaluation(
                Component::Model,
                format!(
                    "criterion {} is {}; weights need finite non-negative performances",
                    criterion, e
                ),
            )
            .with_handler("PreferenceCone"));
        }

        let m = performance.len();
        let zeros = performance.iter().filter(|&&e| e == 0.0).count();

        if zeros == m {
            return Ok(uniform_weights(m));
        }
        if zeros > 0 {
            let share = 1.0 / zeros as f64;
            return Ok(performance
                .iter()
                .map(|&e| if e == 0.0 { share } else { 0.0 })
                .collect());
        }

        let inverse: Vec<f64> = performance.iter().map(|e| 1.0 / e).collect();
        let total: f64 = inverse.iter().sum();
        Ok(inverse.iter().map(|v| v / total).collect())
    }

    fn chebyshev(&self, weights: &[f64], alternative: &Alternative) -> ElicitResult<f64> {
        let e = normalize_vector(alternative.performance(), self.normalizations.as_deref())?;
        if e.len() != weights.len() {
            return Err(
                ElicitError::dimension_mismatch(Component::Model, weights.len(), e.len())
                    .with_handler(self.name())
                    .with_subject(alternative.name()),
            );
        }
        Ok(aggregate(weights, &e, f64::INFINITY))
    }

    /// Number of strict preferences `A > B` with `cheb(A) >= cheb(B)` under `weights`
    pub fn count_violations(&self, weights: &[f64]) -> ElicitResult<usize> {
        let mut violations = 0;
        for statement in &self.statements {
            if let PreferenceStatement::Preference {
                preferred,
                not_preferred,
            } = statement
            {
                if self.chebyshev(weights, preferred)? >= self.chebyshev(weights, not_preferred)? {
                    violations += 1;
                }
            }
        }
        Ok(violations)
    }

    /// Candidate weight vector violating the fewest statements, with its count.
    /// Earlier candidates win ties. Returns None for no candidates.
    pub fn most_compatible(&self, candidates: &[Vec<f64>]) -> ElicitResult<Option<(usize, usize)>> {
        let mut best: Option<(usize, usize)> = None;
        for (index, weights) in candidates.iter().enumerate() {
            let count = self.count_violations(weights)?;
            if best.map_or(true, |(_, c)| count < c) {
                best = Some((index, count));
            }
        }
        debug!(candidates = candidates.len(), ?best, "searched for most compatible weights");
        Ok(best)
    }
}

/// Sample weight vectors uniformly from the unit simplex
pub fn sample_weight_vectors<R: Rng + ?Sized>(
    rng: &mut R,
    criteria: usize,
    count: usize,
) -> Vec<Vec<f64>> {
    (0..count)
        .map(|_| {
            let draws: Vec<f64> = (0..criteria).map(|_| rng.sample::<f64, _>(Exp1)).collect();
            let total: f64 = draws.iter().sum();
            draws.into_iter().map(|d| d / total).collect()
        })
        .collect()
}

impl PreferenceModel for PreferenceCone {
    fn name(&self) -> &'static str {
        "PreferenceCone"
    }

    fn evaluate(&self, alternative: &Alternative) -> ElicitResult<f64> {
        let e = normalize_vector(alternative.performance(), self.normalizations.as_deref())?;
        let weights =
            Self::derive_weights(&e).map_err(|err| err.with_subject(alternative.name()))?;
        Ok(self.count_violations(&weights)? as f64)
    }

    fn is_less_preferred(&self) -> bool {
        true
    }

    fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    fn set_weights(&mut self, weights: Option<Vec<f64>>) -> ElicitResult<()> {
        self.weights = weights;
        Ok(())
    }

    fn aux_param(&self) -> f64 {
        0.0
    }

    fn set_aux_param(&mut self, value: f64) -> ElicitResult<()> {
        debug!(value, "PreferenceCone ignores its auxiliary parameter");
        Ok(())
    }

    fn normalizations(&self) -> Option<&[Normalization]> {
        self.normalizations.as_deref()
    }

    fn set_normalizations(&mut self, normalizations: Option<Vec<Normalization>>) {
        self.normalizations = normalizations;
    }

    fn check_params(&self, _params: &ModelParams) -> ElicitResult<()> {
        Ok(())
    }
}
