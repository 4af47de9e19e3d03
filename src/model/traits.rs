//! Preference model traits
//!
//! A preference model scores an alternative. Scalarizing functions measure
//! a weighted distance, the preference cone counts violated judgments; in
//! every case the model also states whether low or high scores are better.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::normalization::Normalization;
use crate::alternative::alternative::Alternative;
use crate::error::ElicitResult;

/// Weight vector and auxiliary parameter of a model, set together
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Weight vector (None = model default)
    pub weights: Option<Vec<f64>>,
    /// Auxiliary scalar (compensation level for LNorm, theta for PBI)
    pub aux_param: f64,
}

/// Trait for preference models
///
/// Evaluation is deterministic and side-effect free given the current
/// parameters. Setters mutate the model in place; the next `evaluate` call
/// reflects them.
pub trait PreferenceModel: Send + Sync {
    /// Short model name for diagnostics
    fn name(&self) -> &'static str;

    /// Score an alternative
    fn evaluate(&self, alternative: &Alternative) -> ElicitResult<f64>;

    /// Whether lower scores denote greater preference
    fn is_less_preferred(&self) -> bool;

    /// Current weight vector
    fn weights(&self) -> Option<&[f64]>;

    /// Replace the weight vector
    fn set_weights(&mut self, weights: Option<Vec<f64>>) -> ElicitResult<()>;

    /// Current auxiliary parameter
    fn aux_param(&self) -> f64;

    /// Replace the auxiliary parameter
    fn set_aux_param(&mut self, value: f64) -> ElicitResult<()>;

    /// Current per-criterion normalizations
    fn normalizations(&self) -> Option<&[Normalization]>;

    /// Replace the per-criterion normalizations
    fn set_normalizations(&mut self, normalizations: Option<Vec<Normalization>>);

    /// Check parameters without applying them
    fn check_params(&self, params: &ModelParams) -> ElicitResult<()>;

    /// Weights and auxiliary parameter together
    fn params(&self) -> ModelParams {
        ModelParams {
            weights: self.weights().map(<[f64]>::to_vec),
            aux_param: self.aux_param(),
        }
    }

    /// Replace weights and auxiliary parameter together; nothing changes on error
    fn set_params(&mut self, params: ModelParams) -> ElicitResult<()> {
        self.check_params(&params)?;
        self.set_weights(params.weights)?;
        self.set_aux_param(params.aux_param)
    }

    /// Whether score `a` is strictly better than score `b` under this model
    fn is_better_score(&self, a: f64, b: f64) -> bool {
        if self.is_less_preferred() {
            a < b
        } else {
            a > b
        }
    }

    /// Compare two alternatives; `Ordering::Less` means `a` is preferred
    fn compare(&self, a: &Alternative, b: &Alternative) -> ElicitResult<Ordering> {
        let sa = self.evaluate(a)?;
        let sb = self.evaluate(b)?;
        Ok(if self.is_better_score(sa, sb) {
            Ordering::Less
        } else if self.is_better_score(sb, sa) {
            Ordering::Greater
        } else {
            Ordering::Equal
        })
    }
}

impl<M: PreferenceModel + ?Sized> PreferenceModel for Box<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn evaluate(&self, alternative: &Alternative) -> ElicitResult<f64> {
        (**self).evaluate(alternative)
    }

    fn is_less_preferred(&self) -> bool {
        (**self).is_less_preferred()
    }

    fn weights(&self) -> Option<&[f64]> {
        (**self).weights()
    }

    fn set_weights(&mut self, weights: Option<Vec<f64>>) -> ElicitResult<()> {
        (**self).set_weights(weights)
    }

    fn aux_param(&self) -> f64 {
        (**self).aux_param()
    }

    fn set_aux_param(&mut self, value: f64) -> ElicitResult<()> {
        (**self).set_aux_param(value)
    }

    fn normalizations(&self) -> Option<&[Normalization]> {
        (**self).normalizations()
    }

    fn set_normalizations(&mut self, normalizations: Option<Vec<Normalization>>) {
        (**self).set_normalizations(normalizations)
    }

    fn check_params(&self, params: &ModelParams) -> ElicitResult<()> {
        (**self).check_params(params)
    }
}
