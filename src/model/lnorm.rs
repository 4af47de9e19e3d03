//! Weighted L-norm scalarizing function
//!
//! Covers the weighted power-mean family: the weighted sum (`alpha = 1`),
//! the weighted Chebyshev function (`alpha = +inf`) and everything in
//! between.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::normalization::{normalize_vector, Normalization};
use super::traits::{ModelParams, PreferenceModel};
use crate::alternative::alternative::Alternative;
use crate::error::{Component, ElicitError, ElicitResult};

/// Weighted L-norm over deviations from an optional reference point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LNormData")]
pub struct LNorm {
    weights: Option<Vec<f64>>,
    #[serde(serialize_with = "compensation::serialize")]
    alpha: f64,
    reference: Option<Vec<f64>>,
    normalizations: Option<Vec<Normalization>>,
}

/// Wire form of [`LNorm`]; goes through the constructor checks on load
#[derive(Deserialize)]
struct LNormData {
    weights: Option<Vec<f64>>,
    #[serde(deserialize_with = "compensation::deserialize")]
    alpha: f64,
    reference: Option<Vec<f64>>,
    normalizations: Option<Vec<Normalization>>,
}

impl TryFrom<LNormData> for LNorm {
    type Error = ElicitError;

    fn try_from(data: LNormData) -> ElicitResult<Self> {
        let mut model = Self::new(data.weights, data.alpha)?;
        model.reference = data.reference;
        model.normalizations = data.normalizations;
        Ok(model)
    }
}

impl LNorm {
    /// Create an L-norm with compensation level `alpha` (>= 1 or +inf).
    /// `None` weights are uniform over the criteria of the evaluated alternative.
    pub fn new(weights: Option<Vec<f64>>, alpha: f64) -> ElicitResult<Self> {
        check_alpha(alpha)?;
        Ok(Self {
            weights,
            alpha,
            reference: None,
            normalizations: None,
        })
    }

    /// Weighted Chebyshev function
    pub fn chebyshev(weights: Option<Vec<f64>>) -> Self {
        Self {
            weights,
            alpha: f64::INFINITY,
            reference: None,
            normalizations: None,
        }
    }

    /// Weighted sum of absolute deviations
    pub fn weighted_sum(weights: Option<Vec<f64>>) -> Self {
        Self {
            weights,
            alpha: 1.0,
            reference: None,
            normalizations: None,
        }
    }

    /// Measure deviations from a reference point (e.g. the ideal point)
    pub fn with_reference(mut self, reference: Vec<f64>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Normalize evaluations before measuring deviations
    pub fn with_normalizations(mut self, normalizations: Vec<Normalization>) -> Self {
        self.normalizations = Some(normalizations);
        self
    }

    /// Compensation level
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Reference point, if any
    pub fn reference(&self) -> Option<&[f64]> {
        self.reference.as_deref()
    }

    fn deviations(&self, alternative: &Alternative) -> ElicitResult<Vec<f64>> {
        let mut d = normalize_vector(alternative.performance(), self.normalizations.as_deref())?;
        if let Some(reference) = &self.reference {
            if reference.len() != d.len() {
                return Err(
                    ElicitError::dimension_mismatch(Component::Model, reference.len(), d.len())
                        .with_handler(self.name())
                        .with_subject(alternative.name()),
                );
            }
            for (v, r) in d.iter_mut().zip(reference.iter()) {
                *v -= r;
            }
        }
        Ok(d)
    }
}

/// Aggregate weighted deviations with compensation `alpha`.
///
/// The `alpha = 1` and `alpha = +inf` cases are computed directly rather
/// than through `powf`.
pub fn aggregate(weights: &[f64], deviations: &[f64], alpha: f64) -> f64 {
    let terms = weights
        .iter()
        .zip(deviations.iter())
        .map(|(w, d)| (w * d).abs());

    if alpha == f64::INFINITY {
        terms.fold(0.0, f64::max)
    } else if alpha == 1.0 {
        terms.sum()
    } else {
        terms.map(|t| t.powf(alpha)).sum::<f64>().powf(1.0 / alpha)
    }
}

/// Uniform weights over `m` criteria
pub fn uniform_weights(m: usize) -> Vec<f64> {
    if m == 0 {
        return Vec::new();
    }
    vec![1.0 / m as f64; m]
}

/// JSON has no infinity; +inf is stored as `null`
mod compensation {
    use super::*;

    pub fn serialize<S: Serializer>(alpha: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        let stored = if alpha.is_infinite() { None } else { Some(*alpha) };
        stored.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

fn check_alpha(alpha: f64) -> ElicitResult<()> {
    if alpha.is_nan() || alpha < 1.0 {
        return Err(ElicitError::configuration(
            Component::Model,
            format!("compensation level must be >= 1 or +inf, got {}", alpha),
        )
        .with_handler("LNorm"));
    }
    Ok(())
}

impl PreferenceModel for LNorm {
    fn name(&self) -> &'static str {
        "LNorm"
    }

    fn evaluate(&self, alternative: &Alternative) -> ElicitResult<f64> {
        let d = self.deviations(alternative)?;
        match &self.weights {
            Some(w) => {
                if w.len() != d.len() {
                    return Err(
                        ElicitError::dimension_mismatch(Component::Model, w.len(), d.len())
                            .with_handler(self.name())
                            .with_subject(alternative.name()),
                    );
                }
                Ok(aggregate(w, &d, self.alpha))
            }
            None => Ok(aggregate(&uniform_weights(d.len()), &d, self.alpha)),
        }
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
        self.alpha
    }

    fn set_aux_param(&mut self, value: f64) -> ElicitResult<()> {
        check_alpha(value)?;
        self.alpha = value;
        Ok(())
    }

    fn normalizations(&self) -> Option<&[Normalization]> {
        self.normalizations.as_deref()
    }

    fn set_normalizations(&mut self, normalizations: Option<Vec<Normalization>>) {
        self.normalizations = normalizations;
    }

    fn check_params(&self, params: &ModelParams) -> ElicitResult<()> {
        check_alpha(params.aux_param)
    }
}
