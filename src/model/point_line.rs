//! Distance from an evaluation to a reference direction

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::normalization::{normalize_vector, Normalization};
use super::pbi::{check_direction, Projection};
use super::traits::{ModelParams, PreferenceModel};
use crate::alternative::alternative::Alternative;
use crate::error::{ElicitError, ElicitResult};

/// Scores an alternative by its distance from the line through the origin
/// with direction `w`. Equivalent to PBI with the along-line term dropped;
/// the auxiliary parameter is fixed at 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PointLineData")]
pub struct PointLineProjection {
    weights: Vec<f64>,
    normalizations: Option<Vec<Normalization>>,
}

#[derive(Deserialize)]
struct PointLineData {
    weights: Vec<f64>,
    normalizations: Option<Vec<Normalization>>,
}

impl TryFrom<PointLineData> for PointLineProjection {
    type Error = ElicitError;

    fn try_from(data: PointLineData) -> ElicitResult<Self> {
        let mut model = Self::new(data.weights)?;
        model.normalizations = data.normalizations;
        Ok(model)
    }
}

impl PointLineProjection {
    /// Create a projection scorer for direction `weights`
    pub fn new(weights: Vec<f64>) -> ElicitResult<Self> {
        check_direction(Some(&weights), "PointLineProjection")?;
        Ok(Self {
            weights,
            normalizations: None,
        })
    }

    /// Normalize evaluations before projecting
    pub fn with_normalizations(mut self, normalizations: Vec<Normalization>) -> Self {
        self.normalizations = Some(normalizations);
        self
    }
}

impl PreferenceModel for PointLineProjection {
    fn name(&self) -> &'static str {
        "PointLineProjection"
    }

    fn evaluate(&self, alternative: &Alternative) -> ElicitResult<f64> {
        let e = normalize_vector(alternative.performance(), self.normalizations.as_deref())?;
        let p = Projection::onto(&self.weights, &e)
            .map_err(|err| err.with_handler(self.name()).with_subject(alternative.name()))?;
        Ok(p.across())
    }

    fn is_less_preferred(&self) -> bool {
        true
    }

    fn weights(&self) -> Option<&[f64]> {
        Some(&self.weights)
    }

    fn set_weights(&mut self, weights: Option<Vec<f64>>) -> ElicitResult<()> {
        check_direction(weights.as_deref(), self.name())?;
        if let Some(w) = weights {
            self.weights = w;
        }
        Ok(())
    }

    fn aux_param(&self) -> f64 {
        0.0
    }

    fn set_aux_param(&mut self, value: f64) -> ElicitResult<()> {
        debug!(value, "PointLineProjection ignores its auxiliary parameter");
        Ok(())
    }

    fn normalizations(&self) -> Option<&[Normalization]> {
        self.normalizations.as_deref()
    }

    fn set_normalizations(&mut self, normalizations: Option<Vec<Normalization>>) {
        self.normalizations = normalizations;
    }

    fn check_params(&self, params: &ModelParams) -> ElicitResult<()> {
        check_direction(params.weights.as_deref(), self.name())
    }
}
