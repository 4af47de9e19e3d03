//! Penalty-based boundary intersection
//!
//! The normalized evaluation is projected orthogonally onto the line through
//! the origin with direction `w`. The score adds the distance travelled along
//! the line and `theta` times the distance from the line.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use super::normalization::{normalize_vector, Normalization};
use super::traits::{ModelParams, PreferenceModel};
use crate::alternative::alternative::Alternative;
use crate::error::{Component, ElicitError, ElicitResult};

/// Orthogonal projection of a point onto a direction line through the origin
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    /// The projected point
    pub point: DVector<f64>,
    /// The projection of `point` onto the line
    pub projection: DVector<f64>,
}

impl Projection {
    /// Project `point` onto the line spanned by `direction`
    pub fn onto(direction: &[f64], point: &[f64]) -> ElicitResult<Self> {
        if direction.len() != point.len() {
            return Err(ElicitError::dimension_mismatch(
                Component::Model,
                direction.len(),
                point.len(),
            ));
        }
        let w = DVector::from_column_slice(direction);
        let e = DVector::from_column_slice(point);
        let norm_sq = w.norm_squared();
        if norm_sq == 0.0 {
            return Err(ElicitError::evaluation(
                Component::Model,
                "projection direction is the zero vector",
            ));
        }
        let projection = &w * (e.dot(&w) / norm_sq);
        Ok(Self {
            point: e,
            projection,
        })
    }

    /// Distance from the origin to the projection
    pub fn along(&self) -> f64 {
        self.projection.norm()
    }

    /// Distance from the projection to the point
    pub fn across(&self) -> f64 {
        (&self.point - &self.projection).norm()
    }
}

pub(crate) fn check_direction(weights: Option<&[f64]>, handler: &'static str) -> ElicitResult<()> {
    match weights {
        None => Err(ElicitError::configuration(Component::Model, "weights are required")
            .with_handler(handler)),
        Some(w) if w.iter().all(|&x| x == 0.0) => Err(ElicitError::configuration(
            Component::Model,
            "weights must not be the zero vector",
        )
        .with_handler(handler)),
        Some(_) => Ok(()),
    }
}

/// Penalty-based boundary intersection scalarizer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PbiData")]
pub struct Pbi {
    weights: Vec<f64>,
    theta: f64,
    normalizations: Option<Vec<Normalization>>,
}

#[derive(Deserialize)]
struct PbiData {
    weights: Vec<f64>,
    theta: f64,
    normalizations: Option<Vec<Normalization>>,
}

impl TryFrom<PbiData> for Pbi {
    type Error = ElicitError;

    fn try_from(data: PbiData) -> ElicitResult<Self> {
        let mut pbi = Self::new(data.weights, data.theta)?;
        pbi.normalizations = data.normalizations;
        Ok(pbi)
    }
}

impl Pbi {
    /// Create a PBI function with direction `weights` and penalty `theta`
    pub fn new(weights: Vec<f64>, theta: f64) -> ElicitResult<Self> {
        check_direction(Some(&weights), "PBI")?;
        check_theta(theta)?;
        Ok(Self {
            weights,
            theta,
            normalizations: None,
        })
    }

    /// Normalize evaluations before projecting
    pub fn with_normalizations(mut self, normalizations: Vec<Normalization>) -> Self {
        self.normalizations = Some(normalizations);
        self
    }

    /// Penalty parameter
    pub fn theta(&self) -> f64 {
        self.theta
    }
}

fn check_theta(theta: f64) -> ElicitResult<()> {
    if theta.is_nan() || theta < 0.0 {
        return Err(ElicitError::configuration(
            Component::Model,
            format!("theta must be non-negative, got {}", theta),
        )
        .with_handler("PBI"));
    }
    Ok(())
}

impl PreferenceModel for Pbi {
    fn name(&self) -> &'static str {
        "PBI"
    }

    fn evaluate(&self, alternative: &Alternative) -> ElicitResult<f64> {
        let e = normalize_vector(alternative.performance(), self.normalizations.as_deref())?;
        let p = Projection::onto(&self.weights, &e)
            .map_err(|err| err.with_handler(self.name()).with_subject(alternative.name()))?;
        Ok(p.along() + self.theta * p.across())
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
        self.theta
    }

    fn set_aux_param(&mut self, value: f64) -> ElicitResult<()> {
        check_theta(value)?;
        self.theta = value;
        Ok(())
    }

    fn normalizations(&self) -> Option<&[Normalization]> {
        self.normalizations.as_deref()
    }

    fn set_normalizations(&mut self, normalizations: Option<Vec<Normalization>>) {
        self.normalizations = normalizations;
    }

    fn check_params(&self, params: &ModelParams) -> ElicitResult<()> {
        check_direction(params.weights.as_deref(), self.name())?;
        check_theta(params.aux_param)
    }
}
