//! Closed set of preference model variants

use serde::{Deserialize, Serialize};

use super::cone::PreferenceCone;
use super::lnorm::LNorm;
use super::normalization::Normalization;
use super::pbi::Pbi;
use super::point_line::PointLineProjection;
use super::traits::{ModelParams, PreferenceModel};
use crate::alternative::alternative::Alternative;
use crate::error::ElicitResult;

/// Any of the supported preference models
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum Model {
    /// Weighted L-norm
    LNorm(LNorm),
    /// Penalty-based boundary intersection
    Pbi(Pbi),
    /// Distance from a reference direction
    PointLineProjection(PointLineProjection),
    /// Incompatible-judgment count
    PreferenceCone(PreferenceCone),
}

macro_rules! delegate {
    ($self:ident, $m:ident => $body:expr) => {
        match $self {
            Model::LNorm($m) => $body,
            Model::Pbi($m) => $body,
            Model::PointLineProjection($m) => $body,
            Model::PreferenceCone($m) => $body,
        }
    };
}

impl PreferenceModel for Model {
    fn name(&self) -> &'static str {
        delegate!(self, m => m.name())
    }

    fn evaluate(&self, alternative: &Alternative) -> ElicitResult<f64> {
        delegate!(self, m => m.evaluate(alternative))
    }

    fn is_less_preferred(&self) -> bool {
        delegate!(self, m => m.is_less_preferred())
    }

    fn weights(&self) -> Option<&[f64]> {
        delegate!(self, m => m.weights())
    }

    fn set_weights(&mut self, weights: Option<Vec<f64>>) -> ElicitResult<()> {
        delegate!(self, m => m.set_weights(weights))
    }

    fn aux_param(&self) -> f64 {
        delegate!(self, m => m.aux_param())
    }

    fn set_aux_param(&mut self, value: f64) -> ElicitResult<()> {
        delegate!(self, m => m.set_aux_param(value))
    }

    fn normalizations(&self) -> Option<&[Normalization]> {
        delegate!(self, m => m.normalizations())
    }

    fn set_normalizations(&mut self, normalizations: Option<Vec<Normalization>>) {
        delegate!(self, m => m.set_normalizations(normalizations))
    }

    fn check_params(&self, params: &ModelParams) -> ElicitResult<()> {
        delegate!(self, m => m.check_params(params))
    }
}

impl From<LNorm> for Model {
    fn from(m: LNorm) -> Self {
        Self::LNorm(m)
    }
}

impl From<Pbi> for Model {
    fn from(m: Pbi) -> Self {
        Self::Pbi(m)
    }
}

impl From<PointLineProjection> for Model {
    fn from(m: PointLineProjection) -> Self {
        Self::PointLineProjection(m)
    }
}

impl From<PreferenceCone> for Model {
    fn from(m: PreferenceCone) -> Self {
        Self::PreferenceCone(m)
    }
}
