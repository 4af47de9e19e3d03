//! Preference models
//!
//! Scalarizing functions (`LNorm`, `Pbi`, `PointLineProjection`) and the
//! judgment-counting `PreferenceCone`, all behind the [`PreferenceModel`]
//! trait and the [`Model`] enum.
//!
//! [`PreferenceModel`]: traits::PreferenceModel
//! [`Model`]: variant::Model

pub mod cone;
pub mod lnorm;
pub mod normalization;
pub mod pbi;
pub mod point_line;
pub mod population;
pub mod traits;
pub mod variant;

pub mod prelude {
    pub use super::cone::{sample_weight_vectors, PreferenceCone};
    pub use super::lnorm::LNorm;
    pub use super::normalization::Normalization;
    pub use super::pbi::{Pbi, Projection};
    pub use super::point_line::PointLineProjection;
    pub use super::population::{best_alternative, evaluate_population};
    pub use super::traits::{ModelParams, PreferenceModel};
    pub use super::variant::Model;
}
