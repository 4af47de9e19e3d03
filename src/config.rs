//! Configuration
//!
//! Serde-loadable settings for the refiner and the pairwise comparison form.
//! Every field has a default, so partial JSON documents are accepted.

use serde::{Deserialize, Serialize};

use crate::error::{Component, ElicitError, ElicitResult, ErrorKind};

/// Top-level elicitation settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElicitationConfig {
    /// Name given to newly created histories
    pub history_name: String,
    /// Refiner settings
    pub refiner: RefinerConfig,
    /// Pairwise comparison settings
    pub pairwise: PairwiseConfig,
}

impl Default for ElicitationConfig {
    fn default() -> Self {
        Self {
            history_name: "history".to_string(),
            refiner: RefinerConfig::default(),
            pairwise: PairwiseConfig::default(),
        }
    }
}

/// Refiner settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinerConfig {
    /// Drop alternatives with identical performance
    pub remove_duplicates: bool,
    /// Drop Pareto-dominated alternatives
    pub remove_dominated: bool,
    /// Stop after this many completed elicitations
    pub max_interactions: Option<usize>,
    /// Minimum iterations between elicitations
    pub required_iteration_gap: Option<usize>,
    /// Minimum superset size worth eliciting on
    pub min_alternatives: Option<usize>,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            remove_duplicates: true,
            remove_dominated: true,
            max_interactions: None,
            required_iteration_gap: None,
            min_alternatives: None,
        }
    }
}

/// Pairwise comparison settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairwiseConfig {
    /// Size of the reference sets that are compared
    pub set_size: usize,
    /// Score difference below which a pair is indifferent (None = never)
    pub indifference_threshold: Option<f64>,
}

impl Default for PairwiseConfig {
    fn default() -> Self {
        Self {
            set_size: 2,
            indifference_threshold: None,
        }
    }
}

impl ElicitationConfig {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> ElicitResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            ElicitError::new(Component::Config, ErrorKind::Serialization(e.to_string()))
        })
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> ElicitResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ElicitError::new(Component::Config, ErrorKind::Serialization(e.to_string()))
        })
    }

    /// Load from a JSON file
    #[cfg(feature = "checkpoint")]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> ElicitResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ElicitError::new(Component::Config, ErrorKind::Io(e.to_string())))?;
        Self::from_json(&json)
    }
}
