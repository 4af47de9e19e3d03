//! Per-criterion normalization

use serde::{Deserialize, Serialize};

use crate::alternative::alternative::AlternativeSet;
use crate::error::{Component, ElicitError, ElicitResult};

/// Linear rescaling of one criterion from `[min, max]` to `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    /// Value mapped to 0
    pub min: f64,
    /// Value mapped to 1
    pub max: f64,
}

impl Normalization {
    /// Create a new normalization
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Identity normalization
    pub fn identity() -> Self {
        Self::new(0.0, 1.0)
    }

    /// Range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Normalize a value. A degenerate range only shifts the value.
    pub fn normalize(&self, value: f64) -> f64 {
        let range = self.range();
        if range > 0.0 {
            (value - self.min) / range
        } else {
            value - self.min
        }
    }

    /// Per-criterion normalizations spanning the observed values of a set
    pub fn fit(alternatives: &AlternativeSet) -> Option<Vec<Self>> {
        let m = alternatives.criteria_count()?;
        let mut norms = vec![Self::new(f64::INFINITY, f64::NEG_INFINITY); m];
        for alternative in alternatives {
            for (norm, &value) in norms.iter_mut().zip(alternative.performance()) {
                norm.min = norm.min.min(value);
                norm.max = norm.max.max(value);
            }
        }
        Some(norms)
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self::identity()
    }
}

/// Apply optional normalizations to a performance vector
pub fn normalize_vector(
    performance: &[f64],
    normalizations: Option<&[Normalization]>,
) -> ElicitResult<Vec<f64>> {
    match normalizations {
        None => Ok(performance.to_vec()),
        Some(norms) => {
            if norms.len() != performance.len() {
                return Err(ElicitError::dimension_mismatch(
                    Component::Model,
                    norms.len(),
                    performance.len(),
                ));
            }
            Ok(performance
                .iter()
                .zip(norms.iter())
                .map(|(&v, n)| n.normalize(v))
                .collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alternative::alternative::Alternative;

    #[test]
    fn test_normalize() {
        let n = Normalization::new(2.0, 6.0);
        assert!((n.normalize(2.0) - 0.0).abs() < 1e-12);
        assert!((n.normalize(4.0) - 0.5).abs() < 1e-12);
        assert!((n.normalize(6.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_range_shifts() {
        let n = Normalization::new(3.0, 3.0);
        assert_eq!(n.normalize(3.0), 0.0);
        assert_eq!(n.normalize(5.0), 2.0);
    }

    #[test]
    fn test_normalize_vector_checks_length() {
        let norms = vec![Normalization::identity(); 3];
        assert!(normalize_vector(&[1.0, 2.0], Some(&norms)).is_err());
        assert_eq!(normalize_vector(&[1.0, 2.0], None).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_fit() {
        let set = AlternativeSet::from_alternatives(vec![
            Alternative::new("a", vec![1.0, 10.0]),
            Alternative::new("b", vec![3.0, 5.0]),
        ])
        .unwrap();
        let norms = Normalization::fit(&set).unwrap();
        assert_eq!(norms[0], Normalization::new(1.0, 3.0));
        assert_eq!(norms[1], Normalization::new(5.0, 10.0));
        assert!(Normalization::fit(&AlternativeSet::new()).is_none());
    }
}
