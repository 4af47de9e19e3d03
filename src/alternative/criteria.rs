//! Criteria and Pareto dominance

use serde::{Deserialize, Serialize};

use super::alternative::Alternative;

/// A single evaluation criterion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    /// Criterion name
    pub name: String,
    /// Gain-type criteria are maximized, cost-type criteria minimized
    pub gain: bool,
}

impl Criterion {
    /// Cost-type criterion (less is better)
    pub fn cost(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gain: false,
        }
    }

    /// Gain-type criterion (more is better)
    pub fn gain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gain: true,
        }
    }
}

/// The ordered set of criteria alternatives are evaluated on
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    criteria: Vec<Criterion>,
}

impl Criteria {
    /// Create from explicit criteria
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    /// `count` cost-type criteria named `c0`, `c1`, ...
    pub fn all_cost(count: usize) -> Self {
        Self::new((0..count).map(|i| Criterion::cost(format!("c{}", i))).collect())
    }

    /// `count` gain-type criteria named `c0`, `c1`, ...
    pub fn all_gain(count: usize) -> Self {
        Self::new((0..count).map(|i| Criterion::gain(format!("c{}", i))).collect())
    }

    /// Number of criteria
    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    /// Whether there are no criteria
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    /// Iterate over the criteria
    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.criteria.iter()
    }

    /// Whether `a` Pareto-dominates `b`: at least as good on every criterion
    /// and strictly better on at least one. Alternatives whose dimension
    /// differs from the criteria count never dominate.
    pub fn dominates(&self, a: &Alternative, b: &Alternative) -> bool {
        let n = self.criteria.len();
        if a.criteria_count() != n || b.criteria_count() != n {
            return false;
        }

        let mut strictly_better = false;
        for ((criterion, &x), &y) in self
            .criteria
            .iter()
            .zip(a.performance().iter())
            .zip(b.performance().iter())
        {
            let (better, worse) = if criterion.gain {
                (x > y, x < y)
            } else {
                (x < y, x > y)
            };
            if worse {
                return false;
            }
            strictly_better |= better;
        }
        strictly_better
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_dominance() {
        let criteria = Criteria::all_cost(2);
        let a = Alternative::new("a", vec![1.0, 2.0]);
        let b = Alternative::new("b", vec![2.0, 3.0]);
        let c = Alternative::new("c", vec![1.5, 1.5]);

        assert!(criteria.dominates(&a, &b));
        assert!(!criteria.dominates(&b, &a));
        assert!(!criteria.dominates(&a, &c));
        assert!(!criteria.dominates(&c, &a));
    }

    #[test]
    fn test_gain_dominance() {
        let criteria = Criteria::new(vec![Criterion::gain("profit"), Criterion::cost("risk")]);
        let a = Alternative::new("a", vec![10.0, 1.0]);
        let b = Alternative::new("b", vec![5.0, 1.0]);

        assert!(criteria.dominates(&a, &b));
        assert!(!criteria.dominates(&b, &a));
    }

    #[test]
    fn test_equal_vectors_do_not_dominate() {
        let criteria = Criteria::all_cost(2);
        let a = Alternative::new("a", vec![1.0, 1.0]);
        let b = Alternative::new("b", vec![1.0, 1.0]);
        assert!(!criteria.dominates(&a, &b));
    }

    #[test]
    fn test_dimension_mismatch_never_dominates() {
        let criteria = Criteria::all_cost(3);
        let a = Alternative::new("a", vec![0.0, 0.0]);
        let b = Alternative::new("b", vec![1.0, 1.0]);
        assert!(!criteria.dominates(&a, &b));
    }
}
