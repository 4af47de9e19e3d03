//! Re-evaluation of a candidate population under a preference model

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::traits::PreferenceModel;
use crate::alternative::alternative::{Alternative, AlternativeSet};
use crate::error::ElicitResult;

/// Score every alternative and store the result in its `aux_score`.
/// Nothing is written if any evaluation fails.
pub fn evaluate_population<M: PreferenceModel + ?Sized>(
    model: &M,
    alternatives: &mut AlternativeSet,
) -> ElicitResult<()> {
    #[cfg(feature = "parallel")]
    let scores: Vec<f64> = alternatives
        .as_slice()
        .par_iter()
        .map(|a| model.evaluate(a))
        .collect::<ElicitResult<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let scores: Vec<f64> = alternatives
        .iter()
        .map(|a| model.evaluate(a))
        .collect::<ElicitResult<_>>()?;

    for (alternative, score) in alternatives.iter_mut().zip(scores) {
        alternative.aux_score = score;
    }
    Ok(())
}

/// The most preferred alternative under the model (first wins ties)
pub fn best_alternative<'a, M: PreferenceModel + ?Sized>(
    model: &M,
    alternatives: &'a AlternativeSet,
) -> ElicitResult<Option<&'a Alternative>> {
    let mut best: Option<(&Alternative, f64)> = None;
    for alternative in alternatives {
        let score = model.evaluate(alternative)?;
        if best.map_or(true, |(_, b)| model.is_better_score(score, b)) {
            best = Some((alternative, score));
        }
    }
    Ok(best.map(|(a, _)| a))
}
