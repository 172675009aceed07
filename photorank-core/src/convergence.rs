/// Stop decision: have we compared enough to trust the ranking?
///
/// Three conditions, all over the focus band when one is set:
/// coverage (every item compared at least the minimum), mean confidence
/// above the threshold, and adjacency (near-tied neighbours either met
/// directly or are both near-certain). The mean — not the median — is used
/// consistently here and in the remaining-comparisons estimate.
use std::collections::HashSet;

use crate::constants::{
    ADJACENCY_UNCERTAINTY_CEILING, DEFAULT_UNCERTAINTY, MIN_UNCERTAINTY, UNCERTAINTY_DECAY,
};
use crate::rating::confidence;
use crate::store::RatingStore;
use crate::types::{pair_key, Item, PairKey, SessionParams};

/// The items the stop decision considers: the focus band (top-rated) when
/// one applies, the whole collection otherwise.
fn considered_items<'a>(store: &'a RatingStore, params: &SessionParams) -> Vec<&'a Item> {
    match params.focus_band {
        Some(k) if store.len() > k => store
            .ids_by_rating_desc()
            .into_iter()
            .take(k)
            .map(|id| store.get(id).expect("band id resolves"))
            .collect(),
        _ => store.items().iter().collect(),
    }
}

/// True when ranking confidence is sufficient to stop asking for
/// comparisons. Invoked after every decision.
pub fn can_stop(store: &RatingStore, completed: &HashSet<PairKey>, params: &SessionParams) -> bool {
    let considered = considered_items(store, params);
    if considered.is_empty() {
        return true;
    }

    // Coverage: no considered item below the per-item minimum.
    if considered.iter().any(|it| it.comparisons < params.min_comparisons) {
        return false;
    }

    // Confidence: mean over the considered items.
    let mean = mean_confidence(&considered);
    if mean < params.min_confidence {
        return false;
    }

    // Adjacency: near-tied neighbours in the current order must have been
    // compared head-to-head, unless both are already near-certain.
    let mut sorted = considered;
    sorted.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });
    for window in sorted.windows(2) {
        let (upper, lower) = (window[0], window[1]);
        if upper.rating - lower.rating < params.adjacent_margin
            && !completed.contains(&pair_key(upper.id, lower.id))
            && upper.uncertainty + lower.uncertainty > ADJACENCY_UNCERTAINTY_CEILING
        {
            return false;
        }
    }

    true
}

fn mean_confidence(items: &[&Item]) -> f64 {
    items.iter().map(|it| confidence(it.uncertainty)).sum::<f64>() / items.len() as f64
}

/// Advisory estimate of how many more comparisons the session needs.
///
/// Each decision decays two uncertainties by UNCERTAINTY_DECAY, so the mean
/// uncertainty of the considered set shrinks geometrically; we solve for
/// the number of decays to reach the confidence target, spread over two
/// items per comparison, and also honour any outstanding coverage deficit.
/// Approximate by design — callers should treat it as a progress hint.
pub fn estimate_remaining_comparisons(store: &RatingStore, params: &SessionParams) -> usize {
    let considered = considered_items(store, params);
    if considered.is_empty() {
        return 0;
    }

    let coverage_deficit: usize = considered
        .iter()
        .map(|it| params.min_comparisons.saturating_sub(it.comparisons))
        .sum();
    // Two items make progress per comparison.
    let coverage_estimate = (coverage_deficit + 1) / 2;

    let mean_uncertainty =
        considered.iter().map(|it| it.uncertainty).sum::<f64>() / considered.len() as f64;
    let target_uncertainty = MIN_UNCERTAINTY
        + (1.0 - params.min_confidence / 100.0) * (DEFAULT_UNCERTAINTY - MIN_UNCERTAINTY);

    let confidence_estimate = if mean_uncertainty <= target_uncertainty {
        0
    } else {
        let decays = (target_uncertainty / mean_uncertainty).ln() / UNCERTAINTY_DECAY.ln();
        ((decays.ceil() as usize) * considered.len() + 1) / 2
    };

    coverage_estimate.max(confidence_estimate)
}
