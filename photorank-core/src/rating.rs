/// Elo-style rating updates with an uncertainty-adaptive step size.
///
/// The expected-score formula is the classic Elo logistic. The K-factor
/// scales with the combined uncertainty of the two participants: unknown
/// items swing hard, well-measured items move conservatively.
use crate::constants::{
    DEFAULT_K_FACTOR, DEFAULT_UNCERTAINTY, MIN_K_FRACTION, MIN_UNCERTAINTY, UNCERTAINTY_DECAY,
};
use crate::types::Item;

/// Probability that the item rated `rating_a` beats the item rated
/// `rating_b`. Equal ratings yield exactly 0.5.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / 400.0))
}

/// Effective K-factor for a comparison between two items.
///
/// Scales linearly with combined uncertainty: the ceiling DEFAULT_K_FACTOR
/// when both participants are at maximum uncertainty, clamped at
/// MIN_K_FRACTION of the ceiling as both approach the floor.
pub fn adaptive_k_factor(uncertainty_a: f64, uncertainty_b: f64) -> f64 {
    let scale = (uncertainty_a + uncertainty_b) / (2.0 * DEFAULT_UNCERTAINTY);
    DEFAULT_K_FACTOR * scale.clamp(MIN_K_FRACTION, 1.0)
}

/// New ratings and uncertainties produced by one decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingUpdate {
    pub winner_rating: f64,
    pub loser_rating: f64,
    pub winner_uncertainty: f64,
    pub loser_uncertainty: f64,
}

/// Compute the post-decision state for a winner/loser pair.
///
/// Ratings are rounded to integer precision for display stability.
/// Uncertainty decays for both participants regardless of outcome — being
/// compared at all makes an item's rating more trustworthy.
pub fn update_ratings(winner: &Item, loser: &Item) -> RatingUpdate {
    let k = adaptive_k_factor(winner.uncertainty, loser.uncertainty);
    let expected_winner = expected_score(winner.rating, loser.rating);
    let expected_loser = expected_score(loser.rating, winner.rating);

    RatingUpdate {
        winner_rating: (winner.rating + k * (1.0 - expected_winner)).round(),
        loser_rating: (loser.rating + k * (0.0 - expected_loser)).round(),
        winner_uncertainty: decay_uncertainty(winner.uncertainty),
        loser_uncertainty: decay_uncertainty(loser.uncertainty),
    }
}

pub(crate) fn decay_uncertainty(uncertainty: f64) -> f64 {
    (uncertainty * UNCERTAINTY_DECAY).max(MIN_UNCERTAINTY)
}

/// Map uncertainty onto a 0-100 confidence percentage:
/// MIN_UNCERTAINTY → 100, DEFAULT_UNCERTAINTY → 0, linear in between.
pub fn confidence(uncertainty: f64) -> f64 {
    let u = uncertainty.clamp(MIN_UNCERTAINTY, DEFAULT_UNCERTAINTY);
    100.0 - (u - MIN_UNCERTAINTY) / (DEFAULT_UNCERTAINTY - MIN_UNCERTAINTY) * 100.0
}
