/// photorank-core: adaptive pairwise-comparison ranking engine.
///
/// Rank a collection by repeatedly choosing the preferred item from
/// presented pairs — without comparing every possible pair. Each item
/// carries an Elo-style rating plus an uncertainty estimate; the engine
/// picks the most informative pair to ask next, updates ratings with an
/// uncertainty-adaptive step size, and stops once ranking confidence is
/// sufficient.
///
/// Pure computation: no IO, no rendering, no storage. Items are identified
/// by caller-provided `i64` IDs; the caller presents pairs and reports
/// decisions.
///
/// # Quick start
///
/// ```rust
/// use photorank_core::RankingSession;
///
/// let mut session = RankingSession::new(&[100, 200, 300]);
///
/// while !session.check_convergence() {
///     let Some((left, right)) = session.offer_next_pair() else { break };
///     // Ask the user... here the lower ID always wins.
///     session.record_decision(left.min(right));
/// }
///
/// for item in session.finalize() {
///     println!("#{} item {} (rating {}, {:.0}% confident)",
///         item.rank, item.id, item.rating, item.confidence);
/// }
/// ```

pub mod constants;
pub mod convergence;
pub mod pairing;
pub mod ranking;
pub mod rating;
pub mod session;
pub mod store;
pub mod types;

// Re-export the primary public API at the crate root.
pub use convergence::{can_stop, estimate_remaining_comparisons};
pub use pairing::{generate_candidates, information_gain, select_most_informative};
pub use ranking::finalize;
pub use rating::{adaptive_k_factor, confidence, expected_score, update_ratings, RatingUpdate};
pub use session::RankingSession;
pub use store::RatingStore;
pub use types::{
    pair_key, ComparisonRecord, Item, Pair, PairKey, RankedItem, RemovalOutcome, SessionParams,
};
