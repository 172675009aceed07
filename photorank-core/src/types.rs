use crate::constants::{
    DEFAULT_RATING, DEFAULT_UNCERTAINTY, MEDIUM_COLLECTION_LIMIT, SMALL_COLLECTION_LIMIT,
};

/// One item being ranked.
///
/// `rating` and `uncertainty` are only ever mutated through
/// `RatingStore::apply_update`, which updates winner and loser together.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    /// Caller-provided stable ID.
    pub id: i64,
    /// Elo-style skill estimate, rounded to integer precision after updates.
    pub rating: f64,
    /// How unreliable the rating is. Starts at DEFAULT_UNCERTAINTY, decays
    /// toward MIN_UNCERTAINTY, never increases.
    pub uncertainty: f64,
    /// Number of decisions this item has participated in, win or lose.
    pub comparisons: usize,
}

impl Item {
    pub fn new(id: i64) -> Self {
        Item {
            id,
            rating: DEFAULT_RATING,
            uncertainty: DEFAULT_UNCERTAINTY,
            comparisons: 0,
        }
    }
}

/// Two item IDs in presentation order.
pub type Pair = (i64, i64);

/// Canonical order-independent key for an unordered pair.
pub type PairKey = (i64, i64);

/// Canonicalize a pair so that (A, B) and (B, A) produce the same key.
pub fn pair_key(a: i64, b: i64) -> PairKey {
    if a <= b { (a, b) } else { (b, a) }
}

/// One recorded decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonRecord {
    pub key: PairKey,
    pub winner: i64,
}

/// An item annotated with its final rank.
///
/// Items with exactly equal ratings share a rank; the next distinct rating
/// resumes at its positional index (standard competition ranking).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedItem {
    pub id: i64,
    pub rank: usize,
    pub rating: f64,
    /// Display-friendly 0-100 transform of uncertainty.
    pub confidence: f64,
    pub comparisons: usize,
}

/// Session parameters scaled to the collection size.
///
/// Larger collections relax per-item coverage and concentrate comparison
/// effort on a band of top-rated items instead of spreading it evenly
/// across a long tail.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionParams {
    /// Minimum decisions each considered item must participate in.
    pub min_comparisons: usize,
    /// Mean confidence (0-100) the considered items must reach.
    pub min_confidence: f64,
    /// Adjacent items closer than this in rating must have met directly
    /// (or both be near-certain) before the session may stop.
    pub adjacent_margin: f64,
    /// Restrict candidate generation and the stop decision to the top N
    /// items by rating. `None` means consider everything.
    pub focus_band: Option<usize>,
}

impl SessionParams {
    /// Pick parameters for a collection of `num_items`.
    ///
    /// The coverage minimum is capped at `max(1, num_items - 1)` so a tiny
    /// collection is never asked for more comparisons than exist.
    pub fn for_collection(num_items: usize) -> Self {
        let (min_comparisons, min_confidence, adjacent_margin, focus_band) =
            if num_items <= SMALL_COLLECTION_LIMIT {
                (3, 75.0, 30.0, None)
            } else if num_items <= MEDIUM_COLLECTION_LIMIT {
                (2, 72.0, 25.0, Some(20))
            } else {
                (1, 68.0, 20.0, Some(30))
            };

        SessionParams {
            min_comparisons: min_comparisons.min(num_items.saturating_sub(1)).max(1),
            min_confidence,
            adjacent_margin,
            focus_band,
        }
    }
}

/// Outcome of removing an item mid-session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RemovalOutcome {
    /// The session can continue. `next_pair` is the pair now on offer —
    /// unchanged if the removal did not touch it, a replacement if it did,
    /// or `None` if the candidate pool is exhausted and the caller should
    /// finalize.
    Removed { next_pair: Option<Pair> },
    /// Fewer than two items remain; ranking cannot continue.
    TooFewItems,
}
