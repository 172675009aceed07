/// Rating assigned to every item at the start of a session.
pub const DEFAULT_RATING: f64 = 1400.0;

/// Starting uncertainty. Higher means less confident in the rating.
/// Uncertainty only ever decreases from here.
pub const DEFAULT_UNCERTAINTY: f64 = 400.0;

/// Uncertainty floor. An item at this floor is as certain as it gets.
pub const MIN_UNCERTAINTY: f64 = 50.0;

/// K-factor ceiling: the rating swing per comparison when both participants
/// are at maximum uncertainty.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// The adaptive K-factor never drops below this fraction of the ceiling,
/// no matter how certain both participants have become.
pub const MIN_K_FRACTION: f64 = 0.25;

/// Multiplicative uncertainty decay applied to both participants after every
/// comparison, regardless of outcome.
pub const UNCERTAINTY_DECAY: f64 = 0.95;

/// Lower bound on the candidate queue target size.
pub const MIN_QUEUE_TARGET: usize = 6;

/// Queue target scales as this many pairs per item, floored at
/// MIN_QUEUE_TARGET.
pub const QUEUE_TARGET_PER_ITEM: usize = 2;

/// Collections up to this size get full coverage: every item compared at
/// least 3 times, no focus band.
pub const SMALL_COLLECTION_LIMIT: usize = 40;

/// Collections up to this size relax coverage to 2 and restrict candidate
/// generation to the top 20 by rating.
pub const MEDIUM_COLLECTION_LIMIT: usize = 120;

/// Two adjacent items that were never directly compared may still allow the
/// session to stop if their combined uncertainty is at or below this.
pub const ADJACENCY_UNCERTAINTY_CEILING: f64 = 150.0;
