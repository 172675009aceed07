/// Candidate pair generation and information-gain selection.
///
/// The generator builds a pool of not-yet-asked pairs; the selector picks
/// the single pair whose comparison is expected to teach us the most.
/// Generation is randomized so sessions do not replay identical orderings;
/// selection is a pure, deterministic function of the candidate list.
use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::constants::{DEFAULT_UNCERTAINTY, MIN_QUEUE_TARGET, QUEUE_TARGET_PER_ITEM};
use crate::store::RatingStore;
use crate::types::{pair_key, Item, Pair, PairKey, SessionParams};

const RATING_WEIGHT: f64 = 0.4;
const UNCERTAINTY_WEIGHT: f64 = 0.4;
const NOVELTY_WEIGHT: f64 = 0.2;

/// How informative a comparison between these two items would be.
///
/// Weighted sum of three signals, each normalized to [0, 1]:
/// close ratings (uncertain outcome), high combined uncertainty
/// (unreliable priors), and low comparison counts (novel matchup).
pub fn information_gain(a: &Item, b: &Item) -> f64 {
    let proximity = (1.0 - (a.rating - b.rating).abs() / 400.0).max(0.0);
    let combined_uncertainty = (a.uncertainty + b.uncertainty) / (2.0 * DEFAULT_UNCERTAINTY);
    let novelty = 1.0 / ((a.comparisons + b.comparisons) as f64 + 1.0);

    RATING_WEIGHT * proximity + UNCERTAINTY_WEIGHT * combined_uncertainty + NOVELTY_WEIGHT * novelty
}

/// Pick the highest-gain pair from the candidate list.
///
/// Ties keep the first-seen candidate, so the result is deterministic for a
/// given list. Pairs referencing IDs no longer in the store are skipped.
/// Returns `None` for an empty (or fully stale) candidate list.
pub fn select_most_informative(store: &RatingStore, candidates: &[Pair]) -> Option<Pair> {
    let mut best: Option<(Pair, f64)> = None;
    for &(a, b) in candidates {
        let (Some(item_a), Some(item_b)) = (store.get(a), store.get(b)) else {
            continue;
        };
        let gain = information_gain(item_a, item_b);
        if best.map_or(true, |(_, highest)| gain > highest) {
            best = Some(((a, b), gain));
        }
    }
    best.map(|(pair, _)| pair)
}

/// Generate fresh candidate pairs to top the queue up to its target size.
///
/// Never duplicates a pair already completed or already queued. Three
/// passes, in priority order:
///
/// 1. Coverage: items below the per-item comparison minimum get pairs
///    first, preferring partners inside the focus band but falling back to
///    the whole collection.
/// 2. Focus band: pairs drawn from the top-rated band (the entire
///    collection when no band applies).
/// 3. Unrestricted fallback: only when a restricted band could not fill
///    the target.
///
/// Returns whatever it found — possibly empty once the pool is exhausted.
pub fn generate_candidates(
    store: &RatingStore,
    completed: &HashSet<PairKey>,
    existing_queue: &[Pair],
    params: &SessionParams,
    rng: &mut impl Rng,
) -> Vec<Pair> {
    let num_items = store.len();
    if num_items < 2 {
        return Vec::new();
    }

    let target = (num_items * QUEUE_TARGET_PER_ITEM).max(MIN_QUEUE_TARGET);
    if existing_queue.len() >= target {
        return Vec::new();
    }
    let mut budget = target - existing_queue.len();

    let mut seen: HashSet<PairKey> = completed.clone();
    seen.extend(existing_queue.iter().map(|&(a, b)| pair_key(a, b)));

    let by_rating = store.ids_by_rating_desc();
    let band: Vec<i64> = match params.focus_band {
        Some(k) if num_items > k => by_rating[..k].to_vec(),
        _ => by_rating.clone(),
    };

    let mut fresh: Vec<Pair> = Vec::with_capacity(budget);

    // Pass 1: coverage priority.
    let mut needy: Vec<i64> = store
        .items()
        .iter()
        .filter(|it| it.comparisons < params.min_comparisons)
        .map(|it| it.id)
        .collect();
    needy.shuffle(rng);

    'coverage: for &id in &needy {
        let mut partners: Vec<i64> = band.iter().copied().filter(|&p| p != id).collect();
        partners.shuffle(rng);
        let mut outside: Vec<i64> = by_rating
            .iter()
            .copied()
            .filter(|&p| p != id && !band.contains(&p))
            .collect();
        outside.shuffle(rng);
        partners.extend(outside);

        let mut added = 0;
        for partner in partners {
            if added >= params.min_comparisons {
                break;
            }
            if seen.insert(pair_key(id, partner)) {
                fresh.push(orient(id, partner, rng));
                added += 1;
                budget -= 1;
                if budget == 0 {
                    break 'coverage;
                }
            }
        }
    }

    // Pass 2: pairs within the focus band.
    if budget > 0 {
        let mut band_pairs: Vec<Pair> = Vec::new();
        for i in 0..band.len() {
            for j in (i + 1)..band.len() {
                band_pairs.push((band[i], band[j]));
            }
        }
        band_pairs.shuffle(rng);
        for (a, b) in band_pairs {
            if seen.insert(pair_key(a, b)) {
                fresh.push(orient(a, b, rng));
                budget -= 1;
                if budget == 0 {
                    break;
                }
            }
        }
    }

    // Pass 3: the band alone could not fill the target; open up the tail.
    if budget > 0 && band.len() < num_items {
        let mut ids = by_rating;
        ids.shuffle(rng);
        'fallback: for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                if seen.insert(pair_key(ids[i], ids[j])) {
                    fresh.push(orient(ids[i], ids[j], rng));
                    budget -= 1;
                    if budget == 0 {
                        break 'fallback;
                    }
                }
            }
        }
    }

    fresh
}

/// Coin-flip presentation order so neither side is systematically first.
fn orient(a: i64, b: i64, rng: &mut impl Rng) -> Pair {
    if rng.random::<f64>() < 0.5 { (a, b) } else { (b, a) }
}
