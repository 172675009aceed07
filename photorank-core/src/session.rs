/// Session orchestrator: the request/response surface a UI binds to.
///
/// One comparison at a time: `offer_next_pair` hands out the most
/// informative pair, `record_decision` applies the caller's choice,
/// `check_convergence` gates the loop, `finalize` produces the ranking.
/// Strictly sequential and synchronous — callers needing cross-thread
/// access serialize externally. Abandoning a session is just dropping it;
/// `finalize` works at any point on the current ratings.
use std::collections::HashSet;

use crate::convergence::{can_stop, estimate_remaining_comparisons};
use crate::pairing::{generate_candidates, select_most_informative};
use crate::ranking;
use crate::store::RatingStore;
use crate::types::{
    pair_key, ComparisonRecord, Pair, PairKey, RankedItem, RemovalOutcome, SessionParams,
};

pub struct RankingSession {
    store: RatingStore,
    params: SessionParams,
    /// Every decision made, in order.
    completed: Vec<ComparisonRecord>,
    /// Keys of completed pairs, for dedup and adjacency checks.
    completed_keys: HashSet<PairKey>,
    /// Not-yet-asked candidate pairs, replenished on demand.
    queue: Vec<Pair>,
    /// The pair currently on offer, if any. Kept out of the queue so a
    /// pending offer is never regenerated.
    offered: Option<Pair>,
}

impl RankingSession {
    /// Start a session over the given items. Panics on fewer than two items
    /// or duplicate IDs — there is nothing to rank.
    pub fn new(item_ids: &[i64]) -> Self {
        assert!(item_ids.len() >= 2, "A ranking session requires at least two items");
        RankingSession {
            store: RatingStore::new(item_ids),
            params: SessionParams::for_collection(item_ids.len()),
            completed: Vec::new(),
            completed_keys: HashSet::new(),
            queue: Vec::new(),
            offered: None,
        }
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn decisions(&self) -> &[ComparisonRecord] {
        &self.completed
    }

    pub fn comparisons_completed(&self) -> usize {
        self.completed.len()
    }

    /// The pair currently awaiting a decision, if any.
    pub fn offered(&self) -> Option<Pair> {
        self.offered
    }

    /// The next pair to present. Returns the pending pair if one is already
    /// on offer; otherwise replenishes the candidate queue and selects the
    /// most informative pair from it. `None` means the pool is exhausted
    /// and the caller should finalize.
    pub fn offer_next_pair(&mut self) -> Option<Pair> {
        if let Some(pair) = self.offered {
            return Some(pair);
        }

        self.replenish_queue();
        let best = select_most_informative(&self.store, &self.queue)?;
        self.queue.retain(|&p| pair_key(p.0, p.1) != pair_key(best.0, best.1));
        self.offered = Some(best);
        Some(best)
    }

    fn replenish_queue(&mut self) {
        let fresh = generate_candidates(
            &self.store,
            &self.completed_keys,
            &self.queue,
            &self.params,
            &mut rand::rng(),
        );
        self.queue.extend(fresh);
    }

    /// Record the user's choice for the pair on offer.
    ///
    /// Panics if no pair is on offer or `winner_id` is not part of it —
    /// both are caller bugs, not recoverable states.
    pub fn record_decision(&mut self, winner_id: i64) {
        let (a, b) = self
            .offered
            .take()
            .expect("record_decision called with no pair on offer");
        assert!(
            winner_id == a || winner_id == b,
            "Winner {} is not part of the offered pair ({}, {})",
            winner_id, a, b,
        );
        let loser_id = if winner_id == a { b } else { a };

        self.store.apply_update(winner_id, loser_id);

        let key = pair_key(a, b);
        self.completed_keys.insert(key);
        self.completed.push(ComparisonRecord { key, winner: winner_id });
    }

    /// True when the session should stop requesting comparisons: either the
    /// ranking is confident enough, or the candidate pool is provably
    /// exhausted.
    pub fn check_convergence(&mut self) -> bool {
        if can_stop(&self.store, &self.completed_keys, &self.params) {
            return true;
        }
        // Exhaustion: nothing on offer, nothing queued, nothing generable.
        if self.offered.is_none() && self.queue.is_empty() {
            self.replenish_queue();
            if self.queue.is_empty() {
                return true;
            }
        }
        false
    }

    /// The final ordered ranking for the current ratings. Callable at any
    /// time, converged or not.
    pub fn finalize(&self) -> Vec<RankedItem> {
        ranking::finalize(&self.store)
    }

    /// Drop an item mid-session, purging every queued pair and recorded
    /// decision that references it. Parameters rescale to the new
    /// collection size. If the removal invalidated the pair on offer, a
    /// replacement is selected.
    pub fn remove_item(&mut self, id: i64) -> RemovalOutcome {
        if !self.store.remove(id) {
            // Unknown ID: nothing referenced it, nothing changes. Report
            // the current offer without generating a new one.
            return if self.store.len() < 2 {
                RemovalOutcome::TooFewItems
            } else {
                RemovalOutcome::Removed { next_pair: self.offered }
            };
        }

        self.queue.retain(|&(a, b)| a != id && b != id);
        self.completed.retain(|rec| rec.key.0 != id && rec.key.1 != id);
        self.completed_keys.retain(|&(a, b)| a != id && b != id);
        self.params = SessionParams::for_collection(self.store.len());

        if self.store.len() < 2 {
            self.offered = None;
            self.queue.clear();
            return RemovalOutcome::TooFewItems;
        }

        if let Some((a, b)) = self.offered {
            if a == id || b == id {
                self.offered = None;
            }
        }
        RemovalOutcome::Removed { next_pair: self.offer_next_pair() }
    }

    /// Advisory estimate of comparisons still needed. Approximate for large
    /// collections by design.
    pub fn estimated_remaining(&self) -> usize {
        estimate_remaining_comparisons(&self.store, &self.params)
    }

    /// Fraction of the estimated total work done, in [0, 1].
    pub fn progress(&self) -> f64 {
        let done = self.completed.len();
        let total = done + self.estimated_remaining();
        if total == 0 {
            1.0
        } else {
            done as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_RATING, MIN_UNCERTAINTY};
    use crate::rating::confidence;

    /// Drive a session to convergence, always picking the lower ID as the
    /// winner. Returns the number of decisions made.
    fn run_to_convergence(session: &mut RankingSession, limit: usize) -> usize {
        let mut decisions = 0;
        while !session.check_convergence() {
            let Some((a, b)) = session.offer_next_pair() else { break };
            session.record_decision(a.min(b));
            decisions += 1;
            assert!(decisions <= limit, "session failed to converge within {limit} decisions");
        }
        decisions
    }

    #[test]
    #[should_panic(expected = "at least two items")]
    fn test_session_requires_two_items() {
        let _ = RankingSession::new(&[1]);
    }

    #[test]
    fn test_offer_is_stable_until_decided() {
        let mut session = RankingSession::new(&[1, 2, 3]);
        let first = session.offer_next_pair().unwrap();
        assert_eq!(session.offer_next_pair().unwrap(), first);
        session.record_decision(first.0);
        assert_eq!(session.offered(), None);
    }

    #[test]
    #[should_panic(expected = "no pair on offer")]
    fn test_decision_without_offer_panics() {
        let mut session = RankingSession::new(&[1, 2]);
        session.record_decision(1);
    }

    #[test]
    #[should_panic(expected = "not part of the offered pair")]
    fn test_decision_with_foreign_winner_panics() {
        let mut session = RankingSession::new(&[1, 2, 3]);
        let (a, b) = session.offer_next_pair().unwrap();
        let outsider = (1..=3).find(|id| *id != a && *id != b).unwrap();
        session.record_decision(outsider);
    }

    #[test]
    fn test_no_pair_is_offered_twice() {
        let mut session = RankingSession::new(&(0..6).collect::<Vec<i64>>());
        let mut seen: HashSet<PairKey> = HashSet::new();

        for _ in 0..15 {
            // C(6,2) = 15: every offer must be fresh until exhaustion.
            let Some((a, b)) = session.offer_next_pair() else { break };
            assert!(seen.insert(pair_key(a, b)), "pair ({a}, {b}) offered twice");
            session.record_decision(a);
        }
    }

    #[test]
    fn test_session_converges_with_coverage() {
        let ids: Vec<i64> = (0..5).collect();
        let mut session = RankingSession::new(&ids);
        run_to_convergence(&mut session, 1000);

        // Either every item met the minimum, or the pool ran dry below it.
        let pool_exhausted = session.comparisons_completed() == 10; // C(5,2)
        for item in session.store().items() {
            assert!(
                item.comparisons >= session.params().min_comparisons || pool_exhausted,
                "item {} stopped at {} comparisons",
                item.id, item.comparisons,
            );
        }
    }

    #[test]
    fn test_consistent_winner_ranks_first() {
        let mut session = RankingSession::new(&[10, 20, 30, 40]);
        run_to_convergence(&mut session, 1000);

        let ranked = session.finalize();
        assert_eq!(ranked[0].id, 10, "the item that wins everything must rank first");
        // Ranking monotonicity: rating order and rank order agree.
        for pair in ranked.windows(2) {
            assert!(pair[0].rating >= pair[1].rating);
            assert!(pair[0].rank <= pair[1].rank);
        }
    }

    #[test]
    fn test_uncertainty_only_decreases_across_session() {
        let mut session = RankingSession::new(&(0..4).collect::<Vec<i64>>());
        for _ in 0..20 {
            let Some((a, b)) = session.offer_next_pair() else { break };
            let before_a = session.store().get(a).unwrap().uncertainty;
            let before_b = session.store().get(b).unwrap().uncertainty;
            session.record_decision(b);
            let after_a = session.store().get(a).unwrap().uncertainty;
            let after_b = session.store().get(b).unwrap().uncertainty;
            assert!(after_a < before_a || after_a == MIN_UNCERTAINTY);
            assert!(after_b < before_b || after_b == MIN_UNCERTAINTY);
        }
    }

    #[test]
    fn test_finalize_before_any_decision() {
        // "Skip to results" straight away: all defaults, everything tied.
        let session = RankingSession::new(&[5, 6, 7]);
        let ranked = session.finalize();
        assert!(ranked.iter().all(|r| r.rank == 1));
        assert!(ranked.iter().all(|r| r.rating == DEFAULT_RATING));
        assert!(ranked.iter().all(|r| r.confidence == confidence(400.0)));
    }

    #[test]
    fn test_removal_replaces_offered_pair() {
        let mut session = RankingSession::new(&(0..5).collect::<Vec<i64>>());
        let (a, _) = session.offer_next_pair().unwrap();

        let outcome = session.remove_item(a);
        let RemovalOutcome::Removed { next_pair } = outcome else {
            panic!("expected the session to continue");
        };
        let (na, nb) = next_pair.expect("a replacement pair must be available");
        assert_ne!(na, a);
        assert_ne!(nb, a);

        // Nothing in the session references the removed item any more.
        assert!(session.store().get(a).is_none());
        for rec in session.decisions() {
            assert!(rec.key.0 != a && rec.key.1 != a);
        }
        // And it is never offered again.
        for _ in 0..6 {
            let Some((x, y)) = session.offer_next_pair() else { break };
            assert!(x != a && y != a);
            session.record_decision(x);
        }
    }

    #[test]
    fn test_removal_purges_decisions() {
        let mut session = RankingSession::new(&[1, 2, 3]);
        let (a, _) = session.offer_next_pair().unwrap();
        session.record_decision(a);
        assert_eq!(session.comparisons_completed(), 1);

        session.remove_item(a);
        assert_eq!(session.comparisons_completed(), 0);
    }

    #[test]
    fn test_removal_below_two_items_signals_exit() {
        let mut session = RankingSession::new(&[1, 2, 3]);
        assert!(matches!(
            session.remove_item(3),
            RemovalOutcome::Removed { .. }
        ));
        assert_eq!(session.remove_item(2), RemovalOutcome::TooFewItems);
        assert_eq!(session.offered(), None);
    }

    #[test]
    fn test_removing_unknown_id_is_a_no_op() {
        let mut session = RankingSession::new(&[1, 2, 3]);

        // No offer pending: an unknown removal must not conjure one up.
        assert_eq!(
            session.remove_item(99),
            RemovalOutcome::Removed { next_pair: None }
        );
        assert_eq!(session.offered(), None);
        assert_eq!(session.store().len(), 3);

        // With an offer pending, the same offer comes back untouched.
        let pair = session.offer_next_pair().unwrap();
        assert_eq!(
            session.remove_item(99),
            RemovalOutcome::Removed { next_pair: Some(pair) }
        );
        assert_eq!(session.offered(), Some(pair));
    }

    #[test]
    fn test_progress_stays_bounded() {
        // Exhaustion-convergence can stop with a positive remaining
        // estimate, so progress tops out at or below 1 but never above.
        let mut session = RankingSession::new(&(0..4).collect::<Vec<i64>>());
        assert!(session.progress() < 1.0);
        run_to_convergence(&mut session, 1000);
        assert!(session.progress() > 0.0);
        assert!(session.progress() <= 1.0);
    }
}
