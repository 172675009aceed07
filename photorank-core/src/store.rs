/// The authoritative per-item rating state.
///
/// Items are identified by caller-provided `i64` IDs; the store keeps the
/// id → index mapping internal. Rating and uncertainty are only mutated by
/// `apply_update`, which always touches winner and loser together.
use std::collections::HashMap;

use crate::rating::update_ratings;
use crate::types::Item;

#[derive(Debug, Clone)]
pub struct RatingStore {
    items: Vec<Item>,
    id_to_idx: HashMap<i64, usize>,
}

impl RatingStore {
    /// Build a store from caller IDs. Panics on duplicates — two items with
    /// the same ID would silently share rating state.
    pub fn new(item_ids: &[i64]) -> Self {
        let mut id_to_idx = HashMap::with_capacity(item_ids.len());
        for (idx, &id) in item_ids.iter().enumerate() {
            let prev = id_to_idx.insert(id, idx);
            assert!(prev.is_none(), "Duplicate item ID: {}", id);
        }
        RatingStore {
            items: item_ids.iter().map(|&id| Item::new(id)).collect(),
            id_to_idx,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&Item> {
        self.id_to_idx.get(&id).map(|&idx| &self.items[idx])
    }

    pub fn contains(&self, id: i64) -> bool {
        self.id_to_idx.contains_key(&id)
    }

    fn expect_idx(&self, id: i64) -> usize {
        *self.id_to_idx.get(&id)
            .unwrap_or_else(|| panic!("Unknown item ID: {}", id))
    }

    /// Apply one decision: Elo update for both participants, uncertainty
    /// decay for both, comparison count bumped for both.
    ///
    /// Referencing an unknown ID is a caller bug and panics.
    pub fn apply_update(&mut self, winner_id: i64, loser_id: i64) {
        assert_ne!(winner_id, loser_id, "An item cannot be compared against itself");
        let winner_idx = self.expect_idx(winner_id);
        let loser_idx = self.expect_idx(loser_id);

        let update = update_ratings(&self.items[winner_idx], &self.items[loser_idx]);

        let winner = &mut self.items[winner_idx];
        winner.rating = update.winner_rating;
        winner.uncertainty = update.winner_uncertainty;
        winner.comparisons += 1;

        let loser = &mut self.items[loser_idx];
        loser.rating = update.loser_rating;
        loser.uncertainty = update.loser_uncertainty;
        loser.comparisons += 1;
    }

    /// Remove an item. Returns false if the ID was not present.
    pub fn remove(&mut self, id: i64) -> bool {
        let Some(idx) = self.id_to_idx.remove(&id) else {
            return false;
        };
        self.items.remove(idx);
        // Indices after the removal point all shifted down by one.
        for item in &self.items[idx..] {
            if let Some(slot) = self.id_to_idx.get_mut(&item.id) {
                *slot -= 1;
            }
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn item_mut(&mut self, id: i64) -> &mut Item {
        let idx = self.expect_idx(id);
        &mut self.items[idx]
    }

    /// Item IDs sorted by current rating, best first. Ties break by ID so
    /// the order is deterministic.
    pub fn ids_by_rating_desc(&self) -> Vec<i64> {
        let mut ids: Vec<(i64, f64)> = self.items.iter().map(|it| (it.id, it.rating)).collect();
        ids.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        ids.into_iter().map(|(id, _)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DEFAULT_RATING, DEFAULT_UNCERTAINTY};

    #[test]
    fn test_store_initializes_defaults() {
        let store = RatingStore::new(&[10, 20, 30]);
        assert_eq!(store.len(), 3);
        let item = store.get(20).unwrap();
        assert_eq!(item.rating, DEFAULT_RATING);
        assert_eq!(item.uncertainty, DEFAULT_UNCERTAINTY);
        assert_eq!(item.comparisons, 0);
    }

    #[test]
    #[should_panic(expected = "Duplicate item ID")]
    fn test_store_rejects_duplicate_ids() {
        let _ = RatingStore::new(&[1, 2, 1]);
    }

    #[test]
    fn test_apply_update_touches_both_participants() {
        let mut store = RatingStore::new(&[1, 2, 3]);
        store.apply_update(1, 2);

        assert_eq!(store.get(1).unwrap().rating, 1416.0);
        assert_eq!(store.get(2).unwrap().rating, 1384.0);
        assert_eq!(store.get(1).unwrap().comparisons, 1);
        assert_eq!(store.get(2).unwrap().comparisons, 1);
        // Bystander untouched.
        assert_eq!(store.get(3).unwrap().rating, DEFAULT_RATING);
        assert_eq!(store.get(3).unwrap().comparisons, 0);
    }

    #[test]
    #[should_panic(expected = "Unknown item ID")]
    fn test_apply_update_unknown_id_panics() {
        let mut store = RatingStore::new(&[1, 2]);
        store.apply_update(1, 99);
    }

    #[test]
    fn test_remove_keeps_lookups_consistent() {
        let mut store = RatingStore::new(&[10, 20, 30, 40]);
        assert!(store.remove(20));
        assert!(!store.remove(20));
        assert_eq!(store.len(), 3);
        assert!(store.get(20).is_none());
        // Remaining items still resolve after the index shift.
        for id in [10, 30, 40] {
            assert_eq!(store.get(id).unwrap().id, id);
        }
        store.apply_update(30, 40);
        assert_eq!(store.get(30).unwrap().comparisons, 1);
    }

    #[test]
    fn test_ids_by_rating_desc() {
        let mut store = RatingStore::new(&[1, 2, 3]);
        store.apply_update(2, 3);
        let ids = store.ids_by_rating_desc();
        assert_eq!(ids[0], 2);
        assert_eq!(ids[2], 3);
    }
}
