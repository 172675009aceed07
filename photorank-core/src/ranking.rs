/// Final ranking: sort by rating and assign competition ranks.
use crate::rating::confidence;
use crate::store::RatingStore;
use crate::types::{Item, RankedItem};

/// Produce the final ordered ranking, best first.
///
/// Exactly equal ratings share a rank; the next distinct rating resumes at
/// its positional index, so ranks skip over tied positions (1, 2, 2, 4).
/// Pure and repeatable: the same store always yields the same output.
pub fn finalize(store: &RatingStore) -> Vec<RankedItem> {
    let mut sorted: Vec<&Item> = store.items().iter().collect();
    sorted.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });

    let mut ranked = Vec::with_capacity(sorted.len());
    let mut rank = 1;
    for (index, item) in sorted.iter().enumerate() {
        if index > 0 && item.rating < sorted[index - 1].rating {
            rank = index + 1;
        }
        ranked.push(RankedItem {
            id: item.id,
            rank,
            rating: item.rating,
            confidence: confidence(item.uncertainty),
            comparisons: item.comparisons,
        });
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_ratings(ratings: &[(i64, f64)]) -> RatingStore {
        let ids: Vec<i64> = ratings.iter().map(|&(id, _)| id).collect();
        let mut store = RatingStore::new(&ids);
        for &(id, rating) in ratings {
            store.item_mut(id).rating = rating;
        }
        store
    }

    #[test]
    fn test_sorted_descending_by_rating() {
        let store = store_with_ratings(&[(1, 1380.0), (2, 1450.0), (3, 1420.0)]);
        let ranked = finalize(&store);
        assert_eq!(
            ranked.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![2, 3, 1]
        );
        assert_eq!(
            ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_equal_ratings_share_rank_and_skip() {
        let store = store_with_ratings(&[(1, 1450.0), (2, 1450.0), (3, 1400.0), (4, 1400.0), (5, 1300.0)]);
        let ranked = finalize(&store);
        assert_eq!(
            ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 1, 3, 3, 5]
        );
    }

    #[test]
    fn test_close_but_unequal_ratings_do_not_tie() {
        let store = store_with_ratings(&[(1, 1400.0), (2, 1401.0)]);
        let ranked = finalize(&store);
        assert_eq!(ranked[0].id, 2);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let store = store_with_ratings(&[(7, 1500.0), (3, 1500.0), (9, 1410.0)]);
        assert_eq!(finalize(&store), finalize(&store));
    }

    #[test]
    fn test_rank_never_improves_as_rating_drops() {
        let store = store_with_ratings(&[(1, 1520.0), (2, 1480.0), (3, 1480.0), (4, 1320.0)]);
        let ranked = finalize(&store);
        for pair in ranked.windows(2) {
            assert!(pair[0].rating >= pair[1].rating);
            assert!(pair[0].rank <= pair[1].rank);
        }
    }
}
