//! Shuffle permutations for the queue
//!
//! Both helpers are Fisher-Yates underneath; they differ in which slot is
//! excluded from the draw.

use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `items` while keeping the item at `pinned` where it is
///
/// Used when shuffle is switched on mid-playback: the playing entry keeps its
/// index so the engine is not interrupted, every other entry is permuted.
pub fn shuffle_pinned<T, R: Rng + ?Sized>(items: &mut [T], pinned: Option<usize>, rng: &mut R) {
    let len = items.len();
    match pinned {
        Some(pin) if pin < len => {
            if len <= 2 {
                return;
            }
            let last = len - 1;
            items.swap(pin, last);
            items[..last].shuffle(rng);
            items.swap(pin, last);
        }
        _ => items.shuffle(rng),
    }
}

/// Draw the order for a new shuffled cycle
///
/// The entry that just finished goes to the last slot so the new cycle never
/// opens with an immediate repeat; the rest are permuted.
pub fn draw_cycle<T, R: Rng + ?Sized>(items: &mut [T], finished: usize, rng: &mut R) {
    let len = items.len();
    if finished >= len {
        items.shuffle(rng);
        return;
    }
    let last = len - 1;
    items.swap(finished, last);
    items[..last].shuffle(rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn sorted(items: &[u32]) -> Vec<u32> {
        let mut out = items.to_vec();
        out.sort_unstable();
        out
    }

    #[test]
    fn pinned_item_keeps_its_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut items: Vec<u32> = (0..10).collect();
            shuffle_pinned(&mut items, Some(4), &mut rng);
            assert_eq!(items[4], 4);
            assert_eq!(sorted(&items), (0..10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn pinned_shuffle_moves_the_others() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let mut items: Vec<u32> = (0..6).collect();
            shuffle_pinned(&mut items, Some(0), &mut rng);
            seen.insert(items);
        }
        assert!(seen.len() > 1, "shuffle never changed the order");
    }

    #[test]
    fn pinned_shuffle_small_inputs() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut one = vec![1u32];
        shuffle_pinned(&mut one, Some(0), &mut rng);
        assert_eq!(one, vec![1]);

        let mut two = vec![1u32, 2];
        shuffle_pinned(&mut two, Some(1), &mut rng);
        assert_eq!(two, vec![1, 2]);

        let mut empty: Vec<u32> = vec![];
        shuffle_pinned(&mut empty, None, &mut rng);
        assert!(empty.is_empty());
    }

    #[test]
    fn new_cycle_never_opens_with_finished_entry() {
        let mut rng = StdRng::seed_from_u64(3);
        for finished in 0..5 {
            let mut items: Vec<u32> = (0..5).collect();
            draw_cycle(&mut items, finished, &mut rng);
            assert_ne!(items[0], finished as u32);
            assert_eq!(items[4], finished as u32);
            assert_eq!(sorted(&items), (0..5).collect::<Vec<_>>());
        }
    }

    #[test]
    fn new_cycle_single_entry() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut items = vec![9u32];
        draw_cycle(&mut items, 0, &mut rng);
        assert_eq!(items, vec![9]);
    }
}
