use rand::Rng;
use rand::seq::IndexedRandom;

use super::board::Board;

/// Naive opponent: two distinct unmatched tiles, uniformly, with no memory.
/// Returns an empty pick when fewer than two candidates remain.
pub fn pick<R: Rng + ?Sized>(board: &Board, excluded: &[usize], rng: &mut R) -> Vec<usize> {
    let candidates: Vec<usize> = board
        .unmatched_indices()
        .filter(|idx| !excluded.contains(idx))
        .collect();
    if candidates.len() < 2 {
        return Vec::new();
    }
    candidates.choose_multiple(rng, 2).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn board() -> Board {
        Board::from_identities(
            4,
            &[
                "a", "b", "c", "d", "e", "f", "g", "h", "a", "b", "c", "d", "e", "f", "g", "h",
            ],
        )
    }

    #[test]
    fn picks_two_distinct_unmatched_tiles() {
        let mut board = board();
        board.mark_matched(&[0, 8, 3, 11]);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let picked = pick(&board, &[], &mut rng);
            assert_eq!(picked.len(), 2);
            assert_ne!(picked[0], picked[1]);
            assert!(picked.iter().all(|&idx| !board.is_matched(idx)));
        }
    }

    #[test]
    fn respects_excluded_indices() {
        let mut board = board();
        board.mark_matched(&[0, 8, 1, 9, 2, 10, 3, 11, 4, 12, 5, 13]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let picked = pick(&board, &[6], &mut rng);
            assert_eq!(picked.len(), 2);
            assert!(!picked.contains(&6));
        }
        assert!(pick(&board, &[6, 7], &mut rng).len() == 2);
        assert!(pick(&board, &[6, 7, 14], &mut rng).is_empty());
    }

    #[test]
    fn empty_when_one_or_no_tile_is_left() {
        let mut board = Board::from_identities(2, &["a", "b", "b", "c"]);
        board.mark_matched(&[1, 2, 3]);
        let mut rng = StdRng::seed_from_u64(5);
        assert!(pick(&board, &[], &mut rng).is_empty());
        board.mark_matched(&[0]);
        assert!(pick(&board, &[], &mut rng).is_empty());
    }

    #[test]
    fn every_candidate_gets_picked_eventually() {
        let board = board();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut seen = [false; 16];
        for _ in 0..500 {
            for idx in pick(&board, &[], &mut rng) {
                seen[idx] = true;
            }
        }
        assert!(seen.iter().all(|&hit| hit));
    }
}
