use std::cmp::Reverse;

use crate::rules::VerboseMove;

pub const CAPTURE_PRIORITY: i32 = 1000;
pub const PROMOTION_PRIORITY: i32 = 500;

pub fn priority(mv: &VerboseMove) -> i32 {
    let mut score = 0;
    if mv.is_capture() {
        score += CAPTURE_PRIORITY;
    }
    if mv.promotion.is_some() {
        score += PROMOTION_PRIORITY;
    }
    score
}

/// Captures and promotions first. The sort is stable, so equal priorities
/// keep the generator's order.
pub fn order(mut moves: Vec<VerboseMove>) -> Vec<VerboseMove> {
    moves.sort_by_key(|mv| Reverse(priority(mv)));
    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Position;
    use proptest::prelude::*;

    #[test]
    fn test_priorities() {
        let position = Position::from_fen("1n5k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let moves = position.legal_moves();
        let by_uci = |uci: &str| *moves.iter().find(|m| m.uci() == uci).unwrap();

        assert_eq!(priority(&by_uci("a7b8q")), 1500);
        assert_eq!(priority(&by_uci("a7a8q")), 500);
        assert_eq!(priority(&by_uci("a1b1")), 0);
    }

    #[test]
    fn test_order_puts_captures_then_promotions_first() {
        let position = Position::from_fen("1n5k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let ordered = order(position.legal_moves());
        let priorities: Vec<i32> = ordered.iter().map(priority).collect();

        assert_eq!(&priorities[..4], &[1500, 1500, 1500, 1500]);
        assert_eq!(&priorities[4..8], &[500, 500, 500, 500]);
        assert!(priorities[8..].iter().all(|p| *p == 0));
    }

    #[test]
    fn test_order_empty() {
        assert!(order(Vec::new()).is_empty());
    }

    fn scrambled_moves(seed: u64) -> Vec<VerboseMove> {
        use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

        let mut rng = StdRng::seed_from_u64(seed);
        let mut position = Position::new();
        for _ in 0..12 {
            let moves = position.legal_moves();
            match moves.choose(&mut rng) {
                Some(mv) => position.make_move(mv.chess_move),
                None => break,
            }
        }
        let mut moves = position.legal_moves();
        moves.shuffle(&mut rng);
        moves
    }

    proptest! {
        #[test]
        fn prop_order_is_stable_and_descending(seed in any::<u64>()) {
            let input = scrambled_moves(seed);
            let output = order(input.clone());

            prop_assert_eq!(output.len(), input.len());
            for pair in output.windows(2) {
                prop_assert!(priority(&pair[0]) >= priority(&pair[1]));
            }
            for (i, a) in output.iter().enumerate() {
                for b in &output[i + 1..] {
                    if priority(a) == priority(b) {
                        let pos_a = input.iter().position(|m| m == a).unwrap();
                        let pos_b = input.iter().position(|m| m == b).unwrap();
                        prop_assert!(pos_a < pos_b);
                    }
                }
            }
        }
    }
}
