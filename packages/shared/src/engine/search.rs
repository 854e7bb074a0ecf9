use chess::Color;
use tracing::debug;

use crate::engine::evaluator::evaluate;
use crate::engine::ordering::order;
use crate::rules::{Position, VerboseMove};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: VerboseMove,
    pub score: i32,
}

/// Depth-limited minimax with alpha-beta pruning, scored for one side.
pub struct AlphaBeta {
    perspective: Color,
    nodes_searched: u64,
}

impl AlphaBeta {
    pub fn new(perspective: Color) -> Self {
        Self {
            perspective,
            nodes_searched: 0,
        }
    }

    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// Best move for the side to move. `position` is restored before returning.
    pub fn search(&mut self, position: &mut Position, depth: u32) -> Option<SearchResult> {
        self.nodes_searched = 0;
        let depth = depth.max(1);
        let maximizing = position.side_to_move() == self.perspective;

        let mut alpha = i32::MIN;
        let mut beta = i32::MAX;
        let mut best: Option<SearchResult> = None;

        for mv in order(position.legal_moves()) {
            position.make_move(mv.chess_move);
            let score = self.alpha_beta(position, depth - 1, alpha, beta);
            position.unmake_move();

            let improves = match best {
                None => true,
                Some(current) if maximizing => score > current.score,
                Some(current) => score < current.score,
            };
            if improves {
                best = Some(SearchResult {
                    best_move: mv,
                    score,
                });
            }

            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
        }

        debug!(
            depth,
            nodes = self.nodes_searched,
            best = ?best.map(|result| result.best_move.uci()),
            score = ?best.map(|result| result.score),
            "alpha-beta search finished"
        );
        best
    }

    fn alpha_beta(
        &mut self,
        position: &mut Position,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 || position.is_game_over() {
            return evaluate(position, self.perspective);
        }

        let moves = order(position.legal_moves());

        if position.side_to_move() == self.perspective {
            let mut value = i32::MIN;
            for mv in moves {
                position.make_move(mv.chess_move);
                let child = self.alpha_beta(position, depth - 1, alpha, beta);
                position.unmake_move();

                value = value.max(child);
                alpha = alpha.max(value);
                if alpha >= beta {
                    break;
                }
            }
            value
        } else {
            let mut value = i32::MAX;
            for mv in moves {
                position.make_move(mv.chess_move);
                let child = self.alpha_beta(position, depth - 1, alpha, beta);
                position.unmake_move();

                value = value.min(child);
                beta = beta.min(value);
                if alpha >= beta {
                    break;
                }
            }
            value
        }
    }
}

pub fn search_best_move(
    position: &mut Position,
    depth: u32,
    perspective: Color,
) -> Option<SearchResult> {
    AlphaBeta::new(perspective).search(position, depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::STARTING_FEN;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
    use rstest::rstest;

    fn minimax_value(position: &mut Position, depth: u32, perspective: Color) -> i32 {
        if depth == 0 || position.is_game_over() {
            return evaluate(position, perspective);
        }
        let maximizing = position.side_to_move() == perspective;
        let mut values = Vec::new();
        for mv in order(position.legal_moves()) {
            position.make_move(mv.chess_move);
            values.push(minimax_value(position, depth - 1, perspective));
            position.unmake_move();
        }
        if maximizing {
            values.into_iter().max().unwrap()
        } else {
            values.into_iter().min().unwrap()
        }
    }

    // Exhaustive reference: no pruning, first-encountered best wins ties.
    fn minimax(position: &mut Position, depth: u32, perspective: Color) -> Option<SearchResult> {
        let maximizing = position.side_to_move() == perspective;
        let mut best: Option<SearchResult> = None;
        for mv in order(position.legal_moves()) {
            position.make_move(mv.chess_move);
            let score = minimax_value(position, depth - 1, perspective);
            position.unmake_move();
            let improves = match best {
                None => true,
                Some(current) if maximizing => score > current.score,
                Some(current) => score < current.score,
            };
            if improves {
                best = Some(SearchResult {
                    best_move: mv,
                    score,
                });
            }
        }
        best
    }

    fn random_playout(seed: u64, plies: usize) -> Position {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut position = Position::new();
        for _ in 0..plies {
            if position.is_game_over() {
                break;
            }
            let moves = position.legal_moves();
            let mv = moves.choose(&mut rng).unwrap();
            position.make_move(mv.chess_move);
        }
        position
    }

    #[test]
    fn test_no_legal_moves_returns_none() {
        let mut position = Position::from_fen("k7/2Q5/1K6/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(search_best_move(&mut position, 3, Color::Black), None);
    }

    #[test]
    fn test_finds_capturing_mate() {
        // Rxa8# takes the only black piece, so nothing else can score higher
        let mut position = Position::from_fen("r6k/8/6K1/8/8/8/8/R7 w - - 0 1").unwrap();

        let result = search_best_move(&mut position, 3, Color::White).unwrap();
        assert_eq!(result.best_move.uci(), "a1a8");
        assert_eq!(result.score, 500 + 20);
    }

    #[test]
    fn test_mate_is_worth_only_its_check_bonus() {
        // after 1. f3 e5 2. g4 winning the g4 pawn outscores Qh4#
        let mut position = Position::from_fen(
            "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2",
        )
        .unwrap();

        let result = search_best_move(&mut position, 3, Color::Black).unwrap();
        assert_eq!(result.best_move.uci(), "d8g5");
        assert!(result.score > 20);
    }

    #[test]
    fn test_wins_hanging_queen() {
        let mut position = Position::from_fen("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1").unwrap();

        let result = search_best_move(&mut position, 2, Color::White).unwrap();
        assert_eq!(result.best_move.uci(), "d2d5");
        assert!(result.score > 0);
    }

    #[test]
    fn test_position_is_restored() {
        let mut position = random_playout(7, 10);
        let fen = position.fen();
        let text = position.game_text();
        let perspective = position.side_to_move();

        search_best_move(&mut position, 3, perspective);

        assert_eq!(position.fen(), fen);
        assert_eq!(position.game_text(), text);
    }

    #[test]
    fn test_search_is_deterministic() {
        let mut position = random_playout(42, 6);
        let perspective = position.side_to_move();

        let first = search_best_move(&mut position, 3, perspective);
        let second = search_best_move(&mut position, 3, perspective);
        assert_eq!(first, second);
    }

    #[test]
    fn test_depth_zero_still_picks_a_move() {
        let mut position = Position::new();
        assert!(search_best_move(&mut position, 0, Color::White).is_some());
    }

    #[test]
    fn test_pruning_visits_fewer_nodes() {
        let mut position = Position::new();
        let mut searcher = AlphaBeta::new(Color::White);
        searcher.search(&mut position, 3).unwrap();

        // an unpruned depth-3 tree from the start has 20 + 400 + 8902 nodes
        assert!(searcher.nodes_searched() > 0);
        assert!(searcher.nodes_searched() < 20 + 400 + 8902);
    }

    #[rstest]
    #[case::opening("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5Q2/PPPP1PPP/RNB1K1NR w KQkq - 2 3", 2)]
    #[case::tactics("r3k2r/ppp2ppp/2n5/3qp3/3P4/2P2N2/P4PPP/R2QKB1R b KQkq - 0 10", 2)]
    #[case::start(STARTING_FEN, 3)]
    #[case::endgame("8/5k2/8/3K4/8/8/2P5/8 w - - 0 1", 4)]
    fn test_matches_exhaustive_minimax(#[case] fen: &str, #[case] depth: u32) {
        let mut position = Position::from_fen(fen).unwrap();
        let perspective = position.side_to_move();

        let pruned = search_best_move(&mut position, depth, perspective);
        let exhaustive = minimax(&mut position, depth, perspective);
        assert_eq!(pruned, exhaustive);
    }

    #[test]
    fn test_matches_exhaustive_minimax_for_the_other_side() {
        let mut position = random_playout(3, 9);
        let perspective = !position.side_to_move();

        let pruned = search_best_move(&mut position, 2, perspective);
        let exhaustive = minimax(&mut position, 2, perspective);
        assert_eq!(pruned, exhaustive);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_alpha_beta_matches_minimax(seed in any::<u64>(), plies in 0usize..30) {
            let mut position = random_playout(seed, plies);
            prop_assume!(!position.is_game_over());
            let perspective = position.side_to_move();

            let pruned = search_best_move(&mut position, 2, perspective);
            let exhaustive = minimax(&mut position, 2, perspective);
            prop_assert_eq!(pruned, exhaustive);
        }
    }
}
