use std::cmp::Reverse;

use chess::Color;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::engine::evaluator::evaluate;
use crate::engine::ordering::order;
use crate::engine::search::search_best_move;
use crate::models::game::Difficulty;
use crate::rules::{Position, VerboseMove};

pub const BEGINNER_CANDIDATES: usize = 3;
pub const MEDIUM_DEPTH: u32 = 3;
pub const EXPERT_DEPTH: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One-ply evaluation, random pick among the best few.
    RandomTop { candidates: usize },
    AlphaBeta { depth: u32 },
}

impl From<Difficulty> for Strategy {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Beginner => Strategy::RandomTop {
                candidates: BEGINNER_CANDIDATES,
            },
            Difficulty::Medium => Strategy::AlphaBeta {
                depth: MEDIUM_DEPTH,
            },
            Difficulty::Expert => Strategy::AlphaBeta {
                depth: EXPERT_DEPTH,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: VerboseMove,
    pub score: i32,
}

fn scored_moves(position: &Position, ai_color: Color) -> Vec<ScoredMove> {
    let mut position = position.clone();
    let mut scored: Vec<ScoredMove> = order(position.legal_moves())
        .into_iter()
        .map(|mv| {
            position.make_move(mv.chess_move);
            let score = evaluate(&position, ai_color);
            position.unmake_move();
            ScoredMove { mv, score }
        })
        .collect();
    scored.sort_by_key(|scored| Reverse(scored.score));
    scored
}

/// The moves a beginner chooses between, best first.
pub fn beginner_candidates(position: &Position, ai_color: Color) -> Vec<ScoredMove> {
    let mut scored = scored_moves(position, ai_color);
    scored.truncate(BEGINNER_CANDIDATES);
    scored
}

/// Pick a move for `ai_color` at the given difficulty. `None` when the side to
/// move has no legal moves.
pub fn best_move<R: Rng + ?Sized>(
    position: &Position,
    difficulty: Difficulty,
    ai_color: Color,
    rng: &mut R,
) -> Option<VerboseMove> {
    match Strategy::from(difficulty) {
        Strategy::RandomTop { candidates } => {
            let mut scored = scored_moves(position, ai_color);
            scored.truncate(candidates);
            let pick = scored.choose(rng).map(|scored| scored.mv);
            debug!(
                ?difficulty,
                candidates = scored.len(),
                pick = ?pick.map(|mv| mv.uci()),
                "picked random top move"
            );
            pick
        }
        Strategy::AlphaBeta { depth } => {
            let mut search_position = position.clone();
            search_best_move(&mut search_position, depth, ai_color).map(|result| result.best_move)
        }
    }
}
