pub mod difficulty;
pub mod evaluator;
pub mod ordering;
pub mod search;

pub use difficulty::{best_move, beginner_candidates, ScoredMove, Strategy};
pub use evaluator::evaluate;
pub use ordering::order;
pub use search::{search_best_move, AlphaBeta, SearchResult};
