//! Rules-engine adapter over the `chess` crate.

pub mod errors;
pub mod notation;
pub mod position;

pub use chess::{ChessMove, Color, Piece, Square};
pub use errors::RulesError;
pub use position::{Outcome, PlayedMove, Position, VerboseMove, STARTING_FEN};
