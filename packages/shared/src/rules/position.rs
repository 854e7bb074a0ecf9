use std::fmt;
use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, Color, MoveGen, Piece, Square};

use crate::rules::errors::RulesError;
use crate::rules::notation;

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A legal move together with the flags the engine orders on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerboseMove {
    pub chess_move: ChessMove,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<Piece>,
}

impl VerboseMove {
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    pub fn uci(&self) -> String {
        notation::uci(self.chess_move)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayedMove {
    pub chess_move: ChessMove,
    pub san: String,
    pub uci: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Draw,
}

#[derive(Clone, Copy)]
struct Snapshot {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Snapshot {
    fn fen(&self) -> String {
        // chess::Board does not track the clocks, so only its first four fields are used.
        let board_fen = self.board.to_string();
        let fields: Vec<&str> = board_fen.split_whitespace().take(4).collect();
        format!(
            "{} {} {}",
            fields.join(" "),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

/// Mutable game position with make/unmake and full move history.
///
/// Every move applied since construction is kept, so the position can be
/// rewound exactly, checked for repetitions and written back out as PGN
/// movetext.
#[derive(Clone)]
pub struct Position {
    current: Snapshot,
    history: Vec<Snapshot>,
    moves: Vec<ChessMove>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("fen", &self.fen())
            .field("plies", &self.moves.len())
            .finish()
    }
}

impl Position {
    pub fn new() -> Self {
        Self::from_board(Board::default(), 0, 1)
    }

    fn from_board(board: Board, halfmove_clock: u32, fullmove_number: u32) -> Self {
        Position {
            current: Snapshot {
                board,
                halfmove_clock,
                fullmove_number,
            },
            history: Vec::new(),
            moves: Vec::new(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let board =
            Board::from_str(fen).map_err(|_| RulesError::InvalidFen(fen.to_string()))?;
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let halfmove_clock = fields.get(4).and_then(|f| f.parse().ok()).unwrap_or(0);
        let fullmove_number = fields
            .get(5)
            .and_then(|f| f.parse().ok())
            .unwrap_or(1)
            .max(1);
        Ok(Self::from_board(board, halfmove_clock, fullmove_number))
    }

    /// Rebuild a position by replaying PGN movetext from `start_fen`.
    pub fn from_game_text(start_fen: &str, text: &str) -> Result<Self, RulesError> {
        let mut position = Self::from_fen(start_fen)?;
        for token in notation::movetext_tokens(text) {
            let mv = notation::san_to_move(&position.current.board, &token)?;
            position.make_move(mv);
        }
        Ok(position)
    }

    pub fn board(&self) -> &Board {
        &self.current.board
    }

    pub fn side_to_move(&self) -> Color {
        self.current.board.side_to_move()
    }

    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    pub fn fen(&self) -> String {
        self.current.fen()
    }

    pub fn start_fen(&self) -> String {
        self.history.first().unwrap_or(&self.current).fen()
    }

    /// PGN movetext of every move played since the start position.
    pub fn game_text(&self) -> String {
        let mut tokens = Vec::with_capacity(self.moves.len() * 3 / 2 + 1);
        for (index, (snapshot, mv)) in self.history.iter().zip(&self.moves).enumerate() {
            if snapshot.board.side_to_move() == Color::White {
                tokens.push(format!("{}.", snapshot.fullmove_number));
            } else if index == 0 {
                tokens.push(format!("{}...", snapshot.fullmove_number));
            }
            tokens.push(notation::san(&snapshot.board, *mv));
        }
        tokens.join(" ")
    }

    pub fn legal_moves(&self) -> Vec<VerboseMove> {
        let board = &self.current.board;
        MoveGen::new_legal(board)
            .map(|mv| describe(board, mv))
            .collect()
    }

    pub fn legal_move_count(&self) -> usize {
        MoveGen::new_legal(&self.current.board).len()
    }

    pub fn is_legal(&self, mv: ChessMove) -> bool {
        MoveGen::new_legal(&self.current.board).any(|legal| legal == mv)
    }

    /// Whether some legal move from `from` to `to` is a promotion.
    pub fn requires_promotion(&self, from: Square, to: Square) -> bool {
        MoveGen::new_legal(&self.current.board).any(|mv| {
            mv.get_source() == from && mv.get_dest() == to && mv.get_promotion().is_some()
        })
    }

    pub fn san(&self, mv: ChessMove) -> String {
        notation::san(&self.current.board, mv)
    }

    /// Apply a move without validation. The move must be legal.
    pub fn make_move(&mut self, mv: ChessMove) {
        let before = self.current;
        let board = before.board;
        let irreversible = board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            || board.piece_on(mv.get_dest()).is_some();
        let fullmove_number = if board.side_to_move() == Color::Black {
            before.fullmove_number + 1
        } else {
            before.fullmove_number
        };

        self.current = Snapshot {
            board: board.make_move_new(mv),
            halfmove_clock: if irreversible {
                0
            } else {
                before.halfmove_clock + 1
            },
            fullmove_number,
        };
        self.history.push(before);
        self.moves.push(mv);
    }

    /// Revert the last applied move, returning it.
    pub fn unmake_move(&mut self) -> Option<ChessMove> {
        let previous = self.history.pop()?;
        self.current = previous;
        self.moves.pop()
    }

    /// Validate and apply a move, returning its notations.
    pub fn play_move(&mut self, mv: ChessMove) -> Result<PlayedMove, RulesError> {
        if !self.is_legal(mv) {
            return Err(RulesError::IllegalMove(notation::uci(mv)));
        }
        let san = self.san(mv);
        self.make_move(mv);
        Ok(PlayedMove {
            chess_move: mv,
            san,
            uci: notation::uci(mv),
        })
    }

    pub fn play(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> Result<PlayedMove, RulesError> {
        self.play_move(ChessMove::new(from, to, promotion))
    }

    pub fn is_check(&self) -> bool {
        self.current.board.checkers().popcnt() > 0
    }

    pub fn is_checkmate(&self) -> bool {
        self.current.board.status() == BoardStatus::Checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.current.board.status() == BoardStatus::Stalemate
    }

    pub fn is_insufficient_material(&self) -> bool {
        let board = &self.current.board;
        let heavy = *board.pieces(Piece::Pawn) | *board.pieces(Piece::Rook) | *board.pieces(Piece::Queen);
        if heavy.popcnt() > 0 {
            return false;
        }

        let knights = board.pieces(Piece::Knight).popcnt();
        let bishops = *board.pieces(Piece::Bishop);
        if knights + bishops.popcnt() <= 1 {
            return true;
        }
        if knights > 0 {
            return false;
        }

        let mut shades = bishops.map(square_shade);
        match shades.next() {
            Some(first) => shades.all(|shade| shade == first),
            None => true,
        }
    }

    /// Same board, side to move, castling and en passant seen three times.
    pub fn is_threefold_repetition(&self) -> bool {
        let hash = self.current.board.get_hash();
        let repeats = self
            .history
            .iter()
            .rev()
            .take(self.current.halfmove_clock as usize)
            .filter(|snapshot| snapshot.board.get_hash() == hash)
            .count();
        repeats >= 2
    }

    pub fn is_fifty_move_rule(&self) -> bool {
        self.current.halfmove_clock >= 100
    }

    pub fn is_draw(&self) -> bool {
        self.is_fifty_move_rule()
            || self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_threefold_repetition()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    /// Checkmate goes to the side not on move; every other ending is a draw.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_checkmate() {
            Some(Outcome::Checkmate {
                winner: !self.side_to_move(),
            })
        } else if self.is_draw() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }
}

fn describe(board: &Board, mv: ChessMove) -> VerboseMove {
    let piece = board.piece_on(mv.get_source()).unwrap_or(Piece::Pawn);
    let en_passant =
        piece == Piece::Pawn && mv.get_source().get_file() != mv.get_dest().get_file();
    let captured = match board.piece_on(mv.get_dest()) {
        Some(target) => Some(target),
        None if en_passant => Some(Piece::Pawn),
        None => None,
    };
    VerboseMove {
        chess_move: mv,
        piece,
        captured,
        promotion: mv.get_promotion(),
    }
}

fn square_shade(square: Square) -> usize {
    (square.get_rank().to_index() + square.get_file().to_index()) % 2
}
