use chess::{Color, Piece, ALL_PIECES};

use crate::rules::Position;

pub const MOBILITY_WEIGHT: i32 = 2;
pub const CHECK_WEIGHT: i32 = 20;

pub fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 100,
        Piece::Knight => 320,
        Piece::Bishop => 330,
        Piece::Rook => 500,
        Piece::Queen => 900,
        Piece::King => 0,
    }
}

/// White-relative material balance.
pub fn material(position: &Position) -> i32 {
    let board = position.board();
    ALL_PIECES
        .iter()
        .map(|&piece| {
            let pieces = board.pieces(piece);
            let white = (*pieces & *board.color_combined(Color::White)).popcnt() as i32;
            let black = (*pieces & *board.color_combined(Color::Black)).popcnt() as i32;
            piece_value(piece) * (white - black)
        })
        .sum()
}

/// Score `position` for `perspective`: material, mobility of the side to
/// move and a check bonus. Positive favours `perspective`.
pub fn evaluate(position: &Position, perspective: Color) -> i32 {
    let mut score = match perspective {
        Color::White => material(position),
        Color::Black => -material(position),
    };

    let perspective_to_move = position.side_to_move() == perspective;
    let mobility = MOBILITY_WEIGHT * position.legal_move_count() as i32;
    if perspective_to_move {
        score += mobility;
    } else {
        score -= mobility;
    }

    // being in check is bad for the side to move
    if position.is_check() {
        if perspective_to_move {
            score -= CHECK_WEIGHT;
        } else {
            score += CHECK_WEIGHT;
        }
    }

    score
}
