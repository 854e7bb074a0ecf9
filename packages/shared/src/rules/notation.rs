use chess::{Board, BoardStatus, ChessMove, File, MoveGen, Piece, Rank, Square};

use crate::rules::errors::RulesError;

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Parse a coordinate square such as `e4`. Case-insensitive.
pub fn parse_square(text: &str) -> Result<Square, RulesError> {
    let lowered = text.trim().to_ascii_lowercase();
    let bytes = lowered.as_bytes();
    if bytes.len() != 2 || !(b'a'..=b'h').contains(&bytes[0]) || !(b'1'..=b'8').contains(&bytes[1]) {
        return Err(RulesError::InvalidSquare(text.to_string()));
    }
    Ok(Square::make_square(
        Rank::from_index((bytes[1] - b'1') as usize),
        File::from_index((bytes[0] - b'a') as usize),
    ))
}

pub fn parse_promotion(text: &str) -> Result<Piece, RulesError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "q" => Ok(Piece::Queen),
        "r" => Ok(Piece::Rook),
        "b" => Ok(Piece::Bishop),
        "n" => Ok(Piece::Knight),
        _ => Err(RulesError::InvalidPromotion(text.to_string())),
    }
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

fn file_char(square: Square) -> char {
    (b'a' + square.get_file().to_index() as u8) as char
}

fn rank_char(square: Square) -> char {
    (b'1' + square.get_rank().to_index() as u8) as char
}

/// Coordinate notation: `{from}{to}{promotion?}`, e.g. `e7e8q`.
pub fn uci(mv: ChessMove) -> String {
    let mut text = format!("{}{}", mv.get_source(), mv.get_dest());
    if let Some(piece) = mv.get_promotion() {
        text.push(piece_letter(piece).to_ascii_lowercase());
    }
    text
}

/// Standard algebraic notation for a legal move on `board`, with `+`/`#` suffix.
pub fn san(board: &Board, mv: ChessMove) -> String {
    let source = mv.get_source();
    let dest = mv.get_dest();
    let piece = board.piece_on(source).unwrap_or(Piece::Pawn);
    let source_file = source.get_file().to_index();
    let dest_file = dest.get_file().to_index();

    let mut text = String::new();
    if piece == Piece::King && source_file.abs_diff(dest_file) == 2 {
        text.push_str(if dest_file > source_file { "O-O" } else { "O-O-O" });
    } else if piece == Piece::Pawn {
        if source_file != dest_file {
            text.push(file_char(source));
            text.push('x');
        }
        text.push_str(&dest.to_string());
        if let Some(promotion) = mv.get_promotion() {
            text.push('=');
            text.push(piece_letter(promotion));
        }
    } else {
        text.push(piece_letter(piece));
        text.push_str(&disambiguator(board, mv, piece));
        if board.piece_on(dest).is_some() {
            text.push('x');
        }
        text.push_str(&dest.to_string());
    }

    let after = board.make_move_new(mv);
    if after.status() == BoardStatus::Checkmate {
        text.push('#');
    } else if after.checkers().popcnt() > 0 {
        text.push('+');
    }
    text
}

// File first, rank when the file is shared, full square when both are.
fn disambiguator(board: &Board, mv: ChessMove, piece: Piece) -> String {
    let source = mv.get_source();
    let mut ambiguities = 0;
    let mut same_rank = 0;
    let mut same_file = 0;

    for other in MoveGen::new_legal(board) {
        let other_source = other.get_source();
        if other.get_dest() != mv.get_dest()
            || other_source == source
            || board.piece_on(other_source) != Some(piece)
        {
            continue;
        }
        ambiguities += 1;
        if other_source.get_rank() == source.get_rank() {
            same_rank += 1;
        }
        if other_source.get_file() == source.get_file() {
            same_file += 1;
        }
    }

    if ambiguities == 0 {
        String::new()
    } else if same_rank > 0 && same_file > 0 {
        source.to_string()
    } else if same_file > 0 {
        rank_char(source).to_string()
    } else {
        file_char(source).to_string()
    }
}

fn normalize_san(token: &str) -> String {
    token
        .trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'))
        .replace('=', "")
        .replace('0', "O")
}

/// Resolve a SAN token against the legal moves of `board`.
pub fn san_to_move(board: &Board, token: &str) -> Result<ChessMove, RulesError> {
    let wanted = normalize_san(token);
    MoveGen::new_legal(board)
        .find(|mv| normalize_san(&san(board, *mv)) == wanted)
        .ok_or_else(|| RulesError::UnknownSan(token.to_string()))
}

/// Split PGN movetext into SAN tokens, dropping tag pairs, comments,
/// move numbers, NAGs and result markers.
pub fn movetext_tokens(text: &str) -> Vec<String> {
    let mut cleaned = String::with_capacity(text.len());
    for line in text.lines() {
        if line.trim_start().starts_with('[') {
            continue;
        }
        let mut in_comment = false;
        for c in line.chars() {
            match c {
                '{' => in_comment = true,
                '}' => in_comment = false,
                ';' if !in_comment => break,
                _ if in_comment => {}
                _ => cleaned.push(c),
            }
        }
        cleaned.push(' ');
    }

    cleaned
        .split_whitespace()
        .filter(|token| !RESULT_TOKENS.contains(token) && !token.starts_with('$'))
        .filter_map(|token| {
            let san = token.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
            (!san.is_empty()).then(|| san.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn board(fen: &str) -> Board {
        Board::from_str(fen).unwrap()
    }

    fn mv(board: &Board, text: &str) -> ChessMove {
        let from = parse_square(&text[0..2]).unwrap();
        let to = parse_square(&text[2..4]).unwrap();
        let promotion = text.get(4..5).map(|p| parse_promotion(p).unwrap());
        let chess_move = ChessMove::new(from, to, promotion);
        assert!(
            MoveGen::new_legal(board).any(|m| m == chess_move),
            "{} is not legal",
            text
        );
        chess_move
    }

    #[rstest]
    #[case("e4", true)]
    #[case("A1", true)]
    #[case("h8", true)]
    #[case("i1", false)]
    #[case("e9", false)]
    #[case("e", false)]
    #[case("e44", false)]
    #[case("", false)]
    fn test_parse_square(#[case] text: &str, #[case] valid: bool) {
        assert_eq!(parse_square(text).is_ok(), valid);
    }

    #[test]
    fn test_parse_square_value() {
        assert_eq!(parse_square("e4").unwrap(), Square::E4);
        assert_eq!(parse_square("A8").unwrap(), Square::A8);
    }

    #[rstest]
    #[case("q", Some(Piece::Queen))]
    #[case("R", Some(Piece::Rook))]
    #[case("b", Some(Piece::Bishop))]
    #[case("n", Some(Piece::Knight))]
    #[case("k", None)]
    #[case("queen", None)]
    fn test_parse_promotion(#[case] text: &str, #[case] expected: Option<Piece>) {
        assert_eq!(parse_promotion(text).ok(), expected);
    }

    #[rstest]
    #[case::pawn_push("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", "e2e4", "e4")]
    #[case::knight("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", "g1f3", "Nf3")]
    #[case::pawn_capture("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2", "e4d5", "exd5")]
    #[case::piece_capture("rnbqkbnr/ppp1pppp/8/8/4Q3/8/PPPP1PPP/RNB1KBNR w KQkq - 0 3", "e4e7", "Qxe7+")]
    #[case::kingside_castle("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1g1", "O-O")]
    #[case::queenside_castle("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1", "e8c8", "O-O-O")]
    #[case::promotion("8/P6k/8/8/8/8/8/K7 w - - 0 1", "a7a8q", "a8=Q")]
    #[case::under_promotion("8/P6k/8/8/8/8/8/K7 w - - 0 1", "a7a8n", "a8=N")]
    #[case::file_disambiguation("4k3/8/8/8/8/8/8/1N1NK3 w - - 0 1", "b1c3", "Nbc3")]
    #[case::rank_disambiguation("4k3/8/8/8/8/R7/8/R3K3 w - - 0 1", "a1a2", "R1a2")]
    #[case::square_disambiguation("4k3/8/8/8/8/Q7/8/Q1Q4K w - - 0 1", "a1b2", "Qa1b2")]
    #[case::mate("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2", "d8h4", "Qh4#")]
    fn test_san(#[case] fen: &str, #[case] uci_move: &str, #[case] expected: &str) {
        let board = board(fen);
        let chess_move = mv(&board, uci_move);
        assert_eq!(san(&board, chess_move), expected);
    }

    #[test]
    fn test_uci_includes_promotion_letter() {
        let board = board("8/P6k/8/8/8/8/8/K7 w - - 0 1");
        assert_eq!(uci(mv(&board, "a7a8q")), "a7a8q");
        assert_eq!(uci(mv(&board, "a1b1")), "a1b1");
    }

    #[test]
    fn test_san_to_move_accepts_annotations_and_zero_castling() {
        let board = board("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castle = san_to_move(&board, "0-0").unwrap();
        assert_eq!(castle, mv(&board, "e1g1"));
        let check = san_to_move(&board, "Rxa8+!?").unwrap();
        assert_eq!(check, mv(&board, "a1a8"));
    }

    #[test]
    fn test_san_to_move_rejects_unknown() {
        let board = Board::default();
        assert_eq!(
            san_to_move(&board, "e5"),
            Err(RulesError::UnknownSan("e5".to_string()))
        );
    }

    #[test]
    fn test_movetext_tokens() {
        let text = "[Event \"Casual\"]\n[Result \"0-1\"]\n\n1. f3 e5 {a blunder follows} 2.g4 $4 Qh4# 0-1";
        assert_eq!(movetext_tokens(text), vec!["f3", "e5", "g4", "Qh4#"]);
    }

    #[test]
    fn test_movetext_tokens_black_to_start() {
        assert_eq!(movetext_tokens("1... e5 2. Nf3"), vec!["e5", "Nf3"]);
        assert!(movetext_tokens("").is_empty());
    }
}
