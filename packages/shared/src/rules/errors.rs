#[derive(Debug, Clone, PartialEq)]
pub enum RulesError {
    InvalidFen(String),
    InvalidSquare(String),
    InvalidPromotion(String),
    IllegalMove(String),
    UnknownSan(String),
}

impl std::fmt::Display for RulesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RulesError::InvalidFen(msg) => write!(f, "Invalid FEN: {}", msg),
            RulesError::InvalidSquare(square) => write!(f, "Invalid square: {}", square),
            RulesError::InvalidPromotion(piece) => write!(f, "Invalid promotion piece: {}", piece),
            RulesError::IllegalMove(mv) => write!(f, "Illegal move: {}", mv),
            RulesError::UnknownSan(san) => write!(f, "Move text does not match a legal move: {}", san),
        }
    }
}

impl std::error::Error for RulesError {}
