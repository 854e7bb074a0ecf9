/// Rejected text for one of the model enums.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnsupportedDifficulty(String),
    InvalidPlayerColor(String),
    InvalidExportFormat(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnsupportedDifficulty(value) => {
                write!(f, "unsupported difficulty '{}'", value)
            }
            ParseError::InvalidPlayerColor(value) => write!(f, "unknown player color '{}'", value),
            ParseError::InvalidExportFormat(value) => {
                write!(f, "unknown export format '{}'", value)
            }
        }
    }
}

impl std::error::Error for ParseError {}
