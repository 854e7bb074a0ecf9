use crate::models::errors::ParseError;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::rules::RulesError;

#[derive(Debug)]
pub enum GameServiceError {
    InvalidInput(String),
    GameNotFound,
    GameAlreadyFinished,
    WrongTurn,
    IllegalMove(String),
    EngineFailure(String),
    Conflict,
    RepositoryError(GameRepositoryError),
}

impl std::fmt::Display for GameServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameServiceError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            GameServiceError::GameNotFound => write!(f, "Game not found"),
            GameServiceError::GameAlreadyFinished => write!(f, "Game is already finished"),
            GameServiceError::WrongTurn => write!(f, "It is not your turn"),
            GameServiceError::IllegalMove(mv) => write!(f, "Illegal move: {}", mv),
            GameServiceError::EngineFailure(msg) => write!(f, "Engine failure: {}", msg),
            GameServiceError::Conflict => {
                write!(f, "Game was modified concurrently, reload and retry")
            }
            GameServiceError::RepositoryError(err) => write!(f, "Repository error: {}", err),
        }
    }
}

impl std::error::Error for GameServiceError {}

impl From<GameRepositoryError> for GameServiceError {
    fn from(err: GameRepositoryError) -> Self {
        match err {
            GameRepositoryError::Conflict => GameServiceError::Conflict,
            other => GameServiceError::RepositoryError(other),
        }
    }
}

impl From<ParseError> for GameServiceError {
    fn from(err: ParseError) -> Self {
        GameServiceError::InvalidInput(err.to_string())
    }
}

impl From<RulesError> for GameServiceError {
    fn from(err: RulesError) -> Self {
        match err {
            RulesError::InvalidSquare(_) | RulesError::InvalidPromotion(_) => {
                GameServiceError::InvalidInput(err.to_string())
            }
            RulesError::IllegalMove(mv) => GameServiceError::IllegalMove(mv),
            RulesError::InvalidFen(_) | RulesError::UnknownSan(_) => {
                GameServiceError::EngineFailure(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_become_invalid_input() {
        let err = GameServiceError::from(ParseError::InvalidExportFormat("xml".to_string()));
        match err {
            GameServiceError::InvalidInput(msg) => assert_eq!(msg, "unknown export format 'xml'"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_difficulty_keeps_its_value() {
        let err = GameServiceError::from(ParseError::UnsupportedDifficulty("hard".to_string()));
        assert!(matches!(err, GameServiceError::InvalidInput(msg) if msg.contains("'hard'")));
    }
}
