#[derive(Debug)]
pub enum GameRepositoryError {
    AlreadyExists,
    Conflict,
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for GameRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameRepositoryError::AlreadyExists => write!(f, "Game already exists"),
            GameRepositoryError::Conflict => {
                write!(f, "Game was modified by another request")
            }
            GameRepositoryError::Serialization(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            GameRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for GameRepositoryError {}
