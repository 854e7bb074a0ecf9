use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::models::errors::ParseError;
use shared::services::errors::game_service_errors::GameServiceError;

#[derive(Debug)]
pub enum ApiError {
    GameService(GameServiceError),
    BadRequest(String),
}

impl From<GameServiceError> for ApiError {
    fn from(error: GameServiceError) -> Self {
        ApiError::GameService(error)
    }
}

impl From<ParseError> for ApiError {
    fn from(error: ParseError) -> Self {
        ApiError::GameService(GameServiceError::from(error))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::GameService(err) => write!(f, "{}", err),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::GameService(
                GameServiceError::InvalidInput(_)
                | GameServiceError::GameAlreadyFinished
                | GameServiceError::WrongTurn
                | GameServiceError::IllegalMove(_),
            ) => StatusCode::BAD_REQUEST,
            ApiError::GameService(GameServiceError::GameNotFound) => StatusCode::NOT_FOUND,
            ApiError::GameService(GameServiceError::Conflict) => StatusCode::CONFLICT,
            ApiError::GameService(
                GameServiceError::EngineFailure(_) | GameServiceError::RepositoryError(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
