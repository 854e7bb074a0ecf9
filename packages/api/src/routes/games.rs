use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use lambda_http::tracing::debug;
use shared::models::game::Game;
use shared::models::requests::{
    CreateGameRequest, ExportFormat, ExportQuery, ListGamesQuery, MoveRequest,
};
use shared::models::responses::{GameExport, GameResponse, Page};

use crate::{error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/chess/games", post(create_game).get(list_games))
        .route("/api/chess/games/{id}", get(get_game))
        .route("/api/chess/games/{id}/move", post(make_move))
        .route("/api/chess/games/{id}/pgn", get(export_game))
}

async fn create_game(
    State(state): State<AppState>,
    payload: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GameResponse>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let game = state.game_service.create_game(&request).await?;
    debug!("Game created: {}", game.id);
    Ok((StatusCode::CREATED, Json(GameResponse { game })))
}

async fn list_games(
    State(state): State<AppState>,
    query: Result<Query<ListGamesQuery>, QueryRejection>,
) -> Result<Json<Page<Game>>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let page = state
        .game_service
        .list_games(query.page, query.limit)
        .await?;
    Ok(Json(page))
}

async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = state.game_service.get_game(&id).await?;
    Ok(Json(GameResponse { game }))
}

async fn make_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<GameResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let game = state.game_service.make_move(&id, &request).await?;
    debug!("Move {}{} applied to game {}", request.from, request.to, id);
    Ok(Json(GameResponse { game }))
}

async fn export_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let format = match query.format.as_deref() {
        Some(format) => format.parse::<ExportFormat>()?,
        None => ExportFormat::default(),
    };

    let response = match state.game_service.export_game(&id, format).await? {
        GameExport::Text(pgn) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            pgn,
        )
            .into_response(),
        GameExport::Json(body) => Json(body).into_response(),
    };
    Ok(response)
}
