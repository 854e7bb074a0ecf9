use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, warn};

use crate::models::game::{Difficulty, Game, PlayerColor};
use crate::models::requests::{CreateGameRequest, ExportFormat, MoveRequest};
use crate::models::responses::{GameExport, Page};
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::game_repository::GameRepository;
use crate::services::arbitration::{self, MoveInput};
use crate::services::errors::game_service_errors::GameServiceError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

pub struct GameService {
    repository: Arc<dyn GameRepository + Send + Sync>,
}

impl GameService {
    pub fn new(repository: Arc<dyn GameRepository + Send + Sync>) -> Self {
        GameService { repository }
    }

    pub async fn create_game(&self, request: &CreateGameRequest) -> Result<Game, GameServiceError> {
        let difficulty: Difficulty = request
            .difficulty
            .as_deref()
            .ok_or_else(|| {
                rejected(GameServiceError::InvalidInput(
                    "difficulty is required".to_string(),
                ))
            })?
            .parse()
            .map_err(|e| rejected(GameServiceError::from(e)))?;
        let player_color = match request.player_color.as_deref() {
            Some(color) => color
                .parse::<PlayerColor>()
                .map_err(|e| rejected(GameServiceError::from(e)))?,
            None => PlayerColor::White,
        };

        let game = run_blocking(move || {
            let mut rng = StdRng::from_entropy();
            arbitration::start_game(difficulty, player_color, Utc::now(), &mut rng)
        })
        .await
        .map_err(rejected)?;

        self.repository.create_game(&game).await.map_err(|e| {
            error!("Failed to store new game {}: {}", game.id, e);
            GameServiceError::from(e)
        })?;

        info!(
            "Created {} game {} with human playing {}",
            difficulty, game.id, player_color
        );
        Ok(game)
    }

    pub async fn get_game(&self, id: &str) -> Result<Game, GameServiceError> {
        if id.trim().is_empty() {
            return Err(GameServiceError::InvalidInput(
                "Game ID cannot be empty".to_string(),
            ));
        }
        self.repository
            .get_game(id)
            .await
            .map_err(|e| {
                error!("Failed to load game {}: {}", id, e);
                GameServiceError::from(e)
            })?
            .ok_or(GameServiceError::GameNotFound)
    }

    pub async fn list_games(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Page<Game>, GameServiceError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if page == 0 {
            return Err(rejected(GameServiceError::InvalidInput(
                "page must be at least 1".to_string(),
            )));
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(rejected(GameServiceError::InvalidInput(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            ))));
        }

        let (items, total) = self.repository.list_games(page, limit).await.map_err(|e| {
            error!("Failed to list games: {}", e);
            GameServiceError::from(e)
        })?;

        Ok(Page {
            items,
            total,
            page,
            limit,
        })
    }

    /// Apply the human move and the computer's reply in a single write.
    pub async fn make_move(&self, id: &str, request: &MoveRequest) -> Result<Game, GameServiceError> {
        if request.from.trim().is_empty() || request.to.trim().is_empty() {
            return Err(rejected(GameServiceError::InvalidInput(
                "from and to squares are required".to_string(),
            )));
        }

        let game = self.get_game(id).await?;
        let expected_version = game.version;
        let input = MoveInput::from(request);

        let next = run_blocking(move || {
            let mut rng = StdRng::from_entropy();
            arbitration::apply_human_move(&game, &input, Utc::now(), &mut rng)
        })
        .await
        .map_err(rejected)?;

        self.repository
            .update_game(&next, expected_version)
            .await
            .map_err(|e| {
                match &e {
                    GameRepositoryError::Conflict => {
                        warn!("Game {} changed since version {}", id, expected_version)
                    }
                    _ => error!("Failed to store game {}: {}", id, e),
                }
                GameServiceError::from(e)
            })?;

        match next.result {
            Some(result) => info!("Game {} finished {}", next.id, result.as_str()),
            None => info!("Game {} now at {} moves", next.id, next.moves.len()),
        }
        Ok(next)
    }

    pub async fn export_game(
        &self,
        id: &str,
        format: ExportFormat,
    ) -> Result<GameExport, GameServiceError> {
        let game = self.get_game(id).await?;
        Ok(arbitration::export_game(&game, format))
    }
}

fn rejected(err: GameServiceError) -> GameServiceError {
    match &err {
        GameServiceError::EngineFailure(msg) => error!("Engine failure: {}", msg),
        other => warn!("Rejected request: {}", other),
    }
    err
}

async fn run_blocking<T, F>(task: F) -> Result<T, GameServiceError>
where
    F: FnOnce() -> Result<T, GameServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| GameServiceError::EngineFailure(format!("engine task failed: {}", e)))?
}
