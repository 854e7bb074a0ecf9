use std::sync::Arc;

use shared::repositories::game_repository::GameRepository;
use shared::services::game_service::GameService;

#[derive(Clone)]
pub struct AppState {
    pub game_service: Arc<GameService>,
}

impl AppState {
    pub fn new(repository: Arc<dyn GameRepository + Send + Sync>) -> Self {
        AppState {
            game_service: Arc::new(GameService::new(repository)),
        }
    }
}
