use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::game::Game;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use crate::repositories::game_repository::{paginate, GameRepository};

/// Process-local storage for local runs and tests.
#[derive(Default)]
pub struct InMemoryGameRepository {
    games: RwLock<HashMap<String, Game>>,
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let mut games = self.games.write().await;
        if games.contains_key(&game.id) {
            return Err(GameRepositoryError::AlreadyExists);
        }
        games.insert(game.id.clone(), game.clone());
        Ok(())
    }

    async fn get_game(&self, id: &str) -> Result<Option<Game>, GameRepositoryError> {
        Ok(self.games.read().await.get(id).cloned())
    }

    async fn update_game(
        &self,
        game: &Game,
        expected_version: u64,
    ) -> Result<(), GameRepositoryError> {
        let mut games = self.games.write().await;
        match games.get_mut(&game.id) {
            Some(stored) if stored.version == expected_version => {
                *stored = game.clone();
                Ok(())
            }
            _ => Err(GameRepositoryError::Conflict),
        }
    }

    async fn list_games(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Game>, u64), GameRepositoryError> {
        let games: Vec<Game> = self.games.read().await.values().cloned().collect();
        Ok(paginate(games, page, limit))
    }
}
