use std::cmp::Reverse;

use crate::models::game::Game;
use crate::repositories::errors::game_repository_errors::GameRepositoryError;
use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_attribute_value, to_item};

#[cfg(test)]
use mockall::automock;

pub struct DynamoDbGameRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbGameRepository {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError>;
    async fn get_game(&self, id: &str) -> Result<Option<Game>, GameRepositoryError>;
    /// Replace the stored game if its version is still `expected_version`.
    async fn update_game(&self, game: &Game, expected_version: u64)
        -> Result<(), GameRepositoryError>;
    /// Newest first. `page` is 1-based. Also returns the total number of games.
    async fn list_games(&self, page: u32, limit: u32)
        -> Result<(Vec<Game>, u64), GameRepositoryError>;
}

/// Sort newest first and cut out one page.
pub(crate) fn paginate(mut games: Vec<Game>, page: u32, limit: u32) -> (Vec<Game>, u64) {
    let total = games.len() as u64;
    games.sort_by_key(|game| (Reverse(game.started_at), game.id.clone()));
    let skip = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
    let items = games.into_iter().skip(skip).take(limit as usize).collect();
    (items, total)
}

#[async_trait]
impl GameRepository for DynamoDbGameRepository {
    async fn create_game(&self, game: &Game) -> Result<(), GameRepositoryError> {
        let item = to_item(game).map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(GameRepositoryError::AlreadyExists);
                    }
                }
                Err(GameRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn get_game(&self, id: &str) -> Result<Option<Game>, GameRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(
                "id",
                to_attribute_value(id)
                    .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await
            .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;

        match output.item {
            Some(item) => {
                let game: Game = from_item(item)
                    .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
                Ok(Some(game))
            }
            None => Ok(None),
        }
    }

    async fn update_game(
        &self,
        game: &Game,
        expected_version: u64,
    ) -> Result<(), GameRepositoryError> {
        let item = to_item(game).map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_exists(id) AND #version = :expected")
            .expression_attribute_names("#version", "version")
            .expression_attribute_values(
                ":expected",
                to_attribute_value(expected_version)
                    .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?,
            )
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if let SdkError::ServiceError(service_err) = &e {
                    if service_err.err().is_conditional_check_failed_exception() {
                        return Err(GameRepositoryError::Conflict);
                    }
                }
                Err(GameRepositoryError::DynamoDb(e.to_string()))
            }
        }
    }

    async fn list_games(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<Game>, u64), GameRepositoryError> {
        let mut games = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key)
                .send()
                .await
                .map_err(|e| GameRepositoryError::DynamoDb(e.to_string()))?;

            if let Some(items) = output.items {
                for item in items {
                    let game: Game = from_item(item)
                        .map_err(|e| GameRepositoryError::Serialization(e.to_string()))?;
                    games.push(game);
                }
            }

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(paginate(games, page, limit))
    }
}
