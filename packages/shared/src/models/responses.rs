use serde::{Deserialize, Serialize};

use crate::models::game::Game;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GameResponse {
    pub game: Game,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameTextResponse {
    pub pgn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameExport {
    Text(String),
    Json(GameTextResponse),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::{Difficulty, PlayerColor};
    use chrono::Utc;

    #[test]
    fn test_game_response_wraps_game() {
        let game = Game::new(Difficulty::Beginner, PlayerColor::White, Utc::now());
        let value = serde_json::to_value(GameResponse { game: game.clone() }).unwrap();
        assert_eq!(value["game"]["id"], serde_json::json!(game.id));
    }

    #[test]
    fn test_page_shape() {
        let page = Page {
            items: vec![1, 2],
            total: 12,
            page: 2,
            limit: 2,
        };
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            serde_json::json!({"items": [1, 2], "total": 12, "page": 2, "limit": 2})
        );
    }
}
