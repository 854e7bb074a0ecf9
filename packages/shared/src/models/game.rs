use std::fmt;
use std::str::FromStr;

use chess::Color;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::errors::ParseError;
use crate::rules::{Outcome, STARTING_FEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    White,
    Black,
}

impl PlayerColor {
    pub fn opposite(self) -> Self {
        match self {
            PlayerColor::White => PlayerColor::Black,
            PlayerColor::Black => PlayerColor::White,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerColor::White => "white",
            PlayerColor::Black => "black",
        }
    }
}

impl fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayerColor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => Ok(PlayerColor::White),
            "black" => Ok(PlayerColor::Black),
            _ => Err(ParseError::InvalidPlayerColor(s.to_string())),
        }
    }
}

impl From<PlayerColor> for Color {
    fn from(color: PlayerColor) -> Self {
        match color {
            PlayerColor::White => Color::White,
            PlayerColor::Black => Color::Black,
        }
    }
}

impl From<Color> for PlayerColor {
    fn from(color: Color) -> Self {
        match color {
            Color::White => PlayerColor::White,
            Color::Black => PlayerColor::Black,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Medium,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Medium => "medium",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "medium" => Ok(Difficulty::Medium),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(ParseError::UnsupportedDifficulty(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "1/2-1/2")]
    Draw,
}

impl GameResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }
}

impl From<Outcome> for GameResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Checkmate {
                winner: Color::White,
            } => GameResult::WhiteWins,
            Outcome::Checkmate {
                winner: Color::Black,
            } => GameResult::BlackWins,
            Outcome::Draw => GameResult::Draw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mover {
    Human,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub san: String,
    pub uci: String,
    pub by: Mover,
}

/// A human-versus-computer game as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub player_color: PlayerColor,
    pub difficulty: Difficulty,
    pub status: GameStatus,
    pub moves: Vec<MoveRecord>,
    pub fen: String,
    pub pgn: String,
    pub result: Option<GameResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub started_fen: String,
    pub version: u64,
}

impl Game {
    pub fn new(difficulty: Difficulty, player_color: PlayerColor, started_at: DateTime<Utc>) -> Self {
        Game {
            id: Uuid::new_v4().to_string(),
            player_color,
            difficulty,
            status: GameStatus::InProgress,
            moves: Vec::new(),
            fen: STARTING_FEN.to_string(),
            pgn: String::new(),
            result: None,
            started_at,
            finished_at: None,
            started_fen: STARTING_FEN.to_string(),
            version: 0,
        }
    }

    pub fn ai_color(&self) -> PlayerColor {
        self.player_color.opposite()
    }

    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }
}
