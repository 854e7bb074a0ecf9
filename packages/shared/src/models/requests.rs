use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::errors::ParseError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub difficulty: Option<String>,
    pub player_color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    pub promotion: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListGamesQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    #[default]
    Json,
}

impl FromStr for ExportFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(ExportFormat::Text),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ParseError::InvalidExportFormat(s.to_string())),
        }
    }
}
