use std::fmt;

pub const DEFAULT_GAMES_TABLE: &str = "games";
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    DynamoDb,
}

/// Process settings, read once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage: StorageBackend,
    pub games_table: String,
    pub port: u16,
    /// Running inside the Lambda runtime rather than as a local server.
    pub lambda: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidStorage(String),
    InvalidPort(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::InvalidStorage(value) => write!(
                f,
                "GAMES_STORAGE must be 'memory' or 'dynamodb', got '{}'",
                value
            ),
            ConfigError::InvalidPort(value) => write!(f, "PORT is not a valid port: '{}'", value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("GAMES_STORAGE") {
            None => StorageBackend::Memory,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "" | "memory" => StorageBackend::Memory,
                "dynamodb" => StorageBackend::DynamoDb,
                _ => return Err(ConfigError::InvalidStorage(value)),
            },
        };

        let games_table = lookup("GAMES_TABLE")
            .filter(|table| !table.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GAMES_TABLE.to_string());

        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value.clone()))?,
        };

        Ok(Config {
            storage,
            games_table,
            port,
            lambda: lookup("AWS_LAMBDA_RUNTIME_API").is_some(),
        })
    }
}
