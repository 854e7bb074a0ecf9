pub mod errors;
pub mod game_repository;
pub mod in_memory_game_repository;

pub use game_repository::{DynamoDbGameRepository, GameRepository};
pub use in_memory_game_repository::InMemoryGameRepository;
