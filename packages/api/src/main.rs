use std::env::set_var;
use std::sync::Arc;

use api::config::{Config, StorageBackend};
use api::state::AppState;
use lambda_http::{run, tracing, Error};
use shared::repositories::game_repository::{DynamoDbGameRepository, GameRepository};
use shared::repositories::in_memory_game_repository::InMemoryGameRepository;

#[tokio::main]
async fn main() -> Result<(), Error> {
    set_var("AWS_LAMBDA_HTTP_IGNORE_STAGE_IN_PATH", "true");

    // required to enable CloudWatch error logging by the runtime
    tracing::init_default_subscriber();

    let config = Config::from_env()?;

    let repository: Arc<dyn GameRepository + Send + Sync> = match config.storage {
        StorageBackend::DynamoDb => {
            let aws_config = aws_config::load_from_env().await;
            let client = aws_sdk_dynamodb::Client::new(&aws_config);
            Arc::new(DynamoDbGameRepository::new(client, config.games_table.clone()))
        }
        StorageBackend::Memory => Arc::new(InMemoryGameRepository::new()),
    };

    let app = api::create_app(AppState::new(repository));

    if config.lambda {
        run(app).await
    } else {
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, app).await?;
        Ok(())
    }
}
