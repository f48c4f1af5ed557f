//! User service: CRUD over the `users` table.

use std::process::ExitCode;
use std::sync::Arc;

use microsuite::config::{self, Environment, UserServiceConfig};
use microsuite::lifecycle::{startup, StartupError};
use microsuite::observability::logging;
use microsuite::users::{self, store, PgUserRepository, UserStore};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match config::load_user_service_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init(users::SERVICE_NAME, &Environment::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    logging::init(users::SERVICE_NAME, &config.environment);

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "User service failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: UserServiceConfig) -> Result<(), StartupError> {
    tracing::info!(
        port = config.listener.port,
        database = ?config.database,
        environment = %config.environment,
        "Configuration loaded"
    );

    let pool = store::connect(&config.database).await?;
    store::run_migrations(&pool).await?;

    let repo = Arc::new(PgUserRepository::new(UserStore::new(pool.clone())));
    let app = users::build_app(repo);

    let result = startup::serve(&config.listener, config.shutdown_grace, app).await;
    pool.close().await;
    result
}
