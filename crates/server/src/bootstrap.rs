use std::sync::Arc;

use axum::Router;
use sellery_core::auth::tokens::TokenSigner;
use sellery_core::config::{AppConfig, ConfigError, LoadOptions};
use sellery_db::repositories::{SqlProductRepository, SqlUserRepository};
use sellery_db::{connect_with_settings, migrations, DbPool};
use sellery_titlegen::{CompletionError, GeminiClient, TitleGenerator};
use thiserror::Error;
use tracing::info;

use crate::{auth, health, products, titles};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub title_generator: Arc<TitleGenerator>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("completion client setup failed: {0}")]
    CompletionClient(#[source] CompletionError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let client = GeminiClient::from_config(&config.llm).map_err(BootstrapError::CompletionClient)?;
    let title_generator =
        Arc::new(TitleGenerator::new(Arc::new(client), config.listing.market.clone()));

    Ok(Application { config, db_pool, title_generator })
}

pub fn api_router(app: &Application) -> Router {
    let signer = TokenSigner::new(app.config.auth.token_secret.clone());

    let auth_state = auth::AuthState::new(
        Arc::new(SqlUserRepository::new(app.db_pool.clone())),
        signer.clone(),
        app.config.auth.token_ttl_hours,
    );
    let products_state = products::ProductsState::new(
        Arc::new(SqlProductRepository::new(app.db_pool.clone())),
        signer.clone(),
    );
    let titles_state = titles::TitlesState::new(app.title_generator.clone(), signer);

    Router::new()
        .merge(health::router(app.db_pool.clone()))
        .merge(auth::router(auth_state))
        .merge(products::router(products_state))
        .merge(titles::router(titles_state))
}
