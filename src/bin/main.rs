use std::net::SocketAddr;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use school_admin::app::{HttpSettings, create_app};
use school_admin::bootstrap::initialize_principal_user;
use school_admin::state::AppState;
use school_admin::utils::jwt::JwtManager;
use school_admin::{config::APP_CONFIG, utils::tracing::init_standard_tracing};
use sea_orm::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_standard_tracing(env!("CARGO_CRATE_NAME"));

    tracing::info!("Starting application...");

    let db_connection = Database::connect(APP_CONFIG.database_url.as_str())
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Running migrations...");
    Migrator::up(&db_connection, None)
        .await
        .context("Failed to run migrations")?;

    let state = AppState::with_database(
        db_connection,
        JwtManager::new(&APP_CONFIG.jwt_secret, APP_CONFIG.jwt_expiry_seconds),
        APP_CONFIG.teacher_defaults(),
        APP_CONFIG.app_env.clone(),
    );

    tracing::info!("Checking principal user...");
    if let Err(e) = initialize_principal_user(
        state.users.as_ref(),
        &APP_CONFIG.principal_email,
        &APP_CONFIG.principal_password,
        bcrypt::DEFAULT_COST,
    )
    .await
    {
        tracing::error!("Failed to initialize principal user: {:#}", e);
        tracing::warn!("Continuing without principal user initialization...");
    }

    let settings = HttpSettings {
        swagger_enabled: APP_CONFIG.swagger_enabled,
        cors_allowed_origins: APP_CONFIG.cors_allowed_origins.clone(),
    };
    let app = create_app(state, &settings);

    let http_address = format!("0.0.0.0:{}", APP_CONFIG.port);
    tracing::info!("HTTP server listening on {}", &http_address);

    let listener = tokio::net::TcpListener::bind(&http_address)
        .await
        .with_context(|| format!("Failed to bind {http_address}"))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("HTTP server failed")?;

    Ok(())
}
