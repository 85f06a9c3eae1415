//! Avishkar Backend
//!
//! Main application entry point

use std::net::SocketAddr;

use tracing::info;

use avishkar::{
    config::Settings,
    database::{connection, DatabaseService},
    handlers,
    services::ServiceFactory,
    state::AppState,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _logging_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", avishkar::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = connection::create_pool(&settings.database).await?;

    info!("Running database migrations...");
    connection::run_migrations(&pool).await?;

    let db = DatabaseService::new(pool.clone());

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(settings.clone(), db.clone())?;

    let health = services.health_check().await;
    if !health.is_healthy() {
        for issue in health.get_issues() {
            tracing::warn!(issue = %issue, "Service degraded at startup");
        }
    }

    // Build the router and serve
    let state = AppState::new(settings.clone(), pool, db, services);
    let app = handlers::build_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(address = %listener.local_addr()?, "Avishkar backend listening");
    axum::serve(listener, app).await?;

    Ok(())
}
