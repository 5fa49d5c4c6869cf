use std::sync::Arc;

use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use daily_bugle::config::Config;
use daily_bugle::db::Database;
use daily_bugle::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "daily_bugle=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load("bugle.toml")?;
    info!(
        "Loaded {} categories from configuration",
        config.categories.len()
    );

    // Initialize database
    let database_url = std::env::var("DATABASE_URL").unwrap_or(config.database_url);
    let db = Database::new(&database_url).await?;
    db.initialize().await?;
    db.sync_categories(&config.categories).await?;
    info!(
        "Database initialized with {} articles",
        db.get_article_count().await?
    );

    let state = Arc::new(AppState { db: Arc::new(db) });

    // Build router
    let app = routes::router(state)
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Server starting on http://{}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
