use anyhow::{Context, Result};
use std::sync::Arc;
use team_poker::config::Config;
use team_poker::http::{router, AppState};
use team_poker::service::PokerService;
use team_poker::store::MemoryRoomStore;
use team_poker::subject::SubjectCatalog;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,team_poker=debug,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Team Poker server");

    let config = Config::from_env().context("Failed to load configuration")?;
    let subjects = SubjectCatalog::bundled().context("Failed to parse bundled subjects")?;
    tracing::info!(
        subjects = subjects.len(),
        policy = ?config.service.join_policy,
        "Configuration loaded"
    );

    let service = PokerService::new(
        Arc::new(MemoryRoomStore::new()),
        subjects,
        config.service.clone(),
    );
    let app = router(AppState::new(service));

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
