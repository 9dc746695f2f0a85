mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use parlor_api::AppStateInner;
use parlor_directory::{ChatDirectory, DirectoryUser, StreamDirectory};
use parlor_types::models::{BOT_DISPLAY_NAME, BOT_USER_ID};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parlor=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Process-wide clients, built once and shared through app state
    let db = parlor_db::Database::open(&config.db_path)?;
    let http = reqwest::Client::builder()
        .user_agent(concat!("parlor/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let directory: Arc<dyn ChatDirectory> = Arc::new(StreamDirectory::new(
        http.clone(),
        &config.stream_base_url,
        &config.stream_api_key,
        &config.stream_api_secret,
    )?);
    let ai = parlor_ai::build_replier(config.ai.clone(), http);
    info!("AI replies via {}", ai.provider());

    // The bot has to exist in the directory before it can author mirror messages.
    let bot = DirectoryUser {
        id: BOT_USER_ID.into(),
        name: Some(BOT_DISPLAY_NAME.into()),
        email: None,
    };
    if let Err(e) = directory.upsert_user(&bot).await {
        warn!("Could not register {} in the chat directory: {}", BOT_USER_ID, e);
    }

    let state = AppStateInner::new(db, directory, ai);

    let app = parlor_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr()?;
    info!("Parlor server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!("SIGTERM handler unavailable: {}", e);
                    ctrl_c.await.ok();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
