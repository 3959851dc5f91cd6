mod config;
mod db;
mod errors;
mod gaps;
mod intelligence;
mod llm_client;
mod matching;
mod models;
mod routes;
mod state;
mod taxonomy;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::taxonomy::client::OnetClient;
use crate::taxonomy::filters::DenyList;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillSync API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize the O*NET taxonomy client
    let taxonomy = Arc::new(OnetClient::new(
        config.onet_username.clone(),
        config.onet_password.clone(),
    ));
    info!("Taxonomy client initialized");

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_model.clone());
    info!("LLM client initialized (model: {})", llm.model());

    // Load the assessability deny-list (bundled, or override via SKILL_DENYLIST_PATH)
    let denylist = Arc::new(DenyList::load(config.denylist_path.as_deref())?);
    info!("Skill deny-list loaded ({} names)", denylist.len());

    // Build app state
    let state = AppState {
        db,
        taxonomy,
        llm,
        denylist,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
