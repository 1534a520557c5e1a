mod config;
mod corpus;
mod db;
mod errors;
mod matching;
mod models;
mod routes;
mod routine;
mod state;
mod store;
mod tracking;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::corpus::loader::load_corpus;
use crate::corpus::source::HttpProtocolSource;
use crate::db::create_pool;
use crate::matching::scoring::KeywordSectionMatcher;
use crate::routes::build_router;
use crate::routine::template::RoutineTemplate;
use crate::state::AppState;
use crate::store::postgres::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Routine API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(db));

    // Load the protocol corpus once; an unreachable page leaves it empty
    let source = HttpProtocolSource::new(config.protocol_url.clone(), config.fetch_policy())?;
    let corpus = load_corpus(store.as_ref(), &source, &config.protocol_url).await;
    if corpus.is_empty() {
        warn!("Protocol corpus is empty; routines will use default anchors");
    } else {
        info!("Protocol corpus ready ({} sections)", corpus.len());
    }

    let template = match &config.routine_template_path {
        Some(path) => {
            info!("Loading routine template from {path}");
            RoutineTemplate::from_file(path)?
        }
        None => RoutineTemplate::default(),
    };

    // Build app state
    let state = AppState {
        store,
        corpus,
        matcher: Arc::new(KeywordSectionMatcher),
        template: Arc::new(template),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the questionnaire frontend

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
