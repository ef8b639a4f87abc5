//! FieldProof API Server
//!
//! Backend for the FieldProof compliance workflow:
//! - Photo analysis and recheck endpoints (vision inference + scoring)
//! - Analysis history, dashboard metrics, credential summary
//! - Knowledge library retrieval

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod handlers;
mod inference;
mod knowledge;
mod models;
mod state;
mod store;
#[cfg(test)]
mod tests;

use inference::HttpInferenceClient;
use state::AppState;

/// Command-line arguments for the FieldProof API server
#[derive(Parser, Debug)]
#[command(name = "fieldproof-api")]
#[command(about = "FieldProof compliance analysis API server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Sqlite database URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Base URL of the vision inference service
    #[arg(long, env = "INFERENCE_URL", default_value = "http://localhost:8500")]
    inference_url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Analysis lifecycle
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/recheck", post(handlers::recheck))
        .route("/api/analyses", get(handlers::list_analyses))
        .route("/api/analyses/:id", get(handlers::get_analysis))
        .route("/api/analyses/:id/clips", get(handlers::analysis_clips))
        // Derived reads
        .route("/api/dashboard", get(handlers::dashboard))
        .route("/api/credential", get(handlers::credential))
        // Profile
        .route(
            "/api/profile",
            get(handlers::get_profile).put(handlers::put_profile),
        )
        // Knowledge library
        .route("/api/knowledge", get(handlers::knowledge))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Initializing FieldProof API...");
    let inference = Arc::new(HttpInferenceClient::new(args.inference_url.clone()));
    let state = Arc::new(AppState::new(args.database_url.clone(), inference).await?);

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("FieldProof API listening on http://{}", addr);
    info!("Inference endpoint: {}", args.inference_url);

    axum::serve(listener, app).await?;

    Ok(())
}
