mod handlers;

pub use handlers::{
    CoinDivination, DivineRequest, HexagramLines, InterpretRequest, LineRequest,
    LineTextResponse, RecordCastingInput, StatsResponse,
};

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::db::Database;
use crate::interpretation::IchingLibrary;
use crate::oracle::UpstreamClient;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub library: Arc<IchingLibrary>,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(db: Database, library: IchingLibrary, config: &Config) -> Self {
        Self {
            db,
            library: Arc::new(library),
            upstream: UpstreamClient::from_config(config),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Casting
        .route("/divine/coin", post(handlers::divine_coin))
        .route("/divine/hex/{code}", get(handlers::get_hexagram))
        .route("/divine/interpret", post(handlers::interpret))
        .route("/divine/line", post(handlers::line_text))
        // AI commentary
        .route("/ai", post(handlers::analyse))
        // Statistics
        .route("/stats", get(handlers::get_stats))
        .route("/stats", post(handlers::record_casting));

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
