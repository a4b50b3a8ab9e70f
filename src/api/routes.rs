//! API Routes
//!
//! Configures the Axum router with all cache daemon endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clean_handler, clear_handler, get_entry_handler, health_handler, list_types_handler,
    put_entry_handler, reduce_pressure_handler, register_type_handler, set_min_age_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /entries` - Add or update a document
/// - `GET /entries/:key` - Look a document up by key
/// - `DELETE /entries` - Clear the cache
/// - `GET /types` - List registered policies
/// - `PUT /types/:type` - Register or replace a policy
/// - `PUT /min-age` - Change the minimum age for pressure passes
/// - `POST /maintenance/reduce-pressure` - Run a pressure pass now
/// - `POST /maintenance/clean` - Run an expiry pass now
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/entries", put(put_entry_handler).delete(clear_handler))
        .route("/entries/:key", get(get_entry_handler))
        .route("/types", get(list_types_handler))
        .route("/types/:type", put(register_type_handler))
        .route("/min-age", put(set_min_age_handler))
        .route("/maintenance/reduce-pressure", post(reduce_pressure_handler))
        .route("/maintenance/clean", post(clean_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
