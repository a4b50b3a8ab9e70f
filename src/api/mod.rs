//! API Module
//!
//! HTTP handlers and routing exposing the document cache.
//!
//! # Endpoints
//! - `PUT /entries`, `GET /entries/:key`, `DELETE /entries` - entry operations
//! - `GET /types`, `PUT /types/:type` - policy table
//! - `PUT /min-age` - pressure pass safety valve
//! - `POST /maintenance/reduce-pressure`, `POST /maintenance/clean` - eviction passes
//! - `GET /stats`, `GET /health` - introspection

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
