//! Request and Response models for the cache daemon API
//!
//! Defines the cached document type and the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod document;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use document::Document;
pub use requests::{MinAgeRequest, PutEntryRequest, RegisterTypeRequest};
pub use responses::{
    ClearResponse, ErrorResponse, HealthResponse, MinAgeResponse, PoliciesResponse, PolicyView,
    PutEntryResponse, StatsResponse, SweepResponse,
};
