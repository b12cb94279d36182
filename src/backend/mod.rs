//! Client side of the external assistant service.
//!
//! Retrieval, ranking and ingestion all happen in the backend; this module
//! only speaks its two endpoints and knows where source documents live.

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{IndexStatus, IngestionStatus, QueryRequest, QueryResponse, SourceMatch};
