//! Wire protocol of the HTTP transactional Cypher endpoint
//!
//! - `wire`: request/response bodies
//! - `classify`: error taxonomy and fatality policy
//! - `endpoint`: transport seam used by transactions
//! - `http`: reqwest implementation of that seam

pub mod classify;
pub mod endpoint;
pub mod http;
pub mod wire;

// Re-export main types
pub use classify::{classify, ErrorKind, QueryContext, ServerError};
pub use endpoint::TransactionEndpoint;
pub use http::HttpEndpoint;
pub use wire::{EndpointResponse, RawError, RequestBody, ResponseBody};
