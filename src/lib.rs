//! cypher-tx — transactional Cypher client for HTTP graph databases
//!
//! Talks to the HTTP transactional endpoint (`/db/data/transaction`):
//!
//! - **`Transaction`** — server-driven state machine (`open`, `pending`,
//!   `committed`, `rolled back`) with a single-flight guard: one request in
//!   flight per transaction, extra calls rejected rather than queued.
//! - **`protocol::classify`** — maps endpoint error codes to `ClientError`,
//!   `DatabaseError` or `TransientError` and decides whether the failure
//!   destroys the transaction.
//! - **`graph::serializer`** — flattens nested property bags into dotted
//!   keys for parameters, and rebuilds them.
//! - **`graph`** — `Node` / `Relationship` values parsed from raw result
//!   payloads; malformed payloads parse to `None`.
//!
//! # Example
//!
//! ```no_run
//! use cypher_tx::{ClientConfig, GraphDatabase, Statement};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = GraphDatabase::new(&ClientConfig::new("http://localhost:7474"))?;
//!     let tx = db.begin_transaction();
//!
//!     tx.cypher(Statement::new("CREATE (n:Person {name: $name})").param("name", "Alice"))
//!         .await?;
//!     let mut results = tx
//!         .cypher(Statement::new("MATCH (n:Person) RETURN n").commit(true))
//!         .await?;
//!
//!     for row in results.remove(0) {
//!         println!("{:?}", row.get("n"));
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod protocol;
pub mod query;
pub mod transaction;

// Re-export main types for convenience
pub use client::GraphDatabase;
pub use config::ClientConfig;
pub use error::{BatchError, CypherResult, Error};
pub use graph::{
    GraphEntity, Label, Node, NodeId, PropertyBag, PropertyValue, Relationship, RelationshipId,
    RelationshipType,
};
pub use protocol::{ErrorKind, HttpEndpoint, QueryContext, ServerError, TransactionEndpoint};
pub use query::{Batch, ResultSet, Row, Statement, Value};
pub use transaction::{Renewal, Transaction, TransactionState};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
