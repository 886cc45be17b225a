//! Statement batches and their results
//!
//! Queries are opaque Cypher strings; nothing here parses them.

pub mod result;
pub mod statement;

pub use result::{ResultSet, Row, RowShape, Value};
pub use statement::{Batch, Statement};
