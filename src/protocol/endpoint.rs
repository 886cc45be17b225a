//! TransactionEndpoint trait, the seam between transaction logic and transport

use async_trait::async_trait;
use crate::error::CypherResult;
use crate::protocol::wire::{EndpointResponse, RequestBody};

/// Remote resource accepting statement batches for a transaction.
///
/// Implemented by:
/// - `HttpEndpoint`, which talks HTTP via `reqwest`
/// - test doubles that script the server's answers
///
/// A response carrying error records is still `Ok`; `Err` is reserved for
/// failures where no decodable answer came back.
#[async_trait]
pub trait TransactionEndpoint: Send + Sync {
    /// POST a statement batch to a begin, transaction or commit URL
    async fn post(&self, url: &str, body: &RequestBody) -> CypherResult<EndpointResponse>;

    /// DELETE the transaction resource (rollback)
    async fn delete(&self, url: &str) -> CypherResult<EndpointResponse>;
}
