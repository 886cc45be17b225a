//! GraphDatabase — entry point owning the shared connection

use std::sync::Arc;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{BatchError, CypherResult, Error};
use crate::protocol::classify::classify;
use crate::protocol::endpoint::TransactionEndpoint;
use crate::protocol::http::HttpEndpoint;
use crate::query::{Batch, ResultSet};
use crate::transaction::Transaction;

/// Transport plus the URLs derived from configuration.
///
/// Shared by every transaction created from the same client.
pub(crate) struct Connection {
    pub(crate) endpoint: Arc<dyn TransactionEndpoint>,
    pub(crate) begin_url: String,
    pub(crate) begin_and_commit_url: String,
}

/// Client for a remote graph database.
///
/// Cheap to clone; clones share one connection.
#[derive(Clone)]
pub struct GraphDatabase {
    connection: Arc<Connection>,
}

impl GraphDatabase {
    /// Create a client that talks HTTP to `config.base_url`.
    ///
    /// # Example
    /// ```no_run
    /// # use cypher_tx::{ClientConfig, GraphDatabase};
    /// let db = GraphDatabase::new(&ClientConfig::new("http://localhost:7474")).unwrap();
    /// ```
    pub fn new(config: &ClientConfig) -> CypherResult<Self> {
        let endpoint = HttpEndpoint::new(config)?;
        Ok(Self::with_endpoint(config, Arc::new(endpoint)))
    }

    /// Create a client over any transport implementation
    pub fn with_endpoint(config: &ClientConfig, endpoint: Arc<dyn TransactionEndpoint>) -> Self {
        Self {
            connection: Arc::new(Connection {
                endpoint,
                begin_url: config.begin_url(),
                begin_and_commit_url: config.begin_and_commit_url(),
            }),
        }
    }

    /// Start a transaction. No request is sent until its first call.
    pub fn begin_transaction(&self) -> Transaction {
        Transaction::new(Arc::clone(&self.connection))
    }

    /// Run a batch in its own transaction, committed in the same request.
    pub async fn cypher(&self, batch: impl Into<Batch>) -> Result<Vec<ResultSet>, BatchError> {
        let batch = batch.into();
        let body = batch.to_request()?;
        let url = &self.connection.begin_and_commit_url;

        debug!("Running {} statements outside a transaction", batch.len());
        let response = self.connection.endpoint.post(url, &body).await?;
        let results = ResultSet::collect(&batch.shapes(), &response.body.results);

        match response.body.errors.first() {
            Some(raw) => Err(BatchError::new(Error::Server(classify(raw)), results)),
            None => Ok(results),
        }
    }
}
