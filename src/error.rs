//! Error types for the transactional Cypher client

use crate::protocol::classify::{ErrorKind, ServerError};
use crate::query::ResultSet;
use thiserror::Error;

/// Errors that can occur when talking to the database
#[derive(Error, Debug)]
pub enum Error {
    /// Request rejected locally before reaching the network
    #[error("ClientError: {0}")]
    Client(String),

    /// Classified error reported by the endpoint
    #[error("{0}")]
    Server(ServerError),

    /// Property bag contains a value the wire encoding cannot carry
    #[error("Unsupported property type {type_name} at key '{key}'")]
    UnsupportedType { key: String, type_name: &'static str },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status without a decodable body
    #[error("Endpoint returned HTTP status {0}")]
    Status(u16),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response is missing something the protocol requires
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// Taxonomy kind, if this error belongs to one.
    ///
    /// Local rejections count as client errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Client(_) => Some(ErrorKind::ClientError),
            Error::Server(server) => Some(server.kind),
            _ => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.kind() == Some(ErrorKind::ClientError)
    }

    pub fn as_server_error(&self) -> Option<&ServerError> {
        match self {
            Error::Server(server) => Some(server),
            _ => None,
        }
    }
}

pub type CypherResult<T> = Result<T, Error>;

/// Failure of a statement batch
///
/// `results` holds the result sets of the statements that executed before
/// the failing one, in submission order.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct BatchError {
    #[source]
    pub error: Error,
    pub results: Vec<ResultSet>,
}

impl BatchError {
    pub fn new(error: Error, results: Vec<ResultSet>) -> Self {
        BatchError { error, results }
    }
}

impl From<Error> for BatchError {
    fn from(error: Error) -> Self {
        BatchError {
            error,
            results: Vec::new(),
        }
    }
}
