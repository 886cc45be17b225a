//! Classification of endpoint errors and the fatality policy
//!
//! A client error on a plain statement leaves the transaction usable. The same
//! error during a commit destroys it, since the server cannot resume a
//! transaction after a failed commit attempt. Database and transient errors
//! always destroy it.

use super::wire::RawError;
use std::fmt;
use tracing::warn;

/// The three error classifications reported by the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request itself was malformed (missing parameter, syntax error)
    ClientError,
    /// Internal failure on the server side
    DatabaseError,
    /// Retryable condition such as lock contention; never retried here
    TransientError,
}

impl ErrorKind {
    pub fn parse(classification: &str) -> Option<ErrorKind> {
        match classification {
            "ClientError" => Some(ErrorKind::ClientError),
            "DatabaseError" => Some(ErrorKind::DatabaseError),
            "TransientError" => Some(ErrorKind::TransientError),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ClientError => "ClientError",
            ErrorKind::DatabaseError => "DatabaseError",
            ErrorKind::TransientError => "TransientError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of call failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryContext {
    /// Plain statement execution
    Statement,
    /// Statement batch whose final statement asked to commit
    CommitStatement,
    /// Explicit commit call
    Commit,
}

impl QueryContext {
    pub fn is_commit(&self) -> bool {
        matches!(self, QueryContext::CommitStatement | QueryContext::Commit)
    }
}

/// Classified endpoint error
///
/// Keeps the server's category, title and message verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
    pub kind: ErrorKind,
    /// Original code as sent by the server
    pub code: String,
    pub category: String,
    pub title: String,
    pub message: String,
}

impl ServerError {
    /// Whether this error leaves the transaction rolled back.
    pub fn is_fatal(&self, context: QueryContext) -> bool {
        match self.kind {
            ErrorKind::ClientError => context.is_commit(),
            ErrorKind::DatabaseError | ErrorKind::TransientError => true,
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}.{}] {}", self.category, self.title, self.message)
    }
}

impl std::error::Error for ServerError {}

/// Classify a raw error record.
///
/// The last three dot-separated segments of the code are read as
/// classification, category and title, so a `Neo.` namespace is ignored.
/// Unknown classifications are treated as database errors.
pub fn classify(raw: &RawError) -> ServerError {
    let segments: Vec<&str> = raw.code.split('.').collect();
    let (classification, category, title) = match segments.as_slice() {
        [.., classification, category, title] => (*classification, *category, *title),
        _ => ("", "Unknown", raw.code.as_str()),
    };

    let kind = ErrorKind::parse(classification).unwrap_or_else(|| {
        warn!("Unrecognised error classification in code '{}'", raw.code);
        ErrorKind::DatabaseError
    });

    ServerError {
        kind,
        code: raw.code.clone(),
        category: category.to_string(),
        title: title.to_string(),
        message: raw.message.clone(),
    }
}
