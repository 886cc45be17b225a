//! Transaction state machine over the HTTP transactional endpoint
//!
//! ```text
//!            cypher / renew / commit / rollback
//!   Open ─────────────────────────────────────────► Pending
//!    ▲                                                 │
//!    │  success, or non-fatal error                    │
//!    └─────────────────────────────────────────────────┤
//!                                                      │ commit confirmed
//!                                                      ├──────────────► Committed
//!                                                      │ fatal error, rollback
//!                                                      └──────────────► RolledBack
//! ```
//!
//! Only one request may be in flight per transaction. A call made while
//! another is pending is rejected immediately, never queued. The state is
//! updated before the caller sees the outcome.

use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::client::Connection;
use crate::error::{BatchError, CypherResult, Error};
use crate::protocol::classify::{classify, QueryContext};
use crate::protocol::wire::EndpointResponse;
use crate::query::{Batch, ResultSet};

const CONCURRENT_REQUESTS: &str =
    "Cannot issue concurrent requests on the same transaction; wait for the previous request to complete.";
const ALREADY_COMMITTED: &str = "This transaction has already been committed.";
const ALREADY_ROLLED_BACK: &str = "This transaction has already been rolled back.";

/// Client-side view of a transaction's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    /// Ready to accept a request
    Open,
    /// A request is in flight
    Pending,
    Committed,
    /// Rolled back explicitly or destroyed by a fatal error
    RolledBack,
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionState::Committed | TransactionState::RolledBack)
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionState::Open => "open",
            TransactionState::Pending => "pending",
            TransactionState::Committed => "committed",
            TransactionState::RolledBack => "rolled back",
        };
        f.write_str(name)
    }
}

/// Outcome of a keep-alive request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renewal {
    pub expires_at: DateTime<Utc>,
    /// Time left until expiry, measured when the response arrived
    pub expires_in: Duration,
}

#[derive(Debug)]
struct Inner {
    state: TransactionState,
    /// Transaction resource URL, known after the first response
    url: Option<String>,
    /// Set at most once, never cleared
    commit_url: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

/// One remote transaction
///
/// Created by [`GraphDatabase::begin_transaction`](crate::GraphDatabase::begin_transaction).
/// All calls take `&self`; wrap in an `Arc` to share across tasks.
pub struct Transaction {
    connection: Arc<Connection>,
    inner: Mutex<Inner>,
}

/// Marks a transaction pending for the lifetime of one request.
///
/// A guard dropped without being settled (the caller abandoned the future)
/// puts the transaction back to `Open`.
struct InFlight<'a> {
    tx: &'a Transaction,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, state: TransactionState) {
        self.tx.lock().state = state;
        self.settled = true;
        if state.is_terminal() {
            info!("Transaction {} is now {}", self.tx.describe(), state);
        }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.tx.lock();
        if inner.state == TransactionState::Pending {
            debug!("In-flight request abandoned; transaction back to open");
            inner.state = TransactionState::Open;
        }
    }
}

impl Transaction {
    pub(crate) fn new(connection: Arc<Connection>) -> Self {
        Self {
            connection,
            inner: Mutex::new(Inner {
                state: TransactionState::Open,
                url: None,
                commit_url: None,
                expires_at: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> TransactionState {
        self.lock().state
    }

    /// Server-assigned identifier, the last segment of the resource URL
    pub fn id(&self) -> Option<String> {
        self.lock()
            .url
            .as_deref()
            .and_then(|url| url.trim_end_matches('/').rsplit('/').next())
            .map(str::to_string)
    }

    pub fn url(&self) -> Option<String> {
        self.lock().url.clone()
    }

    pub fn commit_url(&self) -> Option<String> {
        self.lock().commit_url.clone()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.lock().expires_at
    }

    /// Time left before the server expires this transaction
    pub fn expires_in(&self) -> Option<Duration> {
        self.expires_at().map(|at| at - Utc::now())
    }

    fn describe(&self) -> String {
        self.id().unwrap_or_else(|| "(unstarted)".to_string())
    }

    /// Single-flight guard: move `Open → Pending` or reject.
    fn begin_request(&self) -> CypherResult<InFlight<'_>> {
        let mut inner = self.lock();
        match inner.state {
            TransactionState::Open => {
                inner.state = TransactionState::Pending;
                Ok(InFlight {
                    tx: self,
                    settled: false,
                })
            }
            TransactionState::Pending => Err(Error::Client(CONCURRENT_REQUESTS.to_string())),
            TransactionState::Committed => Err(Error::Client(ALREADY_COMMITTED.to_string())),
            TransactionState::RolledBack => Err(Error::Client(ALREADY_ROLLED_BACK.to_string())),
        }
    }

    fn target_url(&self, commit: bool) -> String {
        let inner = self.lock();
        if commit {
            match (&inner.commit_url, &inner.url) {
                (Some(commit_url), _) => commit_url.clone(),
                (None, Some(url)) => format!("{}/commit", url),
                (None, None) => self.connection.begin_and_commit_url.clone(),
            }
        } else {
            inner
                .url
                .clone()
                .unwrap_or_else(|| self.connection.begin_url.clone())
        }
    }

    /// Record the location, commit URL and expiry carried by a response.
    fn absorb(&self, response: &EndpointResponse) {
        let mut inner = self.lock();

        if inner.commit_url.is_none() {
            inner.commit_url = response.body.commit.clone();
        }
        if inner.url.is_none() {
            let derived = inner
                .commit_url
                .as_deref()
                .and_then(|c| c.strip_suffix("/commit"))
                .map(str::to_string);
            inner.url = response.location.clone().or(derived);
            if let Some(url) = &inner.url {
                info!("Began transaction at {}", url);
            }
        }
        if let Some(expires_at) = response.body.transaction.as_ref().and_then(|t| t.expires_at()) {
            inner.expires_at = Some(expires_at);
        }
    }

    /// Submit a batch and settle the state from the outcome.
    async fn exchange(&self, batch: &Batch, context: QueryContext) -> Result<Vec<ResultSet>, BatchError> {
        let guard = self.begin_request()?;

        let body = match batch.to_request() {
            Ok(body) => body,
            Err(e) => {
                guard.settle(TransactionState::Open);
                return Err(e.into());
            }
        };

        let commit = context.is_commit();
        let url = self.target_url(commit);
        debug!("Submitting {} statements to {} ({:?})", body.statements.len(), url, context);

        let response = match self.connection.endpoint.post(&url, &body).await {
            Ok(response) => response,
            Err(e) => {
                // Without an answer a commit's outcome is unknown; treat it as lost
                let next = if commit {
                    TransactionState::RolledBack
                } else {
                    TransactionState::Open
                };
                guard.settle(next);
                return Err(e.into());
            }
        };

        self.absorb(&response);
        let results = ResultSet::collect(&batch.shapes(), &response.body.results);

        if let Some(raw) = response.body.errors.first() {
            let error = classify(raw);
            if error.is_fatal(context) {
                warn!("Fatal {} ({}); transaction {} destroyed", error.kind, error.code, self.describe());
                guard.settle(TransactionState::RolledBack);
            } else {
                guard.settle(TransactionState::Open);
            }
            return Err(BatchError::new(Error::Server(error), results));
        }

        guard.settle(if commit {
            TransactionState::Committed
        } else {
            TransactionState::Open
        });
        Ok(results)
    }

    /// Run one statement or a batch.
    ///
    /// On failure the error carries the result sets of statements that ran
    /// before the failing one; later statements never run.
    pub async fn cypher(&self, batch: impl Into<Batch>) -> Result<Vec<ResultSet>, BatchError> {
        let batch = batch.into();
        let context = if batch.commit_requested() {
            QueryContext::CommitStatement
        } else {
            QueryContext::Statement
        };
        self.exchange(&batch, context).await
    }

    /// Commit with no further statements. Any failure destroys the transaction.
    pub async fn commit(&self) -> CypherResult<()> {
        self.exchange(&Batch::new(), QueryContext::Commit)
            .await
            .map(|_| ())
            .map_err(|e| e.error)
    }

    /// Run a final batch and commit in the same request
    pub async fn commit_with(&self, batch: impl Into<Batch>) -> Result<Vec<ResultSet>, BatchError> {
        self.exchange(&batch.into(), QueryContext::Commit).await
    }

    /// Roll back. The transaction ends up rolled back even if the server
    /// reports a failure, which is still returned.
    pub async fn rollback(&self) -> CypherResult<()> {
        let guard = self.begin_request()?;

        let Some(url) = self.url() else {
            // Never started on the server; nothing to delete
            guard.settle(TransactionState::RolledBack);
            return Ok(());
        };

        let outcome = self.connection.endpoint.delete(&url).await;
        guard.settle(TransactionState::RolledBack);

        let response = outcome?;
        match response.body.errors.first() {
            Some(raw) => Err(Error::Server(classify(raw))),
            None => Ok(()),
        }
    }

    /// Keep the transaction alive by sending an empty batch.
    pub async fn renew(&self) -> CypherResult<Renewal> {
        self.exchange(&Batch::new(), QueryContext::Statement)
            .await
            .map_err(|e| e.error)?;

        let expires_at = self
            .expires_at()
            .ok_or_else(|| Error::Protocol("response did not carry a transaction expiry".to_string()))?;
        Ok(Renewal {
            expires_at,
            expires_in: expires_at - Utc::now(),
        })
    }
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("Transaction")
            .field("state", &inner.state)
            .field("url", &inner.url)
            .field("expires_at", &inner.expires_at)
            .finish()
    }
}
