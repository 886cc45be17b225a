//! In-memory stand-in for the transactional endpoint
//!
//! Understands a tiny statement vocabulary:
//!
//! | Statement        | Effect                                                      |
//! |------------------|-------------------------------------------------------------|
//! | `CREATE <name>`  | records a write in the transaction                          |
//! | `COUNT`          | returns committed + own writes as column `count`            |
//! | `NEED <param>`   | returns the parameter, or `ParameterMissing` if absent      |
//! | `BAD ...`        | `ClientError.Statement.SyntaxError`                         |
//! | `CRASH`          | `DatabaseError.General.UnknownFailure`                      |
//! | `DEADLOCK`       | `TransientError.Transaction.DeadlockDetected`               |
//! | `POISON`         | the next commit fails with a constraint `ClientError`       |
//! | `NODE <name>`    | returns a node payload in column `n`                        |
//! | `REL`            | returns a relationship payload in column `r`                |

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use cypher_tx::error::{CypherResult, Error};
use cypher_tx::protocol::wire::{
    EndpointResponse, RawError, RequestBody, ResponseBody, StatementResult, TransactionInfo,
};
use cypher_tx::{ClientConfig, GraphDatabase, TransactionEndpoint};
use serde_json::{json, Value as Json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const BASE: &str = "http://fake:7474";
pub const TX_PATH: &str = "http://fake:7474/db/data/transaction";

#[derive(Default)]
struct OpenTx {
    writes: Vec<String>,
    poisoned: bool,
}

#[derive(Default)]
struct State {
    committed: Vec<String>,
    open: HashMap<u64, OpenTx>,
    next_id: u64,
    tick: i64,
    requests: Vec<(String, String)>,
}

#[derive(Default)]
pub struct FakeServer {
    state: Mutex<State>,
    disconnect: AtomicBool,
}

enum Target {
    Begin { commit: bool },
    Existing { id: u64, commit: bool },
    Unknown,
}

fn parse_target(url: &str) -> Target {
    let rest = match url.strip_prefix(TX_PATH) {
        Some(rest) => rest.trim_start_matches('/'),
        None => return Target::Unknown,
    };
    let parts: Vec<&str> = rest.split('/').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [] => Target::Begin { commit: false },
        ["commit"] => Target::Begin { commit: true },
        [id] => id
            .parse()
            .map(|id| Target::Existing { id, commit: false })
            .unwrap_or(Target::Unknown),
        [id, "commit"] => id
            .parse()
            .map(|id| Target::Existing { id, commit: true })
            .unwrap_or(Target::Unknown),
        _ => Target::Unknown,
    }
}

fn error(code: &str, message: &str) -> RawError {
    RawError {
        code: code.to_string(),
        message: message.to_string(),
    }
}

fn result(columns: &[&str], rows: Vec<Vec<Json>>) -> StatementResult {
    serde_json::from_value(json!({
        "columns": columns,
        "data": rows.into_iter().map(|r| json!({"row": r.clone(), "rest": r})).collect::<Vec<_>>()
    }))
    .unwrap()
}

impl FakeServer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn database(self: &Arc<Self>) -> GraphDatabase {
        GraphDatabase::with_endpoint(&ClientConfig::new(BASE), self.clone())
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn committed(&self) -> Vec<String> {
        self.state.lock().unwrap().committed.clone()
    }

    pub fn open_transactions(&self) -> usize {
        self.state.lock().unwrap().open.len()
    }

    /// Fail the next POST at the transport level, before it reaches any transaction
    pub fn disconnect_next(&self) {
        self.disconnect.store(true, Ordering::SeqCst);
    }

    fn execute(
        committed: &[String],
        tx: &mut OpenTx,
        query: &str,
        params: &serde_json::Map<String, Json>,
    ) -> Result<StatementResult, RawError> {
        let mut words = query.split_whitespace();
        match (words.next(), words.next()) {
            (Some("CREATE"), Some(name)) => {
                tx.writes.push(name.to_string());
                Ok(result(&[], vec![]))
            }
            (Some("COUNT"), _) => Ok(result(
                &["count"],
                vec![vec![json!(committed.len() + tx.writes.len())]],
            )),
            (Some("NEED"), Some(param)) => match params.get(param) {
                Some(value) => Ok(result(&["value"], vec![vec![value.clone()]])),
                None => Err(error(
                    "Neo.ClientError.Statement.ParameterMissing",
                    &format!("Expected a parameter named {}", param),
                )),
            },
            (Some("BAD"), _) => Err(error("Neo.ClientError.Statement.SyntaxError", "Invalid input")),
            (Some("CRASH"), _) => Err(error("Neo.DatabaseError.General.UnknownFailure", "Crashed")),
            (Some("DEADLOCK"), _) => Err(error(
                "Neo.TransientError.Transaction.DeadlockDetected",
                "Deadlock detected",
            )),
            (Some("POISON"), _) => {
                tx.poisoned = true;
                Ok(result(&[], vec![]))
            }
            (Some("NODE"), Some(name)) => Ok(result(
                &["n"],
                vec![vec![json!({
                    "self": format!("{}/db/data/node/17", BASE),
                    "metadata": {"id": 17, "labels": ["Person"]},
                    "data": {"name": name}
                })]],
            )),
            (Some("REL"), _) => Ok(result(
                &["r"],
                vec![vec![json!({
                    "self": format!("{}/db/data/relationship/4", BASE),
                    "type": "KNOWS",
                    "start": format!("{}/db/data/node/1", BASE),
                    "end": format!("{}/db/data/node/2", BASE),
                    "data": {"since": 2020}
                })]],
            )),
            _ => Err(error("Neo.ClientError.Statement.SyntaxError", "Unknown statement")),
        }
    }
}

#[async_trait]
impl TransactionEndpoint for FakeServer {
    async fn post(&self, url: &str, body: &RequestBody) -> CypherResult<EndpointResponse> {
        // Suspend once so a concurrent caller gets polled while this is in flight
        tokio::task::yield_now().await;

        if self.disconnect.swap(false, Ordering::SeqCst) {
            return Err(Error::Status(503));
        }

        let mut state = self.state.lock().unwrap();
        state.requests.push(("POST".to_string(), url.to_string()));

        let (id, commit, location) = match parse_target(url) {
            Target::Begin { commit } => {
                state.next_id += 1;
                let id = state.next_id;
                state.open.insert(id, OpenTx::default());
                (id, commit, Some(format!("{}/{}", TX_PATH, id)))
            }
            Target::Existing { id, commit } if state.open.contains_key(&id) => (id, commit, None),
            _ => {
                return Ok(EndpointResponse {
                    location: None,
                    body: ResponseBody {
                        errors: vec![error(
                            "Neo.ClientError.Transaction.UnknownId",
                            "Unrecognized transaction id",
                        )],
                        ..ResponseBody::default()
                    },
                });
            }
        };

        let mut tx = state.open.remove(&id).unwrap_or_default();
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for statement in &body.statements {
            match Self::execute(&state.committed, &mut tx, &statement.statement, &statement.parameters) {
                Ok(result) => results.push(result),
                Err(e) => {
                    errors.push(e);
                    break;
                }
            }
        }

        if commit && errors.is_empty() && tx.poisoned {
            errors.push(error(
                "Neo.ClientError.Schema.ConstraintValidationFailed",
                "Node already exists with label Person and property name",
            ));
        }

        let server_rolls_back = commit
            || errors
                .first()
                .map(|e| !e.code.contains("ClientError"))
                .unwrap_or(false);

        let mut response = ResponseBody {
            results,
            ..ResponseBody::default()
        };

        if errors.is_empty() && commit {
            state.committed.extend(tx.writes.drain(..));
        } else if !server_rolls_back {
            state.tick += 1;
            let expires = Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap()
                + Duration::seconds(60 + state.tick);
            response.commit = Some(format!("{}/{}/commit", TX_PATH, id));
            response.transaction = Some(TransactionInfo {
                expires: expires.to_rfc2822(),
            });
            state.open.insert(id, tx);
        }
        response.errors = errors;

        Ok(EndpointResponse {
            location,
            body: response,
        })
    }

    async fn delete(&self, url: &str) -> CypherResult<EndpointResponse> {
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        state.requests.push(("DELETE".to_string(), url.to_string()));

        let errors = match parse_target(url) {
            Target::Existing { id, commit: false } if state.open.remove(&id).is_some() => vec![],
            _ => vec![error(
                "Neo.ClientError.Transaction.UnknownId",
                "Unrecognized transaction id",
            )],
        };

        Ok(EndpointResponse {
            location: None,
            body: ResponseBody {
                errors,
                ..ResponseBody::default()
            },
        })
    }
}
