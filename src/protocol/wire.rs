//! Request and response bodies of the transactional HTTP endpoint

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Result formats requested for every statement. `rest` carries full entity
/// payloads (`self`, `data`, ...) that `row` flattens away.
pub const RESULT_DATA_CONTENTS: [&str; 2] = ["row", "rest"];

/// Body of a POST to the transaction, begin or commit URL
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestBody {
    pub statements: Vec<WireStatement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireStatement {
    pub statement: String,
    pub parameters: serde_json::Map<String, Json>,
    #[serde(rename = "resultDataContents")]
    pub result_data_contents: Vec<&'static str>,
}

/// Decoded body returned by the endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseBody {
    /// Commit URL, present while the transaction is open
    #[serde(default)]
    pub commit: Option<String>,
    #[serde(default)]
    pub transaction: Option<TransactionInfo>,
    /// One entry per statement that executed, in submission order
    #[serde(default)]
    pub results: Vec<StatementResult>,
    /// A non-empty list means the matching statement and all later ones
    /// in the batch did not execute
    #[serde(default)]
    pub errors: Vec<RawError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInfo {
    /// RFC 2822 timestamp, e.g. `Tue, 16 Oct 2012 14:40:25 +0000`
    pub expires: String,
}

impl TransactionInfo {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc2822(&self.expires)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatementResult {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<ResultData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultData {
    #[serde(default)]
    pub row: Vec<Json>,
    #[serde(default)]
    pub rest: Option<Vec<Json>>,
}

impl ResultData {
    /// Column values, preferring the full `rest` representation
    pub fn values(&self) -> &[Json] {
        self.rest.as_deref().unwrap_or(&self.row)
    }
}

/// Error record as reported by the endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawError {
    /// `<classification>.<category>.<title>`, optionally namespaced (`Neo.`)
    pub code: String,
    pub message: String,
}

/// What the transport hands back for one exchange
#[derive(Debug, Clone, Default)]
pub struct EndpointResponse {
    /// `Location` header, set when a request opened a new transaction
    pub location: Option<String>,
    pub body: ResponseBody,
}
