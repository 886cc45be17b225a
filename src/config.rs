//! Client configuration

use serde::Deserialize;

/// Connection settings for a database client
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:7474`
    pub base_url: String,
    /// Path of the transactional endpoint below the server root
    pub transaction_path: String,
    /// Basic auth user (None = no authentication)
    pub username: Option<String>,
    pub password: Option<String>,
    pub user_agent: String,
    /// Per-request timeout enforced by the transport
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7474".to_string(),
            transaction_path: "/db/data/transaction".to_string(),
            username: None,
            password: None,
            user_agent: format!("cypher-tx/{}", crate::VERSION),
            timeout_secs: 60,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, username: &str, password: &str) -> Self {
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    pub fn with_transaction_path(mut self, path: &str) -> Self {
        self.transaction_path = path.to_string();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// URL that opens a new transaction
    pub fn begin_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.transaction_path.trim_matches('/')
        )
    }

    /// URL that opens, runs and commits in a single request
    pub fn begin_and_commit_url(&self) -> String {
        format!("{}/commit", self.begin_url())
    }
}
