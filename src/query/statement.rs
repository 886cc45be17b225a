//! Statements and batches submitted to the endpoint

use crate::error::{CypherResult, Error};
use crate::graph::property::{PropertyBag, PropertyValue};
use crate::graph::serializer;
use crate::protocol::wire::{RequestBody, WireStatement, RESULT_DATA_CONTENTS};
use super::result::RowShape;

/// One Cypher query plus its parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub query: String,
    pub params: PropertyBag,
    /// Return bare property bags instead of nodes and relationships
    pub raw: bool,
    /// Commit after executing; only honoured on a batch's final statement
    pub commit: bool,
}

impl Statement {
    pub fn new(query: impl Into<String>) -> Self {
        Statement {
            query: query.into(),
            params: PropertyBag::new(),
            raw: false,
            commit: false,
        }
    }

    pub fn with_params(mut self, params: PropertyBag) -> Self {
        self.params = params;
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn commit(mut self, commit: bool) -> Self {
        self.commit = commit;
        self
    }

    pub fn shape(&self) -> RowShape {
        if self.raw {
            RowShape::Raw
        } else {
            RowShape::Typed
        }
    }

    /// Encode for the wire. Parameters holding nested bags are flattened;
    /// top-level lists pass through as Cypher list parameters.
    pub fn to_wire(&self) -> CypherResult<WireStatement> {
        let mut parameters = serde_json::Map::new();
        for (key, value) in &self.params {
            let encoded = match value {
                PropertyValue::Map(bag) => {
                    PropertyValue::Map(serializer::serialize(bag).map_err(|e| match e {
                        Error::UnsupportedType { key: inner, type_name } => Error::UnsupportedType {
                            key: format!("{}.{}", key, inner),
                            type_name,
                        },
                        other => other,
                    })?)
                    .to_json()
                }
                other => other.to_json(),
            };
            parameters.insert(key.clone(), encoded);
        }

        Ok(WireStatement {
            statement: self.query.clone(),
            parameters,
            result_data_contents: RESULT_DATA_CONTENTS.to_vec(),
        })
    }
}

impl From<&str> for Statement {
    fn from(query: &str) -> Self {
        Statement::new(query)
    }
}

impl From<String> for Statement {
    fn from(query: String) -> Self {
        Statement::new(query)
    }
}

/// Ordered group of statements sent in one request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    statements: Vec<Statement>,
}

impl Batch {
    pub fn new() -> Self {
        Batch::default()
    }

    pub fn push(mut self, statement: impl Into<Statement>) -> Self {
        self.statements.push(statement.into());
        self
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Whether the final statement asks for a commit
    pub fn commit_requested(&self) -> bool {
        self.statements.last().is_some_and(|s| s.commit)
    }

    /// Row transformer for each statement, in order
    pub fn shapes(&self) -> Vec<RowShape> {
        self.statements.iter().map(Statement::shape).collect()
    }

    /// Build the request body.
    ///
    /// Rejects a commit flag on any statement but the last.
    pub fn to_request(&self) -> CypherResult<RequestBody> {
        let last = self.statements.len().saturating_sub(1);
        if self.statements.iter().take(last).any(|s| s.commit) {
            return Err(Error::Client(
                "Only the final statement of a batch may request a commit.".to_string(),
            ));
        }

        let statements = self
            .statements
            .iter()
            .map(Statement::to_wire)
            .collect::<CypherResult<Vec<_>>>()?;
        Ok(RequestBody { statements })
    }
}

impl From<Statement> for Batch {
    fn from(statement: Statement) -> Self {
        Batch {
            statements: vec![statement],
        }
    }
}

impl From<Vec<Statement>> for Batch {
    fn from(statements: Vec<Statement>) -> Self {
        Batch { statements }
    }
}

impl From<&str> for Batch {
    fn from(query: &str) -> Self {
        Batch::from(Statement::new(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_params_are_flattened() {
        let mut address = PropertyBag::new();
        address.insert("city".to_string(), "Pune".into());
        let mut props = PropertyBag::new();
        props.insert("name".to_string(), "Alice".into());
        props.insert("address".to_string(), PropertyValue::Map(address));

        let statement = Statement::new("CREATE (n $props)")
            .param("props", PropertyValue::Map(props))
            .param("ids", vec![PropertyValue::from(1i64), PropertyValue::from(2i64)])
            .param("limit", 10i64);

        let wire = statement.to_wire().unwrap();
        assert_eq!(wire.parameters["props"], json!({"name": "Alice", "address.city": "Pune"}));
        assert_eq!(wire.parameters["ids"], json!([1, 2]));
        assert_eq!(wire.parameters["limit"], json!(10));
    }

    #[test]
    fn test_array_inside_param_bag_rejected() {
        let mut props = PropertyBag::new();
        props.insert("tags".to_string(), PropertyValue::Array(vec![]));
        let statement = Statement::new("CREATE (n $props)").param("props", PropertyValue::Map(props));

        match statement.to_wire() {
            Err(Error::UnsupportedType { key, .. }) => assert_eq!(key, "props.tags"),
            other => panic!("expected UnsupportedType, got {:?}", other),
        }
    }

    #[test]
    fn test_commit_only_on_last_statement() {
        let ok = Batch::new()
            .push("CREATE (a)")
            .push(Statement::new("CREATE (b)").commit(true));
        assert!(ok.commit_requested());
        assert!(ok.to_request().is_ok());

        let bad = Batch::new()
            .push(Statement::new("CREATE (a)").commit(true))
            .push("CREATE (b)");
        assert!(!bad.commit_requested());
        let err = bad.to_request().unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_shapes_follow_raw_flag() {
        let batch = Batch::new()
            .push("MATCH (n) RETURN n")
            .push(Statement::new("MATCH (n) RETURN n").raw(true));
        assert_eq!(batch.shapes(), vec![RowShape::Typed, RowShape::Raw]);
    }
}
