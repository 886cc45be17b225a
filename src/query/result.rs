//! Result values, rows and per-statement result sets

use indexmap::IndexMap;
use serde_json::Value as Json;
use std::fmt;

use crate::graph::{GraphEntity, Node, Relationship};
use crate::protocol::wire::StatementResult;

/// A single value in a result row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Node(Node),
    Relationship(Relationship),
}

impl Value {
    /// Plain JSON conversion, with no entity detection
    pub fn from_json(json: &Json) -> Value {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::String(s.clone()),
            Json::Array(items) => Value::List(items.iter().map(Value::from_json).collect()),
            Json::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_relationship(&self) -> Option<&Relationship> {
        match self {
            Value::Relationship(rel) => Some(rel),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, val)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, val)?;
                }
                write!(f, "}}")
            }
            Value::Node(node) => write!(f, "{}", node),
            Value::Relationship(rel) => write!(f, "{}", rel),
        }
    }
}

/// Row transformer chosen per statement at submission time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowShape {
    /// Entity payloads become `Node` / `Relationship`
    #[default]
    Typed,
    /// Entity payloads become their bare property map
    Raw,
}

impl RowShape {
    pub fn materialize(self, json: &Json) -> Value {
        match json {
            Json::Array(items) => Value::List(items.iter().map(|v| self.materialize(v)).collect()),
            Json::Object(map) => match GraphEntity::from_raw(json) {
                Some(entity) => match self {
                    RowShape::Typed => match entity {
                        GraphEntity::Node(node) => Value::Node(node),
                        GraphEntity::Relationship(rel) => Value::Relationship(rel),
                    },
                    RowShape::Raw => map
                        .get("data")
                        .map(Value::from_json)
                        .unwrap_or(Value::Null),
                },
                None => Value::Map(
                    map.iter()
                        .map(|(k, v)| (k.clone(), self.materialize(v)))
                        .collect(),
                ),
            },
            scalar => Value::from_json(scalar),
        }
    }
}

/// One result row, keyed by column name
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: IndexMap<String, Value>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> IndexMap<String, Value> {
        self.values
    }
}

/// Rows produced by one statement, consumed by iteration
#[derive(Debug, Clone)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: std::vec::IntoIter<Row>,
}

impl ResultSet {
    pub fn from_wire(result: &StatementResult, shape: RowShape) -> ResultSet {
        let rows: Vec<Row> = result
            .data
            .iter()
            .map(|data| Row {
                values: result
                    .columns
                    .iter()
                    .cloned()
                    .zip(data.values().iter().map(|v| shape.materialize(v)))
                    .collect(),
            })
            .collect();

        ResultSet {
            columns: result.columns.clone(),
            rows: rows.into_iter(),
        }
    }

    /// Pair each executed statement's result with its row transformer.
    /// Statements that never executed have no entry.
    pub fn collect(shapes: &[RowShape], results: &[StatementResult]) -> Vec<ResultSet> {
        results
            .iter()
            .zip(shapes.iter().copied().chain(std::iter::repeat(RowShape::Typed)))
            .map(|(result, shape)| ResultSet::from_wire(result, shape))
            .collect()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl Iterator for ResultSet {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for ResultSet {}
