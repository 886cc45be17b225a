//! Either kind of graph entity, as found in heterogeneous result rows

use super::node::Node;
use super::property::PropertyBag;
use super::relationship::Relationship;
use serde_json::Value as Json;
use std::fmt;

/// A node or a relationship
///
/// Equality requires the same kind and the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphEntity {
    Node(Node),
    Relationship(Relationship),
}

impl GraphEntity {
    /// Parse a raw wire object as a relationship, falling back to a node.
    ///
    /// Relationships are tried first since a node payload never carries
    /// `start`/`end`/`type`.
    pub fn from_raw(raw: &Json) -> Option<GraphEntity> {
        Relationship::from_raw(raw)
            .map(GraphEntity::Relationship)
            .or_else(|| Node::from_raw(raw).map(GraphEntity::Node))
    }

    pub fn id(&self) -> i64 {
        match self {
            GraphEntity::Node(node) => node.id.as_i64(),
            GraphEntity::Relationship(rel) => rel.id.as_i64(),
        }
    }

    pub fn properties(&self) -> &PropertyBag {
        match self {
            GraphEntity::Node(node) => &node.properties,
            GraphEntity::Relationship(rel) => &rel.properties,
        }
    }
}

impl fmt::Display for GraphEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphEntity::Node(node) => node.fmt(f),
            GraphEntity::Relationship(rel) => rel.fmt(f),
        }
    }
}
