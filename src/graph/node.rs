//! Node entity materialized from query results

use super::property::{bag_from_json, PropertyBag, PropertyValue};
use super::types::{id_from_url, Label, NodeId};
use serde_json::Value as Json;
use std::fmt;

/// A node returned by the database
///
/// Immutable once parsed. Two nodes are equal when their ids are equal.
#[derive(Debug, Clone)]
pub struct Node {
    /// Identifier extracted from the node's resource URL
    pub id: NodeId,

    /// Labels, in the order the server listed them
    pub labels: Vec<Label>,

    /// Properties as returned by the endpoint
    pub properties: PropertyBag,
}

impl Node {
    pub fn new(id: NodeId, labels: Vec<Label>, properties: PropertyBag) -> Self {
        Node {
            id,
            labels,
            properties,
        }
    }

    /// Parse a raw wire node.
    ///
    /// Requires a `self` URL, a `data` object and a label list (under
    /// `metadata.labels`, or top-level `labels`). Anything else yields `None`.
    pub fn from_raw(raw: &Json) -> Option<Node> {
        let obj = raw.as_object()?;
        let id = id_from_url(obj.get("self")?.as_str()?)?;
        let data = obj.get("data")?.as_object()?;

        let labels = obj
            .get("metadata")
            .and_then(|meta| meta.get("labels"))
            .or_else(|| obj.get("labels"))?
            .as_array()?
            .iter()
            .map(|label| label.as_str().map(Label::from))
            .collect::<Option<Vec<_>>>()?;

        Some(Node::new(NodeId::new(id), labels, bag_from_json(data)))
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.as_str() == label)
    }

    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.id)?;
        for label in &self.labels {
            write!(f, ":{}", label)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_node() -> Json {
        json!({
            "self": "http://localhost:7474/db/data/node/12",
            "metadata": {"id": 12, "labels": ["Person", "Employee"]},
            "data": {"name": "Alice", "age": 30}
        })
    }

    #[test]
    fn test_parse_node() {
        let node = Node::from_raw(&raw_node()).unwrap();
        assert_eq!(node.id, NodeId::new(12));
        assert!(node.has_label("Person"));
        assert!(node.has_label("Employee"));
        assert_eq!(node.get_property("name").unwrap().as_string(), Some("Alice"));
        assert_eq!(node.get_property("age").unwrap().as_integer(), Some(30));
        assert_eq!(node.to_string(), "(12:Person:Employee)");
    }

    #[test]
    fn test_missing_fields_yield_none() {
        let mut raw = raw_node();
        raw.as_object_mut().unwrap().remove("data");
        assert!(Node::from_raw(&raw).is_none());

        let mut raw = raw_node();
        raw["self"] = json!(12);
        assert!(Node::from_raw(&raw).is_none());

        let mut raw = raw_node();
        raw.as_object_mut().unwrap().remove("metadata");
        assert!(Node::from_raw(&raw).is_none());

        assert!(Node::from_raw(&Json::Null).is_none());
    }

    #[test]
    fn test_node_equality() {
        let node1 = Node::from_raw(&raw_node()).unwrap();
        let node2 = Node::new(NodeId::new(12), vec![], PropertyBag::new());
        let node3 = Node::new(NodeId::new(13), vec![], PropertyBag::new());

        assert_eq!(node1, node2);
        assert_ne!(node1, node3);
    }
}
