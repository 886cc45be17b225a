//! Relationship entity materialized from query results

use super::property::{bag_from_json, PropertyBag, PropertyValue};
use super::types::{id_from_url, NodeId, RelationshipId, RelationshipType};
use serde_json::Value as Json;
use std::fmt;

/// A directed relationship returned by the database
///
/// Endpoints are held by id only; the relationship never owns the nodes.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Identifier extracted from the relationship's resource URL
    pub id: RelationshipId,

    /// Type of relationship (e.g., "KNOWS", "WORKS_AT")
    pub rel_type: RelationshipType,

    /// Start node (relationship goes FROM this node)
    pub from_id: NodeId,

    /// End node (relationship goes TO this node)
    pub to_id: NodeId,

    /// Properties as returned by the endpoint
    pub properties: PropertyBag,
}

impl Relationship {
    pub fn new(
        id: RelationshipId,
        rel_type: impl Into<RelationshipType>,
        from_id: NodeId,
        to_id: NodeId,
        properties: PropertyBag,
    ) -> Self {
        Relationship {
            id,
            rel_type: rel_type.into(),
            from_id,
            to_id,
            properties,
        }
    }

    /// Parse a raw wire relationship.
    ///
    /// Requires string `self`, `type`, `start` and `end` fields plus a `data`
    /// object; every URL must end in an integer id. Anything else yields `None`.
    pub fn from_raw(raw: &Json) -> Option<Relationship> {
        let obj = raw.as_object()?;
        let id = id_from_url(obj.get("self")?.as_str()?)?;
        let rel_type = obj.get("type")?.as_str()?;
        let from_id = id_from_url(obj.get("start")?.as_str()?)?;
        let to_id = id_from_url(obj.get("end")?.as_str()?)?;
        let data = obj.get("data")?.as_object()?;

        Some(Relationship::new(
            RelationshipId::new(id),
            rel_type,
            NodeId::new(from_id),
            NodeId::new(to_id),
            bag_from_json(data),
        ))
    }

    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if this relationship goes FROM a specific node
    pub fn starts_from(&self, node: NodeId) -> bool {
        self.from_id == node
    }

    /// Check if this relationship goes TO a specific node
    pub fn ends_at(&self, node: NodeId) -> bool {
        self.to_id == node
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Relationship {}

impl std::hash::Hash for Relationship {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "-[{}:{}]->", self.id, self.rel_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_relationship() -> Json {
        json!({
            "self": "http://localhost:7474/db/data/relationship/5",
            "type": "KNOWS",
            "start": "http://localhost:7474/db/data/node/1",
            "end": "http://localhost:7474/db/data/node/2",
            "data": {"since": 2020, "strength": 0.9}
        })
    }

    #[test]
    fn test_parse_relationship() {
        let rel = Relationship::from_raw(&raw_relationship()).unwrap();
        assert_eq!(rel.id, RelationshipId::new(5));
        assert_eq!(rel.rel_type.as_str(), "KNOWS");
        assert!(rel.starts_from(NodeId::new(1)));
        assert!(rel.ends_at(NodeId::new(2)));
        assert_eq!(rel.get_property("since").unwrap().as_integer(), Some(2020));
        assert_eq!(rel.get_property("strength").unwrap().as_float(), Some(0.9));
        assert_eq!(rel.to_string(), "-[5:KNOWS]->");
    }

    #[test]
    fn test_malformed_relationship_yields_none() {
        for field in ["self", "type", "start", "end", "data"] {
            let mut raw = raw_relationship();
            raw.as_object_mut().unwrap().remove(field);
            assert!(Relationship::from_raw(&raw).is_none(), "missing {}", field);
        }

        let mut raw = raw_relationship();
        raw["data"] = json!("not an object");
        assert!(Relationship::from_raw(&raw).is_none());

        let mut raw = raw_relationship();
        raw["end"] = json!("http://localhost:7474/db/data/node/two");
        assert!(Relationship::from_raw(&raw).is_none());
    }

    #[test]
    fn test_relationship_equality_is_by_id() {
        let rel = Relationship::from_raw(&raw_relationship()).unwrap();
        let same = Relationship::new(
            RelationshipId::new(5),
            "LIKES",
            NodeId::new(9),
            NodeId::new(10),
            PropertyBag::new(),
        );
        let other = Relationship::new(
            RelationshipId::new(6),
            "KNOWS",
            NodeId::new(1),
            NodeId::new(2),
            PropertyBag::new(),
        );
        assert_eq!(rel, same);
        assert_ne!(rel, other);
    }
}
