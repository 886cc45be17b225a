//! Property graph values exchanged with the database
//!
//! - Property bags and their flat wire encoding (`serializer`)
//! - Node and relationship entities parsed from raw result payloads

pub mod entity;
pub mod node;
pub mod property;
pub mod relationship;
pub mod serializer;
pub mod types;

// Re-export main types
pub use entity::GraphEntity;
pub use node::Node;
pub use property::{FlatBag, PropertyBag, PropertyValue};
pub use relationship::Relationship;
pub use types::{Label, NodeId, RelationshipId, RelationshipType};
