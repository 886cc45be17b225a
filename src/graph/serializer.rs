//! Flattening of nested property bags into the dotted wire encoding
//!
//! Nested bags become a single level of `parent.child` keys. Keys that already
//! contain the separator are not rejected: they are indistinguishable from a
//! nesting boundary once flattened, so they do not survive a round-trip.

use super::property::{FlatBag, PropertyBag, PropertyValue};
use crate::error::{CypherResult, Error};

/// Separator joining parent and child keys in the flat encoding
pub const SEPARATOR: char = '.';

/// Flatten a nested property bag.
///
/// Fails with [`Error::UnsupportedType`] if any value, at any depth, is an array.
/// An empty nested bag has no leaves to flatten, so it is kept as an empty map
/// under its dotted path.
pub fn serialize(bag: &PropertyBag) -> CypherResult<FlatBag> {
    let mut flat = FlatBag::new();
    flatten_into(&mut flat, None, bag)?;
    Ok(flat)
}

fn flatten_into(flat: &mut FlatBag, prefix: Option<&str>, bag: &PropertyBag) -> CypherResult<()> {
    for (key, value) in bag {
        let path = match prefix {
            Some(prefix) => format!("{}{}{}", prefix, SEPARATOR, key),
            None => key.clone(),
        };

        match value {
            PropertyValue::Map(nested) if nested.is_empty() => {
                flat.insert(path, PropertyValue::Map(PropertyBag::new()));
            }
            PropertyValue::Map(nested) => flatten_into(flat, Some(&path), nested)?,
            PropertyValue::Array(_) => {
                return Err(Error::UnsupportedType {
                    key: path,
                    type_name: value.type_name(),
                });
            }
            scalar => {
                flat.insert(path, scalar.clone());
            }
        }
    }
    Ok(())
}

/// Rebuild a nested property bag from its flat encoding.
///
/// Keys without a separator pass through with their value untouched. When a
/// dotted key descends through a segment currently holding a scalar, the
/// scalar is replaced by a nested bag.
pub fn deserialize(flat: &FlatBag) -> PropertyBag {
    let mut bag = PropertyBag::new();

    for (key, value) in flat {
        let mut segments: Vec<&str> = key.split(SEPARATOR).collect();
        let leaf = segments.pop().unwrap_or_default();

        let mut current = &mut bag;
        for segment in segments {
            let slot = current
                .entry(segment.to_string())
                .or_insert_with(|| PropertyValue::Map(PropertyBag::new()));
            if !matches!(slot, PropertyValue::Map(_)) {
                *slot = PropertyValue::Map(PropertyBag::new());
            }
            current = match slot {
                PropertyValue::Map(nested) => nested,
                _ => unreachable!("slot was just replaced with a map"),
            };
        }

        current.insert(leaf.to_string(), value.clone());
    }

    bag
}
