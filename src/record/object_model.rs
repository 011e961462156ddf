//! Behaviour shared by every generated record type: representation,
//! equality, hashing, ordering and mapping conversion.
//!
//! Hashing follows the field-name set only. Two records that differ only in
//! their values hash identically; equal records always hash identically, but
//! the converse does not hold. Do not rely on the hash to tell values apart.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::Record;
use crate::types::FieldMap;

impl fmt::Display for Record {
    /// `Name(field1=value1, field2=value2)` in declaration order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name())?;
        for (slot, value) in self.slots.iter().enumerate() {
            if slot > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", self.ty.field_name(slot), value)?;
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.name());
        for (slot, value) in self.slots.iter().enumerate() {
            s.field(self.ty.field_name(slot), value);
        }
        s.finish()
    }
}

/// Equal when both sides have the same number of fields and every field of
/// the left side exists on the right with an equal value. A missing field
/// makes the records unequal; it is never an error.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.slots.iter().enumerate().all(|(slot, value)| {
            other
                .get(self.ty.field_name(slot))
                .is_ok_and(|theirs| value == theirs)
        })
    }
}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.ty.shape_hash());
    }
}

/// Lexicographic comparison over the canonical order, stopping at the first
/// unequal pair.
///
/// Only records whose types are both ordered, with the same field names in
/// the same canonical order, compare. Any other pair is only comparable for
/// equality.
impl PartialOrd for Record {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.shares_order_with(other) {
            return (self == other).then_some(Ordering::Equal);
        }
        for ((_, left), (_, right)) in self.iter().zip(other.iter()) {
            match left.partial_cmp(right)? {
                Ordering::Equal => continue,
                unequal => return Some(unequal),
            }
        }
        Some(Ordering::Equal)
    }
}

impl Record {
    fn shares_order_with(&self, other: &Record) -> bool {
        self.ty.is_ordered()
            && other.ty.is_ordered()
            && self.len() == other.len()
            && self
                .iter()
                .map(|(name, _)| name)
                .eq(other.iter().map(|(name, _)| name))
    }

    /// Materialize the iteration order as a mapping.
    pub fn to_mapping(&self) -> FieldMap {
        self.iter()
            .map(|(name, value)| (name.into(), value.clone()))
            .collect()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.iter()
                .map(|(name, value)| (name.to_string(), value.clone().into()))
                .collect(),
        )
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            m.serialize_entry(name, value)?;
        }
        m.end()
    }
}
