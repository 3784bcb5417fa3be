//! Person identifiers and field references

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Identity of a person record, used for both actors and targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonId(Uuid);

impl PersonId {
    /// Create a random person id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a person id from raw bytes. Deterministic, handy for fixtures.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// The underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "person-{}", self.0)
    }
}

impl From<Uuid> for PersonId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A field of a record type, e.g. `Person.rank`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    /// The record type that declares the field
    pub owner: String,
    /// The field name
    pub field: String,
}

impl FieldRef {
    /// Create a field reference.
    pub fn new(owner: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            field: field.into(),
        }
    }

    /// Parse the `Type.field` spelling. Both halves must be non-empty.
    pub fn parse(spelling: &str) -> Option<Self> {
        let (owner, field) = spelling.trim().split_once('.')?;
        let (owner, field) = (owner.trim(), field.trim());
        if owner.is_empty() || field.is_empty() || field.contains('.') {
            return None;
        }
        Some(Self::new(owner, field))
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.field)
    }
}

/// Build a field set for several fields of one record type.
pub fn fields_of(owner: &str, names: &[&str]) -> BTreeSet<FieldRef> {
    names.iter().map(|name| FieldRef::new(owner, *name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_ref_parse() {
        assert_eq!(
            FieldRef::parse("Person.rank"),
            Some(FieldRef::new("Person", "rank"))
        );
        assert_eq!(
            FieldRef::parse(" Watchbill . title "),
            Some(FieldRef::new("Watchbill", "title"))
        );
        assert_eq!(FieldRef::parse("rank"), None);
        assert_eq!(FieldRef::parse(".rank"), None);
        assert_eq!(FieldRef::parse("Person."), None);
        assert_eq!(FieldRef::parse("A.b.c"), None);
    }

    #[test]
    fn test_fields_of_deduplicates() {
        let set = fields_of("Person", &["ssn", "rank", "ssn"]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&FieldRef::new("Person", "ssn")));
    }

    #[test]
    fn test_person_id_is_deterministic_from_bytes() {
        assert_eq!(PersonId::from_bytes([7; 16]), PersonId::from_bytes([7; 16]));
        assert_ne!(PersonId::from_bytes([7; 16]), PersonId::from_bytes([8; 16]));
        assert!(PersonId::from_bytes([7; 16]).to_string().starts_with("person-"));
    }
}
