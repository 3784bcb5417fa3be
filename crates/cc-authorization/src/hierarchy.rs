//! Organizational hierarchy oracle
//!
//! The engine never looks up command, department or division membership
//! itself. The host answers those questions through [`HierarchyOracle`];
//! [`InMemoryHierarchy`] is a ready-made implementation over an in-memory
//! org chart snapshot.

use crate::identity::PersonId;
use std::collections::HashMap;
use std::sync::Arc;

/// Answers "are these two people in the same unit?" at each organizational level.
///
/// Implementations must be side-effect free and give consistent answers for
/// the duration of one resolution call. They are shared across concurrent
/// resolutions, hence `Send + Sync`.
pub trait HierarchyOracle: Send + Sync {
    /// Whether `a` and `b` belong to the same command.
    fn same_command(&self, a: &PersonId, b: &PersonId) -> bool;

    /// Whether `a` and `b` belong to the same department.
    fn same_department(&self, a: &PersonId, b: &PersonId) -> bool;

    /// Whether `a` and `b` belong to the same division.
    fn same_division(&self, a: &PersonId, b: &PersonId) -> bool;
}

impl<T: HierarchyOracle + ?Sized> HierarchyOracle for &T {
    fn same_command(&self, a: &PersonId, b: &PersonId) -> bool {
        (**self).same_command(a, b)
    }
    fn same_department(&self, a: &PersonId, b: &PersonId) -> bool {
        (**self).same_department(a, b)
    }
    fn same_division(&self, a: &PersonId, b: &PersonId) -> bool {
        (**self).same_division(a, b)
    }
}

impl<T: HierarchyOracle + ?Sized> HierarchyOracle for Box<T> {
    fn same_command(&self, a: &PersonId, b: &PersonId) -> bool {
        (**self).same_command(a, b)
    }
    fn same_department(&self, a: &PersonId, b: &PersonId) -> bool {
        (**self).same_department(a, b)
    }
    fn same_division(&self, a: &PersonId, b: &PersonId) -> bool {
        (**self).same_division(a, b)
    }
}

impl<T: HierarchyOracle + ?Sized> HierarchyOracle for Arc<T> {
    fn same_command(&self, a: &PersonId, b: &PersonId) -> bool {
        (**self).same_command(a, b)
    }
    fn same_department(&self, a: &PersonId, b: &PersonId) -> bool {
        (**self).same_department(a, b)
    }
    fn same_division(&self, a: &PersonId, b: &PersonId) -> bool {
        (**self).same_division(a, b)
    }
}

/// Where a person sits in the org chart. Unset units never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgPlacement {
    /// Command identifier
    pub command: Option<String>,
    /// Department identifier
    pub department: Option<String>,
    /// Division identifier
    pub division: Option<String>,
}

impl OrgPlacement {
    /// Create a placement from optional unit names.
    pub fn new(command: Option<&str>, department: Option<&str>, division: Option<&str>) -> Self {
        Self {
            command: command.map(str::to_string),
            department: department.map(str::to_string),
            division: division.map(str::to_string),
        }
    }
}

/// Org chart snapshot that answers hierarchy questions from memory.
///
/// Departments and divisions are compared as (command, department[, division])
/// paths, so two commands that both have a department named "OPS" are not
/// treated as the same department.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHierarchy {
    placements: HashMap<PersonId, OrgPlacement>,
}

impl InMemoryHierarchy {
    /// Create an empty org chart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place (or move) a person in the org chart.
    pub fn place(
        &mut self,
        person: PersonId,
        command: Option<&str>,
        department: Option<&str>,
        division: Option<&str>,
    ) -> &mut Self {
        self.placements
            .insert(person, OrgPlacement::new(command, department, division));
        self
    }

    /// Insert a prepared placement.
    pub fn insert(&mut self, person: PersonId, placement: OrgPlacement) -> &mut Self {
        self.placements.insert(person, placement);
        self
    }

    /// Remove a person from the org chart.
    pub fn remove(&mut self, person: &PersonId) -> Option<OrgPlacement> {
        self.placements.remove(person)
    }

    /// Look up a person's placement.
    pub fn placement(&self, person: &PersonId) -> Option<&OrgPlacement> {
        self.placements.get(person)
    }

    /// Number of placed people.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether nobody is placed.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    fn both(&self, a: &PersonId, b: &PersonId) -> Option<(&OrgPlacement, &OrgPlacement)> {
        Some((self.placements.get(a)?, self.placements.get(b)?))
    }
}

fn same_unit(a: &Option<String>, b: &Option<String>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a == b)
}

impl HierarchyOracle for InMemoryHierarchy {
    fn same_command(&self, a: &PersonId, b: &PersonId) -> bool {
        self.both(a, b)
            .is_some_and(|(a, b)| same_unit(&a.command, &b.command))
    }

    fn same_department(&self, a: &PersonId, b: &PersonId) -> bool {
        self.both(a, b).is_some_and(|(a, b)| {
            same_unit(&a.command, &b.command) && same_unit(&a.department, &b.department)
        })
    }

    fn same_division(&self, a: &PersonId, b: &PersonId) -> bool {
        self.both(a, b).is_some_and(|(a, b)| {
            same_unit(&a.command, &b.command)
                && same_unit(&a.department, &b.department)
                && same_unit(&a.division, &b.division)
        })
    }
}

impl FromIterator<(PersonId, OrgPlacement)> for InMemoryHierarchy {
    fn from_iter<I: IntoIterator<Item = (PersonId, OrgPlacement)>>(iter: I) -> Self {
        Self {
            placements: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(seed: u8) -> PersonId {
        PersonId::from_bytes([seed; 16])
    }

    #[test]
    fn test_units_match_along_the_path() {
        let mut chart = InMemoryHierarchy::new();
        chart
            .place(person(1), Some("CMD"), Some("OPS"), Some("OPS-1"))
            .place(person(2), Some("CMD"), Some("OPS"), Some("OPS-2"))
            .place(person(3), Some("CMD"), Some("ENG"), Some("OPS-1"))
            .place(person(4), Some("OTHER"), Some("OPS"), Some("OPS-1"));

        assert!(chart.same_division(&person(1), &person(1)));
        assert!(chart.same_department(&person(1), &person(2)));
        assert!(!chart.same_division(&person(1), &person(2)));

        // Same division name under another department is a different division.
        assert!(!chart.same_division(&person(1), &person(3)));
        assert!(chart.same_command(&person(1), &person(3)));

        // Same department name under another command is a different department.
        assert!(!chart.same_department(&person(1), &person(4)));
        assert!(!chart.same_command(&person(1), &person(4)));
    }

    #[test]
    fn test_unset_or_unknown_never_matches() {
        let mut chart = InMemoryHierarchy::new();
        chart
            .place(person(1), Some("CMD"), None, None)
            .place(person(2), Some("CMD"), None, None);

        assert!(chart.same_command(&person(1), &person(2)));
        assert!(!chart.same_department(&person(1), &person(2)));
        assert!(!chart.same_division(&person(1), &person(2)));
        assert!(!chart.same_command(&person(1), &person(9)));
    }

    #[test]
    fn test_oracle_through_smart_pointers() {
        let chart: InMemoryHierarchy = vec![
            (person(1), OrgPlacement::new(Some("CMD"), None, None)),
            (person(2), OrgPlacement::new(Some("CMD"), None, None)),
        ]
        .into_iter()
        .collect();

        let shared: Arc<dyn HierarchyOracle> = Arc::new(chart);
        assert!(shared.same_command(&person(1), &person(2)));
        let boxed: Box<dyn HierarchyOracle> = Box::new(InMemoryHierarchy::new());
        assert!(!boxed.same_command(&person(1), &person(2)));
    }
}
