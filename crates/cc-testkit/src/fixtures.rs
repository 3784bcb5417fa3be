//! Org chart and role fixtures

use cc_authorization::{
    fields_of, AccessLevel, DomainBlock, FieldRuleSet, InMemoryHierarchy, PersonId, Role,
};
use uuid::Uuid;

/// Domain used by the scenario roles.
pub const PRIMARY: &str = "Primary";
/// Record type used by the scenario roles.
pub const PERSON: &str = "Person";

/// Deterministic person id for a seed.
pub fn test_person(seed: u64) -> PersonId {
    PersonId::from_uuid(Uuid::new_v5(
        &Uuid::NAMESPACE_OID,
        format!("cc-person-{seed}").as_bytes(),
    ))
}

/// A small command with one person at every distance from `officer`.
///
/// ```text
/// CMD / OPS / OPS-1   officer, division_peer
/// CMD / OPS / OPS-2   department_peer
/// CMD / ENG / ENG-1   command_peer
/// OTHER / OPS / OPS-1 outsider
/// (not placed)        unplaced
/// ```
#[derive(Debug, Clone)]
pub struct OrgChartFixture {
    /// The oracle over the chart below
    pub chart: InMemoryHierarchy,
    /// The acting person in most tests
    pub officer: PersonId,
    /// Same division as `officer`
    pub division_peer: PersonId,
    /// Same department, other division
    pub department_peer: PersonId,
    /// Same command, other department
    pub command_peer: PersonId,
    /// Another command entirely
    pub outsider: PersonId,
    /// Nobody knows where this person sits
    pub unplaced: PersonId,
}

impl OrgChartFixture {
    /// Build the chart.
    pub fn new() -> Self {
        let officer = test_person(1);
        let division_peer = test_person(2);
        let department_peer = test_person(3);
        let command_peer = test_person(4);
        let outsider = test_person(5);
        let unplaced = test_person(6);

        let mut chart = InMemoryHierarchy::new();
        chart
            .place(officer, Some("CMD"), Some("OPS"), Some("OPS-1"))
            .place(division_peer, Some("CMD"), Some("OPS"), Some("OPS-1"))
            .place(department_peer, Some("CMD"), Some("OPS"), Some("OPS-2"))
            .place(command_peer, Some("CMD"), Some("ENG"), Some("ENG-1"))
            .place(outsider, Some("OTHER"), Some("OPS"), Some("OPS-1"));

        Self {
            chart,
            officer,
            division_peer,
            department_peer,
            command_peer,
            outsider,
            unplaced,
        }
    }

    /// Everyone other than the officer, nearest first.
    pub fn others(&self) -> [PersonId; 5] {
        [
            self.division_peer,
            self.department_peer,
            self.command_peer,
            self.outsider,
            self.unplaced,
        ]
    }
}

impl Default for OrgChartFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Division-level role that may read `rank` within its chain of command.
pub fn division_chief() -> Role {
    Role::builder("Division-Chief")
        .access_level(AccessLevel::Division)
        .domain(DomainBlock::new(PRIMARY).grant(
            FieldRuleSet::returnable(fields_of(PERSON, &["rank"])).if_superior_in(PRIMARY),
        ))
        .build()
}

/// Self-level role that may edit its own `phone`.
pub fn self_service() -> Role {
    Role::builder("Self-Service")
        .access_level(AccessLevel::SelfOnly)
        .domain(
            DomainBlock::new(PRIMARY)
                .grant(FieldRuleSet::edit(fields_of(PERSON, &["phone"])).if_self()),
        )
        .build()
}

/// Role granting chain-of-command return access to `fields` in `domain`.
pub fn chain_of_command_reader(
    name: &str,
    level: AccessLevel,
    domain: &str,
    fields: &[&str],
) -> Role {
    Role::builder(name)
        .access_level(level)
        .domain(
            DomainBlock::new(domain)
                .grant(FieldRuleSet::returnable(fields_of(PERSON, fields)).if_superior_in(domain)),
        )
        .build()
}

/// Role granting unconditional return access to `fields` in `domain`.
pub fn open_reader(name: &str, level: AccessLevel, domain: &str, fields: &[&str]) -> Role {
    Role::builder(name)
        .access_level(level)
        .domain(DomainBlock::new(domain).grant(FieldRuleSet::returnable(fields_of(PERSON, fields))))
        .build()
}
