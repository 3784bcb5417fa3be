//! The resolved permission set
//!
//! Output of one resolution call. Every collection is ordered, so two
//! resolutions over the same inputs compare and serialise identically.

use crate::identity::PersonId;
use crate::level::AccessLevel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What an actor may do, computed for one (actor, target) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPermissions {
    pub(crate) actor: PersonId,
    pub(crate) target: Option<PersonId>,
    pub(crate) role_names: Vec<String>,
    pub(crate) editable_fields: BTreeMap<String, BTreeSet<String>>,
    pub(crate) returnable_fields: BTreeMap<String, BTreeSet<String>>,
    pub(crate) privileged_returnable_fields: BTreeMap<String, BTreeMap<AccessLevel, BTreeSet<String>>>,
    pub(crate) highest_level_per_domain: BTreeMap<String, AccessLevel>,
    pub(crate) is_superior_per_domain: BTreeMap<String, bool>,
    pub(crate) administrable_roles: BTreeSet<String>,
    pub(crate) accessible_features: BTreeSet<String>,
}

impl ResolvedPermissions {
    /// An empty set: nothing editable, nothing returnable.
    pub(crate) fn empty(actor: PersonId, target: Option<PersonId>) -> Self {
        Self {
            actor,
            target,
            role_names: Vec::new(),
            editable_fields: BTreeMap::new(),
            returnable_fields: BTreeMap::new(),
            privileged_returnable_fields: BTreeMap::new(),
            highest_level_per_domain: BTreeMap::new(),
            is_superior_per_domain: BTreeMap::new(),
            administrable_roles: BTreeSet::new(),
            accessible_features: BTreeSet::new(),
        }
    }

    /// The requesting person.
    pub fn actor(&self) -> PersonId {
        self.actor
    }

    /// The record the permissions were resolved against.
    pub fn target(&self) -> Option<PersonId> {
        self.target
    }

    /// Names of the roles that took part, in registry order.
    pub fn role_names(&self) -> &[String] {
        &self.role_names
    }

    /// Writable fields, by owning type.
    pub fn editable_fields(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.editable_fields
    }

    /// Readable fields, by owning type.
    pub fn returnable_fields(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.returnable_fields
    }

    /// Fields visible at each organizational level, by domain.
    pub fn privileged_returnable_fields(
        &self,
    ) -> &BTreeMap<String, BTreeMap<AccessLevel, BTreeSet<String>>> {
        &self.privileged_returnable_fields
    }

    /// The actor's highest level in each domain they hold a role in.
    pub fn highest_level_per_domain(&self) -> &BTreeMap<String, AccessLevel> {
        &self.highest_level_per_domain
    }

    /// Whether the actor is in the target's chain of command, by domain.
    pub fn is_superior_per_domain(&self) -> &BTreeMap<String, bool> {
        &self.is_superior_per_domain
    }

    /// Roles whose membership the actor may change.
    pub fn administrable_roles(&self) -> &BTreeSet<String> {
        &self.administrable_roles
    }

    /// Feature flags the actor may use.
    pub fn accessible_features(&self) -> &BTreeSet<String> {
        &self.accessible_features
    }

    /// Whether `owner.field` is writable.
    pub fn can_edit(&self, owner: &str, field: &str) -> bool {
        self.editable_fields
            .get(owner)
            .is_some_and(|fields| fields.contains(field))
    }

    /// Whether `owner.field` is readable.
    pub fn can_return(&self, owner: &str, field: &str) -> bool {
        self.returnable_fields
            .get(owner)
            .is_some_and(|fields| fields.contains(field))
    }

    /// Unknown domains are never in the chain of command.
    pub fn is_in_chain_of_command(&self, domain: &str) -> bool {
        self.is_superior_per_domain
            .get(domain)
            .copied()
            .unwrap_or(false)
    }

    /// The actor's level in `domain`, `None` if they hold no role there.
    pub fn highest_level(&self, domain: &str) -> AccessLevel {
        self.highest_level_per_domain
            .get(domain)
            .copied()
            .unwrap_or_default()
    }

    /// True if any of `features` is accessible. Case-insensitive.
    pub fn can_access_features<S: AsRef<str>>(&self, features: &[S]) -> bool {
        features.iter().any(|wanted| {
            self.accessible_features
                .iter()
                .any(|held| held.eq_ignore_ascii_case(wanted.as_ref()))
        })
    }

    /// Whether the actor may change membership of `role`. Case-insensitive.
    pub fn can_administer(&self, role: &str) -> bool {
        self.administrable_roles
            .iter()
            .any(|held| held.eq_ignore_ascii_case(role))
    }

    /// Fields visible at `level` in `domain`, after inheritance.
    pub fn privileged_fields(&self, domain: &str, level: AccessLevel) -> BTreeSet<String> {
        self.privileged_returnable_fields
            .get(domain)
            .and_then(|buckets| buckets.get(&level))
            .cloned()
            .unwrap_or_default()
    }

    /// Fields a search limited to `level` in `domain` may filter on: the
    /// privileged fields at that level plus whatever is returnable on `owner`.
    pub fn searchable_fields(
        &self,
        domain: &str,
        level: AccessLevel,
        owner: &str,
    ) -> BTreeSet<String> {
        let mut fields = self.privileged_fields(domain, level);
        if let Some(returnable) = self.returnable_fields.get(owner) {
            fields.extend(returnable.iter().cloned());
        }
        fields
    }
}
