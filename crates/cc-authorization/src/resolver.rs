//! Permission resolution
//!
//! Turns an actor's roles into a [`ResolvedPermissions`] for one target in
//! five passes:
//!
//! 1. highest access level per domain
//! 2. editable/returnable field aggregation, rule sets evaluated in context
//! 3. privileged returnable fields bucketed by level, with downward inheritance
//! 4. chain-of-command flag per domain
//! 5. union of features and administrable roles
//!
//! Resolution never fails. Anything it cannot establish resolves to deny.

use crate::hierarchy::HierarchyOracle;
use crate::identity::PersonId;
use crate::level::AccessLevel;
use crate::registry::Registry;
use crate::resolved::ResolvedPermissions;
use crate::role::{AccessCategory, Role};
use crate::rule::AuthorizationContext;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

/// Resolves permissions against a frozen registry and a hierarchy oracle.
#[derive(Debug)]
pub struct Resolver<'r, O: ?Sized> {
    registry: &'r Registry,
    oracle: &'r O,
}

impl<O: ?Sized> Clone for Resolver<'_, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O: ?Sized> Copy for Resolver<'_, O> {}

impl<'r, O: HierarchyOracle + ?Sized> Resolver<'r, O> {
    /// Create a resolver.
    pub fn new(registry: &'r Registry, oracle: &'r O) -> Self {
        Self { registry, oracle }
    }

    /// The registry roles are looked up in.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Resolve for an actor holding `role_names` (default roles are added
    /// automatically, unknown names are skipped) against `target`.
    pub fn resolve<S: AsRef<str>>(
        &self,
        actor: PersonId,
        role_names: &[S],
        target: Option<PersonId>,
    ) -> ResolvedPermissions {
        let roles = self.registry.assigned_roles(role_names);
        resolve_roles(&roles, actor, target, self.oracle)
    }
}

/// Resolve permissions for an explicit list of roles.
///
/// Roles are deduplicated by name. Default roles are not added here; use
/// [`Resolver::resolve`] or [`Registry::assigned_roles`] for that.
pub fn resolve_roles<O: HierarchyOracle + ?Sized>(
    roles: &[&Role],
    actor: PersonId,
    target: Option<PersonId>,
    oracle: &O,
) -> ResolvedPermissions {
    let mut seen = BTreeSet::new();
    let roles: Vec<&Role> = roles
        .iter()
        .copied()
        .filter(|role| seen.insert(role.name().to_lowercase()))
        .collect();

    let oracle: &dyn HierarchyOracle = &oracle;
    let mut resolved = ResolvedPermissions::empty(actor, target);
    resolved.role_names = roles.iter().map(|role| role.name().to_string()).collect();

    resolved.highest_level_per_domain = highest_levels(&roles);
    aggregate_fields(&roles, &mut resolved, oracle);
    resolved.privileged_returnable_fields = privileged_fields(&roles);

    resolved.is_superior_per_domain = resolved
        .highest_level_per_domain
        .iter()
        .map(|(domain, level)| {
            let superior = target.is_some_and(|target| {
                target != actor && level.chain_of_command(oracle, &actor, &target)
            });
            (domain.clone(), superior)
        })
        .collect();

    for role in &roles {
        resolved
            .accessible_features
            .extend(role.accessible_features().iter().cloned());
        resolved
            .administrable_roles
            .extend(role.administers().iter().cloned());
    }

    debug!(
        actor = %actor,
        target = ?target,
        roles = roles.len(),
        domains = resolved.highest_level_per_domain.len(),
        "resolved permissions"
    );
    resolved
}

fn highest_levels(roles: &[&Role]) -> BTreeMap<String, AccessLevel> {
    let mut levels: BTreeMap<String, AccessLevel> = BTreeMap::new();
    for role in roles {
        for block in role.domains() {
            let level = levels.entry(block.name().to_string()).or_default();
            *level = (*level).max(role.access_level());
        }
    }
    levels
}

fn aggregate_fields(
    roles: &[&Role],
    resolved: &mut ResolvedPermissions,
    oracle: &dyn HierarchyOracle,
) {
    let levels = &resolved.highest_level_per_domain;
    let mut editable: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut returnable: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for role in roles {
        for block in role.domains() {
            let context = AuthorizationContext::new(
                resolved.actor,
                resolved.target,
                block.name(),
                levels,
                oracle,
            );
            for rule_set in block.rule_sets() {
                let satisfied = rule_set.is_satisfied(&context);
                trace!(
                    role = role.name(),
                    domain = block.name(),
                    category = ?rule_set.category(),
                    fields = rule_set.fields().len(),
                    satisfied,
                    "evaluated field rule set"
                );
                if !satisfied {
                    continue;
                }
                let sink = match rule_set.category() {
                    AccessCategory::Edit => &mut editable,
                    AccessCategory::Return => &mut returnable,
                };
                for field in rule_set.fields() {
                    sink.entry(field.owner.clone())
                        .or_default()
                        .insert(field.field.clone());
                }
            }
        }
    }

    resolved.editable_fields = editable;
    resolved.returnable_fields = returnable;
}

fn privileged_fields(roles: &[&Role]) -> BTreeMap<String, BTreeMap<AccessLevel, BTreeSet<String>>> {
    let mut domains: BTreeMap<String, BTreeMap<AccessLevel, BTreeSet<String>>> = BTreeMap::new();

    for role in roles {
        for block in role.domains() {
            let pure = block.rule_sets().iter().filter(|rule_set| {
                rule_set.category() == AccessCategory::Return
                    && rule_set.is_pure_chain_of_command()
            });
            for rule_set in pure {
                domains
                    .entry(block.name().to_string())
                    .or_default()
                    .entry(role.access_level())
                    .or_default()
                    .extend(rule_set.fields().iter().map(|field| field.field.clone()));
            }
        }
    }

    for buckets in domains.values_mut() {
        inherit(buckets, AccessLevel::Command, AccessLevel::Department);
        inherit(buckets, AccessLevel::Department, AccessLevel::Division);
    }
    domains
}

fn inherit(
    buckets: &mut BTreeMap<AccessLevel, BTreeSet<String>>,
    from: AccessLevel,
    into: AccessLevel,
) {
    if let Some(fields) = buckets.get(&from).cloned() {
        buckets.entry(into).or_default().extend(fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::InMemoryHierarchy;
    use crate::identity::fields_of;
    use crate::role::{DomainBlock, FieldRuleSet};
    use crate::rule::Rule;

    fn person(seed: u8) -> PersonId {
        PersonId::from_bytes([seed; 16])
    }

    fn division_chief() -> Role {
        Role::builder("Division-Chief")
            .access_level(AccessLevel::Division)
            .domain(DomainBlock::new("Primary").grant(
                FieldRuleSet::returnable(fields_of("Person", &["rank"])).if_superior_in("Primary"),
            ))
            .build()
    }

    fn self_service() -> Role {
        Role::builder("Self-Service")
            .access_level(AccessLevel::SelfOnly)
            .domain(
                DomainBlock::new("Primary")
                    .grant(FieldRuleSet::edit(fields_of("Person", &["phone"])).if_self()),
            )
            .build()
    }

    fn pure(name: &str, level: AccessLevel, field: &str) -> Role {
        Role::builder(name)
            .access_level(level)
            .domain(DomainBlock::new("Primary").grant(
                FieldRuleSet::returnable(fields_of("Person", &[field])).if_superior_in("Primary"),
            ))
            .build()
    }

    fn chart(same_division: bool) -> InMemoryHierarchy {
        let mut chart = InMemoryHierarchy::new();
        let division = if same_division { "OPS-1" } else { "OPS-2" };
        chart
            .place(person(1), Some("CMD"), Some("OPS"), Some("OPS-1"))
            .place(person(2), Some("CMD"), Some("OPS"), Some(division));
        chart
    }

    #[test]
    fn test_superior_in_same_division_sees_field() {
        let role = division_chief();
        let resolved = resolve_roles(&[&role], person(1), Some(person(2)), &chart(true));
        assert!(resolved.can_return("Person", "rank"));
        assert!(resolved.is_in_chain_of_command("Primary"));
    }

    #[test]
    fn test_other_division_does_not_see_field() {
        let role = division_chief();
        let resolved = resolve_roles(&[&role], person(1), Some(person(2)), &chart(false));
        assert!(!resolved.can_return("Person", "rank"));
        assert!(!resolved.is_in_chain_of_command("Primary"));
    }

    #[test]
    fn test_self_edit() {
        let role = self_service();
        let resolved = resolve_roles(&[&role], person(1), Some(person(1)), &chart(true));
        assert!(resolved.can_edit("Person", "phone"));

        let resolved = resolve_roles(&[&role], person(1), Some(person(2)), &chart(true));
        assert!(!resolved.can_edit("Person", "phone"));
    }

    #[test]
    fn test_privileged_buckets_inherit_downwards() {
        let command = pure("Captain", AccessLevel::Command, "ssn");
        let division = pure("Chief", AccessLevel::Division, "name");
        let resolved = resolve_roles(&[&command, &division], person(1), None, &chart(true));

        let at_division = resolved.privileged_fields("Primary", AccessLevel::Division);
        assert!(at_division.contains("ssn"));
        assert!(at_division.contains("name"));
        let at_command = resolved.privileged_fields("Primary", AccessLevel::Command);
        assert_eq!(at_command.into_iter().collect::<Vec<_>>(), vec!["ssn".to_string()]);
        let at_department = resolved.privileged_fields("Primary", AccessLevel::Department);
        assert!(at_department.contains("ssn"));
        assert!(!at_department.contains("name"));
    }

    #[test]
    fn test_missing_target_fails_closed() {
        let chief = division_chief();
        let own = self_service();
        let resolved = resolve_roles(&[&chief, &own], person(1), None, &chart(true));
        assert!(resolved.editable_fields().is_empty());
        assert!(resolved.returnable_fields().is_empty());
        assert!(!resolved.is_in_chain_of_command("Primary"));
        // Privileged buckets do not depend on the target.
        assert!(resolved
            .privileged_fields("Primary", AccessLevel::Division)
            .contains("rank"));
    }

    #[test]
    fn test_highest_level_wins_per_domain() {
        let low = division_chief();
        let high = Role::builder("Captain")
            .access_level(AccessLevel::Command)
            .domain(DomainBlock::new("Primary"))
            .build();
        let resolved = resolve_roles(&[&low, &high], person(1), Some(person(2)), &chart(false));
        assert_eq!(resolved.highest_level("Primary"), AccessLevel::Command);
        // Command level reaches across divisions.
        assert!(resolved.can_return("Person", "rank"));
    }

    #[test]
    fn test_actor_is_not_own_superior() {
        let role = division_chief();
        let resolved = resolve_roles(&[&role], person(1), Some(person(1)), &chart(true));
        assert!(!resolved.is_in_chain_of_command("Primary"));
        // The rule itself does not exclude the actor's own record.
        assert!(resolved.can_return("Person", "rank"));
    }

    #[test]
    fn test_duplicate_roles_count_once() {
        let role = division_chief();
        let resolved = resolve_roles(&[&role, &role], person(1), None, &chart(true));
        assert_eq!(resolved.role_names(), &["Division-Chief".to_string()]);
    }

    #[test]
    fn test_features_and_administration_union() {
        let a = Role::builder("A")
            .accessible_features(["EditNews"])
            .administers(["Users"])
            .build();
        let b = Role::builder("B")
            .accessible_features(["AdminTools"])
            .administers(["A"])
            .domain(DomainBlock::new("Main").grant(
                FieldRuleSet::returnable(fields_of("Person", &["x"])).require_any([Rule::AlwaysDeny]),
            ))
            .build();
        let resolved = resolve_roles(&[&a, &b], person(1), None, &chart(true));
        assert!(resolved.can_access_features(&["adminTools"]));
        assert!(resolved.can_administer("Users"));
        assert!(resolved.can_administer("A"));
        assert!(resolved.returnable_fields().is_empty());
        assert!(resolved.privileged_returnable_fields().is_empty());
    }
}
