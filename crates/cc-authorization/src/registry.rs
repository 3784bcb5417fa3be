//! Role registry
//!
//! Built once at startup from an explicit list of role definitions, validated,
//! then frozen. Lookups afterwards are plain reads and need no locking, so one
//! registry can serve any number of concurrent resolutions.

use crate::config::AuthorizationConfig;
use crate::definitions;
use crate::errors::{AuthorizationError, AuthorizationResult};
use crate::hierarchy::HierarchyOracle;
use crate::identity::PersonId;
use crate::manifest::RoleManifest;
use crate::resolver::resolve_roles;
use crate::role::Role;
use crate::rule::Rule;
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{error, info, warn};

/// A role definition registered at compile time.
pub type RoleConstructor = fn() -> Role;

static GLOBAL: OnceCell<Registry> = OnceCell::new();

/// Install the process-wide registry. Fails if one is already installed.
pub fn install(registry: Registry) -> AuthorizationResult<&'static Registry> {
    GLOBAL
        .set(registry)
        .map_err(|_| AuthorizationError::RegistryAlreadyInstalled)?;
    GLOBAL
        .get()
        .ok_or(AuthorizationError::RegistryAlreadyInstalled)
}

/// The process-wide registry, if one has been installed.
pub fn global() -> Option<&'static Registry> {
    GLOBAL.get()
}

/// Every known role, keyed case-insensitively by name.
#[derive(Debug, Clone)]
pub struct Registry {
    roles: Vec<Role>,
    index: HashMap<String, usize>,
}

/// What an administrator sees when managing someone's role membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentOverview {
    /// The person's roles, explicit and default
    pub current_roles: Vec<String>,
    /// Roles whose membership the actor may change for this person
    pub administrable_roles: BTreeSet<String>,
    /// Every registered role name
    pub all_roles: Vec<String>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Registry {
    /// Validate and freeze a set of role definitions.
    ///
    /// Fails on duplicate role names, a role declaring the same domain twice,
    /// empty rule disjunctions, and `administers` entries naming unknown roles.
    /// Domain spellings are unified registry-wide: the first spelling seen wins.
    pub fn build(roles: impl IntoIterator<Item = Role>) -> AuthorizationResult<Self> {
        let mut roles: Vec<Role> = roles.into_iter().collect();

        let index = match Self::validate_and_index(&mut roles) {
            Ok(index) => index,
            Err(err) => {
                error!(error = %err, "role registry validation failed");
                return Err(err);
            }
        };

        let registry = Self { roles, index };
        info!(
            count = registry.len(),
            roles = %registry.names().collect::<Vec<_>>().join(","),
            "found {} role(s)",
            registry.len()
        );
        Ok(registry)
    }

    /// Build from a compile-time registration list.
    pub fn from_constructors(constructors: &[RoleConstructor]) -> AuthorizationResult<Self> {
        Self::build(constructors.iter().map(|construct| construct()))
    }

    /// Build from configuration: the stock catalog (if enabled) plus every
    /// configured manifest.
    pub fn from_config(config: &AuthorizationConfig) -> AuthorizationResult<Self> {
        config.validate()?;

        let mut roles = Vec::new();
        if config.builtin_catalog {
            roles.extend(definitions::catalog_roles());
        }
        for path in &config.manifests {
            roles.extend(RoleManifest::load(path)?.into_roles()?);
        }
        Self::build(roles)
    }

    fn validate_and_index(roles: &mut [Role]) -> AuthorizationResult<HashMap<String, usize>> {
        let mut index = HashMap::with_capacity(roles.len());
        for (position, role) in roles.iter().enumerate() {
            if role.name().trim().is_empty() {
                return Err(AuthorizationError::EmptyRoleName);
            }
            if index.insert(key(role.name()), position).is_some() {
                return Err(AuthorizationError::duplicate_role(role.name()));
            }
        }

        let mut domain_spellings: HashMap<String, String> = HashMap::new();
        for role in roles.iter() {
            let mut seen = BTreeSet::new();
            for block in role.domains() {
                if !seen.insert(key(block.name())) {
                    return Err(AuthorizationError::duplicate_domain(
                        role.name(),
                        block.name(),
                    ));
                }
                domain_spellings
                    .entry(key(block.name()))
                    .or_insert_with(|| block.name().to_string());

                let empty = block
                    .rule_sets()
                    .iter()
                    .flat_map(|set| set.disjunctions())
                    .any(|disjunction| disjunction.is_empty());
                if empty {
                    return Err(AuthorizationError::empty_disjunction(
                        role.name(),
                        block.name(),
                    ));
                }
            }
        }

        let registered: Vec<String> = roles.iter().map(|role| role.name().to_string()).collect();
        for role in roles.iter_mut() {
            let administers = role
                .administers()
                .iter()
                .map(|name| match index.get(&key(name)) {
                    Some(&position) => Ok(registered[position].clone()),
                    None => Err(AuthorizationError::unknown_administered(role.name(), name)),
                })
                .collect::<AuthorizationResult<BTreeSet<String>>>()?;
            role.set_administers(administers);
            Self::canonicalise_domains(role, &domain_spellings);
        }

        Ok(index)
    }

    fn canonicalise_domains(role: &mut Role, spellings: &HashMap<String, String>) {
        for block in role.domains_mut() {
            if let Some(canonical) = spellings.get(&key(block.name())) {
                if canonical != block.name() {
                    let canonical = canonical.clone();
                    block.rename(&canonical);
                }
            }
            for set in block.rule_sets_mut() {
                for disjunction in set.disjunctions_mut() {
                    for rule in disjunction.rules_mut() {
                        if let Rule::IsSuperiorInDomain(domain) = rule {
                            match spellings.get(&key(domain)) {
                                Some(canonical) => *domain = canonical.clone(),
                                None => warn!(
                                    domain = %domain,
                                    "chain-of-command rule names a domain no role declares; it will always deny"
                                ),
                            }
                        }
                    }
                }
            }
        }
    }

    /// Look up a role, ignoring case.
    pub fn get(&self, name: &str) -> Option<&Role> {
        self.index.get(&key(name)).map(|&position| &self.roles[position])
    }

    /// Whether a role with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&key(name))
    }

    /// All roles in registration order.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// All role names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(Role::name)
    }

    /// Roles held implicitly by everyone.
    pub fn default_roles(&self) -> impl Iterator<Item = &Role> {
        self.roles.iter().filter(|role| role.is_default())
    }

    /// Number of registered roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// The roles a person holds: the named roles plus every default role,
    /// each once, in registration order. Unknown names are skipped.
    pub fn assigned_roles<S: AsRef<str>>(&self, names: &[S]) -> Vec<&Role> {
        let mut selected = vec![false; self.roles.len()];
        for name in names {
            match self.index.get(&key(name.as_ref())) {
                Some(&position) => selected[position] = true,
                None => warn!(role = name.as_ref(), "ignoring unknown role assignment"),
            }
        }
        self.roles
            .iter()
            .zip(selected)
            .filter(|(role, selected)| *selected || role.is_default())
            .map(|(role, _)| role)
            .collect()
    }

    /// Summarise a person's role membership for an administrator.
    pub fn assignment_overview<A, P, O>(
        &self,
        actor: PersonId,
        actor_roles: &[A],
        person: PersonId,
        person_roles: &[P],
        oracle: &O,
    ) -> AssignmentOverview
    where
        A: AsRef<str>,
        P: AsRef<str>,
        O: HierarchyOracle + ?Sized,
    {
        let resolved = resolve_roles(&self.assigned_roles(actor_roles), actor, Some(person), oracle);
        AssignmentOverview {
            current_roles: self
                .assigned_roles(person_roles)
                .into_iter()
                .map(|role| role.name().to_string())
                .collect(),
            administrable_roles: resolved.administrable_roles().clone(),
            all_roles: self.names().map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::fields_of;
    use crate::level::AccessLevel;
    use crate::role::{DomainBlock, FieldRuleSet};
    use crate::rule::RuleDisjunction;

    fn plain(name: &str) -> Role {
        Role::builder(name).build()
    }

    #[test]
    fn test_duplicate_names_are_fatal_case_insensitively() {
        let err = Registry::build(vec![plain("Users"), plain("users")]).unwrap_err();
        assert_eq!(err, AuthorizationError::duplicate_role("users"));
    }

    #[test]
    fn test_blank_name_is_fatal() {
        let err = Registry::build(vec![plain("  ")]).unwrap_err();
        assert_eq!(err, AuthorizationError::EmptyRoleName);
    }

    #[test]
    fn test_duplicate_domain_is_fatal() {
        let role = Role::builder("Admin")
            .domain(DomainBlock::new("Main"))
            .domain(DomainBlock::new("MAIN"))
            .build();
        let err = Registry::build(vec![role]).unwrap_err();
        assert_eq!(err, AuthorizationError::duplicate_domain("Admin", "MAIN"));
    }

    #[test]
    fn test_empty_disjunction_is_fatal() {
        let role = Role::builder("Broken")
            .domain(DomainBlock::new("Main").can_return(
                fields_of("Person", &["name"]),
                [RuleDisjunction::new(vec![])],
            ))
            .build();
        let err = Registry::build(vec![role]).unwrap_err();
        assert_eq!(err, AuthorizationError::empty_disjunction("Broken", "Main"));
    }

    #[test]
    fn test_unknown_administered_role_is_fatal() {
        let role = Role::builder("Admin").administers(["Ghosts"]).build();
        let err = Registry::build(vec![role]).unwrap_err();
        assert_eq!(err, AuthorizationError::unknown_administered("Admin", "Ghosts"));
    }

    #[test]
    fn test_administers_uses_registered_spelling() {
        let admin = Role::builder("Admin").administers(["users", "ADMIN"]).build();
        let registry = Registry::build(vec![plain("Users"), admin]).unwrap();
        let administers: Vec<_> = registry
            .get("admin")
            .unwrap()
            .administers()
            .iter()
            .cloned()
            .collect();
        assert_eq!(administers, vec!["Admin".to_string(), "Users".to_string()]);
    }

    #[test]
    fn test_domain_spelling_is_unified() {
        let first = Role::builder("First")
            .access_level(AccessLevel::Division)
            .domain(DomainBlock::new("Primary"))
            .build();
        let second = Role::builder("Second")
            .domain(
                DomainBlock::new("primary").grant(
                    FieldRuleSet::returnable(fields_of("Person", &["rank"]))
                        .if_superior_in("PRIMARY"),
                ),
            )
            .build();
        let registry = Registry::build(vec![first, second]).unwrap();

        let block = &registry.get("second").unwrap().domains()[0];
        assert_eq!(block.name(), "Primary");
        assert_eq!(
            block.rule_sets()[0].disjunctions()[0].rules(),
            &[Rule::superior_in("Primary")]
        );
    }

    #[test]
    fn test_assigned_roles_adds_defaults_once() {
        let users = Role::builder("Users").default_role().build();
        let registry =
            Registry::build(vec![users, plain("Admin"), plain("LPOs")]).unwrap();

        let names: Vec<_> = registry
            .assigned_roles(&["lpos", "Users", "Nobody", "LPOS"])
            .into_iter()
            .map(Role::name)
            .collect();
        assert_eq!(names, vec!["Users", "LPOs"]);

        let none: &[&str] = &[];
        let names: Vec<_> = registry.assigned_roles(none).into_iter().map(Role::name).collect();
        assert_eq!(names, vec!["Users"]);
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }
}
