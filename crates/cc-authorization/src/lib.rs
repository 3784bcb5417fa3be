//! # Command Central Authorization
//!
//! Field-level permission resolution for personnel records.
//!
//! Administrators declare named roles once. At request time the resolver
//! computes, for one acting person and an optional target record, exactly
//! which fields of which record types may be read and which may be written,
//! scoped by the organizational hierarchy (command, department, division).
//!
//! ## Core Concepts
//!
//! - [`Role`]: a named bundle of an [`AccessLevel`], [`DomainBlock`]s, feature
//!   flags and the roles it may administer.
//! - [`DomainBlock`]: a named organizational axis ("Main", "Muster") holding
//!   [`FieldRuleSet`]s.
//! - [`FieldRuleSet`]: one access category plus the fields it governs, guarded
//!   by a conjunction of [`RuleDisjunction`]s.
//! - [`Registry`]: every role, validated once at startup and frozen.
//! - [`Resolver`]: turns an actor's roles into a [`ResolvedPermissions`].
//!
//! The organizational hierarchy itself is supplied by the host through
//! [`HierarchyOracle`].
//!
//! ## Usage
//!
//! ```rust
//! use cc_authorization::{
//!     AccessLevel, DomainBlock, FieldRuleSet, InMemoryHierarchy, PersonId, Registry,
//!     Resolver, Role, fields_of,
//! };
//!
//! let chief = Role::builder("Division-Chief")
//!     .access_level(AccessLevel::Division)
//!     .domain(DomainBlock::new("Primary").grant(
//!         FieldRuleSet::returnable(fields_of("Person", &["rank"])).if_superior_in("Primary"),
//!     ))
//!     .build();
//! let registry = Registry::build(vec![chief]).unwrap();
//!
//! let actor = PersonId::from_bytes([1; 16]);
//! let target = PersonId::from_bytes([2; 16]);
//! let mut hierarchy = InMemoryHierarchy::new();
//! hierarchy.place(actor, Some("CMD"), Some("OPS"), Some("OPS-1"));
//! hierarchy.place(target, Some("CMD"), Some("OPS"), Some("OPS-1"));
//!
//! let resolver = Resolver::new(&registry, &hierarchy);
//! let resolved = resolver.resolve(actor, &["Division-Chief"], Some(target));
//! assert!(resolved.can_return("Person", "rank"));
//! ```

pub mod config;
pub mod definitions;
pub mod errors;
pub mod hierarchy;
pub mod identity;
pub mod level;
pub mod manifest;
pub mod registry;
pub mod resolved;
pub mod resolver;
pub mod role;
pub mod rule;

pub use config::AuthorizationConfig;
pub use errors::{AuthorizationError, AuthorizationResult};
pub use hierarchy::{HierarchyOracle, InMemoryHierarchy, OrgPlacement};
pub use identity::{fields_of, FieldRef, PersonId};
pub use level::AccessLevel;
pub use manifest::RoleManifest;
pub use registry::{AssignmentOverview, Registry, RoleConstructor};
pub use resolved::ResolvedPermissions;
pub use resolver::{resolve_roles, Resolver};
pub use role::{AccessCategory, DomainBlock, FieldRuleSet, Role, RoleBuilder};
pub use rule::{AuthorizationContext, Rule, RuleDisjunction};
