//! Stock role catalog
//!
//! The groups Command Central ships with, from the default `Users` role every
//! sailor holds up to `Developers`. Hosts can use the catalog as-is through
//! [`Registry::from_constructors`](crate::Registry::from_constructors), extend
//! it with TOML manifests, or ignore it entirely.

mod groups;

pub use groups::{
    admin, command_leadership, department_leadership, developers, division_leadership, lpos,
    users,
};

use crate::registry::RoleConstructor;
use crate::role::Role;

/// Primary personnel domain.
pub const MAIN: &str = "Main";
/// Muster (daily accountability) domain.
pub const MUSTER: &str = "Muster";

/// Record type the catalog's fields belong to.
pub const PERSON: &str = "Person";

/// Feature flag: post and edit news items.
pub const EDIT_NEWS: &str = "EditNews";
/// Feature flag: administrative tooling.
pub const ADMIN_TOOLS: &str = "AdminTools";
/// Feature flag: create person records.
pub const CREATE_PERSON: &str = "CreatePerson";
/// Feature flag: edit the FAQ.
pub const EDIT_FAQ: &str = "EditFAQ";

/// Compile-time registration list of the stock roles.
pub const CATALOG: &[RoleConstructor] = &[
    users,
    lpos,
    division_leadership,
    department_leadership,
    command_leadership,
    admin,
    developers,
];

/// Construct every stock role, in catalog order.
pub fn catalog_roles() -> Vec<Role> {
    CATALOG.iter().map(|construct| construct()).collect()
}
