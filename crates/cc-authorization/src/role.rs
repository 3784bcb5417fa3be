//! Role definitions: roles, domain blocks and field rule sets
//!
//! All builders consume `self` and hand back a new value, so a definition is
//! either finished or not constructed at all. Validation (unique names,
//! unique domains per role, non-empty disjunctions) happens once, when the
//! [`Registry`](crate::Registry) is built.

use crate::identity::FieldRef;
use crate::level::AccessLevel;
use crate::rule::{AuthorizationContext, Rule, RuleDisjunction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which kind of access a [`FieldRuleSet`] grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccessCategory {
    /// The fields may be written
    Edit,
    /// The fields may be read
    Return,
}

/// A set of fields guarded by a conjunction of rule disjunctions.
///
/// An empty disjunction list is the vacuous conjunction: always satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRuleSet {
    category: AccessCategory,
    fields: BTreeSet<FieldRef>,
    disjunctions: Vec<RuleDisjunction>,
}

impl FieldRuleSet {
    /// Create a rule set with no conditions.
    pub fn new(category: AccessCategory, fields: impl IntoIterator<Item = FieldRef>) -> Self {
        Self {
            category,
            fields: fields.into_iter().collect(),
            disjunctions: Vec::new(),
        }
    }

    /// Unconditional edit access to `fields`.
    pub fn edit(fields: impl IntoIterator<Item = FieldRef>) -> Self {
        Self::new(AccessCategory::Edit, fields)
    }

    /// Unconditional return access to `fields`.
    pub fn returnable(fields: impl IntoIterator<Item = FieldRef>) -> Self {
        Self::new(AccessCategory::Return, fields)
    }

    /// Add a disjunction that must also hold.
    pub fn require_any(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.disjunctions.push(rules.into_iter().collect());
        self
    }

    /// Require the target to be the actor.
    pub fn if_self(self) -> Self {
        self.require_any([Rule::IsSelf])
    }

    /// Require the actor to be in the target's chain of command in `domain`.
    pub fn if_superior_in(self, domain: impl Into<String>) -> Self {
        self.require_any([Rule::superior_in(domain)])
    }

    /// Access category.
    pub fn category(&self) -> AccessCategory {
        self.category
    }

    /// Governed fields.
    pub fn fields(&self) -> &BTreeSet<FieldRef> {
        &self.fields
    }

    /// Conjunction of disjunctions guarding the fields.
    pub fn disjunctions(&self) -> &[RuleDisjunction] {
        &self.disjunctions
    }

    /// Every disjunction has at least one satisfied rule.
    pub fn is_satisfied(&self, context: &AuthorizationContext<'_>) -> bool {
        self.disjunctions
            .iter()
            .all(|disjunction| disjunction.is_satisfied(context))
    }

    /// Expressible as "grant at or above some organizational level": no
    /// conditions at all, or only chain-of-command rules.
    pub fn is_pure_chain_of_command(&self) -> bool {
        self.disjunctions
            .iter()
            .all(RuleDisjunction::is_pure_chain_of_command)
    }

    pub(crate) fn disjunctions_mut(&mut self) -> &mut [RuleDisjunction] {
        &mut self.disjunctions
    }
}

/// A named organizational domain owned by a role.
///
/// The owning role's access level applies to every rule set in the block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainBlock {
    name: String,
    rule_sets: Vec<FieldRuleSet>,
}

impl DomainBlock {
    /// Create an empty block. An empty block still counts towards the
    /// actor's level in that domain.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rule_sets: Vec::new(),
        }
    }

    /// Add a rule set.
    pub fn grant(mut self, rule_set: FieldRuleSet) -> Self {
        self.rule_sets.push(rule_set);
        self
    }

    /// Add an edit rule set guarded by `disjunctions`.
    pub fn can_edit(
        self,
        fields: impl IntoIterator<Item = FieldRef>,
        disjunctions: impl IntoIterator<Item = RuleDisjunction>,
    ) -> Self {
        self.grant_with(AccessCategory::Edit, fields, disjunctions)
    }

    /// Add a return rule set guarded by `disjunctions`.
    pub fn can_return(
        self,
        fields: impl IntoIterator<Item = FieldRef>,
        disjunctions: impl IntoIterator<Item = RuleDisjunction>,
    ) -> Self {
        self.grant_with(AccessCategory::Return, fields, disjunctions)
    }

    fn grant_with(
        self,
        category: AccessCategory,
        fields: impl IntoIterator<Item = FieldRef>,
        disjunctions: impl IntoIterator<Item = RuleDisjunction>,
    ) -> Self {
        let mut rule_set = FieldRuleSet::new(category, fields);
        rule_set.disjunctions.extend(disjunctions);
        self.grant(rule_set)
    }

    /// Domain name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rule sets in declaration order.
    pub fn rule_sets(&self) -> &[FieldRuleSet] {
        &self.rule_sets
    }

    pub(crate) fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub(crate) fn rule_sets_mut(&mut self) -> &mut [FieldRuleSet] {
        &mut self.rule_sets
    }
}

/// A named bundle of permissions that can be assigned to people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    name: String,
    access_level: AccessLevel,
    is_default: bool,
    domains: Vec<DomainBlock>,
    accessible_features: BTreeSet<String>,
    administers: BTreeSet<String>,
}

impl Role {
    /// Start defining a role.
    pub fn builder(name: impl Into<String>) -> RoleBuilder {
        RoleBuilder {
            role: Role {
                name: name.into(),
                access_level: AccessLevel::None,
                is_default: false,
                domains: Vec::new(),
                accessible_features: BTreeSet::new(),
                administers: BTreeSet::new(),
            },
        }
    }

    /// Registry key, unique case-insensitively.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Organizational reach of the role.
    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    /// Whether every person implicitly holds this role.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    /// Domain blocks in declaration order.
    pub fn domains(&self) -> &[DomainBlock] {
        &self.domains
    }

    /// Look up a domain block, ignoring case.
    pub fn domain(&self, name: &str) -> Option<&DomainBlock> {
        self.domains
            .iter()
            .find(|block| block.name.eq_ignore_ascii_case(name))
    }

    /// Feature flags this role unlocks.
    pub fn accessible_features(&self) -> &BTreeSet<String> {
        &self.accessible_features
    }

    /// Roles whose membership this role may administer.
    pub fn administers(&self) -> &BTreeSet<String> {
        &self.administers
    }

    pub(crate) fn domains_mut(&mut self) -> &mut [DomainBlock] {
        &mut self.domains
    }

    pub(crate) fn set_administers(&mut self, administers: BTreeSet<String>) {
        self.administers = administers;
    }
}

/// Consuming builder for [`Role`].
#[derive(Debug, Clone)]
#[must_use]
pub struct RoleBuilder {
    role: Role,
}

impl RoleBuilder {
    /// Set the access level.
    pub fn access_level(mut self, level: AccessLevel) -> Self {
        self.role.access_level = level;
        self
    }

    /// Mark the role as assigned to everyone.
    pub fn default_role(mut self) -> Self {
        self.role.is_default = true;
        self
    }

    /// Add a domain block.
    pub fn domain(mut self, block: DomainBlock) -> Self {
        self.role.domains.push(block);
        self
    }

    /// Add accessible feature flags.
    pub fn accessible_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role
            .accessible_features
            .extend(features.into_iter().map(Into::into));
        self
    }

    /// Add roles whose membership this role may administer.
    pub fn administers<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role
            .administers
            .extend(roles.into_iter().map(Into::into));
        self
    }

    /// Finish the definition.
    pub fn build(self) -> Role {
        self.role
    }
}
