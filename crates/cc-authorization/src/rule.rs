//! Authorization rules and their evaluation context

use crate::hierarchy::HierarchyOracle;
use crate::identity::PersonId;
use crate::level::AccessLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Everything a [`Rule`] may look at.
///
/// Carries the per-domain highest levels computed before any rule runs, so
/// chain-of-command rules can pick the right hierarchy predicate.
#[derive(Clone, Copy)]
pub struct AuthorizationContext<'a> {
    actor: PersonId,
    target: Option<PersonId>,
    domain: &'a str,
    levels: &'a BTreeMap<String, AccessLevel>,
    oracle: &'a dyn HierarchyOracle,
}

impl<'a> AuthorizationContext<'a> {
    /// Create a context for evaluating rules inside `domain`.
    pub fn new(
        actor: PersonId,
        target: Option<PersonId>,
        domain: &'a str,
        levels: &'a BTreeMap<String, AccessLevel>,
        oracle: &'a dyn HierarchyOracle,
    ) -> Self {
        Self {
            actor,
            target,
            domain,
            levels,
            oracle,
        }
    }

    /// The person making the request.
    pub fn actor(&self) -> PersonId {
        self.actor
    }

    /// The record being accessed, if any.
    pub fn target(&self) -> Option<PersonId> {
        self.target
    }

    /// The domain block whose rule sets are being evaluated.
    pub fn domain(&self) -> &'a str {
        self.domain
    }

    /// The actor's highest level in `domain`. Unknown domains are `None`.
    pub fn level_in(&self, domain: &str) -> AccessLevel {
        self.levels.get(domain).copied().unwrap_or_default()
    }
}

impl fmt::Debug for AuthorizationContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationContext")
            .field("actor", &self.actor)
            .field("target", &self.target)
            .field("domain", &self.domain)
            .field("levels", &self.levels)
            .finish_non_exhaustive()
    }
}

/// A pure predicate over an [`AuthorizationContext`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// Always satisfied
    AlwaysGrant,
    /// Never satisfied
    AlwaysDeny,
    /// Satisfied when the target is the actor
    IsSelf,
    /// Satisfied when the actor is in the target's chain of command within the domain
    IsSuperiorInDomain(String),
}

impl Rule {
    /// Chain-of-command rule for `domain`.
    pub fn superior_in(domain: impl Into<String>) -> Self {
        Rule::IsSuperiorInDomain(domain.into())
    }

    /// Evaluate the rule. A missing target fails every target-dependent rule.
    pub fn evaluate(&self, context: &AuthorizationContext<'_>) -> bool {
        match self {
            Rule::AlwaysGrant => true,
            Rule::AlwaysDeny => false,
            Rule::IsSelf => context.target == Some(context.actor),
            Rule::IsSuperiorInDomain(domain) => match context.target {
                Some(target) => context.level_in(domain).chain_of_command(
                    context.oracle,
                    &context.actor,
                    &target,
                ),
                None => false,
            },
        }
    }

    /// Whether this is a chain-of-command rule.
    pub fn is_chain_of_command(&self) -> bool {
        matches!(self, Rule::IsSuperiorInDomain(_))
    }

    /// Parse a rule spelling: `AlwaysGrant`, `AlwaysDeny`, `IsSelf`,
    /// `IsSuperiorInDomain` or `IsSuperiorInDomain:<domain>`.
    ///
    /// A bare `IsSuperiorInDomain` refers to `enclosing_domain`.
    pub fn parse(spelling: &str, enclosing_domain: &str) -> Option<Self> {
        let spelling = spelling.trim();
        let (head, argument) = match spelling.split_once(':') {
            Some((head, argument)) => (head.trim(), Some(argument.trim())),
            None => (spelling, None),
        };
        match (head, argument) {
            ("AlwaysGrant", None) => Some(Rule::AlwaysGrant),
            ("AlwaysDeny", None) => Some(Rule::AlwaysDeny),
            ("IsSelf", None) => Some(Rule::IsSelf),
            ("IsSuperiorInDomain", None) => Some(Rule::superior_in(enclosing_domain)),
            ("IsSuperiorInDomain", Some(domain)) if !domain.is_empty() => {
                Some(Rule::superior_in(domain))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::AlwaysGrant => f.write_str("AlwaysGrant"),
            Rule::AlwaysDeny => f.write_str("AlwaysDeny"),
            Rule::IsSelf => f.write_str("IsSelf"),
            Rule::IsSuperiorInDomain(domain) => write!(f, "IsSuperiorInDomain:{domain}"),
        }
    }
}

/// An OR-group of rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleDisjunction {
    rules: Vec<Rule>,
}

impl RuleDisjunction {
    /// Create a disjunction. The registry rejects empty ones at build time.
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// A disjunction holding a single rule.
    pub fn single(rule: Rule) -> Self {
        Self { rules: vec![rule] }
    }

    /// The rules of this group.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether the group has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Satisfied iff any rule is satisfied.
    pub fn is_satisfied(&self, context: &AuthorizationContext<'_>) -> bool {
        self.rules.iter().any(|rule| rule.evaluate(context))
    }

    /// Whether every rule is a chain-of-command rule.
    pub fn is_pure_chain_of_command(&self) -> bool {
        !self.rules.is_empty() && self.rules.iter().all(Rule::is_chain_of_command)
    }

    pub(crate) fn rules_mut(&mut self) -> &mut [Rule] {
        &mut self.rules
    }
}

impl From<Rule> for RuleDisjunction {
    fn from(rule: Rule) -> Self {
        Self::single(rule)
    }
}

impl FromIterator<Rule> for RuleDisjunction {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
