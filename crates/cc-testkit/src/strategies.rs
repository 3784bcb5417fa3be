//! Property test strategies for roles and org charts
//!
//! Generated roles draw from a small fixed vocabulary of domains and fields so
//! that independently generated roles overlap often enough to be interesting.

use proptest::prelude::*;

pub use proptest;

use crate::fixtures::{test_person, PERSON};
use cc_authorization::{
    AccessCategory, AccessLevel, DomainBlock, FieldRef, FieldRuleSet, InMemoryHierarchy,
    OrgPlacement, PersonId, Role, Rule,
};

/// Domains generated roles may declare.
pub const DOMAINS: &[&str] = &["Primary", "Muster"];
/// Fields generated rule sets may govern.
pub const FIELDS: &[&str] = &["rank", "name", "ssn", "phone", "email"];

/// Deterministic person ids.
pub fn arb_person_id() -> impl Strategy<Value = PersonId> {
    (0u64..10_000).prop_map(test_person)
}

/// Any access level.
pub fn arb_access_level() -> impl Strategy<Value = AccessLevel> {
    prop::sample::select(AccessLevel::ALL.to_vec())
}

/// One of the three organizational levels.
pub fn arb_organizational_level() -> impl Strategy<Value = AccessLevel> {
    prop::sample::select(vec![
        AccessLevel::Division,
        AccessLevel::Department,
        AccessLevel::Command,
    ])
}

/// Any rule over the generated domains.
pub fn arb_rule() -> impl Strategy<Value = Rule> {
    prop_oneof![
        Just(Rule::AlwaysGrant),
        Just(Rule::AlwaysDeny),
        Just(Rule::IsSelf),
        prop::sample::select(DOMAINS.to_vec()).prop_map(Rule::superior_in),
    ]
}

/// A non-empty group of rules.
pub fn arb_disjunction() -> impl Strategy<Value = Vec<Rule>> {
    prop::collection::vec(arb_rule(), 1..3)
}

/// A rule set over a non-empty subset of [`FIELDS`], with up to two conditions.
pub fn arb_rule_set() -> impl Strategy<Value = FieldRuleSet> {
    (
        prop::sample::select(vec![AccessCategory::Edit, AccessCategory::Return]),
        prop::sample::subsequence(FIELDS.to_vec(), 1..=FIELDS.len()),
        prop::collection::vec(arb_disjunction(), 0..3),
    )
        .prop_map(|(category, fields, disjunctions)| {
            let fields = fields.into_iter().map(|field| FieldRef::new(PERSON, field));
            disjunctions
                .into_iter()
                .fold(FieldRuleSet::new(category, fields), |rule_set, rules| {
                    rule_set.require_any(rules)
                })
        })
}

/// A role named `name` declaring a subset of [`DOMAINS`].
pub fn arb_role(name: String) -> impl Strategy<Value = Role> {
    (
        arb_access_level(),
        any::<bool>(),
        prop::sample::subsequence(DOMAINS.to_vec(), 0..=DOMAINS.len()),
        prop::collection::vec(prop::collection::vec(arb_rule_set(), 0..3), DOMAINS.len()),
    )
        .prop_map(move |(level, is_default, domains, rule_sets)| {
            let mut builder = Role::builder(name.clone()).access_level(level);
            if is_default {
                builder = builder.default_role();
            }
            for (domain, sets) in domains.into_iter().zip(rule_sets) {
                let block = sets
                    .into_iter()
                    .fold(DomainBlock::new(domain), DomainBlock::grant);
                builder = builder.domain(block);
            }
            builder.build()
        })
}

/// Between one and four roles with distinct names.
pub fn arb_roles() -> impl Strategy<Value = Vec<Role>> {
    (1usize..5).prop_flat_map(|count| {
        (0..count)
            .map(|index| arb_role(format!("Role{index}")))
            .collect::<Vec<_>>()
    })
}

/// A placement drawn from two commands, two departments and two divisions,
/// with every unit possibly unset.
pub fn arb_placement() -> impl Strategy<Value = OrgPlacement> {
    (
        prop::option::weighted(0.9, prop::sample::select(vec!["CMD", "OTHER"])),
        prop::option::weighted(0.8, prop::sample::select(vec!["OPS", "ENG"])),
        prop::option::weighted(0.8, prop::sample::select(vec!["DIV-1", "DIV-2"])),
    )
        .prop_map(|(command, department, division)| {
            OrgPlacement::new(command, department, division)
        })
}

/// An org chart over `people` deterministic persons, returned with their ids.
pub fn arb_chart(people: usize) -> impl Strategy<Value = (Vec<PersonId>, InMemoryHierarchy)> {
    prop::collection::vec(arb_placement(), people).prop_map(|placements| {
        let ids: Vec<PersonId> = (0..placements.len() as u64).map(test_person).collect();
        let chart = ids.iter().copied().zip(placements).collect();
        (ids, chart)
    })
}
