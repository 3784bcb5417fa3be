//! Declarative TOML role manifests
//!
//! ```toml
//! [[role]]
//! name = "Division-Chief"
//! access_level = "Division"
//! features = ["EditNews"]
//!
//! [[role.domain]]
//! name = "Primary"
//!
//! [[role.domain.rule_set]]
//! category = "Return"
//! fields = ["Person.rank"]
//! require = [["IsSuperiorInDomain:Primary"]]
//! ```
//!
//! `require` is a conjunction of disjunctions: every inner list must have a
//! satisfied rule. A bare `IsSuperiorInDomain` refers to the enclosing domain.

use crate::errors::{AuthorizationError, AuthorizationResult};
use crate::identity::FieldRef;
use crate::level::AccessLevel;
use crate::role::{AccessCategory, DomainBlock, FieldRuleSet, Role};
use crate::rule::{Rule, RuleDisjunction};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

const INLINE: &str = "<inline>";

/// A parsed role manifest, not yet validated against a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleManifest {
    #[serde(default, rename = "role")]
    roles: Vec<RoleEntry>,
    #[serde(skip)]
    source_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RoleEntry {
    name: String,
    #[serde(default)]
    access_level: AccessLevel,
    #[serde(default)]
    default: bool,
    #[serde(default)]
    features: Vec<String>,
    #[serde(default)]
    administers: Vec<String>,
    #[serde(default, rename = "domain")]
    domains: Vec<DomainEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct DomainEntry {
    name: String,
    #[serde(default, rename = "rule_set")]
    rule_sets: Vec<RuleSetEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleSetEntry {
    category: AccessCategory,
    fields: Vec<String>,
    #[serde(default)]
    require: Vec<Vec<String>>,
}

impl RoleManifest {
    /// Parse a manifest from TOML text.
    pub fn from_toml_str(text: &str) -> AuthorizationResult<Self> {
        Self::parse(text, INLINE)
    }

    /// Read and parse a manifest file.
    pub fn load(path: impl AsRef<Path>) -> AuthorizationResult<Self> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AuthorizationError::manifest(&source_name, e.to_string()))?;
        let manifest = Self::parse(&text, &source_name)?;
        debug!(manifest = %source_name, roles = manifest.len(), "loaded role manifest");
        Ok(manifest)
    }

    fn parse(text: &str, source_name: &str) -> AuthorizationResult<Self> {
        let mut manifest: Self = toml::from_str(text)
            .map_err(|e| AuthorizationError::manifest(source_name, e.to_string()))?;
        manifest.source_name = source_name.to_string();
        Ok(manifest)
    }

    /// Where the manifest came from: a file path, or `<inline>`.
    pub fn source_name(&self) -> &str {
        if self.source_name.is_empty() {
            INLINE
        } else {
            &self.source_name
        }
    }

    /// Number of roles declared.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Whether the manifest declares no roles.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Convert into role definitions. Rule and field spellings are checked
    /// here; cross-role validation happens when the registry is built.
    pub fn into_roles(self) -> AuthorizationResult<Vec<Role>> {
        let source_name = self.source_name().to_string();
        self.roles
            .into_iter()
            .map(|entry| entry.into_role(&source_name))
            .collect()
    }
}

impl RoleEntry {
    fn into_role(self, source_name: &str) -> AuthorizationResult<Role> {
        let mut builder = Role::builder(self.name.as_str())
            .access_level(self.access_level)
            .accessible_features(self.features)
            .administers(self.administers);
        if self.default {
            builder = builder.default_role();
        }

        for domain in self.domains {
            let mut block = DomainBlock::new(domain.name.as_str());
            for rule_set in domain.rule_sets {
                block = block.grant(rule_set.into_rule_set(&self.name, &domain.name, source_name)?);
            }
            builder = builder.domain(block);
        }
        Ok(builder.build())
    }
}

impl RuleSetEntry {
    fn into_rule_set(
        self,
        role: &str,
        domain: &str,
        source_name: &str,
    ) -> AuthorizationResult<FieldRuleSet> {
        let fields = self
            .fields
            .iter()
            .map(|spelling| {
                FieldRef::parse(spelling).ok_or_else(|| {
                    AuthorizationError::manifest(
                        source_name,
                        format!("role {role:?}, domain {domain:?}: field {spelling:?} is not of the form Type.field"),
                    )
                })
            })
            .collect::<AuthorizationResult<Vec<_>>>()?;

        let disjunctions = self
            .require
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|spelling| {
                        Rule::parse(spelling, domain).ok_or_else(|| {
                            AuthorizationError::manifest(
                                source_name,
                                format!("role {role:?}, domain {domain:?}: unknown rule {spelling:?}"),
                            )
                        })
                    })
                    .collect::<AuthorizationResult<RuleDisjunction>>()
            })
            .collect::<AuthorizationResult<Vec<_>>>()?;

        let mut rule_set = FieldRuleSet::new(self.category, fields);
        for disjunction in disjunctions {
            rule_set = rule_set.require_any(disjunction.rules().iter().cloned());
        }
        Ok(rule_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
        [[role]]
        name = "Division-Chief"
        access_level = "Division"
        features = ["EditNews"]
        administers = ["Users"]

        [[role.domain]]
        name = "Primary"

        [[role.domain.rule_set]]
        category = "Return"
        fields = ["Person.rank", "Person.name"]
        require = [["IsSuperiorInDomain"]]

        [[role.domain.rule_set]]
        category = "Edit"
        fields = ["Person.phone"]
        require = [["IsSelf", "IsSuperiorInDomain:Muster"], ["AlwaysGrant"]]

        [[role]]
        name = "Users"
        access_level = "Self"
        default = true
    "#;

    #[test]
    fn test_manifest_to_roles() {
        let manifest = RoleManifest::from_toml_str(MANIFEST).unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.source_name(), "<inline>");

        let roles = manifest.into_roles().unwrap();
        let chief = &roles[0];
        assert_eq!(chief.access_level(), AccessLevel::Division);
        assert!(chief.accessible_features().contains("EditNews"));

        let block = chief.domain("Primary").unwrap();
        let read = &block.rule_sets()[0];
        assert_eq!(read.category(), AccessCategory::Return);
        assert_eq!(read.fields().len(), 2);
        assert_eq!(read.disjunctions()[0].rules(), &[Rule::superior_in("Primary")]);

        let write = &block.rule_sets()[1];
        assert_eq!(write.disjunctions().len(), 2);
        assert_eq!(
            write.disjunctions()[0].rules(),
            &[Rule::IsSelf, Rule::superior_in("Muster")]
        );

        assert!(roles[1].is_default());
        assert_eq!(roles[1].access_level(), AccessLevel::SelfOnly);
    }

    #[test]
    fn test_bad_field_spelling() {
        let err = RoleManifest::from_toml_str(
            r#"
            [[role]]
            name = "X"
            [[role.domain]]
            name = "Main"
            [[role.domain.rule_set]]
            category = "Return"
            fields = ["rank"]
            "#,
        )
        .unwrap()
        .into_roles()
        .unwrap_err();
        assert!(matches!(err, AuthorizationError::Manifest { .. }));
        assert!(err.to_string().contains("\"rank\""));
    }

    #[test]
    fn test_bad_rule_spelling() {
        let err = RoleManifest::from_toml_str(
            r#"
            [[role]]
            name = "X"
            [[role.domain]]
            name = "Main"
            [[role.domain.rule_set]]
            category = "Edit"
            fields = ["Person.rank"]
            require = [["IfSelf"]]
            "#,
        )
        .unwrap()
        .into_roles()
        .unwrap_err();
        assert!(err.to_string().contains("IfSelf"));
    }

    #[test]
    fn test_malformed_toml_is_a_manifest_error() {
        let err = RoleManifest::from_toml_str("[[role]]\nname = 3").unwrap_err();
        assert!(matches!(err, AuthorizationError::Manifest { ref source_name, .. } if source_name == "<inline>"));

        let err = RoleManifest::from_toml_str("[[role]]\nname = \"X\"\ncolour = \"red\"").unwrap_err();
        assert!(matches!(err, AuthorizationError::Manifest { .. }));
    }

    #[test]
    fn test_empty_require_group_survives_to_registry() {
        let roles = RoleManifest::from_toml_str(
            r#"
            [[role]]
            name = "X"
            [[role.domain]]
            name = "Main"
            [[role.domain.rule_set]]
            category = "Edit"
            fields = ["Person.rank"]
            require = [[]]
            "#,
        )
        .unwrap()
        .into_roles()
        .unwrap();
        assert!(roles[0].domains()[0].rule_sets()[0].disjunctions()[0].is_empty());
    }
}
