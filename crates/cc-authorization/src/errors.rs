//! Authorization error types
//!
//! Every variant here is a startup failure: registry validation, manifest
//! loading or configuration. Resolution itself never fails; anomalies at
//! request time resolve to deny.

use thiserror::Error;

/// Result alias used across the crate.
pub type AuthorizationResult<T> = Result<T, AuthorizationError>;

/// Errors raised while bootstrapping the role registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// Two roles share a name (compared case-insensitively).
    #[error("no two roles may have the same name: {name:?} is declared more than once")]
    DuplicateRole {
        /// The offending name as spelled by the second declaration
        name: String,
    },

    /// A role declares the same domain more than once.
    #[error("role {role:?} declares domain {domain:?} more than once")]
    DuplicateDomain {
        /// The role holding the duplicate
        role: String,
        /// The duplicated domain
        domain: String,
    },

    /// A role was declared with a blank name.
    #[error("role names may not be empty")]
    EmptyRoleName,

    /// A rule disjunction with no rules can never be satisfied.
    #[error("role {role:?} has an empty rule disjunction in domain {domain:?}")]
    EmptyDisjunction {
        /// The role holding the rule set
        role: String,
        /// The domain block holding the rule set
        domain: String,
    },

    /// A role claims to administer a role the registry does not know.
    #[error("role {role:?} administers unknown role {administers:?}")]
    UnknownAdministeredRole {
        /// The administering role
        role: String,
        /// The unresolved role name
        administers: String,
    },

    /// A role manifest could not be read or parsed.
    #[error("role manifest {source_name}: {message}")]
    Manifest {
        /// File path or other label of the manifest
        source_name: String,
        /// What went wrong
        message: String,
    },

    /// Configuration was unreadable or invalid.
    #[error("invalid authorization configuration: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The process-wide registry was installed twice.
    #[error("the role registry has already been installed for this process")]
    RegistryAlreadyInstalled,
}

impl AuthorizationError {
    /// Create a duplicate role error.
    pub fn duplicate_role(name: impl Into<String>) -> Self {
        Self::DuplicateRole { name: name.into() }
    }

    /// Create a duplicate domain error.
    pub fn duplicate_domain(role: impl Into<String>, domain: impl Into<String>) -> Self {
        Self::DuplicateDomain {
            role: role.into(),
            domain: domain.into(),
        }
    }

    /// Create an empty disjunction error.
    pub fn empty_disjunction(role: impl Into<String>, domain: impl Into<String>) -> Self {
        Self::EmptyDisjunction {
            role: role.into(),
            domain: domain.into(),
        }
    }

    /// Create an unknown administered role error.
    pub fn unknown_administered(role: impl Into<String>, administers: impl Into<String>) -> Self {
        Self::UnknownAdministeredRole {
            role: role.into(),
            administers: administers.into(),
        }
    }

    /// Create a manifest error.
    pub fn manifest(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Manifest {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error was raised by registry validation rather than I/O or config.
    pub fn is_registry_violation(&self) -> bool {
        matches!(
            self,
            Self::DuplicateRole { .. }
                | Self::DuplicateDomain { .. }
                | Self::EmptyRoleName
                | Self::EmptyDisjunction { .. }
                | Self::UnknownAdministeredRole { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthorizationError::duplicate_role("Users");
        assert!(err.to_string().contains("\"Users\""));

        let err = AuthorizationError::duplicate_domain("Admin", "Main");
        assert!(err.to_string().contains("Admin"));
        assert!(err.to_string().contains("Main"));

        let err = AuthorizationError::manifest("roles.toml", "expected a table");
        assert!(err.to_string().contains("roles.toml"));
    }

    #[test]
    fn test_registry_violation_classification() {
        assert!(AuthorizationError::EmptyRoleName.is_registry_violation());
        assert!(AuthorizationError::unknown_administered("A", "B").is_registry_violation());
        assert!(!AuthorizationError::config("bad").is_registry_violation());
        assert!(!AuthorizationError::RegistryAlreadyInstalled.is_registry_violation());
    }
}
