//! Authorization bootstrap configuration
//!
//! Loaded from TOML, then overridden from the environment:
//!
//! - `CC_AUTHZ_BUILTIN_CATALOG`: `true`/`false`, include the stock roles
//! - `CC_AUTHZ_MANIFESTS`: extra manifest paths, separated like `PATH`

use crate::errors::{AuthorizationError, AuthorizationResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable toggling the stock role catalog.
pub const ENV_BUILTIN_CATALOG: &str = "CC_AUTHZ_BUILTIN_CATALOG";
/// Environment variable listing extra role manifests.
pub const ENV_MANIFESTS: &str = "CC_AUTHZ_MANIFESTS";

/// Where role definitions come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorizationConfig {
    /// Include the stock role catalog
    pub builtin_catalog: bool,
    /// Extra TOML role manifests
    pub manifests: Vec<PathBuf>,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            builtin_catalog: true,
            manifests: Vec::new(),
        }
    }
}

impl AuthorizationConfig {
    /// Load configuration from a TOML file.
    ///
    /// Relative manifest paths are taken relative to the file's directory.
    pub fn load_from_file(path: impl AsRef<Path>) -> AuthorizationResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AuthorizationError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|e| {
            AuthorizationError::config(format!("invalid TOML in {}: {e}", path.display()))
        })?;

        if let Some(base) = path.parent() {
            for manifest in &mut config.manifests {
                if manifest.is_relative() && !manifest.as_os_str().is_empty() {
                    *manifest = base.join(&*manifest);
                }
            }
        }
        debug!(path = %path.display(), manifests = config.manifests.len(), "loaded authorization config");
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn merge_with_env(&mut self) -> AuthorizationResult<()> {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
        self.merge_with_vars(vars)
    }

    /// Apply overrides from an explicit set of variables.
    ///
    /// Manifests named in the environment are appended to the configured ones.
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> AuthorizationResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                ENV_BUILTIN_CATALOG => {
                    self.builtin_catalog = parse_bool(value).ok_or_else(|| {
                        AuthorizationError::config(format!(
                            "{ENV_BUILTIN_CATALOG} must be true or false, got {value:?}"
                        ))
                    })?;
                }
                ENV_MANIFESTS => {
                    self.manifests.extend(
                        std::env::split_paths(value).filter(|path| !path.as_os_str().is_empty()),
                    );
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Merge another configuration over this one.
    pub fn merge_with(&mut self, other: &Self) {
        self.builtin_catalog = other.builtin_catalog;
        self.manifests.extend(other.manifests.iter().cloned());
    }

    /// Check the configuration yields at least one role source and names no
    /// empty manifest path.
    pub fn validate(&self) -> AuthorizationResult<()> {
        if !self.builtin_catalog && self.manifests.is_empty() {
            return Err(AuthorizationError::config(
                "no role source: the builtin catalog is disabled and no manifests are configured",
            ));
        }
        if self.manifests.iter().any(|path| path.as_os_str().is_empty()) {
            return Err(AuthorizationError::config("manifest paths may not be empty"));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_catalog() {
        let config = AuthorizationConfig::default();
        assert!(config.builtin_catalog);
        assert!(config.manifests.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AuthorizationConfig::default();
        let joined = std::env::join_paths(["/etc/cc/a.toml", "/etc/cc/b.toml"]).unwrap();
        config
            .merge_with_vars([
                (ENV_BUILTIN_CATALOG, "off"),
                (ENV_MANIFESTS, joined.to_str().unwrap()),
                ("UNRELATED", "x"),
            ])
            .unwrap();
        assert!(!config.builtin_catalog);
        assert_eq!(
            config.manifests,
            vec![PathBuf::from("/etc/cc/a.toml"), PathBuf::from("/etc/cc/b.toml")]
        );
    }

    #[test]
    fn test_bad_bool_is_rejected() {
        let mut config = AuthorizationConfig::default();
        let err = config
            .merge_with_vars([(ENV_BUILTIN_CATALOG, "maybe")])
            .unwrap_err();
        assert!(matches!(err, AuthorizationError::Config { .. }));
    }

    #[test]
    fn test_validate_requires_a_role_source() {
        let config = AuthorizationConfig {
            builtin_catalog: false,
            manifests: Vec::new(),
        };
        assert!(config.validate().is_err());

        let config = AuthorizationConfig {
            builtin_catalog: false,
            manifests: vec![PathBuf::new()],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_with() {
        let mut base = AuthorizationConfig::default();
        base.merge_with(&AuthorizationConfig {
            builtin_catalog: false,
            manifests: vec![PathBuf::from("extra.toml")],
        });
        assert!(!base.builtin_catalog);
        assert_eq!(base.manifests.len(), 1);
    }
}
