//! Configuration loading from breakwater.toml.

use aspect::PolicyReference;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Permission-boundary configuration.
    #[serde(default)]
    pub boundary: BoundaryConfig,

    /// Per-environment deployment context, keyed by environment name.
    #[serde(default)]
    pub env: HashMap<String, EnvConfig>,
}

/// The boundary to enforce.
#[derive(Debug, Deserialize, Default)]
pub struct BoundaryConfig {
    /// A literal policy ARN.
    /// Mutually exclusive with managed_policy.
    pub policy_arn: Option<String>,

    /// The name of a managed policy defined in the tree document.
    /// Mutually exclusive with policy_arn.
    pub managed_policy: Option<String>,
}

/// Deployment context for one environment.
#[derive(Debug, Deserialize, Clone)]
pub struct EnvConfig {
    pub account: String,
    pub region: String,

    /// Short suffix appended to resource names, e.g. "dev".
    #[serde(default)]
    pub env_str: String,
}

impl EnvConfig {
    /// Substitution variables this environment contributes to templates.
    pub fn vars(&self) -> HashMap<String, String> {
        HashMap::from([
            ("{{account}}".to_string(), self.account.clone()),
            ("{{region}}".to_string(), self.region.clone()),
            ("{{env_str}}".to_string(), self.env_str.clone()),
        ])
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Build the boundary reference from config.
    ///
    /// Requires exactly one of policy_arn or managed_policy to be set.
    pub fn boundary(&self) -> Result<PolicyReference, ConfigError> {
        match (
            &self.boundary.policy_arn,
            &self.boundary.managed_policy,
        ) {
            (Some(arn), None) => {
                PolicyReference::arn(arn.clone()).map_err(|e| ConfigError::Boundary(e.to_string()))
            }
            (None, Some(name)) => PolicyReference::managed(name.clone())
                .map_err(|e| ConfigError::Boundary(e.to_string())),
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousBoundary),
            (None, None) => Err(ConfigError::MissingBoundary),
        }
    }

    /// Look up an environment's deployment context.
    pub fn env(&self, name: &str) -> Result<&EnvConfig, ConfigError> {
        self.env
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEnv(name.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("no boundary configured: set boundary.policy_arn or boundary.managed_policy")]
    MissingBoundary,

    #[error(
        "ambiguous boundary: set either boundary.policy_arn OR boundary.managed_policy, not both"
    )]
    AmbiguousBoundary,

    #[error("invalid boundary reference: {0}")]
    Boundary(String),

    #[error("environment '{0}' is not defined in config")]
    UnknownEnv(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[boundary]
policy_arn = "arn:aws:iam::123:policy/Boundary"

[env.develop]
account = "111122223333"
region = "us-east-1"
env_str = "dev"
"#;
        let config = Config::parse(toml).unwrap();
        assert!(matches!(config.boundary().unwrap(), PolicyReference::Arn(_)));
        let env = config.env("develop").unwrap();
        assert_eq!(env.region, "us-east-1");
        assert_eq!(env.vars()["{{account}}"], "111122223333");
        assert!(matches!(
            config.env("prod"),
            Err(ConfigError::UnknownEnv(_))
        ));
    }

    #[test]
    fn test_boundary_must_be_unambiguous() {
        let both = r#"
[boundary]
policy_arn = "arn:aws:iam::123:policy/Boundary"
managed_policy = "project-boundary"
"#;
        assert!(matches!(
            Config::parse(both).unwrap().boundary(),
            Err(ConfigError::AmbiguousBoundary)
        ));
        assert!(matches!(
            Config::default().boundary(),
            Err(ConfigError::MissingBoundary)
        ));
    }

    #[test]
    fn test_empty_arn_rejected() {
        let toml = r#"
[boundary]
policy_arn = ""
"#;
        assert!(matches!(
            Config::parse(toml).unwrap().boundary(),
            Err(ConfigError::Boundary(_))
        ));
    }
}
