//! Configuration model and composition profiles.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MANAGED_CLUSTER_NAME, DEFAULT_REGISTRY_PREFIX, DEFAULT_UNIT_NAME};

/// Named composition profile.
///
/// The two profiles disagree on the container-insights default and on
/// whether a created cluster is recorded in the resource registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Insights off unless requested; every created cluster is registered.
    #[default]
    Registered,
    /// Insights on unless disabled; clusters are not registered and a
    /// default cluster name is available.
    Managed,
}

impl Profile {
    /// Whether container insights is enabled when the caller leaves it unset.
    #[must_use]
    pub const fn container_insights_default(self) -> bool {
        match self {
            Self::Registered => false,
            Self::Managed => true,
        }
    }

    /// Whether cluster creation is paired with a registry save.
    #[must_use]
    pub const fn registers_clusters(self) -> bool {
        match self {
            Self::Registered => true,
            Self::Managed => false,
        }
    }

    /// Cluster name substituted when a manifest leaves it out.
    #[must_use]
    pub const fn default_cluster_name(self) -> Option<&'static str> {
        match self {
            Self::Registered => None,
            Self::Managed => Some(DEFAULT_MANAGED_CLUSTER_NAME),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registered => write!(f, "registered"),
            Self::Managed => write!(f, "managed"),
        }
    }
}

/// Root configuration for a composition run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackformConfig {
    /// Name of the deployment unit that owns created resources.
    pub unit_name: String,
    /// Active composition profile.
    pub profile: Profile,
    /// Prefix of the registry lookup keys.
    pub registry_prefix: String,
    /// Registry file for the file-backed registry, if any.
    pub registry_file: Option<PathBuf>,
}

impl StackformConfig {
    /// Creates a configuration for `unit_name` with every other field defaulted.
    #[must_use]
    pub fn for_unit(unit_name: impl Into<String>) -> Self {
        Self {
            unit_name: unit_name.into(),
            ..Self::default()
        }
    }

    /// Returns a copy using `profile`.
    #[must_use]
    pub const fn with_profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }
}

impl Default for StackformConfig {
    fn default() -> Self {
        Self {
            unit_name: DEFAULT_UNIT_NAME.to_string(),
            profile: Profile::default(),
            registry_prefix: DEFAULT_REGISTRY_PREFIX.to_string(),
            registry_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_profile_disables_insights_and_registers() {
        let profile = Profile::Registered;
        assert!(!profile.container_insights_default());
        assert!(profile.registers_clusters());
        assert_eq!(profile.default_cluster_name(), None);
    }

    #[test]
    fn managed_profile_enables_insights_without_registration() {
        let profile = Profile::Managed;
        assert!(profile.container_insights_default());
        assert!(!profile.registers_clusters());
        assert_eq!(
            profile.default_cluster_name(),
            Some("ContainerEnvComponentCluster")
        );
    }

    #[test]
    fn config_fills_missing_fields_from_default() {
        let config: StackformConfig =
            serde_yaml::from_str("unit_name: orders\nprofile: managed\n").expect("parse");
        assert_eq!(config.unit_name, "orders");
        assert_eq!(config.profile, Profile::Managed);
        assert_eq!(config.registry_prefix, "/stackform");
        assert!(config.registry_file.is_none());
    }

    #[test]
    fn for_unit_keeps_default_profile() {
        let config = StackformConfig::for_unit("billing");
        assert_eq!(config.unit_name, "billing");
        assert_eq!(config.profile, Profile::Registered);
    }
}
