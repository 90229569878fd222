//! YAML manifest describing one deployment unit.
//!
//! ```yaml
//! unit: orders-stack
//! profile: registered
//! network: vpc-0abc
//! cluster:
//!   name: Orders
//!   container_insights: true
//!   tasks:
//!     - container_name: api
//!       container_image: registry/app:1
//! imports:
//!   - cluster: Billing
//!     security_groups: [sg-1]
//!     tasks:
//!       - container_name: invoicer
//!         container_image: registry/invoicer:3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use stackform_common::config::{Profile, StackformConfig};
use stackform_common::error::{Result, StackformError};
use stackform_common::types::{NetworkContext, SecurityPosture};
use stackform_core::spec::{ClusterSpec, TaskDefinitionSpec};

/// Root of a parsed manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Owning deployment unit; overrides the configured one.
    #[serde(default)]
    pub unit: Option<String>,
    /// Composition profile; overrides the configured one.
    #[serde(default)]
    pub profile: Option<Profile>,
    /// Network every cluster lives in unless an import overrides it.
    pub network: NetworkContext,
    /// Cluster created by this unit.
    #[serde(default)]
    pub cluster: Option<ClusterBlock>,
    /// Clusters owned by other units that this unit adds tasks to.
    #[serde(default)]
    pub imports: Vec<ImportBlock>,
}

/// A cluster created by the manifest's unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterBlock {
    /// Cluster name; some profiles supply one when omitted.
    #[serde(default)]
    pub name: Option<String>,
    /// Container insights flag.
    #[serde(default)]
    pub container_insights: Option<bool>,
    /// Tasks to run on the cluster.
    #[serde(default)]
    pub tasks: Vec<TaskDefinitionSpec>,
}

/// Tasks added to a cluster owned by another unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportBlock {
    /// Name of the existing cluster.
    pub cluster: String,
    /// Network of the existing cluster, when it differs from the manifest's.
    #[serde(default)]
    pub network: Option<NetworkContext>,
    /// Security groups of the existing cluster.
    #[serde(default)]
    pub security_groups: Vec<String>,
    /// Tasks to run on the cluster.
    #[serde(default)]
    pub tasks: Vec<TaskDefinitionSpec>,
}

impl ImportBlock {
    /// Security posture assembled from the listed groups.
    #[must_use]
    pub fn security(&self) -> SecurityPosture {
        self.security_groups.iter().cloned().collect()
    }
}

impl Manifest {
    /// Parses a manifest from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid manifest.
    pub fn from_yaml(input: &str) -> Result<Self> {
        serde_yaml::from_str(input).map_err(|e| StackformError::Config {
            message: format!("manifest parse error: {e}"),
        })
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::info!(path = %path.display(), "loading manifest");
        let content = std::fs::read_to_string(path).map_err(|e| StackformError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// `base` with the manifest's unit and profile applied on top.
    #[must_use]
    pub fn effective_config(&self, base: &StackformConfig) -> StackformConfig {
        let mut config = base.clone();
        if let Some(unit) = &self.unit {
            config.unit_name.clone_from(unit);
        }
        if let Some(profile) = self.profile {
            config.profile = profile;
        }
        config
    }

    /// Spec of the owned cluster, if the manifest declares one.
    ///
    /// # Errors
    ///
    /// Returns an error if the cluster has no name and `profile` provides no
    /// default.
    pub fn cluster_spec(&self, profile: Profile) -> Result<Option<ClusterSpec>> {
        let Some(block) = &self.cluster else {
            return Ok(None);
        };
        let name = block
            .name
            .clone()
            .or_else(|| profile.default_cluster_name().map(str::to_string))
            .ok_or_else(|| StackformError::Config {
                message: format!("cluster name is required under the {profile} profile"),
            })?;
        Ok(Some(ClusterSpec {
            cluster_name: name,
            container_insights: block.container_insights,
            network: self.network.clone(),
        }))
    }

    /// Every task in the manifest, owned cluster first.
    pub fn all_tasks(&self) -> impl Iterator<Item = &TaskDefinitionSpec> {
        self.cluster
            .iter()
            .flat_map(|c| c.tasks.iter())
            .chain(self.imports.iter().flat_map(|i| i.tasks.iter()))
    }
}
