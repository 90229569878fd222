//! Caller-facing cluster and task specifications, and their defaulted forms.

use serde::{Deserialize, Serialize};
use stackform_common::types::{NetworkContext, SubnetPlacement};

/// Request to create a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterSpec {
    /// Cluster name, unique within the owning deployment unit.
    pub cluster_name: String,
    /// Container insights flag; `None` defers to the active profile.
    #[serde(default)]
    pub container_insights: Option<bool>,
    /// Network the cluster lives in.
    pub network: NetworkContext,
}

impl ClusterSpec {
    /// Creates a spec leaving container insights to the profile default.
    #[must_use]
    pub fn new(cluster_name: impl Into<String>, network: NetworkContext) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            container_insights: None,
            network,
        }
    }

    /// Sets container insights explicitly.
    #[must_use]
    pub const fn container_insights(mut self, enabled: bool) -> Self {
        self.container_insights = Some(enabled);
        self
    }
}

/// Request to add one containerised workload to a cluster.
///
/// `container_name` seeds every derived child-resource name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskDefinitionSpec {
    /// Container name.
    pub container_name: String,
    /// Registry reference of the image to run.
    pub container_image: String,
    /// CPU units, `"256"` when unset.
    #[serde(default)]
    pub cpu_units: Option<String>,
    /// Memory in MiB, `"512"` when unset.
    #[serde(default)]
    pub memory_mib: Option<String>,
    /// Container port, 80 when unset.
    #[serde(default)]
    pub container_port: Option<u32>,
    /// Host port, 80 when unset.
    #[serde(default)]
    pub host_port: Option<u32>,
    /// Public IP assignment, off when unset.
    #[serde(default)]
    pub assign_public_ip: Option<bool>,
    /// Subnet class, private isolated when unset.
    #[serde(default)]
    pub subnet_placement: Option<SubnetPlacement>,
}

impl TaskDefinitionSpec {
    /// Creates a spec with every optional field unset.
    #[must_use]
    pub fn new(container_name: impl Into<String>, container_image: impl Into<String>) -> Self {
        Self {
            container_name: container_name.into(),
            container_image: container_image.into(),
            cpu_units: None,
            memory_mib: None,
            container_port: None,
            host_port: None,
            assign_public_ip: None,
            subnet_placement: None,
        }
    }
}

/// A [`ClusterSpec`] with every default applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedClusterSpec {
    /// Cluster name.
    pub cluster_name: String,
    /// Container insights flag.
    pub container_insights: bool,
    /// Network the cluster lives in.
    pub network: NetworkContext,
}

/// A [`TaskDefinitionSpec`] with every default applied.
///
/// Ports are still unvalidated here; the composer checks them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTaskSpec {
    /// Container name.
    pub container_name: String,
    /// Image reference.
    pub container_image: String,
    /// CPU units.
    pub cpu_units: String,
    /// Memory in MiB.
    pub memory_mib: String,
    /// Container port.
    pub container_port: u32,
    /// Host port.
    pub host_port: u32,
    /// Public IP assignment.
    pub assign_public_ip: bool,
    /// Subnet class.
    pub subnet_placement: SubnetPlacement,
}
