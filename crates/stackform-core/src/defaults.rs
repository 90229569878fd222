//! Defaulting policy for optional cluster and task parameters.
//!
//! A default is substituted only when a value is absent. Explicit values,
//! `false` and `"0"` included, always pass through untouched.

use stackform_common::config::Profile;
use stackform_common::constants::{
    DEFAULT_ASSIGN_PUBLIC_IP, DEFAULT_CONTAINER_PORT, DEFAULT_CPU_UNITS, DEFAULT_HOST_PORT,
    DEFAULT_MEMORY_MIB,
};

use crate::spec::{ClusterSpec, ResolvedClusterSpec, ResolvedTaskSpec, TaskDefinitionSpec};

/// Returns `value` when set, otherwise `default`.
#[must_use]
pub fn apply_default<T>(value: Option<T>, default: T) -> T {
    value.unwrap_or(default)
}

/// Applies the profile's container-insights default to a cluster spec.
#[must_use]
pub fn resolve_cluster(spec: &ClusterSpec, profile: Profile) -> ResolvedClusterSpec {
    ResolvedClusterSpec {
        cluster_name: spec.cluster_name.clone(),
        container_insights: apply_default(
            spec.container_insights,
            profile.container_insights_default(),
        ),
        network: spec.network.clone(),
    }
}

/// Fills every unset optional field of a task spec.
#[must_use]
pub fn resolve_task(spec: &TaskDefinitionSpec) -> ResolvedTaskSpec {
    ResolvedTaskSpec {
        container_name: spec.container_name.clone(),
        container_image: spec.container_image.clone(),
        cpu_units: apply_default(spec.cpu_units.clone(), DEFAULT_CPU_UNITS.to_string()),
        memory_mib: apply_default(spec.memory_mib.clone(), DEFAULT_MEMORY_MIB.to_string()),
        container_port: apply_default(spec.container_port, DEFAULT_CONTAINER_PORT),
        host_port: apply_default(spec.host_port, DEFAULT_HOST_PORT),
        assign_public_ip: apply_default(spec.assign_public_ip, DEFAULT_ASSIGN_PUBLIC_IP),
        subnet_placement: spec.subnet_placement.unwrap_or_default(),
    }
}
