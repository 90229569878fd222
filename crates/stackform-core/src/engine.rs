//! The provisioning-engine surface consumed by the composition layer.
//!
//! The engine owns the real infrastructure; the composition layer only
//! describes it. Every call returns a [`ResourceRef`] that later calls use
//! to wire resources together.

use serde::Serialize;
use stackform_common::error::Result;
use stackform_common::types::{
    Compatibility, LaunchTarget, NetworkContext, PortMapping, ResourceId, SecurityPosture,
    SubnetPlacement,
};

use crate::spec::ResolvedClusterSpec;

/// Handle to a resource described by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceRef {
    /// Engine-local logical identifier.
    pub logical_id: String,
    /// Provider identifier, or a reference that resolves to one.
    pub identifier: ResourceId,
}

/// Minimal attributes needed to address a cluster created elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterAttributes {
    /// Name of the existing cluster.
    pub cluster_name: String,
    /// Network the cluster lives in.
    pub network: NetworkContext,
    /// Security groups attached to the cluster.
    pub security: SecurityPosture,
}

/// Properties of a task definition resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDefinitionProps {
    /// Execution model the task is compatible with.
    pub compatibility: Compatibility,
    /// CPU units.
    pub cpu_units: String,
    /// Memory in MiB.
    pub memory_mib: String,
}

/// Properties of a container attached to a task definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerProps {
    /// Container name.
    pub container_name: String,
    /// Image registry reference.
    pub image: String,
}

/// Where a task's network interfaces are placed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NetworkPlacement {
    /// Network the subnets are selected from.
    pub network: NetworkContext,
    /// Subnet class to select.
    pub subnets: SubnetPlacement,
}

/// Properties of a run-task execution step.
#[derive(Debug, Clone, Copy)]
pub struct RunTaskProps<'a> {
    /// Cluster the task runs on.
    pub cluster: &'a ResourceId,
    /// Task definition to run.
    pub task_definition: &'a ResourceRef,
    /// Launch strategy.
    pub launch_target: LaunchTarget,
    /// Whether the task gets a public IP.
    pub assign_public_ip: bool,
    /// Network placement of the task.
    pub placement: &'a NetworkPlacement,
}

/// External provisioning engine.
///
/// Implementors turn each call into a resource description. Calls are
/// synchronous; nothing is provisioned until the engine realizes its graph.
pub trait ProvisioningEngine {
    /// Describes a new cluster.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the resource.
    fn create_cluster(&mut self, logical_id: &str, spec: &ResolvedClusterSpec)
    -> Result<ResourceRef>;

    /// Resolves an existing cluster by name and minimal attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the reference.
    fn import_cluster(
        &mut self,
        logical_id: &str,
        attributes: &ClusterAttributes,
    ) -> Result<ResourceRef>;

    /// Describes a new task definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the resource.
    fn create_task_definition(
        &mut self,
        logical_id: &str,
        props: &TaskDefinitionProps,
    ) -> Result<ResourceRef>;

    /// Attaches a container definition to a task definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the task definition is unknown or the
    /// container is rejected.
    fn add_container(
        &mut self,
        task_definition: &ResourceRef,
        logical_id: &str,
        props: &ContainerProps,
    ) -> Result<ResourceRef>;

    /// Attaches a port mapping to a container definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the container is unknown.
    fn add_port_mapping(&mut self, container: &ResourceRef, mapping: PortMapping) -> Result<()>;

    /// Describes an invokable run-task execution step.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine rejects the step.
    fn create_execution_step(
        &mut self,
        logical_id: &str,
        props: &RunTaskProps<'_>,
    ) -> Result<ResourceRef>;

    /// Forgets a resource described earlier, freeing its logical id.
    ///
    /// Used to roll back a cluster whose registration failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is unknown to the engine.
    fn remove(&mut self, resource: &ResourceRef) -> Result<()>;
}
