//! Task composition.
//!
//! Binds a resolved cluster and a task spec into an [`ExecutionStep`]:
//! one task definition, one container, one TCP port mapping, and the
//! run-task step tying them to the cluster's network.

use serde::Serialize;
use stackform_common::error::Result;
use stackform_common::types::{Compatibility, LaunchTarget, PortMapping, ResourceId};

use crate::cluster::ClusterView;
use crate::defaults;
use crate::engine::{
    ContainerProps, NetworkPlacement, ProvisioningEngine, ResourceRef, RunTaskProps,
    TaskDefinitionProps,
};
use crate::naming::{self, Role};
use crate::spec::{ResolvedTaskSpec, TaskDefinitionSpec};

/// A container attached to a task definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerDefinition {
    /// Engine handle of the container.
    pub resource: ResourceRef,
    /// Container name.
    pub name: String,
    /// Image reference.
    pub image: String,
    /// Port mappings attached to the container.
    pub port_mappings: Vec<PortMapping>,
}

/// A composed task definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDefinition {
    /// Engine handle of the task definition.
    pub resource: ResourceRef,
    /// Execution model.
    pub compatibility: Compatibility,
    /// CPU units.
    pub cpu_units: String,
    /// Memory in MiB.
    pub memory_mib: String,
    /// Containers in the task.
    pub containers: Vec<ContainerDefinition>,
}

/// Cluster an execution step runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterBinding {
    /// Cluster identifier.
    pub identifier: ResourceId,
    /// Cluster name.
    pub name: String,
}

/// An invokable run-task unit. Immutable once composed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionStep {
    resource: ResourceRef,
    cluster: ClusterBinding,
    task_definition: TaskDefinition,
    launch_target: LaunchTarget,
    assign_public_ip: bool,
    placement: NetworkPlacement,
}

impl ExecutionStep {
    /// Engine handle of the step.
    #[must_use]
    pub const fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    /// Cluster the step runs on.
    #[must_use]
    pub const fn cluster(&self) -> &ClusterBinding {
        &self.cluster
    }

    /// Task definition the step runs.
    #[must_use]
    pub const fn task_definition(&self) -> &TaskDefinition {
        &self.task_definition
    }

    /// Launch strategy, always the managed serverless one.
    #[must_use]
    pub const fn launch_target(&self) -> LaunchTarget {
        self.launch_target
    }

    /// Whether the task receives a public IP.
    #[must_use]
    pub const fn assign_public_ip(&self) -> bool {
        self.assign_public_ip
    }

    /// Network placement of the task.
    #[must_use]
    pub const fn placement(&self) -> &NetworkPlacement {
        &self.placement
    }
}

/// A task spec with defaults applied and its port mapping checked.
///
/// Holding one means composition can no longer fail on the spec itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedTask {
    resolved: ResolvedTaskSpec,
    mapping: PortMapping,
}

impl PreparedTask {
    /// Container name the child resources are derived from.
    #[must_use]
    pub fn container_name(&self) -> &str {
        &self.resolved.container_name
    }

    /// The validated port mapping.
    #[must_use]
    pub const fn mapping(&self) -> PortMapping {
        self.mapping
    }
}

/// Applies defaults to `spec` and validates its ports without touching any
/// engine.
///
/// # Errors
///
/// Returns [`StackformError::InvalidPort`](stackform_common::error::StackformError::InvalidPort)
/// if either port is outside 1-65535.
pub fn prepare_task(spec: &TaskDefinitionSpec) -> Result<PreparedTask> {
    let resolved = defaults::resolve_task(spec);
    let mapping = PortMapping::tcp(resolved.container_port, resolved.host_port)?;
    Ok(PreparedTask { resolved, mapping })
}

/// Composes a task against `cluster`.
///
/// Ports are validated before the engine is called, so a rejected spec
/// leaves no resource behind. Composing the same `container_name` twice in
/// one scope derives identical child names; avoiding that is up to the
/// caller.
///
/// # Errors
///
/// Returns [`StackformError::InvalidPort`](stackform_common::error::StackformError::InvalidPort)
/// if either port is outside 1-65535, or any error the engine raises.
pub fn compose_task(
    engine: &mut dyn ProvisioningEngine,
    cluster: &dyn ClusterView,
    spec: &TaskDefinitionSpec,
) -> Result<ExecutionStep> {
    let prepared = prepare_task(spec)?;
    compose_prepared(engine, cluster, prepared)
}

/// Composes an already prepared task against `cluster`.
///
/// # Errors
///
/// Returns any error the engine raises.
pub fn compose_prepared(
    engine: &mut dyn ProvisioningEngine,
    cluster: &dyn ClusterView,
    prepared: PreparedTask,
) -> Result<ExecutionStep> {
    let PreparedTask { resolved, mapping } = prepared;

    let task_id = naming::derive_name(&resolved.container_name, Role::TaskDefinition);
    let container_id = naming::derive_name(&resolved.container_name, Role::Container);
    let step_id = naming::derive_name(&resolved.container_name, Role::ExecutionStep);

    let launch_target = LaunchTarget::Fargate;
    let task_props = TaskDefinitionProps {
        compatibility: launch_target.compatibility(),
        cpu_units: resolved.cpu_units,
        memory_mib: resolved.memory_mib,
    };
    let task_resource = engine.create_task_definition(&task_id, &task_props)?;

    let container_props = ContainerProps {
        container_name: resolved.container_name.clone(),
        image: resolved.container_image,
    };
    let container_resource = engine.add_container(&task_resource, &container_id, &container_props)?;
    engine.add_port_mapping(&container_resource, mapping)?;

    let placement = NetworkPlacement {
        network: cluster.network().clone(),
        subnets: resolved.subnet_placement,
    };
    let step_resource = engine.create_execution_step(
        &step_id,
        &RunTaskProps {
            cluster: cluster.identifier(),
            task_definition: &task_resource,
            launch_target,
            assign_public_ip: resolved.assign_public_ip,
            placement: &placement,
        },
    )?;

    tracing::info!(
        cluster = cluster.name(),
        container = %resolved.container_name,
        ports = %mapping,
        "task composed"
    );

    Ok(ExecutionStep {
        resource: step_resource,
        cluster: ClusterBinding {
            identifier: cluster.identifier().clone(),
            name: cluster.name().to_string(),
        },
        task_definition: TaskDefinition {
            resource: task_resource,
            compatibility: task_props.compatibility,
            cpu_units: task_props.cpu_units,
            memory_mib: task_props.memory_mib,
            containers: vec![ContainerDefinition {
                resource: container_resource,
                name: container_props.container_name,
                image: container_props.image,
                port_mappings: vec![mapping],
            }],
        },
        launch_target,
        assign_public_ip: resolved.assign_public_ip,
        placement,
    })
}
