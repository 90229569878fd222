//! Container environment facade.
//!
//! Sequences cluster resolution, task composition, and the registry save.
//! Two workflows are exposed: create a cluster and optionally extend it with
//! tasks, or add tasks to a cluster owned by another deployment unit.

use std::sync::Arc;

use stackform_common::config::StackformConfig;
use stackform_common::error::Result;
use stackform_common::types::{NetworkContext, SecurityPosture};
use stackform_core::cluster::{ClusterHandle, ClusterResolver, ClusterView};
use stackform_core::engine::ProvisioningEngine;
use stackform_core::registry::{RegistryRecord, ResourceRegistry};
use stackform_core::spec::{ClusterSpec, TaskDefinitionSpec};
use stackform_core::task::{self, ExecutionStep, PreparedTask};

/// Entry point that resolves clusters and records the ones it creates.
pub struct ContainerEnvironment {
    registry: Arc<dyn ResourceRegistry>,
    config: StackformConfig,
    resolver: ClusterResolver,
}

impl std::fmt::Debug for ContainerEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerEnvironment")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ContainerEnvironment {
    /// Creates a facade saving into `registry` on behalf of `config.unit_name`.
    #[must_use]
    pub fn new(registry: Arc<dyn ResourceRegistry>, config: StackformConfig) -> Self {
        let resolver = ClusterResolver::new(config.profile);
        Self {
            registry,
            config,
            resolver,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &StackformConfig {
        &self.config
    }

    /// Creates a cluster and, under a registering profile, records it.
    ///
    /// Exactly one registry record is saved per call; tasks added to the
    /// returned environment save nothing. If the registry rejects the
    /// record, the cluster is removed from the engine again.
    ///
    /// # Errors
    ///
    /// Returns an error if cluster creation fails or the registry rejects
    /// the record.
    pub fn create_environment(
        &self,
        engine: &mut dyn ProvisioningEngine,
        spec: &ClusterSpec,
    ) -> Result<Environment> {
        let cluster = self.resolver.create_cluster(engine, spec)?;

        if self.config.profile.registers_clusters() {
            let record = RegistryRecord {
                identifier: cluster.identifier().clone(),
                logical_name: cluster.name().to_string(),
                owning_unit_name: self.config.unit_name.clone(),
            };
            tracing::info!(
                key = %record.parameter_name(&self.config.registry_prefix),
                "registering cluster"
            );
            if let Err(err) = self.registry.save(record) {
                if let Err(rollback) = engine.remove(cluster.resource()) {
                    tracing::warn!(
                        cluster = cluster.name(),
                        error = %rollback,
                        "failed to roll back unregistered cluster"
                    );
                }
                return Err(err);
            }
        }

        Ok(Environment::new(cluster))
    }

    /// Attaches to a cluster created elsewhere, for adding several tasks.
    ///
    /// Never touches the registry.
    ///
    /// # Errors
    ///
    /// Returns a resolution error if `cluster_name` is empty.
    pub fn attach_existing_cluster(
        &self,
        engine: &mut dyn ProvisioningEngine,
        cluster_name: &str,
        network: NetworkContext,
        security: SecurityPosture,
    ) -> Result<Environment> {
        let cluster = self
            .resolver
            .resolve_existing(engine, cluster_name, network, security)?;
        Ok(Environment::new(cluster))
    }

    /// Adds one task to a cluster owned by another deployment unit.
    ///
    /// The spec is checked before the cluster is referenced, so a rejected
    /// spec leaves the engine untouched and the call can simply be retried.
    ///
    /// # Errors
    ///
    /// Returns an invalid-port error, a resolution error if `cluster_name`
    /// is empty, or any engine error.
    pub fn add_task_to_existing_cluster(
        &self,
        engine: &mut dyn ProvisioningEngine,
        cluster_name: &str,
        network: NetworkContext,
        spec: &TaskDefinitionSpec,
    ) -> Result<ExecutionStep> {
        let prepared = task::prepare_task(spec)?;
        let mut environment =
            self.attach_existing_cluster(engine, cluster_name, network, SecurityPosture::empty())?;
        environment.add_prepared(engine, prepared)
    }
}

/// A resolved cluster plus the tasks composed against it.
///
/// Created by [`ContainerEnvironment`] with the cluster already resolved;
/// adding tasks keeps it in that state. There is no teardown.
#[derive(Debug, Clone)]
pub struct Environment {
    cluster: ClusterHandle,
    steps: Vec<ExecutionStep>,
}

impl Environment {
    const fn new(cluster: ClusterHandle) -> Self {
        Self {
            cluster,
            steps: Vec::new(),
        }
    }

    /// The resolved cluster.
    #[must_use]
    pub const fn cluster(&self) -> &ClusterHandle {
        &self.cluster
    }

    /// Steps composed so far, in order.
    #[must_use]
    pub fn steps(&self) -> &[ExecutionStep] {
        &self.steps
    }

    /// Composes a task against this environment's cluster.
    ///
    /// # Errors
    ///
    /// Returns an invalid-port error or any engine error; the environment
    /// is unchanged on failure.
    pub fn add_task(
        &mut self,
        engine: &mut dyn ProvisioningEngine,
        spec: &TaskDefinitionSpec,
    ) -> Result<ExecutionStep> {
        let prepared = task::prepare_task(spec)?;
        self.add_prepared(engine, prepared)
    }

    fn add_prepared(
        &mut self,
        engine: &mut dyn ProvisioningEngine,
        prepared: PreparedTask,
    ) -> Result<ExecutionStep> {
        let step = task::compose_prepared(engine, &self.cluster, prepared)?;
        self.steps.push(step.clone());
        Ok(step)
    }
}
