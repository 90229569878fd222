//! Fluent API for describing a workload before composing it.

use stackform_common::error::{Result, StackformError};
use stackform_common::types::SubnetPlacement;
use stackform_core::spec::TaskDefinitionSpec;

/// Builder for a [`TaskDefinitionSpec`].
///
/// Anything left unset falls back to the documented defaults at
/// composition time, not here.
#[derive(Debug, Clone)]
pub struct TaskSpecBuilder {
    container_name: String,
    image: Option<String>,
    cpu_units: Option<String>,
    memory_mib: Option<String>,
    container_port: Option<u32>,
    host_port: Option<u32>,
    assign_public_ip: Option<bool>,
    subnet_placement: Option<SubnetPlacement>,
}

impl TaskSpecBuilder {
    /// Creates a new builder with the given container name.
    #[must_use]
    pub fn new(container_name: impl Into<String>) -> Self {
        Self {
            container_name: container_name.into(),
            image: None,
            cpu_units: None,
            memory_mib: None,
            container_port: None,
            host_port: None,
            assign_public_ip: None,
            subnet_placement: None,
        }
    }

    /// Sets the image registry reference.
    #[must_use]
    pub fn image(mut self, reference: impl Into<String>) -> Self {
        self.image = Some(reference.into());
        self
    }

    /// Sets the CPU units.
    #[must_use]
    pub fn cpu_units(mut self, units: impl Into<String>) -> Self {
        self.cpu_units = Some(units.into());
        self
    }

    /// Sets the memory in MiB.
    #[must_use]
    pub fn memory_mib(mut self, mib: impl Into<String>) -> Self {
        self.memory_mib = Some(mib.into());
        self
    }

    /// Sets the container and host ports.
    #[must_use]
    pub const fn ports(mut self, container_port: u32, host_port: u32) -> Self {
        self.container_port = Some(container_port);
        self.host_port = Some(host_port);
        self
    }

    /// Sets whether the task receives a public IP.
    #[must_use]
    pub const fn assign_public_ip(mut self, enabled: bool) -> Self {
        self.assign_public_ip = Some(enabled);
        self
    }

    /// Sets the subnet class the task is placed into.
    #[must_use]
    pub const fn subnet_placement(mut self, placement: SubnetPlacement) -> Self {
        self.subnet_placement = Some(placement);
        self
    }

    /// Builds the spec.
    ///
    /// # Errors
    ///
    /// Returns an error if the container name or the image is missing.
    pub fn build(self) -> Result<TaskDefinitionSpec> {
        if self.container_name.trim().is_empty() {
            return Err(StackformError::Config {
                message: "container name is required".to_string(),
            });
        }
        let container_image = self
            .image
            .filter(|i| !i.trim().is_empty())
            .ok_or_else(|| StackformError::Config {
                message: format!("image is required for container \"{}\"", self.container_name),
            })?;

        Ok(TaskDefinitionSpec {
            container_name: self.container_name,
            container_image,
            cpu_units: self.cpu_units,
            memory_mib: self.memory_mib,
            container_port: self.container_port,
            host_port: self.host_port,
            assign_public_ip: self.assign_public_ip,
            subnet_placement: self.subnet_placement,
        })
    }
}
