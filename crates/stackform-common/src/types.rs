//! Domain primitive types used across the Stackform workspace.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider-assigned identifier of a resource (an ARN or a reference to one).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates a resource identifier from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to the network topology workloads are placed in.
///
/// Subnet computation belongs to the provisioning engine; the composition
/// layer only carries this reference through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkContext(String);

impl NetworkContext {
    /// Creates a network reference, usually a VPC identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NetworkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Security groups attached to an imported cluster. Empty by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityPosture(BTreeSet<String>);

impl SecurityPosture {
    /// Creates an empty posture.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns a copy with `group` added.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        let _ = self.0.insert(group.into());
        self
    }

    /// Whether no security groups are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the security group identifiers in sorted order.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for SecurityPosture {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Subnet class a task is placed into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubnetPlacement {
    /// Subnets routed to an internet gateway.
    Public,
    /// Private subnets with outbound access through a NAT.
    PrivateWithEgress,
    /// Private subnets without any route out of the network.
    #[default]
    PrivateIsolated,
}

impl SubnetPlacement {
    /// Provider spelling of the subnet class.
    #[must_use]
    pub const fn as_provider_str(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::PrivateWithEgress => "PRIVATE_WITH_EGRESS",
            Self::PrivateIsolated => "PRIVATE_ISOLATED",
        }
    }
}

impl fmt::Display for SubnetPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_provider_str())
    }
}

/// Transport protocol of a port mapping. Only TCP is ever produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// TCP.
    #[default]
    Tcp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
        }
    }
}

/// Execution model a task definition is compatible with.
///
/// Fixed to the serverless model: no host-level resource negotiation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compatibility {
    /// Managed serverless containers.
    #[default]
    #[serde(rename = "FARGATE")]
    Fargate,
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fargate => write!(f, "FARGATE"),
        }
    }
}

/// Launch strategy an execution step runs its task with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaunchTarget {
    /// Managed serverless launch, no explicit host management.
    #[default]
    #[serde(rename = "FARGATE")]
    Fargate,
}

impl LaunchTarget {
    /// Task compatibility required by this launch target.
    #[must_use]
    pub const fn compatibility(self) -> Compatibility {
        match self {
            Self::Fargate => Compatibility::Fargate,
        }
    }
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fargate => write!(f, "FARGATE"),
        }
    }
}

/// A validated container-to-host port mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortMapping {
    /// Port the container listens on.
    pub container_port: u16,
    /// Port exposed on the host side.
    pub host_port: u16,
    /// Transport protocol.
    pub protocol: Protocol,
}

impl PortMapping {
    /// Builds a TCP mapping, rejecting ports outside 1-65535.
    ///
    /// # Errors
    ///
    /// Returns [`StackformError::InvalidPort`](crate::error::StackformError::InvalidPort)
    /// naming the first offending field.
    pub fn tcp(container_port: u32, host_port: u32) -> crate::error::Result<Self> {
        Ok(Self {
            container_port: checked_port("container port", container_port)?,
            host_port: checked_port("host port", host_port)?,
            protocol: Protocol::Tcp,
        })
    }
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}/{}", self.container_port, self.host_port, self.protocol)
    }
}

fn checked_port(field: &'static str, value: u32) -> crate::error::Result<u16> {
    use crate::constants::{MAX_PORT, MIN_PORT};

    if !(MIN_PORT..=MAX_PORT).contains(&value) {
        return Err(crate::error::StackformError::InvalidPort { field, value });
    }
    u16::try_from(value).map_err(|_| crate::error::StackformError::InvalidPort { field, value })
}
