//! Cluster resolution: create a new cluster or reference an existing one.
//!
//! Both paths yield a [`ClusterHandle`]. Downstream consumers only read it
//! through [`ClusterView`], so they never branch on where it came from.

use stackform_common::config::Profile;
use stackform_common::error::{Result, StackformError};
use stackform_common::types::{NetworkContext, ResourceId, SecurityPosture};

use crate::defaults;
use crate::engine::{ClusterAttributes, ProvisioningEngine, ResourceRef};
use crate::naming::{self, Role};
use crate::spec::{ClusterSpec, ResolvedClusterSpec};

/// Read interface shared by every cluster handle.
pub trait ClusterView {
    /// Provider identifier of the cluster.
    fn identifier(&self) -> &ResourceId;
    /// Cluster name.
    fn name(&self) -> &str;
    /// Network the cluster lives in.
    fn network(&self) -> &NetworkContext;
}

/// A cluster created by this composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedCluster {
    resource: ResourceRef,
    spec: ResolvedClusterSpec,
}

impl OwnedCluster {
    /// Engine handle of the cluster resource.
    #[must_use]
    pub const fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    /// The defaulted spec the cluster was created from.
    #[must_use]
    pub const fn spec(&self) -> &ResolvedClusterSpec {
        &self.spec
    }
}

impl ClusterView for OwnedCluster {
    fn identifier(&self) -> &ResourceId {
        &self.resource.identifier
    }

    fn name(&self) -> &str {
        &self.spec.cluster_name
    }

    fn network(&self) -> &NetworkContext {
        &self.spec.network
    }
}

/// A reference to a cluster created elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedCluster {
    resource: ResourceRef,
    attributes: ClusterAttributes,
}

impl ImportedCluster {
    /// Engine handle of the reference.
    #[must_use]
    pub const fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    /// Security groups supplied with the reference.
    #[must_use]
    pub const fn security(&self) -> &SecurityPosture {
        &self.attributes.security
    }
}

impl ClusterView for ImportedCluster {
    fn identifier(&self) -> &ResourceId {
        &self.resource.identifier
    }

    fn name(&self) -> &str {
        &self.attributes.cluster_name
    }

    fn network(&self) -> &NetworkContext {
        &self.attributes.network
    }
}

/// A resolved cluster, either created here or imported by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterHandle {
    /// Created by this composition; eligible for registry recording.
    Owned(OwnedCluster),
    /// Referenced by name; never recorded again.
    Imported(ImportedCluster),
}

impl ClusterHandle {
    /// Whether this composition created the cluster.
    #[must_use]
    pub const fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// The owned cluster, if this handle created one.
    #[must_use]
    pub const fn as_owned(&self) -> Option<&OwnedCluster> {
        match self {
            Self::Owned(cluster) => Some(cluster),
            Self::Imported(_) => None,
        }
    }

    /// Engine handle regardless of provenance.
    #[must_use]
    pub const fn resource(&self) -> &ResourceRef {
        match self {
            Self::Owned(cluster) => &cluster.resource,
            Self::Imported(cluster) => &cluster.resource,
        }
    }

    fn view(&self) -> &dyn ClusterView {
        match self {
            Self::Owned(cluster) => cluster,
            Self::Imported(cluster) => cluster,
        }
    }
}

impl ClusterView for ClusterHandle {
    fn identifier(&self) -> &ResourceId {
        self.view().identifier()
    }

    fn name(&self) -> &str {
        self.view().name()
    }

    fn network(&self) -> &NetworkContext {
        self.view().network()
    }
}

/// Chooses between creating and importing a cluster.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterResolver {
    profile: Profile,
}

impl ClusterResolver {
    /// Creates a resolver applying `profile`'s defaults.
    #[must_use]
    pub const fn new(profile: Profile) -> Self {
        Self { profile }
    }

    /// Active profile.
    #[must_use]
    pub const fn profile(&self) -> Profile {
        self.profile
    }

    /// Describes a new cluster and returns an owned handle.
    ///
    /// Does not touch the resource registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the cluster name is empty or the engine rejects
    /// the cluster.
    pub fn create_cluster(
        &self,
        engine: &mut dyn ProvisioningEngine,
        spec: &ClusterSpec,
    ) -> Result<ClusterHandle> {
        if spec.cluster_name.trim().is_empty() {
            return Err(StackformError::Config {
                message: "cluster name is required".into(),
            });
        }

        let resolved = defaults::resolve_cluster(spec, self.profile);
        let logical_id = naming::derive_name(&resolved.cluster_name, Role::Cluster);
        let resource = engine.create_cluster(&logical_id, &resolved)?;
        tracing::info!(
            cluster = %resolved.cluster_name,
            id = %resource.identifier,
            container_insights = resolved.container_insights,
            "cluster created"
        );

        Ok(ClusterHandle::Owned(OwnedCluster {
            resource,
            spec: resolved,
        }))
    }

    /// References an existing cluster by name.
    ///
    /// Nothing is created and the registry is not consulted; lookup is left
    /// to the engine.
    ///
    /// # Errors
    ///
    /// Returns [`StackformError::Resolution`] if `name` is empty, or the
    /// engine's error if it rejects the reference.
    pub fn resolve_existing(
        &self,
        engine: &mut dyn ProvisioningEngine,
        name: &str,
        network: NetworkContext,
        security: SecurityPosture,
    ) -> Result<ClusterHandle> {
        if name.trim().is_empty() {
            return Err(StackformError::Resolution {
                name: name.to_string(),
                reason: "cluster name is empty".into(),
            });
        }

        let attributes = ClusterAttributes {
            cluster_name: name.to_string(),
            network,
            security,
        };
        let logical_id = naming::derive_name(name, Role::ClusterReference);
        let resource = engine.import_cluster(&logical_id, &attributes)?;
        tracing::debug!(cluster = name, id = %resource.identifier, "cluster resolved by name");

        Ok(ClusterHandle::Imported(ImportedCluster {
            resource,
            attributes,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;

    fn network() -> NetworkContext {
        NetworkContext::new("vpc-1")
    }

    #[test]
    fn create_cluster_returns_owned_handle() {
        let mut template = Template::new();
        let resolver = ClusterResolver::new(Profile::Registered);
        let handle = resolver
            .create_cluster(&mut template, &ClusterSpec::new("Orders", network()))
            .expect("create");

        assert!(handle.is_owned());
        assert_eq!(handle.name(), "Orders");
        assert_eq!(handle.network(), &network());
        let owned = handle.as_owned().expect("owned");
        assert!(!owned.spec().container_insights);
        assert_eq!(template.resource_count("AWS::ECS::Cluster"), 1);
    }

    #[test]
    fn create_cluster_applies_profile_insights_default() {
        let mut template = Template::new();
        let handle = ClusterResolver::new(Profile::Managed)
            .create_cluster(&mut template, &ClusterSpec::new("Orders", network()))
            .expect("create");
        assert!(handle.as_owned().expect("owned").spec().container_insights);
    }

    #[test]
    fn create_cluster_rejects_empty_name() {
        let mut template = Template::new();
        let err = ClusterResolver::default()
            .create_cluster(&mut template, &ClusterSpec::new("", network()))
            .unwrap_err();
        assert!(matches!(err, StackformError::Config { .. }));
        assert_eq!(template.resource_count("AWS::ECS::Cluster"), 0);
    }

    #[test]
    fn resolve_existing_returns_imported_handle() {
        let mut template = Template::new();
        let handle = ClusterResolver::default()
            .resolve_existing(&mut template, "Orders", network(), SecurityPosture::empty())
            .expect("resolve");

        assert!(!handle.is_owned());
        assert!(handle.as_owned().is_none());
        assert_eq!(handle.name(), "Orders");
        assert!(handle.identifier().as_str().ends_with(":cluster/Orders"));
        assert_eq!(template.resource_count("AWS::ECS::Cluster"), 0);
    }

    #[test]
    fn resolve_existing_keeps_security_posture() {
        let mut template = Template::new();
        let posture = SecurityPosture::empty().with_group("sg-1");
        let handle = ClusterResolver::default()
            .resolve_existing(&mut template, "Orders", network(), posture.clone())
            .expect("resolve");
        let ClusterHandle::Imported(imported) = handle else {
            unreachable!("resolve_existing always imports");
        };
        assert_eq!(imported.security(), &posture);
    }

    #[test]
    fn resolve_existing_rejects_empty_name() {
        let mut template = Template::new();
        let err = ClusterResolver::default()
            .resolve_existing(&mut template, "", network(), SecurityPosture::empty())
            .unwrap_err();
        assert!(matches!(err, StackformError::Resolution { .. }));
    }
}
