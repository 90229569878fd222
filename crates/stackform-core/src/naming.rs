//! Deterministic child-resource naming.
//!
//! Names are the parent name prefixed with a role tag, so repeated builds
//! produce the same identities and different roles never collide for the
//! same parent.

use std::fmt;

/// Role a derived resource plays relative to its parent name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// A cluster created by this composition.
    Cluster,
    /// A reference to a cluster created elsewhere.
    ClusterReference,
    /// A task definition.
    TaskDefinition,
    /// The container inside a task definition.
    Container,
    /// The invokable run-task execution step.
    ExecutionStep,
}

impl Role {
    /// The tag prepended to the parent name.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Cluster => "cluster-",
            Self::ClusterReference => "clusterref-",
            Self::TaskDefinition => "taskdefinition-",
            Self::Container => "container-",
            Self::ExecutionStep => "runtaskdefinition-",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix().trim_end_matches('-'))
    }
}

/// Derives the name of the `role` child of `parent`.
///
/// Does not validate `parent`; an empty parent yields the bare prefix.
#[must_use]
pub fn derive_name(parent: &str, role: Role) -> String {
    format!("{}{parent}", role.prefix())
}
