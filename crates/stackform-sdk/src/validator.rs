//! Static checks on a parsed manifest before anything is composed.

use std::collections::HashSet;

use stackform_common::config::Profile;
use stackform_common::error::{Result, StackformError};
use stackform_core::task;

use crate::manifest::Manifest;

/// Validates a manifest for semantic correctness.
///
/// # Checks performed
///
/// 1. The manifest declares a cluster or at least one import.
/// 2. The owned cluster has a name, or `profile` supplies one.
/// 3. Imported cluster names are non-empty and unique.
/// 4. Every task names an image.
/// 5. Every task's ports, after defaults, lie in 1-65535.
/// 6. Container names are unique across the manifest, since they seed the
///    derived resource names.
///
/// A manifest that passes composes without spec errors.
///
/// # Errors
///
/// Returns an error describing the first failed check.
pub fn validate(manifest: &Manifest, profile: Profile) -> Result<()> {
    tracing::info!("validating manifest");
    check_not_empty(manifest)?;
    let _ = manifest.cluster_spec(profile)?;
    check_imports(manifest)?;
    check_images(manifest)?;
    check_ports(manifest)?;
    check_duplicate_containers(manifest)?;
    Ok(())
}

fn check_not_empty(manifest: &Manifest) -> Result<()> {
    if manifest.cluster.is_none() && manifest.imports.is_empty() {
        return Err(StackformError::Config {
            message: "manifest declares no cluster and no imports".into(),
        });
    }
    Ok(())
}

fn check_imports(manifest: &Manifest) -> Result<()> {
    let mut seen = HashSet::new();
    for import in &manifest.imports {
        if import.cluster.trim().is_empty() {
            return Err(StackformError::Resolution {
                name: import.cluster.clone(),
                reason: "imported cluster name is empty".into(),
            });
        }
        if !seen.insert(import.cluster.as_str()) {
            return Err(StackformError::NamingCollision {
                name: format!("imported cluster \"{}\"", import.cluster),
            });
        }
    }
    Ok(())
}

fn check_images(manifest: &Manifest) -> Result<()> {
    for task in manifest.all_tasks() {
        if task.container_image.trim().is_empty() {
            return Err(StackformError::Config {
                message: format!("container \"{}\" has no image", task.container_name),
            });
        }
    }
    Ok(())
}

fn check_ports(manifest: &Manifest) -> Result<()> {
    for task in manifest.all_tasks() {
        let _ = task::prepare_task(task)?;
    }
    Ok(())
}

fn check_duplicate_containers(manifest: &Manifest) -> Result<()> {
    let mut seen = HashSet::new();
    for task in manifest.all_tasks() {
        if !seen.insert(task.container_name.as_str()) {
            return Err(StackformError::NamingCollision {
                name: format!("container \"{}\"", task.container_name),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Manifest {
        Manifest::from_yaml(yaml).expect("parse")
    }

    #[test]
    fn valid_manifest_passes() {
        let manifest = parse(
            r"
network: vpc-1
cluster:
  name: Orders
  tasks:
    - { container_name: api, container_image: img }
imports:
  - cluster: Billing
    tasks:
      - { container_name: worker, container_image: img }
",
        );
        assert!(validate(&manifest, Profile::Registered).is_ok());
    }

    #[test]
    fn empty_manifest_fails() {
        let err = validate(&parse("network: vpc-1\n"), Profile::Registered).unwrap_err();
        assert!(err.to_string().contains("no cluster and no imports"), "got: {err}");
    }

    #[test]
    fn unnamed_cluster_fails_without_profile_default() {
        let manifest = parse("network: vpc-1\ncluster: {}\n");
        assert!(validate(&manifest, Profile::Registered).is_err());
        assert!(validate(&manifest, Profile::Managed).is_ok());
    }

    #[test]
    fn empty_import_name_is_resolution_error() {
        let manifest = parse("network: vpc-1\nimports:\n  - cluster: ''\n");
        let err = validate(&manifest, Profile::Registered).unwrap_err();
        assert!(matches!(err, StackformError::Resolution { .. }));
    }

    #[test]
    fn duplicate_import_fails() {
        let manifest = parse("network: vpc-1\nimports:\n  - cluster: A\n  - cluster: A\n");
        let err = validate(&manifest, Profile::Registered).unwrap_err();
        assert!(matches!(err, StackformError::NamingCollision { .. }));
    }

    #[test]
    fn empty_image_fails() {
        let manifest = parse(
            "network: vpc-1\ncluster:\n  name: A\n  tasks:\n    - { container_name: api, container_image: '' }\n",
        );
        let err = validate(&manifest, Profile::Registered).unwrap_err();
        assert!(err.to_string().contains("has no image"), "got: {err}");
    }

    #[test]
    fn out_of_range_port_fails() {
        let manifest = parse(
            "network: vpc-1\ncluster:\n  name: A\n  tasks:\n    - { container_name: api, container_image: img, host_port: 70000 }\n",
        );
        let err = validate(&manifest, Profile::Registered).unwrap_err();
        assert!(matches!(err, StackformError::InvalidPort { value: 70_000, .. }));
    }

    #[test]
    fn zero_container_port_on_import_fails() {
        let manifest = parse(
            "network: vpc-1\nimports:\n  - cluster: B\n    tasks:\n      - { container_name: w, container_image: img, container_port: 0 }\n",
        );
        let err = validate(&manifest, Profile::Registered).unwrap_err();
        assert!(matches!(err, StackformError::InvalidPort { value: 0, .. }));
    }

    #[test]
    fn duplicate_container_across_clusters_fails() {
        let manifest = parse(
            r"
network: vpc-1
cluster:
  name: Orders
  tasks:
    - { container_name: api, container_image: img }
imports:
  - cluster: Billing
    tasks:
      - { container_name: api, container_image: img }
",
        );
        let err = validate(&manifest, Profile::Registered).unwrap_err();
        assert!(matches!(err, StackformError::NamingCollision { .. }));
        assert!(err.to_string().contains("api"));
    }
}
