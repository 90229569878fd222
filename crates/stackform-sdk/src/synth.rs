//! Turns a manifest into a rendered template.

use std::sync::Arc;

use stackform_common::config::StackformConfig;
use stackform_common::error::Result;
use stackform_core::registry::ResourceRegistry;
use stackform_core::template::Template;

use crate::environment::{ContainerEnvironment, Environment};
use crate::manifest::Manifest;
use crate::validator;

/// Output of a synthesis run.
#[derive(Debug)]
pub struct Synthesis {
    /// The rendered resource graph.
    pub template: Template,
    /// One environment per cluster, owned cluster first.
    pub environments: Vec<Environment>,
    /// Configuration the run used, after manifest overrides.
    pub config: StackformConfig,
}

impl Synthesis {
    /// Total number of execution steps composed.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.environments.iter().map(|e| e.steps().len()).sum()
    }
}

/// Validates `manifest` and composes every cluster and task it declares.
///
/// The owned cluster, if any, is created and registered first; imported
/// clusters are attached afterwards and never registered.
///
/// # Errors
///
/// Returns the first validation, composition, or registry error.
pub fn synthesize(
    manifest: &Manifest,
    base: &StackformConfig,
    registry: Arc<dyn ResourceRegistry>,
) -> Result<Synthesis> {
    let config = manifest.effective_config(base);
    validator::validate(manifest, config.profile)?;

    let facade = ContainerEnvironment::new(registry, config.clone());
    let mut template = Template::new();
    let mut environments = Vec::new();

    if let Some(spec) = manifest.cluster_spec(config.profile)? {
        let mut environment = facade.create_environment(&mut template, &spec)?;
        for task in manifest.cluster.iter().flat_map(|c| c.tasks.iter()) {
            let _ = environment.add_task(&mut template, task)?;
        }
        environments.push(environment);
    }

    for import in &manifest.imports {
        let network = import
            .network
            .clone()
            .unwrap_or_else(|| manifest.network.clone());
        let mut environment = facade.attach_existing_cluster(
            &mut template,
            &import.cluster,
            network,
            import.security(),
        )?;
        for task in &import.tasks {
            let _ = environment.add_task(&mut template, task)?;
        }
        environments.push(environment);
    }

    let synthesis = Synthesis {
        template,
        environments,
        config,
    };
    tracing::info!(
        unit = %synthesis.config.unit_name,
        profile = %synthesis.config.profile,
        steps = synthesis.step_count(),
        "synthesis complete"
    );
    Ok(synthesis)
}
