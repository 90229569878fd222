//! `sfm plan`: Show what a manifest would provision, in order.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use stackform_core::cluster::ClusterView;
use stackform_core::registry::InMemoryRegistry;
use stackform_sdk::manifest::Manifest;
use stackform_sdk::synth::synthesize;

use super::Cli;

/// Arguments for the `plan` subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the manifest.
    #[arg(default_value = stackform_common::constants::DEFAULT_MANIFEST_FILE)]
    pub file: PathBuf,
}

/// Executes the `plan` command.
///
/// Composes the manifest against a throwaway registry and prints each
/// cluster, its tasks, and the resource provisioning order.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, validated, or composed.
pub fn execute(cli: &Cli, args: &PlanArgs) -> anyhow::Result<()> {
    let manifest = Manifest::load(&args.file)?;
    let synthesis = synthesize(&manifest, &cli.config(None), Arc::new(InMemoryRegistry::new()))?;
    let order = synthesis.template.provisioning_order()?;

    println!("Plan for: {}", args.file.display());
    println!(
        "  unit: {}  profile: {}",
        synthesis.config.unit_name, synthesis.config.profile
    );
    println!();

    for env in &synthesis.environments {
        let cluster = env.cluster();
        let marker = if cluster.is_owned() { "+" } else { "~" };
        println!("  {marker} cluster {} ({})", cluster.name(), cluster.network());
        if let Some(owned) = cluster.as_owned() {
            println!("      insights: {}", owned.spec().container_insights);
        }
        for step in env.steps() {
            let task = step.task_definition();
            for container in &task.containers {
                println!("      + task {} [{}]", container.name, container.image);
                for mapping in &container.port_mappings {
                    println!("          port: {mapping}");
                }
            }
            println!(
                "          cpu: {}  memory: {}  public ip: {}",
                task.cpu_units,
                task.memory_mib,
                step.assign_public_ip()
            );
        }
    }

    println!();
    println!("  Provisioning order:");
    for (i, id) in order.iter().enumerate() {
        println!("    {}. {id}", i + 1);
    }
    println!();
    println!(
        "  {} resource(s), {} execution step(s).",
        order.len(),
        synthesis.step_count()
    );

    Ok(())
}
