//! `sfm synth`: Compose a manifest and print the rendered template.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use stackform_core::registry::{InMemoryRegistry, JsonFileRegistry, ResourceRegistry};
use stackform_sdk::manifest::Manifest;
use stackform_sdk::synth::synthesize;

use super::Cli;

/// Arguments for the `synth` subcommand.
#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Path to the manifest.
    #[arg(default_value = stackform_common::constants::DEFAULT_MANIFEST_FILE)]
    pub file: PathBuf,

    /// Write the template to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Append created clusters to this registry file. Without it, records
    /// are kept in memory and discarded.
    #[arg(long, env = "STACKFORM_REGISTRY_FILE")]
    pub registry_file: Option<PathBuf>,
}

/// Executes the `synth` command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read, validated, or composed,
/// or the template cannot be written.
pub fn execute(cli: &Cli, args: &SynthArgs) -> anyhow::Result<()> {
    let manifest = Manifest::load(&args.file)?;
    let config = cli.config(args.registry_file.clone());

    let registry: Arc<dyn ResourceRegistry> = match &config.registry_file {
        Some(path) => Arc::new(JsonFileRegistry::new(path)),
        None => {
            tracing::debug!("no registry file given, registry records are not persisted");
            Arc::new(InMemoryRegistry::new())
        }
    };

    let synthesis = synthesize(&manifest, &config, registry)?;
    let rendered = synthesis.template.to_json_string()?;

    if let Some(ref out_path) = args.output {
        std::fs::write(out_path, &rendered)?;
        println!("Synthesized {} -> {}", args.file.display(), out_path.display());
        println!("Execution steps: {}", synthesis.step_count());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use clap::Parser;
    use stackform_core::registry::JsonFileRegistry;

    use super::*;
    use crate::commands::Command;

    const MANIFEST: &str = "unit: orders-stack\nnetwork: vpc-1\ncluster:\n  name: Orders\n  tasks:\n    - { container_name: api, container_image: 'registry/app:1' }\n";

    #[test]
    fn writes_template_and_registry_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest = dir.path().join("stackform.yaml");
        let output = dir.path().join("template.json");
        let registry = dir.path().join("registry.jsonl");
        std::fs::write(&manifest, MANIFEST).expect("write");

        let argv: Vec<OsString> = vec![
            "sfm".into(),
            "synth".into(),
            manifest.into_os_string(),
            "-o".into(),
            output.clone().into_os_string(),
            "--registry-file".into(),
            registry.clone().into_os_string(),
        ];
        let cli = Cli::try_parse_from(argv).expect("parse");
        let Command::Synth(args) = &cli.command else {
            unreachable!("parsed synth");
        };
        execute(&cli, args).expect("synth");

        let rendered: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).expect("read")).expect("json");
        assert_eq!(rendered["States"].as_object().expect("states").len(), 1);

        let records = JsonFileRegistry::new(&registry).load().expect("load");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].owning_unit_name, "orders-stack");
    }

    #[test]
    fn missing_manifest_fails() {
        let cli = Cli::try_parse_from(["sfm", "synth", "/nonexistent/stackform.yaml"])
            .expect("parse");
        let Command::Synth(args) = &cli.command else {
            unreachable!("parsed synth");
        };
        assert!(execute(&cli, args).is_err());
    }
}
