//! `sfm registry`: List the records in a registry file.

use std::path::PathBuf;

use clap::Args;
use stackform_core::registry::JsonFileRegistry;

/// Arguments for the `registry` subcommand.
#[derive(Args, Debug)]
pub struct RegistryArgs {
    /// Path to the registry file.
    #[arg(default_value = stackform_common::constants::DEFAULT_REGISTRY_FILE)]
    pub file: PathBuf,

    /// Key prefix used to render lookup keys.
    #[arg(long, default_value = stackform_common::constants::DEFAULT_REGISTRY_PREFIX)]
    pub prefix: String,

    /// Print records as JSON lines.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `registry` command.
///
/// # Errors
///
/// Returns an error if the registry file cannot be read or parsed.
pub fn execute(args: &RegistryArgs) -> anyhow::Result<()> {
    let records = JsonFileRegistry::new(&args.file).load()?;

    if args.json {
        for record in &records {
            println!("{}", serde_json::to_string(record)?);
        }
        return Ok(());
    }

    if records.is_empty() {
        println!("No records in {}.", args.file.display());
        return Ok(());
    }
    for record in &records {
        println!("{}  {}", record.parameter_name(&args.prefix), record.identifier);
    }
    Ok(())
}
