//! `sfm validate`: Check a manifest without composing it.

use std::path::PathBuf;

use clap::Args;
use stackform_sdk::manifest::Manifest;
use stackform_sdk::validator;

use super::Cli;

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the manifest.
    #[arg(default_value = stackform_common::constants::DEFAULT_MANIFEST_FILE)]
    pub file: PathBuf,
}

/// Executes the `validate` command.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or fails validation.
pub fn execute(cli: &Cli, args: &ValidateArgs) -> anyhow::Result<()> {
    let manifest = Manifest::load(&args.file)?;
    let config = manifest.effective_config(&cli.config(None));
    validator::validate(&manifest, config.profile)?;

    println!(
        "{}: ok ({} task(s), profile {})",
        args.file.display(),
        manifest.all_tasks().count(),
        config.profile
    );
    Ok(())
}
