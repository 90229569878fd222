//! CLI command definitions and dispatch.

pub mod plan;
pub mod registry;
pub mod synth;
pub mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use stackform_common::config::{Profile, StackformConfig};

/// Stackform: declarative container workload composition.
#[derive(Parser, Debug)]
#[command(name = "sfm", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Deployment unit that owns created clusters, unless the manifest names one.
    #[arg(long, global = true, env = "STACKFORM_UNIT", default_value = stackform_common::constants::DEFAULT_UNIT_NAME)]
    pub unit: String,

    /// Composition profile, unless the manifest names one.
    #[arg(long, global = true, value_enum, default_value_t = ProfileArg::Registered)]
    pub profile: ProfileArg,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Configuration assembled from the global flags.
    #[must_use]
    pub fn config(&self, registry_file: Option<PathBuf>) -> StackformConfig {
        StackformConfig {
            registry_file,
            ..StackformConfig::for_unit(self.unit.clone()).with_profile(self.profile.into())
        }
    }
}

/// Composition profile selectable on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileArg {
    /// Insights off by default; created clusters are registered.
    Registered,
    /// Insights on by default; clusters are not registered.
    Managed,
}

impl From<ProfileArg> for Profile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Registered => Self::Registered,
            ProfileArg::Managed => Self::Managed,
        }
    }
}

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per event.
    Json,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compose a manifest and print the rendered template.
    Synth(synth::SynthArgs),
    /// Show the provisioning order of a manifest's resources.
    Plan(plan::PlanArgs),
    /// Check a manifest without composing it.
    Validate(validate::ValidateArgs),
    /// List the records in a registry file.
    Registry(registry::RegistryArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Synth(args) => synth::execute(&cli, args),
        Command::Plan(args) => plan::execute(&cli, args),
        Command::Validate(args) => validate::execute(&cli, args),
        Command::Registry(args) => registry::execute(args),
    }
}
