//! # stackform-sdk
//!
//! Public SDK for composing container workloads with Stackform.
//!
//! Provides the main entry points:
//! - [`ContainerEnvironment`](environment::ContainerEnvironment): Creates clusters or attaches
//!   to existing ones, and records created clusters in the resource registry.
//! - [`TaskSpecBuilder`](builder::TaskSpecBuilder): Fluent API for describing a workload.
//! - [`Manifest`](manifest::Manifest): YAML description of a whole deployment unit, turned into
//!   a template by [`synthesize`](synth::synthesize).
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use stackform_common::config::StackformConfig;
//! use stackform_common::types::NetworkContext;
//! use stackform_core::registry::InMemoryRegistry;
//! use stackform_core::spec::ClusterSpec;
//! use stackform_core::template::Template;
//! use stackform_sdk::builder::TaskSpecBuilder;
//! use stackform_sdk::environment::ContainerEnvironment;
//!
//! # fn main() -> stackform_common::error::Result<()> {
//! let registry = Arc::new(InMemoryRegistry::new());
//! let facade = ContainerEnvironment::new(registry, StackformConfig::for_unit("orders-stack"));
//! let mut template = Template::new();
//!
//! let mut env = facade.create_environment(
//!     &mut template,
//!     &ClusterSpec::new("Orders", NetworkContext::new("vpc-0abc")),
//! )?;
//! let step = env.add_task(
//!     &mut template,
//!     &TaskSpecBuilder::new("api").image("registry/app:1").build()?,
//! )?;
//! assert_eq!(step.cluster().name, "Orders");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod builder;
pub mod environment;
pub mod manifest;
pub mod synth;
pub mod validator;
