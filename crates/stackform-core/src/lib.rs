//! # stackform-core
//!
//! The resource composition and resolution engine.
//!
//! Handles:
//! - **Naming**: Deterministic child-resource names derived from a parent name.
//! - **Defaults**: Documented defaults for unset optional parameters.
//! - **Cluster**: Create-or-import resolution into a uniform cluster handle.
//! - **Task**: Task definition, container, port mapping, and execution step composition.
//! - **Engine**: The provisioning-engine surface the composition calls into.
//! - **Template**: An in-memory engine rendering the graph as a template.
//! - **Registry**: Cross-deployment record of created clusters.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod cluster;
pub mod defaults;
pub mod engine;
pub mod graph;
pub mod naming;
pub mod registry;
pub mod spec;
pub mod task;
pub mod template;
