//! End-to-end tests for the composition pipeline.
//!
//! These tests drive the public SDK the way a deployment unit would:
//! 1. Create a cluster and register it
//! 2. Compose tasks against it
//! 3. Attach tasks to a cluster owned by another unit
//! 4. Render the template and inspect the resource graph
//! 5. Synthesize a whole manifest against a file-backed registry

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use serde_json::json;
use stackform_common::config::{Profile, StackformConfig};
use stackform_common::error::StackformError;
use stackform_common::types::{NetworkContext, Protocol, SubnetPlacement};
use stackform_core::cluster::ClusterView;
use stackform_core::registry::{InMemoryRegistry, JsonFileRegistry, ResourceRegistry};
use stackform_core::spec::{ClusterSpec, TaskDefinitionSpec};
use stackform_core::template::{CLUSTER_TYPE, TASK_DEFINITION_TYPE, Template};
use stackform_sdk::builder::TaskSpecBuilder;
use stackform_sdk::environment::ContainerEnvironment;
use stackform_sdk::manifest::Manifest;
use stackform_sdk::synth::synthesize;

fn net() -> NetworkContext {
    NetworkContext::new("vpc-0abc")
}

fn facade(unit: &str, profile: Profile) -> (ContainerEnvironment, Arc<InMemoryRegistry>) {
    let registry = Arc::new(InMemoryRegistry::new());
    let config = StackformConfig::for_unit(unit).with_profile(profile);
    (ContainerEnvironment::new(registry.clone(), config), registry)
}

// ── Create-and-extend ────────────────────────────────────────────────

#[test]
fn scenario_create_orders_and_add_api_task() {
    let (facade, registry) = facade("orders-stack", Profile::Registered);
    let mut template = Template::new();

    let mut env = facade
        .create_environment(&mut template, &ClusterSpec::new("Orders", net()))
        .expect("create environment");
    let spec = TaskDefinitionSpec {
        container_port: Some(80),
        host_port: Some(80),
        ..TaskDefinitionSpec::new("api", "registry/app:1")
    };
    let step = env.add_task(&mut template, &spec).expect("add task");

    let task = step.task_definition();
    assert_eq!(task.containers.len(), 1);
    let container = &task.containers[0];
    assert_eq!(container.name, "api");
    assert_eq!(container.port_mappings.len(), 1);
    let mapping = container.port_mappings[0];
    assert_eq!(mapping.container_port, 80);
    assert_eq!(mapping.host_port, 80);
    assert_eq!(mapping.protocol, Protocol::Tcp);

    let records = registry.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].logical_name, "Orders");
    assert_eq!(records[0].owning_unit_name, "orders-stack");
    assert_eq!(
        records[0].parameter_name(&facade.config().registry_prefix),
        "/stackform/orders-stack/Orders"
    );
}

#[test]
fn adding_tasks_never_adds_registry_records() {
    let (facade, registry) = facade("orders-stack", Profile::Registered);
    let mut template = Template::new();
    let mut env = facade
        .create_environment(&mut template, &ClusterSpec::new("Orders", net()))
        .expect("create");

    for name in ["a", "b", "c"] {
        let _ = env
            .add_task(&mut template, &TaskDefinitionSpec::new(name, "img"))
            .expect("add");
    }
    assert_eq!(registry.len(), 1);
    assert_eq!(template.step_count(), 3);
}

#[test]
fn rendered_template_matches_composed_graph() {
    let (facade, _registry) = facade("TestStack", Profile::Registered);
    let mut template = Template::new();
    let mut env = facade
        .create_environment(&mut template, &ClusterSpec::new("TestCluster", net()))
        .expect("create");
    let spec = TaskSpecBuilder::new("TestContainer")
        .image("amazon/amazon-ecs-sample")
        .cpu_units("256")
        .memory_mib("512")
        .ports(80, 80)
        .assign_public_ip(false)
        .subnet_placement(SubnetPlacement::Public)
        .build()
        .expect("build");
    let step = env.add_task(&mut template, &spec).expect("add");

    assert_eq!(template.resource_count(CLUSTER_TYPE), 1);
    assert_eq!(template.resource_count(TASK_DEFINITION_TYPE), 1);

    let cluster = &template.find_resources(CLUSTER_TYPE)[0]["Properties"];
    assert_eq!(cluster["ClusterName"], "TestCluster");
    assert_eq!(
        cluster["ClusterSettings"],
        json!([{ "Name": "containerInsights", "Value": "disabled" }])
    );

    let task = &template.find_resources(TASK_DEFINITION_TYPE)[0]["Properties"];
    assert_eq!(task["RequiresCompatibilities"], json!(["FARGATE"]));
    assert_eq!(task["Cpu"], "256");
    assert_eq!(task["Memory"], "512");
    assert_eq!(task["ContainerDefinitions"][0]["Name"], "TestContainer");
    assert_eq!(task["ContainerDefinitions"][0]["Image"], "amazon/amazon-ecs-sample");
    assert_eq!(
        task["ContainerDefinitions"][0]["PortMappings"],
        json!([{ "ContainerPort": 80, "HostPort": 80, "Protocol": "tcp" }])
    );

    let state = template
        .find_step(step.resource().identifier.as_str())
        .expect("state");
    assert_eq!(
        state["Parameters"]["Cluster"],
        json!(env.cluster().identifier().as_str())
    );
    assert_eq!(state["Parameters"]["LaunchType"], "FARGATE");

    let order = template.provisioning_order().expect("order");
    assert_eq!(order.last(), Some(&step.resource().logical_id));
}

#[test]
fn explicit_insights_values_survive_both_profiles() {
    for profile in [Profile::Registered, Profile::Managed] {
        for flag in [true, false] {
            let (facade, _registry) = facade("unit", profile);
            let mut template = Template::new();
            let env = facade
                .create_environment(
                    &mut template,
                    &ClusterSpec::new("C", net()).container_insights(flag),
                )
                .expect("create");
            let owned = env.cluster().as_owned().expect("owned");
            assert_eq!(owned.spec().container_insights, flag, "{profile} {flag}");
        }
    }
}

// ── Extend-by-reference ──────────────────────────────────────────────

#[test]
fn scenario_add_worker_to_existing_orders_cluster() {
    let (facade, registry) = facade("worker-stack", Profile::Registered);
    let mut template = Template::new();
    let spec = TaskDefinitionSpec {
        container_port: Some(8080),
        host_port: Some(8080),
        assign_public_ip: Some(true),
        ..TaskDefinitionSpec::new("worker", "registry/app:2")
    };

    let step = facade
        .add_task_to_existing_cluster(&mut template, "Orders", net(), &spec)
        .expect("add task");

    assert_eq!(step.cluster().name, "Orders");
    assert!(step.assign_public_ip());
    assert_eq!(step.task_definition().containers[0].port_mappings[0].container_port, 8080);
    assert!(registry.is_empty());
    assert_eq!(template.resource_count(CLUSTER_TYPE), 0);
}

#[test]
fn cross_unit_import_uses_name_recorded_by_owner() {
    let shared = Arc::new(InMemoryRegistry::new());
    let owner = ContainerEnvironment::new(
        shared.clone(),
        StackformConfig::for_unit("owner-stack"),
    );
    let consumer = ContainerEnvironment::new(
        shared.clone(),
        StackformConfig::for_unit("consumer-stack"),
    );

    let mut owner_template = Template::new();
    let _ = owner
        .create_environment(&mut owner_template, &ClusterSpec::new("Shared", net()))
        .expect("owner create");

    let recorded = shared.records()[0].logical_name.clone();
    let mut consumer_template = Template::new();
    let step = consumer
        .add_task_to_existing_cluster(
            &mut consumer_template,
            &recorded,
            net(),
            &TaskDefinitionSpec::new("job", "img"),
        )
        .expect("consumer add");

    assert_eq!(step.cluster().name, "Shared");
    assert_eq!(shared.len(), 1);
}

// ── Failure modes ────────────────────────────────────────────────────

#[test]
fn out_of_range_ports_fail_without_creating_resources() {
    let (facade, _registry) = facade("unit", Profile::Registered);
    let mut template = Template::new();
    let mut env = facade
        .create_environment(&mut template, &ClusterSpec::new("C", net()))
        .expect("create");

    for spec in [
        TaskDefinitionSpec {
            container_port: Some(0),
            ..TaskDefinitionSpec::new("zero", "img")
        },
        TaskDefinitionSpec {
            host_port: Some(70_000),
            ..TaskDefinitionSpec::new("huge", "img")
        },
    ] {
        let err = env.add_task(&mut template, &spec).unwrap_err();
        assert!(matches!(err, StackformError::InvalidPort { .. }), "got: {err}");
    }
    assert_eq!(template.resource_count(TASK_DEFINITION_TYPE), 0);
    assert_eq!(template.step_count(), 0);
    assert!(env.steps().is_empty());
}

#[test]
fn empty_existing_cluster_name_fails_resolution() {
    let (facade, registry) = facade("unit", Profile::Registered);
    let mut template = Template::new();
    let err = facade
        .add_task_to_existing_cluster(&mut template, "", net(), &TaskDefinitionSpec::new("a", "b"))
        .unwrap_err();
    assert!(matches!(err, StackformError::Resolution { .. }));
    assert!(registry.is_empty());
}

#[test]
fn invalid_port_on_existing_cluster_can_be_retried() {
    let (facade, registry) = facade("worker-stack", Profile::Registered);
    let mut template = Template::new();
    let bad = TaskDefinitionSpec {
        host_port: Some(70_000),
        ..TaskDefinitionSpec::new("worker", "registry/app:2")
    };

    let err = facade
        .add_task_to_existing_cluster(&mut template, "Orders", net(), &bad)
        .unwrap_err();
    assert!(matches!(err, StackformError::InvalidPort { .. }), "got: {err}");
    assert_eq!(template.import_count(), 0);
    assert_eq!(template.step_count(), 0);

    let fixed = TaskDefinitionSpec {
        host_port: Some(8080),
        ..bad
    };
    let step = facade
        .add_task_to_existing_cluster(&mut template, "Orders", net(), &fixed)
        .expect("retry");
    assert_eq!(step.cluster().name, "Orders");
    assert_eq!(template.import_count(), 1);
    assert!(registry.is_empty());
}

#[test]
fn invalid_port_in_manifest_records_nothing_and_retry_records_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = Arc::new(JsonFileRegistry::new(dir.path().join("registry.jsonl")));
    let manifest = |container_port: u32| {
        Manifest::from_yaml(&format!(
            r"
unit: orders-stack
network: vpc-0abc
cluster:
  name: Orders
  tasks:
    - container_name: api
      container_image: registry/app:1
      container_port: {container_port}
"
        ))
        .expect("parse")
    };

    let err = synthesize(&manifest(0), &StackformConfig::default(), registry.clone()).unwrap_err();
    assert!(matches!(err, StackformError::InvalidPort { value: 0, .. }), "got: {err}");
    assert!(registry.load().expect("load").is_empty());

    let synthesis =
        synthesize(&manifest(80), &StackformConfig::default(), registry.clone()).expect("synth");
    assert_eq!(synthesis.step_count(), 1);
    let records = registry.load().expect("load");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].logical_name, "Orders");
}

// ── Manifest synthesis ───────────────────────────────────────────────

#[test]
fn manifest_synthesis_appends_to_file_registry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let registry = Arc::new(JsonFileRegistry::new(dir.path().join("registry.jsonl")));
    let manifest = Manifest::from_yaml(
        r"
unit: orders-stack
network: vpc-0abc
cluster:
  name: Orders
  container_insights: true
  tasks:
    - container_name: api
      container_image: registry/app:1
imports:
  - cluster: Billing
    security_groups: [sg-1]
    tasks:
      - container_name: invoicer
        container_image: registry/invoicer:3
",
    )
    .expect("parse");

    let dyn_registry: Arc<dyn ResourceRegistry> = registry.clone();
    let synthesis =
        synthesize(&manifest, &StackformConfig::default(), dyn_registry).expect("synth");
    assert_eq!(synthesis.step_count(), 2);

    let records = registry.load().expect("load");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].logical_name, "Orders");
    assert_eq!(records[0].owning_unit_name, "orders-stack");

    let doc = synthesis.template.to_json();
    let imports = doc["Imports"].as_object().expect("imports");
    assert_eq!(imports.len(), 1);
    let import = imports.values().next().expect("import");
    assert_eq!(import["ClusterName"], "Billing");
    assert_eq!(import["SecurityGroups"], json!(["sg-1"]));
    assert_eq!(doc["States"].as_object().expect("states").len(), 2);
}

#[test]
fn managed_manifest_uses_default_name_and_skips_registry() {
    let registry = Arc::new(InMemoryRegistry::new());
    let manifest = Manifest::from_yaml("profile: managed\nnetwork: vpc-1\ncluster: {}\n")
        .expect("parse");

    let synthesis =
        synthesize(&manifest, &StackformConfig::default(), registry.clone()).expect("synth");
    let cluster = &synthesis.template.find_resources(CLUSTER_TYPE)[0]["Properties"];
    assert_eq!(cluster["ClusterName"], "ContainerEnvComponentCluster");
    assert_eq!(cluster["ClusterSettings"][0]["Value"], "enabled");
    assert!(registry.is_empty());
}
