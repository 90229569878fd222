//! In-memory provisioning engine that renders a deployment template.
//!
//! Every described resource is kept as a typed entry keyed by a logical id
//! and rendered on demand into a CloudFormation-shaped JSON document.
//! Execution steps become state-machine task states. Construct ids must be
//! unique within one template.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};
use stackform_common::error::{Result, StackformError};
use stackform_common::types::{LaunchTarget, PortMapping, ResourceId};

use crate::engine::{
    ClusterAttributes, ContainerProps, NetworkPlacement, ProvisioningEngine, ResourceRef,
    RunTaskProps, TaskDefinitionProps,
};
use crate::graph::ResourceGraph;
use crate::spec::ResolvedClusterSpec;

/// Resource type of a cluster.
pub const CLUSTER_TYPE: &str = "AWS::ECS::Cluster";
/// Resource type of a task definition.
pub const TASK_DEFINITION_TYPE: &str = "AWS::ECS::TaskDefinition";

const RUN_TASK_RESOURCE: &str = "arn:${AWS::Partition}:states:::ecs:runTask";
const HASH_BYTES: usize = 4;

#[derive(Debug, Clone)]
enum Described {
    Cluster {
        name: String,
        container_insights: bool,
    },
    TaskDefinition {
        props: TaskDefinitionProps,
        containers: Vec<ContainerEntry>,
    },
}

impl Described {
    const fn type_name(&self) -> &'static str {
        match self {
            Self::Cluster { .. } => CLUSTER_TYPE,
            Self::TaskDefinition { .. } => TASK_DEFINITION_TYPE,
        }
    }

    fn render(&self) -> Value {
        let properties = match self {
            Self::Cluster {
                name,
                container_insights,
            } => json!({
                "ClusterName": name,
                "ClusterSettings": [{
                    "Name": "containerInsights",
                    "Value": if *container_insights { "enabled" } else { "disabled" },
                }],
            }),
            Self::TaskDefinition { props, containers } => {
                let definitions: Vec<Value> =
                    containers.iter().map(ContainerEntry::render).collect();
                json!({
                    "RequiresCompatibilities": [props.compatibility.to_string()],
                    "NetworkMode": "awsvpc",
                    "Cpu": props.cpu_units,
                    "Memory": props.memory_mib,
                    "ContainerDefinitions": definitions,
                })
            }
        };
        json!({ "Type": self.type_name(), "Properties": properties })
    }
}

#[derive(Debug, Clone)]
struct ContainerEntry {
    name: String,
    image: String,
    port_mappings: Vec<PortMapping>,
}

impl ContainerEntry {
    fn render(&self) -> Value {
        let mappings: Vec<Value> = self
            .port_mappings
            .iter()
            .map(|m| {
                json!({
                    "ContainerPort": m.container_port,
                    "HostPort": m.host_port,
                    "Protocol": m.protocol.to_string(),
                })
            })
            .collect();
        json!({
            "Name": self.name,
            "Image": self.image,
            "Essential": true,
            "PortMappings": mappings,
        })
    }
}

#[derive(Debug, Clone)]
struct StepEntry {
    cluster: ResourceId,
    task_definition: ResourceId,
    launch_target: LaunchTarget,
    assign_public_ip: bool,
    placement: NetworkPlacement,
}

impl StepEntry {
    fn render(&self) -> Value {
        json!({
            "Type": "Task",
            "Resource": RUN_TASK_RESOURCE,
            "Parameters": {
                "Cluster": self.cluster,
                "TaskDefinition": self.task_definition,
                "LaunchType": self.launch_target.to_string(),
                "NetworkConfiguration": {
                    "AwsvpcConfiguration": {
                        "AssignPublicIp": if self.assign_public_ip { "ENABLED" } else { "DISABLED" },
                        "Subnets": {
                            "Network": self.placement.network,
                            "SubnetType": self.placement.subnets.to_string(),
                        },
                    },
                },
            },
        })
    }
}

/// In-memory template engine.
#[derive(Debug, Default)]
pub struct Template {
    constructs: BTreeMap<String, String>,
    resources: BTreeMap<String, Described>,
    imports: BTreeMap<String, (ClusterAttributes, ResourceId)>,
    steps: BTreeMap<String, StepEntry>,
    containers: HashMap<String, (String, usize)>,
    clusters_by_id: HashMap<ResourceId, String>,
    graph: ResourceGraph,
}

impl Template {
    /// Creates an empty template.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `construct_id` has already been claimed.
    #[must_use]
    pub fn contains_construct(&self, construct_id: &str) -> bool {
        self.constructs.contains_key(construct_id)
    }

    /// Number of resources of type `type_name`.
    #[must_use]
    pub fn resource_count(&self, type_name: &str) -> usize {
        self.resources
            .values()
            .filter(|r| r.type_name() == type_name)
            .count()
    }

    /// Number of execution steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Number of imported cluster references.
    #[must_use]
    pub fn import_count(&self) -> usize {
        self.imports.len()
    }

    /// Rendered resources of type `type_name`, in logical-id order.
    #[must_use]
    pub fn find_resources(&self, type_name: &str) -> Vec<Value> {
        self.resources
            .values()
            .filter(|r| r.type_name() == type_name)
            .map(Described::render)
            .collect()
    }

    /// Rendered execution step with logical id `state_name`.
    #[must_use]
    pub fn find_step(&self, state_name: &str) -> Option<Value> {
        self.steps.get(state_name).map(StepEntry::render)
    }

    /// Logical ids in an order where every resource follows what it references.
    ///
    /// # Errors
    ///
    /// Returns an error if the dependency graph contains a cycle.
    pub fn provisioning_order(&self) -> Result<Vec<String>> {
        self.graph.resolve_order()
    }

    /// Renders the whole template.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let resources: Map<String, Value> = self
            .resources
            .iter()
            .map(|(id, r)| (id.clone(), r.render()))
            .collect();
        let imports: Map<String, Value> = self
            .imports
            .iter()
            .map(|(id, (attrs, arn))| {
                let groups: Vec<&str> = attrs.security.groups().collect();
                (
                    id.clone(),
                    json!({
                        "ClusterName": attrs.cluster_name,
                        "ClusterArn": arn,
                        "Network": attrs.network,
                        "SecurityGroups": groups,
                    }),
                )
            })
            .collect();
        let states: Map<String, Value> = self
            .steps
            .iter()
            .map(|(name, step)| (name.clone(), step.render()))
            .collect();

        json!({
            "Resources": resources,
            "Imports": imports,
            "States": states,
        })
    }

    /// Renders the whole template as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }

    fn claim(&mut self, construct_id: &str) -> Result<String> {
        if self.constructs.contains_key(construct_id) {
            return Err(StackformError::NamingCollision {
                name: construct_id.to_string(),
            });
        }
        let id = logical_id(construct_id);
        let _ = self.constructs.insert(construct_id.to_string(), id.clone());
        Ok(id)
    }
}

/// Renders a construct id as a template logical id: its alphanumeric
/// characters followed by a short hash of the full id.
#[must_use]
pub fn logical_id(construct_id: &str) -> String {
    let mut id: String = construct_id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    let digest = Sha256::digest(construct_id.as_bytes());
    for byte in digest.iter().take(HASH_BYTES) {
        let _ = write!(id, "{byte:02X}");
    }
    id
}

impl ProvisioningEngine for Template {
    fn create_cluster(
        &mut self,
        logical_id: &str,
        spec: &ResolvedClusterSpec,
    ) -> Result<ResourceRef> {
        let id = self.claim(logical_id)?;
        let identifier = ResourceId::new(format!("${{{id}.Arn}}"));
        let _ = self.resources.insert(
            id.clone(),
            Described::Cluster {
                name: spec.cluster_name.clone(),
                container_insights: spec.container_insights,
            },
        );
        let _ = self.graph.add_resource(id.clone());
        let _ = self.clusters_by_id.insert(identifier.clone(), id.clone());
        tracing::debug!(logical_id = %id, "cluster described");
        Ok(ResourceRef {
            logical_id: id,
            identifier,
        })
    }

    fn import_cluster(
        &mut self,
        logical_id: &str,
        attributes: &ClusterAttributes,
    ) -> Result<ResourceRef> {
        let id = self.claim(logical_id)?;
        let identifier = ResourceId::new(format!(
            "arn:${{AWS::Partition}}:ecs:${{AWS::Region}}:${{AWS::AccountId}}:cluster/{}",
            attributes.cluster_name
        ));
        let _ = self
            .imports
            .insert(id.clone(), (attributes.clone(), identifier.clone()));
        let _ = self.graph.add_resource(id.clone());
        let _ = self.clusters_by_id.insert(identifier.clone(), id.clone());
        Ok(ResourceRef {
            logical_id: id,
            identifier,
        })
    }

    fn create_task_definition(
        &mut self,
        logical_id: &str,
        props: &TaskDefinitionProps,
    ) -> Result<ResourceRef> {
        let id = self.claim(logical_id)?;
        let identifier = ResourceId::new(format!("${{{id}}}"));
        let _ = self.resources.insert(
            id.clone(),
            Described::TaskDefinition {
                props: props.clone(),
                containers: Vec::new(),
            },
        );
        let _ = self.graph.add_resource(id.clone());
        Ok(ResourceRef {
            logical_id: id,
            identifier,
        })
    }

    fn add_container(
        &mut self,
        task_definition: &ResourceRef,
        logical_id: &str,
        props: &ContainerProps,
    ) -> Result<ResourceRef> {
        let Some(Described::TaskDefinition { .. }) = self.resources.get(&task_definition.logical_id)
        else {
            return Err(StackformError::Config {
                message: format!("unknown task definition: {}", task_definition.logical_id),
            });
        };
        let id = self.claim(logical_id)?;
        let Some(Described::TaskDefinition { containers, .. }) =
            self.resources.get_mut(&task_definition.logical_id)
        else {
            return Err(StackformError::Config {
                message: format!("unknown task definition: {}", task_definition.logical_id),
            });
        };
        containers.push(ContainerEntry {
            name: props.container_name.clone(),
            image: props.image.clone(),
            port_mappings: Vec::new(),
        });
        let _ = self.containers.insert(
            id.clone(),
            (task_definition.logical_id.clone(), containers.len() - 1),
        );
        Ok(ResourceRef {
            logical_id: id,
            identifier: ResourceId::new(props.container_name.clone()),
        })
    }

    fn add_port_mapping(&mut self, container: &ResourceRef, mapping: PortMapping) -> Result<()> {
        let unknown = || StackformError::Config {
            message: format!("unknown container: {}", container.logical_id),
        };
        let (task_id, index) = self.containers.get(&container.logical_id).ok_or_else(unknown)?;
        let Some(Described::TaskDefinition { containers, .. }) = self.resources.get_mut(task_id)
        else {
            return Err(unknown());
        };
        containers
            .get_mut(*index)
            .ok_or_else(unknown)?
            .port_mappings
            .push(mapping);
        Ok(())
    }

    fn create_execution_step(
        &mut self,
        logical_id: &str,
        props: &RunTaskProps<'_>,
    ) -> Result<ResourceRef> {
        let id = self.claim(logical_id)?;
        self.graph
            .add_dependency(&id, &props.task_definition.logical_id);
        if let Some(cluster_id) = self.clusters_by_id.get(props.cluster) {
            self.graph.add_dependency(&id, cluster_id);
        }
        let _ = self.steps.insert(
            id.clone(),
            StepEntry {
                cluster: props.cluster.clone(),
                task_definition: props.task_definition.identifier.clone(),
                launch_target: props.launch_target,
                assign_public_ip: props.assign_public_ip,
                placement: props.placement.clone(),
            },
        );
        Ok(ResourceRef {
            identifier: ResourceId::new(id.clone()),
            logical_id: id,
        })
    }

    fn remove(&mut self, resource: &ResourceRef) -> Result<()> {
        let id = &resource.logical_id;
        let known = self.resources.remove(id).is_some()
            || self.imports.remove(id).is_some()
            || self.steps.remove(id).is_some();
        if !known {
            return Err(StackformError::Config {
                message: format!("unknown resource: {id}"),
            });
        }
        // Containers only go away together with their task definition.
        self.containers.retain(|_, (task_id, _)| task_id != id);
        self.clusters_by_id.retain(|_, cluster_id| cluster_id != id);
        self.constructs.retain(|_, logical| logical != id);
        let _ = self.graph.remove_resource(id);
        tracing::debug!(logical_id = %id, "resource removed");
        Ok(())
    }
}
