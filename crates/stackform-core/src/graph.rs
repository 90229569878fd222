//! Resource dependency graph using `petgraph`.
//!
//! Records which described resources reference which, and resolves a
//! topological provisioning order.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use stackform_common::error::{Result, StackformError};

/// A dependency graph of logical resource ids.
#[derive(Debug)]
pub struct ResourceGraph {
    graph: petgraph::Graph<String, ()>,
    nodes: HashMap<String, NodeIndex>,
}

impl ResourceGraph {
    /// Creates an empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: petgraph::Graph::new(),
            nodes: HashMap::new(),
        }
    }

    /// Adds a resource node, returning the existing node if already present.
    pub fn add_resource(&mut self, logical_id: impl Into<String>) -> NodeIndex {
        let logical_id = logical_id.into();
        if let Some(&idx) = self.nodes.get(&logical_id) {
            return idx;
        }
        let idx = self.graph.add_node(logical_id.clone());
        let _ = self.nodes.insert(logical_id, idx);
        idx
    }

    /// Adds a dependency edge: `dependent` references `dependency`.
    ///
    /// The graph edge points from `dependency` to `dependent`
    /// so that topological sort yields dependencies first.
    pub fn add_dependency(&mut self, dependent: &str, dependency: &str) {
        let dependent = self.add_resource(dependent);
        let dependency = self.add_resource(dependency);
        let _ = self.graph.update_edge(dependency, dependent, ());
    }

    /// Removes a resource node and every edge touching it.
    ///
    /// Returns `false` if the resource was not in the graph.
    pub fn remove_resource(&mut self, logical_id: &str) -> bool {
        let Some(idx) = self.nodes.remove(logical_id) else {
            return false;
        };
        let _ = self.graph.remove_node(idx);
        // petgraph moves the last node into the freed index.
        if let Some(moved) = self.graph.node_weight(idx) {
            let _ = self.nodes.insert(moved.clone(), idx);
        }
        true
    }

    /// Number of resources in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the graph holds no resources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Logical ids `logical_id` directly depends on.
    #[must_use]
    pub fn dependencies_of(&self, logical_id: &str) -> Vec<String> {
        let Some(&idx) = self.nodes.get(logical_id) else {
            return Vec::new();
        };
        let mut deps: Vec<String> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .filter_map(|n| self.graph.node_weight(n).cloned())
            .collect();
        deps.sort();
        deps
    }

    /// Returns a provisioning order in which dependencies come first.
    ///
    /// # Errors
    ///
    /// Returns an error if the graph contains cycles.
    pub fn resolve_order(&self) -> Result<Vec<String>> {
        match petgraph::algo::toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .iter()
                .filter_map(|&idx| self.graph.node_weight(idx).cloned())
                .collect()),
            Err(_cycle) => Err(StackformError::Config {
                message: "cyclic dependency detected in resource graph".into(),
            }),
        }
    }
}

impl Default for ResourceGraph {
    fn default() -> Self {
        Self::new()
    }
}
