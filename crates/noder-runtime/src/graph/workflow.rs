use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::definition::{Node, NodeId, Workflow};
use crate::{WorkflowError, WorkflowResult};

/// A compiled workflow graph ready for execution.
///
/// Compilation drops edges referencing nodes outside the workflow and rejects
/// graphs with cycles, so every accessor below operates on a valid DAG.
pub struct WorkflowGraph {
    /// The underlying directed graph.
    graph: DiGraph<Node, ()>,
    /// Map from node IDs to graph indices.
    node_indices: HashMap<NodeId, NodeIndex>,
    /// Map from graph indices to node IDs.
    index_to_id: HashMap<NodeIndex, NodeId>,
}

impl WorkflowGraph {
    /// Compiles a workflow definition into an executable graph.
    pub fn compile(workflow: &Workflow) -> WorkflowResult<Self> {
        let mut graph = DiGraph::with_capacity(workflow.nodes.len(), workflow.edges.len());
        let mut node_indices = HashMap::with_capacity(workflow.nodes.len());

        for node in &workflow.nodes {
            let index = graph.add_node(node.clone());
            node_indices.insert(node.id.clone(), index);
        }

        for edge in &workflow.edges {
            // Dangling edges are an editor artifact, not an error.
            let (Some(&source), Some(&target)) = (
                node_indices.get(&edge.source),
                node_indices.get(&edge.target),
            ) else {
                continue;
            };
            graph.add_edge(source, target, ());
        }

        if is_cyclic_directed(&graph) {
            return Err(WorkflowError::CycleDetected);
        }

        let index_to_id = node_indices
            .iter()
            .map(|(id, &index)| (index, id.clone()))
            .collect();
        Ok(Self {
            graph,
            node_indices,
            index_to_id,
        })
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns a reference to a node by ID.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.node_indices
            .get(id)
            .and_then(|&index| self.graph.node_weight(index))
    }

    /// Returns an iterator over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Returns the upstream sources (incoming nodes) of a node.
    pub fn upstream_sources(&self, id: &NodeId) -> impl Iterator<Item = &NodeId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Returns the downstream targets (outgoing nodes) of a node.
    pub fn downstream_targets(&self, id: &NodeId) -> impl Iterator<Item = &NodeId> {
        self.neighbors(id, Direction::Outgoing)
    }

    fn neighbors(&self, id: &NodeId, direction: Direction) -> impl Iterator<Item = &NodeId> {
        self.node_indices.get(id).into_iter().flat_map(move |&index| {
            self.graph
                .neighbors_directed(index, direction)
                .filter_map(|neighbor| self.index_to_id.get(&neighbor))
        })
    }
}

impl std::fmt::Debug for WorkflowGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowGraph")
            .field("node_count", &self.graph.node_count())
            .field("edge_count", &self.graph.edge_count())
            .finish()
    }
}
