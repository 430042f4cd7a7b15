use std::collections::{HashMap, HashSet};

use crate::definition::{Edge, NodeId, Workflow};

impl Workflow {
    /// Resolves the minimal sub-workflow needed to produce the given targets.
    ///
    /// The scope is the targets plus the transitive closure of their upstream
    /// dependencies. Node order from the full workflow is preserved, and only
    /// edges with both endpoints inside the scope survive. With no targets the
    /// whole workflow is the scope.
    pub fn scope(&self, targets: Option<&[NodeId]>) -> Workflow {
        let targets = match targets {
            Some(targets) if !targets.is_empty() => targets,
            _ => return self.clone(),
        };

        let mut incoming: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
        for edge in &self.edges {
            incoming.entry(&edge.target).or_default().push(&edge.source);
        }

        let mut needed: HashSet<&NodeId> = HashSet::new();
        let mut stack: Vec<&NodeId> = targets.iter().collect();
        while let Some(id) = stack.pop() {
            if !needed.insert(id) {
                continue;
            }
            if let Some(sources) = incoming.get(id) {
                stack.extend(sources.iter().copied());
            }
        }

        let nodes = self
            .nodes
            .iter()
            .filter(|node| needed.contains(&node.id))
            .cloned()
            .collect();
        let edges = self
            .edges
            .iter()
            .filter(|edge| needed.contains(&edge.source) && needed.contains(&edge.target))
            .cloned()
            .collect();

        Workflow { nodes, edges }
    }
}

/// Collects the given nodes plus everything reachable downstream of them.
///
/// Used when invalidating outputs: re-running a node makes every dependent
/// output stale.
pub fn downstream_closure<'a, I>(start: I, edges: &[Edge]) -> HashSet<NodeId>
where
    I: IntoIterator<Item = &'a NodeId>,
{
    let mut outgoing: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
    for edge in edges {
        outgoing.entry(&edge.source).or_default().push(&edge.target);
    }

    let mut closure: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<&NodeId> = start.into_iter().collect();
    while let Some(id) = stack.pop() {
        if !closure.insert(id.clone()) {
            continue;
        }
        if let Some(targets) = outgoing.get(id) {
            stack.extend(targets.iter().copied());
        }
    }
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{Node, NodeKind};

    fn diamond() -> Workflow {
        // a -> b -> d, a -> c -> d, plus detached e.
        Workflow::new(
            vec![
                Node::new("a", NodeKind::Text),
                Node::new("b", NodeKind::Text),
                Node::new("c", NodeKind::Text),
                Node::new("d", NodeKind::Image),
                Node::new("e", NodeKind::Text),
            ],
            vec![
                Edge::new("a", "b"),
                Edge::new("a", "c"),
                Edge::new("b", "d"),
                Edge::new("c", "d"),
            ],
        )
    }

    fn ids(workflow: &Workflow) -> Vec<&str> {
        workflow.nodes.iter().map(|node| node.id.as_str()).collect()
    }

    #[test]
    fn test_scope_without_targets_is_identity() {
        let workflow = diamond();
        assert_eq!(ids(&workflow.scope(None)), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(workflow.scope(Some(&[])).edges.len(), 4);
    }

    #[test]
    fn test_scope_excludes_unreachable_nodes() {
        let workflow = diamond();
        let scoped = workflow.scope(Some(&[NodeId::from("d")]));
        assert_eq!(ids(&scoped), vec!["a", "b", "c", "d"]);
        assert_eq!(scoped.edges.len(), 4);
    }

    #[test]
    fn test_scope_of_midpoint_drops_siblings() {
        let workflow = diamond();
        let scoped = workflow.scope(Some(&[NodeId::from("b")]));
        assert_eq!(ids(&scoped), vec!["a", "b"]);
        assert_eq!(scoped.edges.len(), 1);
    }

    #[test]
    fn test_scope_of_multiple_targets_unions_dependencies() {
        let workflow = diamond();
        let scoped = workflow.scope(Some(&[NodeId::from("b"), NodeId::from("e")]));
        assert_eq!(ids(&scoped), vec!["a", "b", "e"]);
    }

    #[test]
    fn test_downstream_closure_includes_start() {
        let workflow = diamond();
        let closure = downstream_closure([&NodeId::from("b")], &workflow.edges);
        assert_eq!(closure.len(), 2);
        assert!(closure.contains(&NodeId::from("b")));
        assert!(closure.contains(&NodeId::from("d")));
    }

    #[test]
    fn test_downstream_closure_from_root_covers_diamond() {
        let workflow = diamond();
        let closure = downstream_closure([&NodeId::from("a")], &workflow.edges);
        assert_eq!(closure.len(), 4);
        assert!(!closure.contains(&NodeId::from("e")));
    }
}
