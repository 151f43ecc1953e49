//! Immutable prerequisite graph backed by petgraph.
//!
//! Built once from the catalog and never mutated afterwards, so it can be
//! shared behind an `Arc` and read concurrently without locks.

use std::collections::{BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{CatalogError, GraphError};
use crate::topic::TopicId;

use super::PrerequisiteEdge;

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Directed prerequisite graph: nodes are topics, an edge `a -> b` means
/// `a` is a direct prerequisite of `b`.
pub struct PrerequisiteGraph {
    graph: DiGraph<TopicId, ()>,
    /// TopicId → NodeIndex mapping for O(1) node lookups.
    node_index: HashMap<TopicId, NodeIndex>,
}

impl PrerequisiteGraph {
    /// Build the graph from the topic ids and prerequisite edges.
    ///
    /// Fails if an edge references a topic that is not in `topics`, or if a
    /// topic id is listed twice. Cycles are not checked here; the closure
    /// engine reports them.
    pub fn build<'a>(
        topics: impl IntoIterator<Item = &'a TopicId>,
        edges: &[PrerequisiteEdge],
    ) -> Result<Self, CatalogError> {
        let mut graph = DiGraph::new();
        let mut node_index = HashMap::new();

        for topic in topics {
            if node_index.contains_key(topic) {
                return Err(CatalogError::DuplicateTopic {
                    topic: topic.to_string(),
                });
            }
            let idx = graph.add_node(topic.clone());
            node_index.insert(topic.clone(), idx);
        }

        for edge in edges {
            let referenced_by = format!("prerequisite edge {} -> {}", edge.before, edge.topic);
            let before = *node_index
                .get(&edge.before)
                .ok_or_else(|| CatalogError::UndefinedTopic {
                    referenced_by: referenced_by.clone(),
                    topic: edge.before.to_string(),
                })?;
            let after = *node_index
                .get(&edge.topic)
                .ok_or_else(|| CatalogError::UndefinedTopic {
                    referenced_by,
                    topic: edge.topic.to_string(),
                })?;
            // update_edge keeps repeated edges from turning into parallel edges.
            graph.update_edge(before, after, ());
        }

        Ok(Self { graph, node_index })
    }

    /// Look up the node for a topic.
    pub fn node(&self, topic: &str) -> GraphResult<NodeIndex> {
        self.node_index
            .get(topic)
            .copied()
            .ok_or_else(|| GraphError::TopicNotFound {
                topic: topic.to_string(),
            })
    }

    /// The topic stored at a node.
    pub fn topic_at(&self, idx: NodeIndex) -> &TopicId {
        &self.graph[idx]
    }

    /// Nodes of the direct prerequisites of `idx`.
    pub fn prerequisite_nodes(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Incoming)
    }

    /// Direct prerequisites of a topic.
    pub fn direct_prerequisites(&self, topic: &str) -> GraphResult<BTreeSet<TopicId>> {
        let idx = self.node(topic)?;
        Ok(self
            .prerequisite_nodes(idx)
            .map(|n| self.graph[n].clone())
            .collect())
    }

    /// Topics that list `topic` as a direct prerequisite.
    pub fn dependents(&self, topic: &str) -> GraphResult<BTreeSet<TopicId>> {
        let idx = self.node(topic)?;
        Ok(self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|n| self.graph[n].clone())
            .collect())
    }

    /// Check if a topic exists.
    pub fn contains(&self, topic: &str) -> bool {
        self.node_index.contains_key(topic)
    }

    /// Number of topics.
    pub fn topic_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of prerequisite edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All topics in insertion order.
    pub fn topics(&self) -> impl Iterator<Item = &TopicId> + '_ {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    /// All node indices in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }
}

impl std::fmt::Debug for PrerequisiteGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrerequisiteGraph")
            .field("topics", &self.topic_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}
