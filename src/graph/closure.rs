//! Transitive prerequisite closure with memoization.
//!
//! The prerequisite graph never changes after load, so every closure is
//! cached for the lifetime of the engine. The cache is a `DashMap`, which
//! lets concurrent requests read and fill it without a global lock.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use dashmap::DashMap;
use petgraph::graph::NodeIndex;

use crate::error::GraphError;
use crate::topic::TopicId;

use super::index::{GraphResult, PrerequisiteGraph};

/// Computes and caches the full set of transitive prerequisites per topic.
pub struct ClosureEngine {
    graph: Arc<PrerequisiteGraph>,
    cache: DashMap<NodeIndex, Arc<BTreeSet<TopicId>>>,
}

impl ClosureEngine {
    /// Create a closure engine over a loaded graph. Nothing is computed yet.
    pub fn new(graph: Arc<PrerequisiteGraph>) -> Self {
        Self {
            graph,
            cache: DashMap::new(),
        }
    }

    /// The graph this engine reasons over.
    pub fn graph(&self) -> &PrerequisiteGraph {
        &self.graph
    }

    /// All topics reachable by following prerequisite edges from `topic`,
    /// excluding `topic` itself.
    ///
    /// Fails with [`GraphError::CycleDetected`] if the traversal revisits a
    /// topic that is still being expanded.
    pub fn all_prerequisites(&self, topic: &str) -> GraphResult<Arc<BTreeSet<TopicId>>> {
        let idx = self.graph.node(topic)?;
        let mut in_progress = HashSet::new();
        self.closure_of(idx, &mut in_progress)
    }

    /// Compute the closure of every topic in the graph.
    ///
    /// Returns the first cycle encountered, which makes a malformed catalog
    /// fail before any request is served.
    pub fn warm(&self) -> GraphResult<()> {
        for idx in self.graph.nodes() {
            let mut in_progress = HashSet::new();
            self.closure_of(idx, &mut in_progress)?;
        }
        tracing::debug!(cached = self.cache.len(), "prerequisite closures warmed");
        Ok(())
    }

    /// Number of memoized closures.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    fn closure_of(
        &self,
        idx: NodeIndex,
        in_progress: &mut HashSet<NodeIndex>,
    ) -> GraphResult<Arc<BTreeSet<TopicId>>> {
        if let Some(hit) = self.cache.get(&idx) {
            return Ok(Arc::clone(hit.value()));
        }
        if !in_progress.insert(idx) {
            return Err(GraphError::CycleDetected {
                topic: self.graph.topic_at(idx).to_string(),
            });
        }

        let mut closure = BTreeSet::new();
        let prereqs: Vec<NodeIndex> = self.graph.prerequisite_nodes(idx).collect();
        for prereq in prereqs {
            closure.insert(self.graph.topic_at(prereq).clone());
            let upstream = self.closure_of(prereq, in_progress)?;
            closure.extend(upstream.iter().cloned());
        }

        in_progress.remove(&idx);
        let closure = Arc::new(closure);
        self.cache.insert(idx, Arc::clone(&closure));
        Ok(closure)
    }
}

impl std::fmt::Debug for ClosureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClosureEngine")
            .field("graph", &self.graph)
            .field("cached", &self.cache.len())
            .finish()
    }
}
