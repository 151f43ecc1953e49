//! Prerequisite graph: storage, transitive closure, and path planning.
//!
//! - **Index** ([`index::PrerequisiteGraph`]): immutable `petgraph` DAG over topics
//! - **Closure** ([`closure::ClosureEngine`]): memoized transitive prerequisites
//! - **Planner** ([`planner::PathPlanner`]): deterministic topological ordering
//!
//! Edges point from a prerequisite to the topic that requires it, so the
//! prerequisites of a topic are its incoming neighbors.

pub mod closure;
pub mod index;
pub mod planner;

use serde::{Deserialize, Serialize};

use crate::topic::TopicId;

/// A directed prerequisite edge: `before` must be learned before `topic`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrerequisiteEdge {
    /// The prerequisite.
    pub before: TopicId,
    /// The topic that requires it.
    pub topic: TopicId,
}

impl PrerequisiteEdge {
    pub fn new(before: impl Into<TopicId>, topic: impl Into<TopicId>) -> Self {
        Self {
            before: before.into(),
            topic: topic.into(),
        }
    }
}
