//! Path planning: turn an unordered topic set into a learnable sequence.
//!
//! The planner is a constructive topological sort restricted to the
//! subgraph induced by the requested topics. Prerequisites outside the set
//! are ignored for ordering purposes; they still gate availability later.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::error::GraphError;
use crate::topic::TopicId;

use super::closure::ClosureEngine;
use super::index::GraphResult;

/// Orders topic sets so every in-set prerequisite comes first.
#[derive(Debug, Clone, Copy)]
pub struct PathPlanner<'a> {
    closure: &'a ClosureEngine,
}

impl<'a> PathPlanner<'a> {
    pub fn new(closure: &'a ClosureEngine) -> Self {
        Self { closure }
    }

    /// Produce one valid linear order of `topics`.
    ///
    /// Repeatedly picks the first remaining topic (in input order) with no
    /// remaining topic among its transitive prerequisites. The input order is
    /// therefore the tie-break, and identical input yields identical output.
    /// Repeated ids are collapsed to their first occurrence.
    pub fn order(&self, topics: &[TopicId]) -> GraphResult<Vec<TopicId>> {
        let mut seen = HashSet::new();
        let mut remaining: Vec<(TopicId, Arc<BTreeSet<TopicId>>)> = Vec::new();
        for topic in topics {
            if seen.insert(topic.clone()) {
                let prereqs = self.closure.all_prerequisites(topic.as_str())?;
                remaining.push((topic.clone(), prereqs));
            }
        }

        let mut pending: HashSet<TopicId> = seen;
        let mut ordered = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let pick = remaining
                .iter()
                .position(|(_, prereqs)| prereqs.iter().all(|p| !pending.contains(p)));

            match pick {
                Some(i) => {
                    let (topic, _) = remaining.remove(i);
                    pending.remove(&topic);
                    ordered.push(topic);
                }
                None => {
                    let remaining: Vec<String> =
                        remaining.into_iter().map(|(t, _)| t.to_string()).collect();
                    tracing::error!(?remaining, "planner could not order topic set");
                    return Err(GraphError::Unorderable { remaining });
                }
            }
        }

        tracing::debug!(topics = ordered.len(), "planned topic order");
        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PrerequisiteEdge;
    use crate::graph::index::PrerequisiteGraph;

    fn ids(names: &[&str]) -> Vec<TopicId> {
        names.iter().map(|n| TopicId::from(*n)).collect()
    }

    fn engine(topics: &[&str], edges: &[(&str, &str)]) -> ClosureEngine {
        let edges: Vec<PrerequisiteEdge> = edges
            .iter()
            .map(|(a, b)| PrerequisiteEdge::new(*a, *b))
            .collect();
        let graph = PrerequisiteGraph::build(&ids(topics), &edges).unwrap();
        ClosureEngine::new(Arc::new(graph))
    }

    fn assert_respects_prerequisites(ce: &ClosureEngine, order: &[TopicId]) {
        for (i, topic) in order.iter().enumerate() {
            let prereqs = ce.all_prerequisites(topic.as_str()).unwrap();
            for later in &order[i + 1..] {
                assert!(
                    !prereqs.contains(later),
                    "{later} is a prerequisite of {topic} but comes after it"
                );
            }
        }
    }

    #[test]
    fn linear_chain_has_single_order() {
        let ce = engine(
            &["variables", "data_types", "operators"],
            &[("variables", "data_types"), ("data_types", "operators")],
        );
        let planner = PathPlanner::new(&ce);
        let order = planner
            .order(&ids(&["operators", "variables", "data_types"]))
            .unwrap();
        assert_eq!(order, ids(&["variables", "data_types", "operators"]));
    }

    #[test]
    fn independent_topics_keep_input_order() {
        let ce = engine(&["a", "b", "c"], &[]);
        let planner = PathPlanner::new(&ce);
        assert_eq!(planner.order(&ids(&["c", "a", "b"])).unwrap(), ids(&["c", "a", "b"]));
    }

    #[test]
    fn transitive_prerequisites_outside_set_still_order() {
        // a -> b -> c, only {c, a} requested: a must precede c via b.
        let ce = engine(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        let planner = PathPlanner::new(&ce);
        assert_eq!(planner.order(&ids(&["c", "a"])).unwrap(), ids(&["a", "c"]));
    }

    #[test]
    fn order_is_deterministic() {
        let ce = engine(
            &["a", "b", "c", "d", "e"],
            &[("a", "c"), ("b", "c"), ("c", "e"), ("d", "e")],
        );
        let planner = PathPlanner::new(&ce);
        let input = ids(&["e", "d", "c", "b", "a"]);
        let first = planner.order(&input).unwrap();
        let second = planner.order(&input).unwrap();
        assert_eq!(first, second);
        assert_respects_prerequisites(&ce, &first);
    }

    #[test]
    fn duplicates_collapse() {
        let ce = engine(&["a", "b"], &[("a", "b")]);
        let planner = PathPlanner::new(&ce);
        assert_eq!(planner.order(&ids(&["b", "a", "b"])).unwrap(), ids(&["a", "b"]));
    }

    #[test]
    fn empty_input_yields_empty_order() {
        let ce = engine(&["a"], &[]);
        assert!(PathPlanner::new(&ce).order(&[]).unwrap().is_empty());
    }

    #[test]
    fn unknown_topic_is_not_found() {
        let ce = engine(&["a"], &[]);
        assert!(matches!(
            PathPlanner::new(&ce).order(&ids(&["a", "ghost"])),
            Err(GraphError::TopicNotFound { .. })
        ));
    }

    #[test]
    fn cyclic_subset_fails_instead_of_looping() {
        let ce = engine(&["a", "b"], &[("a", "b"), ("b", "a")]);
        assert!(PathPlanner::new(&ce).order(&ids(&["a", "b"])).is_err());
    }
}
