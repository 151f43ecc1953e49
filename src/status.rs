//! Topic status classification and next-topic recommendation.
//!
//! Combines the closure engine with a session's completed set:
//!
//! - `completed`: the topic is in the completed set
//! - `available`: every transitive prerequisite is completed
//! - `locked`: anything else

use serde::{Deserialize, Serialize};

use crate::error::{ProgressError, SkillpathResult};
use crate::graph::closure::ClosureEngine;
use crate::graph::index::GraphResult;
use crate::progress::SessionState;
use crate::topic::TopicId;

/// Derived status of a topic for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    Completed,
    Available,
    Locked,
}

impl std::fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Completed => "completed",
            Self::Available => "available",
            Self::Locked => "locked",
        })
    }
}

/// Classifies topics against a session's progress.
#[derive(Debug, Clone, Copy)]
pub struct StatusClassifier<'a> {
    closure: &'a ClosureEngine,
}

impl<'a> StatusClassifier<'a> {
    pub fn new(closure: &'a ClosureEngine) -> Self {
        Self { closure }
    }

    pub fn classify(&self, session: &SessionState, topic: &str) -> GraphResult<TopicStatus> {
        if session.is_completed(topic) {
            return Ok(TopicStatus::Completed);
        }
        let prereqs = self.closure.all_prerequisites(topic)?;
        if prereqs.iter().all(|p| session.completed.contains(p)) {
            Ok(TopicStatus::Available)
        } else {
            Ok(TopicStatus::Locked)
        }
    }

    /// Transitive prerequisites of `topic` not yet completed, sorted.
    pub fn missing_prerequisites(
        &self,
        session: &SessionState,
        topic: &str,
    ) -> GraphResult<Vec<TopicId>> {
        let prereqs = self.closure.all_prerequisites(topic)?;
        Ok(prereqs
            .iter()
            .filter(|p| !session.completed.contains(*p))
            .cloned()
            .collect())
    }

    /// First assigned topic, in sequence order, that is not completed and is
    /// available. `None` when no such topic exists.
    pub fn next_topic(&self, session: &SessionState) -> GraphResult<Option<TopicId>> {
        for topic in &session.assigned {
            if self.classify(session, topic.as_str())? == TopicStatus::Available {
                return Ok(Some(topic.clone()));
            }
        }
        Ok(None)
    }

    /// Percentage of the assigned sequence that is completed.
    ///
    /// An empty sequence is an error rather than 0 or NaN.
    pub fn percent_complete(&self, session: &SessionState) -> SkillpathResult<f64> {
        if session.assigned.is_empty() {
            return Err(ProgressError::EmptySequence.into());
        }
        let done = session.completed_assigned() as f64;
        Ok(100.0 * done / session.assigned.len() as f64)
    }
}
