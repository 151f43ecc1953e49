//! Per-session progress state.
//!
//! A session stores only facts: the assigned topic sequence, which topics are
//! completed, the reward total, and the activity counter. Topic status and
//! level are derived from these (see [`crate::status`] and [`level_for`]).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ProgressError;
use crate::topic::TopicId;

pub type ProgressResult<T> = std::result::Result<T, ProgressError>;

/// Reward points per level unless configured otherwise.
pub const DEFAULT_LEVEL_THRESHOLD: u64 = 1000;

/// Level reached with `reward_total` points: one level per `threshold`
/// points, starting at level 1.
///
/// `threshold` must be non-zero; the engine validates it at construction.
pub fn level_for(reward_total: u64, threshold: u64) -> u64 {
    reward_total / threshold.max(1) + 1
}

/// Mutable progress of one user over an assigned topic sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Career path the sequence was planned from.
    pub career_path: String,
    /// Planned topic order. Never empty.
    pub assigned: Vec<TopicId>,
    /// Completed topics (membership only).
    pub completed: BTreeSet<TopicId>,
    /// Accumulated reward points.
    pub reward_total: u64,
    /// Number of first-time completions.
    pub activity_count: u64,
}

/// Outcome of recording a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionDelta {
    /// Points added by this call (zero on a repeat).
    pub reward_gained: u64,
    /// Whether the topic was not completed before this call.
    pub newly_completed: bool,
}

impl SessionState {
    /// Create a fresh session over a planned sequence.
    pub fn new(career_path: impl Into<String>, assigned: Vec<TopicId>) -> ProgressResult<Self> {
        if assigned.is_empty() {
            return Err(ProgressError::EmptySequence);
        }
        Ok(Self {
            career_path: career_path.into(),
            assigned,
            completed: BTreeSet::new(),
            reward_total: 0,
            activity_count: 0,
        })
    }

    pub fn is_completed(&self, topic: &str) -> bool {
        self.completed.contains(topic)
    }

    /// Record `topic` as completed, crediting `reward` on first completion.
    ///
    /// Repeat completions leave the reward total and activity counter
    /// untouched. Availability is checked by the caller.
    pub fn record_completion(&mut self, topic: &TopicId, reward: u64) -> CompletionDelta {
        if !self.completed.insert(topic.clone()) {
            return CompletionDelta {
                reward_gained: 0,
                newly_completed: false,
            };
        }
        self.reward_total += reward;
        self.activity_count += 1;
        CompletionDelta {
            reward_gained: reward,
            newly_completed: true,
        }
    }

    /// Number of assigned topics that are completed.
    pub fn completed_assigned(&self) -> usize {
        self.assigned
            .iter()
            .filter(|t| self.completed.contains(*t))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionState {
        SessionState::new(
            "frontend_developer",
            vec!["variables".into(), "data_types".into()],
        )
        .unwrap()
    }

    #[test]
    fn empty_sequence_rejected() {
        assert!(matches!(
            SessionState::new("p", vec![]),
            Err(ProgressError::EmptySequence)
        ));
    }

    #[test]
    fn first_completion_credits_reward() {
        let mut s = session();
        let delta = s.record_completion(&"variables".into(), 50);
        assert_eq!(
            delta,
            CompletionDelta {
                reward_gained: 50,
                newly_completed: true
            }
        );
        assert_eq!(s.reward_total, 50);
        assert_eq!(s.activity_count, 1);
        assert!(s.is_completed("variables"));
    }

    #[test]
    fn repeat_completion_is_idempotent() {
        let mut s = session();
        s.record_completion(&"variables".into(), 50);
        let delta = s.record_completion(&"variables".into(), 50);
        assert_eq!(delta.reward_gained, 0);
        assert!(!delta.newly_completed);
        assert_eq!(s.reward_total, 50);
        assert_eq!(s.activity_count, 1);
    }

    #[test]
    fn completed_assigned_ignores_off_path_topics() {
        let mut s = session();
        s.record_completion(&"variables".into(), 50);
        s.record_completion(&"html_basics".into(), 200);
        assert_eq!(s.completed_assigned(), 1);
        assert_eq!(s.reward_total, 250);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(level_for(0, DEFAULT_LEVEL_THRESHOLD), 1);
        assert_eq!(level_for(999, DEFAULT_LEVEL_THRESHOLD), 1);
        assert_eq!(level_for(1000, DEFAULT_LEVEL_THRESHOLD), 2);
        assert_eq!(level_for(2550, DEFAULT_LEVEL_THRESHOLD), 3);
        assert_eq!(level_for(300, 100), 4);
    }

    #[test]
    fn session_state_round_trips_through_bincode() {
        let mut s = session();
        s.record_completion(&"variables".into(), 50);
        let bytes = bincode::serialize(&s).unwrap();
        let back: SessionState = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, s);
    }
}
