//! Engine facade: top-level API for the skillpath system.
//!
//! The `Engine` owns the catalog, the closure engine, and a session
//! repository, and exposes the request-level operations: planning a path,
//! starting a session, classifying topics, marking topics complete, and
//! recommending the next topic.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogSource, Project, Resource};
use crate::error::{
    CatalogError, EngineError, GraphError, ProgressError, SkillpathError, SkillpathResult,
};
use crate::graph::closure::ClosureEngine;
use crate::graph::planner::PathPlanner;
use crate::progress::{DEFAULT_LEVEL_THRESHOLD, SessionState, level_for};
use crate::status::{StatusClassifier, TopicStatus};
use crate::store::{DurableSessionStore, MemSessionStore, SessionRepository};
use crate::topic::{Difficulty, SessionId, TopicId, TopicMeta};

/// Configuration for the skillpath engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Data directory for durable sessions. `None` keeps sessions in memory.
    pub data_dir: Option<PathBuf>,
    /// Catalog to load.
    pub catalog: CatalogSource,
    /// Reward points per level (must be > 0).
    pub level_threshold: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            catalog: CatalogSource::Bundled,
            level_threshold: DEFAULT_LEVEL_THRESHOLD,
        }
    }
}

// ── Response types ──────────────────────────────────────────────────────

/// A planned learning path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    pub career_path: String,
    pub name: String,
    /// Topics in learnable order.
    pub topics: Vec<TopicMeta>,
    /// Sum of the topics' hour estimates.
    pub total_hours: u32,
    /// Sum of the topics' rewards.
    pub total_reward: u64,
    /// The catalog's nominal estimate for the whole path.
    pub estimated_hours: u32,
}

/// Listing entry for a career path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerPathSummary {
    pub id: String,
    pub name: String,
    pub total_topics: usize,
    pub estimated_hours: u32,
}

/// Status and metadata of one topic for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSnapshot {
    #[serde(flatten)]
    pub topic: TopicMeta,
    pub status: TopicStatus,
    /// Direct prerequisites.
    pub prerequisites: Vec<TopicId>,
    /// Topics that list this one as a direct prerequisite.
    pub unlocks: Vec<TopicId>,
}

/// Result of a successful `mark_complete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub topic: TopicId,
    /// Points granted by this call; zero when the topic was already completed.
    pub reward_gained: u64,
    pub reward_total: u64,
    pub activity_count: u64,
    pub level: u64,
    pub newly_completed: bool,
}

/// Recommendation returned by `next_topic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NextTopic {
    /// The next topic to learn.
    Topic(TopicMeta),
    /// Every assigned topic is completed.
    PathComplete,
    /// Assigned topics remain, but each waits on prerequisites outside the
    /// career path.
    Blocked { missing: Vec<TopicId> },
}

/// Progress summary of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub career_path: String,
    pub total_topics: usize,
    pub completed_topics: usize,
    pub percent: f64,
    pub reward_total: u64,
    pub activity_count: u64,
    pub level: u64,
    /// Every completed topic, including ones outside the assigned path.
    pub completed: Vec<TopicId>,
}

// ── Engine ──────────────────────────────────────────────────────────────

/// The skillpath learning-path engine.
pub struct Engine {
    config: EngineConfig,
    catalog: Arc<Catalog>,
    closure: Arc<ClosureEngine>,
    sessions: Arc<dyn SessionRepository>,
    /// One mutex per session id; serializes load-modify-save per session.
    session_locks: DashMap<SessionId, Arc<Mutex<()>>>,
}

impl Engine {
    /// Create an engine, loading the configured catalog and opening the
    /// session store (durable when `data_dir` is set).
    pub fn new(config: EngineConfig) -> SkillpathResult<Self> {
        let catalog = Catalog::load(&config.catalog)?;

        let sessions: Arc<dyn SessionRepository> = match config.data_dir {
            Some(ref dir) => Arc::new(DurableSessionStore::open(dir)?),
            None => Arc::new(MemSessionStore::new()),
        };

        Self::from_parts(config, catalog, sessions)
    }

    /// Create an engine from an already loaded catalog and a caller-supplied
    /// session repository. `config.catalog` and `config.data_dir` are ignored.
    pub fn from_parts(
        config: EngineConfig,
        catalog: Catalog,
        sessions: Arc<dyn SessionRepository>,
    ) -> SkillpathResult<Self> {
        if config.level_threshold == 0 {
            return Err(EngineError::InvalidConfig {
                message: "level_threshold must be > 0".into(),
            }
            .into());
        }

        let closure = ClosureEngine::new(Arc::clone(catalog.graph()));
        closure.warm().map_err(|e| match e {
            GraphError::CycleDetected { topic } => {
                SkillpathError::from(CatalogError::CyclicPrerequisites { topic })
            }
            other => other.into(),
        })?;

        tracing::info!(
            catalog = %catalog.info().id,
            topics = catalog.topics().len(),
            career_paths = catalog.career_paths().len(),
            persistent = config.data_dir.is_some(),
            "initializing skillpath engine"
        );

        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            closure: Arc::new(closure),
            sessions,
            session_locks: DashMap::new(),
        })
    }

    /// Get the catalog handle.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the closure engine handle.
    pub fn closure(&self) -> &ClosureEngine {
        &self.closure
    }

    /// Get the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Transitive prerequisites of a topic, sorted.
    pub fn all_prerequisites(&self, topic: &str) -> SkillpathResult<Vec<TopicId>> {
        self.catalog.topic(topic)?;
        Ok(self
            .closure
            .all_prerequisites(topic)?
            .iter()
            .cloned()
            .collect())
    }

    /// All career paths in catalog order.
    pub fn career_paths(&self) -> Vec<CareerPathSummary> {
        self.catalog
            .career_paths()
            .iter()
            .map(|p| CareerPathSummary {
                id: p.id.clone(),
                name: p.name.clone(),
                total_topics: p.topics.len(),
                estimated_hours: p.estimated_hours,
            })
            .collect()
    }

    /// Plan the learnable order of a career path's topics.
    pub fn generate_path(&self, career_path: &str) -> SkillpathResult<LearningPath> {
        let path = self.catalog.career_path(career_path)?;
        let order = PathPlanner::new(&self.closure).order(&path.topics)?;

        let topics = order
            .iter()
            .map(|id| self.catalog.topic(id.as_str()).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LearningPath {
            career_path: path.id.clone(),
            name: path.name.clone(),
            total_hours: topics.iter().map(|t| t.hours).sum(),
            total_reward: topics.iter().map(|t| t.reward).sum(),
            estimated_hours: path.estimated_hours,
            topics,
        })
    }

    /// Plan a career path and save a fresh session for `session`, replacing
    /// any previous session under the same id.
    pub fn start_session(
        &self,
        session: impl Into<SessionId>,
        career_path: &str,
    ) -> SkillpathResult<LearningPath> {
        let id = session.into();
        let path = self.generate_path(career_path)?;
        let assigned = path.topics.iter().map(|t| t.id.clone()).collect();
        let state = SessionState::new(&path.career_path, assigned)?;

        self.with_session_lock(&id, || Ok(self.sessions.save(&id, &state)?))?;

        tracing::info!(
            session = %id,
            career_path = %path.career_path,
            topics = path.topics.len(),
            "session started"
        );
        Ok(path)
    }

    /// Current state of a session.
    pub fn session(&self, session: impl Into<SessionId>) -> SkillpathResult<SessionState> {
        self.load_session(&session.into())
    }

    /// Status of a single topic for a session.
    pub fn classify(
        &self,
        session: impl Into<SessionId>,
        topic: &str,
    ) -> SkillpathResult<TopicStatus> {
        let state = self.load_session(&session.into())?;
        self.catalog.topic(topic)?;
        Ok(self.classifier().classify(&state, topic)?)
    }

    /// Status snapshot of every topic of a career path, in planned order.
    pub fn classify_all(
        &self,
        session: impl Into<SessionId>,
        career_path: &str,
    ) -> SkillpathResult<Vec<TopicSnapshot>> {
        let state = self.load_session(&session.into())?;
        let path = self.catalog.career_path(career_path)?;
        let order = PathPlanner::new(&self.closure).order(&path.topics)?;
        let classifier = self.classifier();

        order
            .iter()
            .map(|id| -> SkillpathResult<TopicSnapshot> {
                Ok(TopicSnapshot {
                    topic: self.catalog.topic(id.as_str())?.clone(),
                    status: classifier.classify(&state, id.as_str())?,
                    prerequisites: self.catalog.direct_prerequisites(id.as_str())?,
                    unlocks: self.catalog.dependents(id.as_str())?,
                })
            })
            .collect()
    }

    /// Mark a topic complete for a session.
    ///
    /// The topic must be available (or already completed). Locked topics are
    /// rejected with [`ProgressError::TopicLocked`]. Repeat completions
    /// succeed without granting reward or advancing the activity counter.
    /// Topics outside the session's assigned path are accepted.
    pub fn mark_complete(
        &self,
        session: impl Into<SessionId>,
        topic: &str,
    ) -> SkillpathResult<Completion> {
        let id = session.into();
        // Unknown sessions are rejected before a lock entry exists for them.
        self.load_session(&id)?;
        self.with_session_lock(&id, || self.complete_locked(&id, topic))
    }

    fn complete_locked(&self, id: &SessionId, topic: &str) -> SkillpathResult<Completion> {
        let mut state = self.load_session(id)?;
        let meta = self.catalog.topic(topic)?;
        let classifier = self.classifier();

        if classifier.classify(&state, topic)? == TopicStatus::Locked {
            let missing: Vec<String> = classifier
                .missing_prerequisites(&state, topic)?
                .into_iter()
                .map(|t| t.to_string())
                .collect();
            tracing::warn!(session = %id, topic, ?missing, "rejected completion of locked topic");
            return Err(ProgressError::TopicLocked {
                topic: topic.to_string(),
                missing,
            }
            .into());
        }

        let delta = state.record_completion(&meta.id, meta.reward);
        if delta.newly_completed {
            self.sessions.save(id, &state)?;
            tracing::info!(
                session = %id,
                topic,
                reward = delta.reward_gained,
                reward_total = state.reward_total,
                "topic completed"
            );
        } else {
            tracing::debug!(session = %id, topic, "topic already completed");
        }

        Ok(Completion {
            topic: meta.id.clone(),
            reward_gained: delta.reward_gained,
            reward_total: state.reward_total,
            activity_count: state.activity_count,
            level: level_for(state.reward_total, self.config.level_threshold),
            newly_completed: delta.newly_completed,
        })
    }

    /// Recommend the next topic of a session's assigned path.
    pub fn next_topic(&self, session: impl Into<SessionId>) -> SkillpathResult<NextTopic> {
        let state = self.load_session(&session.into())?;
        let classifier = self.classifier();

        if let Some(next) = classifier.next_topic(&state)? {
            return Ok(NextTopic::Topic(self.catalog.topic(next.as_str())?.clone()));
        }
        if state.completed_assigned() == state.assigned.len() {
            return Ok(NextTopic::PathComplete);
        }

        let assigned: HashSet<&TopicId> = state.assigned.iter().collect();
        let mut missing = BTreeSet::new();
        for topic in state.assigned.iter().filter(|t| !state.is_completed(t.as_str())) {
            for prereq in classifier.missing_prerequisites(&state, topic.as_str())? {
                if !assigned.contains(&prereq) {
                    missing.insert(prereq);
                }
            }
        }
        Ok(NextTopic::Blocked {
            missing: missing.into_iter().collect(),
        })
    }

    /// Progress summary of a session.
    pub fn progress(&self, session: impl Into<SessionId>) -> SkillpathResult<ProgressReport> {
        let state = self.load_session(&session.into())?;
        let percent = self.classifier().percent_complete(&state)?;
        Ok(ProgressReport {
            career_path: state.career_path.clone(),
            total_topics: state.assigned.len(),
            completed_topics: state.completed_assigned(),
            percent,
            reward_total: state.reward_total,
            activity_count: state.activity_count,
            level: level_for(state.reward_total, self.config.level_threshold),
            completed: state.completed.iter().cloned().collect(),
        })
    }

    /// Learning resources for a topic.
    pub fn resources(&self, topic: &str) -> SkillpathResult<Vec<Resource>> {
        Ok(self.catalog.resources(topic)?.to_vec())
    }

    /// Project ideas for a difficulty level.
    pub fn projects(&self, level: Difficulty) -> Vec<Project> {
        self.catalog.projects(level).into_iter().cloned().collect()
    }

    /// Get engine info (catalog size, cache size, etc.)
    pub fn info(&self) -> EngineInfo {
        let info = self.catalog.info();
        EngineInfo {
            catalog_id: info.id.clone(),
            catalog_version: info.version.clone(),
            catalog_source: self.catalog.source().to_string(),
            topic_count: self.catalog.topics().len(),
            prerequisite_count: self.catalog.graph().edge_count(),
            career_path_count: self.catalog.career_paths().len(),
            cached_closures: self.closure.cached(),
            level_threshold: self.config.level_threshold,
            persistent: self.config.data_dir.is_some(),
        }
    }

    fn classifier(&self) -> StatusClassifier<'_> {
        StatusClassifier::new(&self.closure)
    }

    fn load_session(&self, id: &SessionId) -> SkillpathResult<SessionState> {
        self.sessions.load(id)?.ok_or_else(|| {
            ProgressError::SessionNotFound {
                session: id.to_string(),
            }
            .into()
        })
    }

    /// Run `f` while holding the mutex of session `id`.
    ///
    /// The lock entry is dropped again once no other caller holds it, so the
    /// map only ever contains sessions with a request in flight.
    fn with_session_lock<T>(
        &self,
        id: &SessionId,
        f: impl FnOnce() -> SkillpathResult<T>,
    ) -> SkillpathResult<T> {
        let lock = Arc::clone(self.session_locks.entry(id.clone()).or_default().value());
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        drop(lock);
        // Runs under the shard lock, so no new clone can appear mid-check.
        self.session_locks
            .remove_if(id, |_, lock| Arc::strong_count(lock) == 1);
        result
    }
}

/// Summary information about the engine state.
#[derive(Debug, Clone, Serialize)]
pub struct EngineInfo {
    pub catalog_id: String,
    pub catalog_version: String,
    pub catalog_source: String,
    pub topic_count: usize,
    pub prerequisite_count: usize,
    pub career_path_count: usize,
    pub cached_closures: usize,
    pub level_threshold: u64,
    pub persistent: bool,
}

impl std::fmt::Display for EngineInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "skillpath engine info")?;
        writeln!(
            f,
            "  catalog:        {} v{} ({})",
            self.catalog_id, self.catalog_version, self.catalog_source
        )?;
        writeln!(f, "  topics:         {}", self.topic_count)?;
        writeln!(f, "  prerequisites:  {}", self.prerequisite_count)?;
        writeln!(f, "  career paths:   {}", self.career_path_count)?;
        writeln!(f, "  closures:       {}", self.cached_closures)?;
        writeln!(f, "  level every:    {} points", self.level_threshold)?;
        writeln!(f, "  persistent:     {}", self.persistent)?;
        Ok(())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .field("closure", &self.closure)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn test_engine() -> Engine {
        Engine::new(EngineConfig::default()).unwrap()
    }

    const CHAIN: &str = r#"
prerequisites = [
    { before = "A", topic = "B" },
    { before = "B", topic = "C" },
    { before = "X", topic = "C" },
]

[catalog]
id = "chain"
name = "Chain"
version = "0"

[[topics]]
id = "A"
domain = "d"
difficulty = "beginner"
hours = 1
reward = 100

[[topics]]
id = "B"
domain = "d"
difficulty = "beginner"
hours = 2
reward = 200

[[topics]]
id = "C"
domain = "d"
difficulty = "advanced"
hours = 3
reward = 900

[[topics]]
id = "X"
domain = "d"
difficulty = "beginner"
hours = 1
reward = 50

[[career_paths]]
id = "abc"
name = "ABC"
estimated_hours = 6
topics = ["C", "A", "B"]

[[career_paths]]
id = "ac"
name = "AC"
estimated_hours = 4
topics = ["C", "A"]
"#;

    fn chain_engine() -> Engine {
        let catalog = Catalog::from_toml_str(CHAIN, CatalogSource::Bundled).unwrap();
        Engine::from_parts(
            EngineConfig::default(),
            catalog,
            Arc::new(MemSessionStore::new()),
        )
        .unwrap()
    }

    #[test]
    fn create_memory_only_engine() {
        let engine = test_engine();
        let info = engine.info();
        assert_eq!(info.topic_count, 56);
        assert_eq!(info.cached_closures, 56);
        assert!(!info.persistent);
    }

    #[test]
    fn data_dir_created_with_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let engine = Engine::new(EngineConfig {
            data_dir: Some(dir.path().join("nested/sessions")),
            ..Default::default()
        })
        .unwrap();
        assert!(engine.info().persistent);
        assert!(dir.path().join("nested/sessions").is_dir());
    }

    #[test]
    fn data_dir_under_a_file_keeps_io_cause() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("plain");
        std::fs::write(&file, "").unwrap();
        let err = Engine::new(EngineConfig {
            data_dir: Some(file.join("sessions")),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, SkillpathError::Store(StoreError::Io { .. })));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn zero_level_threshold_rejected() {
        let result = Engine::new(EngineConfig {
            level_threshold: 0,
            ..Default::default()
        });
        assert!(matches!(
            result,
            Err(SkillpathError::Engine(EngineError::InvalidConfig { .. }))
        ));
    }

    #[test]
    fn cyclic_catalog_refused() {
        let toml = CHAIN.replace(
            "{ before = \"X\", topic = \"C\" },",
            "{ before = \"X\", topic = \"C\" },\n    { before = \"C\", topic = \"A\" },",
        );
        let catalog = Catalog::from_toml_str(&toml, CatalogSource::Bundled).unwrap();
        let result = Engine::from_parts(
            EngineConfig::default(),
            catalog,
            Arc::new(MemSessionStore::new()),
        );
        assert!(matches!(
            result,
            Err(SkillpathError::Catalog(CatalogError::CyclicPrerequisites { .. }))
        ));
    }

    #[test]
    fn generate_path_orders_and_totals() {
        let engine = chain_engine();
        let path = engine.generate_path("abc").unwrap();
        let ids: Vec<&str> = path.topics.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(path.total_hours, 6);
        assert_eq!(path.total_reward, 1200);
    }

    #[test]
    fn unknown_career_path_is_not_found() {
        let engine = chain_engine();
        let err = engine.generate_path("astronaut").unwrap_err();
        assert!(err.is_not_found());
        assert!(engine.start_session("u", "astronaut").unwrap_err().is_not_found());
    }

    #[test]
    fn unknown_session_is_not_found() {
        let engine = chain_engine();
        assert!(engine.next_topic("nobody").unwrap_err().is_not_found());
        assert!(engine.mark_complete("nobody", "A").unwrap_err().is_not_found());
    }

    #[test]
    fn unknown_sessions_leave_no_lock_entries() {
        let engine = chain_engine();
        for i in 0..1000 {
            let err = engine.mark_complete(format!("ghost-{i}"), "A").unwrap_err();
            assert!(err.is_not_found());
        }
        assert_eq!(engine.session_locks.len(), 0);
    }

    #[test]
    fn lock_entries_released_after_each_call() {
        let engine = chain_engine();
        for i in 0..100 {
            let user = format!("u{i}");
            engine.start_session(user.as_str(), "abc").unwrap();
            engine.mark_complete(user.as_str(), "A").unwrap();
            assert!(engine.mark_complete(user.as_str(), "C").is_err());
        }
        assert_eq!(engine.session_locks.len(), 0);
    }

    #[test]
    fn completion_flow_with_levels() {
        let engine = chain_engine();
        engine.start_session("u", "abc").unwrap();

        let err = engine.mark_complete("u", "C").unwrap_err();
        assert!(err.is_precondition());

        let a = engine.mark_complete("u", "A").unwrap();
        assert_eq!(a.reward_gained, 100);
        assert_eq!(a.level, 1);

        let repeat = engine.mark_complete("u", "A").unwrap();
        assert_eq!(repeat.reward_gained, 0);
        assert_eq!(repeat.reward_total, 100);
        assert_eq!(repeat.activity_count, 1);
        assert!(!repeat.newly_completed);

        let b = engine.mark_complete("u", "B").unwrap();
        assert_eq!(b.reward_total, 300);
        assert_eq!(b.activity_count, 2);

        // C also needs X, which is outside the path.
        assert!(matches!(
            engine.next_topic("u").unwrap(),
            NextTopic::Blocked { ref missing } if missing == &vec![TopicId::from("X")]
        ));
        engine.mark_complete("u", "X").unwrap();

        let c = engine.mark_complete("u", "C").unwrap();
        assert_eq!(c.reward_total, 1250);
        assert_eq!(c.level, 2);
        assert_eq!(engine.next_topic("u").unwrap(), NextTopic::PathComplete);

        let report = engine.progress("u").unwrap();
        assert_eq!(report.percent, 100.0);
        assert_eq!(report.completed_topics, 3);
        assert_eq!(report.completed.len(), 4);
    }

    #[test]
    fn locked_error_lists_missing_prerequisites() {
        let engine = chain_engine();
        engine.start_session("u", "abc").unwrap();
        match engine.mark_complete("u", "C") {
            Err(SkillpathError::Progress(ProgressError::TopicLocked { missing, .. })) => {
                assert_eq!(missing, vec!["A", "B", "X"]);
            }
            other => panic!("expected TopicLocked, got {other:?}"),
        }
    }

    #[test]
    fn classify_all_snapshot() {
        let engine = chain_engine();
        engine.start_session("u", "abc").unwrap();
        engine.mark_complete("u", "A").unwrap();

        let snapshot = engine.classify_all("u", "abc").unwrap();
        let statuses: Vec<(&str, TopicStatus)> = snapshot
            .iter()
            .map(|s| (s.topic.id.as_str(), s.status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("A", TopicStatus::Completed),
                ("B", TopicStatus::Available),
                ("C", TopicStatus::Locked),
            ]
        );
        assert_eq!(
            snapshot[2].prerequisites,
            vec![TopicId::from("B"), TopicId::from("X")]
        );
        assert_eq!(snapshot[0].unlocks, vec![TopicId::from("B")]);
        assert_eq!(snapshot[1].unlocks, vec![TopicId::from("C")]);
        assert!(snapshot[2].unlocks.is_empty());
    }

    #[test]
    fn restarting_a_session_resets_progress() {
        let engine = chain_engine();
        engine.start_session("u", "abc").unwrap();
        engine.mark_complete("u", "A").unwrap();
        engine.start_session("u", "ac").unwrap();

        let state = engine.session("u").unwrap();
        assert_eq!(state.career_path, "ac");
        assert!(state.completed.is_empty());
        assert_eq!(state.reward_total, 0);
    }

    #[test]
    fn next_topic_serializes_with_state_tag() {
        let json = serde_json::to_value(NextTopic::PathComplete).unwrap();
        assert_eq!(json["state"], "path_complete");
    }

    #[test]
    fn concurrent_completions_credit_once() {
        let engine = Arc::new(chain_engine());
        engine.start_session("u", "abc").unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.mark_complete("u", "A").unwrap())
            })
            .collect();
        let gained: u64 = handles
            .into_iter()
            .map(|h| h.join().unwrap().reward_gained)
            .sum();

        assert_eq!(gained, 100);
        let state = engine.session("u").unwrap();
        assert_eq!(state.reward_total, 100);
        assert_eq!(state.activity_count, 1);
        assert_eq!(engine.session_locks.len(), 0);
    }
}
