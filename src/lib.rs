// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # skillpath
//!
//! A learning-path engine over a prerequisite knowledge graph.
//!
//! ## Architecture
//!
//! - **Catalog** (`catalog`): topics, prerequisite edges, career paths,
//!   resources and projects loaded from TOML
//! - **Prerequisite graph** (`graph`): petgraph index, memoized transitive
//!   closure, and the deterministic path planner
//! - **Progress** (`progress`): per-session completed set, reward and level
//! - **Status** (`status`): completed / available / locked classification
//! - **Storage** (`store`): in-memory (DashMap) or durable (redb) sessions
//!
//! ## Library usage
//!
//! ```no_run
//! use skillpath::engine::{Engine, EngineConfig, NextTopic};
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! let path = engine.start_session("alice", "frontend_developer").unwrap();
//! println!("{} topics", path.topics.len());
//!
//! if let NextTopic::Topic(topic) = engine.next_topic("alice").unwrap() {
//!     engine.mark_complete("alice", topic.id.as_str()).unwrap();
//! }
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod graph;
pub mod paths;
pub mod progress;
pub mod status;
pub mod store;
pub mod topic;
