//! Rich diagnostic error types for the skillpath engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so callers can tell a broken catalog
//! apart from a bad request.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the skillpath engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum SkillpathError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Progress(#[from] ProgressError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

impl SkillpathError {
    /// Whether this error means a requested career path, topic, or session
    /// does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Catalog(CatalogError::TopicNotFound { .. })
                | Self::Catalog(CatalogError::CareerPathNotFound { .. })
                | Self::Graph(GraphError::TopicNotFound { .. })
                | Self::Progress(ProgressError::SessionNotFound { .. })
        )
    }

    /// Whether this error is a rejected state transition (e.g. completing a
    /// locked topic).
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Progress(ProgressError::TopicLocked { .. }))
    }

    /// HTTP status for request-facing surfaces: 404 for lookups, 409 for
    /// rejected transitions, 500 for everything else.
    pub fn http_status(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_precondition() {
            409
        } else {
            500
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("failed to parse catalog \"{source_name}\": {message}")]
    #[diagnostic(
        code(skillpath::catalog::parse),
        help("Check the catalog TOML syntax against the bundled data/catalog.toml.")
    )]
    Parse { source_name: String, message: String },

    #[error("failed to read catalog file: {path}")]
    #[diagnostic(
        code(skillpath::catalog::io),
        help("Ensure the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate topic id: \"{topic}\"")]
    #[diagnostic(
        code(skillpath::catalog::duplicate_topic),
        help("Every [[topics]] entry must have a unique id.")
    )]
    DuplicateTopic { topic: String },

    #[error("duplicate career path id: \"{career_path}\"")]
    #[diagnostic(
        code(skillpath::catalog::duplicate_career_path),
        help("Every [[career_paths]] entry must have a unique id.")
    )]
    DuplicateCareerPath { career_path: String },

    #[error("{referenced_by} references undefined topic \"{topic}\"")]
    #[diagnostic(
        code(skillpath::catalog::undefined_topic),
        help(
            "Define the topic in a [[topics]] entry, or fix the spelling of the reference. \
             The engine refuses to start on a catalog with dangling references."
        )
    )]
    UndefinedTopic { referenced_by: String, topic: String },

    #[error("career path \"{career_path}\" has no topics")]
    #[diagnostic(
        code(skillpath::catalog::empty_career_path),
        help("A career path must list at least one topic.")
    )]
    EmptyCareerPath { career_path: String },

    #[error("prerequisite cycle through topic \"{topic}\"")]
    #[diagnostic(
        code(skillpath::catalog::cycle),
        help(
            "A topic can never be its own transitive prerequisite. \
             Remove one of the prerequisite edges on this cycle."
        )
    )]
    CyclicPrerequisites { topic: String },

    #[error("topic not found: \"{topic}\"")]
    #[diagnostic(
        code(skillpath::catalog::topic_not_found),
        help("List topics with `skillpath info` or check the catalog file.")
    )]
    TopicNotFound { topic: String },

    #[error("career path not found: \"{career_path}\"")]
    #[diagnostic(
        code(skillpath::catalog::career_path_not_found),
        help("List available career paths with `skillpath paths`.")
    )]
    CareerPathNotFound { career_path: String },
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("topic not in prerequisite graph: \"{topic}\"")]
    #[diagnostic(
        code(skillpath::graph::topic_not_found),
        help("The topic is not defined in the loaded catalog.")
    )]
    TopicNotFound { topic: String },

    #[error("prerequisite cycle detected at topic \"{topic}\"")]
    #[diagnostic(
        code(skillpath::graph::cycle),
        help("The prerequisite graph must be acyclic. Fix the catalog edges touching this topic.")
    )]
    CycleDetected { topic: String },

    #[error("cannot order {} remaining topic(s): {}", .remaining.len(), .remaining.join(", "))]
    #[diagnostic(
        code(skillpath::graph::unorderable),
        help(
            "The planner found no topic free of unmet in-set prerequisites. \
             This indicates a corrupt prerequisite graph; file a bug report."
        )
    )]
    Unorderable { remaining: Vec<String> },
}

// ---------------------------------------------------------------------------
// Progress errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ProgressError {
    #[error("session not found: \"{session}\"")]
    #[diagnostic(
        code(skillpath::progress::session_not_found),
        help("Start a session first with `skillpath start --user <id> --path <career-path>`.")
    )]
    SessionNotFound { session: String },

    #[error("topic \"{topic}\" is locked: missing prerequisites {}", .missing.join(", "))]
    #[diagnostic(
        code(skillpath::progress::topic_locked),
        help("Complete the missing prerequisites first. `skillpath next` shows what is available.")
    )]
    TopicLocked { topic: String, missing: Vec<String> },

    #[error("session has an empty assigned sequence")]
    #[diagnostic(
        code(skillpath::progress::empty_sequence),
        help("A session must be created from a career path with at least one topic.")
    )]
    EmptySequence,
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("I/O error: {source}")]
    #[diagnostic(
        code(skillpath::store::io),
        help(
            "A filesystem operation failed. Check that the data directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("redb transaction error: {message}")]
    #[diagnostic(
        code(skillpath::store::redb),
        help(
            "The embedded database encountered a transaction error. \
             If the problem persists, try a fresh data directory."
        )
    )]
    Redb { message: String },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(skillpath::store::serde),
        help(
            "Failed to serialize or deserialize session state. \
             The stored format may have changed between versions."
        )
    )]
    Serialization { message: String },
}

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(skillpath::engine::invalid_config),
        help("Check the EngineConfig fields. {message}")
    )]
    InvalidConfig { message: String },
}

/// Convenience alias for functions returning skillpath results.
pub type SkillpathResult<T> = std::result::Result<T, SkillpathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_error_converts_to_top_level() {
        let err = CatalogError::CareerPathNotFound {
            career_path: "astronaut".into(),
        };
        let top: SkillpathError = err.into();
        assert!(matches!(
            top,
            SkillpathError::Catalog(CatalogError::CareerPathNotFound { .. })
        ));
        assert!(top.is_not_found());
        assert!(!top.is_precondition());
    }

    #[test]
    fn locked_topic_is_precondition() {
        let top: SkillpathError = ProgressError::TopicLocked {
            topic: "operators".into(),
            missing: vec!["data_types".into()],
        }
        .into();
        assert!(top.is_precondition());
        assert!(!top.is_not_found());
    }

    #[test]
    fn http_status_per_category() {
        let missing: SkillpathError = ProgressError::SessionNotFound {
            session: "ghost".into(),
        }
        .into();
        assert_eq!(missing.http_status(), 404);

        let locked: SkillpathError = ProgressError::TopicLocked {
            topic: "operators".into(),
            missing: vec!["data_types".into()],
        }
        .into();
        assert_eq!(locked.http_status(), 409);

        let broken: SkillpathError = GraphError::Unorderable {
            remaining: vec!["a".into(), "b".into()],
        }
        .into();
        assert_eq!(broken.http_status(), 500);
    }

    #[test]
    fn cycle_is_not_a_lookup_failure() {
        let top: SkillpathError = CatalogError::CyclicPrerequisites {
            topic: "loops".into(),
        }
        .into();
        assert!(!top.is_not_found());
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = ProgressError::TopicLocked {
            topic: "operators".into(),
            missing: vec!["variables".into(), "data_types".into()],
        };
        let msg = format!("{err}");
        assert!(msg.contains("operators"));
        assert!(msg.contains("variables, data_types"));

        let err = GraphError::Unorderable {
            remaining: vec!["a".into(), "b".into()],
        };
        assert!(format!("{err}").contains("2 remaining"));
    }
}
