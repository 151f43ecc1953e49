//! Catalog data model: career paths, learning resources, and project ideas.

use serde::{Deserialize, Serialize};

use crate::topic::{Difficulty, TopicId};

/// Identification of a loaded catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub id: String,
    pub name: String,
    pub version: String,
}

/// A named target set of topics with an effort estimate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerPath {
    /// Stable identifier (e.g. `"frontend_developer"`).
    pub id: String,
    /// Display name (e.g. `"Frontend Developer"`).
    pub name: String,
    /// Nominal total effort in hours.
    pub estimated_hours: u32,
    /// Required topics. Listing order only serves as the planner's tie-break.
    pub topics: Vec<TopicId>,
}

/// Kind of a learning resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Tutorial,
    Exercise,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tutorial => write!(f, "tutorial"),
            Self::Exercise => write!(f, "exercise"),
        }
    }
}

/// A short tutorial or exercise attached to a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub topic: TopicId,
    pub kind: ResourceKind,
    pub content: String,
    pub example: String,
}

/// A practice project suggested for a difficulty level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub level: Difficulty,
    pub title: String,
    /// Topic ids or career path ids the project builds on.
    pub requires: Vec<String>,
    pub description: String,
    /// Stretch features to add once the basics work.
    pub features: String,
}
