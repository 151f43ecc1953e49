//! Learning catalog: the static graph store.
//!
//! A catalog is a TOML document holding topics, prerequisite edges, career
//! paths, learning resources, and project ideas. One catalog is bundled into
//! the binary; an external file can replace it. Loading validates every
//! cross-reference and builds the prerequisite graph, so a catalog that
//! loads is structurally sound apart from cycles (which the closure engine
//! reports).

pub mod model;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::graph::PrerequisiteEdge;
use crate::graph::index::PrerequisiteGraph;
use crate::topic::{Difficulty, TopicId, TopicMeta};

pub use model::{CareerPath, CatalogInfo, Project, Resource, ResourceKind};

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Where a catalog came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CatalogSource {
    /// Bundled into the binary via `include_str!`.
    #[default]
    Bundled,
    /// Loaded from an external TOML file.
    External(PathBuf),
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bundled => write!(f, "bundled"),
            Self::External(path) => write!(f, "{}", path.display()),
        }
    }
}

// ── TOML deserialization helpers ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CatalogToml {
    catalog: CatalogInfo,
    #[serde(default)]
    prerequisites: Vec<PrerequisiteEdge>,
    #[serde(default)]
    topics: Vec<TopicMeta>,
    #[serde(default)]
    career_paths: Vec<CareerPath>,
    #[serde(default)]
    resources: Vec<Resource>,
    #[serde(default)]
    projects: Vec<Project>,
}

const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.toml");

// ── Catalog ─────────────────────────────────────────────────────────────

/// Immutable, validated learning catalog.
pub struct Catalog {
    info: CatalogInfo,
    source: CatalogSource,
    topics: Vec<TopicMeta>,
    topic_index: HashMap<TopicId, usize>,
    graph: Arc<PrerequisiteGraph>,
    career_paths: Vec<CareerPath>,
    path_index: HashMap<String, usize>,
    resources: HashMap<TopicId, Vec<Resource>>,
    projects: Vec<Project>,
}

impl Catalog {
    /// Load the catalog bundled into the binary.
    pub fn bundled() -> CatalogResult<Self> {
        Self::from_toml_str(BUNDLED_CATALOG, CatalogSource::Bundled)
    }

    /// Load a catalog from a TOML file.
    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, CatalogSource::External(path.to_path_buf()))
    }

    /// Load from the given source.
    pub fn load(source: &CatalogSource) -> CatalogResult<Self> {
        match source {
            CatalogSource::Bundled => Self::bundled(),
            CatalogSource::External(path) => Self::from_file(path),
        }
    }

    /// Parse and validate a catalog from TOML text.
    pub fn from_toml_str(toml_str: &str, source: CatalogSource) -> CatalogResult<Self> {
        let parsed: CatalogToml = toml::from_str(toml_str).map_err(|e| CatalogError::Parse {
            source_name: source.to_string(),
            message: e.to_string(),
        })?;

        let graph = PrerequisiteGraph::build(
            parsed.topics.iter().map(|t| &t.id),
            &parsed.prerequisites,
        )?;
        let topic_index: HashMap<TopicId, usize> = parsed
            .topics
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.clone(), i))
            .collect();

        let mut path_index = HashMap::new();
        for (i, path) in parsed.career_paths.iter().enumerate() {
            if path_index.insert(path.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateCareerPath {
                    career_path: path.id.clone(),
                });
            }
            if path.topics.is_empty() {
                return Err(CatalogError::EmptyCareerPath {
                    career_path: path.id.clone(),
                });
            }
            if let Some(missing) = path.topics.iter().find(|t| !topic_index.contains_key(*t)) {
                return Err(CatalogError::UndefinedTopic {
                    referenced_by: format!("career path \"{}\"", path.id),
                    topic: missing.to_string(),
                });
            }
        }

        let mut resources: HashMap<TopicId, Vec<Resource>> = HashMap::new();
        for resource in parsed.resources {
            if !topic_index.contains_key(&resource.topic) {
                return Err(CatalogError::UndefinedTopic {
                    referenced_by: format!("{} resource", resource.kind),
                    topic: resource.topic.to_string(),
                });
            }
            resources
                .entry(resource.topic.clone())
                .or_default()
                .push(resource);
        }

        for project in &parsed.projects {
            let unknown = project
                .requires
                .iter()
                .find(|r| !topic_index.contains_key(r.as_str()) && !path_index.contains_key(*r));
            if let Some(unknown) = unknown {
                return Err(CatalogError::UndefinedTopic {
                    referenced_by: format!("project \"{}\"", project.title),
                    topic: unknown.clone(),
                });
            }
        }

        tracing::info!(
            catalog = %parsed.catalog.id,
            source = %source,
            topics = graph.topic_count(),
            prerequisites = graph.edge_count(),
            career_paths = parsed.career_paths.len(),
            "catalog loaded"
        );

        Ok(Self {
            info: parsed.catalog,
            source,
            topics: parsed.topics,
            topic_index,
            graph: Arc::new(graph),
            career_paths: parsed.career_paths,
            path_index,
            resources,
            projects: parsed.projects,
        })
    }

    /// Catalog identification.
    pub fn info(&self) -> &CatalogInfo {
        &self.info
    }

    /// Where this catalog was loaded from.
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Metadata of a topic.
    pub fn topic(&self, id: &str) -> CatalogResult<&TopicMeta> {
        self.topic_index
            .get(id)
            .map(|&i| &self.topics[i])
            .ok_or_else(|| CatalogError::TopicNotFound {
                topic: id.to_string(),
            })
    }

    /// All topics in catalog order.
    pub fn topics(&self) -> &[TopicMeta] {
        &self.topics
    }

    /// The prerequisite graph.
    pub fn graph(&self) -> &Arc<PrerequisiteGraph> {
        &self.graph
    }

    /// Direct prerequisites of a topic.
    pub fn direct_prerequisites(&self, id: &str) -> CatalogResult<Vec<TopicId>> {
        self.topic(id)?;
        Ok(self
            .graph
            .direct_prerequisites(id)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default())
    }

    /// Topics that list `id` as a direct prerequisite.
    pub fn dependents(&self, id: &str) -> CatalogResult<Vec<TopicId>> {
        self.topic(id)?;
        Ok(self
            .graph
            .dependents(id)
            .map(|set| set.into_iter().collect())
            .unwrap_or_default())
    }

    /// Career path definition by id.
    pub fn career_path(&self, id: &str) -> CatalogResult<&CareerPath> {
        self.path_index
            .get(id)
            .map(|&i| &self.career_paths[i])
            .ok_or_else(|| CatalogError::CareerPathNotFound {
                career_path: id.to_string(),
            })
    }

    /// All career paths in catalog order.
    pub fn career_paths(&self) -> &[CareerPath] {
        &self.career_paths
    }

    /// Learning resources for a topic. Empty when the topic has none.
    pub fn resources(&self, topic: &str) -> CatalogResult<&[Resource]> {
        self.topic(topic)?;
        Ok(self.resources.get(topic).map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Project ideas for a difficulty level.
    pub fn projects(&self, level: Difficulty) -> Vec<&Project> {
        self.projects.iter().filter(|p| p.level == level).collect()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("id", &self.info.id)
            .field("source", &self.source)
            .field("topics", &self.topics.len())
            .field("career_paths", &self.career_paths.len())
            .finish()
    }
}
