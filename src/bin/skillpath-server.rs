//! skillpath HTTP server.
//!
//! JSON API over one engine:
//!
//! - `GET  /health`: server status
//! - `GET  /api/career-paths`: list career paths
//! - `POST /api/generate-path`: plan a path and start the user's session
//! - `GET  /api/progress?userId=`: progress report
//! - `POST /api/update-progress`: mark a topic complete
//! - `GET  /api/next-topic?userId=`: next topic recommendation
//! - `POST /api/skill-tree`: status of every topic of a career path
//! - `POST /api/resources`: learning resources for a topic
//! - `GET  /api/get-projects?level=`: project ideas for a level
//!
//! Build and run: `cargo run --features server --bin skillpath-server`

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use skillpath::catalog::{CatalogSource, Project, Resource};
use skillpath::engine::{
    CareerPathSummary, Completion, Engine, EngineConfig, LearningPath, NextTopic, ProgressReport,
    TopicSnapshot,
};
use skillpath::error::SkillpathError;
use skillpath::paths::SkillpathPaths;
use skillpath::topic::Difficulty;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

/// Map an engine error onto an HTTP status.
fn api_error(e: SkillpathError) -> (StatusCode, String) {
    let status =
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(error = %e, "request failed");
    }
    (status, e.to_string())
}

// ── Request / response types ──────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    catalog: String,
    topics: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratePathRequest {
    user_id: String,
    career_path: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserQuery {
    user_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateProgressRequest {
    user_id: String,
    topic: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkillTreeRequest {
    user_id: String,
    career_path: String,
}

#[derive(Deserialize)]
struct ResourcesRequest {
    topic: String,
}

#[derive(Serialize)]
struct ResourcesResponse {
    topic: String,
    resources: Vec<Resource>,
}

#[derive(Deserialize)]
struct ProjectsQuery {
    #[serde(default = "default_level")]
    level: Difficulty,
}

fn default_level() -> Difficulty {
    Difficulty::Beginner
}

#[derive(Serialize)]
struct ProjectsResponse {
    level: Difficulty,
    projects: Vec<Project>,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn health(State(engine): State<Arc<Engine>>) -> Json<HealthResponse> {
    let info = engine.info();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog: info.catalog_id,
        topics: info.topic_count,
    })
}

async fn career_paths(State(engine): State<Arc<Engine>>) -> Json<Vec<CareerPathSummary>> {
    Json(engine.career_paths())
}

async fn generate_path(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<GeneratePathRequest>,
) -> ApiResult<LearningPath> {
    engine
        .start_session(req.user_id.as_str(), &req.career_path)
        .map(Json)
        .map_err(api_error)
}

async fn progress(
    State(engine): State<Arc<Engine>>,
    Query(q): Query<UserQuery>,
) -> ApiResult<ProgressReport> {
    engine.progress(q.user_id.as_str()).map(Json).map_err(api_error)
}

async fn update_progress(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<UpdateProgressRequest>,
) -> ApiResult<Completion> {
    engine
        .mark_complete(req.user_id.as_str(), &req.topic)
        .map(Json)
        .map_err(api_error)
}

async fn next_topic(
    State(engine): State<Arc<Engine>>,
    Query(q): Query<UserQuery>,
) -> ApiResult<NextTopic> {
    engine.next_topic(q.user_id.as_str()).map(Json).map_err(api_error)
}

async fn skill_tree(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<SkillTreeRequest>,
) -> ApiResult<Vec<TopicSnapshot>> {
    engine
        .classify_all(req.user_id.as_str(), &req.career_path)
        .map(Json)
        .map_err(api_error)
}

async fn resources(
    State(engine): State<Arc<Engine>>,
    Json(req): Json<ResourcesRequest>,
) -> ApiResult<ResourcesResponse> {
    let resources = engine.resources(&req.topic).map_err(api_error)?;
    Ok(Json(ResourcesResponse {
        topic: req.topic,
        resources,
    }))
}

async fn projects(
    State(engine): State<Arc<Engine>>,
    Query(q): Query<ProjectsQuery>,
) -> Json<ProjectsResponse> {
    Json(ProjectsResponse {
        level: q.level,
        projects: engine.projects(q.level),
    })
}

// ── Main ──────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=warn")),
        )
        .init();

    let bind = std::env::var("SKILLPATH_SERVER_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("SKILLPATH_SERVER_PORT").unwrap_or_else(|_| "8300".to_string());
    let addr = format!("{bind}:{port}");

    let paths = SkillpathPaths::resolve();
    let data_dir = match std::env::var("SKILLPATH_DATA_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => match &paths {
            Ok(paths) => paths.sessions_dir(),
            Err(e) => {
                tracing::error!("failed to resolve XDG paths: {e}");
                std::process::exit(1);
            }
        },
    };
    let catalog = match std::env::var("SKILLPATH_CATALOG") {
        Ok(file) => CatalogSource::External(PathBuf::from(file)),
        Err(_) => paths
            .ok()
            .and_then(|p| p.user_catalog())
            .map(CatalogSource::External)
            .unwrap_or_default(),
    };

    let config = EngineConfig {
        data_dir: Some(data_dir),
        catalog,
        ..Default::default()
    };
    let engine = Engine::new(config).unwrap_or_else(|e| {
        tracing::error!("failed to initialize engine: {e}");
        std::process::exit(1);
    });
    let engine = Arc::new(engine);

    tracing::info!("skillpath server initialized");

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/career-paths", get(career_paths))
        .route("/api/generate-path", post(generate_path))
        .route("/api/progress", get(progress))
        .route("/api/update-progress", post(update_progress))
        .route("/api/next-topic", get(next_topic))
        .route("/api/skill-tree", post(skill_tree))
        .route("/api/resources", post(resources))
        .route("/api/get-projects", get(projects))
        .layer(CorsLayer::permissive())
        .with_state(engine);

    tracing::info!("skillpath server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}
