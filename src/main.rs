//! skillpath CLI: learning paths over a prerequisite graph.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use skillpath::catalog::CatalogSource;
use skillpath::engine::{Engine, EngineConfig, NextTopic};
use skillpath::paths::SkillpathPaths;
use skillpath::progress::DEFAULT_LEVEL_THRESHOLD;
use skillpath::topic::{Difficulty, TopicId};

#[derive(Parser)]
#[command(name = "skillpath", version, about = "Learning-path planner and progress tracker")]
struct Cli {
    /// Data directory for session storage (defaults to the XDG data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Catalog TOML file to use instead of the bundled one (defaults to
    /// `$XDG_CONFIG_HOME/skillpath/catalog.toml` when that file exists).
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Reward points per level.
    #[arg(long, global = true, default_value_t = DEFAULT_LEVEL_THRESHOLD)]
    level_threshold: u64,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available career paths.
    Paths,

    /// Show the learnable order of a career path.
    Plan {
        /// Career path id (see `skillpath paths`).
        career_path: String,
    },

    /// Start (or restart) a user's session on a career path.
    Start {
        user: String,
        career_path: String,
    },

    /// Show every topic of a career path with the user's status.
    Tree {
        user: String,
        /// Career path id; defaults to the user's current path.
        career_path: Option<String>,
    },

    /// Mark a topic complete.
    Complete { user: String, topic: String },

    /// Recommend the next topic.
    Next { user: String },

    /// Show a user's progress.
    Progress { user: String },

    /// Show learning resources for a topic.
    Resources { topic: String },

    /// Show project ideas for a difficulty level.
    Projects {
        /// beginner, intermediate or advanced.
        level: Difficulty,
    },

    /// Show engine info and statistics.
    Info,
}

impl Commands {
    fn uses_sessions(&self) -> bool {
        matches!(
            self,
            Commands::Start { .. }
                | Commands::Tree { .. }
                | Commands::Complete { .. }
                | Commands::Next { .. }
                | Commands::Progress { .. }
        )
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // XDG paths are optional unless a session command needs a default data dir.
    let paths = SkillpathPaths::resolve();
    let data_dir = match (&cli.data_dir, cli.command.uses_sessions()) {
        (Some(dir), _) => Some(dir.clone()),
        (None, true) => {
            let paths = paths.as_ref().map_err(|e| miette::miette!("{e}"))?;
            paths.ensure_dirs()?;
            Some(paths.sessions_dir())
        }
        (None, false) => None,
    };
    let catalog = match (&cli.catalog, paths.ok().and_then(|p| p.user_catalog())) {
        (Some(file), _) => CatalogSource::External(file.clone()),
        (None, Some(user)) => CatalogSource::External(user),
        (None, None) => CatalogSource::Bundled,
    };
    let config = EngineConfig {
        data_dir,
        catalog,
        level_threshold: cli.level_threshold,
    };
    let engine = Engine::new(config)?;
    let json = cli.json;

    match cli.command {
        Commands::Paths => {
            let paths = engine.career_paths();
            if json {
                print_json(&paths)?;
            } else {
                println!("Career paths ({}):", paths.len());
                for p in &paths {
                    println!(
                        "  {:<22} {} ({} topics, ~{}h)",
                        p.id, p.name, p.total_topics, p.estimated_hours
                    );
                }
            }
        }

        Commands::Plan { career_path } => {
            let path = engine.generate_path(&career_path)?;
            if json {
                print_json(&path)?;
            } else {
                println!("{} ({}):", path.name, path.career_path);
                for (i, t) in path.topics.iter().enumerate() {
                    println!(
                        "  {:>2}. {:<28} {:<12} {:>3}h {:>4} pts",
                        i + 1,
                        t.id,
                        t.difficulty,
                        t.hours,
                        t.reward
                    );
                }
                println!(
                    "  total: {}h, {} pts (estimate {}h)",
                    path.total_hours, path.total_reward, path.estimated_hours
                );
            }
        }

        Commands::Start { user, career_path } => {
            let path = engine.start_session(user.as_str(), &career_path)?;
            if json {
                print_json(&path)?;
            } else {
                println!(
                    "Started \"{}\" on {} ({} topics).",
                    user,
                    path.name,
                    path.topics.len()
                );
                if let Some(first) = path.topics.first() {
                    println!("  first topic: {}", first.id);
                }
            }
        }

        Commands::Tree { user, career_path } => {
            let career_path = match career_path {
                Some(p) => p,
                None => engine.session(user.as_str())?.career_path,
            };
            let tree = engine.classify_all(user.as_str(), &career_path)?;
            if json {
                print_json(&tree)?;
            } else {
                println!("Skill tree for \"{user}\" ({career_path}):");
                for node in &tree {
                    println!(
                        "  [{:<9}] {:<28} needs: {:<36} unlocks: {}",
                        node.status,
                        node.topic.id,
                        join_or_dash(&node.prerequisites),
                        join_or_dash(&node.unlocks)
                    );
                }
            }
        }

        Commands::Complete { user, topic } => {
            let done = engine.mark_complete(user.as_str(), &topic)?;
            if json {
                print_json(&done)?;
            } else if done.newly_completed {
                println!(
                    "Completed \"{}\": +{} pts (total {}, level {}, {} completions)",
                    done.topic, done.reward_gained, done.reward_total, done.level, done.activity_count
                );
            } else {
                println!("\"{}\" was already completed.", done.topic);
            }
        }

        Commands::Next { user } => {
            let next = engine.next_topic(user.as_str())?;
            if json {
                print_json(&next)?;
            } else {
                match next {
                    NextTopic::Topic(t) => println!(
                        "Next: {} ({}, {}, {}h, {} pts)",
                        t.id, t.domain, t.difficulty, t.hours, t.reward
                    ),
                    NextTopic::PathComplete => println!("Path complete."),
                    NextTopic::Blocked { missing } => {
                        let missing: Vec<&str> = missing.iter().map(|m| m.as_str()).collect();
                        println!(
                            "Blocked: complete these topics outside the path first: {}",
                            missing.join(", ")
                        );
                    }
                }
            }
        }

        Commands::Progress { user } => {
            let report = engine.progress(user.as_str())?;
            if json {
                print_json(&report)?;
            } else {
                println!("Progress for \"{user}\" ({}):", report.career_path);
                println!(
                    "  completed:  {}/{} ({:.1}%)",
                    report.completed_topics, report.total_topics, report.percent
                );
                println!("  reward:     {} pts", report.reward_total);
                println!("  level:      {}", report.level);
                println!("  activity:   {}", report.activity_count);
            }
        }

        Commands::Resources { topic } => {
            let resources = engine.resources(&topic)?;
            if json {
                print_json(&resources)?;
            } else if resources.is_empty() {
                println!("No resources for \"{topic}\".");
            } else {
                println!("Resources for \"{topic}\":");
                for r in &resources {
                    println!("  [{}] {}", r.kind, r.content);
                    println!("      e.g. {}", r.example);
                }
            }
        }

        Commands::Projects { level } => {
            let projects = engine.projects(level);
            if json {
                print_json(&projects)?;
            } else {
                println!("{level} projects ({}):", projects.len());
                for p in &projects {
                    println!("  {} - {}", p.title, p.description);
                    println!("      requires: {}", p.requires.join(", "));
                    println!("      features: {}", p.features);
                }
            }
        }

        Commands::Info => {
            if json {
                print_json(&engine.info())?;
            } else {
                println!("{}", engine.info());
            }
        }
    }

    Ok(())
}

fn join_or_dash(ids: &[TopicId]) -> String {
    if ids.is_empty() {
        "-".to_string()
    } else {
        ids.iter().map(TopicId::as_str).collect::<Vec<_>>().join(", ")
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
    Ok(())
}
