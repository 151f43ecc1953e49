//! XDG-compliant path resolution for skillpath.
//!
//! The CLI keeps durable sessions under `$XDG_DATA_HOME/skillpath/` unless
//! `--data-dir` says otherwise, and picks up
//! `$XDG_CONFIG_HOME/skillpath/catalog.toml` when no `--catalog` is given.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors from path resolution.
#[derive(Debug, Error, Diagnostic)]
pub enum PathError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(skillpath::paths::no_home),
        help("Set the HOME environment variable or pass --data-dir explicitly.")
    )]
    NoHome,

    #[error("failed to create directory: {path}")]
    #[diagnostic(
        code(skillpath::paths::create_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PathResult<T> = std::result::Result<T, PathError>;

/// Global XDG-compliant directories for skillpath.
#[derive(Debug, Clone)]
pub struct SkillpathPaths {
    /// `$XDG_CONFIG_HOME/skillpath/`
    pub config_dir: PathBuf,
    /// `$XDG_DATA_HOME/skillpath/`
    pub data_dir: PathBuf,
}

impl SkillpathPaths {
    /// Resolve XDG directories from environment variables with standard fallbacks.
    pub fn resolve() -> PathResult<Self> {
        let home = std::env::var("HOME")
            .map(PathBuf::from)
            .map_err(|_| PathError::NoHome)?;

        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".config"))
            .join("skillpath");

        let data_dir = std::env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local/share"))
            .join("skillpath");

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    /// Directory holding the session database.
    pub fn sessions_dir(&self) -> PathBuf {
        self.data_dir.join("sessions")
    }

    /// Conventional location of a user-supplied catalog.
    pub fn catalog_file(&self) -> PathBuf {
        self.config_dir.join("catalog.toml")
    }

    /// The user catalog, if one has been placed at [`Self::catalog_file`].
    pub fn user_catalog(&self) -> Option<PathBuf> {
        let path = self.catalog_file();
        path.is_file().then_some(path)
    }

    /// Create all base directories. Idempotent.
    pub fn ensure_dirs(&self) -> PathResult<()> {
        for dir in [&self.config_dir, &self.data_dir, &self.sessions_dir()] {
            std::fs::create_dir_all(dir).map_err(|e| PathError::CreateDir {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }
}
