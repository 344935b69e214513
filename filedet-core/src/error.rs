//! Error types for filedet operations

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FiledetError {
    #[error("Empty pattern")]
    EmptyPattern,

    #[error("No file named '{pattern}' in {}", .dir.display())]
    NotFoundLocal { pattern: String, dir: PathBuf },

    #[error("No files found matching '{pattern}' (searched {} roots)", .searched.len())]
    NotFoundGlobal {
        pattern: String,
        searched: Vec<PathBuf>,
    },

    #[error("Found {} matches for '{pattern}'. Provide a full path or a more specific name.", .candidates.len())]
    AmbiguousMatch {
        pattern: String,
        candidates: Vec<PathBuf>,
    },

    #[error("Glob pattern error: {0}")]
    GlobPattern(String),

    #[error("Config already exists at {}", .0.display())]
    ConfigExists(PathBuf),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FiledetError {
    /// Whether this is one of the "nothing matched" outcomes.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFoundLocal { .. } | Self::NotFoundGlobal { .. }
        )
    }
}

impl From<globset::Error> for FiledetError {
    fn from(e: globset::Error) -> Self {
        Self::GlobPattern(e.to_string())
    }
}
