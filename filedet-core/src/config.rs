//! Configuration for filedet

use crate::FiledetError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration as TOML
pub const DEFAULT_CONFIG: &str = r#"# filedet configuration

# How many leading directory levels a path pattern may omit
# ("drafts/*.md" also tries "*/drafts/*.md", "*/*/drafts/*.md", ...)
max_path_depth = 4

# Search roots, highest priority first. Priority defaults to the position
# in this list (1, 2, ...); lower numbers rank first.
#
# [[roots]]
# path = "~/projects"
#
# [[roots]]
# path = "~/notes"
# priority = 5
# recursive = false
# exclude = ["archive"]

[skip]
# Directory names that are never descended into
directories = [
    ".git",
    "node_modules",
    "target",
    "__pycache__",
    ".venv",
    "venv",
]
# File name globs that are never reported
files = [
    "*.pyc",
    ".DS_Store",
    "*.lock",
]
"#;

/// filedet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_max_path_depth")]
    pub max_path_depth: usize,
    #[serde(default)]
    pub roots: Vec<RootConfig>,
    #[serde(default)]
    pub skip: SkipRules,
}

/// One `[[roots]]` entry as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootConfig {
    pub path: String,
    #[serde(default)]
    pub priority: Option<u32>,
    #[serde(default = "default_recursive")]
    pub recursive: bool,
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Directory names to prune and file globs to exclude during walks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipRules {
    #[serde(default = "default_skip_directories")]
    pub directories: Vec<String>,
    #[serde(default = "default_skip_files")]
    pub files: Vec<String>,
}

/// A configured base directory with its priority rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRoot {
    pub path: PathBuf,
    pub priority: u32,
    pub recursive: bool,
    /// Extra directory names pruned under this root only
    pub exclude: Vec<String>,
}

impl SearchRoot {
    pub fn new(path: impl Into<PathBuf>, priority: u32) -> Self {
        Self {
            path: path.into(),
            priority,
            recursive: true,
            exclude: Vec::new(),
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = names.into_iter().map(Into::into).collect();
        self
    }
}

// Default value functions
fn default_max_path_depth() -> usize {
    4
}
fn default_recursive() -> bool {
    true
}
fn default_skip_directories() -> Vec<String> {
    vec![
        ".git".to_string(),
        "node_modules".to_string(),
        "target".to_string(),
        "__pycache__".to_string(),
        ".venv".to_string(),
        "venv".to_string(),
    ]
}
fn default_skip_files() -> Vec<String> {
    vec![
        "*.pyc".to_string(),
        ".DS_Store".to_string(),
        "*.lock".to_string(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_path_depth: default_max_path_depth(),
            roots: Vec::new(),
            skip: SkipRules::default(),
        }
    }
}

impl Default for SkipRules {
    fn default() -> Self {
        Self {
            directories: default_skip_directories(),
            files: default_skip_files(),
        }
    }
}

impl SkipRules {
    /// Rules that skip nothing.
    pub fn none() -> Self {
        Self {
            directories: Vec::new(),
            files: Vec::new(),
        }
    }
}

impl Config {
    /// Config with the given roots and default everything else
    pub fn with_roots(roots: impl IntoIterator<Item = SearchRoot>) -> Self {
        Self {
            roots: roots
                .into_iter()
                .map(|r| RootConfig {
                    path: r.path.to_string_lossy().into_owned(),
                    priority: Some(r.priority),
                    recursive: r.recursive,
                    exclude: r.exclude,
                })
                .collect(),
            ..Self::default()
        }
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| FiledetError::ConfigParse(e.to_string()))
    }

    /// `<config dir>/filedet/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("filedet").join("config.toml"))
    }

    /// Load an explicit config file, else the default location if it exists,
    /// else built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> crate::Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Resolved search roots: `~` expanded, priorities assigned, sorted by
    /// priority (ties keep config order).
    pub fn search_roots(&self) -> Vec<SearchRoot> {
        let mut roots: Vec<SearchRoot> = self
            .roots
            .iter()
            .enumerate()
            .map(|(i, r)| SearchRoot {
                path: expand_tilde(&r.path),
                priority: r.priority.unwrap_or(i as u32 + 1),
                recursive: r.recursive,
                exclude: r.exclude.clone(),
            })
            .collect();
        roots.sort_by_key(|r| r.priority);
        roots
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        let defaults = Config::default();
        assert_eq!(config.max_path_depth, 4);
        assert!(config.roots.is_empty());
        assert_eq!(config.skip.directories, defaults.skip.directories);
        assert_eq!(config.skip.files, defaults.skip.files);
    }

    #[test]
    fn test_root_priorities_default_to_position() {
        let config = Config::from_toml(
            r#"
            [[roots]]
            path = "/a"

            [[roots]]
            path = "/b"
            recursive = false
            exclude = ["archive"]
            "#,
        )
        .unwrap();

        let roots = config.search_roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].path, PathBuf::from("/a"));
        assert_eq!(roots[0].priority, 1);
        assert!(roots[0].recursive);
        assert_eq!(roots[1].priority, 2);
        assert!(!roots[1].recursive);
        assert_eq!(roots[1].exclude, vec!["archive".to_string()]);
    }

    #[test]
    fn test_explicit_priority_reorders_roots() {
        let config = Config::from_toml(
            r#"
            [[roots]]
            path = "/low"
            priority = 10

            [[roots]]
            path = "/high"
            "#,
        )
        .unwrap();

        let roots = config.search_roots();
        assert_eq!(roots[0].path, PathBuf::from("/high"));
        assert_eq!(roots[1].path, PathBuf::from("/low"));
    }

    #[test]
    fn test_partial_skip_section_keeps_other_defaults() {
        let config = Config::from_toml("[skip]\ndirectories = [\"build\"]\n").unwrap();
        assert_eq!(config.skip.directories, vec!["build".to_string()]);
        assert_eq!(config.skip.files, default_skip_files());
        assert_eq!(config.max_path_depth, 4);
    }

    #[test]
    fn test_invalid_toml_is_config_parse_error() {
        let err = Config::from_toml("max_path_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, FiledetError::ConfigParse(_)));
    }

    #[test]
    fn test_expand_tilde() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_tilde("~"), home);
        assert_eq!(expand_tilde("~/notes"), home.join("notes"));
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("rel/~x"), PathBuf::from("rel/~x"));
    }

    #[test]
    fn test_with_roots_round_trips_search_roots() {
        let config = Config::with_roots([
            SearchRoot::new("/one", 1),
            SearchRoot::new("/two", 2).recursive(false).exclude(["old"]),
        ]);
        let roots = config.search_roots();
        assert_eq!(roots[0], SearchRoot::new("/one", 1));
        assert_eq!(
            roots[1],
            SearchRoot::new("/two", 2).recursive(false).exclude(["old"])
        );
    }
}
