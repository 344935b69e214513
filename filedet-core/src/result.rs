//! Match records handed to callers.

use crate::category::FileCategory;
use crate::walk::Candidate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Priority of hits from the working directory or an explicit directory.
/// Configured roots start at 1, so these always rank first.
pub const LOCAL_PRIORITY: u32 = 0;

/// Where a match was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOrigin {
    /// The working directory, or a literal path that exists
    Local,
    /// The existing directory prefix of an anchored pattern (`~/notes/*x*`)
    ExplicitDirectory,
    /// A configured search root
    Root,
}

/// A candidate annotated with the pattern that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub pattern: String,
    /// Depth-prefix level for path patterns
    pub depth: Option<usize>,
    pub origin: MatchOrigin,
}

impl MatchResult {
    pub fn new(candidate: Candidate, pattern: &str, depth: Option<usize>, origin: MatchOrigin) -> Self {
        Self {
            candidate,
            pattern: pattern.to_string(),
            depth,
            origin,
        }
    }

    pub fn path(&self) -> &Path {
        &self.candidate.path
    }

    pub fn relative_path(&self) -> &Path {
        &self.candidate.relative_path
    }

    pub fn priority(&self) -> u32 {
        self.candidate.priority
    }

    pub fn modified(&self) -> SystemTime {
        self.candidate.modified
    }

    pub fn size(&self) -> u64 {
        self.candidate.size
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::detect(&self.candidate.path)
    }

    /// Path with the home directory shown as `~`.
    pub fn display_path(&self) -> String {
        if let Some(home) = dirs::home_dir() {
            if let Ok(rest) = self.candidate.path.strip_prefix(&home) {
                return Path::new("~").join(rest).display().to_string();
            }
        }
        self.candidate.path.display().to_string()
    }

    /// Key used to detect the same file reached through different patterns
    /// or roots.
    pub fn canonical_key(&self) -> PathBuf {
        canonical_key(&self.candidate.path)
    }
}

pub(crate) fn canonical_key(path: &Path) -> PathBuf {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if cfg!(any(windows, target_os = "macos")) {
        PathBuf::from(canonical.to_string_lossy().to_lowercase())
    } else {
        canonical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn result_at(path: PathBuf) -> MatchResult {
        MatchResult::new(
            Candidate {
                relative_path: PathBuf::from(path.file_name().unwrap()),
                path,
                priority: 1,
                modified: UNIX_EPOCH,
                size: 0,
            },
            "x",
            None,
            MatchOrigin::Root,
        )
    }

    #[test]
    fn test_display_path_abbreviates_home() {
        let home = dirs::home_dir().unwrap();
        let result = result_at(home.join("notes").join("a.md"));
        assert_eq!(
            result.display_path(),
            Path::new("~").join("notes").join("a.md").display().to_string()
        );

        let elsewhere = result_at(PathBuf::from("/definitely/not/home/a.md"));
        assert_eq!(elsewhere.display_path(), "/definitely/not/home/a.md");
    }

    #[test]
    fn test_canonical_key_resolves_dot_segments() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("a.md"), "").unwrap();

        let direct = result_at(dir.path().join("a.md"));
        let dotted = result_at(dir.path().join("sub").join("..").join("a.md"));
        assert_eq!(direct.canonical_key(), dotted.canonical_key());
    }

    #[test]
    fn test_category_follows_extension() {
        let result = result_at(PathBuf::from("/x/storage.py"));
        assert_eq!(result.category(), FileCategory::Python);
    }

    #[test]
    fn test_serializes_as_flat_record_with_unix_seconds() {
        let mut result = result_at(PathBuf::from("/x/a.md"));
        result.candidate.modified = UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
        result.depth = Some(2);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["path"], "/x/a.md");
        assert_eq!(value["relative_path"], "a.md");
        assert_eq!(value["priority"], 1);
        assert_eq!(value["modified"], 1_700_000_000u64);
        assert_eq!(value["size"], 0);
        assert_eq!(value["pattern"], "x");
        assert_eq!(value["depth"], 2);
        assert_eq!(value["origin"], "root");
        assert!(value.get("candidate").is_none());
    }
}
