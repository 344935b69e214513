//! Pattern classification.
//!
//! Every raw input is classified once, syntactically, into one of four
//! kinds that decide where and how it is matched:
//!
//! | kind                     | example             | matched against        |
//! |--------------------------|---------------------|------------------------|
//! | `PathPattern`            | `cc-*/drafts/*.md`  | root-relative path     |
//! | `ExplicitWildcard`       | `*.md`, `test?.py`  | file name              |
//! | `ExactLocal`             | `CLAUDE.md`         | working dir, then name |
//! | `ExtensionlessShorthand` | `storage`           | file name as `*storage*` |

use crate::FiledetError;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    ExactLocal,
    ExtensionlessShorthand,
    ExplicitWildcard,
    PathPattern,
}

/// A classified user pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    kind: PatternKind,
}

const WILDCARD_CHARS: [char; 3] = ['*', '?', '['];

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// True when `name` has an extension: a `.` followed by at least one
/// character, ignoring the leading dots of a dotfile.
fn has_extension(name: &str) -> bool {
    let stem = name.trim_start_matches('.');
    match stem.rfind('.') {
        Some(idx) => idx + 1 < stem.len(),
        None => false,
    }
}

impl Pattern {
    /// Classify a raw input string.
    pub fn classify(raw: &str) -> crate::Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FiledetError::EmptyPattern);
        }

        let kind = if raw.contains(is_separator) {
            PatternKind::PathPattern
        } else if raw.contains(&WILDCARD_CHARS[..]) {
            PatternKind::ExplicitWildcard
        } else if has_extension(raw) {
            PatternKind::ExactLocal
        } else {
            PatternKind::ExtensionlessShorthand
        };

        Ok(Self {
            raw: raw.to_string(),
            kind,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn has_wildcard(&self) -> bool {
        self.raw.contains(&WILDCARD_CHARS[..])
    }

    /// Path patterns rooted at `~` or an absolute path.
    pub fn is_anchored(&self) -> bool {
        self.kind == PatternKind::PathPattern
            && (self.raw.starts_with("~/")
                || self.raw.starts_with("~\\")
                || Path::new(&self.raw).is_absolute()
                || self.raw.starts_with('/'))
    }

    /// The glob expression actually matched against candidates.
    pub fn match_expr(&self) -> String {
        match self.kind {
            PatternKind::ExtensionlessShorthand => format!("*{}*", self.raw),
            PatternKind::PathPattern => self.raw.replace('\\', "/"),
            PatternKind::ExactLocal | PatternKind::ExplicitWildcard => self.raw.clone(),
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(raw: &str) -> PatternKind {
        Pattern::classify(raw).unwrap().kind()
    }

    #[test]
    fn test_separator_wins_over_everything() {
        assert_eq!(kind("cc-*/drafts/*.md"), PatternKind::PathPattern);
        assert_eq!(kind("docs/readme.md"), PatternKind::PathPattern);
        assert_eq!(kind("docs\\readme"), PatternKind::PathPattern);
        assert_eq!(kind("~/notes/*review*"), PatternKind::PathPattern);
    }

    #[test]
    fn test_wildcards_without_separator() {
        assert_eq!(kind("*.md"), PatternKind::ExplicitWildcard);
        assert_eq!(kind("test?.py"), PatternKind::ExplicitWildcard);
        assert_eq!(kind("[ab].txt"), PatternKind::ExplicitWildcard);
    }

    #[test]
    fn test_extension_means_exact_local() {
        assert_eq!(kind("CLAUDE.md"), PatternKind::ExactLocal);
        assert_eq!(kind("archive.tar.gz"), PatternKind::ExactLocal);
        assert_eq!(kind(".env.local"), PatternKind::ExactLocal);
    }

    #[test]
    fn test_shorthand() {
        assert_eq!(kind("storage"), PatternKind::ExtensionlessShorthand);
        assert_eq!(kind(".bashrc"), PatternKind::ExtensionlessShorthand);
        assert_eq!(kind("trailing."), PatternKind::ExtensionlessShorthand);
        assert_eq!(
            Pattern::classify("storage").unwrap().match_expr(),
            "*storage*"
        );
    }

    #[test]
    fn test_empty_and_blank_rejected() {
        assert!(matches!(
            Pattern::classify(""),
            Err(FiledetError::EmptyPattern)
        ));
        assert!(matches!(
            Pattern::classify("   "),
            Err(FiledetError::EmptyPattern)
        ));
    }

    #[test]
    fn test_input_is_trimmed() {
        let p = Pattern::classify("  a.md \n").unwrap();
        assert_eq!(p.raw(), "a.md");
    }

    #[test]
    fn test_anchored_patterns() {
        assert!(Pattern::classify("~/notes/*x*").unwrap().is_anchored());
        assert!(Pattern::classify("/tmp/*.md").unwrap().is_anchored());
        assert!(!Pattern::classify("notes/*.md").unwrap().is_anchored());
        assert!(!Pattern::classify("a.md").unwrap().is_anchored());
    }

    #[test]
    fn test_path_pattern_backslashes_normalized() {
        let p = Pattern::classify("docs\\*.md").unwrap();
        assert_eq!(p.match_expr(), "docs/*.md");
    }
}
