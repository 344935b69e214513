//! Case-insensitive candidate matching.

use crate::pattern::{Pattern, PatternKind};
use crate::walk::Candidate;
use globset::{GlobBuilder, GlobMatcher};

/// Deepest depth-prefix level that can be represented.
const MAX_LEVELS: usize = 31;

/// Set of depth-prefix levels at which a path pattern matched.
///
/// Level `d` means the pattern matched after `d` leading `*/` segments were
/// prepended. File-name matches always report level 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLevels(u32);

impl MatchLevels {
    pub fn single(level: usize) -> Self {
        Self(1 << level)
    }

    pub fn contains(self, level: usize) -> bool {
        self.0 & (1 << level) != 0
    }

    pub fn lowest(self) -> usize {
        self.0.trailing_zeros() as usize
    }
}

enum Target {
    ExactName(String),
    FileName(GlobMatcher),
    RelativePath(Vec<GlobMatcher>),
}

/// Tests candidates against one classified pattern.
pub struct Matcher {
    target: Target,
}

fn glob(expr: &str) -> crate::Result<GlobMatcher> {
    Ok(GlobBuilder::new(expr)
        .case_insensitive(true)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

impl Matcher {
    pub fn new(pattern: &Pattern, max_depth: usize) -> crate::Result<Self> {
        let expr = pattern.match_expr();
        let target = match pattern.kind() {
            PatternKind::ExactLocal => Target::ExactName(expr.to_lowercase()),
            PatternKind::ExtensionlessShorthand | PatternKind::ExplicitWildcard => {
                Target::FileName(glob(&expr)?)
            }
            PatternKind::PathPattern => {
                let expr = expr.trim_start_matches("./");
                let levels = (0..=max_depth.min(MAX_LEVELS))
                    .map(|depth| glob(&format!("{}{}", "*/".repeat(depth), expr)))
                    .collect::<crate::Result<Vec<_>>>()?;
                Target::RelativePath(levels)
            }
        };
        Ok(Self { target })
    }

    /// Levels at which `candidate` matches, or `None` if it does not.
    pub fn matches(&self, candidate: &Candidate) -> Option<MatchLevels> {
        match &self.target {
            Target::ExactName(name) => {
                (candidate.file_name().to_lowercase() == *name).then(|| MatchLevels::single(0))
            }
            Target::FileName(glob) => glob
                .is_match(&*candidate.file_name())
                .then(|| MatchLevels::single(0)),
            Target::RelativePath(levels) => {
                let relative = candidate.relative_str();
                let mask = levels
                    .iter()
                    .enumerate()
                    .filter(|(_, glob)| glob.is_match(&relative))
                    .fold(0u32, |mask, (depth, _)| mask | (1 << depth));
                (mask != 0).then_some(MatchLevels(mask))
            }
        }
    }

    /// Whether this matcher looks at root-relative paths.
    pub fn is_path_matcher(&self) -> bool {
        matches!(self.target, Target::RelativePath(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::UNIX_EPOCH;

    fn candidate(relative: &str) -> Candidate {
        Candidate {
            path: PathBuf::from("/root").join(relative),
            relative_path: PathBuf::from(relative),
            priority: 1,
            modified: UNIX_EPOCH,
            size: 0,
        }
    }

    fn matcher(raw: &str) -> Matcher {
        Matcher::new(&Pattern::classify(raw).unwrap(), 4).unwrap()
    }

    #[test]
    fn test_exact_name_is_case_insensitive() {
        let m = matcher("claude.md");
        assert!(m.matches(&candidate("CLAUDE.md")).is_some());
        assert!(m.matches(&candidate("docs/Claude.MD")).is_some());
        assert!(m.matches(&candidate("claude.md.bak")).is_none());
    }

    #[test]
    fn test_shorthand_matches_substring() {
        let m = matcher("storage");
        assert!(m.matches(&candidate("storage.py")).is_some());
        assert!(m.matches(&candidate("notes/mystorage.md")).is_some());
        assert!(m.matches(&candidate("STORAGE_TEST.rs")).is_some());
        assert!(m.matches(&candidate("stor.py")).is_none());
    }

    #[test]
    fn test_wildcard_matches_file_name_only() {
        let m = matcher("*.md");
        assert!(m.matches(&candidate("a/b/README.MD")).is_some());
        assert!(m.matches(&candidate("md/readme.txt")).is_none());

        let q = matcher("test?.py");
        assert!(q.matches(&candidate("test1.py")).is_some());
        assert!(q.matches(&candidate("test10.py")).is_none());
    }

    #[test]
    fn test_path_pattern_levels() {
        let m = matcher("cc-*/drafts/*.md");
        assert!(m.is_path_matcher());

        let shallow = m.matches(&candidate("cc-1/drafts/a.md")).unwrap();
        assert_eq!(shallow.lowest(), 0);

        let deeper = m.matches(&candidate("other/cc-2/drafts/b.md")).unwrap();
        assert_eq!(deeper.lowest(), 1);
        assert!(!deeper.contains(0));

        let deepest = m.matches(&candidate("a/b/c/d/cc-3/drafts/c.md")).unwrap();
        assert_eq!(deepest.lowest(), 4);

        assert!(m.matches(&candidate("a/b/c/d/e/cc-3/drafts/c.md")).is_none());
    }

    #[test]
    fn test_path_pattern_star_does_not_cross_separator() {
        let m = Matcher::new(&Pattern::classify("docs/*.md").unwrap(), 0).unwrap();
        assert!(m.matches(&candidate("docs/a.md")).is_some());
        assert!(m.matches(&candidate("docs/sub/a.md")).is_none());
    }

    #[test]
    fn test_path_pattern_is_case_insensitive() {
        let m = matcher("CC-*/DRAFTS/*.MD");
        assert!(m.matches(&candidate("cc-opts/drafts/test.md")).is_some());
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        let pattern = Pattern::classify("[oops").unwrap();
        assert!(matches!(
            Matcher::new(&pattern, 4),
            Err(crate::FiledetError::GlobPattern(_))
        ));
    }
}
