//! filedet core - prioritized multi-root file resolution
//!
//! Given name fragments, wildcards, or partial path patterns, this library
//! finds candidate files across a ranked list of search roots and returns
//! them in a deterministic order: root priority first, then recency.

pub mod category;
pub mod config;
pub mod error;
pub mod matcher;
pub mod pattern;
pub mod rank;
pub mod resolver;
pub mod result;
pub mod walk;

pub use category::FileCategory;
pub use config::{expand_tilde, Config, SearchRoot, SkipRules, DEFAULT_CONFIG};
pub use error::FiledetError;
pub use matcher::{MatchLevels, Matcher};
pub use pattern::{Pattern, PatternKind};
pub use rank::{aggregate, rank, single_match};
pub use resolver::Resolver;
pub use result::{MatchOrigin, MatchResult, LOCAL_PRIORITY};
pub use walk::{Candidate, RootWalker};

/// Result type alias for filedet operations
pub type Result<T> = std::result::Result<T, FiledetError>;
