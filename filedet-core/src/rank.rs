//! Ranking and multi-pattern aggregation of match results.

use crate::result::MatchResult;
use crate::FiledetError;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::PathBuf;

/// Total order: root priority ascending, newest first, then path.
pub fn compare(a: &MatchResult, b: &MatchResult) -> Ordering {
    a.priority()
        .cmp(&b.priority())
        .then_with(|| b.modified().cmp(&a.modified()))
        .then_with(|| a.path().cmp(b.path()))
}

/// Sort matches in place by [`compare`].
pub fn rank(matches: &mut [MatchResult]) {
    matches.sort_by(compare);
}

/// Merge per-pattern result lists, dropping later occurrences of the same
/// canonical file, then re-rank the union.
///
/// Batches must be given in pattern order; within a batch the first entry
/// for a file wins, so callers pass batches that are already ranked.
pub fn aggregate<I>(batches: I) -> Vec<MatchResult>
where
    I: IntoIterator<Item = Vec<MatchResult>>,
{
    let mut seen = HashSet::new();
    let mut merged: Vec<MatchResult> = batches
        .into_iter()
        .flatten()
        .filter(|m| seen.insert(m.canonical_key()))
        .collect();
    rank(&mut merged);
    merged
}

/// Caller policy for commands that need exactly one file.
///
/// `searched` lists the directories that produced `matches`; it is reported
/// when there are none.
pub fn single_match<I>(
    pattern: &str,
    mut matches: Vec<MatchResult>,
    searched: I,
) -> crate::Result<MatchResult>
where
    I: IntoIterator<Item = PathBuf>,
{
    match matches.len() {
        0 => Err(FiledetError::NotFoundGlobal {
            pattern: pattern.to_string(),
            searched: searched.into_iter().collect(),
        }),
        1 => Ok(matches.remove(0)),
        _ => {
            rank(&mut matches);
            Err(FiledetError::AmbiguousMatch {
                pattern: pattern.to_string(),
                candidates: matches.into_iter().map(|m| m.candidate.path).collect(),
            })
        }
    }
}
