//! Resolution engine: local short-circuit, explicit directories, and the
//! parallel walk across configured roots.

use crate::config::{expand_tilde, Config, SearchRoot, SkipRules};
use crate::matcher::{MatchLevels, Matcher};
use crate::pattern::{Pattern, PatternKind};
use crate::rank::{aggregate, rank};
use crate::result::{MatchOrigin, MatchResult, LOCAL_PRIORITY};
use crate::walk::{Candidate, RootWalker};
use crate::FiledetError;
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Resolves user patterns against a fixed configuration.
///
/// The configuration is captured at construction and never changes, so a
/// `Resolver` can be shared across threads and every call is independent.
pub struct Resolver {
    walkers: Vec<RootWalker>,
    skip: SkipRules,
    max_depth: usize,
    working_dir: Option<PathBuf>,
    content_filter: Option<String>,
}

impl Resolver {
    /// Channel capacity between root walkers and the collector
    const CHANNEL_CAPACITY: usize = 256;

    pub fn new(config: &Config) -> crate::Result<Self> {
        let walkers = config
            .search_roots()
            .iter()
            .map(|root| RootWalker::new(root, &config.skip))
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(Self {
            walkers,
            skip: config.skip.clone(),
            max_depth: config.max_path_depth,
            working_dir: None,
            content_filter: None,
        })
    }

    /// Directory used for the local check. Without one, the process cwd is
    /// read at the time of each local lookup.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Keep only files whose contents include `term`.
    pub fn with_content_filter(mut self, term: Option<String>) -> Self {
        self.content_filter = term;
        self
    }

    /// Configured roots in priority order.
    pub fn roots(&self) -> impl Iterator<Item = &SearchRoot> {
        self.walkers.iter().map(RootWalker::root)
    }

    /// Resolve a single pattern.
    ///
    /// A name with an extension is only looked up in the working directory;
    /// use [`Resolver::search`] to look for it across the configured roots.
    pub fn resolve(&self, raw: &str) -> crate::Result<Vec<MatchResult>> {
        let pattern = Pattern::classify(raw)?;
        debug!(pattern = %pattern, kind = ?pattern.kind(), "resolving");

        if pattern.kind() == PatternKind::ExactLocal {
            let cwd = self.working_dir()?;
            let hits = self.local_hits(&cwd, &pattern);
            if hits.is_empty() {
                return Err(FiledetError::NotFoundLocal {
                    pattern: pattern.raw().to_string(),
                    dir: cwd,
                });
            }
            return Ok(hits);
        }

        self.search_pattern(&pattern)
    }

    /// Search the configured roots without the working-directory check.
    pub fn search(&self, raw: &str) -> crate::Result<Vec<MatchResult>> {
        let pattern = Pattern::classify(raw)?;
        debug!(pattern = %pattern, kind = ?pattern.kind(), "searching");
        self.search_pattern(&pattern)
    }

    /// Search a single directory instead of the configured roots.
    ///
    /// Every hit gets the local priority, so results come back newest first.
    /// An empty result is not an error.
    pub fn search_in(&self, dir: &Path, raw: &str) -> crate::Result<Vec<MatchResult>> {
        let pattern = Pattern::classify(raw)?;
        let walker = RootWalker::new(&SearchRoot::new(dir, LOCAL_PRIORITY), &self.skip)?;
        self.walk_roots(&[walker], &pattern, pattern.raw(), MatchOrigin::Local)
    }

    /// Resolve several patterns and merge the results, one entry per file.
    ///
    /// Patterns that match nothing contribute nothing; an empty aggregate is
    /// returned as `Ok`.
    pub fn resolve_all<S: AsRef<str>>(&self, raws: &[S]) -> crate::Result<Vec<MatchResult>> {
        let mut batches = Vec::with_capacity(raws.len());

        for raw in raws {
            let pattern = Pattern::classify(raw.as_ref())?;
            let batch = if pattern.kind() == PatternKind::ExactLocal {
                let hits = self.local_hits(&self.working_dir()?, &pattern);
                if hits.is_empty() {
                    self.search_pattern(&pattern)
                } else {
                    Ok(hits)
                }
            } else {
                self.search_pattern(&pattern)
            };

            match batch {
                Ok(matches) => batches.push(matches),
                Err(e) if e.is_not_found() => {
                    debug!(pattern = %pattern, "no matches");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(aggregate(batches))
    }

    fn search_pattern(&self, pattern: &Pattern) -> crate::Result<Vec<MatchResult>> {
        if pattern.kind() == PatternKind::PathPattern && !pattern.has_wildcard() {
            if let Some(hit) = self.literal_path(pattern)? {
                return Ok(vec![hit]);
            }
        }

        if pattern.is_anchored() {
            if let Some((dir, rest)) = split_explicit_directory(&pattern.match_expr()) {
                debug!(dir = %dir.display(), rest = %rest, "searching explicit directory");
                let inner = Pattern::classify(&rest)?;
                let walker = RootWalker::new(&SearchRoot::new(&dir, LOCAL_PRIORITY), &self.skip)?;
                let matches = self.walk_roots(
                    &[walker],
                    &inner,
                    pattern.raw(),
                    MatchOrigin::ExplicitDirectory,
                )?;
                if matches.is_empty() {
                    return Err(FiledetError::NotFoundGlobal {
                        pattern: pattern.raw().to_string(),
                        searched: vec![dir],
                    });
                }
                return Ok(matches);
            }
        }

        let matches = self.walk_roots(&self.walkers, pattern, pattern.raw(), MatchOrigin::Root)?;
        if matches.is_empty() {
            return Err(FiledetError::NotFoundGlobal {
                pattern: pattern.raw().to_string(),
                searched: self.roots().map(|r| r.path.clone()).collect(),
            });
        }
        Ok(matches)
    }

    /// Walk every root in parallel and return the ranked matches at the
    /// shallowest depth level any root produced.
    fn walk_roots(
        &self,
        walkers: &[RootWalker],
        pattern: &Pattern,
        label: &str,
        origin: MatchOrigin,
    ) -> crate::Result<Vec<MatchResult>> {
        let matcher = Matcher::new(pattern, self.max_depth)?;
        let matcher_ref = &matcher;

        let active: Vec<&RootWalker> = walkers
            .iter()
            .filter(|w| {
                let exists = w.root().path.is_dir();
                if !exists {
                    debug!(root = %w.root().path.display(), "skipping missing root");
                }
                exists
            })
            .collect();

        debug!(pattern = %pattern, roots = active.len(), "walking roots");
        let (tx, rx) = crossbeam_channel::bounded::<(Candidate, MatchLevels)>(Self::CHANNEL_CAPACITY);
        let mut found = Vec::new();

        std::thread::scope(|s| {
            s.spawn(move || {
                active.par_iter().for_each_with(tx, |sender, walker| {
                    let mut count = 0usize;
                    for candidate in walker.walk() {
                        let Some(levels) = matcher_ref.matches(&candidate) else {
                            continue;
                        };
                        if !self.passes_content_filter(&candidate.path) {
                            continue;
                        }
                        count += 1;
                        if sender.send((candidate, levels)).is_err() {
                            return;
                        }
                    }
                    debug!(root = %walker.root().path.display(), matches = count, "walked root");
                });
            });

            // Single collector: the only writer of `found`
            for item in rx.iter() {
                found.push(item);
            }
        });

        let Some(level) = found.iter().map(|(_, levels)| levels.lowest()).min() else {
            return Ok(Vec::new());
        };
        let depth = matcher.is_path_matcher().then_some(level);

        let mut matches: Vec<MatchResult> = found
            .into_iter()
            .filter(|(_, levels)| levels.contains(level))
            .map(|(candidate, _)| MatchResult::new(candidate, label, depth, origin))
            .collect();
        rank(&mut matches);
        Ok(matches)
    }

    /// Case-insensitive lookup of a bare file name in the working directory.
    /// Exact-case hits come first.
    fn local_hits(&self, cwd: &Path, pattern: &Pattern) -> Vec<MatchResult> {
        let wanted = pattern.raw();
        let entries = match fs::read_dir(cwd) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(dir = %cwd.display(), error = %err, "working directory unreadable");
                return Vec::new();
            }
        };

        let lower = wanted.to_lowercase();
        let mut hits: Vec<MatchResult> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().to_lowercase() == lower)
            .filter_map(|entry| Candidate::from_path(&entry.path(), cwd, LOCAL_PRIORITY))
            .filter(|candidate| self.passes_content_filter(&candidate.path))
            .map(|candidate| MatchResult::new(candidate, wanted, None, MatchOrigin::Local))
            .collect();

        hits.sort_by_key(|m| (m.candidate.file_name() != wanted, m.path().to_path_buf()));
        hits
    }

    /// A wildcard-free path pattern naming an existing file, relative to the
    /// working directory or anchored at `~` or `/`.
    fn literal_path(&self, pattern: &Pattern) -> crate::Result<Option<MatchResult>> {
        let expanded = expand_tilde(&pattern.match_expr());
        let (path, base) = if expanded.is_absolute() {
            let base = expanded.parent().map(Path::to_path_buf).unwrap_or_default();
            (expanded, base)
        } else {
            let cwd = self.working_dir()?;
            (cwd.join(expanded), cwd)
        };

        let hit = Candidate::from_path(&path, &base, LOCAL_PRIORITY)
            .filter(|candidate| self.passes_content_filter(&candidate.path))
            .map(|candidate| MatchResult::new(candidate, pattern.raw(), None, MatchOrigin::Local));
        Ok(hit)
    }

    fn working_dir(&self) -> crate::Result<PathBuf> {
        match &self.working_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    fn passes_content_filter(&self, path: &Path) -> bool {
        let Some(term) = &self.content_filter else {
            return true;
        };
        match fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).contains(term.as_str()),
            Err(_) => false,
        }
    }
}

/// Split an anchored pattern at its longest existing directory prefix.
///
/// `~/projects/*review*` becomes (`$HOME/projects`, `*review*`). A pattern
/// that is itself a directory yields `*`. The bare filesystem root never
/// counts as a prefix.
fn split_explicit_directory(raw: &str) -> Option<(PathBuf, String)> {
    let expanded = expand_tilde(raw);
    let components: Vec<Component> = expanded.components().collect();

    for i in (1..=components.len()).rev() {
        if components[..i]
            .iter()
            .all(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
        {
            break;
        }

        let prefix: PathBuf = components[..i].iter().collect();
        if !prefix.is_dir() {
            continue;
        }

        let rest: Vec<String> = components[i..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let rest = if rest.is_empty() {
            "*".to_string()
        } else {
            rest.join("/")
        };
        return Some((prefix, rest));
    }

    None
}
