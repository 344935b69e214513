//! Lazy per-root file enumeration with skip rules.

use crate::config::{SearchRoot, SkipRules};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::trace;

/// A regular file discovered under a search root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub priority: u32,
    #[serde(serialize_with = "unix_seconds")]
    pub modified: SystemTime,
    pub size: u64,
}

/// Modification times serialize as whole seconds since the Unix epoch.
fn unix_seconds<S>(t: &SystemTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let secs = t.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    serializer.serialize_u64(secs)
}

impl Candidate {
    /// Build a candidate by stat-ing `path`. Returns `None` when the file
    /// cannot be stat-ed or is not a regular file.
    pub(crate) fn from_path(path: &Path, base: &Path, priority: u32) -> Option<Self> {
        let metadata = std::fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        Some(Self {
            path: path.to_path_buf(),
            relative_path: path.strip_prefix(base).unwrap_or(path).to_path_buf(),
            priority,
            modified: metadata.modified().unwrap_or(UNIX_EPOCH),
            size: metadata.len(),
        })
    }

    pub fn file_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    }

    /// Root-relative path with `/` separators on every platform.
    pub fn relative_str(&self) -> String {
        self.relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Enumerates candidate files under one search root.
///
/// Each call to [`RootWalker::walk`] starts a fresh walk; nothing is cached.
pub struct RootWalker {
    root: SearchRoot,
    pruned_dirs: HashSet<String>,
    skip_files: GlobSet,
}

impl RootWalker {
    pub fn new(root: &SearchRoot, skip: &SkipRules) -> crate::Result<Self> {
        let pruned_dirs = skip
            .directories
            .iter()
            .chain(root.exclude.iter())
            .cloned()
            .collect();

        let mut builder = GlobSetBuilder::new();
        for pattern in &skip.files {
            builder.add(Glob::new(pattern)?);
        }

        Ok(Self {
            root: root.clone(),
            pruned_dirs,
            skip_files: builder.build()?,
        })
    }

    pub fn root(&self) -> &SearchRoot {
        &self.root
    }

    /// Lazily yield every non-skipped regular file under the root.
    ///
    /// Symlinked directories are never descended into; symlinks to files are
    /// yielded with the target's metadata. Entries that cannot be read,
    /// including dangling links, are skipped.
    pub fn walk(&self) -> impl Iterator<Item = Candidate> + '_ {
        let mut builder = WalkBuilder::new(&self.root.path);
        builder
            .standard_filters(false)
            .hidden(false)
            .follow_links(false);
        if !self.root.recursive {
            builder.max_depth(Some(1));
        }

        let pruned = self.pruned_dirs.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return true;
            }
            !pruned.contains(&*entry.file_name().to_string_lossy())
        });

        builder.build().filter_map(move |entry| {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    trace!(root = %self.root.path.display(), error = %err, "skipping unreadable entry");
                    return None;
                }
            };

            let file_type = entry.file_type()?;
            if !file_type.is_file() && !file_type.is_symlink() {
                return None;
            }

            let name = entry.file_name().to_string_lossy();
            if self.skip_files.is_match(&*name) {
                return None;
            }

            // Symlinks are stat-ed through the link; only links to files count
            let metadata = if file_type.is_symlink() {
                std::fs::metadata(entry.path())
            } else {
                entry.metadata().map_err(std::io::Error::other)
            };
            let metadata = match metadata {
                Ok(m) if m.is_file() => m,
                Ok(_) => return None,
                Err(err) => {
                    trace!(path = %entry.path().display(), error = %err, "skipping file without metadata");
                    return None;
                }
            };

            let path = entry.path();
            Some(Candidate {
                path: path.to_path_buf(),
                relative_path: path
                    .strip_prefix(&self.root.path)
                    .unwrap_or(path)
                    .to_path_buf(),
                priority: self.root.priority,
                modified: metadata.modified().unwrap_or(UNIX_EPOCH),
                size: metadata.len(),
            })
        })
    }
}
