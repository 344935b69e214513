//! Resolver construction when the process working directory is gone.
//!
//! Kept in its own test binary because it changes the process cwd.

#![cfg(unix)]

use filedet_core::{Config, FiledetError, Resolver, SearchRoot};
use std::fs;
use tempfile::TempDir;

#[test]
fn resolver_builds_without_a_process_working_directory() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("a.md"), "root").unwrap();
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("a.md"), "local").unwrap();

    let doomed = TempDir::new().unwrap();
    let doomed_path = doomed.path().to_path_buf();
    std::env::set_current_dir(&doomed_path).unwrap();
    drop(doomed);
    assert!(!doomed_path.exists());

    let config = Config::with_roots([SearchRoot::new(root.path(), 1)]);
    let resolver = Resolver::new(&config).unwrap();

    // Global search never needs the working directory
    assert_eq!(resolver.search("a.md").unwrap().len(), 1);

    // The local check reports the missing cwd when it is actually needed
    assert!(matches!(resolver.resolve("a.md"), Err(FiledetError::Io(_))));

    let found = resolver.with_working_dir(cwd.path()).resolve("a.md").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].path(), cwd.path().join("a.md"));
}
