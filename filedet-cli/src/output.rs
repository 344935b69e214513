//! Plain-text and JSON rendering of match lists and errors.

use colored::{ColoredString, Colorize};
use filedet_core::{FileCategory, FiledetError, MatchResult};
use serde::Serialize;
use std::path::PathBuf;
use std::time::SystemTime;
use time::{format_description, OffsetDateTime, UtcOffset};

/// How many candidates an ambiguity message lists before summarizing.
const MAX_LISTED: usize = 10;

/// `YY.MM.DD HH:MM` in local time.
fn format_date(t: SystemTime) -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    let Ok(format) = format_description::parse("[year repr:last_two].[month].[day] [hour]:[minute]")
    else {
        return String::new();
    };
    OffsetDateTime::from(t)
        .to_offset(offset)
        .format(&format)
        .unwrap_or_default()
}

fn format_size(bytes: u64) -> String {
    match bytes {
        b if b >= 1_000_000 => format!("{:.1} MB", b as f64 / 1_000_000.0),
        b if b >= 1_000 => format!("{:.1} KB", b as f64 / 1_000.0),
        b => format!("{} B", b),
    }
}

fn category_label(category: FileCategory) -> ColoredString {
    let label = category.label();
    if category.is_code() {
        label.green()
    } else if category.is_text() {
        label.yellow()
    } else {
        label.normal()
    }
}

pub fn print_listing(matches: &[MatchResult], patterns: &[String]) {
    println!(
        "\nFound {} files matching {}:\n",
        matches.len(),
        patterns.join(" ").bold()
    );
    for (i, m) in matches.iter().enumerate() {
        println!("[{}] {}", i + 1, m.display_path().cyan());
        println!(
            "    {}  {}  {}",
            format_date(m.modified()).dimmed(),
            format_size(m.size()),
            category_label(m.category())
        );
    }
    println!();
}

/// A match as printed by `--json`: the library record plus its category.
#[derive(Serialize)]
struct JsonMatch<'a> {
    #[serde(flatten)]
    result: &'a MatchResult,
    category: FileCategory,
}

pub fn print_json(matches: &[MatchResult]) -> filedet_core::Result<()> {
    let items: Vec<JsonMatch<'_>> = matches
        .iter()
        .map(|m| JsonMatch {
            result: m,
            category: m.category(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

fn print_paths(paths: &[PathBuf]) {
    for (i, path) in paths.iter().take(MAX_LISTED).enumerate() {
        eprintln!("  [{}] {}", i + 1, path.display());
    }
    if paths.len() > MAX_LISTED {
        eprintln!("  ... and {} more", paths.len() - MAX_LISTED);
    }
}

pub fn print_error(e: &FiledetError, json: bool) {
    if json {
        let error_json = match e {
            FiledetError::NotFoundGlobal { pattern, searched } => serde_json::json!({
                "code": "not_found", "message": e.to_string(), "pattern": pattern, "searched": searched,
            }),
            FiledetError::AmbiguousMatch { pattern, candidates } => serde_json::json!({
                "code": "ambiguous", "message": e.to_string(), "pattern": pattern, "candidates": candidates,
            }),
            _ => serde_json::json!({ "code": "error", "message": e.to_string() }),
        };
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&error_json).unwrap_or_else(|_| e.to_string())
        );
        return;
    }

    eprintln!("{} {}", "Error:".red(), e);
    match e {
        FiledetError::NotFoundGlobal { searched, .. } if !searched.is_empty() => {
            eprintln!("Searched:");
            print_paths(searched);
        }
        FiledetError::AmbiguousMatch { candidates, .. } => {
            eprintln!("Most relevant first:");
            print_paths(candidates);
        }
        FiledetError::NotFoundLocal { .. } => {
            eprintln!("Use 'filedet find' to search the configured roots.");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(2_500), "2.5 KB");
        assert_eq!(format_size(3_200_000), "3.2 MB");
    }

    #[test]
    fn test_format_date_shape() {
        let formatted = format_date(std::time::UNIX_EPOCH);
        // "YY.MM.DD HH:MM"
        assert_eq!(formatted.len(), 14);
        assert_eq!(&formatted[2..3], ".");
    }

    #[test]
    fn test_category_label_keeps_label_text() {
        colored::control::set_override(false);
        assert_eq!(category_label(FileCategory::Rust).to_string(), "Rust");
        assert_eq!(category_label(FileCategory::Markdown).to_string(), "Markdown");
        assert_eq!(category_label(FileCategory::Unknown).to_string(), "Unknown");
    }
}
