//! File categories detected from extensions.

use serde::Serialize;
use std::path::Path;

/// Closed set of file categories handed to downstream analysis code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Python,
    JavaScript,
    TypeScript,
    Markdown,
    Text,
    Json,
    Yaml,
    Shell,
    Go,
    Rust,
    C,
    Cpp,
    Unknown,
}

impl FileCategory {
    pub fn detect(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "py" => Self::Python,
            "js" | "jsx" => Self::JavaScript,
            "ts" | "tsx" => Self::TypeScript,
            "md" => Self::Markdown,
            "txt" => Self::Text,
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "sh" | "bash" => Self::Shell,
            "go" => Self::Go,
            "rs" => Self::Rust,
            "c" | "h" => Self::C,
            "cpp" | "hpp" | "cc" | "cxx" => Self::Cpp,
            _ => Self::Unknown,
        }
    }

    /// Source code a downstream tool can parse or lint. The CLI highlights
    /// these in listings.
    pub fn is_code(self) -> bool {
        matches!(
            self,
            Self::Python
                | Self::JavaScript
                | Self::TypeScript
                | Self::Go
                | Self::Rust
                | Self::C
                | Self::Cpp
                | Self::Shell
        )
    }

    /// Prose meant to be read as-is.
    pub fn is_text(self) -> bool {
        matches!(self, Self::Markdown | Self::Text)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Markdown => "Markdown",
            Self::Text => "Text",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Shell => "Shell",
            Self::Go => "Go",
            Self::Rust => "Rust",
            Self::C => "C",
            Self::Cpp => "C++",
            Self::Unknown => "Unknown",
        }
    }
}
