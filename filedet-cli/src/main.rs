//! filedet CLI - find files across prioritized search roots

mod output;

use clap::{Parser, Subcommand};
use filedet_core::{aggregate, single_match, Config, FiledetError, Resolver, DEFAULT_CONFIG};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "filedet")]
#[command(about = "Find files across prioritized search roots", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/filedet/config.toml)
    #[arg(long, global = true, env = "FILEDET_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log resolution details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init,

    /// Find files matching one or more patterns
    Find {
        /// Names, wildcards ("*.md"), or path patterns ("cc-*/drafts/*.md")
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Search the current directory instead of the configured roots
        #[arg(short, long)]
        local: bool,
    },

    /// Resolve a pattern to exactly one file and print its path
    Which {
        pattern: String,
    },

    /// List files under a directory whose contents contain a term
    Grep {
        term: String,
        directory: PathBuf,
    },

    /// Show the configured search roots
    Roots,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Init => cmd_init(cli.config.as_deref()),
        Commands::Find { patterns, local } => {
            cmd_find(cli.config.as_deref(), &patterns, local, cli.json)
        }
        Commands::Which { pattern } => cmd_which(cli.config.as_deref(), &pattern, cli.json),
        Commands::Grep { term, directory } => {
            cmd_grep(cli.config.as_deref(), term, &directory, cli.json)
        }
        Commands::Roots => cmd_roots(cli.config.as_deref(), cli.json),
    };

    if let Err(e) = result {
        output::print_error(&e, cli.json);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn load_resolver(config_path: Option<&Path>) -> filedet_core::Result<Resolver> {
    let config = Config::load_or_default(config_path)?;
    debug!(roots = config.roots.len(), "loaded config");
    Resolver::new(&config)
}

fn cmd_init(config_path: Option<&Path>) -> filedet_core::Result<()> {
    use colored::Colorize;

    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => Config::default_path().ok_or_else(|| {
            FiledetError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no config directory on this platform",
            ))
        })?,
    };

    if path.exists() {
        return Err(FiledetError::ConfigExists(path));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, DEFAULT_CONFIG)?;

    println!("{} {}", "Created".green(), path.display());
    Ok(())
}

fn cmd_find(
    config_path: Option<&Path>,
    patterns: &[String],
    local: bool,
    json: bool,
) -> filedet_core::Result<()> {
    let resolver = load_resolver(config_path)?;

    let matches = if local {
        let cwd = std::env::current_dir()?;
        let batches = patterns
            .iter()
            .map(|p| resolver.search_in(&cwd, p))
            .collect::<filedet_core::Result<Vec<_>>>()?;
        aggregate(batches)
    } else {
        resolver.resolve_all(patterns)?
    };

    if matches.is_empty() {
        return Err(FiledetError::NotFoundGlobal {
            pattern: patterns.join(" "),
            searched: resolver.roots().map(|r| r.path.clone()).collect(),
        });
    }

    if json {
        output::print_json(&matches)
    } else {
        output::print_listing(&matches, patterns);
        Ok(())
    }
}

fn cmd_which(config_path: Option<&Path>, pattern: &str, json: bool) -> filedet_core::Result<()> {
    let resolver = load_resolver(config_path)?;

    // A bare name missing from the working directory is looked up globally
    let matches = match resolver.resolve(pattern) {
        Err(FiledetError::NotFoundLocal { .. }) => {
            debug!(pattern, "not in working directory, searching roots");
            resolver.search(pattern)?
        }
        other => other?,
    };

    let searched = resolver.roots().map(|r| r.path.clone());
    let found = single_match(pattern, matches, searched)?;
    if json {
        output::print_json(std::slice::from_ref(&found))
    } else {
        println!("{}", found.path().display());
        Ok(())
    }
}

fn cmd_grep(
    config_path: Option<&Path>,
    term: String,
    directory: &Path,
    json: bool,
) -> filedet_core::Result<()> {
    use colored::Colorize;

    let dir = filedet_core::expand_tilde(&directory.to_string_lossy());
    if !dir.is_dir() {
        return Err(FiledetError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a directory: {}", directory.display()),
        )));
    }

    let resolver = load_resolver(config_path)?.with_content_filter(Some(term.clone()));
    let matches = resolver.search_in(&dir, "*")?;

    if json {
        return output::print_json(&matches);
    }

    if matches.is_empty() {
        println!("\nNo matches found for \"{}\" in {}\n", term, directory.display());
        return Ok(());
    }

    println!(
        "\nFound \"{}\" in {} files:\n",
        term.bold(),
        matches.len()
    );
    for (i, m) in matches.iter().enumerate() {
        println!("[{}] {}", i + 1, m.display_path());
    }
    println!();
    Ok(())
}

fn cmd_roots(config_path: Option<&Path>, json: bool) -> filedet_core::Result<()> {
    use colored::Colorize;

    let resolver = load_resolver(config_path)?;
    let roots: Vec<_> = resolver.roots().collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&roots)?);
        return Ok(());
    }

    if roots.is_empty() {
        println!("No search roots configured. Run 'filedet init' and edit the config.");
        return Ok(());
    }

    for root in roots {
        let status = if root.path.is_dir() {
            "ok".green()
        } else {
            "missing".red()
        };
        let mode = if root.recursive { "" } else { " (top level only)" };
        println!(
            "{:>3}  {}{}  [{}]",
            root.priority,
            root.path.display(),
            mode,
            status
        );
    }
    Ok(())
}
