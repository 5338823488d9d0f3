//! git-sync CLI

use anyhow::Context;
use clap::{Parser, Subcommand};
use git_sync::{Config, Repository, SyncOptions, SyncReport};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

#[derive(Parser)]
#[command(name = "git-sync")]
#[command(about = "Sync the current branch with its remote in one step", long_about = None)]
struct Cli {
    /// Repository directory (defaults to current directory)
    #[arg(short = 'C', long, default_value = ".")]
    repo: PathBuf,

    /// YAML file with defaults for git binary, commit message and log level
    #[arg(long)]
    config: Option<PathBuf>,

    /// Logging level (debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Commit local changes, pull with rebase, and push
    Sync {
        /// Log mutating steps without running them
        #[arg(short, long)]
        dry_run: bool,

        /// Dump local and remote commit lists
        #[arg(short, long)]
        verbose: bool,

        /// Message for the auto-generated commit of local changes
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Show working tree status as JSON
    Status,

    /// List local branches
    Branches,

    /// List commits newest-first
    Log {
        /// Branch, tag or hash (defaults to the current branch)
        reference: Option<String>,

        /// Maximum number of commits
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            let Some(err) = err.downcast_ref::<git_sync::Error>() else {
                return ExitCode::FAILURE;
            };
            if let Some(suggestion) = err.suggestion() {
                eprintln!("Hint: {}", suggestion);
            }
            ExitCode::from(err.kind().exit_code())
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    init_logging(cli.log_level.as_deref().unwrap_or(&config.log_level))?;

    let repo = Repository::open_with(&cli.repo, &config.git)?;

    match cli.command {
        Commands::Sync {
            dry_run,
            verbose,
            message,
        } => {
            let mut options = config.sync_options(dry_run, verbose);
            if let Some(message) = message {
                options.commit_message = message;
            }
            sync_repository(&repo, &options)
        }
        Commands::Status => show_status(&repo),
        Commands::Branches => list_branches(&repo),
        Commands::Log { reference, limit } => list_commits(&repo, reference.as_deref(), limit),
    }
}

fn init_logging(level: &str) -> anyhow::Result<()> {
    let level: Level = level
        .parse()
        .with_context(|| format!("Invalid log level '{}'", level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
    Ok(())
}

fn sync_repository(repo: &Repository, options: &SyncOptions) -> anyhow::Result<()> {
    let report = repo
        .sync(options)
        .with_context(|| format!("Sync failed in {}", repo.root.display()))?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry run] " } else { "" };

    println!("{}Branch: {} ({})", prefix, report.branch, report.remote);
    println!("{}Ahead: {} commit(s)", prefix, report.ahead);
    println!("{}Behind: {} commit(s)", prefix, report.behind);
    if let Some(temp) = &report.temp_commit {
        match temp.hash() {
            Some(hash) => println!("{}Local changes committed as {} on {}", prefix, hash, temp.branch()),
            None => println!("{}Local changes would be committed on {}", prefix, temp.branch()),
        }
    }

    if report.is_noop() {
        println!("{}Already in sync.", prefix);
    } else {
        let actions: Vec<String> = report
            .actions
            .iter()
            .map(|action| action.to_string())
            .collect();
        println!("{}Actions: {}", prefix, actions.join(" -> "));
    }
}

fn show_status(repo: &Repository) -> anyhow::Result<()> {
    let status = repo.status()?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn list_branches(repo: &Repository) -> anyhow::Result<()> {
    for branch in repo.branches()? {
        let marker = if branch.is_current { "*" } else { " " };
        let tracking = branch
            .tracking
            .as_ref()
            .map(|tracking| tracking.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{} {} {} {}", marker, branch.name, branch.short_hash(), tracking);
    }
    Ok(())
}

fn list_commits(repo: &Repository, reference: Option<&str>, limit: Option<usize>) -> anyhow::Result<()> {
    for commit in repo.commits(reference, limit)? {
        println!("{} {}", commit.short_hash(), commit.message);
    }
    Ok(())
}
