use clap::{Parser, Subcommand, ValueEnum};
use deepcode_client::RagStrategy;
use deepcode_config::{ContextMode, IndexMode};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Which files accompany a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ContextArg {
    /// Everything the backend has
    All,
    /// Only the selected files
    Selected,
}

impl From<ContextArg> for ContextMode {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::All => ContextMode::All,
            ContextArg::Selected => ContextMode::Selected,
        }
    }
}

/// RAG retrieval strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Search the existing index
    UseExisting,
    /// Index the files first
    Reindex,
}

impl From<StrategyArg> for RagStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::UseExisting => RagStrategy::UseExisting,
            StrategyArg::Reindex => RagStrategy::Reindex,
        }
    }
}

/// When an imported repository is embedded
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndexArg {
    /// Embed at import time
    Preindex,
    /// Import structure only
    Lazy,
}

impl From<IndexArg> for IndexMode {
    fn from(arg: IndexArg) -> Self {
        match arg {
            IndexArg::Preindex => IndexMode::Preindex,
            IndexArg::Lazy => IndexMode::Lazy,
        }
    }
}

#[derive(Parser)]
#[command(name = "deepcode")]
#[command(about = "deepcode - import projects, pick context, index and chat with your code")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/deepcode/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config file and DEEPCODE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

impl Cli {
    /// Effective log level: explicit level, then `--verbose`, then off
    pub fn effective_log_level(&self) -> LogLevel {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level,
            (None, true) => LogLevel::Debug,
            (None, false) => LogLevel::Off,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show backend login and GitHub connection state
    Auth,

    /// Build the workspace tree from local files and folders
    Tree {
        /// Files or folders to import
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Logical paths to select (repeatable)
        #[arg(short, long = "select")]
        select: Vec<String>,

        /// Also print the selected context files
        #[arg(long)]
        context: bool,
    },

    /// List GitHub repositories
    Repos {
        /// User or organization; defaults to the authenticated user
        #[arg(short, long)]
        owner: Option<String>,

        /// Case-insensitive filter on name and description
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// List models available on the backend
    Models,

    /// Import a GitHub repository through the import wizard
    Import {
        /// Repository as owner/repo
        repo: String,

        /// Branch; defaults to the repository's default branch
        #[arg(short, long)]
        branch: Option<String>,

        /// Only import this directory
        #[arg(long)]
        sub_path: Option<String>,

        /// Index at import time or later
        #[arg(long, value_enum)]
        index: Option<IndexArg>,

        /// Embedding model for indexing
        #[arg(long)]
        embed_model: Option<String>,

        /// Print the imported tree
        #[arg(long)]
        tree: bool,
    },

    /// Preview a local file or a file of a GitHub repository
    Preview {
        /// Path of the file (inside the repository when --repo is given)
        path: String,

        /// Repository as owner/repo
        #[arg(long)]
        repo: Option<String>,

        /// Branch of the repository
        #[arg(short, long, requires = "repo")]
        branch: Option<String>,
    },

    /// Index selected files of an imported repository
    Index {
        /// Repository as owner/repo
        repo: String,

        /// Files to index, relative to the repository (repeatable)
        #[arg(short, long = "select", required = true)]
        select: Vec<String>,

        /// Branch of the repository
        #[arg(short, long)]
        branch: Option<String>,

        /// Directory of the repository that was imported
        #[arg(long)]
        sub_path: Option<String>,

        /// Follow progress until the job ends
        #[arg(short, long)]
        watch: bool,
    },

    /// Show the indexing status of a project
    Status {
        /// Backend project id
        project_id: String,

        /// Keep polling until the job ends
        #[arg(short, long)]
        watch: bool,
    },

    /// Delete the index of a project
    DeleteIndex {
        /// Backend project id
        project_id: String,
    },

    /// Send one chat message
    Chat {
        /// The message
        message: String,

        /// Context sent with the message
        #[arg(short, long, value_enum, default_value = "all")]
        mode: ContextArg,

        /// Local files or folders to add to the workspace
        #[arg(short, long = "device")]
        device: Vec<PathBuf>,

        /// Logical paths to select (repeatable)
        #[arg(short, long = "select")]
        select: Vec<String>,

        /// Answer with retrieval over these projects (repeatable)
        #[arg(short, long = "project")]
        project: Vec<String>,

        /// Retrieval strategy when --project is given
        #[arg(long, value_enum, default_value = "reindex", requires = "project")]
        strategy: StrategyArg,

        /// Chat model; backend default when omitted
        #[arg(long)]
        model: Option<String>,
    },
}

/// Split `owner/repo`
pub fn parse_repo(value: &str) -> anyhow::Result<(String, String)> {
    match value.trim().split_once('/') {
        Some((owner, repo)) if !owner.trim().is_empty() && !repo.trim().is_empty() => {
            Ok((owner.trim().to_string(), repo.trim().to_string()))
        }
        _ => anyhow::bail!("expected a repository as owner/repo, got '{}'", value),
    }
}
