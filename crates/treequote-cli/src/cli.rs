//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use treequote_models::ProjectStatus;

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    // Format: "0.3.0 (abc1234, 2026-01-29)"
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Treequote - cost-plus pricing for tree-service work
#[derive(Parser, Debug)]
#[command(name = "treequote")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding defaults.json
    #[arg(short, long, env = "TREEQUOTE_CONFIG_DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the hourly cost breakdown of a machine
    Equipment {
        /// Equipment record file
        file: PathBuf,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the true hourly cost of a crew member
    Labor {
        /// Base hourly wage
        #[arg(long)]
        wage: f64,

        /// Burden multiplier (1.0 = no burden)
        #[arg(long)]
        burden: f64,
    },

    /// Convert an hourly cost into a billing rate
    Margin {
        /// Hourly cost
        #[arg(long)]
        cost: f64,

        /// Target margin percentage
        #[arg(long)]
        margin: f64,
    },

    /// Snapshot a loadout from a library file
    Loadout {
        /// Loadout file
        file: PathBuf,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Quote a job
    Quote {
        /// Quote file
        file: PathBuf,

        /// Margin percentage when the request has none
        #[arg(short, long, env = "TREEQUOTE_MARGIN")]
        margin: Option<f64>,

        /// Buffer fraction when the job has none (0.10 = 10%)
        #[arg(short, long, env = "TREEQUOTE_BUFFER")]
        buffer: Option<f64>,

        /// Output format (table, json, brief)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Rank machines or loadouts by cost per unit of output
    Compare {
        /// Compare file
        file: PathBuf,

        /// Amount of output to produce
        #[arg(short, long)]
        target: f64,

        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Change the status of a project record
    Transition {
        /// Project record file
        file: PathBuf,

        /// New status
        #[arg(long)]
        to: ProjectStatus,

        /// Replace the record file with the result
        #[arg(short, long)]
        write: bool,
    },

    /// Record completion on an in-progress project
    Progress {
        /// Project record file
        file: PathBuf,

        /// Completion percentage
        #[arg(short, long)]
        percent: f64,

        /// Replace the record file with the result
        #[arg(short, long)]
        write: bool,
    },

    /// Reprice a quoted project against the current library
    Reprice {
        /// Project record file
        project: PathBuf,

        /// Loadout file with the current library
        loadout: PathBuf,

        /// Replace the record file with the result
        #[arg(short, long)]
        write: bool,
    },

    /// Mark one loadout as the default in a loadout list file
    SetDefault {
        /// File holding a JSON array of loadouts
        file: PathBuf,

        /// Id of the loadout to mark
        #[arg(short, long)]
        loadout: String,

        /// Replace the file with the result
        #[arg(short, long)]
        write: bool,
    },
}

/// Output format for breakdowns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Brief,
}

impl Cli {
    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
