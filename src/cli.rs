use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Read, query, edit and diff Firefox prefs.js snapshots
#[derive(Parser, Debug)]
#[command(name = "ffprefs", version)]
pub struct Cli {
    /// Profiles directory (default: $MOZ_PROFILES_DIR, then the platform location)
    #[arg(long, global = true)]
    pub profiles_dir: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which prefs.js to operate on
#[derive(Args, Debug, Clone)]
pub struct Source {
    /// Path to a prefs.js file
    #[arg(short, long, conflicts_with = "profile")]
    pub file: Option<PathBuf>,

    /// Profile name (default: "default")
    #[arg(short, long)]
    pub profile: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List profiles from profiles.ini as JSON
    Profile,

    /// Print preferences
    Show {
        #[command(flatten)]
        source: Source,

        /// Glob patterns to filter keys (OR logic), e.g. "privacy.*"
        #[arg(short = 'Q', long = "query", num_args = 1..)]
        query: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = OutputType::JsonObject)]
        output: OutputType,
    },

    /// Print a single value without JSON wrapping
    Get {
        #[command(flatten)]
        source: Source,

        key: String,

        /// Pretty-print a string value that holds a JSON document
        #[arg(long)]
        json: bool,
    },

    /// Set a value and rewrite the file
    Set {
        #[command(flatten)]
        source: Source,

        key: String,

        value: String,

        #[arg(short = 't', long = "type", value_enum, default_value_t = ValueType::Auto)]
        value_type: ValueType,

        /// Allow changing a value's type and editing a profile in use
        #[arg(long)]
        force: bool,
    },

    /// Remove a preference and rewrite the file
    Unset {
        #[command(flatten)]
        source: Source,

        key: String,

        /// Edit even when the profile is in use
        #[arg(long)]
        force: bool,
    },

    /// Report syntax errors, duplicate keys and unusual statements
    Check {
        #[command(flatten)]
        source: Source,
    },

    /// Rewrite the file in canonical form (sorted, standard escaping)
    Fmt {
        #[command(flatten)]
        source: Source,

        /// Only report whether the file is already canonical
        #[arg(long)]
        check: bool,
    },

    /// Compare two prefs.js files
    Diff {
        old: PathBuf,

        new: PathBuf,

        #[arg(short, long, value_enum, default_value_t = DiffOutput::Text)]
        output: DiffOutput,
    },

    /// Find prefs.js files below a directory
    Scan {
        root: PathBuf,

        #[arg(long)]
        max_depth: Option<usize>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    /// {"key": value, ...}
    JsonObject,
    /// [{"key", "value", "type", "explanation"}, ...]
    JsonArray,
    /// prefs.js text
    Prefs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// true/false become booleans, integers become integers, anything else a string
    Auto,
    Bool,
    Int,
    String,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffOutput {
    Text,
    Json,
}
