use clap::{ArgAction, Args, Parser, Subcommand};
use seqren::history::LATEST;
use seqren::model::{ConflictStrategy, PaddingMode, RenameConfig, SortKey};
use std::path::PathBuf;

/// Environment variable that overrides the seqren home directory.
pub const HOME_ENV: &str = "SEQREN_HOME";

#[derive(Parser, Debug)]
#[command(name = "seqren", bin_name = "seqren", version)]
#[command(
    about = "Rename files to a numbered sequence, with conflict handling and undo",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,

    /// Directory for settings and history [env: SEQREN_HOME]
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub home: Option<PathBuf>,
}

/// Naming options shared by `preview` and `rename`. Anything left out falls
/// back to the last configuration used.
#[derive(Args, Debug, Clone)]
pub struct NamingArgs {
    /// Files to rename, in selection order
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Base name for the new file names
    #[arg(short = 'n', long = "name")]
    pub base_name: Option<String>,

    /// Text between base name and number
    #[arg(short, long)]
    pub separator: Option<String>,

    /// First number of the sequence
    #[arg(long)]
    pub start: Option<u32>,

    /// Digit count: auto, none or 1-9
    #[arg(short, long)]
    pub padding: Option<PaddingMode>,

    /// alphabetical, modified-asc, modified-desc, created-asc, created-desc, selection
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// skip, suffix, auto-increment or prompt
    #[arg(short, long)]
    pub conflict: Option<ConflictStrategy>,
}

impl NamingArgs {
    pub fn config(&self, last: &RenameConfig) -> RenameConfig {
        RenameConfig {
            base_name: self
                .base_name
                .clone()
                .unwrap_or_else(|| last.base_name.clone()),
            separator: self
                .separator
                .clone()
                .unwrap_or_else(|| last.separator.clone()),
            start_number: self.start.unwrap_or(last.start_number),
            padding: self.padding.unwrap_or(last.padding),
            sort: self.sort.unwrap_or(last.sort),
            conflict: self.conflict.unwrap_or(last.conflict),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what a rename would do, without touching any file
    #[command(alias = "p", display_order = 1)]
    Preview(NamingArgs),

    /// Rename files (asks for confirmation)
    #[command(alias = "r", display_order = 2)]
    Rename {
        #[command(flatten)]
        naming: NamingArgs,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Revert a logged session
    #[command(alias = "u", display_order = 3)]
    Undo {
        /// Session id, or `latest`
        #[arg(default_value = LATEST)]
        session: String,
    },

    /// Inspect or clear the rename history
    #[command(alias = "h", display_order = 4)]
    History {
        #[command(subcommand)]
        action: Option<HistoryCommands>,
    },

    /// Print the earliest recorded name of a file
    #[command(display_order = 5)]
    Origin {
        /// File to look up
        file: PathBuf,
    },

    /// Show or change where the history is stored
    #[command(display_order = 6)]
    Storage {
        /// New history file
        path: Option<PathBuf>,

        /// Copy the existing sessions into the new file
        #[arg(long)]
        migrate: bool,
    },

    /// Get or set configuration
    #[command(display_order = 7)]
    Config {
        /// Configuration key (e.g. padding)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List sessions, newest first
    #[command(alias = "ls")]
    List,

    /// Show every record of one session
    Show {
        /// Session id, or `latest`
        #[arg(default_value = LATEST)]
        session: String,
    },

    /// Forget every session
    Clear {
        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
