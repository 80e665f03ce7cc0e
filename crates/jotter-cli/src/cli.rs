use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "jotter")]
#[command(about = "Color-coded notes from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// CLI profile name for API and session configuration
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List categories and their colors
    Categories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List notes, newest first
    List {
        /// Only show notes in this category
        #[arg(long, value_name = "ID")]
        category: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single note
    Show {
        /// Note ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a note in one go
    #[command(alias = "add")]
    New {
        /// Note title
        #[arg(long, default_value = "")]
        title: String,
        /// Note content (read from stdin when omitted)
        #[arg(long)]
        content: Option<String>,
        /// Category ID (the profile's default category when omitted)
        #[arg(long, value_name = "ID")]
        category: Option<i64>,
    },
    /// Open the autosaving line editor, on a new note or an existing one
    Edit {
        /// Note ID to open; starts a new note when omitted
        id: Option<String>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Sign up, log in and manage stored tokens
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize or update profile config
    Init {
        /// Notes API base URL, including the /api prefix
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
        /// Quiet period before an edit is saved
        #[arg(long, value_name = "MS")]
        autosave_ms: Option<u64>,
        /// Category used for notes saved without one
        #[arg(long, value_name = "ID")]
        default_category: Option<i64>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved configuration for a profile
    Show,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Create an account and log in
    Register {
        /// Account email (also used as the username)
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Log in and store the session tokens in the keychain
    Login {
        /// Account email
        #[arg(long, value_name = "EMAIL")]
        email: String,
        /// Account password
        #[arg(long, value_name = "PASSWORD")]
        password: String,
    },
    /// Show whether the profile holds an access token
    Status,
    /// Exchange the stored refresh token for a new access token
    Refresh,
    /// Forget the stored access token
    Logout,
}
