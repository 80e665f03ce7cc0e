//! Jotter CLI - Color-coded notes from the terminal
//!
//! Talks to a Jotter notes server; every edit goes through the same autosave
//! controller the other front ends use.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_new;
use crate::commands::auth_cmd::run_auth;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::edit::run_edit;
use crate::commands::list::{run_categories, run_list, run_show};
use crate::error::CliError;

const DEFAULT_LOG_FILTER: &str = "jotter=info";

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Categories { json } => run_categories(json, profile).await,
        Commands::List { category, json } => run_list(category, json, profile).await,
        Commands::Show { id, json } => run_show(&id, json, profile).await,
        Commands::New {
            title,
            content,
            category,
        } => run_new(title, content, category, profile).await,
        Commands::Edit { id } => run_edit(id.as_deref(), profile).await,
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
        Commands::Config { command } => run_config(command, profile),
        Commands::Auth { command } => run_auth(command, profile).await,
    }
}
