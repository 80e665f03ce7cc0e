use std::env;

use crate::cli::ConfigCommands;
use crate::config_profiles::{default_config_path, normalize_text_option, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            api_url,
            autosave_ms,
            default_category,
            no_activate,
        } => run_config_init(
            global_profile,
            api_url,
            autosave_ms,
            default_category,
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

/// Write a profile, preferring explicit flags, then `JOTTER_*` env, then what was saved before.
pub fn run_config_init(
    profile_name: Option<&str>,
    api_url: Option<String>,
    autosave_ms: Option<u64>,
    default_category: Option<i64>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing_profile = config.profile(&profile_name).cloned().unwrap_or_default();

    let merged_api_url = normalize_text_option(api_url)
        .or_else(|| normalize_text_option(env::var("JOTTER_API_URL").ok()))
        .or(existing_profile.api_base_url);
    let merged_autosave_ms = match autosave_ms {
        Some(value) => Some(value),
        None => env_number("JOTTER_AUTOSAVE_DELAY_MS")?,
    }
    .or(existing_profile.autosave_delay_ms);
    let merged_default_category = match default_category {
        Some(value) => Some(value),
        None => env_number("JOTTER_DEFAULT_CATEGORY_ID")?,
    }
    .or(existing_profile.default_category_id);

    let profile = config.profile_mut_or_default(&profile_name);
    profile.api_base_url = merged_api_url;
    profile.autosave_delay_ms = merged_autosave_ms;
    profile.default_category_id = merged_default_category;
    profile.validate().map_err(CliError::Config)?;

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!("Profile '{profile_name}' initialized at {}", path.display());
    println!("Run `jotter auth login --email <email> --password <password>` to sign in.");
    Ok(())
}

pub fn run_config_show(profile_name: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let profile = config.profile(&profile_name).cloned().unwrap_or_default();
    let resolved = profile.client_config().map_err(CliError::Config)?;

    let path = default_config_path().map_err(CliError::Config)?;
    println!("Profile: {profile_name}");
    println!("Config file: {}", path.display());
    println!("{}", serde_json::to_string_pretty(&resolved)?);
    Ok(())
}

fn env_number<T: std::str::FromStr>(key: &str) -> Result<Option<T>, CliError> {
    let Some(raw) = normalize_text_option(env::var(key).ok()) else {
        return Ok(None);
    };
    raw.parse()
        .map(Some)
        .map_err(|_| CliError::Config(format!("{key} must be a number, got '{raw}'")))
}
