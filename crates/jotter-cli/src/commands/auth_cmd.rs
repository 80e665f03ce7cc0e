use crate::auth::ProfileContext;
use crate::cli::AuthCommands;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    let profile = ProfileContext::load(global_profile)?;
    let client = profile.auth_client()?;

    match command {
        AuthCommands::Register { email, password } => {
            client.register(&email, &password).await?;
            println!("Registered and signed in profile '{}' as {email}", profile.name);
        }
        AuthCommands::Login { email, password } => {
            client.login(&email, &password).await?;
            println!("Signed in profile '{}' as {email}", profile.name);
        }
        AuthCommands::Status => {
            let has_refresh = profile.session.refresh_token()?.is_some();
            if client.is_logged_in()? {
                println!(
                    "Profile '{}' is signed in against {}",
                    profile.name, profile.config.api_base_url
                );
            } else if has_refresh {
                println!(
                    "Profile '{}' has no access token. Run `jotter auth refresh` to get a new one.",
                    profile.name
                );
            } else {
                println!("Profile '{}' is not signed in.", profile.name);
            }
        }
        AuthCommands::Refresh => {
            client.refresh_token().await?;
            println!("Refreshed access token for profile '{}'", profile.name);
        }
        AuthCommands::Logout => {
            client.logout()?;
            println!("Signed out profile '{}'", profile.name);
        }
    }

    Ok(())
}
