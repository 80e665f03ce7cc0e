//! Keychain-backed token storage and per-profile API clients.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use jotter_core::api::NotesApi;
use jotter_core::auth::AuthClient;
use jotter_core::config::ClientConfig;
use jotter_core::session::{SessionContext, TokenKey, TokenStore};
use jotter_core::{Error, Result};

use crate::config_profiles::{CliProfile, CliProfilesConfig};
use crate::error::CliError;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "jotter";

/// Token store keyed by profile, one keychain entry per token.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    profile_name: String,
}

impl KeyringTokenStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            profile_name: profile_name.to_string(),
        }
    }

    fn username(&self, key: TokenKey) -> String {
        format!("{}:{}", self.profile_name, key.as_str())
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self, key: TokenKey) -> Result<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username(key))
            .map_err(|error| Error::Storage(error.to_string()))
    }
}

impl TokenStore for KeyringTokenStore {
    #[cfg(not(test))]
    fn get(&self, key: TokenKey) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn get(&self, key: TokenKey) -> Result<Option<String>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.get(&self.username(key)).cloned())
    }

    #[cfg(not(test))]
    fn set(&self, key: TokenKey, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .map_err(|error| Error::Storage(error.to_string()))
    }

    #[cfg(test)]
    fn set(&self, key: TokenKey, value: &str) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.insert(self.username(key), value.to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn remove(&self, key: TokenKey) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(Error::Storage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn remove(&self, key: TokenKey) -> Result<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.remove(&self.username(key));
        Ok(())
    }
}

/// Everything a command needs to talk to the notes API as one profile.
pub struct ProfileContext {
    pub name: String,
    pub config: ClientConfig,
    pub session: SessionContext<KeyringTokenStore>,
}

impl ProfileContext {
    /// Resolve the active profile from disk, falling back to env and defaults.
    pub fn load(explicit_profile: Option<&str>) -> std::result::Result<Self, CliError> {
        let profiles = CliProfilesConfig::load().map_err(CliError::Config)?;
        let name = profiles.resolve_profile_name(explicit_profile);
        let profile = profiles.profile(&name).cloned().unwrap_or_default();
        Self::from_profile(&name, &profile)
    }

    pub fn from_profile(name: &str, profile: &CliProfile) -> std::result::Result<Self, CliError> {
        let config = profile.client_config().map_err(CliError::Config)?;
        tracing::debug!(profile = name, api = %config.api_base_url, "Resolved CLI profile");
        Ok(Self {
            name: name.to_string(),
            config,
            session: SessionContext::new(KeyringTokenStore::new(name)),
        })
    }

    pub fn auth_client(&self) -> Result<AuthClient<KeyringTokenStore>> {
        AuthClient::new(&self.config, self.session.clone())
    }

    /// Notes client for commands that cannot run without a stored token.
    pub fn notes_api(&self) -> std::result::Result<NotesApi<KeyringTokenStore>, CliError> {
        if self.session.access_token()?.is_none() {
            return Err(CliError::NotLoggedIn);
        }
        Ok(NotesApi::new(&self.config, self.session.clone())?)
    }
}
