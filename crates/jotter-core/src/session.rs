//! Session tokens and where they are kept.
//!
//! The auth client and the notes API share one [`SessionContext`], which wraps
//! whatever [`TokenStore`] the host application provides (OS keyring for the
//! CLI, memory for tests and embedding).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fixed storage keys for the two bearer tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    Access,
    Refresh,
}

impl TokenKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access_token",
            Self::Refresh => "refresh_token",
        }
    }
}

/// Access and refresh tokens issued by a successful login
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("access", &"[REDACTED]")
            .field("refresh", &"[REDACTED]")
            .finish()
    }
}

/// Synchronous key-value storage for session tokens.
pub trait TokenStore: Clone + Send + Sync + 'static {
    fn get(&self, key: TokenKey) -> Result<Option<String>>;
    fn set(&self, key: TokenKey, value: &str) -> Result<()>;
    fn remove(&self, key: TokenKey) -> Result<()>;
}

/// Process-local token store
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<Mutex<HashMap<TokenKey, String>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: TokenKey) -> Result<Option<String>> {
        let guard = self
            .tokens
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<()> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: TokenKey) -> Result<()> {
        let mut guard = self
            .tokens
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.remove(&key);
        Ok(())
    }
}

/// Explicit session handle threaded through the API clients.
#[derive(Debug, Clone)]
pub struct SessionContext<S: TokenStore> {
    store: S,
}

impl<S: TokenStore> SessionContext<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(TokenKey::Access)?
            .filter(|token| !token.trim().is_empty()))
    }

    pub fn refresh_token(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get(TokenKey::Refresh)?
            .filter(|token| !token.trim().is_empty()))
    }

    /// Bearer token for an authenticated call, or an auth error if none is stored.
    pub fn require_access_token(&self) -> Result<String> {
        self.access_token()?
            .ok_or_else(|| Error::Auth("No access token found".to_string()))
    }

    pub fn store_session(&self, session: &Session) -> Result<()> {
        self.store.set(TokenKey::Access, &session.access)?;
        self.store.set(TokenKey::Refresh, &session.refresh)
    }

    pub fn store_access_token(&self, access: &str) -> Result<()> {
        self.store.set(TokenKey::Access, access)
    }

    /// Forget the access token. The refresh token is left in place.
    pub fn clear_access_token(&self) -> Result<()> {
        self.store.remove(TokenKey::Access)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            access: "secret-access-token".to_string(),
            refresh: "secret-refresh-token".to_string(),
        }
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let rendered = format!("{:?}", session());
        assert!(!rendered.contains("secret-access-token"));
        assert!(!rendered.contains("secret-refresh-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn store_and_clear_access_keeps_refresh() {
        let context = SessionContext::new(MemoryTokenStore::new());
        context.store_session(&session()).unwrap();
        assert_eq!(
            context.access_token().unwrap().as_deref(),
            Some("secret-access-token")
        );

        context.clear_access_token().unwrap();
        assert!(context.access_token().unwrap().is_none());
        assert_eq!(
            context.refresh_token().unwrap().as_deref(),
            Some("secret-refresh-token")
        );
    }

    #[test]
    fn require_access_token_fails_without_login() {
        let context = SessionContext::new(MemoryTokenStore::new());
        let error = context.require_access_token().unwrap_err();
        assert!(matches!(error, Error::Auth(_)));
    }

    #[test]
    fn token_keys_use_fixed_names() {
        assert_eq!(TokenKey::Access.as_str(), "access_token");
        assert_eq!(TokenKey::Refresh.as_str(), "refresh_token");
    }
}
