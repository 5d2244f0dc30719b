//! Authentication seam for the Dataverse Web API
//!
//! Token acquisition (OAuth flows, NTLM, caching, refresh) lives behind the
//! [`TokenProvider`] trait; the client only asks for a bearer token per
//! request. Connection strings select which flow an external provider should
//! run, see [`connection_string`].

pub mod connection_string;

pub use connection_string::{AuthenticationType, ConnectionString, GrantType, LoginPromptType};

use async_trait::async_trait;

use crate::error::Result;

/// Provides tokens for authentication to a Dataverse instance.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Url of the Dataverse environment, e.g. `https://org.crm.dynamics.com`.
    fn url(&self) -> &str;

    /// Gets a bearer token for the environment.
    async fn get_token(&self) -> Result<String>;
}

/// Token provider backed by a pre-acquired token.
///
/// Useful for tests and for callers that run their own acquisition flow.
/// The token is handed out as-is; expiry is the caller's concern.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    url: String,
    token: String,
}

impl StaticTokenProvider {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    fn url(&self) -> &str {
        &self.url
    }

    async fn get_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
