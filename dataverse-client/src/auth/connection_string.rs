//! Connection-string parsing for Dataverse / D365 environments
//!
//! Parses the `Key=Value;Key=Value` connection strings used by the XrmTooling
//! ecosystem. Keys are matched case-insensitively and most settings accept
//! several alias spellings (e.g. `ServiceUri`, `Service Uri`, `Url`, `Server`).

use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::error::{Error, Result};

const SERVICE_URI: &[&str] = &["ServiceUri", "Service Uri", "Url", "Server"];
const USER_NAME: &[&str] = &["UserName", "User Name", "UserId", "User Id"];
const PASSWORD: &[&str] = &["Password"];
const DOMAIN: &[&str] = &["Domain"];
const HOME_REALM_URI: &[&str] = &["HomeRealmUri", "Home Realm Uri"];
const AUTH_TYPE: &[&str] = &["AuthType", "AuthenticationType"];
const REQUIRE_NEW_INSTANCE: &[&str] = &["RequireNewInstance"];
const CLIENT_ID: &[&str] = &["ClientId", "AppId", "ApplicationId"];
const REDIRECT_URI: &[&str] = &["RedirectUri", "ReplyUrl"];
const TOKEN_CACHE_STORE_PATH: &[&str] = &["TokenCacheStorePath"];
const LOGIN_PROMPT: &[&str] = &["LoginPrompt"];
const CERT_THUMBPRINT: &[&str] = &["CertificateThumbprint", "Thumbprint"];
const CERT_STORE_NAME: &[&str] = &["CertificateStoreName", "StoreName"];
const SKIP_DISCOVERY: &[&str] = &["SkipDiscovery"];
const INTEGRATED_SECURITY: &[&str] = &["Integrated Security"];
const CLIENT_SECRET: &[&str] = &["ClientSecret", "Secret"];

/// Well-known sample app registration used when an OAuth connection string
/// names neither a client id nor a redirect uri.
const SAMPLE_CLIENT_ID: &str = "51f81489-12ee-4a9e-aaae-a2591f45987d";
const SAMPLE_REDIRECT_URI: &str = "app://58145B91-0C36-4500-8554-080854F2AC97";

/// Authentication type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationType {
    /// Active Directory authentication.
    Ad,
    /// OAuth authentication.
    OAuth,
    /// Unsupported.
    Office365,
    /// Unsupported.
    Certificate,
    /// Unsupported.
    ClientSecret,
}

/// Interactive login prompt behavior requested by the connection string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginPromptType {
    Auto,
    Always,
    Never,
}

/// OAuth grant type implied by the connection string contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    /// Resource-owner password flow (username + password present).
    Password,
    /// Client-credential flow (client secret present).
    ClientCredential,
    /// Device-code flow (interactive login allowed).
    DeviceCode,
}

/// Connection string of a Dataverse / D365 environment.
#[derive(Debug, Clone, Default)]
pub struct ConnectionString {
    /// Url to the Dataverse / D365 environment.
    pub service_uri: Option<String>,
    /// User identification name.
    pub user_name: Option<String>,
    /// Password for the user name.
    pub password: Option<String>,
    /// Domain for the user. Used for AD authentication.
    pub domain: Option<String>,
    pub home_realm_uri: Option<String>,
    /// Authentication type. AD and OAuth are supported.
    pub auth_type: Option<AuthenticationType>,
    pub require_new_instance: Option<bool>,
    /// Client id for OAuth authentication.
    /// Defaults to the sample app registration when neither a client id nor a
    /// redirect uri is given.
    pub client_id: Option<String>,
    /// Redirect url for OAuth authentication.
    pub redirect_uri: Option<String>,
    /// Path to the token cache file. Used for OAuth authentication only.
    pub token_cache_store_path: Option<String>,
    pub login_prompt: Option<LoginPromptType>,
    pub cert_thumbprint: Option<String>,
    pub cert_store_name: Option<String>,
    pub skip_discovery: Option<bool>,
    pub integrated_security: Option<String>,
    /// Client secret for OAuth authentication.
    pub client_secret: Option<String>,
    raw: String,
}

impl ConnectionString {
    /// Parse a `Key=Value;Key=Value` connection string.
    ///
    /// Unknown keys are ignored; missing settings stay `None`. Parsing itself
    /// never fails — flow selection ([`ConnectionString::grant_type`]) is
    /// where unsupported combinations surface.
    pub fn parse(connection_string: &str) -> Self {
        let pairs = split_pairs(connection_string);

        let mut parsed = Self {
            auth_type: take_first(&pairs, AUTH_TYPE).and_then(|v| parse_auth_type(&v)),
            service_uri: take_first(&pairs, SERVICE_URI),
            user_name: take_first(&pairs, USER_NAME),
            password: take_first(&pairs, PASSWORD),
            client_id: take_first(&pairs, CLIENT_ID),
            client_secret: take_first(&pairs, CLIENT_SECRET),
            redirect_uri: take_first(&pairs, REDIRECT_URI),
            domain: take_first(&pairs, DOMAIN),
            token_cache_store_path: take_first(&pairs, TOKEN_CACHE_STORE_PATH),
            cert_store_name: take_first(&pairs, CERT_STORE_NAME),
            cert_thumbprint: take_first(&pairs, CERT_THUMBPRINT),
            home_realm_uri: take_first(&pairs, HOME_REALM_URI),
            require_new_instance: take_first(&pairs, REQUIRE_NEW_INSTANCE)
                .map(|v| parse_boolean(&v)),
            login_prompt: take_first(&pairs, LOGIN_PROMPT).and_then(|v| parse_login_prompt(&v)),
            skip_discovery: take_first(&pairs, SKIP_DISCOVERY).map(|v| parse_boolean(&v)),
            integrated_security: take_first(&pairs, INTEGRATED_SECURITY),
            raw: connection_string.to_string(),
        };

        if parsed.auth_type == Some(AuthenticationType::OAuth)
            && parsed.client_id.is_none()
            && parsed.redirect_uri.is_none()
        {
            debug!("no app registration in connection string, using the sample app");
            parsed.client_id = Some(SAMPLE_CLIENT_ID.to_string());
            parsed.redirect_uri = Some(SAMPLE_REDIRECT_URI.to_string());
        }

        parsed
    }

    /// Select the OAuth grant type this connection string implies.
    ///
    /// Mirrors the flow selection of the XrmTooling clients: username and
    /// password win, then a client secret, then the device-code flow when an
    /// interactive prompt is allowed.
    pub fn grant_type(&self) -> Result<GrantType> {
        if self.cert_store_name.is_some() || self.cert_thumbprint.is_some() {
            return Err(Error::InvalidConnectionString(
                "certificate authentication is not supported".to_string(),
            ));
        }

        if self.user_name.is_some() && self.password.is_some() {
            return Ok(GrantType::Password);
        }

        if self.client_secret.is_some() {
            return Ok(GrantType::ClientCredential);
        }

        match self.login_prompt {
            None | Some(LoginPromptType::Always) | Some(LoginPromptType::Auto) => {
                Ok(GrantType::DeviceCode)
            }
            Some(LoginPromptType::Never) => Err(Error::InvalidConnectionString(
                "unable to choose a grant type".to_string(),
            )),
        }
    }
}

impl fmt::Display for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Split into key/value pairs, keys lowercased, keys and values trimmed.
fn split_pairs(connection_string: &str) -> HashMap<String, String> {
    connection_string
        .split(';')
        .filter_map(|segment| {
            let (key, value) = segment.split_once('=')?;
            Some((key.trim().to_lowercase(), value.trim().to_string()))
        })
        .collect()
}

/// First non-empty value among the alias spellings of a setting.
fn take_first(pairs: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| pairs.get(&key.to_lowercase()))
        .find(|value| !value.is_empty())
        .cloned()
}

fn parse_auth_type(auth_type: &str) -> Option<AuthenticationType> {
    match auth_type.to_lowercase().as_str() {
        "oauth" => Some(AuthenticationType::OAuth),
        "certificate" => Some(AuthenticationType::Certificate),
        "clientsecret" => Some(AuthenticationType::ClientSecret),
        "office365" => Some(AuthenticationType::Office365),
        "ad" => Some(AuthenticationType::Ad),
        _ => None,
    }
}

fn parse_login_prompt(login_prompt: &str) -> Option<LoginPromptType> {
    match login_prompt.to_lowercase().as_str() {
        "auto" => Some(LoginPromptType::Auto),
        "always" => Some(LoginPromptType::Always),
        "never" => Some(LoginPromptType::Never),
        _ => None,
    }
}

fn parse_boolean(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_type_is_case_insensitive() {
        for text in ["AuthType=oauth", "AuthType=OAUTH"] {
            let cs = ConnectionString::parse(text);
            assert_eq!(cs.auth_type, Some(AuthenticationType::OAuth));
        }
    }

    #[test]
    fn test_login_prompt_is_case_insensitive() {
        for text in ["LoginPrompt=always", "LoginPrompt=ALWAYS"] {
            let cs = ConnectionString::parse(text);
            assert_eq!(cs.login_prompt, Some(LoginPromptType::Always));
        }
    }

    #[test]
    fn test_auth_type_alias_keys() {
        for text in ["AuthType=AD", "AuthenticationType=AD"] {
            let cs = ConnectionString::parse(text);
            assert_eq!(cs.auth_type, Some(AuthenticationType::Ad));
        }
    }

    #[test]
    fn test_service_uri_alias_keys() {
        for text in [
            "ServiceUri=https://foo.com",
            "Url=https://foo.com",
            "Service Uri=https://foo.com",
            "Server=https://foo.com",
        ] {
            let cs = ConnectionString::parse(text);
            assert_eq!(cs.service_uri.as_deref(), Some("https://foo.com"));
        }
    }

    #[test]
    fn test_user_name_alias_keys() {
        for text in [
            "UserName=foo",
            "User Name=foo",
            "UserId=foo",
            "User Id=foo",
        ] {
            let cs = ConnectionString::parse(text);
            assert_eq!(cs.user_name.as_deref(), Some("foo"));
        }
    }

    #[test]
    fn test_client_id_alias_keys() {
        for text in ["ClientId=foo", "AppId=foo", "ApplicationId=foo"] {
            let cs = ConnectionString::parse(text);
            assert_eq!(cs.client_id.as_deref(), Some("foo"));
        }
    }

    #[test]
    fn test_redirect_uri_alias_keys() {
        for text in ["RedirectUri=https://foo.com", "ReplyUrl=https://foo.com"] {
            let cs = ConnectionString::parse(text);
            assert_eq!(cs.redirect_uri.as_deref(), Some("https://foo.com"));
        }
    }

    #[test]
    fn test_oauth_without_app_registration_falls_back_to_sample_app() {
        let cs = ConnectionString::parse("AuthType=OAuth;UserName=foo; Password=bar");
        assert_eq!(cs.client_id.as_deref(), Some(SAMPLE_CLIENT_ID));
        assert_eq!(cs.redirect_uri.as_deref(), Some(SAMPLE_REDIRECT_URI));
    }

    #[test]
    fn test_oauth_with_custom_app_keeps_it() {
        let cs = ConnectionString::parse("AuthType=OAuth;ClientId=foo;RedirectUri=bar");
        assert_eq!(cs.client_id.as_deref(), Some("foo"));
        assert_eq!(cs.redirect_uri.as_deref(), Some("bar"));
    }

    #[test]
    fn test_values_are_trimmed() {
        let cs = ConnectionString::parse("AuthType=AD;UserName=foo; Password=bar");
        assert_eq!(cs.user_name.as_deref(), Some("foo"));
        assert_eq!(cs.password.as_deref(), Some("bar"));
    }

    #[test]
    fn test_grant_type_prefers_password_flow() {
        let cs = ConnectionString::parse("AuthType=OAuth;UserName=foo;Password=bar");
        assert_eq!(cs.grant_type().unwrap(), GrantType::Password);
    }

    #[test]
    fn test_grant_type_client_secret_flow() {
        let cs = ConnectionString::parse("AuthType=OAuth;ClientId=foo;ClientSecret=bar");
        assert_eq!(cs.grant_type().unwrap(), GrantType::ClientCredential);
    }

    #[test]
    fn test_grant_type_defaults_to_device_code() {
        let cs = ConnectionString::parse("AuthType=OAuth;ClientId=foo;RedirectUri=bar");
        assert_eq!(cs.grant_type().unwrap(), GrantType::DeviceCode);

        let cs = ConnectionString::parse("AuthType=OAuth;ClientId=foo;LoginPrompt=auto");
        assert_eq!(cs.grant_type().unwrap(), GrantType::DeviceCode);
    }

    #[test]
    fn test_grant_type_rejects_certificates() {
        let cs = ConnectionString::parse("AuthType=Certificate;Thumbprint=abc");
        assert!(matches!(
            cs.grant_type(),
            Err(Error::InvalidConnectionString(_))
        ));
    }

    #[test]
    fn test_grant_type_rejects_prompt_never_without_credentials() {
        let cs = ConnectionString::parse("AuthType=OAuth;ClientId=foo;LoginPrompt=never");
        assert!(matches!(
            cs.grant_type(),
            Err(Error::InvalidConnectionString(_))
        ));
    }

    #[test]
    fn test_display_returns_original_text() {
        let text = "AuthType=OAuth;ClientId=foo";
        assert_eq!(ConnectionString::parse(text).to_string(), text);
    }
}
