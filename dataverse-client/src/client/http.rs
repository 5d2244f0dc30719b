//! reqwest-backed [`WebClient`] implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde_json::Value;

use super::{RequestOptions, Response, WebClient};
use crate::auth::TokenProvider;
use crate::error::{Error, Result};

/// [`WebClient`] backed by a shared reqwest client.
///
/// Resolves a bearer token through the configured [`TokenProvider`] for every
/// request and unwraps OData error bodies into [`Error::Service`].
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
}

impl HttpClient {
    /// Create a client rooted at `base_url` (trailing slash included).
    pub fn new(base_url: impl Into<String>, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token_provider,
        }
    }
}

#[async_trait]
impl WebClient for HttpClient {
    async fn request(&self, options: RequestOptions) -> Result<Response> {
        let url = format!("{}{}", self.base_url, options.url);
        debug!("{} {}", options.method, url);

        let token = self.token_provider.get_token().await?;

        let mut request = self
            .client
            .request(options.method, &url)
            .bearer_auth(token);
        for (name, value) in &options.headers {
            request = request.header(name, value);
        }
        if let Some(data) = &options.data {
            request = request.json(data);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|text| (name.to_string(), text.to_string()))
            })
            .collect::<HashMap<_, _>>();

        let body = response.text().await?;
        let data = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body)
                .map_err(|err| Error::UnexpectedResponse(format!("invalid JSON body: {err}")))?
        };

        if !status.is_success() {
            return Err(service_error(status, &data));
        }

        Ok(Response { data, headers })
    }
}

/// Pull code and message out of an OData error body, falling back to the HTTP
/// status when the body carries no error object.
fn service_error(status: StatusCode, data: &Value) -> Error {
    match data.get("error") {
        Some(error) => Error::Service {
            code: error
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        None => Error::Service {
            code: status.as_str().to_string(),
            message: status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_service_error_prefers_odata_error_body() {
        let body = json!({"error": {"code": "0x80040217", "message": "entity does not exist"}});
        let error = service_error(StatusCode::NOT_FOUND, &body);
        match error {
            Error::Service { code, message } => {
                assert_eq!(code, "0x80040217");
                assert_eq!(message, "entity does not exist");
            }
            other => panic!("expected a service error, got {other:?}"),
        }
    }

    #[test]
    fn test_service_error_falls_back_to_http_status() {
        let error = service_error(StatusCode::BAD_GATEWAY, &Value::Null);
        match error {
            Error::Service { code, message } => {
                assert_eq!(code, "502");
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected a service error, got {other:?}"),
        }
    }
}
