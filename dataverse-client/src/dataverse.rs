//! Dataverse Web API client
//!
//! Thin CRUD surface over the [`WebClient`] transport: every operation builds
//! a URL from the entity set name, the record id and the compiled query
//! options, attaches the standard OData headers and hands the request off.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::TokenProvider;
use crate::client::{HttpClient, RequestOptions, Response, WebClient};
use crate::error::{Error, Result};
use crate::query::{RetrieveMultipleOptions, RetrieveOptions};

/// WebAPI version addressed by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiVersion {
    #[default]
    #[serde(rename = "9.0")]
    V9_0,
    #[serde(rename = "9.1")]
    V9_1,
    #[serde(rename = "9.2")]
    V9_2,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V9_0 => "9.0",
            Self::V9_1 => "9.1",
            Self::V9_2 => "9.2",
        }
    }
}

/// Configuration of [`DataverseClient`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientOptions {
    /// WebAPI version. Default: 9.0.
    #[serde(default)]
    pub api_version: ApiVersion,
}

/// Collection page returned by [`DataverseClient::retrieve_multiple_records`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityCollection {
    /// Entities of the page.
    pub entities: Vec<Value>,
    /// Link to the next page, reduced to a `?`-prefixed query string. Pass it
    /// back as the options of the next `retrieve_multiple_records` call.
    pub next_link: Option<String>,
}

/// Dataverse client.
///
/// Performs CRUD operations on Dataverse / D365 CE entities.
pub struct DataverseClient {
    client: Box<dyn WebClient>,
}

impl DataverseClient {
    /// Create a client for the environment the token provider points at,
    /// with default options.
    pub fn new(token_provider: Arc<dyn TokenProvider>) -> Self {
        Self::with_options(token_provider, ClientOptions::default())
    }

    /// Create a client with explicit options.
    pub fn with_options(token_provider: Arc<dyn TokenProvider>, options: ClientOptions) -> Self {
        let base_url = format!(
            "{}/api/data/v{}/",
            token_provider.url(),
            options.api_version.as_str()
        );
        Self {
            client: Box::new(HttpClient::new(base_url, token_provider)),
        }
    }

    /// Create a client on top of a custom transport.
    pub fn from_web_client(client: Box<dyn WebClient>) -> Self {
        Self { client }
    }

    fn default_headers() -> HashMap<String, String> {
        HashMap::from([
            ("OData-Version".to_string(), "4.0".to_string()),
            ("OData-MaxVersion".to_string(), "4.0".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            (
                "Content-Type".to_string(),
                "application/json; charset=utf-8".to_string(),
            ),
        ])
    }

    async fn request(&self, mut options: RequestOptions) -> Result<Response> {
        let mut headers = Self::default_headers();
        headers.extend(std::mem::take(&mut options.headers));
        options.headers = headers;
        self.client.request(options).await
    }

    /// Gets a record from its id.
    ///
    /// `entity_set_name` is the plural collection name, e.g. `accounts`.
    pub async fn retrieve_record(
        &self,
        entity_set_name: &str,
        id: &str,
        options: Option<RetrieveOptions>,
    ) -> Result<Value> {
        let query = match &options {
            Some(options) => options.to_query_string()?,
            None => String::new(),
        };
        let url = format!("{}({}){}", entity_set_name, id, query);
        let response = self.request(RequestOptions::new(Method::GET, url)).await?;
        Ok(response.data)
    }

    /// Retrieves a collection of records.
    ///
    /// `options` can be a structured query, a raw `?...` string, or the
    /// `next_link` of a previous page. `max_page_size` caps the page through
    /// the `odata.maxpagesize` preference (service default: 5000).
    pub async fn retrieve_multiple_records(
        &self,
        entity_set_name: &str,
        options: Option<RetrieveMultipleOptions>,
        max_page_size: Option<u32>,
    ) -> Result<EntityCollection> {
        let query = match &options {
            Some(options) => options.to_query_string()?,
            None => String::new(),
        };

        let mut request = RequestOptions::new(Method::GET, format!("{}{}", entity_set_name, query));
        if let Some(page_size) = max_page_size {
            request = request.header("Prefer", format!("odata.maxpagesize={}", page_size));
        }

        let response = self.request(request).await?;
        let entities = response
            .data
            .get("value")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| {
                Error::UnexpectedResponse("collection response without a value array".to_string())
            })?;
        let next_link = response
            .data
            .get("@odata.nextLink")
            .and_then(Value::as_str)
            .map(strip_next_link_origin);

        Ok(EntityCollection {
            entities,
            next_link,
        })
    }

    /// Create a record. Returns the created record.
    pub async fn create_record(&self, entity_set_name: &str, data: Value) -> Result<Value> {
        let request = RequestOptions::new(Method::POST, entity_set_name)
            .data(data)
            .header("Prefer", "return=representation");
        let response = self.request(request).await?;
        Ok(response.data)
    }

    /// Update a record. Returns the updated record.
    pub async fn update_record(
        &self,
        entity_set_name: &str,
        id: &str,
        data: Value,
    ) -> Result<Value> {
        let request = RequestOptions::new(Method::PATCH, format!("{}({})", entity_set_name, id))
            .data(data)
            .header("Prefer", "return=representation");
        let response = self.request(request).await?;
        Ok(response.data)
    }

    /// Delete a record.
    pub async fn delete_record(&self, entity_set_name: &str, id: &str) -> Result<()> {
        let url = format!("{}({})", entity_set_name, urlencoding::encode(id));
        self.request(RequestOptions::new(Method::DELETE, url))
            .await?;
        Ok(())
    }

    /// Execute an unbound action.
    pub async fn execute_action(&self, action_name: &str, data: Value) -> Result<Response> {
        self.request(RequestOptions::new(Method::POST, action_name).data(data))
            .await
    }
}

/// Reduce an `@odata.nextLink` to the `?`-prefixed continuation string the
/// raw-options branch accepts.
fn strip_next_link_origin(link: &str) -> String {
    match link.rfind('?') {
        Some(index) => link[index..].to_string(),
        None => link.to_string(),
    }
}
