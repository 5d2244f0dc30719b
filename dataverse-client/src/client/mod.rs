//! HTTP seam between the CRUD surface and its transport
//!
//! [`WebClient`] is the capability the client consumes: perform one configured
//! request, hand back body and headers, fail with a transport or service
//! error. Tests substitute their own implementation; production code uses the
//! reqwest-backed [`HttpClient`].

pub mod http;

pub use http::HttpClient;

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::error::Result;

/// One configured request against the Web API.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Path relative to the API base url, query string included.
    pub url: String,
    /// JSON body, when the method carries one.
    pub data: Option<Value>,
    pub headers: HashMap<String, String>,
}

impl RequestOptions {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            data: None,
            headers: HashMap::new(),
        }
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Body and headers of a completed request.
#[derive(Debug, Clone)]
pub struct Response {
    /// Parsed JSON body; `Null` when the service answered with no content.
    pub data: Value,
    pub headers: HashMap<String, String>,
}

/// Transport capability consumed by the Dataverse client.
#[async_trait]
pub trait WebClient: Send + Sync {
    async fn request(&self, options: RequestOptions) -> Result<Response>;
}
