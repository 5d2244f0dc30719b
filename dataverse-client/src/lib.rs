//! A Rust client for the Microsoft Dataverse / Dynamics 365 CE Web API
//!
//! The crate covers connection configuration, authentication-flow selection,
//! request construction and a structured OData query-option builder. Token
//! acquisition itself stays behind the [`TokenProvider`] trait so any OAuth or
//! NTLM implementation can plug in.
//!
//! Query options compile to the exact OData v4 query string the Web API
//! expects:
//!
//! ```
//! use dataverse_client::{Condition, Filter, MultipleQueryOptions};
//!
//! let options = MultipleQueryOptions {
//!     select: vec!["name".to_string()],
//!     filters: vec![Filter::and(vec![Condition::equals("statecode", 0)])],
//!     top: Some(10),
//!     ..Default::default()
//! };
//! assert_eq!(
//!     options.to_query_string(),
//!     "?$select=name&$filter=(statecode eq 0)&$top=10"
//! );
//! ```
//!
//! CRUD operations run through [`DataverseClient`]:
//!
//! ```no_run
//! use std::sync::Arc;
//! use dataverse_client::{DataverseClient, StaticTokenProvider};
//!
//! # async fn example() -> dataverse_client::Result<()> {
//! let provider = StaticTokenProvider::new("https://org.crm.dynamics.com", "token");
//! let client = DataverseClient::new(Arc::new(provider));
//!
//! let page = client
//!     .retrieve_multiple_records("accounts", Some("?$select=name&$top=2".into()), None)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod dataverse;
pub mod error;
pub mod query;

pub use auth::{
    AuthenticationType, ConnectionString, GrantType, LoginPromptType, StaticTokenProvider,
    TokenProvider,
};
pub use client::{HttpClient, RequestOptions, Response, WebClient};
pub use dataverse::{ApiVersion, ClientOptions, DataverseClient, EntityCollection};
pub use error::{Error, Result};
pub use query::{
    ComparisonOperator, Condition, Expand, Filter, FilterType, FilterValue, MultipleQueryOptions,
    Operator, Order, OrderBy, QueryFunction, QueryOptions, RetrieveMultipleOptions,
    RetrieveOptions,
};
