//! OData query options for the Dataverse Web API
//!
//! Turns a structured description of a query (selected fields, filter groups,
//! ordering, paging, expansions) into the query string appended to an entity
//! set path. Raw pre-encoded strings are accepted as well, as long as they
//! start with `?` — that is how the next link of a previous page flows back in.

pub mod filters;
pub mod options;
pub mod orderby;
pub mod value;

pub use filters::{ComparisonOperator, Condition, Filter, FilterType, Operator, QueryFunction};
pub use options::{
    Expand, MultipleQueryOptions, QueryOptions, RetrieveMultipleOptions, RetrieveOptions,
};
pub use orderby::{Order, OrderBy};
pub use value::FilterValue;
