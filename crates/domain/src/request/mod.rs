//! HTTP request domain types

mod body;
mod builder;
mod header;
mod method;
mod query;
mod spec;
mod template;

pub use body::{RequestBody, RequestBodyKind};
pub use builder::{RequestBuilder, ResolvedRequest};
pub use header::{Header, Headers};
pub use method::HttpMethod;
pub use query::{QueryParam, QueryParams};
pub use spec::RequestSpec;
pub use template::{PathParams, PathTemplate};
