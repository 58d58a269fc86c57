//! HTTP response domain types

mod mapper;
mod received;
mod spec;

pub use mapper::{MappingError, map_record};
pub use received::HttpResponse;
pub use spec::{ResponseMismatch, ResponseSpec};
