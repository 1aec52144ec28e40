//! Record Access
//!
//! Record retrieval, creation, update and query execution.

pub mod executor;
pub mod normalize;
pub mod service;

pub use executor::RequestExecutor;
pub use normalize::{normalize_fields, normalize_record, normalize_value, row_object_type};
pub use service::*;
