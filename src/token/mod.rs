//! Token Management
//!
//! Credential exchange, token caching and single-flight refresh.

pub mod cache;
pub mod grant;
pub mod manager;

pub use cache::*;
pub use grant::*;
pub use manager::*;
