//! Salesforce Core Components
//!
//! HTTP transport and clock infrastructure.

pub mod clock;
pub mod transport;

pub use clock::*;
pub use transport::*;
