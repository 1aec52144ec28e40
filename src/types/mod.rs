//! Salesforce Types
//!
//! Configuration, token and record type definitions.

pub mod config;
pub mod record;
pub mod token;

pub use config::*;
pub use record::*;
pub use token::*;
