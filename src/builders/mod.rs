//! Builders
//!
//! Fluent builder patterns for Salesforce configuration.

pub mod config;

pub use config::{salesforce_config, SalesforceConfigBuilder};
