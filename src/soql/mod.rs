//! SOQL
//!
//! Identifier classification and query text construction.

pub mod builder;
pub mod classifier;

pub use builder::*;
pub use classifier::*;
