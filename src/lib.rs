//! Salesforce Integration Module
//!
//! OAuth2 token management and generic record access for the Salesforce REST API.
//!
//! # Features
//!
//! - Client credentials and resource owner password grants
//! - Cached access token with a 5 minute safety margin and single-flight refresh
//! - Object type inference from record identifier prefixes
//! - SOQL retrieval queries with escaped literals
//! - Record retrieval, creation, update (with confirmatory re-read) and raw queries
//! - Normalization of heterogeneous JSON rows into flat scalar records
//!
//! # Example
//!
//! ```rust,ignore
//! use salesforce_integration::{salesforce_config, RecordService, SalesforceClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = salesforce_config()
//!         .client_id("my-consumer-key")
//!         .client_secret("my-consumer-secret")
//!         .token_url("https://my-domain.my.salesforce.com/services/oauth2/token")
//!         .object_alias("estimate", "pse__Estimate__c")
//!         .build()?;
//!
//!     let client = SalesforceClient::new(config)?;
//!
//!     // Object type is inferred from the "001" prefix.
//!     let account = client.records().get_record("001xx000003DGb2AAG").await?;
//!     println!("{}", serde_json::to_string_pretty(&account)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration, token and record data structures
//! - `error`: error hierarchy and boundary payloads
//! - `core`: HTTP transport and clock
//! - `token`: token cache, credential exchange and token manager
//! - `soql`: identifier classification and query construction
//! - `records`: request execution, normalization and the record service
//! - `builders`: fluent configuration builder
//! - `client`: high-level client combining all of the above

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod records;
pub mod soql;
pub mod token;
pub mod types;

// Re-export main client
pub use client::{mask_secret, ConfigDiagnostics, HealthReport, SalesforceClient};

// Re-export builders
pub use builders::{salesforce_config, SalesforceConfigBuilder};

// Re-export errors
pub use error::{
    get_user_message, AuthError, ConfigurationError, ErrorPayload, NetworkError, NotFoundError,
    ProtocolError, RemoteError, SalesforceError, SalesforceResult,
};

// Re-export types
pub use types::{
    // Config
    Credentials, GrantStrategy, SalesforceConfig,
    // Token
    Token, TokenResponse,
    // Record
    FieldMap, FieldValue, QueryResult, Record,
};

// Re-export core components
pub use self::core::{
    Clock, FixedClock, HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport, SystemClock,
};

// Re-export token management
pub use token::{
    create_mock_token_manager, DefaultTokenManager, InMemoryTokenCache, MockTokenManager,
    TokenCache, TokenManager, TokenManagerConfig, DEFAULT_CACHE_KEY,
};

// Re-export SOQL helpers
pub use soql::{build_retrieval_query, classify_identifier, escape_literal, DEFAULT_OBJECT_TYPE};

// Re-export record access
pub use records::{DefaultRecordService, RecordService};
