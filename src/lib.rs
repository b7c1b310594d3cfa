//! Google Custom Search Engine integration for threat-intelligence lookups.
//!
//! The host hands this integration a batch of indicator entities (IPs,
//! hashes, domains, free text). Each entity is searched as an exact phrase
//! against a configured Custom Search Engine, and the result count plus the
//! raw response is returned per entity.
//!
//! # Architecture
//!
//! - **Startup**: TLS material and proxy settings are read once and a shared
//!   HTTP client is built (see [`startup`])
//! - **Lookup**: entities are searched with bounded concurrency through
//!   [`cse_search`]; one failure fails the batch
//! - **Options**: admin-supplied options are validated without ever failing
//! - **Host bridge**: newline-delimited JSON over stdin/stdout (see [`host`])

pub mod config;
pub mod entity;
pub mod error;
pub mod host;
pub mod integration;
pub mod lookup;
pub mod options;
pub mod startup;

pub use config::IntegrationConfig;
pub use entity::{Entity, EntityType};
pub use error::{IntegrationError, Result};
pub use integration::Integration;
pub use lookup::{LookupData, LookupResult};
pub use options::{LookupOptions, OptionViolation, validate_options};
pub use startup::startup;
