//! pulse-core: data model, endpoint registry, and configuration store.
//!
//! The registry is the in-memory, ordered list of endpoints for one
//! session. The configuration store hydrates it from a JSON file at
//! startup and writes it back after every mutation.

pub mod error;
pub mod registry;
pub mod store;
pub mod types;

pub use error::{ConfigError, ConfigResult, RegistryError, RegistryResult};
pub use registry::Registry;
pub use store::{ConfigStore, Origin};
pub use types::*;
