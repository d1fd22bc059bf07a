//! Registry: ordered, in-memory endpoint collection.
//!
//! Endpoints are addressed by their 0-based position. Positions shift
//! after a removal, so an index is only meaningful until the next mutation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::types::{DelayPolicy, Endpoint, RetryPolicy};

/// URL seeded into a fresh configuration.
pub const BOOTSTRAP_URL: &str = "https://github.com/natanmatosz";

/// The ordered endpoint list. Serializes as the configuration file body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    endpoints: Vec<Endpoint>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in registry used when no configuration file exists yet:
    /// one endpoint, 3 attempts, 5 seconds apart.
    pub fn bootstrap() -> Self {
        Self {
            endpoints: vec![Endpoint::new(
                BOOTSTRAP_URL,
                RetryPolicy::new(3, DelayPolicy::seconds(5.0)),
            )],
        }
    }

    /// Append an endpoint. Only an empty URL is rejected here; malformed
    /// URLs surface when the endpoint is probed.
    pub fn add(&mut self, endpoint: Endpoint) -> RegistryResult<()> {
        if endpoint.url.trim().is_empty() {
            return Err(RegistryError::EmptyUrl);
        }
        debug!(url = %endpoint.url, index = self.endpoints.len(), "endpoint added");
        self.endpoints.push(endpoint);
        Ok(())
    }

    /// Remove and return the endpoint at `index`.
    pub fn remove(&mut self, index: usize) -> RegistryResult<Endpoint> {
        let len = self.endpoints.len();
        if index >= len {
            return Err(RegistryError::IndexOutOfRange { index, len });
        }
        let removed = self.endpoints.remove(index);
        debug!(url = %removed.url, index, "endpoint removed");
        Ok(removed)
    }

    pub fn list(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn get(&self, index: usize) -> Option<&Endpoint> {
        self.endpoints.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Endpoint> {
        self.endpoints.iter()
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl From<Vec<Endpoint>> for Registry {
    fn from(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Endpoint;
    type IntoIter = std::slice::Iter<'a, Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
