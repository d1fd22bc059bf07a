//! ConfigStore: JSON persistence for the endpoint registry.
//!
//! The file is read once at startup and rewritten after each registry
//! mutation. Writes go to a temporary file in the same directory which is
//! then renamed over the target, so readers never observe a partial file.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::registry::Registry;

/// Default configuration file name, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "endpoints.json";

/// Where a loaded registry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Read from the configuration file.
    File,
    /// No file existed; the built-in bootstrap registry was used.
    Default,
}

/// Reads and writes the configuration file at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and deserialize the configuration file.
    pub fn load(&self) -> ConfigResult<Registry> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ConfigError::NotFound(self.path.clone())
            } else {
                ConfigError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let registry: Registry =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = ?self.path, endpoints = registry.len(), "configuration loaded");
        Ok(registry)
    }

    /// Load the file, or fall back to [`Registry::bootstrap`] when it does
    /// not exist. Parse and I/O errors are returned to the caller.
    pub fn load_or_default(&self) -> ConfigResult<(Registry, Origin)> {
        match self.load() {
            Ok(registry) => Ok((registry, Origin::File)),
            Err(ConfigError::NotFound(_)) => {
                info!(path = ?self.path, "no configuration file, using built-in default");
                Ok((Registry::bootstrap(), Origin::Default))
            }
            Err(e) => Err(e),
        }
    }

    /// Serialize the registry and atomically replace the configuration file.
    ///
    /// On failure the existing file is left as it was.
    pub fn save(&self, registry: &Registry) -> ConfigResult<()> {
        let content = to_pretty_json(registry)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io_err = |source| ConfigError::Io {
            path: self.path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&content).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!(path = ?self.path, endpoints = registry.len(), "configuration saved");
        Ok(())
    }

    /// Write the bootstrap registry to the configuration path.
    ///
    /// Refuses to replace an existing file unless `force` is set.
    pub fn generate(&self, force: bool) -> ConfigResult<Registry> {
        if !force && self.path.exists() {
            return Err(ConfigError::AlreadyExists(self.path.clone()));
        }
        let registry = Registry::bootstrap();
        self.save(&registry)?;
        info!(path = ?self.path, "default configuration generated");
        Ok(registry)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

/// Tab-indented JSON with a trailing newline.
fn to_pretty_json(registry: &Registry) -> ConfigResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    registry.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}
