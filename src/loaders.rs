//! Input loading utilities
//!
//! Reads XML text from files, standard input or in-memory strings, applying
//! the size limit before any parsing happens.

use crate::error::{Error, Result};
use crate::limits::Limits;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where XML text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File on disk
    Path(PathBuf),
    /// Standard input
    Stdin,
    /// In-memory text
    String(String),
}

impl Location {
    /// Interpret a command-line argument: `-` means standard input
    pub fn from_arg(arg: impl AsRef<Path>) -> Self {
        let path = arg.as_ref();
        if path == Path::new("-") {
            Location::Stdin
        } else {
            Location::Path(path.to_path_buf())
        }
    }
}

/// Resource loader for XML input
#[derive(Debug, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Load a resource as a string
    pub fn load(&self, location: &Location) -> Result<String> {
        let content = match location {
            Location::Path(path) => fs::read_to_string(path).map_err(|e| {
                Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
            })?,
            Location::Stdin => {
                let mut content = String::new();
                std::io::stdin().read_to_string(&mut content)?;
                content
            }
            Location::String(s) => s.clone(),
        };

        self.limits.check_xml_size(content.len())?;
        Ok(content)
    }
}
