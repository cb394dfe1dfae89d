//! The pack index: every tracked file with its content hash

use super::records::{self, RecordError};
use crate::application::session::FileSystemProvider;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parsed index file (`index.toml` by convention)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFile {
    #[serde(rename = "hash-format")]
    pub hash_format: String,

    #[serde(default)]
    pub files: Vec<IndexEntry>,
}

/// One `[[files]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Path relative to the pack root, always `/`-separated
    pub file: String,

    pub hash: String,

    /// Per-entry override of the index hash format
    #[serde(rename = "hash-format", default, skip_serializing_if = "Option::is_none")]
    pub hash_format: Option<String>,

    /// The entry is itself a `.pw.toml` metadata file
    #[serde(default, skip_serializing_if = "is_false")]
    pub metafile: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub preserve: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl IndexEntry {
    pub fn new(file: impl Into<String>, hash: impl Into<String>, metafile: bool) -> Self {
        Self {
            file: file.into(),
            hash: hash.into(),
            hash_format: None,
            metafile,
            alias: None,
            preserve: false,
        }
    }
}

impl IndexFile {
    pub fn parse(path: &Path, content: &str) -> Result<Self, RecordError> {
        records::parse_toml(path, content)
    }

    pub fn read(fs: &dyn FileSystemProvider, path: &Path) -> Result<Self, RecordError> {
        let content = records::read_text(fs, path)?;
        Self::parse(path, &content)
    }

    pub fn entry(&self, file: &str) -> Option<&IndexEntry> {
        self.files.iter().find(|entry| entry.file == file)
    }

    pub fn to_toml(&self, path: &Path) -> Result<String, RecordError> {
        records::to_toml(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("index_file.test.rs");
}
