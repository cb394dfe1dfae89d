//! Shared read/parse helpers for the packwiz TOML records

use crate::application::session::FileSystemProvider;
use serde::{Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing pack records
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to read {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Unrecognized metafile {}: {reason}", path.display())]
    UnknownMetaFile { path: PathBuf, reason: String },
}

pub(crate) fn read_text(fs: &dyn FileSystemProvider, path: &Path) -> Result<String, RecordError> {
    fs.read_to_string(path).map_err(|e| RecordError::Read {
        path: path.to_path_buf(),
        message: format!("{e:#}"),
    })
}

pub(crate) fn parse_toml<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T, RecordError> {
    toml::from_str(content).map_err(|source| RecordError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn to_toml<T: Serialize>(path: &Path, value: &T) -> Result<String, RecordError> {
    toml::to_string(value).map_err(|source| RecordError::Serialize {
        path: path.to_path_buf(),
        source,
    })
}
