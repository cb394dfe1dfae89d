//! `pack.toml`, the top-level modpack manifest
//!
//! Field declaration order is the canonical on-disk order; `write` relies on
//! serde emitting fields in that order.

use super::records::{self, RecordError};
use crate::application::session::FileSystemProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Canonical manifest file name inside a pack root
pub const PACK_FILE_NAME: &str = "pack.toml";

/// Parsed `pack.toml`
///
/// Keys other than the ones below (`author`, `description`, ...) are accepted
/// on read and dropped on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackFile {
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(rename = "pack-format")]
    pub pack_format: String,

    pub index: IndexLocation,

    pub versions: PackVersions,
}

/// `[index]` table: where the index lives and its content hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexLocation {
    pub file: String,

    #[serde(rename = "hash-format")]
    pub hash_format: String,

    pub hash: String,
}

/// `[versions]` table
///
/// Loader keys are alphabetical with `minecraft` in between, matching the
/// shape packwiz itself writes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PackVersions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fabric: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forge: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liteloader: Option<String>,

    pub minecraft: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quilt: Option<String>,
}

/// Mod loaders a pack can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModLoader {
    Forge,
    Fabric,
    Quilt,
    LiteLoader,
}

impl ModLoader {
    /// Lower-cased key used in `[versions]` and on the packwiz command line
    pub fn key(&self) -> &'static str {
        match self {
            ModLoader::Forge => "forge",
            ModLoader::Fabric => "fabric",
            ModLoader::Quilt => "quilt",
            ModLoader::LiteLoader => "liteloader",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "forge" => Some(Self::Forge),
            "fabric" => Some(Self::Fabric),
            "quilt" => Some(Self::Quilt),
            "liteloader" => Some(Self::LiteLoader),
            _ => None,
        }
    }
}

impl fmt::Display for ModLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModLoader::Forge => "Forge",
            ModLoader::Fabric => "Fabric",
            ModLoader::Quilt => "Quilt",
            ModLoader::LiteLoader => "LiteLoader",
        };
        f.write_str(name)
    }
}

impl PackVersions {
    /// Active loader: forge, then fabric, then quilt, otherwise liteloader
    pub fn mod_loader(&self) -> ModLoader {
        if self.forge.is_some() {
            ModLoader::Forge
        } else if self.fabric.is_some() {
            ModLoader::Fabric
        } else if self.quilt.is_some() {
            ModLoader::Quilt
        } else {
            ModLoader::LiteLoader
        }
    }

    pub fn loader_version(&self, loader: ModLoader) -> Option<&str> {
        match loader {
            ModLoader::Forge => self.forge.as_deref(),
            ModLoader::Fabric => self.fabric.as_deref(),
            ModLoader::Quilt => self.quilt.as_deref(),
            ModLoader::LiteLoader => self.liteloader.as_deref(),
        }
    }
}

impl PackFile {
    pub fn parse(path: &Path, content: &str) -> Result<Self, RecordError> {
        records::parse_toml(path, content)
    }

    pub fn read(fs: &dyn FileSystemProvider, path: &Path) -> Result<Self, RecordError> {
        let content = records::read_text(fs, path)?;
        Self::parse(path, &content)
    }

    /// Persist in canonical shape and return exactly what was written
    pub fn write(&self, fs: &dyn FileSystemProvider, path: &Path) -> Result<Self, RecordError> {
        let content = records::to_toml(path, self)?;
        fs.write_file(path, &content)
            .map_err(|e| RecordError::Write {
                path: path.to_path_buf(),
                message: format!("{e:#}"),
            })?;
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("pack_file.test.rs");
}
