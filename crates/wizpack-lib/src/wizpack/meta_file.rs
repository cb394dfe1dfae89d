//! Per-asset metadata files (`*.pw.toml`)
//!
//! The provider is identified by the `[update]` table: `update.curseforge`,
//! `update.modrinth`, or none at all for files added by URL.

use super::records::{self, RecordError};
use crate::application::session::FileSystemProvider;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Suffix of every packwiz metadata file
pub const METAFILE_EXTENSION: &str = ".pw.toml";

/// Which game sides an asset is installed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Client,
    Server,
    #[default]
    Both,
}

/// How the installer obtains the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DownloadMode {
    #[default]
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "metadata:curseforge")]
    CurseForgeMetadata,
}

impl<'de> Deserialize<'de> for DownloadMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ModeVisitor;

        impl Visitor<'_> for ModeVisitor {
            type Value = DownloadMode;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("\"\", \"url\" or \"metadata:curseforge\"")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match v {
                    "" | "url" => Ok(DownloadMode::Url),
                    "metadata:curseforge" => Ok(DownloadMode::CurseForgeMetadata),
                    other => Err(E::invalid_value(Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_str(ModeVisitor)
    }
}

/// `[download]` of a CurseForge metafile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurseForgeDownload {
    pub hash_format: String,
    pub hash: String,
    pub mode: DownloadMode,
}

/// `[download]` of a file fetched from a direct URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlDownload {
    pub url: String,
    pub hash_format: String,
    pub hash: String,
}

/// `[update.curseforge]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurseForgeUpdate {
    #[serde(rename = "file-id")]
    pub file_id: u64,
    #[serde(rename = "project-id")]
    pub project_id: u64,
}

/// `[update.modrinth]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModrinthUpdate {
    #[serde(rename = "mod-id")]
    pub mod_id: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurseForgeMetaFile {
    pub path: PathBuf,
    pub name: String,
    pub filename: String,
    pub side: Side,
    pub download: CurseForgeDownload,
    pub update: CurseForgeUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModrinthMetaFile {
    pub path: PathBuf,
    pub name: String,
    pub filename: String,
    pub side: Side,
    pub download: UrlDownload,
    pub update: ModrinthUpdate,
}

/// Metafile created by `packwiz url add`; it has no update source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMetaFile {
    pub path: PathBuf,
    pub name: String,
    pub filename: String,
    pub side: Side,
    pub download: UrlDownload,
}

/// A parsed `.pw.toml`, keyed by provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaFile {
    CurseForge(CurseForgeMetaFile),
    Modrinth(ModrinthMetaFile),
    Url(UrlMetaFile),
}

#[derive(Deserialize)]
struct RawMetaFile {
    name: String,
    filename: String,
    #[serde(default)]
    side: Side,
    download: RawDownload,
    #[serde(default)]
    update: RawUpdate,
}

#[derive(Deserialize)]
struct RawDownload {
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "hash-format")]
    hash_format: String,
    hash: String,
    #[serde(default)]
    mode: DownloadMode,
}

#[derive(Deserialize, Default)]
struct RawUpdate {
    curseforge: Option<CurseForgeUpdate>,
    modrinth: Option<ModrinthUpdate>,
}

impl MetaFile {
    /// Parse metafile content; `path` is recorded on the result
    pub fn parse(path: &Path, content: &str) -> Result<Self, RecordError> {
        let raw: RawMetaFile = records::parse_toml(path, content)?;
        let path = path.to_path_buf();
        let RawDownload {
            url,
            hash_format,
            hash,
            mode,
        } = raw.download;

        match (raw.update.curseforge, raw.update.modrinth) {
            (Some(update), None) => Ok(MetaFile::CurseForge(CurseForgeMetaFile {
                path,
                name: raw.name,
                filename: raw.filename,
                side: raw.side,
                download: CurseForgeDownload {
                    hash_format,
                    hash,
                    mode,
                },
                update,
            })),
            (None, Some(update)) => {
                let url = url.ok_or_else(|| RecordError::UnknownMetaFile {
                    path: path.clone(),
                    reason: "modrinth metafile has no download url".to_string(),
                })?;
                Ok(MetaFile::Modrinth(ModrinthMetaFile {
                    path,
                    name: raw.name,
                    filename: raw.filename,
                    side: raw.side,
                    download: UrlDownload {
                        url,
                        hash_format,
                        hash,
                    },
                    update,
                }))
            }
            (None, None) => match url {
                Some(url) => Ok(MetaFile::Url(UrlMetaFile {
                    path,
                    name: raw.name,
                    filename: raw.filename,
                    side: raw.side,
                    download: UrlDownload {
                        url,
                        hash_format,
                        hash,
                    },
                })),
                None => Err(RecordError::UnknownMetaFile {
                    path,
                    reason: "no update source and no download url".to_string(),
                }),
            },
            (Some(_), Some(_)) => Err(RecordError::UnknownMetaFile {
                path,
                reason: "both curseforge and modrinth update sources".to_string(),
            }),
        }
    }

    pub fn read(fs: &dyn FileSystemProvider, path: &Path) -> Result<Self, RecordError> {
        let content = records::read_text(fs, path)?;
        Self::parse(path, &content)
    }

    /// Location the metafile was read from
    pub fn path(&self) -> &Path {
        match self {
            MetaFile::CurseForge(meta) => &meta.path,
            MetaFile::Modrinth(meta) => &meta.path,
            MetaFile::Url(meta) => &meta.path,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MetaFile::CurseForge(meta) => &meta.name,
            MetaFile::Modrinth(meta) => &meta.name,
            MetaFile::Url(meta) => &meta.name,
        }
    }

    pub fn filename(&self) -> &str {
        match self {
            MetaFile::CurseForge(meta) => &meta.filename,
            MetaFile::Modrinth(meta) => &meta.filename,
            MetaFile::Url(meta) => &meta.filename,
        }
    }

    pub fn side(&self) -> Side {
        match self {
            MetaFile::CurseForge(meta) => meta.side,
            MetaFile::Modrinth(meta) => meta.side,
            MetaFile::Url(meta) => meta.side,
        }
    }

    pub fn provider(&self) -> &'static str {
        match self {
            MetaFile::CurseForge(_) => "curseforge",
            MetaFile::Modrinth(_) => "modrinth",
            MetaFile::Url(_) => "url",
        }
    }
}

/// Short identifier of a metafile path: `mods/jei.pw.toml` -> `jei`
///
/// Takes the second path segment and drops the `.pw.toml` suffix length.
pub fn slug(file_path: &str) -> String {
    let segment = file_path.split('/').nth(1).unwrap_or(file_path);
    let keep = segment.len().saturating_sub(METAFILE_EXTENSION.len());
    segment.get(..keep).unwrap_or(segment).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("meta_file.test.rs");
}
