//! MultiMC-style development instance
//!
//! The instance runs packwiz-installer-bootstrap before every launch against
//! `packwiz serve` on localhost, so the game always matches the working tree.

use super::pack::{Pack, PackError};
use super::pack_file::ModLoader;
use crate::application::session::FileSystemProvider;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const INSTANCE_CFG: &str = "instance.cfg";
pub const MMC_PACK_JSON: &str = "mmc-pack.json";

/// Local address `packwiz serve` listens on
pub const SERVE_URL: &str = "http://localhost:8080/pack.toml";

#[derive(Debug, Error)]
pub enum DevpackError {
    #[error(transparent)]
    Pack(#[from] PackError),

    #[error("Failed to encode mmc-pack.json: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to write {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

/// `mmc-pack.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MmcPack {
    pub components: Vec<MmcComponent>,
    #[serde(rename = "formatVersion")]
    pub format_version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MmcComponent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,
    pub uid: String,
    pub version: String,
}

/// Component uid MultiMC uses for a loader
pub fn loader_uid(loader: ModLoader) -> &'static str {
    match loader {
        ModLoader::Forge => "net.minecraftforge",
        ModLoader::Fabric => "net.fabricmc.fabric-loader",
        ModLoader::Quilt => "org.quiltmc.quilt-loader",
        ModLoader::LiteLoader => "com.mumfrey.liteloader",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevInstance {
    /// `devpack-<minecraft>-<Loader>-<loader version>`
    pub slug: String,
    pub instance_cfg: String,
    pub mmc_pack: MmcPack,
}

impl DevInstance {
    pub fn from_pack(pack: &Pack) -> Result<Self, DevpackError> {
        let file = pack.file();
        let loader = pack.mod_loader();
        let loader_version = pack.mod_loader_version()?.to_string();
        let minecraft = file.versions.minecraft;

        let instance_cfg = format!(
            "iconKey=default\n\
             OverrideCommands=true\n\
             PreLaunchCommand=\"$INST_JAVA\" -jar packwiz-installer-bootstrap.jar {SERVE_URL} -g\n\
             name={} Dev Modpack",
            file.name
        );

        let mmc_pack = MmcPack {
            components: vec![
                MmcComponent {
                    important: Some(true),
                    uid: "net.minecraft".to_string(),
                    version: minecraft.clone(),
                },
                MmcComponent {
                    important: None,
                    uid: loader_uid(loader).to_string(),
                    version: loader_version.clone(),
                },
            ],
            format_version: 1,
        };

        Ok(Self {
            slug: format!("devpack-{minecraft}-{loader}-{loader_version}"),
            instance_cfg,
            mmc_pack,
        })
    }

    pub fn mmc_pack_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.mmc_pack)
    }

    /// Write the instance under `<root>/<slug>/` and return that directory
    pub fn write_to(&self, fs: &dyn FileSystemProvider, root: &Path) -> Result<PathBuf, DevpackError> {
        let dir = root.join(&self.slug);
        let write_err = |path: &Path, e: anyhow::Error| DevpackError::Write {
            path: path.to_path_buf(),
            message: format!("{e:#}"),
        };

        let game_dir = dir.join(".minecraft");
        fs.create_dir_all(&game_dir)
            .map_err(|e| write_err(&game_dir, e))?;

        let cfg_path = dir.join(INSTANCE_CFG);
        fs.write_file(&cfg_path, &self.instance_cfg)
            .map_err(|e| write_err(&cfg_path, e))?;

        let json_path = dir.join(MMC_PACK_JSON);
        fs.write_file(&json_path, &self.mmc_pack_json()?)
            .map_err(|e| write_err(&json_path, e))?;

        info!(dir = %dir.display(), "wrote dev instance");
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("devpack.test.rs");
}
