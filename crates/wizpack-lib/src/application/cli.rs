use crate::primitives::ConfigError;
use crate::wizpack::{ExportSide, ModLoader};
use clap::{Parser, Subcommand, ValueEnum};

use super::config::AppConfig;

/// wizpack CLI - drive packwiz and keep an eye on what it changed
#[derive(Debug, Clone, Parser)]
#[command(name = "wizpack")]
#[command(about = "Scriptable front end for packwiz modpacks")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global configuration options
    #[command(flatten)]
    pub config: AppConfig,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Configuration loaded from CLI
pub struct CliConfig {
    pub app_config: AppConfig,
    pub command: Option<Commands>,
}

impl CliConfig {
    /// Parse the command line and layer it over `.env` files and the environment
    pub fn load() -> Result<Self, ConfigError> {
        AppConfig::load_env_files()?;
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        Ok(Self {
            app_config: AppConfig::resolve(cli.config)?,
            command: cli.command,
        })
    }
}

/// Available wizpack commands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Create a new pack with the latest release of a mod loader
    Init {
        #[arg(long)]
        name: String,

        #[arg(long)]
        author: String,

        #[arg(long, default_value = "1.0.0")]
        pack_version: String,

        #[arg(long = "mc-version")]
        minecraft_version: String,

        /// forge, fabric, quilt or liteloader
        #[arg(long, value_parser = parse_mod_loader)]
        modloader: ModLoader,
    },

    /// Show pack name, version and loader
    Info,

    /// List mods (default), resource packs or other tracked files
    List {
        #[arg(long, conflicts_with = "other")]
        resource_packs: bool,

        #[arg(long)]
        other: bool,
    },

    /// Add a project from CurseForge or Modrinth
    Add {
        #[command(subcommand)]
        source: AddSource,
    },

    /// Add a file hosted at an arbitrary URL
    AddUrl { name: String, url: String },

    /// Update one project, or all with --all
    Update {
        #[arg(conflicts_with = "all")]
        slug: Option<String>,

        #[arg(short, long)]
        all: bool,
    },

    /// Export a distributable archive
    Export {
        #[arg(value_enum)]
        format: ExportFormat,

        /// Output directory relative to the pack root
        #[arg(long)]
        dir: Option<String>,

        /// Archive name without extension
        #[arg(long)]
        file_name: Option<String>,

        /// CurseForge only
        #[arg(long, value_enum, default_value_t = ExportSide::Client)]
        side: ExportSide,

        /// Modrinth only: allow download hosts modrinth.com does not
        #[arg(long)]
        no_restrict_domains: bool,
    },

    /// Import a CurseForge modpack archive
    Import { zip: String },

    /// Rebuild the index from the files on disk
    Refresh,

    /// Remove a project by slug or metafile path, or delete a tracked file
    Remove { target: String },

    /// Create metafiles for jars CurseForge recognizes
    Detect,

    /// Rename the pack
    SetName { name: String },

    /// Change the pack version
    SetVersion {
        #[arg(value_name = "VERSION")]
        pack_version: String,
    },

    /// Write a MultiMC dev instance that syncs from `packwiz serve`
    Devpack,
}

#[derive(Debug, Clone, Subcommand)]
pub enum AddSource {
    Curseforge {
        /// Slug, search text or project URL
        query: String,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        file_id: Option<u64>,
    },

    Modrinth {
        /// Slug, search text or project URL
        query: String,

        #[arg(long)]
        project: Option<String>,

        #[arg(long)]
        version_id: Option<String>,

        #[arg(long)]
        version_filename: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Curseforge,
    Modrinth,
}

fn parse_mod_loader(value: &str) -> Result<ModLoader, String> {
    ModLoader::parse(value).ok_or_else(|| {
        format!("unknown mod loader '{value}' (expected forge, fabric, quilt or liteloader)")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("cli.test.rs");
}
