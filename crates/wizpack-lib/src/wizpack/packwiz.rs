//! Packwiz command dispatcher
//!
//! Turns typed requests into packwiz argument lists and runs them through the
//! session's [`ProcessProvider`] with the pack root as working directory.
//! Requests are validated before anything is executed.

use super::pack_file::ModLoader;
use crate::application::session::{ProcessOutput, ProcessProvider};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors from packwiz operations
#[derive(Debug, Error)]
pub enum PackwizError {
    #[error("Packwiz not available: {0}")]
    NotAvailable(String),

    #[error("Command failed: {command}\n{stdout}")]
    CommandFailed {
        command: String,
        stdout: String,
        stderr: String,
    },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("Process execution failed: {source}")]
    ProcessFailed {
        #[from]
        source: std::io::Error,
    },
}

/// `curseforge add` options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurseForgeAddOptions {
    pub category: Option<String>,
    pub file_id: Option<u64>,
}

/// `modrinth add` options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModrinthAddOptions {
    pub project_id: Option<String>,
    pub version_filename: Option<String>,
    pub version_id: Option<String>,
}

/// What to add and from where
///
/// `query` is a slug, a search string or a project URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddRequest {
    CurseForge {
        query: String,
        options: CurseForgeAddOptions,
    },
    Modrinth {
        query: String,
        options: ModrinthAddOptions,
    },
}

impl AddRequest {
    pub fn curseforge(query: impl Into<String>) -> Self {
        AddRequest::CurseForge {
            query: query.into(),
            options: CurseForgeAddOptions::default(),
        }
    }

    pub fn modrinth(query: impl Into<String>) -> Self {
        AddRequest::Modrinth {
            query: query.into(),
            options: ModrinthAddOptions::default(),
        }
    }
}

/// Side a CurseForge export targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportSide {
    #[default]
    Client,
    Server,
}

impl ExportSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportSide::Client => "client",
            ExportSide::Server => "server",
        }
    }
}

/// Where an export is written, relative to the pack root
///
/// `dir` defaults to `.`; `file_name` excludes the extension and defaults to
/// `<pack name>-<pack version>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTarget {
    pub dir: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurseForgeExportOptions {
    pub side: ExportSide,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModrinthExportOptions {
    /// Restrict download domains to the ones modrinth.com allows
    pub restrict_domains: bool,
}

impl Default for ModrinthExportOptions {
    fn default() -> Self {
        Self {
            restrict_domains: true,
        }
    }
}

/// Export format plus its options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRequest {
    CurseForge {
        target: ExportTarget,
        options: CurseForgeExportOptions,
    },
    Modrinth {
        target: ExportTarget,
        options: ModrinthExportOptions,
    },
}

impl ExportRequest {
    pub fn curseforge() -> Self {
        ExportRequest::CurseForge {
            target: ExportTarget::default(),
            options: CurseForgeExportOptions::default(),
        }
    }

    pub fn modrinth() -> Self {
        ExportRequest::Modrinth {
            target: ExportTarget::default(),
            options: ModrinthExportOptions::default(),
        }
    }

    pub fn target(&self) -> &ExportTarget {
        match self {
            ExportRequest::CurseForge { target, .. } | ExportRequest::Modrinth { target, .. } => {
                target
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportRequest::CurseForge { .. } => ".zip",
            ExportRequest::Modrinth { .. } => ".mrpack",
        }
    }
}

/// Options for `packwiz init`; the latest loader release is always used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOptions {
    pub author: String,
    pub name: String,
    /// Defaults to `1.0.0`
    pub version: String,
    pub minecraft_version: String,
    pub mod_loader: ModLoader,
}

impl InitOptions {
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        minecraft_version: impl Into<String>,
        mod_loader: ModLoader,
    ) -> Self {
        Self {
            author: author.into(),
            name: name.into(),
            version: "1.0.0".to_string(),
            minecraft_version: minecraft_version.into(),
            mod_loader,
        }
    }
}

/// A single packwiz invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackwizCommand {
    Add(AddRequest),
    AddUrl { name: String, url: String },
    Update { slug: String },
    UpdateAll,
    /// `output` is relative to the pack root, extension included
    Export { request: ExportRequest, output: String },
    Import { zip_path: String },
    Refresh,
    Remove { slug: String },
    Detect,
    /// packwiz matches `--modloader` against the lower-case loader key; `-y`
    /// accepts its defaults instead of prompting
    Init(InitOptions),
}

fn require(value: &str, what: &str) -> Result<(), PackwizError> {
    if value.trim().is_empty() {
        return Err(PackwizError::InvalidRequest {
            reason: format!("{what} must not be empty"),
        });
    }
    Ok(())
}

fn require_opt(value: Option<&str>, what: &str) -> Result<(), PackwizError> {
    value.map_or(Ok(()), |v| require(v, what))
}

impl PackwizCommand {
    /// Reject requests packwiz would misinterpret
    pub fn validate(&self) -> Result<(), PackwizError> {
        match self {
            PackwizCommand::Add(AddRequest::CurseForge { query, options }) => {
                require(query, "curseforge query")?;
                require_opt(options.category.as_deref(), "category")
            }
            PackwizCommand::Add(AddRequest::Modrinth { query, options }) => {
                require(query, "modrinth query")?;
                require_opt(options.project_id.as_deref(), "project id")?;
                require_opt(options.version_id.as_deref(), "version id")?;
                require_opt(options.version_filename.as_deref(), "version filename")
            }
            PackwizCommand::AddUrl { name, url } => {
                require(name, "name")?;
                require(url, "url")
            }
            PackwizCommand::Update { slug } | PackwizCommand::Remove { slug } => {
                require(slug, "slug")
            }
            PackwizCommand::Export { request, output } => {
                let target = request.target();
                require_opt(target.dir.as_deref(), "export directory")?;
                require_opt(target.file_name.as_deref(), "export file name")?;
                require(output, "export path")
            }
            PackwizCommand::Import { zip_path } => require(zip_path, "modpack path"),
            PackwizCommand::Init(options) => {
                require(&options.name, "pack name")?;
                require(&options.author, "author")?;
                require(&options.version, "pack version")?;
                require(&options.minecraft_version, "minecraft version")
            }
            PackwizCommand::UpdateAll | PackwizCommand::Refresh | PackwizCommand::Detect => Ok(()),
        }
    }

    /// Argument list passed to the packwiz executable
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = Vec::new();
        let mut push = |items: &[&str]| args.extend(items.iter().map(|s| s.to_string()));

        match self {
            PackwizCommand::Add(AddRequest::CurseForge { query, options }) => {
                push(&["curseforge", "add", query]);
                if let Some(category) = &options.category {
                    push(&["--category", category]);
                }
                if let Some(file_id) = options.file_id {
                    push(&["--file-id", &file_id.to_string()]);
                }
                push(&["-y"]);
            }
            PackwizCommand::Add(AddRequest::Modrinth { query, options }) => {
                push(&["modrinth", "add", query]);
                if let Some(version_id) = &options.version_id {
                    push(&["--version", version_id]);
                }
                if let Some(project_id) = &options.project_id {
                    push(&["--project", project_id]);
                }
                if let Some(filename) = &options.version_filename {
                    push(&["--version-filename", filename]);
                }
                push(&["-y"]);
            }
            PackwizCommand::AddUrl { name, url } => push(&["url", "add", name, url]),
            PackwizCommand::Update { slug } => push(&["update", slug]),
            PackwizCommand::UpdateAll => push(&["update", "-a"]),
            PackwizCommand::Export { request, output } => match request {
                ExportRequest::CurseForge { options, .. } => push(&[
                    "curseforge",
                    "export",
                    "-o",
                    output,
                    "--side",
                    options.side.as_str(),
                ]),
                ExportRequest::Modrinth { options, .. } => {
                    push(&["modrinth", "export", "-o", output]);
                    if !options.restrict_domains {
                        push(&["--restrictDomains=false"]);
                    }
                }
            },
            PackwizCommand::Import { zip_path } => push(&["curseforge", "import", zip_path]),
            PackwizCommand::Refresh => push(&["refresh"]),
            PackwizCommand::Remove { slug } => push(&["remove", slug]),
            PackwizCommand::Detect => push(&["curseforge", "detect"]),
            PackwizCommand::Init(options) => {
                let loader = options.mod_loader.key();
                let latest = format!("--{loader}-latest");
                push(&[
                    "init",
                    "--name",
                    &options.name,
                    "--author",
                    &options.author,
                    "--version",
                    &options.version,
                    "--mc-version",
                    &options.minecraft_version,
                    "--modloader",
                    loader,
                    &latest,
                    "-y",
                ]);
            }
        }

        args
    }
}

/// Runs packwiz commands inside one pack root
pub struct Packwiz {
    bin: String,
    process: Arc<dyn ProcessProvider>,
    pack_dir: PathBuf,
    available: Option<bool>,
}

impl Packwiz {
    pub fn new(bin: impl Into<String>, process: Arc<dyn ProcessProvider>, pack_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            process,
            pack_dir: pack_dir.into(),
            available: None,
        }
    }

    pub fn bin(&self) -> &str {
        &self.bin
    }

    pub fn pack_dir(&self) -> &Path {
        &self.pack_dir
    }

    /// Check that the executable starts (cached once it does)
    fn ensure_packwiz(&mut self) -> Result<(), PackwizError> {
        if let Some(true) = self.available {
            return Ok(());
        }

        if !self.process.is_available(&self.bin) {
            return Err(PackwizError::NotAvailable(format!(
                "'{}' could not be started. Install from: https://packwiz.infra.link/installation/",
                self.bin
            )));
        }

        self.available = Some(true);
        Ok(())
    }

    /// Validate, then execute `command` in the pack root
    pub fn run(&mut self, command: &PackwizCommand) -> Result<ProcessOutput, PackwizError> {
        command.validate()?;
        self.ensure_packwiz()?;

        let args = command.args();
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        debug!(bin = %self.bin, args = ?args, dir = %self.pack_dir.display(), "running packwiz");

        let output = self
            .process
            .execute(&self.bin, &arg_refs, &self.pack_dir)
            .map_err(|e| PackwizError::ProcessFailed {
                source: std::io::Error::other(format!("{e:#}")),
            })?;

        if !output.success {
            return Err(PackwizError::CommandFailed {
                command: format!("{} {}", self.bin, args.join(" ")),
                stdout: output.stdout,
                stderr: output.stderr,
            });
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("packwiz.test.rs");
}
