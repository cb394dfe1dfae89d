//! Command execution handlers
//!
//! Each handler receives the session, opens the pack at the session's
//! working directory and reports what changed.

use crate::application::cli::{AddSource, ExportFormat};
use crate::application::session::{CommandSession, Session};
use crate::application::{CliConfig, Commands};
use crate::wizpack::{
    AddRequest, CurseForgeAddOptions, CurseForgeExportOptions, DevInstance, ExportRequest,
    ExportSide, ExportTarget, InitOptions, MetaFile, ModLoader, ModrinthAddOptions,
    ModrinthExportOptions, Pack, ReconcileReport,
};
use anyhow::{Context, Result, bail};
use console::style;
use std::collections::BTreeMap;

/// Execute CLI commands with a live session
pub async fn execute_command(config: CliConfig) -> Result<()> {
    let session = CommandSession::new(config.app_config);

    let Some(command) = config.command else {
        println!("{}", style("wizpack - packwiz modpack front end").bold());
        println!("{}", style("Run 'wizpack --help' for usage information").dim());
        return Ok(());
    };

    execute_command_with_session(command, &session).await
}

/// Execute a specific command with a provided session (for testing)
pub async fn execute_command_with_session(command: Commands, session: &dyn Session) -> Result<()> {
    match command {
        Commands::Init {
            name,
            author,
            pack_version,
            minecraft_version,
            modloader,
        } => handle_init(session, name, author, pack_version, minecraft_version, modloader),
        Commands::Info => handle_info(session),
        Commands::List {
            resource_packs,
            other,
        } => handle_list(session, resource_packs, other),
        Commands::Add { source } => handle_add(session, source).await,
        Commands::AddUrl { name, url } => {
            let mut pack = open_pack(session)?;
            let report = pack
                .add_external(name.as_str(), url.as_str())
                .await
                .with_context(|| format!("Failed to add {url}"))?;
            print_report(&report);
            Ok(())
        }
        Commands::Update { slug, all } => handle_update(session, slug, all).await,
        Commands::Export {
            format,
            dir,
            file_name,
            side,
            no_restrict_domains,
        } => handle_export(session, format, ExportTarget { dir, file_name }, side, no_restrict_domains).await,
        Commands::Import { zip } => {
            let mut pack = open_pack(session)?;
            let report = pack
                .import_modpack(zip.as_str())
                .await
                .with_context(|| format!("Failed to import {zip}"))?;
            print_report(&report);
            Ok(())
        }
        Commands::Refresh => {
            let mut pack = open_pack(session)?;
            let report = pack.refresh().await.context("Failed to refresh index")?;
            print_report(&report);
            Ok(())
        }
        Commands::Remove { target } => {
            let mut pack = open_pack(session)?;
            let report = pack
                .remove(&target)
                .await
                .with_context(|| format!("Failed to remove {target}"))?;
            print_report(&report);
            Ok(())
        }
        Commands::Detect => {
            let mut pack = open_pack(session)?;
            let report = pack.detect().await.context("Failed to detect jars")?;
            print_report(&report);
            Ok(())
        }
        Commands::SetName { name } => {
            let mut pack = open_pack(session)?;
            pack.set_name(name.as_str()).context("Failed to rename pack")?;
            println!("{} {}", style("Renamed to").green(), pack.name());
            Ok(())
        }
        Commands::SetVersion { pack_version } => {
            let mut pack = open_pack(session)?;
            pack.set_version(pack_version.as_str())
                .context("Failed to set pack version")?;
            println!("{} {}", style("Version set to").green(), pack.version());
            Ok(())
        }
        Commands::Devpack => handle_devpack(session),
    }
}

fn open_pack(session: &dyn Session) -> Result<Pack> {
    let root = session.workdir()?;
    Pack::open(session, root.clone())
        .with_context(|| format!("Failed to load pack at {}", root.display()))
}

fn handle_init(
    session: &dyn Session,
    name: String,
    author: String,
    pack_version: String,
    minecraft_version: String,
    modloader: ModLoader,
) -> Result<()> {
    let root = session.workdir()?;
    let options = InitOptions {
        author,
        name,
        version: pack_version,
        minecraft_version,
        mod_loader: modloader,
    };

    let pack = Pack::initialize(session, root.clone(), options)
        .with_context(|| format!("Failed to initialize pack in {}", root.display()))?;

    println!(
        "{} {} {}",
        style("Created").green().bold(),
        pack.name(),
        style(pack.root_dir().display()).dim()
    );
    Ok(())
}

fn handle_info(session: &dyn Session) -> Result<()> {
    let pack = open_pack(session)?;
    let file = pack.file();
    let loader_version = pack
        .mod_loader_version()
        .map(str::to_string)
        .unwrap_or_else(|_| "(no version)".to_string());

    println!("{} {}", style(pack.name()).bold(), pack.version());
    println!("  minecraft      {}", file.versions.minecraft);
    println!("  loader         {} {}", pack.mod_loader(), loader_version);
    println!("  mods           {}", pack.mod_slugs().len());
    println!("  resource packs {}", pack.resource_pack_slugs().len());
    println!("  other files    {}", pack.other_files().len());
    Ok(())
}

fn handle_list(session: &dyn Session, resource_packs: bool, other: bool) -> Result<()> {
    let pack = open_pack(session)?;

    if other {
        for path in pack.other_files() {
            println!("{path}");
        }
        return Ok(());
    }

    let entries = if resource_packs {
        pack.resource_packs()
    } else {
        pack.mods()
    };
    print_meta_files(&entries);
    Ok(())
}

fn print_meta_files(entries: &BTreeMap<String, MetaFile>) {
    let width = entries.keys().map(String::len).max().unwrap_or(0);
    for (slug, meta) in entries {
        println!(
            "{slug:<width$}  {}  {}",
            meta.name(),
            style(meta.provider()).dim()
        );
    }
}

async fn handle_add(session: &dyn Session, source: AddSource) -> Result<()> {
    let request = match source {
        AddSource::Curseforge {
            query,
            category,
            file_id,
        } => AddRequest::CurseForge {
            query,
            options: CurseForgeAddOptions { category, file_id },
        },
        AddSource::Modrinth {
            query,
            project,
            version_id,
            version_filename,
        } => AddRequest::Modrinth {
            query,
            options: ModrinthAddOptions {
                project_id: project,
                version_filename,
                version_id,
            },
        },
    };

    let mut pack = open_pack(session)?;
    let report = pack.add(request).await.context("Failed to add project")?;
    print_report(&report);
    Ok(())
}

async fn handle_update(session: &dyn Session, slug: Option<String>, all: bool) -> Result<()> {
    let mut pack = open_pack(session)?;
    let report = match (slug, all) {
        (_, true) => pack.update_all().await.context("Failed to update projects")?,
        (Some(slug), false) => pack
            .update(slug.as_str())
            .await
            .with_context(|| format!("Failed to update {slug}"))?,
        (None, false) => bail!("Specify a slug to update, or --all"),
    };
    print_report(&report);
    Ok(())
}

async fn handle_export(
    session: &dyn Session,
    format: ExportFormat,
    target: ExportTarget,
    side: ExportSide,
    no_restrict_domains: bool,
) -> Result<()> {
    let request = match format {
        ExportFormat::Curseforge => ExportRequest::CurseForge {
            target,
            options: CurseForgeExportOptions { side },
        },
        ExportFormat::Modrinth => ExportRequest::Modrinth {
            target,
            options: ModrinthExportOptions {
                restrict_domains: !no_restrict_domains,
            },
        },
    };

    let mut pack = open_pack(session)?;
    let path = pack.export(request).await.context("Failed to export pack")?;
    println!("{} {}", style("Exported").green().bold(), path.display());
    Ok(())
}

fn handle_devpack(session: &dyn Session) -> Result<()> {
    let pack = open_pack(session)?;
    let instance = DevInstance::from_pack(&pack).context("Cannot describe a dev instance")?;
    let dir = instance
        .write_to(session.filesystem().as_ref(), pack.root_dir())
        .context("Failed to write dev instance")?;

    println!("{} {}", style("Wrote").green().bold(), dir.display());
    println!(
        "{}",
        style("Import it into MultiMC (or a fork) and keep `packwiz serve` running.").dim()
    );
    Ok(())
}

fn print_report(report: &ReconcileReport) {
    if report.is_empty() {
        println!("{}", style("No tracked files changed").dim());
        return;
    }
    for path in &report.created {
        println!("{} {path}", style("+").green());
    }
    for path in &report.updated {
        println!("{} {path}", style("~").yellow());
    }
    for path in &report.removed {
        println!("{} {path}", style("-").red());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("commands.test.rs");
}
