//! In-memory mirror of a packwiz pack
//!
//! A [`Pack`] owns the parsed manifest, the index, every metafile the index
//! flags, and the set of other tracked paths. Every mutation runs packwiz in
//! the pack root and then reconciles the mirror against the files packwiz
//! left behind. Only entries whose index hash changed are re-read.

use super::index_file::{IndexEntry, IndexFile};
use super::meta_file::{self, METAFILE_EXTENSION, MetaFile};
use super::pack_file::{ModLoader, PACK_FILE_NAME, PackFile};
use super::packwiz::{AddRequest, ExportRequest, InitOptions, Packwiz, PackwizCommand, PackwizError};
use super::records::RecordError;
use crate::application::session::{FileSystemProvider, Session};
use indicatif::ProgressStyle;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{Instrument, Span, debug, info};
use tracing_indicatif::span_ext::IndicatifSpanExt;

const MODS_DIR: &str = "mods/";
const RESOURCE_PACKS_DIR: &str = "resourcepacks/";
const READ_PROGRESS_TEMPLATE: &str = "{spinner} reading metafiles {pos}/{len}";

/// Errors from pack mirror operations
#[derive(Debug, Error)]
pub enum PackError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Packwiz(#[from] PackwizError),

    #[error(
        "Invalid input \"{value}\". Expected a metafile slug or path, or the path of a tracked non-metafile"
    )]
    InvalidInput { value: String },

    #[error("Pack declares no {loader} version")]
    MissingLoaderVersion { loader: ModLoader },

    #[error("Failed to remove {}: {message}", path.display())]
    RemoveFailed { path: PathBuf, message: String },

    #[error("Metafile read task failed: {0}")]
    Reconcile(String),
}

/// Index paths touched by one reconciliation pass, each list sorted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    fn sort(&mut self) {
        self.created.sort();
        self.updated.sort();
        self.removed.sort();
    }
}

pub struct Pack {
    root_dir: PathBuf,
    pack_file_path: PathBuf,
    index_file_path: PathBuf,
    fs: Arc<dyn FileSystemProvider>,
    packwiz: Packwiz,
    file: PackFile,
    index: IndexFile,
    meta_files: BTreeMap<String, MetaFile>,
    other_files: BTreeSet<String>,
}

impl Pack {
    /// Load the pack rooted at `root_dir`
    ///
    /// Reads the manifest, the index and every metafile synchronously. Any
    /// missing or malformed file fails the whole load.
    pub fn new(
        root_dir: impl Into<PathBuf>,
        fs: Arc<dyn FileSystemProvider>,
        packwiz: Packwiz,
    ) -> Result<Self, PackError> {
        let root_dir = root_dir.into();
        let pack_file_path = root_dir.join(PACK_FILE_NAME);
        let file = PackFile::read(fs.as_ref(), &pack_file_path)?;

        let index_file_path = root_dir.join(&file.index.file);
        let index = IndexFile::read(fs.as_ref(), &index_file_path)?;

        let mut meta_files = BTreeMap::new();
        let mut other_files = BTreeSet::new();
        for entry in &index.files {
            if entry.metafile {
                let meta = MetaFile::read(fs.as_ref(), &root_dir.join(&entry.file))?;
                meta_files.insert(entry.file.clone(), meta);
            } else {
                other_files.insert(entry.file.clone());
            }
        }

        debug!(
            root = %root_dir.display(),
            metafiles = meta_files.len(),
            other = other_files.len(),
            "loaded pack"
        );

        Ok(Self {
            root_dir,
            pack_file_path,
            index_file_path,
            fs,
            packwiz,
            file,
            index,
            meta_files,
            other_files,
        })
    }

    /// Load a pack with the session's providers and configured packwiz binary
    pub fn open(session: &dyn Session, root_dir: impl Into<PathBuf>) -> Result<Self, PackError> {
        let root_dir = root_dir.into();
        let packwiz = Packwiz::new(
            session.config().app_config().packwiz.clone(),
            session.process(),
            root_dir.clone(),
        );
        Self::new(root_dir, session.filesystem(), packwiz)
    }

    /// Run `packwiz init` in `root_dir`, then load the new pack
    pub fn initialize(
        session: &dyn Session,
        root_dir: impl Into<PathBuf>,
        options: InitOptions,
    ) -> Result<Self, PackError> {
        let root_dir = root_dir.into();
        session
            .filesystem()
            .create_dir_all(&root_dir)
            .map_err(|e| RecordError::Write {
                path: root_dir.clone(),
                message: format!("{e:#}"),
            })?;

        let mut packwiz = Packwiz::new(
            session.config().app_config().packwiz.clone(),
            session.process(),
            root_dir.clone(),
        );
        packwiz.run(&PackwizCommand::Init(options))?;
        info!(root = %root_dir.display(), "initialized pack");
        Self::new(root_dir, session.filesystem(), packwiz)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn pack_file_path(&self) -> &Path {
        &self.pack_file_path
    }

    pub fn index_file_path(&self) -> &Path {
        &self.index_file_path
    }

    pub fn file(&self) -> PackFile {
        self.file.clone()
    }

    pub fn index(&self) -> IndexFile {
        self.index.clone()
    }

    /// Every metafile keyed by its path relative to the root
    pub fn meta_files(&self) -> BTreeMap<String, MetaFile> {
        self.meta_files.clone()
    }

    /// Tracked paths that are not metafiles
    pub fn other_files(&self) -> BTreeSet<String> {
        self.other_files.clone()
    }

    pub fn mods(&self) -> BTreeMap<String, MetaFile> {
        self.under(MODS_DIR)
    }

    pub fn mod_slugs(&self) -> Vec<String> {
        self.slugs_under(MODS_DIR)
    }

    pub fn resource_packs(&self) -> BTreeMap<String, MetaFile> {
        self.under(RESOURCE_PACKS_DIR)
    }

    pub fn resource_pack_slugs(&self) -> Vec<String> {
        self.slugs_under(RESOURCE_PACKS_DIR)
    }

    fn under(&self, prefix: &str) -> BTreeMap<String, MetaFile> {
        self.meta_files
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(path, meta)| (meta_file::slug(path), meta.clone()))
            .collect()
    }

    fn slugs_under(&self, prefix: &str) -> Vec<String> {
        self.meta_files
            .keys()
            .filter(|path| path.starts_with(prefix))
            .map(|path| meta_file::slug(path))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.file.name
    }

    pub fn version(&self) -> &str {
        &self.file.version
    }

    /// Rewrite the manifest with a new name
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), PackError> {
        let next = PackFile {
            name: name.into(),
            ..self.file.clone()
        };
        self.file = next.write(self.fs.as_ref(), &self.pack_file_path)?;
        Ok(())
    }

    /// Rewrite the manifest with a new version
    pub fn set_version(&mut self, version: impl Into<String>) -> Result<(), PackError> {
        let next = PackFile {
            version: version.into(),
            ..self.file.clone()
        };
        self.file = next.write(self.fs.as_ref(), &self.pack_file_path)?;
        Ok(())
    }

    pub fn mod_loader(&self) -> ModLoader {
        self.file.versions.mod_loader()
    }

    pub fn mod_loader_version(&self) -> Result<&str, PackError> {
        let loader = self.mod_loader();
        self.file
            .versions
            .loader_version(loader)
            .ok_or(PackError::MissingLoaderVersion { loader })
    }

    /// Add a project from CurseForge or Modrinth
    pub async fn add(&mut self, request: AddRequest) -> Result<ReconcileReport, PackError> {
        self.run_and_reconcile(PackwizCommand::Add(request)).await
    }

    /// Add a file hosted at an arbitrary URL
    pub async fn add_external(
        &mut self,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<ReconcileReport, PackError> {
        self.run_and_reconcile(PackwizCommand::AddUrl {
            name: name.into(),
            url: url.into(),
        })
        .await
    }

    pub async fn update(&mut self, slug: impl Into<String>) -> Result<ReconcileReport, PackError> {
        self.run_and_reconcile(PackwizCommand::Update { slug: slug.into() })
            .await
    }

    pub async fn update_all(&mut self) -> Result<ReconcileReport, PackError> {
        self.run_and_reconcile(PackwizCommand::UpdateAll).await
    }

    /// Write a distributable archive and return its path
    ///
    /// The mirror is not reconciled; exporting does not change tracked files.
    pub async fn export(&mut self, request: ExportRequest) -> Result<PathBuf, PackError> {
        let target = request.target();
        let dir = target.dir.clone().unwrap_or_else(|| ".".to_string());
        let file_name = target
            .file_name
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.file.name, self.file.version));
        let output = format!("{dir}/{file_name}{}", request.extension());

        self.packwiz.run(&PackwizCommand::Export {
            request,
            output: output.clone(),
        })?;

        let path = self.root_dir.join(&output);
        info!(path = %path.display(), "exported pack");
        Ok(path)
    }

    /// Import a CurseForge modpack archive
    pub async fn import_modpack(
        &mut self,
        zip_path: impl Into<String>,
    ) -> Result<ReconcileReport, PackError> {
        self.run_and_reconcile(PackwizCommand::Import {
            zip_path: zip_path.into(),
        })
        .await
    }

    /// Rebuild the index from disk
    pub async fn refresh(&mut self) -> Result<ReconcileReport, PackError> {
        self.run_and_reconcile(PackwizCommand::Refresh).await
    }

    /// Remove a tracked file
    ///
    /// `target` is either the path of a tracked non-metafile, which is
    /// deleted before refreshing, or a metafile path or slug, which is
    /// handed to `packwiz remove`.
    pub async fn remove(&mut self, target: &str) -> Result<ReconcileReport, PackError> {
        if self.other_files.contains(target) {
            let path = self.root_dir.join(target);
            self.fs
                .remove_file(&path)
                .map_err(|e| PackError::RemoveFailed {
                    path: path.clone(),
                    message: format!("{e:#}"),
                })?;
            debug!(path = %path.display(), "deleted tracked file");
            return self.refresh().await;
        }

        let slug = self
            .resolve_slug(target)
            .ok_or_else(|| PackError::InvalidInput {
                value: target.to_string(),
            })?;
        self.run_and_reconcile(PackwizCommand::Remove { slug }).await
    }

    fn resolve_slug(&self, target: &str) -> Option<String> {
        if self.meta_files.contains_key(target) {
            let slug = meta_file::slug(target);
            if !slug.is_empty() {
                return Some(slug);
            }
            // nested metafile such as `mods/sub/name.pw.toml`
            return target
                .rsplit('/')
                .next()
                .and_then(|name| name.strip_suffix(METAFILE_EXTENSION))
                .filter(|name| !name.is_empty())
                .map(str::to_string);
        }
        if target.is_empty() {
            return None;
        }
        self.meta_files
            .keys()
            .map(|path| meta_file::slug(path))
            .find(|slug| slug == target)
    }

    /// Create metafiles for `.jar`s CurseForge recognizes
    pub async fn detect(&mut self) -> Result<ReconcileReport, PackError> {
        self.run_and_reconcile(PackwizCommand::Detect).await
    }

    async fn run_and_reconcile(
        &mut self,
        command: PackwizCommand,
    ) -> Result<ReconcileReport, PackError> {
        self.packwiz.run(&command)?;
        let report = self.reconcile().await?;
        info!(
            command = command.args().first().map(String::as_str).unwrap_or_default(),
            created = report.created.len(),
            updated = report.updated.len(),
            removed = report.removed.len(),
            "pack updated"
        );
        Ok(report)
    }

    /// Bring the mirror in line with the manifest and index on disk
    ///
    /// Nothing beyond the manifest is read while the index hash is
    /// unchanged. A failed metafile read aborts the pass; entries inserted
    /// before the failure stay in place.
    async fn reconcile(&mut self) -> Result<ReconcileReport, PackError> {
        let before_hash = self.file.index.hash.clone();
        self.file = PackFile::read(self.fs.as_ref(), &self.pack_file_path)?;

        let mut report = ReconcileReport::default();
        if self.file.index.hash == before_hash {
            debug!("index hash unchanged");
            return Ok(report);
        }

        let next_index = IndexFile::read(self.fs.as_ref(), &self.index_file_path)?;
        let previous: HashMap<String, IndexEntry> = std::mem::replace(&mut self.index, next_index)
            .files
            .into_iter()
            .map(|entry| (entry.file.clone(), entry))
            .collect();

        let mut present = HashSet::with_capacity(self.index.files.len());
        let mut reads = JoinSet::new();

        for entry in &self.index.files {
            present.insert(entry.file.as_str());

            let before = previous.get(&entry.file);
            let flipped = before.is_some_and(|b| b.metafile != entry.metafile);
            let created = before.is_none() || flipped;
            let updated = !created && before.is_some_and(|b| b.hash != entry.hash);
            if !created && !updated {
                continue;
            }

            if flipped {
                if entry.metafile {
                    self.other_files.remove(&entry.file);
                } else {
                    self.meta_files.remove(&entry.file);
                }
            }

            if created {
                report.created.push(entry.file.clone());
            } else {
                report.updated.push(entry.file.clone());
            }

            if !entry.metafile {
                if created {
                    self.other_files.insert(entry.file.clone());
                }
                continue;
            }

            let fs = Arc::clone(&self.fs);
            let relative = entry.file.clone();
            let path = self.root_dir.join(&relative);
            reads.spawn_blocking(move || {
                let meta = MetaFile::read(fs.as_ref(), &path);
                (relative, meta)
            });
        }

        for (path, entry) in &previous {
            if present.contains(path.as_str()) {
                continue;
            }
            if entry.metafile {
                self.meta_files.remove(path);
            } else {
                self.other_files.remove(path);
            }
            report.removed.push(path.clone());
        }

        let span = crate::progress_span!("reconcile", total = reads.len());
        match ProgressStyle::with_template(READ_PROGRESS_TEMPLATE) {
            Ok(style) => span.pb_set_style(&style),
            Err(e) => debug!(error = %e, "progress template rejected"),
        }
        span.pb_set_length(reads.len() as u64);

        let meta_files = &mut self.meta_files;
        async {
            while let Some(joined) = reads.join_next().await {
                let (relative, meta) = joined.map_err(|e| PackError::Reconcile(e.to_string()))?;
                meta_files.insert(relative, meta?);
                Span::current().pb_inc(1);
            }
            Ok::<(), PackError>(())
        }
        .instrument(span)
        .await?;

        report.sort();
        debug!(?report, "reconciled pack");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("pack.test.rs");
}
