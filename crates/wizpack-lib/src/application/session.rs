//! Command session architecture
//!
//! Each command execution creates a session that owns its providers. The
//! filesystem and process providers are shared behind `Arc` because a
//! [`Pack`](crate::wizpack::Pack) keeps them for its whole lifetime and fans
//! metafile reads out onto tokio's blocking pool.

use crate::application::config::AppConfig;
use crate::Result;
use anyhow::Context;
use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Provider trait for filesystem operations
pub trait FileSystemProvider: Send + Sync {
    /// Get current working directory
    fn current_dir(&self) -> Result<PathBuf>;

    /// Read entire file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write string content to file, replacing it
    fn write_file(&self, path: &Path, content: &str) -> Result<()>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a file
    fn remove_file(&self, path: &Path) -> Result<()>;
}

/// Process execution output
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Provider trait for process execution
pub trait ProcessProvider: Send + Sync {
    /// Execute a command with given arguments in working directory
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<ProcessOutput>;

    /// Whether `command` can be started at all
    fn is_available(&self, command: &str) -> bool;
}

/// Provider trait for configuration access
pub trait ConfigProvider {
    fn app_config(&self) -> &AppConfig;
}

/// Session trait implemented by both CommandSession and MockCommandSession
pub trait Session {
    fn filesystem(&self) -> Arc<dyn FileSystemProvider>;

    fn process(&self) -> Arc<dyn ProcessProvider>;

    fn config(&self) -> &dyn ConfigProvider;

    /// Pack root for this session: configured workdir, else the current directory
    fn workdir(&self) -> Result<PathBuf> {
        match &self.config().app_config().workdir {
            Some(workdir) => Ok(workdir.clone()),
            None => self.filesystem().current_dir(),
        }
    }
}

/// Live implementation of FileSystemProvider
pub struct LiveFileSystemProvider;

impl FileSystemProvider for LiveFileSystemProvider {
    fn current_dir(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to get current directory")
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove file: {}", path.display()))
    }
}

/// Live implementation of ProcessProvider
pub struct LiveProcessProvider {
    /// Custom PATH override for hermetic testing
    custom_path: Option<String>,
}

impl Default for LiveProcessProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveProcessProvider {
    /// Create a new LiveProcessProvider with system PATH
    pub fn new() -> Self {
        Self { custom_path: None }
    }

    /// Create a LiveProcessProvider with custom PATH for hermetic testing
    pub fn with_custom_path(path: String) -> Self {
        Self {
            custom_path: Some(path),
        }
    }

    /// Prepend `test_bin_path` to the inherited PATH
    pub fn new_for_test(test_bin_path: Option<String>) -> Self {
        match test_bin_path {
            Some(bin_path) => {
                let current_path = env::var("PATH").unwrap_or_default();
                #[cfg(windows)]
                let path_sep = ";";
                #[cfg(not(windows))]
                let path_sep = ":";
                Self::with_custom_path(format!("{bin_path}{path_sep}{current_path}"))
            }
            None => Self::new(),
        }
    }

    fn command(&self, program: &str) -> Command {
        let mut cmd = Command::new(program);
        if let Some(custom_path) = &self.custom_path {
            cmd.env("PATH", custom_path);
        }
        cmd
    }
}

impl ProcessProvider for LiveProcessProvider {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<ProcessOutput> {
        let output = self
            .command(command)
            .args(args)
            .current_dir(working_dir)
            .output()
            .with_context(|| format!("Failed to execute command: {command}"))?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }

    fn is_available(&self, command: &str) -> bool {
        self.command(command)
            .arg("--help")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

/// Live implementation of ConfigProvider
pub struct LiveConfigProvider {
    app_config: AppConfig,
}

impl LiveConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for LiveConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

/// CommandSession owns all providers for a single command execution
pub struct CommandSession<F, P, C>
where
    F: FileSystemProvider + 'static,
    P: ProcessProvider + 'static,
    C: ConfigProvider,
{
    filesystem_provider: Arc<F>,
    process_provider: Arc<P>,
    config_provider: C,
}

impl CommandSession<LiveFileSystemProvider, LiveProcessProvider, LiveConfigProvider> {
    /// Production composition
    pub fn new(app_config: AppConfig) -> Self {
        Self::new_with_providers(
            LiveFileSystemProvider,
            LiveProcessProvider::new(),
            LiveConfigProvider::new(app_config),
        )
    }
}

impl<F, P, C> CommandSession<F, P, C>
where
    F: FileSystemProvider + 'static,
    P: ProcessProvider + 'static,
    C: ConfigProvider,
{
    /// Compose a session from explicit providers
    pub fn new_with_providers(filesystem_provider: F, process_provider: P, config_provider: C) -> Self {
        Self {
            filesystem_provider: Arc::new(filesystem_provider),
            process_provider: Arc::new(process_provider),
            config_provider,
        }
    }
}

impl<F, P, C> Session for CommandSession<F, P, C>
where
    F: FileSystemProvider + 'static,
    P: ProcessProvider + 'static,
    C: ConfigProvider,
{
    fn filesystem(&self) -> Arc<dyn FileSystemProvider> {
        self.filesystem_provider.clone()
    }

    fn process(&self) -> Arc<dyn ProcessProvider> {
        self.process_provider.clone()
    }

    fn config(&self) -> &dyn ConfigProvider {
        &self.config_provider
    }
}
