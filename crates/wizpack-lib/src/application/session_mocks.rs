//! Mock implementations of session providers for testing
//!
//! Mock state lives behind `Arc<Mutex<..>>`, so a clone handed to a session
//! or a [`Pack`](crate::wizpack::Pack) shares it with the test that keeps
//! the original for inspection.

use crate::application::config::AppConfig;
use crate::application::session::*;
use crate::Result;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Mock filesystem provider with an in-memory file map and a read log
#[derive(Clone)]
pub struct MockFileSystemProvider {
    pub current_dir: PathBuf,
    /// In-memory filesystem: path -> content
    pub files: Arc<Mutex<HashMap<PathBuf, String>>>,
    /// Track directories that exist
    pub directories: Arc<Mutex<HashSet<PathBuf>>>,
    /// Every successful or failed read, in call order
    pub reads: Arc<Mutex<Vec<PathBuf>>>,
    /// Every `remove_file` call, in call order
    pub removed: Arc<Mutex<Vec<PathBuf>>>,
}

impl Default for MockFileSystemProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystemProvider {
    pub fn new() -> Self {
        Self {
            current_dir: PathBuf::from("/test/workdir"),
            files: Arc::new(Mutex::new(HashMap::new())),
            directories: Arc::new(Mutex::new(HashSet::new())),
            reads: Arc::new(Mutex::new(Vec::new())),
            removed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_current_dir(mut self, dir: PathBuf) -> Self {
        self.current_dir = dir.clone();
        self.directories.lock().unwrap().insert(dir);
        self
    }

    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.set_file(path, content);
        self
    }

    /// Replace (or create) a file in place; simulates an external tool writing to disk
    pub fn set_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let path = path.into();
        if let Some(parent) = path.parent() {
            self.directories
                .lock()
                .unwrap()
                .insert(parent.to_path_buf());
        }
        self.files.lock().unwrap().insert(path, content.into());
    }

    /// Delete a file without recording it as a `remove_file` call
    pub fn delete_file(&self, path: &Path) {
        self.files.lock().unwrap().remove(path);
    }

    pub fn file(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn read_log(&self) -> Vec<PathBuf> {
        self.reads.lock().unwrap().clone()
    }

    pub fn clear_read_log(&self) {
        self.reads.lock().unwrap().clear();
    }

    pub fn removed_files(&self) -> Vec<PathBuf> {
        self.removed.lock().unwrap().clone()
    }
}

impl FileSystemProvider for MockFileSystemProvider {
    fn current_dir(&self) -> Result<PathBuf> {
        Ok(self.current_dir.clone())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.reads.lock().unwrap().push(path.to_path_buf());
        let files = self.files.lock().unwrap();
        if let Some(content) = files.get(path) {
            Ok(content.clone())
        } else {
            Err(anyhow::anyhow!("File not found: {}", path.display()))
        }
    }

    fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
            || self.directories.lock().unwrap().contains(path)
            || path == self.current_dir
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut directories = self.directories.lock().unwrap();
        let mut current = Some(path);
        while let Some(dir) = current {
            directories.insert(dir.to_path_buf());
            current = dir.parent();
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.removed.lock().unwrap().push(path.to_path_buf());
        match self.files.lock().unwrap().remove(path) {
            Some(_) => Ok(()),
            None => Err(anyhow::anyhow!("File not found: {}", path.display())),
        }
    }
}

/// Process call record for spy pattern
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessCall {
    pub command: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

/// Mock process provider for testing with spy pattern
#[derive(Clone)]
pub struct MockProcessProvider {
    pub packwiz_available: bool,
    pub calls: Arc<Mutex<Vec<ProcessCall>>>,
    pub results: HashMap<(String, Vec<String>), std::result::Result<ProcessOutput, String>>,
}

impl Default for MockProcessProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProcessProvider {
    pub fn new() -> Self {
        Self {
            packwiz_available: true,
            calls: Arc::new(Mutex::new(Vec::new())),
            results: HashMap::new(),
        }
    }

    pub fn with_packwiz_unavailable(mut self) -> Self {
        self.packwiz_available = false;
        self
    }

    pub fn with_result(
        mut self,
        command: &str,
        args: &[&str],
        result: std::result::Result<ProcessOutput, String>,
    ) -> Self {
        self.results.insert(
            (
                command.to_string(),
                args.iter().map(|s| s.to_string()).collect(),
            ),
            result,
        );
        self
    }

    pub fn with_packwiz_result(
        self,
        args: &[&str],
        result: std::result::Result<ProcessOutput, String>,
    ) -> Self {
        self.with_result("packwiz", args, result)
    }

    /// Make `packwiz <args>` exit non-zero with the given stdout
    pub fn with_packwiz_failure(self, args: &[&str], stdout: &str) -> Self {
        self.with_packwiz_result(
            args,
            Ok(ProcessOutput {
                stdout: stdout.to_string(),
                stderr: String::new(),
                success: false,
            }),
        )
    }

    /// Get all recorded process calls for verification
    pub fn get_calls(&self) -> Vec<ProcessCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Get calls for a specific command
    pub fn get_calls_for_command(&self, command: &str) -> Vec<ProcessCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.command == command)
            .cloned()
            .collect()
    }

    /// Verify that a specific command was called with expected arguments
    pub fn verify_call(&self, command: &str, args: &[&str], working_dir: &Path) -> bool {
        let expected_call = ProcessCall {
            command: command.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            working_dir: working_dir.to_path_buf(),
        };

        self.calls.lock().unwrap().contains(&expected_call)
    }
}

impl ProcessProvider for MockProcessProvider {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<ProcessOutput> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        self.calls.lock().unwrap().push(ProcessCall {
            command: command.to_string(),
            args: args.clone(),
            working_dir: working_dir.to_path_buf(),
        });

        match self.results.get(&(command.to_string(), args)) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(e)) => Err(anyhow::anyhow!("{}", e)),
            None => Ok(ProcessOutput {
                stdout: String::new(),
                stderr: String::new(),
                success: true,
            }),
        }
    }

    fn is_available(&self, _command: &str) -> bool {
        self.packwiz_available
    }
}

/// Mock config provider for testing
pub struct MockConfigProvider {
    pub app_config: AppConfig,
}

impl MockConfigProvider {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn app_config(&self) -> &AppConfig {
        &self.app_config
    }
}

/// Mock command session for testing
pub struct MockCommandSession {
    pub filesystem_provider: MockFileSystemProvider,
    pub process_provider: MockProcessProvider,
    pub config_provider: MockConfigProvider,
}

impl Default for MockCommandSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCommandSession {
    pub fn new() -> Self {
        Self {
            filesystem_provider: MockFileSystemProvider::new(),
            process_provider: MockProcessProvider::new(),
            config_provider: MockConfigProvider::new(AppConfig::default()),
        }
    }

    pub fn with_filesystem(mut self, filesystem: MockFileSystemProvider) -> Self {
        self.filesystem_provider = filesystem;
        self
    }

    pub fn with_process(mut self, process: MockProcessProvider) -> Self {
        self.process_provider = process;
        self
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config_provider = MockConfigProvider::new(config);
        self
    }
}

impl Session for MockCommandSession {
    fn filesystem(&self) -> Arc<dyn FileSystemProvider> {
        Arc::new(self.filesystem_provider.clone())
    }

    fn process(&self) -> Arc<dyn ProcessProvider> {
        Arc::new(self.process_provider.clone())
    }

    fn config(&self) -> &dyn ConfigProvider {
        &self.config_provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_filesystem_provider() {
        let provider = MockFileSystemProvider::new()
            .with_current_dir(PathBuf::from("/custom/path"))
            .with_file("/custom/path/a.txt", "hello");

        assert_eq!(
            provider.current_dir().unwrap(),
            PathBuf::from("/custom/path")
        );
        assert!(provider.exists(Path::new("/custom/path")));
        assert_eq!(
            provider.read_to_string(Path::new("/custom/path/a.txt")).unwrap(),
            "hello"
        );
        assert!(provider.read_to_string(Path::new("/nope")).is_err());
        assert_eq!(provider.read_log().len(), 2);

        let shared = provider.clone();
        shared.set_file("/custom/path/b.txt", "world");
        assert_eq!(
            provider.file(Path::new("/custom/path/b.txt")).as_deref(),
            Some("world")
        );

        provider.remove_file(Path::new("/custom/path/a.txt")).unwrap();
        assert!(!provider.exists(Path::new("/custom/path/a.txt")));
        assert_eq!(provider.removed_files(), vec![PathBuf::from("/custom/path/a.txt")]);
    }

    #[test]
    fn test_mock_process_provider() {
        let working_dir = PathBuf::from("/test/workdir");
        let provider = MockProcessProvider::new()
            .with_packwiz_result(&["add", "test-mod"], Err("Mock error".to_string()));

        let result = provider.execute("packwiz", &["list"], &working_dir);
        assert!(result.unwrap().success);

        let result = provider.execute("packwiz", &["add", "test-mod"], &working_dir);
        assert!(result.is_err());

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].args, vec!["list"]);
        assert_eq!(calls[1].args, vec!["add", "test-mod"]);

        assert!(provider.verify_call("packwiz", &["list"], &working_dir));
        assert!(provider.verify_call("packwiz", &["add", "test-mod"], &working_dir));
        assert!(!provider.verify_call("packwiz", &["remove", "test-mod"], &working_dir));
    }

    #[test]
    fn test_mock_command_session_shares_state() {
        let session = MockCommandSession::new()
            .with_process(MockProcessProvider::new().with_packwiz_unavailable());

        assert!(!session.process().is_available("packwiz"));

        session
            .process()
            .execute("packwiz", &["refresh"], Path::new("/p"))
            .unwrap();
        assert_eq!(session.process_provider.get_calls().len(), 1);

        session
            .filesystem()
            .write_file(Path::new("/p/x"), "y")
            .unwrap();
        assert!(session.filesystem_provider.file(Path::new("/p/x")).is_some());
    }
}
