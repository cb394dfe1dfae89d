//! Hermetic test environment for E2E testing
//!
//! Creates an isolated temp directory with mock executables on a private
//! PATH, so sessions built from it run real processes against real files
//! without packwiz installed.

use crate::fixtures;
use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wizpack_lib::application::config::AppConfig;
use wizpack_lib::application::session::{
    CommandSession, LiveConfigProvider, LiveFileSystemProvider, LiveProcessProvider,
};

/// Session type produced by [`HermeticSessionBuilder`]
pub type HermeticSession =
    CommandSession<LiveFileSystemProvider, LiveProcessProvider, LiveConfigProvider>;

/// Hermetic test environment with mock executables
pub struct TestEnvironment {
    /// Keeps the directory alive for the test's duration
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
    /// Directory holding mock executables
    pub bin_path: PathBuf,
    /// Directory packs are created under
    pub work_path: PathBuf,
    mock_executables: HashMap<String, MockExecutable>,
}

#[derive(Debug, Clone)]
pub struct MockExecutable {
    pub name: String,
    pub behavior: MockBehavior,
    pub log_path: PathBuf,
}

/// Mock executable behavior configuration
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always succeed with empty output
    AlwaysSucceed,
    /// Print `error` to stdout and exit 1; `--help` still succeeds
    AlwaysFail { error: String },
    /// Succeed with specific output
    SucceedWithOutput { stdout: String, stderr: String },
    /// Run a shell script body with the call's arguments
    Script { body: String },
}

impl MockBehavior {
    /// Shell stand-in for packwiz that edits the pack directory
    pub fn packwiz_simulator() -> Self {
        MockBehavior::Script {
            body: fixtures::PACKWIZ_SIMULATOR.to_string(),
        }
    }
}

fn shell_quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root_path = temp_dir.path().to_path_buf();
        let bin_path = root_path.join("bin");
        let work_path = root_path.join("work");

        fs::create_dir_all(&bin_path)?;
        fs::create_dir_all(&work_path)?;

        Ok(Self {
            temp_dir,
            root_path,
            bin_path,
            work_path,
            mock_executables: HashMap::new(),
        })
    }

    /// Write an executable script named `name` into the bin directory
    pub fn add_mock_executable(&mut self, name: &str, behavior: MockBehavior) -> Result<()> {
        let log_path = self.root_path.join(format!("{name}.log"));
        let executable_path = self.bin_path.join(name);

        let script = Self::generate_mock_script(name, &behavior, &log_path);
        fs::write(&executable_path, script)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&executable_path)?.permissions();
            perms.set_mode(0o755);
            fs::set_permissions(&executable_path, perms)?;
        }

        self.mock_executables.insert(
            name.to_string(),
            MockExecutable {
                name: name.to_string(),
                behavior,
                log_path,
            },
        );
        Ok(())
    }

    fn generate_mock_script(name: &str, behavior: &MockBehavior, log_path: &Path) -> String {
        let log = shell_quote(&log_path.to_string_lossy());

        let behavior_code = match behavior {
            MockBehavior::AlwaysSucceed => "exit 0".to_string(),
            MockBehavior::AlwaysFail { error } => format!(
                "[ \"$1\" = \"--help\" ] && exit 0\necho {}\nexit 1",
                shell_quote(error)
            ),
            MockBehavior::SucceedWithOutput { stdout, stderr } => {
                let mut code = String::new();
                if !stdout.is_empty() {
                    code.push_str(&format!("echo {}\n", shell_quote(stdout)));
                }
                if !stderr.is_empty() {
                    code.push_str(&format!("echo {} >&2\n", shell_quote(stderr)));
                }
                code.push_str("exit 0");
                code
            }
            MockBehavior::Script { body } => body.clone(),
        };

        format!(
            r#"#!/bin/bash
# Mock executable: {name}
echo "{name} $*" >> {log}

{behavior_code}
"#
        )
    }

    /// PATH with the mock bin directory first
    pub fn path_env(&self) -> String {
        format!(
            "{}:{}",
            self.bin_path.to_string_lossy(),
            std::env::var("PATH").unwrap_or_default()
        )
    }

    /// Raw log for a mock executable; empty if it never ran
    pub fn mock_log(&self, executable_name: &str) -> Result<String> {
        match self.mock_executables.get(executable_name) {
            Some(mock) if mock.log_path.exists() => Ok(fs::read_to_string(&mock.log_path)?),
            _ => Ok(String::new()),
        }
    }

    /// Argument lists of every call except availability probes
    pub fn mock_calls(&self, executable_name: &str) -> Result<Vec<String>> {
        let prefix = format!("{executable_name} ");
        Ok(self
            .mock_log(executable_name)?
            .lines()
            .filter_map(|line| line.strip_prefix(&prefix))
            .filter(|args| *args != "--help")
            .map(str::to_string)
            .collect())
    }

    pub fn verify_mock_call(&self, executable_name: &str, args: &[&str]) -> Result<bool> {
        let expected = args.join(" ");
        Ok(self.mock_calls(executable_name)?.contains(&expected))
    }

    /// Create `work/<name>` holding an empty pack
    pub fn init_pack(
        &self,
        name: &str,
        minecraft_version: &str,
        loader: &str,
        loader_version: &str,
    ) -> Result<PathBuf> {
        let pack_path = self.work_path.join(name);
        fs::create_dir_all(&pack_path)?;
        fs::write(
            pack_path.join("pack.toml"),
            fixtures::pack_toml(name, minecraft_version, loader, loader_version),
        )?;
        fs::write(pack_path.join("index.toml"), fixtures::EMPTY_INDEX)?;
        Ok(pack_path)
    }
}

/// Builder for sessions whose processes resolve against the mock bin directory
pub struct HermeticSessionBuilder {
    test_env: TestEnvironment,
    app_config: AppConfig,
}

impl HermeticSessionBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            test_env: TestEnvironment::new()?,
            app_config: AppConfig::default(),
        })
    }

    pub fn with_mock_executable(mut self, name: &str, behavior: MockBehavior) -> Result<Self> {
        self.test_env.add_mock_executable(name, behavior)?;
        Ok(self)
    }

    /// Install the packwiz stand-in
    pub fn with_packwiz_simulator(self) -> Result<Self> {
        self.with_mock_executable("packwiz", MockBehavior::packwiz_simulator())
    }

    pub fn with_workdir(mut self, workdir: PathBuf) -> Self {
        self.app_config.workdir = Some(workdir);
        self
    }

    /// Create an empty pack and make it the session's workdir
    pub fn with_pack(
        mut self,
        name: &str,
        minecraft_version: &str,
        loader: &str,
        loader_version: &str,
    ) -> Result<Self> {
        let pack_path = self
            .test_env
            .init_pack(name, minecraft_version, loader, loader_version)?;
        self.app_config.workdir = Some(pack_path);
        Ok(self)
    }

    pub fn build(self) -> Result<(HermeticSession, TestEnvironment)> {
        let session = CommandSession::new_with_providers(
            LiveFileSystemProvider,
            LiveProcessProvider::new_for_test(Some(
                self.test_env.bin_path.to_string_lossy().to_string(),
            )),
            LiveConfigProvider::new(self.app_config),
        );

        Ok((session, self.test_env))
    }

    pub fn test_env(&self) -> &TestEnvironment {
        &self.test_env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_creation() {
        let env = TestEnvironment::new().expect("Failed to create test environment");
        assert!(env.root_path.exists());
        assert!(env.bin_path.exists());
        assert!(env.work_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_mock_executable_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let mut env = TestEnvironment::new().expect("Failed to create test environment");
        env.add_mock_executable("packwiz", MockBehavior::AlwaysSucceed)
            .expect("Failed to add mock executable");

        let metadata = fs::metadata(env.bin_path.join("packwiz")).unwrap();
        assert!(metadata.permissions().mode() & 0o111 != 0);
        assert!(env.mock_calls("packwiz").unwrap().is_empty());
    }

    #[test]
    fn test_init_pack_writes_records() {
        let env = TestEnvironment::new().expect("Failed to create test environment");
        let pack_path = env.init_pack("demo", "1.20.1", "fabric", "0.15.0").unwrap();

        let manifest = fs::read_to_string(pack_path.join("pack.toml")).unwrap();
        assert!(manifest.contains("fabric = \"0.15.0\""));
        assert!(pack_path.join("index.toml").exists());
    }

    #[test]
    fn test_shell_quote_escapes_single_quotes() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }

    #[test]
    fn test_path_env_starts_with_bin() {
        let env = TestEnvironment::new().expect("Failed to create test environment");
        assert!(env.path_env().starts_with(env.bin_path.to_str().unwrap()));
    }
}
