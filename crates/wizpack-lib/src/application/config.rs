//! Application configuration management
//!
//! Handles config loading, validation, and environment variable processing
//! following the precedence: defaults -> .env -> env vars -> CLI args.

use crate::primitives::*;
use clap::Parser;
use serde::Deserialize;
use std::io::IsTerminal;
use std::path::{MAIN_SEPARATOR, PathBuf};

/// Default configuration values
pub mod defaults {
    pub const PACKWIZ: &str = "packwiz";
    pub const LOG_LEVEL: &str = "0"; // Error-only logging by default
    pub const LOG_FORMAT: &str = "text";
    pub const LOG_OUTPUT: &str = "stderr";
    pub const COLOR: &str = "auto";
}

/// Default value functions for configuration fields
mod default_fns {
    use super::*;

    pub fn packwiz() -> String {
        defaults::PACKWIZ.to_string()
    }

    pub fn log_level() -> u8 {
        0
    }

    pub fn log_format() -> LogFormat {
        LogFormat::Text
    }

    pub fn log_output() -> LogOutput {
        LogOutput::Stderr
    }

    pub fn color() -> ColorIntent {
        ColorIntent::Auto
    }
}

/// Application configuration structure
#[derive(Debug, Clone, Parser, Deserialize)]
pub struct AppConfig {
    /// Pack root directory (defaults to the current directory)
    #[arg(short, long, env = "WIZPACK_WORKDIR", global = true)]
    #[serde(default)]
    pub workdir: Option<PathBuf>,

    /// packwiz executable name or path
    #[arg(long, env = "WIZPACK_PACKWIZ", default_value = defaults::PACKWIZ, global = true)]
    #[serde(default = "default_fns::packwiz")]
    pub packwiz: String,

    /// Verbosity level (0=error, 1=warn, 2=info, 3=debug, 4=trace)
    #[arg(long, env = "WIZPACK_LOG_LEVEL", default_value = defaults::LOG_LEVEL, global = true)]
    #[serde(default = "default_fns::log_level")]
    pub log_level: u8,

    /// Output format (text, json, yaml)
    #[arg(long, env = "WIZPACK_LOG_FORMAT", default_value = defaults::LOG_FORMAT, global = true)]
    #[serde(default = "default_fns::log_format")]
    pub log_format: LogFormat,

    /// Log output stream (stderr, stdout)
    #[arg(long, env = "WIZPACK_LOG_OUTPUT", default_value = defaults::LOG_OUTPUT, global = true)]
    #[serde(default = "default_fns::log_output")]
    pub log_output: LogOutput,

    /// Color output control (auto, always, never)
    #[arg(short, long, env = "WIZPACK_COLOR", default_value = defaults::COLOR, global = true)]
    #[serde(default = "default_fns::color")]
    pub color: ColorIntent,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workdir: None,
            packwiz: default_fns::packwiz(),
            log_level: default_fns::log_level(),
            log_format: default_fns::log_format(),
            log_output: default_fns::log_output(),
            color: default_fns::color(),
        }
    }
}

impl AppConfig {
    /// Create LoggerConfig, resolving color against the log stream
    pub fn to_logger_config(&self) -> LoggerConfig {
        let is_terminal = match self.log_output {
            LogOutput::Stderr => std::io::stderr().is_terminal(),
            LogOutput::Stdout => std::io::stdout().is_terminal(),
        };

        LoggerConfig {
            level: LogLevel::from_verbosity(self.log_level),
            format: self.log_format,
            output: self.log_output,
            ansi: self.color.resolve(is_terminal),
        }
    }

    /// Merge this config with another, taking non-default values from other
    pub fn merge_with(mut self, other: Self) -> Self {
        if other.workdir.is_some() {
            self.workdir = other.workdir;
        }
        if other.packwiz != default_fns::packwiz() {
            self.packwiz = other.packwiz;
        }
        if other.log_level != default_fns::log_level() {
            self.log_level = other.log_level;
        }
        if !matches!(other.log_format, LogFormat::Text) {
            self.log_format = other.log_format;
        }
        if !matches!(other.log_output, LogOutput::Stderr) {
            self.log_output = other.log_output;
        }
        if !matches!(other.color, ColorIntent::Auto) {
            self.color = other.color;
        }

        self
    }

    /// Validate the final configuration
    ///
    /// A relative `packwiz` path with a separator would be resolved against
    /// the pack root once commands run there, so it is anchored to the
    /// current directory instead.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let cwd = std::env::current_dir()?;

        match &self.workdir {
            None => self.workdir = Some(cwd.clone()),
            Some(dir) if dir.is_relative() => self.workdir = Some(cwd.join(dir)),
            Some(_) => {}
        }

        if self.packwiz.trim().is_empty() {
            return Err(ConfigError::ParseError {
                value: self.packwiz.clone(),
                reason: "packwiz executable must not be empty".to_string(),
            });
        }

        let bin = PathBuf::from(&self.packwiz);
        let has_separator = self.packwiz.contains('/') || self.packwiz.contains(MAIN_SEPARATOR);
        if has_separator && bin.is_relative() {
            self.packwiz = cwd.join(bin).to_string_lossy().into_owned();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("config.test.rs");
}
