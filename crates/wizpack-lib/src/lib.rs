//! # wizpack Library
//!
//! Scriptable front end for packwiz modpacks.
//!
//! ## Core Modules
//!
//! - [`primitives`] - Shared enums, logger settings and ambient errors
//! - [`logger`] - Structured logging with progress tracking
//! - [`wizpack`] - Pack records, the packwiz driver and the reconciling [`Pack`]
//! - [`application`] - CLI interface, configuration and command handlers
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use wizpack_lib::{Pack, application::CommandSession, AppConfig};
//!
//! let session = CommandSession::new(AppConfig::default());
//! let mut pack = Pack::open(&session, "/path/to/pack")?;
//! let report = pack.update_all().await?;
//! println!("{} metafiles changed", report.updated.len());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod logger;
pub mod primitives;
pub mod wizpack;

// Re-export commonly used types for convenience
pub use application::{AppConfig, Cli, Commands, execute_command};
pub use logger::Logger;
pub use primitives::{ConfigError, LogFormat, LogLevel, LogOutput, LoggerError};
pub use wizpack::{Pack, PackError, ReconcileReport};

pub use anyhow::Result;
use application::CliConfig;

pub async fn main() -> Result<()> {
    let config = CliConfig::load()?;

    Logger::init(config.app_config.to_logger_config())?;

    execute_command(config).await
}
