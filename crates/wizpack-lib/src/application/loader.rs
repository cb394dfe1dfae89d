//! Configuration loading
//!
//! Layers the configuration sources: defaults -> .env -> env vars -> CLI.
//! `.env` files are loaded before clap parses so `WIZPACK_*` bindings in
//! them are seen like real environment variables.

use crate::primitives::ConfigError;

use super::{config::AppConfig, env::EnvironmentConfig};

/// Env files consulted from the current directory, first match wins per key
pub const ENV_FILES: [&str; 2] = [".env.local", ".env"];

impl AppConfig {
    /// Load `.env.local` and `.env`; a missing file is not an error
    pub fn load_env_files() -> Result<(), ConfigError> {
        for env_file in ENV_FILES {
            match dotenvy::from_filename(env_file) {
                Ok(_) => {}
                Err(e) if e.not_found() => {}
                Err(e) => {
                    return Err(ConfigError::EnvFileError {
                        file: env_file.to_string(),
                        source: e,
                    });
                }
            }
        }
        Ok(())
    }

    /// Layer CLI values over defaults and the standard color variables
    pub fn resolve(cli: AppConfig) -> Result<Self, ConfigError> {
        let env_config = EnvironmentConfig::load()?;
        Self::layer(&env_config, cli)
    }

    /// Pure layering step behind [`AppConfig::resolve`]
    pub fn layer(env_config: &EnvironmentConfig, cli: AppConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.color = env_config.apply_color_config(config.color);
        config = config.merge_with(cli);
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("loader.test.rs");
}
