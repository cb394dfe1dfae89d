//! Standard color and CI environment variables
//!
//! These are read independently of the `WIZPACK_*` bindings clap resolves,
//! and only ever adjust the color intent.

use crate::primitives::{ColorIntent, ConfigError};
use serde::Deserialize;

/// Conventional variables that change how output is styled
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    /// NO_COLOR: any non-empty value disables color
    pub no_color: Option<String>,
    /// FORCE_COLOR: 0/false disables, 1/2/3/true enables
    pub force_color: Option<String>,
    /// CLICOLOR: 0 disables color
    pub clicolor: Option<String>,
    /// CI: presence alone disables color
    pub ci: Option<String>,
}

impl EnvironmentConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(envy::from_env::<Self>()?)
    }

    /// Fold the variables into `color`
    ///
    /// CI wins outright. Otherwise CLICOLOR, then NO_COLOR, then FORCE_COLOR
    /// are applied in order, later ones overriding earlier ones.
    pub fn apply_color_config(&self, color: ColorIntent) -> ColorIntent {
        if self.ci.is_some() {
            return ColorIntent::Never;
        }

        let mut color = color;
        if self.clicolor.as_deref() == Some("0") {
            color = ColorIntent::Never;
        }
        if self.no_color.as_deref().is_some_and(|v| !v.is_empty()) {
            color = ColorIntent::Never;
        }
        match self.force_color.as_deref() {
            Some("0" | "false") => ColorIntent::Never,
            Some("1" | "2" | "3" | "true") => ColorIntent::Always,
            _ => color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    include!("env.test.rs");
}
