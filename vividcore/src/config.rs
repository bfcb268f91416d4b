//! Engine configuration.
//!
//! Every combinatorial operation of the engine takes an [`EngineConfig`]: it
//! carries the discretization steps used to materialize ranges and the
//! budgets bounding the enumerations. The configuration round-trips through
//! TOML:
//!
//! ```toml
//! [discretization]
//! int_step = 1
//! float_step = 0.1
//! bigint_step = 1
//!
//! [budget]
//! max_worlds = 100000
//! ```
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use vividset::Discretization;

use crate::{
    magic::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_CONFIG_PATH},
    utils::{
        budget::{BudgetExt, BudgetKind, Budgeted},
        error::{VividError, VividResult},
    },
};

/// Optional caps on the enumerations; `None` leaves an enumeration unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Budget {
    pub max_worlds: Option<usize>,
    pub max_assignments: Option<usize>,
    pub max_alternates: Option<usize>,
}

impl Budget {
    pub fn limit(&self, kind: BudgetKind) -> Option<usize> {
        match kind {
            BudgetKind::Worlds => self.max_worlds,
            BudgetKind::Assignments => self.max_assignments,
            BudgetKind::Alternates => self.max_alternates,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub discretization: Discretization,
    pub budget: Budget,
}

impl EngineConfig {
    /// Wrap `iter` in the budget configured for `kind`.
    pub fn budgeted<I: Iterator>(&self, iter: I, kind: BudgetKind) -> Budgeted<I> {
        iter.budgeted(kind, self.budget.limit(kind))
    }

    /// Get the default path to the engine configuration file.
    pub fn default_path() -> PathBuf {
        // Check if the environment variable is set
        if let Ok(config_path) = std::env::var(ENV_CONFIG_PATH) {
            return config_path.into();
        }

        // Fallback to default paths based on OS
        let mut path = PathBuf::new();

        #[cfg(target_os = "windows")]
        {
            if let Ok(appdata) = std::env::var("APPDATA") {
                path.push(appdata);
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
                path.push(xdg_config_home);
            } else if let Ok(home) = std::env::var("HOME") {
                path.push(home);
                path.push(".config");
            }
        }

        path.push(CONFIG_DIR_NAME);
        path.push(CONFIG_FILE_NAME);
        path
    }

    /// Load the configuration from a TOML file and validate its steps.
    pub fn load_from_toml(path: &Path) -> VividResult<Self> {
        let toml_str = std::fs::read_to_string(path)?;

        let config: Self = toml::from_str(&toml_str).map_err(|e| VividError::ConfigParse {
            source: e,
            file: path.display().to_string(),
        })?;
        config.discretization.validate()?;

        info!("loaded engine configuration from `{}`", path.display());
        Ok(config)
    }

    /// Load the configuration from [`EngineConfig::default_path`], or the
    /// defaults when that file does not exist.
    pub fn load_or_default() -> VividResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from_toml(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the configuration to a TOML file.
    pub fn save_to_toml(&self, path: &Path) -> VividResult<()> {
        let toml_str = toml::to_string(self).map_err(|e| VividError::ConfigSerialize {
            source: e,
            file: path.display().to_string(),
        })?;

        // Attempt to create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_fall_back_to_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [budget]
            max_worlds = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.budget.max_worlds, Some(10));
        assert_eq!(config.budget.max_assignments, None);
        assert_eq!(config.discretization, Discretization::default());
    }

    #[test]
    fn save_then_load() {
        let dir = std::env::temp_dir().join(format!("vivid-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE_NAME);

        let mut config = EngineConfig::default();
        config.discretization.float_step = 0.5;
        config.budget.max_alternates = Some(3);
        config.save_to_toml(&path).unwrap();

        let loaded = EngineConfig::load_from_toml(&path).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn invalid_steps_are_rejected_on_load() {
        let dir = std::env::temp_dir().join(format!("vivid-bad-config-{}", std::process::id()));
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "[discretization]\nint_step = 0\n").unwrap();

        assert!(EngineConfig::load_from_toml(&path).unwrap_err().is_value_set());
        assert!(
            EngineConfig::load_from_toml(&dir.join("missing.toml"))
                .unwrap_err()
                .is_io()
        );
        std::fs::remove_dir_all(dir).unwrap();
    }
}
