pub mod toml_config;

use crate::domain::model::DuplicatePolicy;
use crate::utils::error::{InventoryError, Result};
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "car-inventory")]
#[command(about = "Manage a list of cars and move it between txt, csv and SQLite files")]
pub struct CliConfig {
    #[arg(long, help = "Directory holding the exported files (default: current directory)")]
    pub workdir: Option<String>,

    #[arg(long, help = "Optional TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "How to treat cars already in the export target: ask, skip or keep")]
    pub duplicates: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Effective settings after merging CLI flags over the TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub directory: String,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            duplicate_policy: DuplicatePolicy::Ask,
        }
    }
}

impl Settings {
    /// CLI value wins over the file, the file over the default.
    pub fn merge(
        workdir: Option<&str>,
        duplicates: Option<&str>,
        file: Option<&TomlConfig>,
    ) -> Result<Self> {
        let defaults = Self::default();

        let directory = workdir
            .map(str::to_string)
            .or_else(|| file.and_then(|f| f.storage.directory.clone()))
            .unwrap_or(defaults.directory);

        let duplicate_policy = match duplicates {
            Some(value) => DuplicatePolicy::parse(value).ok_or_else(|| {
                InventoryError::InvalidConfigValueError {
                    field: "--duplicates".to_string(),
                    value: value.to_string(),
                    reason: format!("Allowed values: {}", DuplicatePolicy::NAMES.join(", ")),
                }
            })?,
            None => match file {
                Some(f) => f.duplicate_policy()?.unwrap_or(defaults.duplicate_policy),
                None => defaults.duplicate_policy,
            },
        };

        Ok(Self {
            directory,
            duplicate_policy,
        })
    }
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn load_settings(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => {
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                Some(file)
            }
            None => None,
        };
        Settings::merge(
            self.workdir.as_deref(),
            self.duplicates.as_deref(),
            file.as_ref(),
        )
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_existing_dir("storage.directory", &self.directory)
    }
}
