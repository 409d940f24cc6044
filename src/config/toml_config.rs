use crate::domain::model::DuplicatePolicy;
use crate::utils::error::{InventoryError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    pub duplicate_policy: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InventoryError::NotFound {
                    path: path.display().to_string(),
                }
            } else {
                InventoryError::IoError(e)
            }
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InventoryError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CAR_DATA_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| InventoryError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn duplicate_policy(&self) -> Result<Option<DuplicatePolicy>> {
        self.export
            .duplicate_policy
            .as_deref()
            .map(|value| {
                DuplicatePolicy::parse(value).ok_or_else(|| {
                    InventoryError::InvalidConfigValueError {
                        field: "export.duplicate_policy".to_string(),
                        value: value.to_string(),
                        reason: format!("Allowed values: {}", DuplicatePolicy::NAMES.join(", ")),
                    }
                })
            })
            .transpose()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(directory) = &self.storage.directory {
            validation::validate_path("storage.directory", directory)?;
        }
        if let Some(policy) = &self.export.duplicate_policy {
            validation::validate_one_of(
                "export.duplicate_policy",
                &policy.to_lowercase(),
                &DuplicatePolicy::NAMES,
            )?;
        }
        Ok(())
    }
}
