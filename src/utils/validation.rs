use crate::utils::error::{InventoryError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(InventoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(InventoryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(InventoryError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!("Allowed values: {}", allowed.join(", ")),
    })
}

pub fn validate_existing_dir(field_name: &str, path: &str) -> Result<()> {
    validate_path(field_name, path)?;
    if !std::path::Path::new(path).is_dir() {
        return Err(InventoryError::ConfigValidationError {
            field: field_name.to_string(),
            message: format!("'{}' is not a directory", path),
        });
    }
    Ok(())
}
