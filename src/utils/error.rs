use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Unsupported file format: {path} (expected .txt, .csv or .db)")]
    UnsupportedFormat { path: String },

    #[error(
        "Parse error{}: {message}",
        .line.map(|l| format!(" at line {}", l)).unwrap_or_default()
    )]
    ParseError { line: Option<u64>, message: String },

    #[error("Storage error: {0}")]
    StorageError(#[from] sqlx::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No car at position {index} (inventory holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Format,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InventoryError {
    pub fn parse(line: Option<u64>, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Attaches a line number to a parse error that lacks one.
    pub fn at_line(self, line: Option<u64>) -> Self {
        match self {
            Self::ParseError { line: None, message } => Self::ParseError { line, message },
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } | Self::IndexOutOfRange { .. } => ErrorCategory::Input,
            Self::UnsupportedFormat { .. } | Self::ParseError { .. } | Self::CsvError(_) => {
                ErrorCategory::Format
            }
            Self::StorageError(_) | Self::IoError(_) => ErrorCategory::Storage,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Format => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Check the file name and the working directory",
            Self::UnsupportedFormat { .. } => "Use a file ending in .txt, .csv or .db",
            Self::ParseError { .. } | Self::CsvError(_) => {
                "Each row needs brand, type and an integer year"
            }
            Self::StorageError(_) => "Make sure the database file is writable and not locked",
            Self::IoError(_) => "Check file permissions and free disk space",
            Self::IndexOutOfRange { .. } => "Pick a number from the listed cars",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => "Fix the configuration file or CLI flags",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { path } => format!("Could not find '{}'", path),
            Self::UnsupportedFormat { path } => format!("'{}' is not a supported format", path),
            Self::StorageError(e) => format!("Database operation failed: {}", e),
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
