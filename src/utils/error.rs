use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlottingError {
    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("SKU code already exists: {sku_code}")]
    DuplicateKey { sku_code: String },

    #[error("SKU not found: {sku_code}")]
    NotFound { sku_code: String },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Advisor error: {message}")]
    AdvisorError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Conflict,
    NotFound,
    Configuration,
    Storage,
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SlottingError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        SlottingError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SlottingError::ValidationError { .. } => ErrorCategory::Validation,
            SlottingError::DuplicateKey { .. } => ErrorCategory::Conflict,
            SlottingError::NotFound { .. } => ErrorCategory::NotFound,
            SlottingError::ConfigError { .. }
            | SlottingError::ConfigValidationError { .. }
            | SlottingError::InvalidConfigValueError { .. }
            | SlottingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SlottingError::IoError(_)
            | SlottingError::SerializationError(_)
            | SlottingError::CsvError(_) => ErrorCategory::Storage,
            SlottingError::ApiError(_) | SlottingError::AdvisorError { .. } => {
                ErrorCategory::Network
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Validation | ErrorCategory::Conflict | ErrorCategory::NotFound => {
                ErrorSeverity::High
            }
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SlottingError::ValidationError { field, .. } => {
                format!("Check the value of '{}' and try again", field)
            }
            SlottingError::DuplicateKey { sku_code } => format!(
                "Use a different SKU code or update '{}' instead of adding it",
                sku_code
            ),
            SlottingError::NotFound { .. } => {
                "Run `smart-slotting list` to see the stored SKU codes".to_string()
            }
            SlottingError::MissingConfigError { field } => {
                format!("Add '{}' to the configuration file", field)
            }
            SlottingError::ConfigError { .. }
            | SlottingError::ConfigValidationError { .. }
            | SlottingError::InvalidConfigValueError { .. } => {
                "Fix the configuration file (see slotting.toml for a working example)".to_string()
            }
            SlottingError::IoError(_) => {
                "Check that the storage path exists and is writable".to_string()
            }
            SlottingError::SerializationError(_) => {
                "The data file looks corrupted; restore it or run `smart-slotting clear`"
                    .to_string()
            }
            SlottingError::CsvError(_) => {
                "Check the CSV header: sku_code,product_name,f,w,s,i".to_string()
            }
            SlottingError::ApiError(_) | SlottingError::AdvisorError { .. } => {
                "Check network access and the advisor API key, then retry".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("Invalid input: {}", self),
            ErrorCategory::Conflict => format!("Conflict: {}", self),
            ErrorCategory::NotFound => format!("Not found: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Storage => format!("Storage problem: {}", self),
            ErrorCategory::Network => format!("Advisor unavailable: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, SlottingError>;
