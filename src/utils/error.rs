use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Keyword ideation failed: {message}")]
    KeywordSourceError { message: String },

    #[error("Text generation failed: {message}")]
    TextGenerationError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    Upstream,
    Processing,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PlanError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PlanError::ConfigError { .. }
            | PlanError::ConfigValidationError { .. }
            | PlanError::InvalidConfigValueError { .. }
            | PlanError::MissingConfigError { .. } => ErrorCategory::Configuration,
            PlanError::ValidationError { .. } => ErrorCategory::Input,
            PlanError::ApiError(_) => ErrorCategory::Network,
            PlanError::KeywordSourceError { .. } | PlanError::TextGenerationError { .. } => {
                ErrorCategory::Upstream
            }
            PlanError::SerializationError(_) | PlanError::ProcessingError { .. } => {
                ErrorCategory::Processing
            }
            PlanError::ZipError(_) | PlanError::CsvError(_) | PlanError::IoError(_) => {
                ErrorCategory::Storage
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        // 文字生成失敗會退回預設主題，不會中斷流程
        if let PlanError::TextGenerationError { .. } = self {
            return ErrorSeverity::Low;
        }

        match self.category() {
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// Whether the error came from the caller's request rather than from the service.
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the configuration file and the environment variables it references"
            }
            ErrorCategory::Input => {
                "Fix the plan inputs: budgets must be non-negative and a brand or competitor site is required"
            }
            ErrorCategory::Network => "Check network connectivity and the collaborator endpoints",
            ErrorCategory::Upstream => {
                "Verify the Google Ads credentials and customer id, then retry"
            }
            ErrorCategory::Processing => "Inspect the collaborator response with --verbose",
            ErrorCategory::Storage => "Make sure the output directory exists and is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PlanError::KeywordSourceError { message } => {
                format!("Error fetching keywords: {}", message)
            }
            PlanError::ApiError(e) => format!("Could not reach a collaborator service: {}", e),
            PlanError::ValidationError { message } => format!("Invalid plan inputs: {}", message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_source_error_is_upstream_and_retryable() {
        let err = PlanError::KeywordSourceError {
            message: "HTTP 401".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Upstream);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.user_friendly_message(), "Error fetching keywords: HTTP 401");
    }

    #[test]
    fn test_text_generation_error_is_low_severity() {
        let err = PlanError::TextGenerationError {
            message: "quota".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_validation_error_is_client_error() {
        let err = PlanError::ValidationError {
            message: "cap must be >= 0".to_string(),
        };
        assert!(err.is_client_error());
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(!PlanError::MissingConfigError {
            field: "keyword_planner".to_string()
        }
        .is_client_error());
    }
}
