use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("{endpoint} returned HTTP {status}")]
    HttpStatusError { endpoint: String, status: u16 },

    #[error("Request failed: {message}")]
    RequestFailedError { message: String },

    #[error("Malformed response from {endpoint}: {message}")]
    MalformedResponseError { endpoint: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Base64 decode error: {0}")]
    DecodeError(#[from] base64::DecodeError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("No element with id '{id}' on the page")]
    UnknownElementError { id: String },

    #[error("Element '{id}' has no option '{value}'")]
    UnknownOptionError { id: String, value: String },

    #[error("Invalid data URI: {message}")]
    DataUriError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Protocol,
    Configuration,
    Page,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashError::ApiError(_)
            | DashError::HttpStatusError { .. }
            | DashError::RequestFailedError { .. } => ErrorCategory::Network,
            DashError::MalformedResponseError { .. }
            | DashError::SerializationError(_)
            | DashError::DecodeError(_)
            | DashError::DataUriError { .. } => ErrorCategory::Protocol,
            DashError::ConfigError { .. }
            | DashError::InvalidConfigValueError { .. }
            | DashError::ConfigValidationError { .. }
            | DashError::UrlError(_) => ErrorCategory::Configuration,
            DashError::UnknownElementError { .. } | DashError::UnknownOptionError { .. } => {
                ErrorCategory::Page
            }
            DashError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Page => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Protocol | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DashError::ApiError(_) => "Could not reach the dashboard server".to_string(),
            DashError::HttpStatusError { endpoint, status } => {
                format!("The server answered {} with HTTP {}", endpoint, status)
            }
            DashError::MalformedResponseError { endpoint, .. } => {
                format!("The server sent an unexpected response for {}", endpoint)
            }
            DashError::UnknownOptionError { id, value } => {
                format!("'{}' is not one of the choices in {}", value, id)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the dashboard server is running and --api-base-url is correct",
            ErrorCategory::Protocol => "Check that the server implements the /api/layers, /api/plot and /api/info contract",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags and try again",
            ErrorCategory::Page => "Pick a value listed in the configured [page] section",
            ErrorCategory::System => "Check file permissions and free disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
