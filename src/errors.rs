use thiserror::Error;

#[derive(Debug, Error)]
pub enum StarbaseError {
    #[error("Template not found in S3: {0}")]
    TemplateNotFound(String),

    #[error("Failed to interact with S3 ({code}): {message}")]
    StorageError { code: String, message: String },

    #[error("Failed to parse template: {0}")]
    TemplateParseError(#[from] serde_yaml::Error),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Failed to interact with SQS: {0}")]
    QueueError(String),

    #[error("Failed to serialize payload: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown worker ship: {0}")]
    UnknownWorkerShip(String),

    #[error("Failed to parse Lambda event: {0}")]
    EventParseError(String),
}

impl StarbaseError {
    /// The S3 error code for storage failures, used in operator-facing log lines.
    #[must_use]
    pub fn storage_code(&self) -> Option<&str> {
        match self {
            StarbaseError::TemplateNotFound(_) => Some("NoSuchKey"),
            StarbaseError::StorageError { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for StarbaseError {
    fn from(error: anyhow::Error) -> Self {
        StarbaseError::ConfigError(error.to_string())
    }
}

impl From<std::io::Error> for StarbaseError {
    fn from(error: std::io::Error) -> Self {
        StarbaseError::ConfigError(error.to_string())
    }
}
