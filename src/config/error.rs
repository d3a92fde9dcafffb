//! Configuration error types

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read configuration file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration{}: {message}", location(path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

fn location(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" file {}", path.display()),
        None => String::new(),
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }
}

impl crate::core::error_handling::ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ConfigError::NotFound { .. } | ConfigError::Parse { .. } | ConfigError::Invalid { .. } => {
                true
            }
            // Read failures are usually permissions or disk problems
            ConfigError::Io { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::Parse { message, .. } | ConfigError::Invalid { message } => Some(message),
            ConfigError::NotFound { .. } => Some("The specified configuration file does not exist"),
            ConfigError::Io { .. } => None,
        }
    }
}
