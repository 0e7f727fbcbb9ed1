use std::fmt;

/// Result type for qbrain operations
pub type Result<T> = std::result::Result<T, QBrainError>;

/// Main error type for the qbrain library
#[derive(Debug, Clone)]
pub enum QBrainError {
    /// Invalid dimensions for operations
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// IO errors (file operations)
    IoError(String),

    /// Serialization/deserialization errors, including corrupt weight tokens
    SerializationError(String),

    /// Action index rejected by the driver
    InvalidAction {
        action: usize,
        max_actions: usize,
    },

    /// Startup self-check failed; every detected issue is listed
    InvalidAgent {
        errors: Vec<String>,
    },

    /// Decision loop invoked before the startup self-check passed
    NotValidated,
}

impl fmt::Display for QBrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QBrainError::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {}, got {}", expected, actual)
            }
            QBrainError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
            QBrainError::IoError(msg) => write!(f, "IO error: {}", msg),
            QBrainError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            QBrainError::InvalidAction { action, max_actions } => {
                write!(f, "Invalid action {}: must be less than {}", action, max_actions)
            }
            QBrainError::InvalidAgent { errors } => {
                write!(f, "Invalid agent, {} error(s):", errors.len())?;
                for (i, error) in errors.iter().enumerate() {
                    write!(f, "\n  {}) {}", i + 1, error)?;
                }
                Ok(())
            }
            QBrainError::NotValidated => {
                write!(f, "agent has not passed the startup self-check; call validate() first")
            }
        }
    }
}

impl std::error::Error for QBrainError {}

// Conversion from std::io::Error
impl From<std::io::Error> for QBrainError {
    fn from(err: std::io::Error) -> Self {
        QBrainError::IoError(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for QBrainError {
    fn from(err: serde_json::Error) -> Self {
        QBrainError::SerializationError(err.to_string())
    }
}

// Conversion from bincode::Error
impl From<bincode::Error> for QBrainError {
    fn from(err: bincode::Error) -> Self {
        QBrainError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl QBrainError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        QBrainError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        QBrainError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
