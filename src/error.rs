use thiserror::Error;

/// Result type for dronegrid operations
pub type Result<T> = std::result::Result<T, DroneError>;

/// Main error type for the simulator, the agent and the training loop
#[derive(Debug, Error)]
pub enum DroneError {
    /// Action encoding that is not a one-hot over the four relative moves
    #[error("Invalid action encoding: {action}")]
    InvalidAction {
        action: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        reason: String,
    },

    /// Rejection sampling gave up
    #[error("Could not place {what} after {attempts} attempts")]
    PlacementFailed {
        what: &'static str,
        attempts: usize,
    },

    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: String,
        actual: String,
    },

    /// Numerical computation errors (non-finite predictions or losses)
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Empty buffer or batch
    #[error("Empty buffer: {0}")]
    EmptyBuffer(String),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for DroneError {
    fn from(err: bincode::Error) -> Self {
        DroneError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DroneError {
    fn from(err: serde_json::Error) -> Self {
        DroneError::Serialization(err.to_string())
    }
}

// Helper functions for common error patterns
impl DroneError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        DroneError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        DroneError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
