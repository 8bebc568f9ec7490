use thiserror::Error;

/// Raised when a capability object lacks an operation that a computation
/// requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing capability: no implementation of `{operation}` was provided")]
pub struct MissingCapability {
    /// Name of the absent operation.
    pub operation: String,
}

impl MissingCapability {
    /// Create an error naming the absent `operation`.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}
