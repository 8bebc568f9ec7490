//! Errors a run can end with.

use fx_capability::MissingCapability;
use std::error::Error;
use thiserror::Error;

/// The common error type of a run.
///
/// A run ends with `Ok(value)` or one of these. [`FxError::Cancelled`] keeps a
/// cancelled run distinguishable from one that failed.
#[derive(Debug, Error)]
pub enum FxError {
    /// The capability object lacks an operation the computation needs.
    #[error(transparent)]
    MissingCapability(#[from] MissingCapability),

    /// Raised by computation logic or by a capability implementation.
    #[error("Computation raised an error: {0}")]
    Raised(#[source] Box<dyn Error + Send + Sync>),

    /// The run was cancelled while waiting for an external callback.
    #[error("Run was cancelled")]
    Cancelled,

    /// A deferred continuation was dropped without ever being resumed.
    #[error("Continuation for `{operation}` was dropped without being resumed")]
    Abandoned {
        /// Operation whose continuation was dropped.
        operation: String,
    },

    /// The run resolved more descriptors than its settings allow.
    #[error("Run exceeded its limit of {limit} steps")]
    StepLimit {
        /// The configured limit.
        limit: u64,
    },

    /// A value injected into the computation had a different type than its
    /// descriptor promised.
    #[error("Value injected for `{operation}` does not match its descriptor")]
    Mismatch {
        /// Operation whose value was mistyped.
        operation: String,
    },

    /// The run went away without reporting an outcome.
    #[error("Run ended without reporting an outcome")]
    Lost,
}

impl FxError {
    /// Raise an error from computation or capability code.
    ///
    /// Accepts anything convertible into a boxed error, including `&str` and
    /// `String` messages.
    pub fn raise<E>(error: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self::Raised(error.into())
    }

    /// Raise a plain text message.
    pub fn message(text: impl Into<String>) -> Self {
        Self::Raised(text.into().into())
    }

    /// Whether the run was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Name of the missing operation, if that is what failed.
    pub fn missing_operation(&self) -> Option<&str> {
        match self {
            Self::MissingCapability(missing) => Some(&missing.operation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[fx_macros::test]
    fn it_wraps_missing_capabilities_transparently() {
        let error = FxError::from(MissingCapability::new("delay"));

        assert_eq!(error.missing_operation(), Some("delay"));
        assert_eq!(
            error.to_string(),
            "Missing capability: no implementation of `delay` was provided"
        );
    }

    #[fx_macros::test]
    fn it_raises_from_messages() {
        let error = FxError::raise("out of range");

        assert!(!error.is_cancelled());
        assert_eq!(error.to_string(), "Computation raised an error: out of range");
        assert_eq!(
            error.source().map(|source| source.to_string()),
            Some("out of range".to_string())
        );
    }

    #[fx_macros::test]
    fn it_recognizes_cancellation() {
        assert!(FxError::Cancelled.is_cancelled());
        assert_eq!(FxError::Cancelled.missing_operation(), None);
    }
}
