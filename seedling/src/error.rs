//! Construction-time error types.
//!
//! Only misuse detected while *building* a schema is reported as an error.
//! Everything that goes wrong while generating is degraded into a
//! best-effort value plus a [`Diagnostic`](crate::diagnostics::Diagnostic).

use thiserror::Error;

/// Boxed error returned by fallible user callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a fallible user callback
pub type CallbackResult<T> = Result<T, BoxError>;

/// Errors raised by schema factories
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// A choice-based factory was given nothing to choose from
    #[error("{factory} requires at least one choice")]
    EmptyChoices { factory: &'static str },

    /// Weights were negative, non-finite, or summed to zero
    #[error("invalid weights for {factory}: {reason}")]
    InvalidWeights {
        factory: &'static str,
        reason: String,
    },

    /// Any other malformed factory argument
    #[error("invalid argument `{argument}` for {factory}: {reason}")]
    InvalidArgument {
        factory: &'static str,
        argument: &'static str,
        reason: String,
    },
}

impl SchemaError {
    /// Create an empty-choices error
    pub fn empty_choices(factory: &'static str) -> Self {
        Self::EmptyChoices { factory }
    }

    /// Create an invalid-weights error
    pub fn invalid_weights(factory: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidWeights {
            factory,
            reason: reason.into(),
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(
        factory: &'static str,
        argument: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            factory,
            argument,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        assert_eq!(
            SchemaError::empty_choices("one_of").to_string(),
            "one_of requires at least one choice"
        );
        assert_eq!(
            SchemaError::invalid_weights("weighted", "all weights are zero").to_string(),
            "invalid weights for weighted: all weights are zero"
        );
        assert_eq!(
            SchemaError::invalid_argument("union", "variants", "empty").to_string(),
            "invalid argument `variants` for union: empty"
        );
    }

    #[test]
    fn test_box_error_from_string() {
        let err: BoxError = "callback exploded".into();
        assert_eq!(err.to_string(), "callback exploded");
    }
}
