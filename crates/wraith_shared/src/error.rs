//! # Error Types
//!
//! Every failure the engine can report. Validation errors leave state
//! untouched; binding errors abort start-up.

use thiserror::Error;

use crate::ids::ModelId;
use crate::property::PropertyId;

/// Errors raised by models, the tracker and engine start-up.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WraithError {
    /// A numeric argument was outside its allowed range.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        /// Argument name.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// No tracked model has this id.
    #[error("model not found: {0}")]
    NotFound(ModelId),

    /// A symbolic property could not be bound to a host field.
    #[error("no host binding for {property:?} in schema {schema}: {reason}")]
    BindingUnavailable {
        /// Property that failed to resolve.
        property: PropertyId,
        /// Schema version the lookup ran against.
        schema: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// No candidate schema accepts the version the host declared.
    #[error("no compatible host schema for version {version}")]
    IncompatibleHost {
        /// Version the host declared.
        version: String,
    },

    /// The caller broke a precondition (wrong variant, already spawned, ...).
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// Configuration could not be read or holds invalid values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WraithError {
    /// Shorthand for [`WraithError::InvalidArgument`].
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Fails with `InvalidArgument` unless `min <= value <= max`.
    pub fn check_range(value: i32, min: i32, max: i32, name: &'static str) -> WraithResult<()> {
        if value < min || value > max {
            return Err(Self::invalid_argument(
                name,
                format!("must be between {min} and {max}, but was {value}"),
            ));
        }
        Ok(())
    }
}

/// Result type for WRAITH operations.
pub type WraithResult<T> = Result<T, WraithError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_bounds_are_inclusive() {
        assert!(WraithError::check_range(0, 0, 15, "light").is_ok());
        assert!(WraithError::check_range(15, 0, 15, "light").is_ok());
        assert!(WraithError::check_range(16, 0, 15, "light").is_err());
        assert!(WraithError::check_range(-1, 0, 15, "light").is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = WraithError::check_range(60, 0, 59, "teleport duration").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument `teleport duration`: must be between 0 and 59, but was 60"
        );
    }
}
