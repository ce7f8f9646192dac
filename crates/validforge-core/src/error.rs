//! Error types for ValidForge

use thiserror::Error;

use crate::group::GroupId;

/// Invalid metadata or engine setup.
///
/// Configuration errors are fatal and surface as soon as the offending
/// metadata is built; they are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Two elements that do not denote the same logical element were merged.
    #[error("cannot merge metadata of different elements: {left} and {right}")]
    ElementMismatch { left: String, right: String },

    /// Two parameters of different executables (or indices) were merged.
    #[error("cannot merge parameters of different executables: {left} and {right}")]
    ParameterMismatch { left: String, right: String },

    /// The same source group converts to two different target groups.
    #[error("conflicting group conversion for {from}: {first} vs {second}")]
    ConflictingGroupConversion {
        from: GroupId,
        first: GroupId,
        second: GroupId,
    },

    /// A group sequence references itself, directly or through other sequences.
    #[error("group sequence {name} is cyclic: {cycle}")]
    CyclicGroupSequence { name: GroupId, cycle: String },

    /// A group sequence without any groups.
    #[error("group sequence {0} is empty")]
    EmptyGroupSequence(GroupId),

    /// Two sequences registered under the same name.
    #[error("group sequence {0} is already defined")]
    DuplicateGroupSequence(GroupId),

    /// A constraint that can neither be evaluated nor composed.
    #[error("constraint {0} has neither a validator nor composing constraints")]
    MissingValidator(String),

    /// Metadata references a property the bean registration does not expose.
    #[error("bean {bean} has no registered property '{property}'")]
    UnknownProperty { bean: String, property: String },

    /// Metadata references a parameter index outside the executable's arity.
    #[error("executable {executable} has no parameter at index {index}")]
    ParameterOutOfRange { executable: String, index: usize },
}

/// Unexpected failure raised by a validator capability.
///
/// Returning a fault from [`ConstraintValidator::is_valid`](crate::ConstraintValidator::is_valid)
/// aborts the whole validation call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidatorFault {
    pub message: String,
}

impl ValidatorFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Main error type for validation calls.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Invalid metadata discovered while validating.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),

    /// A validator capability failed; no partial result is produced.
    #[error("Validator for {constraint} failed at '{path}': {source}")]
    ValidatorFault {
        constraint: String,
        path: String,
        #[source]
        source: ValidatorFault,
    },

    /// The root value was null and the engine rejects null roots.
    #[error("Cannot validate a null root value")]
    NullRoot,

    /// Executable validation requested for an executable without metadata.
    #[error("No metadata for executable {0}")]
    UnknownExecutable(String),

    /// Executable validation called with the wrong number of arguments.
    #[error("Executable {executable} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        executable: String,
        expected: usize,
        actual: usize,
    },

    /// Property validation requested for a property the bean does not expose.
    #[error("Bean {bean} has no constrained property '{property}'")]
    UnknownProperty { bean: String, property: String },
}

/// Result type alias for ValidForge operations
pub type Result<T> = std::result::Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_converts() {
        let err: ValidationError = ConfigurationError::EmptyGroupSequence(GroupId::new("Seq")).into();
        assert!(matches!(err, ValidationError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: group sequence Seq is empty"
        );
    }

    #[test]
    fn test_validator_fault_is_source() {
        let err = ValidationError::ValidatorFault {
            constraint: "NotNull".to_string(),
            path: "name".to_string(),
            source: ValidatorFault::new("boom"),
        };
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "boom");
    }
}
