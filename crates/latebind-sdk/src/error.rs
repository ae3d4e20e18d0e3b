//! Error types shared by adapters, sources and descriptors

/// Result type for every adaptation operation
pub type AdaptResult<T> = Result<T, AdaptError>;

/// Adaptation error taxonomy
///
/// `Clone` so that lazily-built appliers can cache a failed generation and
/// re-raise it on every later use.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdaptError {
    /// Non-interface descriptor, missing argument, or disallowed parameter shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Source lacks the capability the selected strategy requires
    #[error("Unsupported source '{type_name}': {reason}")]
    UnsupportedSource {
        /// Type name of the rejected source
        type_name: String,
        /// Why the source cannot be used
        reason: String,
    },

    /// No matching member on the wrapped object (or on the adapter surface)
    #[error("Member '{member}' not found on '{type_name}'")]
    MemberNotFound {
        /// Type that was searched
        type_name: String,
        /// Requested member name
        member: String,
    },

    /// Value type differs from the exact declared type
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Declared type
        expected: String,
        /// Actual type
        got: String,
    },

    /// The requested adapter could not be synthesized
    #[error("Failed to generate adapter for '{interface}': {reason}")]
    GenerationFailure {
        /// Target interface name
        interface: String,
        /// Reason for the failure
        reason: String,
    },

    /// A member of the wrapped object failed
    #[error("{0}")]
    Invocation(String),
}

impl AdaptError {
    /// Shorthand for [`AdaptError::MemberNotFound`]
    pub fn member_not_found(type_name: impl Into<String>, member: impl Into<String>) -> Self {
        AdaptError::MemberNotFound {
            type_name: type_name.into(),
            member: member.into(),
        }
    }

    /// Shorthand for [`AdaptError::UnsupportedSource`]
    pub fn unsupported(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        AdaptError::UnsupportedSource {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`AdaptError::TypeMismatch`]
    pub fn type_mismatch(expected: impl ToString, got: impl ToString) -> Self {
        AdaptError::TypeMismatch {
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }
}

impl From<String> for AdaptError {
    fn from(s: String) -> Self {
        AdaptError::Invocation(s)
    }
}

impl From<&str> for AdaptError {
    fn from(s: &str) -> Self {
        AdaptError::Invocation(s.to_string())
    }
}
