//! Error types for type registration and node construction.
//!
//! ```text
//! RegistrationError - populating a type catalog
//! ExprError         - a factory call rejected its inputs
//! ```
//!
//! Every factory failure is reported synchronously to the immediate caller. No
//! partial node is ever produced; callers propagate the error kind unchanged.

use std::fmt;

use thiserror::Error;

// ============================================================================
// Registration Errors
// ============================================================================

/// Errors that occur while registering types into a catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A referenced type was not found.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// A type with this handle already exists.
    #[error("duplicate type: {0}")]
    DuplicateType(String),

    /// A generic definition was instantiated with the wrong number of arguments.
    #[error("generic type '{name}' expects {expected} type argument(s), got {got}")]
    GenericArity {
        /// The generic definition name.
        name: String,
        /// Declared generic parameter count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },

    /// The type is invalid or malformed.
    #[error("invalid type: {0}")]
    InvalidType(String),
}

// ============================================================================
// Construction Errors
// ============================================================================

/// The error taxonomy of the node factory, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NullArgument,
    InvalidShape,
    TypeMismatch,
    OperatorNotDefined,
    MemberNotFound,
    AmbiguousMatch,
    NotSupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NullArgument => "null argument",
            ErrorKind::InvalidShape => "invalid shape",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::OperatorNotDefined => "operator not defined",
            ErrorKind::MemberNotFound => "member not found",
            ErrorKind::AmbiguousMatch => "ambiguous match",
            ErrorKind::NotSupported => "not supported",
        };
        f.write_str(name)
    }
}

/// Errors reported by node factory operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    /// A required input was absent.
    #[error("argument '{name}' is required")]
    NullArgument {
        /// The parameter that was missing.
        name: &'static str,
    },

    /// Wrong arity or kind for the requested node.
    #[error("{message}")]
    InvalidShape {
        /// Description of the violated requirement.
        message: String,
    },

    /// Two sides of a construct have incompatible static types.
    #[error("{message}")]
    TypeMismatch {
        /// Description of the mismatch.
        message: String,
    },

    /// No built-in or user-defined operator applies.
    #[error("operator '{op}' is not defined for {operands}")]
    OperatorNotDefined {
        /// The operator (node kind) that was requested.
        op: String,
        /// Formatted operand type list, e.g. `'int' and 'double'`.
        operands: String,
    },

    /// Named-member lookup found nothing applicable.
    #[error("no member '{member}' on type '{type_name}' {detail}")]
    MemberNotFound {
        /// The member name that was looked up.
        member: String,
        /// The type that was searched.
        type_name: String,
        /// What part of the lookup failed.
        detail: String,
    },

    /// More than one member matched with equal preference.
    #[error("more than one member '{member}' on type '{type_name}' is compatible with the supplied arguments")]
    AmbiguousMatch {
        /// The member name that was looked up.
        member: String,
        /// The type that was searched.
        type_name: String,
    },

    /// The caller supplied an unknown or unhandled node kind.
    #[error("{message}")]
    NotSupported {
        /// What was not supported.
        message: String,
    },
}

impl ExprError {
    /// Get the taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExprError::NullArgument { .. } => ErrorKind::NullArgument,
            ExprError::InvalidShape { .. } => ErrorKind::InvalidShape,
            ExprError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            ExprError::OperatorNotDefined { .. } => ErrorKind::OperatorNotDefined,
            ExprError::MemberNotFound { .. } => ErrorKind::MemberNotFound,
            ExprError::AmbiguousMatch { .. } => ErrorKind::AmbiguousMatch,
            ExprError::NotSupported { .. } => ErrorKind::NotSupported,
        }
    }

    /// Create a [`ExprError::NullArgument`].
    pub fn null_argument(name: &'static str) -> Self {
        ExprError::NullArgument { name }
    }

    /// Create a [`ExprError::InvalidShape`].
    pub fn invalid_shape(message: impl Into<String>) -> Self {
        ExprError::InvalidShape {
            message: message.into(),
        }
    }

    /// Create a [`ExprError::TypeMismatch`].
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        ExprError::TypeMismatch {
            message: message.into(),
        }
    }

    /// Create a [`ExprError::NotSupported`].
    pub fn not_supported(message: impl Into<String>) -> Self {
        ExprError::NotSupported {
            message: message.into(),
        }
    }

    /// Create an [`ExprError::OperatorNotDefined`] for a binary operator.
    pub fn binary_operator(op: impl fmt::Display, left: &str, right: &str) -> Self {
        ExprError::OperatorNotDefined {
            op: op.to_string(),
            operands: format!("types '{left}' and '{right}'"),
        }
    }

    /// Create an [`ExprError::OperatorNotDefined`] for a unary operator or coercion.
    pub fn unary_operator(op: impl fmt::Display, operand: &str) -> Self {
        ExprError::OperatorNotDefined {
            op: op.to_string(),
            operands: format!("type '{operand}'"),
        }
    }
}

impl From<RegistrationError> for ExprError {
    fn from(err: RegistrationError) -> Self {
        ExprError::invalid_shape(err.to_string())
    }
}
