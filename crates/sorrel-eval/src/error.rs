//! Runtime error types for the Sorrel interpreter.

use crate::value::Value;
use thiserror::Error;

/// Error raised while executing a program.
///
/// `Return` is not an error a host ever sees: the interpreter uses it to
/// unwind a function body and catches it at the call boundary. A `return`
/// at the top level surfaces as [`RuntimeError::TopLevelReturn`] instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuntimeError {
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("'{0}' is already declared in this scope")]
    Redeclaration(String),

    #[error("cannot assign to constant '{0}'")]
    AssignmentToConstant(String),

    #[error("constant '{0}' must be declared with a value")]
    UninitializedConstant(String),

    #[error("invalid assignment target")]
    InvalidAssignmentTarget,

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("unknown type label '{0}'")]
    UnknownTypeLabel(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("integer overflow in '{0}'")]
    Overflow(String),

    #[error("'{0}' produced a non-finite result")]
    NonFiniteResult(String),

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    #[error("null access: {0}")]
    NullAccess(String),

    #[error("{0} is not callable")]
    NotCallable(String),

    #[error("'{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("gas exhausted: program exceeded {0} steps")]
    GasExhausted(u64),

    #[error("call depth exceeded {0} frames")]
    CallDepthExceeded(usize),

    #[error("'return' outside of a function")]
    TopLevelReturn,

    /// Internal control flow for `return`; caught at the call boundary.
    #[error("return")]
    Return(Value),
}

/// Result alias for interpreter operations.
pub type EvalResult<T> = Result<T, RuntimeError>;
