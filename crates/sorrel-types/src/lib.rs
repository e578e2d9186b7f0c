//! Shared types for the Sorrel interpreter.
//!
//! This crate defines the AST node types, the DataType/Operator vocabulary
//! with its two textual resolvers, source spans, and the structured
//! diagnostics used across all front-end stages.

mod datatype;
mod error;
mod operator;
mod span;
pub mod ast;

pub use datatype::DataType;
pub use error::{
    CompileErrors, ErrorCategory, ErrorCode, Severity, SorrelError, UnknownLabel, MAX_ERRORS,
};
pub use operator::Operator;
pub use span::{SourceFile, Span};
