//! Sorrel tree-walking interpreter.
//!
//! Executes programs straight from the AST: scoped environments with typed
//! bindings, checked arithmetic, builtin functions, and a gas counter that
//! bounds runaway programs.

mod builtins;
mod env;
mod error;
mod evaluator;
mod value;

pub use builtins::Builtin;
pub use env::{Binding, Environment};
pub use error::{EvalResult, RuntimeError};
pub use evaluator::{Interpreter, DEFAULT_GAS_LIMIT, MAX_CALL_DEPTH};
pub use value::Value;
