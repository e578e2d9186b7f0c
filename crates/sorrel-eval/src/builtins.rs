//! Builtin functions pre-registered in the global scope.
//!
//! The identity of each builtin lives here; `print`/`println` need the
//! interpreter's output buffer and silly toggle, so their dispatch stays in
//! the interpreter.

use crate::env::{Binding, Environment};
use crate::error::{EvalResult, RuntimeError};
use crate::value::Value;
use sorrel_types::DataType;

/// The closed set of builtin functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Print,
    Println,
    Len,
    Typeof,
}

impl Builtin {
    /// Every builtin, in registration order.
    pub const ALL: [Builtin; 4] = [
        Builtin::Print,
        Builtin::Println,
        Builtin::Len,
        Builtin::Typeof,
    ];

    /// The name the builtin is bound to.
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Print => "print",
            Builtin::Println => "println",
            Builtin::Len => "len",
            Builtin::Typeof => "typeof",
        }
    }
}

/// Register every builtin as a constant binding in the global scope.
pub fn register(env: &mut Environment) {
    for builtin in Builtin::ALL {
        env.define(
            builtin.name(),
            Binding {
                value: Value::Native(builtin),
                constant: true,
                declared: DataType::Function,
            },
        );
    }
}

/// `len(x)` — element count of a string, array, or object.
pub fn len(value: &Value) -> EvalResult<Value> {
    match value {
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        Value::Array(items) => Ok(Value::Int(items.len() as i64)),
        Value::Object(fields) => Ok(Value::Int(fields.len() as i64)),
        other => Err(RuntimeError::TypeMismatch(format!(
            "len expects string, array, or obj, got {}",
            other.data_type()
        ))),
    }
}

/// `typeof(x)` — the value's type label as a string.
pub fn type_of(value: &Value) -> Value {
    Value::Str(value.data_type().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_len_counts_chars_not_bytes() {
        assert_eq!(len(&Value::Str("héllo".into())), Ok(Value::Int(5)));
        assert_eq!(len(&Value::Str(String::new())), Ok(Value::Int(0)));
    }

    #[test]
    fn test_len_of_collections() {
        let arr = Value::Array(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(len(&arr), Ok(Value::Int(2)));

        let mut fields = BTreeMap::new();
        fields.insert("a".to_string(), Value::Int(1));
        assert_eq!(len(&Value::Object(fields)), Ok(Value::Int(1)));
    }

    #[test]
    fn test_len_rejects_scalars() {
        assert!(matches!(
            len(&Value::Int(5)),
            Err(RuntimeError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_type_of_labels() {
        assert_eq!(type_of(&Value::Int(1)), Value::Str("int".into()));
        assert_eq!(type_of(&Value::Float(1.0)), Value::Str("float".into()));
        assert_eq!(type_of(&Value::Null), Value::Str("null".into()));
        assert_eq!(type_of(&Value::Array(vec![])), Value::Str("array".into()));
        assert_eq!(
            type_of(&Value::Native(Builtin::Len)),
            Value::Str("func".into())
        );
    }

    #[test]
    fn test_register_binds_constants() {
        let mut env = Environment::new();
        register(&mut env);
        for builtin in Builtin::ALL {
            let binding = env.get(builtin.name()).expect("builtin not registered");
            assert!(binding.constant);
            assert_eq!(binding.declared, DataType::Function);
        }
    }
}
