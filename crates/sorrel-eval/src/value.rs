//! Runtime values produced by the Sorrel interpreter.

use crate::builtins::Builtin;
use sorrel_types::ast::FunctionDecl;
use sorrel_types::DataType;
use std::collections::BTreeMap;
use std::rc::Rc;

/// A runtime value.
///
/// Ints and floats are kept apart; promotion happens inside the arithmetic
/// and comparison rules, never silently in storage. Objects keep their
/// properties in key order. Function values share the declaration node they
/// were built from.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Char(char),
    Bool(bool),
    Null,
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
    Function(Rc<FunctionDecl>),
    Native(Builtin),
}

impl Value {
    /// The [`DataType`] this value reports.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Int,
            Value::Float(_) => DataType::Float,
            Value::Str(_) => DataType::String,
            Value::Char(_) => DataType::Char,
            Value::Bool(_) => DataType::Bool,
            Value::Null => DataType::Null,
            Value::Array(_) => DataType::Array,
            Value::Object(_) => DataType::Object,
            Value::Function(_) | Value::Native(_) => DataType::Function,
        }
    }

    /// Numeric view: ints promote to floats, everything else is `None`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Render for printed output. Silly mode renames the bool and null
    /// labels.
    pub fn display(&self, silly: bool) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Float(n) => format_float(*n),
            Value::Str(s) => s.clone(),
            Value::Char(c) => c.to_string(),
            Value::Bool(true) => if silly { "yup" } else { "true" }.to_string(),
            Value::Bool(false) => if silly { "nope" } else { "false" }.to_string(),
            Value::Null => if silly { "nothing" } else { "null" }.to_string(),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.display(silly)).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Object(fields) => {
                if fields.is_empty() {
                    return "{}".to_string();
                }
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(k, v)| format!("{k}: {}", v.display(silly)))
                    .collect();
                format!("{{ {} }}", parts.join(", "))
            }
            Value::Function(func) => format!("<func {}>", func.name),
            Value::Native(builtin) => format!("<native {}>", builtin.name()),
        }
    }
}

/// Whole floats print with one decimal so they stay recognizably floats.
fn format_float(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{n:.1}")
    } else {
        n.to_string()
    }
}
