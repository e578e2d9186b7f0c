use crate::error::UnknownLabel;
use std::fmt;

/// The closed set of value types a Sorrel expression can carry.
///
/// `Array` and `Null` are members without a source-level keyword: the parser
/// synthesizes `Array` from `type[]` syntax, and `Null` is only ever
/// inferred. The other eight resolve from their keyword via
/// [`DataType::from_keyword`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    Char,
    Float,
    Int,
    Bool,
    Function,
    Object,
    Array,
    Null,
    Void,
}

impl DataType {
    /// Resolve a source-level type keyword.
    ///
    /// The mapping is closed; anything outside it is reported to the caller
    /// as an [`UnknownLabel`] so the parser can turn it into a diagnostic
    /// instead of the front end giving up.
    pub fn from_keyword(label: &str) -> Result<DataType, UnknownLabel> {
        match label {
            "int" => Ok(DataType::Int),
            "char" => Ok(DataType::Char),
            "float" => Ok(DataType::Float),
            "bool" => Ok(DataType::Bool),
            "string" => Ok(DataType::String),
            "obj" => Ok(DataType::Object),
            "func" => Ok(DataType::Function),
            "void" => Ok(DataType::Void),
            other => Err(UnknownLabel::Type(other.to_string())),
        }
    }

    /// Canonical label, as shown in diagnostics and by `typeof`.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Char => "char",
            DataType::Float => "float",
            DataType::Int => "int",
            DataType::Bool => "bool",
            DataType::Function => "func",
            DataType::Object => "obj",
            DataType::Array => "array",
            DataType::Null => "null",
            DataType::Void => "void",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
