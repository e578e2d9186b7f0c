use crate::error::UnknownLabel;
use std::fmt;

/// The closed set of Sorrel operators.
///
/// Only the simple binary/logical/relational forms resolve from text via
/// [`Operator::from_symbol`]. The compound-assignment, increment/decrement
/// and exponent members are synthesized directly by the parser from their
/// dedicated lexemes and never pass through the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponentiate,
    // compound assignment
    AddAssignment,
    SubtractAssignment,
    MultiplyAssignment,
    DivideAssignment,
    ModuloAssignment,
    // step
    Increment,
    Decrement,
    // logical
    LogicalAnd,
    LogicalOr,
    LogicalNot,
    // relational
    GreaterThan,
    GreaterEqTo,
    LessThan,
    LessEqTo,
    EqualTo,
    NotEqualTo,
    /// Sentinel for an operator slot that never got a real value. The
    /// evaluator rejects it; no constructor in this crate produces it.
    Unknown,
}

impl Operator {
    /// Resolve a source-level operator token.
    ///
    /// Covers exactly the fourteen simple forms. Everything else, including
    /// `++ -- ** += -= *= /= %=`, is an [`UnknownLabel`] here even though
    /// the enum has members for those: the parser builds them directly from
    /// their own tokens.
    pub fn from_symbol(token: &str) -> Result<Operator, UnknownLabel> {
        match token {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "%" => Ok(Operator::Modulo),
            "&&" => Ok(Operator::LogicalAnd),
            "||" => Ok(Operator::LogicalOr),
            "!" => Ok(Operator::LogicalNot),
            ">" => Ok(Operator::GreaterThan),
            "<" => Ok(Operator::LessThan),
            ">=" => Ok(Operator::GreaterEqTo),
            "<=" => Ok(Operator::LessEqTo),
            "==" => Ok(Operator::EqualTo),
            "!=" => Ok(Operator::NotEqualTo),
            other => Err(UnknownLabel::Operator(other.to_string())),
        }
    }

    /// Source symbol, for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Exponentiate => "**",
            Operator::AddAssignment => "+=",
            Operator::SubtractAssignment => "-=",
            Operator::MultiplyAssignment => "*=",
            Operator::DivideAssignment => "/=",
            Operator::ModuloAssignment => "%=",
            Operator::Increment => "++",
            Operator::Decrement => "--",
            Operator::LogicalAnd => "&&",
            Operator::LogicalOr => "||",
            Operator::LogicalNot => "!",
            Operator::GreaterThan => ">",
            Operator::GreaterEqTo => ">=",
            Operator::LessThan => "<",
            Operator::LessEqTo => "<=",
            Operator::EqualTo => "==",
            Operator::NotEqualTo => "!=",
            Operator::Unknown => "<unknown>",
        }
    }

    /// For a compound-assignment member, the arithmetic operator it applies
    /// before storing. `None` for everything else.
    pub fn compound_base(&self) -> Option<Operator> {
        match self {
            Operator::AddAssignment => Some(Operator::Add),
            Operator::SubtractAssignment => Some(Operator::Subtract),
            Operator::MultiplyAssignment => Some(Operator::Multiply),
            Operator::DivideAssignment => Some(Operator::Divide),
            Operator::ModuloAssignment => Some(Operator::Modulo),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
