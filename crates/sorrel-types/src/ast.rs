//! AST node types for the Sorrel language.
//!
//! Every node carries a [`Span`] for error reporting and exposes its
//! [`NodeKind`] through an infallible `kind()` accessor; the kind is the
//! enum discriminant, so a node can never carry a mismatched tag.
//! Recursive positions are boxed to keep enum sizes reasonable.
//! Trees are plain immutable values: the parser builds them bottom-up and
//! the evaluator only reads.

use crate::error::UnknownLabel;
use crate::{DataType, Operator, Span};

// ══════════════════════════════════════════════════════════════════════════════
// Node Kinds
// ══════════════════════════════════════════════════════════════════════════════

/// Discriminator for every concrete node variant.
///
/// The evaluator dispatches by matching the node enums themselves; this tag
/// exists for introspection (debug dumps, tooling) and is derived from the
/// variant, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    VarDeclaration,
    FunctionDeclaration,
    Return,
    IfStatement,
    IfElseStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,
    BoolLiteral,
    NullLiteral,
    ArrayLiteral,
    ObjectLiteral,
    Property,
    Identifier,
    BinaryExpr,
    UnaryExpr,
    AssignmentExpr,
    MemberExpr,
    IndexExpr,
    CallExpr,
    SetMutDefault,
    SetSilly,
}

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete Sorrel compilation unit: an ordered statement sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Program {
    pub fn new(body: Vec<Stmt>, span: Span) -> Self {
        Self { body, span }
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::Program
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement. Expressions appear in statement position through
/// [`Stmt::Expr`]; such a statement reports the expression's own kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `const int x = 5;` / `mut float y;` / `int z = 1;`
    VarDecl(VarDecl),
    /// `func add(int a, int b): int { ... }`
    FunctionDecl(FunctionDecl),
    /// `return expr;` / `return;`
    Return(ReturnStmt),
    /// `if (cond) { ... }` with no else arm
    If(IfStmt),
    /// `if (cond) { ... } else { ... }`
    IfElse(IfElseStmt),
    /// `while (cond) { ... }`
    While(WhileStmt),
    /// `do { ... } while (cond);`
    DoWhile(DoWhileStmt),
    /// `for (init; cond; step) { ... }`
    For(ForStmt),
    /// `#default const;` / `#default mut;`
    MutDefault(MutDefaultStmt),
    /// `#silly;`
    SillyDefault(SillyDefaultStmt),
    /// A bare expression terminated by `;`.
    Expr(Expr),
}

impl Stmt {
    pub fn kind(&self) -> NodeKind {
        match self {
            Stmt::VarDecl(_) => NodeKind::VarDeclaration,
            Stmt::FunctionDecl(_) => NodeKind::FunctionDeclaration,
            Stmt::Return(_) => NodeKind::Return,
            Stmt::If(_) => NodeKind::IfStatement,
            Stmt::IfElse(_) => NodeKind::IfElseStatement,
            Stmt::While(_) => NodeKind::WhileStatement,
            Stmt::DoWhile(_) => NodeKind::DoWhileStatement,
            Stmt::For(_) => NodeKind::ForStatement,
            Stmt::MutDefault(_) => NodeKind::SetMutDefault,
            Stmt::SillyDefault(_) => NodeKind::SetSilly,
            Stmt::Expr(e) => e.kind(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl(s) => s.span,
            Stmt::FunctionDecl(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::IfElse(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::MutDefault(s) => s.span,
            Stmt::SillyDefault(s) => s.span,
            Stmt::Expr(e) => e.span,
        }
    }
}

/// A variable declaration.
///
/// Constancy comes in two flavors: spelled out (`const`/`mut`) or left to
/// the session default. `constancy_defaulted` records which one this
/// declaration used so the evaluator can resolve the effective constancy
/// against the `#default` toggle in force when it runs.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub identifier: String,
    /// Meaningful only when `constancy_defaulted` is false.
    pub constant: bool,
    pub constancy_defaulted: bool,
    pub value: Option<Expr>,
    pub data_type: DataType,
    pub span: Span,
}

impl VarDecl {
    /// Declaration without an explicit `const`/`mut`: `int x = 5;`
    pub fn new(
        identifier: impl Into<String>,
        data_type: DataType,
        value: Option<Expr>,
        span: Span,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            constant: false,
            constancy_defaulted: true,
            value,
            data_type,
            span,
        }
    }

    /// Declaration with explicit constancy: `const int x = 5;`
    pub fn with_constancy(
        identifier: impl Into<String>,
        constant: bool,
        data_type: DataType,
        value: Option<Expr>,
        span: Span,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            constant,
            constancy_defaulted: false,
            value,
            data_type,
            span,
        }
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::VarDeclaration
    }
}

/// A function declaration.
///
/// Parameter types stay as the textual labels written in source; the
/// evaluator resolves them per call. The return type resolves at
/// construction, so an unknown label fails the declaration itself.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub return_type: DataType,
    pub span: Span,
}

impl FunctionDecl {
    pub fn new(
        name: impl Into<String>,
        params: Vec<Param>,
        body: Vec<Stmt>,
        return_type_label: &str,
        span: Span,
    ) -> Result<Self, UnknownLabel> {
        Ok(Self {
            name: name.into(),
            params,
            body,
            return_type: DataType::from_keyword(return_type_label)?,
            span,
        })
    }

    /// Constructor for callers that already hold a resolved return type
    /// (e.g. `type[]` syntax, which has no keyword).
    pub fn with_return_type(
        name: impl Into<String>,
        params: Vec<Param>,
        body: Vec<Stmt>,
        return_type: DataType,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            params,
            body,
            return_type,
            span,
        }
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::FunctionDeclaration
    }
}

/// A parameter: `int a`. The type is kept textual.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub type_label: String,
    pub span: Span,
}

impl Param {
    pub fn new(name: impl Into<String>, type_label: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            type_label: type_label.into(),
            span,
        }
    }
}

/// `return;` or `return expr;` — a missing expression is a void return.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

impl ReturnStmt {
    pub fn kind(&self) -> NodeKind {
        NodeKind::Return
    }
}

/// `if (cond) { body }` with no else arm.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl IfStmt {
    pub fn kind(&self) -> NodeKind {
        NodeKind::IfStatement
    }
}

/// `if (cond) { ... } else { ... }`.
///
/// Owns a whole [`IfStmt`] as its then-branch; the composition keeps the
/// two shapes separate instead of giving IfStmt an optional else arm.
#[derive(Debug, Clone, PartialEq)]
pub struct IfElseStmt {
    pub if_stmt: IfStmt,
    pub else_body: Vec<Stmt>,
    pub span: Span,
}

impl IfElseStmt {
    pub fn kind(&self) -> NodeKind {
        NodeKind::IfElseStatement
    }
}

/// `while (cond) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl WhileStmt {
    pub fn kind(&self) -> NodeKind {
        NodeKind::WhileStatement
    }
}

/// `do { body } while (cond);` — body runs before the first test.
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub condition: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl DoWhileStmt {
    pub fn kind(&self) -> NodeKind {
        NodeKind::DoWhileStatement
    }
}

/// `for (init; cond; step) { body }`.
///
/// All three control slots are always present; the parser fills an omitted
/// initializer/step with a null literal and an omitted condition with
/// `true`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Box<Stmt>,
    pub condition: Expr,
    pub update: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl ForStmt {
    pub fn kind(&self) -> NodeKind {
        NodeKind::ForStatement
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Meta-Statements
// ══════════════════════════════════════════════════════════════════════════════

/// `#default const;` / `#default mut;`
///
/// Ordinary tree node; evaluating it flips the session-wide constancy
/// default applied to declarations that omit `const`/`mut`.
#[derive(Debug, Clone, PartialEq)]
pub struct MutDefaultStmt {
    pub immutable: bool,
    pub span: Span,
}

impl MutDefaultStmt {
    pub fn kind(&self) -> NodeKind {
        NodeKind::SetMutDefault
    }
}

/// `#silly;`
///
/// Turns on silly mode for the rest of the session. The payload is always
/// true at construction; what the mode does is the evaluator's business.
#[derive(Debug, Clone, PartialEq)]
pub struct SillyDefaultStmt {
    pub enabled: bool,
    pub span: Span,
}

impl SillyDefaultStmt {
    pub fn new(span: Span) -> Self {
        Self {
            enabled: true,
            span,
        }
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::SetSilly
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression node.
///
/// `data_type` is the slot a later pass (the evaluator, or a type checker)
/// fills in; it defaults to [`DataType::Null`] and is never derived from
/// the expression itself at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub data_type: DataType,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self {
            kind,
            data_type: DataType::Null,
            span,
        }
    }

    /// Fill the type slot. Consumes and returns the node so producers can
    /// chain it onto construction.
    pub fn with_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Binary expression from an already-resolved operator; the span covers
    /// both operands.
    pub fn binary(left: Expr, op: Operator, right: Expr) -> Expr {
        let span = left.span.merge(right.span);
        Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }

    /// Binary expression from an operator token's text, resolved through
    /// [`Operator::from_symbol`]. Resolution failure propagates to the
    /// caller; nothing is defaulted.
    pub fn binary_from_symbol(left: Expr, symbol: &str, right: Expr) -> Result<Expr, UnknownLabel> {
        let op = Operator::from_symbol(symbol)?;
        Ok(Expr::binary(left, op, right))
    }

    pub fn kind(&self) -> NodeKind {
        match &self.kind {
            ExprKind::IntLiteral(_) => NodeKind::IntLiteral,
            ExprKind::FloatLiteral(_) => NodeKind::FloatLiteral,
            ExprKind::StringLiteral(_) => NodeKind::StringLiteral,
            ExprKind::CharLiteral(_) => NodeKind::CharLiteral,
            ExprKind::BoolLiteral(_) => NodeKind::BoolLiteral,
            ExprKind::NullLiteral => NodeKind::NullLiteral,
            ExprKind::ArrayLiteral(_) => NodeKind::ArrayLiteral,
            ExprKind::ObjectLiteral(_) => NodeKind::ObjectLiteral,
            ExprKind::Identifier(_) => NodeKind::Identifier,
            ExprKind::Binary { .. } => NodeKind::BinaryExpr,
            ExprKind::Unary { .. } => NodeKind::UnaryExpr,
            ExprKind::Assignment { .. } => NodeKind::AssignmentExpr,
            ExprKind::Member { .. } => NodeKind::MemberExpr,
            ExprKind::Index { .. } => NodeKind::IndexExpr,
            ExprKind::Call { .. } => NodeKind::CallExpr,
        }
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──
    /// `42`
    IntLiteral(i64),
    /// `3.14`
    FloatLiteral(f64),
    /// `"hello"`
    StringLiteral(String),
    /// `'a'`
    CharLiteral(char),
    /// `true` / `false`
    BoolLiteral(bool),
    /// `null` — displays as the label "null"
    NullLiteral,
    /// `[1, 2, 3]` — empty is valid
    ArrayLiteral(Vec<Expr>),
    /// `{ name: string = "ada", age: int = 36 }` — order preserved; later
    /// duplicate keys override earlier ones when the evaluator builds the
    /// value
    ObjectLiteral(Vec<Property>),

    // ── Names & access ──
    /// `count`
    Identifier(String),
    /// `point.x` (computed=false, property is an Identifier) or
    /// `point["x"]` (computed=true, property evaluated to a key)
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },
    /// `items[i]` — always positional; distinct from computed member
    /// access because the evaluator treats positions and keys differently
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
    },

    // ── Operators ──
    /// `a + b`, `a <= b`, `a && b`, and compound forms like `a += b`
    Binary {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },
    /// `!x`, `-x`, `x++`, `x--`
    Unary {
        op: Operator,
        operand: Box<Expr>,
    },
    /// `target = value`
    Assignment {
        assignee: Box<Expr>,
        value: Box<Expr>,
    },

    // ── Calls ──
    /// `f(a, b)` — callee unconstrained, so `obj.method(x)` works too
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
}

/// One entry of an object literal: `key: type = value`.
///
/// Carries its own declared [`DataType`], resolved from the written label
/// at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: String,
    pub value: Expr,
    pub data_type: DataType,
    pub span: Span,
}

impl Property {
    pub fn new(
        key: impl Into<String>,
        value: Expr,
        type_label: &str,
        span: Span,
    ) -> Result<Self, UnknownLabel> {
        Ok(Self {
            key: key.into(),
            value,
            data_type: DataType::from_keyword(type_label)?,
            span,
        })
    }

    /// Constructor for callers holding a pre-resolved type (`type[]`).
    pub fn with_type(key: impl Into<String>, value: Expr, data_type: DataType, span: Span) -> Self {
        Self {
            key: key.into(),
            value,
            data_type,
            span,
        }
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::Property
    }
}
