//! Core statement and expression interpreter.

use crate::builtins::{self, Builtin};
use crate::env::{Binding, Environment};
use crate::error::{EvalResult, RuntimeError};
use crate::value::Value;
use sorrel_types::ast::*;
use sorrel_types::{DataType, Operator};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Default gas budget: generous for real programs, small enough that a
/// runaway loop stops quickly.
pub const DEFAULT_GAS_LIMIT: u64 = 5_000_000;

/// Call-depth ceiling. Gas alone cannot stop deep recursion before the
/// host stack runs out.
pub const MAX_CALL_DEPTH: usize = 1_000;

/// One step of an assignment path: an object key or an array position.
enum PathSegment {
    Key(String),
    Index(i64),
}

/// The tree-walking interpreter. Walks AST nodes and produces Values.
pub struct Interpreter {
    /// Binding environment (scoped).
    pub env: Environment,
    /// Gas counter. Limits total steps to stop runaway programs.
    pub gas: u64,
    /// Gas limit.
    pub gas_limit: u64,
    /// Captured print output, one line per `print`/`println` call.
    pub output: Vec<String>,
    /// Constancy applied to declarations that omit `const`/`mut`.
    pub immutable_default: bool,
    /// Silly display mode for printed values.
    pub silly: bool,
    /// Current function-call nesting depth.
    depth: usize,
}

impl Interpreter {
    /// Create an interpreter with the default gas budget and the builtins
    /// registered in the global scope.
    pub fn new() -> Self {
        Self::with_gas_limit(DEFAULT_GAS_LIMIT)
    }

    /// Create an interpreter with a custom gas budget.
    pub fn with_gas_limit(gas_limit: u64) -> Self {
        let mut env = Environment::new();
        builtins::register(&mut env);
        Self {
            env,
            gas: 0,
            gas_limit,
            output: Vec::new(),
            immutable_default: false,
            silly: false,
            depth: 0,
        }
    }

    /// Consume one unit of gas. Returns error if exhausted.
    fn tick(&mut self) -> EvalResult<()> {
        self.gas += 1;
        if self.gas > self.gas_limit {
            Err(RuntimeError::GasExhausted(self.gas_limit))
        } else {
            Ok(())
        }
    }

    /// Reset the consumed gas to zero. Hosts that feed a session line by
    /// line give each submission a fresh budget.
    pub fn reset_gas(&mut self) {
        self.gas = 0;
    }

    /// Drain the captured print output.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }

    /// Render a value using the session's display mode.
    pub fn display_value(&self, value: &Value) -> String {
        value.display(self.silly)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Program & statement execution
    // ══════════════════════════════════════════════════════════════════════

    /// Execute a whole program. Returns the value of the final statement,
    /// which hosts like the REPL echo back.
    pub fn run(&mut self, program: &Program) -> EvalResult<Value> {
        let mut last = Value::Null;
        for stmt in &program.body {
            last = match self.eval_stmt(stmt) {
                Ok(value) => value,
                Err(RuntimeError::Return(_)) => return Err(RuntimeError::TopLevelReturn),
                Err(err) => return Err(err),
            };
        }
        Ok(last)
    }

    /// Execute a single statement.
    pub fn eval_stmt(&mut self, stmt: &Stmt) -> EvalResult<Value> {
        self.tick()?;
        match stmt {
            Stmt::VarDecl(decl) => self.eval_var_decl(decl),
            Stmt::FunctionDecl(decl) => self.eval_function_decl(decl),
            Stmt::Return(ret) => self.eval_return(ret),
            Stmt::If(if_stmt) => self.eval_if(if_stmt),
            Stmt::IfElse(if_else) => self.eval_if_else(if_else),
            Stmt::While(while_stmt) => self.eval_while(while_stmt),
            Stmt::DoWhile(do_while) => self.eval_do_while(do_while),
            Stmt::For(for_stmt) => self.eval_for(for_stmt),
            Stmt::MutDefault(stmt) => {
                self.immutable_default = stmt.immutable;
                Ok(Value::Null)
            }
            Stmt::SillyDefault(stmt) => {
                self.silly = stmt.enabled;
                Ok(Value::Null)
            }
            Stmt::Expr(expr) => self.eval_expr(expr),
        }
    }

    /// Run a statement sequence in the current scope. Returns the value of
    /// the last statement, or Null.
    fn eval_block(&mut self, body: &[Stmt]) -> EvalResult<Value> {
        let mut last = Value::Null;
        for stmt in body {
            last = self.eval_stmt(stmt)?;
        }
        Ok(last)
    }

    /// Run a statement sequence in its own scope. The scope is popped even
    /// when the body bails out, so a persistent session stays clean.
    fn eval_scoped_block(&mut self, body: &[Stmt]) -> EvalResult<()> {
        self.env.push_scope();
        let result = self.eval_block(body);
        self.env.pop_scope();
        result.map(drop)
    }

    fn eval_var_decl(&mut self, decl: &VarDecl) -> EvalResult<Value> {
        if self.env.declared_in_current(&decl.identifier) {
            return Err(RuntimeError::Redeclaration(decl.identifier.clone()));
        }
        let constant = if decl.constancy_defaulted {
            self.immutable_default
        } else {
            decl.constant
        };
        let value = match &decl.value {
            Some(init) => {
                let value = self.eval_expr(init)?;
                self.coerce_declared(value, decl.data_type, &decl.identifier)?
            }
            None => {
                if constant {
                    return Err(RuntimeError::UninitializedConstant(decl.identifier.clone()));
                }
                Value::Null
            }
        };
        self.env.define(
            &decl.identifier,
            Binding {
                value,
                constant,
                declared: decl.data_type,
            },
        );
        Ok(Value::Null)
    }

    fn eval_function_decl(&mut self, decl: &FunctionDecl) -> EvalResult<Value> {
        if self.env.declared_in_current(&decl.name) {
            return Err(RuntimeError::Redeclaration(decl.name.clone()));
        }
        self.env.define(
            &decl.name,
            Binding {
                value: Value::Function(Rc::new(decl.clone())),
                constant: true,
                declared: DataType::Function,
            },
        );
        Ok(Value::Null)
    }

    fn eval_return(&mut self, ret: &ReturnStmt) -> EvalResult<Value> {
        let value = match &ret.value {
            Some(expr) => self.eval_expr(expr)?,
            None => Value::Null,
        };
        Err(RuntimeError::Return(value))
    }

    fn eval_if(&mut self, stmt: &IfStmt) -> EvalResult<Value> {
        if self.eval_condition(&stmt.condition)? {
            self.eval_scoped_block(&stmt.body)?;
        }
        Ok(Value::Null)
    }

    fn eval_if_else(&mut self, stmt: &IfElseStmt) -> EvalResult<Value> {
        if self.eval_condition(&stmt.if_stmt.condition)? {
            self.eval_scoped_block(&stmt.if_stmt.body)?;
        } else {
            self.eval_scoped_block(&stmt.else_body)?;
        }
        Ok(Value::Null)
    }

    fn eval_while(&mut self, stmt: &WhileStmt) -> EvalResult<Value> {
        while self.eval_condition(&stmt.condition)? {
            self.eval_scoped_block(&stmt.body)?;
        }
        Ok(Value::Null)
    }

    fn eval_do_while(&mut self, stmt: &DoWhileStmt) -> EvalResult<Value> {
        loop {
            self.eval_scoped_block(&stmt.body)?;
            if !self.eval_condition(&stmt.condition)? {
                break;
            }
        }
        Ok(Value::Null)
    }

    /// The initializer's scope encloses the condition, the step, and every
    /// iteration; each iteration's body additionally gets its own scope.
    fn eval_for(&mut self, stmt: &ForStmt) -> EvalResult<Value> {
        self.env.push_scope();
        let result = self.run_for(stmt);
        self.env.pop_scope();
        result
    }

    fn run_for(&mut self, stmt: &ForStmt) -> EvalResult<Value> {
        self.eval_stmt(&stmt.init)?;
        while self.eval_condition(&stmt.condition)? {
            self.eval_scoped_block(&stmt.body)?;
            self.eval_expr(&stmt.update)?;
        }
        Ok(Value::Null)
    }

    /// Conditions must be Bool; there is no truthiness coercion.
    fn eval_condition(&mut self, condition: &Expr) -> EvalResult<bool> {
        match self.eval_expr(condition)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::TypeMismatch(format!(
                "condition must be bool, got {}",
                other.data_type()
            ))),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.tick()?;
        match &expr.kind {
            ExprKind::IntLiteral(n) => Ok(Value::Int(*n)),
            ExprKind::FloatLiteral(n) => Ok(Value::Float(*n)),
            ExprKind::StringLiteral(s) => Ok(Value::Str(s.clone())),
            ExprKind::CharLiteral(c) => Ok(Value::Char(*c)),
            ExprKind::BoolLiteral(b) => Ok(Value::Bool(*b)),
            ExprKind::NullLiteral => Ok(Value::Null),

            ExprKind::ArrayLiteral(elems) => self.eval_array_literal(elems),
            ExprKind::ObjectLiteral(props) => self.eval_object_literal(props),

            ExprKind::Identifier(name) => self.eval_identifier(name),
            ExprKind::Member {
                object,
                property,
                computed,
            } => self.eval_member(object, property, *computed),
            ExprKind::Index { array, index } => self.eval_index(array, index),

            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand),
            ExprKind::Assignment { assignee, value } => self.eval_assignment(assignee, value),

            ExprKind::Call { callee, args } => self.eval_call(callee, args),
        }
    }

    // ── Literals ──────────────────────────────────────────────────────────

    fn eval_array_literal(&mut self, elems: &[Expr]) -> EvalResult<Value> {
        let mut values = Vec::with_capacity(elems.len());
        for elem in elems {
            values.push(self.eval_expr(elem)?);
        }
        Ok(Value::Array(values))
    }

    /// Each property value is checked against the property's declared type
    /// with the same leniency as declarations. Later duplicate keys
    /// override earlier ones.
    fn eval_object_literal(&mut self, props: &[Property]) -> EvalResult<Value> {
        let mut fields = BTreeMap::new();
        for prop in props {
            let value = self.eval_expr(&prop.value)?;
            let value = self.coerce_declared(value, prop.data_type, &prop.key)?;
            fields.insert(prop.key.clone(), value);
        }
        Ok(Value::Object(fields))
    }

    // ── Names & access ───────────────────────────────────────────────────

    fn eval_identifier(&self, name: &str) -> EvalResult<Value> {
        self.env
            .get(name)
            .map(|binding| binding.value.clone())
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))
    }

    fn eval_member(&mut self, object: &Expr, property: &Expr, computed: bool) -> EvalResult<Value> {
        let obj = self.eval_expr(object)?;
        let key = self.member_key(property, computed)?;
        self.read_member(obj, key)
    }

    /// Look up a property on an already-evaluated owner.
    fn read_member(&self, owner: Value, key: String) -> EvalResult<Value> {
        match owner {
            Value::Object(fields) => fields
                .get(&key)
                .cloned()
                .ok_or(RuntimeError::UnknownProperty(key)),
            Value::Null => Err(RuntimeError::NullAccess(format!(
                "cannot read property '{key}' of null"
            ))),
            other => Err(RuntimeError::TypeMismatch(format!(
                "cannot read property '{key}' on {}",
                other.data_type()
            ))),
        }
    }

    /// The key an object access names: the identifier's own symbol, or for
    /// computed access the evaluated string.
    fn member_key(&mut self, property: &Expr, computed: bool) -> EvalResult<String> {
        if computed {
            match self.eval_expr(property)? {
                Value::Str(s) => Ok(s),
                other => Err(RuntimeError::TypeMismatch(format!(
                    "computed property must be string, got {}",
                    other.data_type()
                ))),
            }
        } else {
            match &property.kind {
                ExprKind::Identifier(name) => Ok(name.clone()),
                _ => Err(RuntimeError::TypeMismatch(
                    "property name must be an identifier".to_string(),
                )),
            }
        }
    }

    fn eval_index(&mut self, array: &Expr, index: &Expr) -> EvalResult<Value> {
        let target = self.eval_expr(array)?;
        let idx = self.index_value(index)?;
        self.read_index(target, idx)
    }

    /// Select a position from an already-evaluated target. Arrays yield
    /// the element, strings the char at that position.
    fn read_index(&self, target: Value, idx: i64) -> EvalResult<Value> {
        match target {
            Value::Array(items) => {
                let i = array_index(idx, items.len())?;
                Ok(items[i].clone())
            }
            Value::Str(s) => {
                let len = s.chars().count();
                let i = array_index(idx, len)?;
                let c = s
                    .chars()
                    .nth(i)
                    .ok_or(RuntimeError::IndexOutOfBounds { index: idx, len })?;
                Ok(Value::Char(c))
            }
            other => Err(RuntimeError::TypeMismatch(format!(
                "cannot index into {}",
                other.data_type()
            ))),
        }
    }

    /// Evaluate an index expression; only Int positions are valid.
    fn index_value(&mut self, index: &Expr) -> EvalResult<i64> {
        match self.eval_expr(index)? {
            Value::Int(n) => Ok(n),
            other => Err(RuntimeError::TypeMismatch(format!(
                "index must be int, got {}",
                other.data_type()
            ))),
        }
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_binary(&mut self, left: &Expr, op: Operator, right: &Expr) -> EvalResult<Value> {
        // Short-circuit for logical operators
        if op == Operator::LogicalAnd {
            return if !self.bool_operand(left, "&&")? {
                Ok(Value::Bool(false))
            } else {
                Ok(Value::Bool(self.bool_operand(right, "&&")?))
            };
        }
        if op == Operator::LogicalOr {
            return if self.bool_operand(left, "||")? {
                Ok(Value::Bool(true))
            } else {
                Ok(Value::Bool(self.bool_operand(right, "||")?))
            };
        }
        // Compound assignments are read-modify-write on the left target.
        if let Some(base) = op.compound_base() {
            return self.eval_compound_assignment(left, base, right);
        }

        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;
        self.apply_binary(op, lv, rv)
    }

    fn apply_binary(&self, op: Operator, lv: Value, rv: Value) -> EvalResult<Value> {
        match op {
            Operator::Add => self.eval_add(lv, rv),
            Operator::Subtract => self.eval_arith(lv, rv, i64::checked_sub, |a, b| a - b, "-"),
            Operator::Multiply => self.eval_arith(lv, rv, i64::checked_mul, |a, b| a * b, "*"),
            Operator::Divide => self.eval_div(lv, rv),
            Operator::Modulo => self.eval_mod(lv, rv),
            Operator::Exponentiate => self.eval_pow(lv, rv),
            Operator::EqualTo => Ok(Value::Bool(self.structural_eq(&lv, &rv))),
            Operator::NotEqualTo => Ok(Value::Bool(!self.structural_eq(&lv, &rv))),
            Operator::LessThan => self.eval_comparison(lv, rv, Ordering::is_lt, "<"),
            Operator::GreaterThan => self.eval_comparison(lv, rv, Ordering::is_gt, ">"),
            Operator::LessEqTo => self.eval_comparison(lv, rv, Ordering::is_le, "<="),
            Operator::GreaterEqTo => self.eval_comparison(lv, rv, Ordering::is_ge, ">="),
            other => Err(RuntimeError::TypeMismatch(format!(
                "invalid binary operator '{}'",
                other.as_str()
            ))),
        }
    }

    /// `+` adds numbers and concatenates Str/Char combinations.
    fn eval_add(&self, lv: Value, rv: Value) -> EvalResult<Value> {
        match (lv, rv) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_add(b)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::Overflow("+".to_string())),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            (Value::Str(a), Value::Char(b)) => Ok(Value::Str(format!("{a}{b}"))),
            (Value::Char(a), Value::Str(b)) => Ok(Value::Str(format!("{a}{b}"))),
            (Value::Char(a), Value::Char(b)) => Ok(Value::Str(format!("{a}{b}"))),
            (lv, rv) => self.float_arith(lv, rv, |a, b| a + b, "+"),
        }
    }

    /// Int×Int arithmetic stays Int and is checked; any Float operand
    /// promotes the operation to floats.
    fn eval_arith(
        &self,
        lv: Value,
        rv: Value,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
        symbol: &str,
    ) -> EvalResult<Value> {
        if let (Value::Int(a), Value::Int(b)) = (&lv, &rv) {
            return int_op(*a, *b)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::Overflow(symbol.to_string()));
        }
        self.float_arith(lv, rv, float_op, symbol)
    }

    fn float_arith(
        &self,
        lv: Value,
        rv: Value,
        op: fn(f64, f64) -> f64,
        symbol: &str,
    ) -> EvalResult<Value> {
        match (lv.as_float(), rv.as_float()) {
            (Some(a), Some(b)) => {
                let result = op(a, b);
                if result.is_nan() || result.is_infinite() {
                    Err(RuntimeError::NonFiniteResult(symbol.to_string()))
                } else {
                    Ok(Value::Float(result))
                }
            }
            _ => Err(RuntimeError::TypeMismatch(format!(
                "cannot apply '{symbol}' to {} and {}",
                lv.data_type(),
                rv.data_type()
            ))),
        }
    }

    fn eval_div(&self, lv: Value, rv: Value) -> EvalResult<Value> {
        match (&lv, &rv) {
            (Value::Int(a), Value::Int(b)) => {
                if *b == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                a.checked_div(*b)
                    .map(Value::Int)
                    .ok_or_else(|| RuntimeError::Overflow("/".to_string()))
            }
            _ => {
                if lv.as_float().is_some() && rv.as_float() == Some(0.0) {
                    return Err(RuntimeError::DivisionByZero);
                }
                self.float_arith(lv, rv, |a, b| a / b, "/")
            }
        }
    }

    fn eval_mod(&self, lv: Value, rv: Value) -> EvalResult<Value> {
        match (&lv, &rv) {
            (Value::Int(a), Value::Int(b)) => {
                if *b == 0 {
                    return Err(RuntimeError::ModuloByZero);
                }
                a.checked_rem(*b)
                    .map(Value::Int)
                    .ok_or_else(|| RuntimeError::Overflow("%".to_string()))
            }
            _ => {
                if lv.as_float().is_some() && rv.as_float() == Some(0.0) {
                    return Err(RuntimeError::ModuloByZero);
                }
                self.float_arith(lv, rv, |a, b| a % b, "%")
            }
        }
    }

    /// `**` with an Int base and a non-negative Int exponent stays Int and
    /// is checked; everything else computes in floats.
    fn eval_pow(&self, lv: Value, rv: Value) -> EvalResult<Value> {
        match (&lv, &rv) {
            (Value::Int(a), Value::Int(b)) if *b >= 0 => {
                let exp = u32::try_from(*b).map_err(|_| RuntimeError::Overflow("**".to_string()))?;
                a.checked_pow(exp)
                    .map(Value::Int)
                    .ok_or_else(|| RuntimeError::Overflow("**".to_string()))
            }
            _ => self.float_arith(lv, rv, f64::powf, "**"),
        }
    }

    /// Relational comparison over numbers (with promotion), chars, and
    /// strings (lexicographic).
    fn eval_comparison(
        &self,
        lv: Value,
        rv: Value,
        ord_test: fn(Ordering) -> bool,
        symbol: &str,
    ) -> EvalResult<Value> {
        let ord = match (&lv, &rv) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Char(a), Value::Char(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            _ => match (lv.as_float(), rv.as_float()) {
                (Some(a), Some(b)) => match a.partial_cmp(&b) {
                    Some(ord) => ord,
                    None => {
                        return Err(RuntimeError::TypeMismatch(format!(
                            "cannot order the operands of '{symbol}'"
                        )))
                    }
                },
                _ => {
                    return Err(RuntimeError::TypeMismatch(format!(
                        "cannot compare {} and {} with '{symbol}'",
                        lv.data_type(),
                        rv.data_type()
                    )))
                }
            },
        };
        Ok(Value::Bool(ord_test(ord)))
    }

    /// Logical operands must be Bool, even the unevaluated side's result.
    fn bool_operand(&mut self, expr: &Expr, symbol: &str) -> EvalResult<bool> {
        match self.eval_expr(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(RuntimeError::TypeMismatch(format!(
                "'{symbol}' requires bool operands, got {}",
                other.data_type()
            ))),
        }
    }

    fn eval_unary(&mut self, op: Operator, operand: &Expr) -> EvalResult<Value> {
        match op {
            Operator::Subtract => match self.eval_expr(operand)? {
                Value::Int(n) => n
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| RuntimeError::Overflow("-".to_string())),
                Value::Float(n) => Ok(Value::Float(-n)),
                other => Err(RuntimeError::TypeMismatch(format!(
                    "cannot negate {}",
                    other.data_type()
                ))),
            },
            Operator::LogicalNot => match self.eval_expr(operand)? {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(RuntimeError::TypeMismatch(format!(
                    "'!' requires bool, got {}",
                    other.data_type()
                ))),
            },
            Operator::Increment | Operator::Decrement => self.eval_step(operand, op),
            other => Err(RuntimeError::TypeMismatch(format!(
                "invalid unary operator '{}'",
                other.as_str()
            ))),
        }
    }

    /// `++`/`--` resolve the target path once, read the current value
    /// through it, apply one step, and store back through the same path.
    /// Subscripts in the target are evaluated a single time.
    fn eval_step(&mut self, target: &Expr, op: Operator) -> EvalResult<Value> {
        let (root, path) = self.resolve_path(target)?;
        let current = self.read_resolved(&root, &path)?;
        let updated = match (op, &current) {
            (Operator::Increment, Value::Int(n)) => Value::Int(
                n.checked_add(1)
                    .ok_or_else(|| RuntimeError::Overflow("++".to_string()))?,
            ),
            (Operator::Decrement, Value::Int(n)) => Value::Int(
                n.checked_sub(1)
                    .ok_or_else(|| RuntimeError::Overflow("--".to_string()))?,
            ),
            (Operator::Increment, Value::Float(n)) => Value::Float(n + 1.0),
            (Operator::Decrement, Value::Float(n)) => Value::Float(n - 1.0),
            (op, other) => {
                return Err(RuntimeError::TypeMismatch(format!(
                    "cannot apply '{}' to {}",
                    op.as_str(),
                    other.data_type()
                )))
            }
        };
        self.assign_resolved(&root, &path, updated)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Assignment
    // ══════════════════════════════════════════════════════════════════════

    fn eval_assignment(&mut self, assignee: &Expr, value: &Expr) -> EvalResult<Value> {
        let value = self.eval_expr(value)?;
        self.assign_into(assignee, value)
    }

    /// `+=` and friends resolve the target path once, read the current
    /// value through it, apply the base operator with the right-hand
    /// value, and store back through the same path. Subscripts in the
    /// target are evaluated a single time.
    fn eval_compound_assignment(
        &mut self,
        target: &Expr,
        base: Operator,
        value: &Expr,
    ) -> EvalResult<Value> {
        let (root, path) = self.resolve_path(target)?;
        let current = self.read_resolved(&root, &path)?;
        let rhs = self.eval_expr(value)?;
        let updated = self.apply_binary(base, current, rhs)?;
        self.assign_resolved(&root, &path, updated)
    }

    /// Store a value through an assignable expression. An identifier writes
    /// its binding; member/index targets rebuild the owning value along the
    /// access path and store it back through the root binding. Returns the
    /// value as stored (declared-type coercion may promote it).
    fn assign_into(&mut self, target: &Expr, value: Value) -> EvalResult<Value> {
        match &target.kind {
            ExprKind::Identifier(name) => self.assign_binding(name, value),
            ExprKind::Member { .. } | ExprKind::Index { .. } => self.assign_path(target, value),
            _ => Err(RuntimeError::InvalidAssignmentTarget),
        }
    }

    fn assign_binding(&mut self, name: &str, value: Value) -> EvalResult<Value> {
        let (constant, declared) = match self.env.get(name) {
            Some(binding) => (binding.constant, binding.declared),
            None => return Err(RuntimeError::UndefinedVariable(name.to_string())),
        };
        if constant {
            return Err(RuntimeError::AssignmentToConstant(name.to_string()));
        }
        let value = self.coerce_declared(value, declared, name)?;
        self.env.set_value(name, value.clone());
        Ok(value)
    }

    fn assign_path(&mut self, target: &Expr, value: Value) -> EvalResult<Value> {
        let (root, path) = self.resolve_path(target)?;
        self.assign_resolved(&root, &path, value)
    }

    /// Store through an already-resolved path. An empty path writes the
    /// root binding itself.
    fn assign_resolved(
        &mut self,
        root: &str,
        path: &[PathSegment],
        value: Value,
    ) -> EvalResult<Value> {
        if path.is_empty() {
            return self.assign_binding(root, value);
        }
        let (constant, current) = match self.env.get(root) {
            Some(binding) => (binding.constant, binding.value.clone()),
            None => return Err(RuntimeError::UndefinedVariable(root.to_string())),
        };
        if constant {
            return Err(RuntimeError::AssignmentToConstant(root.to_string()));
        }
        let rebuilt = self.store_along_path(current, path, value.clone())?;
        self.env.set_value(root, rebuilt);
        Ok(value)
    }

    /// Flatten a member/index chain to its root identifier plus the access
    /// segments in source order.
    fn resolve_path(&mut self, target: &Expr) -> EvalResult<(String, Vec<PathSegment>)> {
        match &target.kind {
            ExprKind::Identifier(name) => Ok((name.clone(), Vec::new())),
            ExprKind::Member {
                object,
                property,
                computed,
            } => {
                let (root, mut path) = self.resolve_path(object)?;
                path.push(PathSegment::Key(self.member_key(property, *computed)?));
                Ok((root, path))
            }
            ExprKind::Index { array, index } => {
                let (root, mut path) = self.resolve_path(array)?;
                path.push(PathSegment::Index(self.index_value(index)?));
                Ok((root, path))
            }
            _ => Err(RuntimeError::InvalidAssignmentTarget),
        }
    }

    /// Read the value currently stored at an already-resolved path.
    fn read_resolved(&self, root: &str, path: &[PathSegment]) -> EvalResult<Value> {
        let mut value = match self.env.get(root) {
            Some(binding) => binding.value.clone(),
            None => return Err(RuntimeError::UndefinedVariable(root.to_string())),
        };
        for segment in path {
            value = match segment {
                PathSegment::Key(key) => self.read_member(value, key.clone())?,
                PathSegment::Index(idx) => self.read_index(value, *idx)?,
            };
        }
        Ok(value)
    }

    /// Rebuild `current` with `value` stored at the end of `path`.
    /// Intermediate steps must already exist; the final key of an object
    /// may be new.
    fn store_along_path(
        &self,
        current: Value,
        path: &[PathSegment],
        value: Value,
    ) -> EvalResult<Value> {
        let segment = match path.first() {
            Some(segment) => segment,
            None => return Ok(value),
        };
        match (segment, current) {
            (PathSegment::Key(key), Value::Object(mut fields)) => {
                if path.len() == 1 {
                    fields.insert(key.clone(), value);
                } else {
                    let inner = fields
                        .get(key)
                        .cloned()
                        .ok_or_else(|| RuntimeError::UnknownProperty(key.clone()))?;
                    let rebuilt = self.store_along_path(inner, &path[1..], value)?;
                    fields.insert(key.clone(), rebuilt);
                }
                Ok(Value::Object(fields))
            }
            (PathSegment::Index(idx), Value::Array(mut items)) => {
                let i = array_index(*idx, items.len())?;
                if path.len() == 1 {
                    items[i] = value;
                } else {
                    let inner = items[i].clone();
                    items[i] = self.store_along_path(inner, &path[1..], value)?;
                }
                Ok(Value::Array(items))
            }
            (PathSegment::Key(key), Value::Null) => Err(RuntimeError::NullAccess(format!(
                "cannot set property '{key}' of null"
            ))),
            (PathSegment::Key(key), other) => Err(RuntimeError::TypeMismatch(format!(
                "cannot set property '{key}' on {}",
                other.data_type()
            ))),
            (PathSegment::Index(_), other) => Err(RuntimeError::TypeMismatch(format!(
                "cannot index into {}",
                other.data_type()
            ))),
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Calls
    // ══════════════════════════════════════════════════════════════════════

    fn eval_call(&mut self, callee: &Expr, args: &[Expr]) -> EvalResult<Value> {
        let callee_val = self.eval_expr(callee)?;
        let mut arg_vals = Vec::with_capacity(args.len());
        for arg in args {
            arg_vals.push(self.eval_expr(arg)?);
        }
        match callee_val {
            Value::Function(func) => self.call_function(&func, arg_vals),
            Value::Native(builtin) => self.call_native(builtin, arg_vals),
            other => Err(RuntimeError::NotCallable(other.data_type().to_string())),
        }
    }

    /// Run a user function: arity check, per-call parameter type
    /// resolution, body in a fresh scope chained to the globals.
    fn call_function(&mut self, func: &Rc<FunctionDecl>, args: Vec<Value>) -> EvalResult<Value> {
        if args.len() != func.params.len() {
            return Err(RuntimeError::ArityMismatch {
                name: func.name.clone(),
                expected: func.params.len(),
                got: args.len(),
            });
        }
        if self.depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::CallDepthExceeded(MAX_CALL_DEPTH));
        }
        self.depth += 1;
        let parked = self.env.enter_call();
        let result = self.run_function_body(func, args);
        self.env.exit_call(parked);
        self.depth -= 1;
        match result {
            Ok(_) => self.check_return(func, Value::Null),
            Err(RuntimeError::Return(value)) => self.check_return(func, value),
            Err(err) => Err(err),
        }
    }

    fn run_function_body(&mut self, func: &FunctionDecl, args: Vec<Value>) -> EvalResult<Value> {
        for (param, arg) in func.params.iter().zip(args) {
            let declared = DataType::from_keyword(&param.type_label)
                .map_err(|err| RuntimeError::UnknownTypeLabel(err.label().to_string()))?;
            let value = self.coerce_declared(arg, declared, &param.name)?;
            self.env.define(
                &param.name,
                Binding {
                    value,
                    constant: false,
                    declared,
                },
            );
        }
        self.eval_block(&func.body)
    }

    /// Validate the value a function produced against its declared return
    /// type. Falling off the end produces Null, which void accepts and a
    /// reference-typed return tolerates.
    fn check_return(&self, func: &FunctionDecl, value: Value) -> EvalResult<Value> {
        if func.return_type == DataType::Void {
            return if matches!(value, Value::Null) {
                Ok(Value::Null)
            } else {
                Err(RuntimeError::TypeMismatch(format!(
                    "function '{}' is void but returned {}",
                    func.name,
                    value.data_type()
                )))
            };
        }
        apply_type_rule(func.return_type, value).map_err(|actual| {
            RuntimeError::TypeMismatch(format!(
                "function '{}' declared {} but returned {}",
                func.name, func.return_type, actual
            ))
        })
    }

    /// Dispatch a builtin call. `print`/`println` capture one line to the
    /// output buffer; `len` and `typeof` are pure.
    fn call_native(&mut self, builtin: Builtin, args: Vec<Value>) -> EvalResult<Value> {
        match builtin {
            Builtin::Print | Builtin::Println => {
                let parts: Vec<String> = args.iter().map(|v| v.display(self.silly)).collect();
                self.output.push(parts.join(" "));
                Ok(Value::Null)
            }
            Builtin::Len => {
                self.check_arity(builtin, 1, args.len())?;
                builtins::len(&args[0])
            }
            Builtin::Typeof => {
                self.check_arity(builtin, 1, args.len())?;
                Ok(builtins::type_of(&args[0]))
            }
        }
    }

    fn check_arity(&self, builtin: Builtin, expected: usize, got: usize) -> EvalResult<()> {
        if expected == got {
            Ok(())
        } else {
            Err(RuntimeError::ArityMismatch {
                name: builtin.name().to_string(),
                expected,
                got,
            })
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Typing & equality
    // ══════════════════════════════════════════════════════════════════════

    /// Check a value against a declared type, naming the slot in the error.
    fn coerce_declared(&self, value: Value, declared: DataType, name: &str) -> EvalResult<Value> {
        apply_type_rule(declared, value).map_err(|actual| {
            RuntimeError::TypeMismatch(format!(
                "cannot store {actual} in '{name}' declared as {declared}"
            ))
        })
    }

    /// Deep structural equality. Ints and floats compare numerically, the
    /// same promotion the relational operators use.
    pub fn structural_eq(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Float(x), Value::Float(y)) => x == y,
            (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => {
                *x as f64 == *y
            }
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::Char(x), Value::Char(y)) => x == y,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Null, Value::Null) => true,
            (Value::Array(x), Value::Array(y)) => {
                x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| self.structural_eq(a, b))
            }
            (Value::Object(x), Value::Object(y)) => {
                x.len() == y.len()
                    && x.iter()
                        .all(|(k, v)| y.get(k).map_or(false, |w| self.structural_eq(v, w)))
            }
            (Value::Function(x), Value::Function(y)) => Rc::ptr_eq(x, y),
            (Value::Native(x), Value::Native(y)) => x == y,
            _ => false,
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// The declared-type rule shared by declarations, assignments, parameters,
/// and returns: exact match, Int into a Float slot (promoted), or Null into
/// a reference-typed slot. The error side carries the actual type.
fn apply_type_rule(declared: DataType, value: Value) -> Result<Value, DataType> {
    let actual = value.data_type();
    if actual == declared {
        return Ok(value);
    }
    match (declared, &value) {
        (DataType::Float, Value::Int(n)) => Ok(Value::Float(*n as f64)),
        (
            DataType::String | DataType::Object | DataType::Array | DataType::Function,
            Value::Null,
        ) => Ok(value),
        _ => Err(actual),
    }
}

/// Validate a 0-based index against a length.
fn array_index(index: i64, len: usize) -> EvalResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|i| *i < len)
        .ok_or(RuntimeError::IndexOutOfBounds { index, len })
}
