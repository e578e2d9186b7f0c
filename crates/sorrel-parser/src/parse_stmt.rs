//! Statement parsing: declarations, control flow, directives.

use sorrel_lexer::token::TokenKind;
use sorrel_types::ast::{
    DoWhileStmt, Expr, ExprKind, ForStmt, FunctionDecl, IfElseStmt, IfStmt, MutDefaultStmt, Param,
    Program, ReturnStmt, SillyDefaultStmt, Stmt, VarDecl, WhileStmt,
};
use sorrel_types::{DataType, ErrorCode};

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse the whole token stream as a program.
    pub(crate) fn parse_program(&mut self) -> Program {
        let start = self.current_span();
        let mut body = Vec::new();

        while !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            if let Some(stmt) = self.parse_statement() {
                body.push(stmt);
            } else {
                self.synchronize();
                // A stray `}` is not a statement boundary at top level
                if self.check_exact(&TokenKind::RBrace) {
                    self.advance();
                }
            }
        }

        let span = if body.is_empty() {
            start
        } else {
            start.merge(self.previous_span())
        };
        Program::new(body, span)
    }

    /// Parse a single statement.
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek_kind() {
            TokenKind::Const | TokenKind::Mut => self.parse_var_decl(),
            // `func name(` opens a function declaration; any other shape is
            // `func` used as the type of a variable declaration
            TokenKind::Func => {
                if matches!(self.look_ahead(1), TokenKind::Identifier(_))
                    && *self.look_ahead(2) == TokenKind::LParen
                {
                    self.parse_function_decl()
                } else {
                    self.parse_var_decl()
                }
            }
            TokenKind::KwInt
            | TokenKind::KwChar
            | TokenKind::KwFloat
            | TokenKind::KwBool
            | TokenKind::KwString
            | TokenKind::KwObj
            | TokenKind::KwVoid => self.parse_var_decl(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Do => self.parse_do_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Directive(_) => self.parse_directive(),
            _ => {
                let expr = self.parse_expression()?;
                self.expect(&TokenKind::Semicolon)?;
                Some(Stmt::Expr(expr))
            }
        }
    }

    /// Parse `{ stmts... }` into a statement list.
    pub(crate) fn parse_block(&mut self) -> Option<Vec<Stmt>> {
        self.stmt_depth += 1;
        if self.stmt_depth > 16 {
            self.error_at_current(
                ErrorCode::STRUCTURAL_LIMIT_EXCEEDED,
                format!(
                    "maximum statement nesting depth is 16, got {}",
                    self.stmt_depth
                ),
            );
            self.stmt_depth -= 1;
            return None;
        }
        let result = self.parse_block_stmts();
        self.stmt_depth -= 1;
        result
    }

    fn parse_block_stmts(&mut self) -> Option<Vec<Stmt>> {
        self.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check_exact(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            if let Some(stmt) = self.parse_statement() {
                stmts.push(stmt);
            } else {
                self.synchronize();
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Some(stmts)
    }

    // ── Declarations ──────────────────────────────────────────────────────────

    /// Parse a variable declaration: `[const|mut] type name [= value] ;`.
    ///
    /// When `const`/`mut` is omitted the declaration's constancy is left to
    /// the session default, which the evaluator applies.
    fn parse_var_decl(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        let explicit = match self.peek_kind() {
            TokenKind::Const => {
                self.advance();
                Some(true)
            }
            TokenKind::Mut => {
                self.advance();
                Some(false)
            }
            _ => None,
        };

        let data_type = self.parse_decl_type()?;
        let (identifier, _) = self.expect_identifier()?;

        let value = if self.eat(&TokenKind::Eq) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(&TokenKind::Semicolon)?;

        let span = start.merge(self.previous_span());
        let decl = match explicit {
            Some(constant) => VarDecl::with_constancy(identifier, constant, data_type, value, span),
            None => VarDecl::new(identifier, data_type, value, span),
        };
        Some(Stmt::VarDecl(decl))
    }

    /// Parse a declaration type: a type keyword, optionally suffixed `[]`.
    fn parse_decl_type(&mut self) -> Option<DataType> {
        let span = self.current_span();
        let label = match self.peek_kind().type_label() {
            Some(label) => label,
            None => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected a type name, got '{}'", self.peek_kind()),
                );
                return None;
            }
        };
        self.advance();

        if self.eat(&TokenKind::LBracket) {
            self.expect(&TokenKind::RBracket)?;
            return Some(DataType::Array);
        }

        match DataType::from_keyword(label) {
            Ok(data_type) => Some(data_type),
            Err(err) => {
                self.error_at(err.code(), err.to_string(), span);
                None
            }
        }
    }

    /// Parse `func name(params): type { body }`.
    fn parse_function_decl(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `func`

        let (name, _) = self.expect_identifier()?;
        self.expect(&TokenKind::LParen)?;
        let params = self.parse_param_list()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Colon)?;

        // Return type: a type keyword, `type[]`, or a bare word that still
        // has to get past the label resolver
        let type_span = self.current_span();
        let mut array_return = false;
        let label: String = if let Some(label) = self.peek_kind().type_label() {
            self.advance();
            if self.eat(&TokenKind::LBracket) {
                self.expect(&TokenKind::RBracket)?;
                array_return = true;
            }
            label.to_string()
        } else if let TokenKind::Identifier(word) = self.peek_kind().clone() {
            self.advance();
            word
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected a return type, got '{}'", self.peek_kind()),
            );
            return None;
        };

        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());

        let decl = if array_return {
            FunctionDecl::with_return_type(name, params, body, DataType::Array, span)
        } else {
            match FunctionDecl::new(name, params, body, &label, span) {
                Ok(decl) => decl,
                Err(err) => {
                    self.error_at(err.code(), err.to_string(), type_span);
                    return None;
                }
            }
        };
        Some(Stmt::FunctionDecl(decl))
    }

    /// Parse a comma-separated parameter list: `int a, string b`.
    ///
    /// Parameter types stay textual: an unknown label here is accepted and
    /// only fails when the function is called.
    fn parse_param_list(&mut self) -> Option<Vec<Param>> {
        let mut params = Vec::new();
        if self.check_exact(&TokenKind::RParen) {
            return Some(params);
        }

        loop {
            let start = self.current_span();
            let type_label: String = if let Some(label) = self.peek_kind().type_label() {
                self.advance();
                label.to_string()
            } else if let TokenKind::Identifier(word) = self.peek_kind().clone() {
                self.advance();
                word
            } else {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected a parameter type, got '{}'", self.peek_kind()),
                );
                return None;
            };

            let (name, name_span) = self.expect_identifier()?;
            params.push(Param::new(name, type_label, start.merge(name_span)));

            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Some(params)
    }

    // ── Control Flow ──────────────────────────────────────────────────────────

    /// Parse `return [expr] ;`.
    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `return`

        let value = if self.check_exact(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon)?;

        let span = start.merge(self.previous_span());
        Some(Stmt::Return(ReturnStmt { value, span }))
    }

    /// Parse `if (cond) { ... }` with an optional `else` arm. An else arm
    /// turns the node into the if/else composition; `else if` chains nest
    /// as a single-statement else body.
    fn parse_if_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `if`

        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;

        let if_span = start.merge(self.previous_span());
        let if_stmt = IfStmt {
            condition,
            body,
            span: if_span,
        };

        if !self.eat(&TokenKind::Else) {
            return Some(Stmt::If(if_stmt));
        }

        let else_body = if self.check_exact(&TokenKind::If) {
            self.stmt_depth += 1;
            if self.stmt_depth > 16 {
                self.error_at_current(
                    ErrorCode::STRUCTURAL_LIMIT_EXCEEDED,
                    format!(
                        "maximum statement nesting depth is 16, got {}",
                        self.stmt_depth
                    ),
                );
                self.stmt_depth -= 1;
                return None;
            }
            let chained = self.parse_if_stmt();
            self.stmt_depth -= 1;
            vec![chained?]
        } else {
            self.parse_block()?
        };

        let span = start.merge(self.previous_span());
        Some(Stmt::IfElse(IfElseStmt {
            if_stmt,
            else_body,
            span,
        }))
    }

    /// Parse `while (cond) { ... }`.
    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `while`

        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_block()?;

        let span = start.merge(self.previous_span());
        Some(Stmt::While(WhileStmt {
            condition,
            body,
            span,
        }))
    }

    /// Parse `do { ... } while (cond) ;`.
    fn parse_do_while_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `do`

        let body = self.parse_block()?;
        self.expect(&TokenKind::While)?;
        self.expect(&TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::RParen)?;
        self.expect(&TokenKind::Semicolon)?;

        let span = start.merge(self.previous_span());
        Some(Stmt::DoWhile(DoWhileStmt {
            condition,
            body,
            span,
        }))
    }

    /// Parse `for (init; cond; update) { ... }`.
    ///
    /// Each header slot may be left empty: the init defaults to a null
    /// expression statement, the condition to `true`, the update to null.
    fn parse_for_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        self.advance(); // eat `for`
        self.expect(&TokenKind::LParen)?;

        let init = if self.check_exact(&TokenKind::Semicolon) {
            let span = self.current_span();
            self.advance();
            Stmt::Expr(Expr::new(ExprKind::NullLiteral, span))
        } else if self.at_decl_start() {
            // the declaration consumes its own `;`
            self.parse_var_decl()?
        } else {
            let expr = self.parse_expression()?;
            self.expect(&TokenKind::Semicolon)?;
            Stmt::Expr(expr)
        };

        let condition = if self.check_exact(&TokenKind::Semicolon) {
            Expr::new(ExprKind::BoolLiteral(true), self.current_span())
        } else {
            self.parse_expression()?
        };
        self.expect(&TokenKind::Semicolon)?;

        let update = if self.check_exact(&TokenKind::RParen) {
            Expr::new(ExprKind::NullLiteral, self.current_span())
        } else {
            self.parse_expression()?
        };
        self.expect(&TokenKind::RParen)?;

        let body = self.parse_block()?;
        let span = start.merge(self.previous_span());
        Some(Stmt::For(ForStmt {
            init: Box::new(init),
            condition,
            update,
            body,
            span,
        }))
    }

    /// Whether the current token can open a variable declaration.
    fn at_decl_start(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Const | TokenKind::Mut)
            || self.peek_kind().type_label().is_some()
    }

    // ── Directives ────────────────────────────────────────────────────────────

    /// Parse `#default const;`, `#default mut;`, or `#silly;`.
    fn parse_directive(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        let word = match self.advance().kind {
            TokenKind::Directive(word) => word,
            other => {
                self.error_at(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected a directive, got '{}'", other),
                    start,
                );
                return None;
            }
        };

        match word.as_str() {
            "default" => {
                let immutable = if self.eat(&TokenKind::Const) {
                    true
                } else if self.eat(&TokenKind::Mut) {
                    false
                } else {
                    self.error_at_current(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!(
                            "expected 'const' or 'mut' after '#default', got '{}'",
                            self.peek_kind()
                        ),
                    );
                    return None;
                };
                self.expect(&TokenKind::Semicolon)?;
                let span = start.merge(self.previous_span());
                Some(Stmt::MutDefault(MutDefaultStmt { immutable, span }))
            }
            "silly" => {
                self.expect(&TokenKind::Semicolon)?;
                let span = start.merge(self.previous_span());
                Some(Stmt::SillyDefault(SillyDefaultStmt::new(span)))
            }
            other => {
                self.error_at_with_suggestion(
                    ErrorCode::UNKNOWN_DIRECTIVE,
                    format!("unknown directive '#{}'", other),
                    start,
                    "The available directives are '#default' and '#silly'",
                );
                None
            }
        }
    }
}
