//! Statement parsing.
//!
//! `parse_statement` dispatches on the current keyword; each statement
//! form has its own subparser. Compound statements open a scope. The
//! choice between a declaration and a statement inside a block is made
//! on whether the current token is a type token, with one exception: an
//! identifier followed by `:` is always a label, even if it currently
//! names a type.

use zinc_lex::TokenKind;
use zinc_util::{CompileError, Result, StmtId};

use crate::ast::{
    CaseStmt, CompoundStmt, Decl, DoWhileStmt, ExprStmt, ForStmt, IfStmt, LabelDecl,
    LabeledStmt, ReturnStmt, Stmt, SwitchStmt, WhileStmt,
};
use crate::Parser;

impl<'a> Parser<'a> {
    /// Parse one statement
    pub(crate) fn parse_statement(&mut self) -> Result<StmtId> {
        if self.current_kind() == TokenKind::Ident && self.peek()?.kind == TokenKind::Colon {
            return self.parse_labeled_stmt();
        }

        match self.current_kind() {
            TokenKind::KwReturn => self.parse_return_stmt(),
            TokenKind::KwIf => self.parse_if_stmt(),
            TokenKind::KwWhile => self.parse_while_stmt(),
            TokenKind::KwDo => self.parse_do_while_stmt(),
            TokenKind::KwFor => self.parse_for_stmt(),
            TokenKind::KwSwitch => self.parse_switch_stmt(),
            TokenKind::KwCase => self.parse_case_stmt(false),
            TokenKind::KwDefault => self.parse_case_stmt(true),
            TokenKind::KwBreak => {
                let span = self.consume()?.span;
                self.expect(TokenKind::Semicolon)?;
                Ok(self.ast.alloc_stmt(Stmt::Break(span)))
            }
            TokenKind::KwContinue => {
                let span = self.consume()?.span;
                self.expect(TokenKind::Semicolon)?;
                Ok(self.ast.alloc_stmt(Stmt::Continue(span)))
            }
            TokenKind::KwGoto => Err(CompileError::unimplemented(
                "'goto' is not supported",
                self.current_span(),
            )),
            TokenKind::LBrace => self.parse_compound_stmt(),
            TokenKind::Semicolon => {
                let span = self.consume()?.span;
                Ok(self
                    .ast
                    .alloc_stmt(Stmt::Expr(ExprStmt { expr: None, span })))
            }
            _ => {
                let current = *self.current();
                if self.is_type_token(&current) {
                    self.parse_decl_stmt()
                } else {
                    self.parse_expr_stmt()
                }
            }
        }
    }

    /// `{ item* }`; opens a new scope for its duration
    pub(crate) fn parse_compound_stmt(&mut self) -> Result<StmtId> {
        let start = self.expect(TokenKind::LBrace)?.span;
        self.with_scope(|p| {
            let mut stmts = Vec::new();
            while p.current_kind() != TokenKind::RBrace && p.current_kind() != TokenKind::Eof {
                stmts.push(p.parse_statement()?);
            }
            let end = p.expect(TokenKind::RBrace)?.span;
            Ok(p.ast.alloc_stmt(Stmt::Compound(CompoundStmt {
                stmts,
                span: start.merge(end),
            })))
        })
    }

    /// `expr ;`
    pub(crate) fn parse_expr_stmt(&mut self) -> Result<StmtId> {
        let start = self.current_span();
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(self.ast.alloc_stmt(Stmt::Expr(ExprStmt {
            expr: Some(expr),
            span: start,
        })))
    }

    /// `return [expr] ;`
    fn parse_return_stmt(&mut self) -> Result<StmtId> {
        let span = self.consume()?.span;
        let value = if self.current_kind() == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(self
            .ast
            .alloc_stmt(Stmt::Return(ReturnStmt { value, span })))
    }

    /// `if ( expr ) stmt [else stmt]`
    fn parse_if_stmt(&mut self) -> Result<StmtId> {
        let span = self.consume()?.span;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.eat(TokenKind::KwElse)? {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(self.ast.alloc_stmt(Stmt::If(IfStmt {
            cond,
            then_branch,
            else_branch,
            span,
        })))
    }

    /// `while ( expr ) stmt`
    fn parse_while_stmt(&mut self) -> Result<StmtId> {
        let span = self.consume()?.span;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_statement()?;
        Ok(self
            .ast
            .alloc_stmt(Stmt::While(WhileStmt { cond, body, span })))
    }

    /// `do stmt while ( expr ) ;`
    fn parse_do_while_stmt(&mut self) -> Result<StmtId> {
        let span = self.consume()?.span;
        let body = self.parse_statement()?;
        self.expect(TokenKind::KwWhile)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(self
            .ast
            .alloc_stmt(Stmt::DoWhile(DoWhileStmt { body, cond, span })))
    }

    /// `for ( stmt stmt [expr] ) stmt`
    ///
    /// The init and condition headers are themselves `;`-terminated
    /// statements (a declaration is allowed in the init position). The
    /// whole construct runs in its own scope so an init declaration dies
    /// with the loop.
    fn parse_for_stmt(&mut self) -> Result<StmtId> {
        let span = self.consume()?.span;
        self.expect(TokenKind::LParen)?;
        self.with_scope(|p| {
            let init = if p.eat(TokenKind::Semicolon)? {
                None
            } else {
                Some(p.parse_for_header()?)
            };
            let cond = if p.eat(TokenKind::Semicolon)? {
                None
            } else {
                Some(p.parse_expr_stmt()?)
            };
            let step = if p.current_kind() == TokenKind::RParen {
                None
            } else {
                Some(p.parse_expression()?)
            };
            p.expect(TokenKind::RParen)?;
            let body = p.parse_statement()?;
            Ok(p.ast.alloc_stmt(Stmt::For(ForStmt {
                init,
                cond,
                step,
                body,
                span,
            })))
        })
    }

    /// The init header of a `for`: a declaration or an expression
    /// statement
    fn parse_for_header(&mut self) -> Result<StmtId> {
        let current = *self.current();
        if self.is_type_token(&current) {
            self.parse_decl_stmt()
        } else {
            self.parse_expr_stmt()
        }
    }

    /// `switch ( expr ) { ... }`; the body must be a compound statement
    fn parse_switch_stmt(&mut self) -> Result<StmtId> {
        let span = self.consume()?.span;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        if self.current_kind() != TokenKind::LBrace {
            return Err(CompileError::unexpected(
                "switch body must be a compound statement",
                self.current_span(),
            ));
        }
        let body = self.parse_compound_stmt()?;
        Ok(self
            .ast
            .alloc_stmt(Stmt::Switch(SwitchStmt { cond, body, span })))
    }

    /// `case expr : stmt` or `default : stmt`
    ///
    /// Each case receives a unique number the emitter uses to build its
    /// jump label.
    fn parse_case_stmt(&mut self, is_default: bool) -> Result<StmtId> {
        let span = self.consume()?.span;
        let value = if is_default {
            None
        } else {
            Some(self.parse_conditional_expression()?)
        };
        self.expect(TokenKind::Colon)?;
        let body = self.parse_statement()?;
        let label = self.next_case_label;
        self.next_case_label += 1;
        Ok(self.ast.alloc_stmt(Stmt::Case(CaseStmt {
            value,
            body,
            is_default,
            label,
            span,
        })))
    }

    /// `identifier : stmt`
    ///
    /// The label name becomes a `Decl::Label` node referenced by the
    /// statement.
    fn parse_labeled_stmt(&mut self) -> Result<StmtId> {
        let name_tok = self.expect(TokenKind::Ident)?;
        let name = name_tok
            .value
            .expect("identifier token carries its spelling");
        self.expect(TokenKind::Colon)?;
        let body = self.parse_statement()?;
        let decl = self.ast.alloc_decl(Decl::Label(LabelDecl {
            name,
            span: name_tok.span,
        }));
        Ok(self.ast.alloc_stmt(Stmt::Labeled(LabeledStmt {
            decl,
            body,
            span: name_tok.span,
        })))
    }
}
