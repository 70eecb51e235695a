//! Expression parsing by operator-precedence climbing.
//!
//! A single table maps operator tokens to a precedence level; the driver
//! `parse_rhs_of_binary` climbs it. Assignment and the conditional
//! operator are right-associative; everything else is left-associative.
//!
//! A cast-expression is `( type-name ) cast-expression` when the token
//! after `(` is a type token, otherwise a unary-expression. The postfix
//! loop handles calls, subscripts, member access, and postfix `++`/`--`.

use zinc_lex::{Token, TokenKind};
use zinc_sem::{StorageClass, TypeStore};
use zinc_util::{CompileError, ExprId, Result, Span, Symbol, TypeId};

use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
use crate::Parser;

/// Precedence levels, in increasing binding order
#[doc(hidden)]
pub mod prec {
    pub const COMMA: u8 = 1;
    pub const ASSIGNMENT: u8 = 2;
    pub const CONDITIONAL: u8 = 3;
    pub const LOGICAL_OR: u8 = 4;
    pub const LOGICAL_AND: u8 = 5;
    pub const INCLUSIVE_OR: u8 = 6;
    pub const EXCLUSIVE_OR: u8 = 7;
    pub const AND: u8 = 8;
    pub const EQUALITY: u8 = 9;
    pub const RELATIONAL: u8 = 10;
    pub const SHIFT: u8 = 11;
    pub const ADDITIVE: u8 = 12;
    pub const MULTIPLICATIVE: u8 = 13;
}

/// Integer value of a numeric-constant spelling, if it is an integer
///
/// Handles decimal, octal (leading `0`), and hexadecimal (`0x`) forms
/// with any `u`/`l` suffix run. Returns `None` for floating spellings
/// and out-of-range values.
pub(crate) fn int_value_of(text: &str) -> Option<u64> {
    let body = text.trim_end_matches(['u', 'U', 'l', 'L']);

    if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok();
    }
    if body.contains(['.', 'e', 'E']) {
        return None;
    }
    if body.len() > 1 && body.starts_with('0') {
        return u64::from_str_radix(&body[1..], 8).ok();
    }
    body.parse::<u64>().ok()
}

impl<'a> Parser<'a> {
    // =========================================================================
    // ENTRY POINTS
    // =========================================================================

    /// A full expression, comma operator included
    pub(crate) fn parse_expression(&mut self) -> Result<ExprId> {
        let lhs = self.parse_cast_expression()?;
        self.parse_rhs_of_binary(lhs, prec::COMMA)
    }

    /// An assignment-expression (argument and initialiser position)
    pub(crate) fn parse_assignment_expression(&mut self) -> Result<ExprId> {
        let lhs = self.parse_cast_expression()?;
        self.parse_rhs_of_binary(lhs, prec::ASSIGNMENT)
    }

    /// A conditional-expression (constant-expression position)
    pub(crate) fn parse_conditional_expression(&mut self) -> Result<ExprId> {
        let lhs = self.parse_cast_expression()?;
        self.parse_rhs_of_binary(lhs, prec::CONDITIONAL)
    }

    // =========================================================================
    // PRECEDENCE CLIMBING
    // =========================================================================

    /// Precedence of a binary (or conditional) operator token
    fn binary_precedence(kind: TokenKind) -> Option<u8> {
        use TokenKind::*;
        Some(match kind {
            Comma => prec::COMMA,
            Eq | StarEq | SlashEq | PercentEq | PlusEq | MinusEq | ShlEq | ShrEq | AmpEq
            | CaretEq | PipeEq => prec::ASSIGNMENT,
            Question => prec::CONDITIONAL,
            PipePipe => prec::LOGICAL_OR,
            AmpAmp => prec::LOGICAL_AND,
            Pipe => prec::INCLUSIVE_OR,
            Caret => prec::EXCLUSIVE_OR,
            Amp => prec::AND,
            EqEq | BangEq => prec::EQUALITY,
            Lt | Gt | Le | Ge => prec::RELATIONAL,
            Shl | Shr => prec::SHIFT,
            Plus | Minus => prec::ADDITIVE,
            Star | Slash | Percent => prec::MULTIPLICATIVE,
            _ => return None,
        })
    }

    /// AST operator for a binary operator token
    fn binary_op_for(kind: TokenKind) -> Option<BinaryOp> {
        use TokenKind::*;
        Some(match kind {
            Comma => BinaryOp::Comma,
            Eq => BinaryOp::Assign,
            StarEq => BinaryOp::MulAssign,
            SlashEq => BinaryOp::DivAssign,
            PercentEq => BinaryOp::ModAssign,
            PlusEq => BinaryOp::AddAssign,
            MinusEq => BinaryOp::SubAssign,
            ShlEq => BinaryOp::ShlAssign,
            ShrEq => BinaryOp::ShrAssign,
            AmpEq => BinaryOp::AndAssign,
            CaretEq => BinaryOp::XorAssign,
            PipeEq => BinaryOp::OrAssign,
            PipePipe => BinaryOp::LogicalOr,
            AmpAmp => BinaryOp::LogicalAnd,
            Pipe => BinaryOp::BitOr,
            Caret => BinaryOp::BitXor,
            Amp => BinaryOp::BitAnd,
            EqEq => BinaryOp::Eq,
            BangEq => BinaryOp::Ne,
            Lt => BinaryOp::Lt,
            Gt => BinaryOp::Gt,
            Le => BinaryOp::Le,
            Ge => BinaryOp::Ge,
            Shl => BinaryOp::Shl,
            Shr => BinaryOp::Shr,
            Plus => BinaryOp::Add,
            Minus => BinaryOp::Sub,
            Star => BinaryOp::Mul,
            Slash => BinaryOp::Div,
            Percent => BinaryOp::Rem,
            _ => return None,
        })
    }

    /// Climb operators of at least `min_prec`, folding them onto `lhs`
    fn parse_rhs_of_binary(&mut self, mut lhs: ExprId, min_prec: u8) -> Result<ExprId> {
        loop {
            let Some(tok_prec) = Self::binary_precedence(self.current_kind()) else {
                return Ok(lhs);
            };
            if tok_prec < min_prec {
                return Ok(lhs);
            }

            if self.current_kind() == TokenKind::Question {
                lhs = self.parse_conditional_rhs(lhs)?;
                continue;
            }

            let op_token = self.consume()?;
            let op = Self::binary_op_for(op_token.kind)
                .expect("tokens with a precedence map to an operator");
            let mut rhs = self.parse_cast_expression()?;

            // If the operator to the right binds tighter, or equally for
            // a right-associative level, it owns the tentative rhs.
            let next_prec = Self::binary_precedence(self.current_kind()).unwrap_or(0);
            let right_assoc = tok_prec == prec::ASSIGNMENT;
            if next_prec > tok_prec || (next_prec == tok_prec && right_assoc) {
                rhs = self.parse_rhs_of_binary(rhs, tok_prec + u8::from(!right_assoc))?;
            }

            let ty = self.binary_result_type(op, lhs, rhs);
            let span = self.ast.expr(lhs).span.merge(self.ast.expr(rhs).span);
            lhs = self.ast.alloc_expr(Expr {
                kind: ExprKind::Binary { op, lhs, rhs },
                ty,
                span,
            });
        }
    }

    /// `cond ? then : else`, right-associative
    fn parse_conditional_rhs(&mut self, cond: ExprId) -> Result<ExprId> {
        self.consume()?; // '?'
        let then_expr = self.parse_expression()?;
        self.expect(TokenKind::Colon)?;
        let else_first = self.parse_cast_expression()?;
        let else_expr = self.parse_rhs_of_binary(else_first, prec::CONDITIONAL)?;

        let ty = self.ast.expr(then_expr).ty;
        let span = self
            .ast
            .expr(cond)
            .span
            .merge(self.ast.expr(else_expr).span);
        Ok(self.ast.alloc_expr(Expr {
            kind: ExprKind::Conditional {
                cond,
                then_expr,
                else_expr,
            },
            ty,
            span,
        }))
    }

    /// Result type of a binary operation
    ///
    /// Comparisons and logical operators produce `int`; assignment takes
    /// the left type; comma takes the right; pointer arithmetic keeps the
    /// pointer side; the remaining arithmetic keeps the left operand's
    /// type.
    fn binary_result_type(&self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> TypeId {
        let lhs_ty = self.ast.expr(lhs).ty;
        let rhs_ty = self.ast.expr(rhs).ty;

        if op.is_comparison() {
            return TypeStore::INT;
        }
        if op.is_assignment() {
            return lhs_ty;
        }
        match op {
            BinaryOp::Comma => rhs_ty,
            BinaryOp::Add | BinaryOp::Sub => {
                if self.types.is_pointer(lhs_ty) {
                    lhs_ty
                } else if self.types.is_pointer(rhs_ty) {
                    rhs_ty
                } else {
                    lhs_ty
                }
            }
            _ => lhs_ty,
        }
    }

    // =========================================================================
    // CAST AND UNARY EXPRESSIONS
    // =========================================================================

    /// `( type-name ) cast-expression`, or a unary-expression
    pub(crate) fn parse_cast_expression(&mut self) -> Result<ExprId> {
        if self.current_kind() == TokenKind::LParen {
            let next = *self.peek()?;
            if self.is_type_token(&next) {
                let start = self.current_span();
                self.consume()?; // '('
                let ty = self.parse_type_name()?;
                self.expect(TokenKind::RParen)?;
                let operand = self.parse_cast_expression()?;
                let span = start.merge(self.ast.expr(operand).span);
                return Ok(self.ast.alloc_expr(Expr {
                    kind: ExprKind::Cast { operand },
                    ty,
                    span,
                }));
            }
        }
        self.parse_unary_expression()
    }

    /// A type name: declaration specifiers plus an abstract declarator
    pub(crate) fn parse_type_name(&mut self) -> Result<TypeId> {
        let start = self.current_span();
        let spec = self.parse_decl_specifiers()?;
        if spec.storage != StorageClass::None {
            return Err(CompileError::type_synthesis(
                "storage class not allowed in type name",
                start,
            ));
        }
        let base = spec.synthesize(&self.types, start)?;
        let d = self.parse_declarator(base)?;
        if let Some((name, span)) = d.name {
            return Err(CompileError::bad_declarator(
                format!("type name cannot declare '{}'", name),
                span,
            ));
        }
        Ok(d.ty)
    }

    /// Prefix operators, `sizeof`, or a postfix-expression
    fn parse_unary_expression(&mut self) -> Result<ExprId> {
        let token = *self.current();
        match token.kind {
            TokenKind::Amp => {
                self.consume()?;
                let operand = self.parse_cast_expression()?;
                let ty = self.types.pointer_to(self.ast.expr(operand).ty);
                Ok(self.unary(UnaryOp::AddressOf, operand, ty, token.span))
            }
            TokenKind::Star => {
                self.consume()?;
                let operand = self.parse_cast_expression()?;
                let operand_ty = self.ast.expr(operand).ty;
                let ty = self.types.pointee(operand_ty).unwrap_or(operand_ty);
                Ok(self.unary(UnaryOp::Deref, operand, ty, token.span))
            }
            TokenKind::Plus => {
                self.consume()?;
                let operand = self.parse_cast_expression()?;
                let ty = self.ast.expr(operand).ty;
                Ok(self.unary(UnaryOp::Plus, operand, ty, token.span))
            }
            TokenKind::Minus => {
                self.consume()?;
                let operand = self.parse_cast_expression()?;
                let ty = self.ast.expr(operand).ty;
                Ok(self.unary(UnaryOp::Minus, operand, ty, token.span))
            }
            TokenKind::Bang => {
                self.consume()?;
                let operand = self.parse_cast_expression()?;
                Ok(self.unary(UnaryOp::Not, operand, TypeStore::INT, token.span))
            }
            TokenKind::Tilde => {
                self.consume()?;
                let operand = self.parse_cast_expression()?;
                let ty = self.ast.expr(operand).ty;
                Ok(self.unary(UnaryOp::BitNot, operand, ty, token.span))
            }
            TokenKind::PlusPlus => {
                self.consume()?;
                let operand = self.parse_cast_expression()?;
                let ty = self.ast.expr(operand).ty;
                Ok(self.unary(UnaryOp::PreIncrement, operand, ty, token.span))
            }
            TokenKind::MinusMinus => {
                self.consume()?;
                let operand = self.parse_cast_expression()?;
                let ty = self.ast.expr(operand).ty;
                Ok(self.unary(UnaryOp::PreDecrement, operand, ty, token.span))
            }
            TokenKind::KwSizeof => self.parse_sizeof(),
            _ => self.parse_postfix_expression(),
        }
    }

    /// Allocate a unary node
    fn unary(&mut self, op: UnaryOp, operand: ExprId, ty: TypeId, start: Span) -> ExprId {
        let span = start.merge(self.ast.expr(operand).span);
        self.ast.alloc_expr(Expr {
            kind: ExprKind::Unary { op, operand },
            ty,
            span,
        })
    }

    /// `sizeof unary-expression` or `sizeof ( type-name )`
    ///
    /// The result folds to an unsigned 64-bit integer constant.
    fn parse_sizeof(&mut self) -> Result<ExprId> {
        let start = self.current_span();
        self.consume()?; // 'sizeof'

        let size = if self.current_kind() == TokenKind::LParen && {
            let next = *self.peek()?;
            self.is_type_token(&next)
        } {
            self.consume()?; // '('
            let ty = self.parse_type_name()?;
            self.expect(TokenKind::RParen)?;
            self.types.size_of(ty)
        } else {
            let operand = self.parse_unary_expression()?;
            self.types.size_of(self.ast.expr(operand).ty)
        };

        Ok(self.ast.alloc_expr(Expr {
            kind: ExprKind::IntLit(size as i64),
            ty: TypeStore::ULONG,
            span: start,
        }))
    }

    // =========================================================================
    // POSTFIX EXPRESSIONS
    // =========================================================================

    /// A primary expression followed by any number of postfix operators
    fn parse_postfix_expression(&mut self) -> Result<ExprId> {
        let mut expr = self.parse_primary_expression()?;
        loop {
            match self.current_kind() {
                TokenKind::LParen => {
                    expr = self.parse_call(expr)?;
                }
                TokenKind::LBracket => {
                    self.consume()?;
                    let index = self.parse_expression()?;
                    let close = self.expect(TokenKind::RBracket)?;
                    let base_ty = self.ast.expr(expr).ty;
                    let ty = self.types.pointee(base_ty).unwrap_or(base_ty);
                    let span = self.ast.expr(expr).span.merge(close.span);
                    expr = self.ast.alloc_expr(Expr {
                        kind: ExprKind::ArraySubscript { base: expr, index },
                        ty,
                        span,
                    });
                }
                TokenKind::PlusPlus => {
                    let tok = self.consume()?;
                    let ty = self.ast.expr(expr).ty;
                    expr = self.unary(UnaryOp::PostIncrement, expr, ty, tok.span);
                }
                TokenKind::MinusMinus => {
                    let tok = self.consume()?;
                    let ty = self.ast.expr(expr).ty;
                    expr = self.unary(UnaryOp::PostDecrement, expr, ty, tok.span);
                }
                TokenKind::Dot => {
                    expr = self.parse_member(expr, false)?;
                }
                TokenKind::Arrow => {
                    expr = self.parse_member(expr, true)?;
                }
                _ => return Ok(expr),
            }
        }
    }

    /// `.member` or `->member`, resolved against the base record type
    fn parse_member(&mut self, base: ExprId, arrow: bool) -> Result<ExprId> {
        let op_span = self.consume()?.span;
        let name_tok = self.expect(TokenKind::Ident)?;
        let member = name_tok
            .value
            .expect("identifier token carries its spelling");

        let base_ty = self.ast.expr(base).ty;
        let record_ty = if arrow {
            match self.types.pointee(base_ty) {
                Some(inner) if self.types.is_record(inner) => inner,
                _ => {
                    return Err(CompileError::undeclared(
                        format!(
                            "'->' requires a pointer to a struct or union, found '{}'",
                            self.types.display(base_ty)
                        ),
                        op_span,
                    ))
                }
            }
        } else {
            if !self.types.is_record(base_ty) {
                return Err(CompileError::undeclared(
                    format!(
                        "member access requires a struct or union, found '{}'",
                        self.types.display(base_ty)
                    ),
                    op_span,
                ));
            }
            base_ty
        };

        let (index, ty) = self.types.member(record_ty, member).ok_or_else(|| {
            CompileError::undeclared(
                format!(
                    "no member named '{}' in '{}'",
                    member,
                    self.types.display(record_ty)
                ),
                name_tok.span,
            )
        })?;

        let span = self.ast.expr(base).span.merge(name_tok.span);
        Ok(self.ast.alloc_expr(Expr {
            kind: ExprKind::Member {
                base,
                member,
                index,
                arrow,
            },
            ty,
            span,
        }))
    }

    /// Call arguments; the result type is the callee's return type
    fn parse_call(&mut self, callee: ExprId) -> Result<ExprId> {
        self.consume()?; // '('
        let mut args = Vec::new();
        if self.current_kind() != TokenKind::RParen {
            loop {
                args.push(self.parse_assignment_expression()?);
                if !self.eat(TokenKind::Comma)? {
                    break;
                }
            }
        }
        let close = self.expect(TokenKind::RParen)?;

        let callee_ty = self.ast.expr(callee).ty;
        let ty = self.types.return_type(callee_ty).unwrap_or(TypeStore::INT);
        let span = self.ast.expr(callee).span.merge(close.span);
        Ok(self.ast.alloc_expr(Expr {
            kind: ExprKind::Call { callee, args },
            ty,
            span,
        }))
    }

    // =========================================================================
    // PRIMARY EXPRESSIONS
    // =========================================================================

    fn parse_primary_expression(&mut self) -> Result<ExprId> {
        let token = *self.current();
        match token.kind {
            TokenKind::Number => {
                self.consume()?;
                self.make_number_literal(&token)
            }
            TokenKind::Str => {
                self.consume()?;
                let value = token.value.expect("string token carries its content");
                let ty = self.types.pointer_to(TypeStore::CHAR);
                Ok(self.ast.alloc_expr(Expr {
                    kind: ExprKind::StrLit(value),
                    ty,
                    span: token.span,
                }))
            }
            TokenKind::CharLit => {
                self.consume()?;
                let c = token.text().chars().next().unwrap_or('\0');
                Ok(self.ast.alloc_expr(Expr {
                    kind: ExprKind::CharLit(c),
                    ty: TypeStore::INT,
                    span: token.span,
                }))
            }
            TokenKind::LParen => {
                self.consume()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Ident => {
                self.consume()?;
                let name = token.value.expect("identifier token carries its spelling");
                self.make_decl_ref(name, token.span)
            }
            _ => Err(CompileError::unexpected(
                format!("expected expression, found {}", token.describe()),
                token.span,
            )),
        }
    }

    /// Resolve an identifier against the scope stack
    fn make_decl_ref(&mut self, name: Symbol, span: Span) -> Result<ExprId> {
        let decl = self.scopes.lookup_decl(name).ok_or_else(|| {
            CompileError::undeclared(format!("use of undeclared identifier '{}'", name), span)
        })?;
        let ty = self.ast.decl(decl).ty().unwrap_or(TypeStore::INT);
        Ok(self.ast.alloc_expr(Expr {
            kind: ExprKind::DeclRef(decl),
            ty,
            span,
        }))
    }

    /// Classify a numeric-constant spelling and build its literal node
    ///
    /// Spellings with a fraction, exponent, or `f` suffix are floating
    /// constants; everything else is an integer constant honoring its
    /// `u`/`l` suffixes.
    fn make_number_literal(&mut self, token: &Token) -> Result<ExprId> {
        let text = token.text();
        let is_hex = text.starts_with("0x") || text.starts_with("0X");
        let is_float = !is_hex
            && (text.contains('.')
                || text.contains(['e', 'E'])
                || text.ends_with(['f', 'F']));

        if is_float {
            let body = text.trim_end_matches(['f', 'F', 'l', 'L']);
            let value: f64 = body.parse().map_err(|_| {
                CompileError::lex(
                    format!("invalid floating constant '{}'", text),
                    token.span,
                )
            })?;
            let ty = if text.ends_with(['f', 'F']) {
                TypeStore::FLOAT
            } else {
                TypeStore::DOUBLE
            };
            return Ok(self.ast.alloc_expr(Expr {
                kind: ExprKind::FloatLit(value),
                ty,
                span: token.span,
            }));
        }

        let value = int_value_of(text).ok_or_else(|| {
            CompileError::lex(format!("invalid integer constant '{}'", text), token.span)
        })?;

        let suffix: String = text
            .chars()
            .rev()
            .take_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'))
            .collect::<String>()
            .to_ascii_lowercase();
        let unsigned = suffix.contains('u');
        let long_count = suffix.matches('l').count();

        let ty = match (unsigned, long_count) {
            (false, 0) => TypeStore::INT,
            (true, 0) => TypeStore::UINT,
            (false, 1) => TypeStore::LONG,
            (true, 1) => TypeStore::ULONG,
            (false, _) => TypeStore::LONG_LONG,
            (true, _) => TypeStore::ULONG_LONG,
        };

        Ok(self.ast.alloc_expr(Expr {
            kind: ExprKind::IntLit(value as i64),
            ty,
            span: token.span,
        }))
    }
}
