//! zinc-par - The recursive-descent C parser.
//!
//! The parser drives the lexer one token at a time with a single-slot
//! lookahead cache, builds the AST into an arena, resolves names against
//! the scope stack as it goes, and annotates every expression with its
//! type. All failures are fatal and propagate to the driver as
//! [`CompileError`](zinc_util::CompileError)s.
//!
//! The grammar is split across modules the way the productions split:
//! - `items` - translation unit, declaration specifiers, declarators,
//!   records, typedefs, globals, function definitions
//! - `stmt` - statement parsing
//! - `expr` - expressions by precedence climbing
//! - `dump` - the deterministic AST dumper

pub mod ast;
pub mod dump;
mod expr;
mod items;
mod stmt;

#[cfg(test)]
mod edge_cases;

pub use ast::{
    Ast, BinaryOp, CaseStmt, CompoundStmt, Decl, DeclStmt, DoWhileStmt, EnumDecl, Expr,
    ExprKind, ExprStmt, ForStmt, FunctionDecl, GotoStmt, IfStmt, LabelDecl, LabeledStmt,
    RecordDecl, ReturnStmt, Stmt, SwitchStmt, TypedefDecl, UnaryOp, VarDecl, WhileStmt,
};
pub use dump::dump;

use zinc_lex::{Lexer, Token, TokenKind};
use zinc_sem::{ScopeStack, TypeStore};
use zinc_util::{CompileError, DeclId, FileId, Result, Span};

/// Parse a complete translation unit
///
/// Convenience wrapper over [`Parser`]; returns the AST arena and the
/// type store it references.
pub fn parse(source: &str) -> Result<(Ast, TypeStore)> {
    parse_file(source, FileId::DUMMY)
}

/// Parse a translation unit, attributing spans to `file_id`
pub fn parse_file(source: &str, file_id: FileId) -> Result<(Ast, TypeStore)> {
    let mut parser = Parser::with_file(source, file_id)?;
    parser.parse_translation_unit()?;
    Ok(parser.into_parts())
}

/// The parser state
pub struct Parser<'a> {
    /// Token source; pulled one token at a time
    lexer: Lexer<'a>,
    /// The token under the cursor
    current: Token,
    /// Single-slot cache for one-token lookahead
    lookahead: Option<Token>,
    /// The AST arena being built
    pub ast: Ast,
    /// The type arena
    pub types: TypeStore,
    /// Lexically-nested name environment
    pub scopes: ScopeStack,
    /// Function whose body is being parsed; block-scope declarations
    /// attach to its local list
    pub(crate) current_fn: Option<DeclId>,
    /// Counter backing the unique labels handed to case statements
    pub(crate) next_case_label: u32,
}

impl<'a> Parser<'a> {
    /// Create a parser over `source`
    pub fn new(source: &'a str) -> Result<Self> {
        Self::with_file(source, FileId::DUMMY)
    }

    /// Create a parser whose spans are attributed to `file_id`
    pub fn with_file(source: &'a str, file_id: FileId) -> Result<Self> {
        let mut lexer = Lexer::with_file(source, file_id);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            lookahead: None,
            ast: Ast::new(),
            types: TypeStore::new(),
            scopes: ScopeStack::new(),
            current_fn: None,
            next_case_label: 0,
        })
    }

    /// Release the built AST and type store
    pub fn into_parts(self) -> (Ast, TypeStore) {
        (self.ast, self.types)
    }

    // =========================================================================
    // TOKEN PRIMITIVES
    // =========================================================================

    /// The current token, without advancing
    #[inline]
    pub(crate) fn current(&self) -> &Token {
        &self.current
    }

    /// The current token's kind
    #[inline]
    pub(crate) fn current_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// The current token's span
    #[inline]
    pub(crate) fn current_span(&self) -> Span {
        self.current.span
    }

    /// Advance one token, returning the token that was current
    ///
    /// Uses the lookahead cache if it is populated, otherwise pulls the
    /// next token from the lexer.
    pub(crate) fn consume(&mut self) -> Result<Token> {
        let next = match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// The token after the current one, filling the lookahead cache
    pub(crate) fn peek(&mut self) -> Result<&Token> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.lexer.next_token()?);
        }
        Ok(self
            .lookahead
            .as_ref()
            .expect("lookahead cache was just filled"))
    }

    /// Consume the current token iff it has the given kind
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Result<bool> {
        if self.current.kind == kind {
            self.consume()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume the current token, failing if it is not the given kind
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.current.kind == kind {
            self.consume()
        } else {
            Err(CompileError::unexpected(
                format!("expected {}, found {}", kind.describe(), self.current.describe()),
                self.current.span,
            ))
        }
    }

    /// Advance until a token of the given kind (or end of file)
    ///
    /// With `inclusive` the matching token is consumed too. Pure
    /// convenience; the happy path never needs it.
    pub(crate) fn skip_until(&mut self, kind: TokenKind, inclusive: bool) -> Result<()> {
        while self.current.kind != kind && self.current.kind != TokenKind::Eof {
            self.consume()?;
        }
        if inclusive && self.current.kind == kind {
            self.consume()?;
        }
        Ok(())
    }

    /// Run `f` inside a fresh scope frame
    ///
    /// The frame is exited on every path out of `f`, including error
    /// propagation.
    pub(crate) fn with_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        self.scopes.enter();
        let result = f(self);
        self.scopes.exit();
        result
    }
}
