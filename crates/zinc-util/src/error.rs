//! Fatal compile errors.
//!
//! Every phase of the front-end fails at the first error: the offending
//! operation returns a [`CompileError`] which propagates with `?` up to
//! the driver, where it is rendered as a single source-located line. There
//! is no recovery and no error accumulation.

use std::fmt;

use thiserror::Error;

use crate::span::{SourceMap, Span};

/// The closed set of fatal error kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Lexical error: unterminated literal, unknown punctuation, bad escape
    Lex,
    /// The parser expected a specific token and found something else
    UnexpectedToken,
    /// A grammar production the front-end deliberately does not support
    Unimplemented,
    /// An identifier already has a binding at the same scope level
    Redefinition,
    /// Impossible declaration-specifier combination
    TypeSynthesis,
    /// A declarator that cannot be resolved to a declaration
    BadDeclarator,
    /// An identifier or member name with no binding in scope
    Undeclared,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Lex => "lex error",
            ErrorKind::UnexpectedToken => "unexpected token",
            ErrorKind::Unimplemented => "unimplemented",
            ErrorKind::Redefinition => "redefinition",
            ErrorKind::TypeSynthesis => "invalid type specifiers",
            ErrorKind::BadDeclarator => "bad declarator",
            ErrorKind::Undeclared => "undeclared name",
        };
        write!(f, "{}", name)
    }
}

/// A fatal, source-located compile error
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct CompileError {
    /// Error classification
    pub kind: ErrorKind,
    /// Human-readable description
    pub message: String,
    /// Offending source range
    pub span: Span,
}

impl CompileError {
    /// Create an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
        }
    }

    /// Lexical error
    pub fn lex(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Lex, message, span)
    }

    /// Unexpected-token error
    pub fn unexpected(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::UnexpectedToken, message, span)
    }

    /// Unsupported-construct error
    pub fn unimplemented(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Unimplemented, message, span)
    }

    /// Redefinition error
    pub fn redefinition(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Redefinition, message, span)
    }

    /// Type-synthesis error
    pub fn type_synthesis(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::TypeSynthesis, message, span)
    }

    /// Bad-declarator error
    pub fn bad_declarator(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::BadDeclarator, message, span)
    }

    /// Undeclared-name error
    pub fn undeclared(message: impl Into<String>, span: Span) -> Self {
        Self::new(ErrorKind::Undeclared, message, span)
    }

    /// Render the error as the single diagnostic line shown to the user
    ///
    /// # Examples
    ///
    /// ```
    /// use zinc_util::{CompileError, SourceMap, Span};
    ///
    /// let mut map = SourceMap::new();
    /// let id = map.add_file("main.c", "int @;\n");
    /// let err = CompileError::lex("unexpected character '@'", Span::with_file(4, 5, id, 1, 5));
    /// assert_eq!(err.render(&map), "error: unexpected character '@' at main.c:1:5");
    /// ```
    pub fn render(&self, sources: &SourceMap) -> String {
        format!("error: {} at {}", self.message, sources.describe(self.span))
    }
}

/// Result alias used across the front-end
pub type Result<T> = std::result::Result<T, CompileError>;
