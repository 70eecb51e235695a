//! zinc-lex - Lexical analysis for the C front-end.
//!
//! The lexer transforms preprocessed C source text into a stream of
//! classified tokens. It is pull-based: the parser requests one token at a
//! time through [`Lexer::next_token`], and the lexer keeps no state beyond
//! its cursor position.
//!
//! Tokens carry a [`TokenKind`], an optional interned payload (identifier
//! spelling, intact numeric spelling, decoded string/char content) and the
//! source [`Span`](zinc_util::Span) they cover. Classification of numeric
//! constants into integer vs. floating is deferred to the parser; the
//! lexer keeps the spelling intact.
//!
//! All lexical failures (unterminated literals, malformed escapes,
//! unknown punctuation) are fatal and surface as `Err` from
//! [`Lexer::next_token`].

pub mod cursor;
pub mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{keyword_from_ident, Token, TokenKind};

#[cfg(test)]
mod edge_cases;
