//! Core lexer implementation.
//!
//! This module contains the main `Lexer` struct and its dispatch loop.

use zinc_util::{CompileError, FileId, Result, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// The C lexer.
///
/// Transforms source text into a stream of tokens on demand. The lexer is
/// stateless between calls except for its cursor and the bookkeeping for
/// the token currently being scanned; every failure is fatal and returned
/// as an `Err`.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,

    /// File the source belongs to, stamped into every span.
    file_id: FileId,

    /// Starting byte offset of the current token.
    pub(crate) token_start: usize,

    /// Line number where the current token starts (1-based).
    token_start_line: u32,

    /// Column number where the current token starts (1-based).
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self::with_file(source, FileId::DUMMY)
    }

    /// Creates a new lexer whose tokens are attributed to `file_id`.
    pub fn with_file(source: &'a str, file_id: FileId) -> Self {
        Self {
            cursor: Cursor::new(source),
            file_id,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token from the source code.
    ///
    /// Skips whitespace and comments, then dispatches on the current
    /// character. At end of input this returns `Eof` and keeps returning
    /// it on every further call.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments()?;

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(self.make(TokenKind::Eof));
        }

        let token = match self.cursor.current_char() {
            '(' => {
                self.cursor.advance();
                self.make(TokenKind::LParen)
            }
            ')' => {
                self.cursor.advance();
                self.make(TokenKind::RParen)
            }
            '{' => {
                self.cursor.advance();
                self.make(TokenKind::LBrace)
            }
            '}' => {
                self.cursor.advance();
                self.make(TokenKind::RBrace)
            }
            '[' => {
                self.cursor.advance();
                self.make(TokenKind::LBracket)
            }
            ']' => {
                self.cursor.advance();
                self.make(TokenKind::RBracket)
            }
            ',' => {
                self.cursor.advance();
                self.make(TokenKind::Comma)
            }
            ';' => {
                self.cursor.advance();
                self.make(TokenKind::Semicolon)
            }
            '?' => {
                self.cursor.advance();
                self.make(TokenKind::Question)
            }
            ':' => {
                self.cursor.advance();
                self.make(TokenKind::Colon)
            }
            '~' => {
                self.cursor.advance();
                self.make(TokenKind::Tilde)
            }
            '+' => self.lex_plus(),
            '-' => self.lex_minus(),
            '*' => self.lex_star(),
            '/' => self.lex_slash(),
            '%' => self.lex_percent(),
            '=' => self.lex_equals(),
            '!' => self.lex_bang(),
            '<' => self.lex_less(),
            '>' => self.lex_greater(),
            '&' => self.lex_ampersand(),
            '|' => self.lex_pipe(),
            '^' => self.lex_caret(),
            '.' => self.lex_dot()?,
            '"' => self.lex_string()?,
            '\'' => self.lex_char()?,
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number()?,
            c => {
                self.cursor.advance();
                return Err(self.error(format!("unexpected character '{}'", c)));
            }
        };

        Ok(token)
    }

    /// Builds a payload-less token covering the current scan range.
    pub(crate) fn make(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.token_span())
    }

    /// Builds a token with an interned payload.
    pub(crate) fn make_with(&self, kind: TokenKind, value: zinc_util::Symbol) -> Token {
        Token::with_value(kind, value, self.token_span())
    }

    /// The span from the start of the current token to the cursor.
    pub(crate) fn token_span(&self) -> Span {
        Span::with_file(
            self.token_start,
            self.cursor.position(),
            self.file_id,
            self.token_start_line,
            self.token_start_column,
        )
    }

    /// Builds a fatal lexical error at the current token position.
    pub(crate) fn error(&self, message: impl Into<String>) -> CompileError {
        CompileError::lex(message, self.token_span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut kinds = Vec::new();
        loop {
            let token = lexer.next_token().expect("lex failure");
            if token.kind == TokenKind::Eof {
                break;
            }
            kinds.push(token.kind);
        }
        kinds
    }

    #[test]
    fn test_single_char_punctuation() {
        use TokenKind::*;
        assert_eq!(
            lex_kinds("( ) { } [ ] , ; ? : ~"),
            vec![LParen, RParen, LBrace, RBrace, LBracket, RBracket, Comma, Semicolon, Question, Colon, Tilde]
        );
    }

    #[test]
    fn test_eof_is_idempotent() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Ident);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn test_unknown_character_is_fatal() {
        let mut lexer = Lexer::new("@");
        let err = lexer.next_token().unwrap_err();
        assert_eq!(err.kind, zinc_util::ErrorKind::Lex);
        assert!(err.message.contains('@'));
    }

    #[test]
    fn test_spans_track_position() {
        let mut lexer = Lexer::new("int x;");
        let tok = lexer.next_token().unwrap();
        assert_eq!((tok.span.start, tok.span.end), (0, 3));
        assert_eq!((tok.span.line, tok.span.column), (1, 1));

        let tok = lexer.next_token().unwrap();
        assert_eq!((tok.span.start, tok.span.end), (4, 5));
        assert_eq!((tok.span.line, tok.span.column), (1, 5));
    }

    #[test]
    fn test_simple_statement() {
        use TokenKind::*;
        assert_eq!(
            lex_kinds("return x + 1;"),
            vec![KwReturn, Ident, Plus, Number, Semicolon]
        );
    }
}
