//! String and character literal lexing.
//!
//! Both literal forms process the standard C escape set and return the
//! decoded content; the token payload holds the decoded text, not the
//! source spelling.

use zinc_util::{Result, Symbol};

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Lexes a string literal.
    pub(crate) fn lex_string(&mut self) -> Result<Token> {
        self.cursor.advance(); // opening '"'

        let mut content = String::new();

        loop {
            if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
                return Err(self.error("unterminated string literal"));
            }

            let c = self.cursor.current_char();

            if c == '"' {
                self.cursor.advance();
                break;
            }

            if c == '\\' {
                self.cursor.advance();
                content.push(self.parse_escape()?);
            } else {
                content.push(c);
                self.cursor.advance();
            }
        }

        Ok(self.make_with(TokenKind::Str, Symbol::intern(&content)))
    }

    /// Lexes a character literal.
    ///
    /// Only single-character literals are accepted.
    pub(crate) fn lex_char(&mut self) -> Result<Token> {
        self.cursor.advance(); // opening '\''

        if self.cursor.is_at_end() || self.cursor.current_char() == '\n' {
            return Err(self.error("unterminated character literal"));
        }

        if self.cursor.current_char() == '\'' {
            self.cursor.advance();
            return Err(self.error("empty character literal"));
        }

        let value = if self.cursor.current_char() == '\\' {
            self.cursor.advance();
            self.parse_escape()?
        } else {
            let c = self.cursor.current_char();
            self.cursor.advance();
            c
        };

        if !self.cursor.match_char('\'') {
            return Err(self.error("unterminated character literal"));
        }

        let mut text = String::new();
        text.push(value);
        Ok(self.make_with(TokenKind::CharLit, Symbol::intern(&text)))
    }

    /// Decodes one escape sequence; the leading backslash has already
    /// been consumed.
    fn parse_escape(&mut self) -> Result<char> {
        if self.cursor.is_at_end() {
            return Err(self.error("unterminated escape sequence"));
        }

        let c = self.cursor.current_char();
        let decoded = match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '\\' => '\\',
            '"' => '"',
            '\'' => '\'',
            '0'..='7' => return self.parse_octal_escape(),
            'a' => '\x07',
            'b' => '\x08',
            'f' => '\x0C',
            'v' => '\x0B',
            'x' => return self.parse_hex_escape(),
            other => {
                self.cursor.advance();
                return Err(self.error(format!("unknown escape sequence '\\{}'", other)));
            }
        };

        self.cursor.advance();
        Ok(decoded)
    }

    /// Decodes `\ooo` (one to three octal digits).
    fn parse_octal_escape(&mut self) -> Result<char> {
        let mut value: u32 = 0;
        let mut digits = 0;
        while digits < 3 && matches!(self.cursor.current_char(), '0'..='7') {
            value = value * 8 + self.cursor.current_char().to_digit(8).unwrap_or(0);
            self.cursor.advance();
            digits += 1;
        }

        char::from_u32(value)
            .ok_or_else(|| self.error(format!("octal escape out of range: {}", value)))
    }

    /// Decodes `\xhh...` (one or more hex digits).
    fn parse_hex_escape(&mut self) -> Result<char> {
        self.cursor.advance(); // 'x'

        if !self.cursor.current_char().is_ascii_hexdigit() {
            return Err(self.error("no digits in hex escape sequence"));
        }

        let mut value: u32 = 0;
        while self.cursor.current_char().is_ascii_hexdigit() {
            value = value
                .saturating_mul(16)
                .saturating_add(self.cursor.current_char().to_digit(16).unwrap_or(0));
            self.cursor.advance();
        }

        char::from_u32(value)
            .ok_or_else(|| self.error(format!("hex escape out of range: {:#x}", value)))
    }
}
