//! Numeric constant lexing.
//!
//! The lexer consumes the complete spelling of a constant (digits,
//! optional fraction, optional exponent, optional suffix letters) and
//! keeps it intact. Classifying the constant as integer or floating and
//! converting it to a value is the parser's job; the token only carries
//! the spelling.

use zinc_util::{Result, Symbol};

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

impl<'a> Lexer<'a> {
    /// Lexes a numeric constant.
    ///
    /// Accepted shapes: decimal and hexadecimal (`0x`) integers with
    /// optional `u`/`l` suffixes, and decimal floating constants with a
    /// fraction and/or exponent and an optional `f`/`l` suffix. Octal
    /// constants are decimal spellings beginning with `0` and are
    /// interpreted by the parser.
    pub(crate) fn lex_number(&mut self) -> Result<Token> {
        // Hexadecimal constant
        if self.cursor.current_char() == '0'
            && matches!(self.cursor.peek_char(1), 'x' | 'X')
        {
            self.cursor.advance();
            self.cursor.advance();

            let digit_start = self.cursor.position();
            while self.cursor.current_char().is_ascii_hexdigit() {
                self.cursor.advance();
            }
            if self.cursor.position() == digit_start {
                return Err(self.error("no digits after '0x' prefix"));
            }

            self.consume_int_suffix();
            let text = self.cursor.slice_from(self.token_start);
            return Ok(self.make_with(TokenKind::Number, Symbol::intern(text)));
        }

        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }

        let mut is_float = false;

        // Fractional part
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            is_float = true;
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                self.cursor.advance();
            }
        }

        // Exponent
        if matches!(self.cursor.current_char(), 'e' | 'E') {
            let mut lookahead = 1;
            if matches!(self.cursor.peek_char(1), '+' | '-') {
                lookahead = 2;
            }
            if self.cursor.peek_char(lookahead).is_ascii_digit() {
                is_float = true;
                self.cursor.advance(); // 'e'
                if matches!(self.cursor.current_char(), '+' | '-') {
                    self.cursor.advance();
                }
                while self.cursor.current_char().is_ascii_digit() {
                    self.cursor.advance();
                }
            } else {
                self.cursor.advance();
                return Err(self.error("no digits in floating constant exponent"));
            }
        }

        if is_float {
            // Optional float suffix
            if matches!(self.cursor.current_char(), 'f' | 'F' | 'l' | 'L') {
                self.cursor.advance();
            }
        } else {
            self.consume_int_suffix();
        }

        if self.cursor.current_char().is_ascii_alphabetic() || self.cursor.current_char() == '_' {
            return Err(self.error(format!(
                "invalid character '{}' in numeric constant",
                self.cursor.current_char()
            )));
        }

        let text = self.cursor.slice_from(self.token_start);
        Ok(self.make_with(TokenKind::Number, Symbol::intern(text)))
    }

    /// Consumes an integer suffix: any run of `u`/`U`/`l`/`L`.
    fn consume_int_suffix(&mut self) {
        while matches!(self.cursor.current_char(), 'u' | 'U' | 'l' | 'L') {
            self.cursor.advance();
        }
    }
}
