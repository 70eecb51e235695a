//! Whitespace and comment skipping.

use zinc_util::Result;

use crate::lexer::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace and comments before the next token.
    ///
    /// Line comments run to end of line; block comments do not nest. An
    /// unterminated block comment is a fatal error.
    pub(crate) fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            if self.cursor.is_at_end() {
                return Ok(());
            }

            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.advance();
                }
                '/' => match self.cursor.peek_char(1) {
                    '/' => self.skip_line_comment(),
                    '*' => self.skip_block_comment()?,
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    /// Skips a `//` comment up to (not including) the newline.
    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    /// Skips a `/* */` comment. Not nesting, per C.
    fn skip_block_comment(&mut self) -> Result<()> {
        self.token_start = self.cursor.position();
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'

        while !self.cursor.is_at_end() {
            if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return Ok(());
            }
            self.cursor.advance();
        }

        Err(self.error("unterminated block comment"))
    }
}
