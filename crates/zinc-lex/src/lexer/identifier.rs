//! Identifier and keyword lexing.

use zinc_util::Symbol;

use crate::lexer::Lexer;
use crate::token::{keyword_from_ident, Token, TokenKind};

/// Returns true for characters that may continue an identifier.
#[inline]
pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword.
    ///
    /// Identifiers match `[A-Za-z_][A-Za-z0-9_]*`. The spelling is looked
    /// up in the keyword table; on a hit the token takes the keyword kind,
    /// otherwise it is an identifier carrying its interned spelling.
    pub(crate) fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);

        match keyword_from_ident(text) {
            Some(kind) => self.make(kind),
            None => self.make_with(TokenKind::Ident, Symbol::intern(text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::Lexer;
    use crate::token::TokenKind;

    fn lex_one(source: &str) -> crate::token::Token {
        Lexer::new(source).next_token().unwrap()
    }

    #[test]
    fn test_simple_identifier() {
        let tok = lex_one("foo");
        assert_eq!(tok.kind, TokenKind::Ident);
        assert_eq!(tok.text(), "foo");
    }

    #[test]
    fn test_identifier_with_digits_and_underscores() {
        let tok = lex_one("_foo_bar123");
        assert_eq!(tok.kind, TokenKind::Ident);
        assert_eq!(tok.text(), "_foo_bar123");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(lex_one("while").kind, TokenKind::KwWhile);
        assert_eq!(lex_one("typedef").kind, TokenKind::KwTypedef);
        assert_eq!(lex_one("unsigned").kind, TokenKind::KwUnsigned);
        assert_eq!(lex_one("sizeof").kind, TokenKind::KwSizeof);
    }

    #[test]
    fn test_underscore_keywords() {
        assert_eq!(lex_one("_Bool").kind, TokenKind::KwBool);
        assert_eq!(lex_one("_Atomic").kind, TokenKind::KwAtomic);
        assert_eq!(lex_one("_Thread_local").kind, TokenKind::KwThreadLocal);
        assert_eq!(lex_one("_Noreturn").kind, TokenKind::KwNoreturn);
        assert_eq!(lex_one("_Alignas").kind, TokenKind::KwAlignas);
        assert_eq!(lex_one("_Complex").kind, TokenKind::KwComplex);
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(lex_one("ifx").kind, TokenKind::Ident);
        assert_eq!(lex_one("intp").kind, TokenKind::Ident);
        assert_eq!(lex_one("_Boolean").kind, TokenKind::Ident);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(lex_one("While").kind, TokenKind::Ident);
        assert_eq!(lex_one("INT").kind, TokenKind::Ident);
    }
}
