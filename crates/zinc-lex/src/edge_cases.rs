//! Edge case tests for zinc-lex.

use proptest::prelude::*;

use crate::{Lexer, Token, TokenKind};

fn lex_all(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token().expect("lex failure");
        if token.kind == TokenKind::Eof {
            break;
        }
        tokens.push(token);
    }
    tokens
}

/// Escape decoded literal content back into source form.
///
/// Control characters are written as three-digit octal escapes so that a
/// following digit cannot be absorbed into the escape.
fn escape_literal(text: &str) -> String {
    let mut out = String::new();
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            c if (c as u32) < 0x20 || c == '\x7F' => {
                out.push_str(&format!("\\{:03o}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Rebuild a source string from a token stream.
fn reconstruct(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| match t.kind {
            TokenKind::Str => format!("\"{}\"", escape_literal(t.text())),
            TokenKind::CharLit => format!("'{}'", escape_literal(t.text())),
            _ => t.text().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lexing, reconstructing the lexemes, and re-lexing yields the same
/// token stream (modulo whitespace and comments).
fn assert_round_trip(source: &str) {
    let first = lex_all(source);
    let rebuilt = reconstruct(&first);
    let second = lex_all(&rebuilt);

    assert_eq!(
        first.len(),
        second.len(),
        "token count changed after round trip of {:?} -> {:?}",
        source,
        rebuilt
    );
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.kind, b.kind, "kind changed in round trip of {:?}", source);
        assert_eq!(a.value, b.value, "payload changed in round trip of {:?}", source);
    }
}

#[test]
fn test_empty_source() {
    assert!(lex_all("").is_empty());
}

#[test]
fn test_whitespace_only() {
    assert!(lex_all("  \t \r\n \n ").is_empty());
}

#[test]
fn test_single_char_identifier() {
    let tokens = lex_all("x");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text(), "x");
}

#[test]
fn test_long_identifier() {
    let name = "a".repeat(10_000);
    let tokens = lex_all(&name);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text(), name);
}

#[test]
fn test_round_trip_function() {
    assert_round_trip("int main(void) { return 0; }");
}

#[test]
fn test_round_trip_operators() {
    assert_round_trip("a <<= b >>= c ^= d ... x->y.z");
}

#[test]
fn test_round_trip_literals() {
    assert_round_trip("\"a\\nb\" 'c' 42u 3.14 0xFF 1e10");
}

#[test]
fn test_round_trip_comments_discarded() {
    let with = lex_all("int /* c */ x; // tail");
    let without = lex_all("int x;");
    assert_eq!(with.len(), without.len());
    for (a, b) in with.iter().zip(without.iter()) {
        assert_eq!(a.kind, b.kind);
    }
}

#[test]
fn test_declaration_heavy_source() {
    let source = "typedef unsigned long size_t; static const int *p[10]; struct S { int a; };";
    let kinds: Vec<_> = lex_all(source).iter().map(|t| t.kind).collect();
    assert!(kinds.contains(&TokenKind::KwTypedef));
    assert!(kinds.contains(&TokenKind::KwStruct));
    assert_round_trip(source);
}

#[test]
fn test_no_space_between_tokens() {
    use TokenKind::*;
    let kinds: Vec<_> = lex_all("x+=1;y[2]=z?a:b;").iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            Ident, PlusEq, Number, Semicolon, Ident, LBracket, Number, RBracket, Eq, Ident,
            Question, Ident, Colon, Ident, Semicolon
        ]
    );
}

#[test]
fn test_crlf_line_endings() {
    let tokens = lex_all("int x;\r\nint y;\r\n");
    assert_eq!(tokens.len(), 6);
    assert_eq!(tokens[3].span.line, 2);
}

proptest! {
    #[test]
    fn prop_identifiers_round_trip(name in "[a-zA-Z_][a-zA-Z0-9_]{0,24}") {
        let tokens = lex_all(&name);
        prop_assert_eq!(tokens.len(), 1);
        // Either a keyword or an identifier with the same spelling.
        prop_assert_eq!(tokens[0].text(), name.as_str());
    }

    #[test]
    fn prop_decimal_integers_round_trip(value in 0u64..u64::MAX) {
        let source = value.to_string();
        let tokens = lex_all(&source);
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(tokens[0].kind, TokenKind::Number);
        prop_assert_eq!(tokens[0].text(), source.as_str());
    }

    #[test]
    fn prop_mixed_streams_round_trip(
        names in proptest::collection::vec("[a-z][a-z0-9_]{0,8}", 1..8),
        values in proptest::collection::vec(0u32..1_000_000, 1..8),
    ) {
        let mut source = String::new();
        for (name, value) in names.iter().zip(values.iter()) {
            source.push_str(&format!("{} = {}; ", name, value));
        }
        let first = lex_all(&source);
        let second = lex_all(&reconstruct(&first));
        let strip = |tokens: &[Token]| tokens.iter().map(|t| (t.kind, t.value)).collect::<Vec<_>>();
        prop_assert_eq!(strip(&first), strip(&second));
    }
}
