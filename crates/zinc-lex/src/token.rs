//! Token definitions for the C front-end.
//!
//! A token is a triple of kind, optional interned payload, and source
//! span. The kind set covers the supported C11 keyword set, every single-
//! and multi-character punctuator, identifiers, numeric constants, string
//! and character literals, and end-of-file.

use zinc_util::{Span, Symbol};

/// Token classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================================================
    // KEYWORDS
    // =========================================================================
    /// "if"
    KwIf,
    /// "else"
    KwElse,
    /// "while"
    KwWhile,
    /// "do"
    KwDo,
    /// "for"
    KwFor,
    /// "switch"
    KwSwitch,
    /// "case"
    KwCase,
    /// "default"
    KwDefault,
    /// "break"
    KwBreak,
    /// "continue"
    KwContinue,
    /// "return"
    KwReturn,
    /// "goto"
    KwGoto,
    /// "sizeof"
    KwSizeof,
    /// "typedef"
    KwTypedef,
    /// "extern"
    KwExtern,
    /// "static"
    KwStatic,
    /// "auto"
    KwAuto,
    /// "register"
    KwRegister,
    /// "inline"
    KwInline,
    /// "const"
    KwConst,
    /// "volatile"
    KwVolatile,
    /// "restrict"
    KwRestrict,
    /// "void"
    KwVoid,
    /// "char"
    KwChar,
    /// "short"
    KwShort,
    /// "int"
    KwInt,
    /// "long"
    KwLong,
    /// "float"
    KwFloat,
    /// "double"
    KwDouble,
    /// "signed"
    KwSigned,
    /// "unsigned"
    KwUnsigned,
    /// "struct"
    KwStruct,
    /// "union"
    KwUnion,
    /// "enum"
    KwEnum,
    /// "_Bool"
    KwBool,
    /// "_Atomic"
    KwAtomic,
    /// "_Thread_local"
    KwThreadLocal,
    /// "_Noreturn"
    KwNoreturn,
    /// "_Alignas"
    KwAlignas,
    /// "_Complex"
    KwComplex,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    /// "+"
    Plus,
    /// "-"
    Minus,
    /// "*"
    Star,
    /// "/"
    Slash,
    /// "%"
    Percent,
    /// "++"
    PlusPlus,
    /// "--"
    MinusMinus,
    /// "&"
    Amp,
    /// "&&"
    AmpAmp,
    /// "|"
    Pipe,
    /// "||"
    PipePipe,
    /// "^"
    Caret,
    /// "~"
    Tilde,
    /// "!"
    Bang,
    /// "<"
    Lt,
    /// ">"
    Gt,
    /// "<="
    Le,
    /// ">="
    Ge,
    /// "=="
    EqEq,
    /// "!="
    BangEq,
    /// "="
    Eq,
    /// "+="
    PlusEq,
    /// "-="
    MinusEq,
    /// "*="
    StarEq,
    /// "/="
    SlashEq,
    /// "%="
    PercentEq,
    /// "&="
    AmpEq,
    /// "|="
    PipeEq,
    /// "^="
    CaretEq,
    /// "<<"
    Shl,
    /// ">>"
    Shr,
    /// "<<="
    ShlEq,
    /// ">>="
    ShrEq,
    /// "?"
    Question,
    /// ":"
    Colon,
    /// ","
    Comma,
    /// ";"
    Semicolon,
    /// "."
    Dot,
    /// "->"
    Arrow,
    /// "..."
    Ellipsis,
    /// "("
    LParen,
    /// ")"
    RParen,
    /// "{"
    LBrace,
    /// "}"
    RBrace,
    /// "["
    LBracket,
    /// "]"
    RBracket,

    // =========================================================================
    // VALUED TOKENS
    // =========================================================================
    /// Identifier; payload is the interned spelling
    Ident,
    /// Numeric constant; payload is the intact spelling, classification
    /// into integer vs. floating is deferred to the parser
    Number,
    /// String literal; payload is the escape-decoded content
    Str,
    /// Character literal; payload is the escape-decoded content
    CharLit,

    /// End of input; returned repeatedly once reached
    Eof,
}

impl TokenKind {
    /// The fixed spelling of this kind, if it has one
    ///
    /// Keywords and punctuators have a fixed spelling; identifier,
    /// literal, and end-of-file kinds return `None`.
    pub fn text(self) -> Option<&'static str> {
        use TokenKind::*;
        Some(match self {
            KwIf => "if",
            KwElse => "else",
            KwWhile => "while",
            KwDo => "do",
            KwFor => "for",
            KwSwitch => "switch",
            KwCase => "case",
            KwDefault => "default",
            KwBreak => "break",
            KwContinue => "continue",
            KwReturn => "return",
            KwGoto => "goto",
            KwSizeof => "sizeof",
            KwTypedef => "typedef",
            KwExtern => "extern",
            KwStatic => "static",
            KwAuto => "auto",
            KwRegister => "register",
            KwInline => "inline",
            KwConst => "const",
            KwVolatile => "volatile",
            KwRestrict => "restrict",
            KwVoid => "void",
            KwChar => "char",
            KwShort => "short",
            KwInt => "int",
            KwLong => "long",
            KwFloat => "float",
            KwDouble => "double",
            KwSigned => "signed",
            KwUnsigned => "unsigned",
            KwStruct => "struct",
            KwUnion => "union",
            KwEnum => "enum",
            KwBool => "_Bool",
            KwAtomic => "_Atomic",
            KwThreadLocal => "_Thread_local",
            KwNoreturn => "_Noreturn",
            KwAlignas => "_Alignas",
            KwComplex => "_Complex",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            PlusPlus => "++",
            MinusMinus => "--",
            Amp => "&",
            AmpAmp => "&&",
            Pipe => "|",
            PipePipe => "||",
            Caret => "^",
            Tilde => "~",
            Bang => "!",
            Lt => "<",
            Gt => ">",
            Le => "<=",
            Ge => ">=",
            EqEq => "==",
            BangEq => "!=",
            Eq => "=",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            PercentEq => "%=",
            AmpEq => "&=",
            PipeEq => "|=",
            CaretEq => "^=",
            Shl => "<<",
            Shr => ">>",
            ShlEq => "<<=",
            ShrEq => ">>=",
            Question => "?",
            Colon => ":",
            Comma => ",",
            Semicolon => ";",
            Dot => ".",
            Arrow => "->",
            Ellipsis => "...",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Ident | Number | Str | CharLit | Eof => return None,
        })
    }

    /// Human-readable description for diagnostics
    pub fn describe(self) -> String {
        use TokenKind::*;
        match self {
            Ident => "identifier".to_string(),
            Number => "numeric constant".to_string(),
            Str => "string literal".to_string(),
            CharLit => "character literal".to_string(),
            Eof => "end of file".to_string(),
            other => format!("'{}'", other.text().unwrap_or("?")),
        }
    }

    /// Returns true for keywords that can begin a declaration specifier
    /// (storage classes, qualifiers, function specifiers, builtin type
    /// keywords, and aggregate introducers)
    ///
    /// Typedef-name identifiers are the other way a specifier can begin;
    /// that requires a scope query and is decided by the parser.
    pub fn is_decl_spec_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            KwTypedef
                | KwExtern
                | KwStatic
                | KwAuto
                | KwRegister
                | KwInline
                | KwConst
                | KwVolatile
                | KwRestrict
                | KwVoid
                | KwChar
                | KwShort
                | KwInt
                | KwLong
                | KwFloat
                | KwDouble
                | KwSigned
                | KwUnsigned
                | KwStruct
                | KwUnion
                | KwEnum
                | KwBool
                | KwAtomic
                | KwThreadLocal
                | KwNoreturn
                | KwAlignas
                | KwComplex
        )
    }
}

/// Map an identifier spelling to its keyword kind, if it is one
pub fn keyword_from_ident(text: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match text {
        "if" => KwIf,
        "else" => KwElse,
        "while" => KwWhile,
        "do" => KwDo,
        "for" => KwFor,
        "switch" => KwSwitch,
        "case" => KwCase,
        "default" => KwDefault,
        "break" => KwBreak,
        "continue" => KwContinue,
        "return" => KwReturn,
        "goto" => KwGoto,
        "sizeof" => KwSizeof,
        "typedef" => KwTypedef,
        "extern" => KwExtern,
        "static" => KwStatic,
        "auto" => KwAuto,
        "register" => KwRegister,
        "inline" => KwInline,
        "const" => KwConst,
        "volatile" => KwVolatile,
        "restrict" => KwRestrict,
        "void" => KwVoid,
        "char" => KwChar,
        "short" => KwShort,
        "int" => KwInt,
        "long" => KwLong,
        "float" => KwFloat,
        "double" => KwDouble,
        "signed" => KwSigned,
        "unsigned" => KwUnsigned,
        "struct" => KwStruct,
        "union" => KwUnion,
        "enum" => KwEnum,
        "_Bool" => KwBool,
        "_Atomic" => KwAtomic,
        "_Thread_local" => KwThreadLocal,
        "_Noreturn" => KwNoreturn,
        "_Alignas" => KwAlignas,
        "_Complex" => KwComplex,
        _ => return None,
    })
}

/// A classified token with its source span
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// Token classification
    pub kind: TokenKind,
    /// Interned payload for identifier/literal kinds
    pub value: Option<Symbol>,
    /// Source range the token covers
    pub span: Span,
}

impl Token {
    /// Create a token without a payload
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            value: None,
            span,
        }
    }

    /// Create a token carrying an interned payload
    pub fn with_value(kind: TokenKind, value: Symbol, span: Span) -> Self {
        Self {
            kind,
            value: Some(value),
            span,
        }
    }

    /// Returns true if the token has the given kind
    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// The token's spelling: the payload for valued kinds, the fixed
    /// spelling otherwise
    pub fn text(&self) -> &'static str {
        match self.value {
            Some(sym) => sym.as_str(),
            None => self.kind.text().unwrap_or(""),
        }
    }

    /// Human-readable description for diagnostics
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Ident => format!("identifier '{}'", self.text()),
            _ => self.kind.describe(),
        }
    }
}
