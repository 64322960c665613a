//! Cooked token kinds handed to the parser.

use golite_ir::Span;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals and names; their text is read back through the span.
    Ident,
    Int,
    Float,
    Imag,
    Char,
    String,

    // Keywords
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Shl,
    Shr,
    AmpCaret,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    AmpCaretEq,
    AmpAmp,
    PipePipe,
    Arrow,
    PlusPlus,
    MinusMinus,
    EqEq,
    Lt,
    Gt,
    Eq,
    Bang,
    Tilde,
    NotEq,
    LtEq,
    GtEq,
    ColonEq,
    Ellipsis,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Semicolon,
    Colon,

    Eof,
}

impl TokenKind {
    /// Whether a newline directly after this token ends the statement.
    pub(crate) fn ends_statement(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Imag
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Fallthrough
                | TokenKind::Return
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
        )
    }

    /// Human-readable form for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::Imag => "imaginary literal",
            TokenKind::Char => "rune literal",
            TokenKind::String => "string literal",
            TokenKind::Break => "`break`",
            TokenKind::Case => "`case`",
            TokenKind::Chan => "`chan`",
            TokenKind::Const => "`const`",
            TokenKind::Continue => "`continue`",
            TokenKind::Default => "`default`",
            TokenKind::Defer => "`defer`",
            TokenKind::Else => "`else`",
            TokenKind::Fallthrough => "`fallthrough`",
            TokenKind::For => "`for`",
            TokenKind::Func => "`func`",
            TokenKind::Go => "`go`",
            TokenKind::Goto => "`goto`",
            TokenKind::If => "`if`",
            TokenKind::Import => "`import`",
            TokenKind::Interface => "`interface`",
            TokenKind::Map => "`map`",
            TokenKind::Package => "`package`",
            TokenKind::Range => "`range`",
            TokenKind::Return => "`return`",
            TokenKind::Select => "`select`",
            TokenKind::Struct => "`struct`",
            TokenKind::Switch => "`switch`",
            TokenKind::Type => "`type`",
            TokenKind::Var => "`var`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Amp => "`&`",
            TokenKind::Pipe => "`|`",
            TokenKind::Caret => "`^`",
            TokenKind::Shl => "`<<`",
            TokenKind::Shr => "`>>`",
            TokenKind::AmpCaret => "`&^`",
            TokenKind::PlusEq => "`+=`",
            TokenKind::MinusEq => "`-=`",
            TokenKind::StarEq => "`*=`",
            TokenKind::SlashEq => "`/=`",
            TokenKind::PercentEq => "`%=`",
            TokenKind::AmpEq => "`&=`",
            TokenKind::PipeEq => "`|=`",
            TokenKind::CaretEq => "`^=`",
            TokenKind::ShlEq => "`<<=`",
            TokenKind::ShrEq => "`>>=`",
            TokenKind::AmpCaretEq => "`&^=`",
            TokenKind::AmpAmp => "`&&`",
            TokenKind::PipePipe => "`||`",
            TokenKind::Arrow => "`<-`",
            TokenKind::PlusPlus => "`++`",
            TokenKind::MinusMinus => "`--`",
            TokenKind::EqEq => "`==`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::Eq => "`=`",
            TokenKind::Bang => "`!`",
            TokenKind::Tilde => "`~`",
            TokenKind::NotEq => "`!=`",
            TokenKind::LtEq => "`<=`",
            TokenKind::GtEq => "`>=`",
            TokenKind::ColonEq => "`:=`",
            TokenKind::Ellipsis => "`...`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Dot => "`.`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Lexer output; always ends with an `Eof` token.
#[derive(Clone, Debug, Default)]
pub struct TokenList {
    pub tokens: Vec<Token>,
}

impl TokenList {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.tokens.iter().map(|t| t.kind)
    }
}
