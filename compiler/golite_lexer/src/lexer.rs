//! Lexer for golite using logos.
//!
//! Newlines and comments are consumed here; statement terminators are
//! synthesized with Go's automatic semicolon rule so the parser only ever
//! sees explicit `;` tokens.

use crate::{LexError, Token, TokenKind, TokenList};
use golite_ir::Span;
use logos::Logos;

/// Raw token from logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
enum RawToken {
    // === Trivia ===
    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[token("\n")]
    Newline,

    // === Keywords ===
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    // === Operators ===
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&^")]
    AmpCaret,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("&^=")]
    AmpCaretEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("<-")]
    Arrow,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("==")]
    EqEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token(":=")]
    ColonEq,
    #[token("...")]
    Ellipsis,

    // === Delimiters ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,

    // === Literals ===
    // Values are decoded by the evaluator from the raw text.
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    #[regex(r"[0-9][0-9_]*")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+")]
    Float,

    #[regex(r"[0-9][0-9_]*i")]
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?i")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?i")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+i")]
    Imag,

    #[regex(r"'(\\[^\n]|[^'\\\n])*'")]
    Char,

    #[regex(r#""(\\[^\n]|[^"\\\n])*""#)]
    String,

    #[regex(r"`[^`]*`")]
    RawString,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

impl RawToken {
    fn cook(self) -> Option<TokenKind> {
        let kind = match self {
            RawToken::LineComment | RawToken::BlockComment | RawToken::Newline => return None,
            RawToken::Break => TokenKind::Break,
            RawToken::Case => TokenKind::Case,
            RawToken::Chan => TokenKind::Chan,
            RawToken::Const => TokenKind::Const,
            RawToken::Continue => TokenKind::Continue,
            RawToken::Default => TokenKind::Default,
            RawToken::Defer => TokenKind::Defer,
            RawToken::Else => TokenKind::Else,
            RawToken::Fallthrough => TokenKind::Fallthrough,
            RawToken::For => TokenKind::For,
            RawToken::Func => TokenKind::Func,
            RawToken::Go => TokenKind::Go,
            RawToken::Goto => TokenKind::Goto,
            RawToken::If => TokenKind::If,
            RawToken::Import => TokenKind::Import,
            RawToken::Interface => TokenKind::Interface,
            RawToken::Map => TokenKind::Map,
            RawToken::Package => TokenKind::Package,
            RawToken::Range => TokenKind::Range,
            RawToken::Return => TokenKind::Return,
            RawToken::Select => TokenKind::Select,
            RawToken::Struct => TokenKind::Struct,
            RawToken::Switch => TokenKind::Switch,
            RawToken::Type => TokenKind::Type,
            RawToken::Var => TokenKind::Var,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Amp => TokenKind::Amp,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::Caret => TokenKind::Caret,
            RawToken::Shl => TokenKind::Shl,
            RawToken::Shr => TokenKind::Shr,
            RawToken::AmpCaret => TokenKind::AmpCaret,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::MinusEq => TokenKind::MinusEq,
            RawToken::StarEq => TokenKind::StarEq,
            RawToken::SlashEq => TokenKind::SlashEq,
            RawToken::PercentEq => TokenKind::PercentEq,
            RawToken::AmpEq => TokenKind::AmpEq,
            RawToken::PipeEq => TokenKind::PipeEq,
            RawToken::CaretEq => TokenKind::CaretEq,
            RawToken::ShlEq => TokenKind::ShlEq,
            RawToken::ShrEq => TokenKind::ShrEq,
            RawToken::AmpCaretEq => TokenKind::AmpCaretEq,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::PlusPlus => TokenKind::PlusPlus,
            RawToken::MinusMinus => TokenKind::MinusMinus,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::Eq => TokenKind::Eq,
            RawToken::Bang => TokenKind::Bang,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::ColonEq => TokenKind::ColonEq,
            RawToken::Ellipsis => TokenKind::Ellipsis,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,
            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Int => TokenKind::Int,
            RawToken::Float => TokenKind::Float,
            RawToken::Imag => TokenKind::Imag,
            RawToken::Char => TokenKind::Char,
            RawToken::String | RawToken::RawString => TokenKind::String,
            RawToken::Ident => TokenKind::Ident,
        };
        Some(kind)
    }
}

/// Lexer over a single source text.
pub struct Lexer<'src> {
    source: &'src str,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer { source }
    }

    /// Lex the whole source, inserting statement terminators.
    pub fn lex_all(&self) -> Result<TokenList, LexError> {
        let mut result = TokenList::default();
        let mut logos = RawToken::lexer(self.source);

        while let Some(token_result) = logos.next() {
            let span = Span::from_range(logos.span());
            let raw = token_result.map_err(|()| LexError::unexpected(logos.slice(), span))?;

            match raw {
                RawToken::Newline => insert_semicolon(&mut result, span),
                // A block comment spanning lines acts like a newline.
                RawToken::BlockComment if logos.slice().contains('\n') => {
                    insert_semicolon(&mut result, span);
                }
                _ => {
                    if let Some(kind) = raw.cook() {
                        result.tokens.push(Token::new(kind, span));
                    }
                }
            }
        }

        let end = Span::new(self.source.len() as u32, self.source.len() as u32);
        insert_semicolon(&mut result, end);
        result.tokens.push(Token::new(TokenKind::Eof, end));
        Ok(result)
    }
}

fn insert_semicolon(result: &mut TokenList, at: Span) {
    if let Some(last) = result.tokens.last() {
        if last.kind.ends_statement() {
            let point = Span::new(at.start, at.start);
            result.tokens.push(Token::new(TokenKind::Semicolon, point));
        }
    }
}
