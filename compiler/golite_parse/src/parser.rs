//! Recursive-descent parser producing the flat arena AST.
//!
//! Statements live here; expressions and type expressions are in the
//! `expr` and `types` submodules.

mod expr;
mod types;

use crate::ParseError;
use golite_ir::{
    AssignOp, BinaryOp, ExprArena, ExprId, ExprKind, ExprRange, Name, ParsedBody, RangeClause,
    Span, Stmt, StmtId, StmtKind, StmtRange, StringInterner, ValueSpec,
};
use golite_lexer::{Token, TokenKind, TokenList};

type PResult<T> = Result<T, ParseError>;

/// Result of a simple statement in a `for` header, where `range` is legal.
enum Simple {
    Stmt(StmtId),
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
    },
}

/// Parser state.
pub struct Parser<'src> {
    source: &'src str,
    tokens: TokenList,
    arena: ExprArena,
    interner: StringInterner,
    pos: usize,
    /// Negative inside `if`/`for` headers, where `T {` opens the body
    /// rather than a composite literal.
    expr_lev: i32,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: TokenList) -> Self {
        Parser {
            source,
            tokens,
            arena: ExprArena::with_capacity(source.len()),
            interner: StringInterner::new(),
            pos: 0,
            expr_lev: 0,
        }
    }

    /// Parse the whole token stream as a statement list.
    pub fn parse_body(mut self) -> PResult<ParsedBody> {
        let body = self.statement_list()?;
        if !self.at_end() {
            return Err(self.unexpected("statement"));
        }
        Ok(ParsedBody {
            arena: self.arena,
            interner: self.interner,
            body,
        })
    }

    // ===== Token access =====

    fn current(&self) -> Token {
        let last = self.tokens.tokens.len().saturating_sub(1);
        self.tokens
            .tokens
            .get(self.pos.min(last))
            .copied()
            .unwrap_or(Token::new(TokenKind::Eof, Span::DUMMY))
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.tokens.get(i))
            .map_or(Span::DUMMY, |t| t.span)
    }

    fn span_from(&self, start: Span) -> Span {
        start.merge(self.previous_span())
    }

    fn at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.describe()))
        }
    }

    fn unexpected(&self, wanted: &str) -> ParseError {
        let found = self.current();
        let found_text = match found.kind {
            TokenKind::Semicolon if found.span.is_empty() => "newline".to_string(),
            kind => kind.describe().to_string(),
        };
        ParseError::new(format!("expected {wanted}, found {found_text}"), found.span)
    }

    fn unsupported(&self, what: &str) -> ParseError {
        ParseError::new(format!("{what} are not supported"), self.current_span())
    }

    fn ident(&mut self) -> PResult<(Name, Span)> {
        let token = self.expect(TokenKind::Ident)?;
        let name = self.intern_span(token.span);
        Ok((name, token.span))
    }

    fn intern_span(&mut self, span: Span) -> Name {
        let text = self.source.get(span.to_range()).unwrap_or_default();
        self.interner.intern(text)
    }

    fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        self.arena.alloc_stmt(Stmt::new(kind, span))
    }

    // ===== Statements =====

    fn statement_list(&mut self) -> PResult<StmtRange> {
        let mut stmts = Vec::new();
        loop {
            while self.eat(TokenKind::Semicolon) {}
            if self.check(TokenKind::RBrace) || self.at_end() {
                break;
            }
            stmts.push(self.statement()?);
            if !self.check(TokenKind::RBrace) && !self.at_end() {
                self.expect(TokenKind::Semicolon)
                    .map_err(|_| self.unexpected("`;` or newline after statement"))?;
            }
        }
        Ok(self.arena.alloc_stmt_list(stmts))
    }

    fn statement(&mut self) -> PResult<StmtId> {
        golite_stack::ensure_sufficient_stack(|| self.statement_inner())
    }

    fn statement_inner(&mut self) -> PResult<StmtId> {
        let start = self.current_span();
        match self.current_kind() {
            TokenKind::Var => self.var_decl(false),
            TokenKind::Const => self.var_decl(true),
            TokenKind::Type => self.type_decl(),
            TokenKind::Import => self.import_decl(),
            TokenKind::LBrace => self.block(),
            TokenKind::If => self.if_stmt(),
            TokenKind::For => self.for_stmt(),
            TokenKind::Return => {
                self.advance();
                let values = if self.check(TokenKind::Semicolon)
                    || self.check(TokenKind::RBrace)
                    || self.at_end()
                {
                    ExprRange::EMPTY
                } else {
                    let list = self.expression_list()?;
                    self.arena.alloc_expr_list(list)
                };
                Ok(self.alloc_stmt(StmtKind::Return(values), self.span_from(start)))
            }
            TokenKind::Break | TokenKind::Continue => {
                let kind = if self.advance().kind == TokenKind::Break {
                    StmtKind::Break
                } else {
                    StmtKind::Continue
                };
                if self.check(TokenKind::Ident) {
                    return Err(self.unsupported("labels"));
                }
                Ok(self.alloc_stmt(kind, start))
            }
            TokenKind::Func => Err(self.unsupported("function literals")),
            TokenKind::Switch | TokenKind::Case | TokenKind::Default => {
                Err(self.unsupported("switch statements"))
            }
            TokenKind::Select => Err(self.unsupported("select statements")),
            TokenKind::Go => Err(self.unsupported("go statements")),
            TokenKind::Defer => Err(self.unsupported("defer statements")),
            TokenKind::Goto | TokenKind::Fallthrough => Err(self.unsupported("jump statements")),
            TokenKind::Package => Err(self.unsupported("package clauses")),
            _ => match self.simple_stmt(false)? {
                Simple::Stmt(id) => Ok(id),
                Simple::Range { .. } => Err(self.unexpected("statement")),
            },
        }
    }

    fn simple_stmt(&mut self, range_ok: bool) -> PResult<Simple> {
        let start = self.current_span();
        let lhs = self.expression_list()?;

        let op = match self.current_kind() {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::ColonEq => Some(AssignOp::Define),
            kind => compound_op(kind).map(AssignOp::Compound),
        };

        if let Some(op) = op {
            self.advance();
            if range_ok && self.check(TokenKind::Range) && !matches!(op, AssignOp::Compound(_)) {
                return self.range_targets(&lhs, op == AssignOp::Define);
            }
            if matches!(op, AssignOp::Compound(_)) && lhs.len() != 1 {
                return Err(ParseError::new(
                    "compound assignment takes a single operand",
                    self.span_from(start),
                ));
            }
            let rhs = self.expression_list()?;
            let targets = self.arena.alloc_expr_list(lhs);
            let values = self.arena.alloc_expr_list(rhs);
            let id = self.alloc_stmt(
                StmtKind::Assign {
                    targets,
                    op,
                    values,
                },
                self.span_from(start),
            );
            return Ok(Simple::Stmt(id));
        }

        match self.current_kind() {
            TokenKind::PlusPlus | TokenKind::MinusMinus if lhs.len() == 1 => {
                let increment = self.advance().kind == TokenKind::PlusPlus;
                let id = self.alloc_stmt(
                    StmtKind::IncDec {
                        target: lhs[0],
                        increment,
                    },
                    self.span_from(start),
                );
                Ok(Simple::Stmt(id))
            }
            TokenKind::Arrow => Err(self.unsupported("channel sends")),
            TokenKind::Colon
                if lhs.len() == 1
                    && matches!(self.arena.expr(lhs[0]).kind, ExprKind::Ident(_)) =>
            {
                Err(self.unsupported("labeled statements"))
            }
            _ if lhs.len() == 1 => {
                let id = self.alloc_stmt(StmtKind::Expr(lhs[0]), self.span_from(start));
                Ok(Simple::Stmt(id))
            }
            _ => Err(self.unexpected("`:=` or `=`")),
        }
    }

    fn range_targets(&mut self, lhs: &[ExprId], define: bool) -> PResult<Simple> {
        if lhs.len() > 2 {
            return Err(ParseError::new(
                "range permits at most two iteration variables",
                self.arena.expr(lhs[2]).span,
            ));
        }
        if define {
            if let Some(bad) = lhs
                .iter()
                .find(|id| !matches!(self.arena.expr(**id).kind, ExprKind::Ident(_)))
            {
                return Err(ParseError::new(
                    "non-name on left side of `:=`",
                    self.arena.expr(*bad).span,
                ));
            }
        }
        Ok(Simple::Range {
            key: lhs.first().copied(),
            value: lhs.get(1).copied(),
            define,
        })
    }

    fn block(&mut self) -> PResult<StmtId> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let outer = std::mem::replace(&mut self.expr_lev, 0);
        let stmts = self.statement_list();
        self.expr_lev = outer;
        let stmts = stmts?;
        self.expect(TokenKind::RBrace)?;
        Ok(self.alloc_stmt(StmtKind::Block(stmts), self.span_from(start)))
    }

    fn if_stmt(&mut self) -> PResult<StmtId> {
        let start = self.expect(TokenKind::If)?.span;
        let outer = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.if_header();
        self.expr_lev = outer;
        let (init, cond) = header?;

        let then_branch = self.block()?;
        let else_branch = if self.eat(TokenKind::Else) {
            match self.current_kind() {
                TokenKind::If => Some(self.if_stmt()?),
                TokenKind::LBrace => Some(self.block()?),
                _ => return Err(self.unexpected("`if` or block after `else`")),
            }
        } else {
            None
        };

        Ok(self.alloc_stmt(
            StmtKind::If {
                init,
                cond,
                then_branch,
                else_branch,
            },
            self.span_from(start),
        ))
    }

    fn if_header(&mut self) -> PResult<(Option<StmtId>, ExprId)> {
        if self.check(TokenKind::LBrace) {
            return Err(self.unexpected("condition"));
        }
        let init = if self.check(TokenKind::Semicolon) {
            None
        } else {
            match self.simple_stmt(false)? {
                Simple::Stmt(id) => Some(id),
                Simple::Range { .. } => return Err(self.unexpected("condition")),
            }
        };
        if self.eat(TokenKind::Semicolon) {
            let cond = self.expression()?;
            return Ok((init, cond));
        }
        match init.map(|id| &self.arena.stmt(id).kind) {
            Some(StmtKind::Expr(cond)) => Ok((None, *cond)),
            _ => Err(self.unexpected("condition")),
        }
    }

    fn for_stmt(&mut self) -> PResult<StmtId> {
        let start = self.expect(TokenKind::For)?.span;
        let outer = std::mem::replace(&mut self.expr_lev, -1);
        let header = self.for_header();
        self.expr_lev = outer;
        let header = header?;

        let body = self.block()?;
        let kind = match header {
            ForHeader::Range {
                key,
                value,
                define,
                iterable,
            } => StmtKind::Range(RangeClause {
                key,
                value,
                define,
                iterable,
                body,
            }),
            ForHeader::Loop { init, cond, post } => StmtKind::For {
                init,
                cond,
                post,
                body,
            },
        };
        Ok(self.alloc_stmt(kind, self.span_from(start)))
    }

    fn for_header(&mut self) -> PResult<ForHeader> {
        if self.check(TokenKind::LBrace) {
            return Ok(ForHeader::Loop {
                init: None,
                cond: None,
                post: None,
            });
        }
        if self.eat(TokenKind::Range) {
            let iterable = self.expression()?;
            return Ok(ForHeader::Range {
                key: None,
                value: None,
                define: false,
                iterable,
            });
        }

        let first = if self.check(TokenKind::Semicolon) {
            None
        } else {
            match self.simple_stmt(true)? {
                Simple::Range { key, value, define } => {
                    self.expect(TokenKind::Range)?;
                    let iterable = self.expression()?;
                    return Ok(ForHeader::Range {
                        key,
                        value,
                        define,
                        iterable,
                    });
                }
                Simple::Stmt(id) => Some(id),
            }
        };

        if !self.eat(TokenKind::Semicolon) {
            return match first.map(|id| &self.arena.stmt(id).kind) {
                Some(StmtKind::Expr(cond)) => Ok(ForHeader::Loop {
                    init: None,
                    cond: Some(*cond),
                    post: None,
                }),
                _ => Err(self.unexpected("for loop condition")),
            };
        }

        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Semicolon)?;
        let post = if self.check(TokenKind::LBrace) {
            None
        } else {
            match self.simple_stmt(false)? {
                Simple::Stmt(id) => Some(id),
                Simple::Range { .. } => return Err(self.unexpected("post statement")),
            }
        };
        if let Some(post) = post {
            let stmt = self.arena.stmt(post);
            if matches!(stmt.kind, StmtKind::Assign { op: AssignOp::Define, .. }) {
                return Err(ParseError::new(
                    "cannot declare in post statement of for loop",
                    stmt.span,
                ));
            }
        }
        Ok(ForHeader::Loop {
            init: first,
            cond,
            post,
        })
    }

    // ===== Declarations =====

    /// Parse `var`/`const`, single or grouped. A group shares its enclosing
    /// scope.
    fn var_decl(&mut self, constant: bool) -> PResult<StmtId> {
        let start = self.advance().span;
        if !self.eat(TokenKind::LParen) {
            return self.value_spec(constant, start);
        }
        let mut specs = Vec::new();
        loop {
            while self.eat(TokenKind::Semicolon) {}
            if self.check(TokenKind::RParen) {
                break;
            }
            let spec_start = self.current_span();
            specs.push(self.value_spec(constant, spec_start)?);
            if !self.check(TokenKind::RParen) {
                self.expect(TokenKind::Semicolon)?;
            }
        }
        self.expect(TokenKind::RParen)?;
        let stmts = self.arena.alloc_stmt_list(specs);
        Ok(self.alloc_stmt(StmtKind::Group(stmts), self.span_from(start)))
    }

    fn value_spec(&mut self, constant: bool, start: Span) -> PResult<StmtId> {
        let mut names = vec![self.ident()?.0];
        while self.eat(TokenKind::Comma) {
            names.push(self.ident()?.0);
        }

        let ty = if self.check(TokenKind::Eq)
            || self.check(TokenKind::Semicolon)
            || self.check(TokenKind::RParen)
            || self.at_end()
        {
            None
        } else {
            Some(self.type_expr()?)
        };

        let values = if self.eat(TokenKind::Eq) {
            self.expression_list()?
        } else {
            Vec::new()
        };

        if values.is_empty() {
            if constant {
                return Err(ParseError::new(
                    "missing init expr for const declaration",
                    self.span_from(start),
                ));
            }
            if ty.is_none() {
                return Err(self.unexpected("type or `=`"));
            }
        }

        let names = self.arena.alloc_names(names);
        let values = self.arena.alloc_expr_list(values);
        Ok(self.alloc_stmt(
            StmtKind::Var(ValueSpec {
                names,
                ty,
                values,
                constant,
            }),
            self.span_from(start),
        ))
    }

    fn type_decl(&mut self) -> PResult<StmtId> {
        let start = self.advance().span;
        if !self.eat(TokenKind::LParen) {
            return self.type_spec(start);
        }
        let mut specs = Vec::new();
        loop {
            while self.eat(TokenKind::Semicolon) {}
            if self.check(TokenKind::RParen) {
                break;
            }
            let spec_start = self.current_span();
            specs.push(self.type_spec(spec_start)?);
            if !self.check(TokenKind::RParen) {
                self.expect(TokenKind::Semicolon)?;
            }
        }
        self.expect(TokenKind::RParen)?;
        let stmts = self.arena.alloc_stmt_list(specs);
        Ok(self.alloc_stmt(StmtKind::Group(stmts), self.span_from(start)))
    }

    fn type_spec(&mut self, start: Span) -> PResult<StmtId> {
        let (name, _) = self.ident()?;
        if self.check(TokenKind::LBracket) && self.looks_like_type_params() {
            return Err(self.unsupported("type parameters"));
        }
        let alias = self.eat(TokenKind::Eq);
        let ty = self.type_expr()?;
        Ok(self.alloc_stmt(
            StmtKind::TypeDecl { name, ty, alias },
            self.span_from(start),
        ))
    }

    /// `type T[K any] ...` vs `type T []int`.
    fn looks_like_type_params(&self) -> bool {
        let next = |n: usize| {
            self.tokens
                .tokens
                .get(self.pos + n)
                .map_or(TokenKind::Eof, |t| t.kind)
        };
        next(1) == TokenKind::Ident && matches!(next(2), TokenKind::Ident | TokenKind::Interface)
    }

    fn import_decl(&mut self) -> PResult<StmtId> {
        let start = self.advance().span;
        if !self.eat(TokenKind::LParen) {
            return self.import_spec(start);
        }
        let mut specs = Vec::new();
        loop {
            while self.eat(TokenKind::Semicolon) {}
            if self.check(TokenKind::RParen) {
                break;
            }
            let spec_start = self.current_span();
            specs.push(self.import_spec(spec_start)?);
            if !self.check(TokenKind::RParen) {
                self.expect(TokenKind::Semicolon)?;
            }
        }
        self.expect(TokenKind::RParen)?;
        let stmts = self.arena.alloc_stmt_list(specs);
        Ok(self.alloc_stmt(StmtKind::Group(stmts), self.span_from(start)))
    }

    fn import_spec(&mut self, start: Span) -> PResult<StmtId> {
        if !self.eat(TokenKind::Ident) {
            self.eat(TokenKind::Dot);
        }
        let path = self.expect(TokenKind::String)?;
        let path = self.intern_span(path.span);
        Ok(self.alloc_stmt(StmtKind::Import(path), self.span_from(start)))
    }
}

enum ForHeader {
    Loop {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
    },
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        define: bool,
        iterable: ExprId,
    },
}

fn compound_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::PlusEq => BinaryOp::Add,
        TokenKind::MinusEq => BinaryOp::Sub,
        TokenKind::StarEq => BinaryOp::Mul,
        TokenKind::SlashEq => BinaryOp::Div,
        TokenKind::PercentEq => BinaryOp::Rem,
        TokenKind::AmpEq => BinaryOp::BitAnd,
        TokenKind::PipeEq => BinaryOp::BitOr,
        TokenKind::CaretEq => BinaryOp::BitXor,
        TokenKind::ShlEq => BinaryOp::Shl,
        TokenKind::ShrEq => BinaryOp::Shr,
        TokenKind::AmpCaretEq => BinaryOp::AndNot,
        _ => return None,
    };
    Some(op)
}
