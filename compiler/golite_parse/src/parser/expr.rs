//! Expression parsing: binary precedence climbing, unary operators,
//! primary expressions with their suffixes, composite literals.

use super::{PResult, Parser};
use golite_ir::{BinaryOp, Element, Expr, ExprId, ExprKind, LitKind, Span, UnaryOp};
use golite_lexer::TokenKind;

impl Parser<'_> {
    /// Parse any expression.
    pub(super) fn expression(&mut self) -> PResult<ExprId> {
        self.binary_expr(1)
    }

    pub(super) fn expression_list(&mut self) -> PResult<Vec<ExprId>> {
        let mut list = vec![self.expression()?];
        while self.eat(TokenKind::Comma) {
            list.push(self.expression()?);
        }
        Ok(list)
    }

    pub(super) fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        self.arena.alloc_expr(Expr::new(kind, span))
    }

    fn binary_expr(&mut self, min_prec: u8) -> PResult<ExprId> {
        let mut left = self.unary_expr()?;

        while let Some(op) = binary_op(self.current_kind()) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            let right = self.binary_expr(prec + 1)?;
            let span = self.arena.expr(left).span.merge(self.arena.expr(right).span);
            left = self.alloc_expr(ExprKind::Binary { op, left, right }, span);
        }

        Ok(left)
    }

    fn unary_expr(&mut self) -> PResult<ExprId> {
        golite_stack::ensure_sufficient_stack(|| self.unary_expr_inner())
    }

    fn unary_expr_inner(&mut self) -> PResult<ExprId> {
        let start = self.current_span();
        let op = match self.current_kind() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Caret => UnaryOp::BitNot,
            TokenKind::Amp => UnaryOp::Addr,
            TokenKind::Star => UnaryOp::Deref,
            TokenKind::Arrow => return Err(self.unsupported("channel receives")),
            TokenKind::Tilde => return Err(self.unexpected("expression")),
            _ => return self.primary_expr(),
        };
        self.advance();
        let operand = self.unary_expr()?;
        let span = self.span_from(start);
        Ok(self.alloc_expr(ExprKind::Unary { op, operand }, span))
    }

    fn primary_expr(&mut self) -> PResult<ExprId> {
        let start = self.current_span();
        let mut expr = self.operand()?;

        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    if self.check(TokenKind::LParen) {
                        return Err(self.unsupported("type assertions"));
                    }
                    let (field, _) = self.ident()?;
                    expr = self.alloc_expr(
                        ExprKind::Selector { base: expr, field },
                        self.span_from(start),
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    self.expr_lev += 1;
                    let suffix = self.index_suffix(expr, start);
                    self.expr_lev -= 1;
                    expr = suffix?;
                }
                TokenKind::LParen => {
                    self.advance();
                    self.expr_lev += 1;
                    let call = self.call_suffix(expr, start);
                    self.expr_lev -= 1;
                    expr = call?;
                }
                TokenKind::LBrace
                    if self.is_literal_type(expr)
                        && (self.expr_lev >= 0 || !self.is_type_name(expr)) =>
                {
                    expr = self.composite_lit(Some(expr), start)?;
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    fn operand(&mut self) -> PResult<ExprId> {
        let token = self.current();
        let lit = match token.kind {
            TokenKind::Int => Some(LitKind::Int),
            TokenKind::Float => Some(LitKind::Float),
            TokenKind::Imag => Some(LitKind::Imag),
            TokenKind::Char => Some(LitKind::Char),
            TokenKind::String => Some(LitKind::String),
            _ => None,
        };
        if let Some(kind) = lit {
            self.advance();
            let text = self.intern_span(token.span);
            return Ok(self.alloc_expr(ExprKind::Literal { kind, text }, token.span));
        }

        match token.kind {
            TokenKind::Ident => {
                let (name, span) = self.ident()?;
                Ok(self.alloc_expr(ExprKind::Ident(name), span))
            }
            TokenKind::LParen => {
                self.advance();
                self.expr_lev += 1;
                let inner = self.expression();
                self.expr_lev -= 1;
                let inner = inner?;
                self.expect(TokenKind::RParen)?;
                Ok(self.alloc_expr(ExprKind::Paren(inner), self.span_from(token.span)))
            }
            TokenKind::LBracket
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Struct
            | TokenKind::Interface => self.type_expr(),
            TokenKind::Func => Err(self.unsupported("function literals")),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn index_suffix(&mut self, base: ExprId, start: Span) -> PResult<ExprId> {
        let low = if self.check(TokenKind::Colon) {
            None
        } else {
            Some(self.expression()?)
        };

        if !self.eat(TokenKind::Colon) {
            self.expect(TokenKind::RBracket)?;
            let index = low.ok_or_else(|| self.unexpected("index"))?;
            return Ok(self.alloc_expr(ExprKind::Index { base, index }, self.span_from(start)));
        }

        let high = if self.check(TokenKind::RBracket) || self.check(TokenKind::Colon) {
            None
        } else {
            Some(self.expression()?)
        };
        if self.check(TokenKind::Colon) {
            return Err(self.unsupported("full slice expressions"));
        }
        self.expect(TokenKind::RBracket)?;
        Ok(self.alloc_expr(ExprKind::Slice { base, low, high }, self.span_from(start)))
    }

    fn call_suffix(&mut self, func: ExprId, start: Span) -> PResult<ExprId> {
        let mut args = Vec::new();
        let mut spread = false;

        while !self.check(TokenKind::RParen) {
            args.push(self.expression()?);
            if self.eat(TokenKind::Ellipsis) {
                spread = true;
                self.eat(TokenKind::Comma);
                break;
            }
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;

        let args = self.arena.alloc_expr_list(args);
        Ok(self.alloc_expr(
            ExprKind::Call { func, args, spread },
            self.span_from(start),
        ))
    }

    /// Parse `{ elements }`; `ty` is `None` for an elided inner literal.
    pub(super) fn composite_lit(&mut self, ty: Option<ExprId>, start: Span) -> PResult<ExprId> {
        self.expect(TokenKind::LBrace)?;
        let outer = std::mem::replace(&mut self.expr_lev, 0);
        let elements = self.elements();
        self.expr_lev = outer;
        let elements = elements?;
        self.expect(TokenKind::RBrace)
            .map_err(|_| self.unexpected("`,` or `}` in composite literal"))?;

        let elements = self.arena.alloc_elements(elements);
        Ok(self.alloc_expr(ExprKind::Composite { ty, elements }, self.span_from(start)))
    }

    fn elements(&mut self) -> PResult<Vec<Element>> {
        let mut elements = Vec::new();
        while !self.check(TokenKind::RBrace) {
            let first = self.element_value()?;
            let element = if self.eat(TokenKind::Colon) {
                Element {
                    key: Some(first),
                    value: self.element_value()?,
                }
            } else {
                Element {
                    key: None,
                    value: first,
                }
            };
            elements.push(element);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(elements)
    }

    fn element_value(&mut self) -> PResult<ExprId> {
        if self.check(TokenKind::LBrace) {
            let start = self.current_span();
            self.composite_lit(None, start)
        } else {
            self.expression()
        }
    }

    fn is_type_name(&self, id: ExprId) -> bool {
        match &self.arena.expr(id).kind {
            ExprKind::Ident(_) => true,
            ExprKind::Selector { base, .. } => {
                matches!(self.arena.expr(*base).kind, ExprKind::Ident(_))
            }
            _ => false,
        }
    }

    fn is_literal_type(&self, id: ExprId) -> bool {
        self.is_type_name(id)
            || matches!(
                self.arena.expr(id).kind,
                ExprKind::SliceType(_)
                    | ExprKind::ArrayType { .. }
                    | ExprKind::MapType { .. }
                    | ExprKind::StructType(_)
            )
    }
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::AmpCaret => BinaryOp::AndNot,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::AmpAmp => BinaryOp::And,
        TokenKind::PipePipe => BinaryOp::Or,
        _ => return None,
    };
    Some(op)
}
