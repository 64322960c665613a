//! Type expressions: `[]T`, `[N]T`, `map[K]V`, `chan T`, `struct{...}`,
//! `*T`, `interface{}` and (qualified) type names.

use super::{PResult, Parser};
use golite_ir::{ExprId, ExprKind, FieldDecl, Name};
use golite_lexer::TokenKind;

impl Parser<'_> {
    pub(super) fn type_expr(&mut self) -> PResult<ExprId> {
        golite_stack::ensure_sufficient_stack(|| self.type_expr_inner())
    }

    fn type_expr_inner(&mut self) -> PResult<ExprId> {
        let start = self.current_span();
        match self.current_kind() {
            TokenKind::Ident => {
                let (name, span) = self.ident()?;
                let base = self.alloc_expr(ExprKind::Ident(name), span);
                if self.eat(TokenKind::Dot) {
                    let (field, _) = self.ident()?;
                    return Ok(self.alloc_expr(
                        ExprKind::Selector { base, field },
                        self.span_from(start),
                    ));
                }
                Ok(base)
            }
            TokenKind::LBracket => {
                self.advance();
                if self.eat(TokenKind::RBracket) {
                    let elem = self.type_expr()?;
                    return Ok(self.alloc_expr(ExprKind::SliceType(elem), self.span_from(start)));
                }
                let len = if self.eat(TokenKind::Ellipsis) {
                    None
                } else {
                    self.expr_lev += 1;
                    let len = self.expression();
                    self.expr_lev -= 1;
                    Some(len?)
                };
                self.expect(TokenKind::RBracket)?;
                let elem = self.type_expr()?;
                Ok(self.alloc_expr(ExprKind::ArrayType { len, elem }, self.span_from(start)))
            }
            TokenKind::Map => {
                self.advance();
                self.expect(TokenKind::LBracket)?;
                let key = self.type_expr()?;
                self.expect(TokenKind::RBracket)?;
                let value = self.type_expr()?;
                Ok(self.alloc_expr(ExprKind::MapType { key, value }, self.span_from(start)))
            }
            TokenKind::Chan => {
                self.advance();
                if self.check(TokenKind::Arrow) {
                    return Err(self.unsupported("directional channels"));
                }
                let elem = self.type_expr()?;
                Ok(self.alloc_expr(ExprKind::ChanType(elem), self.span_from(start)))
            }
            TokenKind::Arrow => Err(self.unsupported("directional channels")),
            TokenKind::Struct => self.struct_type(),
            TokenKind::Interface => {
                self.advance();
                self.expect(TokenKind::LBrace)?;
                if !self.check(TokenKind::RBrace) {
                    return Err(self.unsupported("interface methods"));
                }
                self.advance();
                Ok(self.alloc_expr(ExprKind::InterfaceType, self.span_from(start)))
            }
            TokenKind::Star => {
                self.advance();
                let pointee = self.type_expr()?;
                Ok(self.alloc_expr(ExprKind::PointerType(pointee), self.span_from(start)))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.type_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::Func => Err(self.unsupported("function types")),
            _ => Err(self.unexpected("type")),
        }
    }

    fn struct_type(&mut self) -> PResult<ExprId> {
        let start = self.expect(TokenKind::Struct)?.span;
        self.expect(TokenKind::LBrace)?;

        let mut fields = Vec::new();
        loop {
            while self.eat(TokenKind::Semicolon) {}
            if self.check(TokenKind::RBrace) {
                break;
            }
            self.field_decl(&mut fields)?;
            // Field tags carry no meaning here.
            self.eat(TokenKind::String);
            if !self.check(TokenKind::RBrace) {
                self.expect(TokenKind::Semicolon)?;
            }
        }
        self.expect(TokenKind::RBrace)?;

        let fields = self.arena.alloc_fields(fields);
        Ok(self.alloc_expr(ExprKind::StructType(fields), self.span_from(start)))
    }

    fn field_decl(&mut self, fields: &mut Vec<FieldDecl>) -> PResult<()> {
        let start = self.current_span();

        // Embedded `*T` field.
        if self.check(TokenKind::Star) {
            let ty = self.type_expr()?;
            let name = match &self.arena.expr(ty).kind {
                ExprKind::PointerType(inner) => self.embedded_name(*inner),
                _ => None,
            };
            let name = name.ok_or_else(|| self.unexpected("embedded type name"))?;
            fields.push(FieldDecl {
                name,
                ty,
                span: self.span_from(start),
            });
            return Ok(());
        }

        let mut names = vec![self.ident()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.ident()?);
        }

        // Embedded `T` or `pkg.T` field.
        let embedded = names.len() == 1
            && matches!(
                self.current_kind(),
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::String | TokenKind::Dot
            );
        if embedded {
            let (name, span) = names[0];
            let mut ty = self.alloc_expr(ExprKind::Ident(name), span);
            let mut field_name = name;
            if self.eat(TokenKind::Dot) {
                let (sel, _) = self.ident()?;
                let span = self.span_from(start);
                ty = self.alloc_expr(ExprKind::Selector { base: ty, field: sel }, span);
                field_name = sel;
            }
            fields.push(FieldDecl {
                name: field_name,
                ty,
                span: self.span_from(start),
            });
            return Ok(());
        }

        let ty = self.type_expr()?;
        for (name, span) in names {
            fields.push(FieldDecl {
                name,
                ty,
                span: span.merge(self.previous_span()),
            });
        }
        Ok(())
    }

    fn embedded_name(&self, ty: ExprId) -> Option<Name> {
        match &self.arena.expr(ty).kind {
            ExprKind::Ident(name) => Some(*name),
            ExprKind::Selector { field, .. } => Some(*field),
            _ => None,
        }
    }
}
