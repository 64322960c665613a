//! Arena allocation for the flat AST.
//!
//! All nodes of one parse live in contiguous vectors; children are indices
//! and lists are ranges into side tables.

use crate::ast::{Element, Expr, FieldDecl, Stmt};
use crate::{ElementRange, ExprId, ExprRange, FieldRange, Name, NameRange, StmtId, StmtRange};

#[derive(Clone, Debug, Default)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
    expr_lists: Vec<ExprId>,
    stmt_lists: Vec<StmtId>,
    elements: Vec<Element>,
    fields: Vec<FieldDecl>,
    names: Vec<Name>,
}

/// Push a list into a side table and return its range.
fn push_list<T, R>(table: &mut Vec<T>, items: impl IntoIterator<Item = T>, make: fn(u32, u32) -> R) -> R {
    let start = table.len();
    table.extend(items);
    let len = table.len() - start;
    make(
        u32::try_from(start).unwrap_or(u32::MAX),
        u32::try_from(len).unwrap_or(u32::MAX),
    )
}

fn next_index(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the tables from the source length (~1 expression per 8 bytes).
    pub fn with_capacity(source_len: usize) -> Self {
        let exprs = source_len / 8;
        ExprArena {
            exprs: Vec::with_capacity(exprs),
            stmts: Vec::with_capacity(exprs / 4),
            expr_lists: Vec::with_capacity(exprs / 4),
            stmt_lists: Vec::with_capacity(exprs / 4),
            elements: Vec::new(),
            fields: Vec::new(),
            names: Vec::new(),
        }
    }

    // ===== Expressions =====

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(next_index(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// # Panics
    /// Panics if `id` did not come from this arena.
    #[inline]
    #[track_caller]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    // ===== Statements =====

    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(next_index(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    /// # Panics
    /// Panics if `id` did not come from this arena.
    #[inline]
    #[track_caller]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    // ===== Lists =====

    pub fn alloc_expr_list(&mut self, items: impl IntoIterator<Item = ExprId>) -> ExprRange {
        push_list(&mut self.expr_lists, items, ExprRange::new)
    }

    pub fn expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.to_range()]
    }

    pub fn alloc_stmt_list(&mut self, items: impl IntoIterator<Item = StmtId>) -> StmtRange {
        push_list(&mut self.stmt_lists, items, StmtRange::new)
    }

    pub fn stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.to_range()]
    }

    pub fn alloc_elements(&mut self, items: impl IntoIterator<Item = Element>) -> ElementRange {
        push_list(&mut self.elements, items, ElementRange::new)
    }

    pub fn elements(&self, range: ElementRange) -> &[Element] {
        &self.elements[range.to_range()]
    }

    pub fn alloc_fields(&mut self, items: impl IntoIterator<Item = FieldDecl>) -> FieldRange {
        push_list(&mut self.fields, items, FieldRange::new)
    }

    pub fn fields(&self, range: FieldRange) -> &[FieldDecl] {
        &self.fields[range.to_range()]
    }

    pub fn alloc_names(&mut self, items: impl IntoIterator<Item = Name>) -> NameRange {
        push_list(&mut self.names, items, NameRange::new)
    }

    pub fn names(&self, range: NameRange) -> &[Name] {
        &self.names[range.to_range()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExprKind, Span, StmtKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn lists_are_contiguous_slices() {
        let mut arena = ExprArena::new();
        let a = arena.alloc_expr(Expr::new(ExprKind::Ident(Name::from_raw(1)), Span::new(0, 1)));
        let b = arena.alloc_expr(Expr::new(ExprKind::Ident(Name::from_raw(2)), Span::new(2, 3)));
        let first = arena.alloc_expr_list([a, b]);
        let second = arena.alloc_expr_list([b]);

        assert_eq!(arena.expr_list(first), &[a, b]);
        assert_eq!(arena.expr_list(second), &[b]);
        assert_eq!(arena.expr_list(ExprRange::EMPTY), &[] as &[ExprId]);
    }

    #[test]
    fn statements_round_trip_through_ids() {
        let mut arena = ExprArena::new();
        let x = arena.alloc_expr(Expr::new(ExprKind::Ident(Name::from_raw(1)), Span::new(0, 1)));
        let stmt = arena.alloc_stmt(Stmt::new(StmtKind::Expr(x), Span::new(0, 1)));
        let body = arena.alloc_stmt_list([stmt]);

        assert_eq!(arena.stmt(stmt).kind, StmtKind::Expr(x));
        assert_eq!(arena.stmt_list(body), &[stmt]);
        assert_eq!(arena.stmt_count(), 1);
    }
}
