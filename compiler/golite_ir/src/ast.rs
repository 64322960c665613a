//! AST node definitions for the golite statement language.
//!
//! The evaluated source is the body of an implicit zero-argument function,
//! so the root of every parse is a statement list ([`ParsedBody::body`]).

use crate::{
    BinaryOp, ElementRange, ExprArena, ExprId, ExprRange, FieldRange, Name, NameRange, Span,
    StmtId, StmtRange, StringInterner, UnaryOp,
};

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

/// Literal category, decided by the lexer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// Identifier, including `nil`, `true`, builtins and type names.
    Ident(Name),
    /// Literal with its raw source text (quotes and prefixes included).
    Literal { kind: LitKind, text: Name },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Paren(ExprId),
    /// `base.field`
    Selector { base: ExprId, field: Name },
    /// `base[index]`
    Index { base: ExprId, index: ExprId },
    /// `base[low:high]`
    Slice {
        base: ExprId,
        low: Option<ExprId>,
        high: Option<ExprId>,
    },
    /// `func(args)`, `spread` when the last argument carries `...`.
    Call {
        func: ExprId,
        args: ExprRange,
        spread: bool,
    },
    /// `T{elements}`; `ty` is `None` for elided inner literals (`{1, 2}`).
    Composite {
        ty: Option<ExprId>,
        elements: ElementRange,
    },

    // Type expressions
    /// `[]T`
    SliceType(ExprId),
    /// `[N]T`, or `[...]T` when `len` is `None`.
    ArrayType { len: Option<ExprId>, elem: ExprId },
    /// `map[K]V`
    MapType { key: ExprId, value: ExprId },
    /// `chan T`
    ChanType(ExprId),
    /// `struct { ... }`
    StructType(FieldRange),
    /// `*T` in type position.
    PointerType(ExprId),
    /// `interface{}`
    InterfaceType,
}

/// Composite literal element, `key: value` or a bare value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Element {
    pub key: Option<ExprId>,
    pub value: ExprId,
}

/// Struct field declaration. Embedded fields use the type's name.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: Name,
    pub ty: ExprId,
    pub span: Span,
}

/// Assignment flavour.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `:=`
    Define,
    /// `op=`
    Compound(BinaryOp),
}

/// `var`/`const` specification.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ValueSpec {
    pub names: NameRange,
    pub ty: Option<ExprId>,
    pub values: ExprRange,
    pub constant: bool,
}

/// `for key, value := range iterable { body }`
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RangeClause {
    pub key: Option<ExprId>,
    pub value: Option<ExprId>,
    pub define: bool,
    pub iterable: ExprId,
    pub body: StmtId,
}

/// Statement node.
#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Empty,
    Expr(ExprId),
    Assign {
        targets: ExprRange,
        op: AssignOp,
        values: ExprRange,
    },
    /// `x++` / `x--`
    IncDec { target: ExprId, increment: bool },
    /// `{ ... }`, a new scope.
    Block(StmtRange),
    /// `var ( ... )` and other grouped declarations, in the enclosing scope.
    Group(StmtRange),
    If {
        init: Option<StmtId>,
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    For {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: StmtId,
    },
    Range(RangeClause),
    Return(ExprRange),
    Break,
    Continue,
    Var(ValueSpec),
    /// `type Name T` (`alias` for `type Name = T`).
    TypeDecl { name: Name, ty: ExprId, alias: bool },
    /// `import "path"`; kept so evaluation can reject it.
    Import(Name),
}

/// Output of parsing one source text.
#[derive(Clone, Debug, Default)]
pub struct ParsedBody {
    pub arena: ExprArena,
    pub interner: StringInterner,
    pub body: StmtRange,
}

impl ParsedBody {
    /// Text of an interned name.
    #[inline]
    pub fn name(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }
}
