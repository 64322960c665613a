//! Expression evaluation.

use golite_ir::{BinaryOp, ExprId, ExprKind, ExprRange, FieldRange, LitKind, Name, UnaryOp};
use golite_stack::ensure_sufficient_stack;
use golite_value::{
    assign_exact, assign_to, builtin_type, conversion, convert, index_out_of_range,
    no_such_member, not_callable, operator_type, type_error, undefined, EvalError, MapKey,
    StructField, StructType, Type, Value,
};
use std::sync::Arc;

use super::{Flow, Interpreter};
use crate::{builtins, evaluate_binary, evaluate_constant_shift, evaluate_unary, literals};

impl Interpreter<'_> {
    /// Evaluate an expression with stack safety and budget accounting.
    pub(crate) fn eval(&mut self, id: ExprId) -> Flow {
        ensure_sufficient_stack(|| self.eval_inner(id))
    }

    fn eval_inner(&mut self, id: ExprId) -> Flow {
        self.mode.check_budget()?;
        let expr = self.expr(id);
        self.eval_kind(&expr.kind)
            .map_err(|action| action.with_span_if_error(expr.span))
    }

    fn eval_kind(&mut self, kind: &ExprKind) -> Flow {
        match *kind {
            ExprKind::Ident(name) => self.eval_ident(name),
            ExprKind::Literal { kind, text } => Ok(literals::decode(kind, self.text(text))?),
            ExprKind::Binary { op, left, right } => self.eval_binary(op, left, right),
            ExprKind::Unary { op, operand } => {
                if matches!(op, UnaryOp::Neg) {
                    if let ExprKind::Literal {
                        kind: LitKind::Int,
                        text,
                    } = self.expr(operand).kind
                    {
                        return Ok(literals::decode_negated_int(self.text(text))?);
                    }
                }
                let value = self.eval(operand)?;
                Ok(evaluate_unary(&value, op)?)
            }
            ExprKind::Paren(inner) => self.eval(inner),
            ExprKind::Selector { base, field } => {
                let value = self.eval(base)?;
                self.select(&value, field)
            }
            ExprKind::Index { base, index } => self.eval_index(base, index),
            ExprKind::Slice { base, low, high } => self.eval_slice(base, low, high),
            ExprKind::Call { func, args, spread } => self.eval_call(func, args, spread),
            ExprKind::Composite { ty, elements } => self.eval_composite(ty, elements, None),

            ExprKind::SliceType(elem) => Ok(Value::Type(Type::slice(self.eval_type(elem)?))),
            ExprKind::ArrayType { len, elem } => {
                if len.is_none() {
                    return Err(type_error("invalid use of [...] array outside a composite literal")
                        .into());
                }
                Ok(Value::Type(Type::slice(self.eval_type(elem)?)))
            }
            ExprKind::MapType { key, value } => {
                let key = self.eval_type(key)?;
                let value = self.eval_type(value)?;
                Ok(Value::Type(Type::map(key, value)))
            }
            ExprKind::ChanType(elem) => Ok(Value::Type(Type::chan(self.eval_type(elem)?))),
            ExprKind::StructType(fields) => Ok(Value::Type(self.struct_type(fields)?)),
            ExprKind::PointerType(inner) => Ok(Value::Type(Type::pointer(self.eval_type(inner)?))),
            ExprKind::InterfaceType => Ok(Value::Type(Type::Any)),
        }
    }

    /// Builtin type names, then builtin functions and constants, then the
    /// scope chain.
    fn eval_ident(&mut self, name: Name) -> Flow {
        let text = self.text(name);
        if let Some(ty) = builtin_type(text) {
            return Ok(Value::Type(ty.clone()));
        }
        if let Some(value) = builtins::lookup(text) {
            return Ok(value.clone());
        }
        self.scopes
            .lookup(name, text)
            .ok_or_else(|| undefined(text).into())
    }

    /// Evaluate an expression that must denote a type.
    pub(super) fn eval_type(&mut self, id: ExprId) -> Flow<Type> {
        match self.eval(id)? {
            Value::Type(ty) => Ok(ty),
            other => Err(type_error(format!("{other} is not a type"))
                .with_span(self.expr(id).span)
                .into()),
        }
    }

    fn struct_type(&mut self, fields: FieldRange) -> Flow<Type> {
        let decls = self.body.arena.fields(fields);
        let mut layout = Vec::with_capacity(decls.len());
        for decl in decls {
            let ty = self.eval_type(decl.ty)?;
            layout.push(StructField {
                name: self.text(decl.name).to_string(),
                ty,
            });
        }
        Ok(Type::Struct(Arc::new(StructType::new(layout))))
    }

    fn eval_binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> Flow {
        if matches!(op, BinaryOp::And | BinaryOp::Or) {
            return self.eval_logical(op, left, right);
        }
        let mut lhs = self.eval(left)?;
        let mut rhs = self.eval(right)?;
        if op == BinaryOp::Shl && self.is_untyped(left) && self.is_untyped(right) {
            return Ok(evaluate_constant_shift(&lhs, &rhs)?);
        }
        if !op.is_shift() {
            match (self.is_untyped(left), self.is_untyped(right)) {
                (false, true) => rhs = coerce_untyped(rhs, &lhs.type_of())?,
                (true, false) => lhs = coerce_untyped(lhs, &rhs.type_of())?,
                _ => {}
            }
        }
        Ok(evaluate_binary(&lhs, &rhs, op)?)
    }

    /// `&&` and `||`, evaluating the right operand only when needed.
    fn eval_logical(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> Flow {
        let lhs = self.eval(left)?;
        let Some(l) = lhs.as_bool() else {
            return Err(operator_type(op.as_symbol(), lhs.type_of(), "bool").into());
        };
        if (op == BinaryOp::And && !l) || (op == BinaryOp::Or && l) {
            return Ok(Value::Bool(l));
        }
        let rhs = self.eval(right)?;
        match rhs.as_bool() {
            Some(r) => Ok(Value::Bool(r)),
            None => Err(operator_type(op.as_symbol(), "bool", rhs.type_of()).into()),
        }
    }

    /// Whether `id` is a constant expression built only from literals,
    /// whose value still carries a default type.
    pub(super) fn is_untyped(&self, id: ExprId) -> bool {
        match self.expr(id).kind {
            ExprKind::Literal { .. } => true,
            ExprKind::Paren(inner) => self.is_untyped(inner),
            ExprKind::Unary {
                op: UnaryOp::Neg | UnaryOp::Plus | UnaryOp::BitNot,
                operand,
            } => self.is_untyped(operand),
            ExprKind::Binary { op, left, right } => {
                !op.is_comparison() && self.is_untyped(left) && self.is_untyped(right)
            }
            _ => false,
        }
    }

    /// `x.name`: a method bound to `x` first, then a field.
    pub(super) fn select(&mut self, value: &Value, field: Name) -> Flow {
        let name = self.text(field);
        let found = match value {
            Value::Struct(s) => s
                .struct_type()
                .method(name)
                .map(|m| Value::Func(m.bind(value.clone())))
                .or_else(|| s.field(name).cloned()),
            Value::Ref(r) => r
                .struct_type()
                .method(name)
                .map(|m| Value::Func(m.bind(value.clone())))
                .or_else(|| r.field(name)),
            other => return Err(no_such_member(name, other.kind_name()).into()),
        };
        found.ok_or_else(|| no_such_member(name, value.type_of()).into())
    }

    fn eval_index(&mut self, base: ExprId, index: ExprId) -> Flow {
        let container = self.eval(base)?;
        let key = self.eval(index)?;
        match &container {
            Value::Map(m) => {
                let key = assign_value(key, m.key_type(), self.is_untyped(index))?;
                let key = MapKey::from_value(&key)?;
                Ok(m.get(&key).unwrap_or_else(|| Value::zero(m.elem())))
            }
            Value::Slice(s) => {
                let i = self.position(&key, s.len())?;
                s.get(i)
                    .ok_or_else(|| index_out_of_range(i as i64, s.len()).into())
            }
            Value::Str(s) => {
                let i = self.position(&key, s.len())?;
                match s.get(i) {
                    Some(b) => Ok(Value::byte(*b)),
                    None => Err(index_out_of_range(i as i64, s.len()).into()),
                }
            }
            other => Err(type_error(format!(
                "invalid operation: cannot index {other} (variable of type {})",
                other.type_of()
            ))
            .into()),
        }
    }

    /// An integer index in `0..len`.
    pub(super) fn position(&self, key: &Value, len: usize) -> Flow<usize> {
        let Some(i) = key.as_i64() else {
            return Err(type_error(format!(
                "invalid argument: index {key} (variable of type {}) must be integer",
                key.type_of()
            ))
            .into());
        };
        match usize::try_from(i) {
            Ok(pos) if pos < len => Ok(pos),
            _ => Err(index_out_of_range(i, len).into()),
        }
    }

    fn bound(&mut self, id: Option<ExprId>, default: usize, len: usize) -> Flow<usize> {
        let Some(id) = id else {
            return Ok(default);
        };
        let value = self.eval(id)?;
        let Some(i) = value.as_i64() else {
            return Err(type_error(format!(
                "invalid argument: index {value} (variable of type {}) must be integer",
                value.type_of()
            ))
            .into());
        };
        match usize::try_from(i) {
            Ok(pos) if pos <= len => Ok(pos),
            _ => Err(index_out_of_range(i, len).into()),
        }
    }

    fn eval_slice(&mut self, base: ExprId, low: Option<ExprId>, high: Option<ExprId>) -> Flow {
        let container = self.eval(base)?;
        let len = match &container {
            Value::Slice(s) => s.len(),
            Value::Str(s) => s.len(),
            other => {
                return Err(type_error(format!(
                    "cannot slice {other} (variable of type {})",
                    other.type_of()
                ))
                .into())
            }
        };
        let lo = self.bound(low, 0, len)?;
        let hi = self.bound(high, len, len)?;
        if lo > hi {
            return Err(type_error(format!("invalid slice indices: {hi} < {lo}")).into());
        }
        match container {
            Value::Slice(s) => {
                let window = s.with_items(|items| items.get(lo..hi).map(<[Value]>::to_vec));
                match window {
                    Some(items) => Ok(Value::slice(s.elem().clone(), items)),
                    None => Err(index_out_of_range(hi as i64, s.len()).into()),
                }
            }
            Value::Str(s) => {
                let bytes = s.get(lo..hi).unwrap_or_default();
                Ok(Value::byte_string(bytes))
            }
            _ => Ok(Value::Nil),
        }
    }

    fn eval_call(&mut self, func: ExprId, args: ExprRange, spread: bool) -> Flow {
        let callee = self.eval(func)?;
        let arg_ids = self.body.arena.expr_list(args);

        if let Value::Type(ty) = &callee {
            let [arg] = arg_ids else {
                return Err(conversion(format!("{} arguments", arg_ids.len()), ty).into());
            };
            let value = self.eval(*arg)?;
            return Ok(convert(&value, ty)?);
        }

        let f = match callee {
            Value::Func(f) => f,
            other => return Err(not_callable(other.type_of()).into()),
        };

        let mut values = Vec::with_capacity(arg_ids.len());
        for &arg in arg_ids {
            values.push(self.eval(arg)?);
        }
        if builtins::is_append(&f) {
            self.coerce_appended(arg_ids, &mut values)?;
        }
        if spread {
            match values.pop() {
                Some(Value::Slice(tail)) => values.extend(tail.to_vec()),
                Some(other) => {
                    return Err(type_error(format!(
                        "cannot use ... with {other} (variable of type {})",
                        other.type_of()
                    ))
                    .into())
                }
                None => {}
            }
        }

        tracing::trace!(name = f.name(), args = values.len(), "call");
        Ok(f.call(&values)?)
    }

    /// Constant arguments to `append` take the slice's element type.
    fn coerce_appended(&self, arg_ids: &[ExprId], values: &mut [Value]) -> Flow<()> {
        let Some(Value::Slice(seq)) = values.first() else {
            return Ok(());
        };
        let elem = seq.elem().clone();
        for (value, &id) in values.iter_mut().zip(arg_ids).skip(1) {
            if self.is_untyped(id) {
                *value = coerce_untyped(std::mem::replace(value, Value::Nil), &elem)?;
            }
        }
        Ok(())
    }
}

/// Fit `value` to a slot of type `ty`. Constants may change numeric type;
/// typed values must match.
pub(super) fn assign_value(value: Value, ty: &Type, untyped: bool) -> Result<Value, EvalError> {
    if untyped {
        assign_to(value, ty)
    } else {
        assign_exact(value, ty)
    }
}

/// Convert a default-typed constant to the other operand's numeric type.
/// Non-numeric targets leave the value alone for the operator to judge.
pub(super) fn coerce_untyped(value: Value, target: &Type) -> Flow {
    let numeric = matches!(
        value,
        Value::Int(..) | Value::Uint(..) | Value::Float(..) | Value::Complex(..)
    );
    if numeric && target.is_numeric() {
        Ok(assign_to(value, target)?)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests;
