//! Assignment: `=`, `:=`, `op=`, `++`/`--` and destructuring.

use golite_ir::{AssignOp, BinaryOp, ExprId, ExprKind, ExprRange, Name, UnaryOp};
use golite_value::{
    assignment_count, index_out_of_range, no_such_member, type_error, undefined_variable, Complex,
    MapKey, Value,
};

use super::expr::{assign_value, coerce_untyped};
use super::{Flow, Interpreter};
use crate::evaluate_binary;

impl Interpreter<'_> {
    pub(super) fn exec_assign(
        &mut self,
        targets: ExprRange,
        op: AssignOp,
        values: ExprRange,
    ) -> Flow<()> {
        let targets = self.body.arena.expr_list(targets);
        let values = self.body.arena.expr_list(values);

        if let AssignOp::Compound(bin) = op {
            let ([target], [value]) = (targets, values) else {
                return Err(assignment_count(targets.len(), values.len()).into());
            };
            return self.compound(*target, bin, *value);
        }

        let results = self.eval_values(values, targets.len())?;
        for (&target, (value, untyped)) in targets.iter().zip(results) {
            if op == AssignOp::Define {
                self.define_target(target, value)?;
            } else {
                self.store(target, value, untyped)?;
            }
        }
        Ok(())
    }

    /// Evaluate right-hand sides for `want` targets: one value per target,
    /// or a single tuple or slice that is spread across them. Each value is
    /// paired with whether it came from an untyped constant.
    pub(super) fn eval_values(
        &mut self,
        values: &[ExprId],
        want: usize,
    ) -> Flow<Vec<(Value, bool)>> {
        if values.len() == want {
            let mut out = Vec::with_capacity(want);
            for &id in values {
                out.push((self.eval(id)?, self.is_untyped(id)));
            }
            return Ok(out);
        }
        if let [single] = values {
            let items = match self.eval(*single)? {
                Value::Tuple(items) => items.to_vec(),
                Value::Slice(s) => s.to_vec(),
                _ => return Err(assignment_count(want, 1).into()),
            };
            if items.len() != want {
                return Err(assignment_count(want, items.len()).into());
            }
            return Ok(items.into_iter().map(|v| (v, false)).collect());
        }
        Err(assignment_count(want, values.len()).into())
    }

    /// `name := value`; `_` discards.
    pub(super) fn define_target(&mut self, target: ExprId, value: Value) -> Flow<()> {
        let ExprKind::Ident(name) = self.expr(target).kind else {
            return Err(type_error("non-name on left side of :=")
                .with_span(self.expr(target).span)
                .into());
        };
        self.define_name(name, value);
        Ok(())
    }

    pub(super) fn define_name(&mut self, name: Name, value: Value) {
        let text = self.text(name);
        if text != "_" {
            self.scopes.define(name, text, value);
        }
    }

    /// `x op= y`.
    fn compound(&mut self, target: ExprId, op: BinaryOp, value: ExprId) -> Flow<()> {
        let current = self.eval(target)?;
        let mut rhs = self.eval(value)?;
        if !op.is_shift() && self.is_untyped(value) {
            rhs = coerce_untyped(rhs, &current.type_of())?;
        }
        let updated = evaluate_binary(&current, &rhs, op)?;
        self.store(target, updated, false)
    }

    /// `x++` / `x--`, using a one of `x`'s own kind.
    pub(super) fn exec_inc_dec(&mut self, target: ExprId, increment: bool) -> Flow<()> {
        let current = self.eval(target)?;
        let one = match &current {
            Value::Int(_, k) => Value::Int(1, *k),
            Value::Uint(_, k) => Value::Uint(1, *k),
            Value::Float(_, k) => Value::Float(1.0, *k),
            Value::Complex(_, k) => Value::Complex(Complex::new(1.0, 0.0), *k),
            other => {
                let op = if increment { "++" } else { "--" };
                return Err(type_error(format!(
                    "invalid operation: {op} on {other} (non-numeric type {})",
                    other.type_of()
                ))
                .into());
            }
        };
        let op = if increment { BinaryOp::Add } else { BinaryOp::Sub };
        let updated = evaluate_binary(&current, &one, op)?;
        self.store(target, updated, false)
    }

    /// Write `value` to an assignable expression. `untyped` marks a value
    /// from a constant expression, which adopts an existing numeric
    /// binding's type.
    pub(super) fn store(&mut self, target: ExprId, value: Value, untyped: bool) -> Flow<()> {
        let expr = self.expr(target);
        let result = match expr.kind {
            ExprKind::Ident(name) => self.store_name(name, value, untyped),
            ExprKind::Paren(inner) => self.store(inner, value, untyped),
            ExprKind::Index { base, index } => self.store_index(base, index, value, untyped),
            ExprKind::Selector { base, field } => self.store_field(base, field, value, untyped),
            ExprKind::Unary {
                op: UnaryOp::Deref,
                operand,
            } => self.store_through(operand, value),
            _ => Err(type_error("cannot assign to expression").into()),
        };
        result.map_err(|action| action.with_span_if_error(expr.span))
    }

    fn store_name(&mut self, name: Name, value: Value, untyped: bool) -> Flow<()> {
        let text = self.text(name);
        if text == "_" {
            return Ok(());
        }
        let value = match self.scopes.lookup(name, text) {
            Some(existing) if untyped => coerce_untyped(value, &existing.type_of())?,
            _ => value,
        };
        if self.scopes.assign(name, text, value) {
            Ok(())
        } else {
            Err(undefined_variable(text).into())
        }
    }

    /// `m[k] = v` inserts; `s[i] = v` writes the shared backing storage.
    fn store_index(
        &mut self,
        base: ExprId,
        index: ExprId,
        value: Value,
        untyped: bool,
    ) -> Flow<()> {
        let container = self.eval(base)?;
        let key = self.eval(index)?;
        match &container {
            Value::Map(m) => {
                let key = assign_value(key, m.key_type(), self.is_untyped(index))?;
                m.insert(MapKey::from_value(&key)?, assign_value(value, m.elem(), untyped)?);
                Ok(())
            }
            Value::Slice(s) => {
                let i = self.position(&key, s.len())?;
                if s.set(i, assign_value(value, s.elem(), untyped)?) {
                    Ok(())
                } else {
                    Err(index_out_of_range(i as i64, s.len()).into())
                }
            }
            other => Err(type_error(format!(
                "cannot assign to index of {other} (value of type {})",
                other.type_of()
            ))
            .into()),
        }
    }

    /// A reference is updated in place; a struct value is rebuilt and
    /// written back to wherever it came from.
    fn store_field(
        &mut self,
        base: ExprId,
        field: Name,
        value: Value,
        untyped: bool,
    ) -> Flow<()> {
        let name = self.text(field);
        match self.eval(base)? {
            Value::Ref(r) => {
                let Some(index) = r.struct_type().field_index(name) else {
                    return Err(no_such_member(name, Value::Ref(r).type_of()).into());
                };
                let value = assign_value(value, &r.struct_type().fields()[index].ty, untyped)?;
                r.set_field(index, value);
                Ok(())
            }
            Value::Struct(s) => {
                let Some(index) = s.struct_type().field_index(name) else {
                    return Err(no_such_member(name, Value::Struct(s).type_of()).into());
                };
                let value = assign_value(value, &s.struct_type().fields()[index].ty, untyped)?;
                self.store(base, Value::Struct(s.with_field(index, value)), false)
            }
            other => Err(no_such_member(name, other.kind_name()).into()),
        }
    }

    /// `*p = v` replaces every field of the referenced struct.
    fn store_through(&mut self, operand: ExprId, value: Value) -> Flow<()> {
        match (self.eval(operand)?, value) {
            (Value::Ref(r), Value::Struct(s)) if r.struct_type() == s.struct_type() => {
                for (index, field) in s.fields().iter().enumerate() {
                    r.set_field(index, field.clone());
                }
                Ok(())
            }
            (target, value) => Err(type_error(format!(
                "cannot assign {} to {}",
                value.type_of(),
                target.type_of()
            ))
            .into()),
        }
    }
}
