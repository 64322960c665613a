//! Composite literals: `[]T{...}`, `[N]T{...}`, `map[K]V{...}`, `T{...}`.
//!
//! Inner literals may drop their type (`[][]int{{1}, {2}}`); the element
//! type of the enclosing literal then supplies it, and a `*T` element type
//! turns an elided struct literal into a reference.

use golite_ir::{Element, ElementRange, ExprId, ExprKind};
use golite_value::{
    check_elements, index_out_of_range, no_such_member, type_error, MapKey, StructType, Type,
    Value,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

use super::expr::assign_value;
use super::{Flow, Interpreter};

/// Requested length of an array literal.
#[derive(Copy, Clone)]
enum ArrayLen {
    /// A slice literal.
    Unbounded,
    /// `[N]T`
    Fixed(usize),
    /// `[...]T`
    Inferred,
}

impl Interpreter<'_> {
    /// Evaluate a composite literal. `expected` is the type supplied by an
    /// enclosing literal when `ty` is elided.
    pub(super) fn eval_composite(
        &mut self,
        ty: Option<ExprId>,
        elements: ElementRange,
        expected: Option<&Type>,
    ) -> Flow {
        let (ty, len) = match ty {
            Some(id) => self.literal_type(id)?,
            None => match expected {
                Some(ty) => (ty.clone(), ArrayLen::Unbounded),
                None => {
                    return Err(type_error("invalid composite literal type: missing type").into())
                }
            },
        };
        let elements = self.body.arena.elements(elements);

        match &ty {
            Type::Slice(elem) => self.slice_literal(elem, len, elements),
            Type::Map(key, value) => self.map_literal(key, value, elements),
            Type::Struct(st) => self.struct_literal(st, elements),
            Type::Pointer(inner) => match &**inner {
                Type::Struct(st) => match self.struct_literal(st, elements)? {
                    Value::Struct(s) => Ok(Value::reference_to(&s)),
                    other => Ok(other),
                },
                _ => Err(invalid_literal_type(&ty)),
            },
            _ => Err(invalid_literal_type(&ty)),
        }
    }

    /// The literal's type, reading an array length from `[N]T` directly.
    fn literal_type(&mut self, id: ExprId) -> Flow<(Type, ArrayLen)> {
        match self.expr(id).kind {
            ExprKind::ArrayType { len: None, elem } => {
                Ok((Type::slice(self.eval_type(elem)?), ArrayLen::Inferred))
            }
            ExprKind::ArrayType {
                len: Some(len),
                elem,
            } => {
                let n = self.array_len(len)?;
                let n =
                    check_elements(n as u64).map_err(|err| err.with_span(self.expr(len).span))?;
                Ok((Type::slice(self.eval_type(elem)?), ArrayLen::Fixed(n)))
            }
            _ => Ok((self.eval_type(id)?, ArrayLen::Unbounded)),
        }
    }

    /// A non-negative integer array length.
    pub(super) fn array_len(&mut self, id: ExprId) -> Flow<usize> {
        let value = self.eval(id)?;
        value
            .as_i64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                type_error(format!("array length {value} must be a non-negative integer")).into()
            })
    }

    /// Evaluate an element value against its slot type. Only constants
    /// convert to a different numeric type.
    fn element(&mut self, id: ExprId, ty: &Type) -> Flow {
        let value = match self.expr(id).kind {
            ExprKind::Composite { ty: None, elements } => {
                return self.eval_composite(None, elements, Some(ty))
            }
            _ => self.eval(id)?,
        };
        assign_value(value, ty, self.is_untyped(id))
            .map_err(|err| err.with_span(self.expr(id).span).into())
    }

    fn slice_literal(&mut self, elem: &Type, len: ArrayLen, elements: &[Element]) -> Flow {
        let mut slots: Vec<Option<Value>> = Vec::with_capacity(elements.len());
        let mut next = 0usize;
        for element in elements {
            if let Some(key) = element.key {
                next = self.array_len(key)?;
                check_elements(next as u64 + 1)
                    .map_err(|err| err.with_span(self.expr(key).span))?;
            }
            if let ArrayLen::Fixed(n) = len {
                if next >= n {
                    return Err(index_out_of_range(next as i64, n)
                        .with_span(self.expr(element.value).span)
                        .into());
                }
            }
            let value = self.element(element.value, elem)?;
            if slots.len() <= next {
                slots.resize(next + 1, None);
            }
            slots[next] = Some(value);
            next += 1;
        }
        if let ArrayLen::Fixed(n) = len {
            slots.resize(n, None);
        }
        let items = slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Value::zero(elem)))
            .collect();
        Ok(Value::slice(elem.clone(), items))
    }

    fn map_literal(&mut self, key_ty: &Type, value_ty: &Type, elements: &[Element]) -> Flow {
        let mut entries = FxHashMap::default();
        for element in elements {
            let Some(key) = element.key else {
                return Err(type_error("missing key in map literal")
                    .with_span(self.expr(element.value).span)
                    .into());
            };
            let key = MapKey::from_value(&self.element(key, key_ty)?)?;
            let value = self.element(element.value, value_ty)?;
            entries.insert(key, value);
        }
        Ok(Value::map(key_ty.clone(), value_ty.clone(), entries))
    }

    fn struct_literal(&mut self, st: &Arc<StructType>, elements: &[Element]) -> Flow {
        let layout = st.fields();
        let mut fields: Vec<Value> = layout.iter().map(|f| Value::zero(&f.ty)).collect();

        let keyed = elements.iter().filter(|e| e.key.is_some()).count();
        if keyed == 0 && !elements.is_empty() {
            if elements.len() != layout.len() {
                let which = if elements.len() < layout.len() { "few" } else { "many" };
                return Err(type_error(format!("too {which} values in struct literal")).into());
            }
            for (slot, (element, field)) in fields.iter_mut().zip(elements.iter().zip(layout)) {
                *slot = self.element(element.value, &field.ty)?;
            }
        } else if keyed == elements.len() {
            for element in elements {
                let Some(key) = element.key else { continue };
                let ExprKind::Ident(name) = self.expr(key).kind else {
                    return Err(type_error("invalid field name in struct literal")
                        .with_span(self.expr(key).span)
                        .into());
                };
                let name = self.text(name);
                let Some(index) = st.field_index(name) else {
                    return Err(no_such_member(name, Type::Struct(Arc::clone(st)))
                        .with_span(self.expr(key).span)
                        .into());
                };
                fields[index] = self.element(element.value, &layout[index].ty)?;
            }
        } else {
            return Err(
                type_error("mixture of field:value and value elements in struct literal").into(),
            );
        }
        Ok(Value::struct_value(Arc::clone(st), fields))
    }
}

fn invalid_literal_type(ty: &Type) -> super::ControlAction {
    type_error(format!("invalid composite literal type {ty}")).into()
}
