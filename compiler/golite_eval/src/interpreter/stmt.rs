//! Statement execution.

use golite_ir::{ExprId, ExprKind, RangeClause, StmtId, StmtKind, StmtRange, ValueSpec};
use golite_stack::ensure_sufficient_stack;
use golite_value::{
    assignment_count, check_elements, non_boolean_condition, rune_indices, type_error,
    unsupported_import, unsupported_range, Type, Value,
};
use std::sync::Arc;

use super::expr::assign_value;
use super::{ControlAction, Flow, Interpreter};

/// What a loop does after one run of its body.
enum LoopStep {
    Next,
    Exit,
}

impl Interpreter<'_> {
    /// Execute a statement with stack safety and budget accounting.
    pub(super) fn exec(&mut self, id: StmtId) -> Flow {
        ensure_sufficient_stack(|| self.exec_inner(id))
    }

    fn exec_inner(&mut self, id: StmtId) -> Flow {
        self.mode.check_budget()?;
        let stmt = self.stmt(id);
        self.exec_kind(&stmt.kind)
            .map_err(|action| action.with_span_if_error(stmt.span))
    }

    /// Statements in order; the value of the last one.
    pub(super) fn exec_list(&mut self, list: StmtRange) -> Flow {
        let mut last = Value::Nil;
        for &id in self.body.arena.stmt_list(list) {
            last = self.exec(id)?;
        }
        Ok(last)
    }

    fn exec_kind(&mut self, kind: &StmtKind) -> Flow {
        match *kind {
            StmtKind::Empty => Ok(Value::Nil),
            StmtKind::Expr(expr) => self.eval(expr),
            StmtKind::Assign {
                targets,
                op,
                values,
            } => self.exec_assign(targets, op, values).map(|()| Value::Nil),
            StmtKind::IncDec { target, increment } => {
                self.exec_inc_dec(target, increment).map(|()| Value::Nil)
            }
            StmtKind::Block(list) | StmtKind::Group(list) => self.exec_list(list),
            StmtKind::If {
                init,
                cond,
                then_branch,
                else_branch,
            } => self.with_scope(|scoped| {
                if let Some(init) = init {
                    scoped.exec(init)?;
                }
                if scoped.condition(cond)? {
                    scoped.exec(then_branch)
                } else if let Some(else_branch) = else_branch {
                    scoped.exec(else_branch)
                } else {
                    Ok(Value::Nil)
                }
            }),
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => self.exec_for(init, cond, post, body),
            StmtKind::Range(clause) => self.exec_range(&clause),
            StmtKind::Return(values) => {
                let ids = self.body.arena.expr_list(values);
                let mut results = Vec::with_capacity(ids.len());
                for &id in ids {
                    results.push(self.eval(id)?);
                }
                let value = match results.len() {
                    0 => Value::Nil,
                    1 => results.pop().unwrap_or(Value::Nil),
                    _ => Value::tuple(results),
                };
                Err(ControlAction::Return(value))
            }
            StmtKind::Break => Err(ControlAction::Break),
            StmtKind::Continue => Err(ControlAction::Continue),
            StmtKind::Var(spec) => self.exec_var(&spec).map(|()| Value::Nil),
            StmtKind::TypeDecl { name, ty, alias } => {
                let declared = match self.eval_type(ty)? {
                    Type::Struct(st) if !alias => {
                        Type::Struct(Arc::new(st.renamed(self.text(name))))
                    }
                    other => other,
                };
                self.define_name(name, Value::Type(declared));
                Ok(Value::Nil)
            }
            StmtKind::Import(path) => {
                let path = self.text(path).trim_matches(|c| c == '"' || c == '`');
                Err(unsupported_import(path).into())
            }
        }
    }

    fn condition(&mut self, cond: ExprId) -> Flow<bool> {
        let value = self.eval(cond)?;
        value.as_bool().ok_or_else(|| {
            non_boolean_condition(value.type_of())
                .with_span(self.expr(cond).span)
                .into()
        })
    }

    /// Run a loop body, consuming `break` and `continue`.
    fn loop_body(&mut self, body: StmtId) -> Flow<LoopStep> {
        match self.exec(body) {
            Ok(_) | Err(ControlAction::Continue) => Ok(LoopStep::Next),
            Err(ControlAction::Break) => Ok(LoopStep::Exit),
            Err(other) => Err(other),
        }
    }

    fn exec_for(
        &mut self,
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: StmtId,
    ) -> Flow {
        self.with_scope(|scoped| {
            if let Some(init) = init {
                scoped.exec(init)?;
            }
            let mut iterations = 0u64;
            loop {
                if let Some(cond) = cond {
                    if !scoped.condition(cond)? {
                        break;
                    }
                }
                iterations += 1;
                if let LoopStep::Exit = scoped.loop_body(body)? {
                    break;
                }
                if let Some(post) = post {
                    scoped.exec(post)?;
                }
            }
            tracing::trace!(iterations, "for loop finished");
            Ok(Value::Nil)
        })
    }

    fn exec_range(&mut self, clause: &RangeClause) -> Flow {
        self.with_scope(|scoped| {
            let iterable = scoped.eval(clause.iterable)?;
            let single = |iterable: &Value| -> Flow<()> {
                if clause.value.is_some() {
                    return Err(type_error(format!(
                        "range over {iterable} permits only one iteration variable"
                    ))
                    .into());
                }
                Ok(())
            };
            let pairs: Box<dyn Iterator<Item = (Value, Value)>> = match &iterable {
                Value::Slice(s) => Box::new(
                    s.to_vec()
                        .into_iter()
                        .enumerate()
                        .map(|(i, v)| (Value::int(i as i64), v)),
                ),
                Value::Map(m) => Box::new(
                    m.sorted_entries()
                        .into_iter()
                        .map(|(k, v)| (k.to_value(), v)),
                ),
                Value::Str(s) => Box::new(
                    rune_indices(s)
                        .into_iter()
                        .map(|(i, c)| (Value::int(i as i64), Value::rune(c))),
                ),
                Value::Int(n, k) => {
                    single(&iterable)?;
                    let kind = *k;
                    Box::new((0..*n).map(move |i| (Value::Int(i, kind), Value::Nil)))
                }
                Value::Uint(n, k) => {
                    single(&iterable)?;
                    let kind = *k;
                    Box::new((0..*n).map(move |i| (Value::Uint(i, kind), Value::Nil)))
                }
                other => return Err(unsupported_range(other.kind_name()).into()),
            };

            let mut iterations = 0u64;
            for (key, value) in pairs {
                if let Some(target) = clause.key {
                    scoped.bind_range_var(target, key, clause.define)?;
                }
                if let Some(target) = clause.value {
                    scoped.bind_range_var(target, value, clause.define)?;
                }
                iterations += 1;
                if let LoopStep::Exit = scoped.loop_body(clause.body)? {
                    break;
                }
            }
            tracing::trace!(iterations, "range loop finished");
            Ok(Value::Nil)
        })
    }

    fn bind_range_var(&mut self, target: ExprId, value: Value, define: bool) -> Flow<()> {
        if define {
            self.define_target(target, value)
        } else {
            self.store(target, value, false)
        }
    }

    /// `var`/`const`: initializers, converted to the declared type when
    /// there is one; names without an initializer get the zero value.
    fn exec_var(&mut self, spec: &ValueSpec) -> Flow<()> {
        let names = self.body.arena.names(spec.names);
        let values = self.body.arena.expr_list(spec.values);
        let declared = match spec.ty {
            Some(ty) => Some(self.declared_type(ty)?),
            None => None,
        };

        if values.is_empty() {
            let Some((ty, len)) = &declared else {
                return Err(type_error("missing type or initializer in declaration").into());
            };
            for &name in names {
                let zero = zero_of(ty, *len)?;
                self.define_name(name, zero);
            }
            return Ok(());
        }

        let initialized = match &declared {
            Some((ty, _)) if values.len() < names.len() => {
                self.eval_leading(values, names.len(), ty)?
            }
            _ => self.eval_values(values, names.len())?,
        };

        for (i, &name) in names.iter().enumerate() {
            let value = match (initialized.get(i), &declared) {
                (Some((value, untyped)), Some((ty, _))) => {
                    assign_value(value.clone(), ty, *untyped)?
                }
                (Some((value, _)), None) => value.clone(),
                (None, Some((ty, len))) => zero_of(ty, *len)?,
                (None, None) => return Err(assignment_count(names.len(), values.len()).into()),
            };
            self.define_name(name, value);
        }
        Ok(())
    }

    /// Initializers for a typed `var` with fewer values than names. A lone
    /// tuple or slice of exactly `want` items is spread; anything else
    /// initializes the leading names and the rest stay zero.
    fn eval_leading(
        &mut self,
        values: &[ExprId],
        want: usize,
        declared: &Type,
    ) -> Flow<Vec<(Value, bool)>> {
        let [single] = values else {
            let mut out = Vec::with_capacity(values.len());
            for &id in values {
                out.push((self.eval(id)?, self.is_untyped(id)));
            }
            return Ok(out);
        };
        let value = self.eval(*single)?;
        let items = match &value {
            Value::Tuple(items) if items.len() == want => Some(items.to_vec()),
            Value::Slice(s) if s.len() == want && value.type_of() != *declared => Some(s.to_vec()),
            _ => None,
        };
        Ok(match items {
            Some(items) => items.into_iter().map(|v| (v, false)).collect(),
            None => vec![(value, self.is_untyped(*single))],
        })
    }

    /// A declared type plus the length of a `[N]T` array type.
    fn declared_type(&mut self, ty: ExprId) -> Flow<(Type, Option<usize>)> {
        match self.expr(ty).kind {
            ExprKind::ArrayType {
                len: Some(len),
                elem,
            } => {
                let n = check_elements(self.array_len(len)? as u64)?;
                Ok((Type::slice(self.eval_type(elem)?), Some(n)))
            }
            _ => Ok((self.eval_type(ty)?, None)),
        }
    }
}

/// Zero value of a declared type; a `[N]T` array holds `N` zero elements.
fn zero_of(ty: &Type, len: Option<usize>) -> Flow {
    match (ty, len) {
        (Type::Slice(elem), Some(n)) => Ok(Value::zero_slice((**elem).clone(), n)?),
        _ => Ok(Value::zero(ty)),
    }
}
