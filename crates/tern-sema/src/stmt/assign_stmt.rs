//! Assignments: plain, multi-value, declaring, compound and postfix.
//!
//! Existing-storage targets are evaluated before the values. A multi-value
//! assignment either pairs each target with one value or spreads a single
//! tuple-producing value across all targets.

use tern_ast::{AssignLhs, AssignStmt, Expr, Ident};
use tern_core::{AssignOp, BinaryOp, DiagnosticKey, PrimKind, Span, TypeKind};

use crate::checker::Checker;
use crate::scope::Local;
use crate::typed::{AssignTarget, TypedExpr, TypedStmt};
use crate::value::Value;

impl<'r> Checker<'r> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(super) fn check_assign(&mut self, stmt: &AssignStmt<'_>) -> TypedStmt {
        match stmt.op {
            AssignOp::Inc | AssignOp::Dec => self.check_postfix(stmt),
            AssignOp::Compound(op) => self.check_compound(stmt, op),
            AssignOp::Assign => self.check_plain_assign(stmt),
        }
    }

    fn check_postfix(&mut self, stmt: &AssignStmt<'_>) -> TypedStmt {
        let [AssignLhs::Expr(target)] = stmt.lhs else {
            self.error(stmt.span, DiagnosticKey::InvalidExpr, vec![]);
            return assign_stmt(stmt, Vec::new(), Vec::new());
        };
        let value = self.eval_single(target, None);
        if self.check_assignable(&value, target.span()) {
            if let Some(kind) = value.kind.as_ref().filter(|k| !k.is_numeric()) {
                self.error(
                    stmt.span,
                    DiagnosticKey::OperatorNotForType,
                    vec![stmt.op.to_string(), kind.to_string()],
                );
            }
        }
        assign_stmt(stmt, vec![AssignTarget::Expr(value.into_typed())], Vec::new())
    }

    fn check_compound(&mut self, stmt: &AssignStmt<'_>, op: BinaryOp) -> TypedStmt {
        let ([AssignLhs::Expr(target)], [rhs]) = (stmt.lhs, stmt.rhs) else {
            self.error(stmt.span, DiagnosticKey::InvalidExpr, vec![]);
            return assign_stmt(stmt, Vec::new(), Vec::new());
        };
        let left = self.eval_single(target, None);
        let right = self.eval_single(rhs, left.kind.as_ref());
        if self.check_assignable(&left, target.span()) && !right.is_invalid() {
            let result = self.solve_binary(left.clone(), op, right.clone(), stmt.span);
            if let (false, Some(dest)) = (result.is_invalid(), left.kind.as_ref()) {
                self.check_value_against(dest, &result, stmt.span);
            }
        }
        assign_stmt(
            stmt,
            vec![AssignTarget::Expr(left.into_typed())],
            vec![right.into_typed()],
        )
    }

    fn check_plain_assign(&mut self, stmt: &AssignStmt<'_>) -> TypedStmt {
        let mut storage: Vec<Option<Value>> = stmt
            .lhs
            .iter()
            .map(|lhs| match lhs {
                AssignLhs::Expr(expr) => Some(self.eval_single(expr, None)),
                _ => None,
            })
            .collect();

        let spread = stmt.lhs.len() > 1 && stmt.rhs.len() == 1;
        let values: Vec<Value> = if spread {
            vec![self.eval_expr(&stmt.rhs[0], None)]
        } else {
            stmt.rhs
                .iter()
                .enumerate()
                .map(|(i, expr)| {
                    let hint = storage.get(i).and_then(|s| s.as_ref()).and_then(|v| v.kind.clone());
                    self.eval_single(expr, hint.as_ref())
                })
                .collect()
        };
        let slots = self.assignment_slots(stmt, &values, spread);

        let mut targets = Vec::with_capacity(stmt.lhs.len());
        for (i, lhs) in stmt.lhs.iter().enumerate() {
            let slot = slots.as_ref().and_then(|s| s.get(i));
            let target = match lhs {
                AssignLhs::Blank(_) => AssignTarget::Blank,
                AssignLhs::Decl { name, mutable } => self.bind_decl(name, *mutable, slot),
                AssignLhs::Expr(expr) => {
                    let value = storage[i].take().unwrap_or_else(Value::invalid);
                    self.bind_storage(expr, &value, slot);
                    AssignTarget::Expr(value.into_typed())
                }
            };
            targets.push(target);
        }

        let values = values.into_iter().map(Value::into_typed).collect();
        assign_stmt(stmt, targets, values)
    }

    /// One value per target, or `None` when the counts disagree.
    fn assignment_slots(&mut self, stmt: &AssignStmt<'_>, values: &[Value], spread: bool) -> Option<Vec<Value>> {
        let idents = stmt.lhs.len();
        if spread {
            let value = &values[0];
            if value.is_invalid() {
                return None;
            }
            let span = stmt.rhs[0].span();
            return match &value.kind {
                Some(TypeKind::Tuple(parts)) if parts.len() == idents => Some(
                    parts
                        .iter()
                        .map(|part| Value::new(part.clone(), value.model.clone()))
                        .collect(),
                ),
                Some(TypeKind::Tuple(parts)) => {
                    self.count_mismatch(span, parts.len(), idents);
                    None
                }
                Some(_) => {
                    self.count_mismatch(span, 1, idents);
                    None
                }
                None => {
                    self.error(span, DiagnosticKey::VoidInValueContext, vec![]);
                    None
                }
            };
        }
        if values.len() != idents {
            self.count_mismatch(stmt.span, values.len(), idents);
            return None;
        }
        Some(values.to_vec())
    }

    fn count_mismatch(&mut self, span: Span, values: usize, idents: usize) {
        let key = if values > idents {
            DiagnosticKey::MissingMultiAssignIdents
        } else {
            DiagnosticKey::OverflowMultiAssignIdents
        };
        self.error(span, key, vec![values.to_string(), idents.to_string()]);
    }

    fn bind_storage(&mut self, expr: &Expr<'_>, target: &Value, slot: Option<&Value>) {
        if !self.check_assignable(target, expr.span()) {
            return;
        }
        if let (Some(kind), Some(value)) = (target.kind.as_ref(), slot) {
            self.bind_value(kind, true, value, expr.span());
        }
    }

    /// Declare the new binding `name` from `slot`. A binding whose value
    /// failed is declared as an exempt `any` local.
    fn bind_decl(&mut self, name: &Ident<'_>, mutable: bool, slot: Option<&Value>) -> AssignTarget {
        if name.is_blank() {
            return AssignTarget::Blank;
        }
        let scope = self.current;
        if self.tree.declared_here(scope, name.name) {
            self.error(name.span, DiagnosticKey::DuplicatedIdent, vec![name.name.to_string()]);
            return AssignTarget::Blank;
        }

        let kind = match slot.filter(|v| !v.is_invalid()) {
            Some(value) => match self.defaulted_kind(value) {
                Some(TypeKind::Nil) | None => {
                    self.error(name.span, DiagnosticKey::InvalidExpr, vec![]);
                    None
                }
                Some(kind) => {
                    self.bind_value(&kind, mutable, value, name.span);
                    Some(kind)
                }
            },
            None => None,
        };
        let failed = kind.is_none();
        let local = self.tree.declare_local(
            scope,
            Local {
                name: name.name.to_string(),
                kind: kind.unwrap_or(TypeKind::Prim(PrimKind::Any)),
                mutable,
                constant: None,
                used: failed,
                reportable: !failed,
                scope,
                span: name.span,
            },
        );
        AssignTarget::Decl(local)
    }
}

fn assign_stmt(
    stmt: &AssignStmt<'_>,
    targets: Vec<AssignTarget>,
    values: Vec<TypedExpr>,
) -> TypedStmt {
    TypedStmt::Assign {
        op: stmt.op,
        targets,
        values,
        span: stmt.span,
    }
}
