//! Value, type and boolean matches.

use rustc_hash::FxHashSet;
use tern_ast::{Case, CasePattern, MatchStmt};
use tern_core::{BinaryOp, DiagnosticKey, Span, TypeKind};

use crate::checker::Checker;
use crate::scope::{CaseInfo, Construct, ConstructId, ConstructKind, ScopeFlags, ScopeId};
use crate::typed::{TypedCase, TypedPattern, TypedStmt};
use crate::value::Value;

impl<'r> Checker<'r> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(super) fn check_match(&mut self, stmt: &MatchStmt<'_>) -> TypedStmt {
        let construct = self.tree.constructs.alloc(Construct {
            kind: ConstructKind::Match,
            scope: self.current,
            index: self.next_index(),
            broken: false,
            span: stmt.span,
        });

        let subject = stmt.expr.map(|expr| {
            let value = self.eval_single(&expr, None);
            if stmt.type_match {
                self.check_type_subject(&value, expr.span());
            }
            value
        });

        let mut matched = FxHashSet::default();
        let mut cases = Vec::with_capacity(stmt.cases.len());
        for (i, case) in stmt.cases.iter().enumerate() {
            let mut patterns = Vec::with_capacity(case.patterns.len());
            for pattern in case.patterns {
                let typed = if stmt.type_match {
                    self.check_type_pattern(subject.as_ref(), pattern, &mut matched)
                } else {
                    self.check_value_pattern(subject.as_ref(), pattern)
                };
                patterns.extend(typed);
            }
            let has_next = i + 1 < stmt.cases.len() || stmt.default.is_some();
            let scope = self.check_case(case, construct, has_next);
            cases.push(TypedCase { patterns, scope });
        }
        let default = stmt
            .default
            .as_ref()
            .map(|case| self.check_case(case, construct, false));

        TypedStmt::Match {
            construct,
            type_match: stmt.type_match,
            expr: subject.map(Value::into_typed),
            cases,
            default,
        }
    }

    fn check_case(&mut self, case: &Case<'_>, construct: ConstructId, has_next: bool) -> ScopeId {
        let scope = self.enter_scope(ScopeFlags::empty(), case.span);
        let node = self.tree.node_mut(scope);
        node.construct = Some(construct);
        node.case = Some(CaseInfo {
            stmt_count: case.stmts.len(),
            has_next,
        });
        self.walk_stmts(case.stmts);
        self.leave_scope();
        scope
    }

    /// Type matches inspect the dynamic type of `any` and trait values.
    fn check_type_subject(&mut self, subject: &Value, span: Span) {
        let Some(kind) = subject.kind.as_ref() else {
            return;
        };
        if !kind.is_any() && !matches!(kind, TypeKind::Trait(_)) {
            self.error(span, DiagnosticKey::TypeCaseHasNotValidExpr, vec![kind.to_string()]);
        }
    }

    fn check_type_pattern(
        &mut self,
        subject: Option<&Value>,
        pattern: &CasePattern<'_>,
        matched: &mut FxHashSet<TypeKind>,
    ) -> Option<TypedPattern> {
        let CasePattern::Type(ty) = pattern else {
            self.error(pattern.span(), DiagnosticKey::InvalidExpr, vec![]);
            return None;
        };
        let kind = self.resolve_type(ty)?;
        if !matched.insert(kind.clone()) {
            self.error(pattern.span(), DiagnosticKey::DuplicatedMatchType, vec![kind.to_string()]);
        }
        if let Some(trait_kind @ TypeKind::Trait(_)) = subject.and_then(|s| s.kind.as_ref()) {
            let before = self.diagnostics.len();
            if !self.compatible(trait_kind, &kind, false, false, pattern.span()) && self.diagnostics.len() == before {
                self.incompatible(pattern.span(), trait_kind, &kind);
            }
        }
        Some(TypedPattern::Type(kind))
    }

    fn check_value_pattern(&mut self, subject: Option<&Value>, pattern: &CasePattern<'_>) -> Option<TypedPattern> {
        let CasePattern::Expr(expr) = pattern else {
            self.error(pattern.span(), DiagnosticKey::InvalidExpr, vec![]);
            return None;
        };
        let value = match subject {
            Some(subject) => {
                let value = self.eval_single(expr, subject.kind.as_ref());
                if !subject.is_invalid() && !value.is_invalid() {
                    self.solve_binary(subject.clone(), BinaryOp::Eq, value.clone(), expr.span());
                }
                value
            }
            None => self.eval_condition(expr, DiagnosticKey::IfRequireBoolExpr),
        };
        Some(TypedPattern::Expr(value.into_typed()))
    }
}
