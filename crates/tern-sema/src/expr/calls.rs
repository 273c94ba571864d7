//! Calls and argument binding.
//!
//! Arguments bind positionally, then by name. A trailing variadic parameter
//! collects the remaining positional arguments, or takes a spread slice.
//! A single tuple-valued argument spreads over several parameters.

use tern_ast::{Arg, CallExpr};
use tern_core::{DiagnosticKey, ParamKind, Span, TypeKind};

use crate::checker::Checker;
use crate::model::ExprModel;
use crate::value::Value;

/// Parameter names and default markers, when the callee is a declaration.
struct ParamInfo {
    names: Vec<Option<String>>,
    defaults: Vec<bool>,
}

impl ParamInfo {
    fn anonymous(count: usize) -> Self {
        Self {
            names: vec![None; count],
            defaults: vec![false; count],
        }
    }

    fn display(&self, index: usize) -> String {
        self.names[index].clone().unwrap_or_else(|| index.to_string())
    }
}

impl<'r> Checker<'r> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn eval_call(&mut self, call: &CallExpr<'_>) -> Value {
        let callee = self.eval_single(call.callee, None);
        if callee.is_invalid() {
            for arg in call.args {
                self.eval_expr(&arg.value, None);
            }
            return Value::invalid();
        }
        let Some(TypeKind::Fn(func)) = callee.kind.clone() else {
            let shown = callee.kind.as_ref().map(ToString::to_string).unwrap_or_default();
            self.error(call.callee.span(), DiagnosticKey::NotCallable, vec![shown]);
            return Value::invalid();
        };
        if func.unsafety {
            self.require_unsafe(call.span);
        }

        let info = self.param_info(&callee.model, func.params.len());
        let Some(args) = self.bind_args(call, &func.params, &info) else {
            return Value::invalid();
        };
        let model = ExprModel::Call {
            callee: callee.model.boxed(),
            args,
        };
        match &func.result {
            Some(kind) => Value::new(kind.clone(), model),
            None => Value::void(model),
        }
    }

    fn param_info(&self, callee: &ExprModel, count: usize) -> ParamInfo {
        let hash = match callee {
            ExprModel::Fn(hash) | ExprModel::Method { method: hash, .. } => *hash,
            _ => return ParamInfo::anonymous(count),
        };
        match self.registry.get_fn(hash) {
            Some(def) if def.params.len() == count => ParamInfo {
                names: def.params.iter().map(|p| p.name.clone()).collect(),
                defaults: def.params.iter().map(|p| p.has_default).collect(),
            },
            _ => ParamInfo::anonymous(count),
        }
    }

    /// Bind the arguments of `call` to `params`. `None` when binding failed.
    fn bind_args(&mut self, call: &CallExpr<'_>, params: &[ParamKind], info: &ParamInfo) -> Option<Vec<ExprModel>> {
        let mut pre_evaluated = None;
        if let [only] = call.args {
            if only.name.is_none() && params.len() > 1 && !call.spread {
                let value = self.eval_expr(&only.value, None);
                if let Some(TypeKind::Tuple(parts)) = &value.kind {
                    return self.bind_tuple(only, &value, parts, params, info);
                }
                pre_evaluated = Some(self.require_single(value, only.span));
            }
        }

        let variadic = params.last().filter(|p| p.variadic).map(|_| params.len() - 1);
        let mut slots: Vec<Option<ExprModel>> = vec![None; params.len()];
        let mut variadic_elems = Vec::new();
        let mut named_seen = false;
        let mut position = 0;
        let mut ok = true;

        for (i, arg) in call.args.iter().enumerate() {
            let hint = arg_hint(arg, params, info, position);
            let value = match pre_evaluated.take() {
                Some(value) => value,
                None => self.eval_single(&arg.value, hint.as_ref()),
            };
            if value.is_invalid() {
                ok = false;
                if arg.name.is_none() && Some(position) != variadic {
                    position += 1;
                }
                continue;
            }

            if let Some(name) = arg.name {
                named_seen = true;
                let Some(index) = info.names.iter().position(|n| n.as_deref() == Some(name.name)) else {
                    self.error(name.span, DiagnosticKey::IdentNotExist, vec![name.name.to_string()]);
                    ok = false;
                    continue;
                };
                if slots[index].is_some() {
                    self.error(arg.span, DiagnosticKey::AlreadyHasExpr, vec![name.name.to_string()]);
                    ok = false;
                    continue;
                }
                ok &= self.bind_param(&params[index], &value, arg.span);
                slots[index] = Some(value.model);
                continue;
            }

            if named_seen {
                self.error(arg.span, DiagnosticKey::ArgumentMustTargetToParameter, vec![]);
                ok = false;
                continue;
            }
            if Some(position) == variadic {
                let param = &params[position];
                let spread_last = call.spread && i + 1 == call.args.len();
                if spread_last && variadic_elems.is_empty() {
                    let slice = ParamKind {
                        kind: TypeKind::slice_of(param.kind.clone()),
                        ..param.clone()
                    };
                    ok &= self.bind_param(&slice, &value, arg.span);
                    slots[position] = Some(value.model);
                } else if spread_last {
                    self.error(arg.span, DiagnosticKey::InvalidExpr, vec![]);
                    ok = false;
                } else {
                    ok &= self.bind_param(param, &value, arg.span);
                    variadic_elems.push(value.model);
                }
                continue;
            }
            if position >= params.len() {
                self.error(arg.span, DiagnosticKey::ArgumentOverflow, vec![params.len().to_string()]);
                ok = false;
                continue;
            }
            if call.spread && i + 1 == call.args.len() {
                self.error(arg.span, DiagnosticKey::InvalidExpr, vec![]);
                ok = false;
                continue;
            }
            ok &= self.bind_param(&params[position], &value, arg.span);
            slots[position] = Some(value.model);
            position += 1;
        }

        if let Some(index) = variadic {
            if slots[index].is_none() {
                slots[index] = Some(ExprModel::SliceLit {
                    elem: params[index].kind.clone(),
                    elems: variadic_elems,
                });
            }
        }

        let mut args = Vec::with_capacity(slots.len());
        for (index, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(model) => args.push(model),
                None if info.defaults[index] => args.push(ExprModel::DefaultArg(index)),
                None => {
                    self.error(call.span, DiagnosticKey::MissingExprFor, vec![info.display(index)]);
                    ok = false;
                }
            }
        }
        ok.then_some(args)
    }

    fn bind_tuple(
        &mut self,
        arg: &Arg<'_>,
        value: &Value,
        parts: &[TypeKind],
        params: &[ParamKind],
        info: &ParamInfo,
    ) -> Option<Vec<ExprModel>> {
        if parts.len() < params.len() {
            self.error(arg.span, DiagnosticKey::MissingExprFor, vec![info.display(parts.len())]);
            return None;
        }
        if parts.len() > params.len() {
            self.error(arg.span, DiagnosticKey::ArgumentOverflow, vec![params.len().to_string()]);
            return None;
        }
        let mut ok = true;
        for (param, part) in params.iter().zip(parts) {
            let part_value = Value::new(part.clone(), value.model.clone());
            ok &= self.bind_param(param, &part_value, arg.span);
        }
        ok.then(|| vec![value.model.clone()])
    }

    fn bind_param(&mut self, param: &ParamKind, value: &Value, span: Span) -> bool {
        if param.reference && !value.lvalue {
            self.error(span, DiagnosticKey::AssignRequireLvalue, vec![]);
            return false;
        }
        self.bind_value(&param.kind, param.mutable, value, span)
    }
}

/// Expected kind of `arg`, used to steer literal inference.
fn arg_hint(arg: &Arg<'_>, params: &[ParamKind], info: &ParamInfo, position: usize) -> Option<TypeKind> {
    let index = match arg.name {
        Some(name) => info.names.iter().position(|n| n.as_deref() == Some(name.name))?,
        None => position,
    };
    params.get(index).map(|p| p.kind.clone())
}

#[cfg(test)]
mod tests {
    use bumpalo::Bump;
    use tern_ast::AstBuilder;
    use tern_core::{FnKind, PrimKind, TypeHash};
    use tern_registry::{FnDef, ParamDef, SymbolRegistry};

    use super::*;
    use crate::expr::tests::{declare, with_checker};
    use crate::scope::ScopeFlags;

    fn registry() -> SymbolRegistry {
        let mut registry = SymbolRegistry::new();

        let mut add = FnDef::new(TypeHash::from_function(&[], "add"), "add", Span::default());
        add.params = vec![ParamDef::new("a", TypeKind::int()), ParamDef::new("b", TypeKind::int())];
        add.result = Some(TypeKind::int());
        registry.register_fn(add).unwrap();

        let mut pair = FnDef::new(TypeHash::from_function(&[], "pair"), "pair", Span::default());
        pair.result = Some(TypeKind::Tuple(vec![TypeKind::int(), TypeKind::int()]));
        registry.register_fn(pair).unwrap();

        let mut sum = FnDef::new(TypeHash::from_function(&[], "sum"), "sum", Span::default());
        sum.params = vec![ParamDef {
            variadic: true,
            ..ParamDef::new("xs", TypeKind::int())
        }];
        sum.result = Some(TypeKind::int());
        registry.register_fn(sum).unwrap();

        let mut open = FnDef::new(TypeHash::from_function(&[], "open"), "open", Span::default());
        open.params = vec![
            ParamDef::new("path", PrimKind::Str.into()),
            ParamDef {
                has_default: true,
                ..ParamDef::new("mode", PrimKind::U32.into())
            },
        ];
        registry.register_fn(open).unwrap();

        let mut raw = FnDef::new(TypeHash::from_function(&[], "raw"), "raw", Span::default());
        raw.unsafety = true;
        registry.register_fn(raw).unwrap();
        registry
    }

    #[test]
    fn positional_arguments_bind() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let expr = b.call(b.ident("add"), &[b.int("1"), b.int("2")]);
        let (value, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&expr, None));
        assert!(diagnostics.is_empty());
        assert_eq!(value.kind, Some(TypeKind::int()));
        let ExprModel::Call { args, .. } = value.model else { panic!("expected a call") };
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn argument_count_is_checked() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let few = b.call(b.ident("add"), &[b.int("1")]);
        let many = b.call(b.ident("add"), &[b.int("1"), b.int("2"), b.int("3")]);
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            c.eval_expr(&few, None);
            c.eval_expr(&many, None);
        });
        assert!(diagnostics.contains(DiagnosticKey::MissingExprFor));
        assert_eq!(diagnostics.by_key(DiagnosticKey::MissingExprFor).next().unwrap().args, vec!["b"]);
        assert!(diagnostics.contains(DiagnosticKey::ArgumentOverflow));
    }

    #[test]
    fn tuple_result_spreads_over_parameters() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let expr = b.call(b.ident("add"), &[b.call(b.ident("pair"), &[])]);
        let (value, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&expr, None));
        assert!(diagnostics.is_empty());
        assert_eq!(value.kind, Some(TypeKind::int()));
    }

    #[test]
    fn named_arguments_follow_positionals() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let good = b.call_with(b.ident("add"), &[b.arg(b.int("1")), b.named_arg("b", b.int("2"))], false);
        let twice = b.call_with(b.ident("add"), &[b.named_arg("a", b.int("1")), b.named_arg("a", b.int("2"))], false);
        let after = b.call_with(b.ident("add"), &[b.named_arg("b", b.int("1")), b.arg(b.int("2"))], false);
        let unknown = b.call_with(b.ident("add"), &[b.arg(b.int("1")), b.named_arg("c", b.int("2"))], false);

        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&good, None));
        assert!(diagnostics.is_empty());
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            c.eval_expr(&twice, None);
            c.eval_expr(&after, None);
            c.eval_expr(&unknown, None);
        });
        assert!(diagnostics.contains(DiagnosticKey::AlreadyHasExpr));
        assert!(diagnostics.contains(DiagnosticKey::ArgumentMustTargetToParameter));
        assert!(diagnostics.contains(DiagnosticKey::IdentNotExist));
    }

    #[test]
    fn variadic_collects_and_spreads() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let collected = b.call(b.ident("sum"), &[b.int("1"), b.int("2"), b.int("3")]);
        let empty = b.call(b.ident("sum"), &[]);
        let spread = b.call_with(b.ident("sum"), &[b.arg(b.ident("xs"))], true);
        let (values, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            declare(c, "xs", TypeKind::slice_of(TypeKind::int()), false);
            (
                c.eval_expr(&collected, None),
                c.eval_expr(&empty, None),
                c.eval_expr(&spread, None),
            )
        });
        assert!(diagnostics.is_empty());
        let ExprModel::Call { args, .. } = values.0.model else { panic!("expected a call") };
        assert!(matches!(&args[0], ExprModel::SliceLit { elems, .. } if elems.len() == 3));
        let ExprModel::Call { args, .. } = values.1.model else { panic!("expected a call") };
        assert!(matches!(&args[0], ExprModel::SliceLit { elems, .. } if elems.is_empty()));
        assert!(!values.2.is_invalid());
    }

    #[test]
    fn defaulted_parameter_may_be_omitted() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let expr = b.call(b.ident("open"), &[b.string("a.txt")]);
        let (value, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&expr, None));
        assert!(diagnostics.is_empty());
        assert!(value.is_void());
        let ExprModel::Call { args, .. } = value.model else { panic!("expected a call") };
        assert_eq!(args[1], ExprModel::DefaultArg(1));
    }

    #[test]
    fn unsafe_function_and_non_callable() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = registry();
        let raw = b.call(b.ident("raw"), &[]);
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| c.eval_expr(&raw, None));
        assert!(diagnostics.contains(DiagnosticKey::UnsafeBehaviorAtOutOfUnsafeScope));
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::UNSAFE, |c| c.eval_expr(&raw, None));
        assert!(diagnostics.is_empty());

        let number = b.call(b.ident("n"), &[]);
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            declare(c, "n", TypeKind::int(), false);
            c.eval_expr(&number, None)
        });
        assert!(diagnostics.contains(DiagnosticKey::NotCallable));
    }

    #[test]
    fn function_values_bind_without_names() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let registry = SymbolRegistry::new();
        let callback = TypeKind::Fn(Box::new(FnKind {
            params: vec![ParamKind {
                kind: PrimKind::Bool.into(),
                mutable: false,
                variadic: false,
                reference: false,
            }],
            result: None,
            unsafety: false,
        }));
        let expr = b.call(b.ident("f"), &[b.int("1")]);
        let (_, diagnostics) = with_checker(&registry, ScopeFlags::empty(), |c| {
            declare(c, "f", callback, false);
            c.eval_expr(&expr, None)
        });
        assert!(diagnostics.contains(DiagnosticKey::IncompatibleTypes));
    }
}
