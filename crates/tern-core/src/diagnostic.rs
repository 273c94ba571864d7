//! Diagnostics accumulated during analysis.
//!
//! Every user-facing problem is a [`Diagnostic`]: a severity, the span it
//! points at, a [`DiagnosticKey`] naming the message template, and the
//! positional arguments the template is filled with. Analysis never stops at
//! the first problem; diagnostics are pushed into a shared [`Diagnostics`]
//! list and the caller decides what to do once the unit has been walked.

use std::fmt;

use thiserror::Error;

use crate::{SourceFiles, Span};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

macro_rules! diagnostic_keys {
    ($($variant:ident => $key:literal, $template:literal;)*) => {
        /// Message keys. `as_str` yields the stable snake_case key.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum DiagnosticKey {
            $($variant,)*
        }

        impl DiagnosticKey {
            pub const ALL: &'static [DiagnosticKey] = &[$(DiagnosticKey::$variant,)*];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $(DiagnosticKey::$variant => $key,)*
                }
            }

            /// Message template; `{N}` is replaced by the N-th argument.
            pub const fn template(self) -> &'static str {
                match self {
                    $(DiagnosticKey::$variant => $template,)*
                }
            }
        }
    };
}

diagnostic_keys! {
    // type errors
    IncompatibleTypes => "incompatible_types", "incompatible types: {0} and {1}";
    OverflowLimits => "overflow_limits", "constant {0} overflows the limits of {1}";
    OperatorNotForType => "operator_not_for_type", "operator {0} is not defined for type {1}";
    DivideByZero => "divide_by_zero", "division by zero";
    BitshiftMustUnsigned => "bitshift_must_unsigned", "bit shift amount must be unsigned";
    TraitHasReferenceParameteredFunction => "trait_has_reference_parametered_function",
        "trait {0} has reference receivers, {1} must be a reference to implement it";
    TypeNotSupportsCastingTo => "type_not_supports_casting_to", "type {0} cannot be cast to {1}";
    InvalidIndexType => "invalid_index_type", "index must be an integer, found {0}";
    TypeNotSupportsIndexing => "type_not_supports_indexing", "type {0} does not support indexing";
    TypeNotSupportsSlicing => "type_not_supports_slicing", "type {0} does not support slicing";
    ObjHaveNotIdent => "obj_have_not_ident", "{0} has no member named {1}";
    NotCallable => "not_callable", "{0} is not callable";
    InvalidExpr => "invalid_expr", "invalid expression";
    ExprNotConst => "expr_not_const", "expression is not constant";
    TupleInSingleValueContext => "tuple_in_single_value_context", "multiple values of {0} used in single-value context";
    VoidInValueContext => "void_in_value_context", "expression produces no value";
    IfRequireBoolExpr => "if_require_bool_expr", "condition must be bool, found {0}";
    IterWhileRequireBoolExpr => "iter_while_require_bool_expr", "iteration condition must be bool, found {0}";
    IterRangeRequireEnumerableExpr => "iter_range_require_enumerable_expr", "cannot range over {0}";
    UnsafeBehaviorAtOutOfUnsafeScope => "unsafe_behavior_at_out_of_unsafe_scope", "unsafe behavior outside of an unsafe scope";
    // binding errors
    AssignRequireLvalue => "assign_require_lvalue", "left side of assignment is not assignable";
    AssignConst => "assign_const", "cannot assign to a constant";
    AssignToNonMut => "assign_to_non_mut", "cannot assign to immutable {0}";
    AssignmentNonMutToMut => "assignment_non_mut_to_mut", "immutable {0} value cannot be assigned to a mutable binding";
    MissingMultiAssignIdents => "missing_multi_assign_idents", "assignment expects {0} identifiers, found {1}";
    OverflowMultiAssignIdents => "overflow_multi_assign_idents", "assignment has {1} identifiers for {0} values";
    MissingExprFor => "missing_expr_for", "missing argument for parameter {0}";
    ArgumentOverflow => "argument_overflow", "too many arguments, expected {0}";
    ArgumentMustTargetToParameter => "argument_must_target_to_parameter", "positional argument after a named argument";
    AlreadyHasExpr => "already_has_expr", "parameter {0} already has an argument";
    RequireReturnExpr => "require_return_expr", "return requires a value of type {0}";
    VoidFunctionReturnValue => "void_function_return_value", "function does not return a value";
    MissingMultiReturn => "missing_multi_return", "return expects {0} values, found {1}";
    OverflowReturn => "overflow_return", "too many return values, expected {0}";
    // control flow errors
    BreakAtOutOfValidScope => "break_at_out_of_valid_scope", "break outside of an iteration or match";
    ContinueAtOutOfValidScope => "continue_at_out_of_valid_scope", "continue outside of an iteration";
    FallthroughIntoFinalCase => "fallthrough_into_final_case", "cannot fall through from the final case";
    FallthroughWrongUse => "fallthrough_wrong_use", "fallthrough must be the last statement of a case";
    GotoJumpsDeclarations => "goto_jumps_declarations", "goto {0} jumps over a variable declaration";
    LabelNotExist => "label_not_exist", "label {0} does not exist";
    LabelExist => "label_exist", "label {0} is already declared";
    InvalidLabel => "invalid_label", "label {0} does not mark an iteration or match";
    RetInDeferred => "ret_in_deferred", "return inside a deferred scope";
    MissingRet => "missing_ret", "missing return at end of function {0}";
    DuplicatedMatchType => "duplicated_match_type", "type {0} is already matched";
    TypeCaseHasNotValidExpr => "type_case_has_not_valid_expr", "type match requires an any or trait value, found {0}";
    // declaration errors
    DuplicatedIdent => "duplicated_ident", "{0} is already declared in this scope";
    IdentNotExist => "ident_not_exist", "{0} is not declared";
    DeclaredButNotUsed => "declared_but_not_used", "{0} is declared but not used";
    GenericsCountMismatch => "generics_count_mismatch", "{0} expects {1} generic arguments";
    InvalidTypeForEnum => "invalid_type_for_enum", "enum {0} must have an integer underlying type, found {1}";
    ArrayLenNotConstant => "array_len_not_constant", "array length must be a non-negative integer constant";
    IllegalCycleRefersItself => "illegal_cycle_refers_itself", "struct {0} refers to itself by value";
    NotImplTraitDef => "not_impl_trait_def", "{0} does not implement method {1} of trait {2}";
    // fatal structural errors
    MissingFunctionBody => "missing_function_body", "function {0} has no body";
}

impl fmt::Display for DiagnosticKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fill `{N}` placeholders of a template.
fn render_template(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                match after[..close].parse::<usize>().ok().and_then(|i| args.get(i)) {
                    Some(arg) => out.push_str(arg),
                    None => out.push_str(&rest[open..open + close + 2]),
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{span}: {message}")]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    pub key: DiagnosticKey,
    pub args: Vec<String>,
    /// The template rendered with `args`.
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, span: Span, key: DiagnosticKey, args: Vec<String>) -> Self {
        let message = render_template(key.template(), &args);
        Self {
            severity,
            span,
            key,
            args,
            message,
        }
    }

    pub fn error(span: Span, key: DiagnosticKey, args: Vec<String>) -> Self {
        Self::new(Severity::Error, span, key, args)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// `path:line:col: severity: message`.
    pub fn render(&self, files: &SourceFiles) -> String {
        format!(
            "{}:{}:{}: {}: {}",
            files.path(self.span.file),
            self.span.line,
            self.span.col,
            self.severity,
            self.message
        )
    }
}

/// Append-only diagnostics list.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    limit: Option<usize>,
    dropped: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list that keeps at most `limit` entries.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.limit.is_some_and(|limit| self.items.len() >= limit) {
            self.dropped += 1;
            return;
        }
        self.items.push(diagnostic);
    }

    /// Push an error-severity diagnostic.
    pub fn error(&mut self, span: Span, key: DiagnosticKey, args: Vec<String>) {
        self.push(Diagnostic::error(span, key, args));
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.items.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.items.len() - self.error_count()
    }

    /// Entries discarded because the limit was reached.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn by_key(&self, key: DiagnosticKey) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.key == key)
    }

    pub fn count(&self, key: DiagnosticKey) -> usize {
        self.by_key(key).count()
    }

    pub fn contains(&self, key: DiagnosticKey) -> bool {
        self.by_key(key).next().is_some()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        for d in other.items {
            self.push(d);
        }
        self.dropped += other.dropped;
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in &self.items {
            writeln!(f, "{}: {d}", d.severity)?;
        }
        Ok(())
    }
}
