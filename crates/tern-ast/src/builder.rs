//! Programmatic AST construction.
//!
//! [`AstBuilder`] allocates nodes in a [`Bump`] arena. Each node it creates
//! gets a fresh span on the next line of the builder's file, so diagnostics
//! produced for built trees can be told apart by line.

use std::cell::Cell;

use bumpalo::Bump;
use tern_core::{AssignOp, BinaryOp, FileId, Span, UnaryOp};

use crate::decl::*;
use crate::expr::*;
use crate::node::{Ident, Receiver};
use crate::stmt::*;
use crate::types::*;

pub struct AstBuilder<'ast> {
    arena: &'ast Bump,
    file: FileId,
    line: Cell<u32>,
}

impl<'ast> AstBuilder<'ast> {
    pub fn new(arena: &'ast Bump) -> Self {
        Self::in_file(arena, FileId::default())
    }

    pub fn in_file(arena: &'ast Bump, file: FileId) -> Self {
        Self {
            arena,
            file,
            line: Cell::new(0),
        }
    }

    /// Next span.
    pub fn span(&self) -> Span {
        self.line.set(self.line.get() + 1);
        Span::new(self.line.get(), 1, 0).in_file(self.file)
    }

    /// Line the next span will get.
    pub fn next_line(&self) -> u32 {
        self.line.get() + 1
    }

    fn alloc<T>(&self, value: T) -> &'ast T {
        self.arena.alloc(value)
    }

    fn slice<T: Copy>(&self, values: &[T]) -> &'ast [T] {
        self.arena.alloc_slice_copy(values)
    }

    fn str(&self, s: &str) -> &'ast str {
        self.arena.alloc_str(s)
    }

    pub fn name(&self, name: &str) -> Ident<'ast> {
        Ident::new(self.str(name), self.span())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn literal(&self, kind: LiteralKind, raw: &str) -> Expr<'ast> {
        Expr::Literal(LiteralExpr {
            kind,
            raw: self.str(raw),
            span: self.span(),
        })
    }

    pub fn int(&self, raw: &str) -> Expr<'ast> {
        self.literal(LiteralKind::Int, raw)
    }

    pub fn float(&self, raw: &str) -> Expr<'ast> {
        self.literal(LiteralKind::Float, raw)
    }

    /// Interpreted string; `raw` is the text between the quotes.
    pub fn string(&self, raw: &str) -> Expr<'ast> {
        self.literal(LiteralKind::Str, raw)
    }

    pub fn raw_string(&self, raw: &str) -> Expr<'ast> {
        self.literal(LiteralKind::RawStr, raw)
    }

    /// Rune; `raw` is the text between the single quotes.
    pub fn rune(&self, raw: &str) -> Expr<'ast> {
        self.literal(LiteralKind::Rune, raw)
    }

    pub fn bool_lit(&self, value: bool) -> Expr<'ast> {
        self.literal(LiteralKind::Bool(value), if value { "true" } else { "false" })
    }

    pub fn nil(&self) -> Expr<'ast> {
        self.literal(LiteralKind::Nil, "nil")
    }

    pub fn ident(&self, name: &str) -> Expr<'ast> {
        let ident = self.name(name);
        Expr::Ident(IdentExpr {
            package: None,
            ident,
            generics: &[],
            cpp_linked: false,
            span: ident.span,
        })
    }

    pub fn pkg_ident(&self, package: &str, name: &str) -> Expr<'ast> {
        let package = self.name(package);
        let ident = self.name(name);
        Expr::Ident(IdentExpr {
            package: Some(package),
            ident,
            generics: &[],
            cpp_linked: false,
            span: package.span,
        })
    }

    pub fn cpp_ident(&self, name: &str) -> Expr<'ast> {
        let ident = self.name(name);
        Expr::Ident(IdentExpr {
            package: None,
            ident,
            generics: &[],
            cpp_linked: true,
            span: ident.span,
        })
    }

    pub fn generic_ident(&self, name: &str, generics: &[TypeExpr<'ast>]) -> Expr<'ast> {
        let ident = self.name(name);
        Expr::Ident(IdentExpr {
            package: None,
            ident,
            generics: self.slice(generics),
            cpp_linked: false,
            span: ident.span,
        })
    }

    pub fn binary(&self, left: Expr<'ast>, op: BinaryOp, right: Expr<'ast>) -> Expr<'ast> {
        Expr::Binary(self.alloc(BinaryExpr {
            left: self.alloc(left),
            op,
            right: self.alloc(right),
            span: self.span(),
        }))
    }

    pub fn unary(&self, op: UnaryOp, operand: Expr<'ast>) -> Expr<'ast> {
        Expr::Unary(self.alloc(UnaryExpr {
            op,
            operand: self.alloc(operand),
            span: self.span(),
        }))
    }

    pub fn arg(&self, value: Expr<'ast>) -> Arg<'ast> {
        Arg {
            name: None,
            value,
            span: value.span(),
        }
    }

    pub fn named_arg(&self, name: &str, value: Expr<'ast>) -> Arg<'ast> {
        let name = self.name(name);
        Arg {
            name: Some(name),
            value,
            span: name.span,
        }
    }

    /// Call with positional arguments.
    pub fn call(&self, callee: Expr<'ast>, args: &[Expr<'ast>]) -> Expr<'ast> {
        let args: Vec<Arg<'ast>> = args.iter().map(|a| self.arg(*a)).collect();
        self.call_with(callee, &args, false)
    }

    pub fn call_with(&self, callee: Expr<'ast>, args: &[Arg<'ast>], spread: bool) -> Expr<'ast> {
        Expr::Call(self.alloc(CallExpr {
            callee: self.alloc(callee),
            args: self.slice(args),
            spread,
            span: self.span(),
        }))
    }

    pub fn index(&self, base: Expr<'ast>, index: Expr<'ast>) -> Expr<'ast> {
        Expr::Index(self.alloc(IndexExpr {
            base: self.alloc(base),
            index: self.alloc(index),
            span: self.span(),
        }))
    }

    pub fn slicing(
        &self,
        base: Expr<'ast>,
        start: Option<Expr<'ast>>,
        end: Option<Expr<'ast>>,
    ) -> Expr<'ast> {
        Expr::Slice(self.alloc(SliceExpr {
            base: self.alloc(base),
            start: start.map(|e| self.alloc(e)),
            end: end.map(|e| self.alloc(e)),
            span: self.span(),
        }))
    }

    pub fn member(&self, base: Expr<'ast>, member: &str) -> Expr<'ast> {
        Expr::Member(self.alloc(MemberExpr {
            base: self.alloc(base),
            member: self.name(member),
            span: self.span(),
        }))
    }

    pub fn cast(&self, ty: TypeExpr<'ast>, expr: Expr<'ast>) -> Expr<'ast> {
        Expr::Cast(self.alloc(CastExpr {
            ty,
            expr: self.alloc(expr),
            span: self.span(),
        }))
    }

    pub fn composite(
        &self,
        ty: Option<TypeExpr<'ast>>,
        entries: &[CompositeEntry<'ast>],
    ) -> Expr<'ast> {
        Expr::Composite(self.alloc(CompositeExpr {
            ty,
            entries: self.slice(entries),
            span: self.span(),
        }))
    }

    /// `Name{field: value, ...}`.
    pub fn struct_lit(&self, name: &str, fields: &[(&str, Expr<'ast>)]) -> Expr<'ast> {
        let ty = self.ty(name);
        let entries: Vec<CompositeEntry<'ast>> = fields
            .iter()
            .map(|(f, e)| CompositeEntry::Field(self.name(f), *e))
            .collect();
        self.composite(Some(ty), &entries)
    }

    /// `[]elem{values...}`.
    pub fn slice_lit(&self, elem: TypeExpr<'ast>, values: &[Expr<'ast>]) -> Expr<'ast> {
        let entries: Vec<CompositeEntry<'ast>> =
            values.iter().map(|e| CompositeEntry::Positional(*e)).collect();
        let ty = self.slice_ty(elem);
        self.composite(Some(ty), &entries)
    }

    // ========================================================================
    // Types
    // ========================================================================

    pub fn ty(&self, name: &str) -> TypeExpr<'ast> {
        self.generic_ty(name, &[])
    }

    pub fn generic_ty(&self, name: &str, generics: &[TypeExpr<'ast>]) -> TypeExpr<'ast> {
        let name = self.name(name);
        TypeExpr::Named(NamedType {
            package: None,
            name,
            generics: self.slice(generics),
            cpp_linked: false,
            span: name.span,
        })
    }

    pub fn pkg_ty(&self, package: &str, name: &str) -> TypeExpr<'ast> {
        let package = self.name(package);
        let name = self.name(name);
        TypeExpr::Named(NamedType {
            package: Some(package),
            name,
            generics: &[],
            cpp_linked: false,
            span: package.span,
        })
    }

    pub fn ptr_ty(&self, elem: Option<TypeExpr<'ast>>) -> TypeExpr<'ast> {
        TypeExpr::Ptr(elem.map(|e| self.alloc(e)), self.span())
    }

    pub fn ref_ty(&self, elem: TypeExpr<'ast>) -> TypeExpr<'ast> {
        TypeExpr::Ref(self.alloc(elem), self.span())
    }

    pub fn slice_ty(&self, elem: TypeExpr<'ast>) -> TypeExpr<'ast> {
        TypeExpr::Slice(self.alloc(elem), self.span())
    }

    pub fn array_ty(&self, elem: TypeExpr<'ast>, len: Option<Expr<'ast>>) -> TypeExpr<'ast> {
        TypeExpr::Array(self.alloc(ArrayType {
            elem,
            len: len.map(|e| &*self.alloc(e)),
            span: self.span(),
        }))
    }

    pub fn map_ty(&self, key: TypeExpr<'ast>, val: TypeExpr<'ast>) -> TypeExpr<'ast> {
        TypeExpr::Map(self.alloc(MapType {
            key,
            val,
            span: self.span(),
        }))
    }

    pub fn fn_ty(
        &self,
        params: &[ParamDecl<'ast>],
        result: Option<ResultDecl<'ast>>,
    ) -> TypeExpr<'ast> {
        TypeExpr::Fn(self.alloc(FnType {
            params: self.slice(params),
            result,
            unsafety: false,
            span: self.span(),
        }))
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn var(&self, name: &str, ty: Option<TypeExpr<'ast>>, init: Option<Expr<'ast>>) -> VarDecl<'ast> {
        VarDecl {
            name: self.name(name),
            ty,
            init,
            mutable: false,
            constant: false,
            span: self.span(),
        }
    }

    /// `let name: ty = init`.
    pub fn let_(&self, name: &str, ty: Option<TypeExpr<'ast>>, init: Option<Expr<'ast>>) -> Stmt<'ast> {
        Stmt::VarDecl(self.alloc(self.var(name, ty, init)))
    }

    /// `let mut name: ty = init`.
    pub fn let_mut(&self, name: &str, ty: Option<TypeExpr<'ast>>, init: Option<Expr<'ast>>) -> Stmt<'ast> {
        Stmt::VarDecl(self.alloc(VarDecl {
            mutable: true,
            ..self.var(name, ty, init)
        }))
    }

    /// `const name: ty = init`.
    pub fn const_(&self, name: &str, ty: Option<TypeExpr<'ast>>, init: Expr<'ast>) -> Stmt<'ast> {
        Stmt::VarDecl(self.alloc(VarDecl {
            constant: true,
            ..self.var(name, ty, Some(init))
        }))
    }

    pub fn alias(&self, name: &str, ty: TypeExpr<'ast>) -> Stmt<'ast> {
        Stmt::TypeAlias(self.alloc(TypeAliasDecl {
            name: self.name(name),
            ty,
            span: self.span(),
        }))
    }

    pub fn expr_stmt(&self, expr: Expr<'ast>) -> Stmt<'ast> {
        Stmt::Expr(ExprStmt {
            expr,
            span: expr.span(),
        })
    }

    pub fn block(&self, stmts: &[Stmt<'ast>]) -> Block<'ast> {
        Block {
            stmts: self.slice(stmts),
            unsafety: false,
            deferred: false,
            span: self.span(),
        }
    }

    pub fn block_stmt(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Block(self.alloc(self.block(stmts)))
    }

    pub fn unsafe_block(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Block(self.alloc(Block {
            unsafety: true,
            ..self.block(stmts)
        }))
    }

    pub fn defer_block(&self, stmts: &[Stmt<'ast>]) -> Stmt<'ast> {
        Stmt::Block(self.alloc(Block {
            deferred: true,
            ..self.block(stmts)
        }))
    }

    /// `if cond { then } else { otherwise }`.
    pub fn if_(
        &self,
        cond: Expr<'ast>,
        then: &[Stmt<'ast>],
        otherwise: Option<&[Stmt<'ast>]>,
    ) -> Stmt<'ast> {
        self.if_chain(&[(cond, then)], otherwise)
    }

    pub fn if_chain(
        &self,
        branches: &[(Expr<'ast>, &[Stmt<'ast>])],
        otherwise: Option<&[Stmt<'ast>]>,
    ) -> Stmt<'ast> {
        let span = self.span();
        let branches: Vec<IfBranch<'ast>> = branches
            .iter()
            .map(|(cond, body)| IfBranch {
                cond: *cond,
                body: self.block(body),
                span: cond.span(),
            })
            .collect();
        Stmt::If(self.alloc(IfStmt {
            branches: self.slice(&branches),
            default: otherwise.map(|stmts| self.block(stmts)),
            span,
        }))
    }

    fn iter(&self, kind: IterKind<'ast>, body: &[Stmt<'ast>]) -> Stmt<'ast> {
        let span = self.span();
        Stmt::Iter(self.alloc(IterStmt {
            kind,
            body: self.block(body),
            span,
        }))
    }

    /// Infinite iteration.
    pub fn loop_(&self, body: &[Stmt<'ast>]) -> Stmt<'ast> {
        self.iter(IterKind::Infinite, body)
    }

    pub fn while_(&self, cond: Expr<'ast>, next: Option<Stmt<'ast>>, body: &[Stmt<'ast>]) -> Stmt<'ast> {
        let next = next.map(|s| &*self.alloc(s));
        self.iter(IterKind::While { cond, next }, body)
    }

    pub fn range(
        &self,
        key: Option<&str>,
        value: Option<&str>,
        expr: Expr<'ast>,
        body: &[Stmt<'ast>],
    ) -> Stmt<'ast> {
        let key = key.map(|k| RangeVar {
            name: self.name(k),
            mutable: false,
        });
        let value = value.map(|v| RangeVar {
            name: self.name(v),
            mutable: false,
        });
        self.iter(IterKind::Range { key, value, expr }, body)
    }

    pub fn brk(&self) -> Stmt<'ast> {
        Stmt::Break(JumpStmt {
            label: None,
            span: self.span(),
        })
    }

    pub fn brk_to(&self, label: &str) -> Stmt<'ast> {
        Stmt::Break(JumpStmt {
            label: Some(self.name(label)),
            span: self.span(),
        })
    }

    pub fn cont(&self) -> Stmt<'ast> {
        Stmt::Continue(JumpStmt {
            label: None,
            span: self.span(),
        })
    }

    pub fn cont_to(&self, label: &str) -> Stmt<'ast> {
        Stmt::Continue(JumpStmt {
            label: Some(self.name(label)),
            span: self.span(),
        })
    }

    pub fn label(&self, name: &str) -> Stmt<'ast> {
        Stmt::Label(self.name(name))
    }

    pub fn goto(&self, label: &str) -> Stmt<'ast> {
        let label = self.name(label);
        Stmt::Goto(GotoStmt {
            label,
            span: label.span,
        })
    }

    pub fn lhs(&self, expr: Expr<'ast>) -> AssignLhs<'ast> {
        AssignLhs::Expr(expr)
    }

    pub fn lhs_decl(&self, name: &str, mutable: bool) -> AssignLhs<'ast> {
        AssignLhs::Decl {
            name: self.name(name),
            mutable,
        }
    }

    pub fn lhs_blank(&self) -> AssignLhs<'ast> {
        AssignLhs::Blank(self.span())
    }

    pub fn assign_with(&self, lhs: &[AssignLhs<'ast>], op: AssignOp, rhs: &[Expr<'ast>]) -> Stmt<'ast> {
        Stmt::Assign(self.alloc(AssignStmt {
            lhs: self.slice(lhs),
            op,
            rhs: self.slice(rhs),
            span: self.span(),
        }))
    }

    /// `lhs = rhs`.
    pub fn assign(&self, lhs: Expr<'ast>, rhs: Expr<'ast>) -> Stmt<'ast> {
        self.assign_with(&[AssignLhs::Expr(lhs)], AssignOp::Assign, &[rhs])
    }

    /// `lhs op= rhs`.
    pub fn compound(&self, lhs: Expr<'ast>, op: BinaryOp, rhs: Expr<'ast>) -> Stmt<'ast> {
        self.assign_with(&[AssignLhs::Expr(lhs)], AssignOp::Compound(op), &[rhs])
    }

    pub fn inc(&self, lhs: Expr<'ast>) -> Stmt<'ast> {
        self.assign_with(&[AssignLhs::Expr(lhs)], AssignOp::Inc, &[])
    }

    pub fn dec(&self, lhs: Expr<'ast>) -> Stmt<'ast> {
        self.assign_with(&[AssignLhs::Expr(lhs)], AssignOp::Dec, &[])
    }

    /// `a, b := rhs...`, every name a new immutable binding.
    pub fn define(&self, names: &[&str], rhs: &[Expr<'ast>]) -> Stmt<'ast> {
        let lhs: Vec<AssignLhs<'ast>> = names
            .iter()
            .map(|n| {
                if *n == "_" {
                    self.lhs_blank()
                } else {
                    self.lhs_decl(n, false)
                }
            })
            .collect();
        self.assign_with(&lhs, AssignOp::Assign, rhs)
    }

    /// `mut a, mut b := rhs...`.
    pub fn define_mut(&self, names: &[&str], rhs: &[Expr<'ast>]) -> Stmt<'ast> {
        let lhs: Vec<AssignLhs<'ast>> = names.iter().map(|n| self.lhs_decl(n, true)).collect();
        self.assign_with(&lhs, AssignOp::Assign, rhs)
    }

    pub fn case(&self, patterns: &[CasePattern<'ast>], stmts: &[Stmt<'ast>]) -> Case<'ast> {
        Case {
            patterns: self.slice(patterns),
            stmts: self.slice(stmts),
            span: self.span(),
        }
    }

    pub fn case_exprs(&self, exprs: &[Expr<'ast>], stmts: &[Stmt<'ast>]) -> Case<'ast> {
        let patterns: Vec<CasePattern<'ast>> = exprs.iter().map(|e| CasePattern::Expr(*e)).collect();
        self.case(&patterns, stmts)
    }

    pub fn case_types(&self, types: &[TypeExpr<'ast>], stmts: &[Stmt<'ast>]) -> Case<'ast> {
        let patterns: Vec<CasePattern<'ast>> = types.iter().map(|t| CasePattern::Type(*t)).collect();
        self.case(&patterns, stmts)
    }

    pub fn match_(
        &self,
        expr: Option<Expr<'ast>>,
        cases: &[Case<'ast>],
        default: Option<&[Stmt<'ast>]>,
    ) -> Stmt<'ast> {
        let span = self.span();
        Stmt::Match(self.alloc(MatchStmt {
            expr,
            type_match: false,
            cases: self.slice(cases),
            default: default.map(|stmts| self.case(&[], stmts)),
            span,
        }))
    }

    pub fn type_match(
        &self,
        expr: Expr<'ast>,
        cases: &[Case<'ast>],
        default: Option<&[Stmt<'ast>]>,
    ) -> Stmt<'ast> {
        let span = self.span();
        Stmt::Match(self.alloc(MatchStmt {
            expr: Some(expr),
            type_match: true,
            cases: self.slice(cases),
            default: default.map(|stmts| self.case(&[], stmts)),
            span,
        }))
    }

    pub fn fallthrough(&self) -> Stmt<'ast> {
        Stmt::Fallthrough(self.span())
    }

    pub fn ret(&self, exprs: &[Expr<'ast>]) -> Stmt<'ast> {
        Stmt::Return(self.alloc(ReturnStmt {
            exprs: self.slice(exprs),
            span: self.span(),
        }))
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub fn param(&self, name: &str, ty: TypeExpr<'ast>) -> ParamDecl<'ast> {
        ParamDecl {
            name: Some(self.name(name)),
            ty,
            mutable: false,
            variadic: false,
            reference: false,
            default: None,
            span: self.span(),
        }
    }

    pub fn result(&self, types: &[TypeExpr<'ast>]) -> ResultDecl<'ast> {
        ResultDecl {
            types: self.slice(types),
            names: &[],
            span: self.span(),
        }
    }

    pub fn named_result(&self, names: &[&str], types: &[TypeExpr<'ast>]) -> ResultDecl<'ast> {
        let names: Vec<Ident<'ast>> = names.iter().map(|n| self.name(n)).collect();
        ResultDecl {
            types: self.slice(types),
            names: self.slice(&names),
            span: self.span(),
        }
    }

    pub fn func(
        &self,
        name: &str,
        params: &[ParamDecl<'ast>],
        result: Option<ResultDecl<'ast>>,
        body: &[Stmt<'ast>],
    ) -> FnDecl<'ast> {
        FnDecl {
            name: self.name(name),
            receiver: None,
            params: self.slice(params),
            result,
            body: Some(self.block(body)),
            unsafety: false,
            cpp_linked: false,
            span: self.span(),
        }
    }

    /// Function without a body.
    pub fn prototype(
        &self,
        name: &str,
        params: &[ParamDecl<'ast>],
        result: Option<ResultDecl<'ast>>,
    ) -> FnDecl<'ast> {
        FnDecl {
            body: None,
            ..self.func(name, params, result, &[])
        }
    }

    pub fn receiver(&self, reference: bool, mutable: bool) -> Receiver {
        Receiver {
            reference,
            mutable,
            span: self.span(),
        }
    }

    pub fn fn_item(&self, decl: FnDecl<'ast>) -> Item<'ast> {
        Item::Fn(self.alloc(decl))
    }

    pub fn field(&self, name: &str, ty: TypeExpr<'ast>) -> FieldDecl<'ast> {
        FieldDecl {
            name: self.name(name),
            ty,
            mutable: true,
            default: None,
            span: self.span(),
        }
    }

    pub fn struct_(&self, name: &str, fields: &[FieldDecl<'ast>]) -> Item<'ast> {
        self.generic_struct(name, &[], fields)
    }

    pub fn generic_struct(&self, name: &str, generics: &[&str], fields: &[FieldDecl<'ast>]) -> Item<'ast> {
        let generics: Vec<Ident<'ast>> = generics.iter().map(|g| self.name(g)).collect();
        Item::Struct(self.alloc(StructDecl {
            name: self.name(name),
            generics: self.slice(&generics),
            fields: self.slice(fields),
            cpp_linked: false,
            span: self.span(),
        }))
    }

    pub fn trait_(&self, name: &str, inherits: &[&str], methods: &[FnDecl<'ast>]) -> Item<'ast> {
        let inherits: Vec<NamedType<'ast>> = inherits
            .iter()
            .filter_map(|n| match self.ty(n) {
                TypeExpr::Named(named) => Some(named),
                _ => None,
            })
            .collect();
        Item::Trait(self.alloc(TraitDecl {
            name: self.name(name),
            inherits: self.slice(&inherits),
            methods: self.slice(methods),
            span: self.span(),
        }))
    }

    pub fn impl_(&self, trait_: Option<&str>, target: &str, methods: &[FnDecl<'ast>]) -> Item<'ast> {
        let trait_ = trait_.and_then(|t| match self.ty(t) {
            TypeExpr::Named(named) => Some(named),
            _ => None,
        });
        Item::Impl(self.alloc(ImplDecl {
            trait_,
            target: self.name(target),
            methods: self.slice(methods),
            span: self.span(),
        }))
    }

    pub fn enum_(
        &self,
        name: &str,
        underlying: Option<TypeExpr<'ast>>,
        items: &[(&str, Option<Expr<'ast>>)],
    ) -> Item<'ast> {
        let items: Vec<EnumItemDecl<'ast>> = items
            .iter()
            .map(|(n, v)| EnumItemDecl {
                name: self.name(n),
                value: *v,
                span: self.span(),
            })
            .collect();
        Item::Enum(self.alloc(EnumDecl {
            name: self.name(name),
            underlying,
            items: self.slice(&items),
            span: self.span(),
        }))
    }

    pub fn global(&self, decl: VarDecl<'ast>) -> Item<'ast> {
        Item::Var(self.alloc(decl))
    }

    pub fn alias_item(&self, name: &str, ty: TypeExpr<'ast>) -> Item<'ast> {
        Item::TypeAlias(self.alloc(TypeAliasDecl {
            name: self.name(name),
            ty,
            span: self.span(),
        }))
    }

    pub fn unit(&self, items: &[Item<'ast>]) -> CompilationUnit<'ast> {
        CompilationUnit {
            file: self.file,
            items: self.slice(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_advance_per_node() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let first = b.int("1");
        let second = b.int("2");
        assert!(first.span().precedes(&second.span()));
    }

    #[test]
    fn struct_literal_detection() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let lit = b.struct_lit("Point", &[("x", b.int("1"))]);
        assert!(lit.is_struct_literal());
        let slice = b.slice_lit(b.ty("int"), &[b.int("1")]);
        assert!(!slice.is_struct_literal());
    }

    #[test]
    fn define_turns_underscore_into_blank() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        let Stmt::Assign(assign) = b.define(&["a", "_"], &[b.int("1"), b.int("2")]) else {
            panic!("expected assignment");
        };
        assert!(matches!(assign.lhs[0], AssignLhs::Decl { .. }));
        assert!(matches!(assign.lhs[1], AssignLhs::Blank(_)));
    }

    #[test]
    fn declares_covers_assign_definitions() {
        let arena = Bump::new();
        let b = AstBuilder::new(&arena);
        assert!(b.let_("x", None, Some(b.int("1"))).declares());
        assert!(b.define(&["y"], &[b.int("1")]).declares());
        assert!(!b.assign(b.ident("y"), b.int("2")).declares());
        assert!(!b.brk().declares());
    }
}
