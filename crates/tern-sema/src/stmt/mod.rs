//! Statement checking.
//!
//! [`Checker::check_stmt`] checks one statement in the current scope and
//! returns its typed form; the caller appends it. Every AST statement
//! produces exactly one typed statement, so a statement's index in the AST
//! block equals its index in the scope node. Scopes opened while checking a
//! statement record that index as their `parent_index`.

mod assign_stmt;
mod block;
mod if_stmt;
mod iter_stmt;
pub(crate) mod jumps;
mod match_stmt;
mod return_stmt;
mod var_decl;

use tern_ast::Stmt;

use crate::checker::Checker;
use crate::scope::ScopeFlags;
use crate::typed::TypedStmt;

impl<'r> Checker<'r> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn check_stmt(&mut self, stmt: &Stmt<'_>) -> TypedStmt {
        match stmt {
            Stmt::VarDecl(decl) => self.check_var_decl(decl),
            Stmt::TypeAlias(alias) => self.check_local_alias(alias),
            Stmt::Expr(expr) => TypedStmt::Expr(self.eval_expr(&expr.expr, None).into_typed()),
            Stmt::Block(block) => TypedStmt::Block(self.check_block(block, ScopeFlags::empty())),
            Stmt::If(stmt) => self.check_if(stmt),
            Stmt::Iter(stmt) => self.check_iter(stmt),
            Stmt::Break(jump) => self.check_break(jump),
            Stmt::Continue(jump) => self.check_continue(jump),
            Stmt::Label(label) => self.check_label(label),
            Stmt::Goto(goto) => self.check_goto(goto),
            Stmt::Assign(assign) => self.check_assign(assign),
            Stmt::Match(stmt) => self.check_match(stmt),
            Stmt::Fallthrough(span) => self.check_fallthrough(*span),
            Stmt::Return(ret) => self.check_return(ret),
        }
    }

    /// Check and append each statement to the current scope.
    pub(crate) fn walk_stmts(&mut self, stmts: &[Stmt<'_>]) {
        for stmt in stmts {
            let typed = self.check_stmt(stmt);
            self.push_stmt(typed);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use tern_ast::Stmt;
    use tern_core::{Diagnostics, TypeKind};
    use tern_registry::SymbolRegistry;

    use crate::checker::Checker;
    use crate::config::SemaConfig;
    use crate::scope::{ScopeFlags, ScopeTree};

    /// Check `stmts` as the body of a function with `result`, resolving
    /// jumps and reporting unused root declarations like a function does.
    pub(crate) fn run_body(
        registry: &SymbolRegistry,
        result: Option<TypeKind>,
        stmts: &[Stmt<'_>],
    ) -> (ScopeTree, Diagnostics) {
        let config = SemaConfig::default();
        let mut diagnostics = Diagnostics::new();
        let tree = {
            let mut checker = Checker::with_flags(registry, &config, &mut diagnostics, ScopeFlags::empty(), Default::default());
            checker.frame.result = result;
            checker.walk_stmts(stmts);
            checker.resolve_jumps();
            let root = checker.tree.root;
            checker.report_unused(root);
            checker.into_tree()
        };
        (tree, diagnostics)
    }
}
