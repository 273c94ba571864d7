//! Blocks and local type aliases.

use tern_ast::{Block, TypeAliasDecl};
use tern_core::DiagnosticKey;

use crate::checker::Checker;
use crate::scope::{ConstructId, LocalAlias, ScopeFlags, ScopeId};
use crate::typed::TypedStmt;
use crate::value::Value;

/// Flags a block opens its scope with.
pub(super) fn block_flags(block: &Block<'_>, extra: ScopeFlags) -> ScopeFlags {
    let mut flags = extra;
    if block.unsafety {
        flags |= ScopeFlags::UNSAFE;
    }
    if block.deferred {
        flags |= ScopeFlags::DEFERRED;
    }
    flags
}

impl<'r> Checker<'r> {
    /// Check a block in a new child scope.
    pub(crate) fn check_block(&mut self, block: &Block<'_>, extra: ScopeFlags) -> ScopeId {
        let scope = self.enter_scope(block_flags(block, extra), block.span);
        self.walk_stmts(block.stmts);
        self.leave_scope();
        scope
    }

    /// Open the body scope of an iteration or match case.
    pub(super) fn enter_construct_body(&mut self, block: &Block<'_>, construct: ConstructId) -> ScopeId {
        let scope = self.enter_scope(block_flags(block, ScopeFlags::empty()), block.span);
        self.tree.node_mut(scope).construct = Some(construct);
        scope
    }

    pub(super) fn check_local_alias(&mut self, alias: &TypeAliasDecl<'_>) -> TypedStmt {
        let Some(kind) = self.resolve_type(&alias.ty) else {
            return TypedStmt::Expr(Value::invalid().into_typed());
        };
        let name = alias.name.name;
        if !alias.name.is_blank() {
            if self.tree.declared_here(self.current, name) {
                self.error(alias.name.span, DiagnosticKey::DuplicatedIdent, vec![name.to_string()]);
            } else {
                let scope = self.current;
                self.tree.declare_alias(
                    scope,
                    LocalAlias {
                        name: name.to_string(),
                        kind: kind.clone(),
                        used: false,
                        span: alias.name.span,
                    },
                );
            }
        }
        TypedStmt::TypeAlias {
            name: name.to_string(),
            kind,
        }
    }
}
