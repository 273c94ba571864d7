//! Break, continue, labels, goto and fallthrough.
//!
//! Unlabeled jumps resolve immediately against the enclosing constructs.
//! Labels may be declared after the jumps that use them, so labeled jumps
//! and gotos are recorded in the [`FunctionFrame`](crate::checker) and
//! resolved once the whole body is checked; the placeholder statement of a
//! labeled jump is patched in place at that point.

use tern_ast::{GotoStmt, Ident, JumpStmt};
use tern_core::{DiagnosticKey, Span};

use crate::checker::Checker;
use crate::scope::{ConstructId, ConstructKind, ScopeFlags, ScopeId};
use crate::typed::TypedStmt;

#[derive(Debug)]
pub(crate) struct LabelEntry {
    pub name: String,
    pub scope: ScopeId,
    /// Position of the label statement in its scope.
    pub index: usize,
    pub span: Span,
    pub used: bool,
}

#[derive(Debug)]
pub(crate) struct GotoEntry {
    pub label: String,
    pub scope: ScopeId,
    pub index: usize,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JumpKind {
    Break,
    Continue,
}

/// A labeled break or continue waiting for label resolution.
#[derive(Debug)]
pub(crate) struct PendingJump {
    pub label: String,
    pub kind: JumpKind,
    pub scope: ScopeId,
    pub index: usize,
    pub span: Span,
}

impl JumpKind {
    fn out_of_scope_key(self) -> DiagnosticKey {
        match self {
            JumpKind::Break => DiagnosticKey::BreakAtOutOfValidScope,
            JumpKind::Continue => DiagnosticKey::ContinueAtOutOfValidScope,
        }
    }

    fn stmt(self, target: Option<ConstructId>) -> TypedStmt {
        match self {
            JumpKind::Break => TypedStmt::Break { target },
            JumpKind::Continue => TypedStmt::Continue { target },
        }
    }
}

impl<'r> Checker<'r> {
    pub(super) fn check_break(&mut self, jump: &JumpStmt<'_>) -> TypedStmt {
        self.check_jump(jump, JumpKind::Break)
    }

    pub(super) fn check_continue(&mut self, jump: &JumpStmt<'_>) -> TypedStmt {
        self.check_jump(jump, JumpKind::Continue)
    }

    fn check_jump(&mut self, jump: &JumpStmt<'_>, kind: JumpKind) -> TypedStmt {
        if let Some(label) = jump.label {
            self.frame.jumps.push(PendingJump {
                label: label.name.to_string(),
                kind,
                scope: self.current,
                index: self.next_index(),
                span: jump.span,
            });
            return kind.stmt(None);
        }

        let target = self.enclosing_constructs(self.current).into_iter().find(|id| {
            kind == JumpKind::Break || self.tree.construct(*id).kind == ConstructKind::Iter
        });
        match target {
            Some(id) => {
                if kind == JumpKind::Break {
                    self.tree.constructs[id].broken = true;
                }
                kind.stmt(Some(id))
            }
            None => {
                self.error(jump.span, kind.out_of_scope_key(), vec![]);
                kind.stmt(None)
            }
        }
    }

    pub(super) fn check_label(&mut self, label: &Ident<'_>) -> TypedStmt {
        let name = label.name;
        if self.frame.labels.iter().any(|l| l.name == name) {
            self.error(label.span, DiagnosticKey::LabelExist, vec![name.to_string()]);
        } else {
            self.frame.labels.push(LabelEntry {
                name: name.to_string(),
                scope: self.current,
                index: self.next_index(),
                span: label.span,
                used: false,
            });
        }
        TypedStmt::Label(name.to_string())
    }

    pub(super) fn check_goto(&mut self, goto: &GotoStmt<'_>) -> TypedStmt {
        let label = goto.label.name.to_string();
        self.frame.gotos.push(GotoEntry {
            label: label.clone(),
            scope: self.current,
            index: self.next_index(),
            span: goto.span,
        });
        TypedStmt::Goto(label)
    }

    /// `fallthrough` is only valid as the last statement written in a case
    /// that another case follows.
    pub(super) fn check_fallthrough(&mut self, span: Span) -> TypedStmt {
        match self.tree.node(self.current).case {
            Some(case) if self.next_index() + 1 == case.stmt_count => {
                if !case.has_next {
                    self.error(span, DiagnosticKey::FallthroughIntoFinalCase, vec![]);
                }
            }
            _ => self.error(span, DiagnosticKey::FallthroughWrongUse, vec![]),
        }
        TypedStmt::Fallthrough
    }

    /// Constructs enclosing `scope`, innermost first. Jumps never leave a
    /// deferred block, so the walk stops at its boundary.
    fn enclosing_constructs(&self, scope: ScopeId) -> Vec<ConstructId> {
        let deferred = self.tree.is_deferred(scope);
        let mut found = Vec::new();
        for id in self.tree.ancestors(scope) {
            let node = self.tree.node(id);
            if deferred && !node.flags.contains(ScopeFlags::DEFERRED) {
                break;
            }
            if let Some(construct) = node.construct {
                found.push(construct);
            }
        }
        found
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Resolve labeled jumps and gotos recorded while walking the body, then
    /// report labels nothing refers to.
    pub(crate) fn resolve_jumps(&mut self) {
        for jump in std::mem::take(&mut self.frame.jumps) {
            self.resolve_labeled(jump);
        }
        for goto in std::mem::take(&mut self.frame.gotos) {
            self.resolve_goto(goto);
        }

        if self.config.report_unused {
            let severity = self.config.unused_severity;
            let unused: Vec<(String, Span)> = self
                .frame
                .labels
                .iter()
                .filter(|l| !l.used)
                .map(|l| (l.name.clone(), l.span))
                .collect();
            for (name, span) in unused {
                self.report(severity, span, DiagnosticKey::DeclaredButNotUsed, vec![name]);
            }
        }
    }

    /// Mark the label named `name` used and return where it sits.
    fn use_label(&mut self, name: &str, span: Span) -> Option<(ScopeId, usize)> {
        match self.frame.labels.iter_mut().find(|l| l.name == name) {
            Some(label) => {
                label.used = true;
                Some((label.scope, label.index))
            }
            None => {
                self.error(span, DiagnosticKey::LabelNotExist, vec![name.to_string()]);
                None
            }
        }
    }

    fn resolve_labeled(&mut self, jump: PendingJump) {
        let Some((scope, index)) = self.use_label(&jump.label, jump.span) else {
            return;
        };
        let construct = match self.tree.stmts(scope).get(index + 1) {
            Some(TypedStmt::Iter { construct, .. }) => Some(*construct),
            Some(TypedStmt::Match { construct, .. }) if jump.kind == JumpKind::Break => Some(*construct),
            _ => None,
        };
        let Some(construct) = construct else {
            self.error(jump.span, DiagnosticKey::InvalidLabel, vec![jump.label]);
            return;
        };
        if !self.enclosing_constructs(jump.scope).contains(&construct) {
            self.error(jump.span, jump.kind.out_of_scope_key(), vec![]);
            return;
        }

        log::trace!("{} {} resolved to {:?}", jump.span, jump.label, construct);
        if jump.kind == JumpKind::Break {
            self.tree.constructs[construct].broken = true;
        }
        if let Some(slot) = self.tree.node_mut(jump.scope).stmts.get_mut(jump.index) {
            *slot = jump.kind.stmt(Some(construct));
        }
    }

    fn resolve_goto(&mut self, goto: GotoEntry) {
        let Some((scope, index)) = self.use_label(&goto.label, goto.span) else {
            return;
        };
        if self.goto_crosses_declaration(&goto, scope, index).is_some() {
            self.error(goto.span, DiagnosticKey::GotoJumpsDeclarations, vec![goto.label]);
        }
    }

    /// First declaration a jump from `goto` to the label at `index` of
    /// `label_scope` would skip.
    fn goto_crosses_declaration(&self, goto: &GotoEntry, label_scope: ScopeId, index: usize) -> Option<Span> {
        let tree = &self.tree;
        if label_scope == goto.scope {
            return tree.declares_in(label_scope, goto.index + 1..index);
        }

        // Leaving nested scopes only skips what lies between the enclosing
        // statement and the label.
        if tree.is_ancestor(label_scope, goto.scope) {
            let from = tree
                .child_towards(label_scope, goto.scope)
                .map_or(goto.index, |child| tree.node(child).parent_index);
            return tree.declares_in(label_scope, from + 1..index);
        }

        // Entering a scope skips everything before the label on the way down
        // from the common ancestor.
        let common = tree.common_ancestor(goto.scope, label_scope);
        let mut scope = label_scope;
        let mut until = index;
        while scope != common {
            if let Some(span) = tree.declares_in(scope, 0..until) {
                return Some(span);
            }
            let node = tree.node(scope);
            until = node.parent_index;
            match node.parent {
                Some(parent) => scope = parent,
                None => break,
            }
        }
        let from = if goto.scope == common {
            goto.index
        } else {
            tree.child_towards(common, goto.scope)
                .map_or(goto.index, |child| tree.node(child).parent_index)
        };
        tree.declares_in(common, from + 1..until)
    }
}
