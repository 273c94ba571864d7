//! Scope tree of a function body.
//!
//! Every block of a function gets a [`ScopeNode`] in an arena owned by the
//! [`ScopeTree`]. A node records its parent, the position it occupies in the
//! parent's statement list, the unsafe/deferred flags, the iteration or
//! match construct it is the body of, the symbols it declares and the typed
//! statements it owns.
//!
//! Break, continue, goto and fallthrough checks walk the parent chain by id,
//! so a node never borrows its parent.

use bitflags::bitflags;
use tern_core::{Arena, Constant, Id, Span, TypeKind};

use crate::typed::TypedStmt;

pub type ScopeId = Id<ScopeNode>;
pub type LocalId = Id<Local>;
pub type ConstructId = Id<Construct>;

bitflags! {
    /// Flags a scope is opened with. Both are inherited by nested scopes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ScopeFlags: u8 {
        /// Unsafe operations are permitted.
        const UNSAFE = 1 << 0;
        /// Body of a deferred block.
        const DEFERRED = 1 << 1;
    }
}

// ============================================================================
// Nodes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructKind {
    Iter,
    Match,
}

/// An iteration or match statement that break/continue can target.
#[derive(Debug, Clone, PartialEq)]
pub struct Construct {
    pub kind: ConstructKind,
    /// Scope holding the statement.
    pub scope: ScopeId,
    /// Position of the statement in that scope.
    pub index: usize,
    /// Some break targets this construct.
    pub broken: bool,
    pub span: Span,
}

/// Position of a match case scope among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseInfo {
    /// Statements written in the case.
    pub stmt_count: usize,
    /// Another case or a default follows this one.
    pub has_next: bool,
}

/// A local variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Local {
    pub name: String,
    pub kind: TypeKind,
    pub mutable: bool,
    /// Folded value of a `const` local.
    pub constant: Option<Constant>,
    pub used: bool,
    /// Unused-declaration reporting applies.
    pub reportable: bool,
    pub scope: ScopeId,
    pub span: Span,
}

/// A local type alias.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalAlias {
    pub name: String,
    pub kind: TypeKind,
    pub used: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScopeSymbol {
    Local(LocalId),
    Alias(LocalAlias),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeNode {
    pub parent: Option<ScopeId>,
    /// Index of the statement in the parent that opened this scope.
    pub parent_index: usize,
    pub flags: ScopeFlags,
    /// Iteration or match this scope is the body of.
    pub construct: Option<ConstructId>,
    pub case: Option<CaseInfo>,
    pub symbols: Vec<ScopeSymbol>,
    pub stmts: Vec<TypedStmt>,
    pub span: Span,
}

// ============================================================================
// ScopeTree
// ============================================================================

/// Arena-backed scope tree of one body.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    pub scopes: Arena<ScopeNode>,
    pub locals: Arena<Local>,
    pub constructs: Arena<Construct>,
    pub root: ScopeId,
}

impl ScopeTree {
    pub fn new(flags: ScopeFlags, span: Span) -> Self {
        let mut scopes = Arena::new();
        let root = scopes.alloc(ScopeNode {
            parent: None,
            parent_index: 0,
            flags,
            construct: None,
            case: None,
            symbols: Vec::new(),
            stmts: Vec::new(),
            span,
        });
        Self {
            scopes,
            locals: Arena::new(),
            constructs: Arena::new(),
            root,
        }
    }

    /// Open a child of `parent` at the parent's next statement position.
    pub fn push_child(&mut self, parent: ScopeId, flags: ScopeFlags, span: Span) -> ScopeId {
        let parent_node = &self.scopes[parent];
        let node = ScopeNode {
            parent: Some(parent),
            parent_index: parent_node.stmts.len(),
            flags: parent_node.flags | flags,
            construct: None,
            case: None,
            symbols: Vec::new(),
            stmts: Vec::new(),
            span,
        };
        self.scopes.alloc(node)
    }

    pub fn node(&self, id: ScopeId) -> &ScopeNode {
        &self.scopes[id]
    }

    pub fn node_mut(&mut self, id: ScopeId) -> &mut ScopeNode {
        &mut self.scopes[id]
    }

    pub fn local(&self, id: LocalId) -> &Local {
        &self.locals[id]
    }

    pub fn construct(&self, id: ConstructId) -> &Construct {
        &self.constructs[id]
    }

    pub fn stmts(&self, id: ScopeId) -> &[TypedStmt] {
        &self.scopes[id].stmts
    }

    /// `id` followed by each of its ancestors up to the root.
    pub fn ancestors(&self, id: ScopeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    pub fn depth(&self, id: ScopeId) -> usize {
        self.ancestors(id).count() - 1
    }

    pub fn is_unsafe(&self, id: ScopeId) -> bool {
        self.scopes[id].flags.contains(ScopeFlags::UNSAFE)
    }

    pub fn is_deferred(&self, id: ScopeId) -> bool {
        self.scopes[id].flags.contains(ScopeFlags::DEFERRED)
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor(&self, ancestor: ScopeId, id: ScopeId) -> bool {
        self.ancestors(id).any(|s| s == ancestor)
    }

    /// Child of `ancestor` on the path down to `id`.
    pub fn child_towards(&self, ancestor: ScopeId, id: ScopeId) -> Option<ScopeId> {
        self.ancestors(id)
            .find(|s| self.scopes[*s].parent == Some(ancestor))
    }

    /// Deepest scope that is an ancestor of both.
    pub fn common_ancestor(&self, a: ScopeId, b: ScopeId) -> ScopeId {
        self.ancestors(a)
            .find(|s| self.is_ancestor(*s, b))
            .unwrap_or(self.root)
    }

    /// Span of the first statement of `scope` in `range` that declares a
    /// variable.
    pub fn declares_in(&self, scope: ScopeId, range: std::ops::Range<usize>) -> Option<Span> {
        let stmts = &self.scopes[scope].stmts;
        let end = range.end.min(stmts.len());
        let start = range.start.min(end);
        stmts[start..end].iter().find_map(TypedStmt::declared_span)
    }

    // ========================================================================
    // Symbols
    // ========================================================================

    pub fn declare_local(&mut self, scope: ScopeId, local: Local) -> LocalId {
        let id = self.locals.alloc(local);
        self.scopes[scope].symbols.push(ScopeSymbol::Local(id));
        id
    }

    pub fn declare_alias(&mut self, scope: ScopeId, alias: LocalAlias) {
        self.scopes[scope].symbols.push(ScopeSymbol::Alias(alias));
    }

    /// Whether `scope` itself already declares `name`.
    pub fn declared_here(&self, scope: ScopeId, name: &str) -> bool {
        self.scopes[scope].symbols.iter().any(|sym| match sym {
            ScopeSymbol::Local(id) => self.locals[*id].name == name,
            ScopeSymbol::Alias(alias) => alias.name == name,
        })
    }

    /// Innermost local named `name` visible from `scope`.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<LocalId> {
        for id in self.ancestors(scope) {
            for sym in self.scopes[id].symbols.iter().rev() {
                match sym {
                    ScopeSymbol::Local(local) if self.locals[*local].name == name => {
                        return Some(*local);
                    }
                    ScopeSymbol::Alias(alias) if alias.name == name => return None,
                    _ => {}
                }
            }
        }
        None
    }

    /// Innermost alias named `name` visible from `scope`, marked used.
    pub fn use_alias(&mut self, scope: ScopeId, name: &str) -> Option<TypeKind> {
        let ids: Vec<ScopeId> = self.ancestors(scope).collect();
        for id in ids {
            let node = &mut self.scopes[id];
            for sym in node.symbols.iter_mut().rev() {
                if let ScopeSymbol::Alias(alias) = sym {
                    if alias.name == name {
                        alias.used = true;
                        return Some(alias.kind.clone());
                    }
                }
            }
        }
        None
    }

    pub fn mark_used(&mut self, local: LocalId) {
        self.locals[local].used = true;
    }

    /// Declarations of `scope` that are still unused: `(name, span)`.
    pub fn unused_in(&self, scope: ScopeId) -> Vec<(String, Span)> {
        self.scopes[scope]
            .symbols
            .iter()
            .filter_map(|sym| match sym {
                ScopeSymbol::Local(id) => {
                    let local = &self.locals[*id];
                    (local.reportable && !local.used).then(|| (local.name.clone(), local.span))
                }
                ScopeSymbol::Alias(alias) => (!alias.used).then(|| (alias.name.clone(), alias.span)),
            })
            .collect()
    }
}

/// Iterator over a scope and its ancestors.
pub struct Ancestors<'t> {
    tree: &'t ScopeTree,
    next: Option<ScopeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ScopeId;

    fn next(&mut self) -> Option<ScopeId> {
        let current = self.next?;
        self.next = self.tree.scopes[current].parent;
        Some(current)
    }
}
