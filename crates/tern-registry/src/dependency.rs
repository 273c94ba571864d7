//! Struct dependency ordering.
//!
//! A struct depends on every struct it stores by value (directly or as an
//! array element). Pointer, reference, slice and map fields are indirections
//! and add no edge. The order is a topological sort of that graph; a cycle
//! means a struct would contain itself.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use tern_core::{Span, TypeHash, TypeKind};

use crate::registry::SymbolRegistry;

/// A struct that (transitively) stores itself by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructCycle {
    pub hash: TypeHash,
    pub name: String,
    pub span: Span,
}

fn by_value_deps(kind: &TypeKind, out: &mut Vec<TypeHash>) {
    match kind {
        TypeKind::Struct(s) => out.push(s.decl),
        TypeKind::Array(a) => by_value_deps(&a.elem, out),
        TypeKind::Tuple(parts) => parts.iter().for_each(|p| by_value_deps(p, out)),
        _ => {}
    }
}

impl SymbolRegistry {
    /// Structs of this registry ordered so that dependencies come first.
    ///
    /// Ties are broken by declaration position so the order is stable.
    pub fn struct_order(&self) -> Result<Vec<TypeHash>, StructCycle> {
        let mut structs: Vec<_> = self.structs().collect();
        structs.sort_by_key(|s| (s.span.file, s.span.line, s.span.col, s.name.clone()));

        let mut graph = DiGraph::<TypeHash, ()>::new();
        let mut nodes: FxHashMap<TypeHash, NodeIndex> = FxHashMap::default();
        for def in &structs {
            nodes.insert(def.hash, graph.add_node(def.hash));
        }
        for def in &structs {
            let mut deps = Vec::new();
            for field in &def.fields {
                by_value_deps(&field.kind, &mut deps);
            }
            for dep in deps {
                if let (Some(&from), Some(&to)) = (nodes.get(&dep), nodes.get(&def.hash)) {
                    graph.update_edge(from, to, ());
                }
            }
        }

        match toposort(&graph, None) {
            Ok(order) => Ok(order.into_iter().map(|n| graph[n]).collect()),
            Err(cycle) => {
                let hash = graph[cycle.node_id()];
                let (name, span) = self
                    .get_struct(hash)
                    .map(|s| (s.name.clone(), s.span))
                    .unwrap_or_default();
                log::debug!("struct dependency cycle through {name}");
                Err(StructCycle { hash, name, span })
            }
        }
    }
}
