//! Append-only arena addressed by typed, generation-checked ids.
//!
//! Scope nodes and iteration/match constructs live in an [`Arena`] and are
//! referred to by [`Id`]. Every arena is stamped with a generation taken from
//! a process-wide counter, and [`Arena::clear`] moves it to a fresh one, so
//! an id handed out by a discarded or rebuilt arena never resolves to an
//! unrelated item.

use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_GENERATION: AtomicU32 = AtomicU32::new(1);

fn fresh_generation() -> u32 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Identifier of an item of type `T` inside an [`Arena`].
pub struct Id<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Position of the item in insertion order.
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ty_name = std::any::type_name::<T>();
        let short = ty_name.rsplit("::").next().unwrap_or(ty_name);
        write!(f, "Id<{short}>({}#{})", self.index, self.generation)
    }
}

/// Append-only storage of `T` values.
#[derive(Clone)]
pub struct Arena<T> {
    items: Vec<T>,
    generation: u32,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            generation: fresh_generation(),
        }
    }
}

impl<T: Debug> Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Store `item` and return its id.
    pub fn alloc(&mut self, item: T) -> Id<T> {
        let index = self.items.len() as u32;
        self.items.push(item);
        Id {
            index,
            generation: self.generation,
            _marker: PhantomData,
        }
    }

    /// Item for `id`, `None` when the id belongs to another arena generation.
    pub fn get(&self, id: Id<T>) -> Option<&T> {
        if id.generation != self.generation {
            return None;
        }
        self.items.get(id.index as usize)
    }

    pub fn get_mut(&mut self, id: Id<T>) -> Option<&mut T> {
        if id.generation != self.generation {
            return None;
        }
        self.items.get_mut(id.index as usize)
    }

    /// Whether `id` was handed out by this arena generation.
    pub fn contains(&self, id: Id<T>) -> bool {
        self.get(id).is_some()
    }

    /// Drop every item and invalidate all ids handed out so far.
    pub fn clear(&mut self) {
        self.items.clear();
        self.generation = fresh_generation();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        let generation = self.generation;
        self.items.iter().enumerate().map(move |(i, item)| {
            (
                Id {
                    index: i as u32,
                    generation,
                    _marker: PhantomData,
                },
                item,
            )
        })
    }
}

impl<T> Index<Id<T>> for Arena<T> {
    type Output = T;

    fn index(&self, id: Id<T>) -> &T {
        match self.get(id) {
            Some(item) => item,
            None => panic!("{id:?} does not belong to this arena"),
        }
    }
}

impl<T> IndexMut<Id<T>> for Arena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        if id.generation != self.generation {
            panic!("{id:?} does not belong to this arena");
        }
        &mut self.items[id.index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_and_index() {
        let mut arena = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");
        assert_ne!(a, b);
        assert_eq!(arena[a], "a");
        assert_eq!(arena[b], "b");
        assert_eq!(b.index(), 1);
    }

    #[test]
    fn ids_from_other_arena_do_not_resolve() {
        let mut first = Arena::new();
        let id = first.alloc(1u32);
        let mut second = Arena::new();
        second.alloc(2u32);
        assert!(second.get(id).is_none());
    }

    #[test]
    fn clear_invalidates_ids() {
        let mut arena = Arena::new();
        let id = arena.alloc(7u8);
        arena.clear();
        arena.alloc(8u8);
        assert!(!arena.contains(id));
    }
}
