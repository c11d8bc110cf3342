//! Typed, index-addressed arenas.
//!
//! Values are pushed into a `Vec` and addressed by [`Idx<T>`], a `u32`
//! carrying the element type. Indices are `Copy` and can be stored freely
//! inside other arena values, so cyclic structures (a data type whose cases
//! mention itself) are plain data rather than reference-counted graphs.
//!
//! Allocation is append-only. The only way to remove values is
//! [`Arena::truncate`] back to an [`ArenaCheckpoint`], which discards a
//! suffix as a unit: everything allocated since the checkpoint disappears and
//! everything before it is untouched.
//!
//! # Examples
//!
//! ```
//! use tern_mem::Arena;
//!
//! let mut arena = Arena::new();
//! let a = arena.alloc("kept");
//! let cp = arena.checkpoint();
//! let b = arena.alloc("discarded");
//! assert!(arena.contains(b));
//!
//! arena.truncate(cp);
//! assert!(arena.contains(a));
//! assert!(!arena.contains(b));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Index of a `T` inside an [`Arena<T>`].
pub struct Idx<T> {
    raw: u32,
    _ty: PhantomData<fn() -> T>,
}

impl<T> Idx<T> {
    /// Builds an index from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _ty: PhantomData,
        }
    }

    /// The raw value.
    #[must_use]
    pub const fn into_raw(self) -> u32 {
        self.raw
    }

    const fn as_usize(self) -> usize {
        self.raw as usize
    }
}

// Manual impls: deriving would put bounds on `T`.
impl<T> Clone for Idx<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Idx<T> {}

impl<T> PartialEq for Idx<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Idx<T> {}

impl<T> PartialOrd for Idx<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Idx<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Hash for Idx<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Idx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = std::any::type_name::<T>();
        let short = name.rsplit("::").next().unwrap_or(name);
        write!(f, "Idx::<{short}>({})", self.raw)
    }
}

/// Length of an arena at some point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ArenaCheckpoint(u32);

/// Append-only storage addressed by [`Idx<T>`].
#[derive(Clone)]
pub struct Arena<T> {
    data: Vec<T>,
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Stores `value` and returns its index.
    pub fn alloc(&mut self, value: T) -> Idx<T> {
        let idx = Idx::from_raw(self.data.len() as u32);
        self.data.push(value);
        idx
    }

    /// Index the next allocation will receive.
    #[must_use]
    pub fn next_idx(&self) -> Idx<T> {
        Idx::from_raw(self.data.len() as u32)
    }

    /// Returns the value at `idx`, or `None` if it was truncated away.
    #[must_use]
    pub fn get(&self, idx: Idx<T>) -> Option<&T> {
        self.data.get(idx.as_usize())
    }

    /// Mutable variant of [`Arena::get`].
    pub fn get_mut(&mut self, idx: Idx<T>) -> Option<&mut T> {
        self.data.get_mut(idx.as_usize())
    }

    /// Whether `idx` addresses a live value.
    #[must_use]
    pub fn contains(&self, idx: Idx<T>) -> bool {
        idx.as_usize() < self.data.len()
    }

    /// Number of live values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when nothing has been allocated (or everything was truncated).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Records the current length.
    #[must_use]
    pub fn checkpoint(&self) -> ArenaCheckpoint {
        ArenaCheckpoint(self.data.len() as u32)
    }

    /// Drops every value allocated after `checkpoint`.
    ///
    /// Truncating to a checkpoint taken after the current length is a no-op.
    pub fn truncate(&mut self, checkpoint: ArenaCheckpoint) {
        self.data.truncate(checkpoint.0 as usize);
    }

    /// Iterates over `(index, value)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (Idx<T>, &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, value)| (Idx::from_raw(i as u32), value))
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T> Index<Idx<T>> for Arena<T> {
    type Output = T;

    fn index(&self, idx: Idx<T>) -> &T {
        &self.data[idx.as_usize()]
    }
}

impl<T> IndexMut<Idx<T>> for Arena<T> {
    fn index_mut(&mut self, idx: Idx<T>) -> &mut T {
        &mut self.data[idx.as_usize()]
    }
}
