//! # Sparse Set
//!
//! Index → value storage with O(1) insert, lookup and swap-remove.
//!
//! ```text
//! sparse: [ 1 | - | 0 | - | 2 ]      index → dense position (or INVALID)
//! dense:  [(2,c) | (0,a) | (4,e)]    dense position → (index, value)
//! ```
//!
//! Iteration walks the dense array, so it is contiguous and cache-friendly.
//! Dense order is insertion order perturbed by swap-removes, *not* index
//! order.
//!
//! Two dense layouts are available:
//! - [`Parallel`]: keys and values in two parallel vectors (default)
//! - [`Packed`]: `(key, value)` pairs in a single vector (`pack` feature)

// SAFETY: raw value pointers are handed to views so they can yield disjoint
// `&mut T` into the dense array without retagging the whole buffer.
#![allow(unsafe_code)]

use std::fmt;
use std::hash::Hash;
use std::iter::{Copied, Map, Zip};
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

use super::actor::ActorIndex;
use crate::error::{AcsError, AcsResult};

// ============================================================================
// INDEX TYPES
// ============================================================================

/// Integer type usable as a sparse index.
///
/// The maximum value of the type is reserved as the `INVALID` sentinel and
/// can never be stored.
pub trait SparseIndex: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    /// Sentinel marking an empty sparse slot.
    const INVALID: Self;

    /// Widens the index to `usize`.
    fn to_usize(self) -> usize;

    /// Narrows a `usize` into the index type.
    fn from_usize(value: usize) -> Self;
}

macro_rules! impl_sparse_index {
    ($($ty:ty),+) => {
        $(
            impl SparseIndex for $ty {
                const INVALID: Self = <$ty>::MAX;

                #[inline]
                fn to_usize(self) -> usize {
                    self as usize
                }

                #[inline]
                fn from_usize(value: usize) -> Self {
                    debug_assert!(
                        <$ty>::try_from(value).is_ok_and(|v| v != Self::INVALID),
                        "value {value} does not fit the sparse index type"
                    );
                    value as $ty
                }
            }
        )+
    };
}

impl_sparse_index!(u16, u32, u64, usize);

// ============================================================================
// DENSE LAYOUTS
// ============================================================================

/// Backing store for the dense half of a [`SparseSet`].
///
/// Positions are always `< len()`; out-of-range positions panic.
pub trait DenseStore<I, T>: Default {
    /// Iterator over `(key, &value)` in dense order.
    type Iter<'a>: DoubleEndedIterator<Item = (I, &'a T)> + ExactSizeIterator
    where
        Self: 'a,
        T: 'a;

    /// Iterator over `(key, &mut value)` in dense order.
    type IterMut<'a>: DoubleEndedIterator<Item = (I, &'a mut T)> + ExactSizeIterator
    where
        Self: 'a,
        T: 'a;

    /// Creates a store with room for `capacity` elements.
    fn with_capacity(capacity: usize) -> Self;
    /// Number of stored elements.
    fn len(&self) -> usize;
    /// Appends an element.
    fn push(&mut self, key: I, value: T);
    /// Key stored at `pos`.
    fn key_at(&self, pos: usize) -> I;
    /// Value stored at `pos`.
    fn value_at(&self, pos: usize) -> &T;
    /// Mutable value stored at `pos`.
    fn value_at_mut(&mut self, pos: usize) -> &mut T;
    /// Raw pointer to the value at `pos`, without borrowing the buffer.
    fn value_ptr(&mut self, pos: usize) -> NonNull<T>;
    /// Moves the last element into `pos` and returns what was there.
    fn swap_remove(&mut self, pos: usize) -> (I, T);
    /// Removes every element.
    fn clear(&mut self);
    /// Reserves room for `additional` more elements.
    fn reserve(&mut self, additional: usize);
    /// Iterates `(key, &value)` pairs.
    fn iter<'a>(&'a self) -> Self::Iter<'a>
    where
        T: 'a;
    /// Iterates `(key, &mut value)` pairs.
    fn iter_mut<'a>(&'a mut self) -> Self::IterMut<'a>
    where
        T: 'a;
}

/// Selects the [`DenseStore`] a [`SparseSet`] uses.
pub trait DenseLayout: Send + Sync + 'static {
    /// The concrete store for an index/value pair.
    type Store<I: SparseIndex, T>: DenseStore<I, T>;
}

/// Keys and values kept in two parallel vectors.
#[derive(Clone, Copy, Debug, Default)]
pub struct Parallel;

/// Keys and values packed contiguously as `(key, value)` pairs.
#[derive(Clone, Copy, Debug, Default)]
pub struct Packed;

/// Layout used by component arrays.
#[cfg(not(feature = "pack"))]
pub type DefaultLayout = Parallel;

/// Layout used by component arrays.
#[cfg(feature = "pack")]
pub type DefaultLayout = Packed;

impl DenseLayout for Parallel {
    type Store<I: SparseIndex, T> = ParallelStore<I, T>;
}

impl DenseLayout for Packed {
    type Store<I: SparseIndex, T> = PackedStore<I, T>;
}

/// Dense store of the [`Parallel`] layout.
pub struct ParallelStore<I, T> {
    keys: Vec<I>,
    values: Vec<T>,
}

impl<I, T> Default for ParallelStore<I, T> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<I: SparseIndex, T> DenseStore<I, T> for ParallelStore<I, T> {
    type Iter<'a> = Zip<Copied<slice::Iter<'a, I>>, slice::Iter<'a, T>>
    where
        Self: 'a,
        T: 'a;

    type IterMut<'a> = Zip<Copied<slice::Iter<'a, I>>, slice::IterMut<'a, T>>
    where
        Self: 'a,
        T: 'a;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    fn push(&mut self, key: I, value: T) {
        self.keys.push(key);
        self.values.push(value);
    }

    #[inline]
    fn key_at(&self, pos: usize) -> I {
        self.keys[pos]
    }

    #[inline]
    fn value_at(&self, pos: usize) -> &T {
        &self.values[pos]
    }

    #[inline]
    fn value_at_mut(&mut self, pos: usize) -> &mut T {
        &mut self.values[pos]
    }

    #[inline]
    fn value_ptr(&mut self, pos: usize) -> NonNull<T> {
        assert!(pos < self.values.len(), "dense position out of bounds");
        // SAFETY: `pos` is in bounds and `as_mut_ptr` does not materialise a
        // reference to the buffer, so previously handed out pointers stay valid.
        unsafe { NonNull::new_unchecked(self.values.as_mut_ptr().add(pos)) }
    }

    #[inline]
    fn swap_remove(&mut self, pos: usize) -> (I, T) {
        (self.keys.swap_remove(pos), self.values.swap_remove(pos))
    }

    fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.keys.reserve(additional);
        self.values.reserve(additional);
    }

    fn iter<'a>(&'a self) -> Self::Iter<'a>
    where
        T: 'a,
    {
        self.keys.iter().copied().zip(self.values.iter())
    }

    fn iter_mut<'a>(&'a mut self) -> Self::IterMut<'a>
    where
        T: 'a,
    {
        self.keys.iter().copied().zip(self.values.iter_mut())
    }
}

/// Dense store of the [`Packed`] layout.
pub struct PackedStore<I, T> {
    pairs: Vec<(I, T)>,
}

impl<I, T> Default for PackedStore<I, T> {
    fn default() -> Self {
        Self { pairs: Vec::new() }
    }
}

type PackedIter<'a, I, T> = Map<slice::Iter<'a, (I, T)>, for<'r> fn(&'r (I, T)) -> (I, &'r T)>;
type PackedIterMut<'a, I, T> =
    Map<slice::IterMut<'a, (I, T)>, for<'r> fn(&'r mut (I, T)) -> (I, &'r mut T)>;

fn split_pair<I: Copy, T>(pair: &(I, T)) -> (I, &T) {
    (pair.0, &pair.1)
}

fn split_pair_mut<I: Copy, T>(pair: &mut (I, T)) -> (I, &mut T) {
    (pair.0, &mut pair.1)
}

impl<I: SparseIndex, T> DenseStore<I, T> for PackedStore<I, T> {
    type Iter<'a> = PackedIter<'a, I, T>
    where
        Self: 'a,
        T: 'a;

    type IterMut<'a> = PackedIterMut<'a, I, T>
    where
        Self: 'a,
        T: 'a;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    fn push(&mut self, key: I, value: T) {
        self.pairs.push((key, value));
    }

    #[inline]
    fn key_at(&self, pos: usize) -> I {
        assert!(pos < self.pairs.len(), "dense position out of bounds");
        // SAFETY: `pos` is in bounds. Reading through the raw pair pointer keeps
        // `&mut T` handed out by `value_ptr` valid while a view walks the keys.
        unsafe { ptr::addr_of!((*self.pairs.as_ptr().add(pos)).0).read() }
    }

    #[inline]
    fn value_at(&self, pos: usize) -> &T {
        &self.pairs[pos].1
    }

    #[inline]
    fn value_at_mut(&mut self, pos: usize) -> &mut T {
        &mut self.pairs[pos].1
    }

    #[inline]
    fn value_ptr(&mut self, pos: usize) -> NonNull<T> {
        assert!(pos < self.pairs.len(), "dense position out of bounds");
        // SAFETY: `pos` is in bounds; the field address is taken through the
        // raw pair pointer without creating an intermediate reference.
        unsafe {
            let pair = self.pairs.as_mut_ptr().add(pos);
            NonNull::new_unchecked(ptr::addr_of_mut!((*pair).1))
        }
    }

    #[inline]
    fn swap_remove(&mut self, pos: usize) -> (I, T) {
        self.pairs.swap_remove(pos)
    }

    fn clear(&mut self) {
        self.pairs.clear();
    }

    fn reserve(&mut self, additional: usize) {
        self.pairs.reserve(additional);
    }

    fn iter<'a>(&'a self) -> Self::Iter<'a>
    where
        T: 'a,
    {
        self.pairs
            .iter()
            .map(split_pair as for<'r> fn(&'r (I, T)) -> (I, &'r T))
    }

    fn iter_mut<'a>(&'a mut self) -> Self::IterMut<'a>
    where
        T: 'a,
    {
        self.pairs
            .iter_mut()
            .map(split_pair_mut as for<'r> fn(&'r mut (I, T)) -> (I, &'r mut T))
    }
}

// ============================================================================
// SPARSE SET
// ============================================================================

/// Sparse-set container mapping indices to values.
///
/// # Type Parameters
///
/// * `T` - The stored value type
/// * `I` - The index type (its `MAX` is reserved as a sentinel)
/// * `L` - The dense layout ([`Parallel`] or [`Packed`])
///
/// # Invariant
///
/// For every index `i` with `sparse[i] != INVALID`, the dense element at
/// position `sparse[i]` is owned by `i`, and the key stored alongside it
/// equals `i`.
///
/// # Example
///
/// ```rust
/// use arc_acs::SparseSet;
///
/// let mut set: SparseSet<&str> = SparseSet::new();
/// assert!(set.add(7, "seven"));
/// assert!(!set.add(7, "again"));
/// assert_eq!(set.try_get(7), Some(&"seven"));
/// assert_eq!(set.try_remove(7), Some("seven"));
/// assert!(set.is_empty());
/// ```
pub struct SparseSet<T, I: SparseIndex = ActorIndex, L: DenseLayout = DefaultLayout> {
    /// Index → dense position, `INVALID` when absent.
    sparse: Vec<I>,
    /// Dense keys and values.
    dense: L::Store<I, T>,
}

impl<T, I: SparseIndex, L: DenseLayout> SparseSet<T, I, L> {
    /// Creates an empty set without allocating.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            dense: <L::Store<I, T> as Default>::default(),
        }
    }

    /// Creates an empty set with pre-allocated sparse and dense capacity.
    ///
    /// # Arguments
    ///
    /// * `sparse` - Number of sparse slots to reserve (highest expected index + 1)
    /// * `dense` - Number of elements to reserve
    #[must_use]
    pub fn with_capacity(sparse: usize, dense: usize) -> Self {
        Self {
            sparse: Vec::with_capacity(sparse),
            dense: <L::Store<I, T> as DenseStore<I, T>>::with_capacity(dense),
        }
    }

    /// Returns the number of stored elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Returns `true` if no element is stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.len() == 0
    }

    /// Returns the length of the sparse array (highest index ever inserted + 1).
    #[inline]
    #[must_use]
    pub fn sparse_len(&self) -> usize {
        self.sparse.len()
    }

    /// Dense position of `index`, if present.
    #[inline]
    #[must_use]
    pub fn position_of(&self, index: I) -> Option<usize> {
        let slot = *self.sparse.get(index.to_usize())?;
        (slot != I::INVALID).then(|| slot.to_usize())
    }

    /// Key stored at dense position `pos`.
    #[inline]
    #[must_use]
    pub fn key_at(&self, pos: usize) -> Option<I> {
        (pos < self.dense.len()).then(|| self.dense.key_at(pos))
    }

    /// Checks whether `index` holds an element.
    #[inline]
    #[must_use]
    pub fn contains(&self, index: I) -> bool {
        self.position_of(index).is_some()
    }

    /// Inserts `value` at `index` if the slot is empty.
    ///
    /// Grows the sparse array when `index` is beyond its current length.
    ///
    /// # Returns
    ///
    /// `true` if inserted, `false` if an element already existed (the
    /// existing value is left untouched and `value` is dropped).
    ///
    /// # Panics
    ///
    /// Panics if `index` is the reserved `INVALID` sentinel.
    pub fn add(&mut self, index: I, value: T) -> bool {
        assert!(index != I::INVALID, "sparse index {index:?} is reserved");
        if self.contains(index) {
            return false;
        }
        self.insert_new(index, value);
        true
    }

    /// Inserts or overwrites the value at `index`.
    ///
    /// # Returns
    ///
    /// The previous value, if one was overwritten.
    ///
    /// # Panics
    ///
    /// Panics if `index` is the reserved `INVALID` sentinel.
    pub fn set(&mut self, index: I, value: T) -> Option<T> {
        assert!(index != I::INVALID, "sparse index {index:?} is reserved");
        match self.position_of(index) {
            Some(pos) => Some(mem::replace(self.dense.value_at_mut(pos), value)),
            None => {
                self.insert_new(index, value);
                None
            }
        }
    }

    fn insert_new(&mut self, index: I, value: T) {
        let slot = index.to_usize();
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, I::INVALID);
        }
        self.sparse[slot] = I::from_usize(self.dense.len());
        self.dense.push(index, value);
    }

    /// Gets the value at `index`.
    #[inline]
    #[must_use]
    pub fn try_get(&self, index: I) -> Option<&T> {
        self.position_of(index).map(|pos| self.dense.value_at(pos))
    }

    /// Gets the mutable value at `index`.
    #[inline]
    pub fn try_get_mut(&mut self, index: I) -> Option<&mut T> {
        let pos = self.position_of(index)?;
        Some(self.dense.value_at_mut(pos))
    }

    /// Gets the value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AcsError::InvalidIndex`] if `index` holds no element.
    #[inline]
    pub fn get(&self, index: I) -> AcsResult<&T> {
        self.try_get(index).ok_or(AcsError::InvalidIndex {
            index: index.to_usize(),
        })
    }

    /// Gets the mutable value at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AcsError::InvalidIndex`] if `index` holds no element.
    #[inline]
    pub fn get_mut(&mut self, index: I) -> AcsResult<&mut T> {
        self.try_get_mut(index).ok_or(AcsError::InvalidIndex {
            index: index.to_usize(),
        })
    }

    /// Removes the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AcsError::InvalidIndex`] if `index` holds no element.
    pub fn remove(&mut self, index: I) -> AcsResult<T> {
        self.try_remove(index).ok_or(AcsError::InvalidIndex {
            index: index.to_usize(),
        })
    }

    /// Removes the element at `index` with an O(1) swap-remove.
    ///
    /// The last dense element moves into the freed position and its sparse
    /// entry is updated, so dense order changes.
    ///
    /// # Returns
    ///
    /// The removed value, or `None` if `index` was empty.
    pub fn try_remove(&mut self, index: I) -> Option<T> {
        let pos = self.position_of(index)?;
        let (removed, value) = self.dense.swap_remove(pos);
        debug_assert_eq!(removed, index, "dense key does not match sparse link");

        if pos < self.dense.len() {
            let moved = self.dense.key_at(pos);
            self.sparse[moved.to_usize()] = I::from_usize(pos);
        }
        self.sparse[index.to_usize()] = I::INVALID;

        #[cfg(feature = "runtime-checks")]
        self.verify_links(index, pos);

        Some(value)
    }

    #[cfg(feature = "runtime-checks")]
    fn verify_links(&self, removed: I, pos: usize) {
        assert!(
            self.sparse[removed.to_usize()] == I::INVALID,
            "removed index {removed:?} still linked"
        );
        if pos < self.dense.len() {
            let moved = self.dense.key_at(pos);
            assert!(
                self.position_of(moved) == Some(pos),
                "relocated index {moved:?} lost its sparse link"
            );
        }
    }

    /// Removes every element, keeping allocated capacity.
    pub fn clear(&mut self) {
        self.sparse.clear();
        self.dense.clear();
    }

    /// Reserves room for `additional` more dense elements.
    pub fn reserve(&mut self, additional: usize) {
        self.dense.reserve(additional);
    }

    /// Iterates `(index, &value)` in dense order.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (I, &T)> + ExactSizeIterator + '_ {
        self.dense.iter()
    }

    /// Iterates `(index, &mut value)` in dense order.
    #[inline]
    pub fn iter_mut(
        &mut self,
    ) -> impl DoubleEndedIterator<Item = (I, &mut T)> + ExactSizeIterator + '_ {
        self.dense.iter_mut()
    }

    /// Iterates stored indices in dense order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = I> + '_ {
        self.dense.iter().map(|(key, _)| key)
    }

    /// Key at a dense position known to be in bounds.
    #[inline]
    pub(crate) fn dense_key(&self, pos: usize) -> I {
        self.dense.key_at(pos)
    }

    /// Raw pointer to the value at `index`, without borrowing other elements.
    #[inline]
    pub(crate) fn value_ptr(&mut self, index: I) -> Option<NonNull<T>> {
        let pos = self.position_of(index)?;
        Some(self.dense.value_ptr(pos))
    }
}

impl<T, I: SparseIndex, L: DenseLayout> Default for SparseSet<T, I, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, I: SparseIndex, L: DenseLayout> fmt::Debug for SparseSet<T, I, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparseSet")
            .field("len", &self.len())
            .field("sparse_len", &self.sparse_len())
            .finish()
    }
}
