//! # Component Views
//!
//! Iteration over every actor that owns *all* of a tuple of component types.
//!
//! ```text
//! A: [0 1 2 3 4 5 6 7]      8 elements
//! B: [1 3 5 7]              4 elements  <- driver (smallest)
//! C: [3 4 5 6 7 8]          6 elements
//!
//! walk B's dense array, look up A and C: yields 3, 5, 7
//! ```
//!
//! The driver is chosen once, when the view is built: the smallest array,
//! ties going to the earliest type in the tuple. Its key lookup is stored as
//! a function pointer so the iterators never branch on which column drives.
//!
//! A view borrows the provider for its whole lifetime, so components cannot
//! be added or removed while one is alive.

// SAFETY: views keep raw pointers to the component arrays they read. The
// `'w` borrow on the provider keeps those arrays alive and structurally
// frozen, and distinct component types live in distinct arrays, so the
// references handed out never alias.
#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::ptr::NonNull;

use super::actor::{ActorId, ActorIndex};
use super::component::{component_name, Component, ComponentTypeId};
use super::registry::{ComponentArray, ComponentProvider};
use crate::error::{AcsError, AcsResult};

mod sealed {
    pub trait Sealed {}
}

/// Reads the actor index stored at a dense position of the driving column.
#[doc(hidden)]
pub type KeyAt<C> = unsafe fn(&C, usize) -> ActorIndex;

/// The column a view walks.
#[doc(hidden)]
pub struct Driver<C> {
    /// Position of the column in the query tuple.
    pub slot: usize,
    /// Type name of the driving component.
    pub component: &'static str,
    /// Number of elements in the driving column.
    pub len: usize,
    /// Key lookup specialised for the driving column.
    pub key_at: KeyAt<C>,
}

impl<C> Clone for Driver<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Driver<C> {}

/// A tuple of component types a view can iterate.
///
/// Implemented for `(A,)` through `(A, B, C, D, E, F, G, H)`; cannot be
/// implemented outside this crate.
pub trait ViewQuery: sealed::Sealed + 'static {
    /// Shared references to one actor's components.
    type Item<'a>;
    /// Exclusive references to one actor's components.
    type ItemMut<'a>;

    #[doc(hidden)]
    type Columns: Copy;

    #[doc(hidden)]
    fn check_distinct() -> AcsResult<()>;

    #[doc(hidden)]
    fn columns(provider: &ComponentProvider) -> AcsResult<Self::Columns>;

    #[doc(hidden)]
    fn columns_mut(provider: &mut ComponentProvider) -> AcsResult<Self::Columns>;

    /// # Safety
    ///
    /// Every column pointer must be live.
    #[doc(hidden)]
    unsafe fn driver(columns: &Self::Columns) -> Driver<Self::Columns>;

    /// # Safety
    ///
    /// Every column pointer must be live and not mutably aliased for `'a`.
    #[doc(hidden)]
    unsafe fn fetch<'a>(columns: &Self::Columns, index: ActorIndex) -> Option<Self::Item<'a>>;

    /// # Safety
    ///
    /// Columns must come from [`ViewQuery::columns_mut`], be live for `'a`,
    /// and no other reference to `index`'s components may exist for `'a`.
    #[doc(hidden)]
    unsafe fn fetch_mut<'a>(
        columns: &Self::Columns,
        index: ActorIndex,
    ) -> Option<Self::ItemMut<'a>>;
}

fn ensure_distinct(components: &[(ComponentTypeId, &'static str)]) -> AcsResult<()> {
    for (i, &(id, name)) in components.iter().enumerate() {
        if components[..i].iter().any(|&(other, _)| other == id) {
            return Err(AcsError::DuplicateViewComponent { component: name });
        }
    }
    Ok(())
}

fn pick_driver<C, const N: usize>(candidates: [Driver<C>; N]) -> Driver<C> {
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        if candidate.len < best.len {
            best = *candidate;
        }
    }
    best
}

macro_rules! impl_view_query {
    ($($T:ident $idx:tt),+) => {
        impl<$($T: Component),+> sealed::Sealed for ($($T,)+) {}

        impl<$($T: Component),+> ViewQuery for ($($T,)+) {
            type Item<'a> = ($(&'a $T,)+);
            type ItemMut<'a> = ($(&'a mut $T,)+);
            type Columns = ($(NonNull<ComponentArray<$T>>,)+);

            fn check_distinct() -> AcsResult<()> {
                ensure_distinct(&[$(($T::ID, component_name::<$T>()),)+])
            }

            fn columns(provider: &ComponentProvider) -> AcsResult<Self::Columns> {
                Ok(($(provider.array_ptr::<$T>()?,)+))
            }

            fn columns_mut(provider: &mut ComponentProvider) -> AcsResult<Self::Columns> {
                Ok(($(provider.array_ptr_mut::<$T>()?,)+))
            }

            unsafe fn driver(columns: &Self::Columns) -> Driver<Self::Columns> {
                pick_driver([$(
                    Driver {
                        slot: $idx,
                        component: component_name::<$T>(),
                        // SAFETY: the caller guarantees the column is live.
                        len: unsafe { columns.$idx.as_ref() }.len(),
                        key_at: |columns: &Self::Columns, pos: usize| {
                            // SAFETY: the iterator only passes in-bounds positions
                            // of a live column.
                            unsafe { columns.$idx.as_ref().dense_key(pos) }
                        },
                    },
                )+])
            }

            unsafe fn fetch<'a>(
                columns: &Self::Columns,
                index: ActorIndex,
            ) -> Option<Self::Item<'a>> {
                // SAFETY: the caller guarantees the columns are live for 'a.
                Some(($(unsafe { &*columns.$idx.as_ptr() }.try_get(index)?,)+))
            }

            unsafe fn fetch_mut<'a>(
                columns: &Self::Columns,
                index: ActorIndex,
            ) -> Option<Self::ItemMut<'a>> {
                // SAFETY: each column is a distinct array and each index is
                // fetched once per iteration, so the `&mut` never alias.
                Some(($(unsafe { (*columns.$idx.as_ptr()).value_ptr(index)?.as_mut() },)+))
            }
        }
    };
}

impl_view_query!(A 0);
impl_view_query!(A 0, B 1);
impl_view_query!(A 0, B 1, C 2);
impl_view_query!(A 0, B 1, C 2, D 3);
impl_view_query!(A 0, B 1, C 2, D 3, E 4);
impl_view_query!(A 0, B 1, C 2, D 3, E 4, F 5);
impl_view_query!(A 0, B 1, C 2, D 3, E 4, F 5, G 6);
impl_view_query!(A 0, B 1, C 2, D 3, E 4, F 5, G 6, H 7);

// ============================================================================
// VIEWS
// ============================================================================

/// Read-write view over the actors owning every component in `Q`.
///
/// # Example
///
/// ```rust
/// use arc_acs::{ActorId, ComponentProvider, ComponentView};
///
/// struct Position(f32);
/// struct Velocity(f32);
/// arc_acs::component!(Position, 0);
/// arc_acs::component!(Velocity, 1);
///
/// let mut provider = ComponentProvider::default();
/// provider.create_array::<Position>().unwrap();
/// provider.create_array::<Velocity>().unwrap();
/// let actor = ActorId::from_index(0);
/// provider.add_component(actor, Position(0.0)).unwrap();
/// provider.add_component(actor, Velocity(2.0)).unwrap();
///
/// let mut view = ComponentView::<(Position, Velocity)>::new(&mut provider).unwrap();
/// for (_, (pos, vel)) in view.iter_mut() {
///     pos.0 += vel.0;
/// }
/// assert_eq!(provider.get_component::<Position>(actor).unwrap().0, 2.0);
/// ```
pub struct ComponentView<'w, Q: ViewQuery> {
    columns: Q::Columns,
    driver: Driver<Q::Columns>,
    _provider: PhantomData<&'w mut ComponentProvider>,
}

impl<'w, Q: ViewQuery> ComponentView<'w, Q> {
    /// Builds a view, choosing the smallest column as driver.
    ///
    /// # Errors
    ///
    /// - [`AcsError::DuplicateViewComponent`] if a type appears twice
    /// - any error of [`ComponentProvider::array`] for an unusable type
    pub fn new(provider: &'w mut ComponentProvider) -> AcsResult<Self> {
        Q::check_distinct()?;
        let columns = Q::columns_mut(provider)?;
        // SAFETY: the columns were just taken from the borrowed provider.
        let driver = unsafe { Q::driver(&columns) };
        Ok(Self {
            columns,
            driver,
            _provider: PhantomData,
        })
    }

    /// Iterates `(actor, (&A, &B, ..))`.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, Q> {
        Iter::new(self.columns, self.driver)
    }

    /// Iterates `(actor, (&mut A, &mut B, ..))`.
    #[must_use]
    pub fn iter_mut(&mut self) -> IterMut<'_, Q> {
        IterMut {
            columns: self.columns,
            key_at: self.driver.key_at,
            front: 0,
            back: self.driver.len,
            _view: PhantomData,
        }
    }

    /// Number of elements in the driving column, an upper bound on yields.
    #[inline]
    #[must_use]
    pub fn driver_len(&self) -> usize {
        self.driver.len
    }

    /// Type name of the driving component.
    #[inline]
    #[must_use]
    pub fn driving_component(&self) -> &'static str {
        self.driver.component
    }

    /// Position of the driving component in `Q`.
    #[inline]
    #[must_use]
    pub fn driving_slot(&self) -> usize {
        self.driver.slot
    }

    /// `true` when the driving column is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.driver.len == 0
    }
}

impl<'v, 'w, Q: ViewQuery> IntoIterator for &'v ComponentView<'w, Q> {
    type Item = (ActorId, Q::Item<'v>);
    type IntoIter = Iter<'v, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'v, 'w, Q: ViewQuery> IntoIterator for &'v mut ComponentView<'w, Q> {
    type Item = (ActorId, Q::ItemMut<'v>);
    type IntoIter = IterMut<'v, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Read-only view over the actors owning every component in `Q`.
pub struct ConstComponentView<'w, Q: ViewQuery> {
    columns: Q::Columns,
    driver: Driver<Q::Columns>,
    _provider: PhantomData<&'w ComponentProvider>,
}

impl<'w, Q: ViewQuery> ConstComponentView<'w, Q> {
    /// Builds a read-only view, choosing the smallest column as driver.
    ///
    /// # Errors
    ///
    /// Same as [`ComponentView::new`].
    pub fn new(provider: &'w ComponentProvider) -> AcsResult<Self> {
        Q::check_distinct()?;
        let columns = Q::columns(provider)?;
        // SAFETY: the columns were just taken from the borrowed provider.
        let driver = unsafe { Q::driver(&columns) };
        Ok(Self {
            columns,
            driver,
            _provider: PhantomData,
        })
    }

    /// Iterates `(actor, (&A, &B, ..))`.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, Q> {
        Iter::new(self.columns, self.driver)
    }

    /// Number of elements in the driving column.
    #[inline]
    #[must_use]
    pub fn driver_len(&self) -> usize {
        self.driver.len
    }

    /// Type name of the driving component.
    #[inline]
    #[must_use]
    pub fn driving_component(&self) -> &'static str {
        self.driver.component
    }

    /// `true` when the driving column is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.driver.len == 0
    }
}

impl<'v, 'w, Q: ViewQuery> IntoIterator for &'v ConstComponentView<'w, Q> {
    type Item = (ActorId, Q::Item<'v>);
    type IntoIter = Iter<'v, Q>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// ITERATORS
// ============================================================================

/// Shared iterator over a view. `.rev()` walks the driver back to front.
pub struct Iter<'v, Q: ViewQuery> {
    columns: Q::Columns,
    key_at: KeyAt<Q::Columns>,
    front: usize,
    back: usize,
    _view: PhantomData<&'v ()>,
}

impl<'v, Q: ViewQuery> Iter<'v, Q> {
    fn new(columns: Q::Columns, driver: Driver<Q::Columns>) -> Self {
        Self {
            columns,
            key_at: driver.key_at,
            front: 0,
            back: driver.len,
            _view: PhantomData,
        }
    }

    fn yield_at(&self, pos: usize) -> Option<(ActorId, Q::Item<'v>)> {
        // SAFETY: `pos < back <= driver.len`, and the view's borrow keeps
        // every column live and unchanged for 'v.
        unsafe {
            let index = (self.key_at)(&self.columns, pos);
            Q::fetch(&self.columns, index).map(|item| (ActorId::from_index(index), item))
        }
    }
}

impl<'v, Q: ViewQuery> Iterator for Iter<'v, Q> {
    type Item = (ActorId, Q::Item<'v>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            let pos = self.front;
            self.front += 1;
            if let Some(found) = self.yield_at(pos) {
                return Some(found);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.back - self.front))
    }
}

impl<'v, Q: ViewQuery> DoubleEndedIterator for Iter<'v, Q> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            self.back -= 1;
            if let Some(found) = self.yield_at(self.back) {
                return Some(found);
            }
        }
        None
    }
}

/// Exclusive iterator over a view. `.rev()` walks the driver back to front.
pub struct IterMut<'v, Q: ViewQuery> {
    columns: Q::Columns,
    key_at: KeyAt<Q::Columns>,
    front: usize,
    back: usize,
    _view: PhantomData<&'v mut ()>,
}

impl<'v, Q: ViewQuery> IterMut<'v, Q> {
    fn yield_at(&mut self, pos: usize) -> Option<(ActorId, Q::ItemMut<'v>)> {
        // SAFETY: each dense position is visited once from either end, and a
        // driver position maps to exactly one actor, so no two yielded
        // tuples share a component.
        unsafe {
            let index = (self.key_at)(&self.columns, pos);
            Q::fetch_mut(&self.columns, index).map(|item| (ActorId::from_index(index), item))
        }
    }
}

impl<'v, Q: ViewQuery> Iterator for IterMut<'v, Q> {
    type Item = (ActorId, Q::ItemMut<'v>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            let pos = self.front;
            self.front += 1;
            if let Some(found) = self.yield_at(pos) {
                return Some(found);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.back - self.front))
    }
}

impl<'v, Q: ViewQuery> DoubleEndedIterator for IterMut<'v, Q> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while self.front < self.back {
            self.back -= 1;
            if let Some(found) = self.yield_at(self.back) {
                return Some(found);
            }
        }
        None
    }
}
