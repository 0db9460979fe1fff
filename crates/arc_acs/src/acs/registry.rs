//! # Component Provider
//!
//! The type registry: one [`SparseSet`] per registered component type,
//! held type-erased in a fixed-capacity slot table addressed by
//! [`Component::ID`].
//!
//! Every typed access checks the slot's stored `TypeId` and downcasts, so a
//! type mismatch is a hard error in every build mode, never a silent
//! reinterpretation.

use std::any::{Any, TypeId};
use std::ptr::NonNull;

use super::actor::{ActorId, ActorIndex};
use super::component::{component_name, Component, ComponentTypeId};
use super::sparse_set::{DefaultLayout, SparseSet};
use crate::config::AcsConfig;
use crate::error::{AcsError, AcsResult};

/// Storage for one component type, indexed by actor.
pub type ComponentArray<T> = SparseSet<T, ActorIndex, DefaultLayout>;

/// Type-erased operations every component array supports.
pub(crate) trait ErasedArray: Any + Send + Sync {
    fn len(&self) -> usize;
    fn contains(&self, actor: ActorIndex) -> bool;
    fn remove(&mut self, actor: ActorIndex) -> bool;
    fn clear(&mut self);
    /// Name of the component type the array stores.
    fn stored_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedArray for ComponentArray<T> {
    fn len(&self) -> usize {
        SparseSet::len(self)
    }

    fn contains(&self, actor: ActorIndex) -> bool {
        SparseSet::contains(self, actor)
    }

    fn remove(&mut self, actor: ActorIndex) -> bool {
        self.try_remove(actor).is_some()
    }

    fn clear(&mut self) {
        SparseSet::clear(self);
    }

    fn stored_name(&self) -> &'static str {
        component_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// One occupied registry slot.
struct ArraySlot {
    type_id: TypeId,
    type_name: &'static str,
    array: Box<dyn ErasedArray>,
}

/// Owns every component array.
///
/// Components are exclusively owned by the provider on behalf of the actor
/// that created them; callers only ever receive borrowed references.
///
/// # Example
///
/// ```rust
/// use arc_acs::{ActorId, ComponentProvider};
///
/// struct Health(u32);
/// arc_acs::component!(Health, 0);
///
/// let mut provider = ComponentProvider::default();
/// provider.create_array::<Health>().unwrap();
///
/// let actor = ActorId::from_index(4);
/// assert!(provider.add_component(actor, Health(10)).unwrap());
/// assert_eq!(provider.get_component::<Health>(actor).unwrap().0, 10);
/// ```
pub struct ComponentProvider {
    /// Slot table indexed by component type id.
    slots: Box<[Option<ArraySlot>]>,
    /// Number of occupied slots.
    registered: usize,
    /// Reservation sizes for new arrays.
    config: AcsConfig,
}

impl ComponentProvider {
    /// Creates an empty provider with `config.max_components` slots.
    ///
    /// # Errors
    ///
    /// [`AcsError::InvalidConfig`] if `config` fails [`AcsConfig::validate`].
    pub fn new(config: AcsConfig) -> AcsResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Builds a provider from an already validated config.
    pub(crate) fn with_config(config: AcsConfig) -> Self {
        let slots = (0..config.max_components)
            .map(|_| None)
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            slots,
            registered: 0,
            config,
        }
    }

    /// Returns the number of component type slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of created arrays.
    #[inline]
    #[must_use]
    pub const fn registered_count(&self) -> usize {
        self.registered
    }

    /// Returns the configuration this provider was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &AcsConfig {
        &self.config
    }

    /// Iterates the ids of every created array, ascending.
    pub fn component_ids(&self) -> impl Iterator<Item = ComponentTypeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(id, _)| id as ComponentTypeId)
    }

    /// Allocates the array for `T`.
    ///
    /// # Returns
    ///
    /// `Ok(true)` if created, `Ok(false)` if it already existed (logged).
    ///
    /// # Errors
    ///
    /// - [`AcsError::CapacityExceeded`] if `T::ID` does not fit the slot table
    /// - [`AcsError::TypeMismatch`] if another type already owns `T::ID`
    pub fn create_array<T: Component>(&mut self) -> AcsResult<bool> {
        let capacity = self.slots.len();
        let Some(slot) = self.slots.get_mut(usize::from(T::ID)) else {
            tracing::warn!(
                "Cannot create array for {} (id {}): capacity is {}",
                component_name::<T>(),
                T::ID,
                capacity
            );
            return Err(AcsError::CapacityExceeded {
                id: T::ID,
                capacity,
            });
        };

        if let Some(existing) = slot {
            if existing.type_id != TypeId::of::<T>() {
                tracing::warn!(
                    "Cannot create array for {} (id {}): slot already holds {}",
                    component_name::<T>(),
                    T::ID,
                    existing.type_name
                );
                return Err(AcsError::TypeMismatch {
                    id: T::ID,
                    expected: component_name::<T>(),
                    found: existing.type_name,
                });
            }
            tracing::warn!(
                "Component array for {} (id {}) already exists",
                existing.type_name,
                T::ID
            );
            return Ok(false);
        }

        let array = ComponentArray::<T>::with_capacity(
            self.config.sparse_reserve,
            self.config.dense_reserve,
        );
        *slot = Some(ArraySlot {
            type_id: TypeId::of::<T>(),
            type_name: component_name::<T>(),
            array: Box::new(array),
        });
        self.registered += 1;

        tracing::debug!("Created component array {} (id {})", component_name::<T>(), T::ID);
        Ok(true)
    }

    /// Checks whether an array exists for `T`.
    #[must_use]
    pub fn has_array<T: Component>(&self) -> bool {
        self.slot::<T>().is_ok()
    }

    fn slot<T: Component>(&self) -> AcsResult<&ArraySlot> {
        let id = T::ID;
        let slot = self
            .slots
            .get(usize::from(id))
            .ok_or(AcsError::CapacityExceeded {
                id,
                capacity: self.slots.len(),
            })?
            .as_ref()
            .ok_or(AcsError::ComponentNotRegistered {
                component: component_name::<T>(),
                id,
            })?;

        if slot.type_id != TypeId::of::<T>() {
            return Err(AcsError::TypeMismatch {
                id,
                expected: component_name::<T>(),
                found: slot.type_name,
            });
        }
        Ok(slot)
    }

    /// Returns the array for `T`.
    ///
    /// # Errors
    ///
    /// Fails if the id is out of range, the array was never created, or the
    /// slot belongs to another type.
    pub fn array<T: Component>(&self) -> AcsResult<&ComponentArray<T>> {
        let slot = self.slot::<T>()?;
        slot.array
            .as_any()
            .downcast_ref::<ComponentArray<T>>()
            .ok_or(AcsError::TypeMismatch {
                id: T::ID,
                expected: component_name::<T>(),
                found: slot.type_name,
            })
    }

    /// Returns the mutable array for `T`.
    ///
    /// # Errors
    ///
    /// Same as [`ComponentProvider::array`].
    pub fn array_mut<T: Component>(&mut self) -> AcsResult<&mut ComponentArray<T>> {
        let found = self.slot::<T>()?.type_name;
        let slot = self.slots[usize::from(T::ID)]
            .as_mut()
            .ok_or(AcsError::ComponentNotRegistered {
                component: component_name::<T>(),
                id: T::ID,
            })?;
        slot.array
            .as_any_mut()
            .downcast_mut::<ComponentArray<T>>()
            .ok_or(AcsError::TypeMismatch {
                id: T::ID,
                expected: component_name::<T>(),
                found,
            })
    }

    /// Adds `component` to `actor` if it has none of this type yet.
    ///
    /// # Returns
    ///
    /// `Ok(false)` (and the existing value is kept) if already present.
    ///
    /// # Errors
    ///
    /// Fails if the array for `T` is unavailable.
    pub fn add_component<T: Component>(&mut self, actor: ActorId, component: T) -> AcsResult<bool> {
        Ok(self.array_mut::<T>()?.add(actor.index(), component))
    }

    /// Inserts or overwrites the component of `actor`.
    ///
    /// # Returns
    ///
    /// The overwritten value, if any.
    ///
    /// # Errors
    ///
    /// Fails if the array for `T` is unavailable.
    pub fn set_component<T: Component>(
        &mut self,
        actor: ActorId,
        component: T,
    ) -> AcsResult<Option<T>> {
        Ok(self.array_mut::<T>()?.set(actor.index(), component))
    }

    /// Gets the component of `actor`.
    ///
    /// # Errors
    ///
    /// [`AcsError::MissingComponent`] if the actor has none, or any error of
    /// [`ComponentProvider::array`].
    pub fn get_component<T: Component>(&self, actor: ActorId) -> AcsResult<&T> {
        self.array::<T>()?
            .try_get(actor.index())
            .ok_or(AcsError::MissingComponent {
                component: component_name::<T>(),
                actor,
            })
    }

    /// Gets the mutable component of `actor`.
    ///
    /// # Errors
    ///
    /// Same as [`ComponentProvider::get_component`].
    pub fn get_component_mut<T: Component>(&mut self, actor: ActorId) -> AcsResult<&mut T> {
        self.array_mut::<T>()?
            .try_get_mut(actor.index())
            .ok_or(AcsError::MissingComponent {
                component: component_name::<T>(),
                actor,
            })
    }

    /// Gets the component of `actor`, or `None` if absent or unregistered.
    #[must_use]
    pub fn try_get_component<T: Component>(&self, actor: ActorId) -> Option<&T> {
        self.array::<T>().ok()?.try_get(actor.index())
    }

    /// Gets the mutable component of `actor`, or `None` if absent or unregistered.
    pub fn try_get_component_mut<T: Component>(&mut self, actor: ActorId) -> Option<&mut T> {
        self.array_mut::<T>().ok()?.try_get_mut(actor.index())
    }

    /// Checks whether `actor` has a component of type `T`.
    #[must_use]
    pub fn contains_component<T: Component>(&self, actor: ActorId) -> bool {
        self.array::<T>()
            .is_ok_and(|array| array.contains(actor.index()))
    }

    /// Removes and returns the component of `actor`.
    ///
    /// # Errors
    ///
    /// Same as [`ComponentProvider::get_component`].
    pub fn remove_component<T: Component>(&mut self, actor: ActorId) -> AcsResult<T> {
        self.array_mut::<T>()?
            .try_remove(actor.index())
            .ok_or(AcsError::MissingComponent {
                component: component_name::<T>(),
                actor,
            })
    }

    /// Removes the component of `actor`, or `None` if absent or unregistered.
    pub fn try_remove_component<T: Component>(&mut self, actor: ActorId) -> Option<T> {
        self.array_mut::<T>().ok()?.try_remove(actor.index())
    }

    /// Number of components `actor` owns across all arrays.
    #[must_use]
    pub fn component_count(&self, actor: ActorId) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|slot| slot.array.contains(actor.index()))
            .count()
    }

    /// Total number of stored components across all arrays.
    #[must_use]
    pub fn total_components(&self) -> usize {
        self.slots.iter().flatten().map(|slot| slot.array.len()).sum()
    }

    /// Empties every array, keeping registrations.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut().flatten() {
            slot.array.clear();
        }
    }

    // ========================================================================
    // ERASED ACCESS (manager / observer / views)
    // ========================================================================

    /// Type-erased array at `id`.
    pub(crate) fn erased_mut(&mut self, id: ComponentTypeId) -> Option<&mut dyn ErasedArray> {
        let slot = self.slots.get_mut(usize::from(id))?.as_mut()?;
        let array: &mut dyn ErasedArray = &mut *slot.array;
        Some(array)
    }

    /// Checks whether the array at `id` holds `actor`.
    pub(crate) fn erased_contains(&self, id: ComponentTypeId, actor: ActorIndex) -> bool {
        self.slots
            .get(usize::from(id))
            .and_then(Option::as_ref)
            .is_some_and(|slot| slot.array.contains(actor))
    }

    /// Removes `actor` from the array at `id`.
    pub(crate) fn erased_remove(&mut self, id: ComponentTypeId, actor: ActorIndex) -> bool {
        self.erased_mut(id).is_some_and(|array| array.remove(actor))
    }

    /// Pointer to the array for `T`, for read-only view access.
    pub(crate) fn array_ptr<T: Component>(&self) -> AcsResult<NonNull<ComponentArray<T>>> {
        self.array::<T>().map(NonNull::from)
    }

    /// Pointer to the array for `T`, for read-write view access.
    pub(crate) fn array_ptr_mut<T: Component>(
        &mut self,
    ) -> AcsResult<NonNull<ComponentArray<T>>> {
        self.array_mut::<T>().map(NonNull::from)
    }
}

impl Default for ComponentProvider {
    fn default() -> Self {
        Self::with_config(AcsConfig::default())
    }
}
