//! # Component Observer
//!
//! Callbacks keyed by `(component type, event)`, run either immediately
//! ([`ComponentObserver::invoke_direct`]) or through a deferred queue
//! ([`ComponentObserver::record`] + [`ComponentObserver::invoke_all`]).
//!
//! The deferred queue holds at most one pending invocation per component
//! type. A later `record` for the same type replaces the earlier one. At
//! flush time the component is looked up again in the provider, so callbacks
//! always see it at its final address.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::actor::ActorId;
use super::component::{component_name, Component, ComponentTypeId};
use super::registry::{ComponentArray, ComponentProvider, ErasedArray};
use crate::error::{AcsError, AcsResult};

/// Lifecycle event of a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentEvent {
    /// The component was attached to its actor.
    Created,
    /// The component is about to be removed from its actor.
    Destroyed,
}

impl fmt::Display for ComponentEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Destroyed => f.write_str("destroyed"),
        }
    }
}

type Callback<T> = Box<dyn FnMut(&mut T, ActorId) + Send>;

/// Ordered callbacks for one component type and event.
struct CallbackList<T> {
    callbacks: Vec<Callback<T>>,
}

impl<T: Component> CallbackList<T> {
    fn new() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }

    fn run(&mut self, component: &mut T, actor: ActorId) -> usize {
        for callback in &mut self.callbacks {
            callback(component, actor);
        }
        self.callbacks.len()
    }
}

/// Type-erased side of a callback list.
trait Dispatch: Send {
    fn len(&self) -> usize;

    /// Looks `actor` up in `array` and runs every callback on it.
    fn invoke(&mut self, array: &mut dyn ErasedArray, actor: ActorId) -> AcsResult<usize>;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> Dispatch for CallbackList<T> {
    fn len(&self) -> usize {
        self.callbacks.len()
    }

    fn invoke(&mut self, array: &mut dyn ErasedArray, actor: ActorId) -> AcsResult<usize> {
        let found = array.stored_name();
        let array = array
            .as_any_mut()
            .downcast_mut::<ComponentArray<T>>()
            .ok_or(AcsError::TypeMismatch {
                id: T::ID,
                expected: component_name::<T>(),
                found,
            })?;

        match array.try_get_mut(actor.index()) {
            Some(component) => Ok(self.run(component, actor)),
            None => {
                tracing::trace!(
                    "{} of {} vanished before dispatch",
                    component_name::<T>(),
                    actor
                );
                Ok(0)
            }
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

struct SlotEntry {
    type_id: TypeId,
    type_name: &'static str,
    list: Box<dyn Dispatch>,
}

#[derive(Clone, Copy, Debug)]
struct PendingInvocation {
    event: ComponentEvent,
    actor: ActorId,
}

/// Event dispatcher for component lifecycle callbacks.
///
/// # Example
///
/// ```rust
/// use arc_acs::{ActorId, ComponentEvent, ComponentObserver, ComponentProvider};
///
/// struct Hp(u32);
/// arc_acs::component!(Hp, 0);
///
/// let mut provider = ComponentProvider::default();
/// provider.create_array::<Hp>().unwrap();
/// let actor = ActorId::from_index(0);
/// provider.add_component(actor, Hp(1)).unwrap();
///
/// let mut observer = ComponentObserver::new();
/// observer
///     .observe::<Hp>(ComponentEvent::Created, |hp, _| hp.0 = 100)
///     .unwrap();
/// observer.record::<Hp>(ComponentEvent::Created, actor);
/// assert_eq!(observer.invoke_all(&mut provider).unwrap(), 1);
/// assert_eq!(provider.get_component::<Hp>(actor).unwrap().0, 100);
/// ```
#[derive(Default)]
pub struct ComponentObserver {
    slots: HashMap<(ComponentTypeId, ComponentEvent), SlotEntry>,
    /// Ordered so flushes run in ascending type id.
    pending: BTreeMap<ComponentTypeId, PendingInvocation>,
}

impl ComponentObserver {
    /// Creates an observer with no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a callback for `event` on component type `T`.
    ///
    /// Callbacks for one `(T, event)` pair run in registration order.
    ///
    /// # Errors
    ///
    /// [`AcsError::TypeMismatch`] if callbacks for a different type are
    /// already registered under `T::ID`.
    pub fn observe<T: Component>(
        &mut self,
        event: ComponentEvent,
        callback: impl FnMut(&mut T, ActorId) + Send + 'static,
    ) -> AcsResult<()> {
        let list = self.list_mut::<T>(event)?;
        list.callbacks.push(Box::new(callback));
        tracing::trace!("Observing {} on {}", event, component_name::<T>());
        Ok(())
    }

    fn list_mut<T: Component>(&mut self, event: ComponentEvent) -> AcsResult<&mut CallbackList<T>> {
        let entry = self.slots.entry((T::ID, event)).or_insert_with(|| SlotEntry {
            type_id: TypeId::of::<T>(),
            type_name: component_name::<T>(),
            list: Box::new(CallbackList::<T>::new()),
        });
        let found = entry.type_name;

        if entry.type_id != TypeId::of::<T>() {
            return Err(AcsError::TypeMismatch {
                id: T::ID,
                expected: component_name::<T>(),
                found,
            });
        }
        entry
            .list
            .as_any_mut()
            .downcast_mut::<CallbackList<T>>()
            .ok_or(AcsError::TypeMismatch {
                id: T::ID,
                expected: component_name::<T>(),
                found,
            })
    }

    /// Runs every `(T, event)` callback on `component` right now.
    ///
    /// # Returns
    ///
    /// The number of callbacks run.
    ///
    /// # Errors
    ///
    /// [`AcsError::TypeMismatch`] if `T::ID` is observed for another type.
    pub fn invoke_direct<T: Component>(
        &mut self,
        event: ComponentEvent,
        component: &mut T,
        actor: ActorId,
    ) -> AcsResult<usize> {
        let Some(entry) = self.slots.get_mut(&(T::ID, event)) else {
            return Ok(0);
        };
        let found = entry.type_name;
        let list = entry
            .list
            .as_any_mut()
            .downcast_mut::<CallbackList<T>>()
            .ok_or(AcsError::TypeMismatch {
                id: T::ID,
                expected: component_name::<T>(),
                found,
            })?;

        tracing::trace!("Dispatching {} {} for {}", component_name::<T>(), event, actor);
        Ok(list.run(component, actor))
    }

    /// Queues `event` for `T` on `actor`, replacing any pending entry for `T`.
    pub fn record<T: Component>(&mut self, event: ComponentEvent, actor: ActorId) {
        let next = PendingInvocation { event, actor };
        if let Some(prev) = self.pending.insert(T::ID, next) {
            tracing::trace!(
                "Pending {} {} for {} replaced by {} for {}",
                component_name::<T>(),
                prev.event,
                prev.actor,
                event,
                actor
            );
        }
    }

    /// Flushes the deferred queue against `provider`.
    ///
    /// The queue is empty afterwards even if a dispatch fails.
    ///
    /// # Returns
    ///
    /// The total number of callbacks run.
    ///
    /// # Errors
    ///
    /// The first dispatch error; remaining entries are still dispatched.
    pub fn invoke_all(&mut self, provider: &mut ComponentProvider) -> AcsResult<usize> {
        let pending = std::mem::take(&mut self.pending);
        let mut invoked = 0;
        let mut first_error = None;

        for (id, PendingInvocation { event, actor }) in pending {
            match self.dispatch(id, event, provider, actor) {
                Ok(n) => invoked += n,
                Err(e) => {
                    tracing::warn!("Deferred {} dispatch for {} failed: {}", event, actor, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(invoked),
        }
    }

    /// Runs the callbacks of `(id, event)` on the component `actor` owns in
    /// `provider`.
    pub(crate) fn dispatch(
        &mut self,
        id: ComponentTypeId,
        event: ComponentEvent,
        provider: &mut ComponentProvider,
        actor: ActorId,
    ) -> AcsResult<usize> {
        let Some(entry) = self.slots.get_mut(&(id, event)) else {
            return Ok(0);
        };
        if entry.list.len() == 0 {
            return Ok(0);
        }
        let array = provider
            .erased_mut(id)
            .ok_or(AcsError::ComponentNotRegistered {
                component: entry.type_name,
                id,
            })?;

        tracing::trace!("Dispatching {} {} for {}", entry.type_name, event, actor);
        entry.list.invoke(array, actor)
    }

    /// Drops both event lists of `T`.
    pub fn clear<T: Component>(&mut self) {
        self.slots.remove(&(T::ID, ComponentEvent::Created));
        self.slots.remove(&(T::ID, ComponentEvent::Destroyed));
    }

    /// Drops every callback of every type.
    pub fn clear_all(&mut self) {
        self.slots.clear();
    }

    /// Empties the deferred queue without running anything.
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }

    /// Number of queued invocations.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of callbacks registered for `(T, event)`.
    #[must_use]
    pub fn callback_count<T: Component>(&self, event: ComponentEvent) -> usize {
        self.slots
            .get(&(T::ID, event))
            .filter(|entry| entry.type_id == TypeId::of::<T>())
            .map_or(0, |entry| entry.list.len())
    }
}

impl fmt::Debug for ComponentObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentObserver")
            .field("registrations", &self.slots.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
