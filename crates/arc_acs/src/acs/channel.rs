//! # Construction Channels
//!
//! Short-lived handles that attach components to one actor. They borrow the
//! manager's provider (and observer) mutably, so a channel cannot outlive
//! the call that handed it out.

use super::actor::ActorId;
use super::component::Component;
use super::observer::{ComponentEvent, ComponentObserver};
use super::registry::ComponentProvider;
use crate::error::AcsResult;

/// Attaches components to an existing actor without emitting events.
pub struct ComponentChannel<'a> {
    provider: &'a mut ComponentProvider,
    actor: ActorId,
}

impl<'a> ComponentChannel<'a> {
    /// Opens a channel onto `actor`.
    pub fn new(provider: &'a mut ComponentProvider, actor: ActorId) -> Self {
        Self { provider, actor }
    }

    /// The actor this channel writes to.
    #[inline]
    #[must_use]
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Adds `component` unless the actor already has one of this type.
    ///
    /// # Errors
    ///
    /// Fails if no array exists for `T`.
    pub fn add<T: Component>(&mut self, component: T) -> AcsResult<bool> {
        self.provider.add_component(self.actor, component)
    }

    /// Inserts or replaces the actor's `T`, returning the old value.
    ///
    /// # Errors
    ///
    /// Fails if no array exists for `T`.
    pub fn overwrite<T: Component>(&mut self, component: T) -> AcsResult<Option<T>> {
        self.provider.set_component(self.actor, component)
    }

    /// Checks whether the actor already has a `T`.
    #[must_use]
    pub fn contains<T: Component>(&self) -> bool {
        self.provider.contains_component::<T>(self.actor)
    }
}

/// Channel handed to blueprints while an actor is being spawned.
///
/// Every successful insertion records a deferred `Created` event, flushed
/// once construction finishes.
pub struct ComponentSpawnChannel<'a> {
    provider: &'a mut ComponentProvider,
    observer: &'a mut ComponentObserver,
    actor: ActorId,
}

impl<'a> ComponentSpawnChannel<'a> {
    /// Opens a spawn channel onto `actor`.
    pub fn new(
        provider: &'a mut ComponentProvider,
        observer: &'a mut ComponentObserver,
        actor: ActorId,
    ) -> Self {
        Self {
            provider,
            observer,
            actor,
        }
    }

    /// The actor under construction.
    #[inline]
    #[must_use]
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Adds `component` and records `Created` for it.
    ///
    /// Nothing is recorded if the actor already had a `T`.
    ///
    /// # Errors
    ///
    /// Fails if no array exists for `T`.
    pub fn add<T: Component>(&mut self, component: T) -> AcsResult<bool> {
        let added = self.provider.add_component(self.actor, component)?;
        if added {
            self.observer.record::<T>(ComponentEvent::Created, self.actor);
        }
        Ok(added)
    }

    /// Inserts or replaces the actor's `T`.
    ///
    /// Records `Created` only when the value was newly inserted.
    ///
    /// # Errors
    ///
    /// Fails if no array exists for `T`.
    pub fn overwrite<T: Component>(&mut self, component: T) -> AcsResult<Option<T>> {
        let previous = self.provider.set_component(self.actor, component)?;
        if previous.is_none() {
            self.observer.record::<T>(ComponentEvent::Created, self.actor);
        }
        Ok(previous)
    }

    /// Checks whether the actor already has a `T`.
    #[must_use]
    pub fn contains<T: Component>(&self) -> bool {
        self.provider.contains_component::<T>(self.actor)
    }

    /// Reads back a component added earlier in this construction.
    #[must_use]
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.provider.try_get_component(self.actor)
    }
}
