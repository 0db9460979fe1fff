//! # Actor Manager
//!
//! Owns the component provider and observer, hands out actor ids and runs
//! the spawn / destroy lifecycle:
//!
//! ```text
//! spawn:   allocate id -> pre-hook -> blueprint -> mark alive -> flush Created
//!                                 \-> error: purge components, drop pending
//! destroy: for each owned component (ascending id): Destroyed -> remove
//! ```

use std::collections::HashMap;
use std::fmt;

use super::actor::{ActorId, ActorIndex, ActorLifecycle};
use super::channel::{ComponentChannel, ComponentSpawnChannel};
use super::component::{Component, ComponentTypeId};
use super::observer::{ComponentEvent, ComponentObserver};
use super::registry::ComponentProvider;
use super::sparse_set::SparseSet;
use super::view::{ComponentView, ConstComponentView, ViewQuery};
use crate::config::AcsConfig;
use crate::error::{AcsError, AcsResult};

/// Identifier of a registered actor blueprint.
pub type ActorTypeId = u32;

/// Recipe that attaches an actor type's components.
///
/// Any `Fn(&mut ComponentSpawnChannel) -> AcsResult<()>` closure is a
/// blueprint.
pub trait Blueprint: Send + Sync + 'static {
    /// Attaches components to the actor behind `channel`.
    ///
    /// # Errors
    ///
    /// Any error aborts the spawn and rolls the actor back.
    fn construct(&self, channel: &mut ComponentSpawnChannel<'_>) -> AcsResult<()>;
}

impl<F> Blueprint for F
where
    F: Fn(&mut ComponentSpawnChannel<'_>) -> AcsResult<()> + Send + Sync + 'static,
{
    fn construct(&self, channel: &mut ComponentSpawnChannel<'_>) -> AcsResult<()> {
        self(channel)
    }
}

/// Actor lifecycle orchestrator.
///
/// # Example
///
/// ```rust
/// use arc_acs::{ActorManager, ComponentEvent};
///
/// #[derive(Debug)]
/// struct Position(f64, f64);
/// #[derive(Debug)]
/// struct Velocity(f64, f64);
/// arc_acs::component!(Position, 0);
/// arc_acs::component!(Velocity, 1);
///
/// const BALL: u32 = 1;
///
/// let mut manager = ActorManager::default();
/// manager.register_component::<Position>().unwrap();
/// manager.register_component::<Velocity>().unwrap();
/// manager.register_actor(BALL, |ch| {
///     ch.add(Position(0.0, 0.0))?;
///     ch.add(Velocity(1.0, 0.5))?;
///     Ok(())
/// });
///
/// let ball = manager.spawn(BALL).unwrap();
/// for (_, (pos, vel)) in manager.view::<(Position, Velocity)>().unwrap().iter_mut() {
///     pos.0 += vel.0;
///     pos.1 += vel.1;
/// }
/// assert_eq!(manager.get_component::<Position>(ball).unwrap().0, 1.0);
/// assert_eq!(manager.destroy(ball).unwrap(), 2);
/// ```
pub struct ActorManager {
    provider: ComponentProvider,
    observer: ComponentObserver,
    blueprints: HashMap<ActorTypeId, Box<dyn Blueprint>>,
    /// Alive actors and the blueprint they came from.
    live: SparseSet<Option<ActorTypeId>>,
    /// Next id to hand out; every lower id has been used.
    next_actor: u64,
}

impl ActorManager {
    /// Creates a manager from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`AcsError::InvalidConfig`] if `config` is out of range.
    pub fn new(config: AcsConfig) -> AcsResult<Self> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: AcsConfig) -> Self {
        let live = SparseSet::with_capacity(config.sparse_reserve, config.dense_reserve);
        Self {
            provider: ComponentProvider::with_config(config),
            observer: ComponentObserver::new(),
            blueprints: HashMap::new(),
            live,
            next_actor: 0,
        }
    }

    // ========================================================================
    // SETUP
    // ========================================================================

    /// Creates the component array for `T`.
    ///
    /// # Errors
    ///
    /// See [`ComponentProvider::create_array`].
    pub fn register_component<T: Component>(&mut self) -> AcsResult<bool> {
        self.provider.create_array::<T>()
    }

    /// Appends a callback for `event` on `T`.
    ///
    /// # Errors
    ///
    /// See [`ComponentObserver::observe`].
    pub fn observe<T: Component>(
        &mut self,
        event: ComponentEvent,
        callback: impl FnMut(&mut T, ActorId) + Send + 'static,
    ) -> AcsResult<()> {
        self.observer.observe::<T>(event, callback)
    }

    /// Registers a blueprint closure for `actor_type`.
    ///
    /// # Returns
    ///
    /// `false` (and the first blueprint is kept) if the type is taken.
    pub fn register_actor<F>(&mut self, actor_type: ActorTypeId, blueprint: F) -> bool
    where
        F: Fn(&mut ComponentSpawnChannel<'_>) -> AcsResult<()> + Send + Sync + 'static,
    {
        self.register_blueprint(actor_type, blueprint)
    }

    /// Registers a [`Blueprint`] for `actor_type`.
    ///
    /// # Returns
    ///
    /// `false` (and the first blueprint is kept) if the type is taken.
    pub fn register_blueprint(
        &mut self,
        actor_type: ActorTypeId,
        blueprint: impl Blueprint,
    ) -> bool {
        if self.blueprints.contains_key(&actor_type) {
            tracing::warn!("Actor type {} is already registered", actor_type);
            return false;
        }
        self.blueprints.insert(actor_type, Box::new(blueprint));
        tracing::debug!("Registered actor type {}", actor_type);
        true
    }

    /// Checks whether a blueprint exists for `actor_type`.
    #[must_use]
    pub fn has_blueprint(&self, actor_type: ActorTypeId) -> bool {
        self.blueprints.contains_key(&actor_type)
    }

    // ========================================================================
    // SPAWN / DESTROY
    // ========================================================================

    /// Spawns an actor from its blueprint.
    ///
    /// `Created` observers run before the id is returned.
    ///
    /// # Errors
    ///
    /// - [`AcsError::UnknownActorType`] if no blueprint is registered
    /// - [`AcsError::ActorIdsExhausted`] if no id is left
    /// - any error the blueprint returns, or a `Created` dispatch error (the
    ///   actor is rolled back)
    pub fn spawn(&mut self, actor_type: ActorTypeId) -> AcsResult<ActorId> {
        self.spawn_with(actor_type, |_| Ok(()))
    }

    /// Spawns an actor, running `pre_hook` on its channel before the
    /// blueprint.
    ///
    /// # Errors
    ///
    /// Same as [`ActorManager::spawn`], plus any error of `pre_hook`.
    pub fn spawn_with<H>(&mut self, actor_type: ActorTypeId, pre_hook: H) -> AcsResult<ActorId>
    where
        H: FnOnce(&mut ComponentSpawnChannel<'_>) -> AcsResult<()>,
    {
        let Some(blueprint) = self.blueprints.get(&actor_type) else {
            tracing::warn!("Cannot spawn unknown actor type {}", actor_type);
            return Err(AcsError::UnknownActorType(actor_type));
        };
        let actor = allocate(&mut self.next_actor)?;

        let mut channel = ComponentSpawnChannel::new(&mut self.provider, &mut self.observer, actor);
        let built = pre_hook(&mut channel).and_then(|()| blueprint.construct(&mut channel));

        self.finish_spawn(actor, Some(actor_type), built)
    }

    /// Spawns an actor built by `build` instead of a registered blueprint.
    ///
    /// # Errors
    ///
    /// [`AcsError::ActorIdsExhausted`] or any error of `build` (the actor is
    /// rolled back).
    pub fn spawn_custom<F>(&mut self, build: F) -> AcsResult<ActorId>
    where
        F: FnOnce(&mut ComponentSpawnChannel<'_>) -> AcsResult<()>,
    {
        let actor = allocate(&mut self.next_actor)?;
        let mut channel = ComponentSpawnChannel::new(&mut self.provider, &mut self.observer, actor);
        let built = build(&mut channel);
        self.finish_spawn(actor, None, built)
    }

    fn finish_spawn(
        &mut self,
        actor: ActorId,
        actor_type: Option<ActorTypeId>,
        built: AcsResult<()>,
    ) -> AcsResult<ActorId> {
        if let Err(e) = built {
            self.observer.discard_pending();
            let purged = self.purge(actor);
            tracing::warn!(
                "Construction of {} failed, rolled back {} component(s): {}",
                actor,
                purged,
                e
            );
            return Err(e);
        }

        if let Err(e) = self.observer.invoke_all(&mut self.provider) {
            let purged = self.purge(actor);
            tracing::warn!(
                "Created dispatch for {} failed, rolled back {} component(s): {}",
                actor,
                purged,
                e
            );
            return Err(e);
        }

        self.live.add(actor.index(), actor_type);
        tracing::debug!("Spawned {} (type {:?})", actor, actor_type);
        Ok(actor)
    }

    /// Removes every component of `actor` without notifying observers.
    fn purge(&mut self, actor: ActorId) -> usize {
        let mut removed = 0;
        for id in self.slot_ids() {
            if self.provider.erased_remove(id, actor.index()) {
                removed += 1;
            }
        }
        removed
    }

    fn slot_ids(&self) -> std::ops::Range<ComponentTypeId> {
        let capacity = ComponentTypeId::try_from(self.provider.capacity())
            .unwrap_or(ComponentTypeId::MAX);
        0..capacity
    }

    /// Destroys `actor`: each component fires `Destroyed` while still in
    /// place, then is removed.
    ///
    /// Destroying an actor that is not alive is a no-op.
    ///
    /// # Returns
    ///
    /// The number of components removed.
    ///
    /// # Errors
    ///
    /// The first observer dispatch error. Every component is still removed.
    pub fn destroy(&mut self, actor: ActorId) -> AcsResult<usize> {
        if self.live.try_remove(actor.index()).is_none() {
            tracing::debug!("Ignoring destroy of {} ({:?})", actor, self.lifecycle(actor));
            return Ok(0);
        }

        let mut removed = 0;
        let mut first_error = None;
        for id in self.slot_ids() {
            if !self.provider.erased_contains(id, actor.index()) {
                continue;
            }
            if let Err(e) =
                self.observer
                    .dispatch(id, ComponentEvent::Destroyed, &mut self.provider, actor)
            {
                tracing::warn!("Destroyed dispatch for {} failed: {}", actor, e);
                first_error.get_or_insert(e);
            }
            if self.provider.erased_remove(id, actor.index()) {
                removed += 1;
            }
        }

        tracing::debug!("Destroyed {} ({} component(s))", actor, removed);
        match first_error {
            Some(e) => Err(e),
            None => Ok(removed),
        }
    }

    // ========================================================================
    // COMPONENT ACCESS
    // ========================================================================

    fn ensure_alive(&self, actor: ActorId) -> AcsResult<()> {
        if self.live.contains(actor.index()) {
            Ok(())
        } else {
            Err(AcsError::ActorNotAlive(actor))
        }
    }

    /// Opens a plain channel onto a live actor. No events are emitted.
    ///
    /// # Errors
    ///
    /// [`AcsError::ActorNotAlive`] if `actor` is not alive.
    pub fn channel(&mut self, actor: ActorId) -> AcsResult<ComponentChannel<'_>> {
        self.ensure_alive(actor)?;
        Ok(ComponentChannel::new(&mut self.provider, actor))
    }

    /// Adds `component` to a live actor and runs its `Created` observers.
    ///
    /// # Returns
    ///
    /// `false` if the actor already had a `T` (no event fires).
    ///
    /// # Errors
    ///
    /// [`AcsError::ActorNotAlive`], or any registry or dispatch error. On a
    /// dispatch error the component is removed again.
    pub fn add_component<T: Component>(&mut self, actor: ActorId, component: T) -> AcsResult<bool> {
        self.ensure_alive(actor)?;
        if !self.provider.add_component(actor, component)? {
            return Ok(false);
        }
        self.observer.record::<T>(ComponentEvent::Created, actor);
        if let Err(e) = self.observer.invoke_all(&mut self.provider) {
            self.provider.try_remove_component::<T>(actor);
            tracing::warn!("Created dispatch for {} failed, component removed: {}", actor, e);
            return Err(e);
        }
        Ok(true)
    }

    /// Runs `Destroyed` observers for the actor's `T`, then removes it.
    ///
    /// # Errors
    ///
    /// [`AcsError::MissingComponent`] if absent, or any registry or
    /// dispatch error.
    pub fn remove_component<T: Component>(&mut self, actor: ActorId) -> AcsResult<T> {
        if self.provider.contains_component::<T>(actor) {
            self.observer
                .dispatch(T::ID, ComponentEvent::Destroyed, &mut self.provider, actor)?;
        }
        self.provider.remove_component::<T>(actor)
    }

    /// Gets the actor's `T`.
    ///
    /// # Errors
    ///
    /// See [`ComponentProvider::get_component`].
    pub fn get_component<T: Component>(&self, actor: ActorId) -> AcsResult<&T> {
        self.provider.get_component(actor)
    }

    /// Gets the actor's `T` mutably.
    ///
    /// # Errors
    ///
    /// See [`ComponentProvider::get_component_mut`].
    pub fn get_component_mut<T: Component>(&mut self, actor: ActorId) -> AcsResult<&mut T> {
        self.provider.get_component_mut(actor)
    }

    /// Gets the actor's `T`, if any.
    #[must_use]
    pub fn try_get_component<T: Component>(&self, actor: ActorId) -> Option<&T> {
        self.provider.try_get_component(actor)
    }

    /// Gets the actor's `T` mutably, if any.
    pub fn try_get_component_mut<T: Component>(&mut self, actor: ActorId) -> Option<&mut T> {
        self.provider.try_get_component_mut(actor)
    }

    /// Checks whether the actor has a `T`.
    #[must_use]
    pub fn contains_component<T: Component>(&self, actor: ActorId) -> bool {
        self.provider.contains_component::<T>(actor)
    }

    /// Builds a read-write view over every actor owning all of `Q`.
    ///
    /// # Errors
    ///
    /// See [`ComponentView::new`].
    pub fn view<Q: ViewQuery>(&mut self) -> AcsResult<ComponentView<'_, Q>> {
        ComponentView::new(&mut self.provider)
    }

    /// Builds a read-only view over every actor owning all of `Q`.
    ///
    /// # Errors
    ///
    /// See [`ConstComponentView::new`].
    pub fn view_const<Q: ViewQuery>(&self) -> AcsResult<ConstComponentView<'_, Q>> {
        ConstComponentView::new(&self.provider)
    }

    // ========================================================================
    // INTROSPECTION
    // ========================================================================

    /// Where `actor` is in its lifecycle.
    ///
    /// Ids whose construction was rolled back report `Destroyed`.
    #[must_use]
    pub fn lifecycle(&self, actor: ActorId) -> ActorLifecycle {
        if actor.is_null() || actor.raw() >= self.next_actor {
            ActorLifecycle::Unborn
        } else if self.live.contains(actor.index()) {
            ActorLifecycle::Alive
        } else {
            ActorLifecycle::Destroyed
        }
    }

    /// Blueprint a live actor was spawned from; `None` for custom spawns.
    #[must_use]
    pub fn actor_type(&self, actor: ActorId) -> Option<ActorTypeId> {
        self.live.try_get(actor.index()).copied().flatten()
    }

    /// Number of alive actors.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.live.len()
    }

    /// Iterates alive actors in unspecified order.
    pub fn actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.live.keys().map(ActorId::from_index)
    }

    /// The underlying component provider.
    #[must_use]
    pub fn provider(&self) -> &ComponentProvider {
        &self.provider
    }

    /// The observer, for clearing or direct invocation.
    pub fn observer_mut(&mut self) -> &mut ComponentObserver {
        &mut self.observer
    }
}

impl Default for ActorManager {
    fn default() -> Self {
        Self::with_config(AcsConfig::default())
    }
}

impl fmt::Debug for ActorManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorManager")
            .field("alive", &self.live.len())
            .field("next_actor", &self.next_actor)
            .field("blueprints", &self.blueprints.len())
            .field("components", &self.provider.registered_count())
            .finish_non_exhaustive()
    }
}

/// Hands out the next actor id.
fn allocate(next: &mut u64) -> AcsResult<ActorId> {
    let index = ActorIndex::try_from(*next)
        .ok()
        .filter(|&index| index <= ActorId::MAX_INDEX)
        .ok_or(AcsError::ActorIdsExhausted)?;
    *next += 1;
    Ok(ActorId::from_index(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    struct Health(i32);
    crate::component!(Health, 0);

    #[derive(Debug, Clone, PartialEq)]
    struct Label(String);
    crate::component!(Label, 1);

    struct Missing;
    crate::component!(Missing, 2);

    /// Shares its id with `Health`.
    struct Clash;
    crate::component!(Clash, 0);

    const SOLDIER: ActorTypeId = 1;
    const BROKEN: ActorTypeId = 2;

    fn manager() -> ActorManager {
        let mut manager = ActorManager::default();
        manager.register_component::<Health>().unwrap();
        manager.register_component::<Label>().unwrap();
        manager.register_actor(SOLDIER, |ch| {
            ch.add(Health(100))?;
            ch.add(Label("soldier".into()))?;
            Ok(())
        });
        manager.register_actor(BROKEN, |ch| {
            ch.add(Health(1))?;
            ch.add(Missing)?;
            Ok(())
        });
        manager
    }

    #[test]
    fn test_ids_are_sequential_and_never_reused() {
        let mut manager = manager();
        let a = manager.spawn(SOLDIER).unwrap();
        let b = manager.spawn(SOLDIER).unwrap();
        assert_eq!((a.raw(), b.raw()), (0, 1));

        manager.destroy(a).unwrap();
        let c = manager.spawn(SOLDIER).unwrap();
        assert_eq!(c.raw(), 2);
        assert_eq!(manager.alive_count(), 2);
    }

    #[test]
    fn test_duplicate_blueprint_keeps_first() {
        let mut manager = manager();
        assert!(!manager.register_actor(SOLDIER, |ch| {
            ch.add(Health(0))?;
            Ok(())
        }));
        let actor = manager.spawn(SOLDIER).unwrap();
        assert_eq!(manager.get_component::<Health>(actor).unwrap(), &Health(100));
        assert_eq!(manager.actor_type(actor), Some(SOLDIER));
    }

    #[test]
    fn test_unknown_actor_type() {
        let mut manager = manager();
        assert_eq!(manager.spawn(99).unwrap_err(), AcsError::UnknownActorType(99));
        assert_eq!(manager.lifecycle(ActorId::from_index(0)), ActorLifecycle::Unborn);
    }

    #[test]
    fn test_created_fires_after_construction() {
        let mut manager = manager();
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            manager
                .observe::<Health>(ComponentEvent::Created, move |hp, actor| {
                    seen.lock().unwrap().push((actor, hp.0));
                    hp.0 += 1;
                })
                .unwrap();
        }

        let actor = manager
            .spawn_with(SOLDIER, |ch| ch.add(Health(7)).map(|_| ()))
            .unwrap();

        // The pre-hook wins; the blueprint's add is a no-op.
        assert_eq!(*seen.lock().unwrap(), vec![(actor, 7)]);
        assert_eq!(manager.get_component::<Health>(actor).unwrap(), &Health(8));
    }

    #[test]
    fn test_failed_blueprint_rolls_back() {
        let mut manager = manager();
        let fired = Arc::new(Mutex::new(0));
        for event in [ComponentEvent::Created, ComponentEvent::Destroyed] {
            let fired = Arc::clone(&fired);
            manager
                .observe::<Health>(event, move |_, _| *fired.lock().unwrap() += 1)
                .unwrap();
        }

        let err = manager.spawn(BROKEN).unwrap_err();
        assert!(matches!(err, AcsError::ComponentNotRegistered { id: 2, .. }));

        let ghost = ActorId::from_index(0);
        assert!(!manager.contains_component::<Health>(ghost));
        assert_eq!(manager.lifecycle(ghost), ActorLifecycle::Destroyed);
        assert_eq!(manager.alive_count(), 0);
        assert_eq!(*fired.lock().unwrap(), 0);
        assert_eq!(manager.observer_mut().pending_len(), 0);
    }

    #[test]
    fn test_failed_created_dispatch_rolls_back_spawn() {
        let mut manager = manager();
        manager.observe::<Clash>(ComponentEvent::Created, |_, _| {}).unwrap();

        let err = manager.spawn(SOLDIER).unwrap_err();
        assert!(matches!(err, AcsError::TypeMismatch { id: 0, .. }));

        let ghost = ActorId::from_index(0);
        assert_eq!(manager.alive_count(), 0);
        assert_eq!(manager.actors().count(), 0);
        assert_eq!(manager.lifecycle(ghost), ActorLifecycle::Destroyed);
        assert!(!manager.contains_component::<Health>(ghost));
        assert!(!manager.contains_component::<Label>(ghost));
        assert_eq!(manager.provider().total_components(), 0);
        assert_eq!(manager.observer_mut().pending_len(), 0);
    }

    #[test]
    fn test_failed_created_dispatch_undoes_add() {
        let mut manager = manager();
        let actor = manager
            .spawn_custom(|ch| ch.add(Label("bare".into())).map(|_| ()))
            .unwrap();
        manager.observe::<Clash>(ComponentEvent::Created, |_, _| {}).unwrap();

        assert!(matches!(
            manager.add_component(actor, Health(3)),
            Err(AcsError::TypeMismatch { id: 0, .. })
        ));
        assert!(!manager.contains_component::<Health>(actor));
        assert_eq!(manager.lifecycle(actor), ActorLifecycle::Alive);
        assert_eq!(manager.provider().component_count(actor), 1);
    }

    #[test]
    fn test_destroy_fires_then_removes() {
        let mut manager = manager();
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            manager
                .observe::<Label>(ComponentEvent::Destroyed, move |label, actor| {
                    seen.lock().unwrap().push((actor, label.0.clone()));
                })
                .unwrap();
        }

        let actor = manager.spawn(SOLDIER).unwrap();
        assert_eq!(manager.lifecycle(actor), ActorLifecycle::Alive);
        assert_eq!(manager.destroy(actor).unwrap(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![(actor, "soldier".to_string())]);

        assert_eq!(manager.lifecycle(actor), ActorLifecycle::Destroyed);
        assert!(manager.try_get_component::<Health>(actor).is_none());
        assert_eq!(manager.destroy(actor).unwrap(), 0);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_component_ops_on_live_actor() {
        let mut manager = manager();
        let created = Arc::new(Mutex::new(0));
        {
            let created = Arc::clone(&created);
            manager
                .observe::<Label>(ComponentEvent::Created, move |_, _| *created.lock().unwrap() += 1)
                .unwrap();
        }

        let actor = manager.spawn_custom(|ch| ch.add(Health(5)).map(|_| ())).unwrap();
        assert_eq!(manager.actor_type(actor), None);
        assert!(manager.add_component(actor, Label("late".into())).unwrap());
        assert!(!manager.add_component(actor, Label("again".into())).unwrap());
        assert_eq!(*created.lock().unwrap(), 1);

        manager.get_component_mut::<Health>(actor).unwrap().0 = 9;
        {
            let mut channel = manager.channel(actor).unwrap();
            assert_eq!(channel.overwrite(Health(10)).unwrap(), Some(Health(9)));
        }

        assert_eq!(manager.remove_component::<Label>(actor).unwrap(), Label("late".into()));
        assert!(matches!(
            manager.remove_component::<Label>(actor),
            Err(AcsError::MissingComponent { .. })
        ));

        let dead = ActorId::from_index(77);
        assert_eq!(
            manager.add_component(dead, Health(1)).unwrap_err(),
            AcsError::ActorNotAlive(dead)
        );
        assert!(manager.channel(dead).is_err());
    }

    #[test]
    fn test_ids_exhausted() {
        let mut next = u64::from(ActorId::MAX_INDEX);
        assert_eq!(allocate(&mut next).unwrap().index(), ActorId::MAX_INDEX);
        assert_eq!(allocate(&mut next).unwrap_err(), AcsError::ActorIdsExhausted);

        let mut manager = manager();
        manager.next_actor = next;
        assert_eq!(manager.spawn(SOLDIER).unwrap_err(), AcsError::ActorIdsExhausted);
        assert_eq!(manager.alive_count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AcsConfig::default().with_max_components(0);
        assert!(matches!(ActorManager::new(config), Err(AcsError::InvalidConfig(_))));
    }
}
