//! # ARC Actor-Component Storage
//!
//! Sparse-set storage for actors and their components, designed for:
//! - O(1) add, lookup and remove of any component on any actor
//! - Contiguous iteration over every actor owning a set of components
//! - Deterministic lifecycle events on creation and destruction
//!
//! ## Architecture Rules
//!
//! 1. **Actors are ids** - all actor data lives in component arrays
//! 2. **One array per type** - addressed by a compile-time component id
//! 3. **Events are deferred during construction** - observers see a fully built actor
//!
//! ## Example
//!
//! ```rust
//! use arc_acs::{ActorManager, ComponentEvent};
//!
//! struct Position(f32, f32);
//! struct Velocity(f32, f32);
//! arc_acs::component!(Position, 0);
//! arc_acs::component!(Velocity, 1);
//!
//! let mut manager = ActorManager::default();
//! manager.register_component::<Position>().unwrap();
//! manager.register_component::<Velocity>().unwrap();
//! manager
//!     .observe::<Position>(ComponentEvent::Created, |pos, _| pos.1 = 10.0)
//!     .unwrap();
//!
//! let actor = manager
//!     .spawn_custom(|ch| {
//!         ch.add(Position(0.0, 0.0))?;
//!         ch.add(Velocity(1.0, -1.0))?;
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! for (_, (pos, vel)) in &mut manager.view::<(Position, Velocity)>().unwrap() {
//!     pos.0 += vel.0;
//!     pos.1 += vel.1;
//! }
//!
//! let pos = manager.get_component::<Position>(actor).unwrap();
//! assert_eq!((pos.0, pos.1), (1.0, 9.0));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod acs;
pub mod config;
pub mod error;

pub use acs::{
    ActorId, ActorIndex, ActorLifecycle, ActorManager, ActorTypeId, Blueprint, Component,
    ComponentArray, ComponentChannel, ComponentEvent, ComponentObserver, ComponentProvider,
    ComponentSpawnChannel, ComponentTypeId, ComponentView, ConstComponentView, SparseSet,
    ViewQuery, MAX_COMPONENTS,
};
pub use config::AcsConfig;
pub use error::{AcsError, AcsResult};
