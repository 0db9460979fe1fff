//! # Actor-Component Storage
//!
//! Actors are opaque ids; all of their data lives in per-type component
//! arrays owned by a single provider.
//!
//! ## Design Philosophy
//!
//! - One sparse set per component type, addressed by a static type id
//! - Components are stored densely for cache-friendly iteration
//! - Actor ids are never reused, so no generation counters are needed
//! - Multi-type views walk the smallest array and look up the others

mod actor;
mod channel;
mod component;
mod manager;
mod observer;
mod registry;
pub mod sparse_set;
pub mod view;

pub use actor::{ActorId, ActorIndex, ActorLifecycle};
pub use channel::{ComponentChannel, ComponentSpawnChannel};
pub use component::{Component, ComponentTypeId, MAX_COMPONENTS};
pub use manager::{ActorManager, ActorTypeId, Blueprint};
pub use observer::{ComponentEvent, ComponentObserver};
pub use registry::{ComponentArray, ComponentProvider};
pub use sparse_set::{DefaultLayout, DenseLayout, Packed, Parallel, SparseIndex, SparseSet};
pub use view::{ComponentView, ConstComponentView, ViewQuery};
