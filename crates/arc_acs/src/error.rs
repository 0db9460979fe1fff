//! # ACS Error Types
//!
//! All errors that can occur in actor-component storage.
//!
//! Recoverable misuse (capacity, duplicate registration) is logged and
//! reported here. Contract violations that would desynchronise sparse-set
//! bookkeeping panic instead.

use thiserror::Error;

use crate::acs::{ActorId, ActorTypeId, ComponentTypeId};

/// Errors that can occur in the actor-component storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcsError {
    /// No element is stored at the requested sparse index.
    #[error("invalid index: no element at {index}")]
    InvalidIndex {
        /// The offending index.
        index: usize,
    },

    /// The actor does not own a component of the requested type.
    #[error("{actor} has no {component} component")]
    MissingComponent {
        /// Name of the component type.
        component: &'static str,
        /// The actor that was queried.
        actor: ActorId,
    },

    /// The component type id does not fit the registry's slot table.
    #[error("component type id {id} exceeds capacity {capacity}")]
    CapacityExceeded {
        /// The offending component type id.
        id: ComponentTypeId,
        /// Number of slots in the registry.
        capacity: usize,
    },

    /// No array was created for the component type.
    #[error("component {component} (id {id}) is not registered")]
    ComponentNotRegistered {
        /// Name of the component type.
        component: &'static str,
        /// Its component type id.
        id: ComponentTypeId,
    },

    /// A slot holds a different Rust type than the one requested.
    #[error("component id {id} holds {found}, requested as {expected}")]
    TypeMismatch {
        /// The component type id being accessed.
        id: ComponentTypeId,
        /// The requested type.
        expected: &'static str,
        /// The type the slot was created with.
        found: &'static str,
    },

    /// A view names the same component type twice.
    #[error("component {component} appears more than once in a view")]
    DuplicateViewComponent {
        /// Name of the repeated component type.
        component: &'static str,
    },

    /// No blueprint is registered under the actor type id.
    #[error("unknown actor type: {0}")]
    UnknownActorType(ActorTypeId),

    /// The actor was never spawned or has been destroyed.
    #[error("{0} is not alive")]
    ActorNotAlive(ActorId),

    /// Every actor index has been handed out.
    #[error("actor ids exhausted")]
    ActorIdsExhausted,

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read.
    #[error("failed to read configuration {path}: {reason}")]
    ConfigRead {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        reason: String,
    },

    /// Configuration text is not valid TOML for [`crate::AcsConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}

/// Result type for ACS operations.
pub type AcsResult<T> = Result<T, AcsError>;
