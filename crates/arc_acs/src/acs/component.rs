//! # Component Registration
//!
//! Components are plain data attached to at most one actor each. Every
//! component type carries a small, statically assigned id used to address
//! its array in the `ComponentProvider`.

/// Identifier of a registered component type.
pub type ComponentTypeId = u16;

/// Build-time upper bound on component type ids.
pub const MAX_COMPONENTS: usize = 256;

/// Marker trait for ACS components.
///
/// Components must be:
/// - `'static`: no borrowed data
/// - `Send + Sync`: a manager can be handed to another thread between ticks
///
/// Prefer [`component!`](crate::component) over a manual impl; it also
/// checks the id against [`MAX_COMPONENTS`] at compile time.
///
/// # Example
///
/// ```rust
/// #[derive(Clone, Copy, Debug, Default)]
/// struct Position {
///     x: f64,
///     y: f64,
/// }
///
/// arc_acs::component!(Position, 0);
///
/// use arc_acs::Component;
/// assert_eq!(Position::ID, 0);
/// ```
pub trait Component: Send + Sync + 'static {
    /// Unique identifier for this component type (`< MAX_COMPONENTS`).
    ///
    /// Two types sharing an id are rejected the first time the second one
    /// touches the registry.
    const ID: ComponentTypeId;
}

/// Registers a type as a [`Component`] with a fixed id.
///
/// Fails to compile if the id is not below [`MAX_COMPONENTS`].
///
/// ```rust,compile_fail
/// struct Huge;
/// arc_acs::component!(Huge, 300);
/// ```
#[macro_export]
macro_rules! component {
    ($ty:ty, $id:expr) => {
        const _: () = assert!(
            ($id as usize) < $crate::MAX_COMPONENTS,
            "component id exceeds MAX_COMPONENTS"
        );

        impl $crate::Component for $ty {
            const ID: $crate::ComponentTypeId = ($id) as $crate::ComponentTypeId;
        }
    };
}

/// Short type name used in logs and errors.
#[inline]
pub(crate) fn component_name<T: Component>() -> &'static str {
    std::any::type_name::<T>()
}
