//! Placeholder registration and resolution
//!
//! A [`Registry`] maps binding types to placeholders. A [`PlaceholderContext`]
//! is the ordered set of placeholders available for one binding type, built
//! from the registry and optional [`Transform`]s. A [`ResolvedItem`] caches
//! the rendering of one template for one binding.

mod context;
mod item;
mod registry;
mod transform;

pub use context::PlaceholderContext;
pub use item::ResolvedItem;
pub use registry::{global, init_global, Registry, RegistryError, TypeKey};
pub use transform::Transform;
