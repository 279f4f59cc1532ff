//! Placeholder Replace - resolve `%placeholder%` tokens in text and rich text
//!
//! Placeholders are typed computations registered per binding type. A
//! [`PlaceholderContext`] collects the placeholders available for one binding
//! type, optionally reusing placeholders of related types through
//! [`Transform`]s, and substitutes them into templates. A [`ResolvedItem`]
//! caches a rendering and refreshes it at most once per update interval.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use placeholder_replace::{Placeholder, Registry, Transform};
//!
//! struct User {
//!     name: String,
//! }
//!
//! let registry = Registry::new();
//! registry.register([Placeholder::<String>::literal("name", |name, _| name.clone()).unwrap()]);
//!
//! let context = registry.resolver_for::<User>(
//!     Duration::from_secs(5),
//!     [Transform::new(|user: &User| user.name.clone())],
//! );
//!
//! let mut item = context.create_item(User { name: "Aquatic".into() }, String::from("Welcome %name%"));
//! assert_eq!(item.value(), "Welcome Aquatic");
//! ```

pub mod component;
pub mod config;
pub mod dsl;
pub mod error;
pub mod parser;
pub mod placeholder;
pub mod resolver;
pub mod template;

pub use component::{ClickAction, ClickEvent, Component, Style};
pub use config::{ConfigError, ContextConfig, UnknownPlaceholders};
pub use dsl::{dsl_placeholder, ArgValue, DslContext, DslNode};
pub use error::PlaceholderError;
pub use placeholder::{ExpansionService, Output, Placeholder, PlaceholderKind};
pub use resolver::{
    global, init_global, PlaceholderContext, Registry, RegistryError, ResolvedItem, Transform,
    TypeKey,
};
pub use template::Template;

use thiserror::Error;

/// Any error this crate can return
#[derive(Debug, Error)]
pub enum Error {
    #[error("placeholder error: {0}")]
    Placeholder(#[from] PlaceholderError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
