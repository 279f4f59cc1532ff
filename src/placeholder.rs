//! Placeholder definitions
//!
//! A [`Placeholder`] is a named computation over a binding value. It is either
//! *literal* (produces a plain string) or *component* (produces a styled
//! [`Component`]). Placeholders defined for one binding type are exposed for
//! another with [`Placeholder::map`].

use std::fmt;
use std::sync::Arc;

use crate::component::Component;
use crate::error::{validate_identifier, PlaceholderError};

/// The result of computing a placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Text(String),
    Component(Component),
}

impl Output {
    /// Coerce to plain text, dropping any styling
    pub fn into_plain(self) -> String {
        match self {
            Output::Text(text) => text,
            Output::Component(component) => component.to_plain(),
        }
    }

    /// Coerce to a component, wrapping plain text in an unstyled node
    pub fn into_component(self) -> Component {
        match self {
            Output::Text(text) => Component::text(text),
            Output::Component(component) => component,
        }
    }
}

/// Which kind of output a placeholder produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Literal,
    Component,
}

type LiteralFn<T> = Arc<dyn Fn(&T, &str) -> String + Send + Sync>;
type ComponentFn<T> = Arc<dyn Fn(&T, &str) -> Component + Send + Sync>;

enum Compute<T> {
    Literal(LiteralFn<T>),
    Component(ComponentFn<T>),
}

impl<T> Clone for Compute<T> {
    fn clone(&self) -> Self {
        match self {
            Compute::Literal(f) => Compute::Literal(Arc::clone(f)),
            Compute::Component(f) => Compute::Component(Arc::clone(f)),
        }
    }
}

/// A named, typed unit of computation
///
/// The compute function receives the binding and the full span content
/// (e.g. `stat_coins` for `%stat_coins%`).
pub struct Placeholder<T> {
    identifier: Arc<str>,
    is_const: bool,
    compute: Compute<T>,
}

impl<T> Clone for Placeholder<T> {
    fn clone(&self) -> Self {
        Self {
            identifier: Arc::clone(&self.identifier),
            is_const: self.is_const,
            compute: self.compute.clone(),
        }
    }
}

impl<T> fmt::Debug for Placeholder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Placeholder")
            .field("identifier", &self.identifier)
            .field("is_const", &self.is_const)
            .field("kind", &self.kind())
            .finish()
    }
}

impl<T: 'static> Placeholder<T> {
    /// Create a placeholder producing plain text
    pub fn literal<F>(identifier: impl Into<String>, func: F) -> Result<Self, PlaceholderError>
    where
        F: Fn(&T, &str) -> String + Send + Sync + 'static,
    {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;
        Ok(Self::from_literal(identifier, Arc::new(func)))
    }

    /// Create a placeholder producing a styled component
    pub fn component<F>(identifier: impl Into<String>, func: F) -> Result<Self, PlaceholderError>
    where
        F: Fn(&T, &str) -> Component + Send + Sync + 'static,
    {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;
        Ok(Self {
            identifier: identifier.into(),
            is_const: false,
            compute: Compute::Component(Arc::new(func)),
        })
    }

    /// Build from an identifier the caller has already validated
    pub(crate) fn from_literal(identifier: String, func: LiteralFn<T>) -> Self {
        Self {
            identifier: identifier.into(),
            is_const: false,
            compute: Compute::Literal(func),
        }
    }

    /// Mark the placeholder as constant: its output never changes for a
    /// given binding, so cached results need no refresh
    pub fn with_const(mut self, is_const: bool) -> Self {
        self.is_const = is_const;
        self
    }

    /// Adapt this placeholder to bindings of type `R` by projecting them
    /// into `T` first.
    ///
    /// Identifier, constness and kind are preserved. Mapping twice applies
    /// the most recent projection to the input first.
    pub fn map<R, F>(&self, project: F) -> Placeholder<R>
    where
        R: 'static,
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        let compute = match &self.compute {
            Compute::Literal(inner) => {
                let inner = Arc::clone(inner);
                Compute::Literal(Arc::new(move |binder: &R, text: &str| {
                    inner(&project(binder), text)
                }) as LiteralFn<R>)
            }
            Compute::Component(inner) => {
                let inner = Arc::clone(inner);
                Compute::Component(Arc::new(move |binder: &R, text: &str| {
                    inner(&project(binder), text)
                }) as ComponentFn<R>)
            }
        };
        Placeholder {
            identifier: Arc::clone(&self.identifier),
            is_const: self.is_const,
            compute,
        }
    }
}

impl<T> Placeholder<T> {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn is_const(&self) -> bool {
        self.is_const
    }

    pub fn kind(&self) -> PlaceholderKind {
        match self.compute {
            Compute::Literal(_) => PlaceholderKind::Literal,
            Compute::Component(_) => PlaceholderKind::Component,
        }
    }

    /// Compute the output for a binding and the matched span content
    pub fn compute(&self, binder: &T, text: &str) -> Output {
        match &self.compute {
            Compute::Literal(f) => Output::Text(f(binder, text)),
            Compute::Component(f) => Output::Component(f(binder, text)),
        }
    }

    /// Whether this placeholder claims the given span content: either the
    /// identifier itself or the identifier followed by `_<args>`
    pub fn matches(&self, content: &str) -> bool {
        match content.strip_prefix(&*self.identifier) {
            Some(rest) => rest.is_empty() || rest.starts_with('_'),
            None => false,
        }
    }
}

/// Identifier of the placeholder backed by an [`ExpansionService`]
pub const EXPANSION_IDENTIFIER: &str = "papi";

/// An external placeholder-expansion service
///
/// The service is probed once with [`is_available`](Self::is_available) when a
/// registry is built; placeholders sourced from it exist only if it answers
/// `true`.
pub trait ExpansionService<T>: Send + Sync {
    fn is_available(&self) -> bool;

    /// Expand a `%…%`-delimited token for the binding
    fn expand(&self, binder: &T, token: &str) -> String;
}

/// A literal placeholder `papi` forwarding `%papi_<token>%` to the service as
/// `%<token>%`
pub fn expansion_placeholder<T: 'static>(service: Arc<dyn ExpansionService<T>>) -> Placeholder<T> {
    Placeholder::from_literal(
        EXPANSION_IDENTIFIER.to_string(),
        Arc::new(move |binder: &T, text: &str| {
            let token = text
                .strip_prefix(EXPANSION_IDENTIFIER)
                .and_then(|rest| rest.strip_prefix('_'))
                .unwrap_or(text);
            service.expand(binder, &format!("%{}%", token))
        }),
    )
}
