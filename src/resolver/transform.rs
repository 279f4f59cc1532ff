//! Reusing placeholders of one binding type for another

use std::fmt;
use std::sync::Arc;

use crate::placeholder::Placeholder;

use super::registry::{Registry, TypeKey};

type Generate<A> = Arc<dyn Fn(&Registry) -> Vec<(u64, Placeholder<A>)> + Send + Sync>;

/// A projection from bindings of type `A` into a related type
///
/// Supplied when building a context; every placeholder applicable to the
/// target type is exposed for `A` by evaluating it against the projection.
pub struct Transform<A> {
    target: TypeKey,
    generate: Generate<A>,
}

impl<A> Clone for Transform<A> {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            generate: Arc::clone(&self.generate),
        }
    }
}

impl<A> fmt::Debug for Transform<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("target", &self.target.name())
            .finish()
    }
}

impl<A: 'static> Transform<A> {
    /// Create a transform projecting `A` into `B`
    pub fn new<B, F>(project: F) -> Self
    where
        B: 'static,
        F: Fn(&A) -> B + Send + Sync + 'static,
    {
        let project = Arc::new(project);
        let generate: Generate<A> = Arc::new(move |registry: &Registry| {
            registry
                .lookup_entries::<B>()
                .into_iter()
                .map(|(seq, placeholder)| {
                    let project = Arc::clone(&project);
                    (seq, placeholder.map(move |binder: &A| project(binder)))
                })
                .collect()
        });
        Self {
            target: TypeKey::of::<B>(),
            generate,
        }
    }

    /// The type bindings are projected into
    pub fn target(&self) -> TypeKey {
        self.target
    }

    /// Placeholders of the target type adapted to `A`, with their
    /// registration sequence numbers
    pub(crate) fn generate(&self, registry: &Registry) -> Vec<(u64, Placeholder<A>)> {
        (self.generate)(registry)
    }
}
