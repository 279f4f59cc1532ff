//! Type-indexed placeholder registry

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::ContextConfig;
use crate::dsl::{dsl_placeholder, DslNode};
use crate::error::PlaceholderError;
use crate::placeholder::{expansion_placeholder, ExpansionService, Placeholder};

use super::context::PlaceholderContext;
use super::transform::Transform;

/// Errors that can occur when setting up registries
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The process-wide registry was already initialized
    #[error("global placeholder registry is already initialized")]
    AlreadyInitialized,
}

/// Identifies a binding type in the registry
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Type name, for diagnostics only
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A `Placeholder<T>` with `T` erased; `T` is the bucket's type key
type Erased = Arc<dyn Any + Send + Sync>;

/// Turns an erased `Placeholder<S>` into an erased `Placeholder<X>`
type Lift = Arc<dyn Fn(&Erased) -> Option<Erased> + Send + Sync>;

#[derive(Clone)]
struct Entry {
    /// Global registration order
    seq: u64,
    placeholder: Erased,
}

#[derive(Clone)]
struct Capability {
    target: TypeKey,
    lift: Lift,
}

#[derive(Default)]
struct Tables {
    next_seq: u64,
    /// Buckets are replaced, never mutated, so a cloned `Arc` is a stable
    /// snapshot
    buckets: HashMap<TypeKey, Arc<[Entry]>>,
    capabilities: HashMap<TypeKey, Vec<Capability>>,
}

impl Tables {
    /// Collect the erased placeholders applicable to `key`, lifted to `key`.
    /// Each type is visited at most once.
    fn collect(&self, key: TypeKey, visited: &mut HashSet<TypeKey>, out: &mut Vec<(u64, Erased)>) {
        if !visited.insert(key) {
            return;
        }

        if let Some(bucket) = self.buckets.get(&key) {
            out.extend(
                bucket
                    .iter()
                    .map(|entry| (entry.seq, Arc::clone(&entry.placeholder))),
            );
        }

        for capability in self.capabilities.get(&key).into_iter().flatten() {
            let mut inherited = Vec::new();
            self.collect(capability.target, visited, &mut inherited);
            out.extend(
                inherited
                    .into_iter()
                    .filter_map(|(seq, erased)| (capability.lift)(&erased).map(|lifted| (seq, lifted))),
            );
        }
    }
}

/// Registry of placeholders indexed by binding type
///
/// A type may declare capabilities (other types it can be viewed as, see
/// [`declare_capability`](Self::declare_capability)); looking up a type also
/// yields the placeholders of every type it is capable of, transitively.
///
/// The registry is safe to share between threads. Registration replaces a
/// bucket as a whole, so concurrent readers see either the old or the new
/// sequence, never a partial append.
#[derive(Default)]
pub struct Registry {
    tables: RwLock<Tables>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tables = self.read();
        f.debug_struct("Registry")
            .field("types", &tables.buckets.len())
            .field("placeholders", &tables.next_seq)
            .finish()
    }
}

impl Registry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry backed by an external expansion service.
    ///
    /// The service is probed once here. If it is unavailable nothing is
    /// registered for it and it is never called.
    pub fn with_expansion<P: 'static>(service: Arc<dyn ExpansionService<P>>) -> Self {
        let registry = Self::new();
        registry.install_expansion(service);
        registry
    }

    /// Probe an expansion service and register its placeholder if available.
    /// Returns whether the placeholder was registered.
    pub fn install_expansion<P: 'static>(&self, service: Arc<dyn ExpansionService<P>>) -> bool {
        let binding = TypeKey::of::<P>();
        if !service.is_available() {
            debug!(binding = binding.name(), "expansion service unavailable, skipping");
            return false;
        }
        info!(binding = binding.name(), "expansion service available");
        self.register([expansion_placeholder(service)]);
        true
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register placeholders for bindings of type `T`.
    ///
    /// Placeholders are appended in order. Registering the same placeholder
    /// twice appends it twice.
    pub fn register<T: 'static>(&self, placeholders: impl IntoIterator<Item = Placeholder<T>>) {
        let key = TypeKey::of::<T>();
        let placeholders: Vec<_> = placeholders.into_iter().collect();
        if placeholders.is_empty() {
            return;
        }

        let mut tables = self.write();
        let mut entries = tables
            .buckets
            .get(&key)
            .map(|bucket| bucket.to_vec())
            .unwrap_or_default();
        for placeholder in placeholders {
            debug!(
                identifier = placeholder.identifier(),
                binding = key.name(),
                "registered placeholder"
            );
            entries.push(Entry {
                seq: tables.next_seq,
                placeholder: Arc::new(placeholder),
            });
            tables.next_seq += 1;
        }
        tables.buckets.insert(key, entries.into());
    }

    /// Build a DSL placeholder for `T` and register it
    pub fn register_dsl<T, F>(
        &self,
        identifier: impl Into<String>,
        is_const: bool,
        block: F,
    ) -> Result<Placeholder<T>, PlaceholderError>
    where
        T: 'static,
        F: FnOnce(&mut DslNode<T>),
    {
        let placeholder = dsl_placeholder(identifier, is_const, block)?;
        self.register([placeholder.clone()]);
        Ok(placeholder)
    }

    /// Declare that bindings of type `X` can be viewed as `S`.
    ///
    /// Lookups for `X` then include every placeholder applicable to `S`,
    /// evaluated against `project(x)`.
    pub fn declare_capability<X, S, F>(&self, project: F)
    where
        X: 'static,
        S: 'static,
        F: Fn(&X) -> S + Send + Sync + 'static,
    {
        let project = Arc::new(project);
        let lift: Lift = Arc::new(move |erased: &Erased| {
            let placeholder = erased.downcast_ref::<Placeholder<S>>()?;
            let project = Arc::clone(&project);
            let lifted = placeholder.map(move |binder: &X| project(binder));
            Some(Arc::new(lifted) as Erased)
        });

        let binding = TypeKey::of::<X>();
        let target = TypeKey::of::<S>();
        debug!(
            binding = binding.name(),
            capability = target.name(),
            "declared capability"
        );
        self.write()
            .capabilities
            .entry(binding)
            .or_default()
            .push(Capability { target, lift });
    }

    /// Every placeholder applicable to `T`, in registration order
    pub fn lookup<T: 'static>(&self) -> Vec<Placeholder<T>> {
        self.lookup_entries::<T>()
            .into_iter()
            .map(|(_, placeholder)| placeholder)
            .collect()
    }

    /// Like [`lookup`](Self::lookup), keeping each placeholder's registration
    /// sequence number
    pub(crate) fn lookup_entries<T: 'static>(&self) -> Vec<(u64, Placeholder<T>)> {
        let mut found = Vec::new();
        {
            let tables = self.read();
            tables.collect(TypeKey::of::<T>(), &mut HashSet::new(), &mut found);
        }
        found.sort_by_key(|(seq, _)| *seq);
        found.dedup_by_key(|(seq, _)| *seq);

        found
            .into_iter()
            .filter_map(|(seq, erased)| {
                erased
                    .downcast_ref::<Placeholder<T>>()
                    .map(|placeholder| (seq, placeholder.clone()))
            })
            .collect()
    }

    /// Build a context for bindings of type `T`
    pub fn resolver_for<T: 'static>(
        &self,
        max_update_interval: Duration,
        transforms: impl IntoIterator<Item = Transform<T>>,
    ) -> PlaceholderContext<T> {
        let config = ContextConfig::default().with_max_update_interval(max_update_interval);
        self.resolver_with_config(&config, transforms)
    }

    /// Build a context for bindings of type `T`.
    ///
    /// The context holds the placeholders applicable to `T` followed by
    /// those produced by each transform, in the order given. A registered
    /// placeholder reached more than once is included once.
    pub fn resolver_with_config<T: 'static>(
        &self,
        config: &ContextConfig,
        transforms: impl IntoIterator<Item = Transform<T>>,
    ) -> PlaceholderContext<T> {
        let mut seen = HashSet::new();
        let mut placeholders = Vec::new();

        for (seq, placeholder) in self.lookup_entries::<T>() {
            if seen.insert(seq) {
                placeholders.push(placeholder);
            }
        }
        for transform in transforms {
            for (seq, placeholder) in transform.generate(self) {
                if seen.insert(seq) {
                    placeholders.push(placeholder);
                }
            }
        }

        debug!(
            binding = TypeKey::of::<T>().name(),
            placeholders = placeholders.len(),
            "built placeholder context"
        );
        PlaceholderContext::new(placeholders, config)
    }
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Install the process-wide registry. Fails if it already exists, including
/// when [`global`] created a default one first.
pub fn init_global(registry: Registry) -> Result<&'static Registry, RegistryError> {
    GLOBAL
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInitialized)?;
    info!("initialized global placeholder registry");
    Ok(global())
}

/// The process-wide registry, created empty on first use if
/// [`init_global`] was never called
pub fn global() -> &'static Registry {
    GLOBAL.get_or_init(|| {
        debug!("creating default global placeholder registry");
        Registry::new()
    })
}
