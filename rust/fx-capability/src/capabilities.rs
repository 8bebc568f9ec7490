use crate::{MissingCapability, Provide, Shape};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

struct Entry {
    name: &'static str,
    /// Always an `Arc<S>` for the shape `S` the entry is keyed by.
    value: Box<dyn Any + Send + Sync>,
}

/// A capability object assembled at run time.
///
/// The registry maps each [`Shape`] to one implementation. Because the set
/// of shapes is only known once the registry is built, missing shapes are
/// reported through [`MissingCapability`] by [`Capabilities::get`] and by the
/// binding check rather than by the compiler.
///
/// ```
/// use fx_capability::{Capabilities, Shape};
/// use std::sync::Arc;
///
/// pub trait Greet: Send + Sync {
///     fn greet(&self, name: &str) -> String;
/// }
///
/// impl Shape for dyn Greet {
///     const NAME: &'static str = "greet";
/// }
///
/// struct English;
///
/// impl Greet for English {
///     fn greet(&self, name: &str) -> String {
///         format!("Hello, {name}")
///     }
/// }
///
/// let capabilities = Capabilities::new().with::<dyn Greet>(Arc::new(English));
/// let greet = capabilities.get::<dyn Greet>().unwrap();
/// assert_eq!(greet.greet("Ada"), "Hello, Ada");
/// ```
#[derive(Default)]
pub struct Capabilities {
    entries: HashMap<TypeId, Entry>,
}

impl Capabilities {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an implementation of the shape `S` and returns the registry.
    pub fn with<S>(mut self, implementation: Arc<S>) -> Self
    where
        S: ?Sized + Shape,
        Arc<S>: Send + Sync,
    {
        self.insert(implementation);
        self
    }

    /// Adds a plain value shape, such as a configuration struct.
    pub fn with_value<V>(self, value: V) -> Self
    where
        V: Shape + Send + Sync,
    {
        self.with(Arc::new(value))
    }

    /// Adds an implementation of the shape `S`, returning the one it
    /// replaces.
    pub fn insert<S>(&mut self, implementation: Arc<S>) -> Option<Arc<S>>
    where
        S: ?Sized + Shape,
        Arc<S>: Send + Sync,
    {
        let previous = self.entries.insert(
            TypeId::of::<S>(),
            Entry {
                name: S::NAME,
                value: Box::new(implementation),
            },
        )?;

        previous.value.downcast::<Arc<S>>().ok().map(|shape| *shape)
    }

    /// Removes the implementation of `S`, if any.
    pub fn remove<S>(&mut self) -> Option<Arc<S>>
    where
        S: ?Sized + Shape,
    {
        let entry = self.entries.remove(&TypeId::of::<S>())?;
        entry.value.downcast::<Arc<S>>().ok().map(|shape| *shape)
    }

    /// Looks up the implementation of `S`.
    pub fn get<S>(&self) -> Result<&S, MissingCapability>
    where
        S: ?Sized + Shape,
    {
        self.entries
            .get(&TypeId::of::<S>())
            .and_then(|entry| entry.value.downcast_ref::<Arc<S>>())
            .map(|shape| shape.as_ref())
            .ok_or_else(|| MissingCapability::new(S::NAME))
    }

    /// Whether an implementation of `S` is registered.
    pub fn contains<S>(&self) -> bool
    where
        S: ?Sized + Shape,
    {
        self.entries.contains_key(&TypeId::of::<S>())
    }

    /// Names of the registered operations, sorted.
    pub fn operations(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.values().map(|entry| entry.name).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered shapes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no shape is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S> Provide<S> for Capabilities
where
    S: ?Sized + Shape,
{
    fn provide(&self) -> Option<&S> {
        self.get::<S>().ok()
    }
}

impl Debug for Capabilities {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("operations", &self.operations())
            .finish()
    }
}
