//! Effect descriptors: inert requests naming an operation and how to
//! resolve it against a capability object.

use crate::{FxError, Resumption};
use fx_capability::{MissingCapability, Provide, Shape};
use std::any::Any;
use std::fmt::{Debug, Formatter};

/// A value travelling between the driver and a suspended computation.
pub(crate) type Injected = Box<dyn Any + Send>;

type Resolver<C, T> = Box<dyn FnOnce(&C) -> Result<Resumption<T>, FxError> + Send>;

/// An inert description of one effect invocation.
///
/// Building a descriptor performs no side effect. The side effect happens
/// only when the driver resolves it against the bound capability object `C`,
/// producing a [`Resumption`] of `T`.
pub struct Descriptor<C, T> {
    operation: &'static str,
    resolve: Resolver<C, T>,
}

impl<C, T> Descriptor<C, T> {
    /// Name of the operation this descriptor invokes.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Resolve against a capability object. This is where the effect starts.
    pub fn resolve(self, capabilities: &C) -> Result<Resumption<T>, FxError> {
        (self.resolve)(capabilities)
    }
}

impl<C: 'static, T: Send + 'static> Descriptor<C, T> {
    /// Post-process the value the effect produces.
    pub fn map<U, F>(self, f: F) -> Descriptor<C, U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let Descriptor { operation, resolve } = self;
        Descriptor {
            operation,
            resolve: Box::new(move |capabilities: &C| Ok(resolve(capabilities)?.map(f))),
        }
    }

    pub(crate) fn erase(self) -> Descriptor<C, Injected> {
        self.map(|value| Box::new(value) as Injected)
    }
}

impl<C, T> Debug for Descriptor<C, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("operation", &self.operation)
            .finish()
    }
}

/// Describe an effect whose resolver cannot fail.
pub fn describe<C, T, F>(operation: &'static str, resolver: F) -> Descriptor<C, T>
where
    C: 'static,
    T: Send + 'static,
    F: FnOnce(&C) -> Resumption<T> + Send + 'static,
{
    try_describe(operation, move |capabilities: &C| Ok(resolver(capabilities)))
}

/// Describe an effect whose resolver may raise.
pub fn try_describe<C, T, F>(operation: &'static str, resolver: F) -> Descriptor<C, T>
where
    C: 'static,
    T: Send + 'static,
    F: FnOnce(&C) -> Result<Resumption<T>, FxError> + Send + 'static,
{
    Descriptor {
        operation,
        resolve: Box::new(resolver),
    }
}

/// Describe a call on the shape `S`.
///
/// The shape is looked up on the capability object when the descriptor is
/// resolved; if it is absent, resolution fails with
/// [`FxError::MissingCapability`] naming `S::NAME`.
///
/// ```
/// use fx_capability::{Capabilities, Shape};
/// use fx_engine::{Resumption, op};
/// use std::sync::Arc;
///
/// pub trait Answer: Send + Sync {
///     fn answer(&self) -> Resumption<u32>;
/// }
///
/// impl Shape for dyn Answer {
///     const NAME: &'static str = "answer";
/// }
///
/// struct DeepThought;
///
/// impl Answer for DeepThought {
///     fn answer(&self) -> Resumption<u32> {
///         Resumption::immediate(42)
///     }
/// }
///
/// let descriptor = op::<dyn Answer, Capabilities, _, _>(|shape| shape.answer());
/// assert_eq!(descriptor.operation(), "answer");
///
/// let capabilities = Capabilities::new().with::<dyn Answer>(Arc::new(DeepThought));
/// let resumption = descriptor.resolve(&capabilities).unwrap();
/// assert!(matches!(resumption, Resumption::Immediate(42)));
/// ```
pub fn op<S, C, T, F>(f: F) -> Descriptor<C, T>
where
    S: ?Sized + Shape,
    C: Provide<S> + 'static,
    T: Send + 'static,
    F: FnOnce(&S) -> Resumption<T> + Send + 'static,
{
    try_op::<S, C, T, _>(move |shape: &S| Ok(f(shape)))
}

/// Like [`op`], for shapes whose operations may raise.
pub fn try_op<S, C, T, F>(f: F) -> Descriptor<C, T>
where
    S: ?Sized + Shape,
    C: Provide<S> + 'static,
    T: Send + 'static,
    F: FnOnce(&S) -> Result<Resumption<T>, FxError> + Send + 'static,
{
    try_describe(S::NAME, move |capabilities: &C| {
        let shape =
            Provide::<S>::provide(capabilities).ok_or_else(|| MissingCapability::new(S::NAME))?;
        f(shape)
    })
}

/// Read the value shape `V`, such as a configuration struct, from the
/// capability object.
pub fn get<V, C>() -> Descriptor<C, V>
where
    V: Shape + Clone + Send,
    C: Provide<V> + 'static,
{
    op::<V, C, V, _>(|value: &V| Resumption::immediate(value.clone()))
}
