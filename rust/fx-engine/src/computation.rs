//! Programs written as `async` bodies that suspend on every effect.
//!
//! A [`Program`] yields one [`Descriptor`] per [`Co::perform`] and is handed
//! the resolved value when resumed. Sub-computations are plain
//! `async fn(&Co<C>)` and flatten into their caller.

use crate::descriptor::Injected;
use crate::{Bound, Descriptor, FxError, bind};
use futures::FutureExt;
use futures::future::BoxFuture;
use fx_capability::{Provide, Requirements, Shape};
use genawaiter::sync::Gen;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

type Channel<C> = genawaiter::sync::Co<Descriptor<C, Injected>, Option<Injected>>;

/// The suspended form of a started program, stepped by the driver.
pub(crate) type Coroutine<C, T> =
    Gen<Descriptor<C, Injected>, Option<Injected>, BoxFuture<'static, Result<T, FxError>>>;

type Body<C, T> = Box<dyn FnOnce(Co<C>) -> BoxFuture<'static, Result<T, FxError>> + Send>;

/// The suspension point of a running computation.
///
/// Every [`Co::perform`] yields exactly one descriptor to the driver and
/// waits for exactly one value of the descriptor's type. Sub-computations
/// are plain `async fn`s taking `&Co<C>`: awaiting one flattens its effects
/// into the caller's, so the driver cannot tell them apart.
pub struct Co<C: 'static> {
    channel: Channel<C>,
}

impl<C: 'static> Co<C> {
    /// Yield `descriptor` and wait for the value the driver resolves it to.
    pub async fn perform<T>(&self, descriptor: Descriptor<C, T>) -> Result<T, FxError>
    where
        T: Send + 'static,
    {
        let operation = descriptor.operation();
        let injected = self.channel.yield_(descriptor.erase()).await;

        injected
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
            .ok_or_else(|| FxError::Mismatch {
                operation: operation.to_string(),
            })
    }
}

impl<C: 'static> Debug for Co<C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Co").finish_non_exhaustive()
    }
}

/// A suspendable computation over the capability object `C` returning `T`.
///
/// The body is an `async` block used as a coroutine: its only suspension
/// points are [`Co::perform`] calls, directly or inside awaited
/// sub-computations. It must not await anything else (timers, I/O); such
/// work belongs in a capability implementation, e.g. through
/// [`Resumption::from_future`](crate::Resumption::from_future).
///
/// A program runs once. Wrap construction in a function to run the same
/// logic again.
///
/// ```
/// use fx_capability::Capabilities;
/// use fx_engine::{Program, Resumption, describe, run};
///
/// let program = Program::<Capabilities, u32>::new(|co| async move {
///     let a = co.perform(describe("two", |_| Resumption::immediate(2u32))).await?;
///     let b = co.perform(describe("three", |_| Resumption::immediate(3u32))).await?;
///     Ok(a * b)
/// });
///
/// let mut handle = run(program.bind(Capabilities::new()).unwrap());
/// assert_eq!(handle.try_outcome().map(Result::ok), Some(Some(6)));
/// ```
pub struct Program<C: 'static, T> {
    requirements: Requirements<C>,
    body: Body<C, T>,
}

impl<C: 'static, T: 'static> Program<C, T> {
    /// Build a program from an async body.
    pub fn new<F, Fut>(body: F) -> Self
    where
        F: FnOnce(Co<C>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, FxError>> + Send + 'static,
    {
        Self {
            requirements: Requirements::new(),
            body: Box::new(move |co: Co<C>| body(co).boxed()),
        }
    }

    /// Declare that the program needs the shape `S`, so binding fails early
    /// when the capability object lacks it.
    pub fn requires<S>(mut self) -> Self
    where
        S: ?Sized + Shape,
        C: Provide<S>,
    {
        self.requirements = self.requirements.require::<S>();
        self
    }

    /// Declare everything in `requirements`, typically those of the
    /// sub-computations the program calls.
    pub fn requires_all(mut self, requirements: &Requirements<C>) -> Self {
        self.requirements.extend(requirements);
        self
    }

    /// The declared requirements.
    pub fn requirements(&self) -> &Requirements<C> {
        &self.requirements
    }

    /// Bind the program to a capability object. See [`bind`].
    pub fn bind(self, capabilities: impl Into<Arc<C>>) -> Result<Bound<C, T>, FxError> {
        bind(self, capabilities)
    }

    pub(crate) fn start(self) -> Coroutine<C, T> {
        let body = self.body;
        Gen::new(move |channel| body(Co { channel }))
    }
}

impl<C: 'static, T> Debug for Program<C, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("requirements", &self.requirements)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Resumption, describe};
    use fx_capability::Capabilities;
    use genawaiter::GeneratorState;
    use pretty_assertions::assert_eq;

    trait Noop: Send + Sync {}

    impl Shape for dyn Noop {
        const NAME: &'static str = "noop";
    }

    fn number(value: u32) -> Descriptor<Capabilities, u32> {
        describe("number", move |_| Resumption::immediate(value))
    }

    async fn sum(co: &Co<Capabilities>, values: &[u32]) -> Result<u32, FxError> {
        let mut total = 0;
        for value in values {
            total += co.perform(number(*value)).await?;
        }
        Ok(total)
    }

    #[fx_macros::test]
    fn it_yields_one_descriptor_per_suspension() {
        let mut coroutine = Program::<Capabilities, u32>::new(|co| async move {
            let first = co.perform(number(1)).await?;
            let second = co.perform(number(2)).await?;
            Ok(first * 10 + second)
        })
        .start();

        let GeneratorState::Yielded(first) = coroutine.resume_with(None) else {
            panic!("expected the first descriptor");
        };
        assert_eq!(first.operation(), "number");

        let GeneratorState::Yielded(_) = coroutine.resume_with(Some(Box::new(4u32) as Injected)) else {
            panic!("expected the second descriptor");
        };

        match coroutine.resume_with(Some(Box::new(7u32) as Injected)) {
            GeneratorState::Complete(result) => assert_eq!(result.ok(), Some(47)),
            GeneratorState::Yielded(_) => panic!("expected completion"),
        }
    }

    #[fx_macros::test]
    fn it_flattens_sub_computations() {
        let mut coroutine = Program::<Capabilities, u32>::new(|co| async move {
            let head = co.perform(number(100)).await?;
            let tail = sum(&co, &[1, 2, 3]).await?;
            Ok(head + tail)
        })
        .start();

        let mut yielded = 0;
        let mut input = None;
        let result = loop {
            match coroutine.resume_with(input.take()) {
                GeneratorState::Yielded(descriptor) => {
                    yielded += 1;
                    let value = match descriptor.resolve(&Capabilities::new()) {
                        Ok(Resumption::Immediate(value)) => value,
                        _ => panic!("expected immediate values"),
                    };
                    input = Some(value);
                }
                GeneratorState::Complete(result) => break result,
            }
        };

        assert_eq!(yielded, 4);
        assert_eq!(result.ok(), Some(106));
    }

    #[fx_macros::test]
    fn it_reports_mistyped_injections() {
        let mut coroutine = Program::<Capabilities, u32>::new(|co| async move {
            co.perform(number(1)).await
        })
        .start();

        let _ = coroutine.resume_with(None);
        match coroutine.resume_with(Some(Box::new("not a number") as Injected)) {
            GeneratorState::Complete(Err(FxError::Mismatch { operation })) => {
                assert_eq!(operation, "number")
            }
            _ => panic!("expected a mismatch"),
        }
    }

    #[fx_macros::test]
    fn it_collects_requirements() {
        let shared = Requirements::<Capabilities>::new().require::<dyn Noop>();
        let program = Program::<Capabilities, ()>::new(|_| async { Ok(()) })
            .requires::<dyn Noop>()
            .requires_all(&shared);

        assert_eq!(program.requirements().operations(), vec!["noop"]);
        assert_eq!(
            format!("{program:?}"),
            r#"Program { requirements: ["noop"], .. }"#
        );
    }
}
