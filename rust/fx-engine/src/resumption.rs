//! The result of resolving one effect.
//!
//! A [`Resumption`] is either [`Immediate`](Resumption::Immediate), when the
//! value is already known, or [`Deferred`](Resumption::Deferred), when the
//! capability will deliver it later through a one-shot [`Continuation`].
//! Registering a deferred resumption yields a [`Cancel`] handle that releases
//! whatever the capability set up (a timer, a listener) if the run is
//! cancelled before the value arrives.

use std::fmt::{Debug, Formatter};

/// Releases the resource behind a pending [`Resumption::Deferred`].
///
/// Cancelling consumes the handle, so the release runs at most once. A
/// handle whose resumption already settled must be safe to cancel, which is
/// the responsibility of the capability that created it. Dropping a handle
/// without cancelling does not release anything.
pub struct Cancel {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Cancel {
    /// Cancel by running `release`.
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to release.
    pub fn noop() -> Self {
        Self { release: None }
    }

    /// Run the release, if there is one.
    pub fn cancel(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Debug for Cancel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cancel")
            .field("noop", &self.release.is_none())
            .finish()
    }
}

/// One-shot callback through which a deferred capability delivers its value.
///
/// [`Continuation::resume`] consumes the continuation, so it can never be
/// invoked twice. Dropping a continuation without resuming it tells the
/// driver the value will never arrive, which fails the run with
/// [`FxError::Abandoned`](crate::FxError::Abandoned) unless it was already
/// cancelled.
pub struct Continuation<T> {
    settle: Option<Box<dyn FnOnce(Option<T>) + Send>>,
}

impl<T> Continuation<T> {
    pub(crate) fn new<F>(settle: F) -> Self
    where
        F: FnOnce(Option<T>) + Send + 'static,
    {
        Self {
            settle: Some(Box::new(settle)),
        }
    }

    /// Deliver the eventual value.
    pub fn resume(mut self, value: T) {
        if let Some(settle) = self.settle.take() {
            settle(Some(value));
        }
    }
}

impl<T: 'static> Continuation<T> {
    /// A continuation accepting `U` that converts it with `f` before
    /// resuming this one.
    fn contramap<U, F>(self, f: F) -> Continuation<U>
    where
        F: FnOnce(U) -> T + Send + 'static,
    {
        Continuation::new(move |value: Option<U>| {
            let mut inner = self;
            if let Some(settle) = inner.settle.take() {
                settle(value.map(f));
            }
        })
    }
}

impl<T> Drop for Continuation<T> {
    fn drop(&mut self) {
        if let Some(settle) = self.settle.take() {
            settle(None);
        }
    }
}

impl<T> Debug for Continuation<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Continuation")
            .field("settled", &self.settle.is_none())
            .finish()
    }
}

type Register<T> = Box<dyn FnOnce(Continuation<T>) -> Cancel + Send>;

/// The registration half of a deferred resumption.
pub struct Deferred<T> {
    register: Register<T>,
}

impl<T> Deferred<T> {
    /// Start the external work, handing it the continuation to call once.
    pub fn register(self, continuation: Continuation<T>) -> Cancel {
        (self.register)(continuation)
    }
}

/// The result of one effect, available now or later.
pub enum Resumption<T> {
    /// The effect already has its answer.
    Immediate(T),
    /// The effect completes later through a continuation.
    Deferred(Deferred<T>),
}

impl<T: Send + 'static> Resumption<T> {
    /// A resumption whose value is already known.
    pub fn immediate(value: T) -> Self {
        Self::Immediate(value)
    }

    /// A resumption that completes later.
    ///
    /// `register` is called once by the driver. It must start exactly one
    /// piece of external work, arrange for the continuation to be resumed
    /// once with the value, and return a [`Cancel`] releasing that work.
    ///
    /// ```
    /// use fx_engine::{Cancel, Resumption};
    /// use std::sync::{Arc, Mutex};
    ///
    /// let pending = Arc::new(Mutex::new(None));
    /// let slot = pending.clone();
    ///
    /// let resumption: Resumption<u8> = Resumption::deferred(move |continuation| {
    ///     *slot.lock().unwrap() = Some(continuation);
    ///     Cancel::noop()
    /// });
    ///
    /// assert!(!resumption.is_immediate());
    /// ```
    pub fn deferred<F>(register: F) -> Self
    where
        F: FnOnce(Continuation<T>) -> Cancel + Send + 'static,
    {
        Self::Deferred(Deferred {
            register: Box::new(register),
        })
    }

    /// Whether the value is already available.
    pub fn is_immediate(&self) -> bool {
        matches!(self, Self::Immediate(_))
    }

    /// Transform the eventual value. A deferred resumption stays deferred.
    pub fn map<U, F>(self, f: F) -> Resumption<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        match self {
            Self::Immediate(value) => Resumption::Immediate(f(value)),
            Self::Deferred(deferred) => Resumption::deferred(move |continuation: Continuation<U>| {
                deferred.register(continuation.contramap(f))
            }),
        }
    }

    /// A deferred resumption settled by `future`, which is spawned on the
    /// ambient tokio runtime when the driver registers it. Cancelling aborts
    /// the task.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::deferred(move |continuation| {
            let task = tokio::spawn(async move {
                continuation.resume(future.await);
            });
            Cancel::new(move || task.abort())
        })
    }
}

impl<T: Debug> Debug for Resumption<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Immediate(value) => f.debug_tuple("Immediate").field(value).finish(),
            Self::Deferred(_) => f.write_str("Deferred"),
        }
    }
}
