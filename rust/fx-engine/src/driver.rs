//! The trampoline that runs bound programs.
//!
//! A run alternates between stepping the program and waiting for one
//! deferred resumption. Immediate values are fed back in a loop, so an
//! arbitrarily long chain of them never grows the stack. When a deferred
//! resumption is registered the driver parks the program in the shared run
//! state and returns; the continuation picks it up again on whichever thread
//! settles it.
//!
//! The run state sits behind a mutex, but the lock is never held while user
//! code executes. Resolvers, registrations, cancel handles and program steps
//! all run with the lock released.

use crate::computation::Coroutine;
use crate::descriptor::Injected;
use crate::{Bound, Cancel, Continuation, FxError, Resumption, RunSettings};
use futures::FutureExt;
use futures::future::BoxFuture;
use genawaiter::GeneratorState;
use parking_lot::Mutex;
use std::fmt::{Debug, Formatter};
use std::future::IntoFuture;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

/// Observable state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The program is being stepped.
    Stepping,
    /// The program is parked on a deferred resumption.
    Awaiting,
    /// The program returned a value.
    Completed,
    /// The program, or one of its effects, failed.
    Failed,
    /// The run was cancelled while awaiting.
    Cancelled,
}

impl Status {
    /// Whether the run has ended.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    fn of<T>(result: &Result<T, FxError>) -> Self {
        match result {
            Ok(_) => Self::Completed,
            Err(_) => Self::Failed,
        }
    }
}

enum Phase<C: 'static, T> {
    Stepping,
    /// `register` is executing.
    Registering,
    Awaiting {
        coroutine: Coroutine<C, T>,
        cancel: Cancel,
        operation: &'static str,
    },
    Finished(Status),
}

struct Run<C: 'static, T> {
    phase: Phase<C, T>,
    /// A settlement that arrived while `register` was executing.
    early: Option<Option<Injected>>,
    cancel_requested: bool,
    steps: u64,
    outcome: Option<oneshot::Sender<Result<T, FxError>>>,
}

impl<C: 'static, T> Run<C, T> {
    fn new(outcome: oneshot::Sender<Result<T, FxError>>) -> Self {
        Self {
            phase: Phase::Stepping,
            early: None,
            cancel_requested: false,
            steps: 0,
            outcome: Some(outcome),
        }
    }
}

struct RunCell<C: 'static, T> {
    settings: RunSettings,
    capabilities: Arc<C>,
    state: Mutex<Run<C, T>>,
}

/// How a registration ended once `register` returned.
enum Registered<C: 'static, T> {
    Settled(Coroutine<C, T>, Injected),
    Abandoned,
    Cancelled,
    Parked,
}

impl<C, T> RunCell<C, T>
where
    C: Send + Sync + 'static,
    T: Send + 'static,
{
    fn drive(self: &Arc<Self>, mut coroutine: Coroutine<C, T>, mut input: Option<Injected>) {
        let label = &self.settings.label;

        loop {
            let descriptor = match coroutine.resume_with(input.take()) {
                GeneratorState::Complete(result) => {
                    drop(coroutine);
                    let status = Status::of(&result);
                    return self.finish(status, result);
                }
                GeneratorState::Yielded(descriptor) => descriptor,
            };
            let operation = descriptor.operation();

            let exceeded = {
                let mut run = self.state.lock();
                match self.settings.step_limit {
                    Some(limit) if run.steps >= limit => Some(limit),
                    _ => {
                        run.steps += 1;
                        None
                    }
                }
            };
            if let Some(limit) = exceeded {
                debug!("Run `{label}` stopped at `{operation}` after {limit} steps");
                drop(descriptor);
                drop(coroutine);
                return self.finish(Status::Failed, Err(FxError::StepLimit { limit }));
            }

            trace!("Run `{label}` resolving `{operation}`");

            let deferred = match descriptor.resolve(&self.capabilities) {
                Ok(Resumption::Immediate(value)) => {
                    input = Some(value);
                    continue;
                }
                Ok(Resumption::Deferred(deferred)) => deferred,
                Err(error) => {
                    drop(coroutine);
                    return self.finish(Status::Failed, Err(error));
                }
            };

            {
                let mut run = self.state.lock();
                run.phase = Phase::Registering;
                run.early = None;
                run.cancel_requested = false;
            }

            let cell = Arc::clone(self);
            let cancel = deferred.register(Continuation::new(move |value| cell.settle(value)));

            match self.registered(coroutine, cancel, operation) {
                Registered::Settled(resumed, value) => {
                    coroutine = resumed;
                    input = Some(value);
                }
                Registered::Abandoned => {
                    warn!("Run `{label}` abandoned by `{operation}` during registration");
                    return self.finish(
                        Status::Failed,
                        Err(FxError::Abandoned {
                            operation: operation.to_string(),
                        }),
                    );
                }
                Registered::Cancelled => {
                    debug!("Run `{label}` cancelled while registering `{operation}`");
                    return self.finish(Status::Cancelled, Err(FxError::Cancelled));
                }
                Registered::Parked => {
                    trace!("Run `{label}` awaiting `{operation}`");
                    return;
                }
            }
        }
    }

    /// Settle what happens once `register` returned: cancellation requested
    /// in the meantime wins over a value delivered in the meantime.
    fn registered(
        &self,
        coroutine: Coroutine<C, T>,
        cancel: Cancel,
        operation: &'static str,
    ) -> Registered<C, T> {
        let mut run = self.state.lock();
        let early = run.early.take();

        if run.cancel_requested {
            run.phase = Phase::Stepping;
            drop(run);
            cancel.cancel();
            drop(early);
            drop(coroutine);
            return Registered::Cancelled;
        }

        match early {
            Some(Some(value)) => {
                run.phase = Phase::Stepping;
                drop(run);
                drop(cancel);
                Registered::Settled(coroutine, value)
            }
            Some(None) => {
                run.phase = Phase::Stepping;
                drop(run);
                drop(cancel);
                drop(coroutine);
                Registered::Abandoned
            }
            None => {
                run.phase = Phase::Awaiting {
                    coroutine,
                    cancel,
                    operation,
                };
                Registered::Parked
            }
        }
    }

    fn settle(self: &Arc<Self>, value: Option<Injected>) {
        let mut run = self.state.lock();
        match std::mem::replace(&mut run.phase, Phase::Stepping) {
            Phase::Registering => {
                run.phase = Phase::Registering;
                run.early = Some(value);
            }
            Phase::Awaiting {
                coroutine,
                cancel,
                operation,
            } => {
                drop(run);
                drop(cancel);
                match value {
                    Some(value) => self.drive(coroutine, Some(value)),
                    None => {
                        warn!(
                            "Run `{}` abandoned: continuation for `{operation}` was dropped",
                            self.settings.label
                        );
                        drop(coroutine);
                        self.finish(
                            Status::Failed,
                            Err(FxError::Abandoned {
                                operation: operation.to_string(),
                            }),
                        );
                    }
                }
            }
            phase => {
                run.phase = phase;
                drop(run);
                if value.is_some() {
                    warn!(
                        "Run `{}` ignored a value delivered after it stopped waiting",
                        self.settings.label
                    );
                }
            }
        }
    }

    fn finish(&self, status: Status, result: Result<T, FxError>) {
        match &result {
            Ok(_) => debug!("Run `{}` completed", self.settings.label),
            Err(error) => debug!("Run `{}` ended: {error}", self.settings.label),
        }

        let mut run = self.state.lock();
        run.phase = Phase::Finished(status);
        let unclaimed = match run.outcome.take() {
            Some(sender) => sender.send(result).err(),
            None => Some(result),
        };
        drop(run);
        drop(unclaimed);
    }
}

trait Control: Send + Sync {
    fn status(&self) -> Status;
    fn steps(&self) -> u64;
    fn cancel(&self) -> bool;
}

impl<C, T> Control for RunCell<C, T>
where
    C: Send + Sync + 'static,
    T: Send + 'static,
{
    fn status(&self) -> Status {
        match self.state.lock().phase {
            Phase::Stepping | Phase::Registering => Status::Stepping,
            Phase::Awaiting { .. } => Status::Awaiting,
            Phase::Finished(status) => status,
        }
    }

    fn steps(&self) -> u64 {
        self.state.lock().steps
    }

    fn cancel(&self) -> bool {
        let mut run = self.state.lock();
        match std::mem::replace(&mut run.phase, Phase::Stepping) {
            Phase::Awaiting {
                coroutine,
                cancel,
                operation,
            } => {
                run.phase = Phase::Finished(Status::Cancelled);
                drop(run);
                debug!(
                    "Run `{}` cancelled while awaiting `{operation}`",
                    self.settings.label
                );
                cancel.cancel();
                drop(coroutine);
                self.finish(Status::Cancelled, Err(FxError::Cancelled));
                true
            }
            Phase::Registering => {
                run.phase = Phase::Registering;
                run.cancel_requested = true;
                true
            }
            phase => {
                run.phase = phase;
                false
            }
        }
    }
}

/// Handle to a started run.
///
/// Dropping the handle detaches the run. It keeps going as long as some
/// capability holds its continuation, and its outcome is discarded.
pub struct RunHandle<T> {
    control: Arc<dyn Control>,
    /// `None` once the outcome was taken or the run was dropped.
    receiver: Option<oneshot::Receiver<Result<T, FxError>>>,
}

impl<T> RunHandle<T> {
    /// Current state of the run.
    pub fn status(&self) -> Status {
        self.control.status()
    }

    /// Whether the run has ended.
    pub fn is_finished(&self) -> bool {
        self.status().is_final()
    }

    /// Number of descriptors resolved so far.
    pub fn steps(&self) -> u64 {
        self.control.steps()
    }

    /// Cancel the outstanding deferred wait, if there is one.
    ///
    /// The wait's [`Cancel`] handle runs exactly once and the run ends with
    /// [`FxError::Cancelled`]. Returns `false`, doing nothing, when the run
    /// is not waiting.
    pub fn cancel(&self) -> bool {
        self.control.cancel()
    }

    /// Take the outcome if the run has ended. Returns `None` while it is
    /// still going, and after the outcome was taken once.
    pub fn try_outcome(&mut self) -> Option<Result<T, FxError>> {
        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(outcome) => {
                self.receiver = None;
                Some(outcome)
            }
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                self.receiver = None;
                None
            }
        }
    }

    /// Wait for the outcome.
    ///
    /// Fails with [`FxError::Lost`] if the outcome was already taken
    /// through [`RunHandle::try_outcome`], or if the run was dropped while
    /// still waiting.
    pub async fn join(self) -> Result<T, FxError> {
        match self.receiver {
            Some(receiver) => receiver.await.unwrap_or(Err(FxError::Lost)),
            None => Err(FxError::Lost),
        }
    }
}

impl<T: Send + 'static> IntoFuture for RunHandle<T> {
    type Output = Result<T, FxError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        self.join().boxed()
    }
}

impl<T> Debug for RunHandle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHandle")
            .field("status", &self.status())
            .field("steps", &self.steps())
            .finish()
    }
}

/// Run a bound program with default settings.
///
/// The program is stepped on the calling thread until it finishes or parks
/// on a deferred resumption, so a program made only of immediate effects has
/// finished by the time this returns.
pub fn run<C, T>(bound: Bound<C, T>) -> RunHandle<T>
where
    C: Send + Sync + 'static,
    T: Send + 'static,
{
    run_with(bound, RunSettings::default())
}

/// Run a bound program with explicit settings.
pub fn run_with<C, T>(bound: Bound<C, T>, settings: RunSettings) -> RunHandle<T>
where
    C: Send + Sync + 'static,
    T: Send + 'static,
{
    let (program, capabilities) = bound.into_parts();
    let (sender, receiver) = oneshot::channel();

    debug!("Run `{}` started", settings.label);

    let cell = Arc::new(RunCell {
        settings,
        capabilities,
        state: Mutex::new(Run::new(sender)),
    });
    cell.drive(program.start(), None);

    RunHandle {
        control: cell,
        receiver: Some(receiver),
    }
}
