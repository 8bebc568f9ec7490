//! Ready-made implementations of the sample shapes, for tests and demos.

use crate::{Delay, EmptyRange, Print, Println, RandomInt, Read};
use fx_engine::{Cancel, Continuation, FxError, Resumption};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Default)]
struct Screen {
    display: Vec<String>,
    history: Vec<String>,
}

/// A console that keeps its output in memory.
///
/// [`Print`] replaces the display with one line and [`Println`] appends one.
/// Every line is also kept in the history, in order.
#[derive(Debug, Default)]
pub struct MemoryConsole {
    screen: Mutex<Screen>,
}

impl MemoryConsole {
    /// An empty console.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines currently on display.
    pub fn display(&self) -> Vec<String> {
        self.screen.lock().display.clone()
    }

    /// Every line printed so far.
    pub fn history(&self) -> Vec<String> {
        self.screen.lock().history.clone()
    }
}

impl Print for MemoryConsole {
    fn print(&self, text: &str) -> Resumption<()> {
        let mut screen = self.screen.lock();
        screen.display.clear();
        screen.display.push(text.to_string());
        screen.history.push(text.to_string());
        Resumption::immediate(())
    }
}

impl Println for MemoryConsole {
    fn println(&self, text: &str) -> Resumption<()> {
        let mut screen = self.screen.lock();
        screen.display.push(text.to_string());
        screen.history.push(text.to_string());
        Resumption::immediate(())
    }
}

#[derive(Debug, Default)]
struct Script {
    lines: VecDeque<String>,
    waiting: Option<Continuation<String>>,
    reads: usize,
}

/// Input fed from a queue of lines.
///
/// A read takes the next queued line. When the queue is empty the read
/// waits until [`ScriptedInput::push`] supplies one. Inputs built with
/// [`ScriptedInput::deferred`] always answer through a continuation, even
/// when a line is queued, which then settles during registration.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    script: Arc<Mutex<Script>>,
    deferred: bool,
}

impl ScriptedInput {
    /// Input answering queued lines immediately.
    pub fn new<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            script: Arc::new(Mutex::new(Script {
                lines: lines.into_iter().map(Into::into).collect(),
                ..Script::default()
            })),
            deferred: false,
        }
    }

    /// Input answering every read through a continuation.
    pub fn deferred<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            deferred: true,
            ..Self::new(lines)
        }
    }

    /// Hand `line` to the waiting read, or queue it for the next one.
    pub fn push(&self, line: impl Into<String>) {
        let line = line.into();
        let mut script = self.script.lock();
        match script.waiting.take() {
            Some(continuation) => {
                drop(script);
                continuation.resume(line);
            }
            None => script.lines.push_back(line),
        }
    }

    /// Number of reads requested so far.
    pub fn reads(&self) -> usize {
        self.script.lock().reads
    }

    /// Number of queued lines not yet read.
    pub fn remaining(&self) -> usize {
        self.script.lock().lines.len()
    }

    /// Whether a read is waiting for a line.
    pub fn is_waiting(&self) -> bool {
        self.script.lock().waiting.is_some()
    }
}

impl Read for ScriptedInput {
    fn read(&self) -> Resumption<String> {
        let mut script = self.script.lock();
        script.reads += 1;
        if !self.deferred {
            if let Some(line) = script.lines.pop_front() {
                return Resumption::immediate(line);
            }
        }
        drop(script);

        let state = self.script.clone();
        Resumption::deferred(move |continuation| {
            let mut script = state.lock();
            match script.lines.pop_front() {
                Some(line) => {
                    drop(script);
                    continuation.resume(line);
                    Cancel::noop()
                }
                None => {
                    script.waiting = Some(continuation);
                    drop(script);
                    Cancel::new(move || {
                        let abandoned = state.lock().waiting.take();
                        drop(abandoned);
                    })
                }
            }
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use tokio_timer::*;

#[cfg(not(target_arch = "wasm32"))]
mod tokio_timer {
    use crate::Delay;
    use fx_engine::{Cancel, Resumption};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;
    use tracing::trace;

    #[derive(Debug, Default)]
    struct TimerStats {
        created: AtomicUsize,
        cleared: AtomicUsize,
        fired: AtomicUsize,
    }

    /// Real timers on the ambient tokio runtime.
    ///
    /// Each delay spawns one sleeping task. Cancelling a delay that has not
    /// fired aborts the task and counts the timer as cleared. Clones share
    /// their counters.
    #[derive(Debug, Clone, Default)]
    pub struct TokioTimer {
        stats: Arc<TimerStats>,
    }

    impl TokioTimer {
        /// A timer with all counters at zero.
        pub fn new() -> Self {
            Self::default()
        }

        /// Timers started.
        pub fn created(&self) -> usize {
            self.stats.created.load(Ordering::SeqCst)
        }

        /// Timers cancelled before firing.
        pub fn cleared(&self) -> usize {
            self.stats.cleared.load(Ordering::SeqCst)
        }

        /// Timers that ran to completion.
        pub fn fired(&self) -> usize {
            self.stats.fired.load(Ordering::SeqCst)
        }
    }

    impl Delay for TokioTimer {
        fn delay(&self, ms: u64) -> Resumption<()> {
            let stats = self.stats.clone();
            Resumption::deferred(move |continuation| {
                stats.created.fetch_add(1, Ordering::SeqCst);
                let settled = Arc::new(AtomicBool::new(false));

                let task = tokio::spawn({
                    let settled = settled.clone();
                    let stats = stats.clone();
                    async move {
                        tokio::time::sleep(Duration::from_millis(ms)).await;
                        if !settled.swap(true, Ordering::SeqCst) {
                            trace!("Timer of {ms}ms fired");
                            stats.fired.fetch_add(1, Ordering::SeqCst);
                            continuation.resume(());
                        }
                    }
                });

                Cancel::new(move || {
                    if !settled.swap(true, Ordering::SeqCst) {
                        trace!("Timer of {ms}ms cleared");
                        task.abort();
                        stats.cleared.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
        }
    }
}

#[derive(Debug, Default)]
struct Timers {
    next: u64,
    pending: BTreeMap<u64, (u64, Continuation<()>)>,
    created: usize,
    cleared: usize,
}

/// Timers that fire only when told to.
///
/// Delays park until [`ManualTimer::fire_next`] resumes the oldest one, so
/// tests control exactly when a program continues. Clones share their
/// timers.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    timers: Arc<Mutex<Timers>>,
}

impl ManualTimer {
    /// A timer with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// Durations of the pending delays, oldest first.
    pub fn pending(&self) -> Vec<u64> {
        self.timers
            .lock()
            .pending
            .values()
            .map(|(ms, _)| *ms)
            .collect()
    }

    /// Fire the oldest pending delay. Returns `false` if none is pending.
    pub fn fire_next(&self) -> bool {
        let next = self.timers.lock().pending.pop_first();
        match next {
            Some((_, (ms, continuation))) => {
                trace!("Manual timer of {ms}ms fired");
                continuation.resume(());
                true
            }
            None => false,
        }
    }

    /// Delays started.
    pub fn created(&self) -> usize {
        self.timers.lock().created
    }

    /// Delays cancelled before firing.
    pub fn cleared(&self) -> usize {
        self.timers.lock().cleared
    }
}

impl Delay for ManualTimer {
    fn delay(&self, ms: u64) -> Resumption<()> {
        let timers = self.timers.clone();
        Resumption::deferred(move |continuation| {
            let id = {
                let mut state = timers.lock();
                let id = state.next;
                state.next += 1;
                state.created += 1;
                state.pending.insert(id, (ms, continuation));
                id
            };

            Cancel::new(move || {
                let mut state = timers.lock();
                let removed = state.pending.remove(&id);
                if removed.is_some() {
                    state.cleared += 1;
                }
                drop(state);
                drop(removed);
            })
        })
    }
}

/// Deterministic random numbers from a fixed seed.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// A generator seeded with `seed`. Equal seeds give equal sequences.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomInt for SeededRandom {
    fn random_int(&self, min: i64, max: i64) -> Result<Resumption<i64>, FxError> {
        EmptyRange::check(min, max).map_err(FxError::raise)?;
        Ok(Resumption::immediate(self.rng.lock().gen_range(min..max)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn immediate<T>(resumption: Resumption<T>) -> Option<T> {
        match resumption {
            Resumption::Immediate(value) => Some(value),
            Resumption::Deferred(_) => None,
        }
    }

    #[fx_macros::test]
    fn it_replaces_and_appends_console_lines() {
        let console = MemoryConsole::new();

        let _ = console.println("one");
        let _ = console.println("two");
        assert_eq!(console.display(), vec!["one", "two"]);

        let _ = console.print("three");
        assert_eq!(console.display(), vec!["three"]);
        assert_eq!(console.history(), vec!["one", "two", "three"]);
    }

    #[fx_macros::test]
    fn it_reads_queued_lines_immediately() {
        let input = ScriptedInput::new(["left", "right"]);

        assert_eq!(immediate(input.read()), Some("left".to_string()));
        assert_eq!(immediate(input.read()), Some("right".to_string()));
        assert_eq!(input.reads(), 2);
        assert_eq!(input.remaining(), 0);
    }

    #[fx_macros::test]
    fn it_defers_reads_until_a_line_is_pushed() {
        let input = ScriptedInput::new(Vec::<String>::new());

        let resumption = input.read();
        assert!(!resumption.is_immediate());
        assert!(!input.is_waiting());

        input.push("queued");
        assert_eq!(input.remaining(), 1);
    }

    #[fx_macros::test]
    fn it_draws_from_the_requested_range() -> anyhow::Result<()> {
        let random = SeededRandom::new(7);

        for _ in 0..100 {
            let value = immediate(random.random_int(1, 5)?);
            assert!(value.is_some_and(|value| (1..5).contains(&value)));
        }
        Ok(())
    }

    #[fx_macros::test]
    fn it_repeats_sequences_for_equal_seeds() -> anyhow::Result<()> {
        let first = SeededRandom::new(42);
        let second = SeededRandom::new(42);

        for _ in 0..10 {
            assert_eq!(
                immediate(first.random_int(0, 1000)?),
                immediate(second.random_int(0, 1000)?)
            );
        }
        Ok(())
    }

    #[fx_macros::test]
    fn it_raises_on_empty_ranges() {
        let random = SeededRandom::new(1);

        match random.random_int(5, 5) {
            Err(FxError::Raised(error)) => assert_eq!(
                error.to_string(),
                "Cannot pick a number from the empty range [5, 5)"
            ),
            other => panic!("expected an empty range error, got {other:?}"),
        }
    }
}
