//! Millisecond delays.

use fx_capability::{Provide, Shape};
use fx_engine::{Descriptor, Resumption, op};

/// Waits for a number of milliseconds.
///
/// Implementations answer with a deferred resumption whose cancel handle
/// clears the pending timer.
pub trait Delay: Send + Sync {
    /// Resume after `ms` milliseconds.
    fn delay(&self, ms: u64) -> Resumption<()>;
}

impl Shape for dyn Delay {
    const NAME: &'static str = "delay";
}

/// Describe waiting `ms` milliseconds.
pub fn delay<C>(ms: u64) -> Descriptor<C, ()>
where
    C: Provide<dyn Delay> + 'static,
{
    op::<dyn Delay, C, _, _>(move |timer| timer.delay(ms))
}
