//! Console output shapes and the delayed print built on them.

use crate::{Delay, delay};
use fx_capability::{Provide, Shape};
use fx_engine::{Co, Descriptor, FxError, Resumption, op};

/// Replaces the displayed text with a line.
pub trait Print: Send + Sync {
    /// Show `text` in place of whatever was displayed before.
    fn print(&self, text: &str) -> Resumption<()>;
}

impl Shape for dyn Print {
    const NAME: &'static str = "print";
}

/// Appends a line to the displayed text.
pub trait Println: Send + Sync {
    /// Show `text` below whatever is displayed.
    fn println(&self, text: &str) -> Resumption<()>;
}

impl Shape for dyn Println {
    const NAME: &'static str = "println";
}

/// Describe replacing the display with `text`.
pub fn print<C>(text: impl Into<String>) -> Descriptor<C, ()>
where
    C: Provide<dyn Print> + 'static,
{
    let text = text.into();
    op::<dyn Print, C, _, _>(move |console| console.print(&text))
}

/// Describe appending `text` to the display.
pub fn println<C>(text: impl Into<String>) -> Descriptor<C, ()>
where
    C: Provide<dyn Println> + 'static,
{
    let text = text.into();
    op::<dyn Println, C, _, _>(move |console| console.println(&text))
}

/// Show `text`, then hold it on screen for `ms` milliseconds.
pub async fn delayed_print<C>(co: &Co<C>, text: &str, ms: u64) -> Result<(), FxError>
where
    C: Provide<dyn Print> + Provide<dyn Delay> + 'static,
{
    co.perform(print(text)).await?;
    co.perform(delay(ms)).await
}
