//! Line input and the question-and-answer computations built on it.

use crate::{Print, Println, print, println};
use fx_capability::{Provide, Requirements, Shape};
use fx_engine::{Co, Descriptor, FxError, Resumption, op};

/// Reads one line of user input.
pub trait Read: Send + Sync {
    /// Resume with the next line, without its line terminator.
    fn read(&self) -> Resumption<String>;
}

impl Shape for dyn Read {
    const NAME: &'static str = "read";
}

/// Describe reading a line.
pub fn read<C>() -> Descriptor<C, String>
where
    C: Provide<dyn Read> + 'static,
{
    op::<dyn Read, C, _, _>(|input| input.read())
}

/// Show `prompt` in place of the display, then read the answer.
pub async fn ask<C>(co: &Co<C>, prompt: &str) -> Result<String, FxError>
where
    C: Provide<dyn Print> + Provide<dyn Read> + 'static,
{
    co.perform(print(prompt)).await?;
    co.perform(read()).await
}

/// Append `prompt` to the display, then read the answer.
pub async fn askln<C>(co: &Co<C>, prompt: &str) -> Result<String, FxError>
where
    C: Provide<dyn Println> + Provide<dyn Read> + 'static,
{
    co.perform(println(prompt)).await?;
    co.perform(read()).await
}

/// Everything [`ask`] and [`askln`] use, for programs to declare.
pub fn conversation<C>() -> Requirements<C>
where
    C: Provide<dyn Print> + Provide<dyn Println> + Provide<dyn Read>,
{
    Requirements::new()
        .require::<dyn Print>()
        .require::<dyn Println>()
        .require::<dyn Read>()
}
