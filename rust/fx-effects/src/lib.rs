//! Sample capability shapes for [`fx_engine`] programs.
//!
//! Each shape is a trait with one operation answering a [`Resumption`], plus
//! a function describing a call to it:
//!
//! | Shape         | Descriptor              | Value    |
//! |---------------|-------------------------|----------|
//! | [`Print`]     | [`print`]`(text)`       | `()`     |
//! | [`Println`]   | [`println`]`(text)`     | `()`     |
//! | [`Read`]      | [`read`]`()`            | `String` |
//! | [`Delay`]     | [`delay`]`(ms)`         | `()`     |
//! | [`RandomInt`] | [`random_int`]`(a, b)`  | `i64`    |
//!
//! [`ask`], [`askln`] and [`delayed_print`] combine them into
//! sub-computations. With the `helpers` feature, [`MemoryConsole`],
//! [`ScriptedInput`], [`ManualTimer`], [`SeededRandom`] and, natively,
//! `TokioTimer` implement the shapes.
//!
//! ```
//! use fx_capability::Capabilities;
//! use fx_effects::{MemoryConsole, Print, Read, ScriptedInput, ask};
//! use fx_engine::{Program, run};
//! use std::sync::Arc;
//!
//! let console = Arc::new(MemoryConsole::new());
//! let capabilities = Capabilities::new()
//!     .with::<dyn Print>(console.clone())
//!     .with::<dyn Read>(Arc::new(ScriptedInput::new(["Ada"])));
//!
//! let program = Program::<Capabilities, String>::new(|co| async move {
//!     let name = ask(&co, "What is your name?").await?;
//!     Ok(format!("Hello, {name}"))
//! });
//!
//! let mut handle = run(program.bind(capabilities)?);
//!
//! assert_eq!(handle.try_outcome().transpose()?, Some("Hello, Ada".to_string()));
//! assert_eq!(console.display(), vec!["What is your name?"]);
//! # Ok::<(), fx_engine::FxError>(())
//! ```
//!
//! [`Resumption`]: fx_engine::Resumption

mod console;
pub use console::*;

mod input;
pub use input::*;

mod timer;
pub use timer::*;

mod random;
pub use random::*;

#[cfg(any(test, feature = "helpers"))]
mod helpers;
#[cfg(any(test, feature = "helpers"))]
pub use helpers::*;
