//! Suspendable effect computations and the driver that runs them.
//!
//! A [`Program`] is business logic that never performs a side effect
//! itself. Each time it needs one it hands the driver an inert
//! [`Descriptor`] through [`Co::perform`] and suspends. The driver resolves
//! the descriptor against the capability object the program was bound to,
//! which answers with a [`Resumption`]: the value right away, or a
//! registration that delivers it later through a one-shot [`Continuation`].
//!
//! Running is split in two steps. [`bind`] pairs a program with a
//! capability object, failing with [`FxError::MissingCapability`] if a
//! declared requirement is absent. [`run`] then steps the bound program and
//! returns a [`RunHandle`] to observe, await or cancel it.
//!
//! ```
//! use fx_capability::{Capabilities, Shape};
//! use fx_engine::{FxError, Program, Resumption, Status, op, run};
//! use std::sync::Arc;
//!
//! pub trait Greeting: Send + Sync {
//!     fn greeting(&self, name: &str) -> Resumption<String>;
//! }
//!
//! impl Shape for dyn Greeting {
//!     const NAME: &'static str = "greeting";
//! }
//!
//! struct Polite;
//!
//! impl Greeting for Polite {
//!     fn greeting(&self, name: &str) -> Resumption<String> {
//!         Resumption::immediate(format!("Good day, {name}"))
//!     }
//! }
//!
//! let program = Program::<Capabilities, String>::new(|co| async move {
//!     co.perform(op::<dyn Greeting, _, _, _>(|shape| shape.greeting("Ada")))
//!         .await
//! })
//! .requires::<dyn Greeting>();
//!
//! let missing = program.bind(Capabilities::new()).err();
//! assert!(matches!(missing, Some(FxError::MissingCapability(_))));
//!
//! # let program = Program::<Capabilities, String>::new(|co| async move {
//! #     co.perform(op::<dyn Greeting, _, _, _>(|shape| shape.greeting("Ada")))
//! #         .await
//! # });
//! let capabilities = Capabilities::new().with::<dyn Greeting>(Arc::new(Polite));
//! let mut handle = run(program.bind(capabilities)?);
//!
//! assert_eq!(handle.status(), Status::Completed);
//! assert_eq!(handle.try_outcome().transpose()?, Some("Good day, Ada".to_string()));
//! # Ok::<(), FxError>(())
//! ```

mod error;
pub use error::*;

mod resumption;
pub use resumption::*;

mod descriptor;
pub use descriptor::*;

mod computation;
pub use computation::*;

mod bind;
pub use bind::*;

mod settings;
pub use settings::*;

mod driver;
pub use driver::*;
