//! Capability shapes and the objects that provide them.
//!
//! A computation describes the side effects it needs as *shapes*: small
//! traits (or value types) named by [`Shape::NAME`]. The object that later
//! fulfils them is any type implementing [`Provide`] for each shape, either
//! a concrete host type (checked by the compiler, see [`provide!`]) or the
//! dynamic [`Capabilities`] registry (checked at run time).
//!
//! # Example
//!
//! ```
//! use fx_capability::{Capabilities, Requirements, Shape, MissingCapability};
//! use std::sync::Arc;
//!
//! pub trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! impl Shape for dyn Clock {
//!     const NAME: &'static str = "now";
//! }
//!
//! struct Frozen;
//!
//! impl Clock for Frozen {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! let requirements = Requirements::<Capabilities>::new().require::<dyn Clock>();
//!
//! assert_eq!(
//!     requirements.check(&Capabilities::new()),
//!     Err(MissingCapability::new("now"))
//! );
//!
//! let capabilities = Capabilities::new().with::<dyn Clock>(Arc::new(Frozen));
//! assert!(requirements.check(&capabilities).is_ok());
//! ```

mod error;
pub use error::*;

mod shape;
pub use shape::*;

mod provide;
pub use provide::*;

mod capabilities;
pub use capabilities::*;

mod requirement;
pub use requirement::*;
