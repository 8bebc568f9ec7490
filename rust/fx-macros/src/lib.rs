#![warn(missing_docs)]

//! Procedural macros for the fx workspace.
//!
//! Procedural macros must be defined in their own crate, which is why these live
//! here rather than in the crates that use them.

use proc_macro::TokenStream;

// disabling because we don't want to add crate dependencies just for this
#[cfg(not(doctest))]
/// A cross-platform test attribute.
///
/// Sync tests become plain `#[test]` functions and async tests become
/// `#[tokio::test]` functions on native targets. On `wasm32` both become
/// `wasm_bindgen_test` functions.
///
/// ```rs
/// #[fx_macros::test]
/// fn it_works() {
///     assert_eq!(2 + 2, 4);
/// }
///
/// #[fx_macros::test]
/// async fn it_works_async() -> anyhow::Result<()> {
///     assert_eq!(2 + 2, 4);
///     Ok(())
/// }
/// ```
///
/// Async tests that fire continuations from other threads can ask for the
/// multi-threaded tokio runtime:
///
/// ```rs
/// #[fx_macros::test(multi_thread)]
/// async fn it_resumes_from_a_worker() {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
    test::generate(attr, item)
}
