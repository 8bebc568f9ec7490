//! Random integers drawn from a half-open range.

use fx_capability::{Provide, Shape};
use fx_engine::{Descriptor, FxError, Resumption, try_op};
use thiserror::Error;

/// Raised when asked for a number from a range with no members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot pick a number from the empty range [{min}, {max})")]
pub struct EmptyRange {
    /// Inclusive lower bound.
    pub min: i64,
    /// Exclusive upper bound.
    pub max: i64,
}

impl EmptyRange {
    /// Check that `[min, max)` has at least one member.
    pub fn check(min: i64, max: i64) -> Result<(), EmptyRange> {
        if min < max {
            Ok(())
        } else {
            Err(EmptyRange { min, max })
        }
    }
}

/// Picks integers uniformly from a half-open range.
pub trait RandomInt: Send + Sync {
    /// A number in `[min, max)`. Raises [`EmptyRange`] when `min >= max`.
    fn random_int(&self, min: i64, max: i64) -> Result<Resumption<i64>, FxError>;
}

impl Shape for dyn RandomInt {
    const NAME: &'static str = "random_int";
}

/// Describe picking a number in `[min, max)`.
pub fn random_int<C>(min: i64, max: i64) -> Descriptor<C, i64>
where
    C: Provide<dyn RandomInt> + 'static,
{
    try_op::<dyn RandomInt, C, _, _>(move |random| random.random_int(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[fx_macros::test]
    fn it_accepts_ranges_with_members() {
        assert_eq!(EmptyRange::check(1, 2), Ok(()));
        assert_eq!(EmptyRange::check(-5, 5), Ok(()));
    }

    #[fx_macros::test]
    fn it_rejects_empty_ranges() {
        let error = EmptyRange::check(3, 3);

        assert_eq!(error, Err(EmptyRange { min: 3, max: 3 }));
        assert_eq!(
            error.map_err(|error| error.to_string()),
            Err("Cannot pick a number from the empty range [3, 3)".to_string())
        );
    }
}
