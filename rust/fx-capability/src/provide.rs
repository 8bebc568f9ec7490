use crate::Shape;

/// Implemented by capability objects that can hand out an implementation of
/// the shape `S`.
///
/// A computation that needs several shapes expresses the union as bounds on
/// its capability object, `C: Provide<dyn Print> + Provide<dyn Read>`, which
/// the compiler checks for concrete capability types. The dynamic
/// [`Capabilities`](crate::Capabilities) registry implements `Provide` for
/// every shape and answers at run time instead.
pub trait Provide<S: ?Sized + Shape> {
    /// Returns the implementation of `S`, or `None` when it is not provided.
    fn provide(&self) -> Option<&S>;
}

/// Implements [`Provide`] for a type that directly implements the listed
/// shape traits.
///
/// ```
/// use fx_capability::{Provide, Shape, provide};
///
/// pub trait Beep: Send + Sync {
///     fn beep(&self) -> &'static str;
/// }
///
/// impl Shape for dyn Beep {
///     const NAME: &'static str = "beep";
/// }
///
/// struct Speaker;
///
/// impl Beep for Speaker {
///     fn beep(&self) -> &'static str {
///         "beep!"
///     }
/// }
///
/// provide!(Speaker => dyn Beep);
///
/// let speaker = Speaker;
/// let beep: Option<&dyn Beep> = Provide::<dyn Beep>::provide(&speaker);
/// assert_eq!(beep.map(|b| b.beep()), Some("beep!"));
/// ```
#[macro_export]
macro_rules! provide {
    ($host:ty => $(dyn $shape:path),+ $(,)?) => {
        $(
            impl $crate::Provide<dyn $shape> for $host {
                fn provide(&self) -> ::core::option::Option<&(dyn $shape + 'static)> {
                    ::core::option::Option::Some(self)
                }
            }
        )+
    };
}
