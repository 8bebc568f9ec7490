/// A named capability contract.
///
/// Shapes are usually trait objects (`dyn Print`, `dyn Delay`) whose methods
/// return resumptions, but plain value types (for example a configuration
/// struct) can be shapes too. `NAME` is the operation name reported when the
/// shape is missing from a capability object.
///
/// ```
/// use fx_capability::Shape;
///
/// pub trait Beep: Send + Sync {
///     fn beep(&self);
/// }
///
/// impl Shape for dyn Beep {
///     const NAME: &'static str = "beep";
/// }
///
/// assert_eq!(<dyn Beep as Shape>::NAME, "beep");
/// ```
pub trait Shape: 'static {
    /// Operation name of this shape.
    const NAME: &'static str;
}
