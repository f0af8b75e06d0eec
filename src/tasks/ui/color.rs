use ::ansi_term::Style;
use ::std::fmt;

/// A thing that might colorize text based on a value.
pub trait PaintAs<D, C> {
    fn paint_as(&self, compared: &C, displayed: D) -> String;
}

/// Picks the style of the first threshold that the value exceeds.
pub struct ColorByRange<T> {
    /// In decreasing order.
    pub divs: Vec<(T, Style)>,
    pub lowest: Style,
}

impl<T> ColorByRange<T> {
    pub fn new(divs: Vec<(T, Style)>, lowest: Style) -> ColorByRange<T>
    { ColorByRange { divs, lowest } }

    fn style_of(&self, x: &T) -> Style
    where T: PartialOrd,
    {
        for &(ref pivot, style) in &self.divs {
            if x > pivot { return style; }
        }
        self.lowest
    }
}

impl<D, C> PaintAs<D, C> for ColorByRange<C>
  where C: PartialOrd, D: fmt::Display,
{
    fn paint_as(&self, compared: &C, displayed: D) -> String
    { paint(self.style_of(compared), displayed).to_string() }
}

// hack for type inference issues
pub fn paint<T>(
    style: Style,
    value: T,
) -> Wrapper<T, T>
{ gpaint(style, value) }

pub fn gpaint<U, T>(
    style: Style,
    value: U,
) -> Wrapper<U, T>
{ Wrapper { style, value, _target: Default::default() } }

/// Wraps a value so that `Display` emits it between the style's escape codes.
///
/// It has two parameters so that it can `borrow()` `U` as `T` when it wants to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Wrapper<U, T=U> {
    style: Style,
    value: U,
    _target: ::std::marker::PhantomData<T>,
}

impl<U, T> fmt::Display for Wrapper<U, T>
where
    U: ::std::borrow::Borrow<T>,
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.style.prefix())?;
        T::fmt(self.value.borrow(), f)?;
        write!(f, "{}", self.style.suffix())?;
        Ok(())
    }
}
