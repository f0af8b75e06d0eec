//! Element-wise math on borrowed or owned `f64` vectors.

// Restricted to 'f64' to keep the borrowing story tractable.
// Views over a matrix row are plain slices, so pulling a segment out of
// a matrix never copies.

use crate::{Matrix, Result, check_lengths};

use ::std::ops::{Add, Sub, Mul, Div, Neg, Deref, DerefMut};

/// Implements element-wise operations.
///
/// Use the lowercase [`v`] to construct.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct V<T: AllowedV>(pub T);
pub type VOwn = V<Vec<f64>>;
pub type VRef<'a> = V<&'a [f64]>;
pub type VMut<'a> = V<&'a mut [f64]>;

/// This exists to give you better errors when you accidentally construct a `V<&Vec<f64>>`.
///
/// Hint: use `v(value)` instead of `V(value)` to construct V.
pub trait AllowedV {}
impl AllowedV for Vec<f64> {}
impl<'a> AllowedV for &'a [f64] {}
impl<'a> AllowedV for &'a mut [f64] {}

//------------------------
// Scalar operators
//
// Vector-vector arithmetic can fail on a length mismatch, so it lives in
// the `try_*` methods below instead of in operator impls.

macro_rules! impl_scalar_binary {
    ($Op:ident::$op:ident) => {
        // scalar + vector
        impl $Op<VOwn> for f64 {
            type Output = VOwn;
            fn $op(self, mut u: VOwn) -> VOwn {
                for x in &mut u.0 { *x = self.$op(*x); }
                u
            }
        }

        impl<'a> $Op<VRef<'a>> for f64 {
            type Output = VOwn;
            fn $op(self, u: VRef<'a>) -> VOwn {
                V(u.0.iter().map(|&x| self.$op(x)).collect())
            }
        }

        // vector + scalar
        impl $Op<f64> for VOwn {
            type Output = VOwn;
            fn $op(mut self, s: f64) -> VOwn {
                for x in &mut self.0 { *x = x.$op(s); }
                self
            }
        }

        impl<'a> $Op<f64> for VRef<'a> {
            type Output = VOwn;
            fn $op(self, s: f64) -> VOwn {
                V(self.0.iter().map(|&x| x.$op(s)).collect())
            }
        }
    };
}

impl_scalar_binary!(Add::add);
impl_scalar_binary!(Sub::sub);
impl_scalar_binary!(Mul::mul);
impl_scalar_binary!(Div::div);

impl Neg for VOwn {
    type Output = VOwn;
    fn neg(self) -> VOwn { -1.0 * self }
}

impl<'a> Neg for VRef<'a> {
    type Output = VOwn;
    fn neg(self) -> VOwn { -1.0 * self }
}

//------------------------
// Let &V coerce to &[f64]

impl Deref for VOwn {
    type Target = [f64];
    fn deref(&self) -> &Self::Target { &self.0 }
}

impl<'a> Deref for VRef<'a> {
    type Target = [f64];
    fn deref(&self) -> &Self::Target { self.0 }
}

impl<'a> Deref for VMut<'a> {
    type Target = [f64];
    fn deref(&self) -> &Self::Target { &*self.0 }
}

impl DerefMut for VOwn {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.0 }
}

impl<'a> DerefMut for VMut<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut *self.0 }
}

// behave more like Vec than slices
impl IntoIterator for VOwn {
    type IntoIter = ::std::vec::IntoIter<f64>;
    type Item = f64;
    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

//------------------------
// v() function.
//
// This is all so you can write `v(&some_vec)` instead of `V(&some_vec[..])`
// (`V(&some_vec)` doesn't make the right type since the generic type
//  parameter in `V` inhibits reference coercions.)

pub fn v<W: MakeV>(w: W) -> W::Output { w.make_v() }

/// Implementation detail of [`v`].
pub trait MakeV {
    type Output;
    fn make_v(self) -> Self::Output;
}

impl MakeV for Vec<f64> {
    type Output = VOwn;
    fn make_v(self) -> VOwn { V(self) }
}

impl<'a> MakeV for &'a [f64] {
    type Output = VRef<'a>;
    fn make_v(self) -> VRef<'a> { V(self) }
}

impl<'a> MakeV for &'a Vec<f64> {
    type Output = VRef<'a>;
    fn make_v(self) -> VRef<'a> { V(self) }
}

impl<'a> MakeV for &'a mut [f64] {
    type Output = VMut<'a>;
    fn make_v(self) -> VMut<'a> { V(self) }
}

impl<'a> MakeV for &'a mut Vec<f64> {
    type Output = VMut<'a>;
    fn make_v(self) -> VMut<'a> { V(self) }
}

//------------------------
// Read-only math

impl<T: AllowedV + AsRef<[f64]>> V<T> {
    fn zip_with(&self, op: &'static str, other: &[f64], f: impl Fn(f64, f64) -> f64) -> Result<VOwn>
    {
        let data = self.0.as_ref();
        check_lengths(op, data.len(), other.len())?;
        Ok(V(data.iter().zip(other).map(|(&a, &b)| f(a, b)).collect()))
    }

    pub fn try_add(&self, other: &[f64]) -> Result<VOwn> { self.zip_with("add", other, |a, b| a + b) }
    pub fn try_sub(&self, other: &[f64]) -> Result<VOwn> { self.zip_with("sub", other, |a, b| a - b) }
    pub fn try_mul(&self, other: &[f64]) -> Result<VOwn> { self.zip_with("mul", other, |a, b| a * b) }
    pub fn try_div(&self, other: &[f64]) -> Result<VOwn> { self.zip_with("div", other, |a, b| a / b) }

    pub fn sum(&self) -> f64 { self.0.as_ref().iter().sum() }

    pub fn pow(&self, exponent: f64) -> VOwn
    { V(self.0.as_ref().iter().map(|x| x.powf(exponent)).collect()) }

    pub fn dot(&self, other: &[f64]) -> Result<f64>
    {
        let data = self.0.as_ref();
        check_lengths("dot", data.len(), other.len())?;
        Ok(dot_unchecked(data, other))
    }

    /// `self[i] * other[j]` at `(i, j)`.
    pub fn outer(&self, other: &[f64]) -> Matrix
    {
        let data = self.0.as_ref();
        Matrix::from_fn((data.len(), other.len()), |i, j| data[i] * other[j])
    }

    /// The p-norm.  `p == 2` is accumulated with `hypot`, so it does not
    /// overflow for large entries.
    ///
    /// # Panics
    ///
    /// Panics if `p` is zero.
    pub fn norm(&self, p: u32) -> f64
    {
        assert!(p > 0, "p-norm requires a positive p");
        let data = self.0.as_ref();
        match p {
            1 => data.iter().map(|x| x.abs()).sum(),
            2 => data.iter().fold(0.0, |acc: f64, &x| acc.hypot(x)),
            _ => {
                let p = f64::from(p);
                data.iter().map(|x| x.abs().powf(p)).sum::<f64>().powf(p.recip())
            },
        }
    }

    pub fn is_zero(&self) -> bool { self.0.as_ref().iter().all(|&x| x == 0.0) }
}

pub(crate) fn dot_unchecked(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&x, &y)| x * y).sum()
}

//------------------------
// In-place math

impl<T: AllowedV + AsMut<[f64]>> V<T> {
    fn zip_assign(&mut self, op: &'static str, other: &[f64], f: impl Fn(&mut f64, f64)) -> Result<()>
    {
        let data = self.0.as_mut();
        check_lengths(op, data.len(), other.len())?;
        for (x, &y) in data.iter_mut().zip(other) {
            f(x, y);
        }
        Ok(())
    }

    pub fn add_assign(&mut self, other: &[f64]) -> Result<()> { self.zip_assign("add_assign", other, |x, y| *x += y) }
    pub fn sub_assign(&mut self, other: &[f64]) -> Result<()> { self.zip_assign("sub_assign", other, |x, y| *x -= y) }
    pub fn mul_assign(&mut self, other: &[f64]) -> Result<()> { self.zip_assign("mul_assign", other, |x, y| *x *= y) }
    pub fn div_assign(&mut self, other: &[f64]) -> Result<()> { self.zip_assign("div_assign", other, |x, y| *x /= y) }

    pub fn add_assign_scalar(&mut self, s: f64) { for x in self.0.as_mut() { *x += s; } }
    pub fn sub_assign_scalar(&mut self, s: f64) { for x in self.0.as_mut() { *x -= s; } }
    pub fn scale_assign(&mut self, s: f64) { for x in self.0.as_mut() { *x *= s; } }
    pub fn div_assign_scalar(&mut self, s: f64) { for x in self.0.as_mut() { *x /= s; } }

    pub fn pow_assign(&mut self, exponent: f64) {
        for x in self.0.as_mut() {
            *x = x.powf(exponent);
        }
    }

    /// `self[i] -= factor * other[i]`.
    pub fn sub_scaled(&mut self, factor: f64, other: &[f64]) -> Result<()>
    { self.zip_assign("sub_scaled", other, |x, y| *x -= y * factor) }

    pub fn fill(&mut self, value: f64) {
        for x in self.0.as_mut() {
            *x = value;
        }
    }
}
