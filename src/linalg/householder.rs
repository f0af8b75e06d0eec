use crate::Result;

use ::densela_matrix::{v, VRef};

/// A Householder reflection `x -> x - 2 <u, x> u`.
///
/// Built from a segment `s`, it maps `s` to `(d, 0, ..., 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reflector {
    u: Vec<f64>,
    d: f64,
}

impl Reflector {
    /// Returns `None` when `segment` already has the form `(d, 0, ..., 0)`
    /// with `d >= 0` (this includes the zero segment), in which case no
    /// reflection is needed.
    pub fn new(segment: &[f64]) -> Option<Reflector> {
        let head = *segment.first()?;
        let norm = v(segment).norm(2);
        if norm == head {
            return None;
        }

        // pick the sign of d that avoids cancellation in `head - d`
        let d = if head > 0.0 { -norm } else { norm };
        let mut u = segment.to_vec();
        u[0] -= d;
        // -2 * u[0] * d > 0 whenever norm != head
        let scale = (-2.0 * u[0] * d).sqrt().recip();
        v(&mut u).scale_assign(scale);

        Some(Reflector { u, d })
    }

    /// The single nonzero entry of the reflected segment.
    pub fn diagonal(&self) -> f64 { self.d }

    pub fn vector(&self) -> VRef<'_> { v(&self.u) }

    pub fn len(&self) -> usize { self.u.len() }

    /// Reflect `x` in place.
    pub fn apply(&self, x: &mut [f64]) -> Result<()> {
        let factor = 2.0 * v(&self.u).dot(x)?;
        v(x).sub_scaled(factor, &self.u)?;
        Ok(())
    }

    /// `apply` for callers that already know the lengths agree.
    pub(crate) fn apply_to(&self, x: &mut [f64]) {
        debug_assert_eq!(x.len(), self.u.len());
        let factor = 2.0 * self.u.iter().zip(&*x).map(|(&a, &b)| a * b).sum::<f64>();
        for (dest, &u) in x.iter_mut().zip(&self.u) {
            *dest -= u * factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroes_the_tail() {
        let segment = [3.0, 4.0, 0.0, 12.0];
        let reflector = Reflector::new(&segment).unwrap();
        assert_eq!(reflector.len(), 4);
        // head is positive, so d takes the opposite sign
        assert_close!(reflector.diagonal(), -13.0);

        let mut x = segment.to_vec();
        reflector.apply(&mut x).unwrap();
        assert_close!(abs=1e-12, x, vec![-13.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn negative_head() {
        let segment = [-1.0, 0.0];
        let reflector = Reflector::new(&segment).unwrap();
        assert_close!(reflector.diagonal(), 1.0);
        let mut x = segment.to_vec();
        reflector.apply(&mut x).unwrap();
        assert_close!(abs=1e-15, x, vec![1.0, 0.0]);
    }

    #[test]
    fn unit_vector() {
        let reflector = Reflector::new(&[1.0, 2.0, 2.0]).unwrap();
        assert_close!(reflector.vector().norm(2), 1.0);
    }

    #[test]
    fn reflecting_twice_is_identity() {
        let reflector = Reflector::new(&[0.5, -2.0, 7.0]).unwrap();
        let original = vec![1.0, 2.0, 3.0];
        let mut x = original.clone();
        reflector.apply(&mut x).unwrap();
        reflector.apply(&mut x).unwrap();
        assert_close!(abs=1e-12, x, original);
    }

    #[test]
    fn already_reduced() {
        assert_eq!(Reflector::new(&[2.0, 0.0, 0.0]), None);
        assert_eq!(Reflector::new(&[0.0, 0.0]), None);
        assert_eq!(Reflector::new(&[5.0]), None);
        assert_eq!(Reflector::new(&[]), None);
        // a lone negative entry still needs its sign fixed
        assert!(Reflector::new(&[-5.0]).is_some());
    }

    #[test]
    fn apply_checks_length() {
        let reflector = Reflector::new(&[1.0, 1.0]).unwrap();
        assert!(reflector.apply(&mut [1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn checked_and_unchecked_agree() {
        let reflector = Reflector::new(&[4.0, -1.0, 2.5]).unwrap();
        let mut a = vec![0.3, 0.2, -9.0];
        let mut b = a.clone();
        reflector.apply(&mut a).unwrap();
        reflector.apply_to(&mut b);
        assert_eq!(a, b);
    }
}
