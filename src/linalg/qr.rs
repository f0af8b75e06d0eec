use crate::triangular::{num_steps, reflect_step};

use ::densela_matrix::Matrix;

/// `a = q * r`, with `q` orthogonal and `r` upper-triangular.
#[derive(Debug, Clone, PartialEq)]
pub struct Qr {
    /// `rows x rows`
    pub q: Matrix,
    /// `rows x cols`; entries below the diagonal are exactly zero.
    pub r: Matrix,
}

/// Householder QR decomposition.
///
/// The reflections that reduce `a` are the same ones [`triangular`] uses;
/// each is also applied from the right to an identity-seeded `q`.
///
/// [`triangular`]: crate::triangular
pub fn qr_decompose(a: &Matrix) -> Qr {
    let (rows, cols) = a.dims();
    let mut q = Matrix::identity(rows);
    let mut w = a.to_transpose();

    for k in 0..num_steps((rows, cols)) {
        if let Some(reflector) = reflect_step(&mut w, k) {
            for i in 0..rows {
                reflector.apply_to(&mut q.segment_mut(i, k));
            }
        }
    }
    Qr { q, r: w.to_transpose() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::{SeedableRng, rngs::StdRng};

    fn check_decomposition(a: &Matrix) {
        let Qr { q, r } = qr_decompose(a);
        let (rows, cols) = a.dims();
        assert_eq!(q.dims(), (rows, rows));
        assert_eq!(r.dims(), (rows, cols));

        // q is orthogonal
        let qtq = q.to_transpose().mul(&q).unwrap();
        assert_close!(abs=1e-12, qtq, Matrix::identity(rows));

        // r is upper triangular
        for i in 0..rows {
            for j in 0..usize::min(i, cols) {
                assert_eq!(r[(i, j)], 0.0);
            }
        }

        // and they reconstruct a
        assert_close!(rel=1e-9, abs=1e-12, q.mul(&r).unwrap(), a.clone());
    }

    #[test]
    fn identity_is_its_own_decomposition() {
        let eye = Matrix::identity(3);
        let Qr { q, r } = qr_decompose(&eye);
        assert_eq!(q, eye);
        assert_eq!(r, eye);
    }

    #[test]
    fn known_decomposition() {
        let a = Matrix::from_rows(&[[3.0, 1.0], [4.0, 2.0]]).unwrap();
        let Qr { q, r } = qr_decompose(&a);
        assert_close!(abs=1e-12, r, Matrix::from_rows(&[[-5.0, -2.2], [0.0, 0.4]]).unwrap());
        assert_close!(abs=1e-12, q, Matrix::from_rows(&[[-0.6, -0.8], [-0.8, 0.6]]).unwrap());
    }

    #[test]
    fn random_square() {
        let mut rng = StdRng::seed_from_u64(17);
        for n in 1..=8 {
            check_decomposition(&Matrix::random((n, n), &mut rng));
        }
    }

    #[test]
    fn random_rectangular() {
        let mut rng = StdRng::seed_from_u64(23);
        for &dims in &[(5, 3), (3, 5), (8, 1), (1, 8), (6, 4)] {
            check_decomposition(&Matrix::random(dims, &mut rng));
        }
    }

    #[test]
    fn rank_deficient() {
        // second column is twice the first
        let a = Matrix::from_rows(&[[1.0, 2.0, 0.0], [2.0, 4.0, 1.0], [3.0, 6.0, 5.0]]).unwrap();
        check_decomposition(&a);
    }

    #[test]
    fn empty() {
        let Qr { q, r } = qr_decompose(&Matrix::zeros((0, 0)));
        assert_eq!(q.dims(), (0, 0));
        assert_eq!(r.dims(), (0, 0));
    }
}
