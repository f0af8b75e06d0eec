use crate::Reflector;

use ::densela_matrix::Matrix;

/// Number of elimination steps for a `rows x cols` matrix.
///
/// The last row has nothing below its diagonal, and a wide matrix runs out
/// of columns first.
pub(crate) fn num_steps((rows, cols): (usize, usize)) -> usize {
    usize::min(rows.saturating_sub(1), cols)
}

/// Eliminate column `k` of the matrix whose transpose is `t`.
///
/// Row `k` of `t` becomes `(.., d, 0, ..., 0)` and the same reflection is
/// applied to the following rows from column `k` on.  Returns the reflection
/// so that callers can accumulate it elsewhere, or `None` if the column was
/// already reduced.
pub(crate) fn reflect_step(t: &mut Matrix, k: usize) -> Option<Reflector> {
    let reflector = match Reflector::new(&t.segment(k, k)) {
        Some(reflector) => reflector,
        None => {
            trace!("column {}: already reduced", k);
            // whatever is left is below the resolution of the norm
            t.segment_mut(k, k + 1).fill(0.0);
            return None;
        },
    };
    trace!("column {}: reflecting, d = {}", k, reflector.diagonal());

    {
        let mut segment = t.segment_mut(k, k);
        segment.fill(0.0);
        segment[0] = reflector.diagonal();
    }
    for i in k + 1..t.num_rows() {
        reflector.apply_to(&mut t.segment_mut(i, k));
    }
    Some(reflector)
}

/// Reduce the matrix whose transpose is `t` to upper-triangular form, in
/// place.  Returns the number of reflections applied.
pub(crate) fn triangularize_transposed(t: &mut Matrix) -> usize {
    let (cols, rows) = t.dims();
    let mut count = 0;
    for k in 0..num_steps((rows, cols)) {
        if reflect_step(t, k).is_some() {
            count += 1;
        }
    }
    trace!("triangularized {:?} with {} reflections", (rows, cols), count);
    count
}

/// Upper-triangular form of `a`, reached by Householder reflections.
///
/// This is the `R` of [`qr_decompose`](crate::qr_decompose), computed without
/// accumulating `Q`.
pub fn triangular(a: &Matrix) -> Matrix {
    let mut t = a.to_transpose();
    triangularize_transposed(&mut t);
    t.to_transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::rand::{SeedableRng, rngs::StdRng};

    fn assert_upper_triangular(m: &Matrix) {
        for r in 0..m.num_rows() {
            for c in 0..usize::min(r, m.num_cols()) {
                assert_eq!(m[(r, c)], 0.0, "nonzero at {:?}", (r, c));
            }
        }
    }

    #[test]
    fn step_counts() {
        assert_eq!(num_steps((0, 0)), 0);
        assert_eq!(num_steps((1, 5)), 0);
        assert_eq!(num_steps((3, 3)), 2);
        assert_eq!(num_steps((5, 2)), 2);
        assert_eq!(num_steps((2, 5)), 1);
    }

    #[test]
    fn random_shapes_become_triangular() {
        let mut rng = StdRng::seed_from_u64(5);
        for &dims in &[(1, 1), (2, 2), (4, 4), (6, 3), (3, 6), (7, 1), (1, 7)] {
            let a = Matrix::random(dims, &mut rng);
            let r = triangular(&a);
            assert_eq!(r.dims(), dims);
            assert_upper_triangular(&r);
        }
    }

    #[test]
    fn reduced_matrix_needs_no_reflections() {
        let a = Matrix::from_rows(&[
            [2.0, 1.0, 1.0],
            [0.0, 3.0, 1.0],
            [0.0, 0.0, -4.0],
        ]).unwrap();
        let mut t = a.to_transpose();
        assert_eq!(triangularize_transposed(&mut t), 0);
        assert_eq!(t.to_transpose(), a);
    }

    #[test]
    fn negative_pivot_is_reflected() {
        let a = Matrix::from_rows(&[[-2.0, 1.0], [0.0, 3.0]]).unwrap();
        let mut t = a.to_transpose();
        assert_eq!(triangularize_transposed(&mut t), 1);
        assert_close!(abs=1e-12, t[(0, 0)], 2.0);
    }

    #[test]
    fn column_norms_are_preserved() {
        // reflections are orthogonal, so each column keeps its length
        let mut rng = StdRng::seed_from_u64(9);
        let a = Matrix::random((5, 4), &mut rng);
        let r = triangular(&a);
        let norm = |m: &Matrix, c: usize| (0..m.num_rows()).map(|r| m[(r, c)].powi(2)).sum::<f64>().sqrt();
        for c in 0..4 {
            assert_close!(norm(&a, c), norm(&r, c));
        }
    }
}
