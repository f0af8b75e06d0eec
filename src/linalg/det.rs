use crate::Result;
use crate::triangular::triangularize_transposed;

use ::densela_matrix::{Matrix, MatrixError};

fn check_square(m: &Matrix) -> Result<()> {
    match m.is_square() {
        true => Ok(()),
        false => Err(MatrixError::NotSquare(m.dims()).into()),
    }
}

/// Determinant by Householder triangularization.
///
/// Sizes up to 2 are computed directly.  Otherwise the determinant is the
/// product of the triangular diagonal, with one sign flip per reflection.
pub fn determinant(m: &Matrix) -> Result<f64> {
    check_square(m)?;
    Ok(match m.num_rows() {
        0 => 1.0,
        1 => m[(0, 0)],
        2 => m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
        _ => {
            let mut t = m.to_transpose();
            let count = triangularize_transposed(&mut t);
            let product: f64 = t.diagonal().iter().product();
            match count % 2 {
                0 => product,
                _ => -product,
            }
        },
    })
}

/// Determinant by cofactor expansion along the first row.
///
/// O(n!); only good for checking [`determinant`] on small matrices.
pub fn determinant_cofactor(m: &Matrix) -> Result<f64> {
    check_square(m)?;
    Ok(cofactor_expansion(m))
}

fn cofactor_expansion(m: &Matrix) -> f64 {
    let n = m.num_rows();
    match n {
        0 => 1.0,
        1 => m[(0, 0)],
        _ => {
            let mut sum = 0.0;
            for j in 0..n {
                let minor = Matrix::from_fn((n - 1, n - 1), |r, c| {
                    m[(r + 1, if c < j { c } else { c + 1 })]
                });
                let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
                sum += sign * m[(0, j)] * cofactor_expansion(&minor);
            }
            sum
        },
    }
}
