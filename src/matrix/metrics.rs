//! Distances and similarities between equal-length vectors.

use crate::{Result, check_lengths};
use crate::vector::{v, dot_unchecked};

/// `(sum |a_i - b_i|^p)^(1/p)`.
///
/// # Panics
///
/// Panics if `p` is zero.
pub fn minkowski(a: &[f64], b: &[f64], p: u32) -> Result<f64> {
    Ok(v(a).try_sub(b)?.norm(p))
}

pub fn euclidean(a: &[f64], b: &[f64]) -> Result<f64> { minkowski(a, b, 2) }

pub fn manhattan(a: &[f64], b: &[f64]) -> Result<f64> { minkowski(a, b, 1) }

/// Cosine similarity, clamped so that vectors pointing away from each other
/// (non-positive inner product) score `0.0`.
pub fn cosine(a: &[f64], b: &[f64]) -> Result<f64> {
    check_lengths("cosine", a.len(), b.len())?;
    let dp = dot_unchecked(a, b);
    match dp > 0.0 {
        true => Ok(dp / (v(a).norm(2) * v(b).norm(2))),
        false => Ok(0.0),
    }
}

/// Kullback-Leibler divergence of `a` from `b`.
///
/// Terms where `a_i` is zero contribute nothing.  Where `b_i` is zero the
/// term contributes `a_i` instead of diverging.
pub fn kld(a: &[f64], b: &[f64]) -> Result<f64> {
    check_lengths("kld", a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(&p, &q)| {
        if q == 0.0 {
            p
        } else if p == 0.0 {
            0.0
        } else {
            p * (p / q).ln()
        }
    }).sum())
}
