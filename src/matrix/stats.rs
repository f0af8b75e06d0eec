//! Sample statistics over `f64` slices.
//!
//! Means are accumulated incrementally (`m += (x - m) / t`), which stays
//! accurate for long inputs of similar magnitude.  Spread statistics use the
//! sample (`n - 1`) normalization; with fewer than two values they are NaN
//! or infinite.

use crate::{Result, check_lengths};

/// Running mean.  An empty slice has mean `0.0`.
pub fn mean(xs: &[f64]) -> f64 {
    let mut m = 0.0;
    let mut t = 0.0;
    for &x in xs {
        t += 1.0;
        m += (x - m) / t;
    }
    m
}

/// Sample variance.
pub fn var(xs: &[f64]) -> f64 {
    let m = mean(xs);
    let ss: f64 = xs.iter().map(|&x| (x - m) * (x - m)).sum();
    ss / (xs.len() as f64 - 1.0)
}

/// Sample standard deviation.
pub fn std(xs: &[f64]) -> f64 { var(xs).sqrt() }

/// Sample covariance.
pub fn cov(xs: &[f64], ys: &[f64]) -> Result<f64> {
    check_lengths("cov", xs.len(), ys.len())?;
    let (mx, my) = (mean(xs), mean(ys));
    let c: f64 = xs.iter().zip(ys).map(|(&x, &y)| (x - mx) * (y - my)).sum();
    Ok(c / (xs.len() as f64 - 1.0))
}

/// Pearson correlation coefficient.
pub fn corr(xs: &[f64], ys: &[f64]) -> Result<f64> {
    check_lengths("corr", xs.len(), ys.len())?;
    let (mx, my) = (mean(xs), mean(ys));
    let (sx, sy) = (std(xs), std(ys));
    let r: f64 = xs.iter().zip(ys)
        .map(|(&x, &y)| ((x - mx) / sx) * ((y - my) / sy))
        .sum();
    Ok(r / (xs.len() as f64 - 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const XS: &[f64] = &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    #[test]
    fn mean_and_spread() {
        assert_close!(mean(XS), 5.0);
        assert_close!(var(XS), 32.0 / 7.0);
        assert_close!(std(XS), (32.0f64 / 7.0).sqrt());
        assert_eq!(mean(&[]), 0.0);
        assert!(var(&[1.0]).is_nan());
    }

    #[test]
    fn covariance() {
        let ys: Vec<f64> = XS.iter().map(|x| 3.0 * x + 1.0).collect();
        assert_close!(cov(XS, XS).unwrap(), var(XS));
        assert_close!(cov(XS, &ys).unwrap(), 3.0 * var(XS));
        assert!(cov(XS, &ys[1..]).is_err());
    }

    #[test]
    fn correlation() {
        let ys: Vec<f64> = XS.iter().map(|x| 3.0 * x + 1.0).collect();
        let zs: Vec<f64> = XS.iter().map(|x| -0.5 * x).collect();
        assert_close!(corr(XS, &ys).unwrap(), 1.0);
        assert_close!(corr(XS, &zs).unwrap(), -1.0);
        assert!(corr(&[1.0], &[]).is_err());
    }
}
