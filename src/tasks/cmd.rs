use crate::errors::Result;
use crate::ui::color::{ColorByRange, PaintAs};

use ::densela_linalg::{Qr, qr_decompose, determinant, determinant_cofactor};
use ::densela_matrix::{Matrix, PoolConfig};
use ::densela_tasks_config::{Settings, Threading};

use ::ansi_term::Colour;
use ::rand::{SeedableRng, rngs::StdRng};
use ::std::time::{Duration, Instant};

/// Largest size for which the cofactor expansion is still quick.
pub const MAX_COFACTOR_SIZE: usize = 8;

/// Matrices with more entries than this are summarized instead of printed.
const MAX_PRINTED_ENTRIES: usize = 400;

pub(crate) fn make_rng(settings: &Settings) -> StdRng {
    match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub(crate) fn pool_config(settings: &Settings) -> PoolConfig {
    match settings.workers {
        Some(workers) => PoolConfig::with_workers(workers),
        None => PoolConfig::default(),
    }
}

/// Matrix product, on the pool or not depending on the settings.
pub(crate) fn product(settings: &Settings, a: &Matrix, b: &Matrix) -> Result<Matrix> {
    Ok(match settings.threading {
        Threading::Serial => a.mul(b)?,
        Threading::Pool => a.par_mul(b, pool_config(settings))?,
    })
}

fn print_matrix(settings: &Settings, name: &str, m: &Matrix) {
    if m.size() <= MAX_PRINTED_ENTRIES {
        println!("{} =\n{}", name, m.display(settings.precision));
    } else {
        println!("{}: {:?} matrix (too large to print)", name, m.dims());
    }
}

fn residual_painter() -> ColorByRange<f64> {
    ColorByRange::new(vec![
        (1e-6, Colour::Red.bold()),
        (1e-9, Colour::Yellow.normal()),
    ], Colour::Green.normal())
}

/// Largest absolute entry of `a - b`.
pub(crate) fn max_abs_diff(a: &Matrix, b: &Matrix) -> Result<f64> {
    let diff = a.sub(b)?;
    Ok(diff.row_major_data().iter().fold(0.0, |acc: f64, x| acc.max(x.abs())))
}

// --------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MultiplyReport {
    pub product: Matrix,
    pub serial_time: Duration,
    /// Present unless threading is `serial`.
    pub pool: Option<PoolRun>,
}

#[derive(Debug, Clone)]
pub struct PoolRun {
    pub time: Duration,
    pub workers: usize,
    /// Whether the pool produced exactly the same bits as the serial product.
    pub identical: bool,
}

pub fn run_multiply(settings: &Settings, (rows, inner, cols): (usize, usize, usize)) -> Result<MultiplyReport> {
    let mut rng = make_rng(settings);
    let a = Matrix::random((rows, inner), &mut rng);
    let b = Matrix::random((inner, cols), &mut rng);
    info!("multiplying {:?} by {:?}", a.dims(), b.dims());

    let start = Instant::now();
    let product = a.mul(&b)?;
    let serial_time = start.elapsed();
    info!("serial: {:?}", serial_time);

    let pool = match settings.threading {
        Threading::Serial => None,
        Threading::Pool => {
            let config = pool_config(settings);
            let start = Instant::now();
            let parallel = a.par_mul(&b, config)?;
            let time = start.elapsed();
            let identical = parallel.row_major_data() == product.row_major_data();
            info!("pool of {}: {:?}", config.workers, time);
            if !identical {
                warn!("pool result differs from the serial result");
            }
            Some(PoolRun { time, workers: config.workers, identical })
        },
    };

    print_matrix(settings, "A", &a);
    print_matrix(settings, "B", &b);
    print_matrix(settings, "A * B", &product);
    println!("serial time: {:?}", serial_time);
    if let Some(run) = &pool {
        let verdict = match run.identical {
            true => Colour::Green.paint("identical"),
            false => Colour::Red.bold().paint("DIFFERENT"),
        };
        println!("pool time ({} workers): {:?}, result {}", run.workers, run.time, verdict);
    }

    Ok(MultiplyReport { product, serial_time, pool })
}

// --------------------------------------------------------

#[derive(Debug, Clone)]
pub struct QrReport {
    pub input: Matrix,
    pub qr: Qr,
    /// Largest absolute entry of `Q * R - A`.
    pub residual: f64,
    /// Largest absolute entry of `Q^T * Q - I`.
    pub orthogonality: f64,
}

pub fn run_qr(settings: &Settings, dims: (usize, usize)) -> Result<QrReport> {
    let mut rng = make_rng(settings);
    let input = Matrix::random(dims, &mut rng);
    info!("decomposing {:?}", dims);

    let qr = qr_decompose(&input);
    let residual = max_abs_diff(&product(settings, &qr.q, &qr.r)?, &input)?;
    let qtq = product(settings, &qr.q.to_transpose(), &qr.q)?;
    let orthogonality = max_abs_diff(&qtq, &Matrix::identity(dims.0))?;

    print_matrix(settings, "A", &input);
    print_matrix(settings, "Q", &qr.q);
    print_matrix(settings, "R", &qr.r);
    let painter = residual_painter();
    println!("max |QR - A|:   {}", painter.paint_as(&residual, format!("{:e}", residual)));
    println!("max |QtQ - I|:  {}", painter.paint_as(&orthogonality, format!("{:e}", orthogonality)));

    Ok(QrReport { input, qr, residual, orthogonality })
}

// --------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DetReport {
    pub input: Matrix,
    pub determinant: f64,
    /// Cofactor expansion, for sizes up to `MAX_COFACTOR_SIZE`.
    pub cofactor: Option<f64>,
}

pub fn run_det(settings: &Settings, n: usize) -> Result<DetReport> {
    let mut rng = make_rng(settings);
    let input = Matrix::random((n, n), &mut rng);

    let start = Instant::now();
    let det = determinant(&input)?;
    debug!("determinant of {}x{} took {:?}", n, n, start.elapsed());

    let cofactor = match n <= MAX_COFACTOR_SIZE {
        true => Some(determinant_cofactor(&input)?),
        false => {
            info!("skipping cofactor expansion for size {} (> {})", n, MAX_COFACTOR_SIZE);
            None
        },
    };

    print_matrix(settings, "A", &input);
    println!("det(A) = {:.*}", settings.precision, det);
    if let Some(cofactor) = cofactor {
        let rel = match cofactor {
            x if x == 0.0 => (det - cofactor).abs(),
            _ => ((det - cofactor) / cofactor).abs(),
        };
        println!(
            "cofactor expansion = {:.*} (relative difference {})",
            settings.precision, cofactor,
            residual_painter().paint_as(&rel, format!("{:e}", rel)),
        );
    }

    Ok(DetReport { input, determinant: det, cofactor })
}
