use crate::{MatrixError, Result};
use crate::vector::{V, VRef, VMut};

use ::densela_assert_close::{CheckClose, CheckCloseError, Tolerances};
use ::rand::Rng;
use ::std::fmt;
use ::std::ops::{Index, IndexMut};

/// Owned matrix type with C layout.
///
/// The extents of a matrix never change after construction; every operation
/// that would change them returns a new matrix.
// please resist the urge to go n-dimensional
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    // c-contiguous, row-contiguous data
    data: Vec<f64>,
    // invariant: height * width == data.len()
    height: usize,
    width: usize,
}

/// Iterator over the rows of a [`Matrix`] as contiguous slices.
pub type Rows<'a> = ::std::iter::Map<
    ::std::iter::Zip<::std::ops::Range<usize>, ::std::iter::Repeat<&'a Matrix>>,
    fn((usize, &'a Matrix)) -> &'a [f64],
>;

impl Matrix {
    pub fn from_row_major_data((height, width): (usize, usize), data: Vec<f64>) -> Result<Self>
    {
        if data.len() != height * width {
            return Err(MatrixError::BadBufferLength { dims: (height, width), len: data.len() });
        }
        Ok(Matrix { data, height, width })
    }

    /// Build from nested rows, which must all have the same length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self>
    {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * width);
        for row in rows {
            let row = row.as_ref();
            if row.len() != width {
                return Err(MatrixError::DimensionMismatch {
                    op: "from_rows",
                    left: (1, width),
                    right: (1, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix { data, height: rows.len(), width })
    }

    pub fn new_filled((height, width): (usize, usize), fill: f64) -> Self
    { Matrix { data: vec![fill; height * width], height, width } }

    pub fn zeros(dims: (usize, usize)) -> Self
    { Matrix::new_filled(dims, 0.0) }

    pub fn identity(size: usize) -> Self
    {
        let mut out = Matrix::zeros((size, size));
        for i in 0..size {
            out[(i, i)] = 1.0;
        }
        out
    }

    pub fn from_fn<F>((height, width): (usize, usize), mut f: F) -> Self
    where F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(height * width);
        for r in 0..height {
            for c in 0..width {
                data.push(f(r, c));
            }
        }
        Matrix { data, height, width }
    }

    /// Entries drawn uniformly from `[0, 10)`.
    pub fn random<R: Rng + ?Sized>(dims: (usize, usize), rng: &mut R) -> Self
    { Matrix::from_fn(dims, |_, _| rng.gen_range(0.0..10.0)) }
}

impl Matrix {
    pub fn dims(&self) -> (usize, usize) { (self.height, self.width) }
    pub fn num_rows(&self) -> usize { self.height }
    pub fn num_cols(&self) -> usize { self.width }
    pub fn is_square(&self) -> bool { self.height == self.width }
    pub fn size(&self) -> usize { self.data.len() }

    pub fn row_major_data(&self) -> &[f64] { &self.data }
    pub fn row_major_data_mut(&mut self) -> &mut [f64] { &mut self.data }
    pub fn into_row_major_data(self) -> Vec<f64> { self.data }

    pub fn row(&self, r: usize) -> &[f64]
    { &self.data[r * self.width..(r + 1) * self.width] }

    pub fn row_mut(&mut self, r: usize) -> &mut [f64]
    { &mut self.data[r * self.width..(r + 1) * self.width] }

    /// Yields exactly `num_rows()` slices, even when the width is zero.
    pub fn rows(&self) -> Rows<'_>
    {
        fn get_row<'a>((r, m): (usize, &'a Matrix)) -> &'a [f64] { m.row(r) }
        (0..self.height).zip(::std::iter::repeat(self)).map(get_row as fn(_) -> _)
    }

    /// Contiguous mutable rows.  (a zero-width matrix yields nothing)
    pub fn rows_mut(&mut self) -> ::std::slice::ChunksMut<'_, f64>
    { self.data.chunks_mut(self.width.max(1)) }

    /// The tail of row `r` starting at column `c`, without copying.
    pub fn segment(&self, r: usize, c: usize) -> VRef<'_>
    { V(&self.row(r)[c..]) }

    /// The tail of row `r` starting at column `c`, for in-place updates.
    pub fn segment_mut(&mut self, r: usize, c: usize) -> VMut<'_>
    { V(&mut self.row_mut(r)[c..]) }

    pub fn diagonal(&self) -> Vec<f64>
    { (0..self.height.min(self.width)).map(|i| self[(i, i)]).collect() }
}

impl Matrix {
    pub fn to_transpose(&self) -> Self
    {
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..self.width {
            for r in 0..self.height {
                data.push(self[(r, c)]);
            }
        }
        Matrix { data, height: self.width, width: self.height }
    }

    fn check_same_dims(&self, op: &'static str, other: &Matrix) -> Result<()>
    {
        match self.dims() == other.dims() {
            true => Ok(()),
            false => Err(MatrixError::DimensionMismatch { op, left: self.dims(), right: other.dims() }),
        }
    }

    fn zip_map(&self, other: &Matrix, f: impl Fn(f64, f64) -> f64) -> Matrix
    {
        let data = self.data.iter().zip(&other.data).map(|(&a, &b)| f(a, b)).collect();
        Matrix { data, height: self.height, width: self.width }
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Matrix
    {
        let data = self.data.iter().map(|&a| f(a)).collect();
        Matrix { data, height: self.height, width: self.width }
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix>
    {
        self.check_same_dims("add", other)?;
        Ok(self.zip_map(other, |a, b| a + b))
    }

    pub fn sub(&self, other: &Matrix) -> Result<Matrix>
    {
        self.check_same_dims("sub", other)?;
        Ok(self.zip_map(other, |a, b| a - b))
    }

    pub fn sub_scalar(&self, scalar: f64) -> Matrix
    { self.map(|a| a - scalar) }

    pub fn scale(&self, scalar: f64) -> Matrix
    { self.map(|a| a * scalar) }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline(always)] // inlining should often remove bounds checks
    fn index(&self, (r, c): (usize, usize)) -> &f64
    {
        debug_assert!(c < self.width, "column {} out of bounds for width {}", c, self.width);
        &self.data[r * self.width + c]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline(always)]
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut f64
    {
        debug_assert!(c < self.width, "column {} out of bounds for width {}", c, self.width);
        &mut self.data[r * self.width + c]
    }
}

//------------------------
// Rendering

/// Fixed-precision, constant-width rendering; one line per row.
#[derive(Debug, Clone, Copy)]
pub struct DisplayMatrix<'a> {
    matrix: &'a Matrix,
    precision: usize,
}

impl Matrix {
    pub fn display(&self, precision: usize) -> DisplayMatrix<'_>
    { DisplayMatrix { matrix: self, precision } }
}

impl<'a> fmt::Display for DisplayMatrix<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let precision = self.precision;
        let width = self.matrix.data.iter()
            .map(|x| format!("{:.*}", precision, x).len())
            .max().unwrap_or(0);

        for row in self.matrix.rows() {
            let mut first = true;
            for x in row {
                if !first {
                    write!(f, " ")?;
                }
                first = false;
                write!(f, "{:>width$.prec$}", x, width = width, prec = precision)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    { fmt::Display::fmt(&self.display(5), f) }
}

//------------------------
// Testing support

impl CheckClose for Matrix {
    fn check_close(&self, other: &Matrix, tol: Tolerances) -> ::std::result::Result<(), CheckCloseError>
    {
        assert_eq!(self.dims(), other.dims(), "cannot compare matrices of different shape");
        self.data.check_close(&other.data, tol)
    }
}
