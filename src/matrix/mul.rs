//! Matrix products, sequential and on a worker pool.
//!
//! Both paths compute each output row with the same kernel, against a
//! transpose of the right operand made once up front.  Results are therefore
//! bit-identical regardless of how rows are scheduled.

use crate::{Matrix, MatrixError, Result};
use crate::vector::dot_unchecked;

use ::densela_pool::{PoolConfig, PoolError, TaskError, WorkerPool};
use ::itertools::Itertools;
use ::std::thread;

/// `out[j] = <a_row, bt_row_j>` for every row `j` of `bt`.
fn row_product(a_row: &[f64], bt: &Matrix, out: &mut [f64]) {
    for (dest, bt_row) in out.iter_mut().zip_eq(bt.rows()) {
        *dest = dot_unchecked(a_row, bt_row);
    }
}

impl Matrix {
    fn check_mul_dims(&self, other: &Matrix) -> Result<()> {
        match self.num_cols() == other.num_rows() {
            true => Ok(()),
            false => Err(MatrixError::DimensionMismatch {
                op: "mul",
                left: self.dims(),
                right: other.dims(),
            }),
        }
    }

    /// Matrix product on the calling thread.
    pub fn mul(&self, other: &Matrix) -> Result<Matrix> {
        self.check_mul_dims(other)?;
        let dims = (self.num_rows(), other.num_cols());
        let mut data = vec![0.0; dims.0 * dims.1];
        if data.is_empty() {
            return Matrix::from_row_major_data(dims, data);
        }

        let bt = other.to_transpose();
        for (r, out) in data.chunks_mut(dims.1).enumerate() {
            row_product(self.row(r), &bt, out);
        }
        Matrix::from_row_major_data(dims, data)
    }

    /// Matrix product with one work item per output row.
    ///
    /// Each item owns its row of the output buffer, so workers never share
    /// memory beyond the read-only operands.  If any worker fails, the
    /// partial output is discarded.
    pub fn par_mul(&self, other: &Matrix, config: PoolConfig) -> Result<Matrix> {
        self.check_mul_dims(other)?;
        let dims = (self.num_rows(), other.num_cols());
        let mut data = vec![0.0; dims.0 * dims.1];
        if data.is_empty() {
            return Matrix::from_row_major_data(dims, data);
        }

        let bt = other.to_transpose();
        let report = thread::scope(|scope| -> ::std::result::Result<_, PoolError> {
            let bt = &bt;
            let task = move |(r, out): (usize, &mut [f64]), _: &mut Vec<()>| -> ::std::result::Result<(), TaskError> {
                row_product(self.row(r), bt, out);
                Ok(())
            };
            let mut pool = WorkerPool::start(scope, config, task, None)?;

            let mut submit_error = None;
            for item in data.chunks_mut(dims.1).enumerate() {
                if let Err(e) = pool.submit(item) {
                    // the pool is dead; join knows why
                    submit_error = Some(e);
                    break;
                }
            }
            let report = pool.join()?;
            match submit_error {
                None => Ok(report),
                Some(e) => Err(e),
            }
        }).map_err(MatrixError::WorkerFailure)?;

        debug!(
            "par_mul {:?} x {:?}: {} rows over {} workers {:?}",
            self.dims(), other.dims(), report.submitted, report.processed.len(), report.processed,
        );
        Matrix::from_row_major_data(dims, data)
    }
}
