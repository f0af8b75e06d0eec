/* ************************************************************************ **
** This file is part of densela, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense row-major matrices, and borrowed views for vector math.
//!
//! Everything here is `f64`.

#[macro_use]
extern crate log;
#[cfg_attr(test, macro_use)]
extern crate densela_assert_close;

pub use crate::matrix::{Matrix, Rows, DisplayMatrix};
mod matrix;

pub use crate::vector::{V, VOwn, VRef, VMut, MakeV, AllowedV, v};
mod vector;

mod mul;

pub mod stats;
pub mod metrics;

pub use ::densela_pool::{PoolConfig, PoolError};

use ::thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("length mismatch in {op}: {left} vs {right}")]
    LengthMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },

    #[error("expected a square matrix, got {0:?}")]
    NotSquare((usize, usize)),

    #[error("buffer of length {len} cannot hold a {dims:?} matrix")]
    BadBufferLength {
        dims: (usize, usize),
        len: usize,
    },

    #[error("parallel matrix multiplication failed")]
    WorkerFailure(#[source] PoolError),
}

pub type Result<T> = ::std::result::Result<T, MatrixError>;

pub(crate) fn check_lengths(op: &'static str, left: usize, right: usize) -> Result<()> {
    match left == right {
        true => Ok(()),
        false => Err(MatrixError::LengthMismatch { op, left, right }),
    }
}
