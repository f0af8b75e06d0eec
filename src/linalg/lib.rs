/* ************************************************************************ **
** This file is part of densela, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Householder-based factorizations.
//!
//! Every algorithm here works on the *transpose* of its input, so that each
//! column being eliminated is a contiguous row segment of the work matrix.
//! A reflection then reads and writes plain slices, and the reflector
//! vector can be taken from the matrix without copying more than one row.

#[macro_use]
extern crate log;
#[cfg(test)]
#[macro_use]
extern crate densela_assert_close;

pub use crate::householder::Reflector;
mod householder;

pub use crate::triangular::triangular;
mod triangular;

pub use crate::qr::{Qr, qr_decompose};
mod qr;

pub use crate::det::{determinant, determinant_cofactor};
mod det;

use ::densela_matrix::MatrixError;
use ::thiserror::Error;

#[derive(Debug, Error)]
pub enum LinalgError {
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

pub type Result<T> = ::std::result::Result<T, LinalgError>;
