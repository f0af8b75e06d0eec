//! Dense linear algebra on row-major `f64` matrices.
//!
//! This crate only gathers the workspace members under one roof; see
//! each of them for the actual documentation.

pub use ::densela_matrix as matrix;
pub use ::densela_linalg as linalg;
pub use ::densela_pool as pool;

pub use ::densela_matrix::{Matrix, MatrixError, PoolConfig, v};
pub use ::densela_linalg::{Qr, qr_decompose, triangular, determinant, determinant_cofactor, LinalgError};
