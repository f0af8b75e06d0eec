use ::densela_linalg::LinalgError;
use ::densela_matrix::MatrixError;
use ::thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Linalg(#[from] LinalgError),

    #[error("could not read config file '{path}'")]
    ReadConfig {
        path: String,
        #[source]
        source: ::std::io::Error,
    },

    #[error("invalid config")]
    ParseConfig(#[from] ::serde_yaml::Error),

    #[error("invalid value for {arg}: '{value}'")]
    BadArgument {
        arg: &'static str,
        value: String,
        #[source]
        source: ::std::num::ParseIntError,
    },

    #[error("{0}")]
    Logger(#[from] ::log::SetLoggerError),

    #[error(transparent)]
    Io(#[from] ::std::io::Error),
}

pub type Result<T> = ::std::result::Result<T, Error>;

/// Lets a `{ ... }` block that ends in a statement be used as an `Ok(())` body.
pub fn ok<T>(x: T) -> Result<T> { Ok(x) }
