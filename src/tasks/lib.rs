/* ************************************************************************ **
** This file is part of densela, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The `densela` command line tool.
//!
//! Everything user-facing lives here: argument parsing, logging setup,
//! settings, and the commands themselves.  The binary in `src/binary-shims`
//! only calls into [`entry_points`].

#[macro_use]
extern crate log;
#[macro_use]
extern crate clap;
#[cfg(test)]
#[macro_use]
extern crate densela_assert_close;

mod errors;
mod ui;
mod cmd;
pub mod entry_points;

pub use crate::errors::{Error, Result};
pub use crate::cmd::{
    run_multiply, run_qr, run_det,
    MultiplyReport, PoolRun, QrReport, DetReport,
    MAX_COFACTOR_SIZE,
};
pub use ::densela_tasks_config::{Settings, Threading};
