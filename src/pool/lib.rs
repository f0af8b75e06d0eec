/* ************************************************************************ **
** This file is part of densela, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Fixed-size worker pools.
//!
//! A [`WorkerPool`] owns a set of threads that all block on one shared work
//! queue.  Each item is handed to a [`Task`], which may emit any number of
//! outputs.  The pool is started inside a [`std::thread::scope`], so tasks
//! and work items are free to borrow from the caller (e.g. disjoint `&mut`
//! rows of an output buffer).
//!
//! Shutdown is explicit: [`WorkerPool::join`] enqueues one [`Message::Stop`]
//! per worker behind all submitted work, waits for every thread, and reports
//! the first worker that failed or panicked.
//!
//! [`Pipeline`] chains pools so that the outputs of one stage become the work
//! queue of the next.

#[macro_use]
extern crate log;

pub use crate::task::{Task, TaskError, Map, map};
mod task;

pub use crate::pool::{WorkerPool, PoolConfig, PoolReport, Message};
mod pool;

pub use crate::pipeline::Pipeline;
mod pipeline;

use ::thiserror::Error;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("a worker pool needs at least one worker")]
    NoWorkers,

    #[error("failed to spawn worker thread")]
    Spawn(#[source] ::std::io::Error),

    #[error("task failed on worker {worker}")]
    TaskFailed {
        worker: usize,
        #[source]
        source: TaskError,
    },

    #[error("worker {worker} panicked: {message}")]
    WorkerPanicked { worker: usize, message: String },

    #[error("worker {worker} could not deliver its output (downstream queue closed)")]
    OutputClosed { worker: usize },

    #[error("the work queue is closed; every worker has already exited")]
    QueueClosed,
}
