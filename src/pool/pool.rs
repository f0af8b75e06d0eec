use crate::{PoolError, Task};

use ::crossbeam::channel::{self, Receiver, Sender};
use ::std::any::Any;
use ::std::error::Error as StdError;
use ::std::sync::Arc;
use ::std::thread::{self, Scope, ScopedJoinHandle};

/// What travels through a work queue.
#[derive(Debug, Clone, PartialEq)]
pub enum Message<T> {
    Item(T),
    /// Sentinel; a worker that receives it exits.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Bound on the work queue.  `None` means unbounded.
    ///
    /// With a bound, [`WorkerPool::submit`] blocks while the queue is full.
    pub capacity: Option<usize>,
}

impl PoolConfig {
    pub fn with_workers(workers: usize) -> Self
    { PoolConfig { workers, capacity: None } }

    pub fn capacity(mut self, capacity: usize) -> Self
    { self.capacity = Some(capacity); self }
}

impl Default for PoolConfig {
    fn default() -> Self { PoolConfig::with_workers(available_parallelism()) }
}

pub(crate) fn available_parallelism() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Summary of a pool that shut down cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolReport {
    /// Items submitted through [`WorkerPool::submit`].
    ///
    /// (items sent through a [`WorkerPool::sink`] handle are not counted here)
    pub submitted: usize,
    /// Items processed by each worker, indexed by worker.
    pub processed: Vec<usize>,
}

impl PoolReport {
    pub fn total_processed(&self) -> usize { self.processed.iter().sum() }
}

/// A fixed set of threads consuming one shared queue.
///
/// Dropping a pool without calling [`join`](WorkerPool::join) still sends the
/// stop sentinels, so the enclosing scope never waits on a blocked worker.
/// A worker logs its own failure when it exits, so a task error still shows
/// up in the log when nobody joins; a panic is re-raised by the scope.
pub struct WorkerPool<'scope, In> {
    sink: Sender<Message<In>>,
    workers: Vec<ScopedJoinHandle<'scope, Result<usize, PoolError>>>,
    submitted: usize,
    stopped: bool,
}

impl<'scope, In: Send + 'scope> WorkerPool<'scope, In> {
    /// Start `config.workers` threads that feed items to `task`.
    ///
    /// Outputs emitted by the task are forwarded to `source` when one is given,
    /// and discarded otherwise.
    pub fn start<'env, Out, T>(
        scope: &'scope Scope<'scope, 'env>,
        config: PoolConfig,
        task: T,
        source: Option<Sender<Message<Out>>>,
    ) -> Result<Self, PoolError>
    where
        T: Task<In, Out> + Send + Sync + 'scope,
        Out: Send + 'scope,
    {
        let (sink, queue) = match config.capacity {
            Some(cap) => channel::bounded(cap),
            None => channel::unbounded(),
        };
        WorkerPool::start_on_queue(scope, config.workers, task, (sink, queue), source)
    }

    /// Like `start`, but consume an existing queue.
    ///
    /// The sender half is kept for `submit` and for the stop sentinels.
    pub(crate) fn start_on_queue<'env, Out, T>(
        scope: &'scope Scope<'scope, 'env>,
        num_workers: usize,
        task: T,
        (sink, queue): (Sender<Message<In>>, Receiver<Message<In>>),
        source: Option<Sender<Message<Out>>>,
    ) -> Result<Self, PoolError>
    where
        T: Task<In, Out> + Send + Sync + 'scope,
        Out: Send + 'scope,
    {
        if num_workers == 0 {
            return Err(PoolError::NoWorkers);
        }

        let task = Arc::new(task);
        let mut workers = Vec::with_capacity(num_workers);
        for index in 0..num_workers {
            let task = Arc::clone(&task);
            let queue = queue.clone();
            let source = source.clone();

            // On error, dropping `sink` disconnects the queue and releases
            // the workers that did start.
            let handle = thread::Builder::new()
                .name(format!("densela-worker-{}", index))
                .spawn_scoped(scope, move || run_worker(index, &*task, queue, source))
                .map_err(PoolError::Spawn)?;
            workers.push(handle);
        }
        debug!("started worker pool with {} threads", num_workers);

        Ok(WorkerPool { sink, workers, submitted: 0, stopped: false })
    }

    /// Enqueue one item of work.
    ///
    /// Fails only when every worker has already exited, in which case
    /// `join` will say why.
    pub fn submit(&mut self, item: In) -> Result<(), PoolError> {
        self.sink.send(Message::Item(item))
            .map_err(|_| PoolError::QueueClosed)?;
        self.submitted += 1;
        Ok(())
    }

    /// A handle for feeding the queue from elsewhere.
    pub fn sink(&self) -> Sender<Message<In>> { self.sink.clone() }

    pub fn num_workers(&self) -> usize { self.workers.len() }

    /// Stop the workers after all queued work and wait for them.
    ///
    /// Every worker is joined even if some of them failed; the first failure
    /// (by worker index) is returned and the rest are logged.
    pub fn join(mut self) -> Result<PoolReport, PoolError> {
        self.send_stops();

        let mut first_failure = None;
        let mut processed = Vec::with_capacity(self.workers.len());
        for (index, handle) in ::std::mem::take(&mut self.workers).into_iter().enumerate() {
            let failure = match handle.join() {
                Ok(Ok(count)) => {
                    processed.push(count);
                    continue;
                },
                Ok(Err(e)) => e,
                Err(payload) => PoolError::WorkerPanicked {
                    worker: index,
                    message: panic_message(&*payload),
                },
            };
            if let PoolError::WorkerPanicked { .. } = failure {
                // the worker logged everything else itself
                error!("{}", failure);
            }
            processed.push(0);
            first_failure = first_failure.or(Some(failure));
        }

        match first_failure {
            Some(e) => Err(e),
            None => {
                let report = PoolReport { submitted: self.submitted, processed };
                debug!("worker pool finished {} items", report.total_processed());
                Ok(report)
            },
        }
    }
}

impl<'scope, In> WorkerPool<'scope, In> {
    /// One sentinel per worker, queued behind everything already submitted.
    fn send_stops(&mut self) {
        if self.stopped { return; }
        self.stopped = true;

        for _ in 0..self.workers.len() {
            if self.sink.send(Message::Stop).is_err() {
                // nobody left to stop
                break;
            }
        }
    }
}

impl<'scope, In> Drop for WorkerPool<'scope, In> {
    fn drop(&mut self) { self.send_stops(); }
}

fn run_worker<In, Out, T>(
    index: usize,
    task: &T,
    queue: Receiver<Message<In>>,
    source: Option<Sender<Message<Out>>>,
) -> Result<usize, PoolError>
where T: Task<In, Out> + ?Sized,
{
    let result = work_loop(index, task, queue, source);
    if let Err(e) = &result {
        error!("{}", describe_chain(e));
    }
    result
}

fn work_loop<In, Out, T>(
    index: usize,
    task: &T,
    queue: Receiver<Message<In>>,
    source: Option<Sender<Message<Out>>>,
) -> Result<usize, PoolError>
where T: Task<In, Out> + ?Sized,
{
    let mut processed = 0;
    let mut out = vec![];
    loop {
        let item = match queue.recv() {
            Ok(Message::Item(item)) => item,
            Ok(Message::Stop) => break,
            // every sender is gone, so nothing else can arrive
            Err(_) => break,
        };

        task.process(item, &mut out)
            .map_err(|source| PoolError::TaskFailed { worker: index, source })?;
        processed += 1;

        match &source {
            Some(source) => {
                for output in out.drain(..) {
                    source.send(Message::Item(output))
                        .map_err(|_| PoolError::OutputClosed { worker: index })?;
                }
            },
            None => out.clear(),
        }
    }
    trace!("worker {} exiting after {} items", index, processed);
    Ok(processed)
}

/// `"outer: inner: ..."` for an error and its sources.
pub(crate) fn describe_chain(e: &dyn StdError) -> String {
    let mut text = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        text += &format!(": {}", cause);
        source = cause.source();
    }
    text
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "(non-string panic payload)".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{map, TaskError};
    use ::std::sync::atomic::{AtomicUsize, Ordering};

    fn init_logger() { let _ = ::env_logger::try_init(); }

    #[test]
    fn every_item_is_processed_once() {
        init_logger();
        let seen = AtomicUsize::new(0);
        let report = thread::scope(|scope| {
            let task = |x: usize, _: &mut Vec<()>| -> Result<(), TaskError> {
                seen.fetch_add(x, Ordering::SeqCst);
                Ok(())
            };
            let mut pool = WorkerPool::start(scope, PoolConfig::with_workers(4), task, None)?;
            for x in 1..=100 {
                pool.submit(x)?;
            }
            pool.join()
        }).unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 5050);
        assert_eq!(report.submitted, 100);
        assert_eq!(report.total_processed(), 100);
        assert_eq!(report.processed.len(), 4);
    }

    #[test]
    fn outputs_go_to_source() {
        let (tx, rx) = channel::unbounded();
        thread::scope(|scope| {
            let mut pool = WorkerPool::start(scope, PoolConfig::with_workers(3), map(|x: i32| x + 10), Some(tx))?;
            for x in 0..10 {
                pool.submit(x)?;
            }
            pool.join()
        }).unwrap();

        let mut outputs: Vec<i32> = rx.try_iter().filter_map(|msg| match msg {
            Message::Item(x) => Some(x),
            Message::Stop => None,
        }).collect();
        outputs.sort();
        assert_eq!(outputs, (10..20).collect::<Vec<_>>());
    }

    #[test]
    fn items_may_borrow_disjoint_output() {
        let mut buffer = vec![0usize; 16];
        thread::scope(|scope| {
            let task = |(i, slot): (usize, &mut usize), _: &mut Vec<()>| -> Result<(), TaskError> {
                *slot = i * i;
                Ok(())
            };
            let mut pool = WorkerPool::start(scope, PoolConfig::with_workers(4).capacity(2), task, None)?;
            for item in buffer.iter_mut().enumerate() {
                pool.submit(item)?;
            }
            pool.join()
        }).unwrap();

        assert_eq!(buffer, (0..16).map(|i| i * i).collect::<Vec<_>>());
    }

    #[test]
    fn zero_workers_is_an_error() {
        let result = thread::scope(|scope| {
            WorkerPool::<usize>::start(scope, PoolConfig::with_workers(0), map(|x: usize| x), None::<Sender<Message<usize>>>)
                .map(|_| ())
        });
        match result {
            Err(PoolError::NoWorkers) => {},
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn task_failure_is_reported() {
        init_logger();
        let result = thread::scope(|scope| {
            let task = |x: usize, _: &mut Vec<()>| -> Result<(), TaskError> {
                match x {
                    13 => Err("unlucky".into()),
                    _ => Ok(()),
                }
            };
            let mut pool = WorkerPool::start(scope, PoolConfig::with_workers(2), task, None)?;
            for x in 0..50 {
                // a dead worker is not a reason to stop feeding the live one
                pool.submit(x)?;
            }
            pool.join()
        });

        match result {
            Err(PoolError::TaskFailed { source, .. }) => assert_eq!(source.to_string(), "unlucky"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn panicking_worker_does_not_hang_join() {
        let result = thread::scope(|scope| {
            let task = |x: usize, _: &mut Vec<()>| -> Result<(), TaskError> {
                if x == 3 {
                    panic!("row {} exploded", x);
                }
                Ok(())
            };
            // a single worker, so once it dies nothing is left to consume the queue
            let mut pool = WorkerPool::start(scope, PoolConfig::with_workers(1), task, None)?;
            for x in 0..10 {
                if pool.submit(x).is_err() {
                    break;
                }
            }
            pool.join()
        });

        match result {
            Err(PoolError::WorkerPanicked { worker: 0, message }) => {
                assert_eq!(message, "row 3 exploded");
            },
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn chain_includes_task_error() {
        let e = PoolError::TaskFailed { worker: 2, source: "boom".into() };
        assert_eq!(describe_chain(&e), "task failed on worker 2: boom");
    }

    #[test]
    fn dropped_pool_stops_its_workers() {
        let seen = AtomicUsize::new(0);
        thread::scope(|scope| {
            let task = |_: (), _: &mut Vec<()>| -> Result<(), TaskError> {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            };
            let mut pool = WorkerPool::start(scope, PoolConfig::with_workers(2), task, None).unwrap();
            let external = pool.sink();
            pool.submit(()).unwrap();
            external.send(Message::Item(())).unwrap();
            // `external` outlives the pool; the sentinels still end the workers.
            drop(pool);
        });
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
