use crate::{PoolError, Task};
use crate::pool::{WorkerPool, Message};

use ::crossbeam::channel::{self, Receiver, Sender};
use ::std::thread::Scope;

/// Type-erased handle to one running stage.
trait Stage<'scope> {
    fn join(self: Box<Self>) -> Result<usize, PoolError>;
}

impl<'scope, In: Send + 'scope> Stage<'scope> for WorkerPool<'scope, In> {
    fn join(self: Box<Self>) -> Result<usize, PoolError> {
        WorkerPool::join(*self).map(|report| report.total_processed())
    }
}

/// Worker pools chained through their queues.
///
/// Each stage's outputs are the next stage's work items.  Stages are shut down
/// front to back: a stage receives its stop sentinels only after every worker
/// of the previous stage has exited, so nothing is lost in between.
///
/// With one worker per stage (see [`Pipeline::start`]) the outputs keep the
/// order of the inputs.
pub struct Pipeline<'scope, 'env, In, Out> {
    scope: &'scope Scope<'scope, 'env>,
    head: Sender<Message<In>>,
    stages: Vec<Box<dyn Stage<'scope> + 'scope>>,
    tail: (Sender<Message<Out>>, Receiver<Message<Out>>),
}

impl<'scope, 'env, In, Out> Pipeline<'scope, 'env, In, Out>
where
    In: Send + 'scope,
    Out: Send + 'scope,
{
    /// A pipeline with a single one-worker stage.
    pub fn start<T>(scope: &'scope Scope<'scope, 'env>, task: T) -> Result<Self, PoolError>
    where T: Task<In, Out> + Send + Sync + 'scope,
    { Pipeline::start_with_workers(scope, 1, task) }

    pub fn start_with_workers<T>(
        scope: &'scope Scope<'scope, 'env>,
        workers: usize,
        task: T,
    ) -> Result<Self, PoolError>
    where T: Task<In, Out> + Send + Sync + 'scope,
    {
        let queue = channel::unbounded();
        let head = queue.0.clone();
        let tail = channel::unbounded();
        let pool = WorkerPool::start_on_queue(scope, workers, task, queue, Some(tail.0.clone()))?;
        Ok(Pipeline {
            scope,
            head,
            stages: vec![Box::new(pool)],
            tail,
        })
    }

    /// Append a one-worker stage.
    pub fn then<Next, T>(self, task: T) -> Result<Pipeline<'scope, 'env, In, Next>, PoolError>
    where
        T: Task<Out, Next> + Send + Sync + 'scope,
        Next: Send + 'scope,
    { self.then_with_workers(1, task) }

    pub fn then_with_workers<Next, T>(
        self,
        workers: usize,
        task: T,
    ) -> Result<Pipeline<'scope, 'env, In, Next>, PoolError>
    where
        T: Task<Out, Next> + Send + Sync + 'scope,
        Next: Send + 'scope,
    {
        let Pipeline { scope, head, mut stages, tail } = self;
        let next_tail = channel::unbounded();
        let pool = WorkerPool::start_on_queue(scope, workers, task, tail, Some(next_tail.0.clone()))?;
        stages.push(Box::new(pool));
        Ok(Pipeline { scope, head, stages, tail: next_tail })
    }

    /// Feed one item to the first stage.
    pub fn submit(&self, item: In) -> Result<(), PoolError> {
        self.head.send(Message::Item(item))
            .map_err(|_| PoolError::QueueClosed)
    }

    pub fn num_stages(&self) -> usize { self.stages.len() }

    /// Drain every stage in order and collect the outputs of the last one.
    ///
    /// Every stage is joined even after a failure.  A stage that failed only
    /// because a later stage stopped accepting its output is not the cause,
    /// so such an error is reported only if nothing better turns up.
    pub fn join(self) -> Result<Vec<Out>, PoolError> {
        let Pipeline { scope: _, head, stages, tail } = self;
        drop(head);

        let mut failure: Option<PoolError> = None;
        for (index, stage) in stages.into_iter().enumerate() {
            match stage.join() {
                Ok(processed) => debug!("pipeline stage {} processed {} items", index, processed),
                Err(e) => {
                    let replace = match failure {
                        None => true,
                        Some(PoolError::OutputClosed { .. }) => !is_output_closed(&e),
                        Some(_) => false,
                    };
                    if replace {
                        failure = Some(e);
                    }
                },
            }
        }
        if let Some(e) = failure {
            return Err(e);
        }

        // every worker has exited, so all outputs are already queued
        let (_, outputs) = tail;
        Ok(outputs.try_iter().filter_map(|msg| match msg {
            Message::Item(x) => Some(x),
            Message::Stop => None,
        }).collect())
    }
}

fn is_output_closed(e: &PoolError) -> bool {
    match e {
        PoolError::OutputClosed { .. } => true,
        _ => false,
    }
}
