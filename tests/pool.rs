use ::densela_pool::{Pipeline, PoolConfig, PoolError, TaskError, WorkerPool, map};
use ::std::sync::atomic::{AtomicUsize, Ordering};
use ::std::thread;

#[test]
fn pipeline_of_three_stages() {
    let outputs = thread::scope(|scope| {
        let pipeline = Pipeline::start(scope, map(|x: i64| x + 10))?
            .then(map(|x: i64| x * 2))?
            .then(map(|x: i64| x / 5))?;
        for x in 0..10 {
            pipeline.submit(x)?;
        }
        pipeline.join()
    }).unwrap();

    assert_eq!(outputs, vec![4, 4, 4, 5, 5, 6, 6, 6, 7, 7]);
}

#[test]
fn failing_task_does_not_hang() {
    let result = thread::scope(|scope| {
        let task = |x: usize, _: &mut Vec<()>| -> Result<(), TaskError> {
            match x % 7 {
                3 => Err(format!("bad item {}", x).into()),
                _ => Ok(()),
            }
        };
        let mut pool = WorkerPool::start(scope, PoolConfig::with_workers(3), task, None)?;
        for x in 0..100 {
            if pool.submit(x).is_err() {
                break;
            }
        }
        pool.join()
    });
    match result {
        Err(PoolError::TaskFailed { .. }) => {},
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn panicking_task_is_reported() {
    let result = thread::scope(|scope| {
        let task = |x: usize, _: &mut Vec<()>| -> Result<(), TaskError> {
            if x == 5 {
                panic!("item five");
            }
            Ok(())
        };
        let mut pool = WorkerPool::start(scope, PoolConfig::with_workers(2), task, None)?;
        for x in 0..20 {
            if pool.submit(x).is_err() {
                break;
            }
        }
        pool.join()
    });
    match result {
        Err(PoolError::WorkerPanicked { message, .. }) => assert!(message.contains("item five")),
        other => panic!("unexpected: {:?}", other),
    }
}

#[test]
fn shared_state_sees_every_item() {
    let counter = AtomicUsize::new(0);
    let report = thread::scope(|scope| {
        let task = |x: usize, _: &mut Vec<()>| -> Result<(), TaskError> {
            counter.fetch_add(x, Ordering::SeqCst);
            Ok(())
        };
        let mut pool = WorkerPool::start(scope, PoolConfig::with_workers(4), task, None)?;
        for x in 1..=1000 {
            pool.submit(x)?;
        }
        pool.join()
    }).unwrap();

    assert_eq!(report.submitted, 1000);
    assert_eq!(report.total_processed(), 1000);
    assert_eq!(counter.load(Ordering::SeqCst), 500500);
}
