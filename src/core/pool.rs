use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, warn};
use thiserror::Error;

/// A unit of pool work; in practice always "expand one directory"
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Progress hook polled while waiting for quiescence, with
/// `(completed, active)`; returning false requests cancellation
pub type PoolProgress = Box<dyn Fn(usize, usize) -> bool + Send + Sync>;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("no worker threads could be spawned")]
    NoWorkers,
}

pub struct PoolConfig {
    /// Resolved worker count; must be at least 1
    pub threads: usize,
    /// Shared cancellation flag, usually the search context's
    pub stop_flag: Arc<AtomicBool>,
    pub progress: Option<PoolProgress>,
}

/// Snapshot of the pool's bookkeeping counters
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolStats {
    pub threads: usize,
    pub active: usize,
    pub queued: usize,
    pub completed: usize,
    pub total_submitted: usize,
}

struct QueueState {
    tasks: VecDeque<Task>,
    active: usize,
    completed: usize,
    total_submitted: usize,
    completion_requested: bool,
    shutdown: bool,
}

struct PoolShared {
    queue: Mutex<QueueState>,
    work_available: Condvar,
    done: Condvar,
    stop_flag: Arc<AtomicBool>,
}

impl PoolShared {
    fn submit(&self, task: Task) -> Result<(), Task> {
        if self.stop_flag.load(Ordering::Acquire) {
            return Err(task);
        }

        {
            let mut state = self.queue.lock().unwrap();
            if state.shutdown {
                drop(state);
                return Err(task);
            }
            state.tasks.push_back(task);
            state.total_submitted += 1;
        }
        self.work_available.notify_one();
        Ok(())
    }
}

/// A cloneable submission handle so running tasks can enqueue more work
#[derive(Clone)]
pub struct PoolHandle {
    shared: Arc<PoolShared>,
}

impl PoolHandle {
    /// Enqueue a task. The task is handed back on refusal (stop requested
    /// or pool shutting down) so the caller can run it on its own stack
    /// instead of silently dropping it.
    pub fn submit(&self, task: Task) -> Result<(), Task> {
        self.shared.submit(task)
    }
}

/// Fixed-size worker pool over a FIFO task queue.
///
/// Workers block on a condition variable while the queue is empty. A
/// second condition variable stands in for the done-event:
/// `wait_completion` marks completion as requested and the last worker to
/// drain the queue signals it.
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
    progress: Option<PoolProgress>,
}

impl WorkerPool {
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let shared = Arc::new(PoolShared {
            queue: Mutex::new(QueueState {
                tasks: VecDeque::new(),
                active: 0,
                completed: 0,
                total_submitted: 0,
                completion_requested: false,
                shutdown: false,
            }),
            work_available: Condvar::new(),
            done: Condvar::new(),
            stop_flag: config.stop_flag,
        });

        let mut workers = Vec::with_capacity(config.threads);
        for id in 0..config.threads {
            let shared = Arc::clone(&shared);
            let builder = thread::Builder::new().name(format!("fsq-worker-{id}"));
            match builder.spawn(move || worker_loop(&shared)) {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    // run with however many threads we managed to get
                    warn!("failed to spawn worker {id}: {err}");
                    break;
                }
            }
        }

        if workers.is_empty() {
            return Err(PoolError::NoWorkers);
        }
        debug!("worker pool started with {} threads", workers.len());

        Ok(WorkerPool {
            shared,
            workers,
            progress: config.progress,
        })
    }

    /// A handle tasks can capture to submit follow-up work
    pub fn handle(&self) -> PoolHandle {
        PoolHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// See [`PoolHandle::submit`]
    pub fn submit(&self, task: Task) -> Result<(), Task> {
        self.shared.submit(task)
    }

    /// Block until every submitted task has run, the timeout elapses, or
    /// the progress hook cancels. Returns true on quiescence.
    ///
    /// The progress hook is invoked once per poll iteration; if it returns
    /// false the stop flag is set and the wait reports failure.
    pub fn wait_completion(&self, timeout: Option<Duration>) -> bool {
        let start = Instant::now();

        {
            let mut state = self.shared.queue.lock().unwrap();
            state.completion_requested = true;
            if state.active == 0 && state.tasks.is_empty() {
                return true;
            }
        }

        loop {
            let (active, queued, completed) = {
                let state = self.shared.queue.lock().unwrap();
                (state.active, state.tasks.len(), state.completed)
            };

            if active == 0 && queued == 0 {
                return true;
            }

            if let Some(limit) = timeout {
                if start.elapsed() >= limit {
                    return false;
                }
            }

            if let Some(progress) = &self.progress {
                if !progress(completed, active) {
                    self.shared.stop_flag.store(true, Ordering::Release);
                    return false;
                }
            }

            let slice = match timeout {
                Some(limit) => limit
                    .saturating_sub(start.elapsed())
                    .min(Duration::from_millis(50)),
                None => Duration::from_millis(50),
            };
            let state = self.shared.queue.lock().unwrap();
            let _ = self.shared.done.wait_timeout(state, slice).unwrap();
        }
    }

    pub fn stats(&self) -> PoolStats {
        let state = self.shared.queue.lock().unwrap();
        PoolStats {
            threads: self.workers.len(),
            active: state.active,
            queued: state.tasks.len(),
            completed: state.completed,
            total_submitted: state.total_submitted,
        }
    }

    /// Stop the workers and join them. Queued tasks that no worker picked
    /// up are dropped unexecuted.
    pub fn shutdown(mut self) {
        self.shutdown_inner();
    }

    fn shutdown_inner(&mut self) {
        if self.workers.is_empty() {
            return;
        }

        self.shared.stop_flag.store(true, Ordering::Release);
        {
            let mut state = self.shared.queue.lock().unwrap();
            state.shutdown = true;
        }
        self.shared.work_available.notify_all();

        for handle in self.workers.drain(..) {
            if let Err(err) = handle.join() {
                warn!("worker thread panicked: {err:?}");
            }
        }

        // free any work nobody picked up, without running it
        self.shared.queue.lock().unwrap().tasks.clear();
        debug!("worker pool shut down");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown_inner();
    }
}

fn worker_loop(shared: &PoolShared) {
    loop {
        let task = {
            let mut state = shared.queue.lock().unwrap();
            loop {
                // drain queued work even while stopping so every task gets
                // its teardown; tasks observe the stop flag themselves
                if let Some(task) = state.tasks.pop_front() {
                    state.active += 1;
                    break task;
                }
                if state.shutdown || shared.stop_flag.load(Ordering::Acquire) {
                    return;
                }
                state = shared.work_available.wait(state).unwrap();
            }
        };

        task();

        let mut state = shared.queue.lock().unwrap();
        state.active -= 1;
        state.completed += 1;
        if state.completion_requested && state.active == 0 && state.tasks.is_empty() {
            shared.done.notify_all();
        }
    }
}
