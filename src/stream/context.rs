use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Somewhere a stage of a stream can run.
///
/// `observe_on` hands each notification to [`ExecutionContext::submit`] and returns
/// without waiting for it to run.
pub trait ExecutionContext: Send + Sync + 'static {
    fn submit(&self, task: Task);
}

impl<C: ExecutionContext + ?Sized> ExecutionContext for Arc<C> {
    fn submit(&self, task: Task) {
        (**self).submit(task)
    }
}

/// Runs tasks inline on the submitting thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateContext;

impl ExecutionContext for ImmediateContext {
    fn submit(&self, task: Task) {
        task()
    }
}

/// Runs every task on the tokio blocking pool, so several may run at once.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    handle: Handle,
}

impl WorkerPool {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl ExecutionContext for WorkerPool {
    fn submit(&self, task: Task) {
        // Dropping the handle detaches the task; nothing awaits search calls.
        let _ = self.handle.spawn_blocking(task);
    }
}

/// Submit side of the single-threaded interactive queue.
#[derive(Clone)]
pub struct InteractiveContext {
    tx: Sender<Task>,
}

impl ExecutionContext for InteractiveContext {
    fn submit(&self, task: Task) {
        if self.tx.send(task).is_err() {
            tracing::debug!("interactive loop is gone, dropping task");
        }
    }
}

/// Creates the interactive queue: the submit side to hand to pipelines and the loop
/// the interactive thread pumps.
pub fn interactive_pair() -> (InteractiveContext, InteractiveLoop) {
    let (tx, rx) = mpsc::channel();
    (InteractiveContext { tx }, InteractiveLoop { rx })
}

/// Receiving side of the interactive queue, owned by the interactive thread.
///
/// Tasks run in submission order and only when the owner pumps the loop, which is
/// what keeps busy signalling and result delivery on a single thread.
pub struct InteractiveLoop {
    rx: Receiver<Task>,
}

impl InteractiveLoop {
    /// Runs whatever is queued right now and returns how many tasks ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Keeps running tasks until `done` holds or `timeout` expires. Returns `done()`.
    pub fn run_until(&self, timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.run_pending();
            if done() {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(task) => task(),
                Err(RecvTimeoutError::Timeout) => return done(),
                Err(RecvTimeoutError::Disconnected) => return done(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn interactive_tasks_run_in_submission_order_on_the_pumping_thread() {
        let (context, interactive) = interactive_pair();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let producer = {
            let context = context.clone();
            let seen = Arc::clone(&seen);
            std::thread::spawn(move || {
                for i in 0..3 {
                    let seen = Arc::clone(&seen);
                    context.submit(Box::new(move || {
                        seen.lock().unwrap().push((i, std::thread::current().id()))
                    }));
                }
            })
        };
        producer.join().unwrap();

        assert_eq!(interactive.run_pending(), 3);
        let here = std::thread::current().id();
        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert!(seen.iter().all(|(_, thread)| *thread == here));
    }

    #[test]
    fn run_until_gives_up_after_timeout() {
        let (_context, interactive) = interactive_pair();
        assert!(!interactive.run_until(Duration::from_millis(20), || false));
    }
}
