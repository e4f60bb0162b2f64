//! Scheduling of background processing cycles
//!
//! Every record emitted in background mode gets its own short-lived task.
//! A task that is dropped without running processes its record inline and
//! releases its in-flight slot, so a spawner that refuses or discards a task
//! never loses the record.

use super::error::{LoggerError, Result};
#[cfg(feature = "tokio")]
use std::panic::{self, AssertUnwindSafe};
use std::thread;

/// One unit of background work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs background processing cycles
pub trait TaskSpawner: Send + Sync {
    /// Schedule `task`. On error the task has been dropped without running.
    ///
    /// Implementations must not panic.
    fn spawn(&self, task: Task) -> Result<()>;

    fn name(&self) -> &str;
}

/// Spawns one named, detached OS thread per task
#[derive(Debug, Clone)]
pub struct ThreadSpawner {
    thread_name: String,
    stack_size: Option<usize>,
}

impl ThreadSpawner {
    pub const DEFAULT_THREAD_NAME: &'static str = "logger-worker";

    #[must_use]
    pub fn new() -> Self {
        Self {
            thread_name: Self::DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
        }
    }

    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    #[must_use]
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

impl Default for ThreadSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskSpawner for ThreadSpawner {
    fn spawn(&self, task: Task) -> Result<()> {
        let mut builder = thread::Builder::new().name(self.thread_name.clone());
        if let Some(size) = self.stack_size {
            builder = builder.stack_size(size);
        }
        builder
            .spawn(task)
            .map(|_detached| ())
            .map_err(|e| LoggerError::spawn(e.to_string()))
    }

    fn name(&self) -> &str {
        "thread"
    }
}

/// Runs cycles on a tokio runtime's blocking pool
#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
}

#[cfg(feature = "tokio")]
impl TokioSpawner {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Spawner bound to the runtime of the calling context, if any
    pub fn current() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self::new)
    }
}

#[cfg(feature = "tokio")]
impl TaskSpawner for TokioSpawner {
    fn spawn(&self, task: Task) -> Result<()> {
        // A shut-down runtime drops the task unrun.
        panic::catch_unwind(AssertUnwindSafe(|| drop(self.handle.spawn_blocking(task))))
            .map_err(|payload| LoggerError::spawn(LoggerError::panicked(payload.as_ref()).to_string()))
    }

    fn name(&self) -> &str {
        "tokio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_thread_spawner_runs_task_on_named_thread() {
        let (tx, rx) = mpsc::channel();
        let spawner = ThreadSpawner::new().with_thread_name("cycle-test");
        spawner
            .spawn(Box::new(move || {
                let name = thread::current().name().map(str::to_string);
                tx.send(name).unwrap();
            }))
            .unwrap();

        let name = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(name.as_deref(), Some("cycle-test"));
    }

    #[test]
    fn test_default_name() {
        let spawner = ThreadSpawner::default();
        assert_eq!(spawner.thread_name, ThreadSpawner::DEFAULT_THREAD_NAME);
        assert_eq!(TaskSpawner::name(&spawner), "thread");
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn test_tokio_spawner_runs_task() {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let spawner = TokioSpawner::new(runtime.handle().clone());
        let (tx, rx) = mpsc::channel();
        spawner.spawn(Box::new(move || tx.send(7).unwrap())).unwrap();
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 7);
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn test_tokio_spawner_after_shutdown_drops_task_unrun() {
        struct Unrun(mpsc::Sender<&'static str>);
        impl Drop for Unrun {
            fn drop(&mut self) {
                let _ = self.0.send("dropped");
            }
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .build()
            .unwrap();
        let spawner = TokioSpawner::new(runtime.handle().clone());
        runtime.shutdown_timeout(Duration::from_millis(100));

        let (tx, rx) = mpsc::channel();
        let marker = Unrun(tx.clone());
        let result = spawner.spawn(Box::new(move || {
            let _marker = marker;
            let _ = tx.send("ran");
        }));

        assert!(result.is_ok());
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), "dropped");
    }

    #[cfg(feature = "tokio")]
    #[test]
    fn test_tokio_current_outside_runtime() {
        assert!(TokioSpawner::current().is_none());
    }
}
