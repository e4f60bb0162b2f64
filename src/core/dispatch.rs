//! Processing cycles and the in-flight drain
//!
//! A cycle pops one record, renders it against a configuration snapshot and
//! hands the line to the console, the rotating file and any extra appenders.
//! Cycles are serialized by the processing lock; the queue lock is only held
//! for the push or pop itself.
//!
//! In background mode each emission increments the in-flight counter and
//! schedules one cycle. `flush()` runs a cycle inline and then waits, within
//! a bounded budget, for the counter to reach zero.

use super::{
    appender::Appender,
    config::LoggerConfig,
    error::{LoggerError, Result},
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    record_queue::RecordQueue,
    spawner::{Task, TaskSpawner},
};
use crate::appenders::{ConsoleAppender, RotatingFileAppender};
use parking_lot::{Condvar, Mutex, RwLock};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Failures are reported on the first one and then every this many
const DROP_ALERT_INTERVAL: u64 = 1000;

/// Count of scheduled cycles that have not finished yet
#[derive(Debug, Default)]
pub struct InFlight {
    count: Mutex<usize>,
    drained: Condvar,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one pending cycle; it is released when the guard drops
    pub fn acquire(self: &Arc<Self>) -> InFlightGuard {
        *self.count.lock() += 1;
        InFlightGuard {
            in_flight: Arc::clone(self),
        }
    }

    pub fn current(&self) -> usize {
        *self.count.lock()
    }

    /// Block until the counter is zero, waking at least every `interval`,
    /// for at most `budget`. Returns whether it drained.
    pub fn wait_drained(&self, interval: Duration, budget: Duration) -> bool {
        let mut count = self.count.lock();
        let Some(deadline) = Instant::now().checked_add(budget) else {
            return *count == 0;
        };

        while *count > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            self.drained.wait_for(&mut count, interval.min(deadline - now));
        }
        true
    }
}

/// Releases one in-flight slot on drop, panics included
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<InFlight>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut count = self.in_flight.count.lock();
        *count = count.saturating_sub(1);
        self.in_flight.drained.notify_all();
    }
}

/// One scheduled cycle. Dropped without running, it processes its record
/// inline so a spawner that discards tasks loses nothing.
struct Cycle {
    dispatcher: Option<Arc<Dispatcher>>,
    _guard: InFlightGuard,
}

impl Cycle {
    fn run(mut self) {
        if let Some(dispatcher) = self.dispatcher.take() {
            dispatcher.process_one();
        }
    }
}

impl Drop for Cycle {
    fn drop(&mut self) {
        if let Some(dispatcher) = self.dispatcher.take() {
            dispatcher.process_unscheduled();
        }
    }
}

/// State shared between the logger handle and its background cycles
pub struct Dispatcher {
    queue: RecordQueue,
    processing: Mutex<()>,
    in_flight: Arc<InFlight>,
    config: RwLock<LoggerConfig>,
    appenders: Mutex<Vec<Box<dyn Appender>>>,
    spawner: Box<dyn TaskSpawner>,
    metrics: Arc<LoggerMetrics>,
}

impl Dispatcher {
    pub fn new(
        config: LoggerConfig,
        spawner: Box<dyn TaskSpawner>,
        appenders: Vec<Box<dyn Appender>>,
    ) -> Self {
        Self {
            queue: RecordQueue::new(),
            processing: Mutex::new(()),
            in_flight: Arc::new(InFlight::new()),
            config: RwLock::new(config.normalized()),
            appenders: Mutex::new(appenders),
            spawner,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    pub fn enqueue(&self, record: LogRecord) {
        self.queue.push(record);
    }

    /// Process the record just enqueued, inline or in the background
    /// depending on `auto_flush`.
    pub fn dispatch(self: &Arc<Self>) {
        if self.config.read().auto_flush {
            self.process_one();
            return;
        }

        let cycle = Cycle {
            dispatcher: Some(Arc::clone(self)),
            _guard: self.in_flight.acquire(),
        };
        let task: Task = Box::new(move || cycle.run());

        match self.spawner.spawn(task) {
            Ok(()) => {
                self.metrics.record_background_dispatch();
            }
            Err(e) => {
                // The rejected cycle already ran inline when it was dropped.
                if self.metrics.inline_fallbacks() <= 1 {
                    eprintln!("[LOGGER WARNING] {} (spawner '{}').", e, self.spawner.name());
                }
            }
        }
    }

    /// A cycle the spawner dropped without running
    fn process_unscheduled(&self) {
        if self.metrics.record_inline_fallback() == 0 {
            eprintln!(
                "[LOGGER WARNING] Spawner '{}' did not run a background cycle. Processing inline instead.",
                self.spawner.name()
            );
        }
        self.process_one();
    }

    /// Run one dequeue-render-persist cycle. An empty queue is a no-op.
    pub fn process_one(&self) {
        let _cycle = self.processing.lock();
        let Some(record) = self.queue.pop() else {
            return;
        };
        let config = self.config.read().clone();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.persist(&record, &config)));
        match outcome {
            Ok(Ok(())) => {
                self.metrics.record_logged();
            }
            Ok(Err(e)) => self.alert_and_drop(&e),
            Err(payload) => self.alert_and_drop(&LoggerError::panicked(payload.as_ref())),
        }
    }

    /// Echo, file and extra appenders. Only a failed file write loses the
    /// record; other failures are reported on their own.
    fn persist(&self, record: &LogRecord, config: &LoggerConfig) -> Result<()> {
        let line = config.formatter().render(record);

        if config.stdout {
            let mut console = ConsoleAppender::with_colors(config.colors_on_stdout);
            if let Err(e) = console.append(&line) {
                self.report_appender_failure("console", &e);
            }
        }

        let persisted = match RotatingFileAppender::from_config(config) {
            Some(file) => file.with_metrics(Arc::clone(&self.metrics)).append(&line),
            None => Ok(()),
        };

        for appender in self.appenders.lock().iter_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| appender.append(&line)))
                .unwrap_or_else(|payload| Err(LoggerError::panicked(payload.as_ref())));
            if let Err(e) = outcome {
                self.report_appender_failure(appender.name(), &e);
            }
        }

        persisted
    }

    fn report_appender_failure(&self, name: &str, error: &LoggerError) {
        let failures = self.metrics.record_appender_failure();

        if failures == 0 || (failures + 1) % DROP_ALERT_INTERVAL == 0 {
            eprintln!(
                "[LOGGER ERROR] Appender '{}' failed: {}. {} appender failures so far.",
                name,
                error,
                failures + 1
            );
        }
    }

    fn alert_and_drop(&self, error: &LoggerError) {
        let dropped_count = self.metrics.record_dropped();

        if dropped_count == 0 || (dropped_count + 1) % DROP_ALERT_INTERVAL == 0 {
            eprintln!(
                "[LOGGER ERROR] Failed to persist log record: {}. {} records dropped so far.",
                error,
                dropped_count + 1
            );
        }
    }

    /// One inline cycle, then a bounded wait for background cycles
    pub fn flush(&self) -> bool {
        self.process_one();

        let (interval, budget) = {
            let config = self.config.read();
            (config.flush_poll_interval, config.flush_budget())
        };
        let drained = self.in_flight.wait_drained(interval, budget);

        for appender in self.appenders.lock().iter_mut() {
            if let Err(e) = appender.flush() {
                eprintln!("[LOGGER ERROR] Appender '{}' flush failed: {}", appender.name(), e);
            }
        }
        drained
    }

    pub fn config(&self) -> LoggerConfig {
        self.config.read().clone()
    }

    /// Threshold and critical-gating flag, read without cloning the config
    pub fn gate(&self) -> (LogLevel, bool) {
        let config = self.config.read();
        (config.level, config.gate_critical)
    }

    pub fn update_config<F: FnOnce(&mut LoggerConfig)>(&self, update: F) {
        let mut config = self.config.write();
        update(&mut config);
        config.max_num_files = config.max_num_files.max(1);
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.lock().push(appender);
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.current()
    }
}
