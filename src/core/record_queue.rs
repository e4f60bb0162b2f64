//! FIFO of records waiting to be rendered and persisted

use super::log_record::LogRecord;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Thread-safe FIFO queue.
///
/// The lock is held only for the push or pop itself, never across
/// formatting or I/O.
#[derive(Debug, Default)]
pub struct RecordQueue {
    inner: Mutex<VecDeque<LogRecord>>,
}

impl RecordQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail
    pub fn push(&self, record: LogRecord) {
        self.inner.lock().push_back(record);
    }

    /// Remove the head, `None` when nothing is pending
    pub fn pop(&self) -> Option<LogRecord> {
        self.inner.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
