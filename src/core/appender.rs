//! Appender trait for log output destinations

use super::{error::Result, output_format::RenderedLine};

pub trait Appender: Send + Sync {
    /// Write one rendered record. Each appender picks the plain or colored
    /// variant according to its own toggle.
    fn append(&mut self, line: &RenderedLine) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
