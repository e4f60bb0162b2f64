//! Console appender implementation

use crate::core::{Appender, LoggerError, RenderedLine, Result};
use std::io::{self, Stdout, Write};

/// Echoes rendered lines to standard output (or any writer in tests)
pub struct ConsoleAppender<W: Write = Stdout> {
    writer: W,
    use_colors: bool,
}

impl ConsoleAppender<Stdout> {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            writer: io::stdout(),
            use_colors,
        }
    }
}

impl Default for ConsoleAppender<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleAppender<W> {
    /// Echo into an arbitrary writer
    pub fn with_writer(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + Sync> Appender for ConsoleAppender<W> {
    fn append(&mut self, line: &RenderedLine) -> Result<()> {
        self.writer
            .write_all(line.select(self.use_colors).as_bytes())
            .map_err(|e| LoggerError::io_operation("writing to console", "echo failed", e))
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
