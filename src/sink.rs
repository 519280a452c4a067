//! Log and error sinks.
//!
//! Every read ends in exactly one call to either the log sink (success,
//! default used, soft fallback failure) or the error sink (a failure that
//! counts against the outcome flag). Sinks receive the fully formatted line.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A shareable callback that consumes formatted audit lines.
#[derive(Clone)]
pub struct Sink(Arc<dyn Fn(&str) + Send + Sync>);

impl Sink {
    /// Wraps a closure as a sink.
    ///
    /// # Example
    ///
    /// ```
    /// use spconf::Sink;
    ///
    /// let sink = Sink::new(|line| eprintln!("[config] {line}"));
    /// sink.emit("Using env var PORT 8080");
    /// ```
    pub fn new(f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Prints each line to standard output. The default log sink.
    pub fn stdout() -> Self {
        Self::new(|line| println!("{line}"))
    }

    /// Prints each line to standard error. The default error sink.
    pub fn stderr() -> Self {
        Self::new(|line| eprintln!("{line}"))
    }

    /// Forwards each line to `tracing` at INFO level under the `spconf` target.
    pub fn tracing_info() -> Self {
        Self::new(|line| tracing::info!(target: "spconf", "{line}"))
    }

    /// Forwards each line to `tracing` at ERROR level under the `spconf` target.
    pub fn tracing_error() -> Self {
        Self::new(|line| tracing::error!(target: "spconf", "{line}"))
    }

    /// Discards every line.
    pub fn discard() -> Self {
        Self::new(|_| {})
    }

    pub fn emit(&self, line: &str) {
        (self.0)(line)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sink(..)")
    }
}

/// Collects lines in memory.
///
/// Clones share the same buffer, so a test can hand `recorder.sink()` to a
/// resolver and inspect `recorder.lines()` afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink appending to this recorder.
    pub fn sink(&self) -> Sink {
        let lines = Arc::clone(&self.lines);
        Sink::new(move |line| lines.lock().push(line.to_string()))
    }

    /// A snapshot of the lines recorded so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}
