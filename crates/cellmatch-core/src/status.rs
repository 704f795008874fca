//! Status channel for human-readable progress messages
//!
//! The comparison pipeline reports what it is doing through a
//! [`StatusSink`]. Hosts decide where messages go: a terminal, a log, or a
//! test buffer.

/// Receiver of progress messages
pub trait StatusSink {
    /// Deliver one message
    fn status(&mut self, message: &str);
}

impl<F: FnMut(&str)> StatusSink for F {
    fn status(&mut self, message: &str) {
        self(message)
    }
}

/// Collects messages in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLog {
    messages: Vec<String>,
}

impl StatusLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far, oldest first
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Whether any message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }
}

impl StatusSink for StatusLog {
    fn status(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Forwards messages to `tracing` at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn status(&mut self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Discards every message
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatus;

impl StatusSink for NullStatus {
    fn status(&mut self, _message: &str) {}
}
