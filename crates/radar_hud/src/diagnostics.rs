//! Where skipped-frame errors go.

use std::sync::Arc;

use parking_lot::Mutex;

/// Receives a human-readable message for every caught per-frame error.
pub trait DiagnosticsSink {
    /// Records one message.
    fn report(&mut self, message: &str);
}

impl<F: FnMut(&str)> DiagnosticsSink for F {
    fn report(&mut self, message: &str) {
        self(message);
    }
}

/// Default sink: forwards to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&mut self, message: &str) {
        tracing::warn!(target: "radar_hud", "{message}");
    }
}

/// Collects messages in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies out everything reported so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Number of messages reported so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }
}

impl DiagnosticsSink for MemorySink {
    fn report(&mut self, message: &str) {
        self.messages.lock().push(message.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_shares_buffer() {
        let sink = MemorySink::new();
        let mut handle = sink.clone();
        handle.report("frame skipped");
        assert_eq!(sink.messages(), vec!["frame skipped".to_owned()]);
    }

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |m: &str| seen.push(m.to_owned());
            sink.report("a");
            sink.report("b");
        }
        assert_eq!(seen, ["a", "b"]);
    }
}
