///
/// Warning sinks.
///
/// Loaders report non-fatal findings, like unexpected entries under a
/// library root, through a `WarningSink`. Emitting never fails from the
/// loader's point of view: a sink that cannot deliver a message drops it.
///

use std::sync::{Arc, Mutex};

/// `tag` is the emitting loader's tag at the time of the call.
pub trait WarningSink: Send {
    fn warn(&self, tag: &str, message: &str);
}

/// Emits warnings as `tracing` events. This is the default sink.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, tag: &str, message: &str) {
        tracing::warn!(loader = %tag, "{}", message);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl WarningSink for StderrSink {
    fn warn(&self, _tag: &str, message: &str) {
        eprintln!("{}", message);
    }
}

/// Keeps every warning in memory. Clones share the same buffer, so one
/// handle can be given to a loader and another kept to read the messages.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages().is_empty()
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, _tag: &str, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_shares_buffer() {
        let sink = CollectingSink::new();
        let handle = sink.clone();

        sink.warn("my_lib", "first");
        sink.warn("my_lib", "second");

        assert_eq!(handle.messages(), vec!["first", "second"]);
        assert!(!handle.is_empty());
    }

    #[test]
    fn test_tracing_sink_does_not_panic_without_subscriber() {
        TracingSink.warn("my_lib", "nobody listens");
        StderrSink.warn("my_lib", "printed to stderr");
    }
}
