//! Live status sinks for partial and finalized recognition results.

use crate::output::{clear_line, render_final, render_partial};
use crate::pipeline::types::{PartialGuess, Utterance};
use std::sync::{Arc, Mutex};

/// Pluggable live status handler for the pipeline.
///
/// Receives every partial guess and every finalized utterance, in arrival
/// order. Partials supersede each other; only the result log persists
/// finalized text.
pub trait StatusSink: Send + 'static {
    /// Called for each in-progress partial guess.
    fn partial(&mut self, guess: &PartialGuess);

    /// Called for each finalized utterance, before it is logged.
    fn finalized(&mut self, utterance: &Utterance);

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "status"
    }
}

/// Renders live status to stderr: partials on one overwritten dimmed line,
/// finalized text on its own line.
pub struct ConsoleStatus {
    last_partial: String,
    verbosity: u8,
}

impl ConsoleStatus {
    pub fn new(verbosity: u8) -> Self {
        Self {
            last_partial: String::new(),
            verbosity,
        }
    }
}

impl StatusSink for ConsoleStatus {
    fn partial(&mut self, guess: &PartialGuess) {
        // Unchanged partials would only cause flicker.
        if guess.text.is_empty() || guess.text == self.last_partial {
            return;
        }
        render_partial(&guess.text);
        self.last_partial.clear();
        self.last_partial.push_str(&guess.text);
    }

    fn finalized(&mut self, utterance: &Utterance) {
        if utterance.text.is_empty() {
            // Silence finalizations carry no text worth showing; just
            // retire the stale partial.
            if !self.last_partial.is_empty() {
                clear_line();
            }
        } else {
            render_final(&utterance.text, utterance.confidence, self.verbosity);
        }
        self.last_partial.clear();
    }

    fn name(&self) -> &'static str {
        "console"
    }
}

/// Discards all status output (quiet mode).
pub struct NullStatus;

impl StatusSink for NullStatus {
    fn partial(&mut self, _guess: &PartialGuess) {}

    fn finalized(&mut self, _utterance: &Utterance) {}

    fn name(&self) -> &'static str {
        "null"
    }
}

/// Status event recorded by [`CollectorStatus`].
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    Partial(String),
    Final(String),
}

/// Records status events for tests and library use.
///
/// Clones share the same event buffer, so a clone kept by the test observes
/// events recorded by the instance moved into the pipeline.
#[derive(Clone, Default)]
pub struct CollectorStatus {
    events: Arc<Mutex<Vec<StatusEvent>>>,
}

impl CollectorStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events in arrival order.
    pub fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Recorded partial texts in arrival order.
    pub fn partials(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                StatusEvent::Partial(text) => Some(text),
                StatusEvent::Final(_) => None,
            })
            .collect()
    }

    /// Recorded finalized texts in arrival order.
    pub fn finals(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                StatusEvent::Final(text) => Some(text),
                StatusEvent::Partial(_) => None,
            })
            .collect()
    }
}

impl StatusSink for CollectorStatus {
    fn partial(&mut self, guess: &PartialGuess) {
        if let Ok(mut events) = self.events.lock() {
            events.push(StatusEvent::Partial(guess.text.clone()));
        }
    }

    fn finalized(&mut self, utterance: &Utterance) {
        if let Ok(mut events) = self.events.lock() {
            events.push(StatusEvent::Final(utterance.text.clone()));
        }
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_sink_is_object_safe() {
        let _sink: Box<dyn StatusSink> = Box::new(CollectorStatus::new());
    }

    #[test]
    fn collector_records_events_in_arrival_order() {
        let collector = CollectorStatus::new();
        let mut sink: Box<dyn StatusSink> = Box::new(collector.clone());

        sink.partial(&PartialGuess::new("the"));
        sink.partial(&PartialGuess::new("the quick"));
        sink.finalized(&Utterance::new("the quick brown fox"));

        assert_eq!(
            collector.events(),
            vec![
                StatusEvent::Partial("the".to_string()),
                StatusEvent::Partial("the quick".to_string()),
                StatusEvent::Final("the quick brown fox".to_string()),
            ]
        );
    }

    #[test]
    fn collector_clone_shares_event_buffer() {
        let collector = CollectorStatus::new();
        let mut moved = collector.clone();

        moved.finalized(&Utterance::new("hello"));

        assert_eq!(collector.finals(), vec!["hello".to_string()]);
        assert!(collector.partials().is_empty());
    }

    #[test]
    fn console_status_tracks_last_partial() {
        let mut console = ConsoleStatus::new(0);

        console.partial(&PartialGuess::new("one"));
        assert_eq!(console.last_partial, "one");

        // Unchanged partial leaves state alone
        console.partial(&PartialGuess::new("one"));
        assert_eq!(console.last_partial, "one");

        console.partial(&PartialGuess::new("one two"));
        assert_eq!(console.last_partial, "one two");

        console.finalized(&Utterance::new("one two three"));
        assert!(console.last_partial.is_empty());
    }

    #[test]
    fn null_status_accepts_everything() {
        let mut sink = NullStatus;
        sink.partial(&PartialGuess::new("ignored"));
        sink.finalized(&Utterance::new("ignored"));
        assert_eq!(sink.name(), "null");
    }
}
