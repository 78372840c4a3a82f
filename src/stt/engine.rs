use crate::error::{Result, VoxnoteError};
use crate::pipeline::types::{AudioFrame, PartialGuess, Utterance};
use std::sync::{Arc, Mutex};

/// What the recognizer reported for one fed frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome {
    /// An utterance boundary was reached; the utterance is complete.
    Finalized(Utterance),
    /// More audio is needed; a partial guess is available via `partial()`.
    InProgress,
}

/// A live streaming recognition session.
///
/// Binds a language model and a sample rate. Stateful: partial acoustic
/// evidence accumulates across successive `feed` calls, so frames must be
/// fed in exactly capture order. Exactly one session is live per pipeline
/// run; it is owned by the recognition driver for its entire lifetime.
///
/// This trait allows swapping implementations (real engine vs mock).
pub trait RecognitionSession: Send {
    /// Feed one frame of audio.
    ///
    /// # Returns
    /// `Finalized` with the completed utterance when the engine judged an
    /// utterance boundary reached, `InProgress` otherwise.
    fn feed(&mut self, frame: &AudioFrame) -> Result<FeedOutcome>;

    /// Current best-effort guess for the utterance in progress.
    ///
    /// Each call supersedes the previous guess.
    fn partial(&mut self) -> Result<PartialGuess>;
}

/// Scripted step for [`MockSession`].
#[derive(Debug, Clone)]
enum MockStep {
    Outcome(FeedOutcome),
    Fault(String),
}

/// Mock recognition session for testing.
///
/// Plays back a script of outcomes, one per fed frame; after the script is
/// exhausted every feed reports `InProgress`. Records the sequence numbers
/// of fed frames so tests can assert FIFO delivery.
#[derive(Clone, Default)]
pub struct MockSession {
    script: Vec<MockStep>,
    position: usize,
    partial_text: String,
    fed_sequences: Arc<Mutex<Vec<u64>>>,
}

impl MockSession {
    /// Create a new mock session with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an `InProgress` step to the script.
    pub fn then_in_progress(mut self) -> Self {
        self.script.push(MockStep::Outcome(FeedOutcome::InProgress));
        self
    }

    /// Append a `Finalized` step with the given text to the script.
    pub fn then_finalized(mut self, text: &str) -> Self {
        self.script.push(MockStep::Outcome(FeedOutcome::Finalized(
            Utterance::new(text),
        )));
        self
    }

    /// Append a fault step to the script.
    pub fn then_fault(mut self, message: &str) -> Self {
        self.script.push(MockStep::Fault(message.to_string()));
        self
    }

    /// Configure the partial text returned while in progress.
    pub fn with_partial(mut self, text: &str) -> Self {
        self.partial_text = text.to_string();
        self
    }

    /// Shared record of fed frame sequence numbers.
    ///
    /// Clone before moving the session into the pipeline.
    pub fn fed_sequences(&self) -> Arc<Mutex<Vec<u64>>> {
        Arc::clone(&self.fed_sequences)
    }
}

impl RecognitionSession for MockSession {
    fn feed(&mut self, frame: &AudioFrame) -> Result<FeedOutcome> {
        if let Ok(mut fed) = self.fed_sequences.lock() {
            fed.push(frame.sequence);
        }

        let step = self.script.get(self.position).cloned();
        self.position += 1;

        match step {
            Some(MockStep::Outcome(outcome)) => Ok(outcome),
            Some(MockStep::Fault(message)) => Err(VoxnoteError::Recognition { message }),
            None => Ok(FeedOutcome::InProgress),
        }
    }

    fn partial(&mut self) -> Result<PartialGuess> {
        Ok(PartialGuess::new(self.partial_text.clone()))
    }
}
