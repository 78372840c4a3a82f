//! Types that flow through the transcription pipeline.

use serde::Serialize;

/// One block of raw audio handed from the capture callback to the driver.
///
/// Samples are single-channel 16-bit signed PCM at the stream's sample rate.
/// A frame has exactly one owner at any time: it moves from the frame source
/// into the channel and from the channel into the recognition driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFrame {
    /// Sequence number for ordering frames.
    pub sequence: u64,
    /// Audio samples as 16-bit PCM.
    pub samples: Vec<i16>,
}

impl AudioFrame {
    /// Creates a new audio frame.
    pub fn new(sequence: u64, samples: Vec<i16>) -> Self {
        Self { sequence, samples }
    }

    /// Returns the duration of this frame in milliseconds.
    pub fn duration_ms(&self, sample_rate: u32) -> u32 {
        (self.samples.len() as u32 * 1000) / sample_rate
    }
}

/// A finalized recognition result.
///
/// Produced when the recognizer judges an utterance boundary reached.
/// Immutable once created; appended to the result log in arrival order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    /// Recognized text.
    pub text: String,
    /// Average word confidence reported by the engine, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Utterance {
    /// Creates an utterance with no confidence metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    /// Creates an utterance with engine-supplied confidence.
    pub fn with_confidence(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence: Some(confidence),
        }
    }
}

/// A transient best-effort transcription of in-progress audio.
///
/// Each partial supersedes the previous one; partials are surfaced for live
/// feedback only and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialGuess {
    pub text: String,
}

impl PartialGuess {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_frame_creation() {
        let samples = vec![100i16, 200, 300];
        let frame = AudioFrame::new(42, samples.clone());

        assert_eq!(frame.sequence, 42);
        assert_eq!(frame.samples, samples);
    }

    #[test]
    fn test_audio_frame_duration() {
        let samples = vec![0i16; 16000]; // 1 second at 16kHz
        let frame = AudioFrame::new(0, samples);

        assert_eq!(frame.duration_ms(16000), 1000);
    }

    #[test]
    fn test_utterance_serializes_without_confidence() {
        let utterance = Utterance::new("hello world");
        let json = serde_json::to_string(&utterance).unwrap();
        assert_eq!(json, r#"{"text":"hello world"}"#);
    }

    #[test]
    fn test_utterance_serializes_with_confidence() {
        let utterance = Utterance::with_confidence("hello", 0.5);
        let json = serde_json::to_string(&utterance).unwrap();
        assert_eq!(json, r#"{"text":"hello","confidence":0.5}"#);
    }

    #[test]
    fn test_partial_guess_supersession_is_by_value() {
        let first = PartialGuess::new("the quick");
        let second = PartialGuess::new("the quick brown");
        assert_ne!(first, second);
    }
}
