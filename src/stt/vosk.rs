//! Vosk-backed streaming recognition session.

use crate::error::{Result, VoxnoteError};
use crate::models::resolve_model_dir;
use crate::pipeline::types::{AudioFrame, PartialGuess, Utterance};
use crate::stt::engine::{FeedOutcome, RecognitionSession};
use crate::sys::with_suppressed_stderr;
use vosk::{CompleteResult, DecodingState, Model, Recognizer};

/// Factory for vosk recognition sessions.
pub struct VoskEngine;

impl VoskEngine {
    /// Open a session for the given model identifier and sample rate.
    ///
    /// The identifier is resolved against the models directory (see
    /// `models::resolve_model_dir`); an existing directory path is used
    /// as-is.
    ///
    /// # Errors
    /// `ModelLoad` when the identifier does not resolve or the model data
    /// cannot be loaded; `StreamOpen` when the sample rate is rejected.
    pub fn open(model_id: &str, sample_rate: u32) -> Result<VoskSession> {
        let model_dir = resolve_model_dir(model_id)?;

        // Model loading prints a Kaldi banner to stderr; hide it.
        let model = with_suppressed_stderr(|| Model::new(model_dir.to_string_lossy())).ok_or_else(
            || VoxnoteError::ModelLoad {
                model: model_id.to_string(),
                message: format!("could not read model data at {}", model_dir.display()),
            },
        )?;

        let mut recognizer =
            Recognizer::new(&model, sample_rate as f32).ok_or_else(|| VoxnoteError::ModelLoad {
                model: model_id.to_string(),
                message: format!("recognizer rejected sample rate {} Hz", sample_rate),
            })?;
        recognizer.set_words(true);

        Ok(VoskSession { recognizer })
    }
}

/// One live vosk session: a recognizer bound to a model and sample rate.
pub struct VoskSession {
    recognizer: Recognizer,
}

impl RecognitionSession for VoskSession {
    fn feed(&mut self, frame: &AudioFrame) -> Result<FeedOutcome> {
        let state = self
            .recognizer
            .accept_waveform(&frame.samples)
            .map_err(|e| VoxnoteError::Recognition {
                message: format!("recognizer rejected waveform: {}", e),
            })?;

        match state {
            DecodingState::Finalized => Ok(FeedOutcome::Finalized(take_result(
                self.recognizer.result(),
            ))),
            DecodingState::Running => Ok(FeedOutcome::InProgress),
            DecodingState::Failed => Err(VoxnoteError::Recognition {
                message: "recognizer entered failed state".to_string(),
            }),
        }
    }

    fn partial(&mut self) -> Result<PartialGuess> {
        Ok(PartialGuess::new(self.recognizer.partial_result().partial))
    }
}

/// Convert a complete recognizer result into an [`Utterance`].
fn take_result(result: CompleteResult<'_>) -> Utterance {
    match result {
        CompleteResult::Single(single) => {
            let confidence = average_confidence(single.result.iter().map(|w| w.conf));
            Utterance {
                text: single.text.to_string(),
                confidence,
            }
        }
        // Only produced with max_alternatives > 0, which we never request;
        // handled anyway by taking the most likely alternative.
        CompleteResult::Multiple(multiple) => match multiple.alternatives.first() {
            Some(best) => Utterance::with_confidence(best.text, best.confidence),
            None => Utterance::new(""),
        },
    }
}

fn average_confidence(confs: impl Iterator<Item = f32>) -> Option<f32> {
    let mut sum = 0.0f32;
    let mut count = 0u32;
    for conf in confs {
        sum += conf;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_confidence_empty_is_none() {
        assert_eq!(average_confidence(std::iter::empty()), None);
    }

    #[test]
    fn test_average_confidence_mean() {
        let avg = average_confidence([0.8f32, 1.0, 0.6].into_iter()).unwrap();
        assert!((avg - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_open_unknown_model_fails_with_model_load() {
        let result = VoskEngine::open("model-that-does-not-exist-xyz", 16000);
        match result {
            Err(VoxnoteError::ModelLoad { model, .. }) => {
                assert_eq!(model, "model-that-does-not-exist-xyz");
            }
            _ => panic!("Expected ModelLoad error"),
        }
    }

    #[test]
    #[ignore] // Requires an installed vosk model
    fn test_open_real_model_and_feed_silence() {
        let mut session = VoskEngine::open("en-us", 16000).expect("model should load");

        let frame = AudioFrame::new(0, vec![0i16; 8000]);
        let outcome = session.feed(&frame).expect("silence should feed cleanly");

        match outcome {
            FeedOutcome::InProgress => {
                let partial = session.partial().expect("partial should be available");
                assert!(partial.text.is_empty(), "silence should have no partial");
            }
            FeedOutcome::Finalized(utterance) => {
                assert!(utterance.text.is_empty(), "silence should have no text");
            }
        }
    }
}
