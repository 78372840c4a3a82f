//! voxnote - Live microphone transcription to a file
//!
//! Streams microphone audio through a speech recognizer in real time:
//! partial guesses go to the console as you speak, finalized utterances are
//! written to a transcript file on shutdown.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod shutdown;
pub mod stt;
pub mod sys;
pub mod transcript;

// Composition root - needs everything
#[cfg(all(feature = "cpal-audio", feature = "vosk-stt", feature = "cli"))]
pub mod app;

// Core traits (source → channel → driver → sinks)
pub use audio::source::{FrameSource, MockFrameSource};
pub use pipeline::sink::{CollectorStatus, ConsoleStatus, NullStatus, StatusSink};
pub use stt::engine::{FeedOutcome, MockSession, RecognitionSession};

// Pipeline
pub use pipeline::channel::{FrameReceiver, FrameSender, PushOutcome, frame_channel};
pub use pipeline::orchestrator::{Pipeline, PipelineConfig, PipelineHandle, PipelineReport};
pub use pipeline::types::{AudioFrame, PartialGuess, Utterance};

// Shutdown & persistence
pub use shutdown::{FlushSummary, ShutdownCoordinator, ShutdownState};
pub use transcript::{ResultLog, write_transcript};

// Error handling
pub use error::{Result, VoxnoteError};

// Config
pub use config::{Config, OutputFormat};

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
