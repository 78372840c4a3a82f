//! Speech-to-text: the recognition session seam and its vosk backend.

pub mod engine;
#[cfg(feature = "vosk-stt")]
pub mod vosk;
