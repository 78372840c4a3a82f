//! Default configuration constants for voxnote.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Default audio block size in samples.
///
/// One block becomes one frame on the handoff channel. 8000 samples is half a
/// second at 16kHz — large enough to keep per-frame overhead negligible,
/// small enough for responsive partial results.
pub const BLOCK_SIZE: u32 = 8000;

/// Default frame channel capacity in blocks.
///
/// Bounds memory when the recognizer falls behind the microphone. At the
/// default block size this is roughly half a minute of buffered audio; when
/// the channel is full the newest frame is dropped and counted.
pub const CHANNEL_CAPACITY: usize = 64;

/// Number of capture channels. Speech recognition input is always mono.
pub const CHANNELS: u16 = 1;

/// Default language model identifier.
///
/// Resolved against the models directory; `en-us` matches any installed
/// model directory containing that substring (e.g.
/// `vosk-model-small-en-us-0.15`).
pub const DEFAULT_MODEL: &str = "en-us";

/// Default transcript output path, overwritten on each run.
pub const DEFAULT_OUTPUT: &str = "./recognized_text.txt";
