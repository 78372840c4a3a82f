//! The real-time transcription pipeline.
//!
//! Frames flow source → channel → driver; the driver splits results into
//! the live status sink (partials) and the result log (finalized text).

pub mod channel;
pub mod driver;
pub mod orchestrator;
pub mod sink;
pub mod types;
