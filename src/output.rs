//! Shared terminal rendering for live transcription output.
//!
//! All live status goes to stderr on a single overwritten line so it never
//! interleaves with other output mid-line; stdout stays clean for scripting.

use std::io::{self, Write};

const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Clear the current terminal line (replaces an in-progress partial).
pub fn clear_line() {
    eprint!("\r\x1b[2K");
}

/// Render an in-progress partial guess, overwriting the previous one.
pub fn render_partial(text: &str) {
    eprint!("\r\x1b[2K{DIM}{text}{RESET}");
    let _ = io::stderr().flush();
}

/// Render a finalized utterance on its own line.
///
/// Clears any partial first so the line never mixes partial and final text.
pub fn render_final(text: &str, confidence: Option<f32>, verbosity: u8) {
    clear_line();
    if verbosity >= 2
        && let Some(conf) = confidence
    {
        eprintln!("{text} [confidence: {conf:.2}]");
    } else {
        eprintln!("{text}");
    }
}
