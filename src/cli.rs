//! Command-line interface for voxnote
//!
//! Provides argument parsing using clap derive macros.

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::str::FromStr;

/// Live microphone transcription to a file
#[derive(Parser, Debug)]
#[command(
    name = "voxnote",
    version,
    about = "Live microphone transcription to a file"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress live status output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: device + summary, -vv: confidence + drop details)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Input device (numeric index or name substring)
    #[arg(short, long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Sampling rate in Hz (default: the device's reported rate)
    #[arg(short = 'r', long, value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Language model; e.g. en-us, fr, nl, or a model directory path
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// File to write finalized transcriptions to
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Transcript format: text (one line per utterance) or json
    #[arg(long, value_name = "FORMAT", value_parser = parse_format)]
    pub format: Option<OutputFormat>,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_str(s)
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available audio input devices
    Devices,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
