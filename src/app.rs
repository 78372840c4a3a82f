//! Transcription application entry point.
//!
//! Orchestrates the complete flow: capture → recognize → flush to disk.

use crate::audio::capture::CpalFrameSource;
use crate::audio::device::DeviceSelector;
use crate::audio::source::FrameSource;
use crate::audio::wav::WavFrameSource;
use crate::config::{Config, OutputFormat};
use crate::error::{Result, VoxnoteError};
use crate::output::clear_line;
use crate::pipeline::orchestrator::{Pipeline, PipelineConfig};
use crate::pipeline::sink::{ConsoleStatus, NullStatus, StatusSink};
use crate::shutdown::{FlushSummary, ShutdownCoordinator};
use crate::stt::engine::RecognitionSession;
use crate::stt::vosk::VoskEngine;
use crate::sys::suppress_audio_warnings;
use std::path::PathBuf;

/// Run the record command: capture from the microphone until interrupted,
/// then flush finalized transcriptions to the output file.
///
/// # Arguments
/// * `config` - Base configuration (overridden by the CLI args below)
/// * `device` - Optional device override (numeric index or name substring)
/// * `model` - Optional model identifier override
/// * `sample_rate` - Optional sampling rate override
/// * `output` - Optional transcript path override
/// * `format` - Optional transcript format override
/// * `quiet` - Suppress live status output
/// * `verbosity` - Verbosity level (0=default, 1=device+summary, 2=full)
#[allow(clippy::too_many_arguments)]
pub async fn run_record_command(
    mut config: Config,
    device: Option<String>,
    model: Option<String>,
    sample_rate: Option<u32>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    quiet: bool,
    verbosity: u8,
) -> Result<()> {
    // Suppress noisy JACK/ALSA warnings before audio init
    suppress_audio_warnings();

    // Apply CLI overrides
    if let Some(d) = device {
        config.audio.device = Some(d);
    }
    if let Some(m) = model {
        config.stt.model = m;
    }
    if let Some(r) = sample_rate {
        config.audio.sample_rate = Some(r);
    }
    apply_output_overrides(&mut config, output, format);

    // Resolve the device and sample rate before touching the model, so a
    // bad selector fails fast and nothing is written anywhere.
    let selector = config.audio.device.as_deref().map(DeviceSelector::parse);
    let source = CpalFrameSource::open(
        selector.as_ref(),
        config.audio.sample_rate,
        config.audio.block_size,
    )?;
    let sample_rate = source.sample_rate();

    if !quiet
        && verbosity >= 1
        && let Some(name) = source.device_name()
    {
        eprintln!("Capturing from '{}' at {} Hz", name, sample_rate);
    }

    if !quiet {
        eprintln!("Loading model '{}'...", config.stt.model);
    }
    let session = VoskEngine::open(&config.stt.model, sample_rate)?;
    if !quiet {
        eprintln!("Ready. Listening... (Ctrl+C to stop)");
    }

    run_pipeline(config, Box::new(source), Box::new(session), quiet, verbosity).await
}

/// Run pipe mode: read a WAV stream from stdin instead of the microphone.
///
/// The recognizer is bound to the WAV's native sample rate. End of input
/// flushes and exits like an interruption would.
pub async fn run_pipe_command(
    mut config: Config,
    model: Option<String>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    quiet: bool,
    verbosity: u8,
) -> Result<()> {
    if let Some(m) = model {
        config.stt.model = m;
    }
    apply_output_overrides(&mut config, output, format);

    let source = WavFrameSource::from_stdin(config.audio.block_size)?;
    let sample_rate = source.sample_rate();

    if !quiet {
        eprintln!("Loading model '{}'...", config.stt.model);
    }
    let session = VoskEngine::open(&config.stt.model, sample_rate)?;
    if !quiet && verbosity >= 1 {
        eprintln!(
            "Transcribing {} sample(s) at {} Hz from stdin",
            source.sample_count(),
            sample_rate
        );
    }

    run_pipeline(config, Box::new(source), Box::new(session), quiet, verbosity).await
}

fn apply_output_overrides(
    config: &mut Config,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
) {
    if let Some(o) = output {
        config.output.file = o;
    }
    if let Some(f) = format {
        config.output.format = f;
    }
}

/// Start the pipeline and run it until Ctrl+C or the driver finishes on its
/// own (end of stream, recognizer fault), then shut down and flush.
async fn run_pipeline(
    config: Config,
    source: Box<dyn FrameSource>,
    session: Box<dyn RecognitionSession>,
    quiet: bool,
    verbosity: u8,
) -> Result<()> {
    let status: Box<dyn StatusSink> = if quiet {
        Box::new(NullStatus)
    } else {
        Box::new(ConsoleStatus::new(verbosity))
    };

    let pipeline = Pipeline::new(PipelineConfig {
        channel_capacity: config.audio.channel_capacity,
    });
    let handle = pipeline.start(source, session, status)?;
    let done = handle.done_signal();

    let coordinator = ShutdownCoordinator::new(
        handle,
        config.output.file.clone(),
        config.output.format,
    );

    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.map_err(|e| VoxnoteError::Other(format!("Failed to wait for Ctrl+C: {}", e)))?;
            if !quiet {
                clear_line();
                eprintln!("Shutting down...");
            }
        }
        // done disconnects when the driver exits; recv never yields a value.
        _ = tokio::task::spawn_blocking(move || { let _ = done.recv(); }) => {
            if !quiet {
                clear_line();
            }
        }
    }

    let summary = coordinator.shutdown()?;
    coordinator.terminate();

    let Some(summary) = summary else {
        return Ok(());
    };
    report_summary(&summary, quiet, verbosity);

    match summary.fault {
        Some(fault) => Err(fault),
        None => Ok(()),
    }
}

fn report_summary(summary: &FlushSummary, quiet: bool, verbosity: u8) {
    if summary.frames_dropped > 0 {
        eprintln!(
            "voxnote: dropped {} audio frame(s) — the recognizer fell behind; raise channel_capacity or use a smaller model",
            summary.frames_dropped
        );
    }
    if !quiet {
        eprintln!(
            "Wrote {} utterance(s) to {}",
            summary.utterances,
            summary.path.display()
        );
        if verbosity >= 1 {
            eprintln!("  {} frame(s) fed to the recognizer", summary.frames_fed);
        }
    }
}
