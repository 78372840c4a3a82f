//! Shutdown coordination: stop capture, drain the driver, flush to disk.

use crate::config::OutputFormat;
use crate::error::{Result, VoxnoteError};
use crate::pipeline::orchestrator::PipelineHandle;
use crate::transcript::write_transcript;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};

const RUNNING: u8 = 0;
const STOPPING: u8 = 1;
const FLUSHED: u8 = 2;
const TERMINATED: u8 = 3;

/// Where the coordinator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    Stopping,
    Flushed,
    Terminated,
}

/// What the one effective shutdown produced.
#[derive(Debug)]
pub struct FlushSummary {
    /// Utterances written to the transcript file.
    pub utterances: usize,
    /// Frames the driver fed to the recognizer.
    pub frames_fed: u64,
    /// Frames dropped because the recognizer fell behind.
    pub frames_dropped: u64,
    /// The fault that stopped the driver early, if any. The flush still
    /// happened — everything finalized before the fault is on disk.
    pub fault: Option<VoxnoteError>,
    /// Where the transcript was written.
    pub path: PathBuf,
}

/// Reacts to the interruption signal exactly once.
///
/// State machine: `Running → Stopping → Flushed → Terminated`. The first
/// `shutdown` call stops the frame source (closing the channel and
/// unblocking the driver), joins the driver, and writes the result log to
/// the output path. Repeated calls observe the terminal state and do
/// nothing — the file is written exactly once per run.
pub struct ShutdownCoordinator {
    state: AtomicU8,
    inner: Mutex<Option<Inner>>,
}

struct Inner {
    handle: PipelineHandle,
    path: PathBuf,
    format: OutputFormat,
}

impl ShutdownCoordinator {
    pub fn new(handle: PipelineHandle, path: PathBuf, format: OutputFormat) -> Self {
        Self {
            state: AtomicU8::new(RUNNING),
            inner: Mutex::new(Some(Inner {
                handle,
                path,
                format,
            })),
        }
    }

    pub fn state(&self) -> ShutdownState {
        match self.state.load(Ordering::SeqCst) {
            STOPPING => ShutdownState::Stopping,
            FLUSHED => ShutdownState::Flushed,
            TERMINATED => ShutdownState::Terminated,
            _ => ShutdownState::Running,
        }
    }

    /// Stop the pipeline and flush the result log.
    ///
    /// The first caller wins the `Running → Stopping` transition and does
    /// the work; every later call returns `Ok(None)` without re-stopping or
    /// re-flushing. An empty log still produces an (empty) output file.
    ///
    /// # Errors
    /// `FlushWrite` when the transcript cannot be written; the run is over
    /// either way and the state does not return to `Running`.
    pub fn shutdown(&self) -> Result<Option<FlushSummary>> {
        if self
            .state
            .compare_exchange(RUNNING, STOPPING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(None);
        }

        let inner = match self.inner.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => {
                return Err(VoxnoteError::Other(
                    "shutdown state lock poisoned".to_string(),
                ));
            }
        };
        let Some(inner) = inner else {
            return Ok(None);
        };

        // stop() joins the driver thread — the log handed back is fully
        // written before we touch it.
        let report = inner.handle.stop();

        write_transcript(&inner.path, &report.log, inner.format)?;
        self.state.store(FLUSHED, Ordering::SeqCst);

        Ok(Some(FlushSummary {
            utterances: report.log.len(),
            frames_fed: report.frames_fed,
            frames_dropped: report.frames_dropped,
            fault: report.fault,
            path: inner.path,
        }))
    }

    /// Mark the run terminated; the process exits after this.
    pub fn terminate(&self) {
        self.state.store(TERMINATED, Ordering::SeqCst);
    }
}
