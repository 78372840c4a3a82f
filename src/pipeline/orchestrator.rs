//! Pipeline assembly: frame source → frame channel → recognition driver.

use crate::audio::source::FrameSource;
use crate::defaults;
use crate::error::{Result, VoxnoteError};
use crate::pipeline::channel::frame_channel;
use crate::pipeline::driver::{DriverReport, RecognitionDriver};
use crate::pipeline::sink::StatusSink;
use crate::stt::engine::RecognitionSession;
use crate::transcript::ResultLog;
use crossbeam_channel::{Receiver, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

/// Configuration for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Frame channel capacity in blocks.
    pub channel_capacity: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: defaults::CHANNEL_CAPACITY,
        }
    }
}

/// What a completed pipeline run produced.
#[derive(Debug)]
pub struct PipelineReport {
    /// Finalized utterances in arrival order.
    pub log: ResultLog,
    /// Frames the driver fed to the session.
    pub frames_fed: u64,
    /// Frames dropped at the channel because the recognizer fell behind.
    pub frames_dropped: u64,
    /// The fault that stopped the driver early, if any.
    pub fault: Option<VoxnoteError>,
}

/// Handle to a running pipeline.
pub struct PipelineHandle {
    source: Box<dyn FrameSource>,
    driver: Option<JoinHandle<()>>,
    report_rx: Receiver<DriverReport>,
    done_rx: Receiver<()>,
    dropped: Arc<AtomicU64>,
}

impl PipelineHandle {
    /// Stops the pipeline and returns everything it produced.
    ///
    /// Stops the frame source first (releasing the device and closing the
    /// channel), lets the driver drain the frames already buffered, then
    /// joins it. Safe to call after the driver has already exited on its
    /// own (end of stream or fault).
    pub fn stop(mut self) -> PipelineReport {
        if let Err(e) = self.source.stop() {
            eprintln!("voxnote: failed to stop audio capture: {e}");
        }

        // The driver sends its report as its last act; recv also serves as
        // the happens-before edge for taking over the result log.
        let report = self.report_rx.recv().ok();

        if let Some(handle) = self.driver.take()
            && handle.join().is_err()
        {
            eprintln!("voxnote: recognition thread panicked");
        }

        let frames_dropped = self.dropped.load(Ordering::Relaxed);
        match report {
            Some(report) => PipelineReport {
                log: report.log,
                frames_fed: report.frames_fed,
                frames_dropped,
                fault: report.fault,
            },
            None => PipelineReport {
                log: ResultLog::new(),
                frames_fed: 0,
                frames_dropped,
                fault: Some(VoxnoteError::Other(
                    "recognition thread died without a report".to_string(),
                )),
            },
        }
    }

    /// Receiver that disconnects when the driver exits.
    ///
    /// Lets callers wait for an early driver exit (end of stream, fault)
    /// alongside the interruption signal. Receiving on it never yields a
    /// value; it only disconnects.
    pub fn done_signal(&self) -> Receiver<()> {
        self.done_rx.clone()
    }

    /// Frames dropped at the channel so far.
    pub fn frames_dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Transcription pipeline: FrameSource → FrameChannel → RecognitionDriver.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Starts the pipeline.
    ///
    /// # Arguments
    /// * `source` - Frame source (microphone, WAV reader, or mock)
    /// * `session` - Recognition session bound to the stream's sample rate
    /// * `status` - Live status handler for partials and finalized text
    ///
    /// # Returns
    /// Handle to stop the pipeline and collect its report.
    pub fn start(
        self,
        mut source: Box<dyn FrameSource>,
        session: Box<dyn RecognitionSession>,
        status: Box<dyn StatusSink>,
    ) -> Result<PipelineHandle> {
        let (tx, rx) = frame_channel(self.config.channel_capacity);
        let dropped = tx.drop_counter();

        let (report_tx, report_rx) = bounded(1);
        let (done_tx, done_rx) = bounded::<()>(1);

        let driver = RecognitionDriver::new(session, status);
        let driver_thread = thread::spawn(move || {
            let report = driver.run(rx);
            if report_tx.send(report).is_err() {
                eprintln!("voxnote: driver report receiver already dropped");
            }
            // Dropping done_tx disconnects done_rx and wakes waiters.
            drop(done_tx);
        });

        source.start(tx)?;

        Ok(PipelineHandle {
            source,
            driver: Some(driver_thread),
            report_rx,
            done_rx,
            dropped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::source::MockFrameSource;
    use crate::pipeline::sink::CollectorStatus;
    use crate::stt::engine::MockSession;
    use std::time::Duration;

    #[test]
    fn test_config_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.channel_capacity, 64);
    }

    #[test]
    fn test_pipeline_start_source_failure_propagates() {
        let pipeline = Pipeline::new(PipelineConfig::default());

        let source = Box::new(MockFrameSource::new().with_start_failure());
        let session = Box::new(MockSession::new());
        let status = Box::new(CollectorStatus::new());

        let result = pipeline.start(source, session, status);
        match result {
            Err(VoxnoteError::StreamOpen { message }) => {
                assert_eq!(message, "mock source start failure");
            }
            _ => panic!("Expected StreamOpen error"),
        }
    }

    #[test]
    fn test_pipeline_full_run_with_finite_source() {
        let pipeline = Pipeline::new(PipelineConfig::default());

        let source = Box::new(MockFrameSource::new().with_blocks(vec![vec![100i16; 8]; 3]));
        let session = MockSession::new()
            .then_in_progress()
            .then_finalized("hello world")
            .then_in_progress();
        let fed = session.fed_sequences();
        let status = CollectorStatus::new();

        let handle = pipeline
            .start(source, Box::new(session), Box::new(status.clone()))
            .unwrap();

        let report = handle.stop();

        assert_eq!(report.frames_fed, 3);
        assert_eq!(report.frames_dropped, 0);
        assert!(report.fault.is_none());

        let texts: Vec<&str> = report.log.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["hello world"]);
        assert_eq!(status.finals(), vec!["hello world".to_string()]);
        assert_eq!(*fed.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_pipeline_stop_with_held_open_source() {
        let pipeline = Pipeline::new(PipelineConfig::default());

        let source = Box::new(
            MockFrameSource::new()
                .with_blocks(vec![vec![0i16; 8]; 2])
                .hold_open(),
        );
        let session = Box::new(MockSession::new());
        let status = Box::new(CollectorStatus::new());

        let handle = pipeline.start(source, session, status).unwrap();

        // Source stays open until stop(); the driver is blocked on recv.
        let report = handle.stop();
        assert_eq!(report.frames_fed, 2);
        assert!(report.fault.is_none());
    }

    #[test]
    fn test_pipeline_done_signal_disconnects_on_driver_exit() {
        let pipeline = Pipeline::new(PipelineConfig::default());

        let source = Box::new(MockFrameSource::new().with_blocks(vec![vec![0i16; 8]]));
        let session = Box::new(MockSession::new());
        let status = Box::new(CollectorStatus::new());

        let handle = pipeline.start(source, session, status).unwrap();
        let done = handle.done_signal();

        // Finite source → driver exits on its own; done_rx disconnects.
        let err = done
            .recv_timeout(Duration::from_secs(5))
            .expect_err("done signal should disconnect, not yield a value");
        assert_eq!(err, crossbeam_channel::RecvTimeoutError::Disconnected);

        let report = handle.stop();
        assert_eq!(report.frames_fed, 1);
    }

    #[test]
    fn test_pipeline_fault_preserves_progress() {
        let pipeline = Pipeline::new(PipelineConfig::default());

        let source = Box::new(MockFrameSource::new().with_blocks(vec![vec![0i16; 8]; 5]));
        let session = MockSession::new()
            .then_finalized("first")
            .then_finalized("second")
            .then_fault("engine died");

        let handle = pipeline
            .start(
                source,
                Box::new(session),
                Box::new(CollectorStatus::new()),
            )
            .unwrap();

        let report = handle.stop();

        let texts: Vec<&str> = report.log.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(matches!(
            report.fault,
            Some(VoxnoteError::Recognition { .. })
        ));
    }
}
