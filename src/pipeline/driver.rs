//! The recognition driver: the loop converting frames into utterances.

use crate::error::VoxnoteError;
use crate::pipeline::channel::FrameReceiver;
use crate::pipeline::sink::StatusSink;
use crate::stt::engine::{FeedOutcome, RecognitionSession};
use crate::transcript::ResultLog;

/// What the driver produced over its lifetime.
#[derive(Debug)]
pub struct DriverReport {
    /// Finalized utterances in arrival order.
    pub log: ResultLog,
    /// Frames fed to the session before the loop ended.
    pub frames_fed: u64,
    /// The fault that stopped the loop early, if any. The log holds
    /// everything finalized before the fault.
    pub fault: Option<VoxnoteError>,
}

/// Consumes frames from the channel and feeds them to the session.
///
/// Owns the session and the result log for the lifetime of the run. Each
/// `Finalized` outcome is appended to the log in arrival order; each
/// `InProgress` outcome surfaces the current partial through the status
/// sink. The loop ends when the channel closes (end of stream) or the
/// session faults; it never force-finalizes the utterance in progress.
pub struct RecognitionDriver {
    session: Box<dyn RecognitionSession>,
    status: Box<dyn StatusSink>,
}

impl RecognitionDriver {
    pub fn new(session: Box<dyn RecognitionSession>, status: Box<dyn StatusSink>) -> Self {
        Self { session, status }
    }

    /// Run the consumption loop to completion.
    pub fn run(mut self, rx: FrameReceiver) -> DriverReport {
        let mut log = ResultLog::new();
        let mut frames_fed = 0u64;

        while let Some(frame) = rx.recv() {
            frames_fed += 1;

            match self.session.feed(&frame) {
                Ok(FeedOutcome::Finalized(utterance)) => {
                    self.status.finalized(&utterance);
                    log.append(utterance);
                }
                Ok(FeedOutcome::InProgress) => match self.session.partial() {
                    Ok(guess) => self.status.partial(&guess),
                    Err(fault) => {
                        return DriverReport {
                            log,
                            frames_fed,
                            fault: Some(fault),
                        };
                    }
                },
                Err(fault) => {
                    return DriverReport {
                        log,
                        frames_fed,
                        fault: Some(fault),
                    };
                }
            }
        }

        DriverReport {
            log,
            frames_fed,
            fault: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::channel::frame_channel;
    use crate::pipeline::sink::CollectorStatus;
    use crate::pipeline::types::AudioFrame;
    use crate::stt::engine::MockSession;

    fn frame(sequence: u64) -> AudioFrame {
        AudioFrame::new(sequence, vec![100i16; 8])
    }

    #[test]
    fn test_driver_feeds_frames_in_push_order() {
        let (tx, rx) = frame_channel(16);
        let session = MockSession::new();
        let fed = session.fed_sequences();

        for sequence in 0..6 {
            tx.push(frame(sequence));
        }
        drop(tx);

        let driver = RecognitionDriver::new(Box::new(session), Box::new(CollectorStatus::new()));
        let report = driver.run(rx);

        assert_eq!(report.frames_fed, 6);
        assert!(report.fault.is_none());
        assert_eq!(*fed.lock().unwrap(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_finalized_outcomes_append_to_log_in_order() {
        let (tx, rx) = frame_channel(16);
        let session = MockSession::new()
            .then_finalized("one")
            .then_in_progress()
            .then_finalized("two")
            .then_finalized("three");

        for sequence in 0..4 {
            tx.push(frame(sequence));
        }
        drop(tx);

        let driver = RecognitionDriver::new(Box::new(session), Box::new(CollectorStatus::new()));
        let report = driver.run(rx);

        let texts: Vec<&str> = report.log.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_in_progress_outcomes_emit_partials() {
        let (tx, rx) = frame_channel(16);
        let session = MockSession::new()
            .with_partial("the quick")
            .then_in_progress()
            .then_in_progress();

        tx.push(frame(0));
        tx.push(frame(1));
        drop(tx);

        let collector = CollectorStatus::new();
        let driver = RecognitionDriver::new(Box::new(session), Box::new(collector.clone()));
        let report = driver.run(rx);

        assert!(report.log.is_empty());
        assert_eq!(
            collector.partials(),
            vec!["the quick".to_string(), "the quick".to_string()]
        );
    }

    #[test]
    fn test_fault_stops_loop_and_preserves_log() {
        let (tx, rx) = frame_channel(16);
        let session = MockSession::new()
            .then_finalized("kept one")
            .then_finalized("kept two")
            .then_fault("decoder state corrupt");

        // More frames than the loop will consume.
        for sequence in 0..10 {
            tx.push(frame(sequence));
        }
        drop(tx);

        let driver = RecognitionDriver::new(Box::new(session), Box::new(CollectorStatus::new()));
        let report = driver.run(rx);

        let texts: Vec<&str> = report.log.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(texts, vec!["kept one", "kept two"]);
        assert_eq!(report.frames_fed, 3);
        match report.fault {
            Some(VoxnoteError::Recognition { message }) => {
                assert_eq!(message, "decoder state corrupt");
            }
            _ => panic!("Expected Recognition fault"),
        }
    }

    #[test]
    fn test_channel_close_ends_loop_without_forced_finalization() {
        let (tx, rx) = frame_channel(16);
        // Session that never finalizes: in-progress evidence is lost on close.
        let session = MockSession::new().with_partial("half an utter");

        tx.push(frame(0));
        drop(tx);

        let collector = CollectorStatus::new();
        let driver = RecognitionDriver::new(Box::new(session), Box::new(collector.clone()));
        let report = driver.run(rx);

        assert!(report.log.is_empty(), "no forced finalization on close");
        assert!(report.fault.is_none());
        assert_eq!(collector.finals(), Vec::<String>::new());
    }

    #[test]
    fn test_empty_stream_produces_empty_report() {
        let (tx, rx) = frame_channel(4);
        drop(tx);

        let driver = RecognitionDriver::new(
            Box::new(MockSession::new()),
            Box::new(CollectorStatus::new()),
        );
        let report = driver.run(rx);

        assert!(report.log.is_empty());
        assert_eq!(report.frames_fed, 0);
        assert!(report.fault.is_none());
    }
}
