//! Bounded handoff channel between the audio callback and the recognizer.
//!
//! A single-producer/single-consumer FIFO of [`AudioFrame`]. The producer
//! side never blocks: when the channel is full the newest frame is dropped
//! and counted, trading transcription completeness for bounded memory. The
//! consumer side blocks until a frame arrives or every sender is gone.

use crate::pipeline::types::AudioFrame;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Result of a non-blocking push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Frame was enqueued.
    Delivered,
    /// Channel was full; the pushed frame was dropped and counted.
    DroppedNewest,
    /// Receiver is gone; the frame was discarded.
    Closed,
}

/// Creates a bounded frame channel with the given capacity in frames.
pub fn frame_channel(capacity: usize) -> (FrameSender, FrameReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    let dropped = Arc::new(AtomicU64::new(0));
    (
        FrameSender {
            tx,
            dropped: Arc::clone(&dropped),
        },
        FrameReceiver { rx, dropped },
    )
}

/// Producer half of the frame channel.
///
/// Clonable so the capture backend can retry stream construction with a
/// fresh callback; exactly one clone survives in the live stream. Dropping
/// the last sender closes the channel.
#[derive(Clone)]
pub struct FrameSender {
    tx: Sender<AudioFrame>,
    dropped: Arc<AtomicU64>,
}

impl FrameSender {
    /// Non-blocking push for the real-time delivery context.
    ///
    /// O(1); never waits. A full channel drops the given frame (the newest)
    /// and increments the shared drop counter.
    pub fn push(&self, frame: AudioFrame) -> PushOutcome {
        match self.tx.try_send(frame) {
            Ok(()) => PushOutcome::Delivered,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                PushOutcome::DroppedNewest
            }
            Err(TrySendError::Disconnected(_)) => PushOutcome::Closed,
        }
    }

    /// Blocking send for paced producers (file/pipe sources, tests).
    ///
    /// Waits for space instead of dropping. Returns false once the receiver
    /// is gone. Never call this from the audio callback.
    pub fn send(&self, frame: AudioFrame) -> bool {
        self.tx.send(frame).is_ok()
    }

    /// Total frames dropped on this channel so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Shared drop counter, for reporting after the sender has moved away.
    pub fn drop_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.dropped)
    }
}

/// Consumer half of the frame channel.
pub struct FrameReceiver {
    rx: Receiver<AudioFrame>,
    dropped: Arc<AtomicU64>,
}

impl FrameReceiver {
    /// Blocks until a frame is available.
    ///
    /// Returns `None` once the channel is empty and every sender has been
    /// dropped (end of stream).
    pub fn recv(&self) -> Option<AudioFrame> {
        self.rx.recv().ok()
    }

    /// Number of frames currently buffered.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Total frames dropped on this channel so far.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
