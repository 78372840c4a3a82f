use crate::error::{Result, VoxnoteError};
use crate::pipeline::channel::FrameSender;
use crate::pipeline::types::AudioFrame;

/// Trait for audio frame sources.
///
/// A source owns its input stream exclusively and delivers frames into the
/// channel from its own context (a hardware callback or a feeder thread).
/// This trait allows swapping implementations (real audio device, WAV
/// reader, or mock).
pub trait FrameSource: Send {
    /// Begin delivering frames into `tx`.
    ///
    /// The source keeps delivering until `stop` is called or its input is
    /// exhausted; when the last sender is dropped the channel closes and
    /// the consumer sees end of stream.
    fn start(&mut self, tx: FrameSender) -> Result<()>;

    /// Stop delivering frames and release the input.
    ///
    /// Idempotent; must release all resources on every exit path.
    fn stop(&mut self) -> Result<()>;
}

/// Mock frame source for testing.
#[derive(Default)]
pub struct MockFrameSource {
    blocks: Vec<Vec<i16>>,
    hold_open: bool,
    should_fail_start: bool,
    should_fail_stop: bool,
    started: bool,
    stopped: bool,
    held: Option<FrameSender>,
}

impl MockFrameSource {
    /// Create a new mock frame source with no blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the blocks delivered on start, one frame per block.
    pub fn with_blocks(mut self, blocks: Vec<Vec<i16>>) -> Self {
        self.blocks = blocks;
        self
    }

    /// Keep the channel open after delivering all blocks, until `stop`.
    ///
    /// Without this the sender is dropped at the end of `start`, closing
    /// the channel like an exhausted finite source.
    pub fn hold_open(mut self) -> Self {
        self.hold_open = true;
        self
    }

    /// Configure the mock to fail on start.
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on stop.
    pub fn with_stop_failure(mut self) -> Self {
        self.should_fail_stop = true;
        self
    }

    /// Check if the source was started.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Check if the source was stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl FrameSource for MockFrameSource {
    fn start(&mut self, tx: FrameSender) -> Result<()> {
        if self.should_fail_start {
            return Err(VoxnoteError::StreamOpen {
                message: "mock source start failure".to_string(),
            });
        }
        self.started = true;

        for (sequence, samples) in self.blocks.drain(..).enumerate() {
            if !tx.send(AudioFrame::new(sequence as u64, samples)) {
                break;
            }
        }

        if self.hold_open {
            self.held = Some(tx);
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.should_fail_stop {
            return Err(VoxnoteError::StreamOpen {
                message: "mock source stop failure".to_string(),
            });
        }
        self.stopped = true;
        self.held.take();
        Ok(())
    }
}
