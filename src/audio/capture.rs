//! Real audio capture using CPAL (Cross-Platform Audio Library).

use crate::audio::device::{DeviceSelector, default_input_device};
use crate::audio::source::FrameSource;
use crate::defaults;
use crate::error::{Result, VoxnoteError};
use crate::pipeline::channel::FrameSender;
use crate::pipeline::types::AudioFrame;
use crate::sys::with_suppressed_stderr;
use cpal::traits::{DeviceTrait, StreamTrait};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Wrapper for cpal::Stream to make it Send.
///
/// SAFETY: The stream is owned exclusively by CpalFrameSource and only
/// touched from one thread at a time (start builds it, stop drops it).
/// Stream methods are called synchronously and don't cross thread
/// boundaries unsafely.
struct SendableStream(cpal::Stream);

unsafe impl Send for SendableStream {}

/// Microphone frame source.
///
/// Owns the hardware stream exclusively. Every delivered block is wrapped
/// as an [`AudioFrame`] and pushed into the frame channel from the audio
/// callback — non-blocking, so a full channel drops the newest frame
/// instead of stalling the real-time thread.
///
/// Prefers i16 input at the resolved sample rate with a fixed block size;
/// falls back to the backend's default block size, then to f32 with sample
/// conversion, for devices that reject the preferred format.
pub struct CpalFrameSource {
    device: cpal::Device,
    stream: Option<SendableStream>,
    sample_rate: u32,
    block_size: u32,
    sequence: Arc<AtomicU64>,
}

impl CpalFrameSource {
    /// Open the selected input device and resolve the sample rate.
    ///
    /// # Arguments
    /// * `selector` - Device selector; None uses the system default device.
    /// * `sample_rate` - Sampling rate in Hz; None uses the device default.
    /// * `block_size` - Requested samples per delivered block.
    ///
    /// # Errors
    /// `DeviceNotFound` when the selector matches nothing; `StreamOpen`
    /// when the sample rate is invalid or the device config is unreadable.
    /// No stream is opened yet — that happens in `start`.
    pub fn open(
        selector: Option<&DeviceSelector>,
        sample_rate: Option<u32>,
        block_size: u32,
    ) -> Result<Self> {
        let device = match selector {
            Some(selector) => selector.resolve()?,
            None => default_input_device()?,
        };

        let sample_rate = match sample_rate {
            Some(0) => {
                return Err(VoxnoteError::StreamOpen {
                    message: "sample rate must be a positive integer".to_string(),
                });
            }
            Some(rate) => rate,
            None => {
                let config = with_suppressed_stderr(|| device.default_input_config()).map_err(
                    |e| VoxnoteError::StreamOpen {
                        message: format!("Failed to query default input config: {}", e),
                    },
                )?;
                config.sample_rate()
            }
        };

        Ok(Self {
            device,
            stream: None,
            sample_rate,
            block_size,
            sequence: Arc::new(AtomicU64::new(0)),
        })
    }

    /// The sample rate the stream will capture at.
    ///
    /// Resolved at open time; the recognition session must be bound to the
    /// same rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Name of the resolved device, for status output.
    pub fn device_name(&self) -> Option<String> {
        self.device.name().ok()
    }

    /// Build the input stream, trying formats in preference order.
    ///
    /// 1. i16 / fixed block — preferred, frames arrive at the nominal size
    /// 2. i16 / backend-default block
    /// 3. f32 / fixed block — for devices that only expose float formats
    /// 4. f32 / backend-default block
    fn build_stream(&self, tx: FrameSender) -> Result<cpal::Stream> {
        let fixed_config = cpal::StreamConfig {
            channels: defaults::CHANNELS,
            sample_rate: self.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(self.block_size),
        };
        let default_config = cpal::StreamConfig {
            buffer_size: cpal::BufferSize::Default,
            ..fixed_config
        };

        let mut last_error = None;
        for config in [&fixed_config, &default_config] {
            let sender = tx.clone();
            let sequence = Arc::clone(&self.sequence);
            match self.device.build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let frame =
                        AudioFrame::new(sequence.fetch_add(1, Ordering::Relaxed), data.to_vec());
                    // Overflow drops are counted inside the channel.
                    let _ = sender.push(frame);
                },
                |err| {
                    eprintln!("voxnote: audio stream error: {}", err);
                },
                None,
            ) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }

        for config in [&fixed_config, &default_config] {
            let sender = tx.clone();
            let sequence = Arc::clone(&self.sequence);
            match self.device.build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let samples: Vec<i16> = data
                        .iter()
                        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                        .collect();
                    let frame =
                        AudioFrame::new(sequence.fetch_add(1, Ordering::Relaxed), samples);
                    let _ = sender.push(frame);
                },
                |err| {
                    eprintln!("voxnote: audio stream error: {}", err);
                },
                None,
            ) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_error = Some(e),
            }
        }

        Err(VoxnoteError::StreamOpen {
            message: match last_error {
                Some(e) => format!(
                    "device rejected i16 and f32 mono input at {} Hz: {}",
                    self.sample_rate, e
                ),
                None => format!(
                    "device rejected i16 and f32 mono input at {} Hz",
                    self.sample_rate
                ),
            },
        })
    }
}

impl FrameSource for CpalFrameSource {
    fn start(&mut self, tx: FrameSender) -> Result<()> {
        if self.stream.is_some() {
            return Ok(()); // Already started
        }

        let stream = with_suppressed_stderr(|| self.build_stream(tx))?;
        stream.play().map_err(|e| VoxnoteError::StreamOpen {
            message: format!("Failed to start audio stream: {}", e),
        })?;

        self.stream = Some(SendableStream(stream));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        // Dropping the stream stops the callbacks and releases the device;
        // the callback's sender goes with it, closing the frame channel.
        self.stream.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::channel::frame_channel;

    #[test]
    fn test_open_rejects_zero_sample_rate() {
        // Device resolution happens first, so this needs hardware to get as
        // far as rate validation; accept either failure.
        let result = CpalFrameSource::open(None, Some(0), defaults::BLOCK_SIZE);
        assert!(result.is_err());
    }

    #[test]
    #[ignore] // Requires audio hardware
    fn test_open_with_default_device() {
        let source = CpalFrameSource::open(None, None, defaults::BLOCK_SIZE);
        assert!(source.is_ok(), "Failed to open default audio device");
        let source = source.unwrap();
        assert!(source.sample_rate() > 0);
    }

    #[test]
    #[ignore] // Requires audio hardware
    fn test_start_stop_multiple_times() {
        let mut source =
            CpalFrameSource::open(None, None, defaults::BLOCK_SIZE).expect("open failed");

        for _ in 0..3 {
            let (tx, rx) = frame_channel(defaults::CHANNEL_CAPACITY);
            assert!(source.start(tx).is_ok());
            std::thread::sleep(std::time::Duration::from_millis(50));
            assert!(source.stop().is_ok());
            // Stopping closed the channel
            while rx.recv().is_some() {}
        }
    }

    #[test]
    #[ignore] // Requires audio hardware
    fn test_stop_is_idempotent_without_start() {
        let mut source =
            CpalFrameSource::open(None, None, defaults::BLOCK_SIZE).expect("open failed");
        assert!(source.stop().is_ok());
        assert!(source.stop().is_ok());
    }

    #[test]
    #[ignore] // Requires audio hardware
    fn test_captured_frames_have_increasing_sequences() {
        let mut source =
            CpalFrameSource::open(None, None, 1600).expect("open failed");

        let (tx, rx) = frame_channel(defaults::CHANNEL_CAPACITY);
        source.start(tx).expect("start failed");
        std::thread::sleep(std::time::Duration::from_millis(500));
        source.stop().expect("stop failed");

        let mut sequences = Vec::new();
        while let Some(frame) = rx.recv() {
            sequences.push(frame.sequence);
        }
        assert!(!sequences.is_empty(), "no frames captured");
        for pair in sequences.windows(2) {
            assert!(pair[0] < pair[1], "sequences must increase: {:?}", sequences);
        }
    }
}
