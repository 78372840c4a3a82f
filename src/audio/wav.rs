//! WAV file frame source for pipe mode.

use crate::audio::source::FrameSource;
use crate::error::{Result, VoxnoteError};
use crate::pipeline::channel::FrameSender;
use crate::pipeline::types::AudioFrame;
use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

/// Frame source that reads from WAV file data.
///
/// Keeps the file's native sample rate (the recognition session is opened
/// with it) and downmixes multi-channel audio to mono. Frames are fed from
/// a background thread with blocking sends — a file is not a real-time
/// producer, so it waits for the recognizer instead of dropping frames.
/// End of file closes the channel.
pub struct WavFrameSource {
    samples: Option<Vec<i16>>,
    sample_rate: u32,
    block_size: usize,
    feeder: Option<JoinHandle<()>>,
    stop_flag: Arc<AtomicBool>,
}

impl WavFrameSource {
    /// Create from any reader (for testing/flexibility).
    pub fn from_reader(reader: Box<dyn Read + Send>, block_size: u32) -> Result<Self> {
        let mut wav_reader =
            hound::WavReader::new(reader).map_err(|e| VoxnoteError::StreamOpen {
                message: format!("Failed to parse WAV data: {}", e),
            })?;

        let spec = wav_reader.spec();
        let channels = spec.channels as usize;

        let raw_samples: Vec<i16> = wav_reader
            .samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| VoxnoteError::StreamOpen {
                message: format!("Failed to read WAV samples: {}", e),
            })?;

        // Downmix to mono by averaging channels
        let samples = if channels <= 1 {
            raw_samples
        } else {
            raw_samples
                .chunks_exact(channels)
                .map(|frame| {
                    let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                    (sum / channels as i32) as i16
                })
                .collect()
        };

        Ok(Self {
            samples: Some(samples),
            sample_rate: spec.sample_rate,
            block_size: block_size as usize,
            feeder: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Create from stdin.
    pub fn from_stdin(block_size: u32) -> Result<Self> {
        use std::io::Cursor;

        // Read all data from stdin into memory first (StdinLock is not Send)
        let mut buffer = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .map_err(|e| VoxnoteError::StreamOpen {
                message: format!("Failed to read from stdin: {}", e),
            })?;

        Self::from_reader(Box::new(Cursor::new(buffer)), block_size)
    }

    /// The WAV file's native sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total mono samples parsed from the file.
    pub fn sample_count(&self) -> usize {
        self.samples.as_ref().map(Vec::len).unwrap_or(0)
    }
}

impl FrameSource for WavFrameSource {
    fn start(&mut self, tx: FrameSender) -> Result<()> {
        let Some(samples) = self.samples.take() else {
            return Err(VoxnoteError::StreamOpen {
                message: "WAV source already started".to_string(),
            });
        };

        let block_size = self.block_size.max(1);
        let stop_flag = Arc::clone(&self.stop_flag);

        self.feeder = Some(std::thread::spawn(move || {
            for (index, block) in samples.chunks(block_size).enumerate() {
                if stop_flag.load(Ordering::SeqCst) {
                    break;
                }
                if !tx.send(AudioFrame::new(index as u64, block.to_vec())) {
                    break;
                }
            }
            // tx drops here, closing the channel
        }));

        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(feeder) = self.feeder.take()
            && feeder.join().is_err()
        {
            eprintln!("voxnote: WAV feeder thread panicked");
        }
        Ok(())
    }
}
