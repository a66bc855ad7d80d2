//! Audio device integration using rodio
//!
//! The device plays from a [`RingBuffer`] sized like the hardware buffer the
//! demo asks for. Writing into a full ring makes no progress until the device
//! has played enough samples, which turns [`AudioSink::write_blocking`] into
//! the program's clock.

use super::{AudioSink, RingBuffer, BUFFER_BACKOFF_MICROS};
use crate::config::DemoConfig;
use crate::{DemoError, Result};
use rodio::{OutputStream, Sink, Source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Samples pulled from the ring per lock
const SOURCE_BATCH: usize = 1024;

/// Audio source that drains the ring buffer
struct RingBufferSource {
    ring_buffer: Arc<RingBuffer>,
    sample_rate: u32,
    finished: Arc<AtomicBool>,
    /// Batch read from the ring
    buffer: Vec<i8>,
    buffer_pos: usize,
    buffer_len: usize,
}

impl RingBufferSource {
    fn new(ring_buffer: Arc<RingBuffer>, sample_rate: u32, finished: Arc<AtomicBool>) -> Self {
        RingBufferSource {
            ring_buffer,
            sample_rate,
            finished,
            buffer: vec![0; SOURCE_BATCH],
            buffer_pos: 0,
            buffer_len: 0,
        }
    }
}

impl Source for RingBufferSource {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

impl Iterator for RingBufferSource {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.finished.load(Ordering::Relaxed) {
            return None;
        }

        if self.buffer_pos >= self.buffer_len {
            self.buffer_pos = 0;
            self.buffer_len = self.ring_buffer.read(&mut self.buffer);
            if self.buffer_len == 0 {
                // Underrun: keep the stream alive with silence
                return Some(0.0);
            }
        }

        let sample = self.buffer[self.buffer_pos];
        self.buffer_pos += 1;
        Some(sample as f32 / 128.0)
    }
}

/// System audio output.
pub struct AudioDevice {
    _stream: OutputStream,
    sink: Sink,
    ring_buffer: Arc<RingBuffer>,
    finished: Arc<AtomicBool>,
    sample_rate: u32,
    prime_chunk: usize,
    stall_timeout: Duration,
}

impl AudioDevice {
    /// Open the default output device and start playing from an empty buffer.
    ///
    /// # Errors
    /// `DeviceUnavailable` when no output stream or sink can be created.
    pub fn open(config: &DemoConfig) -> Result<Self> {
        config.validate()?;

        let (stream, stream_handle) = OutputStream::try_default().map_err(|e| {
            DemoError::DeviceUnavailable(format!("Failed to create audio stream: {e}"))
        })?;

        let sink = Sink::try_new(&stream_handle).map_err(|e| {
            DemoError::DeviceUnavailable(format!("Failed to create audio sink: {e}"))
        })?;

        let ring_buffer = Arc::new(
            RingBuffer::new(config.max_buffer_frames)
                .map_err(|e| DemoError::ConfigError(e.to_string()))?,
        );
        let finished = Arc::new(AtomicBool::new(false));

        sink.append(RingBufferSource::new(
            Arc::clone(&ring_buffer),
            config.sample_rate,
            Arc::clone(&finished),
        ));

        tracing::info!(
            sample_rate = config.sample_rate,
            buffer_frames = ring_buffer.capacity(),
            "audio device opened"
        );

        Ok(AudioDevice {
            _stream: stream,
            sink,
            ring_buffer,
            finished,
            sample_rate: config.sample_rate,
            prime_chunk: config.prime_chunk,
            stall_timeout: config.stall_timeout,
        })
    }

    /// Device buffer fill level (0.0 to 1.0)
    pub fn fill_percentage(&self) -> f32 {
        self.ring_buffer.fill_percentage()
    }
}

impl AudioSink for AudioDevice {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn prime(&mut self) -> Result<usize> {
        let silence = vec![0i8; self.prime_chunk];
        let mut total = 0;
        loop {
            let written = self.ring_buffer.write(&silence);
            total += written;
            if written < silence.len() {
                break;
            }
        }
        Ok(total)
    }

    fn write_blocking(&mut self, block: &[i8]) -> Result<usize> {
        let mut remaining = block;
        let mut last_progress = Instant::now();

        while !remaining.is_empty() {
            let written = self.ring_buffer.write(remaining);
            if written > 0 {
                remaining = &remaining[written..];
                last_progress = Instant::now();
                continue;
            }

            if last_progress.elapsed() >= self.stall_timeout {
                return Err(DemoError::WriteError(format!(
                    "device stopped consuming samples ({} of {} written)",
                    block.len() - remaining.len(),
                    block.len()
                )));
            }
            std::thread::sleep(Duration::from_micros(BUFFER_BACKOFF_MICROS));
        }

        Ok(block.len())
    }

    /// Waits until the device has played everything queued.
    fn finish(&mut self) -> Result<()> {
        let start = Instant::now();
        let mut last_level = self.ring_buffer.available_read();
        let mut last_progress = start;

        while !self.ring_buffer.is_empty() {
            let level = self.ring_buffer.available_read();
            if level < last_level {
                last_level = level;
                last_progress = Instant::now();
            } else if last_progress.elapsed() >= self.stall_timeout {
                tracing::warn!(queued = level, "device stalled while draining");
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }

        self.finished.store(true, Ordering::Relaxed);
        tracing::debug!(elapsed = ?start.elapsed(), "audio device drained");
        Ok(())
    }
}

impl Drop for AudioDevice {
    fn drop(&mut self) {
        self.finished.store(true, Ordering::Relaxed);
        self.sink.pause();
    }
}
