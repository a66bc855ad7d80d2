//! Headless audio clock
//!
//! Stands in for the audio device when there is none (CI, SSH sessions, or
//! builds without the `streaming` feature). Samples are discarded, but every
//! write blocks until the moment a primed device would have accepted it, so
//! the demo keeps the same frame rate.

use super::AudioSink;
use crate::{DemoError, Result};
use std::time::{Duration, Instant};

/// Sleep-paced sink driven by a monotonic clock.
#[derive(Debug, Clone)]
pub struct PacedSink {
    sample_rate: u32,
    epoch: Option<Instant>,
    written: u64,
}

impl PacedSink {
    /// Create a sink that "plays" at `sample_rate`
    pub fn new(sample_rate: u32) -> Self {
        PacedSink {
            sample_rate,
            epoch: None,
            written: 0,
        }
    }

    /// Samples accepted so far
    pub fn samples_written(&self) -> u64 {
        self.written
    }

    /// Instant at which the first `samples` samples have been consumed
    pub fn deadline(&self, samples: u64) -> Option<Instant> {
        let epoch = self.epoch?;
        let secs = samples as f64 / self.sample_rate as f64;
        Some(epoch + Duration::from_secs_f64(secs))
    }
}

impl AudioSink for PacedSink {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Starts the clock; there is no buffer to fill.
    fn prime(&mut self) -> Result<usize> {
        if self.sample_rate == 0 {
            return Err(DemoError::ConfigError(
                "sample rate must be greater than 0".into(),
            ));
        }
        self.epoch = Some(Instant::now());
        self.written = 0;
        Ok(0)
    }

    fn write_blocking(&mut self, block: &[i8]) -> Result<usize> {
        self.written += block.len() as u64;
        let deadline = self
            .deadline(self.written)
            .ok_or_else(|| DemoError::WriteError("paced sink written before priming".into()))?;

        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        Ok(block.len())
    }
}
