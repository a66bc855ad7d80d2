//! Audio clock driver
//!
//! Owns the sink and one reusable block buffer. Every tick recomputes the
//! block from scratch for the given position and performs the blocking write.

use super::AudioSink;
use crate::bytebeat::fill_block;
use crate::config::DemoConfig;
use crate::{DemoError, Result};

/// Running totals for the clock
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockStats {
    /// Ticks emitted
    pub ticks: u64,
    /// Silent samples written while priming
    pub primed_samples: usize,
    /// Synthesized samples written
    pub samples_written: u64,
}

/// Paces the demo by writing one synthesized block per tick.
pub struct AudioClock<S: AudioSink> {
    sink: S,
    block: Vec<i8>,
    stats: ClockStats,
}

impl<S: AudioSink> AudioClock<S> {
    /// Prime `sink` with silence and take ownership of it.
    pub fn open(mut sink: S, config: &DemoConfig) -> Result<Self> {
        config.validate()?;

        let rate = sink.sample_rate();
        if rate != config.sample_rate {
            tracing::warn!(
                requested = config.sample_rate,
                negotiated = rate,
                "sink runs at a different sample rate; frame rate follows the sink"
            );
        }

        let primed = sink.prime()?;
        tracing::info!(primed, block_size = config.block_size, "audio clock primed");

        Ok(AudioClock {
            sink,
            block: vec![0; config.block_size],
            stats: ClockStats {
                primed_samples: primed,
                ..ClockStats::default()
            },
        })
    }

    /// Synthesize the block for `position` and block until the sink took it.
    pub fn tick(&mut self, position: u32) -> Result<()> {
        fill_block(position, &mut self.block);

        let written = self.sink.write_blocking(&self.block)?;
        if written != self.block.len() {
            return Err(DemoError::WriteError(format!(
                "short write at position {position}: {written} of {} samples",
                self.block.len()
            )));
        }

        self.stats.ticks += 1;
        self.stats.samples_written += written as u64;
        Ok(())
    }

    /// The block written by the last tick
    pub fn block(&self) -> &[i8] {
        &self.block
    }

    /// Running totals
    pub fn stats(&self) -> ClockStats {
        self.stats
    }

    /// The underlying sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Let queued audio play out and release the sink
    pub fn finish(mut self) -> Result<S> {
        self.sink.finish()?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytebeat::sample;

    /// Records every block and reports a fixed capacity when primed.
    struct CaptureSink {
        rate: u32,
        capacity: usize,
        blocks: Vec<Vec<i8>>,
        primed: bool,
        fail_after: Option<usize>,
    }

    impl CaptureSink {
        fn new(capacity: usize) -> Self {
            CaptureSink {
                rate: 44_100,
                capacity,
                blocks: Vec::new(),
                primed: false,
                fail_after: None,
            }
        }
    }

    impl AudioSink for CaptureSink {
        fn sample_rate(&self) -> u32 {
            self.rate
        }

        fn prime(&mut self) -> Result<usize> {
            self.primed = true;
            Ok(self.capacity)
        }

        fn write_blocking(&mut self, block: &[i8]) -> Result<usize> {
            assert!(self.primed, "write before priming");
            if self.fail_after == Some(self.blocks.len()) {
                return Err(DemoError::WriteError("device disconnected".into()));
            }
            self.blocks.push(block.to_vec());
            Ok(block.len())
        }
    }

    fn small_config() -> DemoConfig {
        DemoConfig {
            block_size: 64,
            ..DemoConfig::default()
        }
    }

    #[test]
    fn test_open_primes_sink() {
        let clock = AudioClock::open(CaptureSink::new(1024), &small_config()).unwrap();
        assert!(clock.sink().primed);
        assert_eq!(clock.stats().primed_samples, 1024);
        assert_eq!(clock.stats().ticks, 0);
    }

    #[test]
    fn test_tick_writes_synthesized_block() {
        let mut clock = AudioClock::open(CaptureSink::new(0), &small_config()).unwrap();
        clock.tick(70).unwrap();
        clock.tick(71).unwrap();

        let blocks = &clock.sink().blocks;
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].len(), 64);
        for (offset, &s) in blocks[1].iter().enumerate() {
            assert_eq!(s, sample(71 * 64 + offset as u32));
        }
        assert_eq!(clock.block(), blocks[1].as_slice());
        assert_eq!(clock.stats().ticks, 2);
        assert_eq!(clock.stats().samples_written, 128);
    }

    #[test]
    fn test_same_position_same_block() {
        let mut clock = AudioClock::open(CaptureSink::new(0), &small_config()).unwrap();
        clock.tick(200).unwrap();
        clock.tick(5).unwrap();
        clock.tick(200).unwrap();
        let blocks = &clock.sink().blocks;
        assert_eq!(blocks[0], blocks[2]);
    }

    #[test]
    fn test_write_error_propagates() {
        let mut sink = CaptureSink::new(0);
        sink.fail_after = Some(1);
        let mut clock = AudioClock::open(sink, &small_config()).unwrap();
        clock.tick(0).unwrap();
        let err = clock.tick(1).unwrap_err();
        assert!(matches!(err, DemoError::WriteError(_)));
        assert_eq!(clock.stats().ticks, 1);
    }

    #[test]
    fn test_open_rejects_invalid_config() {
        let config = DemoConfig {
            block_size: 0,
            ..DemoConfig::default()
        };
        assert!(matches!(
            AudioClock::open(CaptureSink::new(0), &config),
            Err(DemoError::ConfigError(_))
        ));
    }
}
