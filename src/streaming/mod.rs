//! Audio output and the blocking audio clock
//!
//! The demo has no timer. [`AudioClock::tick`] writes one block to an
//! [`AudioSink`] and does not return until the sink has accepted all of it.
//! With the sink primed full, that takes exactly one block's worth of
//! playback time, so the frame rate is `sample_rate / block_size`.
//!
//! Sinks:
//! - [`AudioDevice`] (feature `streaming`): the system output via rodio
//! - [`PacedSink`]: headless, sleeps on a monotonic deadline instead

#[cfg(feature = "streaming")]
pub mod audio_device;
pub mod clock;
pub mod paced;
pub mod ring_buffer;

#[cfg(feature = "streaming")]
pub use audio_device::AudioDevice;
pub use clock::{AudioClock, ClockStats};
pub use paced::PacedSink;
pub use ring_buffer::{RingBuffer, RingBufferError};

/// Buffer backoff time in microseconds while the device buffer is full
pub const BUFFER_BACKOFF_MICROS: u64 = 100;

/// A destination for fixed-size blocks of signed 8-bit mono samples.
pub trait AudioSink {
    /// Sample rate the sink actually plays at
    fn sample_rate(&self) -> u32;

    /// Fill the sink with silence without blocking until it reports full.
    ///
    /// Returns the number of silent samples written. After priming, the next
    /// blocking write cannot return early.
    fn prime(&mut self) -> crate::Result<usize>;

    /// Write the whole block, returning only once every sample was accepted.
    ///
    /// Returns the number of samples written, which is `block.len()` on
    /// success.
    fn write_blocking(&mut self, block: &[i8]) -> crate::Result<usize>;

    /// Let queued audio play out before the sink is dropped
    fn finish(&mut self) -> crate::Result<()> {
        Ok(())
    }
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }

    fn prime(&mut self) -> crate::Result<usize> {
        (**self).prime()
    }

    fn write_blocking(&mut self, block: &[i8]) -> crate::Result<usize> {
        (**self).write_blocking(block)
    }

    fn finish(&mut self) -> crate::Result<()> {
        (**self).finish()
    }
}
