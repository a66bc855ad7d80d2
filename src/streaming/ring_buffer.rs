//! Bounded sample queue between the main loop and the audio thread
//!
//! The main loop is the only producer and the rodio source is the only
//! consumer. The capacity stands in for the device's hardware buffer: once it
//! is full, writes make no progress until the device has played enough
//! samples, which is what paces the demo.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Error type for ring buffer operations
#[derive(Debug, Clone)]
pub struct RingBufferError(pub String);

impl std::fmt::Display for RingBufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for RingBufferError {}

/// Ring buffer of signed 8-bit samples
///
/// # Thread Safety
/// - One producer (the audio clock)
/// - One consumer (the audio device source)
/// - Storage is behind a `parking_lot::Mutex`; positions are atomics so the
///   fill level can be read without taking the lock
#[derive(Debug)]
pub struct RingBuffer {
    buffer: Mutex<Vec<i8>>,
    write_pos: AtomicUsize,
    read_pos: AtomicUsize,
    /// Power of two
    capacity: usize,
    /// `pos & mask == pos % capacity`
    mask: usize,
}

impl RingBuffer {
    /// Create a new ring buffer.
    ///
    /// Capacity is rounded up to the next power of two, so a request for
    /// 32688 frames yields 32768.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested capacity is 0 or exceeds 64 MiB.
    pub fn new(requested_capacity: usize) -> Result<Self, RingBufferError> {
        if requested_capacity == 0 {
            return Err(RingBufferError(
                "Ring buffer capacity must be greater than 0".into(),
            ));
        }

        const MAX_CAPACITY: usize = 64 * 1024 * 1024;
        let capacity = requested_capacity
            .checked_next_power_of_two()
            .filter(|&c| c <= MAX_CAPACITY)
            .ok_or_else(|| {
                RingBufferError(format!(
                    "Ring buffer capacity {requested_capacity} exceeds maximum safe size {MAX_CAPACITY}"
                ))
            })?;

        Ok(RingBuffer {
            buffer: Mutex::new(vec![0; capacity]),
            write_pos: AtomicUsize::new(0),
            read_pos: AtomicUsize::new(0),
            capacity,
            mask: capacity - 1,
        })
    }

    /// Capacity in samples
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples waiting to be played
    pub fn available_read(&self) -> usize {
        let write = self.write_pos.load(Ordering::Acquire);
        let read = self.read_pos.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    /// Number of samples that can be written without blocking
    pub fn available_write(&self) -> usize {
        self.capacity - self.available_read() - 1
    }

    /// Write as many samples as fit; returns the number written (0 when full)
    pub fn write(&self, samples: &[i8]) -> usize {
        let mut buf = self.buffer.lock();

        let write_pos = self.write_pos.load(Ordering::Acquire);
        let read_pos = self.read_pos.load(Ordering::Acquire);
        let available = self.capacity - write_pos.wrapping_sub(read_pos) - 1;

        let to_write = samples.len().min(available);
        if to_write == 0 {
            return 0;
        }

        let write_idx = write_pos & self.mask;
        if write_idx + to_write <= self.capacity {
            buf[write_idx..write_idx + to_write].copy_from_slice(&samples[..to_write]);
        } else {
            let first_part = self.capacity - write_idx;
            buf[write_idx..].copy_from_slice(&samples[..first_part]);
            buf[..to_write - first_part].copy_from_slice(&samples[first_part..to_write]);
        }

        drop(buf);

        self.write_pos
            .store(write_pos.wrapping_add(to_write), Ordering::Release);

        to_write
    }

    /// Read up to `dest.len()` samples; returns the number read
    pub fn read(&self, dest: &mut [i8]) -> usize {
        let buf = self.buffer.lock();

        let write_pos = self.write_pos.load(Ordering::Acquire);
        let read_pos = self.read_pos.load(Ordering::Acquire);
        let available = write_pos.wrapping_sub(read_pos);

        let to_read = dest.len().min(available);
        if to_read == 0 {
            return 0;
        }

        let read_idx = read_pos & self.mask;
        if read_idx + to_read <= self.capacity {
            dest[..to_read].copy_from_slice(&buf[read_idx..read_idx + to_read]);
        } else {
            let first_part = self.capacity - read_idx;
            dest[..first_part].copy_from_slice(&buf[read_idx..]);
            dest[first_part..to_read].copy_from_slice(&buf[..to_read - first_part]);
        }

        drop(buf);

        self.read_pos
            .store(read_pos.wrapping_add(to_read), Ordering::Release);

        to_read
    }

    /// Whether no further sample fits
    pub fn is_full(&self) -> bool {
        self.available_write() == 0
    }

    /// Whether the consumer has drained everything
    pub fn is_empty(&self) -> bool {
        self.available_read() == 0
    }

    /// Fill level (0.0 to 1.0)
    pub fn fill_percentage(&self) -> f32 {
        (self.available_read() as f32) / (self.capacity as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_sized_capacity() {
        let rb = RingBuffer::new(32688).unwrap();
        assert_eq!(rb.capacity(), 32768);
        assert!(rb.is_empty());
        assert!(!rb.is_full());
    }

    #[test]
    fn test_write_and_read() {
        let rb = RingBuffer::new(16).unwrap();
        let samples = [1i8, -2, 3, -4];

        assert_eq!(rb.write(&samples), 4);
        assert_eq!(rb.available_read(), 4);

        let mut dest = [0i8; 4];
        assert_eq!(rb.read(&mut dest), 4);
        assert_eq!(dest, samples);
    }

    #[test]
    fn test_partial_write_when_full() {
        let rb = RingBuffer::new(16).unwrap();
        // One slot is always kept free
        assert_eq!(rb.write(&[0; 20]), 15);
        assert!(rb.is_full());
        assert_eq!(rb.write(&[0; 4]), 0);
    }

    #[test]
    fn test_wrap_around() {
        let rb = RingBuffer::new(16).unwrap();
        assert_eq!(rb.write(&[1; 10]), 10);

        let mut buf = [0i8; 5];
        assert_eq!(rb.read(&mut buf), 5);

        assert_eq!(rb.write(&[2; 8]), 8);

        let mut buf = [0i8; 13];
        assert_eq!(rb.read(&mut buf), 13);
        assert_eq!(&buf[..5], &[1; 5]);
        assert_eq!(&buf[5..], &[2; 8]);
        assert!(rb.is_empty());
    }

    #[test]
    fn test_fill_percentage() {
        let rb = RingBuffer::new(128).unwrap();
        assert_eq!(rb.fill_percentage(), 0.0);
        rb.write(&[1; 64]);
        let fill = rb.fill_percentage();
        assert!(fill > 0.45 && fill < 0.55, "Fill percentage {fill}");
    }

    #[test]
    fn test_zero_capacity_error() {
        let result = RingBuffer::new(0);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("greater than 0"));
    }

    #[test]
    fn test_max_capacity_exceeded() {
        let result = RingBuffer::new(64 * 1024 * 1024 + 1);
        assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
    }
}
