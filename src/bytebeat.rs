//! Bytebeat synthesis
//!
//! Each sample is a closed-form function of its absolute sample index `t`:
//!
//! ```text
//! s(t) = round(sin(2π / (46 · (t & (t >> 12))) · t) · 127)
//! ```
//!
//! `t` is a `u32` and all integer arithmetic wraps at 32 bits. When the
//! divisor `46 · (t & (t >> 12))` is zero (every `t < 4096`, and any `t` whose
//! masked bits cancel) the sample is silence.

use std::f32::consts::PI;

/// Scale applied to the masked index before it divides the phase
const DIVISOR_SCALE: u32 = 46;

/// Synthesize the sample at absolute index `t`.
#[inline]
pub fn sample(t: u32) -> i8 {
    let divisor = DIVISOR_SCALE.wrapping_mul(t & (t >> 12));
    if divisor == 0 {
        return 0;
    }
    let phase = 2.0 * PI / divisor as f32 * t as f32;
    (phase.sin() * i8::MAX as f32).round() as i8
}

/// Absolute sample index of `offset` within the block for `position`.
#[inline]
pub fn sample_index(position: u32, block_size: usize, offset: usize) -> u32 {
    position
        .wrapping_mul(block_size as u32)
        .wrapping_add(offset as u32)
}

/// Fill `block` with the samples for `position`.
///
/// The block length is the block size; nothing is carried over between calls.
pub fn fill_block(position: u32, block: &mut [i8]) {
    let block_size = block.len();
    for (offset, out) in block.iter_mut().enumerate() {
        *out = sample(sample_index(position, block_size, offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_below_first_mask_bit() {
        // t >> 12 is zero, so the divisor is zero
        for t in 0..4096 {
            assert_eq!(sample(t), 0, "t = {t}");
        }
    }

    #[test]
    fn test_known_sample() {
        // t = 4097: mask = 1, divisor = 46, 4097 mod 46 = 3
        let expected = ((2.0 * std::f64::consts::PI * 3.0 / 46.0).sin() * 127.0).round() as i8;
        assert_eq!(expected, 51);
        assert_eq!(sample(4097), expected);
    }

    #[test]
    fn test_deterministic() {
        for t in (0..2_000_000u32).step_by(997) {
            assert_eq!(sample(t), sample(t));
        }
    }

    #[test]
    fn test_amplitude_stays_in_range() {
        for t in (0..u32::MAX).step_by(65_521) {
            let s = sample(t);
            assert!((-127..=127).contains(&s), "t = {t} gave {s}");
        }
    }

    #[test]
    fn test_fill_block_uses_absolute_index() {
        let mut block = [0i8; 64];
        fill_block(100, &mut block);
        for (offset, &s) in block.iter().enumerate() {
            assert_eq!(s, sample(100 * 64 + offset as u32));
        }
    }

    #[test]
    fn test_fill_block_recomputes_from_scratch() {
        let mut a = [0i8; 8172];
        let mut b = [5i8; 8172];
        fill_block(7, &mut a);
        fill_block(3, &mut b);
        fill_block(7, &mut b);
        assert_eq!(a[..], b[..]);
    }

    #[test]
    fn test_sample_index_wraps() {
        assert_eq!(sample_index(u32::MAX, 2, 1), u32::MAX.wrapping_mul(2).wrapping_add(1));
    }
}
