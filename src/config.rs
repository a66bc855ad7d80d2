//! Fixed demo constants
//!
//! The demo has no runtime configuration: every value here is a constant of
//! the production. [`DemoConfig`] only gathers them so the components receive
//! them explicitly instead of reading globals.

use std::time::Duration;

/// Sample rate requested from the audio device (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Maximum device buffer size requested at open (frames)
pub const DEFAULT_MAX_BUFFER_FRAMES: usize = 32_688;

/// Samples per tick; this controls the frame rate
pub const DEFAULT_BLOCK_SIZE: usize = 8_172;

/// Terminal canvas width in cells
pub const TERMINAL_WIDTH: i32 = 80;

/// Terminal canvas height in cells
pub const TERMINAL_HEIGHT: i32 = 25;

/// Upper bound on loop iterations (the final scene never finishes on its own)
pub const DEFAULT_MAX_TICKS: u32 = 512;

/// Size of each silent write while priming the device
pub const PRIME_CHUNK: usize = 512;

/// Time a blocking write may go without progress before the device is considered gone
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_secs(2);

/// Drawable canvas bounds.
///
/// Valid coordinates are the inclusive range `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    /// Width in cells
    pub width: i32,
    /// Height in cells
    pub height: i32,
}

impl Canvas {
    /// Whether `(x, y)` lies inside the inclusive bounds
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x <= self.width && y <= self.height
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Canvas {
            width: TERMINAL_WIDTH,
            height: TERMINAL_HEIGHT,
        }
    }
}

/// Constants shared by the audio clock, renderer and main loop
#[derive(Debug, Clone, Copy)]
pub struct DemoConfig {
    /// Audio sample rate in Hz
    pub sample_rate: u32,
    /// Device buffer capacity in frames
    pub max_buffer_frames: usize,
    /// Samples synthesized and written per tick
    pub block_size: usize,
    /// Terminal canvas
    pub canvas: Canvas,
    /// Iteration bound for the main loop
    pub max_ticks: u32,
    /// Silent chunk size used for priming
    pub prime_chunk: usize,
    /// Stall timeout for blocking writes
    pub stall_timeout: Duration,
}

impl DemoConfig {
    /// Ticks per second: `sample_rate / block_size`
    pub fn frame_rate(&self) -> f64 {
        self.sample_rate as f64 / self.block_size as f64
    }

    /// Wall-clock duration of one tick
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(self.block_size as f64 / self.sample_rate as f64)
    }

    /// Wall-clock duration of `ticks` ticks
    pub fn run_duration(&self, ticks: u32) -> Duration {
        Duration::from_secs_f64(ticks as f64 * self.block_size as f64 / self.sample_rate as f64)
    }

    /// Reject values that would break the timing model
    pub fn validate(&self) -> crate::Result<()> {
        if self.sample_rate == 0 {
            return Err(crate::DemoError::ConfigError(
                "sample rate must be greater than 0".into(),
            ));
        }
        if self.block_size == 0 {
            return Err(crate::DemoError::ConfigError(
                "block size must be greater than 0".into(),
            ));
        }
        if self.prime_chunk == 0 || self.max_buffer_frames == 0 {
            return Err(crate::DemoError::ConfigError(
                "device buffer and prime chunk must be greater than 0".into(),
            ));
        }
        if self.canvas.width < 0 || self.canvas.height < 0 {
            return Err(crate::DemoError::ConfigError(format!(
                "canvas {}x{} has negative extent",
                self.canvas.width, self.canvas.height
            )));
        }
        Ok(())
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        DemoConfig {
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_buffer_frames: DEFAULT_MAX_BUFFER_FRAMES,
            block_size: DEFAULT_BLOCK_SIZE,
            canvas: Canvas::default(),
            max_ticks: DEFAULT_MAX_TICKS,
            prime_chunk: PRIME_CHUNK,
            stall_timeout: DEFAULT_STALL_TIMEOUT,
        }
    }
}
