//! Bytebeat audio-visual demo
//!
//! A tiny demoscene production: a bytebeat waveform is synthesized block by
//! block and written to the audio device, while procedural pixel art is drawn
//! to the terminal with ANSI escape sequences. Both are driven by one shared
//! position counter, and the blocking audio write is the only clock.
//!
//! # Features
//! - Closed-form bytebeat synthesis (`sample(t)`) with a defined policy for the
//!   degenerate zero divisor
//! - Audio clock that primes the device with silence and paces the program
//! - Terminal rasterizer for weighted pixels, ellipses, antialiased rings and
//!   filled rectangles
//! - Scene state machine sequencing Intro, Chessboard, Circles and Smilie
//!
//! # Crate feature flags
//! - `streaming` (default): real audio output via rodio (`AudioDevice`)
//!
//! Without `streaming` the demo can still run headless on the sleep-paced
//! [`PacedSink`] clock.
//!
//! # Quick start
//! ```no_run
//! use bytebeat_demo::{AnsiSurface, DemoConfig, Demo, PacedSink};
//!
//! let config = DemoConfig::default();
//! let sink = PacedSink::new(config.sample_rate);
//! let surface = AnsiSurface::new(std::io::stdout());
//! let mut demo = Demo::new(config, sink, surface).unwrap();
//! let summary = demo.run().unwrap();
//! println!("{} ticks", summary.ticks);
//! ```

#![warn(missing_docs)]

pub mod bytebeat; // Bytebeat synthesis
pub mod config; // Fixed demo constants
pub mod demo; // Main loop owner
pub mod render; // Terminal pixel renderer
pub mod scene; // Scene state machine
pub mod streaming; // Audio clock and sinks

/// Error types for the demo
#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    /// No audio output device could be opened
    #[error("Audio device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The audio device stopped accepting samples mid-run
    #[error("Audio write failed: {0}")]
    WriteError(String),

    /// The drawing surface (terminal) could not be written
    #[error("Render surface error: {0}")]
    Surface(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for DemoError {
    /// Converts a String into `DemoError::Other`.
    ///
    /// Prefer the specific variants (`WriteError`, `DeviceUnavailable`,
    /// `ConfigError`) where the failure kind is known.
    fn from(msg: String) -> Self {
        DemoError::Other(msg)
    }
}

impl From<&str> for DemoError {
    /// Converts a string slice into `DemoError::Other`.
    fn from(msg: &str) -> Self {
        DemoError::Other(msg.to_string())
    }
}

/// Result type for demo operations
pub type Result<T> = std::result::Result<T, DemoError>;

// Public API exports
pub use bytebeat::{fill_block, sample};
pub use config::DemoConfig;
pub use demo::{Demo, RunSummary};
pub use render::{AnsiSurface, PixelWrite, Recorder, Renderer, Surface};
pub use scene::{Scene, SceneMachine};
#[cfg(feature = "streaming")]
pub use streaming::AudioDevice;
pub use streaming::{AudioClock, AudioSink, PacedSink, RingBuffer};
