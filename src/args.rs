//! Command-line argument parsing for the demo binary.
//!
//! The demo itself has nothing to configure; the flags only pick which clock
//! drives it.

use std::env;
use std::fmt;

/// Where the audio goes, and therefore what paces the demo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockChoice {
    /// System audio device; its blocking writes pace the loop
    Device,
    /// No audio; a monotonic sleep keeps the same frame rate
    Headless,
}

impl ClockChoice {
    /// Get string representation of the clock choice.
    pub fn as_str(&self) -> &'static str {
        match self {
            ClockChoice::Device => "device",
            ClockChoice::Headless => "headless",
        }
    }
}

impl fmt::Display for ClockChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed command-line arguments.
#[derive(Debug)]
pub struct CliArgs {
    /// Selected clock
    pub clock: ClockChoice,
    /// Whether help was requested
    pub show_help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            clock: if cfg!(feature = "streaming") {
                ClockChoice::Device
            } else {
                ClockChoice::Headless
            },
            show_help: false,
        }
    }
}

impl CliArgs {
    /// Parse arguments from the command line.
    pub fn parse() -> Self {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse arguments from an iterator (program name excluded).
    pub fn parse_from<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = Self::default();

        for arg in iter {
            match arg.as_str() {
                "--headless" => {
                    args.clock = ClockChoice::Headless;
                }
                "--help" | "-h" => {
                    args.show_help = true;
                }
                _ => {
                    eprintln!("Unknown argument: {}", arg);
                    args.show_help = true;
                }
            }
        }

        args
    }

    /// Print help text to stderr.
    pub fn print_help() {
        eprintln!(
            "Usage:\n  bytebeat-demo [--headless]\n\n\
             Flags:\n\
             \x20 --headless    Run without an audio device, paced by a sleep clock\n\
             \x20 -h, --help    Show this help\n\n\
             Logging goes to stderr; set RUST_LOG (e.g. RUST_LOG=info) for more detail.\n"
        );
    }
}
