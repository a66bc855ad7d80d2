//! Bytebeat demo binary
//!
//! Primes the audio clock, takes over the terminal, plays the scene sequence
//! and restores the terminal afterwards.

mod args;

use anyhow::{Context, Result};
use args::{CliArgs, ClockChoice};
use bytebeat_demo::{AnsiSurface, AudioSink, Demo, DemoConfig, PacedSink, RunSummary};
use std::io::{self, BufWriter, Write};
use tracing_subscriber::EnvFilter;

fn open_sink(choice: ClockChoice, config: &DemoConfig) -> Result<Box<dyn AudioSink>> {
    match choice {
        #[cfg(feature = "streaming")]
        ClockChoice::Device => {
            let device = bytebeat_demo::AudioDevice::open(config)
                .context("no audio output available (try --headless)")?;
            Ok(Box::new(device))
        }
        #[cfg(not(feature = "streaming"))]
        ClockChoice::Device => {
            tracing::warn!("built without the \"streaming\" feature, running headless");
            Ok(Box::new(PacedSink::new(config.sample_rate)))
        }
        ClockChoice::Headless => Ok(Box::new(PacedSink::new(config.sample_rate))),
    }
}

/// Prime the clock, then take over `out`, play, and restore it.
///
/// The terminal is left untouched when the clock cannot be primed, and is
/// restored whenever it was taken over.
fn play<A: AudioSink, W: Write>(config: DemoConfig, sink: A, out: &mut W) -> Result<RunSummary> {
    let surface = AnsiSurface::with_canvas(out, config.canvas);
    let mut demo = Demo::new(config, sink, surface).context("failed to start audio clock")?;

    let outcome = match demo.renderer_mut().surface_mut().begin() {
        Ok(()) => demo.run().context("demo aborted"),
        Err(e) => Err(anyhow::Error::new(e).context("failed to prepare terminal")),
    };

    demo.renderer_mut()
        .surface_mut()
        .finish()
        .context("failed to restore terminal")?;
    let summary = outcome?;

    demo.finish().context("failed to drain audio")?;
    Ok(summary)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = CliArgs::parse();
    if args.show_help {
        CliArgs::print_help();
        return Ok(());
    }

    let config = DemoConfig::default();
    tracing::info!(
        clock = %args.clock,
        frame_rate = config.frame_rate(),
        tick = ?config.tick_duration(),
        expected = ?config.run_duration(config.max_ticks),
        "starting demo"
    );

    let sink = open_sink(args.clock, &config)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let summary = play(config, sink, &mut out)?;
    tracing::info!(ticks = summary.ticks, elapsed = ?summary.elapsed, "done");

    Ok(())
}
