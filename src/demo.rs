//! Main loop owner
//!
//! [`Demo`] holds everything that changes while the demo runs: the position
//! counter, the audio clock and the scene machine. Each step emits the audio
//! block for the current position (blocking, this is what paces the loop),
//! then renders the frame for the same position, then advances.

use crate::config::DemoConfig;
use crate::render::{Renderer, Surface};
use crate::scene::SceneMachine;
use crate::streaming::{AudioClock, AudioSink};
use crate::Result;
use std::time::{Duration, Instant};

/// Outcome of a full run
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Loop iterations completed
    pub ticks: u32,
    /// Wall-clock time spent in the loop
    pub elapsed: Duration,
    /// Whether the scene list ran out before the tick bound
    pub scenes_exhausted: bool,
}

/// Audio clock, renderer and scene machine driven by one position counter.
pub struct Demo<A: AudioSink, S: Surface> {
    config: DemoConfig,
    position: u32,
    clock: AudioClock<A>,
    renderer: Renderer<S>,
    scenes: SceneMachine,
}

impl<A: AudioSink, S: Surface> Demo<A, S> {
    /// Demo with the standard scene sequence; primes the sink.
    pub fn new(config: DemoConfig, sink: A, surface: S) -> Result<Self> {
        Self::with_scenes(config, sink, surface, SceneMachine::default())
    }

    /// Demo over a custom scene machine; primes the sink.
    pub fn with_scenes(
        config: DemoConfig,
        sink: A,
        surface: S,
        scenes: SceneMachine,
    ) -> Result<Self> {
        let clock = AudioClock::open(sink, &config)?;
        Ok(Demo {
            config,
            position: 0,
            clock,
            renderer: Renderer::new(surface, config.canvas),
            scenes,
        })
    }

    /// Current position (the next one to be played)
    pub fn position(&self) -> u32 {
        self.position
    }

    /// The scene machine
    pub fn scenes(&self) -> &SceneMachine {
        &self.scenes
    }

    /// The audio clock
    pub fn clock(&self) -> &AudioClock<A> {
        &self.clock
    }

    /// The renderer
    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    /// Mutable access to the renderer
    pub fn renderer_mut(&mut self) -> &mut Renderer<S> {
        &mut self.renderer
    }

    /// One tick: audio for the position, then its frame, then advance.
    ///
    /// Returns `Ok(false)` once the scene list is exhausted. The audio for
    /// that final position has still been emitted.
    pub fn step(&mut self) -> Result<bool> {
        let position = self.position;
        self.clock.tick(position)?;

        let running = self.scenes.step(&mut self.renderer, position)?;
        self.renderer.flush()?;

        self.position = self.position.wrapping_add(1);
        Ok(running)
    }

    /// Run until the scenes are exhausted or `max_ticks` is reached.
    pub fn run(&mut self) -> Result<RunSummary> {
        let start = Instant::now();
        let mut ticks = 0;
        let mut scenes_exhausted = self.scenes.is_finished();

        while !scenes_exhausted && ticks < self.config.max_ticks {
            scenes_exhausted = !self.step()?;
            ticks += 1;
        }

        let summary = RunSummary {
            ticks,
            elapsed: start.elapsed(),
            scenes_exhausted,
        };
        tracing::info!(
            ticks = summary.ticks,
            elapsed = ?summary.elapsed,
            scenes_exhausted,
            "run finished"
        );
        Ok(summary)
    }

    /// Let queued audio play out and hand back the sink and surface
    pub fn finish(self) -> Result<(A, S)> {
        let sink = self.clock.finish()?;
        Ok((sink, self.renderer.into_surface()))
    }
}
