use crate::session::{Landing, Session};
use crate::skater::TrickState;
use skatepark_input::InputQueue;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Source of per-frame elapsed time.
pub trait FrameClock {
    /// Seconds since the previous call.
    fn delta(&mut self) -> f32;
}

/// Wall-clock time via `Instant`. The first call returns 0.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Option<Instant>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameClock for MonotonicClock {
    fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = self
            .last
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last = Some(now);
        dt
    }
}

/// Constant frame time, for headless runs and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub dt: f32,
}

impl FixedClock {
    pub fn new(dt: f32) -> Self {
        Self { dt }
    }
}

impl FrameClock for FixedClock {
    fn delta(&mut self) -> f32 {
        self.dt
    }
}

/// Cloneable stop flag shared between the scheduler and whoever ends the run.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What happened during one scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub dt: f32,
    /// Input actions applied before stepping.
    pub actions: usize,
    pub state: TrickState,
    pub landed: Option<Landing>,
}

/// Why [`Scheduler::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    Callback,
    FrameLimit,
}

/// Drives a [`Session`] once per tick: sample input, step, report.
pub struct Scheduler<C> {
    clock: C,
    shutdown: ShutdownSignal,
    max_frames: Option<u64>,
}

impl<C: FrameClock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            shutdown: ShutdownSignal::new(),
            max_frames: None,
        }
    }

    /// Stop `run` after this many ticks.
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// A handle that stops the scheduler when requested.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Run one frame: drain queued input into the session, then step it
    /// with the clock's elapsed time.
    pub fn tick(&mut self, session: &mut Session, input: &mut InputQueue) -> FrameReport {
        let actions = input.drain();
        let count = actions.len();
        for action in actions {
            session.apply(action);
        }
        let dt = self.clock.delta();
        let landed = session.step(dt);
        FrameReport {
            frame: session.frame(),
            dt,
            actions: count,
            state: session.state(),
            landed,
        }
    }

    /// Tick until shutdown is requested, `on_frame` breaks, or the frame
    /// limit is reached. `on_frame` may queue input for the next tick.
    pub fn run<F>(&mut self, session: &mut Session, input: &mut InputQueue, mut on_frame: F) -> StopReason
    where
        F: FnMut(&Session, &FrameReport, &mut InputQueue) -> ControlFlow<()>,
    {
        let mut ticks = 0u64;
        let reason = loop {
            if self.shutdown.is_requested() {
                break StopReason::Shutdown;
            }
            if self.max_frames.is_some_and(|max| ticks >= max) {
                break StopReason::FrameLimit;
            }
            let report = self.tick(session, input);
            ticks += 1;
            if on_frame(session, &report, input).is_break() {
                break StopReason::Callback;
            }
        };
        tracing::debug!(?reason, ticks, frame = session.frame(), "scheduler stopped");
        reason
    }
}
