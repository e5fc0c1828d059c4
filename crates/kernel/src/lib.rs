//! Skater kernel: trick state machine, frame integrator, chase camera and
//! the scheduler that drives them.
//!
//! # Invariants
//! - Trick transitions go Idle -> airborne -> Idle, never airborne -> airborne.
//! - Landing clears rotation, vertical velocity and the flip accumulator.
//! - Stepping is a pure function of the session, the applied actions and `dt`.

pub mod camera;
pub mod scheduler;
pub mod session;
pub mod skater;

pub use camera::CameraRig;
pub use scheduler::{
    FixedClock, FrameClock, FrameReport, MonotonicClock, Scheduler, ShutdownSignal, StopReason,
};
pub use session::{Landing, Session, SessionEvent};
pub use skater::{Skater, TrickState};
