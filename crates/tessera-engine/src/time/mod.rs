//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the runtime.
//! The runtime calls `tick()` once per presented frame and hands the resulting
//! `FrameTime` to the application.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
