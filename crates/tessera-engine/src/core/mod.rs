//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the demos: a one-time setup hook and a per-frame callback with a
//! consistent context.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::FrameCtx;
