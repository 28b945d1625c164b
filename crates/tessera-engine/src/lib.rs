//! Tessera engine crate.
//!
//! GPU plumbing shared by the tessera demos: device and surface acquisition,
//! typed vertex/parameter buffers and textures, render pipelines, binding sets,
//! the per-frame renderer and the winit runtime that drives it.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod resources;
pub mod pipeline;
pub mod binding;

mod error;

pub use error::{GpuError, Result};
