//! Plain 2D math used on the CPU side.
//!
//! Control points live in texture-coordinate space: origin top-left, +X right,
//! +Y down, the visible image spanning `[0, 1]` on both axes.

mod vec2;

pub use vec2::Vec2;
