//! Per-frame command recording and submission.
//!
//! A [`RenderSession`] aggregates every GPU handle one demo needs (pipeline,
//! vertex buffer, optional binding set) and turns them into one render pass
//! per frame: clear, bind, draw, submit.

mod ctx;
mod offscreen;
mod session;

pub use ctx::{RenderCtx, RenderTarget};
pub use offscreen::{padded_bytes_per_row, OffscreenTarget};
pub use session::{DrawCall, RenderSession, CLEAR_COLOR};
