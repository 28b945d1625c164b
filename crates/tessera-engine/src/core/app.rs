use winit::event::WindowEvent;

use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
///
/// `setup` runs exactly once, after the device and surface exist and before
/// the first frame. `on_frame` then runs once per redraw until either callback
/// asks to exit or returns an error.
pub trait App {
    /// Builds every GPU resource the app needs.
    fn setup(&mut self, ctx: &RenderCtx<'_>) -> anyhow::Result<()>;

    /// Called for window events the runtime does not consume itself.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Renders one frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> anyhow::Result<AppControl>;
}
