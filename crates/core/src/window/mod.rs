//! The window surface the run loop drives.
//!
//! Window and context creation live outside the core; the host hands over
//! something implementing [`HostWindow`] that is already current on the
//! calling thread.

#[cfg(test)]
pub(crate) mod scripted;

use crate::input::Key;
use crate::render::GraphicsContext;
use crate::Result;

pub trait HostWindow {
    fn is_close_requested(&self) -> bool;

    fn request_close(&mut self);

    /// Processes pending window and key events.
    fn poll_events(&mut self);

    /// Shows the frame drawn into [`HostWindow::graphics`]. This is the only
    /// point where the loop may wait.
    fn present_frame(&mut self) -> Result<()>;

    /// Drawable size in pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    /// Raw level query for a single key.
    fn is_key_pressed(&self, key: Key) -> bool;

    fn graphics(&mut self) -> &mut dyn GraphicsContext;
}
