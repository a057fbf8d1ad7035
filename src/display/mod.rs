mod canvas;
mod pixel_buffer;
mod recording;
mod surface;
#[cfg(feature = "window")]
mod window;

pub use canvas::Canvas;
pub use pixel_buffer::PixelBuffer;
pub use recording::{RecordingSurface, Segment};
pub use surface::{StrokeStyle, Surface};
#[cfg(feature = "window")]
pub use window::{Display, InputEvent, RenderTarget};

/// Warm paper tone the stitches are drawn on
pub const PAPER: (u8, u8, u8) = (246, 241, 232);
