use serde::{Deserialize, Serialize};

/// Stroke settings applied to every following segment
///
/// `line_width` is in device pixels; the engine scales the configured CSS
/// width by the device pixel ratio before handing it over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: (u8, u8, u8),
    /// Opacity baked into the stroke color (the `0.55` in `rgba(0,0,0,0.55)`)
    pub opacity: f32,
    pub line_width: f32,
}

impl StrokeStyle {
    pub const fn new(color: (u8, u8, u8), opacity: f32, line_width: f32) -> Self {
        Self {
            color,
            opacity,
            line_width,
        }
    }

    pub fn scaled(&self, dpr: f32) -> Self {
        Self {
            line_width: self.line_width * dpr,
            ..*self
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new((0, 0, 0), 0.55, 1.05)
    }
}

/// Immediate-mode drawing target for the layers
///
/// Modelled on a 2D canvas context: stroke style and global alpha are
/// sticky state, segments are stroked with round caps.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Wipe the whole surface
    fn clear(&mut self);

    fn set_stroke(&mut self, style: StrokeStyle);

    /// Set the global alpha. Values are clamped to [0, 1]; non-finite values
    /// are ignored and the previous alpha stays in effect.
    fn set_alpha(&mut self, alpha: f32);

    fn stroke_segment(&mut self, x0: f32, y0: f32, x1: f32, y1: f32);
}
