use super::{PixelBuffer, StrokeStyle, Surface};

/// Software 2D canvas: a pixel buffer plus canvas-style stroke state
///
/// Clearing paints the page background color, since the stitches are meant
/// to sit on top of a light page rather than on transparent black.
#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: PixelBuffer,
    background: (u8, u8, u8),
    stroke: StrokeStyle,
    alpha: f32,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: (u8, u8, u8)) -> Self {
        let mut buffer = PixelBuffer::with_size(width, height);
        buffer.clear(background.0, background.1, background.2);
        Self {
            buffer,
            background,
            stroke: StrokeStyle::default(),
            alpha: 1.0,
        }
    }

    /// Match a new device size. Pixels are reset to the background.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.buffer.resize(width, height);
        self.clear();
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn background(&self) -> (u8, u8, u8) {
        self.background
    }
}

impl Surface for Canvas {
    fn width(&self) -> u32 {
        self.buffer.width()
    }

    fn height(&self) -> u32 {
        self.buffer.height()
    }

    fn clear(&mut self) {
        let (r, g, b) = self.background;
        self.buffer.clear(r, g, b);
    }

    fn set_stroke(&mut self, style: StrokeStyle) {
        self.stroke = style;
    }

    fn set_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn stroke_segment(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let (r, g, b) = self.stroke.color;
        let alpha = self.alpha * self.stroke.opacity;
        self.buffer
            .stroke_capsule(x0, y0, x1, y1, self.stroke.line_width, r, g, b, alpha);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_alpha_draws_nothing() {
        let mut canvas = Canvas::new(16, 16, (240, 235, 225));
        canvas.set_alpha(0.0);
        canvas.stroke_segment(0.0, 0.0, 15.0, 15.0);
        assert_eq!(canvas.buffer().get_pixel(8, 8), Some((240, 235, 225)));
    }

    #[test]
    fn test_nan_alpha_keeps_previous() {
        let mut canvas = Canvas::new(16, 16, (255, 255, 255));
        canvas.set_alpha(0.0);
        canvas.set_alpha(f32::NAN);
        canvas.stroke_segment(0.0, 8.0, 15.0, 8.0);
        assert_eq!(canvas.buffer().get_pixel(8, 8), Some((255, 255, 255)));
    }

    #[test]
    fn test_stroke_uses_style_opacity() {
        let mut canvas = Canvas::new(16, 16, (255, 255, 255));
        canvas.set_stroke(StrokeStyle::new((0, 0, 0), 0.5, 2.0));
        canvas.set_alpha(1.0);
        canvas.stroke_segment(0.0, 8.0, 15.0, 8.0);
        let (r, _, _) = canvas.buffer().get_pixel(8, 8).unwrap();
        // Half-opaque black over white lands near mid grey
        assert!((120..=136).contains(&r), "unexpected shade {r}");
    }
}
