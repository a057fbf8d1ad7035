/// Device pixel ratios above this are clamped; a 3x phone renders at 2x
pub const MAX_DEVICE_PIXEL_RATIO: f32 = 2.0;

/// Viewport size in CSS pixels plus the backing canvas size in device pixels
///
/// All layer geometry is computed in device pixels. CSS sizes are kept
/// because star and dot densities are specified per CSS pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub css_width: f32,
    pub css_height: f32,
    pub dpr: f32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(css_width: f32, css_height: f32, device_pixel_ratio: f32) -> Self {
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO)
        } else {
            1.0
        };
        let css_width = if css_width.is_finite() { css_width.max(0.0) } else { 0.0 };
        let css_height = if css_height.is_finite() { css_height.max(0.0) } else { 0.0 };

        Self {
            css_width,
            css_height,
            dpr,
            width: (css_width * dpr).floor() as u32,
            height: (css_height * dpr).floor() as u32,
        }
    }

    /// Device width as f32
    #[inline]
    pub fn w(&self) -> f32 {
        self.width as f32
    }

    /// Device height as f32
    #[inline]
    pub fn h(&self) -> f32 {
        self.height as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
