use super::{StrokeStyle, Surface};

/// One stroked segment with the alpha that was active when it was drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub alpha: f32,
}

/// Surface that records draw calls instead of rasterizing them
///
/// Used by the tests and for headless profiling of draw-call counts.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    alpha: f32,
    stroke: StrokeStyle,
    segments: Vec<Segment>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: 1.0,
            stroke: StrokeStyle::default(),
            segments: Vec::new(),
            clears: 0,
        }
    }

    /// Segments drawn since the last clear
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    pub fn stroke(&self) -> StrokeStyle {
        self.stroke
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.segments.clear();
        self.clears += 1;
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
        self.segments.push(Segment {
            x0,
            y0,
            x1,
            y1,
            alpha: self.alpha,
        });
    }
}
