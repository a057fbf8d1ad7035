//! Stitch glyphs
//!
//! Everything on screen is built from one mark: a small crossed "X", like a
//! cross-stitch on fabric. Sparkles layer a second, offset stitch and a plus
//! on top of it. Stroke style and alpha are set by the caller.

use crate::display::Surface;
use serde::{Deserialize, Serialize};

/// Arm length of the sparkle's plus, relative to the stitch size
const PLUS_ARM: f32 = 0.95;

/// Glyph used for a star or a shooting-star head
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    /// A single "X"
    Stitch,
    /// "X" plus a centered "+"
    Sparkle,
    /// Two offset "X" marks plus a centered "+"
    #[default]
    LayeredSparkle,
}

/// Two crossing diagonals of half-width `size`
pub fn draw_stitch_x(surface: &mut (impl Surface + ?Sized), x: f32, y: f32, size: f32) {
    surface.stroke_segment(x - size, y - size, x + size, y + size);
    surface.stroke_segment(x - size, y + size, x + size, y - size);
}

/// Sparkle: a stitch, optionally a second smaller one nudged up-right, and a plus
pub fn draw_stitch_star(
    surface: &mut (impl Surface + ?Sized),
    x: f32,
    y: f32,
    size: f32,
    layered: bool,
) {
    draw_stitch_x(surface, x, y, size);
    if layered {
        draw_stitch_x(surface, x + size * 0.15, y - size * 0.1, size * 0.85);
    }

    let arm = size * PLUS_ARM;
    surface.stroke_segment(x - arm, y, x + arm, y);
    surface.stroke_segment(x, y - arm, x, y + arm);
}

pub fn draw_glyph(surface: &mut (impl Surface + ?Sized), glyph: Glyph, x: f32, y: f32, size: f32) {
    match glyph {
        Glyph::Stitch => draw_stitch_x(surface, x, y, size),
        Glyph::Sparkle => draw_stitch_star(surface, x, y, size, false),
        Glyph::LayeredSparkle => draw_stitch_star(surface, x, y, size, true),
    }
}

/// Dashed line of straight stitches from `(x0, y0)` to `(x1, y1)`
///
/// Returns the number of stitches drawn. The last stitch is cut short at the
/// end point.
pub fn draw_running_stitch(
    surface: &mut (impl Surface + ?Sized),
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    stitch: f32,
    gap: f32,
) -> usize {
    let (dx, dy) = (x1 - x0, y1 - y0);
    let length = dx.hypot(dy);
    let pitch = stitch + gap;
    if length <= 0.0 || stitch <= 0.0 || pitch <= 0.0 {
        return 0;
    }
    let (ux, uy) = (dx / length, dy / length);

    let mut drawn = 0;
    let mut along = 0.0;
    while along < length {
        let end = (along + stitch).min(length);
        surface.stroke_segment(x0 + ux * along, y0 + uy * along, x0 + ux * end, y0 + uy * end);
        drawn += 1;
        along += pitch;
    }
    drawn
}

/// Running-stitch outline of a rectangle, clockwise from the top-left corner
pub fn draw_stitched_rect(
    surface: &mut (impl Surface + ?Sized),
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    stitch: f32,
    gap: f32,
) -> usize {
    let (r, b) = (x + w, y + h);
    draw_running_stitch(surface, x, y, r, y, stitch, gap)
        + draw_running_stitch(surface, r, y, r, b, stitch, gap)
        + draw_running_stitch(surface, r, b, x, b, stitch, gap)
        + draw_running_stitch(surface, x, b, x, y, stitch, gap)
}

impl Glyph {
    /// Segments stroked per glyph
    pub const fn segment_count(self) -> usize {
        match self {
            Self::Stitch => 2,
            Self::Sparkle => 4,
            Self::LayeredSparkle => 6,
        }
    }
}
