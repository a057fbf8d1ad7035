//! Signed distance functions for the rabbit silhouette
//!
//! Distances are negative inside a shape and measured in the silhouette's
//! local units (before scaling to pixels). The rabbit is a union of ellipses
//! and one circle; points are only ever tested against a thin band around
//! its boundary, so the approximate ellipse distance is good enough.

use crate::math::smoothstep;

/// Fixed tilt of the silhouette, radians
const TILT: f32 = -0.10;

/// Approximate signed distance to an axis-aligned ellipse centered at the origin
///
/// Projects the point onto the ellipse by angle (`atan2(y·a, x·b)`) and
/// returns the Euclidean distance to that point, negative when the implicit
/// equation `(x/a)² + (y/b)² − 1` is negative.
pub fn ellipse_distance(x: f32, y: f32, a: f32, b: f32) -> f32 {
    let x = x.abs();
    let y = y.abs();
    let t = (y * a).atan2(x * b);
    let dx = x - a * t.cos();
    let dy = y - b * t.sin();
    let implicit = (x * x) / (a * a) + (y * y) / (b * b) - 1.0;

    let dist = dx.hypot(dy);
    if implicit < 0.0 {
        -dist
    } else if implicit > 0.0 {
        dist
    } else {
        0.0
    }
}

pub fn circle_distance(x: f32, y: f32, radius: f32) -> f32 {
    x.hypot(y) - radius
}

/// One shape in the union, positioned in silhouette space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Ellipse { cx: f32, cy: f32, a: f32, b: f32 },
    Circle { cx: f32, cy: f32, r: f32 },
}

impl Primitive {
    pub fn distance(&self, x: f32, y: f32) -> f32 {
        match *self {
            Self::Ellipse { cx, cy, a, b } => ellipse_distance(x - cx, y - cy, a, b),
            Self::Circle { cx, cy, r } => circle_distance(x - cx, y - cy, r),
        }
    }

    /// Distance from the origin to the farthest point of the shape
    pub fn bound(&self) -> f32 {
        match *self {
            Self::Ellipse { cx, cy, a, b } => cx.hypot(cy) + a.max(b),
            Self::Circle { cx, cy, r } => cx.hypot(cy) + r,
        }
    }
}

const fn ellipse(cx: f32, cy: f32, a: f32, b: f32) -> Primitive {
    Primitive::Ellipse { cx, cy, a, b }
}

/// A sitting rabbit, head toward -x, y up
pub const RABBIT: [Primitive; 8] = [
    // Body
    ellipse(0.0, 0.0, 140.0, 90.0),
    // Head
    ellipse(-120.0, 40.0, 55.0, 45.0),
    // Ears
    ellipse(-150.0, 110.0, 18.0, 55.0),
    ellipse(-125.0, 115.0, 16.0, 48.0),
    // Tail
    Primitive::Circle {
        cx: 145.0,
        cy: 10.0,
        r: 22.0,
    },
    // Front leg
    ellipse(-80.0, -70.0, 55.0, 20.0),
    // Back leg
    ellipse(55.0, -75.0, 70.0, 22.0),
    // Haunch
    ellipse(-30.0, -30.0, 95.0, 60.0),
];

/// Union of shapes
pub fn union_distance(shapes: &[Primitive], x: f32, y: f32) -> f32 {
    shapes
        .iter()
        .map(|p| p.distance(x, y))
        .fold(f32::INFINITY, f32::min)
}

/// Radius around the local origin outside of which every shape is at least
/// `margin` away
pub fn union_bound(shapes: &[Primitive], margin: f32) -> f32 {
    shapes.iter().map(Primitive::bound).fold(0.0, f32::max) + margin
}

/// Map a canvas point into upright, tilted silhouette space
#[inline]
pub fn to_local(px: f32, py: f32, ax: f32, ay: f32, scale: f32, facing: f32) -> (f32, f32) {
    let x = (px - ax) / scale * facing;
    let y = (ay - py) / scale;
    let (sin, cos) = TILT.sin_cos();
    (x * cos - y * sin, x * sin + y * cos)
}

/// Signed distance from a canvas point to the rabbit anchored at `(ax, ay)`
///
/// `scale` is pixels per silhouette unit; `facing` is ±1 and mirrors x.
pub fn rabbit_distance(px: f32, py: f32, ax: f32, ay: f32, scale: f32, facing: f32) -> f32 {
    let (x, y) = to_local(px, py, ax, ay, scale, facing);
    union_distance(&RABBIT, x, y)
}

/// How strongly a point at signed distance `d` belongs to the outline band
///
/// 1 on the boundary, falling smoothly to 0 at `|d| = thickness`.
pub fn outline_strength(d: f32, thickness: f32) -> f32 {
    let ad = d.abs();
    if ad.is_nan() || ad > thickness {
        return 0.0;
    }
    1.0 - smoothstep(0.0, thickness, ad)
}

/// Outline mask of one rabbit, reusable across many points in a frame
#[derive(Debug, Clone, Copy)]
pub struct RabbitOutline {
    pub ax: f32,
    pub ay: f32,
    pub scale: f32,
    pub facing: f32,
    pub thickness: f32,
    /// Squared canvas-space radius beyond which the mask is 0
    reject_sq: f32,
}

impl RabbitOutline {
    pub fn new(ax: f32, ay: f32, scale: f32, facing: f32, thickness: f32) -> Self {
        let radius = union_bound(&RABBIT, thickness) * scale;
        Self {
            ax,
            ay,
            scale,
            facing,
            thickness,
            reject_sq: radius * radius,
        }
    }

    pub fn strength(&self, px: f32, py: f32) -> f32 {
        let dx = px - self.ax;
        let dy = py - self.ay;
        if dx * dx + dy * dy > self.reject_sq || self.scale <= 0.0 {
            return 0.0;
        }
        let d = rabbit_distance(px, py, self.ax, self.ay, self.scale, self.facing);
        outline_strength(d, self.thickness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn test_ellipse_boundary_is_zero() {
        let (a, b) = (140.0, 90.0);
        for i in 0..32 {
            let t = i as f32 / 32.0 * TAU;
            let d = ellipse_distance(a * t.cos(), b * t.sin(), a, b);
            assert!(d.abs() < 1e-2, "boundary point {i} gave {d}");
        }
    }

    #[test]
    fn test_ellipse_sign() {
        assert!(ellipse_distance(0.0, 0.0, 55.0, 45.0) < 0.0);
        assert!(ellipse_distance(30.0, -10.0, 55.0, 45.0) < 0.0);
        assert!(ellipse_distance(60.0, 0.0, 55.0, 45.0) > 0.0);
        assert!(ellipse_distance(-40.0, 40.0, 55.0, 45.0) > 0.0);
    }

    #[test]
    fn test_ellipse_on_axis_distance() {
        assert!((ellipse_distance(150.0, 0.0, 140.0, 90.0) - 10.0).abs() < 1e-3);
        assert!((ellipse_distance(0.0, -80.0, 140.0, 90.0) + 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_circle_distance() {
        assert!(circle_distance(3.0, 4.0, 5.0).abs() < 1e-6);
        assert_eq!(circle_distance(0.0, 0.0, 22.0), -22.0);
    }

    #[test]
    fn test_outline_strength_profile() {
        let thickness = 5.0;
        assert_eq!(outline_strength(0.0, thickness), 1.0);
        assert_eq!(outline_strength(5.0, thickness), 0.0);
        assert_eq!(outline_strength(-7.0, thickness), 0.0);
        assert_eq!(outline_strength(f32::NAN, thickness), 0.0);

        let mut prev = 1.0;
        for i in 0..=50 {
            let s = outline_strength(i as f32 * 0.1, thickness);
            assert!(s <= prev + 1e-6);
            assert_eq!(s, outline_strength(-(i as f32) * 0.1, thickness));
            prev = s;
        }
    }

    #[test]
    fn test_rabbit_inside_and_outside() {
        // Anchor is inside the body
        assert!(rabbit_distance(500.0, 500.0, 500.0, 500.0, 1.0, 1.0) < 0.0);
        assert!(rabbit_distance(900.0, 500.0, 500.0, 500.0, 1.0, 1.0) > 0.0);
        // Far above the ears
        assert!(rabbit_distance(500.0, 100.0, 500.0, 500.0, 1.0, 1.0) > 0.0);
    }

    #[test]
    fn test_facing_mirrors() {
        let right = rabbit_distance(380.0, 450.0, 500.0, 500.0, 1.0, 1.0);
        let left = rabbit_distance(620.0, 450.0, 500.0, 500.0, 1.0, -1.0);
        assert!((right - left).abs() < 1e-3);
    }

    #[test]
    fn test_scale_shrinks_silhouette() {
        // 100px to the right is outside at half scale, inside at full scale
        assert!(rabbit_distance(600.0, 500.0, 500.0, 500.0, 1.0, 1.0) < 0.0);
        assert!(rabbit_distance(600.0, 500.0, 500.0, 500.0, 0.5, 1.0) > 0.0);
    }

    #[test]
    fn test_outline_reject_matches_full_evaluation() {
        let outline = RabbitOutline::new(400.0, 300.0, 0.6, -1.0, 5.0);
        for i in 0..40 {
            for j in 0..40 {
                let px = 250.0 + i as f32 * 7.5;
                let py = 150.0 + j as f32 * 7.5;
                let full = outline_strength(
                    rabbit_distance(px, py, 400.0, 300.0, 0.6, -1.0),
                    5.0,
                );
                assert_eq!(outline.strength(px, py), full);
            }
        }
    }
}
