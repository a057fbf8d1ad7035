use super::{Layer, UpdateContext};
use crate::clock::Frame;
use crate::config::CreatureConfig;
use crate::display::Surface;
use crate::math::{fract, wrap};
use crate::sdf::RabbitOutline;
use crate::stitch::draw_stitch_x;
use crate::util::Rng;
use crate::viewport::Viewport;
use log::debug;
use std::f32::consts::{PI, TAU};

/// One point of the stitch grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    /// Rest position, device pixels
    pub ox: f32,
    pub oy: f32,
    /// Stitch half-width, device pixels
    pub radius: f32,
    pub speed: f32,
    pub phase: f32,
    /// Per-dot ink intensity
    pub press: f32,
}

/// Where a rabbit is this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub x: f32,
    pub y: f32,
    /// Hop arc in [0, 1]; 0 on the ground
    pub arc: f32,
}

/// Jittering dot grid that only lights up along two running rabbit outlines
pub struct CreatureMask {
    config: CreatureConfig,
    dots: Vec<Dot>,
    viewport: Viewport,
    /// Leader's horizontal position; placed off the right edge on first resize
    runner_x: Option<f32>,
    jitter_time: f32,
}

impl CreatureMask {
    pub fn new(config: CreatureConfig) -> Self {
        Self {
            config,
            dots: Vec::new(),
            viewport: Viewport::default(),
            runner_x: None,
            jitter_time: 0.0,
        }
    }

    pub fn dots(&self) -> &[Dot] {
        &self.dots
    }

    pub fn runner_x(&self) -> Option<f32> {
        self.runner_x
    }

    /// Rebuild the grid: one dot every `gap` CSS pixels, inclusive of both edges
    fn make_dots(&mut self, rng: &mut Rng) {
        self.dots.clear();
        let vp = &self.viewport;
        if vp.is_empty() || self.config.gap <= 0.0 {
            return;
        }

        let c = &self.config;
        let cols = (vp.css_width / c.gap).ceil() as usize;
        let rows = (vp.css_height / c.gap).ceil() as usize;
        self.dots.reserve((rows + 1) * (cols + 1));

        for row in 0..=rows {
            for col in 0..=cols {
                let ox = (col as f32 * c.gap + (rng.next_f32() - 0.5) * c.placement_jitter) * vp.dpr;
                let oy = (row as f32 * c.gap + (rng.next_f32() - 0.5) * c.placement_jitter) * vp.dpr;
                self.dots.push(Dot {
                    ox,
                    oy,
                    radius: c.radius.sample(rng) * vp.dpr,
                    speed: c.jitter_speed.sample(rng),
                    phase: rng.range_f32(0.0, TAU),
                    press: c.press.sample(rng),
                });
            }
        }
    }

    /// Horizontal run range `[left, right)` the leader wraps around in
    fn run_range(&self) -> (f32, f32) {
        let margin = self.config.wrap_margin * self.viewport.dpr;
        (-margin, self.viewport.w() + margin)
    }

    fn wrap_x(&self, x: f32) -> f32 {
        let (left, right) = self.run_range();
        wrap(x, left, right)
    }

    /// Half-rectified sine: one upward arc per hop period, flat between cycles
    pub fn hop_arc(&self, x: f32, phase: f32) -> f32 {
        let period = self.config.hop_period * self.viewport.dpr;
        if period <= 0.0 {
            return 0.0;
        }
        (PI * fract(x / period + phase)).sin().max(0.0)
    }

    fn pose(&self, x: f32, phase: f32, hop_height: f32) -> Pose {
        let c = &self.config;
        let dpr = self.viewport.dpr;
        let wander_period = (c.wander_period * dpr).max(f32::EPSILON);
        let base_y = self.viewport.h() * c.base_y + (x / wander_period + phase).sin() * c.wander * dpr;
        let arc = self.hop_arc(x, phase);
        Pose {
            x,
            y: base_y - arc * hop_height,
            arc,
        }
    }

    pub fn leader(&self) -> Option<Pose> {
        let x = self.runner_x?;
        Some(self.pose(x, 0.0, self.config.hop_height * self.viewport.dpr))
    }

    pub fn chaser(&self) -> Option<Pose> {
        let c = &self.config;
        let dpr = self.viewport.dpr;
        let x = self.wrap_x(self.runner_x? + c.spacing * dpr);
        Some(self.pose(x, c.chaser_phase, c.hop_height * dpr * c.chaser_hop_ratio))
    }

    /// Visit every dot that the outlines light this frame with its jittered
    /// position and paint alpha (clamped to 1)
    fn for_each_lit(&self, mut visit: impl FnMut(f32, f32, f32, &Dot)) {
        let (Some(leader), Some(chaser)) = (self.leader(), self.chaser()) else {
            return;
        };
        let c = &self.config;
        let dpr = self.viewport.dpr;
        let scale = self.viewport.w().min(self.viewport.h()) * c.scale;
        let thickness = c.outline_thickness * dpr;
        let lead = RabbitOutline::new(leader.x, leader.y, scale, c.facing, thickness);
        let chase = RabbitOutline::new(chaser.x, chaser.y, scale, c.facing, thickness);
        let land_boost = c.land_boost_base + (1.0 - leader.arc) * c.land_boost_gain;
        let amplitude = c.jitter_amplitude * dpr;

        for dot in &self.dots {
            let angle = self.jitter_time * dot.speed + dot.phase;
            let px = dot.ox + angle.cos() * amplitude;
            let py = dot.oy + angle.sin() * amplitude;

            let m = lead.strength(px, py).max(chase.strength(px, py));
            if m <= 0.0 {
                continue;
            }
            visit(px, py, (m * dot.press * land_boost).min(1.0), dot);
        }
    }

    /// Number of dots painted this frame
    pub fn lit_count(&self) -> usize {
        let mut n = 0;
        self.for_each_lit(|_, _, _, _| n += 1);
        n
    }
}

impl Layer for CreatureMask {
    fn name(&self) -> &str {
        "creature"
    }

    fn resize(&mut self, viewport: &Viewport, rng: &mut Rng) {
        self.viewport = *viewport;
        self.make_dots(rng);

        let start = viewport.w() + self.config.entry_offset * viewport.dpr;
        let runner = self.runner_x.map_or(start, |x| self.wrap_x(x));
        self.runner_x = Some(runner);
        debug!("creature grid rebuilt: {} dots, runner at {:.0}", self.dots.len(), runner);
    }

    fn update(&mut self, frame: &Frame, _ctx: &mut UpdateContext) {
        let Some(x) = self.runner_x else {
            return;
        };
        let speed = self.config.speed * self.viewport.dpr;
        self.runner_x = Some(self.wrap_x(x + speed * frame.dt));
        self.jitter_time += self.config.jitter_rate * frame.dt;
    }

    fn render(&self, _frame: &Frame, _viewport: &Viewport, surface: &mut dyn Surface) {
        self.for_each_lit(|px, py, alpha, dot| {
            surface.set_alpha(alpha);
            draw_stitch_x(surface, px, py, dot.radius);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingSurface;

    fn build(css_w: f32, css_h: f32, dpr: f32) -> (CreatureMask, Viewport) {
        let vp = Viewport::new(css_w, css_h, dpr);
        let mut mask = CreatureMask::new(CreatureConfig::default());
        mask.resize(&vp, &mut Rng::new(17));
        (mask, vp)
    }

    fn frame(dt: f32) -> Frame {
        Frame {
            now_ms: 0.0,
            dt,
            elapsed: 0.0,
        }
    }

    #[test]
    fn test_grid_size() {
        let (mask, _) = build(700.0, 350.0, 1.0);
        assert_eq!(mask.dots().len(), 101 * 51);

        let (mask, _) = build(701.0, 350.0, 2.0);
        assert_eq!(mask.dots().len(), 102 * 51);
    }

    #[test]
    fn test_dot_parameters_in_range() {
        let (mask, vp) = build(300.0, 200.0, 2.0);
        for d in mask.dots() {
            assert!(d.radius >= 1.25 * vp.dpr && d.radius <= 2.2 * vp.dpr);
            assert!(d.press >= 0.7 && d.press <= 1.3);
            assert!(d.speed >= 0.3 && d.speed <= 1.0);
            assert!(d.ox >= -2.0 * vp.dpr && d.oy >= -2.0 * vp.dpr);
        }
    }

    #[test]
    fn test_runner_starts_off_screen_and_wraps() {
        let (mut mask, vp) = build(1000.0, 600.0, 1.0);
        assert_eq!(mask.runner_x(), Some(1260.0));

        let mut rng = Rng::new(1);
        let mut ctx = UpdateContext {
            viewport: &vp,
            rng: &mut rng,
            reduced_motion: false,
        };
        for _ in 0..2000 {
            mask.update(&frame(0.05), &mut ctx);
            let x = mask.runner_x().unwrap();
            assert!((-320.0..1320.0).contains(&x));
        }
    }

    #[test]
    fn test_hop_arc_is_one_directional() {
        let (mask, _) = build(800.0, 600.0, 1.0);
        assert!(mask.hop_arc(0.0, 0.0).abs() < 1e-6);
        assert!((mask.hop_arc(75.0, 0.0) - 1.0).abs() < 1e-6);
        for i in 0..600 {
            let arc = mask.hop_arc(i as f32 * 1.7 - 500.0, 0.7);
            assert!((0.0..=1.0).contains(&arc));
        }
    }

    #[test]
    fn test_chaser_follows_at_spacing() {
        let (mut mask, _) = build(1000.0, 600.0, 1.0);
        mask.runner_x = Some(150.0);
        let leader = mask.leader().unwrap();
        let chaser = mask.chaser().unwrap();
        assert_eq!(leader.x, 150.0);
        assert_eq!(chaser.x, 550.0);
        // Standing on the ground at a cycle boundary
        assert!(leader.arc.abs() < 1e-5);
    }

    #[test]
    fn test_vertical_pose() {
        // 1000x600 device pixels at 2x
        let (mut mask, _) = build(500.0, 300.0, 2.0);
        mask.runner_x = Some(237.0);

        let expected_y = |x: f32, phase: f32, height: f32| {
            let arc = (PI * fract(x / 300.0 + phase)).sin().max(0.0);
            600.0 * 0.93 + (x / 640.0 + phase).sin() * 40.0 - arc * height
        };

        let leader = mask.leader().unwrap();
        assert!((leader.arc - (PI * 0.79).sin()).abs() < 1e-4);
        assert!((leader.y - expected_y(237.0, 0.0, 140.0)).abs() < 1e-3, "leader y {}", leader.y);

        let chaser = mask.chaser().unwrap();
        assert_eq!(chaser.x, 1037.0);
        assert!(chaser.arc > 0.0);
        let want = expected_y(1037.0, 0.7, 140.0 * 0.92);
        assert!((chaser.y - want).abs() < 1e-3, "chaser y {} != {want}", chaser.y);
    }

    #[test]
    fn test_lit_alpha_includes_land_boost() {
        let (mut mask, vp) = build(500.0, 300.0, 2.0);
        mask.runner_x = Some(237.0);
        mask.jitter_time = 3.0;

        let leader = mask.leader().unwrap();
        let chaser = mask.chaser().unwrap();
        let scale = 600.0 * 0.0006;
        let lead = RabbitOutline::new(leader.x, leader.y, scale, -1.0, 5.0 * vp.dpr);
        let chase = RabbitOutline::new(chaser.x, chaser.y, scale, -1.0, 5.0 * vp.dpr);
        // Mid-hop: the boost sits between 0.85 and 1.03
        let boost = 0.85 + (1.0 - leader.arc) * 0.18;
        assert!(boost > 0.86 && boost < 1.02);

        let mut lit = 0;
        let mut unclamped = 0;
        mask.for_each_lit(|px, py, alpha, dot| {
            let raw = lead.strength(px, py).max(chase.strength(px, py)) * dot.press * boost;
            assert!((alpha - raw.min(1.0)).abs() < 1e-5, "alpha {alpha} != {raw}");
            lit += 1;
            if raw < 1.0 {
                unclamped += 1;
            }
        });
        assert!(lit > 0);
        assert!(unclamped > 0);
    }

    #[test]
    fn test_only_outline_dots_are_lit() {
        let (mut mask, vp) = build(1000.0, 1000.0, 1.0);
        mask.runner_x = Some(400.0);
        let lit = mask.lit_count();
        assert!(lit > 0);
        assert!(lit < mask.dots().len() / 10);

        let mut surface = RecordingSurface::new(vp.width, vp.height);
        mask.render(&frame(0.0), &vp, &mut surface);
        assert_eq!(surface.segments().len(), lit * 2);
        assert!(surface.segments().iter().all(|s| s.alpha > 0.0 && s.alpha <= 1.0));
    }

    #[test]
    fn test_resize_regenerates_grid() {
        let (mut mask, _) = build(400.0, 300.0, 1.0);
        let before = mask.dots().to_vec();
        mask.resize(&Viewport::new(800.0, 300.0, 1.0), &mut Rng::new(99));
        assert!(mask.dots().len() > before.len());
        assert!(mask.dots().iter().all(|d| !before.contains(d)));
    }
}
