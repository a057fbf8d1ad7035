use super::{Layer, UpdateContext};
use crate::clock::Frame;
use crate::config::{ExitLimits, FlightConfig, Launch, Scheduling, ShooterConfig};
use crate::display::Surface;
use crate::math::Vec2;
use crate::stitch::{draw_glyph, draw_stitch_x};
use crate::util::Rng;
use crate::viewport::Viewport;
use log::{debug, trace};
use std::f32::consts::PI;

/// A stitched meteor with a trail, alive for under a second and a half
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShootingStar {
    pub pos: Vec2,
    /// Device pixels per second
    pub vel: Vec2,
    /// Seconds since launch
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub trail: usize,
}

impl ShootingStar {
    pub fn launch(flight: &FlightConfig, viewport: &Viewport, rng: &mut Rng) -> Self {
        let dpr = viewport.dpr;
        let pos = Vec2::new(
            flight.origin_x.sample(viewport.w(), rng),
            flight.origin_y.sample(viewport.h(), rng),
        );
        let vel = match flight.launch {
            Launch::Polar { speed, angle } => {
                let speed = speed.sample(rng) * dpr;
                let angle = angle.sample(rng) * PI;
                Vec2::new(angle.cos() * speed, angle.sin() * speed)
            },
            Launch::Components { vx, vy } => {
                Vec2::new(vx.sample(rng) * dpr, vy.sample(rng) * dpr)
            },
        };

        Self {
            pos,
            vel,
            life: 0.0,
            max_life: flight.max_life.sample(rng),
            size: flight.size.sample(rng) * dpr,
            trail: flight.trail.sample(rng).floor().max(0.0) as usize,
        }
    }

    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.life += dt;
    }

    /// Remaining brightness, 1 at launch and 0 at the end of its life
    pub fn fade(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (1.0 - self.life / self.max_life).clamp(0.0, 1.0)
    }

    pub fn is_expired(&self) -> bool {
        self.life > self.max_life
    }

    pub fn has_exited(&self, exit: &ExitLimits, viewport: &Viewport) -> bool {
        let (w, h) = (viewport.w(), viewport.h());
        exit.min_x.is_some_and(|e| self.pos.x < e.resolve(w))
            || exit.max_x.is_some_and(|e| self.pos.x > e.resolve(w))
            || exit.min_y.is_some_and(|e| self.pos.y < e.resolve(h))
            || exit.max_y.is_some_and(|e| self.pos.y > e.resolve(h))
    }

    pub fn should_retire(&self, exit: &ExitLimits, viewport: &Viewport) -> bool {
        self.is_expired() || self.has_exited(exit, viewport)
    }

    /// Trail stitches from the head backwards, then the sparkle head
    pub fn draw(&self, flight: &FlightConfig, surface: &mut dyn Surface) {
        let fade = self.fade();
        let trail = self.trail.max(1) as f32;

        for i in 0..self.trail {
            let t = i as f32 / trail;
            let p = self.pos - self.vel * (t * flight.trail_spacing);
            surface.set_alpha((1.0 - t) * flight.trail_alpha * fade);
            draw_stitch_x(
                surface,
                p.x,
                p.y,
                self.size * (flight.trail_head - t * flight.trail_taper),
            );
        }

        surface.set_alpha(flight.head_alpha * fade);
        draw_glyph(
            surface,
            flight.head_glyph,
            self.pos.x,
            self.pos.y,
            self.size * flight.head_scale,
        );
    }
}

/// One spawner and the stars it has in flight
///
/// A single slot is `Idle` (a pending launch time) or `Flying` (one star);
/// the next launch is scheduled when the star retires. A pool keeps its own
/// cadence and launches into a bounded list regardless of what is flying.
#[derive(Debug, Clone)]
pub struct ShooterSlot {
    config: ShooterConfig,
    flying: Vec<ShootingStar>,
    next_spawn_at: Option<f64>,
    launched: u64,
    retired: u64,
}

impl ShooterSlot {
    pub fn new(config: ShooterConfig) -> Self {
        Self {
            config,
            flying: Vec::new(),
            next_spawn_at: None,
            launched: 0,
            retired: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn flying(&self) -> &[ShootingStar] {
        &self.flying
    }

    /// Pending launch time in host milliseconds, if one is scheduled
    pub fn next_spawn_at(&self) -> Option<f64> {
        self.next_spawn_at
    }

    pub fn launched(&self) -> u64 {
        self.launched
    }

    pub fn retired(&self) -> u64 {
        self.retired
    }

    fn launch(&mut self, viewport: &Viewport, rng: &mut Rng) {
        let capacity = match self.config.scheduling {
            Scheduling::Single { .. } => 1,
            Scheduling::Pool { capacity, .. } => capacity,
        };
        if self.flying.len() >= capacity {
            trace!("{}: pool full, launch dropped", self.config.name);
            return;
        }

        let star = ShootingStar::launch(&self.config.flight, viewport, rng);
        debug!(
            "{}: launch at ({:.0}, {:.0}) vel ({:.0}, {:.0}) life {:.2}s trail {}",
            self.config.name, star.pos.x, star.pos.y, star.vel.x, star.vel.y, star.max_life, star.trail
        );
        self.flying.push(star);
        self.launched += 1;
    }

    fn schedule(&mut self, frame: &Frame, ctx: &mut UpdateContext) {
        let now = frame.now_ms;
        match self.config.scheduling {
            Scheduling::Single {
                first_delay_ms,
                delay_ms,
            } => {
                if !self.flying.is_empty() {
                    return;
                }
                let first = self.launched == 0;
                let due = *self.next_spawn_at.get_or_insert_with(|| {
                    let range = if first {
                        first_delay_ms.unwrap_or(delay_ms)
                    } else {
                        delay_ms
                    };
                    now + f64::from(range.sample(ctx.rng))
                });
                if now >= due && !ctx.reduced_motion {
                    self.launch(ctx.viewport, ctx.rng);
                    self.next_spawn_at = None;
                }
            },
            Scheduling::Pool {
                delay_ms,
                burst_chance,
                ..
            } => {
                let due = *self
                    .next_spawn_at
                    .get_or_insert_with(|| now + f64::from(delay_ms.sample(ctx.rng)));
                if now >= due && !ctx.reduced_motion {
                    self.launch(ctx.viewport, ctx.rng);
                    if ctx.rng.chance(burst_chance) {
                        self.launch(ctx.viewport, ctx.rng);
                    }
                    self.next_spawn_at = Some(now + f64::from(delay_ms.sample(ctx.rng)));
                }
            },
        }
    }

    pub fn update(&mut self, frame: &Frame, ctx: &mut UpdateContext) {
        self.schedule(frame, ctx);

        let exit = self.config.flight.exit;
        let viewport = ctx.viewport;
        let before = self.flying.len();
        self.flying.retain_mut(|star| {
            star.advance(frame.dt);
            let retire = star.should_retire(&exit, viewport);
            if retire {
                trace!(
                    "retired after {:.2}s of {:.2}s at ({:.0}, {:.0})",
                    star.life,
                    star.max_life,
                    star.pos.x,
                    star.pos.y
                );
            }
            !retire
        });

        let retired = before - self.flying.len();
        if retired == 0 {
            return;
        }
        self.retired += retired as u64;

        if let Scheduling::Single { delay_ms, .. } = self.config.scheduling {
            self.next_spawn_at = Some(frame.now_ms + f64::from(delay_ms.sample(ctx.rng)));
        }
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        for star in &self.flying {
            star.draw(&self.config.flight, surface);
        }
    }
}

/// All shooting-star spawners of a page
pub struct ShootingStars {
    slots: Vec<ShooterSlot>,
}

impl ShootingStars {
    pub fn new(configs: &[ShooterConfig]) -> Self {
        Self {
            slots: configs.iter().cloned().map(ShooterSlot::new).collect(),
        }
    }

    pub fn slots(&self) -> &[ShooterSlot] {
        &self.slots
    }

    pub fn in_flight(&self) -> usize {
        self.slots.iter().map(|s| s.flying().len()).sum()
    }
}

impl Layer for ShootingStars {
    fn name(&self) -> &str {
        "shooting_stars"
    }

    /// Stars in flight keep going; exit limits are re-evaluated against the
    /// new size on the next update.
    fn resize(&mut self, _viewport: &Viewport, _rng: &mut Rng) {}

    fn update(&mut self, frame: &Frame, ctx: &mut UpdateContext) {
        for slot in &mut self.slots {
            slot.update(frame, ctx);
        }
    }

    fn render(&self, _frame: &Frame, _viewport: &Viewport, surface: &mut dyn Surface) {
        for slot in &self.slots {
            slot.render(surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EngineConfig, Extent, ExtentRange, SpawnRange, Variant};
    use crate::display::Segment;
    use crate::display::RecordingSurface;

    fn frame(now_ms: f64, dt: f32) -> Frame {
        Frame {
            now_ms,
            dt,
            elapsed: 0.0,
        }
    }

    /// A slot that launches immediately, lives exactly `max_life` and never exits
    fn immortal_slot(max_life: f32) -> ShooterSlot {
        let mut config = EngineConfig::preset(Variant::Home).shooters.remove(0);
        config.scheduling = Scheduling::Single {
            first_delay_ms: Some(SpawnRange::fixed(0.0)),
            delay_ms: SpawnRange::fixed(5000.0),
        };
        config.flight.max_life = SpawnRange::fixed(max_life);
        config.flight.exit = ExitLimits::default();
        ShooterSlot::new(config)
    }

    #[test]
    fn test_star_retires_after_fourth_tick() {
        let vp = Viewport::new(1000.0, 1000.0, 1.0);
        let mut rng = Rng::new(11);
        let mut slot = immortal_slot(1.0);

        let mut step = |slot: &mut ShooterSlot, now: f64, dt: f32| {
            let mut ctx = UpdateContext {
                viewport: &vp,
                rng: &mut rng,
                reduced_motion: false,
            };
            slot.update(&frame(now, dt), &mut ctx);
        };

        step(&mut slot, 0.0, 0.0);
        assert_eq!(slot.flying().len(), 1);
        assert_eq!(slot.flying()[0].life, 0.0);

        let mut last_life = 0.0;
        for i in 1..=3 {
            step(&mut slot, f64::from(i) * 300.0, 0.3);
            assert_eq!(slot.flying().len(), 1, "retired early on tick {i}");
            assert!(slot.flying()[0].life >= last_life);
            last_life = slot.flying()[0].life;
        }

        step(&mut slot, 1200.0, 0.3);
        assert!(slot.flying().is_empty());
        assert_eq!(slot.retired(), 1);
        // Rescheduled on retirement
        assert_eq!(slot.next_spawn_at(), Some(6200.0));
    }

    #[test]
    fn test_slot_retires_on_exit_and_reschedules() {
        let vp = Viewport::new(1000.0, 1000.0, 1.0);
        let mut rng = Rng::new(6);
        let mut slot = immortal_slot(100.0);
        slot.config.flight.origin_x = ExtentRange::new(Extent::of(0.5), Extent::of(0.5));
        slot.config.flight.origin_y = ExtentRange::new(Extent::of(0.5), Extent::of(0.5));
        slot.config.flight.launch = Launch::Components {
            vx: SpawnRange::fixed(600.0),
            vy: SpawnRange::fixed(0.0),
        };
        slot.config.flight.exit = ExitLimits {
            max_x: Some(Extent::new(1.0, 180.0)),
            ..ExitLimits::default()
        };

        let mut ctx = UpdateContext {
            viewport: &vp,
            rng: &mut rng,
            reduced_motion: false,
        };
        slot.update(&frame(0.0, 0.0), &mut ctx);
        assert_eq!(slot.launched(), 1);

        // 30 px per tick from x = 500: still inside after 22 ticks
        for i in 1..=22 {
            slot.update(&frame(f64::from(i) * 50.0, 0.05), &mut ctx);
            assert_eq!(slot.flying().len(), 1, "retired early on tick {i}");
            assert!(slot.flying()[0].pos.x <= 1180.0);
            assert_eq!(slot.next_spawn_at(), None);
        }

        slot.update(&frame(1150.0, 0.05), &mut ctx);
        assert!(slot.flying().is_empty());
        assert_eq!(slot.retired(), 1);
        assert_eq!(slot.next_spawn_at(), Some(6150.0));
    }

    #[test]
    fn test_exit_limits() {
        let vp = Viewport::new(1000.0, 500.0, 1.0);
        let exit = ExitLimits {
            max_x: Some(Extent::new(1.0, 180.0)),
            max_y: Some(Extent::of(0.8)),
            ..ExitLimits::default()
        };
        let mut star = ShootingStar {
            pos: Vec2::new(1170.0, 100.0),
            vel: Vec2::new(100.0, 0.0),
            life: 0.0,
            max_life: 10.0,
            size: 2.0,
            trail: 30,
        };
        assert!(!star.has_exited(&exit, &vp));
        star.advance(0.2);
        assert!(star.has_exited(&exit, &vp));

        star.pos = Vec2::new(500.0, 401.0);
        assert!(star.has_exited(&exit, &vp));
        star.pos = Vec2::new(-5000.0, -5000.0);
        assert!(!star.has_exited(&exit, &vp));
    }

    #[test]
    fn test_first_launch_waits_for_delay() {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        let mut rng = Rng::new(2);
        let mut config = EngineConfig::preset(Variant::About).shooters.remove(0);
        config.scheduling = Scheduling::Single {
            first_delay_ms: Some(SpawnRange::fixed(3000.0)),
            delay_ms: SpawnRange::fixed(6000.0),
        };
        let mut slot = ShooterSlot::new(config);

        for now in [1000.0, 2000.0, 2999.0] {
            let mut ctx = UpdateContext {
                viewport: &vp,
                rng: &mut rng,
                reduced_motion: false,
            };
            slot.update(&frame(now, 0.016), &mut ctx);
            assert!(slot.flying().is_empty());
        }
        assert_eq!(slot.next_spawn_at(), Some(4000.0));

        let mut ctx = UpdateContext {
            viewport: &vp,
            rng: &mut rng,
            reduced_motion: false,
        };
        slot.update(&frame(4000.0, 0.016), &mut ctx);
        assert_eq!(slot.flying().len(), 1);
        assert_eq!(slot.next_spawn_at(), None);
    }

    #[test]
    fn test_reduced_motion_blocks_launch() {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        let mut rng = Rng::new(4);
        let mut slot = immortal_slot(1.0);
        let mut ctx = UpdateContext {
            viewport: &vp,
            rng: &mut rng,
            reduced_motion: true,
        };
        for i in 0..100 {
            slot.update(&frame(f64::from(i) * 100.0, 0.1), &mut ctx);
        }
        assert_eq!(slot.launched(), 0);
        ctx.reduced_motion = false;
        slot.update(&frame(10_000.0, 0.016), &mut ctx);
        assert_eq!(slot.launched(), 1);
    }

    #[test]
    fn test_pool_is_bounded() {
        let vp = Viewport::new(1200.0, 800.0, 1.0);
        let mut rng = Rng::new(8);
        let mut config = EngineConfig::preset(Variant::Projects).shooters.remove(0);
        config.scheduling = Scheduling::Pool {
            capacity: 3,
            delay_ms: SpawnRange::fixed(0.0),
            burst_chance: 1.0,
        };
        config.flight.exit = ExitLimits::default();
        config.flight.max_life = SpawnRange::fixed(100.0);
        let mut slot = ShooterSlot::new(config);

        let mut ctx = UpdateContext {
            viewport: &vp,
            rng: &mut rng,
            reduced_motion: false,
        };
        for i in 0..10 {
            slot.update(&frame(f64::from(i) * 16.0, 0.016), &mut ctx);
            assert!(slot.flying().len() <= 3);
        }
        assert_eq!(slot.flying().len(), 3);
    }

    #[test]
    fn test_pool_bursts_and_launch_ranges() {
        let vp = Viewport::new(1200.0, 800.0, 2.0);
        let mut rng = Rng::new(21);
        let config = EngineConfig::preset(Variant::Projects).shooters.remove(0);
        let mut slot = ShooterSlot::new(config);

        let mut now = 0.0;
        let mut ctx = UpdateContext {
            viewport: &vp,
            rng: &mut rng,
            reduced_motion: false,
        };
        let mut max_in_flight = 0;
        while now < 120_000.0 {
            slot.update(&frame(now, 0.016), &mut ctx);
            max_in_flight = max_in_flight.max(slot.flying().len());
            for star in slot.flying() {
                assert!(star.life <= star.max_life);
                assert!((22..40).contains(&star.trail));
                // Down-right cone
                assert!(star.vel.x > 0.0 && star.vel.y > 0.0);
            }
            now += 16.0;
        }
        // Cadence of 0.8 to 1.8 s over two minutes
        assert!(slot.launched() >= 50 && slot.launched() <= 2 * 150);
        assert!(max_in_flight >= 2);
    }

    #[test]
    fn test_draw_counts_and_fade() {
        let flight = EngineConfig::preset(Variant::Home).shooters[0].flight;
        let star = ShootingStar {
            pos: Vec2::new(300.0, 100.0),
            vel: Vec2::new(1000.0, -200.0),
            life: 0.5,
            max_life: 1.0,
            size: 2.0,
            trail: 30,
        };
        let mut surface = RecordingSurface::new(800, 600);
        star.draw(&flight, &mut surface);

        let segs = surface.segments();
        assert_eq!(segs.len(), 30 * 2 + flight.head_glyph.segment_count());
        // First trail stitch at the head with alpha 0.7 * 0.5
        assert!((segs[0].alpha - 0.35).abs() < 1e-6);
        // Head drawn at 0.9 * 0.5
        assert!((segs[segs.len() - 1].alpha - 0.45).abs() < 1e-6);
        // Trail alpha falls off toward the tail
        assert!(segs[58].alpha < segs[0].alpha);
    }

    fn assert_stitch(seg: &Segment, cx: f32, cy: f32, half: f32) {
        let eps = 1e-3;
        assert!((seg.x0 - (cx - half)).abs() < eps, "x0 {} != {}", seg.x0, cx - half);
        assert!((seg.y0 - (cy - half)).abs() < eps, "y0 {} != {}", seg.y0, cy - half);
        assert!((seg.x1 - (cx + half)).abs() < eps, "x1 {} != {}", seg.x1, cx + half);
        assert!((seg.y1 - (cy + half)).abs() < eps, "y1 {} != {}", seg.y1, cy + half);
    }

    #[test]
    fn test_trail_steps_back_and_tapers() {
        let flight = EngineConfig::preset(Variant::Home).shooters[0].flight;
        let star = ShootingStar {
            pos: Vec2::new(300.0, 100.0),
            vel: Vec2::new(1000.0, -200.0),
            life: 0.0,
            max_life: 1.0,
            size: 2.0,
            trail: 30,
        };
        let mut surface = RecordingSurface::new(800, 600);
        star.draw(&flight, &mut surface);
        let segs = surface.segments();

        // t = 0: on the head, half-width 2·0.95
        assert_stitch(&segs[0], 300.0, 100.0, 1.9);
        // t = 0.5: 0.035 s back along the velocity, 2·(0.95 − 0.5·0.45)
        assert_stitch(&segs[30], 265.0, 107.0, 1.45);
        // t = 29/30: the tail
        let t = 29.0 / 30.0;
        let back = t * 0.07;
        assert_stitch(
            &segs[58],
            300.0 - 1000.0 * back,
            100.0 + 200.0 * back,
            2.0 * (0.95 - t * 0.45),
        );
        // Sparkle head at 1.35× the star size
        assert_stitch(&segs[60], 300.0, 100.0, 2.7);
    }
}
