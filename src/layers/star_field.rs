use super::Layer;
use crate::clock::Frame;
use crate::config::{BandConfig, StarFieldConfig, TwinkleTuning};
use crate::display::Surface;
use crate::stitch::{draw_glyph, Glyph};
use crate::util::Rng;
use crate::viewport::Viewport;
use log::debug;
use std::f32::consts::TAU;

/// A fixed star. Nothing here changes after creation; brightness and size
/// are recomputed from the clock every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    /// Base half-width in device pixels
    pub size: f32,
    pub base_alpha: f32,
    pub twinkle: f32,
    pub phase: f32,
    pub glint_speed: f32,
    pub glint_phase: f32,
    pub glyph: Glyph,
}

impl Star {
    fn spawn(band: &BandConfig, viewport: &Viewport, rng: &mut Rng) -> Self {
        Self {
            x: band.x.sample(viewport.w(), rng),
            y: band.y.sample(viewport.h(), rng),
            size: band.size.sample(rng) * viewport.dpr,
            twinkle: band.twinkle.sample(rng),
            phase: rng.range_f32(0.0, TAU),
            base_alpha: band.base_alpha.sample(rng),
            glint_phase: rng.range_f32(0.0, TAU),
            glint_speed: band.glint_speed.sample(rng),
            glyph: band.glyph,
        }
    }

    /// Alpha and size at `now_ms`
    ///
    /// Host timestamps grow large, so the phase is evaluated in f64.
    pub fn appearance(&self, now_ms: f64, tuning: &TwinkleTuning) -> (f32, f32) {
        let tw_angle = now_ms * tuning.twinkle_rate * f64::from(self.twinkle) + f64::from(self.phase);
        let gl_angle =
            now_ms * tuning.glint_rate * f64::from(self.glint_speed) + f64::from(self.glint_phase);

        let tw = ((tw_angle.sin() + 1.0) / 2.0) as f32;
        let gl = ((gl_angle.sin() + 1.0) / 2.0) as f32;
        let pulse = gl.powi(tuning.glint_exponent);

        let alpha = self.base_alpha * (tuning.alpha_floor + tw * tuning.twinkle_alpha)
            + pulse * tuning.glint_alpha;
        let size =
            self.size * (tuning.size_floor + tw * tuning.twinkle_size + pulse * tuning.glint_size);

        (alpha.clamp(0.0, tuning.alpha_max), size)
    }
}

/// Banded field of twinkling stars
pub struct StarField {
    config: StarFieldConfig,
    stars: Vec<Star>,
    /// Stars generated per band for the current size
    band_counts: Vec<usize>,
}

impl StarField {
    pub fn new(config: StarFieldConfig) -> Self {
        Self {
            config,
            stars: Vec::new(),
            band_counts: Vec::new(),
        }
    }

    /// Throw away every star and scatter a fresh set for `viewport`
    pub fn regenerate(&mut self, viewport: &Viewport, rng: &mut Rng) {
        self.stars.clear();
        self.band_counts.clear();
        if viewport.is_empty() {
            return;
        }

        for band in &self.config.bands {
            let count = band.count.count(viewport);
            self.stars.reserve(count);
            for _ in 0..count {
                self.stars.push(Star::spawn(band, viewport, rng));
            }
            self.band_counts.push(count);
        }
        debug!(
            "star field regenerated: {} stars in bands {:?}",
            self.stars.len(),
            self.band_counts
        );
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn band_counts(&self) -> &[usize] {
        &self.band_counts
    }

    pub fn tuning(&self) -> &TwinkleTuning {
        &self.config.tuning
    }
}

impl Layer for StarField {
    fn name(&self) -> &str {
        "stars"
    }

    fn resize(&mut self, viewport: &Viewport, rng: &mut Rng) {
        self.regenerate(viewport, rng);
    }

    fn render(&self, frame: &Frame, _viewport: &Viewport, surface: &mut dyn Surface) {
        let tuning = &self.config.tuning;
        for star in &self.stars {
            let (alpha, size) = star.appearance(frame.now_ms, tuning);
            surface.set_alpha(alpha);
            draw_glyph(surface, star.glyph, star.x, star.y, size);
        }
    }
}
