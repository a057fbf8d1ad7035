//! The background animation engine
//!
//! One `Engine` per canvas. The host feeds it sizes and timestamps; the
//! engine owns every piece of animation state and paints a full frame into
//! whatever `Surface` it is handed.

use crate::clock::{Frame, FrameClock};
use crate::config::{EngineConfig, Variant};
use crate::display::Surface;
use crate::gallery::Gallery;
use crate::layers::{CreatureMask, Layer, ShootingStars, StarField, UpdateContext};
use crate::util::Rng;
use crate::viewport::Viewport;
use log::debug;

/// Layers in back-to-front order; absent ones are disabled for the page
struct LayerStack {
    stars: Option<StarField>,
    shooting: Option<ShootingStars>,
    creature: Option<CreatureMask>,
    gallery: Option<Gallery>,
}

impl LayerStack {
    fn from_config(config: &EngineConfig) -> Self {
        Self {
            stars: config.stars.clone().map(StarField::new),
            shooting: (!config.shooters.is_empty()).then(|| ShootingStars::new(&config.shooters)),
            creature: config.creature.map(CreatureMask::new),
            gallery: config.gallery.clone().map(Gallery::new),
        }
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut dyn Layer> + '_ {
        [
            self.stars.as_mut().map(|l| l as &mut dyn Layer),
            self.shooting.as_mut().map(|l| l as &mut dyn Layer),
            self.creature.as_mut().map(|l| l as &mut dyn Layer),
            self.gallery.as_mut().map(|l| l as &mut dyn Layer),
        ]
        .into_iter()
        .flatten()
    }
}

pub struct Engine {
    config: EngineConfig,
    clock: FrameClock,
    rng: Rng,
    viewport: Viewport,
    reduced_motion: bool,
    layers: LayerStack,
    frames: u64,
}

impl Engine {
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        debug!("engine: {} preset, seed {seed:#x}", config.variant);
        Self {
            clock: FrameClock::new(config.dt_max),
            rng: Rng::new(seed),
            viewport: Viewport::default(),
            reduced_motion: false,
            layers: LayerStack::from_config(&config),
            frames: 0,
            config,
        }
    }

    /// Engine with a built-in page preset
    pub fn with_preset(variant: Variant, seed: u64) -> Self {
        Self::new(EngineConfig::preset(variant), seed)
    }

    /// New canvas size. Stars and the dot grid are regenerated at once; the
    /// gallery schedules its own debounced relayout.
    pub fn resize(&mut self, css_width: f32, css_height: f32, device_pixel_ratio: f32) {
        self.viewport = Viewport::new(css_width, css_height, device_pixel_ratio);
        debug!(
            "resize: {}x{} css @{}x -> {}x{} device",
            self.viewport.css_width,
            self.viewport.css_height,
            self.viewport.dpr,
            self.viewport.width,
            self.viewport.height
        );
        for layer in self.layers.iter_mut() {
            layer.resize(&self.viewport, &mut self.rng);
        }
    }

    /// Stop launching shooting stars. Stars already in flight finish.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        if reduced != self.reduced_motion {
            debug!("reduced motion {}", if reduced { "on" } else { "off" });
        }
        self.reduced_motion = reduced;
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Advance to `now_ms` and paint one frame
    ///
    /// Returns `None` without touching the surface or the clock when there is
    /// nothing to draw on.
    pub fn tick(&mut self, now_ms: f64, surface: &mut dyn Surface) -> Option<Frame> {
        if self.viewport.is_empty() || surface.width() == 0 || surface.height() == 0 {
            return None;
        }

        let frame = self.clock.tick(now_ms);
        self.frames += 1;

        surface.clear();
        surface.set_stroke(self.config.stroke.scaled(self.viewport.dpr));
        surface.set_alpha(1.0);

        let mut ctx = UpdateContext {
            viewport: &self.viewport,
            rng: &mut self.rng,
            reduced_motion: self.reduced_motion,
        };
        for layer in self.layers.iter_mut() {
            layer.update(&frame, &mut ctx);
            layer.render(&frame, &self.viewport, surface);
        }

        surface.set_alpha(1.0);
        Some(frame)
    }

    pub fn mark_fonts_ready(&mut self) {
        if let Some(gallery) = self.layers.gallery.as_mut() {
            gallery.mark_fonts_ready();
        }
    }

    pub fn mark_images_ready(&mut self) {
        if let Some(gallery) = self.layers.gallery.as_mut() {
            gallery.mark_images_ready();
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Frames painted so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn stars(&self) -> Option<&StarField> {
        self.layers.stars.as_ref()
    }

    pub fn shooting(&self) -> Option<&ShootingStars> {
        self.layers.shooting.as_ref()
    }

    pub fn creature(&self) -> Option<&CreatureMask> {
        self.layers.creature.as_ref()
    }

    pub fn gallery(&self) -> Option<&Gallery> {
        self.layers.gallery.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::RecordingSurface;

    #[test]
    fn test_tick_before_resize_is_noop() {
        let mut engine = Engine::with_preset(Variant::Home, 1);
        let mut surface = RecordingSurface::new(100, 100);
        assert!(engine.tick(0.0, &mut surface).is_none());
        assert_eq!(surface.clears(), 0);
        assert_eq!(engine.frames(), 0);
    }

    #[test]
    fn test_zero_sized_surface_is_noop() {
        let mut engine = Engine::with_preset(Variant::Home, 1);
        engine.resize(800.0, 600.0, 1.0);
        let mut surface = RecordingSurface::new(0, 600);
        assert!(engine.tick(0.0, &mut surface).is_none());
    }

    #[test]
    fn test_tick_sets_scaled_stroke() {
        let mut engine = Engine::with_preset(Variant::Work, 1);
        engine.resize(800.0, 600.0, 2.0);
        let mut surface = RecordingSurface::new(1600, 1200);
        let frame = engine.tick(0.0, &mut surface).unwrap();
        assert_eq!(frame.dt, 0.0);
        assert_eq!(surface.clears(), 1);
        assert!((surface.stroke().line_width - 0.7).abs() < 1e-6);
        assert_eq!(surface.stroke().opacity, 0.55);
        assert_eq!(surface.alpha(), 1.0);
    }

    #[test]
    fn test_layers_follow_preset() {
        let home = Engine::with_preset(Variant::Home, 1);
        assert!(home.stars().is_some() && home.shooting().is_some() && home.creature().is_some());
        assert!(home.gallery().is_none());

        let about = Engine::with_preset(Variant::About, 1);
        assert!(about.stars().is_none() && about.creature().is_none());
        assert_eq!(about.shooting().map(|s| s.slots().len()), Some(2));

        let work = Engine::with_preset(Variant::Work, 1);
        assert!(work.shooting().is_none() && work.gallery().is_some());
    }
}
