//! Work-page gallery stage
//!
//! Tiles stay hidden until the readiness gate opens (fonts, then images, each
//! with a timeout), then are placed in one pass and revealed together. A
//! viewport resize hides them again after a debounce and re-runs the layout.

mod packer;
mod timing;

pub use packer::{Placement, PlacementKind, Rect, Size, TilePacker};
pub use timing::{Debouncer, ReadinessGate, StageOutcome};

use crate::clock::Frame;
use crate::config::{GalleryConfig, TileSpec};
use crate::display::Surface;
use crate::layers::{Layer, UpdateContext};
use crate::stitch::draw_stitched_rect;
use crate::util::Rng;
use crate::viewport::Viewport;
use log::{debug, info};

const FONTS: &str = "fonts";
const IMAGES: &str = "images";

/// Running-stitch outline, CSS pixels
const OUTLINE_STITCH: f32 = 6.0;
const OUTLINE_GAP: f32 = 4.0;
const OUTLINE_ALPHA: f32 = 0.8;

/// A tile and where it currently sits on the stage (CSS pixels, stage space)
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub spec: TileSpec,
    pub placement: Option<Placement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting on fonts and images
    Waiting,
    /// Hidden, laid out on the next update
    LayoutPending,
    Shown,
}

pub struct Gallery {
    config: GalleryConfig,
    packer: TilePacker,
    tiles: Vec<Tile>,
    gate: ReadinessGate,
    debounce: Debouncer,
    phase: Phase,
    viewport: Viewport,
    resize_seen: bool,
    layouts: u32,
}

impl Gallery {
    pub fn new(config: GalleryConfig) -> Self {
        let mut gate = ReadinessGate::new([
            (FONTS, config.font_timeout_ms),
            (IMAGES, config.image_timeout_ms),
        ]);
        if !config.tiles.iter().any(|t| t.has_image) {
            gate.mark_ready(IMAGES);
        }

        Self {
            packer: TilePacker::from_config(&config),
            tiles: config
                .tiles
                .iter()
                .cloned()
                .map(|spec| Tile {
                    spec,
                    placement: None,
                })
                .collect(),
            gate,
            debounce: Debouncer::new(config.resize_debounce_ms),
            phase: Phase::Waiting,
            viewport: Viewport::default(),
            resize_seen: false,
            layouts: 0,
            config,
        }
    }

    pub fn mark_fonts_ready(&mut self) {
        self.gate.mark_ready(FONTS);
    }

    pub fn mark_images_ready(&mut self) {
        self.gate.mark_ready(IMAGES);
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Shown
    }

    /// Completed layout passes
    pub fn layouts(&self) -> u32 {
        self.layouts
    }

    pub fn gate(&self) -> &ReadinessGate {
        &self.gate
    }

    /// Stage area in CSS pixels: the viewport inset by the stage margin
    pub fn stage(&self) -> Size {
        let m = self.config.stage_margin * 2.0;
        Size::new(
            (self.viewport.css_width - m).max(0.0),
            (self.viewport.css_height - m).max(0.0),
        )
    }

    fn layout(&mut self, rng: &mut Rng) {
        let sizes: Vec<Size> = self
            .tiles
            .iter()
            .map(|t| Size::new(t.spec.width, t.spec.height))
            .collect();
        let placements = self.packer.layout(self.stage(), &sizes, rng);

        let fallbacks = placements
            .iter()
            .filter(|p| p.kind == PlacementKind::Fallback)
            .count();
        for (tile, placement) in self.tiles.iter_mut().zip(placements) {
            tile.placement = Some(placement);
        }
        self.layouts += 1;
        self.phase = Phase::Shown;

        let stage = self.stage();
        info!(
            "gallery laid out {} tiles on {:.0}x{:.0} stage ({} fallback)",
            self.tiles.len(),
            stage.w,
            stage.h,
            fallbacks
        );
    }
}

impl Layer for Gallery {
    fn name(&self) -> &str {
        "gallery"
    }

    /// The initial size is used by the first layout; later sizes go through
    /// the debounce
    fn resize(&mut self, viewport: &Viewport, _rng: &mut Rng) {
        self.viewport = *viewport;
        if self.layouts > 0 || self.phase == Phase::LayoutPending {
            self.resize_seen = true;
        }
    }

    fn update(&mut self, frame: &Frame, ctx: &mut UpdateContext) {
        let now = frame.now_ms;

        if self.phase == Phase::LayoutPending {
            self.layout(ctx.rng);
        }

        if self.gate.poll(now) {
            debug!("gallery ready: {:?}", self.gate.outcomes());
            self.phase = Phase::LayoutPending;
        }

        if std::mem::take(&mut self.resize_seen) {
            self.debounce.trigger(now);
        }
        if self.debounce.poll(now) {
            debug!("gallery relayout after resize");
            self.phase = Phase::LayoutPending;
        }
    }

    fn render(&self, _frame: &Frame, viewport: &Viewport, surface: &mut dyn Surface) {
        if self.phase != Phase::Shown {
            return;
        }
        let dpr = viewport.dpr;
        let margin = self.config.stage_margin;

        surface.set_alpha(OUTLINE_ALPHA);
        for placement in self.tiles.iter().filter_map(|t| t.placement) {
            let r = placement.rect;
            draw_stitched_rect(
                surface,
                (margin + r.x) * dpr,
                (margin + r.y) * dpr,
                r.w * dpr,
                r.h * dpr,
                OUTLINE_STITCH * dpr,
                OUTLINE_GAP * dpr,
            );
        }
    }
}
