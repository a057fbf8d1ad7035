//! Random non-overlapping placement of gallery tiles

use crate::config::GalleryConfig;
use crate::util::Rng;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

/// Axis-aligned rectangle, origin top-left
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// True unless the boxes are separated by more than `pad` on some axis
    pub fn overlaps_padded(&self, other: &Self, pad: f32) -> bool {
        !(self.x + self.w + pad < other.x
            || self.x > other.x + other.w + pad
            || self.y + self.h + pad < other.y
            || self.y > other.y + other.h + pad)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    /// Found by random search; clear of every other random placement
    Random,
    /// Grid slot used after the trial budget ran out; may overlap
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    pub kind: PlacementKind,
}

/// Trial-and-error tile placement with a grid fallback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePacker {
    pub inner_padding: f32,
    pub gap: f32,
    pub trial_budget: usize,
    pub fallback_columns: usize,
    pub fallback_rows: usize,
}

impl Default for TilePacker {
    fn default() -> Self {
        Self::from_config(&GalleryConfig::default())
    }
}

impl TilePacker {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            inner_padding: config.inner_padding,
            gap: config.tile_gap,
            trial_budget: config.trial_budget,
            fallback_columns: config.fallback_columns.max(1),
            fallback_rows: config.fallback_rows.max(1),
        }
    }

    /// Place `tiles` in order inside a `container` whose origin is (0, 0)
    ///
    /// Each tile gets up to `trial_budget` uniform random positions; the first
    /// one whose gap-padded box clears every earlier random placement wins.
    /// Otherwise it goes to its fallback grid slot, which is not checked for
    /// overlap and does not block later tiles.
    pub fn layout(&self, container: Size, tiles: &[Size], rng: &mut Rng) -> Vec<Placement> {
        let pad = self.inner_padding;
        let mut placed: Vec<Rect> = Vec::with_capacity(tiles.len());
        let mut out = Vec::with_capacity(tiles.len());

        for (idx, tile) in tiles.iter().enumerate() {
            let x_max = pad.max(container.w - tile.w - pad);
            let y_max = pad.max(container.h - tile.h - pad);

            let found = (0..self.trial_budget).find_map(|_| {
                let x = rng.range_f32(pad, x_max);
                let y = rng.range_f32(pad, y_max);
                let cand = Rect::new(x, y, tile.w, tile.h);
                let clear = !placed.iter().any(|p| cand.overlaps_padded(p, self.gap));
                clear.then_some(cand)
            });

            let placement = match found {
                Some(rect) => {
                    placed.push(rect);
                    Placement {
                        rect,
                        kind: PlacementKind::Random,
                    }
                },
                None => Placement {
                    rect: self.fallback_slot(idx, container, *tile, x_max, y_max),
                    kind: PlacementKind::Fallback,
                },
            };
            out.push(placement);
        }

        out
    }

    fn fallback_slot(&self, idx: usize, container: Size, tile: Size, x_max: f32, y_max: f32) -> Rect {
        let gx = (idx % self.fallback_columns) as f32;
        let gy = (idx / self.fallback_columns) as f32;
        let x = self.inner_padding + gx * (container.w / self.fallback_columns as f32);
        let y = self.inner_padding + gy * (container.h / self.fallback_rows as f32);
        Rect::new(x.min(x_max), y.min(y_max), tile.w, tile.h)
    }
}
