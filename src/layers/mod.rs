mod creature;
mod shooting_stars;
mod star_field;

pub use creature::{CreatureMask, Dot, Pose};
pub use shooting_stars::{ShooterSlot, ShootingStar, ShootingStars};
pub use star_field::{Star, StarField};

use crate::clock::Frame;
use crate::display::Surface;
use crate::util::Rng;
use crate::viewport::Viewport;

/// Shared per-tick inputs handed to every layer's update
pub struct UpdateContext<'a> {
    pub viewport: &'a Viewport,
    pub rng: &'a mut Rng,
    /// Spawning of new motion is suppressed; existing motion may finish
    pub reduced_motion: bool,
}

/// Trait for every animated layer of the background
///
/// The engine calls `resize` whenever the canvas changes size (and once
/// before the first frame), then `update` followed by `render` once per tick,
/// layers in back-to-front order.
pub trait Layer {
    /// Layer name for logs
    fn name(&self) -> &str;

    /// Rebuild size-dependent state. Anything generated for the previous size
    /// is discarded.
    fn resize(&mut self, viewport: &Viewport, rng: &mut Rng);

    /// Advance simulation state (default: nothing to simulate)
    fn update(&mut self, _frame: &Frame, _ctx: &mut UpdateContext) {}

    /// Paint the current state. Stroke style is already set; layers only
    /// change the global alpha.
    fn render(&self, frame: &Frame, viewport: &Viewport, surface: &mut dyn Surface);
}
