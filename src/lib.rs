//! Hand-stitched night sky backgrounds
//!
//! A small software-rendered animation engine: twinkling cross-stitch stars,
//! shooting stars with stitched trails, a jittering dot grid masked into two
//! hopping rabbits by a signed distance field, and a randomly packed tile
//! gallery. Everything is drawn through the [`Surface`] trait, so the same
//! engine paints into an SDL window, an in-memory canvas, or a recording
//! surface in tests.

pub mod clock;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod gallery;
pub mod layers;
pub mod math;
pub mod sdf;
pub mod stitch;
pub mod util;
pub mod viewport;

pub use config::{EngineConfig, Variant};
pub use display::{Canvas, RecordingSurface, StrokeStyle, Surface};
pub use engine::Engine;
pub use error::{Result, StitchError};
pub use viewport::Viewport;
