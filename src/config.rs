//! Engine configuration
//!
//! One engine drives every page; the differences between pages (star bands,
//! spawn cadence, stroke weight, whether the rabbits run) live here. The four
//! built-in presets reproduce the site's pages. A JSON file can override any
//! part of a preset; omitted sections fall back to the home page values.

use crate::display::StrokeStyle;
use crate::error::{Result, StitchError};
use crate::stitch::Glyph;
use crate::util::Rng;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

// ============================================================================
// Building blocks
// ============================================================================

/// Uniform range `[min, max)`; `min > max` is allowed and samples `(max, min]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: f32,
    pub max: f32,
}

impl SpawnRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    #[inline]
    pub fn sample(&self, rng: &mut Rng) -> f32 {
        rng.range_f32(self.min, self.max)
    }
}

/// A coordinate relative to a device dimension: `fraction * dimension + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    #[serde(default)]
    pub fraction: f32,
    #[serde(default)]
    pub offset: f32,
}

impl Extent {
    pub const fn new(fraction: f32, offset: f32) -> Self {
        Self { fraction, offset }
    }

    /// Absolute pixels
    pub const fn px(offset: f32) -> Self {
        Self::new(0.0, offset)
    }

    /// Fraction of the dimension
    pub const fn of(fraction: f32) -> Self {
        Self::new(fraction, 0.0)
    }

    #[inline]
    pub fn resolve(&self, dimension: f32) -> f32 {
        self.fraction * dimension + self.offset
    }
}

/// Range between two extents of the same dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtentRange {
    pub min: Extent,
    pub max: Extent,
}

impl ExtentRange {
    pub const fn new(min: Extent, max: Extent) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn sample(&self, dimension: f32, rng: &mut Rng) -> f32 {
        rng.range_f32(self.min.resolve(dimension), self.max.resolve(dimension))
    }
}

/// Page the configuration was made for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Star bands, one shooting star, two hopping rabbits
    #[default]
    Home,
    /// Shooting stars from both sides, nothing else
    About,
    /// Frequent bursts of shooting stars over a faint star layer
    Projects,
    /// Dense thin star field over the tile gallery
    Work,
}

impl Variant {
    pub const ALL: [Self; 4] = [Self::Home, Self::About, Self::Projects, Self::Work];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Projects => "projects",
            Self::Work => "work",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.name() == wanted)
            .ok_or_else(|| StitchError::UnknownVariant(s.to_string()))
    }
}

// ============================================================================
// Star field
// ============================================================================

/// Constants of the twinkle/glint curves
///
/// `alpha = clamp(base·(alpha_floor + tw·twinkle_alpha) + pulse·glint_alpha, 0, alpha_max)`
/// `size  = base·(size_floor + tw·twinkle_size + pulse·glint_size)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwinkleTuning {
    /// Radians per millisecond, multiplied by each star's twinkle factor
    pub twinkle_rate: f64,
    /// Radians per millisecond, multiplied by each star's glint speed
    pub glint_rate: f64,
    /// Sharpens the glint sine into rare spikes
    pub glint_exponent: i32,
    pub alpha_floor: f32,
    pub twinkle_alpha: f32,
    pub glint_alpha: f32,
    pub size_floor: f32,
    pub twinkle_size: f32,
    pub glint_size: f32,
    pub alpha_max: f32,
}

impl Default for TwinkleTuning {
    fn default() -> Self {
        Self {
            twinkle_rate: 0.00022,
            glint_rate: 0.003,
            glint_exponent: 10,
            alpha_floor: 0.25,
            twinkle_alpha: 1.05,
            glint_alpha: 0.55,
            size_floor: 0.85,
            twinkle_size: 0.55,
            glint_size: 0.75,
            alpha_max: 1.0,
        }
    }
}

/// How many stars a band gets for a viewport (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum BandCount {
    /// `floor(css_width / divisor * factor)`
    PerWidth { divisor: f32, factor: f32 },
    /// `max(min, floor(css_width * css_height / divisor))`
    PerArea { divisor: f32, min: usize },
}

impl BandCount {
    pub fn count(&self, viewport: &Viewport) -> usize {
        match *self {
            Self::PerWidth { divisor, factor } => {
                if divisor <= 0.0 {
                    return 0;
                }
                (viewport.css_width / divisor * factor).floor().max(0.0) as usize
            },
            Self::PerArea { divisor, min } => {
                if divisor <= 0.0 {
                    return min;
                }
                let n = (viewport.css_width * viewport.css_height / divisor).floor().max(0.0);
                (n as usize).max(min)
            },
        }
    }
}

/// One horizontal band of stars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    pub name: String,
    pub count: BandCount,
    pub x: ExtentRange,
    pub y: ExtentRange,
    /// Base size in CSS pixels (scaled by DPR)
    pub size: SpawnRange,
    /// Per-star multiplier on the twinkle rate
    pub twinkle: SpawnRange,
    pub base_alpha: SpawnRange,
    /// Per-star multiplier on the glint rate
    pub glint_speed: SpawnRange,
    #[serde(default)]
    pub glyph: Glyph,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarFieldConfig {
    pub tuning: TwinkleTuning,
    pub bands: Vec<BandConfig>,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self::home()
    }
}

impl StarFieldConfig {
    fn home() -> Self {
        Self {
            tuning: TwinkleTuning::default(),
            bands: vec![
                BandConfig {
                    name: "top".into(),
                    count: BandCount::PerWidth {
                        divisor: 90.0,
                        factor: 7.0,
                    },
                    x: ExtentRange::new(Extent::px(24.0), Extent::new(1.0, -24.0)),
                    y: ExtentRange::new(Extent::px(24.0), Extent::of(0.26)),
                    size: SpawnRange::new(1.4, 2.7),
                    twinkle: SpawnRange::new(0.9, 1.8),
                    base_alpha: SpawnRange::new(0.35, 0.75),
                    glint_speed: SpawnRange::new(0.6, 1.3),
                    glyph: Glyph::LayeredSparkle,
                },
                BandConfig {
                    name: "mid".into(),
                    count: BandCount::PerWidth {
                        divisor: 140.0,
                        factor: 5.0,
                    },
                    x: ExtentRange::new(Extent::px(30.0), Extent::new(1.0, -30.0)),
                    y: ExtentRange::new(Extent::of(0.28), Extent::of(0.58)),
                    size: SpawnRange::new(1.2, 2.3),
                    twinkle: SpawnRange::new(0.8, 1.6),
                    base_alpha: SpawnRange::new(0.18, 0.55),
                    glint_speed: SpawnRange::new(0.6, 1.3),
                    glyph: Glyph::LayeredSparkle,
                },
            ],
        }
    }

    fn work() -> Self {
        let full_width = ExtentRange::new(Extent::px(18.0), Extent::new(1.0, -18.0));
        Self {
            tuning: TwinkleTuning {
                alpha_floor: 0.22,
                glint_alpha: 0.65,
                size_floor: 0.78,
                twinkle_size: 0.58,
                glint_size: 0.85,
                ..TwinkleTuning::default()
            },
            bands: vec![
                BandConfig {
                    name: "top".into(),
                    count: BandCount::PerWidth {
                        divisor: 70.0,
                        factor: 10.0,
                    },
                    x: full_width,
                    y: ExtentRange::new(Extent::px(18.0), Extent::of(0.34)),
                    size: SpawnRange::new(0.55, 1.35),
                    twinkle: SpawnRange::new(0.9, 1.9),
                    base_alpha: SpawnRange::new(0.35, 0.8),
                    glint_speed: SpawnRange::new(0.55, 1.25),
                    glyph: Glyph::LayeredSparkle,
                },
                BandConfig {
                    name: "mid".into(),
                    count: BandCount::PerWidth {
                        divisor: 95.0,
                        factor: 9.0,
                    },
                    x: full_width,
                    y: ExtentRange::new(Extent::of(0.30), Extent::of(0.70)),
                    size: SpawnRange::new(0.50, 1.15),
                    twinkle: SpawnRange::new(0.75, 1.6),
                    base_alpha: SpawnRange::new(0.18, 0.55),
                    glint_speed: SpawnRange::new(0.55, 1.25),
                    glyph: Glyph::LayeredSparkle,
                },
                BandConfig {
                    name: "low".into(),
                    count: BandCount::PerWidth {
                        divisor: 140.0,
                        factor: 7.0,
                    },
                    x: full_width,
                    y: ExtentRange::new(Extent::of(0.68), Extent::new(1.0, -24.0)),
                    size: SpawnRange::new(0.40, 0.95),
                    twinkle: SpawnRange::new(0.65, 1.3),
                    base_alpha: SpawnRange::new(0.12, 0.42),
                    glint_speed: SpawnRange::new(0.55, 1.25),
                    glyph: Glyph::LayeredSparkle,
                },
            ],
        }
    }

    /// Faint plain stitches scattered over the whole page, no glints
    fn projects() -> Self {
        Self {
            tuning: TwinkleTuning {
                twinkle_rate: 0.00035,
                alpha_floor: 0.35,
                twinkle_alpha: 0.9,
                glint_alpha: 0.0,
                size_floor: 1.0,
                twinkle_size: 0.0,
                glint_size: 0.0,
                alpha_max: 0.6,
                ..TwinkleTuning::default()
            },
            bands: vec![BandConfig {
                name: "scatter".into(),
                count: BandCount::PerArea {
                    divisor: 18000.0,
                    min: 90,
                },
                x: ExtentRange::new(Extent::px(0.0), Extent::of(1.0)),
                y: ExtentRange::new(Extent::px(0.0), Extent::of(1.0)),
                size: SpawnRange::new(1.1, 2.2),
                twinkle: SpawnRange::new(0.8, 1.8),
                base_alpha: SpawnRange::new(0.12, 0.35),
                glint_speed: SpawnRange::fixed(0.0),
                glyph: Glyph::Stitch,
            }],
        }
    }
}

// ============================================================================
// Shooting stars
// ============================================================================

/// Initial velocity of a shooting star (pixel speeds are scaled by DPR)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Launch {
    /// Speed in px/s and angle in units of π (canvas y points down)
    Polar { speed: SpawnRange, angle: SpawnRange },
    /// Independent velocity components in px/s
    Components { vx: SpawnRange, vy: SpawnRange },
}

/// Retire a shooting star once it passes any of these lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExitLimits {
    pub min_x: Option<Extent>,
    pub max_x: Option<Extent>,
    pub min_y: Option<Extent>,
    pub max_y: Option<Extent>,
}

/// Everything about one shooting star's flight and look
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightConfig {
    pub origin_x: ExtentRange,
    pub origin_y: ExtentRange,
    pub launch: Launch,
    /// Seconds
    pub max_life: SpawnRange,
    /// CSS pixels (scaled by DPR)
    pub size: SpawnRange,
    /// Trail stitch count, floored
    pub trail: SpawnRange,
    /// Seconds of travel covered by the whole trail
    pub trail_spacing: f32,
    pub trail_alpha: f32,
    /// Trail stitch size factor at the head end
    pub trail_head: f32,
    /// How much the trail stitch size shrinks toward the tail
    pub trail_taper: f32,
    pub head_scale: f32,
    pub head_alpha: f32,
    pub head_glyph: Glyph,
    pub exit: ExitLimits,
}

/// How a shooter decides when to launch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Scheduling {
    /// At most one star in flight; the next launch is scheduled on retirement
    Single {
        /// Delay range for the first launch (defaults to `delay_ms`)
        #[serde(default)]
        first_delay_ms: Option<SpawnRange>,
        delay_ms: SpawnRange,
    },
    /// Launch on a fixed cadence regardless of stars in flight
    Pool {
        capacity: usize,
        delay_ms: SpawnRange,
        /// Probability of launching a second star in the same tick
        burst_chance: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShooterConfig {
    pub name: String,
    pub scheduling: Scheduling,
    pub flight: FlightConfig,
}

impl ShooterConfig {
    fn home() -> Self {
        Self {
            name: "sweep".into(),
            scheduling: Scheduling::Single {
                first_delay_ms: None,
                delay_ms: SpawnRange::new(6000.0, 12000.0),
            },
            flight: FlightConfig {
                origin_x: ExtentRange::new(Extent::of(0.05), Extent::of(0.45)),
                origin_y: ExtentRange::new(Extent::of(0.07), Extent::of(0.33)),
                launch: Launch::Polar {
                    speed: SpawnRange::new(900.0, 1250.0),
                    angle: SpawnRange::new(0.18, -0.30),
                },
                max_life: SpawnRange::new(0.9, 1.2),
                size: SpawnRange::new(1.7, 2.5),
                trail: SpawnRange::new(28.0, 42.0),
                trail_spacing: 0.07,
                trail_alpha: 0.7,
                trail_head: 0.95,
                trail_taper: 0.45,
                head_scale: 1.35,
                head_alpha: 0.9,
                head_glyph: Glyph::LayeredSparkle,
                exit: ExitLimits {
                    max_x: Some(Extent::new(1.0, 180.0)),
                    max_y: Some(Extent::of(0.80)),
                    ..ExitLimits::default()
                },
            },
        }
    }

    fn about(rightward: bool) -> Self {
        let (origin_x, vx, first, delay) = if rightward {
            (
                ExtentRange::new(Extent::of(0.1), Extent::of(0.5)),
                SpawnRange::new(900.0, 1200.0),
                SpawnRange::new(3000.0, 6000.0),
                SpawnRange::new(6000.0, 12000.0),
            )
        } else {
            (
                ExtentRange::new(Extent::of(0.5), Extent::of(0.9)),
                SpawnRange::new(-900.0, -1200.0),
                SpawnRange::new(6000.0, 10000.0),
                SpawnRange::new(8000.0, 15000.0),
            )
        };
        Self {
            name: if rightward { "right" } else { "left" }.into(),
            scheduling: Scheduling::Single {
                first_delay_ms: Some(first),
                delay_ms: delay,
            },
            flight: FlightConfig {
                origin_x,
                origin_y: ExtentRange::new(Extent::of(0.15), Extent::of(0.45)),
                launch: Launch::Components {
                    vx,
                    // Upward at 0.6 of a speed drawn from 900..1200
                    vy: SpawnRange::new(-540.0, -720.0),
                },
                max_life: SpawnRange::new(0.9, 1.2),
                size: SpawnRange::new(1.6, 2.4),
                trail: SpawnRange::new(28.0, 40.0),
                trail_spacing: 0.06,
                trail_alpha: 0.6,
                trail_head: 0.9,
                trail_taper: 0.4,
                head_scale: 1.3,
                head_alpha: 0.9,
                head_glyph: Glyph::Sparkle,
                exit: ExitLimits {
                    min_x: Some(Extent::px(-200.0)),
                    max_x: Some(Extent::new(1.0, 200.0)),
                    min_y: Some(Extent::px(-200.0)),
                    max_y: None,
                },
            },
        }
    }

    fn projects() -> Self {
        Self {
            name: "shower".into(),
            scheduling: Scheduling::Pool {
                capacity: 8,
                delay_ms: SpawnRange::new(800.0, 1800.0),
                burst_chance: 0.25,
            },
            flight: FlightConfig {
                origin_x: ExtentRange::new(Extent::of(-0.15), Extent::of(0.55)),
                origin_y: ExtentRange::new(Extent::of(0.05), Extent::of(0.55)),
                launch: Launch::Polar {
                    speed: SpawnRange::new(900.0, 1350.0),
                    angle: SpawnRange::new(0.10, 0.22),
                },
                max_life: SpawnRange::new(0.75, 1.15),
                size: SpawnRange::new(1.2, 2.1),
                trail: SpawnRange::new(22.0, 40.0),
                trail_spacing: 0.06,
                trail_alpha: 0.75,
                trail_head: 0.95,
                trail_taper: 0.5,
                head_scale: 1.35,
                head_alpha: 0.9,
                head_glyph: Glyph::LayeredSparkle,
                exit: ExitLimits {
                    max_x: Some(Extent::new(1.0, 220.0)),
                    max_y: Some(Extent::new(1.0, 220.0)),
                    ..ExitLimits::default()
                },
            },
        }
    }
}

// ============================================================================
// Creature mask
// ============================================================================

/// Dot grid and the two hopping rabbits masked out of it
///
/// Pixel quantities are CSS pixels and get scaled by DPR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    /// Grid pitch
    pub gap: f32,
    /// Random offset of each grid point, total width
    pub placement_jitter: f32,
    /// Stitch half-width of a dot
    pub radius: SpawnRange,
    pub jitter_speed: SpawnRange,
    pub press: SpawnRange,
    pub jitter_amplitude: f32,
    /// Jitter phase advance per second
    pub jitter_rate: f32,
    /// Horizontal run speed, px/s
    pub speed: f32,
    /// Chaser distance ahead of the leader along the wrap range
    pub spacing: f32,
    pub hop_height: f32,
    /// Horizontal distance covered by one hop
    pub hop_period: f32,
    pub chaser_hop_ratio: f32,
    pub chaser_phase: f32,
    /// Resting height as a fraction of the canvas height
    pub base_y: f32,
    pub wander: f32,
    /// Horizontal distance per radian of vertical wander
    pub wander_period: f32,
    /// Silhouette scale as a fraction of `min(width, height)`
    pub scale: f32,
    /// +1 faces left, -1 faces right
    pub facing: f32,
    /// Leader start, past the right edge
    pub entry_offset: f32,
    /// Off-screen run-out on both sides of the wrap range
    pub wrap_margin: f32,
    /// Half-width of the lit band around the silhouette, in silhouette units
    pub outline_thickness: f32,
    pub land_boost_base: f32,
    pub land_boost_gain: f32,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            gap: 7.0,
            placement_jitter: 4.0,
            radius: SpawnRange::new(1.25, 2.2),
            jitter_speed: SpawnRange::new(0.3, 1.0),
            press: SpawnRange::new(0.7, 1.3),
            jitter_amplitude: 1.4,
            jitter_rate: 0.48,
            speed: 210.0,
            spacing: 400.0,
            hop_height: 70.0,
            hop_period: 150.0,
            chaser_hop_ratio: 0.92,
            chaser_phase: 0.7,
            base_y: 0.93,
            wander: 20.0,
            wander_period: 320.0,
            scale: 0.0006,
            facing: -1.0,
            entry_offset: 260.0,
            wrap_margin: 320.0,
            outline_thickness: 5.0,
            land_boost_base: 0.85,
            land_boost_gain: 0.18,
        }
    }
}

// ============================================================================
// Gallery
// ============================================================================

/// A gallery tile as measured after its content rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    pub title: String,
    pub width: f32,
    pub height: f32,
    /// Tile shows an image that must load before layout
    #[serde(default)]
    pub has_image: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Margin kept between tiles and the stage edge
    pub inner_padding: f32,
    /// Minimum gap between randomly placed tiles
    pub tile_gap: f32,
    pub trial_budget: usize,
    pub fallback_columns: usize,
    pub fallback_rows: usize,
    pub font_timeout_ms: f64,
    pub image_timeout_ms: f64,
    pub resize_debounce_ms: f64,
    /// Stage inset from the viewport, CSS pixels
    pub stage_margin: f32,
    pub tiles: Vec<TileSpec>,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        let tile = |title: &str, width: f32, height: f32| TileSpec {
            title: title.into(),
            width,
            height,
            has_image: true,
        };
        Self {
            inner_padding: 12.0,
            tile_gap: 22.0,
            trial_budget: 700,
            fallback_columns: 2,
            fallback_rows: 4,
            font_timeout_ms: 500.0,
            image_timeout_ms: 600.0,
            resize_debounce_ms: 220.0,
            stage_margin: 40.0,
            tiles: vec![
                tile("Night Loom", 220.0, 160.0),
                tile("Paper Moon", 180.0, 220.0),
                tile("Hop Study", 240.0, 150.0),
                tile("Thread Count", 160.0, 160.0),
                tile("Field Notes", 200.0, 130.0),
                tile("Glint", 150.0, 190.0),
            ],
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub variant: Variant,
    /// Longest simulated step per frame, seconds
    pub dt_max: f32,
    /// Line width is in CSS pixels
    pub stroke: StrokeStyle,
    pub stars: Option<StarFieldConfig>,
    pub shooters: Vec<ShooterConfig>,
    pub creature: Option<CreatureConfig>,
    pub gallery: Option<GalleryConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::preset(Variant::Home)
    }
}

impl EngineConfig {
    /// Built-in configuration for a page
    pub fn preset(variant: Variant) -> Self {
        let base = Self {
            variant,
            dt_max: crate::clock::DEFAULT_DT_MAX,
            stroke: StrokeStyle::new((0, 0, 0), 0.55, 1.05),
            stars: None,
            shooters: Vec::new(),
            creature: None,
            gallery: None,
        };

        match variant {
            Variant::Home => Self {
                stars: Some(StarFieldConfig::home()),
                shooters: vec![ShooterConfig::home()],
                creature: Some(CreatureConfig::default()),
                ..base
            },
            Variant::About => Self {
                stroke: StrokeStyle::new((0, 0, 0), 0.45, 1.05),
                shooters: vec![ShooterConfig::about(true), ShooterConfig::about(false)],
                ..base
            },
            Variant::Projects => Self {
                stars: Some(StarFieldConfig::projects()),
                shooters: vec![ShooterConfig::projects()],
                ..base
            },
            Variant::Work => Self {
                stroke: StrokeStyle::new((0, 0, 0), 0.55, 0.35),
                stars: Some(StarFieldConfig::work()),
                gallery: Some(GalleryConfig::default()),
                ..base
            },
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| StitchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| StitchError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        fs::write(path, json).map_err(|source| StitchError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}
