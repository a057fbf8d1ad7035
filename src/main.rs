//! Demo host: runs one page's background in an SDL2 window

use clap::Parser;
use log::{info, warn};
use sdl2::keyboard::Keycode;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use stitchsky::display::{Display, InputEvent, RenderTarget, PAPER};
use stitchsky::{Canvas, Engine, EngineConfig, Result, Variant};

#[derive(Parser, Debug)]
#[command(name = "stitchsky", version, about = "Stitched night-sky page backgrounds")]
struct Args {
    /// Page preset: home, about, projects or work
    #[arg(short, long, default_value = "home")]
    variant: Variant,

    /// Window width in CSS pixels
    #[arg(short = 'W', long, default_value_t = 1280)]
    width: u32,

    /// Window height in CSS pixels
    #[arg(short = 'H', long, default_value_t = 800)]
    height: u32,

    /// Device pixel ratio (clamped to 2)
    #[arg(long, default_value_t = 1.0)]
    dpr: f32,

    /// JSON configuration replacing the preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed (default: derived from the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Start with shooting stars disabled
    #[arg(long)]
    reduced_motion: bool,

    /// Disable VSync for uncapped framerate
    #[arg(long)]
    no_vsync: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

fn load_config(args: &Args) -> EngineConfig {
    let Some(path) = &args.config else {
        return EngineConfig::preset(args.variant);
    };
    match EngineConfig::load(path) {
        Ok(config) => {
            info!("loaded {} configuration from {}", config.variant, path.display());
            config
        },
        Err(e) => {
            warn!("{e}; using the {} preset", args.variant);
            EngineConfig::preset(args.variant)
        },
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0x5717_C45C, |d| d.as_nanos() as u64)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = load_config(&args);

    if args.dump_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let seed = args.seed.unwrap_or_else(clock_seed);
    let mut engine = Engine::new(config, seed);
    engine.set_reduced_motion(args.reduced_motion);
    engine.resize(args.width as f32, args.height as f32, args.dpr);
    let dpr = engine.viewport().dpr;
    let (width, height) = (engine.viewport().width, engine.viewport().height);

    // Decorative only: no window means no animation, not a failure
    let (mut display, texture_creator) =
        match Display::with_options("stitchsky", width.max(1), height.max(1), !args.no_vsync) {
            Ok(display) => display,
            Err(e) => {
                warn!("no display available, not animating: {e}");
                return Ok(());
            },
        };
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut canvas = Canvas::new(width, height, PAPER);

    info!(
        "{} page at {}x{} ({}x{} device), seed {seed:#x}",
        engine.config().variant,
        args.width,
        args.height,
        width,
        height
    );
    info!("keys: M toggles reduced motion, F logs frame rate, Escape quits");

    let start = Instant::now();
    let mut first_paint = true;

    'main: loop {
        for event in display.poll_events() {
            match event {
                InputEvent::Quit | InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::M) => {
                    let reduced = !engine.reduced_motion();
                    engine.set_reduced_motion(reduced);
                    info!("reduced motion {}", if reduced { "on" } else { "off" });
                },
                InputEvent::KeyDown(Keycode::F) => {
                    let clock = engine.clock();
                    let (min_fps, max_fps) = clock.min_max_fps();
                    info!(
                        "FPS {:.0} avg  {:.0} min  {:.0} max  {:.1}ms",
                        clock.avg_fps(),
                        min_fps,
                        max_fps,
                        clock.avg_frame_time_ms()
                    );
                },
                InputEvent::Resized { width, height } => {
                    engine.resize(width as f32 / dpr, height as f32 / dpr, dpr);
                    let vp = *engine.viewport();
                    canvas.resize(vp.width, vp.height);
                    target = RenderTarget::with_size(&texture_creator, vp.width, vp.height)?;
                },
                InputEvent::KeyDown(_) => {},
            }
        }

        let now_ms = start.elapsed().as_secs_f64() * 1000.0;
        if engine.tick(now_ms, &mut canvas).is_none() {
            // Minimized: nothing to draw
            std::thread::sleep(Duration::from_millis(50));
            continue;
        }

        // The host has no web fonts or images to wait for
        if first_paint {
            engine.mark_fonts_ready();
            engine.mark_images_ready();
            first_paint = false;
        }

        display.present(&mut target, canvas.buffer())?;
    }

    info!("{} frames drawn", engine.frames());
    Ok(())
}
