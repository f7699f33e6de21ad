//! `lux`: render OBJ scenes with direct lighting or a photon map.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lux_core::{load_obj, ObjOptions, Scene};
use lux_renderer::{Camera, DirectionSampling, RenderConfig, Renderer, ShadingMode};

/// Degrees the camera orbits between frames
const ORBIT_STEP_DEGREES: f32 = 5.0;

/// lux: photon-mapped software ray tracer
#[derive(Parser, Debug)]
#[command(
    name = "lux",
    version,
    about = "Render OBJ scenes with a Whitted ray tracer and an optional photon map",
    after_help = "EXAMPLES:\n  \
                  lux cornell.obj --output cornell.png\n  \
                  lux cornell.obj logo.obj sphere.obj --mode indirect --photons 200000\n  \
                  lux cornell.obj --frames 72 --orbit --output orbit/frame.ppm\n  \
                  RUST_LOG=debug lux cornell.obj --config render.json"
)]
struct Cli {
    /// OBJ files, merged into one scene. The light is placed from the first.
    #[arg(required = true)]
    scenes: Vec<PathBuf>,

    /// Output image; the extension picks the format (.ppm is plain-text PPM)
    #[arg(short, long, default_value = "output.ppm")]
    output: PathBuf,

    /// JSON render config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Image height in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Photons emitted from the light when building the photon map
    #[arg(short, long)]
    photons: Option<usize>,

    /// Lighting model
    #[arg(short, long, value_enum)]
    mode: Option<CliShadingMode>,

    /// Photon direction distribution
    #[arg(long, value_enum)]
    sampling: Option<CliSampling>,

    /// Seed for photon emission (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Uniform scale applied to OBJ vertices
    #[arg(long, default_value_t = 0.17)]
    scale: f32,

    /// Frames to render; frame n is written as <stem>n.<ext>
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Orbit the camera around the scene between frames
    #[arg(long)]
    orbit: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliShadingMode {
    /// Point light, specular highlight and hard shadows
    Direct,
    /// Photon map estimate
    Indirect,
}

impl From<CliShadingMode> for ShadingMode {
    fn from(m: CliShadingMode) -> Self {
        match m {
            CliShadingMode::Direct => ShadingMode::Direct,
            CliShadingMode::Indirect => ShadingMode::Indirect,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliSampling {
    /// Normalized cube samples (biased toward diagonals)
    Cube,
    /// Uniform over the sphere
    Sphere,
}

impl From<CliSampling> for DirectionSampling {
    fn from(s: CliSampling) -> Self {
        match s {
            CliSampling::Cube => DirectionSampling::Cube,
            CliSampling::Sphere => DirectionSampling::Sphere,
        }
    }
}

impl Cli {
    /// Config file (or defaults) with command-line overrides applied.
    fn render_config(&self) -> Result<RenderConfig> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)
                .with_context(|| format!("Failed to read render config {}", path.display()))?,
            None => RenderConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(count) = self.photons {
            config.photons.count = count;
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if let Some(sampling) = self.sampling {
            config.photons.sampling = sampling.into();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        Ok(config)
    }

    /// Load every OBJ file into one scene, keeping the first file's light.
    fn load_scene(&self) -> Result<Scene> {
        let options = ObjOptions::default().with_scale(self.scale);
        let mut merged: Option<Scene> = None;

        for path in &self.scenes {
            let scene = load_obj(path, &options)
                .with_context(|| format!("Failed to load scene {}", path.display()))?;
            match merged.as_mut() {
                Some(first) => first.append(scene),
                None => merged = Some(scene),
            }
        }

        merged.context("No scene files given")
    }
}

/// Output path for frame `index`: unchanged for a single frame, otherwise the
/// frame number is appended to the file stem.
fn frame_path(output: &Path, index: u32, frames: u32) -> PathBuf {
    if frames <= 1 {
        return output.to_path_buf();
    }

    let stem = output.file_stem().and_then(|s| s.to_str()).unwrap_or("frame");
    let name = match output.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}{index}.{ext}"),
        None => format!("{stem}{index}"),
    };
    output.with_file_name(name)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    let config = cli.render_config()?;
    let scene = cli.load_scene()?;

    log::info!(
        "Scene '{}': {} triangles, light at {:?}",
        scene.name,
        scene.triangle_count(),
        scene.light
    );

    let start = Instant::now();
    let mut renderer = Renderer::new(scene, Camera::new(), config);

    for frame in 0..cli.frames {
        if cli.orbit && frame > 0 {
            renderer.camera_mut().orbit(ORBIT_STEP_DEGREES.to_radians());
        }

        let image = renderer.render_frame();
        let path = frame_path(&cli.output, frame, cli.frames);
        image
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Saved {}", path.display());
    }

    log::info!("Finished {} frame(s) in {:.2?}", cli.frames, start.elapsed());
    Ok(())
}
